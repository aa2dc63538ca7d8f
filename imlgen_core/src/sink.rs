//! Where generated files go: path resolution and file writing.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::ImlError;
use crate::ImlResult;

/// Resolves a file name relative to a module's base path.
pub trait PathResolver: Send + Sync + 'static {
	fn resolve(&self, base: &Path, file_name: &str) -> PathBuf;
}

impl<F> PathResolver for F
where
	F: Fn(&Path, &str) -> PathBuf + Send + Sync + 'static,
{
	fn resolve(&self, base: &Path, file_name: &str) -> PathBuf {
		self(base, file_name)
	}
}

/// Joins `root`, the module path and the file name. Absolute module paths
/// replace the root.
#[derive(Debug, Clone, Default)]
pub struct JoinResolver {
	root: PathBuf,
}

impl JoinResolver {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl PathResolver for JoinResolver {
	fn resolve(&self, base: &Path, file_name: &str) -> PathBuf {
		self.root.join(base).join(file_name)
	}
}

/// Receives finished documents.
pub trait FileSink: Send + Sync + 'static {
	fn write(&self, path: &Path, content: &str) -> impl Future<Output = ImlResult<()>> + Send;
}

/// Writes to the filesystem, creating missing parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FileSink for FsSink {
	async fn write(&self, path: &Path, content: &str) -> ImlResult<()> {
		let to_write_error = |source| {
			ImlError::Write {
				path: path.to_path_buf(),
				source,
			}
		};

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent)
				.await
				.map_err(to_write_error)?;
		}

		tokio::fs::write(path, content)
			.await
			.map_err(to_write_error)
	}
}

/// Keeps written files in memory. Used for dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
	files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of everything written so far, ordered by path.
	pub fn files(&self) -> BTreeMap<PathBuf, String> {
		self.files
			.lock()
			.map(|files| files.clone())
			.unwrap_or_default()
	}

	pub fn get(&self, path: &Path) -> Option<String> {
		self.files.lock().ok()?.get(path).cloned()
	}

	pub fn len(&self) -> usize {
		self.files.lock().map_or(0, |files| files.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl FileSink for MemorySink {
	async fn write(&self, path: &Path, content: &str) -> ImlResult<()> {
		let mut files = self
			.files
			.lock()
			.map_err(|e| ImlError::Task(format!("memory sink poisoned: {e}")))?;
		files.insert(path.to_path_buf(), content.to_string());
		Ok(())
	}
}
