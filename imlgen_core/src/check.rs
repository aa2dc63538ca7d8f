use std::io::ErrorKind;
use std::path::PathBuf;

use crate::ImlError;
use crate::ImlResult;
use crate::Module;
use crate::PathResolver;
use crate::assembler::render_module;

/// An `.iml` file whose content on disk differs from what would be generated.
#[derive(Debug, Clone)]
pub struct StaleFile {
	/// Path of the module file.
	pub path: PathBuf,
	/// Name of the module the file belongs to.
	pub module_name: String,
	/// Current content, or `None` when the file does not exist yet.
	pub current: Option<String>,
	/// Content the generator would write.
	pub expected: String,
}

impl StaleFile {
	pub fn is_missing(&self) -> bool {
		self.current.is_none()
	}
}

/// Result of comparing generated module files against the filesystem.
#[derive(Debug, Default)]
pub struct CheckResult {
	/// Files that are missing or out of date.
	pub stale: Vec<StaleFile>,
	/// Files that already match.
	pub up_to_date: Vec<PathBuf>,
	/// Modules that could not be rendered.
	pub errors: Vec<ImlError>,
}

impl CheckResult {
	/// Returns true if all module files are up to date and no errors occurred.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty() && self.errors.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}
}

/// Render every module and compare it with the file on disk. Invalid modules
/// are collected in [`CheckResult::errors`]; unreadable files abort the check.
pub fn check_workspace(modules: &[Module], resolver: &impl PathResolver) -> ImlResult<CheckResult> {
	let mut result = CheckResult::default();

	for module in modules {
		let file = match render_module(module, resolver) {
			Ok(file) => file,
			Err(e) => {
				result.errors.push(e);
				continue;
			}
		};

		let current = match std::fs::read_to_string(&file.name) {
			Ok(content) => Some(content),
			Err(e) if e.kind() == ErrorKind::NotFound => None,
			Err(e) => return Err(e.into()),
		};

		if current.as_deref() == Some(file.content.as_str()) {
			result.up_to_date.push(file.name);
		} else {
			tracing::debug!(path = %file.name.display(), "module file is stale");
			result.stale.push(StaleFile {
				path: file.name,
				module_name: module.module_name.clone(),
				current,
				expected: file.content,
			});
		}
	}

	Ok(result)
}
