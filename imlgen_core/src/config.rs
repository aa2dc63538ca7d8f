use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CoreDescriptor;
use crate::ImlError;
use crate::ImlResult;
use crate::JoinResolver;
use crate::Module;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["imlgen.toml", ".imlgen.toml", ".config/imlgen.toml"];

/// Configuration loaded from an `imlgen.toml` file.
///
/// ```toml
/// [output]
/// root = "."
///
/// [descriptors]
/// paths = ["modules.json"]
///
/// [[modules]]
/// module_name = "portal-impl"
/// module_path = "portal-impl"
/// source_folders = ["src"]
/// test_source_folders = ["test/unit"]
///
/// [[cores]]
/// name = "portal-kernel"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ImlConfig {
	/// Where generated files are placed.
	#[serde(default)]
	pub output: OutputConfig,
	/// Additional files holding module and core descriptors.
	#[serde(default)]
	pub descriptors: DescriptorsConfig,
	/// Modules declared inline.
	#[serde(default)]
	pub modules: Vec<Module>,
	/// Cores declared inline.
	#[serde(default)]
	pub cores: Vec<CoreDescriptor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
	/// Base directory that relative module paths resolve against, relative
	/// to the project root. Defaults to the project root itself.
	#[serde(default)]
	pub root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DescriptorsConfig {
	/// Descriptor files relative to the project root. The format follows the
	/// file extension: `json` or `toml`.
	#[serde(default)]
	pub paths: Vec<PathBuf>,
}

/// The contents of a descriptor file, or everything collected from a
/// config.
#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceDescriptors {
	#[serde(default)]
	pub modules: Vec<Module>,
	#[serde(default)]
	pub cores: Vec<CoreDescriptor>,
}

impl WorkspaceDescriptors {
	pub fn is_empty(&self) -> bool {
		self.modules.is_empty() && self.cores.is_empty()
	}
}

impl ImlConfig {
	/// Returns the first config file path discovered at `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> ImlResult<Option<ImlConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> ImlResult<ImlConfig> {
		toml::from_str(content).map_err(|e| ImlError::ConfigParse(e.to_string()))
	}

	/// Resolver rooted at the configured output directory.
	pub fn resolver(&self, root: &Path) -> JoinResolver {
		match &self.output.root {
			Some(output_root) => JoinResolver::new(root.join(output_root)),
			None => JoinResolver::new(root),
		}
	}

	/// Inline modules and cores followed by those of each descriptor file,
	/// in the order the files are listed.
	pub fn load_descriptors(&self, root: &Path) -> ImlResult<WorkspaceDescriptors> {
		let mut descriptors = WorkspaceDescriptors {
			modules: self.modules.clone(),
			cores: self.cores.clone(),
		};

		for rel_path in &self.descriptors.paths {
			let loaded = load_descriptor_file(root, rel_path)?;
			tracing::debug!(
				path = %rel_path.display(),
				modules = loaded.modules.len(),
				cores = loaded.cores.len(),
				"loaded descriptor file"
			);
			descriptors.modules.extend(loaded.modules);
			descriptors.cores.extend(loaded.cores);
		}

		Ok(descriptors)
	}
}

fn load_descriptor_file(root: &Path, rel_path: &Path) -> ImlResult<WorkspaceDescriptors> {
	let display_path = rel_path.display().to_string();
	let content = std::fs::read_to_string(root.join(rel_path)).map_err(|e| {
		ImlError::DescriptorFile {
			path: display_path.clone(),
			reason: e.to_string(),
		}
	})?;
	let format = rel_path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();

	parse_descriptor_file(&content, &format, &display_path)
}

/// Parse descriptor file content in the given format.
pub fn parse_descriptor_file(
	content: &str,
	format: &str,
	path: &str,
) -> ImlResult<WorkspaceDescriptors> {
	let to_error = |reason: String| {
		ImlError::DescriptorFile {
			path: path.to_string(),
			reason,
		}
	};

	match format {
		"json" => serde_json::from_str(content).map_err(|e| to_error(e.to_string())),
		"toml" => toml::from_str(content).map_err(|e| to_error(e.to_string())),
		_ => Err(ImlError::UnsupportedDescriptorFormat(format.to_string())),
	}
}
