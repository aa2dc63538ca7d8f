use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::ImlError;
use crate::ImlResult;

/// A Java module that gets an `.iml` file.
///
/// Folder entries are paths relative to the module directory and are written
/// into `file://$MODULE_DIR$/...` urls verbatim.
///
/// Missing names and paths deserialize as empty and are reported by
/// [`Module::validate`].
///
/// Both `snake_case` keys and the `camelCase` keys used by older workspace
/// descriptions are accepted:
///
/// ```toml
/// [[modules]]
/// moduleName = "portal-web"
/// modulePath = "portal-web"
/// webrootFolders = ["docroot"]
/// excludeFolders = ["docroot/WEB-INF/classes"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Module {
	#[serde(default, alias = "moduleName")]
	pub module_name: String,
	#[serde(default, alias = "modulePath")]
	pub module_path: PathBuf,
	#[serde(default, alias = "webrootFolders")]
	pub webroot_folders: Vec<String>,
	#[serde(default, alias = "sourceFolders")]
	pub source_folders: Vec<String>,
	#[serde(default, alias = "resourceFolders")]
	pub resource_folders: Vec<String>,
	#[serde(default, alias = "testSourceFolders")]
	pub test_source_folders: Vec<String>,
	#[serde(default, alias = "testResourceFolders")]
	pub test_resource_folders: Vec<String>,
	#[serde(default, alias = "excludeFolders")]
	pub exclude_folders: Vec<String>,
}

impl Module {
	pub fn new(module_name: impl Into<String>, module_path: impl Into<PathBuf>) -> Self {
		Self {
			module_name: module_name.into(),
			module_path: module_path.into(),
			..Self::default()
		}
	}

	/// Check the fields that the generated file name depends on.
	pub fn validate(&self) -> ImlResult<()> {
		if self.module_name.trim().is_empty() {
			return Err(ImlError::Validation {
				field: "moduleName",
				module: self.module_path.display().to_string(),
			});
		}

		if self.module_path.as_os_str().is_empty() {
			return Err(ImlError::Validation {
				field: "modulePath",
				module: self.module_name.clone(),
			});
		}

		Ok(())
	}
}

/// An opaque core descriptor. Cores travel through the pipeline next to
/// modules but never produce a file of their own.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CoreDescriptor {
	#[serde(default)]
	pub name: String,
	#[serde(flatten)]
	pub attributes: BTreeMap<String, serde_json::Value>,
}

impl CoreDescriptor {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			attributes: BTreeMap::new(),
		}
	}
}

/// One element of the merged descriptor stream.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Descriptor {
	Module(Module),
	Core(CoreDescriptor),
}

impl Descriptor {
	pub fn is_module(&self) -> bool {
		matches!(self, Self::Module(_))
	}

	pub fn is_core(&self) -> bool {
		matches!(self, Self::Core(_))
	}

	/// Display name used in logs.
	pub fn name(&self) -> &str {
		match self {
			Self::Module(module) => &module.module_name,
			Self::Core(core) => &core.name,
		}
	}
}

/// A named `<component>` block. Empty content means the block is omitted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Component {
	pub name: String,
	pub content: String,
}

impl Component {
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			content: content.into(),
		}
	}
}

/// The components of one module file before they are joined into a document.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModuleFile {
	pub file_name: PathBuf,
	pub components: Vec<Component>,
}

/// A document ready to be reflowed and handed to a sink.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileDescriptor {
	pub name: PathBuf,
	pub content: String,
}
