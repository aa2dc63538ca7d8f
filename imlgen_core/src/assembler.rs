use std::path::PathBuf;

use crate::Component;
use crate::FileDescriptor;
use crate::ImlResult;
use crate::Module;
use crate::ModuleFile;
use crate::PathResolver;
use crate::formatter::component_xml;
use crate::formatter::facet_manager_xml;
use crate::formatter::new_module_root_manager_xml;
use crate::reflow::reflow;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const MODULE_OPEN_TAG: &str = r#"<module type="JAVA_MODULE" version="4">"#;
pub const MODULE_CLOSE_TAG: &str = "</module>";

pub const NEW_MODULE_ROOT_MANAGER: &str = "NewModuleRootManager";
pub const FACET_MANAGER: &str = "FacetManager";

/// Path of the `.iml` file for `module`.
pub fn module_iml_path(module: &Module, resolver: &impl PathResolver) -> PathBuf {
	resolver.resolve(&module.module_path, &format!("{}.iml", module.module_name))
}

/// Collect the components of a module file. The root manager always comes
/// before the facet manager.
pub fn module_xml(module: &Module, resolver: &impl PathResolver) -> ModuleFile {
	ModuleFile {
		file_name: module_iml_path(module, resolver),
		components: vec![
			Component::new(NEW_MODULE_ROOT_MANAGER, new_module_root_manager_xml(module)),
			Component::new(FACET_MANAGER, facet_manager_xml(module)),
		],
	}
}

/// Join the components of `file` into a single document. Empty components
/// are dropped. Each component stays one multi-line entry until the document
/// is reflowed.
pub fn intellij_xml(file: &ModuleFile) -> FileDescriptor {
	let mut content = vec![XML_DECLARATION.to_string(), MODULE_OPEN_TAG.to_string()];
	content.extend(
		file.components
			.iter()
			.map(component_xml)
			.filter(|xml| !xml.is_empty()),
	);
	content.push(MODULE_CLOSE_TAG.to_string());

	FileDescriptor {
		name: file.file_name.clone(),
		content: content.join("\n"),
	}
}

/// Validate, assemble and reflow the `.iml` document for one module.
pub fn render_module(module: &Module, resolver: &impl PathResolver) -> ImlResult<FileDescriptor> {
	module.validate()?;

	let mut file = intellij_xml(&module_xml(module, resolver));
	file.content = reflow(&file.content);
	tracing::debug!(module = %module.module_name, path = %file.name.display(), "rendered module file");

	Ok(file)
}
