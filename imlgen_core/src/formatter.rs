//! Literal XML fragments for the pieces of an `.iml` file.
//!
//! Every function returns plain strings with one element per line. Nothing
//! here indents; that is left to [`reflow`](crate::reflow).

use crate::Component;
use crate::Module;

/// Exclude folder that switches the compiler output into the web app.
pub const WEB_INF_CLASSES: &str = "docroot/WEB-INF/classes";

const MODULE_DIR_URL: &str = "file://$MODULE_DIR$";

/// Wrap a component's content in a `<component>` element, or return an empty
/// string when there is nothing to wrap.
pub fn component_xml(component: &Component) -> String {
	if component.content.is_empty() {
		return String::new();
	}

	format!(
		"<component name=\"{}\">\n{}\n</component>",
		component.name, component.content
	)
}

pub fn exclude_folder_element(folder: &str) -> String {
	format!("<excludeFolder url=\"{MODULE_DIR_URL}/{folder}\" />")
}

pub fn source_folder_element(attr_name: &str, attr_value: &str, folder: &str) -> String {
	format!("<sourceFolder url=\"{MODULE_DIR_URL}/{folder}\" {attr_name}=\"{attr_value}\" />")
}

/// The web facet for modules with a webroot.
///
/// Only the first webroot is written. Further entries are ignored.
pub fn facet_manager_xml(module: &Module) -> String {
	let Some(webroot) = module.webroot_folders.first() else {
		return String::new();
	};

	[
		format!("<facet type=\"web\" name=\"{}\">", module.module_name),
		"<configuration>".to_string(),
		"<webroots>".to_string(),
		format!("<root url=\"{MODULE_DIR_URL}/{webroot}\" relative=\"/\" />"),
		"</webroots>".to_string(),
		"</configuration>".to_string(),
		"</facet>".to_string(),
	]
	.join("\n")
}

/// `<output>` and, for modules with test sources, `<output-test>`.
pub fn output_url_elements(module: &Module) -> Vec<String> {
	let output_folder = if module.exclude_folders.iter().any(|f| f == WEB_INF_CLASSES) {
		WEB_INF_CLASSES
	} else {
		"classes"
	};

	let mut elements = vec![format!("<output url=\"{MODULE_DIR_URL}/{output_folder}\" />")];

	if !module.test_source_folders.is_empty() {
		elements.push(format!("<output-test url=\"{MODULE_DIR_URL}/test-classes\" />"));
	}

	elements
}

pub fn new_module_root_manager_xml(module: &Module) -> String {
	let mut lines = output_url_elements(module);
	lines.push(format!("<content url=\"{MODULE_DIR_URL}\">"));
	lines.extend(source_folder_elements(&module.source_folders, "isTestSource", "false"));
	lines.extend(source_folder_elements(&module.resource_folders, "type", "java-resource"));
	lines.extend(source_folder_elements(&module.test_source_folders, "isTestSource", "true"));
	lines.extend(source_folder_elements(
		&module.test_resource_folders,
		"type",
		"java-test-resource",
	));
	lines.extend(
		module
			.exclude_folders
			.iter()
			.map(|folder| exclude_folder_element(folder)),
	);
	lines.push("</content>".to_string());
	lines.push("<orderEntry type=\"inheritedJdk\" />".to_string());
	lines.push("<orderEntry type=\"sourceFolder\" forTests=\"false\" />".to_string());

	lines.join("\n")
}

fn source_folder_elements<'a>(
	folders: &'a [String],
	attr_name: &'a str,
	attr_value: &'a str,
) -> impl Iterator<Item = String> + 'a {
	folders
		.iter()
		.map(move |folder| source_folder_element(attr_name, attr_value, folder))
}
