use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ImlError {
	#[error(transparent)]
	#[diagnostic(code(imlgen::io_error))]
	Io(#[from] std::io::Error),

	#[error("module `{module}` is missing required field `{field}`")]
	#[diagnostic(
		code(imlgen::validation),
		help("every module needs a non-empty `moduleName` and `modulePath`")
	)]
	Validation { field: &'static str, module: String },

	#[error("failed to write `{}`", .path.display())]
	#[diagnostic(code(imlgen::write))]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(imlgen::config_parse),
		help("check that imlgen.toml is valid TOML with [[modules]] and/or [[cores]] tables")
	)]
	ConfigParse(String),

	#[error("failed to load descriptor file `{path}`: {reason}")]
	#[diagnostic(code(imlgen::descriptor_file))]
	DescriptorFile { path: String, reason: String },

	#[error("unsupported descriptor file format: `{0}`")]
	#[diagnostic(
		code(imlgen::unsupported_format),
		help("supported formats: json, toml")
	)]
	UnsupportedDescriptorFormat(String),

	#[error("module task did not complete: {0}")]
	#[diagnostic(code(imlgen::task))]
	Task(String),
}

pub type ImlResult<T> = Result<T, ImlError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
