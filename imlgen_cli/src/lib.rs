use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate IntelliJ module files from a workspace description.",
	long_about = "imlgen reads module and core descriptors from imlgen.toml (and any descriptor \
	              files it lists) and writes one tab indented .iml file per module.\n\nQuick \
	              start:\n  imlgen init      Create a sample imlgen.toml\n  imlgen generate  \
	              Write all module files\n  imlgen check     Verify module files are up to \
	              date\n  imlgen list      Show the discovered modules and cores"
)]
pub struct ImlCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize imlgen in a project by creating a sample `imlgen.toml`.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Write an `.iml` file for every module.
	///
	/// Modules are processed independently. A module that fails validation or
	/// cannot be written is reported, and the remaining modules are still
	/// written. Exits with a non-zero status code if any module failed.
	Generate {
		/// Render the files without writing them. Prints which files would be
		/// written.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Output format for the summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that every module file on disk matches what would be generated.
	///
	/// Exits with a non-zero status code if any file is missing or stale.
	/// Ideal for CI pipelines.
	Check {
		/// Show a unified diff for each stale module file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List all modules and cores in the workspace description.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
