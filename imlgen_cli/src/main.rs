use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use imlgen_cli::Commands;
use imlgen_cli::ImlCli;
use imlgen_cli::OutputFormat;
use imlgen_core::FsSink;
use imlgen_core::ImlConfig;
use imlgen_core::ImlError;
use imlgen_core::MemorySink;
use imlgen_core::WorkspaceDescriptors;
use imlgen_core::WorkspacePipeline;
use imlgen_core::WorkspaceReport;
use imlgen_core::check_workspace;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# imlgen configuration\n\n# Base directory that relative module \
                             paths resolve against.\n# [output]\n# root = \".\"\n\n# Extra \
                             descriptor files (json or toml) holding `modules` and `cores` \
                             lists.\n# [descriptors]\n# paths = [\"modules.json\"]\n\n[[modules]]\n\
                             module_name = \"app\"\nmodule_path = \"app\"\nsource_folders = \
                             [\"src/main/java\"]\nresource_folders = \
                             [\"src/main/resources\"]\ntest_source_folders = \
                             [\"src/test/java\"]\n";

fn main() {
	let args = ImlCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Generate { dry_run, format }) => run_generate(&args, dry_run, format),
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `imlgen --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<ImlError>() {
			Ok(iml_err) => {
				let report: miette::Report = (*iml_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_logging(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(use_color)
		.with_target(false)
		.with_writer(std::io::stderr)
		.try_init();
}

fn resolve_root(args: &ImlCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &ImlCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = ImlConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("imlgen.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created imlgen.toml");
	println!();
	println!("Next steps:");
	println!("  1. Describe your modules in {}", config_path.display());
	println!("  2. Run `imlgen generate` to write the .iml files");
	println!("  3. Run `imlgen check` in CI to keep them in sync");

	Ok(())
}

/// Load the config and every descriptor it references.
fn load_workspace(
	root: &Path,
) -> Result<(ImlConfig, WorkspaceDescriptors), Box<dyn std::error::Error>> {
	tracing::debug!(root = %root.display(), "loading workspace");
	let Some(config) = ImlConfig::load(root)? else {
		return Err(format!(
			"no imlgen.toml found in {}; run `imlgen init` to create one",
			root.display()
		)
		.into());
	};
	let descriptors = config.load_descriptors(root)?;

	Ok((config, descriptors))
}

fn run_generate(
	args: &ImlCli,
	dry_run: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let (config, descriptors) = load_workspace(&root)?;
	let resolver = config.resolver(&root);
	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()?;

	let report = if dry_run {
		let pipeline = WorkspacePipeline::new(resolver, MemorySink::new());
		runtime.block_on(pipeline.create_workspace(descriptors.cores, descriptors.modules))
	} else {
		let pipeline = WorkspacePipeline::new(resolver, FsSink);
		runtime.block_on(pipeline.create_workspace(descriptors.cores, descriptors.modules))
	};

	match format {
		OutputFormat::Json => print_report_json(&report, &root, dry_run),
		OutputFormat::Text => print_report_text(&report, &root, dry_run, args.verbose),
	}

	if report.has_errors() {
		process::exit(1);
	}

	Ok(())
}

fn print_report_text(report: &WorkspaceReport, root: &Path, dry_run: bool, verbose: bool) {
	if report.modules_seen == 0 {
		println!("No modules found.");
	} else if dry_run {
		println!(
			"Dry run: would write {} module file(s):",
			report.written.len()
		);
		for path in &report.written {
			println!("  {}", make_relative(path, root));
		}
	} else {
		println!("Wrote {} module file(s).", report.written.len());
		if verbose {
			for path in &report.written {
				println!("  {}", make_relative(path, root));
			}
		}
	}

	for error in &report.errors {
		eprintln!("{} {error}", colored!("failed:", red));
	}
}

fn print_report_json(report: &WorkspaceReport, root: &Path, dry_run: bool) {
	let written: Vec<String> = report
		.written
		.iter()
		.map(|path| make_relative(path, root))
		.collect();
	let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
	let output = serde_json::json!({
		"ok": report.is_ok(),
		"dry_run": dry_run,
		"written": written,
		"errors": errors,
		"modules": report.modules_seen,
		"cores": report.cores_seen,
	});
	println!("{output}");
}

fn run_check(
	args: &ImlCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let (config, descriptors) = load_workspace(&root)?;
	let result = check_workspace(&descriptors.modules, &config.resolver(&root))?;

	match format {
		OutputFormat::Json => {
			let stale: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| {
					serde_json::json!({
						"file": make_relative(&entry.path, root.as_path()),
						"module": entry.module_name,
						"missing": entry.is_missing(),
					})
				})
				.collect();
			let errors: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
			let output = serde_json::json!({
				"ok": result.is_ok(),
				"stale": stale,
				"errors": errors,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if result.is_ok() {
				println!("Check passed: all module files are up to date.");
			}

			for entry in &result.stale {
				let rel = make_relative(&entry.path, &root);
				if entry.is_missing() {
					eprintln!(
						"{} module `{}` has no file at {rel}",
						colored!("missing:", yellow),
						entry.module_name
					);
				} else {
					eprintln!(
						"{} module `{}` in {rel}",
						colored!("stale:", yellow),
						entry.module_name
					);
				}

				if show_diff {
					print_diff(entry.current.as_deref().unwrap_or_default(), &entry.expected);
				}
			}

			for error in &result.errors {
				eprintln!("{} {error}", colored!("error:", red));
			}

			if !result.is_ok() {
				eprintln!();
				eprintln!(
					"{} stale module file(s) found. Run `imlgen generate` to update them.",
					result.stale.len()
				);
			}
		}
	}

	if !result.is_ok() {
		process::exit(1);
	}

	Ok(())
}

fn run_list(args: &ImlCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let (_, descriptors) = load_workspace(&root)?;

	if descriptors.is_empty() {
		println!("No modules or cores found.");
		return Ok(());
	}

	if !descriptors.modules.is_empty() {
		println!("{}", colored!("Modules:", bold));
		for module in &descriptors.modules {
			println!(
				"  {} ({})",
				module.module_name,
				module.module_path.display()
			);
		}
	}

	if !descriptors.cores.is_empty() {
		if !descriptors.modules.is_empty() {
			println!();
		}
		println!("{}", colored!("Cores:", bold));
		for core in &descriptors.cores {
			println!("  {}", core.name);
		}
	}

	println!();
	println!(
		"{} module(s), {} core(s)",
		descriptors.modules.len(),
		descriptors.cores.len()
	);

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		let line = change.value().trim_end_matches('\n');
		match change.tag() {
			ChangeTag::Delete => {
				eprintln!("  {}", colored!(format!("-{line}"), red));
			}
			ChangeTag::Insert => {
				eprintln!("  {}", colored!(format!("+{line}"), green));
			}
			ChangeTag::Equal => {
				eprintln!("   {line}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
