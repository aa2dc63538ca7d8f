//! `imlgen_core` is the core library for the imlgen module file generator. It
//! turns module descriptions into IntelliJ `.iml` documents, re-indents them
//! and hands them to a sink.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Module and core descriptors
//!   → Workspace pipeline (merges both inputs, broadcasts to each consumer)
//!   → Document assembler (module → NewModuleRootManager + FacetManager components)
//!   → Element formatter (folders and components → XML fragments)
//!   → Reflower (line based tab indentation)
//!   → Sink (resolves the `.iml` path and writes the document)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `imlgen.toml`, including inline
//!   modules, descriptor files and the output root.
//! - [`formatter`] — XML fragments for folders, output urls and components.
//! - [`reflow`] — The line based indentation pass.
//!
//! ## Key Types
//!
//! - [`Module`] — A Java module with its source, resource and exclude folders.
//! - [`CoreDescriptor`] — An opaque descriptor that travels with the modules.
//! - [`WorkspacePipeline`] — Runs descriptors through the consumers.
//! - [`PathResolver`] / [`FileSink`] — Where files go and how they are written.
//! - [`CheckResult`] — Result of comparing generated files with the disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imlgen_core::FsSink;
//! use imlgen_core::JoinResolver;
//! use imlgen_core::Module;
//! use imlgen_core::WorkspacePipeline;
//!
//! # async fn run() {
//! let mut module = Module::new("app", "app");
//! module.source_folders.push("src".into());
//!
//! let pipeline = WorkspacePipeline::new(JoinResolver::new("."), FsSink);
//! let report = pipeline.create_workspace(Vec::new(), vec![module]).await;
//! if !report.is_ok() {
//! 	eprintln!("{} module(s) failed", report.errors.len());
//! }
//! # }
//! ```

pub use assembler::*;
pub use check::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use reflow::reflow;
pub use sink::*;
pub use workspace::*;

mod assembler;
mod check;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod formatter;
mod model;
pub mod reflow;
mod sink;
mod workspace;
