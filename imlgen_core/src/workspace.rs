use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::CoreDescriptor;
use crate::Descriptor;
use crate::FileSink;
use crate::ImlError;
use crate::ImlResult;
use crate::Module;
use crate::PathResolver;
use crate::assembler::render_module;

/// Merge module and core descriptors into one sequence. Each input keeps its
/// own order; modules come first.
pub fn descriptor_stream(cores: Vec<CoreDescriptor>, modules: Vec<Module>) -> Vec<Descriptor> {
	modules
		.into_iter()
		.map(Descriptor::Module)
		.chain(cores.into_iter().map(Descriptor::Core))
		.collect()
}

/// Outcome of a workspace run.
#[derive(Debug, Default)]
pub struct WorkspaceReport {
	/// Files handed to the sink successfully, sorted by path.
	pub written: Vec<PathBuf>,
	/// One entry per module that failed validation or could not be written.
	/// These are collected rather than aborting so that every module gets a
	/// chance to be written.
	pub errors: Vec<ImlError>,
	/// Module descriptors seen by the module file consumer.
	pub modules_seen: usize,
	/// Core descriptors seen by the module file consumer.
	pub cores_seen: usize,
	/// Descriptors observed by the project file consumer.
	pub project_descriptors: usize,
	/// Descriptors observed by the library file consumer.
	pub library_descriptors: usize,
}

impl WorkspaceReport {
	/// Returns true if every module was written.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}
}

#[derive(Debug, Default)]
struct ModuleFilesOutcome {
	written: Vec<PathBuf>,
	errors: Vec<ImlError>,
	modules_seen: usize,
	cores_seen: usize,
}

/// Fans descriptors out to the module, project and library file consumers.
///
/// Every consumer holds its own subscription to the merged stream and sees
/// each descriptor exactly once. Only the module file consumer writes
/// anything: one independent task per module renders the `.iml` document and
/// passes it to the sink. The project and library consumers are observation
/// points without output of their own.
#[derive(Debug)]
pub struct WorkspacePipeline<R, S> {
	resolver: Arc<R>,
	sink: Arc<S>,
}

impl<R, S> Clone for WorkspacePipeline<R, S> {
	fn clone(&self) -> Self {
		Self {
			resolver: Arc::clone(&self.resolver),
			sink: Arc::clone(&self.sink),
		}
	}
}

impl<R: PathResolver, S: FileSink> WorkspacePipeline<R, S> {
	pub fn new(resolver: R, sink: S) -> Self {
		Self::from_shared(Arc::new(resolver), Arc::new(sink))
	}

	pub fn from_shared(resolver: Arc<R>, sink: Arc<S>) -> Self {
		Self { resolver, sink }
	}

	pub fn resolver(&self) -> &R {
		&self.resolver
	}

	pub fn sink(&self) -> &S {
		&self.sink
	}

	/// Run every descriptor through the consumers and wait for all module
	/// writes to finish.
	pub async fn create_workspace(
		&self,
		cores: Vec<CoreDescriptor>,
		modules: Vec<Module>,
	) -> WorkspaceReport {
		let descriptors = descriptor_stream(cores, modules);
		tracing::debug!(count = descriptors.len(), "publishing workspace descriptors");

		// The channel holds the whole stream so no subscriber can lag.
		let (tx, _) = broadcast::channel::<Arc<Descriptor>>(descriptors.len().max(1));
		let module_rx = tx.subscribe();
		let project_rx = tx.subscribe();
		let library_rx = tx.subscribe();

		let publish = async move {
			for descriptor in descriptors {
				if tx.send(Arc::new(descriptor)).is_err() {
					break;
				}
			}
		};

		let ((), module_files, project_descriptors, library_descriptors) = tokio::join!(
			publish,
			produce_module_files(
				module_rx,
				Arc::clone(&self.resolver),
				Arc::clone(&self.sink)
			),
			observe(project_rx, "project", |_| true),
			observe(library_rx, "library", Descriptor::is_core),
		);

		WorkspaceReport {
			written: module_files.written,
			errors: module_files.errors,
			modules_seen: module_files.modules_seen,
			cores_seen: module_files.cores_seen,
			project_descriptors,
			library_descriptors,
		}
	}
}

/// Run the workspace pipeline once with the given resolver and sink.
pub async fn create_workspace<R: PathResolver, S: FileSink>(
	cores: Vec<CoreDescriptor>,
	modules: Vec<Module>,
	resolver: R,
	sink: S,
) -> WorkspaceReport {
	WorkspacePipeline::new(resolver, sink)
		.create_workspace(cores, modules)
		.await
}

async fn produce_module_files<R: PathResolver, S: FileSink>(
	mut rx: broadcast::Receiver<Arc<Descriptor>>,
	resolver: Arc<R>,
	sink: Arc<S>,
) -> ModuleFilesOutcome {
	let mut outcome = ModuleFilesOutcome::default();
	let mut tasks = JoinSet::new();

	loop {
		match rx.recv().await {
			Ok(descriptor) => {
				match descriptor.as_ref() {
					Descriptor::Module(module) => {
						outcome.modules_seen += 1;
						let module = module.clone();
						let resolver = Arc::clone(&resolver);
						let sink = Arc::clone(&sink);
						let task = async move {
							write_module(&module, resolver.as_ref(), sink.as_ref())
								.await
								.inspect_err(|e| {
									tracing::warn!(module = %module.module_name, error = %e, "module file not written");
								})
						};
						tasks.spawn(task.in_current_span());
					}
					Descriptor::Core(_) => outcome.cores_seen += 1,
				}
			}
			Err(RecvError::Lagged(skipped)) => {
				tracing::warn!(skipped, "module file consumer lagged behind");
			}
			Err(RecvError::Closed) => break,
		}
	}

	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok(Ok(path)) => outcome.written.push(path),
			Ok(Err(e)) => outcome.errors.push(e),
			Err(e) => outcome.errors.push(ImlError::Task(e.to_string())),
		}
	}

	outcome.written.sort();
	outcome
}

async fn write_module<R: PathResolver, S: FileSink>(
	module: &Module,
	resolver: &R,
	sink: &S,
) -> ImlResult<PathBuf> {
	let file = render_module(module, resolver)?;
	sink.write(&file.name, &file.content).await?;
	tracing::info!(path = %file.name.display(), "wrote module file");

	Ok(file.name)
}

/// Count the descriptors a consumer accepts. Nothing is produced from them.
async fn observe(
	mut rx: broadcast::Receiver<Arc<Descriptor>>,
	consumer: &'static str,
	accepts: fn(&Descriptor) -> bool,
) -> usize {
	let mut observed = 0;

	loop {
		match rx.recv().await {
			Ok(descriptor) if accepts(descriptor.as_ref()) => {
				observed += 1;
				tracing::debug!(consumer, descriptor = descriptor.name(), "observed descriptor");
			}
			Ok(_) => {}
			Err(RecvError::Lagged(skipped)) => {
				tracing::warn!(consumer, skipped, "consumer lagged behind");
			}
			Err(RecvError::Closed) => break,
		}
	}

	observed
}
