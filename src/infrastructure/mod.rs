// Infrastructure implementations for semgraph.

pub mod concurrency;
pub mod config;
pub mod dot_exporter;
pub mod json_exporter;
pub mod project_loader;
pub mod syn_frontend;

pub use concurrency::init_thread_pool;
pub use config::{OutputFormat, ProjectConfig, CONFIG_FILENAME};
pub use dot_exporter::DotExporter;
pub use json_exporter::JsonExporter;
pub use project_loader::ProjectLoader;
pub use syn_frontend::SynFrontEnd;

use crate::ports::OutputExporter;

/// Exporter for a configured output format.
pub fn exporter_for(format: OutputFormat) -> Box<dyn OutputExporter> {
    match format {
        OutputFormat::Dot => Box::new(DotExporter),
        OutputFormat::Json => Box::new(JsonExporter),
    }
}
