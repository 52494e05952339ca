//! `semgraph.toml` project configuration.
//!
//! Every field is optional. Relative paths are resolved against the directory
//! holding the file, so a config can be used from any working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "semgraph.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Dot,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name, used in logs and diagnostics.
    pub name: Option<String>,
    /// Individual source files, analyzed in this order.
    pub inputs: Vec<PathBuf>,
    /// Folders scanned recursively for `.rs` files.
    pub folders: Vec<PathBuf>,
    /// Cargo manifest whose workspace members are analyzed.
    pub workspace: Option<PathBuf>,
    /// External reference metadata files.
    pub references: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    /// Walk units in parallel. Defaults to true.
    pub parallel: Option<bool>,
    /// Worker threads; defaults to half the logical CPUs.
    pub jobs: Option<usize>,
}

impl ProjectConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new("."));
        Ok(config.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.inputs.iter_mut().for_each(resolve);
        self.folders.iter_mut().for_each(resolve);
        self.references.iter_mut().for_each(resolve);
        if let Some(workspace) = self.workspace.as_mut() {
            resolve(workspace);
        }
        self
    }

    /// Layer `overrides` on top of `self`: scalars replace, lists append.
    pub fn merge(mut self, overrides: ProjectConfig) -> Self {
        self.inputs.extend(overrides.inputs);
        self.folders.extend(overrides.folders);
        self.references.extend(overrides.references);
        self.name = overrides.name.or(self.name);
        self.workspace = overrides.workspace.or(self.workspace);
        self.format = overrides.format.or(self.format);
        self.parallel = overrides.parallel.or(self.parallel);
        self.jobs = overrides.jobs.or(self.jobs);
        self
    }

    pub fn has_sources(&self) -> bool {
        !self.inputs.is_empty() || !self.folders.is_empty() || self.workspace.is_some()
    }

    pub fn project_name(&self) -> &str {
        self.name.as_deref().unwrap_or("project")
    }
}
