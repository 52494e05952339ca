use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use cargo_metadata::MetadataCommand;
use tracing::{debug, warn};

use crate::domain::project::{ExternalReference, ProjectSource};
use crate::infrastructure::config::ProjectConfig;

/// Module path of a file below a `src/` directory.
///
/// `src/net.rs` is `net` and `src/a/mod.rs` is `a`. `src/lib.rs`,
/// `src/main.rs` and binaries under `src/bin/` are crate roots. Files outside
/// any `src/` directory share the root.
pub fn module_path(path: &Path) -> Vec<String> {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let Some(src) = parts.iter().rposition(|p| p == "src") else {
        return Vec::new();
    };

    let mut rest = parts.get(src + 1..).unwrap_or_default().to_vec();
    if rest.first().is_some_and(|p| p.as_str() == "bin") {
        // src/bin/tool.rs or src/bin/tool/main.rs
        rest.remove(0);
        if rest.len() <= 1 {
            return Vec::new();
        }
        rest.remove(0);
    }

    if let Some(file) = rest.pop() {
        let stem = file.strip_suffix(".rs").unwrap_or(&file);
        let crate_root = rest.is_empty() && (stem == "lib" || stem == "main");
        if stem != "mod" && !crate_root {
            rest.push(stem.to_string());
        }
    }
    rest
}

pub struct ProjectLoader;

impl ProjectLoader {
    /// Gather every source named by `config`: inputs first, then folders, then
    /// the workspace. Within a folder files are in sorted path order. A file
    /// reached twice is kept at its first position.
    pub fn collect(config: &ProjectConfig) -> Result<Vec<ProjectSource>> {
        let mut paths: Vec<PathBuf> = config.inputs.clone();
        for folder in &config.folders {
            paths.extend(Self::rs_files_under(folder)?);
        }
        if let Some(manifest) = &config.workspace {
            paths.extend(Self::workspace_files(manifest)?);
        }

        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        for path in paths {
            let id = path.display().to_string();
            if !seen.insert(id.clone()) {
                debug!(file = %id, "skipping duplicate source");
                continue;
            }
            let text =
                fs::read_to_string(&path).with_context(|| format!("Failed to read file {}", path.display()))?;
            sources.push(ProjectSource::new(id, text).with_namespace(module_path(&path)));
        }

        debug!(files = sources.len(), "sources collected");
        Ok(sources)
    }

    pub fn references(config: &ProjectConfig) -> Vec<ExternalReference> {
        config.references.iter().map(ExternalReference::from_file).collect()
    }

    /// All `.rs` files of the lib/bin/proc-macro targets of a Cargo workspace.
    pub fn workspace_files(manifest_path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = MetadataCommand::new()
            .manifest_path(manifest_path)
            .no_deps()
            .exec()
            .context("Failed to execute cargo metadata")?;

        let mut files = Vec::new();
        for package_id in &metadata.workspace_members {
            let Some(package) = metadata.packages.iter().find(|p| &p.id == package_id) else {
                continue;
            };
            for target in &package.targets {
                if !target.kind.iter().any(|k| k == "lib" || k == "bin" || k == "proc-macro") {
                    continue;
                }
                let src_path = target.src_path.as_std_path();
                let src_dir = src_path.parent().unwrap_or(src_path);
                let found = Self::rs_files_under(src_dir)?;
                debug!(package = %package.name, target = %target.name, files = found.len(), "workspace target");
                files.extend(found);
            }
        }

        // targets sharing a src/ directory
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// `.rs` files below `root` in sorted order, skipping `target/` and `.git/`.
    pub fn rs_files_under(root: &Path) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        if !root.exists() {
            warn!(path = %root.display(), "source folder does not exist");
            return Ok(out);
        }
        Self::collect_rs_recursive(root, &mut out)?;
        out.sort();
        Ok(out)
    }

    fn collect_rs_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        if dir.ends_with("target") || dir.ends_with(".git") {
            return Ok(());
        }

        if dir.is_file() {
            if dir.extension().is_some_and(|ext| ext == "rs") {
                out.push(dir.to_path_buf());
            }
            return Ok(());
        }

        let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                Self::collect_rs_recursive(&path, out)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                out.push(path);
            }
        }
        Ok(())
    }
}
