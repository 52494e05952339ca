// External reference metadata: routines that exist outside the project.
//
// A reference is a small TOML document:
//
//     name = "std-io"
//
//     [[routine]]
//     path = "Console::write_line"
//     params = ["&str"]
//
//     [[routine]]
//     path = "Console::open"
//     returns = "Console"

use std::fs;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::domain::project::{ExternalReference, ReferenceSource};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    name: Option<String>,
    #[serde(default, rename = "routine")]
    routines: Vec<ManifestRoutine>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestRoutine {
    path: String,
    #[serde(default)]
    params: Vec<String>,
    returns: Option<String>,
}

/// One externally declared routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoutine {
    pub path: Vec<String>,
    pub params: Vec<String>,
    /// Return type path, if the routine returns something method calls can chain on.
    pub returns: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Library {
    name: String,
    routines: Vec<LibraryRoutine>,
}

impl Library {
    pub fn load(reference: &ExternalReference) -> Result<Self> {
        let text = match &reference.source {
            ReferenceSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read reference {}", path.display()))?,
            ReferenceSource::Inline(text) => text.clone(),
        };
        Self::parse(&reference.name, &text)
    }

    /// Parse metadata text; `default_name` is used when the document has no `name`.
    pub fn parse(default_name: &str, text: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(text).context("Invalid reference metadata")?;

        let routines = manifest
            .routines
            .into_iter()
            .map(|entry| {
                let returns = match entry.returns.as_deref().map(str::trim) {
                    None | Some("") | Some("()") => None,
                    Some(ty) => Some(split_path(ty)?),
                };
                Ok(LibraryRoutine {
                    path: split_path(&entry.path)?,
                    params: entry.params,
                    returns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: manifest.name.unwrap_or_else(|| default_name.to_string()),
            routines,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routines(&self) -> &[LibraryRoutine] {
        &self.routines
    }
}

fn split_path(text: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = text.split("::").map(|s| s.trim().to_string()).collect();
    if segments.iter().any(|s| s.is_empty()) {
        bail!("Invalid routine path `{}`", text);
    }
    Ok(segments)
}
