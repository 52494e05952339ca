//! Project model: ordered source units plus the external references needed to
//! resolve calls that leave the project.

use std::path::PathBuf;

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use tracing::debug;

use crate::domain::error::AnalysisError;
use crate::ports::FrontEnd;

/// Raw input for one unit: identifier (usually a path), its text and the
/// namespace its declarations live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSource {
    pub id: String,
    pub text: String,
    /// Enclosing namespace segments; empty for the project root.
    pub namespace: Vec<String>,
}

impl ProjectSource {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            namespace: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: Vec<String>) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Where an external reference's metadata comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    File(PathBuf),
    Inline(String),
}

/// External symbol metadata for routines with no project source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    pub name: String,
    pub source: ReferenceSource,
}

impl ExternalReference {
    /// Reference read from a file; named after the file stem.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: ReferenceSource::File(path),
        }
    }

    pub fn inline(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ReferenceSource::Inline(text.into()),
        }
    }
}

/// A parsed unit. Never mutated after load.
#[derive(Debug)]
pub struct SourceUnit<T> {
    id: String,
    tree: T,
}

impl<T> SourceUnit<T> {
    pub fn new(id: impl Into<String>, tree: T) -> Self {
        Self { id: id.into(), tree }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }
}

/// Immutable project: units in order, loaded libraries and a lazily built,
/// shared binding context.
pub struct Project<'f, F: FrontEnd> {
    name: String,
    front_end: &'f F,
    units: Vec<SourceUnit<F::Tree>>,
    libraries: Vec<F::Library>,
    bindings: OnceCell<F::Bindings>,
}

impl<'f, F: FrontEnd> Project<'f, F> {
    /// Parse every source and load every reference.
    ///
    /// Units are parsed in parallel but the first failure in unit order is
    /// the one reported, so the error does not depend on scheduling.
    pub fn load(
        front_end: &'f F,
        name: impl Into<String>,
        sources: &[ProjectSource],
        references: &[ExternalReference],
    ) -> Result<Self, AnalysisError> {
        let name = name.into();

        let parsed: Vec<Result<SourceUnit<F::Tree>, AnalysisError>> = sources
            .par_iter()
            .map(|source| {
                front_end
                    .parse(source)
                    .map(|tree| SourceUnit::new(source.id.clone(), tree))
                    .map_err(|err| AnalysisError::parse(&source.id, err))
            })
            .collect();
        let units = parsed.into_iter().collect::<Result<Vec<_>, _>>()?;

        let libraries = references
            .iter()
            .map(|reference| {
                front_end
                    .load_library(reference)
                    .map_err(|err| AnalysisError::missing_reference(&reference.name, err))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            project = %name,
            units = units.len(),
            references = libraries.len(),
            "project loaded"
        );

        Ok(Self {
            name,
            front_end,
            units,
            libraries,
            bindings: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn front_end(&self) -> &'f F {
        self.front_end
    }

    pub fn units(&self) -> &[SourceUnit<F::Tree>] {
        &self.units
    }

    pub fn libraries(&self) -> &[F::Library] {
        &self.libraries
    }

    /// Shared binding context, built on first access.
    pub fn bindings(&self) -> &F::Bindings {
        self.bindings
            .get_or_init(|| self.front_end.bind(&self.units, &self.libraries))
    }
}
