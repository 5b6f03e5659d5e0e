use std::path::{Path, PathBuf};

use models::ComponentType;
use thiserror::Error;

use crate::{document::CatalogDocument, resolver::Catalog};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading catalog `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing catalog `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads catalog documents from a directory holding one `<type>.json` per
/// component type. Documents are re-read on every call.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    directory: PathBuf,
}

impl CatalogLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, component: ComponentType) -> PathBuf {
        self.directory.join(component.catalog_file_name())
    }

    /// Loads and normalizes the catalog of `component`. A missing or broken
    /// document yields an empty catalog so that manual entry keeps working.
    pub fn load(&self, component: ComponentType) -> Catalog {
        match self.try_load(component) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("catalog for {component} unavailable, using an empty catalog: {e}");
                Catalog::empty(component)
            }
        }
    }

    pub fn try_load(&self, component: ComponentType) -> Result<Catalog, CatalogError> {
        let path = self.path_for(component);

        let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;

        let document = CatalogDocument::parse(component, &raw)
            .map_err(|source| CatalogError::Parse { path, source })?;

        let entries = document.normalize();
        tracing::debug!("loaded {} {component} catalog entries", entries.len());

        Ok(Catalog::new(component, entries))
    }
}
