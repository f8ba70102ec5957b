use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, error};
use serde::Deserialize;
use crate::constants::DOMAIN;
use crate::error::{GlueError, Result};

const DEFAULT_SUBFOLDER: &str = "src";
const DEFAULT_MANIFEST: &str = "manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryOrigin {
    Vendored,
    System,
}

/// A located charger client library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLibrary {
    pub name: String,
    pub origin: LibraryOrigin,
    pub path: PathBuf,
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: Option<String>,
}

/// Finds a library, preferring a copy vendored next to the integration
/// (`<base>/<name>/src/<name>/manifest.json`) over the system search path.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    base_path: PathBuf,
    subfolder: String,
    manifest: String,
    search_path: Vec<PathBuf>,
}

impl ModuleResolver {
    pub fn new(base_path: impl Into<PathBuf>, system_paths: Vec<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            subfolder: DEFAULT_SUBFOLDER.to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
            search_path: system_paths,
        }
    }

    pub fn with_layout(mut self, subfolder: &str, manifest: &str) -> Self {
        self.subfolder = subfolder.to_string();
        self.manifest = manifest.to_string();
        self
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn resolve(&mut self, name: &str) -> Result<ResolvedLibrary> {
        debug!("{} - resolve_module: {}", DOMAIN, name);
        let library = self.locate(name).map_err(|err| {
            error!("{} - resolve_module: failed to import {}: {}", DOMAIN, name, err);
            match err {
                GlueError::Import { .. } => err,
                other => GlueError::Import {
                    module: name.to_string(),
                    source: Box::new(other),
                },
            }
        })?;
        debug!(
            "{} - resolve_module: imported module from: {} ({})",
            DOMAIN,
            library.path.display(),
            library.version.as_deref().unwrap_or("unknown"),
        );
        Ok(library)
    }

    fn locate(&mut self, name: &str) -> Result<ResolvedLibrary> {
        let vendored = self.base_path.join(name).join(&self.subfolder);
        if vendored.join(name).join(&self.manifest).exists() {
            debug!(
                "{} - resolve_module: import local module: {} ({})",
                DOMAIN,
                name,
                vendored.display()
            );
            if !self.search_path.contains(&vendored) {
                self.search_path.insert(0, vendored.clone());
            }
        } else {
            debug!("{} - resolve_module: import system wide module: {}", DOMAIN, name);
        }

        let root = self
            .search_path
            .iter()
            .find(|dir| dir.join(name).join(&self.manifest).is_file())
            .cloned()
            .ok_or_else(|| GlueError::ModuleNotFound {
                module: name.to_string(),
                vendored: vendored.clone(),
            })?;

        let path = root.join(name);
        let manifest = load_manifest(name, &path.join(&self.manifest))?;
        Ok(ResolvedLibrary {
            name: name.to_string(),
            origin: if root == vendored { LibraryOrigin::Vendored } else { LibraryOrigin::System },
            path,
            version: manifest.version,
        })
    }
}

fn load_manifest(name: &str, path: &Path) -> Result<Manifest> {
    let wrap = |source: Box<dyn std::error::Error + Send + Sync>| GlueError::Import {
        module: name.to_string(),
        source,
    };
    let data = fs::read_to_string(path).map_err(|err| wrap(Box::new(err)))?;
    serde_json::from_str(&data).map_err(|err| wrap(Box::new(err)))
}
