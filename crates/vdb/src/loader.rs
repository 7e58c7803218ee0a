//! Grid loading: fetch a resource, decode it, and report the lifecycle.
//!
//! # Example
//!
//! ```no_run
//! use vdb_rs::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut loader = VdbLoader::new().with_path("assets/");
//!     let loaded = loader.load("smoke.vdb")?;
//!     println!("{} ({})", loaded.descriptor.grid_id, loaded.descriptor.grid_type);
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::Path;

use vdb_core::{parse_with, GridDescriptor, LogObserver, ParseObserver, ParseOptions};

use crate::error::{LoadError, Result};
use crate::manager::LoadingManager;

/// Supplies the raw bytes of a resource.
pub trait ResourceFetcher {
    fn fetch(&self, url: &str) -> io::Result<Vec<u8>>;
}

/// Reads resources from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFetcher;

impl ResourceFetcher for FsFetcher {
    fn fetch(&self, url: &str) -> io::Result<Vec<u8>> {
        std::fs::read(Path::new(url))
    }
}

/// Returns the base of `url`: everything up to and including the last `/`,
/// or `./` if there is none.
pub fn extract_url_base(url: &str) -> String {
    match url.rfind('/') {
        Some(index) => url[..=index].to_string(),
        None => "./".to_string(),
    }
}

/// A successfully loaded grid.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    /// The url as requested, before the loader path was applied.
    pub url: String,
    /// Base for resolving resources referenced by the grid.
    pub resource_path: String,
    pub descriptor: GridDescriptor,
}

/// Loads grid descriptors through a [`ResourceFetcher`].
pub struct VdbLoader {
    path: String,
    resource_path: String,
    options: ParseOptions,
    fetcher: Box<dyn ResourceFetcher>,
    observer: Box<dyn ParseObserver>,
    manager: LoadingManager,
}

impl Default for VdbLoader {
    fn default() -> Self {
        Self {
            path: String::new(),
            resource_path: String::new(),
            options: ParseOptions::default(),
            fetcher: Box::new(FsFetcher),
            observer: Box::new(LogObserver),
            manager: LoadingManager::default(),
        }
    }
}

impl VdbLoader {
    /// Creates a loader reading from the filesystem with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix prepended to every requested url.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_resource_path(mut self, resource_path: impl Into<String>) -> Self {
        self.resource_path = resource_path.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl ResourceFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Receives trace events from every decode. Defaults to [`LogObserver`].
    #[must_use]
    pub fn with_observer(mut self, observer: impl ParseObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    #[must_use]
    pub fn with_manager(mut self, manager: LoadingManager) -> Self {
        self.manager = manager;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn manager(&self) -> &LoadingManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut LoadingManager {
        &mut self.manager
    }

    /// Resolves the resource path: the explicit resource path, else the
    /// loader path, else the base of `url`.
    pub fn resolve_resource_path(&self, url: &str) -> String {
        if !self.resource_path.is_empty() {
            self.resource_path.clone()
        } else if !self.path.is_empty() {
            self.path.clone()
        } else {
            extract_url_base(url)
        }
    }

    /// Decodes an in-memory buffer with this loader's options and observer.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<GridDescriptor> {
        Ok(parse_with(bytes, &self.options, self.observer.as_mut())?)
    }

    /// Fetches and decodes `url`.
    ///
    /// The manager sees `item_start` before the fetch and exactly one
    /// `item_end` afterwards, preceded by `item_error` on failure.
    pub fn load(&mut self, url: &str) -> Result<LoadedGrid> {
        self.manager.item_start(url);

        let result = self.fetch_and_parse(url);
        match &result {
            Ok(loaded) => log::info!(
                "loaded grid '{}' from {url} ({} metadata entries)",
                loaded.descriptor.grid_id,
                loaded.descriptor.metadata.len()
            ),
            Err(e) => {
                log::error!("{e}");
                self.manager.item_error(url);
            }
        }

        self.manager.item_end(url);
        result
    }

    fn fetch_and_parse(&mut self, url: &str) -> Result<LoadedGrid> {
        let full_url = format!("{}{url}", self.path);
        let bytes = self
            .fetcher
            .fetch(&full_url)
            .map_err(|source| LoadError::Io {
                url: full_url.clone(),
                source,
            })?;
        log::debug!("fetched {} bytes from {full_url}", bytes.len());

        let descriptor = self.parse(&bytes)?;
        Ok(LoadedGrid {
            url: url.to_string(),
            resource_path: self.resolve_resource_path(url),
            descriptor,
        })
    }
}

impl std::fmt::Debug for VdbLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VdbLoader")
            .field("path", &self.path)
            .field("resource_path", &self.resource_path)
            .field("options", &self.options)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}
