//! MCP resources.
//!
//! The only resource is the list of Figma files previously added on this
//! machine, stored as JSON (by default `~/.figma-mcp/files.json`). It is read
//! on every request and never written by this server.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::ResourceError;

/// URI of the cached files listing.
pub const FILES_CACHE_URI: &str = "file://figma-mcp-files";

const JSON_MIME_TYPE: &str = "application/json";

/// A resource definition for resources/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource URI.
    pub uri: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// One item of a resources/read response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// Resource URI.
    pub uri: String,
    /// MIME type of `text`.
    pub mime_type: String,
    /// File contents.
    pub text: String,
}

/// The cached files listing.
#[derive(Debug, Clone)]
pub struct FilesCache {
    path: Option<PathBuf>,
}

impl FilesCache {
    /// Creates a listing backed by `path`.
    ///
    /// `None` (no home directory) behaves like a missing file.
    #[must_use]
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Returns the resources advertised in resources/list.
    #[must_use]
    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![ResourceDefinition {
            uri: FILES_CACHE_URI.to_string(),
            name: "Locally cached Figma files".to_string(),
            description: Some(
                "A cache of Figma files you've already added to this machine.".to_string(),
            ),
            mime_type: Some(JSON_MIME_TYPE.to_string()),
        }]
    }

    /// Reads a resource.
    ///
    /// A missing cache file yields no contents rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] for unknown URIs and
    /// [`ResourceError::ReadError`] if the file exists but cannot be read.
    pub fn read(&self, uri: &str) -> Result<Vec<ResourceContents>, ResourceError> {
        if uri != FILES_CACHE_URI {
            return Err(ResourceError::NotFound {
                uri: uri.to_string(),
            });
        }

        let Some(path) = self.path.as_ref().filter(|p| p.exists()) else {
            tracing::debug!("No cached files list");
            return Ok(Vec::new());
        };

        let text = std::fs::read_to_string(path).map_err(|e| ResourceError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        Ok(vec![ResourceContents {
            uri: uri.to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text,
        }])
    }
}
