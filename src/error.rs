//! Error types for figma-mcp.
//!
//! # Security Note
//!
//! Error messages are carefully crafted to NEVER include the Figma API token.

use std::path::PathBuf;

use thiserror::Error;

use crate::figma::FigmaError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while dispatching a `tools/call` request.
#[derive(Error, Debug)]
pub enum ToolError {
    /// No tool with this name is registered.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The name the client asked for.
        name: String,
    },

    /// The arguments do not match the tool's input schema.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// Tool name.
        tool: &'static str,
        /// What is missing or mistyped.
        message: String,
    },

    /// The Figma API call behind the tool failed.
    #[error(transparent)]
    Figma(#[from] FigmaError),

    /// A tool result could not be encoded as JSON.
    #[error("failed to encode tool result")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while reading an MCP resource.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// No resource has this URI.
    #[error("Resource not found: {uri}")]
    NotFound {
        /// The URI the client asked for.
        uri: String,
    },

    /// The backing file exists but could not be read.
    #[error("failed to read resource file: {path}")]
    ReadError {
        /// Path of the backing file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn unknown_tool_display() {
        let error = ToolError::UnknownTool {
            name: "delete_file".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown tool: delete_file");
    }

    #[test]
    fn resource_not_found_display() {
        let error = ResourceError::NotFound {
            uri: "file:///weather".to_string(),
        };
        assert_eq!(error.to_string(), "Resource not found: file:///weather");
    }

    #[test]
    fn figma_error_is_transparent() {
        let error = ToolError::from(FigmaError::MissingApiKey);
        assert_eq!(error.to_string(), "FIGMA_API_KEY is not set");
    }
}
