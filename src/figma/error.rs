//! Error types for Figma REST API operations.
//!
//! # Security Note
//!
//! None of these variants carry the API token. Upstream bodies are included
//! verbatim because Figma never echoes the `X-FIGMA-TOKEN` header back.

use thiserror::Error;

/// Result type for Figma operations.
pub type FigmaResult<T> = Result<T, FigmaError>;

/// Errors that can occur while talking to the Figma REST API.
#[derive(Debug, Error)]
pub enum FigmaError {
    /// No API token was configured.
    #[error("FIGMA_API_KEY is not set")]
    MissingApiKey,

    /// The URL does not look like a Figma file link.
    #[error("Could not parse Figma key from URL: {url}")]
    InvalidUrl {
        /// The URL that failed to match.
        url: String,
    },

    /// The HTTP request could not be completed.
    #[error("Request to {endpoint} failed")]
    Transport {
        /// Endpoint description (never includes credentials).
        endpoint: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// Figma answered with a non-success HTTP status.
    #[error("Figma API returned HTTP {status} for {endpoint}: {body}")]
    HttpStatus {
        /// Endpoint description.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// Figma reported an error in the response payload.
    #[error("Error getting thumbnails: {message}")]
    Api {
        /// The `err` field of the response.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse {
        /// Endpoint description.
        endpoint: String,
        /// What went wrong while decoding.
        message: String,
    },

    /// No thumbnail was rendered for the requested node.
    #[error("No thumbnail available for node {node_id}")]
    MissingThumbnail {
        /// The node that has no image.
        node_id: String,
    },
}

impl FigmaError {
    /// Creates a transport error.
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by the caller's input rather than upstream.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. })
    }
}
