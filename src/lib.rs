//! figma-mcp: MCP server exposing Figma files to AI assistants
//!
//! This library lets an AI assistant pull Figma designs into its context and
//! take part in design review, over the Model Context Protocol.
//!
//! # Tools
//!
//! - **`add_figma_file`**: File metadata, thumbnail, document tree and page thumbnails
//! - **`view_node`**: A rendered PNG of one node
//! - **`read_comments`**, **`post_comment`**, **`reply_to_comment`**: Comment threads
//!
//! The list of files previously added on this machine is exposed read-only as
//! the `file://figma-mcp-files` resource.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`figma`]: Figma REST API client and document model
//! - [`mcp`]: MCP protocol implementation

pub mod config;
pub mod error;
pub mod figma;
pub mod mcp;
