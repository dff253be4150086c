//! Model Context Protocol (MCP) server implementation.
//!
//! This module implements the MCP specification for exposing Figma files,
//! thumbnails and comments as tools and resources to AI assistants. The
//! server communicates over stdio transport using JSON-RPC 2.0 messages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────────────┐ │
//! │  │  Transport  │──▶│   Server    │──▶│ Tools ─▶ Handlers   │ │
//! │  │   (stdio)   │   │ (lifecycle) │   │ Resources           │ │
//! │  └─────────────┘   └─────────────┘   └──────────┬──────────┘ │
//! │                                                 ▼            │
//! │                                      ┌─────────────────────┐ │
//! │                                      │     FigmaApi        │ │
//! │                                      └─────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod handlers;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use handlers::{ToolCallResult, ToolContent};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use resources::{FilesCache, FILES_CACHE_URI};
pub use server::McpServer;
pub use tools::{ToolCall, ToolKind};
pub use transport::StdioTransport;
