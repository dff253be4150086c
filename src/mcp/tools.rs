//! Tool registry.
//!
//! The set of tools is closed: [`ToolKind`] enumerates them in the order they
//! are advertised, each with a static JSON Schema. Incoming arguments are
//! parsed into one typed struct per tool before any handler runs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ToolError;

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// The tools this server provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Load a Figma file, its thumbnail and page thumbnails into context.
    AddFigmaFile,
    /// Render a single node.
    ViewNode,
    /// List comments on a file.
    ReadComments,
    /// Post a new comment.
    PostComment,
    /// Reply to a comment.
    ReplyToComment,
}

impl ToolKind {
    /// All tools, in advertised order.
    pub const ALL: [Self; 5] = [
        Self::AddFigmaFile,
        Self::ViewNode,
        Self::ReadComments,
        Self::PostComment,
        Self::ReplyToComment,
    ];

    /// Returns the wire name of this tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddFigmaFile => "add_figma_file",
            Self::ViewNode => "view_node",
            Self::ReadComments => "read_comments",
            Self::PostComment => "post_comment",
            Self::ReplyToComment => "reply_to_comment",
        }
    }

    /// Looks up a tool by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns the descriptor advertised in tools/list.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        let (description, input_schema) = match self {
            Self::AddFigmaFile => (
                "Add a Figma file to your context. Returns the file name and version, \
                 a thumbnail of the file, the JSON document tree, and a thumbnail of \
                 every page (canvas) in the file.",
                json!({
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "The URL of the Figma file to add"
                        }
                    },
                    "required": ["url"]
                }),
            ),
            Self::ViewNode => (
                "Render a single node of a Figma file as a PNG image. Use node ids \
                 from the document tree returned by add_figma_file.",
                json!({
                    "type": "object",
                    "properties": {
                        "file_key": {
                            "type": "string",
                            "description": "The key of the Figma file"
                        },
                        "node_id": {
                            "type": "string",
                            "description": "The id of the node to render (e.g. '1:2')"
                        }
                    },
                    "required": ["file_key", "node_id"]
                }),
            ),
            Self::ReadComments => (
                "Read all comments on a Figma file.",
                json!({
                    "type": "object",
                    "properties": {
                        "file_key": {
                            "type": "string",
                            "description": "The key of the Figma file"
                        }
                    },
                    "required": ["file_key"]
                }),
            ),
            Self::PostComment => (
                "Post a comment on a Figma file, pinned at a position. When node_id is \
                 given, x and y are relative to that node; otherwise they are canvas \
                 coordinates.",
                json!({
                    "type": "object",
                    "properties": {
                        "file_key": {
                            "type": "string",
                            "description": "The key of the Figma file"
                        },
                        "message": {
                            "type": "string",
                            "description": "The comment text"
                        },
                        "x": {
                            "type": "number",
                            "description": "Horizontal pin position"
                        },
                        "y": {
                            "type": "number",
                            "description": "Vertical pin position"
                        },
                        "node_id": {
                            "type": "string",
                            "description": "Optional: node to attach the comment to"
                        }
                    },
                    "required": ["file_key", "message", "x", "y"]
                }),
            ),
            Self::ReplyToComment => (
                "Reply to an existing comment on a Figma file.",
                json!({
                    "type": "object",
                    "properties": {
                        "file_key": {
                            "type": "string",
                            "description": "The key of the Figma file"
                        },
                        "comment_id": {
                            "type": "string",
                            "description": "The id of the comment to reply to"
                        },
                        "message": {
                            "type": "string",
                            "description": "The reply text"
                        }
                    },
                    "required": ["file_key", "comment_id", "message"]
                }),
            ),
        };

        ToolDefinition {
            name: self.name().to_string(),
            description: Some(description.to_string()),
            input_schema,
        }
    }

    /// Parses raw `tools/call` arguments into this tool's typed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] if a required field is missing,
    /// empty or has the wrong type.
    pub fn parse_arguments(self, arguments: &Value) -> Result<ToolCall, ToolError> {
        match self {
            Self::AddFigmaFile => {
                let args: AddFigmaFileArgs = parse_args(self, arguments)?;
                require_text(self, "url", &args.url)?;
                Ok(ToolCall::AddFigmaFile(args))
            }
            Self::ViewNode => {
                let args: ViewNodeArgs = parse_args(self, arguments)?;
                require_text(self, "file_key", &args.file_key)?;
                require_text(self, "node_id", &args.node_id)?;
                Ok(ToolCall::ViewNode(args))
            }
            Self::ReadComments => {
                let args: ReadCommentsArgs = parse_args(self, arguments)?;
                require_text(self, "file_key", &args.file_key)?;
                Ok(ToolCall::ReadComments(args))
            }
            Self::PostComment => {
                let args: PostCommentArgs = parse_args(self, arguments)?;
                require_text(self, "file_key", &args.file_key)?;
                require_text(self, "message", &args.message)?;
                if let Some(node_id) = &args.node_id {
                    require_text(self, "node_id", node_id)?;
                }
                Ok(ToolCall::PostComment(args))
            }
            Self::ReplyToComment => {
                let args: ReplyToCommentArgs = parse_args(self, arguments)?;
                require_text(self, "file_key", &args.file_key)?;
                require_text(self, "comment_id", &args.comment_id)?;
                require_text(self, "message", &args.message)?;
                Ok(ToolCall::ReplyToComment(args))
            }
        }
    }
}

/// Returns all tool definitions, in advertised order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.into_iter().map(ToolKind::definition).collect()
}

/// Arguments of `add_figma_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddFigmaFileArgs {
    /// Figma file URL.
    pub url: String,
}

/// Arguments of `view_node`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewNodeArgs {
    /// Figma file key.
    pub file_key: String,
    /// Node to render.
    pub node_id: String,
}

/// Arguments of `read_comments`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadCommentsArgs {
    /// Figma file key.
    pub file_key: String,
}

/// Arguments of `post_comment`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostCommentArgs {
    /// Figma file key.
    pub file_key: String,
    /// Comment text.
    pub message: String,
    /// Horizontal pin position.
    pub x: f64,
    /// Vertical pin position.
    pub y: f64,
    /// Node the pin is relative to.
    #[serde(default)]
    pub node_id: Option<String>,
}

/// Arguments of `reply_to_comment`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyToCommentArgs {
    /// Figma file key.
    pub file_key: String,
    /// Comment being replied to.
    pub comment_id: String,
    /// Reply text.
    pub message: String,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    /// `add_figma_file`
    AddFigmaFile(AddFigmaFileArgs),
    /// `view_node`
    ViewNode(ViewNodeArgs),
    /// `read_comments`
    ReadComments(ReadCommentsArgs),
    /// `post_comment`
    PostComment(PostCommentArgs),
    /// `reply_to_comment`
    ReplyToComment(ReplyToCommentArgs),
}

impl ToolCall {
    /// Resolves a tool by name and parses its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for unregistered names, or
    /// [`ToolError::InvalidArguments`] if the arguments do not fit.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;
        kind.parse_arguments(arguments)
    }

    /// Returns which tool this call targets.
    #[must_use]
    pub const fn kind(&self) -> ToolKind {
        match self {
            Self::AddFigmaFile(_) => ToolKind::AddFigmaFile,
            Self::ViewNode(_) => ToolKind::ViewNode,
            Self::ReadComments(_) => ToolKind::ReadComments,
            Self::PostComment(_) => ToolKind::PostComment,
            Self::ReplyToComment(_) => ToolKind::ReplyToComment,
        }
    }
}

fn parse_args<T: DeserializeOwned>(kind: ToolKind, arguments: &Value) -> Result<T, ToolError> {
    // Absent arguments read as an empty object so the error names the missing field
    let arguments = match arguments {
        Value::Null => json!({}),
        Value::Object(_) => arguments.clone(),
        _ => {
            return Err(ToolError::InvalidArguments {
                tool: kind.name(),
                message: "arguments must be an object".to_string(),
            })
        }
    };

    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: kind.name(),
        message: e.to_string(),
    })
}

fn require_text(kind: ToolKind, field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArguments {
            tool: kind.name(),
            message: format!("`{field}` must not be empty"),
        });
    }
    Ok(())
}
