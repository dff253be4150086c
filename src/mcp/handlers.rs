//! Tool handlers.
//!
//! Each handler turns a validated [`ToolCall`] into an ordered list of content
//! blocks. Errors are not turned into partial results: any failure aborts the
//! whole call and is reported as a JSON-RPC error by the server.

use serde::Serialize;
use serde_json::json;

use crate::error::ToolError;
use crate::figma::{fetch_canvas_thumbnails, parse_file_key, FigmaApi, FigmaError, NewComment};
use crate::mcp::tools::{
    AddFigmaFileArgs, PostCommentArgs, ReadCommentsArgs, ReplyToCommentArgs, ToolCall,
    ViewNodeArgs,
};

/// MIME type of every image Figma renders for us.
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
    /// Base64-encoded image.
    Image {
        /// Base64 image data.
        data: String,
        /// MIME type of the decoded data.
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl ToolContent {
    /// Creates a text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a PNG image block from base64 data.
    #[must_use]
    pub fn png(data: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: IMAGE_MIME_TYPE.to_string(),
        }
    }
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a result from content blocks.
    #[must_use]
    pub const fn new(content: Vec<ToolContent>) -> Self {
        Self { content }
    }

    /// Creates a single-block text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ToolContent::text(text)])
    }

    /// Creates a text result holding pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialised.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }
}

/// Runs a validated tool call against the Figma API.
///
/// # Errors
///
/// Returns any error raised by the handler; see the individual tools.
pub async fn execute(api: &dyn FigmaApi, call: ToolCall) -> Result<ToolCallResult, ToolError> {
    tracing::debug!(tool = call.kind().name(), "Executing tool");
    match call {
        ToolCall::AddFigmaFile(args) => add_figma_file(api, args).await,
        ToolCall::ViewNode(args) => view_node(api, args).await,
        ToolCall::ReadComments(args) => read_comments(api, args).await,
        ToolCall::PostComment(args) => post_comment(api, args).await,
        ToolCall::ReplyToComment(args) => reply_to_comment(api, args).await,
    }
}

/// Loads a file into context.
///
/// Block order: metadata text, file thumbnail, document JSON, then a label
/// and image per page in document order.
async fn add_figma_file(
    api: &dyn FigmaApi,
    args: AddFigmaFileArgs,
) -> Result<ToolCallResult, ToolError> {
    let key = parse_file_key(&args.url)?;
    tracing::info!(file_key = %key, "Adding Figma file");

    let file = api.fetch_file(&key).await?;
    let thumbnails = fetch_canvas_thumbnails(api, &key, &file.document).await?;

    let metadata = json!({
        "name": file.name,
        "key": key,
        "version": file.version,
    });

    let mut content = Vec::with_capacity(3 + 2 * thumbnails.len());
    content.push(ToolContent::text(serde_json::to_string(&metadata)?));
    content.push(ToolContent::png(file.thumbnail_b64));
    content.push(ToolContent::text(serde_json::to_string(&file.document)?));

    for thumbnail in thumbnails {
        content.push(ToolContent::text(format!(
            "Next is the image of canvas ID: {}",
            thumbnail.id
        )));
        content.push(ToolContent::png(thumbnail.data));
    }

    tracing::debug!(file_key = %key, blocks = content.len(), "Figma file added");
    Ok(ToolCallResult::new(content))
}

/// Renders one node.
async fn view_node(api: &dyn FigmaApi, args: ViewNodeArgs) -> Result<ToolCallResult, ToolError> {
    let urls = api
        .fetch_thumbnails(&args.file_key, std::slice::from_ref(&args.node_id))
        .await?;

    let url = urls
        .get(&args.node_id)
        .ok_or_else(|| FigmaError::MissingThumbnail {
            node_id: args.node_id.clone(),
        })?;

    let data = api.download_image(url).await?;
    Ok(ToolCallResult::new(vec![ToolContent::png(data)]))
}

async fn read_comments(
    api: &dyn FigmaApi,
    args: ReadCommentsArgs,
) -> Result<ToolCallResult, ToolError> {
    let comments = api.fetch_comments(&args.file_key).await?;
    ToolCallResult::json(&comments)
}

async fn post_comment(
    api: &dyn FigmaApi,
    args: PostCommentArgs,
) -> Result<ToolCallResult, ToolError> {
    let comment = NewComment::pinned(args.message, args.x, args.y, args.node_id);
    let response = api.post_comment(&args.file_key, &comment).await?;
    ToolCallResult::json(&response)
}

async fn reply_to_comment(
    api: &dyn FigmaApi,
    args: ReplyToCommentArgs,
) -> Result<ToolCallResult, ToolError> {
    let response = api
        .reply_to_comment(&args.file_key, &args.comment_id, &args.message)
        .await?;
    ToolCallResult::json(&response)
}
