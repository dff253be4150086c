//! stdio transport for MCP server.
//!
//! - Messages are UTF-8 encoded JSON-RPC, one per line
//! - Messages must not contain embedded newlines
//! - stdin: receives messages from client
//! - stdout: sends messages to client
//! - stderr: logging only, never MCP messages

use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse};

/// A stdio-based MCP transport.
pub struct StdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl StdioTransport {
    /// Creates a new stdio transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }

    /// Reads the next message line from stdin.
    ///
    /// Returns `None` if stdin is closed (EOF).
    ///
    /// # Errors
    ///
    /// Returns an error if reading from stdin fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);

        Ok(Some(line))
    }

    /// Writes either a success response or an error response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_outcome(
        &mut self,
        outcome: &Result<JsonRpcResponse, JsonRpcError>,
    ) -> io::Result<()> {
        match outcome {
            Ok(response) => self.write_message(response).await,
            Err(error) => self.write_message(error).await,
        }
    }

    /// Writes a JSON-RPC error to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_error(&mut self, error: &JsonRpcError) -> io::Result<()> {
        self.write_message(error).await
    }

    /// Serialises a message and writes it as one line.
    async fn write_message<T: Serialize>(&mut self, message: &T) -> io::Result<()> {
        let json = encode_line(message)?;

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialises a message to single-line JSON.
fn encode_line<T: Serialize>(message: &T) -> io::Result<String> {
    let json =
        serde_json::to_string(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    // serde_json escapes newlines inside strings, so compact output is single-line
    debug_assert!(
        !json.contains('\n'),
        "JSON message must not contain embedded newlines"
    );

    Ok(json)
}
