//! Newline-delimited JSON-RPC transport over stdin/stdout.

use crate::server::McpServer;
use crate::types::{McpError, McpRequest, McpResponse, RequestId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Serve the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(server: &McpServer) -> std::io::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(server, reader, writer).await
}

/// Serve one JSON-RPC message per line from `reader`, writing one response
/// line per request to `writer`.
pub async fn serve<R, W>(server: &McpServer, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(tools = server.list_tools().len(), "MCP server listening on stdio");
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(response) = handle_line(server, line).await else {
            continue;
        };
        let mut bytes = match serde_json::to_vec(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize response");
                continue;
            }
        };
        bytes.push(b'\n');
        writer.write_all(&bytes).await?;
        writer.flush().await?;
    }

    info!("stdin closed, MCP server stopping");
    Ok(())
}

/// Decode one line and dispatch it.
pub async fn handle_line(server: &McpServer, line: &str) -> Option<McpResponse> {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "Unparseable message");
            return Some(McpResponse::error(RequestId::Null, McpError::parse_error(e)));
        }
    };

    let id = value
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value::<RequestId>(id).ok());

    match serde_json::from_value::<McpRequest>(value) {
        Ok(request) => server.handle_request(request).await,
        Err(e) => id.map(|id| McpResponse::error(id, McpError::invalid_request(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;
    use serde_json::Value;

    fn server() -> McpServer {
        McpServer::strimzi(ToolRegistry::new())
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let response = handle_line(&server(), "{not json").await.unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], McpError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_missing_method_is_invalid_request() {
        let response = handle_line(&server(), r#"{"jsonrpc":"2.0","id":4}"#)
            .await
            .unwrap();
        assert_eq!(response.id, RequestId::Number(4));
        assert_eq!(response.error.unwrap().code, McpError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_serve_skips_notifications() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":"b","method":"resources/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        serve(&server(), input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert!(lines[0]["result"].is_object());
        assert_eq!(lines[1]["id"], "b");
        assert_eq!(lines[1]["error"]["code"], McpError::METHOD_NOT_FOUND);
    }
}
