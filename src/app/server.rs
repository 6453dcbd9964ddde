use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::app::protocol::{
    CallParams, Request, Response, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::app::tool;
use crate::models::config::{Config, SERVER_NAME};
use crate::services::api::FearGreedClient;

pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// Line-delimited JSON-RPC tool server exposing `get_fear_greed_index`
pub struct Server {
    config: Config,
    client: FearGreedClient,
}

impl Server {
    pub fn new(config: Config, client: FearGreedClient) -> Self {
        Server { config, client }
    }

    /// Serves stdin/stdout until the host closes stdin
    pub async fn serve_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Reads one message per line and writes one response per request.
    /// Messages are handled strictly in arrival order.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(name = SERVER_NAME, version = %self.config.version, "server started");
        let mut lines = reader.split(b'\n');
        while let Some(bytes) = lines.next_segment().await? {
            let response = match String::from_utf8(bytes) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(&line).await,
                Err(err) => {
                    warn!(error = %err, "message is not valid UTF-8");
                    Some(Response::error(Value::Null, PARSE_ERROR, "Parse error"))
                }
            };
            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        info!("input closed, shutting down");
        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "unparsable message");
                return Some(Response::error(Value::Null, PARSE_ERROR, "Parse error"));
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<Request>(value) {
            Ok(request) if !request.has_supported_version() => {
                warn!(jsonrpc = %request.jsonrpc, "unsupported JSON-RPC version");
                Some(Response::error(id, INVALID_REQUEST, "Invalid Request"))
            }
            Ok(request) => self.handle(request).await,
            Err(err) => {
                warn!(error = %err, "malformed request");
                Some(Response::error(id, INVALID_REQUEST, "Invalid Request"))
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Option<Response> {
        debug!(method = %request.method, "request received");
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "notification ignored");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => Response::result(id, self.initialize(request.params.as_ref())),
            "ping" => Response::result(id, json!({})),
            "tools/list" => Response::result(id, json!({ "tools": [tool::descriptor()] })),
            "tools/call" => self.call_tool(id, request.params).await,
            other => {
                warn!(method = other, "unknown method");
                Response::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
            }
        };
        Some(response)
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let protocol_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": SERVER_NAME, "version": self.config.version },
        })
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> Response {
        let params: CallParams = match params.map(serde_json::from_value::<CallParams>) {
            Some(Ok(params)) => params,
            Some(Err(err)) => {
                return Response::error(id, INVALID_PARAMS, format!("Invalid params: {}", err))
            }
            None => return Response::error(id, INVALID_PARAMS, "Invalid params: missing tool name"),
        };
        if params.name != tool::TOOL_NAME {
            return Response::error(id, INVALID_PARAMS, format!("Unknown tool: {}", params.name));
        }

        let result = tool::call(&self.client).await;
        match serde_json::to_value(&result) {
            Ok(value) => Response::result(id, value),
            Err(err) => {
                let fallback = tool::ToolResult::failure(&err.to_string());
                Response::result(id, serde_json::to_value(fallback).unwrap_or(Value::Null))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        let config = Config {
            version: "9.9.9".to_string(),
            ..Config::default()
        };
        // Port 9 (discard) on loopback is never reached by these tests
        Server::new(config, FearGreedClient::new().with_endpoint("http://127.0.0.1:9/"))
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#)
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], json!("2024-11-05"));
        assert_eq!(result["serverInfo"]["name"], json!("fear-greed-index"));
        assert_eq!(result["serverInfo"]["version"], json!("9.9.9"));
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn initialize_defaults_protocol_version() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":"a","method":"initialize"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, json!("a"));
        assert_eq!(
            response.result.unwrap()["protocolVersion"],
            json!(DEFAULT_PROTOCOL_VERSION)
        );
    }

    #[tokio::test]
    async fn lists_the_single_tool() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = response.result.unwrap()["tools"].clone();
        assert_eq!(tools.as_array().unwrap().len(), 1);
        assert_eq!(tools[0]["name"], json!("get_fear_greed_index"));
        assert!(tools[0]["outputSchema"].is_object());
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn protocol_errors() {
        let srv = server();

        let bad_json = srv.handle_line("{not json").await.unwrap();
        assert_eq!(bad_json.error.unwrap().code, PARSE_ERROR);
        assert_eq!(bad_json.id, Value::Null);

        let no_method = srv.handle_line(r#"{"jsonrpc":"2.0","id":3}"#).await.unwrap();
        assert_eq!(no_method.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(no_method.id, json!(3));

        let wrong_version = srv
            .handle_line(r#"{"jsonrpc":"1.0","id":6,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(wrong_version.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(wrong_version.id, json!(6));

        let no_version = srv.handle_line(r#"{"id":7,"method":"ping"}"#).await.unwrap();
        assert_eq!(no_version.error.unwrap().code, INVALID_REQUEST);

        let unknown = srv
            .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, METHOD_NOT_FOUND);

        let wrong_tool = srv
            .handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"other"}}"#)
            .await
            .unwrap();
        let err = wrong_tool.error.unwrap();
        assert_eq!(err.code, INVALID_PARAMS);
        assert!(err.message.contains("other"));
    }

    #[tokio::test]
    async fn run_answers_each_request_line() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server().run(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], json!({ "jsonrpc": "2.0", "id": 1, "result": {} }));
        assert_eq!(lines[1]["id"], json!(2));
    }

    #[tokio::test]
    async fn run_survives_invalid_utf8() {
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.extend_from_slice(b"\r\n");

        let mut output = Vec::new();
        server().run(input.as_slice(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], json!({ "jsonrpc": "2.0", "id": 1, "result": {} }));
        assert_eq!(lines[1]["id"], Value::Null);
        assert_eq!(lines[1]["error"]["code"], json!(PARSE_ERROR));
        assert_eq!(lines[2], json!({ "jsonrpc": "2.0", "id": 2, "result": {} }));
    }
}
