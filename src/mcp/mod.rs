//! MCP (Model Context Protocol) server for Claude/Cursor integration.
//!
//! Exposes tools: check_ai_detection, check_file, humanize_prompt.

use crate::analyzer::{DetectionEngine, ScoringConfig, ScoringProfile};
use crate::humanize::{HumanizePrompt, Platform, Tone};
use crate::Generation;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

const METHOD_NOT_FOUND: i32 = -32601;
const PARSE_ERROR: i32 = -32700;

/// MCP JSON-RPC request
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and get no reply
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn error(id: Option<serde_json::Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Tool definition for MCP tools/list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDef {
    name: &'static str,
    description: &'static str,
    input_schema: InputSchema,
}

#[derive(Debug, Serialize)]
struct InputSchema {
    #[serde(rename = "type")]
    typ: &'static str,
    properties: serde_json::Value,
    required: Vec<&'static str>,
}

fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "check_ai_detection",
            description: "Score social media text for how AI-generated it sounds (0-100, lower is more human)",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "content": {
                        "description": "Post text, or a generation object with a 'content' field",
                        "oneOf": [{ "type": "string" }, { "type": "object" }]
                    },
                    "profile": { "type": "string", "enum": ["standard", "basic"], "description": "Scoring profile (default standard)" }
                }),
                required: vec!["content"],
            },
        },
        ToolDef {
            name: "check_file",
            description: "Score a draft file on disk, honoring .postcheckrc.json",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "file": { "type": "string", "description": "Path to draft (.txt, .md, .post)" }
                }),
                required: vec!["file"],
            },
        },
        ToolDef {
            name: "humanize_prompt",
            description: "Build a rewrite prompt that targets the flags this text triggers",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "content": { "type": "string", "description": "Post text to rewrite" },
                    "platform": { "type": "string", "enum": ["twitter", "linkedin", "threads", "instagram", "tiktok", "generic"] },
                    "tone": { "type": "string", "enum": ["casual", "professional", "witty", "bold"] }
                }),
                required: vec!["content"],
            },
        },
    ]
}

/// Handle a single JSON-RPC request and return a response.
/// Extracted from `run_mcp_server` for testability.
pub fn handle_request(req: &JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();
    let result = match req.method.as_str() {
        "initialize" => serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "postcheck", "version": env!("CARGO_PKG_VERSION") }
        }),
        "tools/list" => serde_json::json!({ "tools": tool_defs() }),
        "tools/call" => call_tool(req.params.as_ref()),
        other => {
            return JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )
        }
    };

    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

fn call_tool(params: Option<&serde_json::Value>) -> serde_json::Value {
    let (name, args) = params
        .and_then(|p| p.get("params").or(Some(p)))
        .map(|p| {
            let name = p.get("name").and_then(|n| n.as_str()).unwrap_or("");
            let args = p
                .get("arguments")
                .and_then(|a| a.as_object())
                .cloned()
                .unwrap_or_default();
            (name, args)
        })
        .unwrap_or(("", serde_json::Map::new()));

    tracing::debug!("tools/call {}", name);
    let result = match name {
        "check_ai_detection" => run_check(&args),
        "check_file" => run_check_file(&args),
        "humanize_prompt" => run_humanize_prompt(&args),
        _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
    };

    match result {
        Ok(val) => {
            let text = serde_json::to_string(&val).unwrap_or_else(|_| "{}".to_string());
            serde_json::json!({ "content": [{ "type": "text", "text": text }] })
        }
        Err(e) => serde_json::json!({
            "content": [{ "type": "text", "text": format!("Error: {}", e) }],
            "isError": true
        }),
    }
}

/// Run the MCP server loop (stdin / stdout).
pub fn run_mcp_server() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(req) if req.is_notification() => continue,
            Ok(req) => handle_request(&req),
            Err(e) => {
                tracing::warn!("unparseable request: {}", e);
                JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e))
            }
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

type Args = serde_json::Map<String, serde_json::Value>;

fn content_arg(args: &Args) -> anyhow::Result<String> {
    let value = args
        .get("content")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing required argument: content"))?;
    let generation: Generation = serde_json::from_value(value).map_err(|_| {
        anyhow::anyhow!("content must be a string or an object with a 'content' string")
    })?;
    Ok(generation.text().to_string())
}

fn parsed_arg<T: std::str::FromStr<Err = String>>(
    args: &Args,
    key: &str,
) -> anyhow::Result<Option<T>> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.parse::<T>().map_err(anyhow::Error::msg))
        .transpose()
}

fn run_check(args: &Args) -> anyhow::Result<serde_json::Value> {
    let content = content_arg(args)?;
    let profile: ScoringProfile = parsed_arg(args, "profile")?.unwrap_or_default();
    let engine = DetectionEngine::new().with_scoring(ScoringConfig::for_profile(profile));
    Ok(serde_json::to_value(engine.score(&content))?)
}

fn run_check_file(args: &Args) -> anyhow::Result<serde_json::Value> {
    let file = args
        .get("file")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let path = Path::new(file);
    if !path.is_file() {
        anyhow::bail!("File not found: {}", file);
    }
    let work_dir = std::env::current_dir()?;
    let report = crate::score_file(path, &work_dir, None)?;
    Ok(serde_json::to_value(report)?)
}

fn run_humanize_prompt(args: &Args) -> anyhow::Result<serde_json::Value> {
    let content = content_arg(args)?;
    let platform: Platform = parsed_arg(args, "platform")?.unwrap_or_default();
    let tone: Tone = parsed_arg(args, "tone")?.unwrap_or_default();
    let before = crate::score(&content);
    let prompt = HumanizePrompt::build(&content, platform, tone, &before);
    Ok(serde_json::json!({
        "prompt": prompt,
        "platform": platform,
        "tone": tone,
        "before": before,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: Some("2.0".to_string()),
            id: Some(serde_json::json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn call(name: &str, arguments: serde_json::Value) -> serde_json::Value {
        let req = make_request(
            "tools/call",
            Some(serde_json::json!({ "name": name, "arguments": arguments })),
        );
        handle_request(&req).result.unwrap()
    }

    fn payload(result: &serde_json::Value) -> serde_json::Value {
        let text = result["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_initialize_returns_server_info() {
        let resp = handle_request(&make_request("initialize", None));
        assert_eq!(resp.jsonrpc, "2.0");
        assert_eq!(resp.id, Some(serde_json::json!(1)));
        assert!(resp.error.is_none());

        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "postcheck");
        assert!(result["serverInfo"]["version"].is_string());
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn test_tools_list_returns_three_tools() {
        let result = handle_request(&make_request("tools/list", None)).result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["check_ai_detection", "check_file", "humanize_prompt"]);

        for tool in tools {
            let schema = &tool["inputSchema"];
            assert_eq!(schema["type"], "object");
            assert!(schema["properties"].is_object());
            assert_eq!(schema["required"].as_array().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_check_ai_detection_with_string() {
        let result = call(
            "check_ai_detection",
            serde_json::json!({ "content": "delve delve leverage" }),
        );
        assert!(result.get("isError").is_none(), "got: {:?}", result);
        let detection = payload(&result);
        assert_eq!(detection["riskScore"], 45);
        assert_eq!(detection["riskLevel"], "MEDIUM");
        assert_eq!(detection["passed"], false);
    }

    #[test]
    fn test_check_ai_detection_with_generation_object() {
        let result = call(
            "check_ai_detection",
            serde_json::json!({ "content": { "content": "lol 🚀", "humanness": 90 } }),
        );
        let detection = payload(&result);
        assert_eq!(detection["riskScore"], 0);
        assert_eq!(detection["metrics"]["hasEmoji"], true);
    }

    #[test]
    fn test_check_ai_detection_ignores_provider_scores() {
        let result = call(
            "check_ai_detection",
            serde_json::json!({
                "content": {
                    "content": "delve",
                    "humanness": 72.5,
                    "aiDetection": { "riskScore": 10 }
                }
            }),
        );
        assert!(result.get("isError").is_none());
        assert_eq!(payload(&result)["riskScore"], 15);
    }

    #[test]
    fn test_check_ai_detection_basic_profile() {
        let text = "- one two three four\n- five six seven ei\n- nine ten eleven tw";
        let standard = payload(&call("check_ai_detection", serde_json::json!({ "content": text })));
        let basic = payload(&call(
            "check_ai_detection",
            serde_json::json!({ "content": text, "profile": "basic" }),
        ));
        assert_eq!(standard["metrics"]["hasPerfectParallelStructure"], true);
        assert!(basic["riskScore"].as_u64() < standard["riskScore"].as_u64());
    }

    #[test]
    fn test_check_ai_detection_missing_content_is_tool_error() {
        let result = call("check_ai_detection", serde_json::json!({}));
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("content"), "got: {}", text);
    }

    #[test]
    fn test_check_ai_detection_bad_profile_is_tool_error() {
        let result = call(
            "check_ai_detection",
            serde_json::json!({ "content": "hi", "profile": "strict" }),
        );
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_check_file_nonexistent_returns_error() {
        let result = call("check_file", serde_json::json!({ "file": "/nonexistent/post.txt" }));
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("File not found"), "got: {}", text);
    }

    #[test]
    fn test_check_file_real_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("post.txt");
        std::fs::write(&path, "delve").unwrap();

        let result = call("check_file", serde_json::json!({ "file": path.to_str().unwrap() }));
        assert!(result.get("isError").is_none(), "got: {:?}", result);
        let report = payload(&result);
        assert_eq!(report["riskScore"], 15);
        assert!(report["filePath"].as_str().unwrap().ends_with("post.txt"));
    }

    #[test]
    fn test_humanize_prompt_tool() {
        let result = call(
            "humanize_prompt",
            serde_json::json!({ "content": "delve into it", "platform": "linkedin", "tone": "bold" }),
        );
        let out = payload(&result);
        assert_eq!(out["platform"], "linkedin");
        assert_eq!(out["tone"], "bold");
        assert_eq!(out["before"]["riskScore"], 15);
        assert!(out["prompt"].as_str().unwrap().contains("delve into it"));
    }

    #[test]
    fn test_humanize_prompt_unknown_platform_is_tool_error() {
        let result = call(
            "humanize_prompt",
            serde_json::json!({ "content": "hi", "platform": "myspace" }),
        );
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_tools_call_unknown_tool_returns_error() {
        let result = call("nonexistent_tool", serde_json::json!({}));
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Unknown tool"));
    }

    #[test]
    fn test_unknown_method_returns_method_not_found() {
        let resp = handle_request(&make_request("nonexistent/method", None));
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_jsonrpc_request_with_string_id() {
        let json = r#"{"jsonrpc":"2.0","id":"abc-123","method":"tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        let resp = handle_request(&req);
        assert_eq!(resp.id, Some(serde_json::json!("abc-123")));
    }

    #[test]
    fn test_notification_detection() {
        let json = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert!(req.is_notification());
        assert!(!make_request("initialize", None).is_notification());
    }

    #[test]
    fn test_any_request_without_id_is_notification() {
        let json = r#"{"jsonrpc":"2.0","method":"tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert!(req.is_notification());
    }

    #[test]
    fn test_tools_call_with_nested_params() {
        // Some MCP clients wrap params inside a "params" key
        let req = make_request(
            "tools/call",
            Some(serde_json::json!({
                "params": {
                    "name": "check_ai_detection",
                    "arguments": { "content": "delve" }
                }
            })),
        );
        let result = handle_request(&req).result.unwrap();
        assert_eq!(payload(&result)["riskScore"], 15);
    }
}
