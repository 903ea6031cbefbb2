//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes scoring and report assembly to AI assistants over stdio. The
//! server is a presentation layer: each `#[tool]` method validates its input
//! and delegates to `readable_iq_core`, the same as the CLI commands.
//!
//! Input problems (blank text, oversized text, text without words, unknown
//! format) are reported as `invalid_params`; anything else is an
//! `internal_error`.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use readable_iq_core::{
    AnalysisError, Report, ReportFormat, ScoreSet, Text, TextStatistics, markdown, score,
    score_with_statistics,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_info_format")]
    pub format: String,
}

fn default_info_format() -> String {
    "text".to_string()
}

/// Parameters for the `score_readability` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScoreReadabilityParams {
    /// The text to score.
    pub text: String,
    /// Whether to strip markdown formatting before scoring.
    #[serde(default)]
    pub strip_markdown: bool,
    /// Whether to include the sentence, word and syllable counts.
    #[serde(default)]
    pub include_statistics: bool,
}

/// Parameters for the `readability_report` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ReadabilityReportParams {
    /// The text to report on.
    pub text: String,
    /// Whether to strip markdown formatting before scoring.
    #[serde(default)]
    pub strip_markdown: bool,
    /// Narrative to attach to the report, typically written by the caller
    /// after reading the scores.
    pub narrative: Option<String>,
    /// Output format: "json", "markdown" or "text".
    #[serde(default = "default_report_format")]
    pub format: String,
}

fn default_report_format() -> String {
    "json".to_string()
}

#[derive(Serialize)]
struct ScoreResponse<'a> {
    scores: &'a ScoreSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a TextStatistics>,
}

/// MCP server exposing readability scoring to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ReadabilityServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    max_input_bytes: Option<usize>,
}

impl Default for ReadabilityServer {
    fn default() -> Self {
        Self::new(Some(readable_iq_core::DEFAULT_MAX_INPUT_BYTES))
    }
}

#[tool_router]
impl ReadabilityServer {
    /// Create a server that rejects text larger than `max_input_bytes`.
    pub fn new(max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            max_input_bytes,
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Compute the ten readability metrics.
    #[tool(
        description = "Score text with ten readability metrics: FRE, SMOG, FKG, CLI, ARI, DCRS, DW, LWF, GFI and TS (text standard). Returns JSON with the scores in that order."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn score_readability(
        &self,
        Parameters(params): Parameters<ScoreReadabilityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "score_readability",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        let text = self.prepare(params.text, params.strip_markdown)?;
        let (scores, stats) = score_with_statistics(&text).map_err(analysis_error)?;
        let json = to_json(&ScoreResponse {
            scores: &scores,
            statistics: params.include_statistics.then_some(&stats),
        })?;

        tracing::info!(
            tool = "score_readability",
            standard = scores.text_standard(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Build a readability report.
    #[tool(
        description = "Build a readability report: the text, every metric with its explanation, and an optional narrative you supply. Format is json, markdown or text."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", format = %params.format))]
    fn readability_report(
        &self,
        Parameters(params): Parameters<ReadabilityReportParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "readability_report",
            strip_md = params.strip_markdown,
            narrated = params.narrative.is_some(),
            "executing MCP tool"
        );

        let format = match params.format.as_str() {
            "json" => None,
            "markdown" => Some(ReportFormat::Markdown),
            "text" => Some(ReportFormat::Text),
            other => {
                return Err(McpError::invalid_params(
                    format!("unknown format '{other}' (expected json, markdown or text)"),
                    None,
                ));
            }
        };

        let text = self.prepare(params.text, params.strip_markdown)?;
        let scores = score(&text).map_err(analysis_error)?;
        let report = Report::assemble(&text, &scores, params.narrative);
        let output = match format {
            Some(format) => report.render(format),
            None => to_json(&report)?,
        };

        tracing::info!(tool = "readability_report", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    fn prepare(&self, raw: String, strip_markdown: bool) -> Result<Text, McpError> {
        if let Some(max) = self.max_input_bytes
            && raw.len() > max
        {
            return Err(McpError::invalid_params(
                format!(
                    "input too large: {} bytes (limit: {max} bytes)",
                    raw.len()
                ),
                None,
            ));
        }
        let raw = if strip_markdown {
            markdown::strip_to_prose(&raw)
        } else {
            raw
        };
        Text::new(raw).map_err(analysis_error)
    }
}

fn analysis_error(e: AnalysisError) -> McpError {
    match e {
        AnalysisError::EmptyInput | AnalysisError::NoWords => {
            McpError::invalid_params(e.to_string(), None)
        }
        AnalysisError::NonFinite { .. } => McpError::internal_error(e.to_string(), None),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_handler]
impl ServerHandler for ReadabilityServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use score_readability for metrics and readability_report for an explained report.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    const FOX: &str = "The quick brown fox jumps over the lazy dog.";

    #[test]
    fn server_info_has_correct_name() {
        let server = ReadabilityServer::default();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = ReadabilityServer::default();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = ReadabilityServer::default();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn score_params(text: &str) -> Parameters<ScoreReadabilityParams> {
        Parameters(ScoreReadabilityParams {
            text: text.to_string(),
            strip_markdown: false,
            include_statistics: false,
        })
    }

    fn report_params(text: &str, format: &str) -> Parameters<ReadabilityReportParams> {
        Parameters(ReadabilityReportParams {
            text: text.to_string(),
            strip_markdown: false,
            narrative: None,
            format: format.to_string(),
        })
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ReadabilityServer::default();
        let params = Parameters(GetInfoParams {
            format: "text".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ReadabilityServer::default();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value =
            serde_json::from_str(text).expect("output should be valid JSON");

        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    // =========================================================================
    // score_readability
    // =========================================================================

    #[test]
    fn score_tool_returns_all_metrics() {
        let server = ReadabilityServer::default();
        let result = server
            .score_readability(score_params(FOX))
            .expect("score_readability should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        let scores = &json["scores"];
        assert_eq!(scores["FRE"].as_f64(), Some(94.3));
        assert_eq!(scores["DW"].as_u64(), Some(0));
        assert_eq!(scores["TS"].as_str(), Some("3rd and 4th grade"));
        assert!(json.get("statistics").is_none());
    }

    #[test]
    fn score_tool_keeps_metric_order() {
        let server = ReadabilityServer::default();
        let result = server.score_readability(score_params(FOX)).unwrap();
        let text = extract_text(&result).unwrap();

        let positions: Vec<usize> = readable_iq_core::MetricId::ALL
            .iter()
            .map(|id| {
                text.find(&format!("\"{id}\""))
                    .expect("every metric is present")
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{text}");
    }

    #[test]
    fn score_tool_includes_statistics_on_request() {
        let server = ReadabilityServer::default();
        let mut params = score_params(FOX);
        params.0.include_statistics = true;

        let result = server.score_readability(params).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert_eq!(json["statistics"]["words"].as_u64(), Some(9));
        assert_eq!(json["statistics"]["sentences"].as_u64(), Some(1));
    }

    #[test]
    fn score_tool_strips_markdown_on_request() {
        let server = ReadabilityServer::default();
        let mut params = score_params("# Heading\n\nThe quick brown fox jumps over the lazy dog.");
        params.0.strip_markdown = true;
        params.0.include_statistics = true;

        let result = server.score_readability(params).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert_eq!(json["statistics"]["words"].as_u64(), Some(9));
    }

    #[test]
    fn blank_text_is_invalid_params() {
        let server = ReadabilityServer::default();
        let err = server.score_readability(score_params("   ")).unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("no scorable text"));
    }

    #[test]
    fn punctuation_only_is_invalid_params() {
        let server = ReadabilityServer::default();
        let err = server.score_readability(score_params("...")).unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn oversized_text_is_rejected() {
        let server = ReadabilityServer::new(Some(10));
        let err = server.score_readability(score_params(FOX)).unwrap_err();
        assert!(err.message.contains("input too large"));
    }

    // =========================================================================
    // readability_report
    // =========================================================================

    #[test]
    fn report_tool_returns_json_by_default() {
        let server = ReadabilityServer::default();
        let result = server
            .readability_report(report_params(FOX, "json"))
            .expect("readability_report should succeed");

        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert_eq!(json["text"], FOX);
        assert_eq!(json["entries"].as_array().map(Vec::len), Some(10));
        assert_eq!(json["entries"][0]["id"], "FRE");
        assert!(json.get("narrative").is_none());
    }

    #[test]
    fn report_tool_renders_markdown_with_narrative() {
        let server = ReadabilityServer::default();
        let mut params = report_params(FOX, "markdown");
        params.0.narrative = Some("Very easy to read.".to_string());

        let result = server.readability_report(params).unwrap();
        let text = extract_text(&result).unwrap();
        assert!(text.contains("Readability Analysis Report"));
        assert!(text.contains("Very easy to read."));
    }

    #[test]
    fn report_tool_rejects_unknown_format() {
        let server = ReadabilityServer::default();
        let err = server
            .readability_report(report_params(FOX, "html"))
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("html"));
    }
}
