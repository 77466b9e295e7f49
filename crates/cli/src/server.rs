//! MCP tool surface: one tool, `request_human_review`, that suspends the
//! calling agent until a human settles the review in the browser.
//!
//! The MCP envelope (framing, capability negotiation) is rmcp's concern;
//! this module only wires the tool call into the session broker and maps
//! session outcomes onto structured tool errors.

use std::path::PathBuf;
use std::sync::Arc;

use redpen::{RedpenError, ReviewOutcome, SessionBroker, SessionRequest, diff};
use redpen_protocol::ReviewFeedback;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{ErrorData, ServerHandler, ServiceExt, schemars, tool, tool_handler, tool_router};
use serde::Deserialize;
use tracing::info;

/// Arguments of the `request_human_review` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RequestReviewParams {
	/// The markdown document to review. Use code references
	/// `[[file:path/to/file.rs:42]]` or `[[file:path/to/file.rs:42-50]]`
	/// to link specific lines; they become clickable buttons that open the
	/// code viewer panel.
	pub markdown_spec: String,
	/// What is being reviewed, e.g. "Implementation plan for feature X" or
	/// "Phase 1 completion summary".
	#[serde(default)]
	pub context: Option<String>,
	/// Base directory for resolving file references and computing the
	/// changed-line index. Defaults to the current working directory.
	#[serde(default)]
	pub base_dir: Option<String>,
}

/// MCP server state: one broker shared by every tool invocation, so
/// concurrent review requests each get their own port from one registry.
#[derive(Clone)]
pub struct RedpenMcp {
	broker: Arc<SessionBroker>,
	theme: String,
	tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RedpenMcp {
	pub fn new(theme: impl Into<String>) -> Self {
		Self {
			broker: Arc::new(SessionBroker::new()),
			theme: theme.into(),
			tool_router: Self::tool_router(),
		}
	}

	pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
		let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
		service.waiting().await?;
		Ok(())
	}

	/// Request human review of a markdown document via a browser interface
	/// with highlighting and inline comments.
	///
	/// Use this for code reviews, technical analysis deliverables,
	/// implementation plans, phase completion summaries, and
	/// recommendations the user should annotate - any substantive document
	/// where feedback on specific sections matters. Do not use it for
	/// simple Q&A, short clarifications, or single straightforward task
	/// completions.
	///
	/// Structure the markdown for annotation: clear section headers,
	/// numbered findings, tables for trade-offs, and
	/// `[[file:path:line]]` references for clickable code links. The call
	/// blocks until the reviewer submits; an empty submission means
	/// approval and is returned as an explicit approval marker.
	#[tool(name = "request_human_review")]
	async fn request_human_review(
		&self,
		params: Parameters<RequestReviewParams>,
	) -> Result<Json<ReviewFeedback>, ErrorData> {
		let RequestReviewParams { markdown_spec, context, base_dir } = params.0;

		let root = match base_dir {
			Some(dir) => PathBuf::from(dir),
			None => std::env::current_dir().map_err(|err| {
				ErrorData::internal_error(
					format!("cannot resolve working directory: {err}"),
					Some(serde_json::json!({ "code": "INTERNAL_ERROR" })),
				)
			})?,
		};

		info!(
			target = "redpen.mcp",
			context = context.as_deref().unwrap_or(""),
			root = %root.display(),
			"human review requested"
		);

		let diff = diff::working_tree_index(&root).await;

		let request = SessionRequest::new(markdown_spec, root)
			.with_context(context)
			.with_diff(diff)
			.with_theme(self.theme.clone());

		let mut handle = self.broker.create(request).await.map_err(session_error)?;

		// Human review is not time-boxed: no deadline. Cancellation still
		// works - if the client tears the invocation down, dropping this
		// future releases the session through its handle.
		let outcome = handle.wait(None).await;
		handle.close().await;

		match outcome {
			ReviewOutcome::Submitted(feedback) => {
				info!(target = "redpen.mcp", "review received");
				Ok(Json(feedback))
			}
			ReviewOutcome::Cancelled => Err(session_error(RedpenError::Cancelled)),
			ReviewOutcome::TimedOut => Err(session_error(RedpenError::TimedOut)),
			ReviewOutcome::Failed(reason) => Err(session_error(RedpenError::Internal(reason))),
		}
	}
}

/// Maps a session error onto a structured tool error. The `code` field lets
/// the caller distinguish "the human never responded" (`CANCELLED`,
/// `TIMED_OUT`) from "the session could not be created"
/// (`PORT_ALLOCATION_ERROR`) and decide whether to retry.
fn session_error(err: RedpenError) -> ErrorData {
	ErrorData::internal_error(
		err.to_string(),
		Some(serde_json::json!({ "code": err.code() })),
	)
}

#[tool_handler]
impl ServerHandler for RedpenMcp {
	fn get_info(&self) -> ServerInfo {
		ServerInfo {
			instructions: Some(
				"redpen human-in-the-loop review server. Call request_human_review \
				 with a markdown document to open a browser review session; the call \
				 blocks until the human submits structured feedback (inline comments, \
				 code comments, and an overall comment)."
					.into(),
			),
			capabilities: ServerCapabilities::builder().enable_tools().build(),
			..Default::default()
		}
	}
}
