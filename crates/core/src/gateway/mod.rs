//! Per-session HTTP gateway.
//!
//! One axum router per review session, bound to the session's loopback
//! port. Read endpoints are idempotent lookups into the session's immutable
//! inputs; the submit endpoint is the single writer of the session promise.
//! Request-local failures (bad path, duplicate submit, invalid payload) are
//! answered here and never touch the promise.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use redpen_protocol::{
	ConfigResponse, ContentResponse, DiffResponse, ErrorBody, ReviewSubmission, SubmitAck,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::files::{self, FileReadError};
use crate::session::{ReviewOutcome, ReviewSession};
use crate::theme;

/// Runs the gateway until the shutdown signal fires. A server error while
/// the session is still live force-resolves the promise as `Failed` so the
/// waiting caller is never stranded.
pub(crate) async fn serve(
	listener: TcpListener,
	session: Arc<ReviewSession>,
	mut shutdown: watch::Receiver<bool>,
) {
	let app = router(Arc::clone(&session));

	let result = axum::serve(listener, app)
		.with_graceful_shutdown(async move {
			loop {
				if shutdown.changed().await.is_err() || *shutdown.borrow() {
					break;
				}
			}
		})
		.await;

	if let Err(err) = result {
		warn!(
			target = "redpen.gateway",
			id = %session.id(),
			error = %err,
			"gateway terminated with error"
		);
		session.resolve(ReviewOutcome::Failed(format!("gateway error: {err}")));
	}
}

fn router(session: Arc<ReviewSession>) -> Router {
	Router::new()
		.route("/", get(index))
		.route("/api/content", get(content))
		.route("/api/diff", get(diff))
		.route("/api/file", get(file))
		.route("/api/config", get(config))
		.route("/api/submit", post(submit))
		.with_state(session)
}

/// Placeholder page for manual navigation when no UI bundle is mounted.
/// The real review interface is an external collaborator.
async fn index(State(session): State<Arc<ReviewSession>>) -> Html<String> {
	let context = session.document().context.as_deref().unwrap_or("review");
	Html(format!(
		"<!doctype html><html><head><title>redpen review</title></head><body>\
		 <h1>redpen review session</h1>\
		 <p>{context}</p>\
		 <p>The review UI bundle is not installed. The document is available \
		 at <a href=\"/api/content\">/api/content</a>.</p>\
		 </body></html>"
	))
}

async fn content(State(session): State<Arc<ReviewSession>>) -> Json<ContentResponse> {
	Json(ContentResponse { content: session.document().body.clone() })
}

async fn diff(State(session): State<Arc<ReviewSession>>) -> Json<DiffResponse> {
	Json(DiffResponse { diff: session.diff().clone() })
}

async fn config(State(session): State<Arc<ReviewSession>>) -> Json<ConfigResponse> {
	// Theme names are validated at startup; an unknown name here means the
	// registry changed underneath us, fall back rather than 500.
	let theme = theme::get(session.theme()).unwrap_or_else(|_| theme::default_theme());
	Json(ConfigResponse { theme: theme.clone(), available_themes: theme::list() })
}

#[derive(Debug, Deserialize)]
struct FileQuery {
	path: String,
}

async fn file(
	State(session): State<Arc<ReviewSession>>,
	Query(query): Query<FileQuery>,
) -> Response {
	match files::read_file(session.root(), &query.path) {
		Ok(body) => Json(body).into_response(),
		Err(err) => {
			let status = match &err {
				FileReadError::Traversal { .. } => StatusCode::FORBIDDEN,
				FileReadError::NotFound { .. } => StatusCode::NOT_FOUND,
				FileReadError::NotAFile { .. } | FileReadError::Binary { .. } => {
					StatusCode::BAD_REQUEST
				}
				FileReadError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
			};
			(status, Json(ErrorBody::new(err.to_string()))).into_response()
		}
	}
}

async fn submit(
	State(session): State<Arc<ReviewSession>>,
	Json(submission): Json<ReviewSubmission>,
) -> Response {
	if let Err(reason) = validate(&submission) {
		return (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::new(reason))).into_response();
	}

	let comment_count = submission.comments.len() + submission.code_comments.len();
	let feedback = submission.into_feedback();

	if session.resolve(ReviewOutcome::Submitted(feedback)) {
		info!(
			target = "redpen.gateway",
			id = %session.id(),
			comments = comment_count,
			"review submitted"
		);
		Json(SubmitAck::ok()).into_response()
	} else {
		(
			StatusCode::CONFLICT,
			Json(ErrorBody::new("review already completed")),
		)
			.into_response()
	}
}

/// Shape validation beyond what serde enforces: comments must actually
/// reference the reviewed material, not arrive as empty husks.
fn validate(submission: &ReviewSubmission) -> Result<(), String> {
	for comment in &submission.comments {
		if comment.id.trim().is_empty() {
			return Err("comment id must not be empty".into());
		}
		if comment.quote.trim().is_empty() {
			return Err(format!("comment {} has an empty quote", comment.id));
		}
	}

	for code in &submission.code_comments {
		if code.id.trim().is_empty() {
			return Err("code comment id must not be empty".into());
		}
		if code.file_path.trim().is_empty() {
			return Err(format!("code comment {} has an empty file path", code.id));
		}
		if code.line_start == 0 || code.line_end < code.line_start {
			return Err(format!(
				"code comment {} has an invalid line range {}..{}",
				code.id, code.line_start, code.line_end
			));
		}
	}

	Ok(())
}
