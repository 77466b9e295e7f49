//! Wire types for the redpen review protocol.
//!
//! This crate defines the JSON shapes exchanged between the per-session
//! review gateway, the browser client, and the MCP adapter:
//!
//! 1. Browser fetches [`ContentResponse`], [`DiffResponse`], [`ConfigResponse`],
//!    and individual [`FileResponse`] payloads to render the review UI
//! 2. Browser posts a [`ReviewSubmission`] to `/api/submit`
//! 3. The gateway answers with [`SubmitAck`] (or a conflict error body)
//! 4. The adapter returns the settled [`ReviewFeedback`] to the agent
//!
//! # Main Types
//!
//! - [`Comment`] - Inline annotation anchored to the review document
//! - [`CodeComment`] - Annotation anchored to a source file line range
//! - [`ReviewSubmission`] - Raw submission body posted by the browser
//! - [`ReviewFeedback`] - Normalized feedback returned to the agent

mod feedback;
mod theme;

pub use feedback::{
	APPROVAL_MARKER, CodeComment, Comment, ReviewFeedback, ReviewSubmission,
};
pub use theme::{Theme, ThemeColors};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `GET /api/content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
	/// The immutable markdown document under review.
	pub content: String,
}

/// Added/removed line numbers for a single file in the working-tree diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
	/// 1-based line numbers present only in the new revision.
	pub added_lines: Vec<u32>,
	/// 1-based line numbers present only in the old revision.
	pub removed_lines: Vec<u32>,
}

/// Mapping from repository-relative path to its changed lines.
pub type DiffIndex = BTreeMap<String, FileDiff>;

/// Body of `GET /api/diff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResponse {
	/// Per-file changed-line index captured when the session was created.
	pub diff: DiffIndex,
}

/// Body of `GET /api/file?path=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
	/// Full file text.
	pub content: String,
	/// Syntax-highlighting language inferred from the extension.
	pub language: String,
	/// Number of lines in `content`.
	pub lines: usize,
	/// Path relative to the session root, for display.
	pub path: String,
	/// Canonical absolute path that was read.
	pub absolute_path: String,
}

/// Body of `GET /api/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
	/// The theme the UI should render with.
	pub theme: Theme,
	/// All selectable theme names, sorted.
	pub available_themes: Vec<String>,
}

/// Success body of `POST /api/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
	/// Always `"ok"` for an accepted submission.
	pub status: String,
}

impl SubmitAck {
	pub fn ok() -> Self {
		Self { status: "ok".into() }
	}
}

/// Error body returned by gateway endpoints (4xx/5xx).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Human-readable error description.
	pub error: String,
}

impl ErrorBody {
	pub fn new(message: impl Into<String>) -> Self {
		Self { error: message.into() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn diff_response_serializes_per_file_line_sets() {
		let mut diff = DiffIndex::new();
		diff.insert(
			"src/lib.rs".into(),
			FileDiff { added_lines: vec![3, 4], removed_lines: vec![7] },
		);

		let json = serde_json::to_string(&DiffResponse { diff }).unwrap();
		assert!(json.contains(r#""src/lib.rs""#));
		assert!(json.contains(r#""added_lines":[3,4]"#));
		assert!(json.contains(r#""removed_lines":[7]"#));
	}

	#[test]
	fn submit_ack_status_is_ok() {
		let json = serde_json::to_string(&SubmitAck::ok()).unwrap();
		assert_eq!(json, r#"{"status":"ok"}"#);
	}

	#[test]
	fn error_body_round_trips() {
		let body = ErrorBody::new("File not found");
		let json = serde_json::to_string(&body).unwrap();
		let back: ErrorBody = serde_json::from_str(&json).unwrap();
		assert_eq!(back.error, "File not found");
	}
}
