//! Feedback payload types: what the human submits and what the agent receives.
//!
//! The submission schema is a documented input contract for the browser
//! client: every inline comment carries its anchoring context
//! ([`Comment::context_line`]) so highlights can be re-applied without
//! guessing. Legacy payloads that omit context are rejected at
//! deserialization time rather than silently accepted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overall comment synthesized when the reviewer submits with no inline
/// comments and no overall comment. Approval must always be unambiguous,
/// never an empty or missing string.
pub const APPROVAL_MARKER: &str = "LGTM (approved with no comments)";

/// Inline comment anchored to a quoted span of the review document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
	/// Client-generated identifier, unique within one submission.
	pub id: String,
	/// Exact text the reviewer highlighted.
	pub quote: String,
	/// Full line surrounding the quote, used to re-anchor the highlight.
	pub context_line: String,
	/// The reviewer's note.
	pub note: String,
	/// Unix timestamp (seconds) at which the comment was created.
	pub created_at: u64,
}

/// Comment anchored to a line range of a source file shown in the code viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CodeComment {
	/// Client-generated identifier, unique within one submission.
	pub id: String,
	/// Path relative to the session root, as served by `/api/file`.
	pub file_path: String,
	/// First annotated line (1-based, inclusive).
	pub line_start: u32,
	/// Last annotated line (1-based, inclusive).
	pub line_end: u32,
	/// Exact source text the reviewer highlighted.
	pub quote: String,
	/// The reviewer's note.
	pub note: String,
	/// Unix timestamp (seconds) at which the comment was created.
	pub created_at: u64,
}

/// Raw body of `POST /api/submit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSubmission {
	/// Inline document comments, in reviewer order.
	pub comments: Vec<Comment>,
	/// Code-viewer comments; absent in document-only reviews.
	#[serde(default)]
	pub code_comments: Vec<CodeComment>,
	/// Free-form summary comment, `null` when the reviewer left none.
	pub user_overall_comment: Option<String>,
}

impl ReviewSubmission {
	/// True when the submission carries no comments of any kind and no
	/// overall comment text.
	pub fn is_empty_approval(&self) -> bool {
		self.comments.is_empty()
			&& self.code_comments.is_empty()
			&& self.user_overall_comment.as_deref().is_none_or(|c| c.trim().is_empty())
	}

	/// Normalizes this submission into the feedback returned to the agent,
	/// synthesizing [`APPROVAL_MARKER`] for an empty approval.
	pub fn into_feedback(self) -> ReviewFeedback {
		let overall_comment = if self.is_empty_approval() {
			Some(APPROVAL_MARKER.to_string())
		} else {
			self.user_overall_comment.filter(|c| !c.trim().is_empty())
		};

		ReviewFeedback {
			comments: self.comments,
			code_comments: self.code_comments,
			overall_comment,
		}
	}
}

/// Normalized feedback delivered to the agent when a review settles.
///
/// Once observed by the adapter this value is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReviewFeedback {
	/// Inline document comments, unchanged from the submission.
	pub comments: Vec<Comment>,
	/// Code-viewer comments, unchanged from the submission.
	pub code_comments: Vec<CodeComment>,
	/// Overall comment; never `null`-with-no-comments thanks to the
	/// approval marker synthesis.
	pub overall_comment: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn comment(quote: &str, note: &str) -> Comment {
		Comment {
			id: "c-1".into(),
			quote: quote.into(),
			context_line: format!("line containing {quote}"),
			note: note.into(),
			created_at: 1_700_000_000,
		}
	}

	#[test]
	fn empty_submission_synthesizes_approval_marker() {
		let feedback = ReviewSubmission::default().into_feedback();
		assert_eq!(feedback.overall_comment.as_deref(), Some(APPROVAL_MARKER));
		assert!(feedback.comments.is_empty());
	}

	#[test]
	fn whitespace_overall_comment_counts_as_empty_approval() {
		let submission = ReviewSubmission {
			user_overall_comment: Some("   ".into()),
			..Default::default()
		};
		assert!(submission.is_empty_approval());
		let feedback = submission.into_feedback();
		assert_eq!(feedback.overall_comment.as_deref(), Some(APPROVAL_MARKER));
	}

	#[test]
	fn submission_with_comments_keeps_overall_comment_untouched() {
		let submission = ReviewSubmission {
			comments: vec![comment("foo", "bar")],
			code_comments: Vec::new(),
			user_overall_comment: None,
		};
		let feedback = submission.into_feedback();
		assert_eq!(feedback.overall_comment, None);
		assert_eq!(feedback.comments[0].quote, "foo");
		assert_eq!(feedback.comments[0].note, "bar");
	}

	#[test]
	fn code_comments_default_to_empty_when_absent() {
		let submission: ReviewSubmission = serde_json::from_str(
			r#"{"comments": [], "user_overall_comment": "done"}"#,
		)
		.unwrap();
		assert!(submission.code_comments.is_empty());
		assert_eq!(submission.user_overall_comment.as_deref(), Some("done"));
	}

	#[test]
	fn comment_without_context_line_is_rejected() {
		let result: Result<Comment, _> = serde_json::from_str(
			r#"{"id": "c-1", "quote": "foo", "note": "bar", "created_at": 0}"#,
		);
		assert!(result.is_err());
	}

	#[test]
	fn code_comment_round_trips_line_range() {
		let code = CodeComment {
			id: "cc-1".into(),
			file_path: "src/main.rs".into(),
			line_start: 100,
			line_end: 150,
			quote: "fn main() {}".into(),
			note: "needs refactoring".into(),
			created_at: 1_700_000_000,
		};
		let json = serde_json::to_string(&code).unwrap();
		let back: CodeComment = serde_json::from_str(&json).unwrap();
		assert_eq!(back.line_start, 100);
		assert_eq!(back.line_end, 150);
	}
}
