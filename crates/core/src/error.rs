use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedpenError>;

#[derive(Debug, Error)]
pub enum RedpenError {
	/// Bounded bind retries were exhausted; the session could not be created.
	#[error("port allocation failed after {attempts} attempts")]
	PortAllocation {
		attempts: u32,
		#[source]
		source: std::io::Error,
	},

	/// A file request resolved outside the session root. The request is
	/// rejected; the session continues.
	#[error("path escapes session root: {}", path.display())]
	PathTraversal { path: PathBuf },

	/// A submission arrived after the session already settled. The first
	/// submission stands; the session continues.
	#[error("review already completed")]
	DuplicateSubmission,

	/// The waiting caller's context was torn down before the review settled.
	#[error("review session cancelled")]
	Cancelled,

	/// The wait deadline elapsed before the review settled.
	#[error("review session timed out")]
	TimedOut,

	/// Browser could not be opened. Never propagated as a failure; callers
	/// downgrade this to a warning and the session stays reachable by
	/// manual navigation.
	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	/// Unexpected condition that terminates the session.
	#[error("internal error: {0}")]
	Internal(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl RedpenError {
	/// Stable machine-readable code carried in structured error responses.
	pub fn code(&self) -> &'static str {
		match self {
			RedpenError::PortAllocation { .. } => "PORT_ALLOCATION_ERROR",
			RedpenError::PathTraversal { .. } => "PATH_TRAVERSAL",
			RedpenError::DuplicateSubmission => "DUPLICATE_SUBMISSION",
			RedpenError::Cancelled => "CANCELLED",
			RedpenError::TimedOut => "TIMED_OUT",
			RedpenError::BrowserLaunch(_) => "BROWSER_LAUNCH_WARNING",
			RedpenError::Internal(_) => "INTERNAL_ERROR",
			RedpenError::Io(_) => "IO_ERROR",
			RedpenError::Json(_) => "INTERNAL_ERROR",
		}
	}
}
