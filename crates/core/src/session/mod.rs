//! Review session state, outcome types, and the resolve-once promise.

mod broker;

use std::path::PathBuf;

use parking_lot::Mutex;
use redpen_protocol::{DiffIndex, ReviewFeedback};
use tokio::sync::oneshot;
use tracing::debug;

pub use broker::{SessionBroker, SessionHandle, SessionRequest};

/// Session lifecycle states. Transitions are monotonic; a session never
/// moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
	/// Allocated but not yet listening.
	Created,
	/// Gateway is accepting browser requests.
	Serving,
	/// The promise has a writer; the outcome is being delivered.
	Resolving,
	/// Listener stopped, port released.
	Closed,
}

/// How a review session settled. Delivered through the session promise to
/// exactly one waiter.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
	/// The human submitted feedback; the first submission wins.
	Submitted(ReviewFeedback),
	/// The waiting caller's context was torn down.
	Cancelled,
	/// The wait deadline elapsed.
	TimedOut,
	/// The session lost its ability to ever resolve (listener died,
	/// internal error); the waiter must not be stranded.
	Failed(String),
}

/// Document handed over for review, immutable for the session's lifetime.
#[derive(Debug, Clone)]
pub struct ReviewDocument {
	/// Markdown body shown in the review UI.
	pub body: String,
	/// Optional guidance describing what is being reviewed.
	pub context: Option<String>,
}

/// One document-review round-trip: a unique id, an exclusive loopback port,
/// the immutable review inputs, and a one-shot promise that is written at
/// most once.
pub struct ReviewSession {
	id: String,
	port: u16,
	document: ReviewDocument,
	diff: DiffIndex,
	root: PathBuf,
	theme: String,
	state: Mutex<SessionState>,
	resolver: Mutex<Option<oneshot::Sender<ReviewOutcome>>>,
}

impl ReviewSession {
	pub(crate) fn new(
		port: u16,
		document: ReviewDocument,
		diff: DiffIndex,
		root: PathBuf,
		theme: String,
		resolver: oneshot::Sender<ReviewOutcome>,
	) -> Self {
		Self {
			id: uuid::Uuid::new_v4().to_string(),
			port,
			document,
			diff,
			root,
			theme,
			state: Mutex::new(SessionState::Created),
			resolver: Mutex::new(Some(resolver)),
		}
	}

	/// Opaque unique session identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Loopback port this session's gateway is bound to.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Local URL of the review UI.
	pub fn url(&self) -> String {
		format!("http://127.0.0.1:{}/", self.port)
	}

	/// The document under review.
	pub fn document(&self) -> &ReviewDocument {
		&self.document
	}

	/// Changed-line index captured at session creation.
	pub fn diff(&self) -> &DiffIndex {
		&self.diff
	}

	/// Filesystem boundary for `/api/file` requests.
	pub fn root(&self) -> &std::path::Path {
		&self.root
	}

	/// Theme name served by `/api/config`.
	pub fn theme(&self) -> &str {
		&self.theme
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SessionState {
		*self.state.lock()
	}

	/// Advances the lifecycle state. Regressions are ignored, keeping the
	/// state machine monotonic under racing callers.
	pub(crate) fn advance(&self, next: SessionState) {
		let mut state = self.state.lock();
		if next > *state {
			*state = next;
		}
	}

	/// Fulfills the session promise. First writer wins: the call that takes
	/// the sender returns `true`; every later call observes an already-taken
	/// sender, has no effect, and returns `false`.
	///
	/// The mutex is scoped to this session alone, so resolution of one
	/// session never contends with another.
	pub fn resolve(&self, outcome: ReviewOutcome) -> bool {
		let Some(sender) = self.resolver.lock().take() else {
			debug!(
				target = "redpen.session",
				id = %self.id,
				"resolve after settle ignored"
			);
			return false;
		};

		self.advance(SessionState::Resolving);
		// The receiver can only be gone when the waiter was dropped; the
		// outcome is then moot and the settle still counts.
		let _ = sender.send(outcome);
		true
	}

	/// True when the promise has already been written.
	pub fn is_settled(&self) -> bool {
		self.resolver.lock().is_none()
	}
}

impl std::fmt::Debug for ReviewSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReviewSession")
			.field("id", &self.id)
			.field("port", &self.port)
			.field("state", &self.state())
			.field("settled", &self.is_settled())
			.finish()
	}
}
