//! Session orchestration: port allocation, gateway lifecycle, and the
//! blocking wait that bridges an agent invocation to a browser submission.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use redpen_protocol::DiffIndex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ReviewDocument, ReviewOutcome, ReviewSession, SessionState};
use crate::browser;
use crate::error::Result;
use crate::gateway;
use crate::registry::PortRegistry;
use crate::theme;

/// Bound on how long a graceful gateway shutdown may take before the server
/// task is aborted outright.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Fully resolved request for creating a review session.
pub struct SessionRequest {
	/// Markdown document to present for review.
	pub document: String,
	/// Optional guidance describing what is being reviewed.
	pub context: Option<String>,
	/// Filesystem boundary for file requests from the browser.
	pub root: PathBuf,
	/// Changed-line index supplied by the diff collaborator.
	pub diff: DiffIndex,
	/// Theme name served to the UI.
	pub theme: String,
	/// Whether to open a browser window at the session URL.
	pub open_browser: bool,
}

impl SessionRequest {
	/// Builds a request with defaults: no context, empty diff, default
	/// theme, browser opening enabled.
	pub fn new(document: impl Into<String>, root: impl Into<PathBuf>) -> Self {
		Self {
			document: document.into(),
			context: None,
			root: root.into(),
			diff: DiffIndex::new(),
			theme: theme::DEFAULT_THEME_NAME.to_string(),
			open_browser: true,
		}
	}

	/// Sets the guidance context.
	pub fn with_context(mut self, context: Option<String>) -> Self {
		self.context = context;
		self
	}

	/// Sets the changed-line index.
	pub fn with_diff(mut self, diff: DiffIndex) -> Self {
		self.diff = diff;
		self
	}

	/// Sets the UI theme.
	pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
		self.theme = theme.into();
		self
	}

	/// Controls the best-effort browser launch (tests disable it).
	pub fn with_browser(mut self, open_browser: bool) -> Self {
		self.open_browser = open_browser;
		self
	}
}

/// Creates review sessions and owns the port registry they draw from.
///
/// Each broker instance is self-contained; nothing here is process-global,
/// so independent brokers can run side by side in tests.
#[derive(Debug, Default)]
pub struct SessionBroker {
	registry: Arc<PortRegistry>,
}

impl SessionBroker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry of live session ports, shared with every handle this broker
	/// creates.
	pub fn registry(&self) -> &Arc<PortRegistry> {
		&self.registry
	}

	/// Creates a session in `Serving` state: binds an OS-assigned loopback
	/// port, starts the per-session gateway, and best-effort opens a
	/// browser at the session URL.
	///
	/// Port exhaustion is fatal and surfaces as
	/// [`RedpenError::PortAllocation`](crate::RedpenError::PortAllocation);
	/// a failed browser launch only logs a warning, the session stays
	/// reachable by manual navigation.
	pub async fn create(&self, request: SessionRequest) -> Result<SessionHandle> {
		let (listener, port) = self.registry.allocate().await?;

		let (outcome_tx, outcome_rx) = oneshot::channel();
		let (shutdown_tx, shutdown_rx) = watch::channel(false);

		let session = Arc::new(ReviewSession::new(
			port,
			ReviewDocument { body: request.document, context: request.context },
			request.diff,
			request.root,
			request.theme,
			outcome_tx,
		));

		let server = tokio::spawn(gateway::serve(listener, Arc::clone(&session), shutdown_rx));
		session.advance(SessionState::Serving);

		info!(
			target = "redpen.session",
			id = %session.id(),
			port,
			"review session serving"
		);

		if request.open_browser {
			if let Err(err) = browser::open(&session.url()) {
				warn!(
					target = "redpen.session",
					id = %session.id(),
					error = %err,
					"could not open browser; navigate manually"
				);
			}
		}

		Ok(SessionHandle {
			session,
			outcome: Some(outcome_rx),
			shutdown: shutdown_tx,
			server: Some(server),
			registry: Arc::clone(&self.registry),
			closed: false,
		})
	}
}

/// Owning handle for one live review session.
///
/// The handle is the session's waiter and its cleanup authority: dropping it
/// before [`close`](Self::close) force-resolves the promise as `Cancelled`,
/// stops the listener, and releases the port, so an abandoned wait never
/// leaks its listener.
pub struct SessionHandle {
	session: Arc<ReviewSession>,
	outcome: Option<oneshot::Receiver<ReviewOutcome>>,
	shutdown: watch::Sender<bool>,
	server: Option<JoinHandle<()>>,
	registry: Arc<PortRegistry>,
	closed: bool,
}

impl SessionHandle {
	/// The session this handle owns.
	pub fn session(&self) -> &Arc<ReviewSession> {
		&self.session
	}

	/// Suspends until the session settles, the optional deadline elapses,
	/// or this future is dropped by a cancelled caller.
	///
	/// A fired deadline force-resolves the promise as `TimedOut` and then
	/// reads back whichever outcome actually won the race, so a submission
	/// arriving in the same instant is never lost. Waits on different
	/// sessions are fully independent.
	pub async fn wait(&mut self, deadline: Option<Duration>) -> ReviewOutcome {
		let Some(mut rx) = self.outcome.take() else {
			return ReviewOutcome::Failed("session already awaited".into());
		};

		if let Some(deadline) = deadline {
			match tokio::time::timeout(deadline, &mut rx).await {
				Ok(Ok(outcome)) => return outcome,
				Ok(Err(_)) => {
					return ReviewOutcome::Failed("session resolver disappeared".into());
				}
				Err(_) => {
					// Deadline fired. A submission racing this settle still
					// wins; the channel read below is authoritative either way.
					self.session.resolve(ReviewOutcome::TimedOut);
				}
			}
		}

		match rx.await {
			Ok(outcome) => outcome,
			// Sender gone without a settle: the session state was torn down
			// from under us.
			Err(_) => ReviewOutcome::Failed("session resolver disappeared".into()),
		}
	}

	/// Stops the listener, releases the port, and advances the session to
	/// `Closed`. Called once, after [`wait`](Self::wait) returns, whatever
	/// the outcome was.
	pub async fn close(mut self) {
		// An unsettled session reaching close was abandoned by its caller.
		self.session.resolve(ReviewOutcome::Cancelled);

		let _ = self.shutdown.send(true);
		if let Some(mut server) = self.server.take() {
			if tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await.is_err() {
				server.abort();
				debug!(
					target = "redpen.session",
					id = %self.session.id(),
					"gateway did not stop in time; aborted"
				);
			}
		}

		self.registry.release(self.session.port());
		self.session.advance(SessionState::Closed);
		self.closed = true;

		info!(
			target = "redpen.session",
			id = %self.session.id(),
			port = self.session.port(),
			"review session closed"
		);
	}
}

impl Drop for SessionHandle {
	fn drop(&mut self) {
		if self.closed {
			return;
		}

		// The caller's context was torn down (or close was never reached):
		// settle the promise, stop the listener, free the port. All of this
		// is synchronous so cleanup is bounded even without an executor.
		self.session.resolve(ReviewOutcome::Cancelled);
		let _ = self.shutdown.send(true);
		if let Some(server) = self.server.take() {
			server.abort();
		}
		self.registry.release(self.session.port());
		self.session.advance(SessionState::Closed);

		debug!(
			target = "redpen.session",
			id = %self.session.id(),
			port = self.session.port(),
			"review session dropped before close; cleaned up"
		);
	}
}
