//! Owned registry of ports bound by live review sessions.
//!
//! Dynamic OS-assigned ports (bind to port 0, read back the assignment)
//! let concurrent sessions coexist without a fixed-port collision. The
//! registry is an explicit object held by the broker rather than ambient
//! global state, so independent brokers can be exercised in isolation.

use std::collections::HashSet;
use std::net::SocketAddr;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tracing::debug;

use crate::error::{RedpenError, Result};

/// Bind retries before port allocation is reported as fatal.
const MAX_BIND_ATTEMPTS: u32 = 4;

/// Tracks the loopback ports currently held by live sessions.
///
/// The interior lock is held only across insert/remove, never across an
/// await point; port allocation itself happens outside the lock.
#[derive(Debug, Default)]
pub struct PortRegistry {
	ports: Mutex<HashSet<u16>>,
}

impl PortRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds a loopback listener on an OS-assigned port and registers it.
	///
	/// The listener is returned still bound, so the port cannot be taken by
	/// another process between allocation and gateway startup. Bind failures
	/// are retried up to [`MAX_BIND_ATTEMPTS`] times before giving up with
	/// [`RedpenError::PortAllocation`].
	pub async fn allocate(&self) -> Result<(TcpListener, u16)> {
		let mut last_err = None;

		for attempt in 1..=MAX_BIND_ATTEMPTS {
			match TcpListener::bind(("127.0.0.1", 0)).await {
				Ok(listener) => {
					let port = listener.local_addr().map(|addr: SocketAddr| addr.port())?;
					let inserted = self.ports.lock().insert(port);
					if !inserted {
						// The OS handed out a port we still consider live;
						// a stale entry means a session leaked its release.
						drop(listener);
						last_err = Some(std::io::Error::other(format!(
							"port {port} already registered"
						)));
						continue;
					}
					debug!(target = "redpen.session", port, attempt, "allocated session port");
					return Ok((listener, port));
				}
				Err(err) => {
					debug!(
						target = "redpen.session",
						attempt,
						error = %err,
						"port bind failed; retrying"
					);
					last_err = Some(err);
				}
			}
		}

		Err(RedpenError::PortAllocation {
			attempts: MAX_BIND_ATTEMPTS,
			source: last_err.unwrap_or_else(|| std::io::Error::other("no bind attempt made")),
		})
	}

	/// Releases a port previously handed out by [`allocate`](Self::allocate).
	/// Releasing an unknown port is a no-op.
	pub fn release(&self, port: u16) {
		if self.ports.lock().remove(&port) {
			debug!(target = "redpen.session", port, "released session port");
		}
	}

	/// True when `port` is currently held by a live session.
	pub fn contains(&self, port: u16) -> bool {
		self.ports.lock().contains(&port)
	}

	/// Number of ports currently held.
	pub fn len(&self) -> usize {
		self.ports.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.ports.lock().is_empty()
	}
}
