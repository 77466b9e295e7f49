//! Best-effort browser launching.
//!
//! Opening a window is a convenience, never a requirement: a failure here
//! must not fail the session, because the user can always navigate to the
//! printed URL by hand. Callers downgrade the returned error to a warning.

use std::process::{Command, Stdio};

use crate::error::{RedpenError, Result};

/// Spawns the platform opener for `url`, detached. Returns an error only to
/// be logged; the spawn is not waited on.
pub fn open(url: &str) -> Result<()> {
	let (program, args) = opener_command(url);

	Command::new(program)
		.args(&args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.spawn()
		.map(|_| ())
		.map_err(|err| RedpenError::BrowserLaunch(format!("{program}: {err}")))
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> (&'static str, Vec<String>) {
	("open", vec![url.to_string()])
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> (&'static str, Vec<String>) {
	("cmd", vec!["/C".into(), "start".into(), String::new(), url.to_string()])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> (&'static str, Vec<String>) {
	("xdg-open", vec![url.to_string()])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opener_command_carries_the_url() {
		let (_, args) = opener_command("http://127.0.0.1:40000/");
		assert!(args.iter().any(|arg| arg == "http://127.0.0.1:40000/"));
	}
}
