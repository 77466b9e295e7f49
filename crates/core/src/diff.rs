//! Working-tree diff index for changed-line highlighting.
//!
//! Runs `git diff HEAD` in the session root and reduces the unified diff to
//! per-file added/removed line numbers. The review must still open when the
//! root is not a repository or git is absent, so every failure here degrades
//! to an empty index with a warning.

use std::path::Path;
use std::time::Duration;

use redpen_protocol::{DiffIndex, FileDiff};
use tokio::process::Command;
use tracing::warn;

/// Upper bound on the `git diff` subprocess; a hung git must not delay
/// session creation indefinitely.
const GIT_DIFF_TIMEOUT: Duration = Duration::from_secs(30);

/// Computes the changed-line index for `root`. Never fails: problems are
/// logged and an empty index is returned.
pub async fn working_tree_index(root: &Path) -> DiffIndex {
	let output = tokio::time::timeout(
		GIT_DIFF_TIMEOUT,
		Command::new("git")
			.args(["diff", "HEAD"])
			.current_dir(root)
			.kill_on_drop(true)
			.output(),
	)
	.await;

	let output = match output {
		Ok(Ok(output)) => output,
		Ok(Err(err)) => {
			warn!(target = "redpen.diff", error = %err, "git diff could not run");
			return DiffIndex::new();
		}
		Err(_) => {
			warn!(target = "redpen.diff", "git diff timed out");
			return DiffIndex::new();
		}
	};

	if !output.status.success() {
		warn!(
			target = "redpen.diff",
			status = %output.status,
			stderr = %String::from_utf8_lossy(&output.stderr).trim(),
			"git diff failed"
		);
		return DiffIndex::new();
	}

	parse_unified_diff(&String::from_utf8_lossy(&output.stdout))
}

/// Parses unified diff output into per-file line sets.
///
/// Added lines are numbered in the new revision, removed lines in the old
/// one, each hunk header resetting both counters.
pub fn parse_unified_diff(text: &str) -> DiffIndex {
	let mut index = DiffIndex::new();
	let mut current: Option<String> = None;
	let mut line_old: u32 = 0;
	let mut line_new: u32 = 0;

	for line in text.lines() {
		if let Some(path) = line.strip_prefix("+++ b/") {
			current = Some(path.to_string());
			index.entry(path.to_string()).or_insert_with(FileDiff::default);
		} else if line.starts_with("@@") {
			if let Some((old_start, new_start)) = parse_hunk_header(line) {
				line_old = old_start;
				line_new = new_start;
			}
		} else if let Some(file) = current.as_deref() {
			if line.starts_with("+++") || line.starts_with("---") {
				continue;
			}
			if let Some(entry) = index.get_mut(file) {
				if line.starts_with('+') {
					entry.added_lines.push(line_new);
					line_new += 1;
				} else if line.starts_with('-') {
					entry.removed_lines.push(line_old);
					line_old += 1;
				} else if !line.starts_with('\\') {
					line_old += 1;
					line_new += 1;
				}
			}
		}
	}

	index
}

/// Extracts `(old_start, new_start)` from a `@@ -a,b +c,d @@` hunk header.
fn parse_hunk_header(line: &str) -> Option<(u32, u32)> {
	let mut old_start = None;
	let mut new_start = None;

	for part in line.split(' ') {
		if let Some(range) = part.strip_prefix('-') {
			old_start = range.split(',').next()?.parse().ok();
		} else if let Some(range) = part.strip_prefix('+') {
			new_start = range.split(',').next()?.parse().ok();
		}
	}

	Some((old_start?, new_start?))
}
