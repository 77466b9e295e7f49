//! Root-confined file reads for the code viewer.
//!
//! Every request is resolved against the session root and canonicalized
//! before any bytes are read; `../` segments, absolute-path overrides, and
//! symlinks that point outside the root are all rejected with a distinct
//! error. This check is security-critical, not cosmetic: the gateway is the
//! only thing standing between the browser and the filesystem.

use std::path::{Path, PathBuf};

use redpen_protocol::FileResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileReadError {
	#[error("access denied: path outside session root: {}", path.display())]
	Traversal { path: PathBuf },

	#[error("file not found: {}", path.display())]
	NotFound { path: PathBuf },

	#[error("not a file: {}", path.display())]
	NotAFile { path: PathBuf },

	#[error("binary file cannot be displayed: {}", path.display())]
	Binary { path: PathBuf },

	#[error("error reading file: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Reads `requested` (relative to `root`, or absolute-but-inside-root) and
/// packages it for the code viewer.
pub fn read_file(root: &Path, requested: &str) -> Result<FileResponse, FileReadError> {
	let root = root.canonicalize().map_err(|source| FileReadError::Io {
		path: root.to_path_buf(),
		source,
	})?;

	let requested_path = Path::new(requested);
	let candidate = if requested_path.is_absolute() {
		requested_path.to_path_buf()
	} else {
		root.join(requested_path)
	};

	// Canonicalize before the containment check so `..` segments and
	// symlink targets are compared, not the spelled path.
	let resolved = match candidate.canonicalize() {
		Ok(path) => path,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
			// Don't leak whether the target exists when the spelled path
			// already escapes the root.
			if path_escapes(&root, &candidate) {
				return Err(FileReadError::Traversal { path: candidate });
			}
			return Err(FileReadError::NotFound { path: candidate });
		}
		Err(source) => return Err(FileReadError::Io { path: candidate, source }),
	};

	if !resolved.starts_with(&root) {
		return Err(FileReadError::Traversal { path: resolved });
	}

	if !resolved.is_file() {
		return Err(FileReadError::NotAFile { path: resolved });
	}

	let bytes = std::fs::read(&resolved).map_err(|source| FileReadError::Io {
		path: resolved.clone(),
		source,
	})?;
	let content = String::from_utf8(bytes)
		.map_err(|_| FileReadError::Binary { path: resolved.clone() })?;

	let lines = content.lines().count();
	let language = language_for(&resolved);
	let display_path = resolved
		.strip_prefix(&root)
		.unwrap_or(&resolved)
		.display()
		.to_string();

	Ok(FileResponse {
		content,
		language,
		lines,
		path: display_path,
		absolute_path: resolved.display().to_string(),
	})
}

/// Lexical escape check for paths that cannot be canonicalized (missing
/// target): walks `..` components against the root prefix.
fn path_escapes(root: &Path, candidate: &Path) -> bool {
	let mut normalized = PathBuf::new();
	for component in candidate.components() {
		match component {
			std::path::Component::ParentDir => {
				if !normalized.pop() {
					return true;
				}
			}
			std::path::Component::CurDir => {}
			other => normalized.push(other),
		}
	}
	!normalized.starts_with(root)
}

/// Syntax-highlighting language for the code viewer, keyed by extension.
fn language_for(path: &Path) -> String {
	let ext = path
		.extension()
		.and_then(|ext| ext.to_str())
		.map(str::to_lowercase)
		.unwrap_or_default();

	let language = match ext.as_str() {
		"py" => "python",
		"js" => "javascript",
		"jsx" => "jsx",
		"ts" => "typescript",
		"tsx" => "tsx",
		"rs" => "rust",
		"go" => "go",
		"java" => "java",
		"c" | "h" => "c",
		"cpp" | "hpp" => "cpp",
		"css" => "css",
		"html" => "html",
		"json" => "json",
		"yaml" | "yml" => "yaml",
		"md" => "markdown",
		"sh" => "bash",
		"sql" => "sql",
		"rb" => "ruby",
		"php" => "php",
		"swift" => "swift",
		"kt" => "kotlin",
		"scala" => "scala",
		"toml" => "toml",
		_ => "text",
	};
	language.to_string()
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	#[test]
	fn reads_relative_file_with_language_and_line_count() {
		let dir = tempdir().unwrap();
		fs::create_dir(dir.path().join("src")).unwrap();
		fs::write(dir.path().join("src/main.rs"), "fn main() {\n}\n").unwrap();

		let response = read_file(dir.path(), "src/main.rs").unwrap();
		assert_eq!(response.language, "rust");
		assert_eq!(response.lines, 2);
		assert!(response.path.ends_with("main.rs"));
		assert!(response.content.starts_with("fn main"));
	}

	#[test]
	fn rejects_parent_dir_traversal() {
		let dir = tempdir().unwrap();
		let secret_dir = tempdir().unwrap();
		fs::write(secret_dir.path().join("secret.txt"), "top secret").unwrap();

		let escape = format!(
			"../{}/secret.txt",
			secret_dir.path().file_name().unwrap().to_str().unwrap()
		);
		let err = read_file(dir.path(), &escape).unwrap_err();
		assert!(matches!(err, FileReadError::Traversal { .. }));
	}

	#[test]
	fn rejects_absolute_path_outside_root() {
		let dir = tempdir().unwrap();
		let outside = tempdir().unwrap();
		fs::write(outside.path().join("etc.txt"), "nope").unwrap();

		let absolute = outside.path().join("etc.txt");
		let err = read_file(dir.path(), absolute.to_str().unwrap()).unwrap_err();
		assert!(matches!(err, FileReadError::Traversal { .. }));
	}

	#[cfg(unix)]
	#[test]
	fn rejects_symlink_escaping_root() {
		let dir = tempdir().unwrap();
		let outside = tempdir().unwrap();
		fs::write(outside.path().join("target.txt"), "outside").unwrap();
		std::os::unix::fs::symlink(
			outside.path().join("target.txt"),
			dir.path().join("link.txt"),
		)
		.unwrap();

		let err = read_file(dir.path(), "link.txt").unwrap_err();
		assert!(matches!(err, FileReadError::Traversal { .. }));
	}

	#[test]
	fn missing_file_is_not_found() {
		let dir = tempdir().unwrap();
		let err = read_file(dir.path(), "nope.txt").unwrap_err();
		assert!(matches!(err, FileReadError::NotFound { .. }));
	}

	#[test]
	fn directory_is_not_a_file() {
		let dir = tempdir().unwrap();
		fs::create_dir(dir.path().join("sub")).unwrap();
		let err = read_file(dir.path(), "sub").unwrap_err();
		assert!(matches!(err, FileReadError::NotAFile { .. }));
	}

	#[test]
	fn binary_content_is_rejected() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("blob.bin"), [0u8, 159, 146, 150]).unwrap();
		let err = read_file(dir.path(), "blob.bin").unwrap_err();
		assert!(matches!(err, FileReadError::Binary { .. }));
	}

	#[test]
	fn unknown_extension_falls_back_to_text() {
		assert_eq!(language_for(Path::new("notes.xyz")), "text");
		assert_eq!(language_for(Path::new("Makefile")), "text");
		assert_eq!(language_for(Path::new("query.SQL")), "sql");
	}
}
