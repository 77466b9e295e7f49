use clap::{ArgAction, Parser};

/// Human-in-the-loop review server for AI agents (MCP over stdio).
#[derive(Debug, Parser)]
#[command(name = "redpen", version, about)]
pub struct Cli {
	/// UI theme to use.
	#[arg(short, long, value_name = "NAME", default_value = redpen::theme::DEFAULT_THEME_NAME)]
	pub theme: String,

	/// List available themes and exit.
	#[arg(long)]
	pub list_themes: bool,

	/// Increase log verbosity (-v info, -vv debug). Logs go to stderr;
	/// stdout carries the MCP stream.
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8,
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	#[test]
	fn defaults_select_the_dark_theme() {
		let cli = Cli::try_parse_from(["redpen"]).unwrap();
		assert_eq!(cli.theme, "dark");
		assert!(!cli.list_themes);
		assert_eq!(cli.verbose, 0);
	}

	#[test]
	fn theme_flag_accepts_short_and_long_forms() {
		let cli = Cli::try_parse_from(["redpen", "-t", "ocean"]).unwrap();
		assert_eq!(cli.theme, "ocean");
		let cli = Cli::try_parse_from(["redpen", "--theme", "minimal"]).unwrap();
		assert_eq!(cli.theme, "minimal");
	}

	#[test]
	fn verbosity_counts_repeated_flags() {
		let cli = Cli::try_parse_from(["redpen", "-vv"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}
}
