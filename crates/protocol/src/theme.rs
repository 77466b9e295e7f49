//! Presentation theme wire format served by `GET /api/config`.

use serde::{Deserialize, Serialize};

/// A complete UI theme definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
	/// Registry key, lowercase (e.g. `"dark"`).
	pub name: String,
	/// One-line description shown by `--list-themes`.
	pub description: String,
	/// CSS custom-property values the UI applies verbatim.
	pub colors: ThemeColors,
}

/// Color set for a theme. Every field maps to one CSS custom property;
/// the browser client assumes all of them are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
	pub bg_page: String,
	pub bg_card: String,
	pub bg_card_hover: String,
	pub bg_input: String,
	pub bg_code: String,
	pub bg_highlight: String,
	pub bg_highlight_hover: String,

	pub text_primary: String,
	pub text_secondary: String,
	pub text_muted: String,
	pub text_inverse: String,

	pub accent_primary: String,
	pub accent_primary_hover: String,
	pub accent_secondary: String,
	pub accent_success: String,
	pub accent_error: String,
	pub accent_warning: String,

	pub border_default: String,
	pub border_light: String,
	pub border_accent: String,

	pub shadow_sm: String,
	pub shadow_md: String,
	pub shadow_lg: String,
}
