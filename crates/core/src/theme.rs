//! Built-in presentation themes.
//!
//! Pure data served by `GET /api/config` and listed by `--list-themes`.
//! To add a theme, write another constructor and register it in
//! [`registry`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use redpen_protocol::{Theme, ThemeColors};

use crate::error::{RedpenError, Result};

/// Theme used when none is selected.
pub const DEFAULT_THEME_NAME: &str = "dark";

static REGISTRY: LazyLock<BTreeMap<&'static str, Theme>> = LazyLock::new(registry);

fn registry() -> BTreeMap<&'static str, Theme> {
	BTreeMap::from([
		("clean", clean()),
		("dark", dark()),
		("forest", forest()),
		("ocean", ocean()),
		("sunset", sunset()),
		("minimal", minimal()),
	])
}

/// Looks up a theme by name, case-insensitively.
pub fn get(name: &str) -> Result<&'static Theme> {
	let key = name.to_lowercase();
	REGISTRY.get(key.as_str()).ok_or_else(|| {
		RedpenError::Internal(format!(
			"unknown theme '{name}'; available themes: {}",
			list().join(", ")
		))
	})
}

/// The theme behind [`DEFAULT_THEME_NAME`].
pub fn default_theme() -> &'static Theme {
	&REGISTRY[DEFAULT_THEME_NAME]
}

/// Sorted theme names.
pub fn list() -> Vec<String> {
	REGISTRY.keys().map(|name| name.to_string()).collect()
}

/// `(name, description)` pairs for `--list-themes` output, sorted by name.
pub fn descriptions() -> Vec<(String, String)> {
	REGISTRY
		.values()
		.map(|theme| (theme.name.clone(), theme.description.clone()))
		.collect()
}

fn theme(name: &str, description: &str, colors: ThemeColors) -> Theme {
	Theme { name: name.into(), description: description.into(), colors }
}

fn c(value: &str) -> String {
	value.into()
}

/// Professional blue/gray.
fn clean() -> Theme {
	theme(
		"clean",
		"Clean professional theme with blue accents",
		ThemeColors {
			bg_page: c("#f9fafb"),
			bg_card: c("#ffffff"),
			bg_card_hover: c("#f3f4f6"),
			bg_input: c("#ffffff"),
			bg_code: c("#f3f4f6"),
			bg_highlight: c("#fef08a"),
			bg_highlight_hover: c("#fde047"),
			text_primary: c("#111827"),
			text_secondary: c("#4b5563"),
			text_muted: c("#9ca3af"),
			text_inverse: c("#ffffff"),
			accent_primary: c("#2563eb"),
			accent_primary_hover: c("#1d4ed8"),
			accent_secondary: c("#6b7280"),
			accent_success: c("#22c55e"),
			accent_error: c("#ef4444"),
			accent_warning: c("#f59e0b"),
			border_default: c("#e5e7eb"),
			border_light: c("#f3f4f6"),
			border_accent: c("#3b82f6"),
			shadow_sm: c("0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
			shadow_md: c("0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
			shadow_lg: c("0 10px 15px -3px rgba(0, 0, 0, 0.1)"),
		},
	)
}

/// Modern dark mode.
fn dark() -> Theme {
	theme(
		"dark",
		"Modern dark theme for low-light environments",
		ThemeColors {
			bg_page: c("#0f172a"),
			bg_card: c("#1e293b"),
			bg_card_hover: c("#334155"),
			bg_input: c("#1e293b"),
			bg_code: c("#0f172a"),
			bg_highlight: c("#854d0e"),
			bg_highlight_hover: c("#a16207"),
			text_primary: c("#f1f5f9"),
			text_secondary: c("#cbd5e1"),
			text_muted: c("#64748b"),
			text_inverse: c("#0f172a"),
			accent_primary: c("#3b82f6"),
			accent_primary_hover: c("#60a5fa"),
			accent_secondary: c("#94a3b8"),
			accent_success: c("#4ade80"),
			accent_error: c("#f87171"),
			accent_warning: c("#fbbf24"),
			border_default: c("#334155"),
			border_light: c("#1e293b"),
			border_accent: c("#3b82f6"),
			shadow_sm: c("0 1px 2px 0 rgba(0, 0, 0, 0.3)"),
			shadow_md: c("0 4px 6px -1px rgba(0, 0, 0, 0.4)"),
			shadow_lg: c("0 10px 15px -3px rgba(0, 0, 0, 0.5)"),
		},
	)
}

/// Nature-inspired greens.
fn forest() -> Theme {
	theme(
		"forest",
		"Nature-inspired theme with earthy green tones",
		ThemeColors {
			bg_page: c("#f0fdf4"),
			bg_card: c("#ffffff"),
			bg_card_hover: c("#dcfce7"),
			bg_input: c("#ffffff"),
			bg_code: c("#f0fdf4"),
			bg_highlight: c("#bbf7d0"),
			bg_highlight_hover: c("#86efac"),
			text_primary: c("#14532d"),
			text_secondary: c("#166534"),
			text_muted: c("#4ade80"),
			text_inverse: c("#ffffff"),
			accent_primary: c("#16a34a"),
			accent_primary_hover: c("#15803d"),
			accent_secondary: c("#65a30d"),
			accent_success: c("#22c55e"),
			accent_error: c("#dc2626"),
			accent_warning: c("#ca8a04"),
			border_default: c("#bbf7d0"),
			border_light: c("#dcfce7"),
			border_accent: c("#22c55e"),
			shadow_sm: c("0 1px 2px 0 rgba(20, 83, 45, 0.05)"),
			shadow_md: c("0 4px 6px -1px rgba(20, 83, 45, 0.1)"),
			shadow_lg: c("0 10px 15px -3px rgba(20, 83, 45, 0.1)"),
		},
	)
}

/// Cool blue/teal tones.
fn ocean() -> Theme {
	theme(
		"ocean",
		"Calm oceanic theme with blue and teal accents",
		ThemeColors {
			bg_page: c("#ecfeff"),
			bg_card: c("#ffffff"),
			bg_card_hover: c("#cffafe"),
			bg_input: c("#ffffff"),
			bg_code: c("#ecfeff"),
			bg_highlight: c("#a5f3fc"),
			bg_highlight_hover: c("#67e8f9"),
			text_primary: c("#164e63"),
			text_secondary: c("#0e7490"),
			text_muted: c("#06b6d4"),
			text_inverse: c("#ffffff"),
			accent_primary: c("#0891b2"),
			accent_primary_hover: c("#0e7490"),
			accent_secondary: c("#0d9488"),
			accent_success: c("#14b8a6"),
			accent_error: c("#e11d48"),
			accent_warning: c("#d97706"),
			border_default: c("#a5f3fc"),
			border_light: c("#cffafe"),
			border_accent: c("#06b6d4"),
			shadow_sm: c("0 1px 2px 0 rgba(22, 78, 99, 0.05)"),
			shadow_md: c("0 4px 6px -1px rgba(22, 78, 99, 0.1)"),
			shadow_lg: c("0 10px 15px -3px rgba(22, 78, 99, 0.1)"),
		},
	)
}

/// Warm orange/amber tones.
fn sunset() -> Theme {
	theme(
		"sunset",
		"Warm sunset theme with orange and amber tones",
		ThemeColors {
			bg_page: c("#fffbeb"),
			bg_card: c("#ffffff"),
			bg_card_hover: c("#fef3c7"),
			bg_input: c("#ffffff"),
			bg_code: c("#fffbeb"),
			bg_highlight: c("#fde68a"),
			bg_highlight_hover: c("#fcd34d"),
			text_primary: c("#78350f"),
			text_secondary: c("#92400e"),
			text_muted: c("#d97706"),
			text_inverse: c("#ffffff"),
			accent_primary: c("#ea580c"),
			accent_primary_hover: c("#c2410c"),
			accent_secondary: c("#dc2626"),
			accent_success: c("#65a30d"),
			accent_error: c("#dc2626"),
			accent_warning: c("#f59e0b"),
			border_default: c("#fed7aa"),
			border_light: c("#fef3c7"),
			border_accent: c("#f97316"),
			shadow_sm: c("0 1px 2px 0 rgba(120, 53, 15, 0.05)"),
			shadow_md: c("0 4px 6px -1px rgba(120, 53, 15, 0.1)"),
			shadow_lg: c("0 10px 15px -3px rgba(120, 53, 15, 0.1)"),
		},
	)
}

/// Ultra-clean with subtle contrasts.
fn minimal() -> Theme {
	theme(
		"minimal",
		"Ultra-clean minimal theme with subtle contrasts",
		ThemeColors {
			bg_page: c("#fafafa"),
			bg_card: c("#ffffff"),
			bg_card_hover: c("#f5f5f5"),
			bg_input: c("#ffffff"),
			bg_code: c("#fafafa"),
			bg_highlight: c("#e5e5e5"),
			bg_highlight_hover: c("#d4d4d4"),
			text_primary: c("#171717"),
			text_secondary: c("#525252"),
			text_muted: c("#a3a3a3"),
			text_inverse: c("#ffffff"),
			accent_primary: c("#171717"),
			accent_primary_hover: c("#404040"),
			accent_secondary: c("#737373"),
			accent_success: c("#22c55e"),
			accent_error: c("#ef4444"),
			accent_warning: c("#f59e0b"),
			border_default: c("#e5e5e5"),
			border_light: c("#f5f5f5"),
			border_accent: c("#171717"),
			shadow_sm: c("0 1px 2px 0 rgba(0, 0, 0, 0.03)"),
			shadow_md: c("0 4px 6px -1px rgba(0, 0, 0, 0.05)"),
			shadow_lg: c("0 10px 15px -3px rgba(0, 0, 0, 0.08)"),
		},
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn registry_has_six_themes_sorted() {
		let names = list();
		assert_eq!(names, vec!["clean", "dark", "forest", "minimal", "ocean", "sunset"]);
	}

	#[test]
	fn lookup_is_case_insensitive() {
		assert_eq!(get("DARK").unwrap(), get("Dark").unwrap());
		assert_eq!(get("dark").unwrap().colors.bg_page, "#0f172a");
	}

	#[test]
	fn unknown_theme_lists_available_names() {
		let err = get("nonexistent").unwrap_err();
		assert!(err.to_string().contains("unknown theme"));
		assert!(err.to_string().contains("ocean"));
	}

	#[test]
	fn default_theme_is_registered() {
		assert_eq!(default_theme().name, DEFAULT_THEME_NAME);
	}

	#[test]
	fn every_theme_names_itself_consistently() {
		for (key, theme) in REGISTRY.iter() {
			assert_eq!(*key, theme.name);
		}
	}

	#[test]
	fn descriptions_cover_all_themes() {
		let descriptions = descriptions();
		assert_eq!(descriptions.len(), 6);
		assert!(
			descriptions
				.iter()
				.any(|(name, desc)| name == "clean" && desc.contains("professional"))
		);
	}
}
