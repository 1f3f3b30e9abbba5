//! Path sanitizer: hierarchical token paths to flat identifiers.
//!
//! The first path element is the group. Group rules decide which leading segments
//! survive, then every remaining segment is normalized on its own.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("static pattern"));

/// Normalize one segment: trim, collapse non-alphanumeric runs into `-`,
/// strip edge hyphens, lowercase. May return an empty string.
pub fn sanitize_segment(segment: &str) -> String {
    let replaced = NON_ALPHANUMERIC.replace_all(segment.trim(), "-");
    replaced.trim_matches('-').to_lowercase()
}

/// Apply group rewriting and segment sanitization to a full path.
///
/// - `Primitives`: group dropped, plus a directly following `colors`.
/// - `Responsive/Desktop` / `Responsive/Mobile`: group replaced by `desktop` / `mobile`.
/// - anything else: group dropped.
pub fn sanitize(path: &[String]) -> Vec<String> {
    let Some((group, rest)) = path.split_first() else {
        return Vec::new();
    };

    let (prefix, kept): (Option<&str>, &[String]) = match group.as_str() {
        "Primitives" => match rest.split_first() {
            Some((first, tail)) if first == "colors" => (None, tail),
            _ => (None, rest),
        },
        "Responsive/Desktop" => (Some("desktop"), rest),
        "Responsive/Mobile" => (Some("mobile"), rest),
        _ => (None, rest),
    };

    prefix
        .map(str::to_string)
        .into_iter()
        .chain(kept.iter().map(|segment| sanitize_segment(segment)))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Hyphen-joined display name for a path; empty when nothing survives.
pub fn build_name(path: &[String]) -> String {
    sanitize(path).join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_segment_normalization() {
        assert_eq!(sanitize_segment("  Body Large "), "body-large");
        assert_eq!(sanitize_segment("--teal__500--"), "teal-500");
        assert_eq!(sanitize_segment("H1 / Bold"), "h1-bold");
        assert_eq!(sanitize_segment("***"), "");
    }

    #[test]
    fn test_primitives_drops_colors() {
        let out = sanitize(&path(&["Primitives", "colors", "brand", "teal-500"]));
        assert_eq!(out, vec!["brand", "teal-500"]);
    }

    #[test]
    fn test_primitives_keeps_other_children() {
        let out = sanitize(&path(&["Primitives", "radius", "sm"]));
        assert_eq!(out, vec!["radius", "sm"]);
    }

    #[test]
    fn test_colors_only_dropped_directly_after_primitives() {
        let out = sanitize(&path(&["Primitives", "brand", "colors"]));
        assert_eq!(out, vec!["brand", "colors"]);
    }

    #[test]
    fn test_responsive_prefixes() {
        let desktop = sanitize(&path(&["Responsive/Desktop", "typescale", "body"]));
        assert_eq!(desktop, vec!["desktop", "typescale", "body"]);
        let mobile = sanitize(&path(&["Responsive/Mobile", "Section Padding", "XL"]));
        assert_eq!(mobile, vec!["mobile", "section-padding", "xl"]);
    }

    #[test]
    fn test_other_groups_drop_group_only() {
        assert_eq!(
            build_name(&path(&["Numeric Tokens", "spacing", "sm"])),
            "spacing-sm"
        );
        assert_eq!(build_name(&path(&["Tokens", "spacing", "sm"])), "spacing-sm");
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert_eq!(build_name(&path(&["Tokens", "!!", "gap"])), "gap");
        assert_eq!(build_name(&path(&["Tokens"])), "");
        assert_eq!(build_name(&[]), "");
    }
}
