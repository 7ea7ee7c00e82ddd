//! ODF formatting properties → CSS declarations.
//!
//! Property bags hold raw attribute values (`fo:margin-left="0.5cm"`). This
//! module maps the subset that has a CSS counterpart, validates lengths and
//! optionally converts absolute lengths to pixels at 96 dpi.

use super::ToCss;
use super::properties::{Declaration, DeclarationList, Direction, Length, LineStyle, TextAlign};
use crate::source::PropertyBag;

/// Result of converting one property bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Converted {
    pub declarations: DeclarationList,
    /// BCP 47-ish language tag from `fo:language` / `fo:country`.
    pub lang: Option<String>,
    pub dir: Option<Direction>,
}

/// Properties copied with their value kept verbatim.
const PASS_THROUGH: &[(&str, &str)] = &[
    ("fo:font-weight", "font-weight"),
    ("fo:font-style", "font-style"),
    ("fo:font-variant", "font-variant"),
    ("fo:text-transform", "text-transform"),
    ("fo:color", "color"),
    ("fo:background-color", "background-color"),
    ("fo:text-shadow", "text-shadow"),
    ("fo:hyphenate", "hyphens"),
];

/// Properties whose value is a single length.
const LENGTHS: &[(&str, &str)] = &[
    ("fo:font-size", "font-size"),
    ("fo:margin", "margin"),
    ("fo:margin-top", "margin-top"),
    ("fo:margin-bottom", "margin-bottom"),
    ("fo:margin-left", "margin-left"),
    ("fo:margin-right", "margin-right"),
    ("fo:padding", "padding"),
    ("fo:padding-top", "padding-top"),
    ("fo:padding-bottom", "padding-bottom"),
    ("fo:padding-left", "padding-left"),
    ("fo:padding-right", "padding-right"),
    ("fo:text-indent", "text-indent"),
    ("fo:line-height", "line-height"),
    ("fo:letter-spacing", "letter-spacing"),
    ("style:width", "width"),
    ("style:column-width", "width"),
    ("fo:min-height", "min-height"),
];

/// Border shorthands: `<width> <style> <color>`.
const BORDERS: &[(&str, &str)] = &[
    ("fo:border", "border"),
    ("fo:border-top", "border-top"),
    ("fo:border-bottom", "border-bottom"),
    ("fo:border-left", "border-left"),
    ("fo:border-right", "border-right"),
];

/// Convert a property bag into CSS declarations plus language and direction.
pub fn convert_properties(bag: &PropertyBag, to_px: bool) -> Converted {
    let mut out = Converted::default();

    for &(odf, css) in PASS_THROUGH {
        if let Some(value) = bag.get(odf) {
            let value = match (odf, value) {
                ("fo:hyphenate", "true") => "auto",
                ("fo:hyphenate", _) => "manual",
                _ => value,
            };
            out.declarations.set(Declaration::new(css, value));
        }
    }

    for &(odf, css) in LENGTHS {
        let Some(value) = bag.get(odf) else {
            continue;
        };
        match convert_length(value, to_px) {
            Some(converted) => out.declarations.set(Declaration::new(css, converted)),
            None if value == "normal" && matches!(css, "line-height" | "letter-spacing") => {
                out.declarations.set(Declaration::new(css, "normal"));
            }
            None => log::warn!("dropping malformed length {}=\"{}\"", odf, value),
        }
    }

    // Relative widths win over absolute ones
    if let Some(rel) = bag.get("style:rel-width")
        && let Some(len) = Length::parse(rel)
    {
        out.declarations.set(Declaration::new("width", len.to_css_string()));
    }

    for &(odf, css) in BORDERS {
        if let Some(value) = bag.get(odf) {
            out.declarations
                .set(Declaration::new(css, convert_border(value, to_px)));
        }
    }

    if let Some(name) = bag.get("style:font-name").or_else(|| bag.get("fo:font-family")) {
        let family = name.trim_matches(|c| c == '\'' || c == '"');
        out.declarations
            .set(Declaration::new("font-family", format!("'{}'", family)));
    }

    out.dir = bag
        .get("style:writing-mode")
        .and_then(Direction::from_writing_mode);

    if let Some(align) = bag.get("fo:text-align").and_then(TextAlign::from_odf) {
        let physical = align.physical(out.dir.unwrap_or_default());
        out.declarations
            .set(Declaration::new("text-align", physical.to_css_string()));
    }

    if let Some(decoration) = text_decoration(bag) {
        out.declarations
            .set(Declaration::new("text-decoration", decoration));
    }

    if let Some(position) = bag.get("style:text-position").and_then(vertical_align) {
        out.declarations
            .set(Declaration::new("vertical-align", position));
    }

    out.lang = language_tag(bag);
    out
}

fn convert_length(value: &str, to_px: bool) -> Option<String> {
    let len = Length::parse(value)?;
    let len = if to_px { len.to_px() } else { len };
    Some(len.to_css_string())
}

/// Convert the length token of a border shorthand, keep the rest.
fn convert_border(value: &str, to_px: bool) -> String {
    value
        .split_whitespace()
        .map(|token| match Length::parse(token) {
            Some(len) if to_px => len.to_px().to_css_string(),
            Some(len) => len.to_css_string(),
            None => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_decoration(bag: &PropertyBag) -> Option<String> {
    let mut lines = Vec::new();
    let active = |name: &str| {
        bag.get(name)
            .and_then(LineStyle::from_odf)
            .is_some_and(|s| s != LineStyle::None)
    };
    if active("style:text-underline-style") {
        lines.push("underline");
    }
    if active("style:text-overline-style") {
        lines.push("overline");
    }
    if active("style:text-line-through-style") {
        lines.push("line-through");
    }
    if lines.is_empty() {
        // Explicit "none" on an automatic style must override an inherited line
        let explicit_none = ["style:text-underline-style", "style:text-line-through-style"]
            .iter()
            .any(|n| bag.get(n) == Some("none"));
        return explicit_none.then(|| "none".to_string());
    }
    Some(lines.join(" "))
}

/// `style:text-position` is `super|sub|<percent> [<scale>]`.
fn vertical_align(value: &str) -> Option<&'static str> {
    let first = value.split_whitespace().next()?;
    match first {
        "super" => Some("super"),
        "sub" => Some("sub"),
        other => {
            let percent: f32 = other.strip_suffix('%')?.parse().ok()?;
            Some(if percent > 0.0 {
                "super"
            } else if percent < 0.0 {
                "sub"
            } else {
                "baseline"
            })
        }
    }
}

fn language_tag(bag: &PropertyBag) -> Option<String> {
    let language = bag.get("fo:language")?;
    if language == "none" || language == "zxx" {
        return None;
    }
    match bag.get("fo:country") {
        Some(country) if country != "none" => Some(format!("{}-{}", language, country)),
        _ => Some(language.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_mapping() {
        let bag = PropertyBag::new()
            .with("fo:font-weight", "bold")
            .with("fo:margin-left", "1in")
            .with("fo:text-align", "end")
            .with("style:font-name", "Liberation Serif");
        let out = convert_properties(&bag, true);
        assert_eq!(out.declarations.get("font-weight"), Some("bold"));
        assert_eq!(out.declarations.get("margin-left"), Some("96px"));
        assert_eq!(out.declarations.get("text-align"), Some("right"));
        assert_eq!(
            out.declarations.get("font-family"),
            Some("'Liberation Serif'")
        );
    }

    #[test]
    fn test_malformed_length_dropped() {
        let bag = PropertyBag::new().with("fo:margin-top", "lots");
        let out = convert_properties(&bag, false);
        assert!(out.declarations.is_empty());
    }

    #[test]
    fn test_decoration_and_position() {
        let bag = PropertyBag::new()
            .with("style:text-underline-style", "solid")
            .with("style:text-line-through-style", "solid")
            .with("style:text-position", "-33% 58%");
        let out = convert_properties(&bag, false);
        assert_eq!(
            out.declarations.get("text-decoration"),
            Some("underline line-through")
        );
        assert_eq!(out.declarations.get("vertical-align"), Some("sub"));
    }

    #[test]
    fn test_language_and_direction() {
        let bag = PropertyBag::new()
            .with("fo:language", "ar")
            .with("fo:country", "EG")
            .with("style:writing-mode", "rl-tb")
            .with("fo:text-align", "start");
        let out = convert_properties(&bag, false);
        assert_eq!(out.lang.as_deref(), Some("ar-EG"));
        assert_eq!(out.dir, Some(Direction::Rtl));
        assert_eq!(out.declarations.get("text-align"), Some("right"));
    }

    #[test]
    fn test_border_shorthand() {
        let bag = PropertyBag::new().with("fo:border", "0.75pt solid #000000");
        let out = convert_properties(&bag, true);
        assert_eq!(out.declarations.get("border"), Some("1px solid #000000"));
    }
}
