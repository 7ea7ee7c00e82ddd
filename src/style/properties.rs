//! CSS value types produced from ODF formatting properties.

use std::fmt::Write;

use super::ToCss;

/// Macro for defining keyword enums with automatic ToCss implementation.
///
/// Each variant maps to the CSS keyword it emits; `from_odf` accepts the
/// same keyword as written in ODF attributes.
///
/// # Example
///
/// ```ignore
/// enum_property! {
///     /// Font style (normal, italic, oblique).
///     pub enum FontStyle {
///         #[default]
///         Normal => "normal",
///         Italic => "italic",
///         Oblique => "oblique",
///     }
/// }
/// ```
macro_rules! enum_property {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $css:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Returns the CSS keyword for this value.
            #[inline]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $css,)*
                }
            }

            /// Parse a keyword as written in an ODF attribute.
            #[inline]
            pub fn from_odf(s: &str) -> Option<Self> {
                match s {
                    $($css => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl ToCss for $name {
            fn to_css(&self, buf: &mut String) {
                buf.push_str(self.as_str());
            }
        }
    };
}

enum_property! {
    /// Font style (normal, italic, oblique).
    pub enum FontStyle {
        #[default]
        Normal => "normal",
        Italic => "italic",
        Oblique => "oblique",
    }
}

enum_property! {
    /// Page or column break request (`fo:break-before` / `fo:break-after`).
    pub enum BreakValue {
        #[default]
        Auto => "auto",
        Page => "page",
        Column => "column",
    }
}

enum_property! {
    /// Line style used by ODF underline and line-through properties.
    pub enum LineStyle {
        #[default]
        None => "none",
        Solid => "solid",
        Dotted => "dotted",
        Dash => "dash",
        LongDash => "long-dash",
        DotDash => "dot-dash",
        DotDotDash => "dot-dot-dash",
        Wave => "wave",
    }
}

enum_property! {
    /// Inline text direction.
    pub enum Direction {
        #[default]
        Ltr => "ltr",
        Rtl => "rtl",
    }
}

impl Direction {
    /// Map `style:writing-mode` to a direction.
    pub fn from_writing_mode(mode: &str) -> Option<Direction> {
        match mode {
            "lr-tb" | "lr" | "tb-lr" => Some(Direction::Ltr),
            "rl-tb" | "rl" | "tb-rl" => Some(Direction::Rtl),
            _ => None,
        }
    }
}

/// Text alignment, mapped from `fo:text-align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
    Justify,
}

impl TextAlign {
    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "start" => Some(TextAlign::Start),
            "end" => Some(TextAlign::End),
            "left" => Some(TextAlign::Left),
            "right" => Some(TextAlign::Right),
            "center" => Some(TextAlign::Center),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }

    /// Resolve `start`/`end` against the paragraph direction.
    pub fn physical(self, direction: Direction) -> TextAlign {
        match (self, direction) {
            (TextAlign::Start, Direction::Ltr) | (TextAlign::End, Direction::Rtl) => {
                TextAlign::Left
            }
            (TextAlign::Start, Direction::Rtl) | (TextAlign::End, Direction::Ltr) => {
                TextAlign::Right
            }
            (other, _) => other,
        }
    }
}

impl ToCss for TextAlign {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(match self {
            TextAlign::Start => "start",
            TextAlign::End => "end",
            TextAlign::Left => "left",
            TextAlign::Right => "right",
            TextAlign::Center => "center",
            TextAlign::Justify => "justify",
        });
    }
}

/// Length unit accepted in ODF attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Cm,
    Mm,
    In,
    Pt,
    Pc,
    Px,
    Em,
    Percent,
}

impl LengthUnit {
    fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::In => "in",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Px => "px",
            LengthUnit::Em => "em",
            LengthUnit::Percent => "%",
        }
    }

    /// Pixels per unit at 96 dpi; `None` for relative units.
    fn px_factor(self) -> Option<f32> {
        match self {
            LengthUnit::Cm => Some(96.0 / 2.54),
            LengthUnit::Mm => Some(96.0 / 25.4),
            LengthUnit::In => Some(96.0),
            LengthUnit::Pt => Some(96.0 / 72.0),
            LengthUnit::Pc => Some(16.0),
            LengthUnit::Px => Some(1.0),
            LengthUnit::Em | LengthUnit::Percent => None,
        }
    }
}

/// A validated length value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    /// Parse an ODF length such as `2.5cm`, `-0.1in` or `120%`.
    ///
    /// Returns `None` for malformed input.
    pub fn parse(s: &str) -> Option<Length> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic() || c == '%')
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let value: f32 = number.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let unit = match unit {
            "cm" => LengthUnit::Cm,
            "mm" => LengthUnit::Mm,
            "in" | "inch" => LengthUnit::In,
            "pt" => LengthUnit::Pt,
            "pc" => LengthUnit::Pc,
            "px" => LengthUnit::Px,
            "em" => LengthUnit::Em,
            "%" => LengthUnit::Percent,
            // Unitless zero is valid CSS
            "" if value == 0.0 => LengthUnit::Px,
            _ => return None,
        };
        Some(Length { value, unit })
    }

    /// Convert absolute units to pixels at 96 dpi.
    pub fn to_px(self) -> Length {
        match self.unit.px_factor() {
            Some(factor) => Length {
                value: self.value * factor,
                unit: LengthUnit::Px,
            },
            None => self,
        }
    }

    /// Scale by a factor, keeping the unit.
    pub fn scaled(self, factor: f32) -> Length {
        Length {
            value: self.value * factor,
            unit: self.unit,
        }
    }
}

impl ToCss for Length {
    fn to_css(&self, buf: &mut String) {
        // Round to 2 decimals and strip trailing zeros
        let rounded = (self.value * 100.0).round() / 100.0;
        if rounded == 0.0 {
            buf.push('0');
            return;
        }
        if rounded.fract() == 0.0 {
            let _ = write!(buf, "{}", rounded as i64);
        } else {
            let _ = write!(buf, "{}", rounded);
        }
        buf.push_str(self.unit.suffix());
    }
}

/// One CSS declaration (`name: value`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

impl Declaration {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

impl ToCss for Declaration {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(&self.name);
        buf.push_str(": ");
        buf.push_str(&self.value);
    }
}

/// Ordered declaration list where a later write replaces an earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationList(Vec<Declaration>);

impl DeclarationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, decl: Declaration) {
        match self.0.iter_mut().find(|d| d.name == decl.name) {
            Some(slot) => slot.value = decl.value,
            None => self.0.push(decl),
        }
    }

    /// Overlay another list; its values win.
    pub fn merge(&mut self, other: &DeclarationList) {
        for decl in &other.0 {
            self.set(decl.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Declaration> {
        self.0
    }
}

impl ToCss for DeclarationList {
    /// Serialize as the value of a `style` attribute (`a: b; c: d`).
    fn to_css(&self, buf: &mut String) {
        for (i, decl) in self.0.iter().enumerate() {
            if i > 0 {
                buf.push_str("; ");
            }
            decl.to_css(buf);
        }
    }
}
