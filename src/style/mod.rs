//! Style system: ODF property conversion, cascade and class export.
//!
//! This module contains:
//! - CSS value types and the `enum_property!` macro
//! - ODF → CSS property conversion
//! - The [`StyleCascade`] and its class registry
//! - Stylesheet export for the classes used during a run

mod cascade;
mod convert;
mod properties;
mod registry;
mod stylesheet;

/// Trait for converting style values to CSS strings.
pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

pub use cascade::{BreakOrigin, PageBreak, StyleCascade, StyleInfo};
pub use convert::{Converted, convert_properties};
pub use properties::{
    BreakValue, Declaration, DeclarationList, Direction, FontStyle, Length, LengthUnit, LineStyle,
    TextAlign,
};
pub use registry::{ClassEntry, ClassRegistry};
