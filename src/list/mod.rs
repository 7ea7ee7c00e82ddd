//! List and outline numbering.
//!
//! - [`ListCounterEngine`]: per-style and outline counters with restart and
//!   continuation semantics
//! - [`format_number`]: arabic, roman and alphabetic number formats

mod counter;
mod format;

pub use counter::{LabelKind, ListCounterEngine, ListLabel, MAX_LEVEL};
pub use format::{alpha, format_number, roman};
