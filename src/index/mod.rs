//! Tables of contents, alphabetical and user indexes, bibliographies.
//!
//! Collection happens during the walk: supported indexes reserve a container
//! in the unit they appear in, and headings, listed paragraphs and explicit
//! marks become [`IndexEntry`] values with their own anchor ids. Rendering
//! happens once every unit exists and must run before link resolution,
//! because every rendered entry is itself a link request.

mod collate;
mod collector;
mod entry;
mod spec;

pub use collate::{collation_key, compare, compare_keys, initial};
pub use collector::{IndexCollector, IndexData};
pub use entry::{EntryKind, IndexEntry, MarkIndex};
pub use spec::IndexSpec;
