//! Input side of the pipeline: the borrowed source tree and style collaborator.
//!
//! - [`SourceTree`]: arena of ODF nodes with attribute lookup
//! - [`NodeKind`]: closed classification of ODF element names
//! - [`StyleLookup`]: property bags with parent pointers and an automatic flag

mod kind;
mod styles;
mod tree;
mod xml;

pub use kind::NodeKind;
pub use styles::{
    LevelKind, ListLevelStyle, ListStyle, NumFormat, PropertyBag, SourceStyle, StyleCatalog,
    StyleFamily, StyleLookup,
};
pub use tree::{MAX_SPACES, SourceChildren, SourceId, SourceNode, SourceTree};
