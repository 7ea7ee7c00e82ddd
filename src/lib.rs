//! # odflow
//!
//! Converts OpenDocument text trees into XHTML/EPUB flow markup.
//!
//! ## Features
//!
//! - Style cascade with class export, style maps and hard-formatting policies
//! - Splitting into output units at headings, page breaks and size limits
//! - List and outline numbering that survives unit boundaries
//! - Deferred cross-references, resolved once every unit exists
//! - Generated tables of contents, alphabetical/user indexes and bibliographies
//!
//! ## Quick Start
//!
//! ```
//! use odflow::{ConversionConfig, SourceTree, StyleCatalog, convert};
//!
//! let source = SourceTree::from_xml(
//!     r##"<office:text>
//!          <text:h text:outline-level="1">Intro</text:h>
//!          <text:p>See <text:a xlink:href="#later">later</text:a>.</text:p>
//!          <text:h text:outline-level="1">Details</text:h>
//!          <text:p><text:bookmark text:name="later"/>Here.</text:p>
//!        </office:text>"##,
//! )
//! .unwrap();
//!
//! let conversion = convert(&source, &StyleCatalog::new(), &ConversionConfig::new()).unwrap();
//! assert_eq!(conversion.units.len(), 2);
//! assert!(conversion.units[0].to_markup().contains("document1.xhtml#later"));
//! ```
//!
//! Parsing packages and serializing output documents are left to the host:
//! [`SourceTree::from_xml`] reads an `office:text` body and
//! [`OutputUnit::to_markup`] writes a unit for inspection.

pub mod config;
pub mod dom;
pub mod error;
pub mod index;
pub mod links;
pub mod list;
pub mod resources;
pub mod source;
pub mod split;
pub mod style;
pub(crate) mod util;
pub mod walker;

pub use config::{
    ConversionConfig, Formatting, ListFormatting, OutputMode, PageBreakSplit, StyleMap,
    UnitTemplate,
};
pub use dom::{NodeId, OutputTree};
pub use error::{Error, Result};
pub use resources::{ImageDescriptor, LinkedResources, MathRendering, ResourceProvider};
pub use source::{
    ListLevelStyle, ListStyle, NodeKind, NumFormat, SourceId, SourceStyle, SourceTree,
    StyleCatalog, StyleFamily, StyleLookup,
};
pub use split::{OutputUnit, UnitNaming};
pub use walker::{Conversion, Converter, convert};
