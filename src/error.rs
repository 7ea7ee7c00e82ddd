//! Error types for odflow operations.
//!
//! Conversion itself degrades gracefully: unknown styles, dangling links and
//! malformed attributes are recovered locally. Only loading a source tree and
//! locating its body can fail.

use thiserror::Error;

/// Errors that can occur while loading or converting a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("Unsupported encoding: {0}")]
    Encoding(String),

    #[error("Missing document body (office:text)")]
    MissingBody,
}

pub type Result<T> = std::result::Result<T, Error>;
