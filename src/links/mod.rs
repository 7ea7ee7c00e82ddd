//! Hyperlinks: ODF href classification and deferred resolution.
//!
//! ODF documents address internal locations by bookmark name (`#Intro`),
//! sometimes with a type suffix (`#1.Intro|outline`). Such hrefs become
//! link requests; everything else is written through unchanged.

mod resolver;

pub use resolver::{LinkRequest, ReferenceResolver, ResolveReport};

/// A parsed `xlink:href` of a `text:a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OdfHref {
    /// Location inside this document.
    Internal {
        /// Name without `#` and type suffix.
        name: String,
        /// Type suffix such as `outline`, `table` or `region`.
        kind: Option<String>,
    },
    /// Anything else, written verbatim.
    External(String),
}

impl OdfHref {
    pub fn parse(href: &str) -> OdfHref {
        let href = href.trim();
        let Some(fragment) = href.strip_prefix('#') else {
            return OdfHref::External(href.to_string());
        };
        let decoded = percent_encoding::percent_decode_str(fragment).decode_utf8_lossy();
        match decoded.rsplit_once('|') {
            Some((name, kind)) => OdfHref::Internal {
                name: name.to_string(),
                kind: Some(kind.to_string()),
            },
            None => OdfHref::Internal {
                name: decoded.into_owned(),
                kind: None,
            },
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, OdfHref::Internal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hrefs() {
        assert_eq!(
            OdfHref::parse("#Intro"),
            OdfHref::Internal {
                name: "Intro".to_string(),
                kind: None
            }
        );
        assert_eq!(
            OdfHref::parse("#1.Intro|outline"),
            OdfHref::Internal {
                name: "1.Intro".to_string(),
                kind: Some("outline".to_string())
            }
        );
        assert_eq!(
            OdfHref::parse("#My%20mark"),
            OdfHref::Internal {
                name: "My mark".to_string(),
                kind: None
            }
        );
        assert!(!OdfHref::parse("https://example.com").is_internal());
    }
}
