//! Resource collaborators: images and formulas.
//!
//! The converter never transcodes resources. It asks a [`ResourceProvider`]
//! what an image or formula should become and writes the answer into the
//! output tree.

use base64::Engine;

use crate::source::{SourceId, SourceTree};
use crate::util::{detect_media_format, extract_image_dimensions};

/// An image as the output refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// File name (or href) used in `src` when not embedded.
    pub file_name: String,
    pub mime_type: String,
    /// The image lives outside the document.
    pub linked: bool,
    /// Raw bytes, when the provider has them.
    pub payload: Option<Vec<u8>>,
}

impl ImageDescriptor {
    /// Descriptor for an external image.
    pub fn linked(href: &str) -> Self {
        Self {
            file_name: href.to_string(),
            mime_type: detect_media_format(href, &[]).mime_type().to_string(),
            linked: true,
            payload: None,
        }
    }

    /// Descriptor for image bytes carried by the document.
    pub fn embedded(file_name: &str, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: detect_media_format(file_name, &data).mime_type().to_string(),
            linked: false,
            payload: Some(data),
        }
    }

    /// Pixel size read from the payload header.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        extract_image_dimensions(self.payload.as_deref()?)
    }

    /// `data:` URI of the payload.
    pub fn data_uri(&self) -> Option<String> {
        let payload = self.payload.as_deref()?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);
        Some(format!("data:{};base64,{}", self.mime_type, encoded))
    }
}

/// What a formula becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathRendering {
    /// Copy the `math:math` subtree as MathML.
    MathMl,
    /// Plain text (for example the StarMath annotation).
    Text(String),
    /// A rendered image.
    Image(ImageDescriptor),
}

/// Supplies images and formula renderings.
pub trait ResourceProvider {
    /// Describe an image referenced by `href` or carried as `binary` data.
    fn image(&self, href: Option<&str>, binary: Option<&[u8]>) -> Option<ImageDescriptor>;

    /// Decide how the formula rooted at `math` is written.
    fn math(&self, tree: &SourceTree, math: SourceId) -> Option<MathRendering>;
}

/// Default provider: images keep their href, embedded data stays embedded,
/// formulas are copied as MathML (or reduced to their annotation text).
#[derive(Debug, Clone, Default)]
pub struct LinkedResources {
    /// Emit formulas as their annotation text instead of MathML.
    pub math_as_text: bool,
}

impl LinkedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_math_as_text(mut self, as_text: bool) -> Self {
        self.math_as_text = as_text;
        self
    }
}

impl ResourceProvider for LinkedResources {
    fn image(&self, href: Option<&str>, binary: Option<&[u8]>) -> Option<ImageDescriptor> {
        match (href, binary) {
            (Some(href), _) if !href.is_empty() => Some(ImageDescriptor::linked(href)),
            (_, Some(data)) if !data.is_empty() => {
                let format = detect_media_format("", data);
                let extension = match format.mime_type() {
                    "image/jpeg" => "jpg",
                    "image/png" => "png",
                    "image/gif" => "gif",
                    "image/webp" => "webp",
                    _ => "bin",
                };
                Some(ImageDescriptor::embedded(
                    &format!("image.{}", extension),
                    data.to_vec(),
                ))
            }
            _ => None,
        }
    }

    fn math(&self, tree: &SourceTree, math: SourceId) -> Option<MathRendering> {
        if !self.math_as_text {
            return Some(MathRendering::MathMl);
        }
        let annotation = tree
            .find_named(math, "math:annotation")
            .map(|a| tree.text_content(a))
            .filter(|t| !t.trim().is_empty());
        let text = annotation.unwrap_or_else(|| tree.text_content(math));
        Some(MathRendering::Text(text.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_image() {
        let image = LinkedResources::new()
            .image(Some("Pictures/a.png"), None)
            .unwrap();
        assert!(image.linked);
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data_uri(), None);
    }

    #[test]
    fn test_embedded_image_data_uri() {
        let gif = b"GIF89a\x02\x00\x03\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";
        let image = LinkedResources::new().image(None, Some(gif)).unwrap();
        assert!(!image.linked);
        assert_eq!(image.file_name, "image.gif");
        assert!(image.data_uri().unwrap().starts_with("data:image/gif;base64,R0lGODlh"));
    }

    #[test]
    fn test_math_annotation_text() {
        let mut tree = SourceTree::new();
        let math = tree.add_element(tree.root(), "math:math", &[]);
        let semantics = tree.add_element(math, "math:semantics", &[]);
        let mi = tree.add_element(semantics, "math:mi", &[]);
        tree.add_text(mi, "x");
        let annotation = tree.add_element(semantics, "math:annotation", &[]);
        tree.add_text(annotation, "x^2");

        let text = LinkedResources::new().with_math_as_text(true).math(&tree, math);
        assert_eq!(text, Some(MathRendering::Text("x^2".to_string())));
        assert_eq!(
            LinkedResources::new().math(&tree, math),
            Some(MathRendering::MathMl)
        );
    }
}
