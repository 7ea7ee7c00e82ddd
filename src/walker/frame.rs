//! Frames: images, text boxes and formulas.

use base64::Engine;

use super::state::RunState;
use crate::dom::NodeId;
use crate::resources::{ImageDescriptor, MathRendering};
use crate::source::{NodeKind, SourceId, StyleFamily};
use crate::split::Cursor;
use crate::style::{Declaration, Length, StyleInfo, ToCss};
use crate::util::sanitize_id;

const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

impl RunState<'_> {
    /// A `draw:frame`. A formula wins over an image, an image over a text box.
    pub(super) fn frame(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        let formula = source
            .children(id)
            .filter(|&c| source.kind(c) == NodeKind::Object)
            .find_map(|o| source.find_kind(o, NodeKind::Math));
        if let Some(math) = formula {
            self.math(math, cur);
        } else if let Some(image) = source.child_of_kind(id, NodeKind::Image) {
            self.image(id, image, cur);
        } else if let Some(text_box) = source.child_of_kind(id, NodeKind::TextBox) {
            self.text_box(id, text_box, cur);
        } else {
            log::debug!("frame without supported content");
        }
    }

    /// Graphic style of a frame plus its declared size.
    fn frame_style(&mut self, frame: SourceId, fallback: Option<(u32, u32)>) -> StyleInfo {
        let source = self.source;
        let mut info = self.cascade.resolve(
            StyleFamily::Graphic,
            source.attr(frame, "draw:style-name"),
            true,
        );
        for (attr, property, index) in [("svg:width", "width", 0), ("svg:height", "height", 1)] {
            let declared = source.attr(frame, attr).and_then(Length::parse);
            let value = match declared {
                Some(length) if self.config.convert_to_px => Some(length.to_px().to_css_string()),
                Some(length) => Some(length.to_css_string()),
                None => fallback.map(|(w, h)| format!("{}px", if index == 0 { w } else { h })),
            };
            if let Some(value) = value {
                info.declarations.set(Declaration::new(property, value));
            }
        }
        info
    }

    fn image_src(&self, image: &ImageDescriptor) -> String {
        if self.config.embed_images
            && let Some(uri) = image.data_uri()
        {
            return uri;
        }
        image.file_name.clone()
    }

    /// An image; `frame` carries size, style, name and alternative text.
    pub(super) fn image(&mut self, frame: SourceId, image: SourceId, cur: Cursor) {
        let source = self.source;
        let href = source.attr(image, "xlink:href").filter(|h| !h.is_empty());
        let payload = source
            .children(image)
            .find(|&c| source.name(c) == "office:binary-data")
            .and_then(|b| {
                let text: String = source
                    .text_content(b)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                match base64::engine::general_purpose::STANDARD.decode(text) {
                    Ok(data) => Some(data),
                    Err(e) => {
                        log::warn!("malformed embedded image data: {}", e);
                        None
                    }
                }
            });
        let Some(descriptor) = self.resources.image(href, payload.as_deref()) else {
            log::debug!("image without a usable source");
            return;
        };

        let alt = [frame, image]
            .into_iter()
            .flat_map(|n| {
                [NodeKind::SvgTitle, NodeKind::SvgDesc]
                    .into_iter()
                    .filter_map(move |k| source.child_of_kind(n, k))
            })
            .map(|n| source.text_content(n).trim().to_string())
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        let src = self.image_src(&descriptor);
        let img = self.element_with(cur, "img", &[("src", &src), ("alt", &alt)]);
        let info = self.frame_style(frame, descriptor.dimensions());
        self.apply(cur.unit, img, &info);
        if let Some(name) = source.attr(frame, "draw:name") {
            self.anchor(cur.unit, img, &sanitize_id(name));
        }
    }

    /// A text box: its blocks go into one indivisible container.
    pub(super) fn text_box(&mut self, frame: SourceId, text_box: SourceId, cur: Cursor) {
        let source = self.source;
        self.splitter.enter_atomic();
        let div = self.element_with(cur, "div", &[("class", "textbox")]);
        let info = self.frame_style(frame, None);
        self.apply(cur.unit, div, &info);
        if let Some(name) = source.attr(frame, "draw:name") {
            self.anchor(cur.unit, div, &sanitize_id(name));
        }
        self.walk_children(text_box, cur.at(div));
        self.splitter.leave_atomic();
    }

    /// A formula, written the way the resource provider decides.
    pub(super) fn math(&mut self, math: SourceId, cur: Cursor) {
        let source = self.source;
        match self.resources.math(source, math) {
            Some(MathRendering::MathMl) => {
                let node = self.copy_math(math, cur);
                self.set_attr(cur.unit, node, "xmlns", MATHML_NS);
                self.splitter.unit_mut(cur.unit).contains_math = true;
            }
            Some(MathRendering::Text(text)) => {
                let span = self.element_with(cur, "span", &[("class", "math")]);
                self.write_text(cur.at(span), &text);
            }
            Some(MathRendering::Image(image)) => {
                let src = self.image_src(&image);
                self.element_with(cur, "img", &[("class", "math"), ("src", &src), ("alt", "")]);
            }
            None => log::debug!("formula dropped by the resource provider"),
        }
    }

    /// Copy a MathML subtree without its namespace prefix and annotations.
    fn copy_math(&mut self, id: SourceId, cur: Cursor) -> NodeId {
        let source = self.source;
        let name = source.name(id);
        let local = name.strip_prefix("math:").unwrap_or(name);
        let node = self.element(cur, local);
        if let Some(n) = source.node(id) {
            for (k, v) in &n.attrs {
                let k = k.strip_prefix("math:").unwrap_or(k);
                self.set_attr(cur.unit, node, k, v);
            }
        }
        for child in source.children(id) {
            match source.kind(child) {
                NodeKind::Text => {
                    let text = source.node(child).map_or("", |n| n.text.as_str());
                    self.write_text(cur.at(node), text);
                }
                NodeKind::Comment => {}
                _ => {
                    let child_name = source.name(child);
                    if matches!(child_name, "math:annotation" | "math:annotation-xml") {
                        continue;
                    }
                    self.copy_math(child, cur.at(node));
                }
            }
        }
        node
    }
}
