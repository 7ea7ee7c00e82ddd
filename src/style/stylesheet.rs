//! Stylesheet export for the classes allocated during a run.

use std::fmt::Write;

use super::ToCss;
use super::cascade::StyleCascade;
use super::registry::ClassEntry;

impl StyleCascade<'_> {
    /// Render one rule per exported named style, in first-use order.
    ///
    /// Styles only ever used by headings get `hN.class` selectors, styles of
    /// families with a natural element get `p.class` / `span.class` and the
    /// rest get a bare `.class`. Mapped styles never reach the registry and
    /// are not exported.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for entry in self.registry().entries() {
            let Some(style) = self.lookup().style(entry.family, &entry.style_name) else {
                continue;
            };
            let declarations = self.flatten(style).declarations;
            if declarations.is_empty() {
                continue;
            }

            let selectors = selectors(entry);
            let _ = write!(css, "{} {{ ", selectors.join(", "));
            for decl in declarations.iter() {
                decl.to_css(&mut css);
                css.push_str("; ");
            }
            css.push_str("}\n");
        }
        css
    }
}

fn selectors(entry: &ClassEntry) -> Vec<String> {
    let mut out: Vec<String> = entry
        .heading_levels
        .iter()
        .map(|level| format!("h{}.{}", level, entry.class))
        .collect();
    if entry.used_plain || out.is_empty() {
        match entry.family.default_tag() {
            Some(tag) => out.push(format!("{}.{}", tag, entry.class)),
            None => out.push(format!(".{}", entry.class)),
        }
    }
    out
}
