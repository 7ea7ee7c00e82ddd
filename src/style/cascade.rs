//! Style cascade: source style identity → resolved presentation.
//!
//! Automatic styles resolve their parent first and then overlay their own
//! (hard) properties. Named styles either map to a user-supplied tag/class,
//! get a generated class from the [`ClassRegistry`], or are flattened inline
//! when classes are not exported.

use super::ToCss;
use super::convert::{Converted, convert_properties};
use super::properties::{BreakValue, DeclarationList, Direction};
use super::registry::ClassRegistry;
use crate::config::ConversionConfig;
use crate::dom::{NodeId, OutputTree};
use crate::source::{SourceStyle, StyleFamily, StyleLookup};

/// Parent chains longer than this are treated as cyclic.
const MAX_CHAIN: usize = 32;

/// Resolved per-node presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleInfo {
    /// Element override from a style map.
    pub tag: Option<String>,
    pub class: Option<String>,
    pub declarations: DeclarationList,
    pub lang: Option<String>,
    pub dir: Option<Direction>,
}

impl StyleInfo {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.class.is_none()
            && self.declarations.is_empty()
            && self.lang.is_none()
            && self.dir.is_none()
    }

    /// Write class, inline style, language and direction onto an element.
    pub fn apply(&self, tree: &mut OutputTree, node: NodeId) {
        if let Some(class) = &self.class {
            let merged = match tree.attr(node, "class") {
                Some(existing) if !existing.split(' ').any(|c| c == class) => {
                    format!("{} {}", existing, class)
                }
                Some(existing) => existing.to_string(),
                None => class.clone(),
            };
            tree.set_attr(node, "class", &merged);
        }
        if !self.declarations.is_empty() {
            tree.set_attr(node, "style", &self.declarations.to_css_string());
        }
        if let Some(lang) = &self.lang {
            tree.set_attr(node, "xml:lang", lang);
        }
        if let Some(dir) = self.dir {
            tree.set_attr(node, "dir", dir.as_str());
        }
    }

    fn overlay(&mut self, converted: &Converted) {
        self.declarations.merge(&converted.declarations);
        if converted.lang.is_some() {
            self.lang.clone_from(&converted.lang);
        }
        if converted.dir.is_some() {
            self.dir = converted.dir;
        }
    }
}

/// Where a page-break fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOrigin {
    Named,
    Automatic,
}

/// Page-break facts of a style chain, closest definition first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBreak {
    pub before: Option<BreakOrigin>,
    pub after: Option<BreakOrigin>,
    pub master_page: Option<(String, BreakOrigin)>,
}

/// The cascade for one conversion run.
pub struct StyleCascade<'a> {
    lookup: &'a dyn StyleLookup,
    config: &'a ConversionConfig,
    registry: ClassRegistry,
}

impl<'a> StyleCascade<'a> {
    pub fn new(lookup: &'a dyn StyleLookup, config: &'a ConversionConfig) -> Self {
        Self {
            lookup,
            config,
            registry: ClassRegistry::new(),
        }
    }

    pub fn lookup(&self) -> &'a dyn StyleLookup {
        self.lookup
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Resolve a style; unknown or absent names give an empty [`StyleInfo`].
    pub fn resolve(&mut self, family: StyleFamily, name: Option<&str>, inherit: bool) -> StyleInfo {
        match name {
            Some(name) => self.resolve_at(family, name, inherit, None, 0),
            None => StyleInfo::default(),
        }
    }

    /// Resolve a paragraph style used by a heading of the given level.
    pub fn resolve_heading(&mut self, level: u8, name: Option<&str>) -> StyleInfo {
        match name {
            Some(name) => self.resolve_at(StyleFamily::Paragraph, name, true, Some(level), 0),
            None => StyleInfo::default(),
        }
    }

    fn resolve_at(
        &mut self,
        family: StyleFamily,
        name: &str,
        inherit: bool,
        heading: Option<u8>,
        depth: usize,
    ) -> StyleInfo {
        let lookup = self.lookup;
        let Some(style) = lookup.style(family, name) else {
            log::debug!("unknown {:?} style {:?}", family, name);
            return StyleInfo::default();
        };
        if depth > MAX_CHAIN {
            log::warn!("style chain of {:?} is cyclic", name);
            return StyleInfo::default();
        }

        if style.automatic {
            let mut info = match &style.parent {
                Some(parent) => self.resolve_at(family, parent, inherit, heading, depth + 1),
                None => StyleInfo::default(),
            };
            if self.config.formatting.keeps_hard_formatting() {
                info.overlay(&convert_properties(&style.properties, self.config.convert_to_px));
            }
            return info;
        }

        self.resolve_named(style, inherit, heading)
    }

    fn resolve_named(
        &mut self,
        style: &'a SourceStyle,
        inherit: bool,
        heading: Option<u8>,
    ) -> StyleInfo {
        let mut info = StyleInfo::default();

        if let Some(map) = self.config.style_map(style.family, style.display_name()) {
            info.tag.clone_from(&map.tag);
            info.class.clone_from(&map.class);
            return info;
        }

        let formatting = self.config.formatting;
        let flattened = self.flatten(style);
        info.lang = flattened.lang.clone();
        info.dir = flattened.dir;

        if formatting.exports_styles() {
            let class = self.registry.class_for(
                style.family,
                &style.name,
                style.display_name(),
                heading,
            );
            info.class = Some(class.to_string());
        } else if formatting.inlines_styles() {
            if inherit {
                info.declarations = flattened.declarations;
            } else {
                info.declarations =
                    convert_properties(&style.properties, self.config.convert_to_px).declarations;
            }
        }
        info
    }

    /// Merge a named style with all its ancestors, closest properties winning.
    pub fn flatten(&self, style: &'a SourceStyle) -> Converted {
        let chain = self.chain(style);
        let mut out = Converted::default();
        for s in chain.iter().rev() {
            let converted = convert_properties(&s.properties, self.config.convert_to_px);
            out.declarations.merge(&converted.declarations);
            if converted.lang.is_some() {
                out.lang = converted.lang;
            }
            if converted.dir.is_some() {
                out.dir = converted.dir;
            }
        }
        out
    }

    /// The style followed by its ancestors.
    fn chain(&self, style: &'a SourceStyle) -> Vec<&'a SourceStyle> {
        let lookup = self.lookup;
        let mut chain = vec![style];
        let mut current = style;
        while let Some(parent) = &current.parent {
            if chain.len() > MAX_CHAIN {
                log::warn!("style chain of {:?} is cyclic", style.name);
                break;
            }
            match lookup.style(current.family, parent) {
                Some(p) => {
                    chain.push(p);
                    current = p;
                }
                None => {
                    log::debug!("unknown parent style {:?} of {:?}", parent, current.name);
                    break;
                }
            }
        }
        chain
    }

    /// Page-break facts of a style along its parent chain.
    pub fn page_break(&self, family: StyleFamily, name: Option<&str>) -> PageBreak {
        let mut result = PageBreak::default();
        let lookup = self.lookup;
        let Some(style) = name.and_then(|n| lookup.style(family, n)) else {
            return result;
        };
        let mut before_seen = false;
        let mut after_seen = false;
        for s in self.chain(style) {
            let origin = if s.automatic {
                BreakOrigin::Automatic
            } else {
                BreakOrigin::Named
            };
            if !before_seen && let Some(value) = s.properties.get("fo:break-before") {
                before_seen = true;
                if BreakValue::from_odf(value) == Some(BreakValue::Page) {
                    result.before = Some(origin);
                }
            }
            if !after_seen && let Some(value) = s.properties.get("fo:break-after") {
                after_seen = true;
                if BreakValue::from_odf(value) == Some(BreakValue::Page) {
                    result.after = Some(origin);
                }
            }
            if result.master_page.is_none()
                && let Some(master) = &s.master_page
                && !master.is_empty()
            {
                result.master_page = Some((master.clone(), origin));
            }
        }
        result
    }

    /// List style attached to a paragraph style chain.
    pub fn paragraph_list_style(&self, name: Option<&str>) -> Option<&'a str> {
        let lookup = self.lookup;
        let style = lookup.style(StyleFamily::Paragraph, name?)?;
        self.chain(style)
            .into_iter()
            .find_map(|s| s.list_style.as_deref())
    }

    /// Default outline level of a paragraph style chain.
    pub fn default_outline_level(&self, name: Option<&str>) -> Option<u8> {
        let lookup = self.lookup;
        let style = lookup.style(StyleFamily::Paragraph, name?)?;
        self.chain(style)
            .into_iter()
            .find_map(|s| s.default_outline_level)
    }

    /// Internal name of the named style behind a paragraph style.
    pub fn paragraph_named_style(&self, name: &str) -> Option<&'a str> {
        let lookup = self.lookup;
        let style = lookup.style(StyleFamily::Paragraph, name)?;
        self.chain(style)
            .into_iter()
            .find(|s| !s.automatic)
            .map(|s| s.name.as_str())
    }

    /// Number of columns of a section style.
    pub fn section_columns(&self, name: Option<&str>) -> u32 {
        name.and_then(|n| self.lookup.style(StyleFamily::Section, n))
            .and_then(|s| s.properties.get("fo:column-count"))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1)
    }
}
