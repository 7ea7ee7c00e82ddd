//! Class name registry for exported named styles.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::source::StyleFamily;
use crate::util::sanitize_id;

/// One exported named style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub family: StyleFamily,
    /// Internal style name.
    pub style_name: String,
    pub class: String,
    /// Heading levels the style was used at.
    pub heading_levels: BTreeSet<u8>,
    /// Whether the style was also used outside headings.
    pub used_plain: bool,
}

/// Allocates stable, collision-free class names in first-use order.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    entries: Vec<ClassEntry>,
    by_style: HashMap<(StyleFamily, String), usize>,
    taken: HashSet<String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class for a named style, allocating one from `display_name` on first use.
    ///
    /// `heading_level` records the usage for stylesheet export.
    pub fn class_for(
        &mut self,
        family: StyleFamily,
        style_name: &str,
        display_name: &str,
        heading_level: Option<u8>,
    ) -> &str {
        let key = (family, style_name.to_string());
        let index = match self.by_style.get(&key) {
            Some(&i) => i,
            None => {
                let class = self.unique_name(display_name);
                self.entries.push(ClassEntry {
                    family,
                    style_name: style_name.to_string(),
                    class,
                    heading_levels: BTreeSet::new(),
                    used_plain: false,
                });
                let i = self.entries.len() - 1;
                self.by_style.insert(key, i);
                i
            }
        };

        let entry = &mut self.entries[index];
        match heading_level {
            Some(level) => {
                entry.heading_levels.insert(level);
            }
            None => entry.used_plain = true,
        }
        &entry.class
    }

    /// Entries in allocation order.
    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn unique_name(&mut self, display_name: &str) -> String {
        let base = sanitize_id(display_name);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{}{}", base, n);
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_display_names_do_not_collide() {
        let mut reg = ClassRegistry::new();
        let a = reg
            .class_for(StyleFamily::Paragraph, "Quote", "Quote", None)
            .to_string();
        let b = reg
            .class_for(StyleFamily::Text, "Quote", "Quote", None)
            .to_string();
        assert_eq!(a, "Quote");
        assert_eq!(b, "Quote2");
        assert_eq!(
            reg.class_for(StyleFamily::Paragraph, "Quote", "Quote", None),
            "Quote"
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_heading_usage_recorded() {
        let mut reg = ClassRegistry::new();
        reg.class_for(StyleFamily::Paragraph, "Heading_20_1", "Heading 1", Some(1));
        reg.class_for(StyleFamily::Paragraph, "Heading_20_1", "Heading 1", Some(2));
        let entry = &reg.entries()[0];
        assert_eq!(entry.class, "Heading_1");
        assert_eq!(entry.heading_levels.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!entry.used_plain);
    }
}
