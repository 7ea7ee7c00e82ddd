//! Unit titles and navigation links between units.

use crate::dom::NodeId;
use crate::split::{OutputUnit, UnitNaming};

/// Give every unit without a heading the configured title.
pub(super) fn apply_titles(units: &mut [OutputUnit], title: Option<&str>) {
    let Some(title) = title else {
        return;
    };
    for unit in units.iter_mut().filter(|u| u.title.is_none()) {
        unit.title = Some(title.to_string());
    }
}

/// Write first/previous/next/last links into each unit's header and footer.
pub(super) fn write_navigation(units: &mut [OutputUnit], naming: &UnitNaming) {
    let count = units.len();
    if count < 2 {
        return;
    }
    for (i, unit) in units.iter_mut().enumerate() {
        let mut links = Vec::new();
        if i > 0 {
            links.push(("first", "First", 0));
            links.push(("previous", "Previous", i - 1));
        }
        if i + 1 < count {
            links.push(("next", "Next", i + 1));
            links.push(("last", "Last", count - 1));
        }
        let containers: Vec<NodeId> = [unit.header, unit.footer].into_iter().flatten().collect();
        for container in containers {
            let nav = unit
                .tree
                .element_with(container, "div", &[("class", "navigation")]);
            for &(class, text, target) in &links {
                let href = naming.href(target);
                let a = unit
                    .tree
                    .element_with(nav, "a", &[("class", class), ("href", href.as_str())]);
                unit.tree.text(a, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitTemplate;

    fn units(n: usize, template: &UnitTemplate) -> Vec<OutputUnit> {
        (0..n).map(|i| OutputUnit::new(i, template)).collect()
    }

    #[test]
    fn test_titles_only_fill_gaps() {
        let mut units = units(2, &UnitTemplate::default());
        units[1].title = Some("Chapter".to_string());
        apply_titles(&mut units, Some("Book"));
        assert_eq!(units[0].title.as_deref(), Some("Book"));
        assert_eq!(units[1].title.as_deref(), Some("Chapter"));
    }

    #[test]
    fn test_navigation_links() {
        let template = UnitTemplate {
            header: true,
            footer: true,
            navigation: true,
            ..UnitTemplate::default()
        };
        let mut units = units(3, &template);
        write_navigation(&mut units, &UnitNaming::new("doc", "xhtml"));

        let header = units[1].header.unwrap();
        let hrefs: Vec<_> = units[1]
            .tree
            .elements_by_tag(header, "a")
            .into_iter()
            .filter_map(|a| units[1].tree.attr(a, "href").map(str::to_string))
            .collect();
        assert_eq!(
            hrefs,
            ["doc.xhtml", "doc.xhtml", "doc2.xhtml", "doc2.xhtml"]
        );

        let footer = units[0].footer.unwrap();
        assert_eq!(units[0].tree.elements_by_tag(footer, "a").len(), 2);
    }
}
