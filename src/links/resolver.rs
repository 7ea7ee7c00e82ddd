//! Deferred reference resolution.
//!
//! During traversal the walker registers link targets (id → unit) and link
//! requests (element awaiting an href). Once every unit exists and the
//! indexes have been rendered, [`ReferenceResolver::resolve`] drains the
//! requests and patches each element in place.

use std::collections::{HashMap, HashSet};

use crate::dom::NodeId;
use crate::split::{OutputUnit, UnitNaming};

/// An element waiting for an href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    /// Unit containing the element.
    pub unit: usize,
    pub node: NodeId,
    /// Target id without `#`.
    pub target: String,
    /// Append the target's 1-based unit number as visible text.
    pub page_ref: bool,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Target ids of resolved requests, in request order.
    pub resolved: Vec<String>,
    /// Target ids no registered target matched, in request order.
    pub unresolved: Vec<String>,
}

/// Collects targets and link requests, then resolves them once.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    naming: UnitNaming,
    targets: HashMap<String, usize>,
    /// Alternative names resolving to a registered id.
    aliases: HashMap<String, String>,
    requests: Vec<LinkRequest>,
}

impl ReferenceResolver {
    pub fn new(naming: UnitNaming) -> Self {
        Self {
            naming,
            targets: HashMap::new(),
            aliases: HashMap::new(),
            requests: Vec::new(),
        }
    }

    pub fn naming(&self) -> &UnitNaming {
        &self.naming
    }

    /// Register `id` as living in `unit`. A later registration of the same
    /// id replaces the earlier one.
    pub fn register_target(&mut self, id: &str, unit: usize) {
        if let Some(previous) = self.targets.insert(id.to_string(), unit) {
            log::debug!(
                "target {:?} registered again (unit {} replaces unit {})",
                id,
                unit,
                previous
            );
        }
    }

    /// Let links to `alias` resolve to the target `id`.
    pub fn register_alias(&mut self, alias: &str, id: &str) {
        self.aliases.insert(alias.to_string(), id.to_string());
    }

    /// Queue an element for resolution against `target`.
    pub fn register_link(&mut self, unit: usize, node: NodeId, target: &str, page_ref: bool) {
        self.requests.push(LinkRequest {
            unit,
            node,
            target: target.to_string(),
            page_ref,
        });
    }

    /// Drop queued requests whose element in `unit` is one of `nodes`.
    pub fn discard_links(&mut self, unit: usize, nodes: &HashSet<NodeId>) {
        self.requests
            .retain(|r| r.unit != unit || !nodes.contains(&r.node));
    }

    /// Unit a target was registered in.
    pub fn target_unit(&self, id: &str) -> Option<usize> {
        self.targets.get(id).copied()
    }

    pub fn pending(&self) -> &[LinkRequest] {
        &self.requests
    }

    /// The href a link from `origin` to `target` would get.
    pub fn href(&self, origin: usize, target: &str) -> Option<String> {
        let unit = self.target_unit(target)?;
        Some(if unit == origin {
            format!("#{}", target)
        } else {
            format!("{}#{}", self.naming.href(unit), target)
        })
    }

    /// Resolve every queued request exactly once.
    ///
    /// Requests are drained, so a second call only sees requests registered
    /// after the first one. Unmatched requests keep their element without
    /// an href.
    pub fn resolve(&mut self, units: &mut [OutputUnit]) -> ResolveReport {
        let mut report = ResolveReport::default();
        for request in std::mem::take(&mut self.requests) {
            let id = self
                .aliases
                .get(&request.target)
                .map_or(request.target.as_str(), String::as_str);
            let Some(target_unit) = self.target_unit(id) else {
                log::debug!("unresolved link target {:?}", request.target);
                report.unresolved.push(request.target);
                continue;
            };
            let href = self.href(request.unit, id);
            let Some(unit) = units.get_mut(request.unit) else {
                report.unresolved.push(request.target);
                continue;
            };
            if let Some(href) = href {
                unit.tree.set_attr(request.node, "href", &href);
            }
            if request.page_ref {
                unit.tree
                    .text(request.node, &(target_unit + 1).to_string());
            }
            report.resolved.push(request.target);
        }
        report
    }
}
