//! List and outline counters.
//!
//! Counters persist for the whole run. A list style's counters are shared by
//! every list using that style; only an explicit restart (or a new list that
//! does not continue numbering) resets them. Outline numbering lives under
//! its own identity and only reacts to restarts requested by headings.

use std::collections::{HashMap, HashSet};

use super::format::format_number;
use crate::source::{LevelKind, ListLevelStyle, ListStyle, StyleLookup};

/// Deepest list level ODF defines.
pub const MAX_LEVEL: u8 = 10;

/// What a label shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind {
    Number,
    Bullet(char),
    Image(String),
    /// Numbered level with an empty format.
    Empty,
}

/// A formatted list or outline label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLabel {
    pub kind: LabelKind,
    /// Visible text including prefix and suffix.
    pub text: String,
    /// Counter value at the stepped level.
    pub value: u32,
}

impl ListLabel {
    pub fn is_numbered(&self) -> bool {
        self.kind == LabelKind::Number
    }
}

/// Per-level counter values of one identity.
#[derive(Debug, Clone, Default)]
struct LevelCounters {
    values: [u32; MAX_LEVEL as usize],
    started: [bool; MAX_LEVEL as usize],
}

impl LevelCounters {
    fn step(&mut self, style: Option<&ListStyle>, level: u8) -> u32 {
        let idx = level as usize - 1;
        for l in 0..idx {
            if !self.started[l] {
                self.values[l] = start_value(style, l as u8 + 1);
                self.started[l] = true;
            }
        }
        if self.started[idx] {
            self.values[idx] = self.values[idx].saturating_add(1);
        } else {
            self.values[idx] = start_value(style, level);
            self.started[idx] = true;
        }
        for l in idx + 1..MAX_LEVEL as usize {
            self.started[l] = false;
        }
        self.values[idx]
    }

    fn restart(&mut self, level: u8, value: Option<u32>) {
        let idx = level as usize - 1;
        match value {
            Some(n) => {
                self.values[idx] = n;
                self.started[idx] = true;
            }
            None => self.started[idx] = false,
        }
        for l in idx + 1..MAX_LEVEL as usize {
            self.started[l] = false;
        }
    }
}

fn start_value(style: Option<&ListStyle>, level: u8) -> u32 {
    style
        .and_then(|s| s.level(level))
        .map_or(1, ListLevelStyle::start_value)
}

fn clamp_level(level: u8) -> u8 {
    level.clamp(1, MAX_LEVEL)
}

/// Counter engine for one conversion run.
pub struct ListCounterEngine<'a> {
    lookup: &'a dyn StyleLookup,
    lists: HashMap<String, LevelCounters>,
    outline: LevelCounters,
    /// List styles that have started at least one list.
    used: HashSet<String>,
}

impl<'a> ListCounterEngine<'a> {
    pub fn new(lookup: &'a dyn StyleLookup) -> Self {
        Self {
            lookup,
            lists: HashMap::new(),
            outline: LevelCounters::default(),
            used: HashSet::new(),
        }
    }

    /// Advance the counter of `style` at `level` and format its label.
    ///
    /// Returns `None` for an unknown list style; callers render such lists
    /// unordered without counters.
    pub fn step(&mut self, style: &str, level: u8) -> Option<ListLabel> {
        let lookup = self.lookup;
        let Some(list_style) = lookup.list_style(style) else {
            log::debug!("unknown list style {:?}", style);
            return None;
        };
        let level = clamp_level(level);
        let counters = self.lists.entry(style.to_string()).or_default();
        let value = counters.step(Some(list_style), level);
        Some(label(list_style, counters, level, value))
    }

    /// Reset the counter of `style` at and below `level`.
    ///
    /// With `Some(n)` the next step at `level` yields `n + 1`; with `None` it
    /// yields the level's configured start value.
    pub fn restart(&mut self, style: &str, level: u8, value: Option<u32>) {
        self.lists
            .entry(style.to_string())
            .or_default()
            .restart(clamp_level(level), value);
    }

    /// Begin a top-level list of `style`.
    ///
    /// A list that continues numbering keeps the counters of an earlier list
    /// of the same style; otherwise (or on first use) numbering restarts.
    /// Returns whether a restart happened.
    pub fn begin_list(&mut self, style: &str, continue_numbering: bool) -> bool {
        let first_use = self.used.insert(style.to_string());
        if continue_numbering && !first_use {
            return false;
        }
        self.restart(style, 1, None);
        true
    }

    /// Current value of `style` at `level`, if that level has started.
    pub fn current(&self, style: &str, level: u8) -> Option<u32> {
        let counters = self.lists.get(style)?;
        let idx = clamp_level(level) as usize - 1;
        counters.started[idx].then_some(counters.values[idx])
    }

    /// Advance outline numbering for a heading.
    pub fn step_outline(&mut self, level: u8) -> ListLabel {
        let level = clamp_level(level);
        let lookup = self.lookup;
        let style = lookup.outline_style();
        let value = self.outline.step(style, level);
        match style {
            Some(style) => label(style, &self.outline, level, value),
            None => ListLabel {
                kind: LabelKind::Empty,
                text: String::new(),
                value,
            },
        }
    }

    /// Reset outline numbering at and below `level`.
    pub fn restart_outline(&mut self, level: u8, value: Option<u32>) {
        self.outline.restart(clamp_level(level), value);
    }
}

fn label(style: &ListStyle, counters: &LevelCounters, level: u8, value: u32) -> ListLabel {
    let Some(level_style) = style.level(level) else {
        return ListLabel {
            kind: LabelKind::Empty,
            text: String::new(),
            value,
        };
    };
    match &level_style.kind {
        LevelKind::Bullet(c) => ListLabel {
            kind: LabelKind::Bullet(*c),
            text: c.to_string(),
            value,
        },
        LevelKind::Image(href) => ListLabel {
            kind: LabelKind::Image(href.clone()),
            text: String::new(),
            value,
        },
        LevelKind::Number { display_levels, .. } => {
            let first = level.saturating_sub(display_levels.saturating_sub(1)).max(1);
            let numbers: Vec<String> = (first..=level)
                .filter_map(|l| {
                    let (format, sync) = match style.level(l).map(|s| &s.kind) {
                        Some(LevelKind::Number {
                            format,
                            letter_sync,
                            ..
                        }) => (*format, *letter_sync),
                        _ => return None,
                    };
                    let n = format_number(counters.values[l as usize - 1], format, sync);
                    (!n.is_empty()).then_some(n)
                })
                .collect();
            if numbers.is_empty() {
                return ListLabel {
                    kind: LabelKind::Empty,
                    text: String::new(),
                    value,
                };
            }
            ListLabel {
                kind: LabelKind::Number,
                text: format!(
                    "{}{}{}",
                    level_style.prefix,
                    numbers.join("."),
                    level_style.suffix
                ),
                value,
            }
        }
    }
}
