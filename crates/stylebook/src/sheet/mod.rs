//! Stylesheets as ordered rule lists.
//!
//! This module provides the small slice of the CSS object model the editor
//! needs:
//!
//! - [`StyleRule`] / [`Declaration`] / [`Priority`]: one rule and its block
//! - [`StyleSheet`]: an optionally titled, ordered list of rules
//! - [`RuleList`]: the list/find/insert seam the rule store is written against
//! - [`parse_rules`] / [`parse_declaration_list`]: loading CSS text
//!
//! Rules are addressed by position. A sheet only ever grows through
//! [`RuleList::insert_rule`], so an index handed out by the store stays valid
//! for the life of the document.

mod parse;
mod rule;

pub use parse::{parse_declaration_list, parse_rules};
pub(crate) use parse::split_priority;
pub use rule::{Declaration, Priority, StyleRule};

use std::fmt;

/// Ordered access to the rules of a sheet.
pub trait RuleList {
    /// All rules in source order.
    fn rules(&self) -> &[StyleRule];

    /// Mutable access to one rule.
    fn rule_mut(&mut self, index: usize) -> Option<&mut StyleRule>;

    /// Inserts a rule at `index` (clamped to the end) and returns its position.
    fn insert_rule(&mut self, rule: StyleRule, index: usize) -> usize;

    fn len(&self) -> usize {
        self.rules().len()
    }

    fn is_empty(&self) -> bool {
        self.rules().is_empty()
    }

    /// Position of the first rule satisfying `predicate`.
    fn find_rule(&self, predicate: &dyn Fn(&StyleRule) -> bool) -> Option<usize> {
        self.rules().iter().position(|rule| predicate(rule))
    }
}

/// An ordered list of rules, optionally tagged with a title.
///
/// # Example
///
/// ```rust
/// use stylebook::{RuleList, StyleSheet};
///
/// let sheet = StyleSheet::parse(Some("userModifiedStyles"), ".a-style { color: red; }");
/// assert_eq!(sheet.title(), Some("userModifiedStyles"));
/// assert_eq!(sheet.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    title: Option<String>,
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Creates an empty, untitled sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sheet with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            rules: Vec::new(),
        }
    }

    /// Loads a sheet from CSS text.
    pub fn parse(title: Option<&str>, css: &str) -> Self {
        Self {
            title: title.map(str::to_string),
            rules: parse_rules(css),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Serializes every rule, one per line.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl RuleList for StyleSheet {
    fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    fn rule_mut(&mut self, index: usize) -> Option<&mut StyleRule> {
        self.rules.get_mut(index)
    }

    fn insert_rule(&mut self, rule: StyleRule, index: usize) -> usize {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
        index
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
