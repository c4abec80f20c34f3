//! Style rules and their declarations.

use std::fmt;

/// Whether a declaration carries the `!important` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Normal,
    Important,
}

impl Priority {
    pub fn is_important(self) -> bool {
        matches!(self, Priority::Important)
    }
}

/// A single `name: value` pair inside a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, lowercased.
    pub name: String,
    /// Property value without any priority suffix.
    pub value: String,
    pub priority: Priority,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into().trim().to_ascii_lowercase(),
            value: value.into().trim().to_string(),
            priority,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.priority.is_important() {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

/// A selector plus an ordered declaration block.
///
/// Declarations keep their insertion order. Setting a property that is already
/// declared updates it in place, the way the CSS object model does.
///
/// # Example
///
/// ```rust
/// use stylebook::{Priority, StyleRule};
///
/// let mut rule = StyleRule::new(".foo-style[lang='xyz']");
/// rule.set_property("font-size", "20pt", Priority::Important);
/// assert_eq!(rule.css_text(), r#".foo-style[lang="xyz"] { font-size: 20pt !important; }"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    selector: String,
    declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Creates an empty rule.
    ///
    /// The selector is normalized the way browsers serialize it: whitespace
    /// runs collapse to one space and attribute values use double quotes.
    pub fn new(selector: &str) -> Self {
        Self {
            selector: normalize_selector(selector),
            declarations: Vec::new(),
        }
    }

    pub fn with_declarations(selector: &str, declarations: Vec<Declaration>) -> Self {
        let mut rule = Self::new(selector);
        for declaration in declarations {
            rule.set_declaration(declaration);
        }
        rule
    }

    pub fn selector_text(&self) -> &str {
        &self.selector
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn property_value(&self, name: &str) -> Option<&str> {
        self.declaration(name).map(|d| d.value.as_str())
    }

    pub fn property_priority(&self, name: &str) -> Option<Priority> {
        self.declaration(name).map(|d| d.priority)
    }

    fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Sets a property, replacing any earlier value for the same name.
    pub fn set_property(&mut self, name: &str, value: &str, priority: Priority) {
        self.set_declaration(Declaration::new(name, value, priority));
    }

    fn set_declaration(&mut self, declaration: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|d| d.name == declaration.name)
        {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
    }

    /// Removes a property, returning it if it was declared.
    pub fn remove_property(&mut self, name: &str) -> Option<Declaration> {
        let index = self
            .declarations
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))?;
        Some(self.declarations.remove(index))
    }

    /// Serializes the rule as `selector { name: value !important; }`.
    pub fn css_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.selector)?;
        for declaration in &self.declarations {
            write!(f, "{} ", declaration)?;
        }
        f.write_str("}")
    }
}

fn normalize_selector(selector: &str) -> String {
    selector
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\'', "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rule_is_empty() {
        let rule = StyleRule::new(".foo-style");
        assert!(rule.is_empty());
        assert_eq!(rule.css_text(), ".foo-style { }");
    }

    #[test]
    fn test_selector_normalization() {
        let rule = StyleRule::new("  .foo-style[lang='xyz']\n  ");
        assert_eq!(rule.selector_text(), ".foo-style[lang=\"xyz\"]");
    }

    #[test]
    fn test_set_property_updates_in_place() {
        let mut rule = StyleRule::new(".a-style");
        rule.set_property("font-size", "20pt", Priority::Important);
        rule.set_property("line-height", "1.5", Priority::Important);
        rule.set_property("FONT-SIZE", "25pt", Priority::Important);

        assert_eq!(rule.declarations().len(), 2);
        assert_eq!(rule.declarations()[0].name, "font-size");
        assert_eq!(rule.property_value("font-size"), Some("25pt"));
    }

    #[test]
    fn test_remove_property() {
        let mut rule = StyleRule::new(".a-style");
        rule.set_property("border", "1pt solid black", Priority::Important);

        let removed = rule.remove_property("border");
        assert_eq!(removed.map(|d| d.value), Some("1pt solid black".to_string()));
        assert!(rule.remove_property("border").is_none());
        assert!(rule.is_empty());
    }

    #[test]
    fn test_css_text_marks_priority() {
        let mut rule = StyleRule::new(".a-style");
        rule.set_property("font-size", "20pt", Priority::Important);
        rule.set_property("color", "red", Priority::Normal);
        assert_eq!(
            rule.css_text(),
            ".a-style { font-size: 20pt !important; color: red; }"
        );
    }
}
