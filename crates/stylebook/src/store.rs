//! The user rule store.
//!
//! Every formatting change the user makes is written into one stylesheet
//! titled [`USER_SHEET_TITLE`]. Inside it, a style has at most one rule per
//! language qualifier:
//!
//! | qualifier                      | selector                  |
//! |--------------------------------|---------------------------|
//! | [`LanguageQualifier::Any`]     | `.foo-style`              |
//! | [`LanguageQualifier::Unmarked`]| `.foo-style:not([lang])`  |
//! | [`LanguageQualifier::Lang`]    | `.foo-style[lang="xyz"]`  |
//!
//! Rules are handed out as [`RuleRef`]s into the document's sheet list.

use std::fmt;

use crate::dom::Document;
use crate::resolver::STYLE_SUFFIX;
use crate::sheet::{RuleList, StyleRule, StyleSheet};

/// Title of the sheet holding user modifications.
pub const USER_SHEET_TITLE: &str = "userModifiedStyles";

/// Position of a rule in a document: sheet index, then rule index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleRef {
    pub sheet: usize,
    pub index: usize,
}

/// Which text boxes of a style a rule applies to, by language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageQualifier {
    /// Every box carrying the style.
    Any,
    /// Boxes without a `lang` attribute.
    Unmarked,
    /// Boxes in one language.
    Lang(String),
}

impl LanguageQualifier {
    /// The qualifier for a box with the given `lang` value.
    pub fn for_lang(lang: Option<&str>, ignore_language: bool) -> Self {
        match lang {
            _ if ignore_language => LanguageQualifier::Any,
            Some(lang) if !lang.is_empty() => LanguageQualifier::Lang(lang.to_string()),
            _ => LanguageQualifier::Unmarked,
        }
    }
}

impl fmt::Display for LanguageQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageQualifier::Any => Ok(()),
            LanguageQualifier::Unmarked => f.write_str(":not([lang])"),
            LanguageQualifier::Lang(lang) => write!(f, "[lang=\"{}\"]", lang),
        }
    }
}

/// The selector of the user rule for a style and qualifier.
///
/// # Example
///
/// ```rust
/// use stylebook::{rule_selector, LanguageQualifier};
///
/// assert_eq!(rule_selector("foo-style", &LanguageQualifier::Any), ".foo-style");
/// assert_eq!(
///     rule_selector("foo-style", &LanguageQualifier::Lang("xyz".into())),
///     r#".foo-style[lang="xyz"]"#
/// );
/// ```
pub fn rule_selector(style_name: &str, qualifier: &LanguageQualifier) -> String {
    format!(".{}{}", style_name, qualifier)
}

impl Document {
    pub fn rule(&self, rule: RuleRef) -> Option<&StyleRule> {
        self.sheet(rule.sheet)?.rules().get(rule.index)
    }

    pub fn rule_mut(&mut self, rule: RuleRef) -> Option<&mut StyleRule> {
        self.sheet_mut(rule.sheet)?.rule_mut(rule.index)
    }
}

/// Index of the user sheet, if the document has one.
pub fn user_sheet(doc: &Document) -> Option<usize> {
    doc.sheets()
        .iter()
        .position(|sheet| sheet.title() == Some(USER_SHEET_TITLE))
}

/// Index of the user sheet, appending an empty one if needed.
pub fn get_or_create_user_sheet(doc: &mut Document) -> usize {
    if let Some(index) = user_sheet(doc) {
        return index;
    }
    log::debug!("creating '{}' stylesheet", USER_SHEET_TITLE);
    doc.add_sheet(StyleSheet::titled(USER_SHEET_TITLE));
    // Look the sheet up again so the index always comes from the live list.
    user_sheet(doc).unwrap_or(doc.sheets().len() - 1)
}

/// Finds the rule for a style and qualifier in a rule list.
///
/// Selector text is compared case-insensitively and the style name must end
/// at an identifier boundary, so `.foo-style` never finds `.foo-style-big`.
/// With [`LanguageQualifier::Any`] a rule that mentions `[lang` never matches.
pub fn find_rule<L>(rules: &L, style_name: &str, qualifier: &LanguageQualifier) -> Option<usize>
where
    L: RuleList + ?Sized,
{
    let wanted = rule_selector(style_name, qualifier).to_ascii_lowercase();
    let ignore_language = *qualifier == LanguageQualifier::Any;
    rules.find_rule(&|rule| {
        let selector = rule.selector_text().to_ascii_lowercase();
        contains_at_boundary(&selector, &wanted) && !(ignore_language && selector.contains("[lang"))
    })
}

fn contains_at_boundary(haystack: &str, needle: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '-' || c == '_';
    let check_start = needle.chars().next().is_some_and(is_ident);
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !(check_start && before.is_some_and(is_ident)) && !after.is_some_and(is_ident)
    })
}

/// Returns the user rule for a style, creating an empty one if needed.
///
/// Repeated calls with the same arguments return the same rule.
///
/// # Example
///
/// ```rust
/// use stylebook::{get_or_create_rule_for_style, Document};
///
/// let mut doc = Document::new();
/// let first = get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), false);
/// let again = get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), false);
/// assert_eq!(first, again);
/// assert_eq!(doc.rule(first).map(|r| r.selector_text()), Some(r#".foo-style[lang="xyz"]"#));
/// ```
pub fn get_or_create_rule_for_style(
    doc: &mut Document,
    style_name: &str,
    lang: Option<&str>,
    ignore_language: bool,
) -> RuleRef {
    let qualifier = LanguageQualifier::for_lang(lang, ignore_language);
    let sheet = get_or_create_user_sheet(doc);

    let existing = doc
        .sheet(sheet)
        .and_then(|rules| find_rule(rules, style_name, &qualifier));
    if let Some(index) = existing {
        log::trace!("reusing rule {} for {}{}", index, style_name, qualifier);
        return RuleRef { sheet, index };
    }

    let selector = rule_selector(style_name, &qualifier);
    log::debug!("creating user rule '{}'", selector);
    let index = match doc.sheet_mut(sheet) {
        Some(rules) => {
            let end = rules.len();
            rules.insert_rule(StyleRule::new(&selector), end)
        }
        None => 0,
    };
    RuleRef { sheet, index }
}

/// The last rule outside the user sheet whose selector mentions `selector`
/// as a whole class name.
///
/// Returns `None` when no sheet defines it, or when the user sheet already
/// does; user changes are never overwritten by predefined values.
pub fn predefined_style(doc: &Document, selector: &str) -> Option<RuleRef> {
    let mut found = None;
    for (sheet_index, sheet) in doc.sheets().iter().enumerate() {
        for (index, rule) in sheet.rules().iter().enumerate() {
            if !contains_at_boundary(rule.selector_text(), selector) {
                continue;
            }
            if sheet.title() == Some(USER_SHEET_TITLE) {
                log::trace!("'{}' already has a user definition", selector);
                return None;
            }
            found = Some(RuleRef {
                sheet: sheet_index,
                index,
            });
        }
    }
    found
}

/// Names offered in the style chooser, without the `-style` suffix.
///
/// Every rule whose selector ends in `-style` contributes the last class
/// name of its selector, so predefined selectors can be as specific as they
/// need (`div.bloom-editing.Heading1-style`) and still offer one name.
/// `normal` is always offered.
pub fn formatting_styles(doc: &Document) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for sheet in doc.sheets() {
        for rule in sheet.rules() {
            let selector = rule.selector_text();
            let Some(stem) = selector.strip_suffix(STYLE_SUFFIX) else {
                continue;
            };
            let name = match stem.rfind('.') {
                Some(dot) => &stem[dot + 1..],
                None => stem,
            };
            if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }
    }
    if !names.iter().any(|name| name == "normal") {
        names.push("normal".to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Priority;

    fn user_rules(doc: &Document) -> Vec<String> {
        user_sheet(doc)
            .and_then(|index| doc.sheet(index))
            .map(|sheet| {
                sheet
                    .rules()
                    .iter()
                    .map(|rule| rule.selector_text().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_user_sheet_created_once() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(None, ".a-style { }"));
        let first = get_or_create_user_sheet(&mut doc);
        let second = get_or_create_user_sheet(&mut doc);
        assert_eq!(first, 1);
        assert_eq!(first, second);
        assert_eq!(doc.sheets().len(), 2);
    }

    #[test]
    fn test_existing_user_sheet_is_found() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(Some(USER_SHEET_TITLE), ".a-style { }"));
        doc.add_sheet(StyleSheet::parse(None, ".b-style { }"));
        assert_eq!(get_or_create_user_sheet(&mut doc), 0);
    }

    #[test]
    fn test_qualifier_selectors() {
        let mut doc = Document::new();
        get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), false);
        get_or_create_rule_for_style(&mut doc, "foo-style", None, false);
        get_or_create_rule_for_style(&mut doc, "foo-style", Some(""), false);
        get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), true);
        assert_eq!(
            user_rules(&doc),
            vec![
                ".foo-style[lang=\"xyz\"]",
                ".foo-style:not([lang])",
                ".foo-style",
            ]
        );
    }

    #[test]
    fn test_ignore_language_skips_qualified_rules() {
        let mut doc = Document::new();
        let qualified = get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), false);
        let neutral = get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), true);
        assert_ne!(qualified, neutral);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(
            Some(USER_SHEET_TITLE),
            ".Foo-Style[LANG='xyz'] { font-size: 8pt !important; }",
        ));
        let rule = get_or_create_rule_for_style(&mut doc, "foo-style", Some("xyz"), false);
        assert_eq!(rule, RuleRef { sheet: 0, index: 0 });
        assert_eq!(user_rules(&doc).len(), 1);
    }

    #[test]
    fn test_lookup_respects_identifier_boundary() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(Some(USER_SHEET_TITLE), ".foo-style-big { }"));
        let rule = get_or_create_rule_for_style(&mut doc, "foo-style", None, true);
        assert_eq!(rule.index, 1);
        assert_eq!(user_rules(&doc), vec![".foo-style-big", ".foo-style"]);
    }

    #[test]
    fn test_new_rules_go_last() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(Some(USER_SHEET_TITLE), ".a-style { } .b-style { }"));
        let rule = get_or_create_rule_for_style(&mut doc, "c-style", None, true);
        assert_eq!(rule.index, 2);
    }

    #[test]
    fn test_rule_mut_through_ref() {
        let mut doc = Document::new();
        let rule = get_or_create_rule_for_style(&mut doc, "foo-style", None, true);
        if let Some(rule) = doc.rule_mut(rule) {
            rule.set_property("font-size", "20pt", Priority::Important);
        }
        assert_eq!(
            doc.rule(rule).and_then(|r| r.property_value("font-size")),
            Some("20pt")
        );
    }

    #[test]
    fn test_predefined_style() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(
            None,
            ".bar-style { color: red } div.bloom-editing.bar-style { font-size: 9pt }",
        ));
        assert_eq!(
            predefined_style(&doc, "bar-style"),
            Some(RuleRef { sheet: 0, index: 1 })
        );
        assert_eq!(predefined_style(&doc, "baz-style"), None);

        get_or_create_rule_for_style(&mut doc, "bar-style", None, true);
        assert_eq!(predefined_style(&doc, "bar-style"), None);
    }

    #[test]
    fn test_predefined_style_ignores_longer_names() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(None, ".bar-style { color: red }"));
        get_or_create_rule_for_style(&mut doc, "foobar-style", None, true);
        get_or_create_rule_for_style(&mut doc, "bar-style-big", None, true);
        assert_eq!(
            predefined_style(&doc, "bar-style"),
            Some(RuleRef { sheet: 0, index: 0 })
        );
    }

    #[test]
    fn test_formatting_styles() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(
            None,
            ".Heading1-style { } div.bloom-editing.Heading2-style { } .Heading1-style { } \
             .foo-style[lang=\"en\"] { } .bloom-page { }",
        ));
        assert_eq!(formatting_styles(&doc), vec!["Heading1", "Heading2", "normal"]);
    }

    #[test]
    fn test_formatting_styles_keeps_defined_normal_in_place() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(None, ".normal-style { } .Title-On-Cover-style { }"));
        assert_eq!(formatting_styles(&doc), vec!["normal", "Title-On-Cover"]);
    }
}
