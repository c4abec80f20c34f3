//! Style names on page elements.
//!
//! A text box is styled by one class ending in `-style`. The class usually
//! sits on the box itself, but older pages put it on the enclosing
//! translation group, and several generations of books used names that have
//! since been replaced. [`style_name_for_element`] resolves all of those
//! cases and migrates the element in place, so later lookups take the fast
//! path.

use crate::dom::{Document, ElementId};

/// Suffix identifying a style class.
pub const STYLE_SUFFIX: &str = "-style";

/// Class of the container holding one text box per language.
pub const TRANSLATION_GROUP_CLASS: &str = "bloom-translationGroup";

/// Class of a page element.
pub const PAGE_CLASS: &str = "bloom-page";

/// Attribute on a page naming the template page it was created from.
pub const PAGE_LINEAGE_ATTRIBUTE: &str = "data-pagelineage";

/// Lineage prefix of pages from the first release of the basic book, which
/// predates style classes.
pub const PRE_STYLE_LINEAGE_PREFIX: &str = "5dcd48df";

/// The style applied to book titles on the front cover.
pub const COVER_TITLE_STYLE: &str = "Title-On-Cover-style";

/// Earlier names for [`COVER_TITLE_STYLE`], oldest first.
pub const LEGACY_COVER_TITLE_CLASSES: [&str; 2] = ["coverTitle", "coverTitle-style"];

/// The default body text style.
pub const NORMAL_STYLE: &str = "normal-style";

/// Earlier name for [`NORMAL_STYLE`].
pub const DEPRECATED_DEFAULT_STYLE: &str = "default-style";

fn is_style_class(class: &str) -> bool {
    class.find(STYLE_SUFFIX).is_some_and(|position| position > 0)
}

/// Finds the style class on one element, migrating a legacy cover title.
///
/// Does not look at ancestors.
pub fn style_class_from_element(doc: &mut Document, element: ElementId) -> Option<String> {
    for legacy in LEGACY_COVER_TITLE_CLASSES {
        if doc.remove_class(element, legacy) {
            log::debug!("migrating legacy class '{}' to '{}'", legacy, COVER_TITLE_STYLE);
            doc.add_class(element, COVER_TITLE_STYLE);
        }
    }
    doc.element(element)
        .classes()
        .iter()
        .find(|class| is_style_class(class))
        .cloned()
}

/// Resolves the style name for a text box.
///
/// Order of resolution:
///
/// 1. a style class on the element itself;
/// 2. a style class on the parent translation group, which is then copied
///    onto the element;
/// 3. `normal-style`, when the enclosing page comes from a book that
///    predates style classes.
///
/// A resolved `default-style` is renamed to `normal-style` on the element.
/// Returns `None` when nothing applies; the element is then left untouched.
///
/// # Example
///
/// ```rust
/// use stylebook::{style_name_for_element, Document};
///
/// let mut doc = Document::new();
/// let group = doc.create_element("div").class("bloom-translationGroup coverTitle").insert();
/// let editable = doc.create_element("div").parent(group).insert();
///
/// assert_eq!(style_name_for_element(&mut doc, editable).as_deref(), Some("Title-On-Cover-style"));
/// assert!(doc.has_class(editable, "Title-On-Cover-style"));
/// ```
pub fn style_name_for_element(doc: &mut Document, element: ElementId) -> Option<String> {
    let mut style_name = style_class_from_element(doc, element);

    if style_name.is_none() {
        let group = doc
            .parent(element)
            .filter(|&parent| doc.has_class(parent, TRANSLATION_GROUP_CLASS));
        let from_group = match group {
            Some(group) => style_class_from_element(doc, group),
            None => None,
        };
        match from_group {
            Some(name) => {
                log::trace!("copying '{}' from translation group onto text box", name);
                doc.add_class(element, &name);
                style_name = Some(name);
            }
            None => return migrate_pre_style_book(doc, element),
        }
    }

    if style_name.as_deref() == Some(DEPRECATED_DEFAULT_STYLE) {
        log::debug!("renaming '{}' to '{}'", DEPRECATED_DEFAULT_STYLE, NORMAL_STYLE);
        doc.remove_class(element, DEPRECATED_DEFAULT_STYLE);
        doc.add_class(element, NORMAL_STYLE);
        style_name = Some(NORMAL_STYLE.to_string());
    }
    style_name
}

/// Assigns `normal-style` to a box on a page from a pre-style book.
pub fn migrate_pre_style_book(doc: &mut Document, element: ElementId) -> Option<String> {
    let page = doc.closest(element, PAGE_CLASS)?;
    let lineage = doc.attribute(page, PAGE_LINEAGE_ATTRIBUTE)?;
    if !lineage.starts_with(PRE_STYLE_LINEAGE_PREFIX) {
        return None;
    }
    log::debug!("page lineage {} predates styles; assigning '{}'", lineage, NORMAL_STYLE);
    doc.add_class(element, NORMAL_STYLE);
    Some(NORMAL_STYLE.to_string())
}

/// Replaces the element's style class with `new_style`.
pub fn set_style_name_for_element(doc: &mut Document, element: ElementId, new_style: &str) {
    if let Some(old_style) = style_class_from_element(doc, element) {
        doc.remove_class(element, &old_style);
    }
    doc.add_class(element, new_style);
}

/// The element's `lang` attribute; an empty value counts as absent.
pub fn lang_value(doc: &Document, element: ElementId) -> Option<String> {
    doc.attribute(element, "lang")
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}
