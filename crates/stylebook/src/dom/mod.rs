//! A small in-memory page model.
//!
//! The editor works against a live page: elements with classes and
//! attributes, plus the ordered list of stylesheets that style them. This
//! module provides that page as plain data so that the rule store, the
//! snapshot reader and the mutation commands can run anywhere:
//!
//! - [`Document`]: the element arena and its stylesheets
//! - [`Element`] / [`ElementId`]: one node and its handle
//! - [`SelectorList`]: the selector subset used for matching
//! - computed style lookup, see [`Document::computed_value`]
//! - page loading, see [`Document::from_xhtml`]

mod cascade;
mod selector;
mod xhtml;

pub use selector::SelectorList;

use crate::sheet::{parse_declaration_list, Declaration, StyleSheet};

/// CSS pixels per point at 100% zoom.
pub const PIXELS_PER_POINT: f64 = 4.0 / 3.0;

/// Handle to an element inside the [`Document`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// One element of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    inline_style: Vec<Declaration>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// An attribute other than `class` and `style`, which are kept parsed.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn inline_style(&self) -> &[Declaration] {
        &self.inline_style
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// A page: stylesheets in document order plus an element tree.
///
/// Elements are never removed, so every [`ElementId`] handed out stays valid.
/// Passing an id from a different document is a programming error and
/// panics.
///
/// # Example
///
/// ```rust
/// use stylebook::Document;
///
/// let mut doc = Document::new();
/// let group = doc.create_element("div").class("bloom-translationGroup normal-style").insert();
/// let box_id = doc.create_element("div").attr("lang", "en").parent(group).insert();
///
/// assert_eq!(doc.element(box_id).attribute("lang"), Some("en"));
/// assert_eq!(doc.element(box_id).parent(), Some(group));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    sheets: Vec<StyleSheet>,
    elements: Vec<Element>,
    zoom: f64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            elements: Vec::new(),
            zoom: 1.0,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- stylesheets ----

    /// Appends a sheet and returns its index.
    pub fn add_sheet(&mut self, sheet: StyleSheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    pub fn sheets(&self) -> &[StyleSheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&StyleSheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut StyleSheet> {
        self.sheets.get_mut(index)
    }

    // ---- elements ----

    /// Starts building a new element.
    pub fn create_element(&mut self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            doc: self,
            element: Element {
                tag: tag.to_ascii_lowercase(),
                classes: Vec::new(),
                attributes: Vec::new(),
                inline_style: Vec::new(),
                parent: None,
                children: Vec::new(),
            },
        }
    }

    /// # Panics
    ///
    /// Panics if `id` was created by another document.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// All element ids in document order.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.elements.len()).map(ElementId)
    }

    /// The first element whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.element_ids()
            .find(|&element| self.element(element).id() == Some(id))
    }

    /// All elements matching a selector, in document order.
    pub fn select(&self, selectors: &str) -> Vec<ElementId> {
        match SelectorList::parse(selectors) {
            Some(list) => self
                .element_ids()
                .filter(|&id| list.matches(self, id))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).parent
    }

    /// The element itself followed by each of its ancestors.
    pub fn ancestors_inclusive(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// The nearest element, starting with `id` itself, carrying `class`.
    pub fn closest(&self, id: ElementId, class: &str) -> Option<ElementId> {
        self.ancestors_inclusive(id)
            .find(|&candidate| self.element(candidate).has_class(class))
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).has_class(class)
    }

    /// Adds a class unless it is already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let element = self.element_mut(id);
        if !class.is_empty() && !element.has_class(class) {
            element.classes.push(class.to_string());
        }
    }

    /// Removes every occurrence of a class. Returns whether it was present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        let element = self.element_mut(id);
        let before = element.classes.len();
        element.classes.retain(|c| c != class);
        element.classes.len() != before
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).attribute(name)
    }

    /// Sets an attribute. `class` and `style` are parsed into their own
    /// representations.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let element = self.element_mut(id);
        match name.to_ascii_lowercase().as_str() {
            "class" => {
                element.classes.clear();
                for class in value.split_whitespace() {
                    if !element.has_class(class) {
                        element.classes.push(class.to_string());
                    }
                }
            }
            "style" => element.inline_style = parse_declaration_list(value),
            lower => match element
                .attributes
                .iter_mut()
                .find(|(n, _)| n.eq_ignore_ascii_case(lower))
            {
                Some((_, existing)) => *existing = value.to_string(),
                None => element.attributes.push((lower.to_string(), value.to_string())),
            },
        }
    }

    // ---- measurement ----

    /// Page zoom applied to every measurement.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Width in pixels of a probe `points` wide, as the page renders it.
    pub fn measure_points_px(&self, points: f64) -> f64 {
        points * PIXELS_PER_POINT * self.zoom
    }
}

/// Builder returned by [`Document::create_element`].
#[must_use = "call insert() to add the element to the document"]
pub struct ElementBuilder<'d> {
    doc: &'d mut Document,
    element: Element,
}

impl ElementBuilder<'_> {
    /// Adds one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.element.has_class(class) {
                self.element.classes.push(class.to_string());
            }
        }
        self
    }

    /// Sets an attribute; `class` and `style` are parsed.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "class" => return self.class(value),
            "style" => self.element.inline_style = parse_declaration_list(value),
            lower => {
                self.element.attributes.retain(|(n, _)| n != lower);
                self.element
                    .attributes
                    .push((lower.to_string(), value.to_string()));
            }
        }
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn style(self, declarations: &str) -> Self {
        self.attr("style", declarations)
    }

    pub fn parent(mut self, parent: ElementId) -> Self {
        self.element.parent = Some(parent);
        self
    }

    /// Adds the element to the document, as the last child of its parent.
    pub fn insert(self) -> ElementId {
        let id = ElementId(self.doc.elements.len());
        let parent = self.element.parent;
        self.doc.elements.push(self.element);
        if let Some(parent) = parent {
            self.doc.element_mut(parent).children.push(id);
        }
        id
    }
}
