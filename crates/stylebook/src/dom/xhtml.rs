//! Loading a book page from XHTML.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{Document, ElementId};
use crate::error::DocumentError;
use crate::sheet::StyleSheet;

/// Elements that never have content, even when the markup does not
/// self-close them.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

struct PendingStyle {
    title: Option<String>,
    css: String,
}

impl Document {
    /// Builds a document from page markup.
    ///
    /// Every element becomes a node and every `<style>` element becomes a
    /// stylesheet, titled by its `title` attribute. Linked stylesheets are not
    /// fetched. End tags are matched leniently so that hand-edited pages with
    /// unbalanced markup still load.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stylebook::{Document, RuleList};
    ///
    /// let doc = Document::from_xhtml(r#"<html><head>
    ///   <style title="userModifiedStyles">.foo-style { font-size: 20pt !important; }</style>
    /// </head><body><div id="box" class="foo-style" lang="xyz"/></body></html>"#)?;
    ///
    /// assert_eq!(doc.sheets()[0].title(), Some("userModifiedStyles"));
    /// assert_eq!(doc.sheets()[0].len(), 1);
    /// assert!(doc.find_by_id("box").is_some());
    /// # Ok::<(), stylebook::DocumentError>(())
    /// ```
    pub fn from_xhtml(markup: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().check_end_names = false;

        let mut doc = Document::new();
        let mut open: Vec<(String, ElementId)> = Vec::new();
        let mut style: Option<PendingStyle> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let parent = open.last().map(|(_, id)| *id);
                    let id = doc.insert_markup_element(&start, parent)?;
                    let tag = doc.element(id).tag().to_string();
                    if tag == "style" {
                        style = Some(PendingStyle {
                            title: doc.attribute(id, "title").map(str::to_string),
                            css: String::new(),
                        });
                    }
                    if !VOID_ELEMENTS.contains(&tag.as_str()) {
                        open.push((tag, id));
                    }
                }
                Event::Empty(start) => {
                    let parent = open.last().map(|(_, id)| *id);
                    doc.insert_markup_element(&start, parent)?;
                }
                Event::End(end) => {
                    let tag = local_name(end.name().as_ref());
                    if tag == "style" {
                        if let Some(pending) = style.take() {
                            log::trace!("loaded <style> titled {:?}", pending.title);
                            doc.add_sheet(StyleSheet::parse(pending.title.as_deref(), &pending.css));
                        }
                    }
                    if let Some(position) = open.iter().rposition(|(name, _)| *name == tag) {
                        open.truncate(position);
                    }
                }
                Event::Text(text) => {
                    if let Some(pending) = style.as_mut() {
                        let css = text
                            .unescape()
                            .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned().into());
                        pending.css.push_str(&css);
                    }
                }
                Event::CData(data) => {
                    if let Some(pending) = style.as_mut() {
                        pending.css.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !open.is_empty() {
            log::debug!("{} element(s) left unclosed at end of page", open.len());
        }
        Ok(doc)
    }

    fn insert_markup_element(
        &mut self,
        start: &BytesStart<'_>,
        parent: Option<ElementId>,
    ) -> Result<ElementId, DocumentError> {
        let tag = local_name(start.name().as_ref());
        let mut builder = self.create_element(&tag);
        for attribute in start.html_attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_lowercase();
            let key = if key == "xml:lang" { "lang".to_string() } else { key };
            // HTML named entities such as &nbsp; are not XML; keep them raw.
            let value = attribute
                .unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attribute.value).into_owned()));
            builder = builder.attr(&key, &value);
        }
        if let Some(parent) = parent {
            builder = builder.parent(parent);
        }
        Ok(builder.insert())
    }
}

fn local_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    name.rsplit(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::RuleList;

    const PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head>
    <style type="text/css">.normal-style { font-size: 12pt; } .Heading1-style { font-weight: bold; }</style>
    <style type="text/css" title="userModifiedStyles"><![CDATA[.normal-style[lang="en"] { font-size: 14pt !important; }]]></style>
    <link rel="stylesheet" href="basePage.css">
  </head>
  <body>
    <div class="bloom-page" data-pagelineage="5dcd48df-1234">
      <div class="bloom-translationGroup normal-style">
        <div id="en-box" class="bloom-editable" lang="en" style="text-align: center">Hello&#160;world<br></div>
      </div>
    </div>
  </body>
</html>"#;

    #[test]
    fn test_loads_sheets_in_order() {
        let doc = Document::from_xhtml(PAGE).expect("page loads");
        assert_eq!(doc.sheets().len(), 2);
        assert_eq!(doc.sheets()[0].title(), None);
        assert_eq!(doc.sheets()[0].len(), 2);
        assert_eq!(doc.sheets()[1].title(), Some("userModifiedStyles"));
        assert_eq!(
            doc.sheets()[1].rules()[0].selector_text(),
            ".normal-style[lang=\"en\"]"
        );
    }

    #[test]
    fn test_builds_element_tree() {
        let doc = Document::from_xhtml(PAGE).expect("page loads");
        let editable = doc.find_by_id("en-box").expect("box exists");
        let group = doc.parent(editable).expect("has parent");
        assert!(doc.has_class(group, "bloom-translationGroup"));
        assert_eq!(doc.attribute(editable, "lang"), Some("en"));
        assert_eq!(doc.element(editable).inline_style()[0].name, "text-align");
        let page = doc.closest(editable, "bloom-page").expect("inside a page");
        assert_eq!(doc.attribute(page, "data-pagelineage"), Some("5dcd48df-1234"));
    }

    #[test]
    fn test_unclosed_void_elements_do_not_nest() {
        let doc = Document::from_xhtml(PAGE).expect("page loads");
        let body = doc.select("body");
        assert_eq!(body.len(), 1);
        let parent_tag = |id| doc.parent(id).map(|p| doc.element(p).tag().to_string());
        let link = doc.select("link");
        assert_eq!(parent_tag(link[0]).as_deref(), Some("head"));
        assert_eq!(parent_tag(body[0]).as_deref(), Some("html"));
    }

    #[test]
    fn test_computed_style_from_loaded_page() {
        let doc = Document::from_xhtml(PAGE).expect("page loads");
        let editable = doc.find_by_id("en-box").expect("box exists");
        // 12pt inherited from the translation group; the lang rule names a
        // class the box itself does not carry.
        assert_eq!(doc.computed_value(editable, "font-size"), "16px");
        assert_eq!(doc.computed_value(editable, "text-align"), "center");
    }
}
