//! Localized texts shown around the format controls.
//!
//! Every message has an id and an English template. A [`Localizer`] may
//! supply a translated template for the id; either way the template is
//! rendered with minijinja, so translations use the same named placeholders
//! as the English text (`{{ style }}`, `{{ lang }}`, `{{ size }}`).

use std::collections::HashMap;

use minijinja::{context, Environment, Value};
use once_cell::sync::Lazy;

use crate::options::WordSpacing;
use crate::resolver::STYLE_SUFFIX;

pub const FONT_SIZE_TIP_ID: &str = "BookEditor.FontSizeTip";
pub const FOR_TEXT_ID: &str = "BookEditor.ForText";
pub const FOR_TEXT_IN_LANG_ID: &str = "BookEditor.ForTextInLang";
pub const FORMAT_BUTTON_TIP_ID: &str = "EditTab.StyleEditorTip";

const FONT_SIZE_TIP: &str = "Changes the text size for all boxes carrying the style '{{ style }}' \
                             and language '{{ lang }}'.\nCurrent size is {{ size }}pt.";
const FOR_TEXT: &str = "This formatting is for all text boxes with '{{ style }}' style";
const FOR_TEXT_IN_LANG: &str =
    "This formatting is for all {{ lang }} text boxes with '{{ style }}' style";
const FORMAT_BUTTON_TIP: &str = "Adjust formatting for style";

static ENV: Lazy<Environment<'static>> = Lazy::new(Environment::new);

/// Source of translated message templates.
pub trait Localizer {
    /// The template to render for message `id`; `english` when there is no
    /// translation.
    fn get_text(&self, id: &str, english: &str) -> String;
}

/// Always answers with the English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalization;

impl Localizer for NoLocalization {
    fn get_text(&self, _id: &str, english: &str) -> String {
        english.to_string()
    }
}

impl Localizer for HashMap<String, String> {
    fn get_text(&self, id: &str, english: &str) -> String {
        self.get(id).cloned().unwrap_or_else(|| english.to_string())
    }
}

/// Renders a message, falling back to English when the translation is not
/// a valid template.
fn render(localizer: &dyn Localizer, id: &str, english: &str, ctx: Value) -> String {
    let template = localizer.get_text(id, english);
    match ENV.render_str(&template, ctx.clone()) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("translation of {} failed to render: {}", id, err);
            ENV.render_str(english, ctx).unwrap_or_else(|_| english.to_string())
        }
    }
}

/// A style class without its `-style` suffix.
pub fn base_style_name(style: &str) -> &str {
    match style.find(STYLE_SUFFIX) {
        Some(index) if index > 0 => &style[..index],
        _ => style,
    }
}

/// A style class as users see it: no suffix, spaces for dashes.
///
/// ```rust
/// use stylebook::describe::display_style_name;
///
/// assert_eq!(display_style_name("Title-On-Cover-style"), "Title On Cover");
/// ```
pub fn display_style_name(style: &str) -> String {
    base_style_name(style).replace('-', " ")
}

/// Description on the character tab.
///
/// When authoring, changes apply to every language, so the language is left
/// out.
pub fn char_tab_description(
    localizer: &dyn Localizer,
    style: Option<&str>,
    lang: Option<&str>,
    author_mode: bool,
) -> String {
    let style = style.map(base_style_name).unwrap_or_default();
    if author_mode {
        return render(localizer, FOR_TEXT_ID, FOR_TEXT, context! { style });
    }
    let lang = lang.unwrap_or_default();
    render(localizer, FOR_TEXT_IN_LANG_ID, FOR_TEXT_IN_LANG, context! { style, lang })
}

/// Description on the "More" tab, whose settings never depend on language.
pub fn more_tab_description(localizer: &dyn Localizer, style: Option<&str>) -> String {
    let style = style.map(base_style_name).unwrap_or_default();
    render(localizer, FOR_TEXT_ID, FOR_TEXT, context! { style })
}

/// Tooltip of the format button after a size change.
pub fn font_size_tip(localizer: &dyn Localizer, style: &str, lang: Option<&str>, size_pt: f64) -> String {
    let style = display_style_name(style);
    let lang = lang.unwrap_or_default();
    let size = size_pt.round() as i64;
    render(localizer, FONT_SIZE_TIP_ID, FONT_SIZE_TIP, context! { style, lang, size })
}

/// Tooltip of the format button before any change.
pub fn format_button_tip(localizer: &dyn Localizer) -> String {
    render(localizer, FORMAT_BUTTON_TIP_ID, FORMAT_BUTTON_TIP, context! {})
}

/// Localized label of a word spacing tier.
pub fn word_spacing_label(localizer: &dyn Localizer, spacing: WordSpacing) -> String {
    render(localizer, spacing.localization_id(), spacing.label(), context! {})
}
