//! The style editor attached to a text box.
//!
//! A [`StyleEditor`] lives as long as the page. It is attached to whichever
//! text box has focus, answers the size shortcuts directly, and opens a
//! [`FormatSession`] when the format dialog is shown.

use crate::config::EditorConfig;
use crate::describe::{self, Localizer, NoLocalization};
use crate::dom::{Document, ElementId};
use crate::error::StyleAlert;
use crate::host::EditorHost;
use crate::resolver::{lang_value, style_name_for_element};
use crate::session::FormatSession;
use crate::sheet::Priority;
use crate::snapshot::px_to_pt;
use crate::store::{get_or_create_rule_for_style, RuleRef};

/// Class marking a text box whose content does not fit.
pub const OVERFLOW_CLASS: &str = "overflow";

/// Class opting a text box out of updating the language-neutral rule.
pub const NO_DEFAULT_RULE_CLASS: &str = "bloom-nodefaultstylerule";

/// Step used by [`StyleEditor::make_bigger`] and [`StyleEditor::make_smaller`].
pub const SIZE_STEP_PT: i32 = 2;

/// Decides whether a text box's content overflows it.
pub trait OverflowCheck {
    fn is_overflowing(&self, doc: &Document, element: ElementId) -> bool;
}

/// For documents that are never laid out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverOverflows;

impl OverflowCheck for NeverOverflows {
    fn is_overflowing(&self, _doc: &Document, _element: ElementId) -> bool {
        false
    }
}

impl<F> OverflowCheck for F
where
    F: Fn(&Document, ElementId) -> bool,
{
    fn is_overflowing(&self, doc: &Document, element: ElementId) -> bool {
        self(doc, element)
    }
}

pub(crate) fn set_important(doc: &mut Document, rule: RuleRef, property: &str, value: &str) {
    match doc.rule_mut(rule) {
        Some(rule) => rule.set_property(property, value, Priority::Important),
        None => log::warn!("rule {:?} vanished before '{}' could be set", rule, property),
    }
}

pub struct StyleEditor {
    config: EditorConfig,
    author_mode: bool,
    localizer: Box<dyn Localizer>,
    overflow: Box<dyn OverflowCheck>,
    format_button_tip: String,
    attached: Option<ElementId>,
}

impl StyleEditor {
    pub fn new(config: EditorConfig) -> Self {
        let localizer: Box<dyn Localizer> = Box::new(NoLocalization);
        let format_button_tip = describe::format_button_tip(localizer.as_ref());
        Self {
            config,
            author_mode: false,
            localizer,
            overflow: Box::new(NeverOverflows),
            format_button_tip,
            attached: None,
        }
    }

    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self.format_button_tip = describe::format_button_tip(self.localizer.as_ref());
        self
    }

    pub fn with_overflow_check(mut self, overflow: impl OverflowCheck + 'static) -> Self {
        self.overflow = Box::new(overflow);
        self
    }

    /// Sets authoring mode directly, bypassing the host.
    pub fn with_author_mode(mut self, author_mode: bool) -> Self {
        self.author_mode = author_mode;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// `true` when authoring, `false` when translating.
    pub fn author_mode(&self) -> bool {
        self.author_mode
    }

    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// Tooltip currently shown on the format button.
    pub fn format_button_tip(&self) -> &str {
        &self.format_button_tip
    }

    /// The text box the editor is attached to.
    pub fn attached(&self) -> Option<ElementId> {
        self.attached
    }

    /// Attaches the editor to a text box and asks the host for the editing
    /// mode.
    ///
    /// Boxes without a resolvable style are not editable; the editor stays
    /// where it was and `None` is returned. When the host does not answer,
    /// the editor assumes translation mode.
    pub fn attach_to_box(
        &mut self,
        doc: &mut Document,
        target: ElementId,
        host: &dyn EditorHost,
    ) -> Option<String> {
        let style = style_name_for_element(doc, target)?;
        self.author_mode = match host.author_mode() {
            Ok(author_mode) => author_mode,
            Err(err) => {
                log::warn!("{}; assuming translation mode", err);
                false
            }
        };
        if let Some(previous) = self.attached.filter(|previous| *previous != target) {
            log::trace!("detaching from {:?}", previous);
        }
        self.attached = Some(target);
        self.format_button_tip = describe::format_button_tip(self.localizer());
        log::debug!("attached to box with '{}' (author mode: {})", style, self.author_mode);
        Some(style)
    }

    /// Opens the format dialog for the attached box.
    pub fn open_format_dialog(&self, doc: &mut Document, host: &dyn EditorHost) -> Option<FormatSession<'_>> {
        let target = self.attached?;
        let fonts = host.available_font_names().unwrap_or_else(|err| {
            log::warn!("{}; offering no fonts", err);
            Vec::new()
        });
        FormatSession::open(self, doc, target, fonts)
    }

    /// The computed font size of an element, in whole points.
    pub fn calculated_font_size_in_points(&self, doc: &Document, target: ElementId) -> f64 {
        px_to_pt(doc, doc.font_size_px(target), true)
    }

    /// Whether edits to this box should also reach boxes created later.
    ///
    /// New text boxes carry no language rule of their own, so when the box
    /// is in the language new boxes get, its size and spacing are also written
    /// into the language-neutral rule.
    pub fn should_set_default_rule(&self, doc: &Document, target: ElementId) -> bool {
        let Some(new_box_lang) = self.config.language_for_new_text_boxes.as_deref() else {
            return false;
        };
        lang_value(doc, target).as_deref() == Some(new_box_lang)
            && !doc.has_class(target, NO_DEFAULT_RULE_CLASS)
    }

    /// Writes a property whose rule depends on the editing mode: the
    /// language-neutral rule when authoring, otherwise the rule for the box's
    /// language (and the neutral one too, when the box is in the language of
    /// new boxes).
    pub(crate) fn set_mode_scoped(
        &self,
        doc: &mut Document,
        target: ElementId,
        style: &str,
        property: &str,
        value: &str,
    ) {
        let lang = lang_value(doc, target);
        let rule = get_or_create_rule_for_style(doc, style, lang.as_deref(), self.author_mode);
        set_important(doc, rule, property, value);
        if !self.author_mode && self.should_set_default_rule(doc, target) {
            let neutral = get_or_create_rule_for_style(doc, style, lang.as_deref(), true);
            set_important(doc, neutral, property, value);
        }
    }

    /// Marks or unmarks the box as overflowing.
    pub fn refresh_overflow(&self, doc: &mut Document, target: ElementId) {
        if self.overflow.is_overflowing(doc, target) {
            doc.add_class(target, OVERFLOW_CLASS);
        } else {
            doc.remove_class(target, OVERFLOW_CLASS);
        }
    }

    /// Changes the box's size by `delta` points relative to its computed
    /// size.
    ///
    /// Nothing happens when the box has no style or the result would fall
    /// below the configured minimum.
    pub fn change_size(&mut self, doc: &mut Document, target: ElementId, delta: i32) {
        let Some(style) = style_name_for_element(doc, target) else {
            log::debug!("size change ignored: element has no style");
            return;
        };
        let size = self.calculated_font_size_in_points(doc, target) + f64::from(delta);
        if size < f64::from(self.config.min_font_size) {
            log::debug!("size change to {}pt ignored: below minimum", size);
            return;
        }
        self.write_size(doc, target, &style, size);
    }

    pub fn make_bigger(&mut self, doc: &mut Document, target: ElementId) {
        self.change_size(doc, target, SIZE_STEP_PT);
    }

    pub fn make_smaller(&mut self, doc: &mut Document, target: ElementId) {
        self.change_size(doc, target, -SIZE_STEP_PT);
    }

    /// Sets the box's size to `size` points.
    ///
    /// Sizes below the configured minimum are ignored.
    ///
    /// # Errors
    ///
    /// [`StyleAlert::MissingStyleClass`] when the box has no style; the
    /// dialog is only offered for styled boxes, so this is a caller bug.
    pub fn change_size_absolute(
        &mut self,
        doc: &mut Document,
        target: ElementId,
        size: u32,
    ) -> Result<(), StyleAlert> {
        let style = style_name_for_element(doc, target).ok_or(StyleAlert::MissingStyleClass)?;
        if size < self.config.min_font_size {
            log::debug!("absolute size {}pt ignored: below minimum", size);
            return Ok(());
        }
        self.write_size(doc, target, &style, f64::from(size));
        Ok(())
    }

    fn write_size(&mut self, doc: &mut Document, target: ElementId, style: &str, size: f64) {
        self.set_mode_scoped(doc, target, style, "font-size", &format!("{}pt", size));
        self.refresh_overflow(doc, target);
        let lang = lang_value(doc, target);
        let current = self.calculated_font_size_in_points(doc, target);
        self.format_button_tip =
            describe::font_size_tip(self.localizer(), style, lang.as_deref(), current);
    }
}

impl Default for StyleEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
