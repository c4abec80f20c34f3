//! One opening of the format dialog.
//!
//! A [`FormatSession`] holds the control values the dialog shows and turns
//! every control change into rule edits. Which rule an edit lands in
//! depends on the control:
//!
//! | controls                              | rule                                   |
//! |---------------------------------------|----------------------------------------|
//! | font                                  | the box's language                     |
//! | size, line spacing, word spacing      | language-neutral when authoring, else the box's language |
//! | emphasis, position, border, background| language-neutral                       |
//!
//! While the controls are being resynchronized from the page, changes are
//! recorded but not applied.

use serde::Serialize;

use crate::creation::{insert_sorted, style_exists, StyleCreation};
use crate::describe::{self, base_style_name};
use crate::dom::{Document, ElementId};
use crate::editor::{set_important, StyleEditor};
use crate::options::{
    option_label, BackgroundChoice, BorderChoice, ButtonPanel, Position, PropertyButton,
    WordSpacing,
};
use crate::resolver::{lang_value, set_style_name_for_element, style_name_for_element, STYLE_SUFFIX};
use crate::sheet::split_priority;
use crate::snapshot::{read_format_values, FormatSnapshot};
use crate::store::{formatting_styles, get_or_create_rule_for_style, predefined_style, RuleRef};

/// Properties cleared when the border is turned off.
const BORDER_PROPERTIES: [&str; 6] = [
    "border-style",
    "border",
    "border-color",
    "border-radius",
    "padding",
    "box-sizing",
];

/// Values of the dialog's controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatControls {
    pub font: String,
    pub size: String,
    pub line_height: Option<String>,
    pub word_spacing: WordSpacing,
    #[serde(skip)]
    pub buttons: ButtonPanel,
}

impl FormatControls {
    /// Control values showing a snapshot.
    pub fn from_snapshot(current: &FormatSnapshot) -> Self {
        let mut buttons = ButtonPanel::new();
        for (button, on) in [
            (PropertyButton::Bold, current.bold),
            (PropertyButton::Italic, current.italic),
            (PropertyButton::Underline, current.underline),
            (PropertyButton::Position(Position::Center), current.center),
            (PropertyButton::Position(Position::Leading), !current.center),
            (PropertyButton::Border(current.border), true),
            (PropertyButton::Background(current.background), true),
        ] {
            if on {
                buttons.select(button);
            }
        }
        Self {
            font: current.font_name.clone(),
            size: current.pt_size.clone(),
            line_height: current.line_height.clone(),
            word_spacing: current.word_spacing,
            buttons,
        }
    }
}

pub struct FormatSession<'e> {
    editor: &'e StyleEditor,
    target: ElementId,
    controls: FormatControls,
    ignore_control_changes: bool,
    styles: Vec<String>,
    selected_style: String,
    fonts: Vec<String>,
    creation: StyleCreation,
    char_description: String,
    more_description: String,
}

impl<'e> FormatSession<'e> {
    pub(crate) fn open(
        editor: &'e StyleEditor,
        doc: &mut Document,
        target: ElementId,
        fonts: Vec<String>,
    ) -> Option<Self> {
        let style = style_name_for_element(doc, target)?;
        let selected_style = base_style_name(&style).to_string();

        let mut styles = formatting_styles(doc);
        if !styles.contains(&selected_style) {
            styles.push(selected_style.clone());
        }
        styles.sort_by_key(|name| name.to_lowercase());

        let current = read_format_values(doc, target, editor.config());
        let mut session = Self {
            editor,
            target,
            controls: FormatControls::from_snapshot(&current),
            ignore_control_changes: false,
            styles,
            selected_style,
            fonts,
            creation: StyleCreation::new(),
            char_description: String::new(),
            more_description: String::new(),
        };
        session.refresh_descriptions(doc);
        log::debug!("format dialog opened for '{}'", style);
        Some(session)
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn controls(&self) -> &FormatControls {
        &self.controls
    }

    /// Style names offered, sorted ignoring case.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// The style selected in the style list, without its suffix.
    pub fn selected_style(&self) -> &str {
        &self.selected_style
    }

    pub fn fonts(&self) -> &[String] {
        &self.fonts
    }

    /// Font choices as `(value, label)`, long names shortened.
    pub fn font_options(&self) -> Vec<(String, String)> {
        let width = self.editor.config().font_label_width;
        self.fonts
            .iter()
            .map(|font| (font.clone(), option_label(font, width)))
            .collect()
    }

    /// Word spacing choices with localized labels.
    pub fn word_spacing_options(&self) -> Vec<(WordSpacing, String)> {
        WordSpacing::ALL
            .into_iter()
            .map(|tier| (tier, describe::word_spacing_label(self.editor.localizer(), tier)))
            .collect()
    }

    pub fn creation(&self) -> &StyleCreation {
        &self.creation
    }

    pub fn char_description(&self) -> &str {
        &self.char_description
    }

    pub fn more_description(&self) -> &str {
        &self.more_description
    }

    /// Reads the box's current format.
    pub fn snapshot(&self, doc: &Document) -> FormatSnapshot {
        read_format_values(doc, self.target, self.editor.config())
    }

    // Rule edits

    /// The user rule for the box's style, or `None` when the box has lost
    /// its style.
    fn style_rule(&self, doc: &mut Document, ignore_language: bool) -> Option<RuleRef> {
        let Some(style) = style_name_for_element(doc, self.target) else {
            log::debug!("control change ignored: box has no style");
            return None;
        };
        let lang = lang_value(doc, self.target);
        Some(get_or_create_rule_for_style(doc, &style, lang.as_deref(), ignore_language))
    }

    fn set_neutral(&self, doc: &mut Document, property: &str, value: &str) {
        if let Some(rule) = self.style_rule(doc, true) {
            set_important(doc, rule, property, value);
        }
    }

    fn set_mode_scoped(&self, doc: &mut Document, property: &str, value: &str) {
        let Some(style) = style_name_for_element(doc, self.target) else {
            log::debug!("control change ignored: box has no style");
            return;
        };
        self.editor
            .set_mode_scoped(doc, self.target, &style, property, value);
    }

    fn apply_font(&self, doc: &mut Document) {
        if let Some(rule) = self.style_rule(doc, false) {
            set_important(doc, rule, "font-family", &self.controls.font);
        }
    }

    fn apply_size(&self, doc: &mut Document) {
        let size = self.controls.size.trim();
        match size.parse::<f64>() {
            Ok(points) if points >= f64::from(self.editor.config().min_font_size) => {
                self.set_mode_scoped(doc, "font-size", &format!("{}pt", size));
            }
            _ => log::debug!("size '{}' ignored", size),
        }
    }

    fn apply_line_height(&self, doc: &mut Document) {
        if let Some(line_height) = self.controls.line_height.clone() {
            self.set_mode_scoped(doc, "line-height", &line_height);
        }
    }

    fn apply_word_space(&self, doc: &mut Document) {
        self.set_mode_scoped(doc, "word-spacing", self.controls.word_spacing.css_value());
    }

    fn apply_emphasis(&self, doc: &mut Document, button: PropertyButton) {
        let on = self.controls.buttons.is_selected(button);
        let (property, value) = match button {
            PropertyButton::Bold => ("font-weight", if on { "bold" } else { "normal" }),
            PropertyButton::Italic => ("font-style", if on { "italic" } else { "normal" }),
            PropertyButton::Underline => ("text-decoration", if on { "underline" } else { "none" }),
            _ => return,
        };
        self.set_neutral(doc, property, value);
    }

    fn apply_background(&self, doc: &mut Document) {
        let color = match self.controls.buttons.background() {
            BackgroundChoice::Gray => self.editor.config().preferred_gray.as_str(),
            BackgroundChoice::None => "transparent",
        };
        self.set_neutral(doc, "background-color", color);
    }

    fn apply_position(&self, doc: &mut Document) {
        self.set_neutral(doc, "text-align", self.controls.buttons.position().css_value());
    }

    fn apply_border(&self, doc: &mut Document) {
        let Some(rule) = self.style_rule(doc, true) else {
            return;
        };
        let choice = self.controls.buttons.border();
        let Some(color) = choice.color() else {
            if let Some(rule) = doc.rule_mut(rule) {
                for property in BORDER_PROPERTIES {
                    rule.remove_property(property);
                }
            }
            return;
        };
        let radius = if choice.is_round() { "10px" } else { "0px" };
        set_important(doc, rule, "border", &format!("1pt solid {}", color));
        set_important(doc, rule, "border-radius", radius);
        set_important(doc, rule, "padding", "10px");
        set_important(doc, rule, "box-sizing", "border-box");
    }

    /// Re-checks overflow and refreshes the tab descriptions.
    pub fn cleanup(&mut self, doc: &mut Document) {
        if style_name_for_element(doc, self.target).is_none() {
            return;
        }
        self.editor.refresh_overflow(doc, self.target);
        self.refresh_descriptions(doc);
    }

    fn refresh_descriptions(&mut self, doc: &mut Document) {
        let style = style_name_for_element(doc, self.target);
        let lang = lang_value(doc, self.target);
        let localizer = self.editor.localizer();
        self.char_description = describe::char_tab_description(
            localizer,
            style.as_deref(),
            lang.as_deref(),
            self.editor.author_mode(),
        );
        self.more_description = describe::more_tab_description(localizer, style.as_deref());
    }

    /// Runs `apply` unless control changes are suppressed, then cleans up.
    fn commit(&mut self, doc: &mut Document, apply: fn(&Self, &mut Document)) {
        if self.ignore_control_changes {
            return;
        }
        apply(self, doc);
        self.cleanup(doc);
    }

    // Control changes

    pub fn change_font(&mut self, doc: &mut Document, font: &str) {
        self.controls.font = font.to_string();
        self.commit(doc, Self::apply_font);
    }

    /// Sets the point size; values below the configured minimum are ignored.
    pub fn change_size(&mut self, doc: &mut Document, size: &str) {
        self.controls.size = size.to_string();
        self.commit(doc, Self::apply_size);
    }

    pub fn change_line_height(&mut self, doc: &mut Document, line_height: &str) {
        self.controls.line_height = Some(line_height.to_string());
        self.commit(doc, Self::apply_line_height);
    }

    pub fn change_word_space(&mut self, doc: &mut Document, spacing: WordSpacing) {
        self.controls.word_spacing = spacing;
        self.commit(doc, Self::apply_word_space);
    }

    pub fn change_bold(&mut self, doc: &mut Document) {
        self.commit(doc, |session, doc| session.apply_emphasis(doc, PropertyButton::Bold));
    }

    pub fn change_italic(&mut self, doc: &mut Document) {
        self.commit(doc, |session, doc| session.apply_emphasis(doc, PropertyButton::Italic));
    }

    pub fn change_underline(&mut self, doc: &mut Document) {
        self.commit(doc, |session, doc| session.apply_emphasis(doc, PropertyButton::Underline));
    }

    pub fn change_background(&mut self, doc: &mut Document) {
        self.commit(doc, Self::apply_background);
    }

    pub fn change_position(&mut self, doc: &mut Document) {
        self.commit(doc, Self::apply_position);
    }

    pub fn change_border_select(&mut self, doc: &mut Document) {
        self.commit(doc, Self::apply_border);
    }

    /// Clicks one of the "More" tab buttons and applies the result.
    pub fn click_button(&mut self, doc: &mut Document, button: PropertyButton) {
        self.controls.buttons.click(button);
        match button {
            PropertyButton::Bold => self.change_bold(doc),
            PropertyButton::Italic => self.change_italic(doc),
            PropertyButton::Underline => self.change_underline(doc),
            PropertyButton::Position(_) => self.change_position(doc),
            PropertyButton::Border(_) => self.change_border_select(doc),
            PropertyButton::Background(_) => self.change_background(doc),
        }
    }

    /// Convenience for choosing a border preset.
    pub fn choose_border(&mut self, doc: &mut Document, choice: BorderChoice) {
        self.click_button(doc, PropertyButton::Border(choice));
    }

    // Styles

    /// Switches the box to the style `name` (without suffix).
    ///
    /// A style defined only by the book's own stylesheets is first copied into
    /// the user rules, so it survives outside the book. Font families go to
    /// the box's language; everything else is language-neutral.
    pub fn select_style(&mut self, doc: &mut Document, name: &str) {
        self.creation.clear_input();
        self.selected_style = name.to_string();
        let style = format!("{}{}", name, STYLE_SUFFIX);
        set_style_name_for_element(doc, self.target, &style);

        if let Some(predefined) = predefined_style(doc, &style) {
            let declarations = doc
                .rule(predefined)
                .map(|rule| rule.declarations().to_vec())
                .unwrap_or_default();
            log::debug!("copying {} predefined declaration(s) of '{}'", declarations.len(), style);
            let lang = lang_value(doc, self.target);
            let neutral = get_or_create_rule_for_style(doc, &style, lang.as_deref(), true);
            for declaration in declarations {
                let (value, _) = split_priority(&declaration.value);
                let rule = if declaration.name == "font-family" {
                    get_or_create_rule_for_style(doc, &style, lang.as_deref(), false)
                } else {
                    neutral
                };
                set_important(doc, rule, &declaration.name, value);
            }
        }

        self.sync_controls(doc);
        self.cleanup(doc);
    }

    /// Sets every control to the box's current format.
    ///
    /// The change commands run with control changes suppressed, so the page
    /// is left untouched.
    pub fn sync_controls(&mut self, doc: &mut Document) {
        let current = FormatControls::from_snapshot(&self.snapshot(doc));
        self.ignore_control_changes = true;
        self.change_font(doc, &current.font);
        self.change_size(doc, &current.size);
        if let Some(line_height) = &current.line_height {
            self.change_line_height(doc, line_height);
        }
        self.change_word_space(doc, current.word_spacing);
        self.controls.buttons = current.buttons;
        self.change_bold(doc);
        self.change_italic(doc);
        self.change_underline(doc);
        self.change_position(doc);
        self.change_border_select(doc);
        self.change_background(doc);
        self.controls.line_height = current.line_height;
        self.ignore_control_changes = false;
    }

    pub fn show_create_style(&mut self) {
        self.creation.show_create();
    }

    /// Takes new text from the style name field.
    pub fn style_input_changed(&mut self, raw: &str) {
        self.creation.input_changed(raw, &self.styles);
    }

    /// Creates a style named by the input field from the current controls.
    ///
    /// Returns `false` when the name field does not allow creation: nothing
    /// typed, a name already in the list, or characters were removed.
    pub fn create_style(&mut self, doc: &mut Document) -> bool {
        if !self.creation.create_enabled() {
            log::debug!("style creation refused in state {:?}", self.creation.state());
            return false;
        }
        let Some(name) = self.creation.typed_name().map(str::to_string) else {
            return false;
        };
        let style = format!("{}{}", name, STYLE_SUFFIX);
        log::debug!("creating style '{}'", style);
        set_style_name_for_element(doc, self.target, &style);
        self.update_style(doc);
        insert_sorted(&mut self.styles, &name);
        self.selected_style = name;
        self.creation.created();
        true
    }

    /// Writes every control value into the current style.
    pub fn update_style(&mut self, doc: &mut Document) {
        let edits: [fn(&Self, &mut Document); 10] = [
            Self::apply_font,
            Self::apply_size,
            Self::apply_line_height,
            Self::apply_word_space,
            Self::apply_border,
            |session, doc| session.apply_emphasis(doc, PropertyButton::Bold),
            |session, doc| session.apply_emphasis(doc, PropertyButton::Italic),
            |session, doc| session.apply_emphasis(doc, PropertyButton::Underline),
            Self::apply_background,
            Self::apply_position,
        ];
        for edit in edits {
            self.commit(doc, edit);
        }
        self.creation.reset_state();
    }

    /// Handles a switch to tab `index`; the style tab is tab zero.
    ///
    /// Leaving the style tab with a name typed commits it: an existing style
    /// is selected, a new one is created.
    pub fn tab_selected(&mut self, doc: &mut Document, index: usize) {
        if index == 0 {
            return;
        }
        let Some(typed) = self.creation.typed_name().map(str::to_string) else {
            return;
        };
        if style_exists(&self.styles, &typed) {
            let existing = self
                .styles
                .iter()
                .find(|style| style.to_lowercase() == typed.to_lowercase())
                .cloned()
                .unwrap_or(typed);
            self.select_style(doc, &existing);
        } else {
            self.create_style(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;
    use crate::sheet::{RuleList, StyleSheet};
    use crate::store::user_sheet;

    const FACTORY: &str = ".foo-style { font-size: 10pt; } \
        .bar-style { font-family: 'Andika'; font-size: 20pt !important; text-align: center; }";

    fn page(lang: &str) -> (Document, ElementId) {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(None, FACTORY));
        let id = doc
            .create_element("div")
            .class("bloom-editable foo-style")
            .attr("lang", lang)
            .insert();
        (doc, id)
    }

    fn editor(author_mode: bool, doc: &mut Document, id: ElementId) -> StyleEditor {
        let mut editor = StyleEditor::default();
        let host = StaticHost::new(author_mode, &["Andika", "Andika New Basic Compact"]);
        editor.attach_to_box(doc, id, &host);
        editor
    }

    fn user_rules(doc: &Document) -> Vec<String> {
        user_sheet(doc)
            .and_then(|index| doc.sheet(index))
            .map(|sheet| sheet.rules().iter().map(|rule| rule.css_text()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_open_reads_controls() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let session = editor
            .open_format_dialog(&mut doc, &StaticHost::new(false, &["Andika"]))
            .expect("styled box");
        assert_eq!(session.controls().size, "10");
        assert_eq!(session.styles(), &["bar", "foo", "normal"]);
        assert_eq!(session.selected_style(), "foo");
        assert!(session
            .controls()
            .buttons
            .is_selected(PropertyButton::Position(Position::Leading)));
        assert!(session
            .controls()
            .buttons
            .is_selected(PropertyButton::Border(BorderChoice::None)));
        assert_eq!(
            session.char_description(),
            "This formatting is for all xyz text boxes with 'foo' style"
        );
    }

    #[test]
    fn test_font_options_are_shortened() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let host = StaticHost::new(false, &["Andika", "Andika New Basic Compact"]);
        let session = editor.open_format_dialog(&mut doc, &host).expect("styled box");
        assert_eq!(
            session.font_options(),
            vec![
                ("Andika".to_string(), "Andika".to_string()),
                (
                    "Andika New Basic Compact".to_string(),
                    "Andika New Basi...".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_rule_choice_when_translating() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.change_font(&mut doc, "Andika");
        session.change_size(&mut doc, "14");
        session.click_button(&mut doc, PropertyButton::Bold);

        assert_eq!(
            user_rules(&doc),
            vec![
                ".foo-style[lang=\"xyz\"] { font-family: Andika !important; font-size: 14pt !important; }",
                ".foo-style { font-weight: bold !important; }",
            ]
        );
    }

    #[test]
    fn test_rule_choice_when_authoring() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.change_size(&mut doc, "14");
        session.change_line_height(&mut doc, "1.5");
        session.change_word_space(&mut doc, WordSpacing::Wide);
        session.change_font(&mut doc, "Andika");

        assert_eq!(
            user_rules(&doc),
            vec![
                ".foo-style { font-size: 14pt !important; line-height: 1.5 !important; word-spacing: 5pt !important; }",
                ".foo-style[lang=\"xyz\"] { font-family: Andika !important; }",
            ]
        );
    }

    #[test]
    fn test_size_below_floor_is_ignored() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");
        session.change_size(&mut doc, "6");
        assert!(user_rules(&doc).is_empty());
        assert_eq!(session.controls().size, "6");
    }

    #[test]
    fn test_border_presets() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.choose_border(&mut doc, BorderChoice::GrayRound);
        assert_eq!(
            user_rules(&doc),
            vec![".foo-style { border: 1pt solid Grey !important; border-radius: 10px !important; padding: 10px !important; box-sizing: border-box !important; }"]
        );
        assert_eq!(session.snapshot(&doc).border, BorderChoice::GrayRound);

        session.choose_border(&mut doc, BorderChoice::None);
        assert_eq!(user_rules(&doc), vec![".foo-style { }"]);
        assert_eq!(session.snapshot(&doc).border, BorderChoice::None);
    }

    #[test]
    fn test_background_and_position() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.click_button(&mut doc, PropertyButton::Background(BackgroundChoice::Gray));
        session.click_button(&mut doc, PropertyButton::Position(Position::Center));
        let snapshot = session.snapshot(&doc);
        assert_eq!(snapshot.background, BackgroundChoice::Gray);
        assert!(snapshot.center);

        session.click_button(&mut doc, PropertyButton::Background(BackgroundChoice::None));
        assert_eq!(session.snapshot(&doc).background, BackgroundChoice::None);
    }

    #[test]
    fn test_select_predefined_style_copies_declarations() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.select_style(&mut doc, "bar");

        assert!(doc.has_class(id, "bar-style"));
        assert!(!doc.has_class(id, "foo-style"));
        assert_eq!(
            user_rules(&doc),
            vec![
                ".bar-style { font-size: 20pt !important; text-align: center !important; }",
                ".bar-style[lang=\"xyz\"] { font-family: 'Andika' !important; }",
            ]
        );
        assert_eq!(session.controls().size, "20");
        assert_eq!(session.controls().font, "Andika");
        assert!(session
            .controls()
            .buttons
            .is_selected(PropertyButton::Position(Position::Center)));
        // Resynchronizing the controls wrote nothing further.
        assert_eq!(user_rules(&doc).len(), 2);
    }

    #[test]
    fn test_select_style_already_in_user_sheet_copies_nothing() {
        let (mut doc, id) = page("xyz");
        doc.add_sheet(StyleSheet::parse(
            Some("userModifiedStyles"),
            ".bar-style { font-size: 9pt !important; }",
        ));
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");
        session.select_style(&mut doc, "bar");
        assert_eq!(user_rules(&doc), vec![".bar-style { font-size: 9pt !important; }"]);
        assert_eq!(session.controls().size, "9");
    }

    #[test]
    fn test_create_style_from_controls() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.show_create_style();
        session.style_input_changed("Poem");
        assert!(session.creation().create_enabled());
        assert!(session.create_style(&mut doc));

        assert!(doc.has_class(id, "Poem-style"));
        assert_eq!(session.styles(), &["bar", "foo", "normal", "Poem"]);
        assert_eq!(session.selected_style(), "Poem");
        assert_eq!(session.creation().state(), crate::creation::CreationState::Initial);

        let rules = user_rules(&doc);
        assert_eq!(rules.len(), 2);
        assert!(rules[0].starts_with(".Poem-style[lang=\"xyz\"] { font-family: serif !important; }"));
        assert!(rules[1].starts_with(".Poem-style { font-size: 10pt !important;"));
        assert!(rules[1].contains("font-weight: normal !important"));
        assert!(rules[1].contains("text-align: initial !important"));
        assert!(rules[1].contains("background-color: transparent !important"));
    }

    #[test]
    fn test_tab_switch_selects_existing_style() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.show_create_style();
        session.style_input_changed("BAR");
        assert_eq!(session.creation().state(), crate::creation::CreationState::AlreadyExists);

        session.tab_selected(&mut doc, 0);
        assert!(doc.has_class(id, "foo-style"));

        session.tab_selected(&mut doc, 1);
        assert!(doc.has_class(id, "bar-style"));
        assert_eq!(session.selected_style(), "bar");
        assert_eq!(session.creation().typed_name(), None);
    }

    #[test]
    fn test_tab_switch_creates_new_style() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.style_input_changed("Aside");
        session.tab_selected(&mut doc, 2);
        assert!(doc.has_class(id, "Aside-style"));
        assert_eq!(session.styles()[0], "Aside");
    }

    #[test]
    fn test_create_style_refuses_existing_name() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.show_create_style();
        session.style_input_changed("BAR");
        assert!(!session.creation().create_enabled());
        assert!(!session.create_style(&mut doc));

        assert!(doc.has_class(id, "foo-style"));
        assert_eq!(session.styles(), &["bar", "foo", "normal"]);
        assert_eq!(session.selected_style(), "foo");
        assert!(user_rules(&doc).is_empty());
    }

    #[test]
    fn test_create_style_refuses_screened_name() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.show_create_style();
        session.style_input_changed("Po em");
        assert_eq!(session.creation().state(), crate::creation::CreationState::InvalidCharacters);
        assert!(!session.create_style(&mut doc));
        assert!(doc.has_class(id, "foo-style"));
        assert!(!session.styles().iter().any(|style| style == "Poem"));

        // Typing again with only valid characters allows creation.
        session.style_input_changed("Poem");
        assert!(session.create_style(&mut doc));
        assert!(doc.has_class(id, "Poem-style"));
    }

    #[test]
    fn test_sync_controls_writes_nothing() {
        let (mut doc, id) = page("xyz");
        let editor = editor(true, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");
        session.change_size(&mut doc, "20");
        let before = user_rules(&doc);

        doc.add_sheet(StyleSheet::parse(None, ".foo-style { line-height: 1.5; font-weight: 700; }"));
        session.sync_controls(&mut doc);

        assert_eq!(user_rules(&doc), before);
        assert_eq!(session.controls().size, "20");
        assert_eq!(session.controls().line_height.as_deref(), Some("1.5"));
        assert!(session.controls().buttons.is_selected(PropertyButton::Bold));
    }

    #[test]
    fn test_size_change_on_unlabeled_box_is_read_back() {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(None, FACTORY));
        let id = doc
            .create_element("div")
            .class("bloom-editable foo-style")
            .insert();
        let editor = editor(false, &mut doc, id);
        let mut session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");

        session.change_size(&mut doc, "20");

        assert_eq!(
            user_rules(&doc),
            vec![".foo-style:not([lang]) { font-size: 20pt !important; }"]
        );
        assert_eq!(session.snapshot(&doc).pt_size, "20");
    }

    #[test]
    fn test_word_spacing_options_are_localized() {
        let (mut doc, id) = page("xyz");
        let editor = editor(false, &mut doc, id);
        let session = editor
            .open_format_dialog(&mut doc, &StaticHost::default())
            .expect("styled box");
        let labels: Vec<String> = session
            .word_spacing_options()
            .into_iter()
            .map(|(_, label)| label)
            .collect();
        assert_eq!(labels, vec!["Normal", "Wide", "Extra Wide"]);
    }
}
