use proptest::prelude::*;
use stylebook::host::OfflineHost;
use stylebook::store::user_sheet;
use stylebook::{
    get_or_create_rule_for_style, rule_selector, Document, EditorConfig, ElementId,
    LanguageQualifier, PropertyButton, RuleList, StaticHost, StyleEditor,
};

const PAGE: &str = r#"<html>
<head>
  <style title="bookStyles">
    .Heading1-style { font-family: 'Andika' !important; font-size: 14pt; }
    .Poem-style { font-style: italic; }
  </style>
</head>
<body>
  <div class="bloom-page" data-pagelineage="adcd48df-e9ab-4a07-afd4-6a24d0398382">
    <div class="bloom-translationGroup">
      <div id="box" class="bloom-editable normal-style" lang="xyz">Once upon a time</div>
    </div>
  </div>
</body>
</html>"#;

fn load_page() -> (Document, ElementId) {
    let doc = Document::from_xhtml(PAGE).expect("page parses");
    let id = doc.find_by_id("box").expect("page has a box");
    (doc, id)
}

fn user_css(doc: &Document) -> String {
    user_sheet(doc)
        .and_then(|index| doc.sheet(index))
        .map(|sheet| sheet.to_css())
        .unwrap_or_default()
}

#[test]
fn test_style_list_comes_from_sheets() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &["Andika", "Arial"]);
    let mut editor = StyleEditor::default();
    assert_eq!(editor.attach_to_box(&mut doc, id, &host).as_deref(), Some("normal-style"));

    let session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");
    assert_eq!(session.styles(), ["Heading1", "normal", "Poem"]);
    assert_eq!(session.selected_style(), "normal");
    assert_eq!(session.fonts(), ["Andika", "Arial"]);
}

#[test]
fn test_selecting_predefined_style_copies_it() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &["Andika"]);
    let mut editor = StyleEditor::default();
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.select_style(&mut doc, "Heading1");

    assert!(doc.has_class(id, "Heading1-style"));
    assert!(!doc.has_class(id, "normal-style"));
    assert_eq!(session.controls().size, "14");
    insta::assert_snapshot!(user_css(&doc).trim_end(), @r#"
    .Heading1-style { font-size: 14pt !important; }
    .Heading1-style[lang="xyz"] { font-family: 'Andika' !important; }
    "#);
}

#[test]
fn test_selecting_style_twice_does_not_copy_again() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &[]);
    let mut editor = StyleEditor::default();
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.select_style(&mut doc, "Heading1");
    session.change_size(&mut doc, "20");
    session.select_style(&mut doc, "normal");
    session.select_style(&mut doc, "Heading1");

    // The user rules already define the style, so the book's 14pt stays out.
    assert_eq!(session.controls().size, "20");
}

#[test]
fn test_authoring_edits_every_language() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(true, &[]);
    let mut editor = StyleEditor::default();
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.change_size(&mut doc, "20");
    session.change_line_height(&mut doc, "1.5");

    insta::assert_snapshot!(user_css(&doc).trim_end(), @".normal-style { font-size: 20pt !important; line-height: 1.5 !important; }");
}

#[test]
fn test_translating_edits_follow_the_language() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &[]);
    let mut editor = StyleEditor::default();
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.change_size(&mut doc, "20");
    session.click_button(&mut doc, PropertyButton::Bold);

    insta::assert_snapshot!(user_css(&doc).trim_end(), @r#"
    .normal-style[lang="xyz"] { font-size: 20pt !important; }
    .normal-style { font-weight: bold !important; }
    "#);
}

#[test]
fn test_new_box_language_also_updates_neutral_rule() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &[]);
    let config = EditorConfig::default().with_language_for_new_text_boxes("xyz");
    let mut editor = StyleEditor::new(config);
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.change_size(&mut doc, "20");

    insta::assert_snapshot!(user_css(&doc).trim_end(), @r#"
    .normal-style[lang="xyz"] { font-size: 20pt !important; }
    .normal-style { font-size: 20pt !important; }
    "#);
}

#[test]
fn test_offline_host_assumes_translation() {
    let (mut doc, id) = load_page();
    let mut editor = StyleEditor::default().with_author_mode(true);
    editor.attach_to_box(&mut doc, id, &OfflineHost);
    assert!(!editor.author_mode());

    let mut session = editor
        .open_format_dialog(&mut doc, &OfflineHost)
        .expect("box is styled");
    assert!(session.fonts().is_empty());

    session.change_size(&mut doc, "18");
    assert_eq!(user_css(&doc), ".normal-style[lang=\"xyz\"] { font-size: 18pt !important; }\n");
}

#[test]
fn test_loaded_user_rules_are_updated_in_place() {
    let markup = r#"<html><head>
      <style title="userModifiedStyles">.normal-style[lang='xyz'] { font-size: 8pt !important; }</style>
    </head><body>
      <div id="box" class="bloom-editable normal-style" lang="xyz"/>
    </body></html>"#;
    let mut doc = Document::from_xhtml(markup).expect("page parses");
    let id = doc.find_by_id("box").expect("page has a box");

    StyleEditor::default().make_bigger(&mut doc, id);

    assert_eq!(user_css(&doc), ".normal-style[lang=\"xyz\"] { font-size: 10pt !important; }\n");
}

#[test]
fn test_create_style_from_controls() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &[]);
    let mut editor = StyleEditor::default();
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.show_create_style();
    session.style_input_changed("Aside");
    assert!(session.creation().create_enabled());
    assert!(session.create_style(&mut doc));

    assert!(doc.has_class(id, "Aside-style"));
    assert_eq!(session.selected_style(), "Aside");
    assert_eq!(session.styles(), ["Aside", "Heading1", "normal", "Poem"]);

    let sheet = user_sheet(&doc)
        .and_then(|index| doc.sheet(index))
        .expect("user sheet exists");
    let selectors: Vec<&str> = sheet.rules().iter().map(|rule| rule.selector_text()).collect();
    assert_eq!(selectors, [".Aside-style[lang=\"xyz\"]", ".Aside-style"]);
}

#[test]
fn test_leaving_style_tab_selects_typed_existing_style() {
    let (mut doc, id) = load_page();
    let host = StaticHost::new(false, &[]);
    let mut editor = StyleEditor::default();
    editor.attach_to_box(&mut doc, id, &host);
    let mut session = editor.open_format_dialog(&mut doc, &host).expect("box is styled");

    session.show_create_style();
    session.style_input_changed("poem");
    session.tab_selected(&mut doc, 1);

    assert!(doc.has_class(id, "Poem-style"));
    assert_eq!(session.selected_style(), "Poem");
    assert!(session.snapshot(&doc).italic);
}

proptest! {
    #[test]
    fn rule_creation_is_idempotent(
        calls in prop::collection::vec(
            (0usize..3, prop::option::of(prop::sample::select(vec!["en", "fr", "xyz"])), any::<bool>()),
            1..30,
        )
    ) {
        let styles = ["foo-style", "bar-style", "foo-style-big"];
        let mut doc = Document::new();
        let mut expected: Vec<String> = Vec::new();

        for (style, lang, ignore_language) in calls {
            let style = styles[style];
            let rule = get_or_create_rule_for_style(&mut doc, style, lang, ignore_language);
            let selector = rule_selector(style, &LanguageQualifier::for_lang(lang, ignore_language));
            prop_assert_eq!(doc.rule(rule).map(|r| r.selector_text()), Some(selector.as_str()));
            if !expected.contains(&selector) {
                expected.push(selector);
            }
        }

        let sheet = user_sheet(&doc).and_then(|index| doc.sheet(index));
        prop_assert_eq!(sheet.map(|sheet| sheet.len()), Some(expected.len()));
    }
}
