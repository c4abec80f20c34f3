//! Per-language style rules for a book editor's Format dialog.
//!
//! Text boxes in a book page carry a style class such as `normal-style`.
//! When the user changes the formatting of a box, the change is written as an
//! `!important` rule into one dedicated stylesheet, `userModifiedStyles`,
//! scoped either to every box of the style or only to boxes in one language.
//! This crate implements that engine:
//!
//! - [`resolver`]: which style a box carries, migrating legacy names
//! - [`store`]: finding or creating the user rule for a style and language
//! - [`snapshot`]: reading computed style back into control values
//! - [`editor`] and [`session`]: the size shortcuts and the dialog's commands
//! - [`creation`]: the state machine behind "create a new style"
//!
//! The page itself is modeled by [`Document`], which holds elements and
//! stylesheets and computes style values the way a browser reports them.
//!
//! # Example
//!
//! ```rust
//! use stylebook::{Document, StyleEditor};
//!
//! let mut doc = Document::new();
//! let id = doc
//!     .create_element("div")
//!     .class("bloom-editable foo-style")
//!     .attr("lang", "xyz")
//!     .insert();
//!
//! let mut editor = StyleEditor::default();
//! editor.change_size_absolute(&mut doc, id, 20)?;
//! editor.change_size_absolute(&mut doc, id, 25)?;
//!
//! let user = stylebook::store::user_sheet(&doc).and_then(|i| doc.sheet(i));
//! assert_eq!(
//!     user.map(|sheet| sheet.to_css()).as_deref(),
//!     Some(".foo-style[lang=\"xyz\"] { font-size: 25pt !important; }\n")
//! );
//! # Ok::<(), stylebook::StyleAlert>(())
//! ```

pub mod color;
pub mod config;
pub mod creation;
pub mod describe;
pub mod dom;
pub mod editor;
pub mod error;
pub mod host;
pub mod options;
pub mod resolver;
pub mod session;
pub mod sheet;
pub mod snapshot;
pub mod store;

pub use color::Rgba;
pub use config::EditorConfig;
pub use creation::{CreationEvent, CreationState, StyleCreation};
pub use describe::{Localizer, NoLocalization};
pub use dom::{Document, Element, ElementBuilder, ElementId};
pub use editor::{NeverOverflows, OverflowCheck, StyleEditor};
pub use error::{ConfigError, DocumentError, HostError, StyleAlert};
pub use host::{EditorHost, StaticHost};
pub use options::{
    option_label, BackgroundChoice, BorderChoice, ButtonPanel, Position, PropertyButton,
    WordSpacing,
};
pub use resolver::{lang_value, set_style_name_for_element, style_name_for_element};
pub use session::{FormatControls, FormatSession};
pub use sheet::{Declaration, Priority, RuleList, StyleRule, StyleSheet};
pub use snapshot::{closest_value_in_list, read_format_values, FormatSnapshot};
pub use store::{
    formatting_styles, get_or_create_rule_for_style, predefined_style, rule_selector,
    LanguageQualifier, RuleRef,
};
