//! The "create a new style" part of the style tab.
//!
//! The tab moves through a small set of states, each shown by a
//! `state-*` class on the style group so the right hint is visible:
//!
//! ```text
//!              show-create            input (new name)
//!   Initial ───────────────▶ EnteringStyle ◀──────────────┐
//!      ▲                       │      │                   │
//!      │ created               │      │ input (existing)  │
//!      └───────────────────────┘      ▼                   │
//!                               AlreadyExists ────────────┤
//!                                                         │
//!          characters removed ─▶ InvalidCharacters ───────┘
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Anything that is not a letter or a digit.
static NOT_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]").expect("literal pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CreationState {
    #[default]
    Initial,
    EnteringStyle,
    AlreadyExists,
    InvalidCharacters,
}

impl CreationState {
    /// Class put on the style group for this state.
    pub fn css_class(self) -> &'static str {
        match self {
            CreationState::Initial => "state-initial",
            CreationState::EnteringStyle => "state-enteringStyle",
            CreationState::AlreadyExists => "state-already-exists",
            CreationState::InvalidCharacters => "state-invalid-characters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationEvent {
    /// The "Create a new style" link was clicked.
    ShowCreate,
    /// The name input changed or gained focus.
    InputChanged { empty: bool, exists: bool },
    /// The name screen removed characters the user typed.
    CharactersRemoved,
    /// The style was created.
    Created,
}

pub fn transition(_state: CreationState, event: CreationEvent) -> CreationState {
    match event {
        CreationEvent::ShowCreate => CreationState::EnteringStyle,
        CreationEvent::InputChanged {
            empty: false,
            exists: true,
        } => CreationState::AlreadyExists,
        CreationEvent::InputChanged { .. } => CreationState::EnteringStyle,
        CreationEvent::CharactersRemoved => CreationState::InvalidCharacters,
        CreationEvent::Created => CreationState::Initial,
    }
}

/// Keeps only what a style name may contain: letters and digits, not
/// starting with a digit. Returns the screened name and whether anything
/// was removed.
///
/// ```rust
/// use stylebook::creation::screen_style_name;
///
/// assert_eq!(screen_style_name("part2"), ("part2".to_string(), false));
/// assert_eq!(screen_style_name("2 big"), ("big".to_string(), true));
/// ```
pub fn screen_style_name(input: &str) -> (String, bool) {
    let kept = NOT_ALPHANUMERIC.replace_all(input, "");
    let screened = kept.trim_start_matches(|c: char| c.is_numeric());
    (screened.to_string(), screened != input)
}

/// Whether `name` names one of `styles`, ignoring case.
pub fn style_exists<S: AsRef<str>>(styles: &[S], name: &str) -> bool {
    let name = name.to_lowercase();
    styles.iter().any(|style| style.as_ref().to_lowercase() == name)
}

/// Inserts `name` before the first style that sorts after it, ignoring
/// case, and returns its position.
pub fn insert_sorted(styles: &mut Vec<String>, name: &str) -> usize {
    let key = name.to_lowercase();
    let position = styles
        .iter()
        .position(|style| key < style.to_lowercase())
        .unwrap_or(styles.len());
    styles.insert(position, name.to_string());
    position
}

/// The state of the style tab's creation controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCreation {
    state: CreationState,
    input: String,
}

impl StyleCreation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CreationState {
        self.state
    }

    /// The screened name typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The typed name, if there is one.
    pub fn typed_name(&self) -> Option<&str> {
        Some(self.input.as_str()).filter(|input| !input.is_empty())
    }

    pub fn create_enabled(&self) -> bool {
        self.state == CreationState::EnteringStyle && !self.input.is_empty()
    }

    fn apply(&mut self, event: CreationEvent) {
        let next = transition(self.state, event);
        if next != self.state {
            log::trace!("style creation {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    pub fn show_create(&mut self) {
        self.apply(CreationEvent::ShowCreate);
    }

    /// Takes new input from the name field, screening it first.
    pub fn input_changed<S: AsRef<str>>(&mut self, raw: &str, styles: &[S]) {
        let (screened, removed) = screen_style_name(raw);
        self.input = screened;
        if removed {
            self.apply(CreationEvent::CharactersRemoved);
            return;
        }
        let event = CreationEvent::InputChanged {
            empty: self.input.is_empty(),
            exists: style_exists(styles, &self.input),
        };
        self.apply(event);
    }

    /// Empties the name field, leaving the state alone.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Returns to `Initial`, keeping the typed name.
    pub fn reset_state(&mut self) {
        self.apply(CreationEvent::Created);
    }

    pub fn created(&mut self) {
        self.input.clear();
        self.reset_state();
    }
}
