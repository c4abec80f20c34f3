//! The discrete choices offered by the format controls.
//!
//! - ladders: [`POINT_SIZES`], [`LINE_SPACE_OPTIONS`]
//! - choice enums: [`WordSpacing`], [`BorderChoice`], [`BackgroundChoice`], [`Position`]
//! - the icon buttons of the "More" tab: [`PropertyButton`], [`ButtonPanel`]
//! - label helpers: [`option_label`]

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Point sizes offered for text, as in common word processors plus 13.
pub const POINT_SIZES: [&str; 18] = [
    "7", "8", "9", "10", "11", "12", "13", "14", "16", "18", "20", "22", "24", "26", "28", "36",
    "48", "72",
];

/// Line spacing multipliers offered for text.
pub const LINE_SPACE_OPTIONS: [&str; 11] = [
    "1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.8", "2.0", "2.5", "3.0",
];

/// Word spacing above this many points reads as "Extra Wide".
pub const EXTRA_WIDE_THRESHOLD_PT: f64 = 7.5;

/// Word spacing tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordSpacing {
    Normal,
    Wide,
    #[serde(rename = "Extra Wide")]
    ExtraWide,
}

impl WordSpacing {
    pub const ALL: [WordSpacing; 3] = [WordSpacing::Normal, WordSpacing::Wide, WordSpacing::ExtraWide];

    /// English label, also the fallback text for localization.
    pub fn label(self) -> &'static str {
        match self {
            WordSpacing::Normal => "Normal",
            WordSpacing::Wide => "Wide",
            WordSpacing::ExtraWide => "Extra Wide",
        }
    }

    pub fn localization_id(self) -> &'static str {
        match self {
            WordSpacing::Normal => "EditTab.StyleEditor.WordSpacingNormal",
            WordSpacing::Wide => "EditTab.StyleEditor.WordSpacingWide",
            WordSpacing::ExtraWide => "EditTab.StyleEditor.WordSpacingExtraWide",
        }
    }

    /// The `word-spacing` value written for this tier.
    pub fn css_value(self) -> &'static str {
        match self {
            WordSpacing::Normal => "normal",
            WordSpacing::Wide => "5pt",
            WordSpacing::ExtraWide => "10pt",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Classifies a spacing in points. `None` means the computed value was
    /// exactly zero.
    pub fn classify(points: Option<f64>) -> Self {
        match points {
            None => WordSpacing::Normal,
            Some(pt) if pt > EXTRA_WIDE_THRESHOLD_PT => WordSpacing::ExtraWide,
            Some(_) => WordSpacing::Wide,
        }
    }
}

/// Border presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderChoice {
    None,
    Black,
    BlackRound,
    Gray,
    GrayRound,
}

impl BorderChoice {
    pub const ALL: [BorderChoice; 5] = [
        BorderChoice::None,
        BorderChoice::Black,
        BorderChoice::BlackRound,
        BorderChoice::Gray,
        BorderChoice::GrayRound,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BorderChoice::None => "none",
            BorderChoice::Black => "black",
            BorderChoice::BlackRound => "black-round",
            BorderChoice::Gray => "gray",
            BorderChoice::GrayRound => "gray-round",
        }
    }

    /// Color written into the `border` shorthand, `None` for no border.
    pub fn color(self) -> Option<&'static str> {
        match self {
            BorderChoice::None => None,
            BorderChoice::Black | BorderChoice::BlackRound => Some("black"),
            BorderChoice::Gray | BorderChoice::GrayRound => Some("Grey"),
        }
    }

    pub fn is_round(self) -> bool {
        matches!(self, BorderChoice::BlackRound | BorderChoice::GrayRound)
    }
}

/// Background presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundChoice {
    None,
    Gray,
}

impl BackgroundChoice {
    pub fn id(self) -> &'static str {
        match self {
            BackgroundChoice::None => "none",
            BackgroundChoice::Gray => "gray",
        }
    }
}

/// Horizontal text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Leading,
    Center,
}

impl Position {
    pub fn id(self) -> &'static str {
        match self {
            Position::Leading => "leading",
            Position::Center => "center",
        }
    }

    /// The `text-align` value written for this position.
    pub fn css_value(self) -> &'static str {
        match self {
            Position::Leading => "initial",
            Position::Center => "center",
        }
    }
}

/// One icon button of the "More" tab.
///
/// Buttons whose id contains a `-` belong to a group (`border-*`,
/// `background-*`, `position-*`) in which exactly one is selected; the others
/// toggle independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyButton {
    Bold,
    Italic,
    Underline,
    Position(Position),
    Border(BorderChoice),
    Background(BackgroundChoice),
}

impl PropertyButton {
    /// Every button, in panel order.
    pub const ALL: [PropertyButton; 12] = [
        PropertyButton::Bold,
        PropertyButton::Italic,
        PropertyButton::Underline,
        PropertyButton::Position(Position::Leading),
        PropertyButton::Position(Position::Center),
        PropertyButton::Border(BorderChoice::None),
        PropertyButton::Border(BorderChoice::Black),
        PropertyButton::Border(BorderChoice::BlackRound),
        PropertyButton::Border(BorderChoice::Gray),
        PropertyButton::Border(BorderChoice::GrayRound),
        PropertyButton::Background(BackgroundChoice::None),
        PropertyButton::Background(BackgroundChoice::Gray),
    ];

    /// The control id, e.g. `bold` or `border-gray-round`.
    pub fn id(self) -> String {
        match self {
            PropertyButton::Bold => "bold".to_string(),
            PropertyButton::Italic => "italic".to_string(),
            PropertyButton::Underline => "underline".to_string(),
            PropertyButton::Position(p) => format!("position-{}", p.id()),
            PropertyButton::Border(b) => format!("border-{}", b.id()),
            PropertyButton::Background(b) => format!("background-{}", b.id()),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.id() == id)
    }

    /// The exclusive group this button belongs to, if any.
    pub fn group(self) -> Option<&'static str> {
        match self {
            PropertyButton::Bold | PropertyButton::Italic | PropertyButton::Underline => None,
            PropertyButton::Position(_) => Some("position"),
            PropertyButton::Border(_) => Some("border"),
            PropertyButton::Background(_) => Some("background"),
        }
    }
}

/// Selection state of the icon buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonPanel {
    selected: Vec<PropertyButton>,
}

impl ButtonPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, button: PropertyButton) -> bool {
        self.selected.contains(&button)
    }

    /// Marks a button selected without touching its group.
    pub fn select(&mut self, button: PropertyButton) {
        if !self.is_selected(button) {
            self.selected.push(button);
        }
    }

    pub fn deselect(&mut self, button: PropertyButton) {
        self.selected.retain(|b| *b != button);
    }

    /// Applies a click: a grouped button becomes the only selection in its
    /// group, an ungrouped one toggles.
    pub fn click(&mut self, button: PropertyButton) {
        match button.group() {
            Some(group) => {
                self.selected
                    .retain(|other| *other == button || other.group() != Some(group));
                self.select(button);
            }
            None if self.is_selected(button) => self.deselect(button),
            None => self.select(button),
        }
    }

    /// The selected member of a group.
    pub fn selected_in(&self, group: &str) -> Option<PropertyButton> {
        self.selected
            .iter()
            .copied()
            .find(|button| button.group() == Some(group))
    }

    pub fn border(&self) -> BorderChoice {
        match self.selected_in("border") {
            Some(PropertyButton::Border(choice)) => choice,
            _ => BorderChoice::None,
        }
    }

    pub fn background(&self) -> BackgroundChoice {
        match self.selected_in("background") {
            Some(PropertyButton::Background(choice)) => choice,
            _ => BackgroundChoice::None,
        }
    }

    pub fn position(&self) -> Position {
        match self.selected_in("position") {
            Some(PropertyButton::Position(position)) => position,
            _ => Position::Leading,
        }
    }
}

/// Shortens an option label to `max_width` columns, appending `...` when
/// anything was cut. A `max_width` of zero disables truncation.
///
/// Widths are display columns, so wide characters count double.
///
/// # Example
///
/// ```rust
/// use stylebook::option_label;
///
/// assert_eq!(option_label("Andika", 15), "Andika");
/// assert_eq!(option_label("Andika New Basic Compact", 15), "Andika New Basi...");
/// ```
pub fn option_label(text: &str, max_width: usize) -> String {
    if max_width == 0 || text.width() <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push_str("...");
    result
}
