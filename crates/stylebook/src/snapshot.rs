//! Reading the current format of a text box.
//!
//! The format controls show discrete choices, while computed style is
//! continuous. [`read_format_values`] maps one onto the other: sizes and
//! spacings snap to the nearest ladder entry, and colors and radii fall into
//! a handful of buckets. The mapping is lossy; it only has to pick the
//! control value closest to what the user sees.

use serde::Serialize;

use crate::color::Rgba;
use crate::config::EditorConfig;
use crate::dom::{Document, ElementId};
use crate::options::{BackgroundChoice, BorderChoice, WordSpacing};

/// Width, in points, of the probe used to find the px/pt ratio.
const PROBE_POINTS: f64 = 1000.0;

/// Border color that reads as the gray presets.
const GRAY_BORDER: &str = "rgb(128, 128, 128)";

/// Something that can report how many pixels a width in points occupies.
///
/// On screen this is a measured probe, so it reflects page zoom.
pub trait Measurement {
    fn measure_points_px(&self, points: f64) -> f64;
}

impl Measurement for Document {
    fn measure_points_px(&self, points: f64) -> f64 {
        Document::measure_points_px(self, points)
    }
}

/// The control values matching a text box's computed style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSnapshot {
    pub pt_size: String,
    pub font_name: String,
    /// `None` when the line height is `normal`.
    pub line_height: Option<String>,
    pub word_spacing: WordSpacing,
    pub border: BorderChoice,
    pub background: BackgroundChoice,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub center: bool,
}

/// Reads the control values for `element` from its computed style.
///
/// # Example
///
/// ```rust
/// use stylebook::{read_format_values, Document, EditorConfig, StyleSheet};
///
/// let mut doc = Document::new();
/// doc.add_sheet(StyleSheet::parse(None, ".foo-style { font-size: 13pt; font-weight: bold }"));
/// let id = doc.create_element("div").class("foo-style").insert();
///
/// let snapshot = read_format_values(&doc, id, &EditorConfig::default());
/// assert_eq!(snapshot.pt_size, "13");
/// assert!(snapshot.bold);
/// ```
pub fn read_format_values(doc: &Document, element: ElementId, config: &EditorConfig) -> FormatSnapshot {
    let value = |property: &str| doc.computed_value(element, property);

    let px_size = parse_px(&value("font-size")).unwrap_or_default();
    let pt_size = closest_value_in_list(&config.point_sizes, px_to_pt(doc, px_size, false))
        .unwrap_or_default();

    let line_height = parse_px(&value("line-height"))
        .filter(|_| px_size > 0.0)
        .and_then(|line_px| {
            let ratio = (line_px / px_size * 10.0).round() / 10.0;
            closest_value_in_list(&config.line_space_options, ratio)
        });

    let word_spacing = value("word-spacing");
    let word_spacing = if word_spacing == "0px" {
        WordSpacing::classify(None)
    } else {
        let points = parse_px(&word_spacing).map_or(0.0, |px| px_to_pt(doc, px, true));
        WordSpacing::classify(Some(points))
    };

    let weight = value("font-weight");
    FormatSnapshot {
        pt_size,
        font_name: strip_quotes(&value("font-family")).to_string(),
        line_height,
        word_spacing,
        border: classify_border(
            &value("border-bottom-style"),
            &value("border-bottom-color"),
            &value("border-top-left-radius"),
        ),
        background: classify_background(&value("background-color")),
        bold: weight.trim().parse::<f64>().is_ok_and(|weight| weight > 600.0),
        italic: value("font-style") == "italic",
        underline: value("text-decoration")
            .split_whitespace()
            .any(|line| line == "underline"),
        center: value("text-align") == "center",
    }
}

/// Picks the ladder entry closest to `value`.
///
/// An exact match wins. Otherwise the first entry at or above `value` is
/// taken, unless its predecessor is strictly closer; a value exactly halfway
/// therefore goes to the upper entry. Values outside the ladder clamp to its
/// ends. Entries that are not numbers are skipped.
///
/// ```rust
/// use stylebook::closest_value_in_list;
///
/// let ladder = ["1.0", "1.1", "1.2"];
/// assert_eq!(closest_value_in_list(&ladder, 1.05).as_deref(), Some("1.1"));
/// assert_eq!(closest_value_in_list(&ladder, 1.14).as_deref(), Some("1.1"));
/// assert_eq!(closest_value_in_list(&ladder, 9.0).as_deref(), Some("1.2"));
/// ```
pub fn closest_value_in_list<S: AsRef<str>>(options: &[S], value: f64) -> Option<String> {
    let ladder: Vec<(&str, f64)> = options
        .iter()
        .filter_map(|option| {
            let text = option.as_ref();
            text.trim().parse::<f64>().ok().map(|number| (text, number))
        })
        .collect();

    let &(last, last_number) = ladder.last()?;
    if value > last_number {
        return Some(last.to_string());
    }

    for (i, &(text, number)) in ladder.iter().enumerate() {
        if value == number {
            return Some(text.to_string());
        }
        if value <= number {
            let choice = match i.checked_sub(1).map(|previous| ladder[previous]) {
                Some((previous, previous_number)) if value - previous_number < number - value => {
                    previous
                }
                _ => text,
            };
            return Some(choice.to_string());
        }
    }
    None
}

/// Converts pixels to points using the measured probe ratio.
pub fn px_to_pt<M: Measurement + ?Sized>(measure: &M, px: f64, round: bool) -> f64 {
    let measured = measure.measure_points_px(PROBE_POINTS);
    if measured <= 0.0 {
        return 0.0;
    }
    let points = px * (PROBE_POINTS / measured);
    if round {
        points.round()
    } else {
        points
    }
}

/// Buckets a computed border into one of the presets.
///
/// A missing style, `none`, a missing color, or a translucent color reads as
/// no border: edit boxes inherit a faint `rgba()` outline that must not show
/// up as a choice.
pub fn classify_border(style: &str, color: &str, radius: &str) -> BorderChoice {
    let style = style.trim();
    let color = color.trim();
    let translucent = Rgba::parse(color).is_some_and(|parsed| !parsed.is_opaque());
    if style.is_empty() || style == "none" || color.is_empty() || translucent {
        return BorderChoice::None;
    }

    let round = parse_px(radius).unwrap_or_default() > 0.0;
    match (color.eq_ignore_ascii_case(GRAY_BORDER), round) {
        (true, false) => BorderChoice::Gray,
        (true, true) => BorderChoice::GrayRound,
        (false, false) => BorderChoice::Black,
        (false, true) => BorderChoice::BlackRound,
    }
}

/// Any background other than a transparent one reads as gray.
pub fn classify_background(color: &str) -> BackgroundChoice {
    let color = color.trim();
    let transparent = color.eq_ignore_ascii_case("transparent")
        || Rgba::parse(color).is_some_and(|parsed| parsed.is_transparent());
    if transparent {
        BackgroundChoice::None
    } else {
        BackgroundChoice::Gray
    }
}

/// Removes the quotes computed style puts around some font names.
pub fn strip_quotes(font_name: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(rest) = font_name.strip_prefix(quote) {
            return rest.strip_suffix(quote).unwrap_or(rest);
        }
    }
    font_name
}

/// Leading number of a computed length such as `16px` or `10.5px`.
fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
