//! Computed style lookup.
//!
//! The cascade here orders declarations by importance, then origin (inline
//! over stylesheet), then source order. Specificity is not considered. Values
//! are reported the way `getComputedStyle` reports them: lengths in `px`,
//! colors as `rgb()`/`rgba()`, font weights as numbers.

use cssparser::{ParseError, Parser, ParserInput, Token};

use super::{Document, ElementId, SelectorList, PIXELS_PER_POINT};
use crate::color::Rgba;
use crate::sheet::{Declaration, RuleList};

const ROOT_FONT_SIZE_PX: f64 = 16.0;

const INHERITED: &[&str] = &[
    "color",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "line-height",
    "text-align",
    "word-spacing",
];

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];
const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Ordering key of a declaration in the cascade: the greatest key wins.
type CascadeKey = (bool, bool, usize);

impl Document {
    /// The computed value of `property` on an element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stylebook::{Document, StyleSheet};
    ///
    /// let mut doc = Document::new();
    /// doc.add_sheet(StyleSheet::parse(None, ".a-style { font-size: 12pt; line-height: 1.5 }"));
    /// let id = doc.create_element("div").class("a-style").insert();
    ///
    /// assert_eq!(doc.computed_value(id, "font-size"), "16px");
    /// assert_eq!(doc.computed_value(id, "line-height"), "24px");
    /// ```
    pub fn computed_value(&self, id: ElementId, property: &str) -> String {
        let property = property.trim().to_ascii_lowercase();
        match property.as_str() {
            "font-size" => format_px(self.font_size_px(id)),
            "line-height" => self.line_height(id),
            "word-spacing" => self.word_spacing(id),
            "font-weight" => self.font_weight(id).to_string(),
            "color" => self.color(id).to_css(),
            "text-decoration" | "text-decoration-line" => self.text_decoration(id),
            "background-color" => self.color_property(id, "background-color"),
            name if is_border_part(name, "color") => self.color_property(id, name),
            name if is_border_part(name, "width") => self.border_width(id, name),
            name if name.starts_with("border-") && name.ends_with("-radius") => {
                self.length_property(id, name)
            }
            name if name.starts_with("padding-") => self.length_property(id, name),
            name => self.keyword(id, name),
        }
    }

    /// The computed font size in pixels.
    pub fn font_size_px(&self, id: ElementId) -> f64 {
        let parent_px = self
            .parent(id)
            .map_or(ROOT_FONT_SIZE_PX, |parent| self.font_size_px(parent));
        match self.specified(id, "font-size").as_deref() {
            None | Some("inherit") | Some("unset") => parent_px,
            Some("initial") => ROOT_FONT_SIZE_PX,
            Some(value) => resolve_font_size(value, parent_px).unwrap_or(parent_px),
        }
    }

    /// The winning declared value for a longhand property, if any.
    fn specified(&self, id: ElementId, property: &str) -> Option<String> {
        let mut best: Option<(CascadeKey, String)> = None;
        let mut consider = |key: CascadeKey, declaration: &Declaration| {
            for (name, value) in expand_shorthand(&declaration.name, &declaration.value) {
                if name == property && best.as_ref().map_or(true, |(winner, _)| key >= *winner) {
                    best = Some((key, value));
                }
            }
        };

        let mut order = 0usize;
        for sheet in self.sheets() {
            for rule in sheet.rules() {
                let matched = SelectorList::parse(rule.selector_text())
                    .is_some_and(|selectors| selectors.matches(self, id));
                for declaration in rule.declarations() {
                    order += 1;
                    if matched {
                        consider((declaration.priority.is_important(), false, order), declaration);
                    }
                }
            }
        }
        for declaration in self.element(id).inline_style() {
            order += 1;
            consider((declaration.priority.is_important(), true, order), declaration);
        }

        best.map(|(_, value)| normalize_keyword(value))
    }

    /// The element whose declaration supplies an inherited property, with the
    /// declared value. `None` means the initial value applies.
    fn inherited_source(&self, id: ElementId, property: &str) -> Option<(ElementId, String)> {
        for element in self.ancestors_inclusive(id) {
            match self.specified(element, property) {
                None => continue,
                Some(value) if value == "inherit" || value == "unset" => continue,
                Some(value) if value == "initial" => return None,
                Some(value) => return Some((element, value)),
            }
        }
        None
    }

    fn line_height(&self, id: ElementId) -> String {
        let Some((source, value)) = self.inherited_source(id, "line-height") else {
            return "normal".to_string();
        };
        if value == "normal" {
            return value;
        }
        // Unitless values inherit as numbers and scale with each element's font.
        if let Some(factor) = parse_number(&value) {
            return format_px(factor * self.font_size_px(id));
        }
        match parse_length(&value) {
            Some(length) => format_px(length.to_px(self.font_size_px(source))),
            None => "normal".to_string(),
        }
    }

    fn word_spacing(&self, id: ElementId) -> String {
        let Some((source, value)) = self.inherited_source(id, "word-spacing") else {
            return "0px".to_string();
        };
        match parse_length(&value) {
            Some(length) => format_px(length.to_px(self.font_size_px(source))),
            None => "0px".to_string(),
        }
    }

    fn font_weight(&self, id: ElementId) -> u16 {
        let Some((source, value)) = self.inherited_source(id, "font-weight") else {
            return 400;
        };
        let parent_weight = || self.parent(source).map_or(400, |parent| self.font_weight(parent));
        match value.as_str() {
            "normal" => 400,
            "bold" => 700,
            "bolder" => match parent_weight() {
                w if w < 350 => 400,
                w if w < 550 => 700,
                _ => 900,
            },
            "lighter" => match parent_weight() {
                w if w < 550 => 100,
                w if w < 750 => 400,
                _ => 700,
            },
            other => other
                .parse::<f64>()
                .ok()
                .filter(|w| (1.0..=1000.0).contains(w))
                .map_or(400, |w| w.round() as u16),
        }
    }

    fn color(&self, id: ElementId) -> Rgba {
        let parent_color = || self.parent(id).map_or(Rgba::BLACK, |parent| self.color(parent));
        match self.specified(id, "color").as_deref() {
            None | Some("inherit") | Some("unset") | Some("currentcolor") => parent_color(),
            Some("initial") => Rgba::BLACK,
            Some(value) => Rgba::parse(value).unwrap_or_else(parent_color),
        }
    }

    /// A non-inherited color property whose initial value is `transparent`
    /// for backgrounds and `currentcolor` otherwise.
    fn color_property(&self, id: ElementId, property: &str) -> String {
        let initial = || {
            if property == "background-color" {
                Rgba::TRANSPARENT
            } else {
                self.color(id)
            }
        };
        let color = match self.specified(id, property).as_deref() {
            None | Some("initial") | Some("unset") => initial(),
            Some("inherit") => {
                return self
                    .parent(id)
                    .map_or_else(|| initial().to_css(), |parent| self.computed_value(parent, property))
            }
            Some("currentcolor") => self.color(id),
            Some(value) => Rgba::parse(value).unwrap_or_else(initial),
        };
        color.to_css()
    }

    fn border_width(&self, id: ElementId, property: &str) -> String {
        let style_property = property.replace("-width", "-style");
        if matches!(self.keyword(id, &style_property).as_str(), "none" | "hidden") {
            return "0px".to_string();
        }
        let width = match self.specified(id, property).as_deref() {
            Some("thin") => 1.0,
            Some("thick") => 5.0,
            Some(value) => parse_length(value).map_or(3.0, |length| length.to_px(self.font_size_px(id))),
            None => 3.0,
        };
        format_px(width)
    }

    fn length_property(&self, id: ElementId, property: &str) -> String {
        let Some(value) = self.specified(id, property) else {
            return "0px".to_string();
        };
        // Radii may carry a second value after whitespace; the first one is reported.
        let first = value.split_whitespace().next().unwrap_or_default();
        match parse_length(first) {
            Some(Length::Percent(percent)) => format!("{}%", trim_float(percent)),
            Some(length) => format_px(length.to_px(self.font_size_px(id))),
            None => "0px".to_string(),
        }
    }

    fn text_decoration(&self, id: ElementId) -> String {
        let value = self
            .specified(id, "text-decoration")
            .filter(|value| value != "initial" && value != "unset" && value != "inherit")
            .unwrap_or_else(|| "none".to_string());
        let lines: Vec<String> = components(&value)
            .into_iter()
            .filter(|part| matches!(part.as_str(), "underline" | "overline" | "line-through"))
            .collect();
        if lines.is_empty() {
            "none".to_string()
        } else {
            lines.join(" ")
        }
    }

    /// Any other property, reported as declared.
    fn keyword(&self, id: ElementId, property: &str) -> String {
        if INHERITED.contains(&property) {
            return self
                .inherited_source(id, property)
                .map_or_else(|| initial_value(property).to_string(), |(_, value)| value);
        }
        match self.specified(id, property) {
            None => initial_value(property).to_string(),
            Some(value) if value == "initial" || value == "unset" => {
                initial_value(property).to_string()
            }
            Some(value) if value == "inherit" => self
                .parent(id)
                .map_or_else(|| initial_value(property).to_string(), |parent| {
                    self.computed_value(parent, property)
                }),
            Some(value) => value,
        }
    }
}

/// Lowercases bare keywords, leaving anything that may be case-sensitive
/// (font names, quoted strings, functions) alone.
fn normalize_keyword(value: String) -> String {
    let is_keyword = !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
    if is_keyword {
        value.to_ascii_lowercase()
    } else {
        value
    }
}

fn initial_value(property: &str) -> &'static str {
    match property {
        "font-family" => "serif",
        "font-style" => "normal",
        "text-align" => "start",
        "text-decoration" => "none",
        name if is_border_part(name, "style") => "none",
        _ => "",
    }
}

fn is_border_part(name: &str, part: &str) -> bool {
    name.strip_prefix("border-")
        .and_then(|rest| rest.strip_suffix(part))
        .is_some_and(|side| {
            side.strip_suffix('-')
                .is_some_and(|side| SIDES.contains(&side))
        })
}

/// Expands a declaration into the longhands it sets.
fn expand_shorthand(name: &str, value: &str) -> Vec<(String, String)> {
    match name {
        "border" => SIDES
            .iter()
            .flat_map(|side| expand_border_side(side, value))
            .collect(),
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            expand_border_side(&name["border-".len()..], value)
        }
        "border-style" | "border-color" | "border-width" => {
            let part = &name["border-".len()..];
            expand_box(value)
                .into_iter()
                .zip(SIDES)
                .map(|(v, side)| (format!("border-{}-{}", side, part), v))
                .collect()
        }
        "border-radius" => {
            let horizontal = value.split('/').next().unwrap_or_default();
            expand_box(horizontal)
                .into_iter()
                .zip(CORNERS)
                .map(|(v, corner)| (format!("border-{}-radius", corner), v))
                .collect()
        }
        "padding" => expand_box(value)
            .into_iter()
            .zip(SIDES)
            .map(|(v, side)| (format!("padding-{}", side), v))
            .collect(),
        "background" => {
            let color = components(value)
                .into_iter()
                .find(|part| part == "currentcolor" || Rgba::parse(part).is_some())
                .unwrap_or_else(|| "transparent".to_string());
            vec![("background-color".to_string(), color)]
        }
        "text-decoration-line" => vec![("text-decoration".to_string(), value.to_string())],
        _ => vec![(name.to_string(), value.to_string())],
    }
}

fn expand_border_side(side: &str, value: &str) -> Vec<(String, String)> {
    let mut width = "medium".to_string();
    let mut style = "none".to_string();
    let mut color = "currentcolor".to_string();
    if matches!(value, "inherit" | "initial" | "unset") {
        width = value.to_string();
        style = value.to_string();
        color = value.to_string();
    } else {
        for part in components(value) {
            let lower = part.to_ascii_lowercase();
            if BORDER_STYLES.contains(&lower.as_str()) {
                style = lower;
            } else if matches!(lower.as_str(), "thin" | "medium" | "thick")
                || parse_length(&lower).is_some()
            {
                width = lower;
            } else {
                color = part;
            }
        }
    }
    vec![
        (format!("border-{}-width", side), width),
        (format!("border-{}-style", side), style),
        (format!("border-{}-color", side), color),
    ]
}

/// Expands one to four box values to top, right, bottom, left.
fn expand_box(value: &str) -> Vec<String> {
    match components(value).as_slice() {
        [all] => vec![all.clone(); 4],
        [vertical, horizontal] => vec![
            vertical.clone(),
            horizontal.clone(),
            vertical.clone(),
            horizontal.clone(),
        ],
        [top, horizontal, bottom] => vec![
            top.clone(),
            horizontal.clone(),
            bottom.clone(),
            horizontal.clone(),
        ],
        [top, right, bottom, left] => vec![top.clone(), right.clone(), bottom.clone(), left.clone()],
        _ => Vec::new(),
    }
}

/// Splits a value into its top-level, whitespace-separated components.
///
/// Functions such as `rgba(0, 0, 0, 0.2)` stay in one piece.
fn components(value: &str) -> Vec<String> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut parts = Vec::new();
    loop {
        parser.skip_whitespace();
        let start = parser.position();
        let has_block = match parser.next() {
            Ok(Token::Function(_))
            | Ok(Token::ParenthesisBlock)
            | Ok(Token::SquareBracketBlock)
            | Ok(Token::CurlyBracketBlock) => true,
            Ok(_) => false,
            Err(_) => break,
        };
        if has_block {
            let consumed: Result<(), ParseError<'_, ()>> = parser.parse_nested_block(|block| {
                while block.next().is_ok() {}
                Ok(())
            });
            if consumed.is_err() {
                break;
            }
        }
        parts.push(parser.slice_from(start).trim().to_string());
    }
    parts
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Length {
    Px(f64),
    Em(f64),
    Rem(f64),
    /// Percent of the reference length, `50%` is `50.0`.
    Percent(f64),
}

impl Length {
    fn to_px(self, font_px: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Em(em) => em * font_px,
            Length::Rem(rem) => rem * ROOT_FONT_SIZE_PX,
            Length::Percent(percent) => percent / 100.0 * font_px,
        }
    }
}

fn single_token<T>(value: &str, read: impl FnOnce(&Token<'_>) -> Option<T>) -> Option<T> {
    let mut input = ParserInput::new(value.trim());
    let mut parser = Parser::new(&mut input);
    let result = read(parser.next().ok()?)?;
    parser.expect_exhausted().ok()?;
    Some(result)
}

fn parse_number(value: &str) -> Option<f64> {
    single_token(value, |token| match token {
        Token::Number { value, .. } => Some(f64::from(*value)),
        _ => None,
    })
}

fn parse_length(value: &str) -> Option<Length> {
    single_token(value, |token| match token {
        Token::Dimension { value, unit, .. } => {
            let value = f64::from(*value);
            let length = match unit.to_ascii_lowercase().as_str() {
                "px" => Length::Px(value),
                "pt" => Length::Px(value * PIXELS_PER_POINT),
                "pc" => Length::Px(value * 16.0),
                "in" => Length::Px(value * 96.0),
                "cm" => Length::Px(value * 96.0 / 2.54),
                "mm" => Length::Px(value * 96.0 / 25.4),
                "q" => Length::Px(value * 96.0 / 101.6),
                "em" => Length::Em(value),
                "ex" | "ch" => Length::Em(value / 2.0),
                "rem" => Length::Rem(value),
                _ => return None,
            };
            Some(length)
        }
        Token::Percentage { unit_value, .. } => Some(Length::Percent(f64::from(*unit_value) * 100.0)),
        Token::Number { value, .. } if *value == 0.0 => Some(Length::Px(0.0)),
        _ => None,
    })
}

fn resolve_font_size(value: &str, parent_px: f64) -> Option<f64> {
    let keyword = match value {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(ROOT_FONT_SIZE_PX),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        "smaller" => Some(parent_px / 1.2),
        "larger" => Some(parent_px * 1.2),
        _ => None,
    };
    keyword.or_else(|| parse_length(value).map(|length| length.to_px(parent_px)))
}

/// Formats pixels the way computed style prints them: at most three decimals,
/// no trailing zeros.
fn format_px(px: f64) -> String {
    format!("{}px", trim_float(px))
}

fn trim_float(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::StyleSheet;

    fn doc_with(css: &str) -> Document {
        let mut doc = Document::new();
        doc.add_sheet(StyleSheet::parse(None, css));
        doc
    }

    #[test]
    fn test_font_size_units() {
        let mut doc = doc_with(
            ".pt-style { font-size: 20pt } .em-style { font-size: 0.8em } .pct-style { font-size: 150% }",
        );
        let pt = doc.create_element("div").class("pt-style").insert();
        let em = doc.create_element("div").class("em-style").insert();
        let pct = doc.create_element("div").class("pct-style").parent(pt).insert();
        assert_eq!(doc.computed_value(pt, "font-size"), "26.667px");
        assert_eq!(doc.computed_value(em, "font-size"), "12.8px");
        assert_eq!(doc.computed_value(pct, "font-size"), "40px");
    }

    #[test]
    fn test_importance_beats_order() {
        let mut doc = doc_with(".a-style { font-size: 10px !important } .a-style { font-size: 30px }");
        let id = doc.create_element("div").class("a-style").style("font-size: 40px").insert();
        assert_eq!(doc.computed_value(id, "font-size"), "10px");
    }

    #[test]
    fn test_inline_beats_sheet_normal() {
        let mut doc = doc_with(".a-style { font-size: 10px }");
        let id = doc.create_element("div").class("a-style").style("font-size: 40px").insert();
        assert_eq!(doc.computed_value(id, "font-size"), "40px");
    }

    #[test]
    fn test_later_rule_wins() {
        let mut doc = doc_with(".a-style { font-style: normal } .a-style { font-style: italic }");
        let id = doc.create_element("div").class("a-style").insert();
        assert_eq!(doc.computed_value(id, "font-style"), "italic");
    }

    #[test]
    fn test_unitless_line_height_inherits_as_factor() {
        let mut doc = doc_with(".outer { line-height: 1.5; font-size: 10px } .inner { font-size: 20px }");
        let outer = doc.create_element("div").class("outer").insert();
        let inner = doc.create_element("div").class("inner").parent(outer).insert();
        assert_eq!(doc.computed_value(outer, "line-height"), "15px");
        assert_eq!(doc.computed_value(inner, "line-height"), "30px");
    }

    #[test]
    fn test_line_height_normal() {
        let mut doc = Document::new();
        let id = doc.create_element("div").insert();
        assert_eq!(doc.computed_value(id, "line-height"), "normal");
    }

    #[test]
    fn test_word_spacing() {
        let mut doc = doc_with(".a-style { word-spacing: 5pt } .b-style { word-spacing: normal }");
        let a = doc.create_element("div").class("a-style").insert();
        let b = doc.create_element("div").class("b-style").insert();
        assert_eq!(doc.computed_value(a, "word-spacing"), "6.667px");
        assert_eq!(doc.computed_value(b, "word-spacing"), "0px");
    }

    #[test]
    fn test_border_shorthand_expansion() {
        let mut doc = doc_with(".a-style { border: 1pt solid Grey; border-radius: 10px }");
        let id = doc.create_element("div").class("a-style").insert();
        assert_eq!(doc.computed_value(id, "border-bottom-style"), "solid");
        assert_eq!(doc.computed_value(id, "border-bottom-color"), "rgb(128, 128, 128)");
        assert_eq!(doc.computed_value(id, "border-bottom-width"), "1.333px");
        assert_eq!(doc.computed_value(id, "border-top-left-radius"), "10px");
    }

    #[test]
    fn test_border_defaults() {
        let mut doc = Document::new();
        let id = doc.create_element("div").insert();
        assert_eq!(doc.computed_value(id, "border-bottom-style"), "none");
        assert_eq!(doc.computed_value(id, "border-bottom-color"), "rgb(0, 0, 0)");
        assert_eq!(doc.computed_value(id, "border-bottom-width"), "0px");
        assert_eq!(doc.computed_value(id, "border-top-left-radius"), "0px");
    }

    #[test]
    fn test_translucent_border_color() {
        let mut doc = doc_with(".box { border: 1px solid rgba(0, 0, 0, 0.2) }");
        let id = doc.create_element("div").class("box").insert();
        assert_eq!(doc.computed_value(id, "border-bottom-color"), "rgba(0, 0, 0, 0.2)");
    }

    #[test]
    fn test_colors() {
        let mut doc = doc_with(".a-style { background-color: hsl(0,0%,86%); color: red }");
        let a = doc.create_element("div").class("a-style").insert();
        let plain = doc.create_element("div").parent(a).insert();
        assert_eq!(doc.computed_value(a, "background-color"), "rgb(219, 219, 219)");
        assert_eq!(doc.computed_value(plain, "background-color"), "rgba(0, 0, 0, 0)");
        assert_eq!(doc.computed_value(plain, "color"), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_font_weight() {
        let mut doc = doc_with(".b { font-weight: bold } .n { font-weight: 300 }");
        let b = doc.create_element("div").class("b").insert();
        let child = doc.create_element("span").parent(b).insert();
        let n = doc.create_element("div").class("n").insert();
        assert_eq!(doc.computed_value(child, "font-weight"), "700");
        assert_eq!(doc.computed_value(n, "font-weight"), "300");
    }

    #[test]
    fn test_text_align_and_decoration() {
        let mut doc = doc_with(".c { text-align: center; text-decoration: underline solid red }");
        let c = doc.create_element("div").class("c").insert();
        let child = doc.create_element("div").parent(c).insert();
        let plain = doc.create_element("div").insert();
        assert_eq!(doc.computed_value(child, "text-align"), "center");
        assert_eq!(doc.computed_value(plain, "text-align"), "start");
        assert_eq!(doc.computed_value(c, "text-decoration"), "underline");
        assert_eq!(doc.computed_value(child, "text-decoration"), "none");
    }

    #[test]
    fn test_initial_keyword() {
        let mut doc = doc_with(".c { text-align: center } .i { text-align: initial }");
        let c = doc.create_element("div").class("c").insert();
        let i = doc.create_element("div").class("i").parent(c).insert();
        assert_eq!(doc.computed_value(i, "text-align"), "start");
    }

    #[test]
    fn test_font_family_keeps_case() {
        let mut doc = doc_with(".a-style { font-family: 'Andika New Basic', sans-serif }");
        let id = doc.create_element("div").class("a-style").insert();
        assert_eq!(
            doc.computed_value(id, "font-family"),
            "'Andika New Basic', sans-serif"
        );
    }

    #[test]
    fn test_components_keep_functions_whole() {
        assert_eq!(
            components("1px solid rgba(0, 0, 0, 0.2)"),
            vec!["1px", "solid", "rgba(0, 0, 0, 0.2)"]
        );
    }
}
