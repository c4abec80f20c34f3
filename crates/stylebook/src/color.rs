//! Color values as computed style reports them.
//!
//! Computed colors are always serialized as `rgb(r, g, b)` or
//! `rgba(r, g, b, a)`, so that the snapshot reader can bucket them by exact
//! text the way the format dialog does.

use std::fmt;

use cssparser::{ParseError, Parser, ParserInput, Token};

/// An sRGB color with a fractional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0.0,
    };

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Parses a CSS color value.
    ///
    /// Supports hex notation, a table of common named colors, `transparent`,
    /// and the `rgb()`, `rgba()`, `hsl()` and `hsla()` functions. Returns
    /// `None` for anything else, including `currentcolor`, which depends on
    /// context the caller has to resolve.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stylebook::Rgba;
    ///
    /// assert_eq!(Rgba::parse("Grey"), Some(Rgba::rgb(128, 128, 128)));
    /// assert_eq!(Rgba::parse("hsl(0,0%,86%)").map(|c| c.to_string()),
    ///            Some("rgb(219, 219, 219)".to_string()));
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let mut input = ParserInput::new(text.trim());
        let mut parser = Parser::new(&mut input);
        let color = parse_color(&mut parser)?;
        parser.expect_exhausted().ok()?;
        Some(color)
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }

    /// The browser serialization of this color.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

fn parse_color(parser: &mut Parser<'_, '_>) -> Option<Rgba> {
    let token = parser.next().ok()?.clone();
    match token {
        Token::Hash(value) | Token::IDHash(value) => parse_hex(value.as_ref()),
        Token::Ident(name) => named_color(name.as_ref()),
        Token::Function(name) => {
            let name = name.to_ascii_lowercase();
            let result: Result<Option<Rgba>, ParseError<'_, ()>> =
                parser.parse_nested_block(|block| Ok(parse_color_function(&name, block)));
            result.ok().flatten()
        }
        _ => None,
    }
}

fn parse_hex(text: &str) -> Option<Rgba> {
    let digits: Vec<u8> = text
        .chars()
        .map(|c| c.to_digit(16).and_then(|d| u8::try_from(d).ok()))
        .collect::<Option<_>>()?;
    let expand = |nibble: u8| nibble << 4 | nibble;
    match digits.as_slice() {
        [r, g, b] => Some(Rgba::rgb(expand(*r), expand(*g), expand(*b))),
        [r, g, b, a] => Some(Rgba {
            alpha: f32::from(expand(*a)) / 255.0,
            ..Rgba::rgb(expand(*r), expand(*g), expand(*b))
        }),
        [r1, r2, g1, g2, b1, b2] => Some(Rgba::rgb(*r1 << 4 | *r2, *g1 << 4 | *g2, *b1 << 4 | *b2)),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Some(Rgba {
            alpha: f32::from(*a1 << 4 | *a2) / 255.0,
            ..Rgba::rgb(*r1 << 4 | *r2, *g1 << 4 | *g2, *b1 << 4 | *b2)
        }),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    let color = match name.to_ascii_lowercase().as_str() {
        "transparent" => Rgba::TRANSPARENT,
        "black" => Rgba::BLACK,
        "white" => Rgba::rgb(255, 255, 255),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "silver" => Rgba::rgb(192, 192, 192),
        "lightgray" | "lightgrey" => Rgba::rgb(211, 211, 211),
        "darkgray" | "darkgrey" => Rgba::rgb(169, 169, 169),
        "gainsboro" => Rgba::rgb(220, 220, 220),
        "red" => Rgba::rgb(255, 0, 0),
        "maroon" => Rgba::rgb(128, 0, 0),
        "orange" => Rgba::rgb(255, 165, 0),
        "yellow" => Rgba::rgb(255, 255, 0),
        "olive" => Rgba::rgb(128, 128, 0),
        "lime" => Rgba::rgb(0, 255, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "aqua" | "cyan" => Rgba::rgb(0, 255, 255),
        "teal" => Rgba::rgb(0, 128, 128),
        "blue" => Rgba::rgb(0, 0, 255),
        "navy" => Rgba::rgb(0, 0, 128),
        "fuchsia" | "magenta" => Rgba::rgb(255, 0, 255),
        "purple" => Rgba::rgb(128, 0, 128),
        _ => return None,
    };
    Some(color)
}

/// One numeric argument of a color function.
#[derive(Debug, Clone, Copy)]
enum Component {
    Number(f32),
    /// Percentage as a fraction, so `50%` is `0.5`.
    Percent(f32),
    Degrees(f32),
}

fn parse_color_function(name: &str, block: &mut Parser<'_, '_>) -> Option<Rgba> {
    let mut components = Vec::with_capacity(4);
    while let Ok(token) = block.next() {
        match token {
            Token::Number { value, .. } => components.push(Component::Number(*value)),
            Token::Percentage { unit_value, .. } => {
                components.push(Component::Percent(*unit_value))
            }
            Token::Dimension { value, unit, .. } if unit.eq_ignore_ascii_case("deg") => {
                components.push(Component::Degrees(*value))
            }
            Token::Comma | Token::Delim('/') => {}
            _ => return None,
        }
    }

    let alpha: f32 = match components.get(3) {
        None => 1.0,
        Some(Component::Number(a)) => *a,
        Some(Component::Percent(a)) => *a,
        Some(Component::Degrees(_)) => return None,
    }
    .clamp(0.0, 1.0);

    match (name, components.as_slice()) {
        ("rgb" | "rgba", [r, g, b] | [r, g, b, _]) => Some(Rgba {
            red: channel(*r)?,
            green: channel(*g)?,
            blue: channel(*b)?,
            alpha,
        }),
        ("hsl" | "hsla", [h, s, l] | [h, s, l, _]) => {
            let hue = match h {
                Component::Number(deg) | Component::Degrees(deg) => *deg,
                Component::Percent(_) => return None,
            };
            let (Component::Percent(saturation), Component::Percent(lightness)) = (s, l) else {
                return None;
            };
            let (red, green, blue) = hsl_to_rgb(hue, *saturation, *lightness);
            Some(Rgba {
                red,
                green,
                blue,
                alpha,
            })
        }
        _ => None,
    }
}

fn channel(component: Component) -> Option<u8> {
    let value = match component {
        Component::Number(n) => n,
        Component::Percent(p) => p * 255.0,
        Component::Degrees(_) => return None,
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let hue = hue.rem_euclid(360.0) / 360.0;
    let saturation = saturation.clamp(0.0, 1.0);
    let lightness = lightness.clamp(0.0, 1.0);

    let t2 = if lightness <= 0.5 {
        lightness * (saturation + 1.0)
    } else {
        lightness + saturation - lightness * saturation
    };
    let t1 = lightness * 2.0 - t2;

    let to_byte = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    (
        to_byte(hue_to_channel(t1, t2, hue + 1.0 / 3.0)),
        to_byte(hue_to_channel(t1, t2, hue)),
        to_byte(hue_to_channel(t1, t2, hue - 1.0 / 3.0)),
    )
}

fn hue_to_channel(t1: f32, t2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue * 6.0 < 1.0 {
        t1 + (t2 - t1) * hue * 6.0
    } else if hue * 2.0 < 1.0 {
        t2
    } else if hue * 3.0 < 2.0 {
        t1 + (t2 - t1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        t1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgba::parse("#000"), Some(Rgba::BLACK));
        assert_eq!(Rgba::parse("#808080"), Some(Rgba::rgb(128, 128, 128)));
        assert_eq!(Rgba::parse("#fFfFfF"), Some(Rgba::rgb(255, 255, 255)));
        assert!(Rgba::parse("#12345").is_none());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgba::parse("black"), Some(Rgba::BLACK));
        assert_eq!(Rgba::parse("Grey"), Some(Rgba::rgb(128, 128, 128)));
        assert_eq!(Rgba::parse("transparent"), Some(Rgba::TRANSPARENT));
        assert!(Rgba::parse("currentcolor").is_none());
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(Rgba::parse("rgb(128, 128, 128)"), Some(Rgba::rgb(128, 128, 128)));
        let translucent = Rgba::parse("rgba(0,0,0,0.2)");
        assert_eq!(translucent.map(|c| c.alpha), Some(0.2));
        assert_eq!(Rgba::parse("rgb(100%, 0%, 0%)"), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hsl() {
        assert_eq!(Rgba::parse("hsl(0,0%,86%)"), Some(Rgba::rgb(219, 219, 219)));
        assert_eq!(Rgba::parse("hsl(120, 100%, 25%)"), Some(Rgba::rgb(0, 128, 0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_css(), "rgb(1, 2, 3)");
        assert_eq!(Rgba::TRANSPARENT.to_css(), "rgba(0, 0, 0, 0)");
        let translucent = Rgba {
            alpha: 0.2,
            ..Rgba::BLACK
        };
        assert_eq!(translucent.to_css(), "rgba(0, 0, 0, 0.2)");
    }

    #[test]
    fn test_rejects_trailing_tokens() {
        assert!(Rgba::parse("black white").is_none());
    }
}
