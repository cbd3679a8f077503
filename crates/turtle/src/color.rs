use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A pen or background color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("pink", Color::rgb(255, 192, 203)),
    ("brown", Color::rgb(165, 42, 42)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
];

// Colors always serialize in their `rgb(r,g,b)` display form, so the defaults below show up
// in a command log as "rgb(0,255,102)" and "rgb(17,17,17)" rather than the hex they're written in.
impl Color {
    /// The pen color of a freshly created turtle.
    pub const PEN: Color = Color::rgb(0x00, 0xff, 0x66);

    /// The background that `Turtle::reset` paints.
    pub const BACKGROUND: Color = Color::rgb(0x11, 0x11, 0x11);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Builds a color from arbitrary integer channels, clamping each one into `0..=255`.
    pub fn clamped(r: i64, g: i64, b: i64) -> Color {
        let c = |x: i64| x.clamp(0, 255) as u8;
        Color::rgb(c(r), c(g), c(b))
    }

    /// A color with three independent, uniformly distributed channels.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Color::rgb(
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        )
    }
}

fn parse_hex(digits: &str) -> Option<Color> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|x| x * 17);
            Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

// Accepts "r,g,b" with optional whitespace. Channels may be out of range (or even
// fractional); they get truncated and clamped.
fn parse_triple(inner: &str) -> Option<Color> {
    let mut channels = inner.split(',').map(|s| s.trim().parse::<f64>().ok());
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    if channels.next().is_some() || !(r.is_finite() && g.is_finite() && b.is_finite()) {
        return None;
    }
    Some(Color::clamped(r as i64, g as i64, b as i64))
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Color, Error> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        let parsed = if let Some(hex) = lower.strip_prefix('#') {
            parse_hex(hex)
        } else if let Some(inner) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            parse_triple(inner)
        } else {
            NAMED
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, color)| *color)
        };

        parsed.ok_or_else(|| Error::BadColor(s.to_owned()))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Color, Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Color {
        Color::rgb(r, g, b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}
