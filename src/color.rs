//! Color space conversions for the color converter widget.

use std::fmt;

use crate::error::{Error, Result};

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// One color in every supported notation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorInfo {
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`; the `#` is optional.
    ///
    /// ```
    /// use tidbit::color::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#0f8").unwrap(), Rgb::new(0x00, 0xff, 0x88));
    /// ```
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || Error::InvalidColor(input.to_string());
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(hex[i..=i].repeat(2).as_str());
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let s = delta / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        Hsl {
            h,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Hsl {
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;
        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.0}, {:.0}%, {:.0}%)", self.h, self.s, self.l)
    }
}

/// Split `name(a, b, c)` into three trimmed arguments.
fn function_args<'a>(input: &'a str, name: &str) -> Option<[&'a str; 3]> {
    let lower = input.get(..name.len())?;
    if !lower.eq_ignore_ascii_case(name) {
        return None;
    }
    let inner = input[name.len()..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let args = [parts.next()?, parts.next()?, parts.next()?];
    parts.next().is_none().then_some(args)
}

/// Parse hex, `rgb(r, g, b)` or `hsl(h, s%, l%)` and convert to all forms.
pub fn parse_color(input: &str) -> Result<ColorInfo> {
    let trimmed = input.trim();
    let invalid = || Error::InvalidColor(input.to_string());

    let rgb = if let Some([r, g, b]) = function_args(trimmed, "rgb") {
        let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        Rgb::new(channel(r)?, channel(g)?, channel(b)?)
    } else if let Some([h, s, l]) = function_args(trimmed, "hsl") {
        let number = |v: &str| {
            v.trim_end_matches('%')
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(invalid)
        };
        let (h, s, l) = (number(h)?, number(s)?, number(l)?);
        if !(0.0..=100.0).contains(&s) || !(0.0..=100.0).contains(&l) {
            return Err(invalid());
        }
        Hsl { h, s, l }.to_rgb()
    } else {
        Rgb::from_hex(trimmed)?
    };

    Ok(ColorInfo {
        hex: rgb.to_hex(),
        rgb,
        hsl: rgb.to_hsl(),
    })
}
