//! Seeded daily horoscope readings.
//!
//! A reading is a pure function of the sign and an opaque date string, so the
//! same sign on the same day always gets the same text. The date is whatever
//! the host shows (usually `YYYY-MM-DD`); it is never parsed.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::seed::{Generator, derive_seed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Lowercase name, also the seed prefix.
    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            ZodiacSign::Aries => '♈',
            ZodiacSign::Taurus => '♉',
            ZodiacSign::Gemini => '♊',
            ZodiacSign::Cancer => '♋',
            ZodiacSign::Leo => '♌',
            ZodiacSign::Virgo => '♍',
            ZodiacSign::Libra => '♎',
            ZodiacSign::Scorpio => '♏',
            ZodiacSign::Sagittarius => '♐',
            ZodiacSign::Capricorn => '♑',
            ZodiacSign::Aquarius => '♒',
            ZodiacSign::Pisces => '♓',
        }
    }
}

impl FromStr for ZodiacSign {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ZodiacSign::ALL
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownSign(wanted.to_string()))
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const MOODS: &[&str] = &[
    "curious",
    "restless",
    "serene",
    "bold",
    "nostalgic",
    "playful",
    "focused",
    "generous",
];

const COLORS: &[&str] = &[
    "crimson", "amber", "teal", "violet", "silver", "olive", "coral", "indigo",
];

const OPENINGS: &[&str] = &[
    "The stars lean in your favor today.",
    "A quiet shift in the sky asks for patience.",
    "Mercury hums along your chart.",
    "The moon lights up an overlooked corner of your life.",
    "Venus brings warmth to your plans.",
    "Mars stirs up your ambitions.",
];

const MIDDLES: &[&str] = &[
    "An unexpected message could change your afternoon.",
    "Someone close to you has been waiting to be asked.",
    "Small habits compound faster than you think.",
    "A problem you shelved is ready to be solved.",
    "Your instinct about money is sharper than usual.",
    "Say yes to the detour.",
];

const CLOSINGS: &[&str] = &[
    "Trust the slow road.",
    "Keep your evening free.",
    "Write it down before it fades.",
    "Let someone else lead for once.",
    "Finish one thing before starting another.",
    "Laugh at the small disasters.",
];

/// A generated reading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub sign: ZodiacSign,
    pub date: String,
    pub mood: &'static str,
    pub lucky_number: u32,
    pub lucky_color: &'static str,
    pub message: String,
}

fn draw(rng: &mut Generator, table: &'static [&'static str]) -> &'static str {
    rng.pick(table).copied().unwrap_or_default()
}

/// Produce the reading for `sign` on `date`.
///
/// Draw order (mood, number, color, three message phrases) is fixed.
pub fn reading(sign: ZodiacSign, date: &str) -> Reading {
    let mut rng = Generator::new(derive_seed(&format!("{}:{}", sign.name(), date)));

    let mood = draw(&mut rng, MOODS);
    let lucky_number = rng.range_u32(1, 99);
    let lucky_color = draw(&mut rng, COLORS);
    let message = [
        draw(&mut rng, OPENINGS),
        draw(&mut rng, MIDDLES),
        draw(&mut rng, CLOSINGS),
    ]
    .join(" ");

    Reading {
        sign,
        date: date.to_string(),
        mood,
        lucky_number,
        lucky_color,
        message,
    }
}
