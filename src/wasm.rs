//! WASM bindings for the browser widgets.
//!
//! This module exposes the widget cores to JavaScript via wasm-bindgen.
//! Structured results are returned as flat arrays; errors become string
//! `JsValue`s.

use wasm_bindgen::prelude::*;

use crate::card;
use crate::color;
use crate::dice::DiceSpec;
use crate::horoscope::{self, ZodiacSign};
use crate::markdown;
use crate::otp::{self, OtpConfig};
use crate::seed::{Generator, Seed};
use crate::shape::{BlobParams, generate_blob};
use crate::util::time_now_secs;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Render markdown to HTML for the previewer.
#[wasm_bindgen]
pub fn render_markdown(text: &str) -> String {
    markdown::render_markdown(text)
}

fn blob_params(vertices: usize, irregularity: f64, smoothness: f64, size: f64) -> BlobParams {
    BlobParams {
        vertices,
        irregularity,
        smoothness,
        size,
    }
    .clamped()
}

/// SVG document for a seeded blob. Out-of-range parameters are clamped.
#[wasm_bindgen]
pub fn blob_svg(
    seed: &str,
    vertices: usize,
    irregularity: f64,
    smoothness: f64,
    size: f64,
    fill: &str,
) -> String {
    let params = blob_params(vertices, irregularity, smoothness, size);
    generate_blob(Seed::parse(seed), &params).to_svg(fill)
}

/// SVG path data (`d` attribute) for a seeded blob.
#[wasm_bindgen]
pub fn blob_path(seed: &str, vertices: usize, irregularity: f64, smoothness: f64, size: f64) -> String {
    let params = blob_params(vertices, irregularity, smoothness, size);
    generate_blob(Seed::parse(seed), &params).to_svg_path()
}

/// Today's reading as `[mood, lucky number, lucky color, message]`.
#[wasm_bindgen]
pub fn horoscope(sign: &str, date: &str) -> Result<Vec<String>, JsValue> {
    let sign: ZodiacSign = sign.parse().map_err(js_err)?;
    let r = horoscope::reading(sign, date);
    Ok(vec![
        r.mood.to_string(),
        r.lucky_number.to_string(),
        r.lucky_color.to_string(),
        r.message,
    ])
}

/// Roll dice notation; returns the individual dice followed by the total.
#[wasm_bindgen]
pub fn roll_dice(notation: &str, seed: u32) -> Result<Vec<i64>, JsValue> {
    let spec = DiceSpec::parse(notation).map_err(js_err)?;
    let roll = spec.roll(&mut Generator::new(seed));
    let mut out: Vec<i64> = roll.rolls.iter().map(|&r| i64::from(r)).collect();
    out.push(roll.total);
    Ok(out)
}

/// Whether a typed card number passes the length and Luhn checks.
#[wasm_bindgen]
pub fn check_card(number: &str) -> bool {
    card::check_card(number).valid
}

/// Card brand name (`visa`, `mastercard`, `amex`, `discover`, `unknown`).
#[wasm_bindgen]
pub fn card_brand(number: &str) -> String {
    card::check_card(number).brand.name().to_string()
}

/// Convert any supported color notation to `[hex, rgb(...), hsl(...)]`.
#[wasm_bindgen]
pub fn convert_color(input: &str) -> Result<Vec<String>, JsValue> {
    let info = color::parse_color(input).map_err(js_err)?;
    Ok(vec![info.hex, info.rgb.to_string(), info.hsl.to_string()])
}

/// Current 6-digit TOTP code for a base32 secret.
#[wasm_bindgen]
pub fn totp_now(secret: &str) -> Result<String, JsValue> {
    let key = otp::decode_base32(secret).map_err(js_err)?;
    Ok(otp::totp(&key, time_now_secs(), &OtpConfig::default()))
}

/// Seconds until the current TOTP code expires.
#[wasm_bindgen]
pub fn totp_seconds_remaining() -> u64 {
    otp::seconds_remaining(time_now_secs(), &OtpConfig::default())
}
