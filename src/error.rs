//! Error types for tidbit operations.
//!
//! The markdown renderer and the seeded generator are total and never
//! produce these; they come from parsing host-supplied widget input.

use thiserror::Error;

/// Errors that can occur while parsing widget input.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dice notation: {0}")]
    InvalidDice(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid OTP secret: {0}")]
    InvalidSecret(String),

    #[error("Unknown zodiac sign: {0}")]
    UnknownSign(String),
}

pub type Result<T> = std::result::Result<T, Error>;
