//! # tidbit
//!
//! Deterministic cores for a collection of small browser utilities.
//!
//! ## Features
//!
//! - Render a small Markdown dialect to HTML that is safe to insert as-is
//! - Reproducible pseudo-random streams from integer or text seeds
//! - Seeded blob outlines as SVG drawing commands
//! - Seeded horoscope readings and dice rolls
//! - Luhn card checks, color conversions and HOTP/TOTP codes
//!
//! Everything is a pure function over small inputs; hosts (the `tidbit` CLI
//! or the WASM bindings) own all I/O and storage.
//!
//! ## Quick Start
//!
//! ```
//! use tidbit::markdown::render_markdown;
//! use tidbit::seed::Seed;
//! use tidbit::shape::{BlobParams, generate_blob};
//!
//! let html = render_markdown("# Notes\n- one\n- two");
//! assert!(html.starts_with("<h1>Notes</h1>"));
//!
//! let blob = generate_blob(Seed::from_text("my-avatar"), &BlobParams::default());
//! assert_eq!(blob.segment_count(), 6);
//! ```
//!
//! ## Reproducibility
//!
//! Seeded outputs depend only on their inputs. Build a fresh
//! [`seed::Generator`] per output; sharing one between two blobs changes both.

pub mod card;
pub mod color;
pub mod dice;
pub mod error;
pub mod horoscope;
pub mod markdown;
pub mod otp;
pub mod seed;
pub mod shape;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use markdown::render_markdown;
pub use seed::{Generator, Seed, derive_seed};
pub use shape::{BlobParams, BlobPath, PathCommand, Point, generate_blob};
