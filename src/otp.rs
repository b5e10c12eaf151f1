//! One-time passwords for the OTP demo widget.
//!
//! HOTP (RFC 4226) and TOTP (RFC 6238) with HMAC-SHA1, the variant every
//! authenticator app supports. Secrets are exchanged in RFC 4648 base32.

use sha1_smol::Sha1;

use crate::error::{Error, Result};

const SHA1_BLOCK: usize = 64;

/// TOTP parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpConfig {
    /// Code length, clamped to 6..=8.
    pub digits: u32,
    /// Time step in seconds.
    pub step: u64,
    /// Unix time at which counting starts.
    pub t0: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            digits: 6,
            step: 30,
            t0: 0,
        }
    }
}

impl OtpConfig {
    fn counter(&self, unix_time: u64) -> u64 {
        unix_time.saturating_sub(self.t0) / self.step.max(1)
    }
}

/// Decode an RFC 4648 base32 secret.
///
/// Case-insensitive; spaces, dashes and `=` padding are ignored.
///
/// ```
/// use tidbit::otp::decode_base32;
///
/// assert_eq!(decode_base32("MZXW6===").unwrap(), b"foo");
/// ```
pub fn decode_base32(secret: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(secret.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for c in secret.chars() {
        let value = match c {
            'A'..='Z' => c as u32 - 'A' as u32,
            'a'..='z' => c as u32 - 'a' as u32,
            '2'..='7' => c as u32 - '2' as u32 + 26,
            ' ' | '-' | '=' => continue,
            _ => {
                return Err(Error::InvalidSecret(format!(
                    "unexpected character {c:?}"
                )));
            }
        };

        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    if out.is_empty() {
        return Err(Error::InvalidSecret("secret is empty".to_string()));
    }
    Ok(out)
}

fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; 20] {
    let mut block = [0u8; SHA1_BLOCK];
    if key.len() > SHA1_BLOCK {
        let mut hasher = Sha1::new();
        hasher.update(key);
        block[..20].copy_from_slice(&hasher.digest().bytes());
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let mut inner = Sha1::new();
    inner.update(&block.map(|b| b ^ 0x36));
    inner.update(message);

    let mut outer = Sha1::new();
    outer.update(&block.map(|b| b ^ 0x5c));
    outer.update(&inner.digest().bytes());
    outer.digest().bytes()
}

/// HOTP code for `counter`, zero-padded to `digits` (clamped to 6..=8).
pub fn hotp(key: &[u8], counter: u64, digits: u32) -> String {
    let digits = digits.clamp(6, 8);
    let mac = hmac_sha1(key, &counter.to_be_bytes());

    // Dynamic truncation.
    let offset = usize::from(mac[19] & 0x0f);
    let code = u32::from_be_bytes([mac[offset], mac[offset + 1], mac[offset + 2], mac[offset + 3]])
        & 0x7fff_ffff;
    let code = code % 10u32.pow(digits);
    format!("{code:0width$}", width = digits as usize)
}

/// TOTP code at `unix_time`.
pub fn totp(key: &[u8], unix_time: u64, config: &OtpConfig) -> String {
    hotp(key, config.counter(unix_time), config.digits)
}

/// Seconds until the code shown at `unix_time` rolls over.
pub fn seconds_remaining(unix_time: u64, config: &OtpConfig) -> u64 {
    let step = config.step.max(1);
    step - unix_time.saturating_sub(config.t0) % step
}
