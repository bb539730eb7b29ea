//! Snapshot Codec
//!
//! Reversible dictionary-substitution compression used to shrink persisted
//! snapshots. Compressed blobs carry a fixed marker prefix so that plain
//! (legacy or foreign) data can be passed through untouched.
//!
//! The coder works over the UTF-8 bytes of the input. The dictionary starts
//! with one code per byte value and grows by one phrase per emitted code.
//! Codes are 16 bits wide: once the code space is exhausted both sides reset
//! to the seed dictionary at the same step.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use thiserror::Error;
use tracing::warn;

/// Prefix identifying a compressed payload.
pub const MARKER: &str = "LZW1:";

/// Number of seed codes (one per byte value).
const SEED_CODES: u32 = 256;

/// Highest code the dictionary may assign before it resets.
const MAX_CODE: u32 = u16::MAX as u32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload is not valid base64")]
    Base64,

    #[error("payload has a dangling byte")]
    OddLength,

    #[error("unexpected code {code} (next free code is {next})")]
    BadCode { code: u16, next: u32 },

    #[error("decoded bytes are not valid UTF-8")]
    Utf8,
}

/// Returns true if `data` carries the compression marker.
pub fn is_compressed(data: &str) -> bool {
    data.starts_with(MARKER)
}

/// Compress `input`, returning `MARKER` followed by the encoded payload.
///
/// Empty input is returned unchanged.
pub fn compress(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let codes = encode(input.as_bytes());
    let mut bytes = Vec::with_capacity(codes.len() * 2);
    for code in codes {
        bytes.extend_from_slice(&code.to_be_bytes());
    }
    format!("{}{}", MARKER, STANDARD_NO_PAD.encode(bytes))
}

/// Reverse [`compress`].
///
/// Input without the marker is returned as-is. A marked payload that fails to
/// decode is also returned as-is (and logged); nothing is raised to the caller.
pub fn decompress(data: &str) -> String {
    match try_decompress(data) {
        Ok(Some(text)) => text,
        Ok(None) => data.to_string(),
        Err(e) => {
            warn!("undecodable compressed payload ({} bytes): {}", data.len(), e);
            data.to_string()
        }
    }
}

/// Strict variant of [`decompress`]: `Ok(None)` when the marker is absent.
pub fn try_decompress(data: &str) -> Result<Option<String>, CodecError> {
    let Some(payload) = data.strip_prefix(MARKER) else {
        return Ok(None);
    };
    let bytes = STANDARD_NO_PAD
        .decode(payload)
        .map_err(|_| CodecError::Base64)?;
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddLength);
    }
    let codes: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    let decoded = decode(&codes)?;
    String::from_utf8(decoded)
        .map(Some)
        .map_err(|_| CodecError::Utf8)
}

fn encode(input: &[u8]) -> Vec<u16> {
    // (prefix code, next byte) -> phrase code
    let mut dict: HashMap<(u16, u8), u16> = HashMap::new();
    let mut next = SEED_CODES;
    let mut codes = Vec::new();
    let mut phrase: Option<u16> = None;

    for &byte in input {
        let Some(current) = phrase else {
            phrase = Some(u16::from(byte));
            continue;
        };
        if let Some(&code) = dict.get(&(current, byte)) {
            phrase = Some(code);
            continue;
        }
        codes.push(current);
        if next <= MAX_CODE {
            dict.insert((current, byte), next as u16);
            next += 1;
        } else {
            dict.clear();
            next = SEED_CODES;
        }
        phrase = Some(u16::from(byte));
    }

    if let Some(current) = phrase {
        codes.push(current);
    }
    codes
}

fn decode(codes: &[u16]) -> Result<Vec<u8>, CodecError> {
    // phrases[i] holds the phrase for code SEED_CODES + i
    let mut phrases: Vec<Vec<u8>> = Vec::new();
    let mut out = Vec::new();
    let mut previous: Option<Vec<u8>> = None;

    for &code in codes {
        let next = SEED_CODES + phrases.len() as u32;
        let entry = if u32::from(code) < SEED_CODES {
            vec![code as u8]
        } else if let Some(known) = phrases.get((u32::from(code) - SEED_CODES) as usize) {
            known.clone()
        } else if u32::from(code) == next {
            // The encoder defined this code on the step we have not replayed yet.
            let Some(prev) = previous.as_ref() else {
                return Err(CodecError::BadCode { code, next });
            };
            let mut phrase = prev.clone();
            phrase.push(prev[0]);
            phrase
        } else {
            return Err(CodecError::BadCode { code, next });
        };

        out.extend_from_slice(&entry);

        if let Some(mut prev) = previous.take() {
            if next <= MAX_CODE {
                prev.push(entry[0]);
                phrases.push(prev);
            } else {
                phrases.clear();
            }
        }
        previous = Some(entry);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(compress(""), "");
        assert_eq!(decompress(""), "");
    }

    #[test]
    fn test_round_trip_text() {
        let samples = [
            "a",
            "TOBEORNOTTOBEORTOBEORNOT",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "{\"fileSystem\":[[\"/home\",{\"kind\":\"directory\"}]]}",
            "héllo wörld - ünïcødé 🦀🦀🦀",
        ];
        for s in samples {
            let packed = compress(s);
            assert!(is_compressed(&packed));
            assert_eq!(decompress(&packed), s);
        }
    }

    #[test]
    fn test_marker_as_literal_data() {
        let s = format!("{}{}not really compressed", MARKER, MARKER);
        let packed = compress(&s);
        assert_ne!(packed, s);
        assert_eq!(decompress(&packed), s);
    }

    #[test]
    fn test_unmarked_input_is_returned_unchanged() {
        assert_eq!(decompress("plain json {}"), "plain json {}");
        assert_eq!(try_decompress("plain").unwrap(), None);
    }

    #[test]
    fn test_corrupt_payload_fails_open() {
        let bad = format!("{}!!!not base64!!!", MARKER);
        assert_eq!(decompress(&bad), bad);
        assert_eq!(try_decompress(&bad), Err(CodecError::Base64));
    }

    #[test]
    fn test_out_of_range_code_is_rejected() {
        // 0x0141 is a phrase code that cannot appear as the first code
        let bad = format!("{}{}", MARKER, STANDARD_NO_PAD.encode([0x01u8, 0x41]));
        assert!(matches!(try_decompress(&bad), Err(CodecError::BadCode { .. })));
    }

    #[test]
    fn test_repetitive_input_shrinks() {
        let s = "ls -la /home/user\n".repeat(200);
        assert!(compress(&s).len() < s.len() / 2);
    }

    #[test]
    fn test_dictionary_reset_round_trip() {
        // Enough distinct phrases to exhaust the 16-bit code space.
        let mut s = String::new();
        let mut x: u32 = 12345;
        for _ in 0..400_000 {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
            s.push(char::from(b'a' + ((x >> 16) % 26) as u8));
        }
        let packed = compress(&s);
        assert_eq!(decompress(&packed), s);
    }
}
