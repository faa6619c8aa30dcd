//! Encoding helpers for building templates and arguments.
//!
//! Narrow-unit callers can use `&str` bytes directly; these helpers cover
//! the wide and UTF-8 unit types, plus lossy decoding back to `String` for
//! display and comparison.

use crate::unit::Utf8Unit;

/// Wide (`u32`) unit conversions, one Unicode scalar per unit.
pub mod wide {
    /// Encodes `s` as wide units.
    pub fn from_str(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    /// Decodes wide units to a `String`. Values that are not valid Unicode
    /// scalars become U+FFFD.
    pub fn to_string(s: &[u32]) -> String {
        s.iter()
            .map(|&u| char::from_u32(u).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

/// UTF-8 ([`Utf8Unit`]) conversions.
pub mod utf8 {
    use super::Utf8Unit;

    /// Encodes `s` as UTF-8 code units.
    pub fn from_str(s: &str) -> Vec<Utf8Unit> {
        s.bytes().map(Utf8Unit).collect()
    }

    /// Decodes UTF-8 code units to a `String`, replacing invalid sequences
    /// with U+FFFD.
    pub fn to_string(s: &[Utf8Unit]) -> String {
        let bytes: Vec<u8> = s.iter().map(|u| u.0).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Narrow (`u8`) unit conversions.
pub mod narrow {
    /// Encodes `s` as narrow units (the raw UTF-8 bytes).
    pub fn from_str(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    /// Decodes narrow units to a `String`, replacing invalid sequences with
    /// U+FFFD.
    pub fn to_string(s: &[u8]) -> String {
        String::from_utf8_lossy(s).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_round_trip() {
        let s = "héllo π";
        assert_eq!(wide::to_string(&wide::from_str(s)), s);
    }

    #[test]
    fn wide_invalid_scalar_is_replaced() {
        assert_eq!(wide::to_string(&[0xD800]), "\u{FFFD}");
    }

    #[test]
    fn utf8_round_trip() {
        let s = "héllo \u{1F600}";
        assert_eq!(utf8::to_string(&utf8::from_str(s)), s);
    }

    #[test]
    fn narrow_is_raw_bytes() {
        assert_eq!(narrow::from_str("hi"), b"hi");
    }
}
