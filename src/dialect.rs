//! Dialect configuration: separator, terminator and quoting characters,
//! plus output charset conversion and BOM handling.

use crate::error::CsvError;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use serde::{Deserialize, Serialize};

/// BOM byte sequences by charset name.
///
/// Kept byte-identical to the historical table this crate reproduces. Note
/// the UTF-32LE entry: the standard mark would be `FF FE 00 00`, but existing
/// consumers expect the 2-byte form, so it stays.
static BOM_TABLE: &[(&str, &[u8])] = &[
    ("UCS-2LE", b"\xFF\xFE"),
    ("UTF-8", b"\xEF\xBB\xBF"),
    ("UTF-16LE", b"\xFF\xFE"),
    ("UTF-16BE", b"\xFE\xFF"),
    ("UTF-32LE", b"\xFF\xFE"),
    ("UTF-32BE", b"\x00\x00\xFE\xFF"),
];

/// Look up the BOM registered for a charset name (exact match, no aliases).
pub fn bom_for(charset: &str) -> Option<&'static [u8]> {
    BOM_TABLE
        .iter()
        .find(|(name, _)| *name == charset)
        .map(|(_, bom)| *bom)
}

/// CSV formatting configuration.
///
/// A plain value: mutate fields freely between renders, only the state at
/// render time matters (nothing derived is cached). Separator and terminator
/// may be multi-character; quote and escape are conventionally single
/// characters, though no length is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Inserted between rows.
    pub terminator: String,
    /// Inserted between fields within a row.
    pub separator: String,
    /// Wraps every non-numeric field.
    pub quote: String,
    /// Prefixes each occurrence of `quote` inside field content.
    pub escape: String,
    /// Target output encoding name, e.g. "UTF-8" or "UTF-16LE".
    pub charset: String,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            terminator: "\r\n".to_string(),
            separator: "\t".to_string(),
            quote: "\"".to_string(),
            escape: "\"".to_string(),
            charset: "UCS-2LE".to_string(),
        }
    }
}

impl Dialect {
    /// Convert UTF-8 text into the configured charset.
    ///
    /// Identity when the charset is `"UTF-8"`. Unknown charset names and
    /// characters the target cannot represent are surfaced as errors; output
    /// is never silently substituted.
    pub fn convert_to_charset(&self, text: &str) -> Result<Vec<u8>, CsvError> {
        if self.charset == "UTF-8" {
            return Ok(text.as_bytes().to_vec());
        }
        encode_charset(&self.charset, text)
    }

    /// Decode bytes in the configured charset back into UTF-8 text.
    ///
    /// UCS-2LE input is decoded as UTF-16LE, so well-formed surrogate pairs
    /// are accepted here even though [`convert_to_charset`] refuses to
    /// produce them for that charset.
    ///
    /// [`convert_to_charset`]: Dialect::convert_to_charset
    pub fn convert_from_charset(&self, bytes: &[u8]) -> Result<String, CsvError> {
        if self.charset == "UTF-8" {
            return String::from_utf8(bytes.to_vec()).map_err(|_| CsvError::Undecodable {
                charset: self.charset.clone(),
            });
        }
        decode_charset(&self.charset, bytes)
    }

    /// BOM registered for the current charset, if any. `None` simply means
    /// the output carries no mark.
    pub fn bom(&self) -> Option<&'static [u8]> {
        bom_for(&self.charset)
    }

    /// Prepend the registered BOM, or return the input unchanged when the
    /// charset has none. Not idempotent: each call prepends again, so call
    /// exactly once per render.
    pub fn prepend_bom(&self, bytes: Vec<u8>) -> Vec<u8> {
        match self.bom() {
            Some(bom) => {
                let mut out = Vec::with_capacity(bom.len() + bytes.len());
                out.extend_from_slice(bom);
                out.extend_from_slice(&bytes);
                out
            }
            None => bytes,
        }
    }

    /// Strip the registered BOM when the input starts with exactly those
    /// bytes; otherwise return the input unchanged.
    pub fn strip_bom<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        match self.bom() {
            Some(bom) if bytes.starts_with(bom) => &bytes[bom.len()..],
            _ => bytes,
        }
    }
}

/// Encode UTF-8 text into `charset`.
///
/// The Unicode family is handled directly: encoding_rs only encodes into
/// UTF-8 and legacy charsets, so UTF-16/UTF-32 forms would otherwise fall
/// through to the wrong output. Everything else resolves via the WHATWG
/// label registry.
fn encode_charset(charset: &str, text: &str) -> Result<Vec<u8>, CsvError> {
    match charset {
        // UCS-2 has no surrogate pairs; supplementary-plane input is an error.
        "UCS-2LE" => {
            let mut out = Vec::with_capacity(text.len() * 2);
            for c in text.chars() {
                let cp = c as u32;
                if cp > 0xFFFF {
                    return Err(CsvError::Unencodable {
                        charset: charset.to_string(),
                    });
                }
                out.extend_from_slice(&(cp as u16).to_le_bytes());
            }
            Ok(out)
        }
        "UTF-16LE" | "UTF-16BE" => Ok(encode_utf16_bytes(text, charset == "UTF-16BE")),
        "UTF-32LE" | "UTF-32BE" => {
            let big_endian = charset == "UTF-32BE";
            let mut out = Vec::with_capacity(text.len() * 4);
            for c in text.chars() {
                let bytes = if big_endian {
                    (c as u32).to_be_bytes()
                } else {
                    (c as u32).to_le_bytes()
                };
                out.extend_from_slice(&bytes);
            }
            Ok(out)
        }
        label => {
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| CsvError::UnsupportedCharset(label.to_string()))?;
            // encoding_rs encodes into UTF-8 for UTF-16 output encodings, so
            // labels like "utf-16le" or "unicode" must take the direct
            // encoder rather than fall through to `encode`.
            if encoding == UTF_16LE {
                return Ok(encode_utf16_bytes(text, false));
            }
            if encoding == UTF_16BE {
                return Ok(encode_utf16_bytes(text, true));
            }
            let (bytes, _, had_errors) = encoding.encode(text);
            if had_errors {
                // encoding_rs substitutes numeric character references for
                // unmappable input; discard that output and report instead.
                return Err(CsvError::Unencodable {
                    charset: label.to_string(),
                });
            }
            Ok(bytes.into_owned())
        }
    }
}

fn encode_utf16_bytes(text: &str, big_endian: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        let bytes = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        out.extend_from_slice(&bytes);
    }
    out
}

/// Decode bytes in `charset` into UTF-8 text, the inverse of [`encode_charset`].
fn decode_charset(charset: &str, bytes: &[u8]) -> Result<String, CsvError> {
    match charset {
        "UCS-2LE" | "UTF-16LE" | "UTF-16BE" => {
            if bytes.len() % 2 != 0 {
                return Err(CsvError::Undecodable {
                    charset: charset.to_string(),
                });
            }
            let big_endian = charset == "UTF-16BE";
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| {
                    if big_endian {
                        u16::from_be_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_le_bytes([pair[0], pair[1]])
                    }
                })
                .collect();
            String::from_utf16(&units).map_err(|_| CsvError::Undecodable {
                charset: charset.to_string(),
            })
        }
        "UTF-32LE" | "UTF-32BE" => {
            if bytes.len() % 4 != 0 {
                return Err(CsvError::Undecodable {
                    charset: charset.to_string(),
                });
            }
            let big_endian = charset == "UTF-32BE";
            let mut out = String::with_capacity(bytes.len() / 4);
            for quad in bytes.chunks_exact(4) {
                let cp = if big_endian {
                    u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]])
                } else {
                    u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]])
                };
                let c = char::from_u32(cp).ok_or_else(|| CsvError::Undecodable {
                    charset: charset.to_string(),
                })?;
                out.push(c);
            }
            Ok(out)
        }
        label => {
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| CsvError::UnsupportedCharset(label.to_string()))?;
            // BOM handling is a separate, explicit operation here.
            let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
            if had_errors {
                return Err(CsvError::Undecodable {
                    charset: label.to_string(),
                });
            }
            Ok(text.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_charset(charset: &str) -> Dialect {
        Dialect {
            charset: charset.to_string(),
            ..Dialect::default()
        }
    }

    #[test]
    fn default_dialect() {
        let dialect = Dialect::default();
        assert_eq!(dialect.terminator, "\r\n");
        assert_eq!(dialect.separator, "\t");
        assert_eq!(dialect.quote, "\"");
        assert_eq!(dialect.escape, "\"");
        assert_eq!(dialect.charset, "UCS-2LE");
    }

    #[test]
    fn bom_lookup_is_exact() {
        assert_eq!(bom_for("UTF-8"), Some(&b"\xEF\xBB\xBF"[..]));
        assert_eq!(bom_for("UTF-16BE"), Some(&b"\xFE\xFF"[..]));
        assert_eq!(bom_for("UTF-32BE"), Some(&b"\x00\x00\xFE\xFF"[..]));
        assert_eq!(bom_for("utf-8"), None);
        assert_eq!(bom_for("KOI8-R"), None);
    }

    #[test]
    fn utf32le_bom_keeps_historical_two_byte_form() {
        assert_eq!(bom_for("UTF-32LE"), bom_for("UTF-16LE"));
        assert_eq!(bom_for("UTF-32LE"), Some(&b"\xFF\xFE"[..]));
    }

    #[test]
    fn prepend_then_strip_is_roundtrip() {
        for charset in ["UCS-2LE", "UTF-8", "UTF-16LE", "UTF-16BE", "UTF-32LE", "UTF-32BE"] {
            let dialect = with_charset(charset);
            let payload = vec![0x31, 0x00, 0x32, 0x00];
            let marked = dialect.prepend_bom(payload.clone());
            assert_ne!(marked, payload, "{charset} should have prepended a BOM");
            assert_eq!(dialect.strip_bom(&marked), &payload[..]);
        }
    }

    #[test]
    fn prepend_without_registered_bom_is_noop() {
        let dialect = with_charset("windows-1251");
        assert_eq!(dialect.prepend_bom(vec![1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(dialect.strip_bom(&[1, 2, 3]), &[1, 2, 3]);
    }

    #[test]
    fn prepend_twice_prepends_twice() {
        let dialect = with_charset("UTF-8");
        let once = dialect.prepend_bom(vec![b'a']);
        let twice = dialect.prepend_bom(once.clone());
        assert_eq!(twice.len(), once.len() + 3);
    }

    #[test]
    fn strip_leaves_short_or_unmarked_input_alone() {
        let dialect = with_charset("UTF-32BE");
        assert_eq!(dialect.strip_bom(&[0x00, 0x00]), &[0x00, 0x00]);
        assert_eq!(dialect.strip_bom(b"abcd"), b"abcd");
        assert_eq!(dialect.strip_bom(&[]), &[] as &[u8]);
    }

    #[test]
    fn utf8_charset_is_identity() {
        let dialect = with_charset("UTF-8");
        assert_eq!(dialect.convert_to_charset("héllo").unwrap(), "héllo".as_bytes());
        assert_eq!(
            dialect.convert_from_charset("héllo".as_bytes()).unwrap(),
            "héllo"
        );
    }

    #[test]
    fn ucs2le_encodes_bmp_text() {
        let dialect = with_charset("UCS-2LE");
        assert_eq!(
            dialect.convert_to_charset("A1").unwrap(),
            vec![0x41, 0x00, 0x31, 0x00]
        );
    }

    #[test]
    fn ucs2le_rejects_supplementary_plane() {
        let dialect = with_charset("UCS-2LE");
        let err = dialect.convert_to_charset("\u{1F600}").unwrap_err();
        assert!(matches!(err, CsvError::Unencodable { .. }));
    }

    #[test]
    fn utf16le_uses_surrogate_pairs() {
        let dialect = with_charset("UTF-16LE");
        // U+1F600 is D83D DE00 in UTF-16.
        assert_eq!(
            dialect.convert_to_charset("\u{1F600}").unwrap(),
            vec![0x3D, 0xD8, 0x00, 0xDE]
        );
    }

    #[test]
    fn utf16be_roundtrip() {
        let dialect = with_charset("UTF-16BE");
        let bytes = dialect.convert_to_charset("Ж x").unwrap();
        assert_eq!(dialect.convert_from_charset(&bytes).unwrap(), "Ж x");
    }

    #[test]
    fn utf32_encodes_code_points() {
        assert_eq!(
            with_charset("UTF-32BE").convert_to_charset("A").unwrap(),
            vec![0x00, 0x00, 0x00, 0x41]
        );
        assert_eq!(
            with_charset("UTF-32LE").convert_to_charset("A").unwrap(),
            vec![0x41, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn utf32_roundtrip_with_supplementary_plane() {
        let dialect = with_charset("UTF-32LE");
        let bytes = dialect.convert_to_charset("a\u{1F600}b").unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(dialect.convert_from_charset(&bytes).unwrap(), "a\u{1F600}b");
    }

    #[test]
    fn non_canonical_utf16_labels_still_encode_utf16() {
        // "Ж" is U+0416: 16 04 in UTF-16LE, D0 96 in UTF-8.
        let dialect = with_charset("utf-16le");
        let bytes = dialect.convert_to_charset("Ж").unwrap();
        assert_eq!(bytes, vec![0x16, 0x04]);
        assert_eq!(dialect.convert_from_charset(&bytes).unwrap(), "Ж");

        assert_eq!(
            with_charset("utf-16be").convert_to_charset("Ж").unwrap(),
            vec![0x04, 0x16]
        );
        // "unicode" is a WHATWG label of UTF-16LE.
        assert_eq!(
            with_charset("unicode").convert_to_charset("Ж").unwrap(),
            vec![0x16, 0x04]
        );
    }

    #[test]
    fn ucs2le_decode_accepts_surrogate_pairs() {
        // Decode is UTF-16LE-tolerant even though encode refuses non-BMP.
        let ucs2 = with_charset("UCS-2LE");
        let bytes = with_charset("UTF-16LE").convert_to_charset("\u{1F600}").unwrap();
        assert_eq!(ucs2.convert_from_charset(&bytes).unwrap(), "\u{1F600}");
    }

    #[test]
    fn odd_length_utf16_input_is_undecodable() {
        let dialect = with_charset("UTF-16LE");
        let err = dialect.convert_from_charset(&[0x41]).unwrap_err();
        assert!(matches!(err, CsvError::Undecodable { .. }));
    }

    #[test]
    fn lone_surrogate_is_undecodable() {
        let dialect = with_charset("UTF-16LE");
        let err = dialect.convert_from_charset(&[0x3D, 0xD8]).unwrap_err();
        assert!(matches!(err, CsvError::Undecodable { .. }));
    }

    #[test]
    fn unknown_charset_is_rejected() {
        let dialect = with_charset("EBCDIC-FR");
        let err = dialect.convert_to_charset("x").unwrap_err();
        assert!(matches!(err, CsvError::UnsupportedCharset(_)));
        let err = dialect.convert_from_charset(b"x").unwrap_err();
        assert!(matches!(err, CsvError::UnsupportedCharset(_)));
    }

    #[test]
    fn legacy_charset_goes_through_encoding_rs() {
        let dialect = with_charset("windows-1251");
        let bytes = dialect.convert_to_charset("Привет").unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(dialect.convert_from_charset(&bytes).unwrap(), "Привет");
    }

    #[test]
    fn unmappable_character_is_not_substituted() {
        let dialect = with_charset("windows-1251");
        let err = dialect.convert_to_charset("漢").unwrap_err();
        assert!(matches!(err, CsvError::Unencodable { .. }));
    }
}
