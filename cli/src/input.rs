//! Reading CBOR input from `--hex` / `--file` arguments.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Decode a hex string, tolerating a `0x` prefix and embedded whitespace.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).context("invalid hex input")
}

/// Whether a file's contents look like hex text rather than raw CBOR.
fn is_hex_text(bytes: &[u8]) -> bool {
    let compact: Vec<u8> = bytes
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let body = compact.strip_prefix(b"0x").unwrap_or(&compact);
    !body.is_empty() && body.iter().all(u8::is_ascii_hexdigit)
}

/// Read a file as raw CBOR, or as hex text when it contains only hex digits.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read input file '{}'", path.display()))?;
    if is_hex_text(&bytes) {
        let text = String::from_utf8_lossy(&bytes);
        return parse_hex(&text).with_context(|| format!("in '{}'", path.display()));
    }
    Ok(bytes)
}

/// Resolve exactly one of `--hex` / `--file`.
pub fn load(hex: Option<&str>, file: Option<&Path>) -> Result<Vec<u8>> {
    match (hex, file) {
        (Some(h), None) => parse_hex(h),
        (None, Some(f)) => read_file(f),
        (Some(_), Some(_)) => bail!("pass either --hex or --file, not both"),
        (None, None) => bail!("no input: pass --hex <string> or --file <path>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_with_prefix_and_whitespace() {
        assert_eq!(parse_hex("0x82 00\n01").unwrap(), vec![0x82, 0x00, 0x01]);
    }

    #[test]
    fn raw_cbor_is_not_hex_text() {
        assert!(!is_hex_text(&[0x82, 0x00, 0x01]));
        assert!(is_hex_text(b"8200\n"));
        assert!(!is_hex_text(b"   "));
    }

    #[test]
    fn requires_exactly_one_source() {
        assert!(load(None, None).is_err());
        assert!(load(Some("00"), Some(Path::new("x"))).is_err());
        assert_eq!(load(Some("a0"), None).unwrap(), vec![0xa0]);
    }
}
