//! ToUnicode CMap parsing (`bfchar` and `bfrange` sections).

use regex::Regex;

use super::MAX_CID;
use std::collections::HashMap;
use std::sync::LazyLock;

static BFCHAR_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)beginbfchar(.*?)endbfchar").unwrap());
static BFRANGE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)beginbfrange(.*?)endbfrange").unwrap());
static BFCHAR_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([0-9A-Fa-f\s]+)>\s*<([0-9A-Fa-f\s]*)>").unwrap());
static BFRANGE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([0-9A-Fa-f\s]+)>\s*<([0-9A-Fa-f\s]+)>\s*(?:<([0-9A-Fa-f\s]*)>|\[([^\]]*)\])")
        .unwrap()
});
static HEX_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([0-9A-Fa-f\s]*)>").unwrap());

/// Character id to Unicode text table built from a ToUnicode stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeMap {
    cid2unichr: HashMap<u32, String>,
}

impl ToUnicodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cid2unichr.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cid2unichr.len()
    }

    pub fn insert(&mut self, cid: u32, text: impl Into<String>) {
        self.cid2unichr.insert(cid, text.into());
    }

    pub fn get(&self, cid: u32) -> Option<&str> {
        self.cid2unichr.get(&cid).map(String::as_str)
    }

    /// Parse the textual body of a ToUnicode CMap.
    ///
    /// Malformed entries are skipped; the result may be empty.
    pub fn parse(data: &[u8]) -> Self {
        let content = String::from_utf8_lossy(data);
        let mut map = Self::new();

        for block in BFCHAR_BLOCK.captures_iter(&content) {
            for entry in BFCHAR_ENTRY.captures_iter(&block[1]) {
                let (Some(cid), Some(bytes)) = (hex_value(&entry[1]), hex_bytes(&entry[2])) else {
                    continue;
                };
                map.insert(cid, utf16be_to_string(&bytes));
            }
        }

        for block in BFRANGE_BLOCK.captures_iter(&content) {
            for entry in BFRANGE_ENTRY.captures_iter(&block[1]) {
                let (Some(start), Some(end)) = (hex_value(&entry[1]), hex_value(&entry[2])) else {
                    continue;
                };
                let end = end.min(MAX_CID);
                if end < start {
                    continue;
                }
                if let Some(first) = entry.get(3) {
                    let Some(base) = hex_bytes(first.as_str()) else {
                        continue;
                    };
                    for (offset, cid) in (start..=end).enumerate() {
                        map.insert(cid, utf16be_to_string(&increment_last(&base, offset as u32)));
                    }
                } else if let Some(array) = entry.get(4) {
                    let targets = HEX_STRING.captures_iter(array.as_str());
                    for (cid, target) in (start..=end).zip(targets) {
                        if let Some(bytes) = hex_bytes(&target[1]) {
                            map.insert(cid, utf16be_to_string(&bytes));
                        }
                    }
                }
            }
        }

        map
    }
}

fn strip_ws(hex: &str) -> String {
    hex.chars().filter(|c| !c.is_whitespace()).collect()
}

fn hex_value(hex: &str) -> Option<u32> {
    let hex = strip_ws(hex);
    if hex.is_empty() || hex.len() > 8 {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}

fn hex_bytes(hex: &str) -> Option<Vec<u8>> {
    let mut hex = strip_ws(hex);
    if hex.len() % 2 == 1 {
        hex.push('0');
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Adds `offset` to the trailing (up to four) bytes of a big-endian value,
/// keeping the original length.
fn increment_last(base: &[u8], offset: u32) -> Vec<u8> {
    let split = base.len().saturating_sub(4);
    let (prefix, tail) = base.split_at(split);
    let value = tail
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
        .wrapping_add(offset);
    let mut out = prefix.to_vec();
    let be = value.to_be_bytes();
    out.extend_from_slice(&be[4 - tail.len()..]);
    out
}

fn utf16be_to_string(bytes: &[u8]) -> String {
    let units = bytes
        .chunks(2)
        .map(|pair| match *pair {
            [hi, lo] => u16::from_be_bytes([hi, lo]),
            [b] => u16::from(b),
            _ => 0,
        });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
