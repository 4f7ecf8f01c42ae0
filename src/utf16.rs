/// Encodes `text` as UTF-16 little-endian bytes.
///
/// Windows stores wide strings this way, so secrets shared with native code
/// should be encoded with this before [`protect`](crate::Protector::protect).
/// Characters outside the BMP become surrogate pairs (four bytes).
pub fn encode_utf16_le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}
