//! UTF-16 offset handling.
//!
//! The Razor server is a .NET process and reports every span in UTF-16 code
//! units. Projection buffers are Rust strings, so offsets are translated to
//! byte indices before splicing.

/// Number of UTF-16 code units in `text`.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 offset into a byte offset within `text`.
///
/// Returns None if the offset lies past the end of `text` or in the middle of
/// a surrogate pair.
#[inline]
pub fn convert_utf16_to_byte(text: &str, utf16_pos: usize) -> Option<usize> {
    let mut byte_offset = 0;
    let mut utf16_offset = 0;

    for ch in text.chars() {
        if utf16_offset == utf16_pos {
            return Some(byte_offset);
        }
        if utf16_offset > utf16_pos {
            return None;
        }
        utf16_offset += ch.len_utf16();
        byte_offset += ch.len_utf8();
    }

    (utf16_offset == utf16_pos).then_some(byte_offset)
}

/// Like [`convert_utf16_to_byte`], but never fails.
///
/// Offsets past the end clamp to `text.len()`; offsets inside a surrogate pair
/// snap back to the start of that character. The boolean reports whether any
/// adjustment happened.
pub fn clamp_utf16_to_byte(text: &str, utf16_pos: usize) -> (usize, bool) {
    let mut byte_offset = 0;
    let mut utf16_offset = 0;

    for ch in text.chars() {
        if utf16_offset >= utf16_pos {
            return (byte_offset, utf16_offset != utf16_pos);
        }
        let next = utf16_offset + ch.len_utf16();
        if next > utf16_pos {
            // Inside a surrogate pair
            return (byte_offset, true);
        }
        utf16_offset = next;
        byte_offset += ch.len_utf8();
    }

    (byte_offset, utf16_offset != utf16_pos)
}
