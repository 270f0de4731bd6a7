pub mod change;
pub mod position;

pub use change::{TextChange, TextSpan, apply_change, apply_changes};
pub use position::{clamp_utf16_to_byte, convert_utf16_to_byte, utf16_len};
