use std::char::REPLACEMENT_CHARACTER;
use std::str;

/// An incremental UTF-8 decoder.
///
/// Bytes of a character that is split across two slices are held back
/// until the rest arrives. Invalid sequences are replaced with U+FFFD.
#[derive(Clone, Debug, Default)]
pub(crate) struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much as possible of the bytes seen so far.
    pub fn decode(&mut self, input: &[u8]) -> String {
        self.pending.extend_from_slice(input);

        let mut out = String::with_capacity(self.pending.len());
        let mut rest = self.pending.as_slice();
        loop {
            match str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    if let Ok(valid) = str::from_utf8(valid) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            // Incomplete character at the end, wait for
                            // the next slice.
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        let consumed = self.pending.len() - rest.len();
        self.pending.drain(..consumed);
        out
    }

    /// Flushes the decoder at the end of the input.
    ///
    /// Returns a replacement character if an incomplete character was
    /// left over.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending.clear();
        Some(REPLACEMENT_CHARACTER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_characters() {
        let text = "الإجابة ✓ 🙂";
        let bytes = text.as_bytes();
        for step in 1..=5 {
            let mut decoder = Utf8Decoder::new();
            let mut out = String::new();
            for slice in bytes.chunks(step) {
                out.push_str(&decoder.decode(slice));
            }
            assert_eq!(decoder.finish(), None);
            assert_eq!(out, text, "slices of {step} byte(s)");
        }
    }

    #[test]
    fn test_held_back() {
        let mut decoder = Utf8Decoder::new();
        let bytes = "ج".as_bytes();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.decode(&bytes[1..]), "ج");
    }

    #[test]
    fn test_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"ab\xffcd"), "ab\u{fffd}cd");
        assert_eq!(decoder.decode(b"\xc3\x28"), "\u{fffd}(");
    }

    #[test]
    fn test_truncated_tail() {
        let mut decoder = Utf8Decoder::new();
        let bytes = "حق".as_bytes();
        assert_eq!(decoder.decode(&bytes[..3]), "ح");
        assert_eq!(decoder.finish().as_deref(), Some("\u{fffd}"));
        assert_eq!(decoder.finish(), None);
    }
}
