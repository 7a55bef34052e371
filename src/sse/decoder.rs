//! Incremental frame decoder
//!
//! Network chunks do not line up with anything: a chunk can end in the
//! middle of a line, in the middle of the `data: ` prefix, or between the
//! bytes of one UTF-8 character. The decoder carries both the incomplete
//! character and the incomplete line over to the next chunk, so feeding a
//! body in any number of pieces yields the same frames as feeding it
//! whole.

use tracing::debug;

use crate::sse::events::SseLine;

const DATA_PREFIX: &str = "data: ";

/// Classify a single line (without its trailing newline).
///
/// Only lines starting with the literal `data: ` carry frames.
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(payload.to_string());
    }

    if let Some(comment) = line.strip_prefix(':') {
        return SseLine::Comment(comment.trim().to_string());
    }

    SseLine::Other(line.to_string())
}

/// Stateful byte-to-frame decoder for one session.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text not yet terminated by a newline
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the payloads of every frame it completes,
    /// in wire order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode_into_buffer(chunk);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };
        let tail = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);

        // `lines` also drops a trailing '\r' so CRLF bodies decode the same.
        complete
            .lines()
            .filter_map(|line| match parse_sse_line(line) {
                SseLine::Data(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// End of body. A trailing unterminated line is dropped.
    pub fn finish(self) {
        if !self.buffer.is_empty() || !self.pending.is_empty() {
            debug!(
                discarded_bytes = self.buffer.len() + self.pending.len(),
                "Discarding incomplete line at end of stream"
            );
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending.clear();
    }

    /// Bytes held back waiting for a newline or the rest of a character.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.pending.len()
    }

    fn decode_into_buffer(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    self.buffer.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        // Invalid sequence: replace it and keep going.
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete sequence at the end: wait for the next chunk.
                        None => {
                            self.pending = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_in_chunks(body: &[u8], splits: &[usize]) -> Vec<String> {
        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        let mut start = 0;
        for &split in splits {
            frames.extend(decoder.push(&body[start..split]));
            start = split;
        }
        frames.extend(decoder.push(&body[start..]));
        decoder.finish();
        frames
    }

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
        assert_eq!(
            parse_sse_line("data: {\"x\":1}"),
            SseLine::Data("{\"x\":1}".to_string())
        );
        assert_eq!(
            parse_sse_line(": keepalive"),
            SseLine::Comment("keepalive".to_string())
        );
        assert_eq!(
            parse_sse_line("retry: 1000"),
            SseLine::Other("retry: 1000".to_string())
        );
        // prefix must be exactly "data: "
        assert_eq!(
            parse_sse_line("data:{\"x\":1}"),
            SseLine::Other("data:{\"x\":1}".to_string())
        );
    }

    #[test]
    fn test_single_chunk_multiple_frames() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: one\n\ndata: two\n\n");
        assert_eq!(frames, vec!["one", "two"]);
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_partial_line_carried_over() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: hel").is_empty());
        assert!(decoder.push(b"lo").is_empty());
        assert_eq!(decoder.push(b"\n"), vec!["hello"]);
    }

    #[test]
    fn test_split_inside_prefix() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"da").is_empty());
        assert!(decoder.push(b"ta:").is_empty());
        assert_eq!(decoder.push(b" x\n"), vec!["x"]);
    }

    #[test]
    fn test_split_inside_multibyte_character() {
        // "é" is 0xC3 0xA9, "🎵" is four bytes
        let body = "data: Beyoncé 🎵\n".as_bytes();
        let e_acute = body.iter().position(|&b| b == 0xC3).unwrap();
        let note = body.iter().position(|&b| b == 0xF0).unwrap();

        let frames = decode_in_chunks(body, &[e_acute + 1, note + 1, note + 3]);
        assert_eq!(frames, vec!["Beyoncé 🎵"]);
    }

    #[test]
    fn test_every_split_point_matches_whole_body() {
        let body = "data: {\"type\":\"Status\",\"message\":\"Søren\"}\n\n: ping\ndata: {\"type\":\"Debug\",\"message\":\"ü\"}\n\n".as_bytes();
        let whole = decode_in_chunks(body, &[]);
        assert_eq!(whole.len(), 2);

        for split in 1..body.len() {
            assert_eq!(decode_in_chunks(body, &[split]), whole, "split at {}", split);
        }
        for a in 1..body.len() {
            for b in a..body.len() {
                assert_eq!(decode_in_chunks(body, &[a, b]), whole, "splits at {} {}", a, b);
            }
        }
    }

    #[test]
    fn test_byte_at_a_time() {
        let body = "data: ä\ndata: b\n".as_bytes();
        let splits: Vec<usize> = (1..body.len()).collect();
        assert_eq!(decode_in_chunks(body, &splits), vec!["ä", "b"]);
    }

    #[test]
    fn test_crlf_lines() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.push(b"data: a\r\n\r\ndata: b\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_non_data_lines_ignored() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"event: message\nid: 4\n: comment\nretry: 10\ndata: kept\n");
        assert_eq!(frames, vec!["kept"]);
    }

    #[test]
    fn test_trailing_partial_line_discarded() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.push(b"data: a\ndata: incomplete"), vec!["a"]);
        assert!(decoder.buffered_len() > 0);
        decoder.finish();
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: a\xFFb\n");
        assert_eq!(frames, vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b"data: stale\xC3");
        decoder.reset();
        assert_eq!(decoder.buffered_len(), 0);
        assert_eq!(decoder.push(b"data: fresh\n"), vec!["fresh"]);
    }
}
