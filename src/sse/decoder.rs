//! Incremental SSE frame decoder.
//!
//! The transport gives no framing guarantee: a chunk may end in the middle of
//! a line, of a JSON payload, or of a multi-byte UTF-8 sequence. The decoder
//! accumulates text and hands out the payload of every complete event block
//! as soon as its terminating blank line has arrived.
//!
//! Event blocks are separated by `"\n\n"` or `"\r\n\r\n"`, whichever occurs
//! first in the buffer. Within a block every `data:` line contributes to the
//! payload (joined with `\n`); other fields are ignored.

use super::events::SENTINEL;

/// Stateful decoder turning raw body chunks into SSE `data` payloads.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text not yet consumed by a complete frame
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
    /// Set once the sentinel was seen or `finish` ran
    finished: bool,
}

impl FrameDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the decoder has stopped accepting input.
    ///
    /// This happens after the sentinel payload was extracted or after
    /// [`FrameDecoder::finish`] was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one raw chunk and return every payload completed by it.
    ///
    /// If a payload equals the sentinel it is returned as the last element,
    /// the rest of the buffer is discarded and the decoder stops.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }
        self.decode_utf8(chunk);
        self.drain_frames()
    }

    /// Signal end of input.
    ///
    /// Flushes any incomplete UTF-8 bytes, drains the remaining complete
    /// frames and makes one attempt to parse the unterminated tail, since
    /// some servers omit the final blank line.
    pub fn finish(&mut self) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }

        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.buffer.push_str(&String::from_utf8_lossy(&tail));
        }

        let mut payloads = self.drain_frames();
        if !self.finished {
            let rest = std::mem::take(&mut self.buffer);
            if let Some(payload) = parse_block(&rest) {
                payloads.push(payload);
            }
            self.finished = true;
        }
        payloads
    }

    /// Number of decoded characters waiting for a frame terminator.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn decode_utf8(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);

        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    start = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid_end = start + err.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match err.error_len() {
                        // Invalid sequence in the middle of the input
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        // Sequence cut by the chunk boundary; wait for the rest
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
    }

    fn drain_frames(&mut self) -> Vec<String> {
        let mut payloads = Vec::new();
        let mut cursor = 0;

        while let Some((index, separator_len)) = find_separator(&self.buffer[cursor..]) {
            let block = &self.buffer[cursor..cursor + index];
            cursor += index + separator_len;

            if let Some(payload) = parse_block(block) {
                let is_sentinel = payload == SENTINEL;
                payloads.push(payload);
                if is_sentinel {
                    self.finished = true;
                    self.buffer.clear();
                    self.pending.clear();
                    return payloads;
                }
            }
        }

        self.buffer.drain(..cursor);
        payloads
    }
}

/// Locate the earliest event separator, returning its offset and length.
fn find_separator(buffer: &str) -> Option<(usize, usize)> {
    let lf = buffer.find("\n\n");
    let crlf = buffer.find("\r\n\r\n");

    match (lf, crlf) {
        (Some(lf), Some(crlf)) if crlf < lf => Some((crlf, 4)),
        (Some(lf), _) => Some((lf, 2)),
        (None, Some(crlf)) => Some((crlf, 4)),
        (None, None) => None,
    }
}

/// Extract the `data` payload of one event block.
///
/// Returns `None` when the block has no `data:` lines or only blank data.
pub fn parse_block(block: &str) -> Option<String> {
    let mut data: Option<String> = None;

    for line in block.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(value) = line.strip_prefix("data:") else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);

        match data.as_mut() {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }

    let payload = data?;
    let trimmed = payload.trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = FrameDecoder::new();
        let mut payloads = Vec::new();
        for chunk in chunks {
            payloads.extend(decoder.push(chunk));
        }
        payloads.extend(decoder.finish());
        payloads
    }

    #[test]
    fn test_single_complete_frame() {
        let payloads = decode_chunks(&[b"data: {\"a\":1}\n\n"]);
        assert_eq!(payloads, vec![r#"{"a":1}"#.to_string()]);
    }

    #[test]
    fn test_crlf_separator() {
        let mut decoder = FrameDecoder::new();
        let payloads = decoder.push(b"data: one\r\n\r\ndata: two\r\n\r\n");
        assert_eq!(payloads, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_earliest_separator_wins() {
        let mut decoder = FrameDecoder::new();
        // The LF separator comes before the CRLF one
        let payloads = decoder.push(b"data: a\n\ndata: b\r\n\r\n");
        assert_eq!(payloads, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_incomplete_frame_waits_for_more_input() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: {\"text\":").is_empty());
        assert!(decoder.push(b" \"hi\"}\n").is_empty());
        let payloads = decoder.push(b"\n");
        assert_eq!(payloads, vec![r#"{"text": "hi"}"#.to_string()]);
    }

    #[test]
    fn test_data_without_space_after_colon() {
        let payloads = decode_chunks(&[b"data:{\"x\":1}\n\n"]);
        assert_eq!(payloads, vec![r#"{"x":1}"#.to_string()]);
    }

    #[test]
    fn test_only_one_leading_space_is_stripped() {
        assert_eq!(parse_block("data:   padded"), Some("  padded".to_string()));
    }

    #[test]
    fn test_multi_line_data_joined_with_newline() {
        let block = "data: first\ndata: second\r\ndata: third";
        assert_eq!(
            parse_block(block),
            Some("first\nsecond\nthird".to_string())
        );
    }

    #[test]
    fn test_other_fields_are_ignored() {
        let block = "event: message\nid: 7\n: keep-alive\nretry: 100\ndata: payload";
        assert_eq!(parse_block(block), Some("payload".to_string()));
    }

    #[test]
    fn test_block_without_data_yields_nothing() {
        let payloads = decode_chunks(&[b": ping\n\nevent: noop\n\ndata: real\n\n"]);
        assert_eq!(payloads, vec!["real".to_string()]);
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        assert_eq!(parse_block("data: value   \t"), Some("value".to_string()));
        assert_eq!(parse_block("data:    "), None);
    }

    #[test]
    fn test_sentinel_stops_decoding() {
        let mut decoder = FrameDecoder::new();
        let payloads = decoder.push(b"data: a\n\ndata: [DONE]\n\ndata: never\n\n");
        assert_eq!(payloads, vec!["a".to_string(), "[DONE]".to_string()]);
        assert!(decoder.is_finished());
        assert_eq!(decoder.buffered_len(), 0);

        assert!(decoder.push(b"data: later\n\n").is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_sentinel_is_case_sensitive() {
        let mut decoder = FrameDecoder::new();
        let payloads = decoder.push(b"data: [done]\n\ndata: next\n\n");
        assert_eq!(payloads, vec!["[done]".to_string(), "next".to_string()]);
        assert!(!decoder.is_finished());
    }

    #[test]
    fn test_finish_salvages_unterminated_tail() {
        let payloads = decode_chunks(&[b"data: a\n\ndata: tail"]);
        assert_eq!(payloads, vec!["a".to_string(), "tail".to_string()]);
    }

    #[test]
    fn test_finish_ignores_empty_tail() {
        let payloads = decode_chunks(&[b"data: a\n\n\n"]);
        assert_eq!(payloads, vec!["a".to_string()]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let text = "data: h\u{00e9}llo \u{4e16}\u{754c}\n\n";
        let bytes = text.as_bytes();
        // Split inside the three-byte CJK character
        let split = text.find('\u{4e16}').unwrap() + 1;
        let payloads = decode_chunks(&[&bytes[..split], &bytes[split..]]);
        assert_eq!(payloads, vec!["h\u{00e9}llo \u{4e16}\u{754c}".to_string()]);
    }

    #[test]
    fn test_incomplete_utf8_at_end_is_flushed_lossily() {
        let payloads = decode_chunks(&[b"data: ok", &[0xE4, 0xB8]]);
        assert_eq!(payloads, vec!["ok\u{FFFD}".to_string()]);
    }

    #[test]
    fn test_invalid_utf8_becomes_replacement_character() {
        let payloads = decode_chunks(&[b"data: a\xFFb\n\n"]);
        assert_eq!(payloads, vec!["a\u{FFFD}b".to_string()]);
    }

    #[test]
    fn test_every_split_point_gives_the_same_payloads() {
        let stream = "data: {\"choices\":[{\"delta\":{\"content\":\"Gr\u{00fc}\u{00df}e\"}}]}\r\n\r\n\
                      : comment\n\n\
                      data: line one\ndata: line two\n\n\
                      data: {\"choices\":[{\"delta\":{\"reasoning_content\":\"\u{1f914}\"}}]}\n\n\
                      data: [DONE]\n\n\
                      data: ignored\n\n";
        let bytes = stream.as_bytes();
        let expected = decode_chunks(&[bytes]);
        assert_eq!(expected.len(), 4);

        for split in 0..=bytes.len() {
            let payloads = decode_chunks(&[&bytes[..split], &bytes[split..]]);
            assert_eq!(payloads, expected, "split at byte {}", split);
        }

        let byte_at_a_time: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_chunks(&byte_at_a_time), expected);

        for size in [2, 3, 5, 7, 13] {
            let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
            assert_eq!(decode_chunks(&chunks), expected, "chunk size {}", size);
        }
    }
}
