//! Stream normalization for streaming call results
//!
//! A method invoked with `params.stream == true` returns an incremental
//! emitter instead of a single value. The normalizer fully buffers the
//! emitter, concatenating chunks as text in arrival order, and only then
//! parses the buffered text as the same structured shape a non-streaming
//! call would have returned. There is no partial delivery to the caller:
//! responsiveness is traded for a uniform record shape.
//!
//! Chunk boundaries are byte boundaries, not character boundaries, so a
//! multi-byte UTF-8 sequence can be split across chunks. Incomplete trailing
//! bytes are buffered until the next chunk arrives; a sequence still open at
//! end of stream is a decode error.

use crate::error::{TunerkitError, TunerkitResult};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;

/// Key in call params that declares streaming intent
pub const STREAM_FLAG: &str = "stream";

/// Stream of raw response chunks produced by a streaming method
pub type ChunkStream = Pin<Box<dyn Stream<Item = TunerkitResult<Vec<u8>>> + Send>>;

/// Whether `params` requests a streaming response
pub fn is_streaming(params: &Value) -> bool {
    params
        .get(STREAM_FLAG)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Buffers raw chunks into text, reassembling UTF-8 sequences split across
/// chunk boundaries
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    text: String,
    incomplete_utf8: Vec<u8>,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk.
    ///
    /// Invalid UTF-8 (as opposed to an incomplete trailing sequence) fails
    /// immediately.
    pub fn push(&mut self, chunk: &[u8]) -> TunerkitResult<()> {
        let bytes: Vec<u8> = if self.incomplete_utf8.is_empty() {
            chunk.to_vec()
        } else {
            let mut combined = std::mem::take(&mut self.incomplete_utf8);
            combined.extend_from_slice(chunk);
            combined
        };

        match std::str::from_utf8(&bytes) {
            Ok(text) => self.text.push_str(text),
            // error_len() of None means the input ended inside a multi-byte
            // sequence; the prefix up to valid_up_to() is complete UTF-8.
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                self.text
                    .push_str(std::str::from_utf8(&bytes[..valid]).unwrap_or_default());
                self.incomplete_utf8 = bytes[valid..].to_vec();
            }
            Err(e) => {
                return Err(TunerkitError::stream_decode(format!(
                    "Invalid UTF-8 in stream chunk at byte {}",
                    e.valid_up_to()
                )));
            }
        }
        Ok(())
    }

    /// Buffered text so far (excluding any incomplete trailing bytes)
    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// Finish accumulation and parse the buffered text as JSON
    pub fn finish(self) -> TunerkitResult<Value> {
        if !self.incomplete_utf8.is_empty() {
            return Err(TunerkitError::stream_decode(
                "Stream ended inside a multi-byte UTF-8 sequence",
            ));
        }
        serde_json::from_str(&self.text).map_err(|e| {
            TunerkitError::stream_decode(format!("Buffered stream is not valid JSON: {e}"))
        })
    }
}

/// Collect a chunked emitter into the structured value a non-streaming call
/// would have returned.
///
/// Errors produced by the underlying stream propagate unchanged; only the
/// final parse can produce a [`TunerkitError::StreamDecode`].
pub async fn collect_stream(mut stream: ChunkStream) -> TunerkitResult<Value> {
    let mut accumulator = ChunkAccumulator::new();
    while let Some(chunk) = stream.next().await {
        accumulator.push(&chunk?)?;
    }
    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde_json::json;

    fn chunk_stream(chunks: Vec<&'static [u8]>) -> ChunkStream {
        Box::pin(stream::iter(
            chunks.into_iter().map(|c| Ok(c.to_vec())),
        ))
    }

    #[tokio::test]
    async fn accumulates_chunks_split_inside_a_json_document() {
        let stream = chunk_stream(vec![b"{\"a\":1,", b"\"b\":2}"]);
        let value = collect_stream(stream).await.unwrap();
        assert_eq!(value, json!({"a": 1, "b": 2}));
    }

    #[tokio::test]
    async fn single_chunk_parses() {
        let stream = chunk_stream(vec![b"{\"done\":true}"]);
        assert_eq!(
            collect_stream(stream).await.unwrap(),
            json!({"done": true})
        );
    }

    #[tokio::test]
    async fn utf8_sequence_split_across_chunks_is_reassembled() {
        // "é" is C3 A9; the boundary falls between the two bytes
        let stream = chunk_stream(vec![b"{\"text\":\"caf\xC3", b"\xA9\"}"]);
        let value = collect_stream(stream).await.unwrap();
        assert_eq!(value, json!({"text": "café"}));
    }

    #[tokio::test]
    async fn four_byte_sequence_split_three_ways_is_reassembled() {
        // "😀" is F0 9F 98 80
        let stream = chunk_stream(vec![b"{\"text\":\"\xF0\x9F", b"\x98", b"\x80\"}"]);
        let value = collect_stream(stream).await.unwrap();
        assert_eq!(value, json!({"text": "😀"}));
    }

    #[tokio::test]
    async fn truncated_utf8_at_end_of_stream_fails() {
        let stream = chunk_stream(vec![b"{\"text\":\"\xE4\xB8"]);
        let err = collect_stream(stream).await.unwrap_err();
        assert!(matches!(err, TunerkitError::StreamDecode(_)));
    }

    #[tokio::test]
    async fn invalid_utf8_fails_immediately() {
        let mut accumulator = ChunkAccumulator::new();
        // A continuation byte with no lead byte is invalid, not incomplete
        let err = accumulator.push(b"ok \x80 bad").unwrap_err();
        assert!(matches!(err, TunerkitError::StreamDecode(_)));
    }

    #[tokio::test]
    async fn non_json_text_is_a_decode_error() {
        let stream = chunk_stream(vec![b"this is not json"]);
        let err = collect_stream(stream).await.unwrap_err();
        assert!(matches!(err, TunerkitError::StreamDecode(_)));
    }

    #[tokio::test]
    async fn underlying_stream_errors_propagate_unchanged() {
        let stream: ChunkStream = Box::pin(stream::iter(vec![
            Ok(b"{\"a\":".to_vec()),
            Err(TunerkitError::Http("connection reset".to_string())),
        ]));
        let err = collect_stream(stream).await.unwrap_err();
        assert!(matches!(err, TunerkitError::Http(_)));
    }

    #[test]
    fn stream_flag_detection() {
        assert!(is_streaming(&json!({"stream": true})));
        assert!(!is_streaming(&json!({"stream": false})));
        assert!(!is_streaming(&json!({"stream": "yes"})));
        assert!(!is_streaming(&json!({})));
        assert!(!is_streaming(&json!(null)));
    }
}
