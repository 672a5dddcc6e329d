//! Incremental decoding of newline-delimited message streams.
//!
//! Chunks are raw bytes as a transport delivers them; a line is decoded only
//! once its newline has arrived, so multi-byte characters split across
//! chunks survive intact.

use crate::processor::{
    MessageProcessor, ProcessReport, ProcessorEvent, SharedProcessor, SkippedInput, Snapshot,
};
use crate::session::A2uiSession;
use a2ui_core::types::Message;
use a2ui_core::DecodeError;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use log::warn;
use std::sync::Arc;

pub type MessageStream<'a> = BoxStream<'a, Result<Message, DecodeError>>;

/// Splits arbitrarily chunked bytes into one message per line.
///
/// Blank lines are ignored. A line split across chunks is buffered until its
/// newline arrives.
#[derive(Debug, Default)]
pub struct MessageDecoder {
    buffer: Vec<u8>,
}

impl MessageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and decodes every line it completes.
    pub fn push(&mut self, chunk: impl AsRef<[u8]>) -> Vec<Result<Message, DecodeError>> {
        self.buffer.extend_from_slice(chunk.as_ref());
        let Some(last_newline) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);
        complete
            .split(|&b| b == b'\n')
            .filter_map(decode_line)
            .collect()
    }

    /// Decodes whatever is left after the final chunk.
    pub fn finish(self) -> Option<Result<Message, DecodeError>> {
        decode_line(&self.buffer)
    }

    /// `true` if a partial line is waiting for more input.
    pub fn has_pending(&self) -> bool {
        !self.buffer.trim_ascii().is_empty()
    }
}

fn decode_line(line: &[u8]) -> Option<Result<Message, DecodeError>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        None
    } else {
        Some(Message::from_slice(line))
    }
}

/// Turns a stream of byte chunks into a stream of decoded messages.
///
/// Accepts anything byte-like per chunk: `Vec<u8>`, `String`, `&str` or a
/// transport's `Bytes`.
pub fn decode_chunks<'a, S>(chunks: S) -> MessageStream<'a>
where
    S: Stream + Send + 'a,
    S::Item: AsRef<[u8]> + Send,
{
    let state = (Box::pin(chunks), Some(MessageDecoder::new()));
    stream::unfold(state, |(mut chunks, decoder)| async move {
        let Some(mut decoder) = decoder else {
            return None;
        };
        match chunks.next().await {
            Some(chunk) => {
                let batch = decoder.push(chunk);
                Some((batch, (chunks, Some(decoder))))
            }
            None => {
                let batch: Vec<_> = decoder.finish().into_iter().collect();
                Some((batch, (chunks, None)))
            }
        }
    })
    .flat_map(stream::iter)
    .boxed()
}

/// Something streamed messages can be applied to.
///
/// Implemented for an exclusively borrowed [`MessageProcessor`] and for
/// shared handles, which take their lock once per message and never across
/// an await.
pub trait MessageTarget {
    fn apply(&mut self, message: Message) -> Vec<ProcessorEvent>;
    fn snapshot(&self) -> Arc<Snapshot>;
}

impl MessageTarget for &mut MessageProcessor {
    fn apply(&mut self, message: Message) -> Vec<ProcessorEvent> {
        self.process_message(message)
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.refresh()
    }
}

impl MessageTarget for &SharedProcessor {
    fn apply(&mut self, message: Message) -> Vec<ProcessorEvent> {
        self.update(|processor| processor.process_message(message))
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.refresh()
    }
}

impl MessageTarget for &A2uiSession {
    fn apply(&mut self, message: Message) -> Vec<ProcessorEvent> {
        self.processor()
            .update(|processor| processor.process_message(message))
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.refresh()
    }
}

/// Applies messages from `messages` as they arrive.
///
/// `on_refresh` receives a fresh snapshot after every applied message.
/// Decode failures are skipped and reported; the stream keeps going.
pub async fn drive_stream<T, S, F>(mut target: T, messages: S, mut on_refresh: F) -> ProcessReport
where
    T: MessageTarget,
    S: Stream<Item = Result<Message, DecodeError>>,
    F: FnMut(Arc<Snapshot>),
{
    let mut messages = std::pin::pin!(messages);
    let mut report = ProcessReport::default();
    let mut index = 0;
    while let Some(item) = messages.next().await {
        match item {
            Ok(message) => {
                report.events.extend(target.apply(message));
                report.applied += 1;
                on_refresh(target.snapshot());
            }
            Err(error) => {
                warn!("Skipping malformed streamed message #{index}: {error}");
                report.skipped.push(SkippedInput { index, error });
            }
        }
        index += 1;
    }
    report
}
