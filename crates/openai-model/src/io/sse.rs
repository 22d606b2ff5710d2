use bytes::BytesMut;

use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A type for reading server-sent events from a chunk stream.
///
/// Only the `data` field is surfaced. Comments and other fields (`event`,
/// `id`, `retry`) are skipped, and events without data are dropped.
pub struct Sse {
    buf: BytesMut,
    chunks: Chunks,
    eof: bool,
    // The last byte buffered was a `\r`, so a leading `\n` in the next
    // chunk belongs to the same line break.
    after_cr: bool,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: BytesMut::new(),
            chunks,
            eof: false,
            after_cr: false,
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            // Drain what is already buffered before waiting on the network.
            if let Some(event) = self.try_parse_event()? {
                return Ok(Some(event));
            }
            if self.eof {
                // A trailing event without its blank line is incomplete.
                return Ok(None);
            }

            match self.chunks.next_chunk().await.map_err(Error::ChunksError)? {
                Some(bytes) => self.push_normalized(&bytes),
                None => self.eof = true,
            }
        }
    }

    /// Buffers `bytes` with every line terminator (`\r\n`, `\r` or `\n`)
    /// turned into `\n`.
    fn push_normalized(&mut self, bytes: &[u8]) {
        self.buf.reserve(bytes.len());
        for &b in bytes {
            let after_cr = std::mem::replace(&mut self.after_cr, b == b'\r');
            match b {
                b'\n' if after_cr => {}
                b'\r' => self.buf.extend_from_slice(b"\n"),
                _ => self.buf.extend_from_slice(&[b]),
            }
        }
    }

    fn try_parse_event(&mut self) -> Result<Option<String>, Error> {
        // event         = *( comment / field ) end-of-line
        // comment       = colon *any-char end-of-line
        // field         = 1*name-char [ colon [ space ] *any-char ] end-of-line
        while let Some(eol_idx) = find_blank_line(&self.buf) {
            let block = self.buf.split_to(eol_idx + 2);
            // Bytes are only decoded once a whole event is buffered, so a
            // multi-byte character split across chunks is fine.
            let Ok(block) = str::from_utf8(&block[..eol_idx]) else {
                return Err(Error::InvalidPayload);
            };

            let mut data: Option<String> = None;
            for line in block.split('\n') {
                if line.is_empty() || line.starts_with(':') {
                    continue;
                }
                let (name, value) = match line.split_once(':') {
                    Some((name, value)) => {
                        (name, value.strip_prefix(' ').unwrap_or(value))
                    }
                    None => (line, ""),
                };
                if name != "data" {
                    continue;
                }
                match &mut data {
                    Some(data) => {
                        data.push('\n');
                        data.push_str(value);
                    }
                    None => data = Some(value.to_owned()),
                }
            }

            if let Some(data) = data {
                return Ok(Some(data));
            }
        }
        Ok(None)
    }
}

#[inline]
fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}
