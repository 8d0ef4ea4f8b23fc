//! Chunked growable byte buffer and read cursor (§4.2).
//!
//! Grounded on `isopack::cursor::{Cursor, StreamBuffer}`: `Cursor` here
//! keeps the same `need`/`read_byte`/`read_bytes`/`Pending` shape, but
//! `ByteBuffer` replaces `StreamBuffer`'s single reallocating `Vec<u8>`
//! with fixed-size chunks, since §4.2 requires "appends [that] never
//! invalidate previously returned offsets within any single chunk" — a
//! stronger guarantee than one `Vec` gives under reallocation.
//! `StreamBuffer`'s `base_offset`/`valid_start` compaction machinery is
//! not carried over: this crate encodes and decodes one frame from one
//! buffer at a time (no cross-frame streaming, §1 Non-goals), so there
//! is nothing to compact.

use crate::error::Error;
use crate::error::Result;

/// Bytes held per chunk. A small power of two, per §4.2's recommendation.
pub const CHUNK_SIZE: usize = 1024;

/// A growable, append-only byte container built from fixed-size chunks.
#[derive(Debug, Default)]
pub struct ByteBuffer {
    chunks: Vec<Vec<u8>>,
    size: usize,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            size: 0,
        }
    }

    /// Total bytes appended so far.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Appends `bytes`, splitting across chunk boundaries as needed.
    /// Amortized O(1) per byte; never reallocates a prior chunk.
    pub fn append(&mut self, bytes: &[u8]) {
        let mut remaining = bytes;
        while !remaining.is_empty() {
            if self.chunks.is_empty() || self.last_chunk_full() {
                self.chunks.push(Vec::with_capacity(CHUNK_SIZE));
            }
            let chunk = self.chunks.last_mut().expect("chunk just pushed");
            let room = CHUNK_SIZE - chunk.len();
            let take = room.min(remaining.len());
            chunk.extend_from_slice(&remaining[..take]);
            remaining = &remaining[take..];
            self.size += take;
        }
    }

    pub fn append_byte(&mut self, byte: u8) {
        self.append(std::slice::from_ref(&byte));
    }

    fn last_chunk_full(&self) -> bool {
        self.chunks
            .last()
            .map(|c| c.len() >= CHUNK_SIZE)
            .unwrap_or(true)
    }

    /// Returns a single contiguous view of the buffer's contents,
    /// consolidating chunks only when there is more than one.
    pub fn contiguous(&self) -> std::borrow::Cow<'_, [u8]> {
        match self.chunks.len() {
            0 => std::borrow::Cow::Borrowed(&[]),
            1 => std::borrow::Cow::Borrowed(&self.chunks[0]),
            _ => {
                let mut out = Vec::with_capacity(self.size);
                for chunk in &self.chunks {
                    out.extend_from_slice(chunk);
                }
                std::borrow::Cow::Owned(out)
            }
        }
    }

    /// Discards content; retains allocated chunk capacity for reuse.
    ///
    /// Clears each chunk in place rather than dropping the chunk list,
    /// so the next round of appends reuses the same heap allocations
    /// instead of requesting fresh ones from the allocator.
    pub fn reset(&mut self) {
        for chunk in &mut self.chunks {
            chunk.clear();
        }
        self.size = 0;
    }

    pub fn into_vec(self) -> Vec<u8> {
        match self.contiguous() {
            std::borrow::Cow::Borrowed(slice) => slice.to_vec(),
            std::borrow::Cow::Owned(vec) => vec,
        }
    }
}

/// A cursor over a borrowed, contiguous byte slice.
///
/// Reads advance the cursor; a read past the end of the slice yields
/// `Error::Pending(n)`, where `n` is the shortfall, rather than
/// panicking or truncating.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.slice.len()
    }

    pub fn remaining(&self) -> usize {
        self.slice.len().saturating_sub(self.pos)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.slice.len()
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        if self.pos + n > self.slice.len() {
            Err(Error::Pending(self.pos + n - self.slice.len()))
        } else {
            Ok(())
        }
    }

    pub fn peek_byte(&self) -> Result<u8> {
        self.need(1)?;
        Ok(self.slice[self.pos])
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.need(1)?;
        let byte = self.slice[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let slice = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}
