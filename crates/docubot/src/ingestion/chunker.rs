//! Deterministic overlapping text chunker
//!
//! Splits a text stream into fixed-size chunks measured in Unicode scalar
//! values (chars), each overlapping its predecessor by a fixed amount.
//! Invariant: dropping each chunk's leading `overlap` chars (except the
//! first) and concatenating reproduces the input exactly.

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in chars
    chunk_size: usize,
    /// Overlap between consecutive chunks in chars
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. Requires `chunk_size > 0` and
    /// `overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be > 0".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "overlap ({}) must be < chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split `text` into overlapping chunks covering it completely.
    ///
    /// Pure and deterministic: the same input always yields the same
    /// boundaries. Empty input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offsets of every char boundary, plus the end of the string,
        // so slicing below always lands on valid boundaries.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        let char_count = boundaries.len() - 1;

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            chunks.push(text[boundaries[start]..boundaries[end]].to_string());

            if end == char_count {
                break;
            }
            start += step;
        }

        chunks
    }

    /// Chunk size in chars
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in chars
    pub fn overlap(&self) -> usize {
        self.overlap
    }
}
