//! Positional text chunking
//!
//! Text is cut into consecutive windows of exactly `chunk_size` characters;
//! only the last window may be shorter. Cuts ignore sentence and word
//! boundaries, so a chunk may end mid-word.
//!
//! Lengths are counted in Unicode scalar values, and cuts always fall on a
//! `char` boundary.

/// Summaries shorter than this are never requested
pub const MIN_ADJUSTED_MAX_LENGTH: usize = 100;

/// How much shorter than its input a requested summary must be
pub const MAX_LENGTH_MARGIN: usize = 50;

/// One positional slice of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub index: usize,
    pub text: &'a str,
    /// Length of `text` in characters
    pub chars: usize,
}

/// Split `text` into `ceil(chars / chunk_size)` chunks.
///
/// Concatenating the chunks in order gives back `text` exactly. Empty text
/// yields no chunks.
///
/// # Panics
/// Panics if `chunk_size` is zero.
pub fn partition(text: &str, chunk_size: usize) -> Vec<Chunk<'_>> {
    assert!(chunk_size > 0, "chunk_size must be greater than zero");

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut chars = 0usize;

    for (offset, _) in text.char_indices() {
        if chars == chunk_size {
            chunks.push(Chunk {
                index: chunks.len(),
                text: &text[start..offset],
                chars,
            });
            start = offset;
            chars = 0;
        }
        chars += 1;
    }

    if chars > 0 {
        chunks.push(Chunk {
            index: chunks.len(),
            text: &text[start..],
            chars,
        });
    }

    chunks
}

/// Max summary length to request for a chunk of `chunk_chars` characters:
/// `max(100, min(max_length, chunk_chars - 50))`.
pub fn adjusted_max_length(chunk_chars: usize, max_length: usize) -> usize {
    chunk_chars
        .saturating_sub(MAX_LENGTH_MARGIN)
        .min(max_length)
        .max(MIN_ADJUSTED_MAX_LENGTH)
}
