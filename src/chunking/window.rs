//! Sliding windows over a token sequence

use tracing::debug;

use crate::config::AnsweringConfig;

/// Windows shorter than this end chunking
const MIN_WINDOW_TOKENS: usize = 2;

/// A contiguous window of token ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChunk {
    /// Position of the first token in the full sequence
    pub offset: usize,
    /// Token ids of the window
    pub ids: Vec<u32>,
}

impl TokenChunk {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// One past the last covered position in the full sequence
    pub fn end(&self) -> usize {
        self.offset + self.ids.len()
    }
}

/// Splits token sequences into overlapping fixed-size windows
#[derive(Debug, Clone, Copy)]
pub struct TokenChunker {
    chunk_size: usize,
    stride: usize,
}

impl TokenChunker {
    /// Create a chunker. `stride` must be less than `chunk_size`, which
    /// `Config::validate` enforces.
    pub fn new(chunk_size: usize, stride: usize) -> Self {
        Self { chunk_size, stride }
    }

    pub fn from_config(config: &AnsweringConfig) -> Self {
        Self::new(config.chunk_size, config.stride)
    }

    /// Distance between consecutive window starts (at least 1)
    pub fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.stride).max(1)
    }

    /// Split `ids` into windows of at most `chunk_size` tokens. Consecutive
    /// windows share `stride` tokens; the first window shorter than two
    /// tokens stops the split.
    pub fn chunk(&self, ids: &[u32]) -> Vec<TokenChunk> {
        let mut chunks = Vec::new();
        let mut offset = 0;

        while offset < ids.len() {
            let end = (offset + self.chunk_size).min(ids.len());
            if end - offset < MIN_WINDOW_TOKENS {
                break;
            }
            chunks.push(TokenChunk {
                offset,
                ids: ids[offset..end].to_vec(),
            });
            offset += self.step();
        }

        debug!(
            "Split {} tokens into {} windows (size {}, stride {})",
            ids.len(),
            chunks.len(),
            self.chunk_size,
            self.stride
        );
        chunks
    }
}

impl Default for TokenChunker {
    fn default() -> Self {
        Self::from_config(&AnsweringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<u32> {
        (0..n as u32).collect()
    }

    #[test]
    fn test_thousand_tokens_default_windows() {
        let chunks = TokenChunker::default().chunk(&ids(1000));

        let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 256, 512, 768]);
        assert_eq!(chunks[0].len(), 512);
        assert_eq!(chunks[2].len(), 488);
        assert_eq!(chunks[3].len(), 232);
        assert_eq!(chunks.last().unwrap().end(), 1000);
    }

    #[test]
    fn test_windows_cover_every_token_and_overlap() {
        let chunker = TokenChunker::new(10, 4);
        let input = ids(37);
        let chunks = chunker.chunk(&input);

        let mut covered = vec![false; input.len()];
        for chunk in &chunks {
            assert!(chunk.len() <= 10);
            assert_eq!(chunk.ids, input[chunk.offset..chunk.end()].to_vec());
            for pos in chunk.offset..chunk.end() {
                covered[pos] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));

        for pair in chunks.windows(2) {
            assert_eq!(pair[1].offset - pair[0].offset, 6);
            if pair[1].len() == 10 {
                assert_eq!(pair[0].end() - pair[1].offset, 4);
            }
        }
    }

    #[test]
    fn test_single_trailing_token_is_dropped() {
        // Offsets 0, 3, 6, 9; the window at 9 would hold one token
        let chunks = TokenChunker::new(4, 1).chunk(&ids(10));
        let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 3, 6]);
        assert_eq!(chunks.last().unwrap().end(), 10);
    }

    #[test]
    fn test_short_inputs() {
        let chunker = TokenChunker::default();
        assert!(chunker.chunk(&[]).is_empty());
        assert!(chunker.chunk(&[7]).is_empty());

        let chunks = chunker.chunk(&[7, 8, 9]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].ids, vec![7, 8, 9]);
    }
}
