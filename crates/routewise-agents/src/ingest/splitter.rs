use std::collections::VecDeque;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Boundaries tried in order: paragraph, line, sentence, word.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Splits text into overlapping chunks measured in characters.
///
/// Text is cut at the coarsest boundary that yields pieces no longer than
/// `chunk_size`, falling back to a hard cut when a single word is too long.
/// Adjacent pieces are then packed into chunks, each chunk starting with up
/// to `overlap` characters carried over from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextSplitter {
    /// `overlap` is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        self.cut(text, &SEPARATORS, &mut pieces);
        self.pack(pieces)
    }

    fn cut<'a>(&self, text: &'a str, separators: &[&str], out: &mut Vec<&'a str>) {
        if char_len(text) <= self.chunk_size {
            out.push(text);
            return;
        }

        let Some((separator, rest)) = separators.split_first() else {
            let mut start = 0;
            for (count, (idx, _)) in text.char_indices().enumerate() {
                if count > 0 && count % self.chunk_size == 0 {
                    out.push(&text[start..idx]);
                    start = idx;
                }
            }
            out.push(&text[start..]);
            return;
        };

        for part in text.split_inclusive(*separator) {
            self.cut(part, rest, out);
        }
    }

    fn pack(&self, pieces: Vec<&str>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut window_len = 0;

        for piece in pieces {
            let piece_len = char_len(piece);
            if window_len + piece_len > self.chunk_size && !window.is_empty() {
                push_chunk(&mut chunks, &window);
                while window_len > self.overlap
                    || (window_len + piece_len > self.chunk_size && window_len > 0)
                {
                    match window.pop_front() {
                        Some(front) => window_len -= char_len(front),
                        None => break,
                    }
                }
            }
            window.push_back(piece);
            window_len += piece_len;
        }
        push_chunk(&mut chunks, &window);

        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&str>) {
    let chunk: String = window.iter().copied().collect();
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let splitter = TextSplitter::default();
        assert_eq!(splitter.split("  hello world \n"), vec!["hello world"]);
        assert!(splitter.split("   \n\n ").is_empty());
    }

    #[test]
    fn chunks_respect_size_and_prefer_paragraphs() {
        let text = format!(
            "{}\n\n{}\n\n{}",
            "a".repeat(30),
            "b".repeat(30),
            "c".repeat(30)
        );
        let chunks = TextSplitter::new(70, 0).split(&text);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with('a') && chunks[0].ends_with('b'));
        assert_eq!(chunks[1], "c".repeat(30));
        assert!(chunks.iter().all(|c| c.chars().count() <= 70));
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let text = (0..60).map(|i| format!("w{i:02}")).collect::<Vec<_>>().join(" ");
        let chunks = TextSplitter::new(40, 12).split(&text);

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split_whitespace().last().unwrap();
            assert!(
                pair[1].contains(last_word),
                "{:?} does not carry over {last_word}",
                pair[1]
            );
        }
        assert!(chunks.iter().all(|c| c.chars().count() <= 40));
    }

    #[test]
    fn long_words_are_hard_cut_on_char_boundaries() {
        let text = "é".repeat(25);
        let chunks = TextSplitter::new(10, 3).split(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 10);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn overlap_is_clamped() {
        let splitter = TextSplitter::new(5, 50);
        assert_eq!(splitter.overlap(), 4);
        assert_eq!(TextSplitter::new(0, 0).chunk_size(), 1);
    }
}
