//! Story parts produced by the segmenter.

use serde::{Deserialize, Serialize};

use crate::utils::count_words;

/// One segment of a cleaned transcript, sized to roughly one short video.
///
/// The position of a part is its index in the containing sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPart {
    pub text: String,
    pub word_count: usize,
}

impl StoryPart {
    /// Build a part from its sentences, joined by single spaces.
    pub fn from_sentences(sentences: &[&str]) -> Self {
        let text = sentences.join(" ");
        let word_count = count_words(&text);
        Self { text, word_count }
    }
}

/// Result of segmenting a transcript, with the summary statistics returned
/// by the split endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutcome {
    pub parts: Vec<StoryPart>,
    pub part_count: usize,
    pub total_words: usize,
    pub avg_words_per_part: usize,
    pub target_words: usize,
}

impl SplitOutcome {
    pub fn new(parts: Vec<StoryPart>, target_words: usize) -> Self {
        let part_count = parts.len();
        let total_words = parts.iter().map(|p| p.word_count).sum();
        let avg_words_per_part = if part_count == 0 {
            0
        } else {
            total_words / part_count
        };

        Self {
            parts,
            part_count,
            total_words,
            avg_words_per_part,
            target_words,
        }
    }

    /// Part texts in order.
    pub fn texts(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sentences() {
        let part = StoryPart::from_sentences(&["Sentence one.", "Sentence two."]);
        assert_eq!(part.text, "Sentence one. Sentence two.");
        assert_eq!(part.word_count, 4);
    }

    #[test]
    fn test_outcome_stats() {
        let parts = vec![
            StoryPart::from_sentences(&["a b c."]),
            StoryPart::from_sentences(&["d e."]),
        ];
        let outcome = SplitOutcome::new(parts, 3);
        assert_eq!(outcome.part_count, 2);
        assert_eq!(outcome.total_words, 5);
        assert_eq!(outcome.avg_words_per_part, 2);
        assert_eq!(outcome.texts(), vec!["a b c.", "d e."]);
    }
}
