//! Transcript segmentation.
//!
//! [`clean_transcript`] strips timestamps, speaker labels, show boilerplate and
//! audio cue markers. [`split_into_parts`] then groups whole sentences into parts
//! close to a word target.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use reel_models::{count_words, ErrorKind, SplitOutcome, StoryPart};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("Could not create any story parts from text")]
    EmptyInput,
}

impl SegmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput => ErrorKind::Validation,
        }
    }
}

/// `0 (59s):`, `1 (2m 32s):`
static SEGMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*\(\d+[smh]+\s*\d*[smh]*\):").unwrap());

/// `[00:15]`, `(1:23)`, `1:02:33`
static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[(]?\d{1,2}:\d{2}(?::\d{2})?[\])]?").unwrap());

static SPEAKER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(Host|Guest|Narrator|Speaker \d+):\s*").unwrap()
});

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)welcome to [^.!?]+[.!?]",
        r"(?i)don't forget to subscribe[^.!?]*[.!?]",
        r"(?i)this episode is brought to you by[^.!?]*[.!?]",
        r"(?i)thanks to our sponsor[^.!?]*[.!?]",
        r"(?i)before we begin[^.!?]*[.!?]",
        r"(?i)let's get into it[.!?]",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static AUDIO_CUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[MUSIC\]|\[SOUND EFFECT\]|\[SFX\]|\[AUDIO\]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Remove non-story content from a raw transcript.
///
/// The output has single spaces between words and no leading or trailing
/// whitespace.
pub fn clean_transcript(text: &str) -> String {
    let mut text = SEGMENT_MARKER.replace_all(text, "").into_owned();
    text = CLOCK.replace_all(&text, "").into_owned();
    text = SPEAKER_LABEL.replace_all(&text, "").into_owned();

    for phrase in BOILERPLATE.iter() {
        text = phrase.replace_all(&text, "").into_owned();
    }

    text = AUDIO_CUE.replace_all(&text, "").into_owned();
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text after every `.`, `!` or `?` that is followed by whitespace.
///
/// The terminator stays with its sentence. Blank sentences are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && prev.is_some_and(is_terminator) {
            sentences.push(&text[start..i]);
            let mut next = i + c.len_utf8();
            while let Some(&(j, w)) = chars.peek() {
                if !w.is_whitespace() {
                    break;
                }
                next = j + w.len_utf8();
                chars.next();
            }
            start = next;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `floor(n * fifths / 5)` without overflowing for large `n`.
fn scale_fifths(n: usize, fifths: usize) -> usize {
    (n / 5).saturating_mul(fifths).saturating_add(n % 5 * fifths / 5)
}

/// Group sentences into parts targeting `target_words` words each.
///
/// With `min = floor(target * 0.8)` and `max = floor(target * 1.2)`:
/// a sentence that would push a non-empty part past `max` closes the part when
/// it already holds `min` words, and is appended anyway otherwise. A part closes
/// as soon as it reaches `target`. The remainder becomes the final part.
pub fn split_into_parts(text: &str, target_words: usize) -> Vec<StoryPart> {
    let min_words = scale_fifths(target_words, 4);
    let max_words = scale_fifths(target_words, 6);

    let mut parts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_words: usize = 0;

    for sentence in split_sentences(text) {
        let sentence_words = count_words(sentence);

        if current_words > 0 && current_words.saturating_add(sentence_words) > max_words {
            if current_words >= min_words {
                parts.push(StoryPart::from_sentences(&current));
                current = vec![sentence];
                current_words = sentence_words;
            } else {
                current.push(sentence);
                current_words += sentence_words;
            }
        } else {
            current.push(sentence);
            current_words += sentence_words;

            if current_words >= target_words {
                parts.push(StoryPart::from_sentences(&current));
                current.clear();
                current_words = 0;
            }
        }
    }

    if !current.is_empty() {
        parts.push(StoryPart::from_sentences(&current));
    }

    parts
}

/// Clean and split a raw transcript.
pub fn segment(raw: &str, target_words: usize) -> Result<SplitOutcome, SegmentError> {
    let cleaned = clean_transcript(raw);
    let parts = split_into_parts(&cleaned, target_words);

    if parts.is_empty() {
        return Err(SegmentError::EmptyInput);
    }

    Ok(SplitOutcome::new(parts, target_words))
}
