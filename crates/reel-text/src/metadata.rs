//! Title, description and tag generation.
//!
//! Everything here is deterministic string templating over the translated part
//! texts. Channel-specific wording lives in [`MetadataTemplate`]; placeholders
//! `{part}`, `{total}` and `{remaining}` are substituted at render time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use reel_models::{truncate_chars, FullMetadata, PartMetadata};

/// Keywords kept per text.
pub const MAX_KEY_PHRASES: usize = 10;
/// Keywords reported per part.
pub const REPORTED_KEY_PHRASES: usize = 5;
pub const PART_TAG_LIMIT: usize = 20;
pub const FULL_TAG_LIMIT: usize = 25;
/// Parts listed in the compilation description.
pub const LISTED_PARTS: usize = 10;

const TITLE_MAX_CHARS: usize = 60;
const TITLE_SENTENCE_MAX_CHARS: usize = 50;
const TITLE_PHRASE_MAX_CHARS: usize = 30;
const HASHTAG_MAX_CHARS: usize = 20;
const PART_PREVIEW_CHARS: usize = 50;

/// Tagalog and English function words ignored by keyword extraction.
const STOPWORDS: &[&str] = &[
    "ang", "ng", "sa", "na", "ay", "at", "o", "si", "ni", "kay", "para", "nga", "din", "rin",
    "the", "a", "an", "and", "or", "but", "in", "on", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
];

/// Frequency-ranked keywords of `text`.
///
/// Tokens are lowercased, stripped of surrounding punctuation and kept when longer
/// than four characters and not a stopword. Ties keep first-occurrence order.
pub fn extract_key_phrases(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for token in lowered.split_whitespace() {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if word.chars().count() <= 4 || STOPWORDS.contains(&word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // stable sort keeps first-occurrence order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(MAX_KEY_PHRASES)
        .map(str::to_string)
        .collect()
}

/// Channel wording used by [`MetadataGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataTemplate {
    pub title_prefix: String,
    pub series_intro: String,
    pub call_to_action: Vec<String>,
    pub part_hashtags: String,
    pub base_tags: Vec<String>,
    pub series_tags: Vec<String>,
    pub full_title_prefix: String,
    pub full_fallback_title: String,
    pub full_intro: Vec<String>,
    pub full_parts_heading: String,
    pub full_more_parts: String,
    pub full_hashtags: String,
    pub full_base_tags: Vec<String>,
    pub default_title: String,
    pub default_description: String,
    pub default_tags: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for MetadataTemplate {
    fn default() -> Self {
        Self {
            title_prefix: "Bahagi {part}: ".to_string(),
            series_intro: "Bahagi {part} ng {total} na serye.".to_string(),
            call_to_action: strings(&[
                "🔔 Mag-subscribe para sa mas maraming kwentong takot!",
                "👍 I-like kung nagustuhan mo ang kwento!",
                "💬 Mag-comment ng iyong mga karanasan!",
            ]),
            part_hashtags: "#KwentongTakot #TrueCrime #HorrorStory #TagalogHorror #PinoyHorror"
                .to_string(),
            base_tags: strings(&[
                "kwentong takot",
                "true crime",
                "horror story",
                "tagalog horror",
                "pinoy horror",
                "filipino horror",
                "scary story",
                "true story",
                "mystery",
                "suspense",
            ]),
            series_tags: strings(&["bahagi {part}", "serye"]),
            full_title_prefix: "Buong Kwento: ".to_string(),
            full_fallback_title: "Kwentong Takot".to_string(),
            full_intro: strings(&[
                "🎬 BUONG KWENTO - Lahat ng Bahagi",
                "Panoorin ang buong kwento mula simula hanggang wakas.",
            ]),
            full_parts_heading: "📌 Mga Bahagi:".to_string(),
            full_more_parts: "... at {remaining} pang bahagi".to_string(),
            full_hashtags:
                "#KwentongTakot #TrueCrime #HorrorStory #TagalogHorror #PinoyHorror #BuongKwento"
                    .to_string(),
            full_base_tags: strings(&[
                "kwentong takot",
                "true crime",
                "horror story",
                "tagalog horror",
                "pinoy horror",
                "filipino horror",
                "buong kwento",
                "full story",
                "complete story",
                "scary story",
                "true story",
                "mystery",
                "suspense",
                "compilation",
            ]),
            default_title: "Kwentong Takot".to_string(),
            default_description:
                "Bahagi {part} ng kwentong takot.\n\nMag-subscribe para sa mas maraming kwento!"
                    .to_string(),
            default_tags: strings(&[
                "kwentong takot",
                "true crime",
                "horror story",
                "tagalog horror",
            ]),
        }
    }
}

fn fill(template: &str, part: usize, total: usize) -> String {
    template
        .replace("{part}", &part.to_string())
        .replace("{total}", &total.to_string())
}

/// Truncate to `max` chars, replacing the tail with `...` when shortened.
fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate_chars(text, max - 3))
    } else {
        text.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// First `n` non-blank `.`-separated sentences, trimmed.
fn leading_sentences(text: &str, n: usize) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(n)
        .collect()
}

fn dedup_capped(tags: Vec<String>, limit: usize) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(limit);
    for tag in tags {
        if unique.len() == limit {
            break;
        }
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

fn is_tag_phrase(phrase: &str) -> bool {
    (4..20).contains(&phrase.chars().count())
}

#[derive(Debug, Clone, Default)]
pub struct MetadataGenerator {
    template: MetadataTemplate,
}

impl MetadataGenerator {
    pub fn new(template: MetadataTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &MetadataTemplate {
        &self.template
    }

    /// Metadata for every part plus the compilation.
    pub fn generate(&self, parts: &[String]) -> (Vec<PartMetadata>, FullMetadata) {
        let total = parts.len();
        let part_metadata = parts
            .iter()
            .enumerate()
            .map(|(i, text)| self.part_metadata(text, i + 1, total))
            .collect();
        (part_metadata, self.full_metadata(parts))
    }

    /// Metadata for one part. Blank text yields [`Self::default_metadata`].
    pub fn part_metadata(
        &self,
        text: &str,
        part_number: usize,
        total_parts: usize,
    ) -> PartMetadata {
        if text.trim().is_empty() {
            warn!(
                part = part_number,
                total = total_parts,
                "Blank part text, using default metadata"
            );
            return self.default_metadata(part_number, total_parts);
        }

        let key_phrases = extract_key_phrases(text);

        PartMetadata {
            part_number,
            title: self.title(text, part_number, total_parts, &key_phrases),
            description: self.description(text, part_number, total_parts, &key_phrases),
            tags: self.part_tags(&key_phrases, part_number, total_parts),
            key_phrases: key_phrases.into_iter().take(REPORTED_KEY_PHRASES).collect(),
        }
    }

    fn title(
        &self,
        text: &str,
        part_number: usize,
        total_parts: usize,
        key_phrases: &[String],
    ) -> String {
        let prefix = if total_parts > 1 {
            fill(&self.template.title_prefix, part_number, total_parts)
        } else {
            String::new()
        };

        let first_sentence = text.split('.').next().unwrap_or_default().trim();
        let suffix = key_phrases
            .iter()
            .take(3)
            .find(|phrase| phrase.chars().count() <= TITLE_PHRASE_MAX_CHARS)
            .map(|phrase| capitalize(phrase))
            .unwrap_or_else(|| ellipsize(first_sentence, TITLE_SENTENCE_MAX_CHARS));

        ellipsize(&format!("{prefix}{suffix}"), TITLE_MAX_CHARS)
    }

    fn description(
        &self,
        text: &str,
        part_number: usize,
        total_parts: usize,
        key_phrases: &[String],
    ) -> String {
        let mut description = String::new();

        if total_parts > 1 {
            description.push_str(&fill(&self.template.series_intro, part_number, total_parts));
            description.push_str("\n\n");
        }

        let sentences = leading_sentences(text, 3);
        if !sentences.is_empty() {
            description.push_str(&sentences.join(". "));
            description.push('.');
        }

        description.push_str("\n\n");
        description.push_str(&self.template.call_to_action.join("\n"));

        if !key_phrases.is_empty() {
            let hashtags: Vec<String> = key_phrases
                .iter()
                .take(3)
                .map(|phrase| phrase.replace(' ', ""))
                .filter(|tag| tag.chars().count() < HASHTAG_MAX_CHARS)
                .map(|tag| format!("#{tag}"))
                .collect();
            description.push_str("\n\n");
            description.push_str(&hashtags.join(" "));
        }

        description.push(' ');
        description.push_str(&self.template.part_hashtags);
        description
    }

    fn part_tags(
        &self,
        key_phrases: &[String],
        part_number: usize,
        total_parts: usize,
    ) -> Vec<String> {
        let mut tags = self.template.base_tags.clone();

        if total_parts > 1 {
            tags.extend(
                self.template
                    .series_tags
                    .iter()
                    .map(|tag| fill(tag, part_number, total_parts)),
            );
        }

        tags.extend(
            key_phrases
                .iter()
                .take(REPORTED_KEY_PHRASES)
                .filter(|phrase| is_tag_phrase(phrase))
                .map(|phrase| phrase.to_lowercase()),
        );

        dedup_capped(tags, PART_TAG_LIMIT)
    }

    /// Metadata for the long-form compilation of all parts.
    pub fn full_metadata(&self, parts: &[String]) -> FullMetadata {
        let t = &self.template;
        let key_phrases = extract_key_phrases(&parts.join(" "));

        let first_sentence = parts
            .first()
            .and_then(|p| p.split('.').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(t.full_fallback_title.as_str());
        let title = format!(
            "{}{}",
            t.full_title_prefix,
            ellipsize(first_sentence, TITLE_MAX_CHARS)
        );

        let mut description = String::new();
        for line in &t.full_intro {
            description.push_str(line);
            description.push_str("\n\n");
        }

        if let Some(first) = parts.first() {
            description.push_str(&leading_sentences(first, 2).join(". "));
            description.push_str(".\n\n");
        }

        description.push_str(&t.full_parts_heading);
        description.push('\n');
        for (i, part) in parts.iter().take(LISTED_PARTS).enumerate() {
            let lead = part.split('.').next().unwrap_or_default();
            let preview = truncate_chars(lead, PART_PREVIEW_CHARS);
            description.push_str(&format!("{}. {}...\n", i + 1, preview));
        }
        if parts.len() > LISTED_PARTS {
            let remaining = (parts.len() - LISTED_PARTS).to_string();
            description.push_str(&t.full_more_parts.replace("{remaining}", &remaining));
            description.push('\n');
        }

        description.push('\n');
        description.push_str(&t.call_to_action.join("\n"));
        description.push_str("\n\n");
        description.push_str(&t.full_hashtags);

        let mut tags = t.full_base_tags.clone();
        tags.extend(
            key_phrases
                .iter()
                .filter(|phrase| is_tag_phrase(phrase))
                .map(|phrase| phrase.to_lowercase()),
        );

        FullMetadata {
            title,
            description,
            tags: dedup_capped(tags, FULL_TAG_LIMIT),
            total_parts: parts.len(),
        }
    }

    /// Fixed metadata used when a part cannot be described.
    pub fn default_metadata(&self, part_number: usize, total_parts: usize) -> PartMetadata {
        let t = &self.template;
        let title = if total_parts > 1 {
            format!("{}{}", fill(&t.title_prefix, part_number, total_parts), t.default_title)
        } else {
            t.default_title.clone()
        };

        PartMetadata {
            part_number,
            title,
            description: fill(&t.default_description, part_number, total_parts),
            tags: t.default_tags.clone(),
            key_phrases: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_phrases_ranked_by_frequency() {
        let phrases =
            extract_key_phrases("Multo sa bahay. Ang multo ay nasa bahay. MULTO! the house, house");
        assert_eq!(phrases, vec!["multo", "bahay", "house"]);
    }

    #[test]
    fn test_key_phrases_ties_keep_first_occurrence() {
        let phrases = extract_key_phrases("zebra apple mango apple zebra mango");
        assert_eq!(phrases, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_key_phrases_capped() {
        let text = (0..15).map(|i| format!("keyword{i:02}")).collect::<Vec<_>>().join(" ");
        assert_eq!(extract_key_phrases(&text).len(), MAX_KEY_PHRASES);
    }

    #[test]
    fn test_part_title_prefers_short_key_phrase() {
        let generator = MetadataGenerator::default();
        let meta = generator.part_metadata("Ang aswang ay dumating. Takot ang aswang.", 2, 5);
        assert_eq!(meta.title, "Bahagi 2: Aswang");
        assert_eq!(meta.part_number, 2);
    }

    #[test]
    fn test_part_title_variants() {
        let generator = MetadataGenerator::default();
        let meta = generator.part_metadata("Ako ay nag-iisa. Wala.", 1, 1);
        // "nag-iisa" is the only keyword
        assert_eq!(meta.title, "Nag-iisa");

        let meta = generator.part_metadata("Siya ay tumakbo.", 1, 1);
        assert_eq!(meta.title, "Tumakbo");

        let meta = generator.part_metadata("Ako ay.", 1, 1);
        assert_eq!(meta.title, "Ako ay");
    }

    #[test]
    fn test_title_is_truncated() {
        let generator = MetadataGenerator::default();
        let sentence = "Isang napakahabang pangungusap na walang tigil hanggang dulo ng mundo";
        let title = generator.title(sentence, 12, 20, &[]);
        assert_eq!(title.chars().count(), 60);
        assert!(title.starts_with("Bahagi 12: Isang"));
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_part_description_layout() {
        let generator = MetadataGenerator::default();
        let meta =
            generator.part_metadata("Gabi noon. Madilim ang kalye. May sumigaw. Tumakbo.", 1, 3);
        let expected = "Bahagi 1 ng 3 na serye.\n\n\
                        Gabi noon. Madilim ang kalye. May sumigaw.\n\n\
                        🔔 Mag-subscribe para sa mas maraming kwentong takot!\n\
                        👍 I-like kung nagustuhan mo ang kwento!\n\
                        💬 Mag-comment ng iyong mga karanasan!\n\n\
                        #madilim #kalye #sumigaw \
                        #KwentongTakot #TrueCrime #HorrorStory #TagalogHorror #PinoyHorror";
        assert_eq!(meta.description, expected);
    }

    #[test]
    fn test_part_tags() {
        let generator = MetadataGenerator::default();
        let meta = generator.part_metadata("Ang mystery ng bahay. Kwento ng bahay.", 3, 4);
        assert_eq!(meta.tags.len(), 14);
        assert!(meta.tags.contains(&"bahagi 3".to_string()));
        assert!(meta.tags.contains(&"serye".to_string()));
        assert!(meta.tags.contains(&"kwento".to_string()));
        // "mystery" already a base tag
        assert_eq!(meta.tags.iter().filter(|t| *t == "mystery").count(), 1);
        assert!(meta.tags.len() <= PART_TAG_LIMIT);
    }

    #[test]
    fn test_blank_part_gets_default_metadata() {
        let generator = MetadataGenerator::default();
        let meta = generator.part_metadata("   ", 2, 3);
        assert_eq!(meta.title, "Bahagi 2: Kwentong Takot");
        assert_eq!(
            meta.description,
            "Bahagi 2 ng kwentong takot.\n\nMag-subscribe para sa mas maraming kwento!"
        );
        assert_eq!(meta.tags.len(), 4);
        assert!(meta.key_phrases.is_empty());

        assert_eq!(generator.default_metadata(1, 1).title, "Kwentong Takot");
    }

    #[test]
    fn test_full_metadata() {
        let generator = MetadataGenerator::default();
        let parts: Vec<String> = (1..=12).map(|i| format!("Kabanata {i}. Ang simula.")).collect();
        let full = generator.full_metadata(&parts);

        assert_eq!(full.title, "Buong Kwento: Kabanata 1");
        assert_eq!(full.total_parts, 12);
        assert!(full.description.starts_with("🎬 BUONG KWENTO - Lahat ng Bahagi\n\n"));
        assert!(full
            .description
            .contains("Kabanata 1. Ang simula.\n\n📌 Mga Bahagi:\n1. Kabanata 1...\n"));
        assert!(full.description.contains("10. Kabanata 10...\n... at 2 pang bahagi\n"));
        assert!(!full.description.contains("11. Kabanata 11"));
        assert!(full.description.ends_with("#PinoyHorror #BuongKwento"));
        assert!(full.tags.contains(&"compilation".to_string()));
        assert!(full.tags.contains(&"kabanata".to_string()));
        assert!(full.tags.len() <= FULL_TAG_LIMIT);
    }

    #[test]
    fn test_full_metadata_fallback_title() {
        let generator = MetadataGenerator::default();
        let full = generator.full_metadata(&["".to_string()]);
        assert_eq!(full.title, "Buong Kwento: Kwentong Takot");
    }

    #[test]
    fn test_custom_template() {
        let template = MetadataTemplate {
            title_prefix: "Part {part}/{total}: ".to_string(),
            ..Default::default()
        };
        let generator = MetadataGenerator::new(template);
        let meta = generator.part_metadata("The creature waited.", 1, 2);
        assert_eq!(meta.title, "Part 1/2: Creature");
    }
}
