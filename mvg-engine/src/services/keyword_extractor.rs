//! Theme and keyword selection over part-of-speech tagger output
//!
//! Tagging itself is an external capability ([`PosTagger`]); this module only
//! applies the filtering and ranking policy:
//!
//! - **Themes:** nouns, lowercased, more than 3 characters, unique, first-seen
//!   order, at most 10
//! - **Keywords:** named entities (case preserved, more than 2 characters)
//!   followed by verbs and adjectives (lowercased, more than 3 characters),
//!   unique across the combined list, first-seen order, at most 20
//!
//! Identical tagger output always yields identical lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_THEMES: usize = 10;
pub const MAX_KEYWORDS: usize = 20;

/// Minimum character count (exclusive) for themes, verbs and adjectives
const MIN_WORD_CHARS: usize = 3;
/// Minimum character count (exclusive) for named entities
const MIN_ENTITY_CHARS: usize = 2;

/// Coarse lexical class assigned by a tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexicalClass {
    Noun,
    Verb,
    Adjective,
    #[serde(other)]
    Other,
}

/// One word token with its lexical class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub class: LexicalClass,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, class: LexicalClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// Part-of-speech tagging capability
pub trait PosTagger: Send + Sync {
    /// Word tokens of `text` in order, punctuation and whitespace omitted
    fn lexical_tokens(&self, text: &str) -> Vec<TaggedToken>;

    /// Named entities of `text` in order, multi-word names joined
    fn named_entities(&self, text: &str) -> Vec<String>;
}

/// Tagger used when no part-of-speech capability is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTagger;

impl PosTagger for NoopTagger {
    fn lexical_tokens(&self, _text: &str) -> Vec<TaggedToken> {
        Vec::new()
    }

    fn named_entities(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Selected themes and keywords
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTerms {
    pub themes: Vec<String>,
    pub keywords: Vec<String>,
}

/// Run the tagger over `text` and apply the selection policy
pub fn extract_terms(tagger: &dyn PosTagger, text: &str) -> ExtractedTerms {
    let tokens = tagger.lexical_tokens(text);
    let entities = tagger.named_entities(text);

    ExtractedTerms {
        themes: select_themes(&tokens),
        keywords: select_keywords(&entities, &tokens),
    }
}

pub fn select_themes(tokens: &[TaggedToken]) -> Vec<String> {
    let candidates = tokens
        .iter()
        .filter(|t| t.class == LexicalClass::Noun)
        .map(|t| t.text.to_lowercase())
        .filter(|w| w.chars().count() > MIN_WORD_CHARS);

    unique_prefix(candidates, MAX_THEMES)
}

pub fn select_keywords(entities: &[String], tokens: &[TaggedToken]) -> Vec<String> {
    let names = entities
        .iter()
        .filter(|e| e.chars().count() > MIN_ENTITY_CHARS)
        .cloned();
    let words = tokens
        .iter()
        .filter(|t| matches!(t.class, LexicalClass::Verb | LexicalClass::Adjective))
        .map(|t| t.text.to_lowercase())
        .filter(|w| w.chars().count() > MIN_WORD_CHARS);

    unique_prefix(names.chain(words), MAX_KEYWORDS)
}

/// First `limit` distinct items in first-seen order
fn unique_prefix(items: impl Iterator<Item = String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(item.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noun(text: &str) -> TaggedToken {
        TaggedToken::new(text, LexicalClass::Noun)
    }

    fn verb(text: &str) -> TaggedToken {
        TaggedToken::new(text, LexicalClass::Verb)
    }

    #[test]
    fn test_themes_lowercase_length_dedup() {
        let tokens = vec![noun("Ocean"), noun("sun"), noun("ocean"), verb("dance"), noun("City")];
        assert_eq!(select_themes(&tokens), vec!["ocean", "city"]);
    }

    #[test]
    fn test_themes_capped_at_ten() {
        let tokens: Vec<TaggedToken> = (0..15).map(|i| noun(&format!("word{}", i))).collect();
        let themes = select_themes(&tokens);
        assert_eq!(themes.len(), 10);
        assert_eq!(themes[0], "word0");
        assert_eq!(themes[9], "word9");
    }

    #[test]
    fn test_entities_keep_case_and_come_first() {
        let entities = vec!["New York".to_string(), "Al".to_string(), "Mary".to_string()];
        let tokens = vec![verb("Running"), TaggedToken::new("bright", LexicalClass::Adjective)];

        assert_eq!(
            select_keywords(&entities, &tokens),
            vec!["New York", "Mary", "running", "bright"]
        );
    }

    #[test]
    fn test_keywords_unique_across_sources() {
        let entities = vec!["dream".to_string()];
        let tokens = vec![verb("dream"), verb("Dream"), verb("fly"), verb("soar")];
        assert_eq!(select_keywords(&entities, &tokens), vec!["dream", "soar"]);
    }

    #[test]
    fn test_keywords_capped_at_twenty() {
        let tokens: Vec<TaggedToken> = (0..30).map(|i| verb(&format!("move{}", i))).collect();
        assert_eq!(select_keywords(&[], &tokens).len(), 20);
    }

    #[test]
    fn test_other_class_ignored() {
        let tokens = vec![TaggedToken::new("over", LexicalClass::Other)];
        assert!(select_themes(&tokens).is_empty());
        assert!(select_keywords(&[], &tokens).is_empty());
    }

    #[test]
    fn test_noop_tagger_selects_nothing() {
        assert_eq!(extract_terms(&NoopTagger, "any text at all"), ExtractedTerms::default());
    }

    #[test]
    fn test_unknown_class_deserializes_as_other() {
        let token: TaggedToken = serde_json::from_str(r#"{"text":"the","class":"determiner"}"#).unwrap();
        assert_eq!(token.class, LexicalClass::Other);
    }
}
