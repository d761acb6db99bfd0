//! Dictionary aggregation: free-dictionary lookup merged with a
//! translation gloss.
//!
//! Both upstreams are allowed to fail independently. A failed gloss fetch
//! leaves an empty partial record, a failed translation falls back to the
//! word itself, and the merged record is always fully populated — the
//! route answers 200 with best-effort data no matter what the upstreams do.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::translate::BaiduTranslator;

const FREE_DICT_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const MEMORY_TIP: &str = "多看多记，重复是关键";
const DEFAULT_DEFINITION: &str = "暂无定义";

/// Fully merged lookup result. Every field carries a fallback value, so
/// the record is complete even when both upstreams were unreachable.
#[derive(Debug, Clone, Serialize)]
pub struct DictionaryRecord {
    pub word: String,
    pub phonetic: String,
    pub translation: String,
    pub definition: String,
    pub examples: Vec<String>,
    pub memory: String,
    pub level: String,
}

// ── Free Dictionary API response types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DictEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// The English-side fields pulled from the first dictionary entry.
#[derive(Debug, Default)]
struct Gloss {
    phonetic: Option<String>,
    definition: Option<String>,
    example: Option<String>,
}

// ── Aggregator ──────────────────────────────────────────────────────────────

pub struct DictionaryService {
    client: reqwest::Client,
    base_url: String,
    translator: Arc<BaiduTranslator>,
}

impl DictionaryService {
    pub fn new(client: reqwest::Client, translator: Arc<BaiduTranslator>) -> Self {
        Self {
            client,
            base_url: FREE_DICT_URL.to_string(),
            translator,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up a word, merging both sources. Infallible: upstream failures
    /// degrade individual fields instead of failing the lookup.
    pub async fn lookup(&self, word: &str) -> DictionaryRecord {
        let (gloss, translation) = tokio::join!(self.fetch_gloss(word), self.translator.translate(word));

        let gloss = gloss.unwrap_or_else(|err| {
            info!("DictionaryService: no free-dictionary result for {word:?}: {err:#}");
            Gloss::default()
        });

        let translation = translation.unwrap_or_else(|err| {
            warn!("DictionaryService: translation failed for {word:?}: {err}");
            word.to_string()
        });

        DictionaryRecord {
            word: word.to_string(),
            phonetic: gloss.phonetic.unwrap_or_else(|| format!("/{word}/")),
            translation,
            definition: gloss.definition.unwrap_or_else(|| DEFAULT_DEFINITION.to_string()),
            examples: match gloss.example {
                Some(example) => vec![example],
                None => vec![format!("Example with {word}.")],
            },
            memory: MEMORY_TIP.to_string(),
            level: derive_level(word).to_string(),
        }
    }

    async fn fetch_gloss(&self, word: &str) -> anyhow::Result<Gloss> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, word))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("free dictionary returned {}", response.status());
        }

        let entries: Vec<DictEntry> = response.json().await?;
        if entries.is_empty() {
            anyhow::bail!("free dictionary returned no entries");
        }
        Ok(extract_gloss(&entries[0]))
    }
}

/// Pull phonetic, first definition, and its example out of one entry.
/// Empty upstream strings are treated as absent so the merged record
/// keeps its fallbacks.
fn extract_gloss(entry: &DictEntry) -> Gloss {
    let phonetic = entry
        .phonetic
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| {
            entry
                .phonetics
                .first()
                .and_then(|p| p.text.clone())
                .filter(|t| !t.is_empty())
        });

    let first_definition = entry
        .meanings
        .first()
        .and_then(|m| m.definitions.first());

    Gloss {
        phonetic,
        definition: first_definition
            .map(|d| d.definition.clone())
            .filter(|d| !d.is_empty()),
        example: first_definition
            .and_then(|d| d.example.clone())
            .filter(|e| !e.is_empty()),
    }
}

/// Difficulty is derived from word length alone: more than 8 characters
/// is "intermediate", everything else "basic".
fn derive_level(word: &str) -> &'static str {
    if word.chars().count() > 8 {
        "intermediate"
    } else {
        "basic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::BaiduTranslator;

    #[test]
    fn level_boundary_is_eight_characters() {
        assert_eq!(derive_level("cat"), "basic");
        assert_eq!(derive_level("elephant"), "basic"); // exactly 8
        assert_eq!(derive_level("crocodile"), "intermediate"); // 9
        assert_eq!(derive_level("serendipity"), "intermediate");
    }

    #[test]
    fn gloss_extraction_for_cat() {
        let entry: DictEntry = serde_json::from_value(serde_json::json!({
            "phonetic": "/kæt/",
            "meanings": [{
                "definitions": [{
                    "definition": "a small domesticated animal",
                    "example": "The cat sat."
                }]
            }]
        }))
        .unwrap();

        let gloss = extract_gloss(&entry);
        assert_eq!(gloss.phonetic.as_deref(), Some("/kæt/"));
        assert_eq!(gloss.definition.as_deref(), Some("a small domesticated animal"));
        assert_eq!(gloss.example.as_deref(), Some("The cat sat."));
    }

    #[test]
    fn empty_upstream_strings_are_treated_as_absent() {
        let entry: DictEntry = serde_json::from_value(serde_json::json!({
            "phonetic": "",
            "phonetics": [{"text": ""}],
            "meanings": [{
                "definitions": [{"definition": "", "example": ""}]
            }]
        }))
        .unwrap();

        let gloss = extract_gloss(&entry);
        assert!(gloss.phonetic.is_none());
        assert!(gloss.definition.is_none());
        assert!(gloss.example.is_none());
    }

    #[test]
    fn phonetic_falls_back_to_phonetics_array() {
        let entry: DictEntry = serde_json::from_value(serde_json::json!({
            "phonetics": [{"text": "/dɒg/"}, {"text": "/dɔːg/"}],
            "meanings": []
        }))
        .unwrap();

        let gloss = extract_gloss(&entry);
        assert_eq!(gloss.phonetic.as_deref(), Some("/dɒg/"));
        assert!(gloss.definition.is_none());
        assert!(gloss.example.is_none());
    }

    #[tokio::test]
    async fn lookup_is_fully_populated_when_both_upstreams_fail() {
        // Both endpoints point at an unroutable port, so both calls fail.
        let client = reqwest::Client::new();
        let translator = Arc::new(
            BaiduTranslator::new(client.clone(), "app", "secret")
                .with_endpoint("http://127.0.0.1:1/translate"),
        );
        let service = DictionaryService::new(client, translator)
            .with_base_url("http://127.0.0.1:1/entries/en");

        let record = service.lookup("cat").await;
        assert_eq!(record.word, "cat");
        assert_eq!(record.phonetic, "/cat/");
        assert_eq!(record.translation, "cat");
        assert_eq!(record.definition, DEFAULT_DEFINITION);
        assert_eq!(record.examples, vec!["Example with cat.".to_string()]);
        assert_eq!(record.memory, MEMORY_TIP);
        assert_eq!(record.level, "basic");
    }
}
