use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::difficulty::Difficulty;

#[derive(Error, Debug)]
pub enum PhraseCatalogError {
    #[error("failed to read phrase file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid phrase file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("empty phrase #{position} in level {level}")]
    EmptyPhrase { level: Difficulty, position: usize },
}

/// A practice sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub id: u32,
    pub text: String,
    pub level: Difficulty,
}

/// Practice phrases grouped by difficulty.
///
/// Ids run from 1 in level order (basic, intermediate, advanced).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseCatalog {
    phrases: Vec<Phrase>,
}

const BASIC: &[&str] = &[
    "Hello, how are you?",
    "My name is John.",
    "I like to eat apples.",
    "The weather is nice today.",
    "She has a blue car.",
    "We go to school every day.",
    "Can I have some water?",
    "This is my favorite book.",
    "I live in a small house.",
    "Thank you very much.",
];

const INTERMEDIATE: &[&str] = &[
    "I've been studying English for three years.",
    "Would you mind opening the window?",
    "She's been working at the hospital since 2020.",
    "If I had more time, I would travel more.",
    "The restaurant that we visited yesterday was excellent.",
    "Don't worry too much about your future.",
];

const ADVANCED: &[&str] = &[
    "Although the circumstances were challenging, she persevered through determination.",
    "The entrepreneur's innovative approach revolutionized the entire industry.",
    "Pronunciation requires consistent practice and careful attention to phonetic details.",
];

impl PhraseCatalog {
    /// The bundled practice set.
    pub fn builtin() -> Self {
        let levels = [
            (Difficulty::Basic, BASIC),
            (Difficulty::Intermediate, INTERMEDIATE),
            (Difficulty::Advanced, ADVANCED),
        ];
        let grouped = levels
            .into_iter()
            .map(|(level, texts)| {
                let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
                (level, texts)
            })
            .collect();
        // Bundled phrases are never empty.
        Self::from_levels(grouped).unwrap_or(Self {
            phrases: Vec::new(),
        })
    }

    /// Builds a catalog from grouped texts, assigning ids in level order.
    pub fn from_levels(
        levels: BTreeMap<Difficulty, Vec<String>>,
    ) -> Result<Self, PhraseCatalogError> {
        let mut phrases = Vec::new();
        for (level, texts) in levels {
            for (position, text) in texts.into_iter().enumerate() {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(PhraseCatalogError::EmptyPhrase {
                        level,
                        position: position + 1,
                    });
                }
                phrases.push(Phrase {
                    id: phrases.len() as u32 + 1,
                    text,
                    level,
                });
            }
        }
        Ok(Self { phrases })
    }

    pub fn all(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn phrases(&self, level: Difficulty) -> impl Iterator<Item = &Phrase> {
        self.phrases.iter().filter(move |p| p.level == level)
    }

    pub fn get(&self, id: u32) -> Option<&Phrase> {
        self.phrases.iter().find(|p| p.id == id)
    }

    pub fn total(&self) -> usize {
        self.phrases.len()
    }

    /// Listing shaped as `{"phrases": {level: [text, ...]}, "total": n}`.
    pub fn listing(&self) -> PhraseListing {
        let mut phrases: BTreeMap<Difficulty, Vec<String>> = BTreeMap::new();
        for level in Difficulty::ALL {
            phrases.insert(*level, Vec::new());
        }
        for phrase in &self.phrases {
            phrases
                .entry(phrase.level)
                .or_default()
                .push(phrase.text.clone());
        }
        PhraseListing {
            phrases,
            total: self.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseListing {
    pub phrases: BTreeMap<Difficulty, Vec<String>>,
    pub total: usize,
}
