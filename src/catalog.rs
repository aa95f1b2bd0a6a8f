//! Card catalog: loads the prompt/response packs once at startup.
//!
//! The pack file is a JSON array; each pack optionally carries `white`
//! (response) and `black` (prompt) arrays of `{ "text": ... }` objects.
//! Entries without a `text` field are skipped. A missing file, unparseable
//! JSON, or a catalog that ends up with zero prompts or zero responses is a
//! load error, never a silently empty catalog.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Prompt,
    Response,
}

/// An immutable card. Equality is by value, so cards can live in hash sets
/// and be compared against hand contents directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub text: String,
    pub color: CardColor,
}

impl Card {
    pub fn prompt(text: impl Into<String>) -> Self {
        Card { text: text.into(), color: CardColor::Prompt }
    }

    pub fn response(text: impl Into<String>) -> Self {
        Card { text: text.into(), color: CardColor::Response }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("card file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("card file {path} is not a valid JSON array of packs: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog contains no {0} cards")]
    Empty(&'static str),
}

#[derive(Debug, Deserialize)]
struct PackCard {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Pack {
    #[serde(default)]
    white: Vec<PackCard>,
    #[serde(default)]
    black: Vec<PackCard>,
}

/// The loaded catalog, shared read-only by every room.
#[derive(Debug, Clone)]
pub struct Catalog {
    prompts: Vec<Card>,
    responses: Vec<Card>,
}

impl Catalog {
    /// Loads and validates the pack file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: label.clone(),
            source,
        })?;
        Self::from_json(&raw, &label)
    }

    /// Parses pack JSON. `label` names the source in errors.
    pub fn from_json(raw: &str, label: &str) -> Result<Self, CatalogError> {
        let packs: Vec<Pack> = serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
            path: label.to_string(),
            source,
        })?;

        let mut prompts = Vec::new();
        let mut responses = Vec::new();
        for pack in packs {
            prompts.extend(pack.black.into_iter().filter_map(|c| c.text).map(Card::prompt));
            responses.extend(pack.white.into_iter().filter_map(|c| c.text).map(Card::response));
        }

        if prompts.is_empty() {
            return Err(CatalogError::Empty("prompt"));
        }
        if responses.is_empty() {
            return Err(CatalogError::Empty("response"));
        }

        tracing::info!(prompts = prompts.len(), responses = responses.len(), "catalog loaded");
        Ok(Catalog { prompts, responses })
    }

    /// Builds a catalog from plain texts. Handy for tests and local play.
    pub fn from_texts(prompts: &[&str], responses: &[&str]) -> Self {
        Catalog {
            prompts: prompts.iter().map(|t| Card::prompt(*t)).collect(),
            responses: responses.iter().map(|t| Card::response(*t)).collect(),
        }
    }

    pub fn prompts(&self) -> &[Card] {
        &self.prompts
    }

    pub fn responses(&self) -> &[Card] {
        &self.responses
    }

    pub fn random_prompt(&self, rng: &mut impl Rng) -> Card {
        self.prompts
            .choose(rng)
            .cloned()
            .expect("catalog is validated non-empty at load")
    }
}
