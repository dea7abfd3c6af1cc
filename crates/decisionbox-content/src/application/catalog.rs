//! The read-only story catalog.
//!
//! Loaded once at startup from the bundled dataset, a document of the form
//! `{ "stories": [...] }` in JSON or YAML. Loading validates the whole graph
//! and refuses the dataset if anything is wrong with it.

use std::path::Path;

use decisionbox_core::error::DomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::story::Story;
use crate::domain::validation::{CatalogDefect, unreachable_chapters, validate_stories};

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source could not be decoded.
    #[error("catalog parse error: {0}")]
    Parse(String),

    /// The source decoded but failed integrity checks.
    #[error("catalog rejected with {} defect(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<CatalogDefect>),
}

fn summarize(defects: &[CatalogDefect]) -> String {
    defects
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Encoding of the bundled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl CatalogFormat {
    /// Picks the format from a file extension; anything but `.yaml`/`.yml`
    /// is treated as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    stories: Vec<Story>,
}

/// Immutable, validated collection of stories.
#[derive(Debug, Clone)]
pub struct Catalog {
    stories: Vec<Story>,
    fingerprint: String,
}

impl Catalog {
    /// Decodes and validates a dataset.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the bytes are not a catalog document
    /// and `CatalogError::Invalid` if the story graph has defects.
    pub fn load(source: &[u8], format: CatalogFormat) -> Result<Self, CatalogError> {
        let document: CatalogDocument = match format {
            CatalogFormat::Json => {
                serde_json::from_slice(source).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
            CatalogFormat::Yaml => {
                serde_yaml::from_slice(source).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
        };
        Self::build(document.stories, digest(source))
    }

    /// Validates stories that were built in code rather than decoded.
    ///
    /// The fingerprint is computed over the stories' canonical JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if the story graph has defects.
    pub fn from_stories(stories: Vec<Story>) -> Result<Self, CatalogError> {
        let document = CatalogDocument { stories };
        let canonical =
            serde_json::to_vec(&document).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::build(document.stories, digest(&canonical))
    }

    fn build(stories: Vec<Story>, fingerprint: String) -> Result<Self, CatalogError> {
        let defects = validate_stories(&stories);
        if !defects.is_empty() {
            return Err(CatalogError::Invalid(defects));
        }

        for story in &stories {
            let orphans = unreachable_chapters(story);
            if !orphans.is_empty() {
                warn!(story_id = %story.id, chapters = ?orphans, "chapters unreachable from the first chapter");
            }
        }

        info!(stories = stories.len(), %fingerprint, "story catalog loaded");
        Ok(Self {
            stories,
            fingerprint,
        })
    }

    /// All stories in dataset order.
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Looks up a story by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoryNotFound` if no story has that id.
    pub fn find_story(&self, story_id: &str) -> Result<&Story, DomainError> {
        self.stories
            .iter()
            .find(|s| s.id == story_id)
            .ok_or_else(|| DomainError::StoryNotFound(story_id.to_owned()))
    }

    /// SHA-256 hex digest identifying the dataset this catalog was built from.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
