//! Story graph: stories, chapters and choices.
//!
//! Field names serialize in camelCase so the bundled dataset and the
//! persisted progress share one JSON vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a terminal chapter, surfaced to the reader on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingType {
    /// A good ending.
    Good,
    /// A bad ending.
    Bad,
    /// A neutral ending.
    Neutral,
}

impl EndingType {
    /// Returns the wire name of this ending type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Neutral => "neutral",
        }
    }

    /// Parses a wire name; unknown names yield `None`.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "good" => Some(Self::Good),
            "bad" => Some(Self::Bad),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for EndingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge from one chapter to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Identifier, unique within the owning chapter.
    pub id: String,
    /// Text shown to the reader.
    pub text: String,
    /// Target chapter id within the same story.
    pub next_chapter_id: String,
    /// Share of readers who picked this choice, in `[0, 100]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

/// A node in the story graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Identifier, unique within the story.
    pub id: String,
    /// Chapter title.
    pub title: String,
    /// Chapter body text.
    pub content: String,
    /// Outgoing choices in presentation order.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Explicit ending flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ending: Option<bool>,
    /// Ending classification, meaningful on terminal chapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_type: Option<EndingType>,
}

impl Chapter {
    /// A chapter is terminal when flagged as an ending or when it has no
    /// outgoing choices.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_ending == Some(true) || self.choices.is_empty()
    }

    /// The choices the reader may pick. Terminal chapters offer none, even
    /// when the dataset lists some.
    #[must_use]
    pub fn offered_choices(&self) -> &[Choice] {
        if self.is_terminal() {
            &[]
        } else {
            &self.choices
        }
    }

    /// Finds an offered choice by id.
    #[must_use]
    pub fn find_offered_choice(&self, choice_id: &str) -> Option<&Choice> {
        self.offered_choices().iter().find(|c| c.id == choice_id)
    }
}

/// A complete narrative: a directed graph of chapters entered at the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Identifier, unique within the catalog.
    pub id: String,
    /// Story title.
    pub title: String,
    /// Short blurb.
    pub description: String,
    /// Author name.
    pub author: String,
    /// Cover artwork reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Chapters; the first one is the entry point.
    pub chapters: Vec<Chapter>,
    /// Estimated reading time in minutes.
    pub estimated_read_time: u32,
}

impl Story {
    /// The entry chapter. Always present in a validated catalog.
    #[must_use]
    pub fn first_chapter(&self) -> Option<&Chapter> {
        self.chapters.first()
    }

    /// Finds a chapter by id.
    #[must_use]
    pub fn find_chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }
}
