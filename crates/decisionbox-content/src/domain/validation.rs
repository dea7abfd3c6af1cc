//! Load-time integrity checks for the story graph.
//!
//! A catalog that fails any of these checks is rejected as a whole, so
//! traversal never meets a dangling `nextChapterId` or an ambiguous id.

use std::collections::{BTreeSet, HashSet, VecDeque};

use thiserror::Error;

use super::story::Story;

/// A single integrity defect found in the dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogDefect {
    /// Two stories share an id.
    #[error("duplicate story id {story_id}")]
    DuplicateStory {
        /// The repeated story id.
        story_id: String,
    },

    /// A story has no chapters, so it has no entry point.
    #[error("story {story_id} has no chapters")]
    EmptyStory {
        /// The empty story.
        story_id: String,
    },

    /// Two chapters of one story share an id.
    #[error("duplicate chapter id {chapter_id} in story {story_id}")]
    DuplicateChapter {
        /// The owning story.
        story_id: String,
        /// The repeated chapter id.
        chapter_id: String,
    },

    /// Two choices of one chapter share an id.
    #[error("duplicate choice id {choice_id} in chapter {chapter_id} of story {story_id}")]
    DuplicateChoice {
        /// The owning story.
        story_id: String,
        /// The owning chapter.
        chapter_id: String,
        /// The repeated choice id.
        choice_id: String,
    },

    /// A choice targets a chapter that is not in the same story.
    #[error(
        "choice {choice_id} in chapter {chapter_id} of story {story_id} points to missing chapter {next_chapter_id}"
    )]
    DanglingReference {
        /// The owning story.
        story_id: String,
        /// The chapter holding the choice.
        chapter_id: String,
        /// The offending choice.
        choice_id: String,
        /// The unresolved target.
        next_chapter_id: String,
    },

    /// A popularity value outside `[0, 100]`.
    #[error("choice {choice_id} in chapter {chapter_id} of story {story_id} has popularity {popularity} outside 0..=100")]
    PopularityOutOfRange {
        /// The owning story.
        story_id: String,
        /// The chapter holding the choice.
        chapter_id: String,
        /// The offending choice.
        choice_id: String,
        /// The rejected value.
        popularity: f64,
    },
}

/// Checks every story and returns all defects found, in dataset order.
#[must_use]
pub fn validate_stories(stories: &[Story]) -> Vec<CatalogDefect> {
    let mut defects = Vec::new();
    let mut story_ids = HashSet::new();

    for story in stories {
        if !story_ids.insert(story.id.as_str()) {
            defects.push(CatalogDefect::DuplicateStory {
                story_id: story.id.clone(),
            });
        }
        validate_story(story, &mut defects);
    }

    defects
}

fn validate_story(story: &Story, defects: &mut Vec<CatalogDefect>) {
    if story.chapters.is_empty() {
        defects.push(CatalogDefect::EmptyStory {
            story_id: story.id.clone(),
        });
        return;
    }

    let mut chapter_ids = HashSet::new();
    for chapter in &story.chapters {
        if !chapter_ids.insert(chapter.id.as_str()) {
            defects.push(CatalogDefect::DuplicateChapter {
                story_id: story.id.clone(),
                chapter_id: chapter.id.clone(),
            });
        }
    }

    for chapter in &story.chapters {
        let mut choice_ids = HashSet::new();
        for choice in &chapter.choices {
            if !choice_ids.insert(choice.id.as_str()) {
                defects.push(CatalogDefect::DuplicateChoice {
                    story_id: story.id.clone(),
                    chapter_id: chapter.id.clone(),
                    choice_id: choice.id.clone(),
                });
            }
            if !chapter_ids.contains(choice.next_chapter_id.as_str()) {
                defects.push(CatalogDefect::DanglingReference {
                    story_id: story.id.clone(),
                    chapter_id: chapter.id.clone(),
                    choice_id: choice.id.clone(),
                    next_chapter_id: choice.next_chapter_id.clone(),
                });
            }
            if let Some(popularity) = choice.popularity {
                if !(0.0..=100.0).contains(&popularity) {
                    defects.push(CatalogDefect::PopularityOutOfRange {
                        story_id: story.id.clone(),
                        chapter_id: chapter.id.clone(),
                        choice_id: choice.id.clone(),
                        popularity,
                    });
                }
            }
        }
    }
}

/// Ids of every chapter reachable from the first chapter by following
/// offered choices. Targets that do not resolve are skipped.
#[must_use]
pub fn reachable_chapters(story: &Story) -> BTreeSet<&str> {
    let mut seen = BTreeSet::new();
    let Some(first) = story.first_chapter() else {
        return seen;
    };

    let mut queue = VecDeque::from([first]);
    seen.insert(first.id.as_str());
    while let Some(chapter) = queue.pop_front() {
        for choice in chapter.offered_choices() {
            if let Some(next) = story.find_chapter(&choice.next_chapter_id) {
                if seen.insert(next.id.as_str()) {
                    queue.push_back(next);
                }
            }
        }
    }

    seen
}

/// Ids of chapters a reader can never arrive at, in dataset order.
#[must_use]
pub fn unreachable_chapters(story: &Story) -> Vec<&str> {
    let reachable = reachable_chapters(story);
    story
        .chapters
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !reachable.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::{Chapter, Choice};

    fn choice(id: &str, next: &str) -> Choice {
        Choice {
            id: id.to_owned(),
            text: String::new(),
            next_chapter_id: next.to_owned(),
            popularity: None,
        }
    }

    fn chapter(id: &str, choices: Vec<Choice>) -> Chapter {
        Chapter {
            id: id.to_owned(),
            title: String::new(),
            content: String::new(),
            choices,
            is_ending: None,
            ending_type: None,
        }
    }

    fn story(id: &str, chapters: Vec<Chapter>) -> Story {
        Story {
            id: id.to_owned(),
            title: String::new(),
            description: String::new(),
            author: String::new(),
            cover_image: None,
            chapters,
            estimated_read_time: 5,
        }
    }

    #[test]
    fn test_valid_story_has_no_defects() {
        let s = story(
            "demo",
            vec![chapter("c1", vec![choice("a", "c2")]), chapter("c2", vec![])],
        );

        assert!(validate_stories(&[s]).is_empty());
    }

    #[test]
    fn test_detects_dangling_reference() {
        // Arrange
        let s = story("demo", vec![chapter("c1", vec![choice("a", "nowhere")])]);

        // Act
        let defects = validate_stories(&[s]);

        // Assert
        assert_eq!(
            defects,
            vec![CatalogDefect::DanglingReference {
                story_id: "demo".to_owned(),
                chapter_id: "c1".to_owned(),
                choice_id: "a".to_owned(),
                next_chapter_id: "nowhere".to_owned(),
            }]
        );
    }

    #[test]
    fn test_reference_into_another_story_is_dangling() {
        let first = story("one", vec![chapter("c1", vec![choice("a", "x1")])]);
        let second = story("two", vec![chapter("x1", vec![])]);

        let defects = validate_stories(&[first, second]);

        assert_eq!(defects.len(), 1);
        assert!(matches!(defects[0], CatalogDefect::DanglingReference { .. }));
    }

    #[test]
    fn test_detects_duplicate_ids_at_every_level() {
        // Arrange
        let a = story(
            "dup",
            vec![
                chapter("c1", vec![choice("a", "c1"), choice("a", "c1")]),
                chapter("c1", vec![]),
            ],
        );
        let b = story("dup", vec![chapter("c1", vec![])]);

        // Act
        let defects = validate_stories(&[a, b]);

        // Assert
        assert!(defects.contains(&CatalogDefect::DuplicateChapter {
            story_id: "dup".to_owned(),
            chapter_id: "c1".to_owned(),
        }));
        assert!(defects.contains(&CatalogDefect::DuplicateChoice {
            story_id: "dup".to_owned(),
            chapter_id: "c1".to_owned(),
            choice_id: "a".to_owned(),
        }));
        assert!(defects.contains(&CatalogDefect::DuplicateStory {
            story_id: "dup".to_owned(),
        }));
    }

    #[test]
    fn test_detects_empty_story_and_bad_popularity() {
        let mut popular = choice("a", "c2");
        popular.popularity = Some(140.0);
        let empty = story("empty", vec![]);
        let skewed = story(
            "skewed",
            vec![chapter("c1", vec![popular]), chapter("c2", vec![])],
        );

        let defects = validate_stories(&[empty, skewed]);

        assert_eq!(defects.len(), 2);
        assert_eq!(
            defects[0],
            CatalogDefect::EmptyStory {
                story_id: "empty".to_owned()
            }
        );
        assert!(matches!(
            defects[1],
            CatalogDefect::PopularityOutOfRange { popularity, .. } if (popularity - 140.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_reachable_chapters_follow_offered_choices_only() {
        // Arrange: c3 is only linked from an ending chapter, c4 from nowhere.
        let mut ending = chapter("c2", vec![choice("back", "c3")]);
        ending.is_ending = Some(true);
        let s = story(
            "graph",
            vec![
                chapter("c1", vec![choice("a", "c2")]),
                ending,
                chapter("c3", vec![]),
                chapter("c4", vec![]),
            ],
        );

        // Act
        let reachable = reachable_chapters(&s);
        let unreachable = unreachable_chapters(&s);

        // Assert
        assert_eq!(reachable.into_iter().collect::<Vec<_>>(), vec!["c1", "c2"]);
        assert_eq!(unreachable, vec!["c3", "c4"]);
    }

    #[test]
    fn test_every_reachable_chapter_exists_in_valid_story() {
        let s = story(
            "loop",
            vec![
                chapter("c1", vec![choice("a", "c2"), choice("b", "c3")]),
                chapter("c2", vec![choice("back", "c1")]),
                chapter("c3", vec![]),
            ],
        );

        assert!(validate_stories(std::slice::from_ref(&s)).is_empty());
        for id in reachable_chapters(&s) {
            assert!(s.find_chapter(id).is_some());
        }
    }
}
