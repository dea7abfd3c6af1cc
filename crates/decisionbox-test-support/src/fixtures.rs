//! Story fixtures shared by the traversal, session and app tests.

use decisionbox_content::{Catalog, Chapter, Choice, EndingType, Story};

/// Builds a choice with no popularity figure.
#[must_use]
pub fn choice(id: &str, next_chapter_id: &str) -> Choice {
    Choice {
        id: id.to_owned(),
        text: format!("Continue to {next_chapter_id}"),
        next_chapter_id: next_chapter_id.to_owned(),
        popularity: None,
    }
}

/// Builds a non-ending chapter with the given choices.
#[must_use]
pub fn chapter(id: &str, choices: Vec<Choice>) -> Chapter {
    Chapter {
        id: id.to_owned(),
        title: format!("Chapter {id}"),
        content: format!("The text of {id}."),
        choices,
        is_ending: None,
        ending_type: None,
    }
}

/// Builds a chapter flagged as an ending.
#[must_use]
pub fn ending(id: &str, ending_type: EndingType) -> Chapter {
    Chapter {
        is_ending: Some(true),
        ending_type: Some(ending_type),
        ..chapter(id, Vec::new())
    }
}

/// Builds a story around the given chapters.
#[must_use]
pub fn story(id: &str, chapters: Vec<Chapter>) -> Story {
    Story {
        id: id.to_owned(),
        title: format!("Story {id}"),
        description: String::new(),
        author: "Fixture".to_owned(),
        cover_image: None,
        chapters,
        estimated_read_time: 10,
    }
}

/// `demo`: `c1 --a--> c2`, where `c2` is a good ending.
#[must_use]
pub fn demo_story() -> Story {
    story(
        "demo",
        vec![
            chapter("c1", vec![choice("a", "c2")]),
            ending("c2", EndingType::Good),
        ],
    )
}

/// `linear`: four chapters in a row, `c4` a bad ending.
#[must_use]
pub fn linear_story() -> Story {
    story(
        "linear",
        vec![
            chapter("c1", vec![choice("next", "c2")]),
            chapter("c2", vec![choice("next", "c3")]),
            chapter("c3", vec![choice("next", "c4")]),
            ending("c4", EndingType::Bad),
        ],
    )
}

/// `lighthouse`: a fork at `c1`.
///
/// - `climb` leads to `top`, an ending that still lists a choice.
/// - `wait` leads to `shore`, then `dawn`, which has no choices and no
///   ending type.
#[must_use]
pub fn lighthouse_story() -> Story {
    let mut top = ending("top", EndingType::Neutral);
    top.choices.push(choice("descend", "c1"));
    story(
        "lighthouse",
        vec![
            chapter("c1", vec![choice("climb", "top"), choice("wait", "shore")]),
            top,
            chapter("shore", vec![choice("sleep", "dawn")]),
            chapter("dawn", Vec::new()),
        ],
    )
}

/// A validated catalog of `demo`, `linear` and `lighthouse`.
///
/// # Panics
///
/// Panics if the fixtures stop validating, which is a fixture bug.
#[must_use]
pub fn catalog() -> Catalog {
    Catalog::from_stories(vec![demo_story(), linear_story(), lighthouse_story()])
        .expect("fixture stories are valid")
}

/// The `demo` catalog serialized the way the bundled dataset is shipped.
///
/// # Panics
///
/// Panics if serialization fails, which cannot happen for these types.
#[must_use]
pub fn catalog_json() -> String {
    let stories = vec![demo_story(), linear_story(), lighthouse_story()];
    let document = serde_json::json!({ "stories": stories });
    serde_json::to_string_pretty(&document).expect("fixture stories serialize")
}
