//! Data transfer types for the trivia API.
//!
//! JSON field names are camelCase (`clueValue`, `gameDate`,
//! `canonicalTopic`) and must stay exactly as-is for API compatibility
//! with existing frontend clients.

use serde::{Deserialize, Serialize};

/// A trivia clue joined with its canonical topic.
///
/// Clues are read-only: they are sourced from the trivia corpus and never
/// mutated by this backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    /// The prompt shown to the player.
    pub question: String,
    /// The expected response.
    pub answer: String,
    /// Display value of the clue, e.g. `"$200"`.
    pub clue_value: String,
    /// Display name of the round the clue appeared in.
    pub round: String,
    /// Air date of the source game (display string).
    pub game_date: String,
    /// The canonical topic the clue's raw category maps onto.
    pub canonical_topic: String,
}

/// A user-submitted pass/fail event for one canonical topic.
///
/// Entries are append-only and accepted verbatim: the topic string is not
/// validated against the canonical topic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatEntry {
    /// Canonical topic the user was quizzed on.
    pub canonical_topic: String,
    /// Whether the user passed the prompt.
    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_serializes_camel_case() {
        let clue = Clue {
            question: "It orbits the Sun".to_string(),
            answer: "Earth".to_string(),
            clue_value: "$200".to_string(),
            round: "Jeopardy!".to_string(),
            game_date: "2020-01-01".to_string(),
            canonical_topic: "Science & Nature".to_string(),
        };

        let json = serde_json::to_value(&clue).unwrap();
        let obj = json.as_object().unwrap();
        for field in [
            "question",
            "answer",
            "clueValue",
            "round",
            "gameDate",
            "canonicalTopic",
        ] {
            assert!(obj.contains_key(field), "missing field {field}");
        }
        assert_eq!(obj.len(), 6);
    }

    #[test]
    fn test_stat_entry_round_trip() {
        let json = r#"{"canonicalTopic":"World History","passed":false}"#;
        let entry: StatEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.canonical_topic, "World History");
        assert!(!entry.passed);

        let back = serde_json::to_string(&entry).unwrap();
        assert_eq!(back, json);
    }
}
