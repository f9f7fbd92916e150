use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub my_votes: Vec<u64>,
}

impl Choice {
    /// True when the server marked this choice as the viewer's own pick.
    pub fn has_my_vote(&self) -> bool {
        !self.my_votes.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Poll {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub date_created: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Poll {
    pub fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.questions.iter().flat_map(|q| q.choices.iter())
    }
}

/// `GET /polls/` answers either with a bare array or with a paginated
/// envelope. Both collapse into a plain `Vec<Poll>` via [`PollList::into_polls`].
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum PollList {
    Page { results: Vec<Poll> },
    Bare(Vec<Poll>),
}

impl PollList {
    pub fn into_polls(self) -> Vec<Poll> {
        match self {
            PollList::Page { results } => results,
            PollList::Bare(polls) => polls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL_JSON: &str = r#"{
        "id": 1,
        "title": "Witcher trivia",
        "date_created": "2025-03-14T09:26:53.589793Z",
        "questions": [
            {
                "id": 10,
                "text": "Best sword?",
                "choices": [
                    {"id": 5, "text": "Silver", "vote_count": 3, "percentage": 75.0, "my_votes": [41]},
                    {"id": 6, "text": "Steel", "vote_count": 1, "percentage": 25.0, "my_votes": []}
                ]
            }
        ]
    }"#;

    #[test]
    fn decodes_bare_array() {
        let body = format!("[{POLL_JSON}]");
        let polls = serde_json::from_str::<PollList>(&body).unwrap().into_polls();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].questions[0].choices.len(), 2);
        assert!(polls[0].questions[0].choices[0].has_my_vote());
        assert!(!polls[0].questions[0].choices[1].has_my_vote());
    }

    #[test]
    fn decodes_paginated_envelope() {
        let body = format!(r#"{{"count": 1, "next": null, "previous": null, "results": [{POLL_JSON}]}}"#);
        let polls = serde_json::from_str::<PollList>(&body).unwrap().into_polls();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].title, "Witcher trivia");
        assert!(polls[0].date_created.is_some());
    }

    #[test]
    fn stats_and_markers_are_optional() {
        let choice: Choice = serde_json::from_str(r#"{"id": 9, "text": "Roach"}"#).unwrap();
        assert_eq!(choice.vote_count, None);
        assert_eq!(choice.percentage, None);
        assert!(!choice.has_my_vote());
    }

    #[test]
    fn rejects_unknown_shape() {
        assert!(serde_json::from_str::<PollList>(r#"{"polls": []}"#).is_err());
    }
}
