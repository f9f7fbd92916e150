use crate::models::poll::Poll;
use std::collections::BTreeMap;

/// Question id to chosen choice id; one entry per question at most.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionTracker {
    choices: BTreeMap<u64, u64>,
}

impl SelectionTracker {
    /// Records `choice_id` for `question_id`, replacing any earlier pick.
    /// Ignored unless the user is signed in and has not voted yet.
    pub fn select(
        &mut self,
        question_id: u64,
        choice_id: u64,
        authenticated: bool,
        has_voted: bool,
    ) -> bool {
        if !authenticated || has_voted {
            return false;
        }
        self.choices.insert(question_id, choice_id);
        true
    }

    pub fn selected(&self, question_id: u64) -> Option<u64> {
        self.choices.get(&question_id).copied()
    }

    /// Submit gate: every question of every poll has a pick. An empty list
    /// has nothing to submit.
    pub fn all_answered(&self, polls: &[Poll]) -> bool {
        !polls.is_empty()
            && polls
                .iter()
                .flat_map(|p| p.questions.iter())
                .all(|q| self.choices.contains_key(&q.id))
    }

    /// `(question_id, choice_id)` pairs ordered by question id.
    pub fn answered(&self) -> Vec<(u64, u64)> {
        self.choices.iter().map(|(&q, &c)| (q, c)).collect()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn clear(&mut self) {
        self.choices.clear();
    }
}
