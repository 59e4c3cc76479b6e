//! Deterministic sibling ordering for comment forests.
//!
//! Siblings are ordered by ascending logical timestamp at every level. The
//! sort is stable, so equal timestamps keep their input order, and it never
//! touches the forest it reads from.

use super::comment_tree::CommentForest;

impl<'a> CommentForest<'a> {
    /// Return a copy of the forest with every sibling list ordered oldest first.
    ///
    /// Missing or unparseable timestamps order as epoch zero. Sorting an
    /// already sorted forest yields the same forest.
    #[must_use]
    pub fn sorted_by_timestamp(&self) -> Self {
        let mut sorted = self.clone();
        let keys: Vec<i64> = sorted
            .slots
            .iter()
            .map(|slot| slot.comment.timestamp.sort_key())
            .collect();
        let key_of = |position: &usize| keys.get(*position).copied().unwrap_or_default();

        sorted.roots.sort_by_key(key_of);
        for slot in &mut sorted.slots {
            slot.children.sort_by_key(key_of);
        }
        sorted
    }
}
