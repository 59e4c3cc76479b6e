//! Feed state store: the single mutable record of posts and comments.
//!
//! Posts are kept most-recent-first. Each mutation runs to completion on
//! `&mut self`, so no caller can observe a partially applied post or comment.

use tracing::debug;

use super::ids::PostId;
use super::likes::{LikeDirection, LikeTarget};
use super::post::{Comment, Post};

/// Ordered posts with their flat comment lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStore {
    posts: Vec<Post>,
}

impl FeedStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts in display order (most recent first).
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Look up a post by id.
    #[must_use]
    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }

    /// Install a complete post list, discarding all prior state.
    pub fn replace(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    /// Put a newly published post at the front of the feed.
    pub fn prepend_post(&mut self, post: Post) {
        self.posts.insert(0, post);
    }

    /// Add a comment to a post's flat list.
    ///
    /// Returns `false` when the post is unknown; the comment is dropped. A
    /// comment whose id is already present replaces the stored record.
    pub fn append_comment(&mut self, post_id: &PostId, comment: Comment) -> bool {
        let Some(post) = self.posts.iter_mut().find(|post| &post.id == post_id) else {
            debug!(%post_id, comment_id = %comment.id, "dropping comment for unknown post");
            return false;
        };

        match post
            .comments
            .iter_mut()
            .find(|existing| existing.id == comment.id)
        {
            Some(existing) => *existing = comment,
            None => post.comments.push(comment),
        }
        true
    }

    /// Whether the store holds the targeted post or comment.
    #[must_use]
    pub fn contains(&self, target: &LikeTarget) -> bool {
        match target {
            LikeTarget::Post(id) => self.post(id).is_some(),
            LikeTarget::Comment(id) => self
                .posts
                .iter()
                .any(|post| post.comments.iter().any(|comment| &comment.id == id)),
        }
    }

    /// Adjust the like count of one post or comment by exactly one.
    ///
    /// Comments are found by scanning every post's flat list regardless of
    /// nesting. At most one record changes; decrements saturate at zero.
    /// Returns whether a record was found.
    pub fn update_like_count(&mut self, target: &LikeTarget, direction: LikeDirection) -> bool {
        let counter = match target {
            LikeTarget::Post(id) => self
                .posts
                .iter_mut()
                .find(|post| &post.id == id)
                .map(|post| &mut post.like_count),
            LikeTarget::Comment(id) => self
                .posts
                .iter_mut()
                .flat_map(|post| post.comments.iter_mut())
                .find(|comment| &comment.id == id)
                .map(|comment| &mut comment.like_count),
        };

        let Some(count) = counter else {
            debug!(
                target_id = target.id(),
                target_kind = target.kind().as_str(),
                "like count update found no record"
            );
            return false;
        };
        *count = match direction {
            LikeDirection::Increment => count.saturating_add(1),
            LikeDirection::Decrement => count.saturating_sub(1),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comment_tree::CommentForest;
    use crate::domain::ids::CommentId;
    use crate::domain::test_fixtures::{comment, comment_on, post};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> FeedStore {
        let mut store = FeedStore::new();
        store.replace(vec![
            post("p1", vec![comment("c1", None, 10)]),
            post("p2", vec![comment_on("p2", "d1", None, 1)]),
        ]);
        store
    }

    fn post_ids(store: &FeedStore) -> Vec<String> {
        store.posts().iter().map(|post| post.id.to_string()).collect()
    }

    #[rstest]
    fn replace_overwrites_prior_state(mut store: FeedStore) {
        store.replace(vec![post("p9", Vec::new())]);
        assert_eq!(post_ids(&store), vec!["p9"]);
    }

    #[rstest]
    fn new_posts_go_to_the_front(mut store: FeedStore) {
        store.prepend_post(post("p3", Vec::new()));
        assert_eq!(post_ids(&store), vec!["p3", "p1", "p2"]);
    }

    #[rstest]
    fn appended_comment_joins_its_thread_on_rederivation(mut store: FeedStore) {
        let appended = store.append_comment(&PostId::from("p1"), comment("c9", Some("c1"), 20));
        assert!(appended);

        let p1 = store.post(&PostId::from("p1")).expect("p1");
        let forest = CommentForest::build(&p1.comments).sorted_by_timestamp();
        let root = forest.roots().next().expect("c1 root");
        let children: Vec<String> = root
            .children()
            .map(|node| node.comment().id.to_string())
            .collect();
        assert_eq!(root.comment().id.as_str(), "c1");
        assert_eq!(children, vec!["c9"]);
    }

    #[rstest]
    fn comment_for_unknown_post_is_a_noop(mut store: FeedStore) {
        let before = store.clone();
        let appended = store.append_comment(&PostId::from("missing"), comment("c9", None, 1));
        assert!(!appended);
        assert_eq!(store, before);
    }

    #[rstest]
    fn redelivered_comment_replaces_existing_record(mut store: FeedStore) {
        let mut edited = comment("c1", None, 10);
        edited.content = "edited".to_owned();
        assert!(store.append_comment(&PostId::from("p1"), edited));

        let p1 = store.post(&PostId::from("p1")).expect("p1");
        assert_eq!(p1.comments.len(), 1);
        assert_eq!(
            p1.comment(&CommentId::from("c1")).expect("c1").content,
            "edited"
        );
    }

    #[rstest]
    #[case::post(LikeTarget::Post(PostId::from("p2")))]
    #[case::comment(LikeTarget::Comment(CommentId::from("d1")))]
    fn like_counts_move_by_exactly_one(mut store: FeedStore, #[case] target: LikeTarget) {
        assert!(store.update_like_count(&target, LikeDirection::Increment));
        assert!(store.update_like_count(&target, LikeDirection::Increment));
        assert!(store.update_like_count(&target, LikeDirection::Decrement));

        let count = match &target {
            LikeTarget::Post(id) => store.post(id).expect("post").like_count,
            LikeTarget::Comment(id) => store
                .posts()
                .iter()
                .find_map(|post| post.comment(id))
                .expect("comment")
                .like_count,
        };
        assert_eq!(count, 1);
        assert_eq!(store.post(&PostId::from("p1")).expect("p1").like_count, 0);
    }

    #[rstest]
    fn decrement_saturates_at_zero(mut store: FeedStore) {
        let target = LikeTarget::Post(PostId::from("p1"));
        assert!(store.update_like_count(&target, LikeDirection::Decrement));
        assert_eq!(store.post(&PostId::from("p1")).expect("p1").like_count, 0);
    }

    #[rstest]
    fn unknown_target_reports_not_found(mut store: FeedStore) {
        let before = store.clone();
        let target = LikeTarget::Comment(CommentId::from("ghost"));
        assert!(!store.update_like_count(&target, LikeDirection::Increment));
        assert!(!store.contains(&target));
        assert_eq!(store, before);
    }
}
