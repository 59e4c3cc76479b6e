//! Derives a forest of comment threads from a flat comment list.
//!
//! The forest is an arena: each comment occupies one slot and parent/child
//! relationships are slot indices resolved at build time. It borrows the
//! comments it was built from and is rebuilt on every render; it is never a
//! source of truth.
//!
//! Building takes two passes because a reply may precede its parent in the
//! flat list. Every distinct comment id ends up in exactly one place: either
//! as a root or as the child of exactly one other comment.

use std::collections::HashMap;

use tracing::debug;

use super::ids::CommentId;
use super::post::Comment;

#[derive(Debug, Clone)]
pub(crate) struct ForestSlot<'a> {
    pub(crate) comment: &'a Comment,
    pub(crate) children: Vec<usize>,
}

/// Ordered collection of comment trees for one post.
#[derive(Debug, Clone)]
pub struct CommentForest<'a> {
    pub(crate) slots: Vec<ForestSlot<'a>>,
    pub(crate) roots: Vec<usize>,
}

/// One comment in a pre-order walk together with its nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthEntry<'a> {
    /// Zero for top-level comments.
    pub depth: u32,
    /// The comment at this position.
    pub comment: &'a Comment,
}

impl<'a> CommentForest<'a> {
    /// Build the forest for one post's flat comment list.
    ///
    /// Comments whose parent id is absent from `comments` become roots. When
    /// an id repeats, the first record wins and later ones are skipped.
    /// Parent cycles are broken by promoting the earliest unreachable member
    /// to a root; the remaining members stay beneath whoever claimed them.
    ///
    /// # Examples
    /// ```
    /// use feed::domain::CommentForest;
    ///
    /// let forest = CommentForest::build(&[]);
    /// assert!(forest.is_empty());
    /// ```
    #[must_use]
    pub fn build(comments: &'a [Comment]) -> Self {
        let mut index: HashMap<&'a CommentId, usize> = HashMap::with_capacity(comments.len());
        let mut slots = Vec::with_capacity(comments.len());
        for comment in comments {
            if index.contains_key(&comment.id) {
                debug!(comment_id = %comment.id, "skipping duplicate comment record");
                continue;
            }
            index.insert(&comment.id, slots.len());
            slots.push(ForestSlot {
                comment,
                children: Vec::new(),
            });
        }

        let parents: Vec<Option<usize>> = slots
            .iter()
            .map(|slot| {
                slot.comment
                    .parent_comment_id
                    .as_ref()
                    .and_then(|parent_id| index.get(parent_id).copied())
            })
            .collect();

        let mut roots = Vec::new();
        for (position, parent) in parents.iter().enumerate() {
            match parent.and_then(|parent| slots.get_mut(parent)) {
                Some(parent_slot) => parent_slot.children.push(position),
                None => roots.push(position),
            }
        }

        let mut forest = Self { slots, roots };
        forest.promote_unreachable(&parents);
        forest
    }

    /// Number of comments in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the forest holds no comments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over the root nodes in their current order.
    pub fn roots(&self) -> impl Iterator<Item = CommentNode<'_, 'a>> + '_ {
        self.roots.iter().map(move |&position| CommentNode {
            forest: self,
            position,
        })
    }

    /// Walk the forest depth-first, parents before children.
    #[must_use]
    pub fn pre_order(&self) -> Vec<DepthEntry<'a>> {
        let mut entries = Vec::with_capacity(self.slots.len());
        let mut stack: Vec<(usize, u32)> = self.roots.iter().rev().map(|&root| (root, 0)).collect();
        while let Some((position, depth)) = stack.pop() {
            let Some(slot) = self.slots.get(position) else {
                continue;
            };
            entries.push(DepthEntry {
                depth,
                comment: slot.comment,
            });
            let child_depth = depth.saturating_add(1);
            stack.extend(slot.children.iter().rev().map(|&child| (child, child_depth)));
        }
        entries
    }

    fn promote_unreachable(&mut self, parents: &[Option<usize>]) {
        let mut reached = vec![false; self.slots.len()];
        for root in self.roots.clone() {
            self.mark_subtree(root, &mut reached);
        }

        for position in 0..self.slots.len() {
            if reached.get(position).copied().unwrap_or(true) {
                continue;
            }
            let parent = parents.get(position).copied().flatten();
            if let Some(parent_slot) = parent.and_then(|parent| self.slots.get_mut(parent)) {
                parent_slot.children.retain(|&child| child != position);
            }
            if let Some(slot) = self.slots.get(position) {
                debug!(comment_id = %slot.comment.id, "promoting comment in a parent cycle to root");
            }
            self.roots.push(position);
            self.mark_subtree(position, &mut reached);
        }
    }

    fn mark_subtree(&self, start: usize, reached: &mut [bool]) {
        let mut stack = vec![start];
        while let Some(position) = stack.pop() {
            let Some(flag) = reached.get_mut(position) else {
                continue;
            };
            if *flag {
                continue;
            }
            *flag = true;
            if let Some(slot) = self.slots.get(position) {
                stack.extend(slot.children.iter().copied());
            }
        }
    }
}

/// Borrowed view of one node in a [`CommentForest`].
#[derive(Debug, Clone, Copy)]
pub struct CommentNode<'f, 'a> {
    forest: &'f CommentForest<'a>,
    position: usize,
}

impl<'f, 'a> CommentNode<'f, 'a> {
    /// The comment stored at this node.
    #[must_use]
    pub fn comment(&self) -> &'a Comment {
        self.slot().comment
    }

    /// Iterate over this node's children in their current order.
    pub fn children(self) -> impl Iterator<Item = CommentNode<'f, 'a>> + 'f {
        let forest = self.forest;
        self.slot()
            .children
            .iter()
            .map(move |&position| CommentNode { forest, position })
    }

    // Positions are only ever handed out for slots that exist.
    #[expect(clippy::indexing_slicing, reason = "node positions are arena invariants")]
    fn slot(&self) -> &'f ForestSlot<'a> {
        &self.forest.slots[self.position]
    }
}
