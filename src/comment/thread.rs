//! Thread reconstruction. One fetch per post, then a single index build
//! grouping children by parent id; no recursive queries against the store.

use crate::comment::model::{Comment, CommentNode};
use crate::user::model::User;
use std::collections::HashMap;
use uuid::Uuid;

/// Builds the ordered forest for a post from its full comment set (deleted
/// rows included).
///
/// Ordering is creation time ascending with the id as a stable tie-break.
/// A soft-deleted comment that still has visible descendants is kept as a
/// tombstone node (flagged `is_deleted`) so its replies stay under their
/// original parent; one without visible descendants is dropped. Derived
/// counts never include deleted rows.
pub fn build_forest(
    mut comments: Vec<Comment>,
    like_counts: &HashMap<Uuid, i64>,
    users: &HashMap<Uuid, User>,
) -> Vec<CommentNode> {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut roots = Vec::new();
    let mut children: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in comments {
        match comment.parent_comment_id {
            Some(parent) => children.entry(parent).or_default().push(comment),
            None => roots.push(comment),
        }
    }

    let mut forest: Vec<CommentNode> = roots
        .into_iter()
        .map(|c| assemble(c, &mut children, like_counts, users))
        .collect();
    forest.retain(visible);
    forest
}

fn visible(node: &CommentNode) -> bool {
    !node.is_deleted || !node.replies.is_empty()
}

fn assemble(
    comment: Comment,
    children: &mut HashMap<Uuid, Vec<Comment>>,
    like_counts: &HashMap<Uuid, i64>,
    users: &HashMap<Uuid, User>,
) -> CommentNode {
    let kids = children.remove(&comment.id).unwrap_or_default();
    let reply_count = kids.iter().filter(|k| !k.is_deleted).count() as i64;
    let mut replies: Vec<CommentNode> = kids
        .into_iter()
        .map(|k| assemble(k, children, like_counts, users))
        .collect();
    replies.retain(visible);

    CommentNode {
        id: comment.id,
        user: users.get(&comment.user_id).cloned(),
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
        is_edited: comment.is_edited,
        is_deleted: comment.is_deleted,
        like_count: like_counts.get(&comment.id).copied().unwrap_or(0),
        reply_count,
        is_reply: comment.parent_comment_id.is_some(),
        replies,
    }
}
