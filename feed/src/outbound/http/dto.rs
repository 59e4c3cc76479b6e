//! JSON envelopes for the feed REST endpoints.
//!
//! Post records decode straight into domain types; only the envelopes live
//! here.

use serde::{Deserialize, Serialize};

use crate::domain::{LikeTarget, Post, TargetKind, UserId};

#[derive(Debug, Deserialize)]
pub(super) struct FeedResponseDto {
    pub(super) success: bool,
    #[serde(default)]
    pub(super) posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LikeRequestDto<'a> {
    pub(super) user_id: &'a UserId,
    pub(super) target_id: &'a str,
    pub(super) target_type: TargetKind,
}

impl<'a> LikeRequestDto<'a> {
    pub(super) fn new(user_id: &'a UserId, target: &'a LikeTarget) -> Self {
        Self {
            user_id,
            target_id: target.id(),
            target_type: target.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommentId;
    use rstest::rstest;

    #[rstest]
    fn like_request_uses_camel_case_keys() {
        let user = UserId::from("user");
        let target = LikeTarget::Comment(CommentId::from("c7"));
        let value = serde_json::to_value(LikeRequestDto::new(&user, &target)).expect("encode");
        insta::assert_json_snapshot!(value, @r#"
        {
          "targetId": "c7",
          "targetType": "comment",
          "userId": "user"
        }
        "#);
    }

    #[rstest]
    fn missing_posts_default_to_empty() {
        let dto: FeedResponseDto =
            serde_json::from_str(r#"{"success": false}"#).expect("decode envelope");
        assert!(!dto.success);
        assert!(dto.posts.is_empty());
    }
}
