use serde::{Deserialize, Serialize};

use crate::base::{lenient, strip_keys, BaseFields, Extra};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub base: BaseFields,
    pub place_id: String,
    pub user_id: String,
    pub text: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewReview {
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewReview {
    /// `text` is checked before `user_id`; the author's existence is the
    /// caller's concern.
    pub fn into_review(self, place_id: &str) -> Result<Review, ModelError> {
        let text = self.text.ok_or(ModelError::Missing("text"))?;
        let user_id = self.user_id.ok_or(ModelError::Missing("user_id"))?;
        let mut extra = self.extra;
        strip_keys(&mut extra, ReviewPatch::IGNORED);
        Ok(Review { base: BaseFields::new(), place_id: place_id.to_string(), user_id, text, extra })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewPatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ReviewPatch {
    pub const IGNORED: &'static [&'static str] =
        &["id", "created_at", "updated_at", "__class__", "user_id", "place_id"];

    pub fn apply(self, review: &mut Review) {
        if let Some(text) = self.text {
            review.text = text;
        }
        let mut extra = self.extra;
        strip_keys(&mut extra, Self::IGNORED);
        review.extra.extend(extra);
        review.base.touch();
    }
}
