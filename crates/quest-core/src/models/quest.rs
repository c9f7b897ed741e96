//! Quest, review and joined records

use serde::{Deserialize, Serialize};

/// A quest as published by the catalog backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique quest identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
}

impl Quest {
    pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A review as published by the review backend.
///
/// `quest_id` references [`Quest::id`] but the review backend does not
/// enforce it, and `rating` is carried as-is (nominally 1-5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestReview {
    /// Quest this review belongs to
    pub quest_id: i64,
    /// Reviewer comment
    pub comment: String,
    /// Rating, not validated
    pub rating: i32,
}

impl QuestReview {
    pub fn new(quest_id: i64, comment: impl Into<String>, rating: i32) -> Self {
        Self {
            quest_id,
            comment: comment.into(),
            rating,
        }
    }
}

/// A quest enriched with the reviews that reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedQuest {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Reviews whose `quest_id` equals `id`, in review-source order
    pub reviews: Vec<QuestReview>,
}

impl AggregatedQuest {
    /// Attach `reviews` to `quest`
    pub fn from_quest(quest: Quest, reviews: Vec<QuestReview>) -> Self {
        Self {
            id: quest.id,
            title: quest.title,
            description: quest.description,
            reviews,
        }
    }
}
