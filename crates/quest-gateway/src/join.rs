//! Enrichment join of reviews onto quests

use std::collections::{HashMap, HashSet};

use quest_core::{AggregatedQuest, Quest, QuestReview};

/// Result of joining reviews onto quests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// Quests in catalog order, each with its matching reviews
    pub quests: Vec<AggregatedQuest>,
    /// Reviews whose quest id matched no quest
    pub orphaned_reviews: usize,
}

/// Attach to every quest the reviews carrying its id.
///
/// Driven by the quest sequence: output order is catalog order and each
/// quest's reviews keep their relative order from `reviews`. Quests without
/// reviews get an empty list. Reviews that reference no known quest are left
/// out and only counted.
pub fn join_reviews(quests: Vec<Quest>, reviews: Vec<QuestReview>) -> Joined {
    let mut by_quest: HashMap<i64, Vec<QuestReview>> = HashMap::new();
    for review in reviews {
        by_quest.entry(review.quest_id).or_default().push(review);
    }

    let known: HashSet<i64> = quests.iter().map(|q| q.id).collect();
    let orphaned_reviews = by_quest
        .iter()
        .filter(|(quest_id, _)| !known.contains(quest_id))
        .map(|(_, group)| group.len())
        .sum();

    let quests = quests
        .into_iter()
        .map(|quest| {
            let reviews = by_quest.get(&quest.id).cloned().unwrap_or_default();
            AggregatedQuest::from_quest(quest, reviews)
        })
        .collect();

    Joined {
        quests,
        orphaned_reviews,
    }
}
