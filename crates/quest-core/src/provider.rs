//! ResourceProvider trait - the data source a backend serves from

use async_trait::async_trait;

use crate::error::QuestResult;

/// A read-only source of records.
///
/// Backends serve whatever their provider lists; the gateway never talks
/// to a provider directly, only to the HTTP surface in front of it.
#[async_trait]
pub trait ResourceProvider<T>: Send + Sync {
    /// List every record, in source order
    async fn list(&self) -> QuestResult<Vec<T>>;
}

/// Provider backed by a fixed in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticProvider<T> {
    records: Vec<T>,
}

impl<T> StaticProvider<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl<T> ResourceProvider<T> for StaticProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn list(&self) -> QuestResult<Vec<T>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quest;

    #[tokio::test]
    async fn test_static_provider_preserves_order() {
        let provider = StaticProvider::new(vec![
            Quest::new(2, "Pirate Treasure Hunt", "b"),
            Quest::new(1, "Haunted Mansion", "a"),
        ]);
        let quests = provider.list().await.unwrap();
        assert_eq!(quests.iter().map(|q| q.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(provider.len(), 2);
    }
}
