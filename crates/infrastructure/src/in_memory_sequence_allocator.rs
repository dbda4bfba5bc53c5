use std::collections::HashMap;

use async_trait::async_trait;
use shiftcheck_application::SequenceAllocator;
use shiftcheck_core::AppResult;
use tokio::sync::RwLock;

/// In-memory sequence allocator for tests and local development.
#[derive(Debug, Default)]
pub struct InMemorySequenceAllocator {
    counters: RwLock<HashMap<String, i64>>,
}

impl InMemorySequenceAllocator {
    /// Creates an allocator with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SequenceAllocator for InMemorySequenceAllocator {
    async fn next_sequence(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<i64> {
        let mut counters = self.counters.write().await;
        let counter = counters
            .entry(format!("{form_id}__{date_key}__{staff_key}"))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[cfg(test)]
mod tests {
    use shiftcheck_application::SequenceAllocator;

    use super::InMemorySequenceAllocator;

    #[tokio::test]
    async fn counters_are_independent_per_triple() {
        let allocator = InMemorySequenceAllocator::new();

        let first = allocator
            .next_sequence("daily", "alex jones__pat smith", "2025-09-18")
            .await
            .unwrap_or_else(|_| unreachable!());
        let second = allocator
            .next_sequence("daily", "alex jones__pat smith", "2025-09-18")
            .await
            .unwrap_or_else(|_| unreachable!());
        let other_window = allocator
            .next_sequence("daily", "alex jones__pat smith", "2025-09-19")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(other_window, 1);
    }
}
