use serde::Serialize;

/// Progress of a conversion run, reported after every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// Number of items processed so far, failures included
    pub completed: usize,
    /// Total number of items in the batch
    pub total: usize,
    /// Progress percentage (0-100)
    pub percentage: usize,
    /// Name of the item just processed
    pub current_item: String,
    /// Number of failed items so far
    pub failed: usize,
}

impl BatchProgress {
    pub fn new(completed: usize, total: usize, current_item: &str, failed: usize) -> Self {
        let percentage = if total > 0 {
            (completed * 100) / total
        } else {
            0
        };

        Self {
            completed,
            total,
            percentage,
            current_item: current_item.to_string(),
            failed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}
