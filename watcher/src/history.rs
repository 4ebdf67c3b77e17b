use std::collections::VecDeque;

/// Number of floor values retained per collection.
pub const HISTORY_LEN: usize = 5;

/// Fixed-length floor history, newest first.
///
/// Starts as all zeros and never changes length: every push drops the oldest value.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorHistory {
    values: VecDeque<f64>,
}

impl Default for FloorHistory {
    fn default() -> Self {
        Self {
            values: VecDeque::from(vec![0.0; HISTORY_LEN]),
        }
    }
}

impl FloorHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, floor: f64) {
        self.values.push_front(floor);
        self.values.truncate(HISTORY_LEN);
    }

    /// Most recent floor (0 until the first push).
    pub fn latest(&self) -> f64 {
        self.values.front().copied().unwrap_or_default()
    }

    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
