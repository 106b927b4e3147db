use crate::constants::EPSILON;
use nalgebra::Vector3;
use std::collections::VecDeque;

/// Fixed-capacity window of the most recent forward vectors
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    capacity: usize,
    vectors: VecDeque<Vector3<f64>>,
}

impl SmoothingWindow {
    /// Create a window holding at most `capacity` vectors (at least one)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            vectors: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a vector, evicting the oldest one when full
    pub fn push(&mut self, vector: Vector3<f64>) {
        if self.vectors.len() >= self.capacity {
            self.vectors.pop_front();
        }
        self.vectors.push_back(vector);
    }

    /// Normalized mean direction, `None` when empty or when the vectors cancel out
    #[must_use]
    pub fn mean_direction(&self) -> Option<Vector3<f64>> {
        if self.vectors.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.vectors.iter().sum();
        sum.try_normalize(EPSILON)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first view of the stored vectors
    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.vectors.iter()
    }

    pub fn clear(&mut self) {
        self.vectors.clear();
    }
}
