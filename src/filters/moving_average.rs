use std::collections::VecDeque;
use super::SignalFilter;

/// Moving average over the last `window_size` samples.
///
/// The window is a FIFO: once full, each new sample evicts the oldest one.
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Configured capacity of the window
    pub const fn capacity(&self) -> usize {
        self.window_size
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True once the window holds `capacity()` samples
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.window_size
    }

    /// Samples in insertion order, oldest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.buffer.iter().copied()
    }

    /// Mean of the current contents, `None` while empty
    pub fn mean(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer.iter().sum::<f64>() / self.buffer.len() as f64)
        }
    }
}

impl SignalFilter for MovingAverageFilter {
    fn apply(&mut self, value: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);

        self.buffer.iter().sum::<f64>() / self.buffer.len() as f64
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let mut filter = MovingAverageFilter::new(3);

        assert_eq!(filter.apply(10.0), 10.0);
        assert_eq!(filter.apply(20.0), 15.0);
        assert_eq!(filter.apply(30.0), 20.0);

        // Window is full, oldest value should be dropped
        assert_eq!(filter.apply(40.0), 30.0);
        assert_eq!(filter.samples().collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut filter = MovingAverageFilter::new(5);
        for i in 0..50 {
            filter.apply(f64::from(i));
            assert!(filter.len() <= 5);
        }
        assert!(filter.is_full());
        assert_eq!(filter.samples().next(), Some(45.0));
    }

    #[test]
    fn test_reset_clears_window() {
        let mut filter = MovingAverageFilter::new(3);
        filter.apply(1.0);
        filter.apply(2.0);
        filter.reset();
        assert!(filter.is_empty());
        assert_eq!(filter.mean(), None);
        assert_eq!(filter.apply(7.0), 7.0);
    }
}
