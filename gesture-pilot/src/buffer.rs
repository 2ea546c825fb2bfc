//! Fixed-capacity ring buffer
//!
//! Backs the smoother's classification window and the vehicle's command
//! log. Once full, each push overwrites the oldest entry.

/// Rolling buffer that keeps the last `capacity` items in chronological order
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Slot storage, grows up to `capacity` then wraps
    data: Vec<T>,

    /// Maximum number of retained items
    capacity: usize,

    /// Current write position (points to next slot to write)
    write_index: usize,
}

impl<T> RingBuffer<T> {
    /// Capacity is raised to 1 if zero is passed
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            write_index: 0,
        }
    }

    /// Push a new item, evicting the oldest when full
    pub fn push(&mut self, item: T) {
        if self.data.len() < self.capacity {
            self.data.push(item);
        } else {
            self.data[self.write_index] = item;
        }
        self.write_index = (self.write_index + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest
    ///
    /// Until the first wrap `write_index == len`, so the leading slice is
    /// empty and this degrades to a plain forward walk.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let split = self.write_index.min(self.data.len());
        self.data[split..].iter().chain(self.data[..split].iter())
    }

    /// The most recent `n` items, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.len().saturating_sub(n);
        self.iter().skip(skip)
    }

    /// Most recently pushed item
    pub fn latest(&self) -> Option<&T> {
        if self.data.is_empty() {
            return None;
        }
        let idx = (self.write_index + self.capacity - 1) % self.capacity;
        self.data.get(idx)
    }

    /// Clear the buffer (useful on reset)
    pub fn clear(&mut self) {
        self.data.clear();
        self.write_index = 0;
    }
}
