use quantstream_core::IndicatorError;

/// Fixed-capacity ring of samples.
///
/// Once full, each push overwrites the oldest slot in place and hands the
/// evicted value back, so window indicators never shift memory.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    capacity: usize,
    data: Vec<T>,
    /// Slot holding the oldest sample; only moves once the buffer is full.
    head: usize,
}

impl<T: Copy> CircularBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self, IndicatorError> {
        if capacity == 0 {
            return Err(IndicatorError::InvalidCapacity);
        }
        Ok(Self::with_capacity(capacity))
    }

    /// Callers must have validated `capacity >= 1`.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            data: Vec::with_capacity(capacity),
            head: 0,
        }
    }

    /// Append a value. Returns the evicted oldest value when full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(value);
            return None;
        }
        let evicted = std::mem::replace(&mut self.data[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Value at `index`, counted from oldest (0) to newest (`len() - 1`).
    pub fn at(&self, index: usize) -> Option<T> {
        if index >= self.data.len() {
            return None;
        }
        Some(self.data[(self.head + index) % self.data.len()])
    }

    pub fn newest(&self) -> Option<T> {
        self.len().checked_sub(1).and_then(|i| self.at(i))
    }

    pub fn oldest(&self) -> Option<T> {
        self.at(0)
    }

    pub fn filled(&self) -> bool {
        self.data.len() == self.capacity
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

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newer, older) = self.data.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Snapshot in arrival order, oldest first.
    pub fn values(&self) -> Vec<T> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }
}
