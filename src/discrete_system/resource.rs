use std::collections::VecDeque;

/// Capacity-bounded mutual exclusion with a FIFO wait queue.
///
/// The resource is passive: it never schedules anything itself. A station
/// calls `acquire` when a request arrives and `release` when service ends,
/// both from inside its own event handler, which is what makes grant order
/// deterministic. Every `acquire` must be matched by exactly one `release`.
#[derive(Debug)]
pub struct Resource<T> {
    capacity: usize,
    in_service: usize,
    waiting: VecDeque<T>,
}

impl<T> Resource<T> {
    /// Capacity must be positive; a zero-capacity resource could never grant.
    pub fn new(capacity: usize) -> Resource<T> {
        assert!(capacity > 0, "resource capacity must be positive");

        Resource {
            capacity,
            in_service: 0,
            waiting: VecDeque::new(),
        }
    }

    /// Admits the waiter immediately (returning it) when a slot is free,
    /// otherwise appends it to the wait queue and returns `None`.
    pub fn acquire(&mut self, waiter: T) -> Option<T> {
        if self.in_service < self.capacity {
            self.in_service += 1;

            Some(waiter)
        } else {
            self.waiting.push_back(waiter);

            None
        }
    }

    /// Frees one slot and admits the longest-waiting entry, if any, keeping
    /// the grant inside the same event step as the release.
    pub fn release(&mut self) -> Option<T> {
        assert!(
            self.in_service > 0,
            "release without a matching acquire"
        );

        self.in_service -= 1;

        let next = self.waiting.pop_front();

        if next.is_some() {
            self.in_service += 1;
        }

        next
    }

    /// Number of requests waiting, excluding those in service. This is the
    /// queue length the histograms sample.
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Waiting plus in-service requests, used for shortest-queue selection.
    pub fn load(&self) -> usize {
        self.waiting.len() + self.in_service
    }
}
