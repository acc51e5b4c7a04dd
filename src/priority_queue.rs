use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Integer priority; lower values are popped first.
pub type Priority = usize;

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    priority: Priority,
    sequence: u64,
    item: T,
}

// Only priority and insertion order take part in the ordering, so the item needs no `Ord`.
impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> Ord for HeapEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest priority, oldest entry first
        other.priority
             .cmp(&self.priority)
             .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A binary min-heap of items keyed by an integer priority.
///
/// Equal priorities come out in the order they went in. The same item may be pushed any number of
/// times; every push is a separate entry.
#[derive(Debug, Clone)]
pub struct MinPriorityQueue<T> {
    heap: BinaryHeap<HeapEntry<T>>,
    next_sequence: u64,
}

impl<T> MinPriorityQueue<T> {
    pub fn new() -> MinPriorityQueue<T> {
        MinPriorityQueue::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> MinPriorityQueue<T> {
        MinPriorityQueue {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, item: T, priority: Priority) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(HeapEntry {
            priority: priority,
            sequence: sequence,
            item: item,
        });
    }

    /// Remove the entry with the lowest priority.
    pub fn pop(&mut self) -> Option<T> {
        self.pop_with_priority().map(|(item, _)| item)
    }

    pub fn pop_with_priority(&mut self) -> Option<(T, Priority)> {
        self.heap.pop().map(|entry| (entry.item, entry.priority))
    }

    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek().map(|entry| entry.priority)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }
}

impl<T> Default for MinPriorityQueue<T> {
    fn default() -> Self {
        MinPriorityQueue::new()
    }
}
