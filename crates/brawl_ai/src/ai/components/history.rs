//! RingHistory: bounded history, newest-first.
//!
//! Вставка при полном буфере вытесняет самую старую запись.
//! Capacity фиксирована на создании: per-frame cost не растёт с длиной матча.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct RingHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingHistory<T> {
    /// Capacity 0 поднимается до 1
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_back();
        }
        self.items.push_front(item);
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Итерация от новых к старым
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Доля элементов, удовлетворяющих predicate (0.0 для пустого буфера)
    pub fn ratio(&self, predicate: impl Fn(&T) -> bool) -> f32 {
        if self.items.is_empty() {
            return 0.0;
        }
        let hits = self.items.iter().filter(|item| predicate(item)).count();
        hits as f32 / self.items.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_newest_first() {
        let mut history = RingHistory::with_capacity(3);
        history.push(1);
        history.push(2);
        history.push(3);
        history.push(4);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2]);
        assert_eq!(history.newest(), Some(&4));
    }

    #[test]
    fn test_ratio_empty_is_zero() {
        let history: RingHistory<u8> = RingHistory::with_capacity(4);
        assert_eq!(history.ratio(|_| true), 0.0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut history = RingHistory::with_capacity(0);
        history.push('a');
        history.push('b');
        assert_eq!(history.len(), 1);
        assert_eq!(history.newest(), Some(&'b'));
    }

    proptest! {
        /// Property: длина никогда не превышает capacity, порядок newest-first
        #[test]
        fn prop_bounded_and_ordered(
            capacity in 1usize..32,
            values in prop::collection::vec(any::<u32>(), 0..200),
        ) {
            let mut history = RingHistory::with_capacity(capacity);
            for value in &values {
                history.push(*value);
                prop_assert!(history.len() <= capacity);
            }
            let expected: Vec<u32> = values.iter().rev().take(capacity).copied().collect();
            let actual: Vec<u32> = history.iter().copied().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
