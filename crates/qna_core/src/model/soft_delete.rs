//! Shared soft-delete visibility filter.
//!
//! # Responsibility
//! - Provide the single "exclude deleted" rule used by every read path:
//!   aggregate accessors and repository `*_not_deleted` queries alike.
//!
//! # Invariants
//! - An entity whose deleted flag is set is never visible.
//! - Filtering preserves the relative order of the input.

/// Entity carrying a monotonic soft-delete flag.
pub trait SoftDelete {
    /// Returns whether the entity has been tombstoned.
    fn is_deleted(&self) -> bool;
}

/// Returns whether `item` should be surfaced by normal reads.
pub fn is_visible<T: SoftDelete + ?Sized>(item: &T) -> bool {
    !item.is_deleted()
}

/// Lazily yields the visible items of `items` in their original order.
///
/// The returned iterator is `Clone`, so callers can restart it without
/// touching the underlying collection.
pub fn visible<'a, T, I>(items: I) -> impl Iterator<Item = &'a T> + Clone
where
    T: SoftDelete + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: Clone,
{
    items.into_iter().filter(|item| is_visible(*item))
}

/// Drops every deleted item from an owned collection, keeping order.
pub fn retain_visible<T: SoftDelete>(mut items: Vec<T>) -> Vec<T> {
    items.retain(|item| is_visible(item));
    items
}

/// Treats a deleted entity as absent.
pub fn visible_one<T: SoftDelete>(item: Option<T>) -> Option<T> {
    item.filter(|value| is_visible(value))
}

#[cfg(test)]
mod tests {
    use super::{retain_visible, visible, visible_one, SoftDelete};

    #[derive(Debug, PartialEq)]
    struct Row(u32, bool);

    impl SoftDelete for Row {
        fn is_deleted(&self) -> bool {
            self.1
        }
    }

    #[test]
    fn visible_skips_deleted_and_keeps_order() {
        let rows = vec![Row(1, false), Row(2, true), Row(3, false), Row(4, true)];

        let ids: Vec<u32> = visible(&rows).map(|row| row.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn visible_iterator_is_restartable() {
        let rows = vec![Row(1, false), Row(2, false)];
        let iter = visible(&rows);

        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.map(|row| row.0).sum::<u32>(), 3);
    }

    #[test]
    fn retain_visible_and_visible_one_share_the_rule() {
        let kept = retain_visible(vec![Row(1, true), Row(2, false)]);
        assert_eq!(kept, vec![Row(2, false)]);

        assert_eq!(visible_one(Some(Row(5, true))), None);
        assert_eq!(visible_one(Some(Row(6, false))), Some(Row(6, false)));
        assert_eq!(visible_one::<Row>(None), None);
    }
}
