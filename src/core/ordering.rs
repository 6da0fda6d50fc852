//! Dispatch ordering for pending items.
//!
//! Higher priority first, then higher destination floor, then intake
//! sequence. Items with equal keys keep their arrival order, including after
//! being returned to the pool.

use std::cmp::Ordering;

use crate::core::mail::ItemDescriptor;

/// Compare two descriptors; `Less` means `a` is served before `b`.
pub fn dispatch_order<M>(a: &ItemDescriptor<M>, b: &ItemDescriptor<M>) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.destination.cmp(&a.destination))
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Insert `item` after every element that is not served after it.
///
/// On a sequence already sorted by [`dispatch_order`] this gives the same
/// result as appending and stable-sorting. Returns the insertion index.
pub(crate) fn insert_ordered<M>(pending: &mut Vec<ItemDescriptor<M>>, item: ItemDescriptor<M>) -> usize {
    let at = pending.partition_point(|p| dispatch_order(p, &item) != Ordering::Greater);
    pending.insert(at, item);
    at
}
