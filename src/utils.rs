//! Assorted utilities and helpers.

/// Smallest state count for which the `parallel` feature splits a layer
/// across threads. Below this the per-layer work is too small to pay for
/// the fork-join.
pub const DEFAULT_PARALLEL_MIN_STATES: usize = 64;

/// First `(index, value)` whose value is strictly greater than `floor` and
/// every value before it.
///
/// Later values equal to the running maximum never replace it, so ties go
/// to the lowest index when the iterator runs in index order.
#[inline]
pub fn first_strict_max<I>(values: I, floor: f64) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut best = floor;
    let mut arg = None;
    for (i, v) in values {
        if v > best {
            best = v;
            arg = Some(i);
        }
    }
    arg.map(|i| (i, best))
}
