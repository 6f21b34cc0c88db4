//! Majority vote over a small sample of labels.

use super::label::Label;

/// Most frequent item; ties go to whichever tied item appeared first.
///
/// Counting keeps insertion order, so the result never depends on hash
/// ordering. Returns `None` for an empty sample.
pub fn mode<T: PartialEq + Clone>(items: &[T]) -> Option<T> {
    let mut tally: Vec<(&T, usize)> = Vec::with_capacity(items.len());
    for item in items {
        match tally.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => tally.push((item, 1)),
        }
    }

    let mut best: Option<(&T, usize)> = None;
    for (item, count) in tally {
        // Strictly greater keeps the earliest of equal counts.
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item.clone())
}

/// Final label for a set of attempt labels.
pub fn majority_label(labels: &[Label]) -> Option<Label> {
    mode(labels)
}
