//! Incremental line reconciliation.
//!
//! Compares a fresh per-line rendering with the previous one and patches the
//! [`LineStore`] with the smallest structural change that makes it match:
//! one forward scan for the common prefix, one backward scan for the common
//! suffix, then either an in-place markup swap or a single splice.

use crate::view::LineStore;

/// Changed region between two renderings, in document line indices.
///
/// Old lines `start..old_end` are replaced by new lines `start..new_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePatch {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl LinePatch {
    /// Find the changed region between `prev` and `next`.
    ///
    /// The prefix scan runs first and bounds the suffix scan, so a line that
    /// could belong to either is counted as prefix.
    pub fn diff<S: AsRef<str>>(prev: &[S], next: &[S]) -> Self {
        let mut start = 0;
        while start < next.len()
            && start < prev.len()
            && next[start].as_ref() == prev[start].as_ref()
        {
            start += 1;
        }

        let mut new_end = next.len();
        let mut old_end = prev.len();
        while new_end > start
            && old_end > start
            && next[new_end - 1].as_ref() == prev[old_end - 1].as_ref()
        {
            new_end -= 1;
            old_end -= 1;
        }

        Self {
            start,
            old_end,
            new_end,
        }
    }

    /// Old lines dropped by the patch.
    pub const fn removed(&self) -> usize {
        self.old_end - self.start
    }

    /// New lines introduced by the patch.
    pub const fn inserted(&self) -> usize {
        self.new_end - self.start
    }

    /// Nothing changed.
    pub const fn is_noop(&self) -> bool {
        self.removed() == 0 && self.inserted() == 0
    }

    /// Exactly one line changed and the line count is unchanged.
    pub const fn is_single_line(&self) -> bool {
        self.removed() == 1 && self.inserted() == 1
    }
}

/// What a reconciliation pass did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    /// Renderings were identical.
    Unchanged,
    /// One line's markup was swapped in place (1-based line number).
    Replaced(usize),
    /// Lines were removed and/or inserted.
    Spliced { removed: usize, inserted: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub patch: LinePatch,
    pub kind: PatchKind,
}

/// Patch `store` so its lines match `next`, given that they currently
/// match `prev`.
///
/// The caller is responsible for replacing its `prev` baseline with `next`.
pub fn reconcile<S: AsRef<str>>(store: &mut LineStore, prev: &[S], next: &[S]) -> ReconcileOutcome {
    let _scope = crate::perf::scope("reconcile");
    debug_assert_eq!(store.line_count(), prev.len(), "store out of sync with baseline");

    let patch = LinePatch::diff(prev, next);
    let kind = if patch.is_noop() {
        PatchKind::Unchanged
    } else if patch.is_single_line() {
        let line = patch.start + 1;
        store.replace_markup(line, next[patch.start].as_ref().to_string());
        tracing::trace!(line, "reconcile: replaced line in place");
        PatchKind::Replaced(line)
    } else {
        let insert_at = patch.start + 1;
        let markups = next[patch.start..patch.new_end]
            .iter()
            .map(|line| line.as_ref().to_string());
        let (removed, inserted) = store.splice(insert_at..patch.old_end + 1, markups);
        store.renumber_from(insert_at);
        store.set_number_width(digit_count(store.line_count()));
        tracing::debug!(
            start = patch.start,
            removed,
            inserted,
            line_count = store.line_count(),
            "reconcile: spliced lines"
        );
        PatchKind::Spliced { removed, inserted }
    };

    if crate::perf::is_debug_log_enabled() {
        crate::perf::log_event(
            "reconcile",
            format!(
                "start={} old_end={} new_end={} kind={kind:?}",
                patch.start, patch.old_end, patch.new_end
            ),
        );
    }

    ReconcileOutcome { patch, kind }
}

/// `ceil(log10(n + 1))`: digits needed to print `n`, at least 1.
pub const fn digit_count(n: usize) -> usize {
    let mut digits = 1;
    let mut rest = n / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::LineView;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn store_with(items: &[String]) -> LineStore {
        let mut store = LineStore::new();
        reconcile(&mut store, &Vec::<String>::new(), items);
        store
    }

    fn markups(store: &LineStore) -> Vec<String> {
        store.iter().map(|l| l.markup().to_string()).collect()
    }

    #[test]
    fn test_first_pass_inserts_every_line() {
        let next = lines(&["a", "b", "c"]);
        let mut store = LineStore::new();
        let outcome = reconcile(&mut store, &Vec::<String>::new(), &next);
        assert_eq!(
            outcome.kind,
            PatchKind::Spliced {
                removed: 0,
                inserted: 3
            }
        );
        assert_eq!(markups(&store), next);
    }

    #[test]
    fn test_identical_renderings_are_unchanged() {
        let prev = lines(&["a", "b"]);
        let mut store = store_with(&prev);
        let ids: Vec<_> = store.iter().map(LineView::id).collect();
        let outcome = reconcile(&mut store, &prev, &prev.clone());
        assert_eq!(outcome.kind, PatchKind::Unchanged);
        assert!(outcome.patch.is_noop());
        let after: Vec<_> = store.iter().map(LineView::id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn test_single_line_edit_takes_fast_path() {
        let prev = lines(&["a", "b", "c"]);
        let next = lines(&["a", "bx", "c"]);
        let mut store = store_with(&prev);
        let id = store.get(2).unwrap().id();
        let outcome = reconcile(&mut store, &prev, &next);
        assert_eq!(outcome.kind, PatchKind::Replaced(2));
        assert_eq!(
            outcome.patch,
            LinePatch {
                start: 1,
                old_end: 2,
                new_end: 2
            }
        );
        assert_eq!(store.get(2).unwrap().id(), id);
        assert_eq!(markups(&store), next);
    }

    #[test]
    fn test_inserted_line_is_spliced_and_renumbered() {
        let prev = lines(&["a", "b", "c"]);
        let next = lines(&["a", "b", "new", "c"]);
        let mut store = store_with(&prev);
        let outcome = reconcile(&mut store, &prev, &next);
        assert_eq!(
            outcome.kind,
            PatchKind::Spliced {
                removed: 0,
                inserted: 1
            }
        );
        assert_eq!(markups(&store), next);
        let numbers: Vec<usize> = store.iter().map(LineView::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_removed_lines_are_spliced_out() {
        let prev = lines(&["a", "b", "c", "d"]);
        let next = lines(&["a", "d"]);
        let mut store = store_with(&prev);
        let outcome = reconcile(&mut store, &prev, &next);
        assert_eq!(
            outcome.kind,
            PatchKind::Spliced {
                removed: 2,
                inserted: 0
            }
        );
        assert_eq!(markups(&store), next);
        assert_eq!(store.get(2).unwrap().number(), 2);
    }

    #[test]
    fn test_prefix_wins_ambiguous_blank_line() {
        // Either blank line could be the one that went away; the prefix scan
        // claims the first, so the second is removed.
        let prev = lines(&["a", "", "", "b"]);
        let next = lines(&["a", "", "b"]);
        let mut store = store_with(&prev);
        let kept = store.get(2).unwrap().id();
        let dropped = store.get(3).unwrap().id();
        let outcome = reconcile(&mut store, &prev, &next);
        assert_eq!(
            outcome.patch,
            LinePatch {
                start: 2,
                old_end: 3,
                new_end: 2
            }
        );
        assert_eq!(store.get(2).unwrap().id(), kept);
        assert!(store.iter().all(|l| l.id() != dropped));
    }

    #[test]
    fn test_duplicated_line_suffix_is_bounded_by_prefix() {
        let prev = lines(&["a", "b"]);
        let next = lines(&["a", "a", "b"]);
        let patch = LinePatch::diff(&prev, &next);
        assert_eq!(
            patch,
            LinePatch {
                start: 1,
                old_end: 1,
                new_end: 2
            }
        );
    }

    #[test]
    fn test_gutter_width_tracks_line_count() {
        let prev: Vec<String> = (0..9).map(|i| i.to_string()).collect();
        let mut store = store_with(&prev);
        assert_eq!(store.number_width(), 1);
        let mut next = prev.clone();
        next.push("9".to_string());
        reconcile(&mut store, &prev, &next);
        assert_eq!(store.number_width(), 2);
    }

    #[test]
    fn test_digit_count_matches_log10_formula() {
        for n in [1usize, 9, 10, 99, 100, 999, 1000, 123_456] {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let expected = ((n + 1) as f64).log10().ceil() as usize;
            assert_eq!(digit_count(n), expected, "n = {n}");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn line_vec() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec(prop::sample::select(vec!["", "a", "b", "ab"]), 0..12)
                .prop_map(|v| v.into_iter().map(str::to_string).collect())
        }

        proptest! {
            #[test]
            fn reconciled_store_matches_new_rendering(prev in line_vec(), next in line_vec()) {
                let mut store = store_with(&prev);
                reconcile(&mut store, &prev, &next);
                prop_assert_eq!(markups(&store), next.clone());
                for (i, line) in store.iter().enumerate() {
                    prop_assert_eq!(line.number(), i + 1);
                }
                prop_assert_eq!(store.len(), next.len() + 1);
            }

            #[test]
            fn patch_ranges_are_ordered(prev in line_vec(), next in line_vec()) {
                let patch = LinePatch::diff(&prev, &next);
                prop_assert!(patch.start <= patch.old_end && patch.old_end <= prev.len());
                prop_assert!(patch.start <= patch.new_end && patch.new_end <= next.len());
                prop_assert_eq!(
                    prev.len() - patch.old_end,
                    next.len() - patch.new_end
                );
            }

            #[test]
            fn reconcile_is_idempotent(prev in line_vec(), next in line_vec()) {
                let mut store = store_with(&prev);
                reconcile(&mut store, &prev, &next);
                let outcome = reconcile(&mut store, &next, &next);
                prop_assert_eq!(outcome.kind, PatchKind::Unchanged);
            }
        }
    }
}
