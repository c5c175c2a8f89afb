//! Folding batch size results into the listing and the tree cache.

use std::collections::HashMap;
use std::path::Path;

use swept_core::{sort_entries_by_size, Entry, ScanResult, SizeResult};

use crate::generation::{GenerationToken, ScanTicket};
use crate::tree_cache::TreeCache;

/// What a merge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The ticket's generation is no longer current; nothing was touched.
    Stale,
    /// Sizes were applied.
    Applied {
        /// Entries whose size was replaced.
        updated: usize,
    },
}

impl MergeOutcome {
    /// Check whether the merge was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Apply one batch of size results to the listing for `ticket.target` and
/// to that directory's cached children.
///
/// Entries named in `results` get their new size; every other entry keeps
/// its current size. Both lists are re-sorted by size descending and the
/// listing's total is recomputed. Both replacements are computed before
/// either is committed, so a reader never sees one updated without the
/// other. A listing for a different directory is left untouched.
pub fn merge(
    current: &mut Option<ScanResult>,
    cache: &mut TreeCache,
    ticket: &ScanTicket,
    results: &[SizeResult],
    token: &GenerationToken,
) -> MergeOutcome {
    if !ticket.is_current(token) {
        tracing::debug!(generation = %ticket.generation, "Discarding stale size batch");
        return MergeOutcome::Stale;
    }

    let sizes: HashMap<&Path, u64> = results.iter().map(|r| (r.path.as_path(), r.size)).collect();

    let next_listing = current
        .as_ref()
        .filter(|listing| listing.path == ticket.target)
        .map(|listing| {
            let (entries, updated) = resized(&listing.entries, &sizes);
            (ScanResult::new(listing.path.clone(), listing.parent.clone(), entries), updated)
        });
    let next_cached = cache.get(&ticket.target).map(|entries| resized(entries, &sizes));

    let updated = match (&next_listing, &next_cached) {
        (Some((_, updated)), _) | (None, Some((_, updated))) => *updated,
        (None, None) => 0,
    };

    if let Some((listing, _)) = next_listing {
        *current = Some(listing);
    }
    if let Some((entries, _)) = next_cached {
        cache.put(ticket.target.clone(), entries);
    }

    MergeOutcome::Applied { updated }
}

fn resized(entries: &[Entry], sizes: &HashMap<&Path, u64>) -> (Vec<Entry>, usize) {
    let mut updated = 0;
    let mut next: Vec<Entry> = entries
        .iter()
        .map(|entry| match sizes.get(entry.path.as_path()) {
            Some(&size) => {
                updated += 1;
                entry.resized(size)
            }
            None => entry.clone(),
        })
        .collect();

    sort_entries_by_size(&mut next);
    (next, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use swept_core::EntryId;

    fn listing(root: &str) -> ScanResult {
        let entries = vec![
            Entry::file(EntryId::new(1), "notes.txt", format!("{root}/notes.txt"), 50),
            Entry::directory(EntryId::new(2), "photos", format!("{root}/photos"), Some(3)),
            Entry::directory(EntryId::new(3), "code", format!("{root}/code"), Some(9)),
        ];
        ScanResult::new(root, Some(PathBuf::from("/")), entries)
    }

    fn state(root: &str) -> (Option<ScanResult>, TreeCache) {
        let listing = listing(root);
        let mut cache = TreeCache::new();
        cache.put(root, listing.entries.clone());
        (Some(listing), cache)
    }

    #[test]
    fn test_merge_resizes_and_sorts() {
        let token = GenerationToken::new();
        let ticket = ScanTicket::new(token.advance(), "/home");
        let (mut current, mut cache) = state("/home");

        let outcome = merge(
            &mut current,
            &mut cache,
            &ticket,
            &[SizeResult::new("/home/photos", 900)],
            &token,
        );

        assert_eq!(outcome, MergeOutcome::Applied { updated: 1 });
        let listing = current.unwrap();
        let names: Vec<_> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["photos", "notes.txt", "code"]);
        assert_eq!(listing.total_size, 950);

        let cached = cache.get(Path::new("/home")).unwrap();
        assert_eq!(cached, listing.entries.as_slice());
    }

    #[test]
    fn test_stale_merge_touches_nothing() {
        let token = GenerationToken::new();
        let stale = ScanTicket::new(token.advance(), "/home");
        token.advance();
        let (mut current, mut cache) = state("/home");
        let before = current.clone();

        let outcome = merge(
            &mut current,
            &mut cache,
            &stale,
            &[SizeResult::new("/home/photos", 900)],
            &token,
        );

        assert_eq!(outcome, MergeOutcome::Stale);
        assert_eq!(current, before);
        assert_eq!(cache.get(Path::new("/home")).unwrap(), before.unwrap().entries.as_slice());
    }

    #[test]
    fn test_merge_only_touches_its_target() {
        let token = GenerationToken::new();
        let ticket = ScanTicket::new(token.advance(), "/elsewhere");
        let (mut current, mut cache) = state("/home");
        let before = current.clone();

        let outcome = merge(
            &mut current,
            &mut cache,
            &ticket,
            &[SizeResult::new("/home/photos", 900)],
            &token,
        );

        assert_eq!(outcome, MergeOutcome::Applied { updated: 0 });
        assert_eq!(current, before);
        assert!(!cache.contains(Path::new("/elsewhere")));
    }

    #[test]
    fn test_zero_sized_results_keep_stable_order() {
        let token = GenerationToken::new();
        let ticket = ScanTicket::new(token.advance(), "/home");
        let (mut current, mut cache) = state("/home");

        merge(
            &mut current,
            &mut cache,
            &ticket,
            &[SizeResult::zero(Path::new("/home/photos")), SizeResult::zero(Path::new("/home/code"))],
            &token,
        );

        let names: Vec<_> = current.unwrap().entries.iter().map(|e| e.name.to_string()).collect();
        assert_eq!(names, vec!["notes.txt", "photos", "code"]);
    }
}
