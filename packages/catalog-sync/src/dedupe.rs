//! Batch deduplication keyed by `owner/name`. First occurrence wins and the
//! surviving order is the insertion order of first occurrence.

use std::collections::HashSet;

use crate::types::RawListing;

/// Drop repeated listings for the same logical model within one batch.
pub fn dedupe(listings: Vec<RawListing>) -> Vec<RawListing> {
    let mut seen = HashSet::new();
    dedupe_with_seen(&mut seen, listings)
}

/// Like [`dedupe`], but against a caller-owned key set. Used when one
/// category is assembled from multiple source collections (e.g. audio models
/// listed under both speech-recognition and text-to-speech) so a model is
/// not double-counted across them.
pub fn dedupe_with_seen(
    seen: &mut HashSet<String>,
    listings: Vec<RawListing>,
) -> Vec<RawListing> {
    listings
        .into_iter()
        .filter(|listing| seen.insert(listing.model_id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(owner: &str, name: &str) -> RawListing {
        RawListing::new(owner, name)
    }

    #[test]
    fn first_occurrence_wins_and_order_is_preserved() {
        let mut first = listing("a", "m");
        first.description = "first".into();
        let mut dup = listing("a", "m");
        dup.description = "second".into();

        let unique = dedupe(vec![first, listing("b", "n"), dup, listing("c", "o")]);

        let ids: Vec<String> = unique.iter().map(|l| l.model_id()).collect();
        assert_eq!(ids, ["a/m", "b/n", "c/o"]);
        assert_eq!(unique[0].description, "first");
    }

    #[test]
    fn no_two_survivors_share_a_key() {
        let unique = dedupe(vec![
            listing("a", "m"),
            listing("a", "m"),
            listing("a", "m"),
        ]);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn shared_seen_set_spans_collections() {
        let mut seen = HashSet::new();
        let stt = dedupe_with_seen(&mut seen, vec![listing("a", "m"), listing("a", "whisper")]);
        let tts = dedupe_with_seen(&mut seen, vec![listing("a", "m"), listing("b", "voice")]);

        assert_eq!(stt.len(), 2);
        let tts_ids: Vec<String> = tts.iter().map(|l| l.model_id()).collect();
        assert_eq!(tts_ids, ["b/voice"]);
    }
}
