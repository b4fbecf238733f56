//! Rating-weighted mirror selection.
//!
//! A single uniform draw in `[1, W]` (W = sum of ratings) is walked down the
//! candidate list in the order the caller supplies, subtracting each rating
//! until the remainder is used up. Scan order therefore decides which
//! candidate wins at a boundary draw: with ratings `[70, 30]`, draw 70 picks
//! the first candidate and draw 71 the second.
//!
//! Each call is independent; there is no round-robin memory between calls.

use rand::Rng;

use crate::catalog::MirrorCandidate;

/// Sum of candidate ratings.
pub fn total_weight(candidates: &[MirrorCandidate]) -> u64 {
    candidates.iter().map(|c| u64::from(c.rating)).sum()
}

/// Picks one candidate with probability `rating / W`.
///
/// Returns `None` only for an empty slice. When every rating is zero no draw
/// is made and the first candidate is returned.
pub fn select_mirror<'a, R: Rng + ?Sized>(
    candidates: &'a [MirrorCandidate],
    rng: &mut R,
) -> Option<&'a MirrorCandidate> {
    if candidates.is_empty() {
        return None;
    }
    let total = total_weight(candidates);
    if total == 0 {
        return candidates.first();
    }
    select_with_draw(candidates, rng.random_range(1..=total))
}

/// Walks `candidates` with a fixed draw.
///
/// `draw` is expected in `[1, W]`; a draw past the end falls back to the
/// first candidate so the result is always a member of a non-empty input.
pub fn select_with_draw(candidates: &[MirrorCandidate], draw: u64) -> Option<&MirrorCandidate> {
    let mut remaining = draw;
    for candidate in candidates {
        let weight = u64::from(candidate.rating);
        if remaining <= weight {
            return Some(candidate);
        }
        remaining -= weight;
    }
    candidates.first()
}
