use deckforge_core::RngState;
use std::cmp::Ordering;

/// Sort individuals best-first.
pub(crate) fn sort_scored<T>(scored: &mut [(T, f64)]) {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}

/// K-way tournament: draw `k` individuals with replacement, keep the fittest.
pub(crate) fn tournament<'a, T>(scored: &'a [(T, f64)], k: usize, rng: &mut RngState) -> &'a T {
    let mut best = &scored[rng.index(scored.len())];
    for _ in 1..k {
        let challenger = &scored[rng.index(scored.len())];
        if challenger.1 > best.1 {
            best = challenger;
        }
    }
    &best.0
}
