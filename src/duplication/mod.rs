//! Cross-unit duplicate-code detection.
//!
//! Slides a fixed-size window over every eligible unit's normalized token
//! stream, hashing each window with a Rabin–Karp rolling hash. A hash
//! bucket holding windows from two or more distinct units marks a
//! cross-unit clone; buckets confined to one unit are intra-unit repetition
//! and are discarded — duplication only ever penalizes repetition across
//! units.
//!
//! Per unit, implicated window starts are sorted and folded left to right,
//! adding only the portion of each window that extends past the rightmost
//! covered position. Summing `matches × window` instead would wildly
//! overcount overlapping windows (26 overlapping starts spanning a true
//! 100-token region must cover 100 tokens, not 1300).

use crate::config::ScoringProfile;
use crate::models::AnalyzedUnit;
use crate::scoring::exemptions::UnitContext;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

const HASH_BASE: u64 = 1_000_003;

/// Duplication percentage per unit, indexed like the input slice.
///
/// `None` marks a unit that did not participate: generated, token stream
/// shorter than the clone window, or fewer than two eligible units overall.
/// Non-participating units earn full credit and are skipped by the scorer.
pub fn duplication_by_unit(
    units: &[AnalyzedUnit],
    contexts: &[UnitContext],
    profile: &ScoringProfile,
) -> Vec<Option<f64>> {
    let window = profile.duplication.clone_window;
    let mut percentages: Vec<Option<f64>> = vec![None; units.len()];

    let eligible: Vec<usize> = units
        .iter()
        .enumerate()
        .filter(|(i, u)| contexts[*i].is_scored() && u.tokens.len() >= window)
        .map(|(i, _)| i)
        .collect();

    if eligible.len() < 2 {
        return percentages;
    }

    // Hash every window per unit in parallel; bucket insertion stays
    // sequential in eligible order so bucket contents are deterministic.
    let per_unit_hashes: Vec<(usize, Vec<u64>)> = eligible
        .par_iter()
        .map(|&idx| (idx, window_hashes(&units[idx].tokens, window)))
        .collect();

    let mut buckets: FxHashMap<u64, Vec<(usize, usize)>> = FxHashMap::default();
    for (unit_idx, hashes) in &per_unit_hashes {
        for (start, hash) in hashes.iter().enumerate() {
            buckets.entry(*hash).or_default().push((*unit_idx, start));
        }
    }

    // Keep only buckets spanning at least two distinct units.
    let mut starts_by_unit: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut cross_buckets = 0usize;
    for locations in buckets.values() {
        let first_unit = locations[0].0;
        if locations.iter().all(|(unit, _)| *unit == first_unit) {
            continue;
        }
        cross_buckets += 1;
        for (unit, start) in locations {
            starts_by_unit.entry(*unit).or_default().push(*start);
        }
    }

    debug!(
        "duplication: {} eligible units, {} cross-unit window buckets",
        eligible.len(),
        cross_buckets
    );

    for &idx in &eligible {
        let unit = &units[idx];
        let covered = match starts_by_unit.get(&idx) {
            Some(starts) => covered_tokens(starts, window),
            None => 0,
        };
        percentages[idx] = Some(duplication_percent(covered, unit));
    }

    percentages
}

/// Rabin–Karp hashes of every window over a token stream.
///
/// The initial window is hashed directly; each subsequent hash is rolled in
/// O(1) by subtracting the outgoing token's weighted contribution before
/// multiplying in the incoming one.
fn window_hashes(tokens: &[u32], window: usize) -> Vec<u64> {
    if tokens.len() < window || window == 0 {
        return Vec::new();
    }

    let mut hashes = Vec::with_capacity(tokens.len() - window + 1);
    let mut hash = 0u64;
    for &token in &tokens[..window] {
        hash = hash.wrapping_mul(HASH_BASE).wrapping_add(token as u64);
    }
    hashes.push(hash);

    let top_weight = HASH_BASE.wrapping_pow(window as u32 - 1);
    for i in window..tokens.len() {
        let outgoing = (tokens[i - window] as u64).wrapping_mul(top_weight);
        hash = hash
            .wrapping_sub(outgoing)
            .wrapping_mul(HASH_BASE)
            .wrapping_add(tokens[i] as u64);
        hashes.push(hash);
    }

    hashes
}

/// Total tokens covered by a set of equal-width windows.
///
/// Starts are sorted, then folded tracking the rightmost covered end; each
/// window contributes only the part extending past it.
fn covered_tokens(starts: &[usize], window: usize) -> usize {
    let mut sorted = starts.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut covered = 0usize;
    let mut rightmost = 0usize;
    for &start in &sorted {
        let end = start + window;
        if start >= rightmost {
            covered += window;
        } else if end > rightmost {
            covered += end - rightmost;
        }
        rightmost = rightmost.max(end);
    }
    covered
}

/// Covered tokens → estimated duplicated lines via the unit's own
/// tokens-per-line density → percentage of total unit lines.
fn duplication_percent(covered: usize, unit: &AnalyzedUnit) -> f64 {
    if covered == 0 || unit.tokens.is_empty() || unit.line_count == 0 {
        return 0.0;
    }
    let tokens_per_line = unit.tokens.len() as f64 / unit.line_count as f64;
    if tokens_per_line <= 0.0 {
        return 0.0;
    }
    let duplicated_lines = covered as f64 / tokens_per_line;
    (duplicated_lines / unit.line_count as f64) * 100.0
}
