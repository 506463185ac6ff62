//! Seeded train/test split.
//!
//! The training set is a uniform sample without replacement of
//! `round(fraction * n)` positions; the test set is every other position.
//! Only the row count and the seed determine membership.

use crate::models::Split;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rustc_hash::FxHashSet;

/// Number of training rows for `n` rows at `fraction`, rounded to nearest
/// with ties going to the even count.
pub fn train_count(n: usize, fraction: f64) -> usize {
    ((fraction * n as f64).round_ties_even() as usize).min(n)
}

pub fn validate_fraction(fraction: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&fraction) {
        bail!("train fraction must be between 0 and 1, got {}", fraction);
    }
    Ok(())
}

/// Partition positions `0..n` into train and test sets.
///
/// Train positions are returned in draw order, test positions ascending.
pub fn train_test_split(n: usize, fraction: f64, seed: u64) -> Result<Split> {
    validate_fraction(fraction)?;

    let amount = train_count(n, fraction);
    let mut rng = StdRng::seed_from_u64(seed);
    let train: Vec<usize> = index::sample(&mut rng, n, amount).into_vec();

    let chosen: FxHashSet<usize> = train.iter().copied().collect();
    let test: Vec<usize> = (0..n).filter(|i| !chosen.contains(i)).collect();

    Ok(Split { train, test })
}
