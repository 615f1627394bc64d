use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TieBreakMode;

/// The source of all the random draws made during a draft.
///
/// It is passed explicitly to the draft, so that the same source and the same
/// input always produce the same assignments.
pub trait TieBreakSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Draws from the standard seeded generator of the `rand` crate.
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> SeededSource {
        SeededSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TieBreakSource for SeededSource {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Draws derived from a cryptographic hash of the seed and the number of the draw.
/// The sequence is stable across platforms and library versions.
pub struct DigestSource {
    seed: u32,
    num_draws: u64,
}

impl DigestSource {
    pub fn new(seed: u32) -> DigestSource {
        DigestSource { seed, num_draws: 0 }
    }
}

impl TieBreakSource for DigestSource {
    fn pick(&mut self, len: usize) -> usize {
        let h = sha256::digest(format!("{:08}{:016}", self.seed, self.num_draws));
        self.num_draws += 1;
        // 16 hex characters fit exactly in a u64.
        let x = u64::from_str_radix(&h[..16], 16).unwrap_or(0);
        let res = (x % (len as u64)) as usize;
        debug!("DigestSource::pick: draw {} -> {}/{}", self.num_draws, res, len);
        res
    }
}

/// The source corresponding to the tiebreak mode of the rules.
pub fn source_for(mode: TieBreakMode) -> Box<dyn TieBreakSource> {
    match mode {
        TieBreakMode::Random(seed) => Box::new(SeededSource::new(seed)),
        TieBreakMode::Digest(seed) => Box::new(DigestSource::new(seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(source: &mut dyn TieBreakSource, len: usize, n: usize) -> Vec<usize> {
        (0..n).map(|_| source.pick(len)).collect()
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let a = draws(&mut SeededSource::new(42), 7, 50);
        let b = draws(&mut SeededSource::new(42), 7, 50);
        assert_eq!(a, b);
        assert!(a.iter().all(|x| *x < 7));
    }

    #[test]
    fn digest_source_is_reproducible() {
        let a = draws(&mut DigestSource::new(3), 5, 50);
        let b = draws(&mut DigestSource::new(3), 5, 50);
        assert_eq!(a, b);
        assert!(a.iter().all(|x| *x < 5));
        // Over 50 draws in 0..5, the hash should not get stuck on one value.
        assert!(a.iter().any(|x| *x != a[0]));
    }

    #[test]
    fn single_choice_is_always_zero() {
        let mut s = source_for(TieBreakMode::Digest(1));
        assert_eq!(draws(s.as_mut(), 1, 10), vec![0; 10]);
        let mut s = source_for(TieBreakMode::Random(1));
        assert_eq!(draws(s.as_mut(), 1, 10), vec![0; 10]);
    }
}
