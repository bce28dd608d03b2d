use sha3::{digest::{ExtendableOutput, Update, XofReader}, Shake256};

/// Deterministic SHAKE256 stream. Every draw is tagged with a context label,
/// so two call sites reading from the same seed never alias.
#[derive(Clone)]
pub struct SeedRng {
    state: [u8; 32],
    step: u64,
}

impl SeedRng {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"SEED_INIT"], &mut state);
        Self { state, step: 0 }
    }

    pub fn from_u64(seed: u64) -> Self {
        Self::new(&seed.to_be_bytes())
    }

    pub fn next_u64(&mut self, ctx: &[u8]) -> u64 {
        self.step += 1;

        let state = self.state;
        let step_bytes = self.step.to_be_bytes();
        let mut next_state = self.state;
        shake(&[&state, &step_bytes, b"RESERVOIR"], &mut next_state);
        self.state = next_state;

        let mut out = [0u8; 8];
        shake(&[&self.state, ctx], &mut out);
        u64::from_be_bytes(out)
    }

    /// Uniform integer in [0, bound). Rejection sampling keeps it unbiased.
    pub fn below(&mut self, bound: usize, ctx: &[u8]) -> usize {
        assert!(bound > 0, "below() needs a positive bound");
        let bound = bound as u64;
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let x = self.next_u64(ctx);
            if x < zone {
                return (x % bound) as usize;
            }
        }
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T], ctx: &[u8]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1, ctx);
            items.swap(i, j);
        }
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}

#[cfg(test)]
mod tests {
    use super::SeedRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeedRng::from_u64(7);
        let mut b = SeedRng::from_u64(7);
        for _ in 0..16 {
            assert_eq!(a.next_u64(b"T"), b.next_u64(b"T"));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SeedRng::new(b"perm");
        let mut v: Vec<usize> = (0..50).collect();
        rng.shuffle(&mut v, b"SHUFFLE");
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(v, sorted, "50 elements should not come back in order");
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = SeedRng::new(b"range");
        for _ in 0..200 {
            assert!(rng.below(3, b"B") < 3);
        }
    }
}
