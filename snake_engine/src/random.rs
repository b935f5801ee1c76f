use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source consumed by rulesets and maps. Every implementation is
/// deterministic for a given construction, which is what makes turns
/// replayable.
pub trait Rand {
    /// Uniform value in `0..n`. Returns 0 when `n <= 0`.
    fn intn(&mut self, n: i32) -> i32;

    /// Inclusive range helper.
    fn range(&mut self, min: i32, max: i32) -> i32 {
        min + self.intn(max - min + 1)
    }

    /// Fisher-Yates over `n` elements, expressed through a swap callback so
    /// the trait stays object safe.
    fn shuffle(&mut self, n: usize, swap: &mut dyn FnMut(usize, usize));
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// ChaCha stream keyed by `seed + offset`.
pub struct SeededRand {
    rng: ChaCha8Rng,
}

impl SeededRand {
    pub fn new(seed: i64, offset: i64) -> Self {
        let mixed = splitmix64(seed.wrapping_add(offset) as u64);
        Self {
            rng: ChaCha8Rng::seed_from_u64(mixed),
        }
    }
}

impl Rand for SeededRand {
    fn intn(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn shuffle(&mut self, n: usize, swap: &mut dyn FnMut(usize, usize)) {
        for i in (1..n).rev() {
            let j = self.rng.gen_range(0..=i);
            swap(i, j);
        }
    }
}

/// Always picks the largest value and never reorders. Used by the batch
/// protocol so a replayed feed does not depend on any seed at all.
pub struct MaxRand;

impl Rand for MaxRand {
    fn intn(&mut self, n: i32) -> i32 {
        (n - 1).max(0)
    }

    fn shuffle(&mut self, _n: usize, _swap: &mut dyn FnMut(usize, usize)) {}
}

/// Shuffles a slice in place with any [`Rand`].
pub fn shuffle_slice<T>(rand: &mut dyn Rand, items: &mut [T]) {
    rand.shuffle(items.len(), &mut |i, j| items.swap(i, j));
}
