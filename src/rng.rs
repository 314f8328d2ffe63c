//! Random sources for picking reel targets.

/// Anything that can hand out uniformly distributed `u32`s.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform index in `0..=max`.
    fn up_to(&mut self, max: usize) -> usize {
        let span = max as u64 + 1;
        // Lemire style multiply-shift keeps the bias negligible for tiny spans
        ((self.next_u32() as u64 * span) >> 32) as usize
    }
}

/// Deterministic xorshift32 generator.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        Self { state: if seed == 0 { 0x9E37_79B9 } else { seed } }
    }

    /// Seed from the page clock (`performance.now()`).
    pub fn from_clock() -> Self {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        Self::new((now as u64 as u32).wrapping_mul(1_664_525).wrapping_add(1_013_904_223))
    }
}

impl RandomSource for SeededRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

/// Replays a fixed list of raw values, cycling when exhausted. Handy for rigged
/// attract-mode spins and deterministic rounds.
#[derive(Clone, Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    next: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, next: 0 }
    }

    /// Raw values that make `up_to(max)` return exactly `indices`.
    pub fn for_indices(indices: &[usize], max: usize) -> Self {
        let span = max as u64 + 1;
        let values = indices
            .iter()
            .map(|&i| (((i.min(max) as u64) << 32).div_ceil(span)) as u32)
            .collect();
        Self::new(values)
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

/// Browser crypto randomness (`crypto.getRandomValues`) via getrandom.
#[cfg(feature = "rng")]
#[derive(Clone, Debug)]
pub struct OsRng {
    fallback: SeededRng,
}

#[cfg(feature = "rng")]
impl OsRng {
    pub fn new() -> Self {
        Self { fallback: SeededRng::from_clock() }
    }
}

#[cfg(feature = "rng")]
impl Default for OsRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "rng")]
impl RandomSource for OsRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => u32::from_le_bytes(buf),
            Err(err) => {
                log::warn!("getrandom failed ({}), using seeded fallback", err);
                self.fallback.next_u32()
            }
        }
    }
}

/// The source the game uses by default.
pub fn default_source() -> Box<dyn RandomSource> {
    #[cfg(feature = "rng")]
    {
        Box::new(OsRng::new())
    }
    #[cfg(not(feature = "rng"))]
    {
        Box::new(SeededRng::from_clock())
    }
}
