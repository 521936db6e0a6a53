#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Small deterministic generator standing in for `Math.random`-style jitter.
///
/// Every frame gets its own generator derived from the session seed and a frame
/// counter, so the same inputs always produce the same pixels.
#[derive(Clone, Debug)]
pub struct FrameRng {
    state: u64,
}

impl FrameRng {
    /// Creates a generator from a seed; zero is remapped since xorshift would stall.
    pub fn new(seed: u64) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_u64(seed);
        let state = h.finish();
        Self {
            state: if state == 0 { 0x9E37_79B9_7F4A_7C15 } else { state },
        }
    }

    /// Derives an independent stream, e.g. one per frame or per layer.
    pub fn fork(&self, salt: u64) -> Self {
        let mut h = Fnv1a64::new(self.state);
        h.write_u64(salt);
        Self::new(h.finish())
    }

    /// Next raw value (xorshift64*).
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
