use crate::foundation::math::lerp;

/// Ken Perlin's reference permutation.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Classic 2D gradient noise. Output lies roughly in `[-1, 1]`.
#[derive(Clone, Debug)]
pub struct Perlin2D {
    p: [u16; 512],
}

impl Default for Perlin2D {
    fn default() -> Self {
        Self::new()
    }
}

impl Perlin2D {
    pub fn new() -> Self {
        let mut p = [0u16; 512];
        for i in 0..256 {
            p[i] = u16::from(PERMUTATION[i]);
            p[i + 256] = u16::from(PERMUTATION[i]);
        }
        Self { p }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;
        let u = fade(x);
        let v = fade(y);
        let a = self.p[xi] as usize + yi;
        let b = self.p[xi + 1] as usize + yi;
        lerp(
            lerp(grad(self.p[a], x, y), grad(self.p[b], x - 1.0, y), u),
            lerp(
                grad(self.p[a + 1], x, y - 1.0),
                grad(self.p[b + 1], x - 1.0, y - 1.0),
                u,
            ),
            v,
        )
    }

    /// Noise remapped to `[0, 1]`.
    pub fn sample01(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) / 2.0
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn grad(hash: u16, x: f64, y: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
