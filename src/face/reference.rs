//! Canonical frontal face layout.
//!
//! Places every landmark the makeup layers read at an anatomically plausible spot for
//! a centered, upright face. Used for previews when no detector output is available
//! and as a fixture in tests.

use std::f64::consts::PI;

use crate::face::landmarks::{Landmark, LandmarkSet};

const FACE_CONTOUR: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];
const LIPS_OUTER_RING: [usize; 20] = [
    61, 185, 40, 39, 37, 0, 267, 269, 270, 409, 291, 375, 321, 405, 314, 17, 84, 181, 91, 146,
];
const LIPS_INNER_RING: [usize; 20] = [
    78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95,
];
const UPPER_SHIMMER: [usize; 14] = [74, 42, 73, 41, 72, 38, 11, 12, 302, 268, 303, 271, 304, 272];
const LOWER_SHIMMER: [usize; 14] = [
    319, 320, 403, 404, 316, 315, 15, 16, 86, 85, 179, 180, 89, 90,
];

struct Eye {
    cx: f64,
    cy: f64,
    /// +1 when the outer corner lies to the left in the image.
    outward: f64,
}

const EYE_HALF_W: f64 = 0.045;
const EYE_HALF_H: f64 = 0.014;

/// Builds the 478-point reference layout (iris points included).
pub fn reference_face() -> LandmarkSet {
    let mut pts = vec![Landmark::new(0.5, 0.55); LandmarkSet::REFINED_POINTS];
    let mut set = |i: usize, x: f64, y: f64| pts[i] = Landmark::new(x, y);

    for (k, &i) in FACE_CONTOUR.iter().enumerate() {
        let a = -PI / 2.0 + k as f64 * 2.0 * PI / FACE_CONTOUR.len() as f64;
        set(i, 0.5 + 0.22 * a.cos(), 0.5 + 0.3 * a.sin());
    }
    set(102, 0.45, 0.56);

    let ring = |set: &mut dyn FnMut(usize, f64, f64), idx: &[usize], rx: f64, ry: f64| {
        for (k, &i) in idx.iter().enumerate() {
            let a = PI - k as f64 * PI / 10.0;
            set(i, 0.5 + rx * a.cos(), 0.68 - ry * a.sin());
        }
    };
    ring(&mut set, &LIPS_OUTER_RING, 0.075, 0.03);
    ring(&mut set, &LIPS_INNER_RING, 0.055, 0.008);
    for (k, &i) in UPPER_SHIMMER.iter().enumerate() {
        let a = 0.9 * PI - k as f64 * 0.8 * PI / 13.0;
        set(i, 0.5 + 0.065 * a.cos(), 0.68 - 0.02 * a.sin());
    }
    for (k, &i) in LOWER_SHIMMER.iter().enumerate() {
        let a = -0.1 * PI - k as f64 * 0.8 * PI / 13.0;
        set(i, 0.5 + 0.065 * a.cos(), 0.68 - 0.02 * a.sin());
    }

    let left = Eye {
        cx: 0.39,
        cy: 0.43,
        outward: 1.0,
    };
    let right = Eye {
        cx: 0.61,
        cy: 0.43,
        outward: -1.0,
    };
    eye(
        &mut set,
        &left,
        EyeIndices {
            outer: 33,
            inner: 133,
            upper: [246, 161, 160, 159, 158, 157, 173],
            lower: [7, 163, 144, 145, 153, 154, 155],
            inner_ext: 243,
            outer_ext: 130,
            outer_up: 226,
            crease: [247, 30, 29, 27, 28, 56, 190],
            iris: [468, 469, 470, 471, 472],
        },
    );
    eye(
        &mut set,
        &right,
        EyeIndices {
            outer: 263,
            inner: 362,
            upper: [466, 388, 387, 386, 385, 384, 398],
            lower: [249, 390, 373, 374, 380, 381, 382],
            inner_ext: 463,
            outer_ext: 359,
            outer_up: 446,
            crease: [467, 260, 259, 257, 258, 286, 414],
            iris: [473, 474, 475, 476, 477],
        },
    );

    brow(&mut set, &left, [107, 66, 105, 63, 70]);
    brow(&mut set, &right, [336, 296, 334, 293, 300]);

    set(117, 0.36, 0.53);
    set(346, 0.64, 0.53);
    under_eye(
        &mut set,
        &left,
        UnderEye {
            far: [143, 35],
            lid: [25, 110, 24, 23, 22, 26, 112],
            inner: [244, 245],
            arc: [128, 121, 120, 119, 118],
            tail: 111,
        },
    );
    under_eye(
        &mut set,
        &right,
        UnderEye {
            far: [372, 265],
            lid: [255, 339, 254, 253, 252, 256, 341],
            inner: [464, 465],
            arc: [357, 350, 349, 348, 347],
            tail: 340,
        },
    );
    set(351, right.cx - EYE_HALF_W - 0.002, right.cy + 0.04);
    set(412, right.cx - EYE_HALF_W + 0.004, right.cy + 0.05);

    LandmarkSet { points: pts.into() }
}

struct EyeIndices {
    outer: usize,
    inner: usize,
    /// Outer to inner.
    upper: [usize; 7],
    /// Outer to inner.
    lower: [usize; 7],
    inner_ext: usize,
    outer_ext: usize,
    outer_up: usize,
    crease: [usize; 7],
    /// Center first, then the ring.
    iris: [usize; 5],
}

fn eye(set: &mut dyn FnMut(usize, f64, f64), e: &Eye, idx: EyeIndices) {
    let outer_x = e.cx - e.outward * EYE_HALF_W;
    let along = |k: usize| outer_x + e.outward * (k as f64 / 8.0) * 2.0 * EYE_HALF_W;
    let bulge = |k: usize| (k as f64 * PI / 8.0).sin();

    set(idx.outer, outer_x, e.cy);
    set(idx.inner, e.cx + e.outward * EYE_HALF_W, e.cy);
    for k in 1..=7 {
        set(idx.upper[k - 1], along(k), e.cy - EYE_HALF_H * bulge(k));
        set(idx.lower[k - 1], along(k), e.cy + EYE_HALF_H * bulge(k));
        set(idx.crease[k - 1], along(k), e.cy - 0.008 - 0.035 * bulge(k));
    }
    set(idx.inner_ext, e.cx + e.outward * (EYE_HALF_W + 0.006), e.cy);
    set(idx.outer_ext, outer_x - e.outward * 0.006, e.cy);
    set(idx.outer_up, outer_x - e.outward * 0.01, e.cy - 0.006);

    let r = 0.011;
    set(idx.iris[0], e.cx, e.cy);
    set(idx.iris[1], e.cx + r, e.cy);
    set(idx.iris[2], e.cx, e.cy - r);
    set(idx.iris[3], e.cx - r, e.cy);
    set(idx.iris[4], e.cx, e.cy + r);
}

fn brow(set: &mut dyn FnMut(usize, f64, f64), e: &Eye, idx: [usize; 5]) {
    for (k, &i) in idx.iter().enumerate() {
        let t = k as f64 / 4.0;
        let x = e.cx + e.outward * (0.04 - t * 0.09);
        let y = 0.37 - 0.012 * (t * PI).sin();
        set(i, x, y);
    }
}

struct UnderEye {
    far: [usize; 2],
    /// Outer to inner, just below the lower lid.
    lid: [usize; 7],
    inner: [usize; 2],
    /// Inner to outer, lower on the cheek.
    arc: [usize; 5],
    tail: usize,
}

fn under_eye(set: &mut dyn FnMut(usize, f64, f64), e: &Eye, idx: UnderEye) {
    let outer_x = e.cx - e.outward * EYE_HALF_W;
    set(idx.far[0], outer_x - e.outward * 0.02, e.cy + 0.005);
    set(idx.far[1], outer_x - e.outward * 0.012, e.cy);
    for (k, &i) in idx.lid.iter().enumerate() {
        let t = (k as f64 + 0.5) / 7.0;
        set(
            i,
            outer_x + e.outward * t * 2.0 * EYE_HALF_W,
            e.cy + EYE_HALF_H + 0.012,
        );
    }
    set(idx.inner[0], e.cx + e.outward * (EYE_HALF_W + 0.006), e.cy + 0.012);
    set(idx.inner[1], e.cx + e.outward * (EYE_HALF_W + 0.004), e.cy + 0.03);
    for (k, &i) in idx.arc.iter().enumerate() {
        let t = k as f64 / 4.0;
        set(
            i,
            e.cx + e.outward * (EYE_HALF_W - t * 1.6 * EYE_HALF_W),
            e.cy + 0.06,
        );
    }
    set(idx.tail, outer_x - e.outward * 0.01, e.cy + 0.05);
}
