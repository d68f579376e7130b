//! ZCAM color appearance model
//!
//! Forward and inverse transforms between absolute CIE XYZ and ZCAM
//! lightness/chroma/hue, parameterized by explicit viewing conditions
//! (Safdar, Hardeberg & Luo 2021). Only the 1D attributes needed for
//! palette synthesis are computed; the 2D attributes are omitted.

use crate::color::{CieLab, CieXyzAbs, Srgb, ILLUMINANT_D65};

/// Reference white luminance for the sRGB viewing profile, in cd/m^2.
pub const SRGB_WHITE_LUMINANCE: f64 = 200.0;

// Izazbz constants
const B: f64 = 1.15;
const G: f64 = 0.66;
const IZ_EPSILON: f64 = 3.7035226210190005e-11;

// Modified perceptual quantizer constants (rho carries the 1.7 ZCAM factor)
const PQ_C1: f64 = 3424.0 / 4096.0;
const PQ_C2: f64 = 2413.0 / 128.0;
const PQ_C3: f64 = 2392.0 / 128.0;
const PQ_ETA: f64 = 2610.0 / 16384.0;
const PQ_RHO: f64 = 1.7 * 2523.0 / 32.0;

// XYZ' -> cone response matrix
const XYZ_TO_LMS: [[f64; 3]; 3] = [
    [0.41478972, 0.579999, 0.0146480],
    [-0.2015100, 1.120649, 0.0531008],
    [-0.0166008, 0.264800, 0.6684799],
];

// Colorfulness below this is treated as achromatic and gets hue 0
const ACHROMATIC_EPSILON: f64 = 1e-8;

// Chroma precision for the gamut search
const GAMUT_SEARCH_EPSILON: f64 = 1e-3;

// Linear-channel slack accepted as in-gamut
const GAMUT_CHANNEL_EPSILON: f64 = 1e-4;

/// Adaptation surround.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surround {
    Dark,
    Dim,
    Average,
}

impl Surround {
    /// Surround factor Fs.
    pub fn factor(self) -> f64 {
        match self {
            Surround::Dark => 0.525,
            Surround::Dim => 0.59,
            Surround::Average => 0.69,
        }
    }
}

/// Immutable bundle of adaptation parameters, computed once and shared
/// read-only by every conversion into and out of the appearance space.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewingConditions {
    pub surround: Surround,
    /// Adapting field luminance, cd/m^2.
    pub adapting_luminance: f64,
    /// Background luminance, cd/m^2.
    pub background_luminance: f64,
    /// Absolute-XYZ reference white.
    pub reference_white: CieXyzAbs,

    // Derived factors, fixed at construction
    fl: f64,
    fb: f64,
    iz_white: f64,
    qz_exp: f64,
    qz_mul: f64,
    qz_white: f64,
}

impl ViewingConditions {
    pub fn new(
        surround: Surround,
        adapting_luminance: f64,
        background_luminance: f64,
        reference_white: CieXyzAbs,
    ) -> Self {
        let fs = surround.factor();
        let fb = (background_luminance / reference_white.y).sqrt();
        let fl = 0.171
            * adapting_luminance.cbrt()
            * (1.0 - (-48.0 / 9.0 * adapting_luminance).exp());

        let (iz_white, _, _) = izazbz(reference_white);
        let qz_exp = 1.6 * fs / fb.powf(0.12);
        let qz_mul = fs.powf(2.2) * fb.powf(0.5) * fl.powf(0.2);
        let qz_white = 2700.0 * iz_white.powf(qz_exp) * qz_mul;

        Self {
            surround,
            adapting_luminance,
            background_luminance,
            reference_white,
            fl,
            fb,
            iz_white,
            qz_exp,
            qz_mul,
            qz_white,
        }
    }

    /// The fixed sRGB display profile: average surround, D65 white at
    /// 200 cd/m^2, adapting luminance at 40% of white, and a gray-world
    /// background (Lab L=50).
    pub fn srgb_defaults() -> Self {
        let background = CieLab::new(50.0, 0.0, 0.0).to_xyz().y * SRGB_WHITE_LUMINANCE;
        Self::new(
            Surround::Average,
            0.4 * SRGB_WHITE_LUMINANCE,
            background,
            ILLUMINANT_D65.to_abs(SRGB_WHITE_LUMINANCE),
        )
    }
}

/// A color expressed in ZCAM lightness (Jz), chroma (Cz) and hue (hz degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zcam {
    pub lightness: f64,
    pub chroma: f64,
    pub hue: f64,
}

impl Zcam {
    pub const fn new(lightness: f64, chroma: f64, hue: f64) -> Self {
        Self {
            lightness,
            chroma,
            hue,
        }
    }

    /// Forward transform from absolute XYZ. A zero-colorfulness input
    /// resolves to hue 0 rather than the undefined angle of a zero vector.
    pub fn from_xyz(xyz: CieXyzAbs, cond: &ViewingConditions) -> Self {
        let (iz, az, bz) = izazbz(xyz);

        let mut hue = bz.atan2(az).to_degrees();
        if hue < 0.0 {
            hue += 360.0;
        }

        let qz = 2700.0 * iz.max(0.0).powf(cond.qz_exp) * cond.qz_mul;
        let lightness = 100.0 * qz / cond.qz_white;

        let ez = hue_eccentricity(hue);
        let colorfulness = 100.0 * (az * az + bz * bz).powf(0.37) * ez.powf(0.068)
            * cond.fl.powf(0.2)
            / (cond.fb.powf(0.73) * cond.iz_white.powf(0.78));
        let chroma = 100.0 * colorfulness / cond.qz_white;

        if colorfulness < ACHROMATIC_EPSILON {
            hue = 0.0;
        }

        Self {
            lightness,
            chroma,
            hue,
        }
    }

    /// Inverse transform back to absolute XYZ under the same conditions.
    pub fn to_xyz(&self, cond: &ViewingConditions) -> CieXyzAbs {
        let qz = self.lightness * cond.qz_white / 100.0;
        let iz = (qz / (2700.0 * cond.qz_mul)).powf(1.0 / cond.qz_exp);

        let colorfulness = self.chroma * cond.qz_white / 100.0;
        let ez = hue_eccentricity(self.hue);
        let radius = (colorfulness * cond.iz_white.powf(0.78) * cond.fb.powf(0.73)
            / (100.0 * ez.powf(0.068) * cond.fl.powf(0.2)))
        .powf(1.0 / 0.74);

        let hue_rad = self.hue.to_radians();
        let az = radius * hue_rad.cos();
        let bz = radius * hue_rad.sin();

        // gp is known directly from Iz; solve the remaining 2x2 system for
        // the other two cone responses
        let gp = iz + IZ_EPSILON;
        let e1 = az + 4.066708 * gp;
        let e2 = bz - 1.096799 * gp;
        let det = 3.524000 * (-1.295875) - 0.542708 * 0.199076;
        let rp = (-1.295875 * e1 - 0.542708 * e2) / det;
        let bp = (3.524000 * e2 - 0.199076 * e1) / det;

        let lms = [pq_inv(rp), pq_inv(gp), pq_inv(bp)];
        let [xp, yp, z] = mat3_solve(&XYZ_TO_LMS, lms);

        let x = (xp + (B - 1.0) * z) / B;
        let y = (yp + (G - 1.0) * x) / G;
        CieXyzAbs::new(x, y, z)
    }

    /// Convert to sRGB, clamping out-of-gamut channels after gamma encode.
    pub fn to_srgb(&self, cond: &ViewingConditions) -> Srgb {
        self.to_xyz(cond)
            .to_rel(cond.reference_white.y)
            .to_linear_srgb()
            .to_srgb()
    }

    /// Whether the color lies inside the sRGB cube (within epsilon).
    pub fn in_srgb_gamut(&self, cond: &ViewingConditions) -> bool {
        let linear = self
            .to_xyz(cond)
            .to_rel(cond.reference_white.y)
            .to_linear_srgb();
        let lo = -GAMUT_CHANNEL_EPSILON;
        let hi = 1.0 + GAMUT_CHANNEL_EPSILON;
        linear.r >= lo
            && linear.r <= hi
            && linear.g >= lo
            && linear.g <= hi
            && linear.b >= lo
            && linear.b <= hi
    }

    /// Project into the sRGB gamut at constant lightness and hue by binary
    /// searching the largest representable chroma in [0, self.chroma].
    pub fn clipped_to_srgb_gamut(&self, cond: &ViewingConditions) -> Zcam {
        if self.in_srgb_gamut(cond) {
            return *self;
        }

        let mut lo = 0.0;
        let mut hi = self.chroma;
        while hi - lo > GAMUT_SEARCH_EPSILON {
            let mid = (lo + hi) / 2.0;
            let probe = Zcam::new(self.lightness, mid, self.hue);
            if probe.in_srgb_gamut(cond) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Zcam::new(self.lightness, lo, self.hue)
    }
}

fn izazbz(xyz: CieXyzAbs) -> (f64, f64, f64) {
    let xp = B * xyz.x - (B - 1.0) * xyz.z;
    let yp = G * xyz.y - (G - 1.0) * xyz.x;

    let rp = pq(XYZ_TO_LMS[0][0] * xp + XYZ_TO_LMS[0][1] * yp + XYZ_TO_LMS[0][2] * xyz.z);
    let gp = pq(XYZ_TO_LMS[1][0] * xp + XYZ_TO_LMS[1][1] * yp + XYZ_TO_LMS[1][2] * xyz.z);
    let bp = pq(XYZ_TO_LMS[2][0] * xp + XYZ_TO_LMS[2][1] * yp + XYZ_TO_LMS[2][2] * xyz.z);

    let iz = gp - IZ_EPSILON;
    let az = 3.524000 * rp - 4.066708 * gp + 0.542708 * bp;
    let bz = 0.199076 * rp + 1.096799 * gp - 1.295875 * bp;
    (iz, az, bz)
}

#[inline]
fn pq(x: f64) -> f64 {
    let t = (x.max(0.0) / 10000.0).powf(PQ_ETA);
    ((PQ_C1 + PQ_C2 * t) / (1.0 + PQ_C3 * t)).powf(PQ_RHO)
}

#[inline]
fn pq_inv(v: f64) -> f64 {
    let p = v.max(0.0).powf(1.0 / PQ_RHO);
    // p < C1 only from floating-point underflow around black
    let t = (p - PQ_C1).max(0.0) / (PQ_C2 - PQ_C3 * p);
    10000.0 * t.powf(1.0 / PQ_ETA)
}

#[inline]
fn hue_eccentricity(hue: f64) -> f64 {
    1.015 + (89.038 + hue).to_radians().cos()
}

// Solve m * out = v by Cramer's rule
fn mat3_solve(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

    let x = v[0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (v[1] * m[2][2] - m[1][2] * v[2])
        + m[0][2] * (v[1] * m[2][1] - m[1][1] * v[2]);
    let y = m[0][0] * (v[1] * m[2][2] - m[1][2] * v[2])
        - v[0] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * v[2] - v[1] * m[2][0]);
    let z = m[0][0] * (m[1][1] * v[2] - v[1] * m[2][1])
        - m[0][1] * (m[1][0] * v[2] - v[1] * m[2][0])
        + v[0] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

    [x / det, y / det, z / det]
}
