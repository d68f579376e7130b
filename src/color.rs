//! Color space conversion layer
//!
//! Pure, stateless conversions between device and tristimulus spaces:
//! sRGB <-> linear sRGB <-> CIE XYZ (relative and absolute) <-> CIE Lab.
//! Every conversion produces a new value; nothing is mutated in place.

use serde::{Deserialize, Serialize};

// sRGB (D65) to XYZ matrix
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.41239079926595934, 0.357584339383878, 0.1804807884018343],
    [0.21263900587151027, 0.715168678767756, 0.07219231536073371],
    [0.01933081871559182, 0.11919477979462598, 0.9505321522496607],
];

// XYZ to sRGB matrix (inverse of above)
const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [3.2409699419045226, -1.537383177570094, -0.4986107602930034],
    [-0.9692436362808796, 1.8759675015077202, 0.04155505740717559],
    [0.05563007969699366, -0.20397695888897652, 1.0569715142428786],
];

/// D65 white point, normalized to Y = 1. Matches the sRGB matrices above so
/// that sRGB white maps onto it exactly.
pub const ILLUMINANT_D65: CieXyz = CieXyz {
    x: 0.9504559270516716,
    y: 1.0,
    z: 1.0890577507598784,
};

// CIE Lab segment constants: E = (6/29)^3, K = (29/3)^3
const LAB_E: f64 = 216.0 / 24389.0;
const LAB_K: f64 = 24389.0 / 27.0;

/// Non-linear (gamma-encoded) sRGB color, channels nominally in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Create from a packed 32-bit ARGB value. The alpha byte is ignored.
    pub fn from_argb(argb: u32) -> Self {
        Self::from_rgb8(
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
        )
    }

    /// Quantize to 8-bit channels, clamping each channel to 0..255.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            quantize_channel(self.r),
            quantize_channel(self.g),
            quantize_channel(self.b),
        )
    }

    /// Pack as fully opaque 32-bit ARGB.
    pub fn to_argb(&self) -> u32 {
        let (r, g, b) = self.to_rgb8();
        0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    /// Decode the gamma curve.
    pub fn to_linear(&self) -> LinearSrgb {
        LinearSrgb {
            r: srgb_to_linear_channel(self.r),
            g: srgb_to_linear_channel(self.g),
            b: srgb_to_linear_channel(self.b),
        }
    }
}

/// Linear-light sRGB color, channels nominally in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSrgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LinearSrgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Gamma-encode. Each channel saturates to 0..1, which projects
    /// out-of-gamut colors to the nearest representable sRGB value.
    pub fn to_srgb(&self) -> Srgb {
        Srgb {
            r: linear_to_srgb_channel(self.r),
            g: linear_to_srgb_channel(self.g),
            b: linear_to_srgb_channel(self.b),
        }
    }

    pub fn to_xyz(&self) -> CieXyz {
        CieXyz {
            x: SRGB_TO_XYZ[0][0] * self.r + SRGB_TO_XYZ[0][1] * self.g + SRGB_TO_XYZ[0][2] * self.b,
            y: SRGB_TO_XYZ[1][0] * self.r + SRGB_TO_XYZ[1][1] * self.g + SRGB_TO_XYZ[1][2] * self.b,
            z: SRGB_TO_XYZ[2][0] * self.r + SRGB_TO_XYZ[2][1] * self.g + SRGB_TO_XYZ[2][2] * self.b,
        }
    }

    pub fn from_xyz(xyz: CieXyz) -> Self {
        Self {
            r: XYZ_TO_SRGB[0][0] * xyz.x + XYZ_TO_SRGB[0][1] * xyz.y + XYZ_TO_SRGB[0][2] * xyz.z,
            g: XYZ_TO_SRGB[1][0] * xyz.x + XYZ_TO_SRGB[1][1] * xyz.y + XYZ_TO_SRGB[1][2] * xyz.z,
            b: XYZ_TO_SRGB[2][0] * xyz.x + XYZ_TO_SRGB[2][1] * xyz.y + XYZ_TO_SRGB[2][2] * xyz.z,
        }
    }
}

/// CIE XYZ tristimulus values relative to a white of Y = 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieXyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CieXyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Scale to absolute luminance, `white_luminance` in cd/m^2.
    pub fn to_abs(&self, white_luminance: f64) -> CieXyzAbs {
        CieXyzAbs {
            x: self.x * white_luminance,
            y: self.y * white_luminance,
            z: self.z * white_luminance,
        }
    }

    pub fn to_linear_srgb(&self) -> LinearSrgb {
        LinearSrgb::from_xyz(*self)
    }
}

/// CIE XYZ scaled to absolute luminance in cd/m^2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieXyzAbs {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CieXyzAbs {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Scale back to relative XYZ given the white luminance used for `to_abs`.
    pub fn to_rel(&self, white_luminance: f64) -> CieXyz {
        CieXyz {
            x: self.x / white_luminance,
            y: self.y / white_luminance,
            z: self.z / white_luminance,
        }
    }
}

/// CIE Lab relative to D65.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl CieLab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn to_xyz(&self) -> CieXyz {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        CieXyz {
            x: lab_f_inv(fx) * ILLUMINANT_D65.x,
            y: lab_f_inv(fy) * ILLUMINANT_D65.y,
            z: lab_f_inv(fz) * ILLUMINANT_D65.z,
        }
    }

    pub fn from_xyz(xyz: CieXyz) -> Self {
        let fx = lab_f(xyz.x / ILLUMINANT_D65.x);
        let fy = lab_f(xyz.y / ILLUMINANT_D65.y);
        let fz = lab_f(xyz.z / ILLUMINANT_D65.z);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

#[inline]
fn srgb_to_linear_channel(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// Saturating: a fully driven channel must encode to exactly 1.0, and the
// curve formula lands at 0.999... for c = 1.0
#[inline]
fn linear_to_srgb_channel(c: f64) -> f64 {
    if c <= 0.0031308 {
        (c * 12.92).max(0.0)
    } else if c >= 1.0 {
        1.0
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn quantize_channel(c: f64) -> u8 {
    (c * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_E {
        t.cbrt()
    } else {
        (LAB_K * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(ft: f64) -> f64 {
    let t = ft * ft * ft;
    if t > LAB_E {
        t
    } else {
        (116.0 * ft - 16.0) / LAB_K
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{} != {} (tol {})", a, b, tol);
    }

    #[test]
    fn test_gamma_round_trip() {
        for i in 0..=255u16 {
            let c = i as f64 / 255.0;
            let linear = srgb_to_linear_channel(c);
            assert_close(linear_to_srgb_channel(linear), c, 1e-9);
        }
    }

    #[test]
    fn test_srgb_white_maps_to_d65() {
        let xyz = Srgb::new(1.0, 1.0, 1.0).to_linear().to_xyz();
        assert_close(xyz.x, ILLUMINANT_D65.x, 1e-9);
        assert_close(xyz.y, 1.0, 1e-9);
        assert_close(xyz.z, ILLUMINANT_D65.z, 1e-9);
    }

    #[test]
    fn test_xyz_round_trip() {
        let srgb = Srgb::from_rgb8(0x6B, 0x42, 0x26);
        let linear = srgb.to_linear();
        let back = linear.to_xyz().to_linear_srgb();
        assert_close(back.r, linear.r, 1e-6);
        assert_close(back.g, linear.g, 1e-6);
        assert_close(back.b, linear.b, 1e-6);
    }

    #[test]
    fn test_abs_scaling_round_trip() {
        let xyz = CieXyz::new(0.3, 0.4, 0.5);
        let back = xyz.to_abs(200.0).to_rel(200.0);
        assert_close(back.x, xyz.x, 1e-12);
        assert_close(back.y, xyz.y, 1e-12);
        assert_close(back.z, xyz.z, 1e-12);
    }

    #[test]
    fn test_lab_mid_gray_luminance() {
        // Lab L=50 gray sits at ~18.4% relative luminance
        let xyz = CieLab::new(50.0, 0.0, 0.0).to_xyz();
        assert_close(xyz.y, 0.18418, 1e-4);
        assert_close(xyz.x / ILLUMINANT_D65.x, xyz.y, 1e-9);
    }

    #[test]
    fn test_lab_round_trip() {
        let lab = CieLab::new(63.2, 24.5, -18.0);
        let back = CieLab::from_xyz(lab.to_xyz());
        assert_close(back.l, lab.l, 1e-9);
        assert_close(back.a, lab.a, 1e-9);
        assert_close(back.b, lab.b, 1e-9);
    }

    #[test]
    fn test_argb_packing() {
        let srgb = Srgb::from_argb(0x006B4226);
        assert_eq!(srgb.to_rgb8(), (0x6B, 0x42, 0x26));
        // Alpha is forced opaque on output regardless of input
        assert_eq!(srgb.to_argb(), 0xFF6B4226);
    }

    #[test]
    fn test_saturated_channel_encodes_exactly() {
        let white = LinearSrgb::new(1.0, 1.0, 1.0).to_srgb();
        assert_eq!((white.r, white.g, white.b), (1.0, 1.0, 1.0));
        let black = LinearSrgb::new(0.0, -1e-15, 0.0).to_srgb();
        assert_eq!((black.r, black.g, black.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_gamut_clamps() {
        let srgb = LinearSrgb::new(1.4, -0.2, 0.5).to_srgb();
        assert_eq!(srgb.r, 1.0);
        assert_eq!(srgb.g, 0.0);
        assert!(srgb.b > 0.0 && srgb.b < 1.0);
        let (r, g, _) = srgb.to_rgb8();
        assert_eq!((r, g), (255, 0));
    }
}
