//! Palette targets
//!
//! The five color families, the fixed shade list, and the seed-independent
//! hue/chroma policy derived from viewing conditions. A `Targets` value can
//! generate schemes for any number of seeds.

use crate::color::CieLab;
use crate::zcam::{ViewingConditions, Zcam};

/// The fixed shade identifiers, ordered by ascending perceptual lightness
/// (10 darkest, 1000 lightest).
pub const SHADES: [u16; 12] = [10, 50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

// CIELAB L* per shade, same order as SHADES
const SHADE_LSTAR: [f64; 12] = [
    0.0, 9.9, 19.8, 29.8, 39.7, 49.6, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0,
];

// Accent1 carries the full target chroma; every other family is a fixed
// fraction of it
const ACCENT1_CHROMA: f64 = 48.0;
const ACCENT3_HUE_SHIFT: f64 = 60.0;

/// Color family identifiers, in overlay emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Neutral1,
    Neutral2,
    Accent1,
    Accent2,
    Accent3,
}

impl Family {
    pub const ALL: [Family; 5] = [
        Family::Neutral1,
        Family::Neutral2,
        Family::Accent1,
        Family::Accent2,
        Family::Accent3,
    ];
}

/// Hue/chroma rule for one family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilyTarget {
    pub family: Family,
    /// Target chroma, already scaled by the chroma factor.
    pub chroma: f64,
    /// Hue offset in degrees applied to the seed hue.
    pub hue_shift: f64,
}

/// Seed-independent palette policy: per-shade appearance-space lightness and
/// the per-family hue/chroma rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Targets {
    shade_lightness: [f64; 12],
    families: [FamilyTarget; 5],
}

impl Targets {
    /// Derive targets from viewing conditions and the two policy knobs.
    ///
    /// `chroma_factor` scales every family chroma uniformly. With
    /// `linear_lightness` the shade values are used directly as ZCAM
    /// lightness; otherwise each is treated as CIELAB L* and mapped to the
    /// lightness of the equivalent neutral gray under `cond`.
    pub fn build(chroma_factor: f64, linear_lightness: bool, cond: &ViewingConditions) -> Self {
        let mut shade_lightness = [0.0; 12];
        for (slot, lstar) in shade_lightness.iter_mut().zip(SHADE_LSTAR) {
            *slot = if linear_lightness {
                lstar
            } else {
                let gray = CieLab::new(lstar, 0.0, 0.0)
                    .to_xyz()
                    .to_abs(cond.reference_white.y);
                Zcam::from_xyz(gray, cond).lightness
            };
        }

        let family = |family, chroma, hue_shift| FamilyTarget {
            family,
            chroma: chroma * chroma_factor,
            hue_shift,
        };
        let families = [
            family(Family::Neutral1, ACCENT1_CHROMA / 12.0, 0.0),
            family(Family::Neutral2, ACCENT1_CHROMA / 6.0, 0.0),
            family(Family::Accent1, ACCENT1_CHROMA, 0.0),
            family(Family::Accent2, ACCENT1_CHROMA / 3.0, 0.0),
            family(Family::Accent3, ACCENT1_CHROMA * 2.0 / 3.0, ACCENT3_HUE_SHIFT),
        ];

        Self {
            shade_lightness,
            families,
        }
    }

    /// Appearance-space lightness per shade, in `SHADES` order.
    pub fn shade_lightness(&self) -> &[f64; 12] {
        &self.shade_lightness
    }

    pub fn families(&self) -> &[FamilyTarget; 5] {
        &self.families
    }

    /// The chroma every other family is scaled against (accent1's target).
    pub fn reference_chroma(&self) -> f64 {
        self.families[2].chroma
    }
}
