//! Dynamic color scheme
//!
//! Derives the five tonal palettes from a seed color:
//! 1. Resolve the effective seed (wallpaper color or user override)
//! 2. Analyze the seed in the appearance space to get its hue and chroma
//! 3. Anchor each family with the seed hue (plus its shift) and a chroma
//!    scaled against the accent1 target
//! 4. Render every shade at the target lightness, shrinking chroma into
//!    gamut per shade when accurate shades are enabled

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::EngineError;
use crate::policy::Policy;
use crate::targets::{Family, FamilyTarget, Targets, SHADES};
use crate::zcam::{ViewingConditions, Zcam};

/// Where the seed color comes from. The override color wins only when both
/// the override and the custom-color user settings are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedSource {
    /// Dominant color extracted from the wallpaper.
    pub wallpaper: Srgb,
    /// User-chosen override color, if any.
    pub override_color: Option<Srgb>,
    /// The override setting is present.
    pub override_enabled: bool,
    /// The custom-color feature is switched on.
    pub custom_color_enabled: bool,
}

impl SeedSource {
    /// A plain wallpaper-driven source with no override.
    pub fn wallpaper(color: Srgb) -> Self {
        Self {
            wallpaper: color,
            override_color: None,
            override_enabled: false,
            custom_color_enabled: false,
        }
    }

    /// Resolve the effective seed color.
    pub fn seed(&self) -> Srgb {
        match self.override_color {
            Some(color) if self.override_enabled && self.custom_color_enabled => color,
            _ => self.wallpaper,
        }
    }
}

/// One family's colors across the fixed shades, in ascending lightness
/// order. Construction fails if any shade is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TonalPalette {
    shades: BTreeMap<u16, Zcam>,
}

impl TonalPalette {
    fn from_shades(family: Family, shades: BTreeMap<u16, Zcam>) -> Result<Self, EngineError> {
        for shade in SHADES {
            if !shades.contains_key(&shade) {
                return Err(EngineError::MissingShade { family, shade });
            }
        }
        debug_assert_eq!(shades.len(), SHADES.len());
        Ok(Self { shades })
    }

    pub fn get(&self, shade: u16) -> Option<Zcam> {
        self.shades.get(&shade).copied()
    }

    /// Iterate shades in ascending lightness order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Zcam)> + '_ {
        self.shades.iter().map(|(shade, color)| (*shade, *color))
    }
}

/// The five tonal palettes generated from one seed.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicScheme {
    pub neutral1: TonalPalette,
    pub neutral2: TonalPalette,
    pub accent1: TonalPalette,
    pub accent2: TonalPalette,
    pub accent3: TonalPalette,
}

impl DynamicScheme {
    /// Build a scheme from an already-resolved seed color.
    pub fn build(
        targets: &Targets,
        seed: Srgb,
        chroma_factor: f64,
        cond: &ViewingConditions,
        accurate_shades: bool,
    ) -> Result<Self, EngineError> {
        let xyz = seed.to_linear().to_xyz().to_abs(cond.reference_white.y);
        let mut seed_color = Zcam::from_xyz(xyz, cond);
        seed_color.chroma *= chroma_factor;

        // An achromatic seed has no usable hue; pin it to the neutral axis
        // instead of keeping the noise angle the transform produced
        if (seed.r - seed.g).abs() < 1e-9 && (seed.g - seed.b).abs() < 1e-9 {
            seed_color.chroma = 0.0;
            seed_color.hue = 0.0;
        }

        // Muted seeds mute the whole scheme proportionally
        let reference = targets.reference_chroma();
        let chroma_scale = if reference > 0.0 {
            seed_color.chroma.min(reference) / reference
        } else {
            0.0
        };
        tracing::debug!(
            "seed hue {:.2} chroma {:.2}, chroma scale {:.3}",
            seed_color.hue,
            seed_color.chroma,
            chroma_scale,
        );

        let build_family = |target: &FamilyTarget| {
            let hue = (seed_color.hue + target.hue_shift).rem_euclid(360.0);
            let chroma = target.chroma * chroma_scale;

            let mut shades = BTreeMap::new();
            for (shade, lightness) in SHADES.into_iter().zip(targets.shade_lightness()) {
                let mut color = Zcam::new(*lightness, chroma, hue);
                if accurate_shades {
                    color = color.clipped_to_srgb_gamut(cond);
                }
                shades.insert(shade, color);
            }
            TonalPalette::from_shades(target.family, shades)
        };

        let families = targets.families();
        Ok(Self {
            neutral1: build_family(&families[0])?,
            neutral2: build_family(&families[1])?,
            accent1: build_family(&families[2])?,
            accent2: build_family(&families[3])?,
            accent3: build_family(&families[4])?,
        })
    }

    /// Build a scheme from a seed source and a policy record.
    pub fn with_policy(
        targets: &Targets,
        source: &SeedSource,
        policy: Policy,
        cond: &ViewingConditions,
    ) -> Result<Self, EngineError> {
        Self::build(
            targets,
            source.seed(),
            policy.chroma_factor,
            cond,
            policy.accurate_shades,
        )
    }

    /// The palettes paired with their family ids, in emission order.
    pub fn families(&self) -> [(Family, &TonalPalette); 5] {
        [
            (Family::Neutral1, &self.neutral1),
            (Family::Neutral2, &self.neutral2),
            (Family::Accent1, &self.accent1),
            (Family::Accent2, &self.accent2),
            (Family::Accent3, &self.accent3),
        ]
    }
}
