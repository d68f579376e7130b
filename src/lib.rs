//! Seed-to-palette theming engine
//!
//! Derives a perceptually uniform, multi-shade color palette from a single
//! sRGB seed color and packs it into an id -> ARGB overlay table for a
//! platform resource system:
//!
//! 1. Build [`ViewingConditions`] once (fixed sRGB display profile)
//! 2. Build seed-independent [`Targets`] from the policy knobs
//! 3. Build a [`DynamicScheme`] from the seed (wallpaper dominant color or
//!    user override), five tonal palettes of twelve shades each
//! 4. [`assemble`] the scheme into a frozen [`OverlayTable`]
//!
//! Everything is synchronous, pure computation; conditions and targets are
//! immutable and safely shared across scheme builds for different seeds.

mod color;
mod error;
pub mod extract;
mod overlay;
mod policy;
mod scheme;
mod targets;
mod zcam;

pub use color::{CieLab, CieXyz, CieXyzAbs, LinearSrgb, Srgb, ILLUMINANT_D65};
pub use error::EngineError;
pub use overlay::{assemble, OverlayTable, OverlayTableBuilder};
pub use policy::Policy;
pub use scheme::{DynamicScheme, SeedSource, TonalPalette};
pub use targets::{Family, FamilyTarget, Targets, SHADES};
pub use zcam::{Surround, ViewingConditions, Zcam, SRGB_WHITE_LUMINANCE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline() {
        let cond = ViewingConditions::srgb_defaults();
        let targets = Targets::build(1.0, false, &cond);
        let source = SeedSource::wallpaper(Srgb::from_argb(0xFF6B4226));
        let scheme =
            DynamicScheme::with_policy(&targets, &source, Policy::default(), &cond).unwrap();
        let table = assemble(&scheme, &cond, [1000, 1020, 1040, 1060, 1080]).unwrap();

        assert_eq!(table.len(), Family::ALL.len() * SHADES.len());
        for (_, argb) in table.iter() {
            assert_eq!(argb >> 24, 0xFF);
        }
    }

    #[test]
    fn test_targets_reusable_across_seeds() {
        let cond = ViewingConditions::srgb_defaults();
        let targets = Targets::build(1.0, false, &cond);
        for seed in [0xFF6B4226u32, 0xFF1E6FD9, 0xFF2E7D32] {
            let scheme =
                DynamicScheme::build(&targets, Srgb::from_argb(seed), 1.0, &cond, true).unwrap();
            let table = assemble(&scheme, &cond, [0, 100, 200, 300, 400]).unwrap();
            assert_eq!(table.len(), 60);
        }
    }
}
