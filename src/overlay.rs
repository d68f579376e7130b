//! Overlay resource table
//!
//! Packs a dynamic scheme into the id -> ARGB mapping consumed by the
//! platform resource system. Each family occupies twelve consecutive ids
//! starting at its externally assigned base id; every value is forced
//! fully opaque. The table is built once through the builder and is
//! read-only afterwards.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::scheme::{DynamicScheme, TonalPalette};
use crate::targets::SHADES;
use crate::zcam::ViewingConditions;

/// Frozen id -> packed-ARGB mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayTable {
    entries: BTreeMap<u32, u32>,
}

impl OverlayTable {
    pub fn get(&self, id: u32) -> Option<u32> {
        self.entries.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().map(|(id, argb)| (*id, *argb))
    }
}

/// Accumulates one family palette at a time, then freezes into an
/// [`OverlayTable`]. Each builder owns its table exclusively; build a new
/// builder per scheme instead of reusing a finished table.
#[derive(Debug, Default)]
pub struct OverlayTableBuilder {
    entries: BTreeMap<u32, u32>,
}

impl OverlayTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one palette at `base_id`, one id per shade in ascending
    /// lightness order. Fails if any id is already occupied, which is what
    /// base ids spaced closer than twelve apart produce.
    pub fn add_palette(
        &mut self,
        palette: &TonalPalette,
        base_id: u32,
        cond: &ViewingConditions,
    ) -> Result<&mut Self, EngineError> {
        for (index, (_, color)) in palette.iter().enumerate() {
            let id = base_id + index as u32;
            let argb = color.to_srgb(cond).to_argb();
            if self.entries.insert(id, argb).is_some() {
                return Err(EngineError::OverlayCollision { id });
            }
        }
        Ok(self)
    }

    pub fn finish(self) -> OverlayTable {
        OverlayTable {
            entries: self.entries,
        }
    }
}

/// Assemble the full overlay table for a scheme. `base_ids` are the five
/// externally assigned family base ids, in family emission order
/// (neutral1, neutral2, accent1, accent2, accent3).
pub fn assemble(
    scheme: &DynamicScheme,
    cond: &ViewingConditions,
    base_ids: [u32; 5],
) -> Result<OverlayTable, EngineError> {
    let mut builder = OverlayTableBuilder::new();
    for ((_, palette), base_id) in scheme.families().into_iter().zip(base_ids) {
        builder.add_palette(palette, base_id, cond)?;
    }
    let table = builder.finish();
    debug_assert_eq!(table.len(), SHADES.len() * base_ids.len());
    tracing::debug!("assembled overlay table with {} entries", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::policy::Policy;
    use crate::scheme::SeedSource;
    use crate::targets::Targets;

    const BASE_IDS: [u32; 5] = [1000, 1020, 1040, 1060, 1080];

    fn build_table(seed: u32) -> OverlayTable {
        let cond = ViewingConditions::srgb_defaults();
        let targets = Targets::build(1.0, false, &cond);
        let scheme =
            DynamicScheme::build(&targets, Srgb::from_argb(seed), 1.0, &cond, true).unwrap();
        assemble(&scheme, &cond, BASE_IDS).unwrap()
    }

    fn luminance(argb: u32) -> f64 {
        Srgb::from_argb(argb).to_linear().to_xyz().y
    }

    #[test]
    fn test_warm_brown_scenario() {
        let table = build_table(0xFF6B4226);
        assert_eq!(table.len(), 60);

        // Exactly the five 12-id ranges, nothing else
        let ids: Vec<u32> = table.iter().map(|(id, _)| id).collect();
        let expected: Vec<u32> = BASE_IDS
            .iter()
            .flat_map(|base| (0..12).map(move |i| base + i))
            .collect();
        assert_eq!(ids, expected);

        // All entries fully opaque
        for (_, argb) in table.iter() {
            assert_eq!(argb >> 24, 0xFF);
        }

        // Neutral family: darkest shade far below the lightest
        let darkest = luminance(table.get(1000).unwrap());
        let lightest = luminance(table.get(1011).unwrap());
        assert!(darkest < 0.05, "darkest luminance {}", darkest);
        assert!(lightest > 0.8, "lightest luminance {}", lightest);
    }

    #[test]
    fn test_luminance_ascends_within_each_family() {
        let table = build_table(0xFF1E6FD9);
        for base in BASE_IDS {
            let mut previous = -1.0;
            for i in 0..12 {
                let y = luminance(table.get(base + i).unwrap());
                assert!(y > previous, "family at {} not ascending at index {}", base, i);
                previous = y;
            }
        }
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let first = build_table(0xFF6B4226);
        let second = build_table(0xFF6B4226);
        assert_eq!(first, second);
    }

    #[test]
    fn test_gray_seed_produces_full_table() {
        let table = build_table(0xFF808080);
        assert_eq!(table.len(), 60);
        // Every neutral entry is pure gray
        for i in 0..12 {
            let argb = table.get(1000 + i).unwrap();
            let (r, g, b) = Srgb::from_argb(argb).to_rgb8();
            assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1, "{:08X}", argb);
        }
    }

    #[test]
    fn test_base_id_collision_is_fatal() {
        let cond = ViewingConditions::srgb_defaults();
        let targets = Targets::build(1.0, false, &cond);
        let source = SeedSource::wallpaper(Srgb::from_argb(0xFF6B4226));
        let scheme =
            DynamicScheme::with_policy(&targets, &source, Policy::default(), &cond).unwrap();

        // Base ids only 8 apart
        let result = assemble(&scheme, &cond, [1000, 1008, 1040, 1060, 1080]);
        assert!(matches!(
            result,
            Err(EngineError::OverlayCollision { id: 1008 })
        ));
    }

    #[test]
    fn test_builder_owns_insertion_order() {
        let cond = ViewingConditions::srgb_defaults();
        let targets = Targets::build(1.0, false, &cond);
        let scheme =
            DynamicScheme::build(&targets, Srgb::from_argb(0xFF2E7D32), 1.0, &cond, true).unwrap();

        let mut builder = OverlayTableBuilder::new();
        builder
            .add_palette(&scheme.accent1, 500, &cond)
            .unwrap()
            .add_palette(&scheme.neutral1, 100, &cond)
            .unwrap();
        let table = builder.finish();
        assert_eq!(table.len(), 24);
        let first = table.iter().next().unwrap().0;
        assert_eq!(first, 100);
    }
}
