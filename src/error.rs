//! Error types for the engine

use crate::targets::Family;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("tonal palette for {family:?} is missing shade {shade}")]
    MissingShade { family: Family, shade: u16 },

    #[error("overlay id {id} is already occupied; family base ids must be at least 12 apart")]
    OverlayCollision { id: u32 },

    #[error("image decode error: {0}")]
    ImageDecode(String),
}
