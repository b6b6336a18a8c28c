use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter};

use crate::{UInt, error::FarmError};

/// Longest growth cycle a crop may declare. Growth stages `0..=MAX_GROWTH_CYCLE`
/// are what the state encoder reserves per crop slot.
pub const MAX_GROWTH_CYCLE: UInt = 4;

// A crop kind. The declaration order is the slot order in `FarmState::crops_growth`.
#[derive(Debug, Clone, Copy, EnumIter, EnumCount, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crop {
    Tomato,
    Carrot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    /// Days of growth until the crop can be harvested.
    pub growth_cycle: UInt,
    pub seed_cost: UInt,
    pub fertilizer_need: UInt,
    pub water_need: UInt,
    /// Harvest payout per unit of market price.
    pub reward: f32,
}

impl Crop {
    pub fn spec(&self) -> CropSpec {
        match self {
            Crop::Tomato => CropSpec {
                growth_cycle: 3,
                seed_cost: 2,
                fertilizer_need: 1,
                water_need: 1,
                reward: 10.0,
            },
            Crop::Carrot => CropSpec {
                growth_cycle: 2,
                seed_cost: 1,
                fertilizer_need: 1,
                water_need: 1,
                reward: 5.0,
            },
        }
    }

    /// Position of this crop's entry in the growth vector.
    pub fn slot(&self) -> usize {
        *self as usize
    }
}

impl CropSpec {
    pub fn validate(&self, crop: Crop) -> Result<(), FarmError> {
        let invalid = |reason: String| FarmError::InvalidCropSpec { crop, reason };
        if self.growth_cycle == 0 {
            return Err(invalid("growth cycle must be positive".to_string()));
        }
        if self.growth_cycle > MAX_GROWTH_CYCLE {
            return Err(invalid(format!(
                "growth cycle {} exceeds the maximum of {}",
                self.growth_cycle, MAX_GROWTH_CYCLE
            )));
        }
        if !(self.reward.is_finite() && self.reward > 0.0) {
            return Err(invalid(format!("reward {} must be positive", self.reward)));
        }
        Ok(())
    }
}

/// Checks the static crop table. Called once at startup; any error is fatal.
pub fn validate_crop_specs() -> Result<(), FarmError> {
    Crop::iter().try_for_each(|crop| crop.spec().validate(crop))
}
