use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{actions::Action, crops::Crop, state::FarmState};

/// Penalty for a planting attempt that cannot go ahead.
pub const FAILED_PLANTING_PENALTY: f32 = -5.0;
/// Penalty per growing crop for idling through a storm.
pub const STORM_IDLE_PENALTY: f32 = -3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub val: f32,
}

impl Reward {
    pub fn new(val: f32) -> Self {
        Reward { val }
    }
}

/// Cost of an effective purchase.
fn purchase_cost(action: Action) -> f32 {
    match action {
        Action::BuySeeds => -3.0,
        Action::BuyFertilizer => -2.0,
        Action::BuyWater => -1.0,
        _ => 0.0,
    }
}

/// Reward for taking `action` in `state` and landing in `next_state`.
///
/// Pure: depends only on its arguments.
pub fn reward(state: &FarmState, action: Action, next_state: &FarmState) -> Reward {
    let val = match action {
        Action::BuySeeds if next_state.seeds > state.seeds => purchase_cost(action),
        Action::BuyFertilizer if next_state.fertilizer > state.fertilizer => {
            purchase_cost(action)
        }
        Action::BuyWater if next_state.water > state.water => purchase_cost(action),
        Action::BuySeeds | Action::BuyFertilizer | Action::BuyWater => 0.0,
        Action::PlantTomato | Action::PlantCarrot => match action.planted_crop() {
            Some(crop) if state.can_plant(crop) => -(crop.spec().seed_cost as f32),
            _ => FAILED_PLANTING_PENALTY,
        },
        // Harvest pays out for the crops that were mature when it was taken.
        Action::Harvest => Crop::iter()
            .filter(|crop| state.is_mature(*crop))
            .map(|crop| crop.spec().reward * state.market_price as f32)
            .sum::<f32>(),
        Action::DoNothing if state.weather.is_destructive() => Crop::iter()
            .filter(|crop| state.is_growing(*crop))
            .map(|_| STORM_IDLE_PENALTY)
            .sum::<f32>(),
        Action::DoNothing => 0.0,
    };
    Reward::new(val)
}
