use std::str::FromStr;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::StandardUniform as Standard;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, FromRepr};

use crate::{crops::Crop, error::FarmError};

/// The fixed action vocabulary. Declaration order is the Q-table column order
/// and the order front-ends should render controls in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumCount,
    FromRepr,
    AsRefStr,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Action {
    BuySeeds,
    BuyFertilizer,
    BuyWater,
    PlantTomato,
    PlantCarrot,
    Harvest,
    DoNothing,
}

impl Action {
    /// Column of this action in the Q-table.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Action::from_repr(index)
    }

    /// The crop sown by a planting action.
    pub fn planted_crop(&self) -> Option<Crop> {
        match self {
            Action::PlantTomato => Some(Crop::Tomato),
            Action::PlantCarrot => Some(Crop::Carrot),
            _ => None,
        }
    }

    pub fn is_purchase(&self) -> bool {
        matches!(
            self,
            Action::BuySeeds | Action::BuyFertilizer | Action::BuyWater
        )
    }
}

impl FromStr for Action {
    type Err = FarmError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Action::iter()
            .find(|action| action.as_ref() == token)
            .ok_or_else(|| FarmError::InvalidAction(token.to_string()))
    }
}

impl Distribution<Action> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::from_repr(rng.random_range(0..Action::COUNT)).unwrap_or(Action::DoNothing)
    }
}
