use rand::Rng;
use rand::distr::Distribution;
use rand::distr::StandardUniform as Standard;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, FromRepr};

/// Chance that a storm wipes out each growing crop.
pub const STORM_LOSS_PROBABILITY: f64 = 0.5;

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
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Rainy,
    Stormy,
}

impl Weather {
    /// Daily probability of this condition. Weights over all conditions sum to one.
    pub fn probability(&self) -> f64 {
        match self {
            Weather::Sunny => 0.6,
            Weather::Rainy => 0.3,
            Weather::Stormy => 0.1,
        }
    }

    /// Crops don't grow under a destructive condition and may be lost.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Weather::Stormy)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Distribution<Weather> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Weather {
        let Ok(dist) = WeightedIndex::new(Weather::iter().map(|w| w.probability())) else {
            return Weather::Sunny;
        };
        Weather::from_repr(dist.sample(rng)).unwrap_or(Weather::Sunny)
    }
}
