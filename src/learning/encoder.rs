use strum::{EnumCount, IntoEnumIterator};

use crate::{
    MAX_MARKET_PRICE, MIN_MARKET_PRICE, UInt, crops::Crop, crops::MAX_GROWTH_CYCLE,
    state::FarmState, weather::Weather,
};

/// Buckets per resource counter. Larger counts share the top bucket.
pub const RESOURCE_BUCKETS: usize = 20;
/// Buckets per crop slot: growth stages `0..=MAX_GROWTH_CYCLE`.
pub const GROWTH_BUCKETS: usize = MAX_GROWTH_CYCLE as usize + 1;
pub const PRICE_BUCKETS: usize = (MAX_MARKET_PRICE - MIN_MARKET_PRICE + 1) as usize;

/// Maps a state to a Q-table row.
pub trait StateEncoder {
    /// Number of rows; every encoded index is below this.
    fn capacity(&self) -> usize;
    fn encode(&self, state: &FarmState) -> usize;
}

/// Mixed-radix encoding of the clipped state fields.
///
/// Within the declared bucket ranges distinct states get distinct rows. Out of
/// range fields are clipped to their nearest bucket, so the index is always
/// below `capacity()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedRadixEncoder {
    radices: Vec<usize>,
}

impl Default for MixedRadixEncoder {
    fn default() -> Self {
        let mut radices = vec![RESOURCE_BUCKETS; 3];
        radices.extend(std::iter::repeat_n(GROWTH_BUCKETS, Crop::COUNT));
        radices.push(Weather::COUNT);
        radices.push(PRICE_BUCKETS);
        MixedRadixEncoder { radices }
    }
}

impl MixedRadixEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-field digits, clipped into range, in radix order.
    fn digits(&self, state: &FarmState) -> Vec<usize> {
        let clip = |value: UInt, buckets: usize| (value as usize).min(buckets - 1);
        let mut digits = vec![
            clip(state.seeds, RESOURCE_BUCKETS),
            clip(state.fertilizer, RESOURCE_BUCKETS),
            clip(state.water, RESOURCE_BUCKETS),
        ];
        digits.extend(Crop::iter().map(|crop| clip(state.growth(crop), GROWTH_BUCKETS)));
        digits.push(state.weather.index());
        digits.push(clip(
            state.market_price.max(MIN_MARKET_PRICE) - MIN_MARKET_PRICE,
            PRICE_BUCKETS,
        ));
        digits
    }
}

impl StateEncoder for MixedRadixEncoder {
    fn capacity(&self) -> usize {
        self.radices.iter().product()
    }

    fn encode(&self, state: &FarmState) -> usize {
        self.digits(state)
            .into_iter()
            .zip(&self.radices)
            .fold(0, |index, (digit, radix)| index * radix + digit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;
    use std::collections::HashSet;

    fn state(seeds: UInt, fertilizer: UInt, water: UInt) -> FarmState {
        FarmState {
            seeds,
            fertilizer,
            water,
            crops_growth: [0, 0],
            weather: Weather::Sunny,
            market_price: 1,
        }
    }

    #[test]
    fn test_capacity() {
        let encoder = MixedRadixEncoder::new();
        assert_eq!(encoder.capacity(), 20 * 20 * 20 * 5 * 5 * 3 * 10);
    }

    #[test]
    fn test_extreme_states() {
        let encoder = MixedRadixEncoder::new();
        assert_eq!(encoder.encode(&state(0, 0, 0)), 0);

        let top = FarmState {
            seeds: 19,
            fertilizer: 19,
            water: 19,
            crops_growth: [4, 4],
            weather: Weather::Stormy,
            market_price: 10,
        };
        assert_eq!(encoder.encode(&top), encoder.capacity() - 1);
    }

    #[test]
    fn test_out_of_range_fields_are_clipped() {
        let encoder = MixedRadixEncoder::new();
        assert_eq!(encoder.encode(&state(500, 3, 4)), encoder.encode(&state(19, 3, 4)));

        let mut s = state(1, 2, 3);
        s.market_price = 0;
        let mut floor = s.clone();
        floor.market_price = 1;
        assert_eq!(encoder.encode(&s), encoder.encode(&floor));

        s.market_price = 99;
        assert!(encoder.encode(&s) < encoder.capacity());
    }

    #[test]
    fn test_distinct_rows_for_growth_weather_price() {
        let encoder = MixedRadixEncoder::new();
        let weathers: Vec<Weather> = Weather::iter().collect();
        let rows: HashSet<usize> = iproduct!(0..5u32, 0..5u32, weathers, 1..=10u32)
            .map(|(tomato, carrot, weather, price)| {
                encoder.encode(&FarmState {
                    crops_growth: [tomato, carrot],
                    weather,
                    market_price: price,
                    ..state(7, 8, 9)
                })
            })
            .collect();
        assert_eq!(rows.len(), 5 * 5 * 3 * 10);
    }
}
