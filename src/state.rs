use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    MAX_MARKET_PRICE, MIN_MARKET_PRICE, UInt,
    actions::Action,
    config::SimulationConfig,
    crops::Crop,
    weather::{STORM_LOSS_PROBABILITY, Weather},
};

/// What each purchase costs in another resource.
const SEEDS_PRICE_IN_FERTILIZER: UInt = 3;
const FERTILIZER_PRICE_IN_WATER: UInt = 2;
const WATER_PRICE_IN_SEEDS: UInt = 1;

/// A snapshot of the farm at the start of a day.
///
/// States are values: every transition returns a new state and leaves the
/// previous one untouched, so a state can be encoded and compared safely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarmState {
    pub seeds: UInt,
    pub fertilizer: UInt,
    pub water: UInt,
    /// Days grown per crop slot: 0 is empty, `growth_cycle` is ready to harvest.
    pub crops_growth: [UInt; Crop::COUNT],
    pub weather: Weather,
    pub market_price: UInt,
}

impl FarmState {
    /// Fresh state for a new episode: configured resources, an empty plot and
    /// random weather and price.
    pub fn initial<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        FarmState {
            seeds: config.initial_seeds,
            fertilizer: config.initial_fertilizer,
            water: config.initial_water,
            crops_growth: [0; Crop::COUNT],
            weather: rng.random(),
            market_price: random_market_price(rng),
        }
    }

    pub fn growth(&self, crop: Crop) -> UInt {
        self.crops_growth[crop.slot()]
    }

    pub fn is_growing(&self, crop: Crop) -> bool {
        self.growth(crop) > 0
    }

    pub fn is_mature(&self, crop: Crop) -> bool {
        self.growth(crop) == crop.spec().growth_cycle
    }

    /// True when nothing is planted in any slot.
    pub fn plot_is_empty(&self) -> bool {
        self.crops_growth.iter().all(|g| *g == 0)
    }

    pub fn can_afford(&self, crop: Crop) -> bool {
        let spec = crop.spec();
        self.seeds >= spec.seed_cost
            && self.fertilizer >= spec.fertilizer_need
            && self.water >= spec.water_need
    }

    /// Planting needs the whole plot empty and enough resources.
    pub fn can_plant(&self, crop: Crop) -> bool {
        self.plot_is_empty() && self.can_afford(crop)
    }

    pub fn can_purchase(&self, action: Action) -> bool {
        match action {
            Action::BuySeeds => self.fertilizer >= SEEDS_PRICE_IN_FERTILIZER,
            Action::BuyFertilizer => self.water >= FERTILIZER_PRICE_IN_WATER,
            Action::BuyWater => self.seeds >= WATER_PRICE_IN_SEEDS,
            _ => false,
        }
    }

    /// Applies the deterministic effect of the action. Returns the crop planted
    /// today, if any, which sits out today's growth tick.
    fn act(&mut self, action: Action) -> Option<Crop> {
        match action {
            _ if action.is_purchase() => {
                if self.can_purchase(action) {
                    self.purchase(action);
                }
                None
            }
            Action::PlantTomato | Action::PlantCarrot => {
                let crop = action.planted_crop()?;
                if !self.can_plant(crop) {
                    return None;
                }
                let spec = crop.spec();
                self.seeds -= spec.seed_cost;
                self.fertilizer -= spec.fertilizer_need;
                self.water -= spec.water_need;
                self.crops_growth[crop.slot()] = 1;
                Some(crop)
            }
            Action::Harvest => {
                for crop in Crop::iter() {
                    if self.is_mature(crop) {
                        self.crops_growth[crop.slot()] = 0;
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Trades the spent resource for the bought one. Affordability is checked by the caller.
    fn purchase(&mut self, action: Action) {
        match action {
            Action::BuySeeds => {
                self.seeds += 1;
                self.fertilizer -= SEEDS_PRICE_IN_FERTILIZER;
            }
            Action::BuyFertilizer => {
                self.fertilizer += 1;
                self.water -= FERTILIZER_PRICE_IN_WATER;
            }
            Action::BuyWater => {
                self.water += 1;
                self.seeds -= WATER_PRICE_IN_SEEDS;
            }
            _ => {}
        }
    }

    /// Advances every crop already in the ground by one day under today's weather.
    fn grow<R: Rng + ?Sized>(&mut self, planted_today: Option<Crop>, rng: &mut R) {
        for crop in Crop::iter() {
            if !self.is_growing(crop) || planted_today == Some(crop) {
                continue;
            }
            let slot = crop.slot();
            if self.weather.is_destructive() {
                if rng.random_bool(STORM_LOSS_PROBABILITY) {
                    self.crops_growth[slot] = 0;
                }
            } else if self.crops_growth[slot] < crop.spec().growth_cycle {
                // Mature crops wait in the ground until harvested.
                self.crops_growth[slot] += 1;
            }
        }
    }

    /// Produces the next day's state: apply the action, grow crops under the
    /// current weather, then draw tomorrow's weather and market price.
    pub fn transition<R: Rng + ?Sized>(&self, action: Action, rng: &mut R) -> FarmState {
        let mut next = self.clone();
        let planted_today = next.act(action);
        next.grow(planted_today, rng);
        next.weather = rng.random();
        next.market_price = random_market_price(rng);
        next
    }
}

pub fn random_market_price<R: Rng + ?Sized>(rng: &mut R) -> UInt {
    rng.random_range(MIN_MARKET_PRICE..=MAX_MARKET_PRICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state(seeds: UInt, fertilizer: UInt, water: UInt, growth: [UInt; 2]) -> FarmState {
        FarmState {
            seeds,
            fertilizer,
            water,
            crops_growth: growth,
            weather: Weather::Sunny,
            market_price: 5,
        }
    }

    #[test]
    fn test_initial_state() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = FarmState::initial(&SimulationConfig::default(), &mut rng);
        assert_eq!((s.seeds, s.fertilizer, s.water), (10, 10, 10));
        assert!(s.plot_is_empty());
        assert!((MIN_MARKET_PRICE..=MAX_MARKET_PRICE).contains(&s.market_price));
    }

    #[test]
    fn test_plant_tomato_on_sunny_day() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = state(10, 10, 10, [0, 0]);
        let next = s.transition(Action::PlantTomato, &mut rng);
        assert_eq!(next.crops_growth, [1, 0]);
        assert_eq!((next.seeds, next.fertilizer, next.water), (8, 9, 9));
        // The previous state is untouched.
        assert_eq!(s.crops_growth, [0, 0]);
    }

    #[test]
    fn test_plant_requires_empty_plot() {
        let mut rng = StdRng::seed_from_u64(2);
        let s = state(10, 10, 10, [0, 1]);
        let next = s.transition(Action::PlantTomato, &mut rng);
        assert_eq!(next.growth(Crop::Tomato), 0);
        assert_eq!(next.growth(Crop::Carrot), 2);
        assert_eq!((next.seeds, next.fertilizer, next.water), (10, 10, 10));
    }

    #[test]
    fn test_plant_requires_resources() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = state(1, 10, 10, [0, 0]);
        let next = s.transition(Action::PlantTomato, &mut rng);
        assert!(next.plot_is_empty());
        assert_eq!(next.seeds, 1);

        let next = s.transition(Action::PlantCarrot, &mut rng);
        assert_eq!(next.crops_growth, [0, 1]);
        assert_eq!((next.seeds, next.fertilizer, next.water), (0, 9, 9));
    }

    #[test]
    fn test_purchases_trade_resources() {
        let mut rng = StdRng::seed_from_u64(4);
        let s = state(10, 10, 10, [0, 0]);

        let next = s.transition(Action::BuySeeds, &mut rng);
        assert_eq!((next.seeds, next.fertilizer, next.water), (11, 7, 10));
        let next = s.transition(Action::BuyFertilizer, &mut rng);
        assert_eq!((next.seeds, next.fertilizer, next.water), (10, 11, 8));
        let next = s.transition(Action::BuyWater, &mut rng);
        assert_eq!((next.seeds, next.fertilizer, next.water), (9, 10, 11));
    }

    #[test]
    fn test_unaffordable_purchase_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(5);
        let s = state(0, 2, 1, [0, 0]);
        for action in [Action::BuySeeds, Action::BuyFertilizer, Action::BuyWater] {
            let next = s.transition(action, &mut rng);
            assert_eq!((next.seeds, next.fertilizer, next.water), (0, 2, 1));
        }
    }

    #[test]
    fn test_harvest_clears_mature_crops_only() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut s = state(10, 10, 10, [3, 1]);
        s.market_price = 4;
        let next = s.transition(Action::Harvest, &mut rng);
        assert_eq!(next.growth(Crop::Tomato), 0);
        assert_eq!(next.growth(Crop::Carrot), 2);
    }

    #[test]
    fn test_mature_crop_waits_for_harvest() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = state(10, 10, 10, [3, 2]);
        let next = s.transition(Action::DoNothing, &mut rng);
        assert_eq!(next.crops_growth, [3, 2]);
    }

    #[test]
    fn test_storm_either_keeps_or_destroys() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut s = state(10, 10, 10, [2, 1]);
        s.weather = Weather::Stormy;
        let mut lost = 0;
        let mut kept = 0;
        for _ in 0..200 {
            let next = s.transition(Action::DoNothing, &mut rng);
            assert!(next.growth(Crop::Tomato) == 0 || next.growth(Crop::Tomato) == 2);
            assert!(next.growth(Crop::Carrot) == 0 || next.growth(Crop::Carrot) == 1);
            if next.growth(Crop::Tomato) == 0 {
                lost += 1;
            } else {
                kept += 1;
            }
        }
        assert!(lost > 50 && kept > 50, "lost {lost}, kept {kept}");
    }

    #[test]
    fn test_crop_planted_in_a_storm_survives_the_day() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = state(10, 10, 10, [0, 0]);
        s.weather = Weather::Stormy;
        for _ in 0..50 {
            let next = s.transition(Action::PlantCarrot, &mut rng);
            assert_eq!(next.crops_growth, [0, 1]);
        }
    }
}
