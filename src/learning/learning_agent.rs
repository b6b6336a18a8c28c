use rand::Rng;
use strum::EnumCount;

use crate::actions::Action;
use crate::config::RlConfig;
use crate::error::FarmError;
use crate::learning::encoder::{MixedRadixEncoder, StateEncoder};
use crate::learning::policy::{EpsilonGreedy, Policy, PolicyType};
use crate::learning::q_table::QTable;
use crate::learning::reward::Reward;
use crate::state::FarmState;

/// A tabular Q-learning agent: a state encoder, the table it indexes and
/// the update hyper-parameters.
pub struct QLearner<E: StateEncoder = MixedRadixEncoder> {
    encoder: E,
    q_table: QTable,
    learning_rate: f32,
    discount_factor: f32,
}

impl QLearner<MixedRadixEncoder> {
    pub fn new(rl: &RlConfig) -> Self {
        QLearner::with_encoder(MixedRadixEncoder::new(), rl)
    }
}

impl<E: StateEncoder> QLearner<E> {
    pub fn with_encoder(encoder: E, rl: &RlConfig) -> Self {
        let q_table = QTable::new(encoder.capacity());
        QLearner {
            encoder,
            q_table,
            learning_rate: rl.learning_rate,
            discount_factor: rl.discount_factor,
        }
    }

    /// Resumes from a previously trained table.
    pub fn from_table(encoder: E, q_table: QTable, rl: &RlConfig) -> Result<Self, FarmError> {
        if q_table.rows() != encoder.capacity() {
            return Err(FarmError::TableShape {
                expected_rows: encoder.capacity(),
                expected_actions: Action::COUNT,
                rows: q_table.rows(),
                actions: Action::COUNT,
            });
        }
        Ok(QLearner {
            encoder,
            q_table,
            learning_rate: rl.learning_rate,
            discount_factor: rl.discount_factor,
        })
    }

    pub fn encode(&self, state: &FarmState) -> usize {
        self.encoder.encode(state)
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    pub fn q_values(&self, state: &FarmState) -> &[f32] {
        self.q_table.row(self.encode(state))
    }

    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        policy: &PolicyType,
        state: &FarmState,
        rng: &mut R,
    ) -> Action {
        policy.choose_action(&self.q_table, self.encode(state), rng)
    }

    /// Epsilon-greedy action selection.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        state: &FarmState,
        epsilon: f32,
        rng: &mut R,
    ) -> Action {
        self.choose_action(&EpsilonGreedy::new(epsilon).into(), state, rng)
    }

    pub fn greedy_action(&self, state: &FarmState) -> Action {
        self.q_table.best_action(self.encode(state))
    }

    /// Moves `Q(state, action)` toward the bootstrapped target and returns the new value.
    pub fn update(
        &mut self,
        state: &FarmState,
        action: Action,
        reward: Reward,
        next_state: &FarmState,
    ) -> f32 {
        let row = self.encode(state);
        let next_row = self.encode(next_state);
        self.q_table.update(
            row,
            action,
            reward.val,
            next_row,
            self.learning_rate,
            self.discount_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::Weather;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> FarmState {
        FarmState {
            seeds: 10,
            fertilizer: 10,
            water: 10,
            crops_growth: [0, 0],
            weather: Weather::Sunny,
            market_price: 5,
        }
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut learner = QLearner::new(&RlConfig::default());
        let s = start();
        let next = FarmState {
            crops_growth: [1, 0],
            seeds: 8,
            fertilizer: 9,
            water: 9,
            ..start()
        };
        let new = learner.update(&s, Action::PlantTomato, Reward::new(-2.0), &next);
        // Q was 0 and max_next is 0, so the value is alpha * reward.
        assert!((new - (-0.2)).abs() < 1e-6);
        assert_eq!(learner.q_values(&s)[Action::PlantTomato.index()], new);
        assert_eq!(learner.q_table().visited_rows(), 1);
    }

    #[test]
    fn test_greedy_selection_follows_learning() {
        let mut learner = QLearner::new(&RlConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        let s = start();
        learner.update(&s, Action::BuyWater, Reward::new(5.0), &s);
        assert_eq!(learner.greedy_action(&s), Action::BuyWater);
        assert_eq!(learner.select_action(&s, 0.0, &mut rng), Action::BuyWater);
    }

    #[test]
    fn test_from_table_checks_rows() {
        let rl = RlConfig::default();
        let err = QLearner::from_table(MixedRadixEncoder::new(), QTable::new(3), &rl)
            .err()
            .unwrap();
        assert!(matches!(err, FarmError::TableShape { rows: 3, .. }));
    }
}
