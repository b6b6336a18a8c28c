use enum_dispatch::enum_dispatch;
use rand::Rng;

use crate::actions::Action;
use crate::learning::q_table::QTable;

#[enum_dispatch]
pub trait Policy {
    /// Picks an action for the state encoded as `row`.
    fn choose_action<R: Rng + ?Sized>(
        &self,
        q_table: &QTable,
        row: usize,
        rng: &mut R,
    ) -> Action;
}

/// Explores uniformly at random with probability `epsilon`, otherwise exploits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    pub epsilon: f32,
}

/// Always exploits the table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Greedy;

impl EpsilonGreedy {
    pub fn new(epsilon: f32) -> Self {
        EpsilonGreedy { epsilon }
    }
}

impl Policy for EpsilonGreedy {
    fn choose_action<R: Rng + ?Sized>(
        &self,
        q_table: &QTable,
        row: usize,
        rng: &mut R,
    ) -> Action {
        let r: f32 = rng.random();
        if r < self.epsilon {
            rng.random()
        } else {
            q_table.best_action(row)
        }
    }
}

impl Policy for Greedy {
    fn choose_action<R: Rng + ?Sized>(
        &self,
        q_table: &QTable,
        row: usize,
        _rng: &mut R,
    ) -> Action {
        q_table.best_action(row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[enum_dispatch(Policy)]
pub enum PolicyType {
    EpsilonGreedy(EpsilonGreedy),
    Greedy(Greedy),
}
