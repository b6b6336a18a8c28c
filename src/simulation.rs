use itertools::{Itertools, MinMaxResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::UInt;
use crate::actions::Action;
use crate::config::{Config, RlConfig, SimulationConfig};
use crate::learning::encoder::{MixedRadixEncoder, StateEncoder};
use crate::learning::learning_agent::QLearner;
use crate::learning::policy::{Greedy, PolicyType};
use crate::learning::reward::{Reward, reward};
use crate::state::FarmState;

/// One played day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub day: UInt,
    pub state: FarmState,
    pub action: Action,
    pub reward: Reward,
}

/// A run of a fixed number of days from a fresh farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub days: UInt,
    pub day: UInt,
    pub state: FarmState,
    pub total_reward: f32,
    pub history: Vec<Step>,
}

impl Episode {
    pub fn new<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        Episode {
            days: config.days,
            day: 0,
            state: FarmState::initial(config, rng),
            total_reward: 0.0,
            history: vec![],
        }
    }

    pub fn is_done(&self) -> bool {
        self.day >= self.days
    }

    /// Plays `action` for the current day and returns its reward, or None once
    /// the episode is over.
    pub fn play<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Option<Reward> {
        if self.is_done() {
            return None;
        }
        let next = self.state.transition(action, rng);
        let r = reward(&self.state, action, &next);
        let state = std::mem::replace(&mut self.state, next);
        self.history.push(Step {
            day: self.day,
            state,
            action,
            reward: r,
        });
        self.day += 1;
        self.total_reward += r.val;
        Some(r)
    }
}

/// Exploration rate for the next episode.
pub fn next_epsilon(epsilon: f32, rl: &RlConfig) -> f32 {
    (epsilon * rl.epsilon_decay).max(rl.min_epsilon)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episode_rewards: Vec<f32>,
    pub final_epsilon: f32,
}

impl TrainingReport {
    /// Mean total reward over the last `n` episodes.
    pub fn mean_reward_last(&self, n: usize) -> f32 {
        mean(&self.episode_rewards[self.episode_rewards.len().saturating_sub(n)..])
    }

    /// Lowest and highest episode totals.
    pub fn reward_range(&self) -> Option<(f32, f32)> {
        match self.episode_rewards.iter().copied().minmax_by(f32::total_cmp) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(r) => Some((r, r)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Runs Q-learning episodes against the farm simulation.
pub struct Trainer<E: StateEncoder = MixedRadixEncoder> {
    pub config: Config,
    learner: QLearner<E>,
    rng: StdRng,
    epsilon: f32,
}

impl Trainer<MixedRadixEncoder> {
    pub fn new(config: Config) -> Self {
        let learner = QLearner::new(&config.rl);
        Trainer::with_learner(config, learner)
    }
}

impl<E: StateEncoder> Trainer<E> {
    pub fn with_learner(config: Config, learner: QLearner<E>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Trainer {
            epsilon: config.rl.initial_epsilon,
            config,
            learner,
            rng,
        }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn learner(&self) -> &QLearner<E> {
        &self.learner
    }

    pub fn into_learner(self) -> QLearner<E> {
        self.learner
    }

    /// Plays one episode with epsilon-greedy exploration, updating the table
    /// every day. Returns the episode's total reward.
    pub fn run_episode(&mut self) -> f32 {
        let mut episode = Episode::new(&self.config.simulation, &mut self.rng);
        while !episode.is_done() {
            let state = episode.state.clone();
            let action = self.learner.select_action(&state, self.epsilon, &mut self.rng);
            let Some(r) = episode.play(action, &mut self.rng) else {
                break;
            };
            self.learner.update(&state, action, r, &episode.state);
            debug!(
                "Day: {} | Action: {} | Reward: {:.1} | Next: {:?}",
                episode.day, action, r.val, episode.state
            );
        }
        episode.total_reward
    }

    pub fn train(&mut self) -> TrainingReport {
        let episodes = self.config.rl.episodes;
        let log_every = self.config.log_every.max(1) as usize;
        let mut episode_rewards = Vec::with_capacity(episodes as usize);
        for episode in 0..episodes {
            episode_rewards.push(self.run_episode());
            self.epsilon = next_epsilon(self.epsilon, &self.config.rl);
            if episode_rewards.len() % log_every == 0 {
                info!(
                    "Episode: {}, Avg. Reward: {:.2}, Epsilon: {:.4}",
                    episode + 1,
                    mean(&episode_rewards[episode_rewards.len() - log_every..]),
                    self.epsilon
                );
            }
        }
        let report = TrainingReport {
            episode_rewards,
            final_epsilon: self.epsilon,
        };
        info!(
            "Trained {} episodes, visited {} states, final epsilon {:.4}",
            episodes,
            self.learner.q_table().visited_rows(),
            report.final_epsilon
        );
        report
    }

    /// Plays one episode following the learned table, without updating it.
    pub fn play_greedy(&mut self) -> Episode {
        let policy = PolicyType::from(Greedy);
        let mut episode = Episode::new(&self.config.simulation, &mut self.rng);
        while !episode.is_done() {
            let action = self.learner.choose_action(&policy, &episode.state, &mut self.rng);
            episode.play(action, &mut self.rng);
        }
        episode
    }

    /// Mean total reward of `episodes` greedy episodes.
    pub fn evaluate(&mut self, episodes: UInt) -> f32 {
        let totals = (0..episodes)
            .map(|_| self.play_greedy().total_reward)
            .collect_vec();
        mean(&totals)
    }
}
