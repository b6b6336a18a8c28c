use cropwise::{
    FarmError,
    config::Config,
    crops::validate_crop_specs,
    simulation::Trainer,
};
use log::info;

const EVALUATION_EPISODES: u32 = 100;

fn main() -> Result<(), FarmError> {
    env_logger::init();
    validate_crop_specs()?;

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => {
            let config = Config::default();
            config.validate()?;
            config
        }
    };
    info!(
        "Training for {} episodes of {} days",
        config.rl.episodes, config.simulation.days
    );

    let mut trainer = Trainer::new(config.clone());
    let report = trainer.train();
    if let Some((lo, hi)) = report.reward_range() {
        info!(
            "Avg. Reward (last 100): {:.2}, Min: {:.1}, Max: {:.1}",
            report.mean_reward_last(100),
            lo,
            hi
        );
    }

    let demo = trainer.play_greedy();
    for step in &demo.history {
        info!(
            "Day {}/{} | Seeds: {}, Fertilizer: {}, Water: {} | Growth: {:?} | Weather: {}, Price: {} | Action: {} | Reward: {:.1}",
            step.day + 1,
            demo.days,
            step.state.seeds,
            step.state.fertilizer,
            step.state.water,
            step.state.crops_growth,
            step.state.weather,
            step.state.market_price,
            step.action,
            step.reward.val
        );
    }
    info!("Greedy episode total reward: {:.1}", demo.total_reward);
    info!(
        "Greedy Avg. Reward over {} episodes: {:.2}",
        EVALUATION_EPISODES,
        trainer.evaluate(EVALUATION_EPISODES)
    );

    if let Some(path) = &config.q_table_path {
        let q_table = trainer.into_learner().into_q_table();
        q_table.save(path)?;
        info!(
            "Saved Q-table ({} rows, {} visited) to {}",
            q_table.rows(),
            q_table.visited_rows(),
            path.display()
        );
    }
    Ok(())
}
