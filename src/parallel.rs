//! Parallel episode rollouts for prediction.
//!
//! With a fixed behavior policy episodes are independent, so they can be
//! generated on the rayon pool. Updates are still applied one episode at a
//! time in episode-index order: the counted averages only stay exact when
//! every (state, action) entry sees its returns through a single writer.
//!
//! Episode `index` runs on a fresh simulator built by `make_env(index)` and
//! samples its actions from a `StdRng` seeded with [`episode_seed`]`(seed, index)`,
//! so a parallel run reproduces the sequential run over the same seeds exactly,
//! including simulators with internal randomness.

use ndarray::parallel::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PredictionConfig;
use crate::env::Environment;
use crate::episode::generate_episode;
use crate::error::{McError, Result};
use crate::policy::BehaviorPolicy;
use crate::prediction::McPrediction;
use crate::types::Episode;

/// Seed of the generator used for episode `index` of a run seeded with `seed`.
///
/// The pair is mixed with two splitmix64 rounds so that runs with nearby seeds
/// do not share episode streams.
pub fn episode_seed(seed: u64, index: usize) -> u64 {
    splitmix64(splitmix64(seed) ^ index as u64)
}

fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Generate episode `index` with its own deterministic generator
pub fn rollout_seeded<E, P>(env: &mut E, policy: &P, seed: u64, index: usize) -> Result<Episode<E::State>>
where
    E: Environment,
    P: BehaviorPolicy<E::State> + ?Sized,
{
    let mut rng = StdRng::seed_from_u64(episode_seed(seed, index));
    generate_episode(env, policy, &mut rng)
}

/// Monte Carlo prediction with episodes rolled out `batch_size` at a time in parallel.
///
/// `make_env` receives the episode index and builds the simulator for that episode.
pub fn parallel_prediction<E, F, P>(
    make_env: F,
    policy: &P,
    config: &PredictionConfig,
    batch_size: usize,
    seed: u64,
) -> Result<McPrediction<E::State>>
where
    E: Environment,
    E::State: Send,
    F: Fn(usize) -> E + Sync,
    P: BehaviorPolicy<E::State> + Sync,
{
    config.validate()?;
    if batch_size == 0 {
        return Err(McError::invalid_parameter("batch_size", "must be positive"));
    }

    let num_actions = make_env(0).num_actions();
    let mut prediction = McPrediction::from_config(num_actions, config)?;
    tracing::info!(
        num_episodes = config.num_episodes,
        batch_size,
        "starting parallel Monte Carlo prediction"
    );

    let mut start = 0;
    while start < config.num_episodes {
        let end = (start + batch_size).min(config.num_episodes);
        let batch: Vec<Episode<E::State>> = (start..end)
            .into_par_iter()
            .map(|index| {
                let mut env = make_env(index);
                rollout_seeded(&mut env, policy, seed, index)
            })
            .collect::<Result<Vec<_>>>()?;

        for episode in &batch {
            prediction.update(episode)?;
        }
        tracing::debug!(episodes = end, "applied rollout batch");
        start = end;
    }

    Ok(prediction)
}
