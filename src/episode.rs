use rand::Rng;
use std::collections::HashSet;

use crate::config::VisitMode;
use crate::env::{Environment, EpisodeGuard};
use crate::error::{McError, Result};
use crate::policy::{ActionChoice, BehaviorPolicy};
use crate::types::{Episode, State, Transition};

/// Roll out one episode of `env` under `policy`.
///
/// Starts from `reset`, records `(state, action, reward)` for each step and
/// stops when the simulator reports termination. There is no step limit: a
/// simulator that never terminates makes this call run forever.
pub fn generate_episode<E, P, R>(env: &mut E, policy: &P, rng: &mut R) -> Result<Episode<E::State>>
where
    E: Environment,
    P: BehaviorPolicy<E::State> + ?Sized,
    R: Rng,
{
    let (mut guard, mut state) = EpisodeGuard::start(env);
    let num_actions = guard.action_space().n();
    let mut episode = Episode::new();

    loop {
        let action = match policy.action_choice(&state, num_actions)? {
            ActionChoice::Sample(distribution) => distribution.sample(rng),
            ActionChoice::Uniform => guard.sample_action(rng),
        };
        let step = guard.step(action)?;
        episode.push(Transition::new(state, action, step.reward));
        if step.done {
            break;
        }
        state = step.next_state;
    }

    Ok(episode)
}

/// Which time steps of `episode` feed the value estimate under `mode`
pub fn visit_mask<S: State>(episode: &Episode<S>, mode: VisitMode) -> Vec<bool> {
    match mode {
        VisitMode::EveryVisit => vec![true; episode.len()],
        VisitMode::FirstVisit => {
            let mut seen = HashSet::with_capacity(episode.len());
            episode
                .iter()
                .map(|t| seen.insert((&t.state, t.action)))
                .collect()
        }
    }
}

/// Reject episodes holding actions outside `[0, num_actions)` before any update
pub(crate) fn check_actions<S>(episode: &Episode<S>, num_actions: usize) -> Result<()> {
    match episode.actions().find(|&action| action >= num_actions) {
        Some(action) => Err(McError::InvalidAction { action, max_actions: num_actions }),
        None => Ok(()),
    }
}
