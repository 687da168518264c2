use rand::rngs::StdRng;
use rand::SeedableRng;

use super::toy_envs::{Faulty, Loop, TwoArmed};
use crate::builders::McControlBuilder;
use crate::config::{ControlConfig, VisitMode};
use crate::control::{mc_control, update_q, McControl};
use crate::error::McError;
use crate::q_table::QTable;
use crate::types::{Episode, Transition};

#[test]
fn test_update_q_moves_toward_return() {
    let mut q: QTable<u8> = QTable::new(2).unwrap();
    let episode: Episode<u8> = vec![Transition::new(0, 0, 1.0)].into();

    update_q(&mut q, &episode, 0.5, 1.0, VisitMode::EveryVisit).unwrap();
    assert_eq!(q.get(&0, 0), 0.5);
    update_q(&mut q, &episode, 0.5, 1.0, VisitMode::EveryVisit).unwrap();
    assert_eq!(q.get(&0, 0), 0.75);
    assert_eq!(q.get(&0, 1), 0.0);
}

#[test]
fn test_update_q_every_visit_applies_in_time_order() {
    let mut q: QTable<u8> = QTable::new(1).unwrap();
    // returns: G0 = 2, G1 = 1
    let episode: Episode<u8> = vec![Transition::new(0, 0, 1.0), Transition::new(0, 0, 1.0)].into();

    update_q(&mut q, &episode, 0.5, 1.0, VisitMode::EveryVisit).unwrap();
    // 0 -> 1.0 (toward 2) -> 1.0 (toward 1)
    assert_eq!(q.get(&0, 0), 1.0);

    let mut q: QTable<u8> = QTable::new(1).unwrap();
    update_q(&mut q, &episode, 0.5, 1.0, VisitMode::FirstVisit).unwrap();
    assert_eq!(q.get(&0, 0), 1.0);
    update_q(&mut q, &episode, 0.5, 1.0, VisitMode::FirstVisit).unwrap();
    assert_eq!(q.get(&0, 0), 1.5);
}

#[test]
fn test_update_q_validates_step_size() {
    let mut q: QTable<u8> = QTable::new(1).unwrap();
    let episode: Episode<u8> = vec![Transition::new(0, 0, 1.0)].into();
    assert!(update_q(&mut q, &episode, 0.0, 1.0, VisitMode::EveryVisit).is_err());
    assert!(update_q(&mut q, &episode, 1.1, 1.0, VisitMode::EveryVisit).is_err());
    assert!(update_q(&mut q, &episode, 0.5, -0.1, VisitMode::EveryVisit).is_err());
    assert!(q.is_empty());
}

#[test]
fn test_control_prefers_rewarding_action() {
    let mut env = TwoArmed;
    let mut rng = StdRng::seed_from_u64(42);
    let config = ControlConfig {
        num_episodes: 500,
        alpha: 0.1,
        gamma: 1.0,
        eps_start: 1.0,
        eps_decay: 0.99,
        eps_min: 0.1,
        ..ControlConfig::default()
    };

    let outcome = mc_control(&mut env, config, &mut rng).unwrap();
    assert!(outcome.q.get(&0, 0) > outcome.q.get(&0, 1));
    assert!(outcome.q.get(&0, 0) > 0.9);
    assert_eq!(outcome.policy.action(&0), Some(0));
    assert_eq!(outcome.policy.len(), 1);
    assert_eq!(outcome.metrics.episodes, 500);
    assert!((outcome.epsilon - 0.1).abs() < 1e-12);
}

#[test]
fn test_epsilon_decays_before_each_episode() {
    let mut env = TwoArmed;
    let mut rng = StdRng::seed_from_u64(1);
    let mut control: McControl<u8> = McControlBuilder::new()
        .num_actions(2)
        .num_episodes(3)
        .alpha(0.5)
        .epsilon(1.0, 0.5, 0.2)
        .build()
        .unwrap();

    assert_eq!(control.run_episode(&mut env, &mut rng).unwrap().epsilon, 0.5);
    assert_eq!(control.run_episode(&mut env, &mut rng).unwrap().epsilon, 0.25);
    let record = control.run_episode(&mut env, &mut rng).unwrap();
    assert_eq!(record.epsilon, 0.2);
    assert_eq!(record.episode, 3);
    assert_eq!(control.episodes_done(), 3);
    assert_eq!(control.metrics().epsilons.len(), 3);
}

#[test]
fn test_first_episode_uses_uniform_fallback() {
    let mut env = TwoArmed;
    let mut rng = StdRng::seed_from_u64(3);
    let mut control: McControl<u8> = McControl::new(2, ControlConfig {
        num_episodes: 1,
        alpha: 1.0,
        ..ControlConfig::default()
    })
    .unwrap();

    assert!(control.q().is_empty());
    let record = control.run_episode(&mut env, &mut rng).unwrap();
    assert_eq!(record.length, 1);
    assert!(control.q().contains_state(&0));
    assert_eq!(control.q().get(&0, 0).abs() + control.q().get(&0, 1).abs(), 1.0);
}

#[test]
fn test_multi_step_episodes_update_every_step() {
    let mut env = Loop::new(3);
    let mut rng = StdRng::seed_from_u64(0);
    let config = ControlConfig {
        num_episodes: 1,
        alpha: 1.0,
        gamma: 1.0,
        ..ControlConfig::default()
    };
    let outcome = mc_control(&mut env, config, &mut rng).unwrap();
    // the last step's return wins with alpha = 1
    assert_eq!(outcome.q.get(&0, 0), 1.0);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let base = ControlConfig {
        num_episodes: 10,
        alpha: 0.1,
        ..ControlConfig::default()
    };
    let cases = vec![
        ControlConfig { num_episodes: 0, ..base.clone() },
        ControlConfig { alpha: 0.0, ..base.clone() },
        ControlConfig { gamma: 1.01, ..base.clone() },
        ControlConfig { eps_start: 0.1, eps_min: 0.2, ..base.clone() },
        ControlConfig { eps_decay: 0.0, ..base.clone() },
        ControlConfig { eps_min: -0.1, ..base.clone() },
        ControlConfig { alpha: f64::NAN, ..base.clone() },
    ];
    for config in cases {
        let result = McControl::<u8>::new(2, config.clone());
        assert!(
            matches!(result, Err(McError::InvalidParameter { .. })),
            "accepted {:?}",
            config
        );
    }
    assert!(McControlBuilder::new().build::<u8>().is_err());
}

#[test]
fn test_failed_episode_leaves_controller_unchanged() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut control: McControl<u8> = McControlBuilder::new()
        .num_actions(2)
        .num_episodes(2)
        .alpha(0.5)
        .epsilon(1.0, 0.5, 0.1)
        .build()
        .unwrap();

    assert!(control.run_episode(&mut Faulty, &mut rng).is_err());
    assert_eq!(control.epsilon(), 1.0);
    assert_eq!(control.episodes_done(), 0);
    assert!(control.metrics().epsilons.is_empty());
    assert!(control.q().is_empty());

    // the next successful episode still runs at the first decayed value
    let record = control.run_episode(&mut TwoArmed, &mut rng).unwrap();
    assert_eq!(record.epsilon, 0.5);
    assert_eq!(control.epsilon(), 0.5);
}
