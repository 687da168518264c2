use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::policy::{
    epsilon_greedy_probs, ActionChoice, ActionDistribution, BehaviorPolicy, EpsilonGreedy,
    ThresholdPolicy,
};
use crate::q_table::QTable;
use crate::error::McError;

#[test]
fn test_epsilon_greedy_probabilities() {
    let probs = epsilon_greedy_probs(array![0.1, 0.7, -0.2, 0.3].view(), 0.2);
    assert!((probs.sum() - 1.0).abs() < 1e-12);
    assert!((probs[1] - (0.8 + 0.05)).abs() < 1e-12);
    for a in [0, 2, 3] {
        assert!((probs[a] - 0.05).abs() < 1e-12);
    }
}

#[test]
fn test_epsilon_greedy_tie_prefers_lowest_index() {
    let probs = epsilon_greedy_probs(array![0.0, 0.0, 0.0].view(), 0.0);
    assert_eq!(probs.to_vec(), vec![1.0, 0.0, 0.0]);
}

#[test]
fn test_epsilon_greedy_unvisited_state_is_uniform() {
    let q: QTable<u8> = QTable::new(3).unwrap();
    let policy = EpsilonGreedy::new(&q, 0.1).unwrap();
    assert!(matches!(policy.action_choice(&0, 3).unwrap(), ActionChoice::Uniform));
}

#[test]
fn test_epsilon_greedy_visited_state_exploits() {
    let mut q: QTable<u8> = QTable::new(2).unwrap();
    q.set(&4, 1, 2.0).unwrap();
    let policy = EpsilonGreedy::new(&q, 0.0).unwrap();
    match policy.action_choice(&4, 2).unwrap() {
        ActionChoice::Sample(dist) => {
            assert_eq!(dist.probability(1), 1.0);
            let mut rng = StdRng::seed_from_u64(0);
            assert_eq!(dist.sample(&mut rng), 1);
        }
        ActionChoice::Uniform => panic!("visited state should use the table"),
    }
}

#[test]
fn test_epsilon_greedy_rejects_mismatched_action_count() {
    let q: QTable<u8> = QTable::new(2).unwrap();
    let policy = EpsilonGreedy::new(&q, 0.5).unwrap();
    assert!(policy.action_choice(&0, 3).is_err());
    assert!(EpsilonGreedy::new(&q, 1.5).is_err());
}

#[test]
fn test_threshold_policy_distribution() {
    let policy = ThresholdPolicy::new(0, 1, |total: &u8| *total > 18).unwrap();

    match policy.action_choice(&20u8, 2).unwrap() {
        ActionChoice::Sample(dist) => {
            assert!((dist.probability(0) - 0.8).abs() < 1e-12);
            assert!((dist.probability(1) - 0.2).abs() < 1e-12);
        }
        ActionChoice::Uniform => panic!("threshold policy is always explicit"),
    }
    match policy.action_choice(&12u8, 2).unwrap() {
        ActionChoice::Sample(dist) => {
            assert!((dist.probability(0) - 0.2).abs() < 1e-12);
            assert!((dist.probability(1) - 0.8).abs() < 1e-12);
        }
        ActionChoice::Uniform => panic!("threshold policy is always explicit"),
    }
}

#[test]
fn test_threshold_policy_validation() {
    assert!(ThresholdPolicy::new(1, 1, |_: &u8| true).is_err());
    let policy = ThresholdPolicy::new(0, 3, |_: &u8| true).unwrap();
    assert_eq!(
        policy.action_choice(&0u8, 2).unwrap_err(),
        McError::InvalidAction { action: 3, max_actions: 2 }
    );
    assert!(ThresholdPolicy::new(0, 1, |_: &u8| true)
        .unwrap()
        .with_safe_probability(1.2)
        .is_err());
}

#[test]
fn test_sampling_matches_distribution() {
    let dist = ActionDistribution::new(array![0.25, 0.75]).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let draws = 20_000;
    let ones = (0..draws).filter(|_| dist.sample(&mut rng) == 1).count();
    let frequency = ones as f64 / draws as f64;
    assert!((frequency - 0.75).abs() < 0.02, "frequency {}", frequency);
}
