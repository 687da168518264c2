//! Monte Carlo prediction and control on Blackjack.
//!
//! Run with `RUST_LOG=info cargo run --release --example blackjack`.

use montecarlo_rl::{
    builders::McControlBuilder,
    config::PredictionConfig,
    env::{Environment, EpisodeGuard},
    envs::{Blackjack, BlackjackState, HIT, STICK},
    prediction::mc_prediction,
    policy::ThresholdPolicy,
    Result,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn action_name(action: usize) -> &'static str {
    if action == STICK {
        "stick"
    } else {
        "hit"
    }
}

fn play_random_hands(env: &mut Blackjack, rng: &mut StdRng, hands: usize) -> Result<()> {
    for hand in 0..hands {
        let (mut guard, mut state) = EpisodeGuard::start(env);
        loop {
            let action = guard.sample_action(rng);
            let step = guard.step(action)?;
            println!("  {:?} -> {}", state, action_name(action));
            state = step.next_state;
            if step.done {
                let outcome = match step.reward {
                    r if r > 0.0 => "won",
                    r if r < 0.0 => "lost",
                    _ => "drew",
                };
                println!("hand {} ended: {} (reward {})", hand + 1, outcome, step.reward);
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut env = Blackjack::new(2024);
    let mut rng = StdRng::seed_from_u64(2024);
    println!("Action space: {} actions", env.num_actions());

    println!("\n=== Random play ===");
    play_random_hands(&mut env, &mut rng, 3)?;

    println!("\n=== Prediction: stick with 0.8 above 18, otherwise hit with 0.8 ===");
    let policy = ThresholdPolicy::new(STICK, HIT, |state: &BlackjackState| state.player_sum > 18)?;
    let config = PredictionConfig {
        num_episodes: 500_000,
        ..PredictionConfig::default()
    };
    let prediction = mc_prediction(&mut env, &policy, &config, &mut rng)?;
    let q = prediction.q();
    for player_sum in 12..=21 {
        let state = BlackjackState { player_sum, dealer_card: 10, usable_ace: false };
        println!(
            "  sum {:2} vs 10: V = {:+.3}  Q(stick) = {:+.3}  Q(hit) = {:+.3}",
            player_sum,
            q.state_value(&state),
            q.get(&state, STICK),
            q.get(&state, HIT)
        );
    }

    println!("\n=== Control: constant-alpha GPI ===");
    let control = McControlBuilder::new()
        .num_actions(env.num_actions())
        .num_episodes(500_000)
        .alpha(0.02)
        .epsilon(1.0, 0.99999, 0.05)
        .build::<BlackjackState>()?;
    let outcome = control.train(&mut env, &mut rng)?;

    println!("final epsilon: {:.4}", outcome.epsilon);
    println!("mean episode reward: {:+.4}", outcome.metrics.reward_stats.mean());

    for usable_ace in [false, true] {
        println!("\npolicy with usable ace = {} (rows: player sum, cols: dealer card 1-10)", usable_ace);
        for player_sum in (12..=21).rev() {
            let row: String = (1..=10)
                .map(|dealer_card| {
                    let state = BlackjackState { player_sum, dealer_card, usable_ace };
                    match outcome.policy.action(&state) {
                        Some(STICK) => " S",
                        Some(_) => " H",
                        None => " .",
                    }
                })
                .collect();
            println!("  {:2} |{}", player_sum, row);
        }
    }

    Ok(())
}
