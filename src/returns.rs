//! Discounted returns for every time step of an episode.

use ndarray::{s, Array1, ArrayView1};

/// Powers of the discount factor `[γ^0, γ^1, .., γ^(len-1)]`.
///
/// `γ^0` is 1 even when `γ = 0`, so the immediate reward always counts.
pub fn discounts(gamma: f64, len: usize) -> Array1<f64> {
    let mut powers = Array1::zeros(len);
    let mut power = 1.0;
    for value in powers.iter_mut() {
        *value = power;
        power *= gamma;
    }
    powers
}

/// `G_i = Σ_k γ^k · r_(i+k)` for every `i` in `[0, T)`.
pub fn discounted_returns(rewards: &[f64], gamma: f64) -> Vec<f64> {
    let discounts = discounts(gamma, rewards.len());
    returns_with_discounts(ArrayView1::from(rewards), discounts.view())
}

/// Same as [`discounted_returns`] but reuses precomputed discount powers
/// (at least as many as there are rewards).
pub fn returns_with_discounts(rewards: ArrayView1<f64>, discounts: ArrayView1<f64>) -> Vec<f64> {
    let len = rewards.len();
    debug_assert!(discounts.len() >= len);

    (0..len)
        .map(|i| rewards.slice(s![i..]).dot(&discounts.slice(s![..len - i])))
        .collect()
}
