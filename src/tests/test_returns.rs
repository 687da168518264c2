use crate::returns::{discounted_returns, discounts, returns_with_discounts};
use ndarray::array;

#[test]
fn test_returns_with_discount() {
    let returns = discounted_returns(&[1.0, 1.0, 1.0], 0.9);
    assert_eq!(returns.len(), 3);
    assert!((returns[0] - 2.71).abs() < 1e-9);
    assert!((returns[1] - 1.9).abs() < 1e-9);
    assert!((returns[2] - 1.0).abs() < 1e-9);
}

#[test]
fn test_undiscounted_returns_are_suffix_sums() {
    let rewards = [0.0, -1.0, 2.5, 0.0, 1.0];
    let returns = discounted_returns(&rewards, 1.0);
    assert_eq!(returns, vec![2.5, 2.5, 3.5, 1.0, 1.0]);
}

#[test]
fn test_zero_discount_keeps_immediate_reward() {
    let returns = discounted_returns(&[3.0, -2.0, 5.0], 0.0);
    assert_eq!(returns, vec![3.0, -2.0, 5.0]);
}

#[test]
fn test_precomputed_discounts_can_be_longer() {
    let d = discounts(0.5, 10);
    let returns = returns_with_discounts(array![4.0, 4.0].view(), d.view());
    assert_eq!(returns, vec![6.0, 4.0]);
}
