//! Simplified Blackjack against a fixed dealer.
//!
//! Cards are drawn with replacement from an infinite deck. The player sees
//! their own total, the dealer's face-up card and whether they hold a usable
//! ace. The dealer draws until reaching 17. Rewards are +1 win, 0 draw,
//! -1 loss, handed out only at the end of the hand.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::env::{ActionSpace, Environment, Step};
use crate::error::{McError, Result};

pub const STICK: usize = 0;
pub const HIT: usize = 1;

const DECK: [u8; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];
const DEALER_STANDS_AT: u8 = 17;

/// Observation: (player total, dealer face-up card, usable ace)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlackjackState {
    pub player_sum: u8,
    pub dealer_card: u8,
    pub usable_ace: bool,
}

fn usable_ace(hand: &[u8]) -> bool {
    hand.contains(&1) && hand.iter().map(|&c| c as u32).sum::<u32>() + 10 <= 21
}

fn hand_total(hand: &[u8]) -> u8 {
    let total: u32 = hand.iter().map(|&c| c as u32).sum();
    let total = if usable_ace(hand) { total + 10 } else { total };
    total.min(u8::MAX as u32) as u8
}

fn is_bust(hand: &[u8]) -> bool {
    hand_total(hand) > 21
}

fn score(hand: &[u8]) -> u8 {
    if is_bust(hand) {
        0
    } else {
        hand_total(hand)
    }
}

pub struct Blackjack {
    rng: StdRng,
    player: Vec<u8>,
    dealer: Vec<u8>,
    done: bool,
}

impl Blackjack {
    pub fn new(seed: u64) -> Self {
        Blackjack {
            rng: StdRng::seed_from_u64(seed),
            player: Vec::new(),
            dealer: Vec::new(),
            done: true,
        }
    }

    fn draw_card(&mut self) -> u8 {
        DECK[self.rng.gen_range(0..DECK.len())]
    }

    fn observe(&self) -> BlackjackState {
        BlackjackState {
            player_sum: hand_total(&self.player),
            dealer_card: self.dealer[0],
            usable_ace: usable_ace(&self.player),
        }
    }
}

impl Environment for Blackjack {
    type State = BlackjackState;
    type Info = ();

    fn reset(&mut self) -> BlackjackState {
        self.player = vec![self.draw_card(), self.draw_card()];
        self.dealer = vec![self.draw_card(), self.draw_card()];
        self.done = false;
        self.observe()
    }

    fn step(&mut self, action: usize) -> Result<Step<BlackjackState>> {
        if self.done {
            return Err(McError::simulator_contract("blackjack hand already finished"));
        }
        match action {
            HIT => {
                let card = self.draw_card();
                self.player.push(card);
                self.done = is_bust(&self.player);
                let reward = if self.done { -1.0 } else { 0.0 };
                Ok(Step::new(self.observe(), reward, self.done))
            }
            STICK => {
                while hand_total(&self.dealer) < DEALER_STANDS_AT {
                    let card = self.draw_card();
                    self.dealer.push(card);
                }
                self.done = true;
                let reward = match score(&self.player).cmp(&score(&self.dealer)) {
                    Ordering::Greater => 1.0,
                    Ordering::Equal => 0.0,
                    Ordering::Less => -1.0,
                };
                Ok(Step::new(self.observe(), reward, true))
            }
            _ => Err(McError::InvalidAction { action, max_actions: 2 }),
        }
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::BINARY
    }
}
