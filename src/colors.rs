//! Participant colour assignment.
//!
//! Two named policies, not interchangeable: palette cycling (deterministic,
//! first-appearance order) and random hex (uniform `#rrggbb` per
//! participant). A colour sticks to its participant for the rest of the run.

use rand::Rng;
use std::collections::HashMap;

/// Fixed palette cycled over distinct participants.
pub const PALETTE: [&str; 10] = [
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "brown", "gray", "cyan",
];

/// How participants are mapped to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    /// The Nth distinct participant (0-indexed) gets `PALETTE[N % 10]`.
    Palette,
    /// Each participant gets a random `#rrggbb` at first appearance.
    RandomHex,
}

/// Stateful participant → colour map for one conversion run.
#[derive(Debug)]
pub struct ColorAssigner {
    policy: ColorPolicy,
    assigned: HashMap<i64, String>,
}

impl ColorAssigner {
    pub fn new(policy: ColorPolicy) -> Self {
        ColorAssigner {
            policy,
            assigned: HashMap::new(),
        }
    }

    /// Returns the participant's colour, assigning one on first sight.
    pub fn colour(&mut self, participant: i64) -> String {
        if let Some(colour) = self.assigned.get(&participant) {
            return colour.clone();
        }

        let colour = match self.policy {
            ColorPolicy::Palette => PALETTE[self.assigned.len() % PALETTE.len()].to_string(),
            ColorPolicy::RandomHex => {
                format!("#{:06x}", rand::rng().random_range(0..=0xFFFFFFu32))
            }
        };

        self.assigned.insert(participant, colour.clone());
        colour
    }
}
