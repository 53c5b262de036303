//! # Items
//!
//! Everything a room can hold or a player can carry. Item behaviour is a
//! closed set of variants with one dispatch point, [`Item::apply`].

use crate::Player;
use serde::{Deserialize, Serialize};

/// A named object in the dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
}

/// The behaviour an item carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores power when used; always consumed
    Healing { amount: i32, food: bool },
    /// Reusable tool or single-charge spell
    Tool {
        power: u32,
        spell: bool,
        reveals_passages: bool,
        charges: u32,
    },
    /// Barrier or trap
    Hazard(Hazard),
}

/// A negative effect attached to a room.
///
/// A barrier gates passage until the player's power reaches twice its
/// damage; a trap deals its damage once. Either way `defeated` only ever
/// goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub damage: u32,
    pub barrier: bool,
    defeated: bool,
}

impl Hazard {
    /// Creates an active hazard.
    pub fn new(damage: u32, barrier: bool) -> Self {
        Self {
            damage,
            barrier,
            defeated: false,
        }
    }

    /// Whether the hazard has been defeated.
    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Whether the hazard can still act.
    pub fn is_active(&self) -> bool {
        !self.defeated
    }

    /// Power needed to pass this hazard when it is a barrier.
    pub fn required_power(&self) -> u32 {
        self.damage * 2
    }

    /// Marks the hazard inert. There is no way back.
    pub fn defeat(&mut self) {
        self.defeated = true;
    }
}

/// Result of using an item from the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseOutcome {
    /// Whether the item should leave the inventory
    pub consumed: bool,
    /// Change applied to the player's power
    pub power_delta: i32,
    pub message: String,
}

impl Item {
    /// Creates a healing item.
    pub fn healing(name: impl Into<String>, description: impl Into<String>, amount: i32, food: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ItemKind::Healing { amount, food },
        }
    }

    /// Creates a tool. Spells carry a single charge; other tools get one
    /// charge per point of power.
    pub fn tool(
        name: impl Into<String>,
        description: impl Into<String>,
        power: u32,
        spell: bool,
        reveals_passages: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ItemKind::Tool {
                power,
                spell,
                reveals_passages,
                charges: if spell { 1 } else { power },
            },
        }
    }

    /// Creates a one-time damaging trap.
    pub fn trap(name: impl Into<String>, description: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ItemKind::Hazard(Hazard::new(damage, false)),
        }
    }

    /// Creates a barrier gate.
    pub fn barrier(name: impl Into<String>, description: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ItemKind::Hazard(Hazard::new(damage, true)),
        }
    }

    /// The hazard state, if this item is a hazard.
    pub fn hazard(&self) -> Option<&Hazard> {
        match &self.kind {
            ItemKind::Hazard(hazard) => Some(hazard),
            _ => None,
        }
    }

    /// Mutable hazard state, if this item is a hazard.
    pub fn hazard_mut(&mut self) -> Option<&mut Hazard> {
        match &mut self.kind {
            ItemKind::Hazard(hazard) => Some(hazard),
            _ => None,
        }
    }

    /// Whether this item is a trap or a barrier.
    pub fn is_hazard(&self) -> bool {
        self.hazard().is_some()
    }

    /// A hazard that has not been defeated yet.
    pub fn is_active_hazard(&self) -> bool {
        self.hazard().is_some_and(Hazard::is_active)
    }

    /// An active hazard that is not a barrier.
    pub fn is_active_trap(&self) -> bool {
        self.hazard().is_some_and(|h| h.is_active() && !h.barrier)
    }

    /// Whether this item belongs in the visible contents of a room.
    pub fn is_visible(&self) -> bool {
        self.hazard().map_or(true, Hazard::is_active)
    }

    /// Whether this tool can uncover hidden passages.
    pub fn can_reveal_passages(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Tool {
                reveals_passages: true,
                charges,
                ..
            } if charges > 0
        )
    }

    /// Whether the item is worth announcing when a room is first seen.
    pub fn is_notable(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Healing { .. } | ItemKind::Tool { spell: true, .. }
        )
    }

    /// Applies the item's behaviour to the player.
    ///
    /// Healing items restore power and are consumed. Tools spend a charge and
    /// are consumed once they run out. Hazards cannot be used.
    pub fn apply(&mut self, player: &mut Player) -> UseOutcome {
        match &mut self.kind {
            ItemKind::Healing { amount, food } => {
                player.adjust_power(*amount);
                let verb = if *food { "consume" } else { "use" };
                UseOutcome {
                    consumed: true,
                    power_delta: *amount,
                    message: format!(
                        "You {} the {} and restore {} power points.",
                        verb, self.name, amount
                    ),
                }
            }
            ItemKind::Tool {
                power,
                spell,
                charges,
                ..
            } => {
                if *charges == 0 {
                    return UseOutcome {
                        consumed: true,
                        power_delta: 0,
                        message: format!("The {} is spent.", self.name),
                    };
                }
                *charges -= 1;
                let message = if *spell {
                    format!("You cast {} with power of {}!", self.name, power)
                } else {
                    format!("You use the {}. Durability: {}", self.name, charges)
                };
                UseOutcome {
                    consumed: *charges == 0,
                    power_delta: 0,
                    message,
                }
            }
            ItemKind::Hazard(_) => UseOutcome {
                consumed: false,
                power_delta: 0,
                message: format!("The {} cannot be used.", self.name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;

    #[test]
    fn test_healing_restores_power_and_is_consumed() {
        let mut player = Player::new("Tester", Difficulty::Normal);
        let mut potion = Item::healing("Health Potion", "Restores health", 8, false);

        let outcome = potion.apply(&mut player);
        assert!(outcome.consumed);
        assert_eq!(outcome.power_delta, 8);
        assert_eq!(player.power, 83);
    }

    #[test]
    fn test_tool_spends_charges() {
        let mut player = Player::new("Tester", Difficulty::Normal);
        let mut rope = Item::tool("Rope", "Sturdy rope", 2, false, false);

        assert!(!rope.apply(&mut player).consumed);
        assert!(rope.apply(&mut player).consumed);
        assert_eq!(player.power, 75);
    }

    #[test]
    fn test_spell_has_single_charge() {
        let mut player = Player::new("Tester", Difficulty::Easy);
        let mut scroll = Item::tool("Fireball Scroll", "A scroll", 15, true, false);
        let outcome = scroll.apply(&mut player);
        assert!(outcome.consumed);
        assert!(outcome.message.contains("power of 15"));
    }

    #[test]
    fn test_hazard_defeat_is_one_way() {
        let mut trap = Item::trap("Poison Trap", "Toxic", 15);
        assert!(trap.is_active_trap());
        assert!(trap.is_visible());

        trap.hazard_mut().unwrap().defeat();
        assert!(trap.hazard().unwrap().is_defeated());
        assert!(!trap.is_active_trap());
        assert!(!trap.is_visible());
    }

    #[test]
    fn test_barrier_required_power() {
        let barrier = Item::barrier("Magical Barrier", "Shimmering", 15);
        let hazard = barrier.hazard().unwrap();
        assert!(hazard.barrier);
        assert_eq!(hazard.required_power(), 30);
        assert!(!barrier.is_active_trap());
        assert!(barrier.is_active_hazard());
    }

    #[test]
    fn test_reveal_capability_needs_charges() {
        let mut torch = Item::tool("Torch", "Lights the way", 1, false, true);
        assert!(torch.can_reveal_passages());
        let mut player = Player::new("Tester", Difficulty::Easy);
        torch.apply(&mut player);
        assert!(!torch.can_reveal_passages());
    }
}
