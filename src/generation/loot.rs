//! # Item Generation
//!
//! The item source capability used by level generation and hidden passages,
//! and its default implementation.

use crate::{config, Difficulty, Item};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Produces items on demand.
///
/// Generation only needs random loot, hazards and strength-scaled barriers;
/// it never looks inside an item beyond its public shape.
pub trait ItemSource {
    /// Any item: healing, tool or hazard.
    fn random_item(&self, rng: &mut StdRng) -> Item;

    fn random_healing(&self, rng: &mut StdRng) -> Item;

    /// A trap, never a barrier.
    fn random_negative(&self, rng: &mut StdRng) -> Item;

    /// A barrier whose damage is the base damage scaled by `strength`.
    fn barrier(&self, strength: f32) -> Item;
}

const HEALING_NAMES: &[&str] = &[
    "Health Potion",
    "Magic Elixir",
    "Healing Crystal",
    "Restoration Brew",
    "Healing Herbs",
    "Bandages",
    "Medkit",
    "Energy Drink",
];

const TOOL_NAMES: &[&str] = &[
    "Torch",
    "Rope",
    "Lockpick",
    "Grappling Hook",
    "Fireball Scroll",
    "Ice Shard Wand",
    "Lightning Staff",
    "Wind Rune",
];

const NEGATIVE_ITEMS: &[(&str, &str, u32)] = &[
    ("Poison Trap", "A deadly trap that releases toxic fumes.", 15),
    ("Curse Rune", "An ancient rune that drains your power.", 18),
    ("Shadow Wisp", "A malevolent spirit that saps your strength.", 12),
    ("Thorny Vines", "Sharp thorns that cause damage when touched.", 10),
];

/// Default item factory tuned by difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFactory {
    /// Multiplier on the base healing amount of 20, clamped to `0.0..=1.0`
    pub healing_rate: f32,
    /// Multiplier on hazard damage, clamped to `0.1..=2.0`
    pub barrier_strength: f32,
}

impl ItemFactory {
    /// Creates a factory, clamping both rates to their valid ranges.
    pub fn new(healing_rate: f32, barrier_strength: f32) -> Self {
        Self {
            healing_rate: healing_rate.clamp(0.0, 1.0),
            barrier_strength: barrier_strength.clamp(0.1, 2.0),
        }
    }

    /// Creates the factory for a difficulty.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Difficulty, ItemFactory, ItemSource};
    ///
    /// let factory = ItemFactory::for_difficulty(Difficulty::Hard);
    /// let barrier = factory.barrier(factory.barrier_strength);
    /// assert_eq!(barrier.hazard().unwrap().damage, 19);
    /// ```
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.healing_rate(), difficulty.barrier_strength())
    }

    /// A single-charge spell with random power.
    pub fn random_spell(&self, rng: &mut StdRng) -> Item {
        let name = pick_name(TOOL_NAMES, rng);
        let power = rng.gen_range(10..30);
        Item::tool(
            name,
            format!("A {} spell", name.to_lowercase()),
            power,
            true,
            false,
        )
    }

    /// A reusable tool with 3 to 7 charges. Torches reveal hidden passages.
    pub fn random_tool(&self, rng: &mut StdRng) -> Item {
        let name = pick_name(TOOL_NAMES, rng);
        let charges = rng.gen_range(3..8);
        Item::tool(
            name,
            format!("A {} that can be used multiple times", name.to_lowercase()),
            charges,
            false,
            name.eq_ignore_ascii_case("Torch"),
        )
    }

    fn scale(&self, damage: u32) -> u32 {
        (damage as f32 * self.barrier_strength) as u32
    }
}

impl Default for ItemFactory {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Normal)
    }
}

impl ItemSource for ItemFactory {
    fn random_item(&self, rng: &mut StdRng) -> Item {
        match rng.gen_range(0..3) {
            0 => self.random_healing(rng),
            1 => {
                if rng.gen_bool(0.5) {
                    self.random_tool(rng)
                } else {
                    self.random_spell(rng)
                }
            }
            _ => self.random_negative(rng),
        }
    }

    fn random_healing(&self, rng: &mut StdRng) -> Item {
        let name = pick_name(HEALING_NAMES, rng);
        let amount = (20.0 * self.healing_rate) as i32;
        Item::healing(
            name,
            format!("A {} that restores health", name.to_lowercase()),
            amount,
            rng.gen_bool(0.5),
        )
    }

    fn random_negative(&self, rng: &mut StdRng) -> Item {
        let (name, description, damage) = NEGATIVE_ITEMS
            .choose(rng)
            .copied()
            .unwrap_or(NEGATIVE_ITEMS[0]);
        Item::trap(name, description, self.scale(damage))
    }

    fn barrier(&self, strength: f32) -> Item {
        let damage = (config::BARRIER_BASE_DAMAGE * strength) as u32;
        Item::barrier(
            "Magical Barrier",
            format!(
                "A shimmering wall of magical energy blocks your path. Power required: {}",
                damage * 2
            ),
            damage,
        )
    }
}

fn pick_name(pool: &[&'static str], rng: &mut StdRng) -> &'static str {
    pool.choose(rng).copied().unwrap_or("Curio")
}
