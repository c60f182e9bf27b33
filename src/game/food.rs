use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::config::GameConfig;
use super::error::NoFreeCellError;
use super::grid::{Grid, Position};
use super::rng::RandomSource;

/// Kind of food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    /// Time-limited bonus food
    Special,
}

/// A piece of food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    /// Points awarded when eaten
    pub value: u32,
    /// Ticks left before a special food expires; `None` for normal food
    pub lifetime: Option<u32>,
}

impl Food {
    pub fn normal(position: Position, value: u32) -> Self {
        Self {
            position,
            kind: FoodKind::Normal,
            value,
            lifetime: None,
        }
    }

    pub fn special(position: Position, value: u32, lifetime: u32) -> Self {
        Self {
            position,
            kind: FoodKind::Special,
            value,
            lifetime: Some(lifetime),
        }
    }
}

/// Values the spawner needs from the game configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodRules {
    pub normal_value: u32,
    pub special_value: u32,
    pub special_spawn_interval: u32,
    pub special_lifetime: u32,
}

impl From<&GameConfig> for FoodRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            normal_value: config.normal_food_value,
            special_value: config.special_food_value,
            special_spawn_interval: config.special_spawn_interval,
            special_lifetime: config.special_lifetime,
        }
    }
}

/// Owns the normal and special food slots
///
/// Special food follows a fixed-interval rule: once the board has been
/// without a special food for `special_spawn_interval` ticks, a new one
/// appears. The count restarts whenever a special is eaten or expires.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    rules: FoodRules,
    normal: Option<Food>,
    special: Option<Food>,
    ticks_without_special: u32,
}

impl FoodSpawner {
    pub fn new(rules: FoodRules) -> Self {
        Self {
            rules,
            normal: None,
            special: None,
            ticks_without_special: 0,
        }
    }

    pub fn normal(&self) -> Option<&Food> {
        self.normal.as_ref()
    }

    pub fn special(&self) -> Option<&Food> {
        self.special.as_ref()
    }

    /// All food currently on the board, normal first
    pub fn foods(&self) -> impl Iterator<Item = &Food> {
        self.normal.iter().chain(self.special.iter())
    }

    pub fn food_at(&self, position: Position) -> Option<&Food> {
        self.foods().find(|food| food.position == position)
    }

    /// Cells to avoid when placing food: the snake plus any existing food
    fn excluded<'a>(&self, occupied: impl IntoIterator<Item = &'a Position>) -> HashSet<Position> {
        occupied
            .into_iter()
            .copied()
            .chain(self.foods().map(|food| food.position))
            .collect()
    }

    /// Spawn a normal food if there is none
    ///
    /// Returns the newly placed food, or `None` if one already existed.
    pub fn ensure_normal_food<'a, R: RandomSource + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: impl IntoIterator<Item = &'a Position>,
        rng: &mut R,
    ) -> Result<Option<Food>, NoFreeCellError> {
        if self.normal.is_some() {
            return Ok(None);
        }

        let excluded = self.excluded(occupied);
        let position = grid.random_free_position(&excluded, rng)?;
        let food = Food::normal(position, self.rules.normal_value);
        debug!("Normal food spawned at ({}, {})", position.x, position.y);

        self.normal = Some(food);
        Ok(Some(food))
    }

    /// Count one special-free tick and spawn a special food once the interval is reached
    ///
    /// A full board skips the spawn and retries on the next tick.
    pub fn maybe_spawn_special<'a, R: RandomSource + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: impl IntoIterator<Item = &'a Position>,
        rng: &mut R,
    ) -> Option<Food> {
        if self.special.is_some() {
            return None;
        }

        self.ticks_without_special = self.ticks_without_special.saturating_add(1);
        if self.ticks_without_special < self.rules.special_spawn_interval {
            return None;
        }

        let excluded = self.excluded(occupied);
        let position = match grid.random_free_position(&excluded, rng) {
            Ok(position) => position,
            Err(NoFreeCellError) => {
                debug!("No room for special food, retrying next tick");
                return None;
            }
        };

        let food = Food::special(
            position,
            self.rules.special_value,
            self.rules.special_lifetime,
        );
        debug!(
            "Special food spawned at ({}, {}) for {} ticks",
            position.x, position.y, self.rules.special_lifetime
        );

        self.special = Some(food);
        self.ticks_without_special = 0;
        Some(food)
    }

    /// Age the special food by one tick
    ///
    /// Returns the special food if it expired on this tick.
    pub fn tick(&mut self) -> Option<Food> {
        let special = self.special.as_mut()?;
        let remaining = special.lifetime.unwrap_or(0).saturating_sub(1);
        special.lifetime = Some(remaining);

        if remaining > 0 {
            return None;
        }

        let expired = self.special.take();
        self.ticks_without_special = 0;
        if let Some(food) = &expired {
            debug!(
                "Special food at ({}, {}) expired",
                food.position.x, food.position.y
            );
        }
        expired
    }

    /// Remove and return the food at `position`, if any
    pub fn consume(&mut self, position: Position) -> Option<Food> {
        if self.normal.is_some_and(|food| food.position == position) {
            return self.normal.take();
        }
        if self.special.is_some_and(|food| food.position == position) {
            self.ticks_without_special = 0;
            return self.special.take();
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, food: Food) {
        match food.kind {
            FoodKind::Normal => self.normal = Some(food),
            FoodKind::Special => self.special = Some(food),
        }
    }
}
