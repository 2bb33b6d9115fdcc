//! Live entity storage for the active stage
//!
//! Entities sit in one list per category, in placement order. A stage load
//! swaps every list at once; during play entities only leave through
//! consumption or lock opening.

use glam::Vec2;

use super::aabb::Aabb;
use super::entity::{Categorized, Category, Entity};
use super::level::LevelLoadResult;
use super::state::Flags;

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    live: Categorized<Entity>,
    /// Last respawn point seen on any loaded stage (player feet position)
    respawn_anchor: Option<Vec2>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly parsed stage, returning its spawn point
    pub fn replace(&mut self, result: LevelLoadResult) -> Vec2 {
        let LevelLoadResult { spawn, placements } = result;
        self.live = placements.map(Entity::from);

        for point in &self.live[Category::RespawnPoint] {
            let center = point.bounds.center();
            self.respawn_anchor = Some(Vec2::new(center.x, center.y - 16.0));
        }

        log::debug!("Registry holds {} entities", self.live.total_len());
        spawn
    }

    pub fn get(&self, category: Category) -> &[Entity] {
        &self.live[category]
    }

    pub fn len(&self, category: Category) -> usize {
        self.live[category].len()
    }

    pub fn total_len(&self) -> usize {
        self.live.total_len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    pub fn respawn_anchor(&self) -> Option<Vec2> {
        self.respawn_anchor
    }

    /// First entity across `categories` (in the given order) overlapping `bounds`
    pub fn first_overlap(&self, categories: &[Category], bounds: &Aabb) -> Option<&Entity> {
        categories
            .iter()
            .flat_map(|&category| self.live[category].iter())
            .find(|entity| entity.bounds.overlaps(bounds))
    }

    pub fn overlaps_any(&self, categories: &[Category], bounds: &Aabb) -> bool {
        self.first_overlap(categories, bounds).is_some()
    }

    /// Remove and return the first entity of `category` overlapping `bounds`
    pub fn consume_first(&mut self, category: Category, bounds: &Aabb) -> Option<Entity> {
        let list = &mut self.live[category];
        let index = list.iter().position(|entity| entity.bounds.overlaps(bounds))?;
        Some(list.remove(index))
    }

    /// Remove every lock and lock-leaf
    pub fn open_locks(&mut self) -> usize {
        let opened = self.live[Category::Lock].len() + self.live[Category::LockLeaf].len();
        self.live[Category::Lock].clear();
        self.live[Category::LockLeaf].clear();
        opened
    }

    /// Advance animation and motion of every entity by one frame
    pub fn advance(&mut self, flags: &Flags) {
        for list in self.live.lists_mut() {
            for entity in list.iter_mut() {
                entity.advance(flags);
            }
        }
    }

    /// All live entities, grouped by category
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.live.iter().flat_map(|(_, list)| list.iter())
    }

    /// Per-category entity counts, skipping empty categories
    pub fn counts(&self) -> Vec<(Category, usize)> {
        self.live
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(category, list)| (category, list.len()))
            .collect()
    }
}
