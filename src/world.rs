/// The bounded grid and the registry of every live entity.
///
/// Entities are kept in registration order, which is also the order
/// `step_all` and the cell queries report them in.

use std::collections::{HashSet, VecDeque};

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Direction, Entity, EntityId, EntityKind, Fish};
use crate::error::GameError;

#[derive(Clone, Debug)]
pub struct World {
    width: i32,
    height: i32,
    entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    /// Dimensions are assumed valid; `GameConfig::validate` checks them.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            entities: Vec::new(),
            next_id: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    // ── Insertion ─────────────────────────────────────────────────────────────

    fn spawn(&mut self, kind: EntityKind, x: i32, y: i32) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity { id, x, y, kind });
        id
    }

    /// Place an entity at an explicit cell.  Only bounds are checked, so this
    /// can stack anything anywhere; returns `None` off the grid.
    pub fn insert_at(&mut self, kind: EntityKind, x: i32, y: i32) -> Option<EntityId> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.spawn(kind, x, y))
    }

    /// Cells holding no entity at all, in row-major order.
    pub fn free_cells(&self) -> Vec<(i32, i32)> {
        let taken: HashSet<(i32, i32)> = self.entities.iter().map(|e| (e.x, e.y)).collect();
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|cell| !taken.contains(cell))
            .collect()
    }

    /// Place a new entity on a uniformly random empty cell.
    pub fn insert_at_random_free_cell(
        &mut self,
        kind: EntityKind,
        placing: &'static str,
        rng: &mut impl Rng,
    ) -> Result<EntityId, GameError> {
        let (x, y) = *self
            .free_cells()
            .choose(rng)
            .ok_or(GameError::NoFreeCell { placing })?;
        Ok(self.spawn(kind, x, y))
    }

    pub fn insert_home(&mut self, rng: &mut impl Rng) -> Result<EntityId, GameError> {
        self.insert_at_random_free_cell(EntityKind::Home, "home", rng)
    }

    pub fn insert_fish_randomly(
        &mut self,
        color: usize,
        fast_scared: bool,
        rng: &mut impl Rng,
    ) -> Result<EntityId, GameError> {
        let fish = Fish {
            color,
            fast_scared,
            player: false,
        };
        self.insert_at_random_free_cell(EntityKind::Fish(fish), "fish", rng)
    }

    pub fn insert_snail_randomly(&mut self, rng: &mut impl Rng) -> Result<EntityId, GameError> {
        let heading = *Direction::ALL.choose(rng).unwrap_or(&Direction::Right);
        self.insert_at_random_free_cell(EntityKind::Snail { heading }, "snail", rng)
    }

    /// Place a rock on a random empty cell that does not cut any open cell
    /// off from home.
    pub fn insert_rock_randomly(&mut self, rng: &mut impl Rng) -> Result<EntityId, GameError> {
        let mut candidates = self.free_cells();
        candidates.shuffle(rng);
        for (x, y) in candidates {
            if self.stays_connected_with_rock_at(x, y) {
                return Ok(self.spawn(EntityKind::Rock, x, y));
            }
            trace!("rejected rock at {},{}: would wall off part of the grid", x, y);
        }
        Err(GameError::NoFreeCell { placing: "rock" })
    }

    /// Flood-fills from home over non-rock cells, treating `(rx, ry)` as a
    /// rock too.  True when every open cell is still reached.
    fn stays_connected_with_rock_at(&self, rx: i32, ry: i32) -> bool {
        let Some(home) = self.entities.iter().find(|e| e.is_home()) else {
            return true;
        };
        let mut rocks: HashSet<(i32, i32)> = self
            .entities
            .iter()
            .filter(|e| e.kind.is_blocking())
            .map(|e| (e.x, e.y))
            .collect();
        rocks.insert((rx, ry));

        let open = self.width as usize * self.height as usize - rocks.len();
        let mut seen = HashSet::from([(home.x, home.y)]);
        let mut queue = VecDeque::from([(home.x, home.y)]);
        while let Some((x, y)) = queue.pop_front() {
            for dir in Direction::ALL {
                let (dx, dy) = dir.delta();
                let next = (x + dx, y + dy);
                if self.in_bounds(next.0, next.1) && !rocks.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == open
    }

    // ── Spatial queries ───────────────────────────────────────────────────────

    pub fn find_cell_contents(&self, x: i32, y: i32) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.x == x && e.y == y)
            .collect()
    }

    /// Everything sharing `id`'s cell, excluding `id` itself.  Empty if `id`
    /// is not in the world.
    pub fn find_same_cell(&self, id: EntityId) -> Vec<&Entity> {
        let Some(target) = self.get(id) else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|e| e.id != id && e.same_cell(target))
            .collect()
    }

    /// In bounds and free of anything that blocks `id`.
    pub fn can_occupy(&self, id: EntityId, x: i32, y: i32) -> bool {
        self.in_bounds(x, y)
            && !self
                .entities
                .iter()
                .any(|e| e.id != id && e.x == x && e.y == y && e.kind.is_blocking())
    }

    // ── Removal & movement ────────────────────────────────────────────────────

    /// Drop `id` from the live set and hand back its final state.  Removing
    /// an absent entity does nothing.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Move `id` to `(x, y)` if it may occupy that cell.
    pub fn set_position(&mut self, id: EntityId, x: i32, y: i32) -> bool {
        if !self.can_occupy(id, x, y) {
            return false;
        }
        match self.get_mut(id) {
            Some(entity) => {
                entity.x = x;
                entity.y = y;
                true
            }
            None => false,
        }
    }

    /// One step to a random open neighbour (4-neighbourhood).  No-op when
    /// boxed in.
    pub fn move_randomly(&mut self, id: EntityId, rng: &mut impl Rng) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        let (x, y) = (entity.x, entity.y);
        let options: Vec<(i32, i32)> = Direction::ALL
            .iter()
            .map(|dir| {
                let (dx, dy) = dir.delta();
                (x + dx, y + dy)
            })
            .filter(|&(nx, ny)| self.can_occupy(id, nx, ny))
            .collect();
        match options.choose(rng) {
            Some(&(nx, ny)) => self.set_position(id, nx, ny),
            None => false,
        }
    }

    /// Snap every listed entity onto `(x, y)`.
    pub fn follow(&mut self, ids: &[EntityId], x: i32, y: i32) {
        for entity in self.entities.iter_mut().filter(|e| ids.contains(&e.id)) {
            entity.x = x;
            entity.y = y;
        }
    }

    /// Run each mover's own per-tick behaviour once, in registration order.
    pub fn step_all(&mut self) {
        let movers: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|e| e.kind.is_mover())
            .map(|e| e.id)
            .collect();
        for id in movers {
            self.crawl(id);
        }
    }

    fn crawl(&mut self, id: EntityId) {
        let Some(entity) = self.get(id) else {
            return;
        };
        let EntityKind::Snail { heading } = entity.kind else {
            return;
        };
        let (x, y) = (entity.x, entity.y);

        let mut dir = heading;
        for _ in 0..Direction::ALL.len() {
            let (dx, dy) = dir.delta();
            if self.set_position(id, x + dx, y + dy) {
                break;
            }
            dir = dir.clockwise();
        }
        if let Some(entity) = self.get_mut(id) {
            entity.kind = EntityKind::Snail { heading: dir };
        }
    }
}
