/// The simulation engine.
///
/// `Game` owns the world and the three fish buckets (missing, found, home)
/// and advances them one step at a time.  All randomness comes through the
/// injected `rng` so callers control determinism (tests use a seeded RNG).

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::entities::{Direction, Entity, EntityId, EntityKind, Fish, FISH_COLORS};
use crate::error::GameError;
use crate::world::World;

pub struct Game<R: Rng = StdRng> {
    config: GameConfig,
    world: World,
    player: EntityId,
    home_marker: EntityId,
    missing: Vec<EntityId>,
    found: Vec<EntityId>,
    /// Delivered fish, frozen as they were when they left the world.
    home: Vec<Entity>,
    score: u32,
    steps_taken: u64,
    rng: R,
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl Game<StdRng> {
    /// A game on a `width` x `height` grid with the default setup and an
    /// entropy-seeded RNG.
    pub fn new(width: i32, height: i32) -> Result<Self, GameError> {
        Self::with_rng(GameConfig::with_size(width, height), StdRng::from_entropy())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    /// Build the initial state: home, rocks, snails, the player on home, and
    /// one missing fish per remaining colour.
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let mut world = World::new(config.width, config.height);

        let home_marker = world.insert_home(&mut rng)?;
        for _ in 0..config.rocks {
            world.insert_rock_randomly(&mut rng)?;
        }
        for _ in 0..config.snails {
            world.insert_snail_randomly(&mut rng)?;
        }

        let (hx, hy) = world
            .get(home_marker)
            .map(|h| (h.x, h.y))
            .ok_or(GameError::NoFreeCell { placing: "home" })?;
        let player_fish = Fish {
            color: 0,
            fast_scared: false,
            player: true,
        };
        let player = world
            .insert_at(EntityKind::Fish(player_fish), hx, hy)
            .ok_or(GameError::NoFreeCell { placing: "player" })?;

        let mut missing = Vec::with_capacity(FISH_COLORS.len() - 1);
        for color in 1..FISH_COLORS.len() {
            let fast_scared = rng.gen_bool(config.fast_scared_chance);
            missing.push(world.insert_fish_randomly(color, fast_scared, &mut rng)?);
        }

        info!(
            "new {}x{} game: {} rocks, {} snails, {} missing fish",
            config.width,
            config.height,
            config.rocks,
            config.snails,
            missing.len()
        );

        Ok(Self {
            config,
            world,
            player,
            home_marker,
            missing,
            found: Vec::new(),
            home: Vec::new(),
            score: 0,
            steps_taken: 0,
            rng,
        })
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

impl<R: Rng> Game<R> {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Raw world access.  Nothing here keeps the fish buckets in sync with
    /// it; prefer `teleport` and `place`.
    #[doc(hidden)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Move any live entity straight to `(x, y)`, subject to `can_occupy`.
    /// For scripted scenarios; normal play moves the player with
    /// `move_player`.
    pub fn teleport(&mut self, id: EntityId, x: i32, y: i32) -> bool {
        self.world.set_position(id, x, y)
    }

    /// Drop a non-fish entity (rock, snail, ...) onto an explicit cell.  Fish
    /// are refused since they would belong to no bucket.
    pub fn place(&mut self, kind: EntityKind, x: i32, y: i32) -> Option<EntityId> {
        if matches!(kind, EntityKind::Fish(_)) {
            return None;
        }
        self.world.insert_at(kind, x, y)
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn home_marker(&self) -> EntityId {
        self.home_marker
    }

    pub fn missing(&self) -> &[EntityId] {
        &self.missing
    }

    pub fn found(&self) -> &[EntityId] {
        &self.found
    }

    pub fn home(&self) -> &[Entity] {
        &self.home
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Every non-player fish, whichever bucket it is in.
    pub fn total_fish(&self) -> usize {
        self.missing.len() + self.found.len() + self.home.len()
    }

    pub fn missing_fish_left(&self) -> usize {
        self.missing.len()
    }

    pub fn game_over(&self) -> bool {
        self.missing.is_empty() && self.found.is_empty()
    }

    fn is_home(&self, id: EntityId) -> bool {
        self.home.iter().any(|f| f.id == id)
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

impl<R: Rng> Game<R> {
    /// Swim the player one cell.  Rocks and the grid edge stop it.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        let Some(p) = self.world.get(self.player) else {
            return false;
        };
        let (dx, dy) = dir.delta();
        let (x, y) = (p.x + dx, p.y + dy);
        self.world.set_position(self.player, x, y)
    }

    /// Destroy every rock on the clicked cell.  Clicks off the grid are
    /// ignored.
    pub fn click(&mut self, x: i32, y: i32) {
        debug!(
            "clicked on {},{} (player can swim there: {})",
            x,
            y,
            self.world.can_occupy(self.player, x, y)
        );
        if !self.world.in_bounds(x, y) {
            return;
        }
        let at_point: Vec<(EntityId, bool)> = self
            .world
            .find_cell_contents(x, y)
            .iter()
            .map(|e| (e.id, e.kind.is_destructible()))
            .collect();
        for &(id, destructible) in at_point.iter().rev() {
            if destructible {
                self.world.remove(id);
            }
        }
    }
}

// ── Per-step update ──────────────────────────────────────────────────────────

impl<R: Rng> Game<R> {
    /// Advance the simulation by one step.
    ///
    /// Catches from this step are applied before a delivery on the same
    /// step, so touching a fish while standing on home brings it straight
    /// home (and still scores it).
    pub fn step(&mut self) {
        self.steps_taken += 1;

        // ── 1. Player contact ────────────────────────────────────────────────
        let overlap: Vec<(EntityId, bool)> = self
            .world
            .find_same_cell(self.player)
            .iter()
            .map(|e| (e.id, e.is_home()))
            .collect();

        for &(id, _) in &overlap {
            self.catch(id);
        }
        if overlap.iter().any(|&(_, is_home)| is_home) {
            self.deliver_found();
        }

        // ── 2. Missing fish that wandered home on their own ──────────────────
        let strays: Vec<EntityId> = self
            .world
            .find_same_cell(self.home_marker)
            .iter()
            .map(|e| e.id)
            .filter(|id| self.missing.contains(id))
            .collect();
        for id in strays {
            if self.send_home(id) {
                self.missing.retain(|&m| m != id);
                debug!("fish {:?} found its own way home", id);
            }
        }

        // ── 3. Passive movement ──────────────────────────────────────────────
        self.wander_missing_fish();
        if let Some(p) = self.world.get(self.player) {
            let (px, py) = (p.x, p.y);
            self.world.follow(&self.found, px, py);
        }
        self.world.step_all();

        if self.game_over() {
            info!(
                "all fish home after {} steps, score {}",
                self.steps_taken, self.score
            );
        }
    }

    /// MISSING -> FOUND on player contact.  Anything not missing is ignored.
    fn catch(&mut self, id: EntityId) {
        let Some(index) = self.missing.iter().position(|&m| m == id) else {
            return;
        };
        self.missing.remove(index);
        if !self.found.contains(&id) {
            self.found.push(id);
        }

        let fast = self
            .world
            .get(id)
            .and_then(Entity::fish)
            .map_or(false, |f| f.fast_scared);
        let points = if fast {
            self.config.fast_found_score
        } else {
            self.config.found_score
        };
        self.score += points;
        debug!("found fish {:?} (+{})", id, points);
    }

    /// FOUND -> HOME for every fish trailing the player.  A fish that can't
    /// be delivered stays in `found`.
    fn deliver_found(&mut self) {
        let carried = std::mem::take(&mut self.found);
        let mut delivered = 0;
        for id in carried {
            if self.send_home(id) {
                delivered += 1;
            } else {
                self.found.push(id);
            }
        }
        if delivered > 0 {
            debug!("delivered {} fish home", delivered);
        }
    }

    /// Move a fish out of the world into `home`.  False when it is no
    /// longer in the world, in which case the caller keeps it where it was.
    fn send_home(&mut self, id: EntityId) -> bool {
        if self.is_home(id) {
            return true;
        }
        match self.world.remove(id) {
            Some(fish) => {
                self.home.push(fish);
                true
            }
            None => {
                debug!("fish {:?} left the world outside play; not delivered", id);
                false
            }
        }
    }

    fn wander_missing_fish(&mut self) {
        for i in 0..self.missing.len() {
            let id = self.missing[i];
            let fast = self
                .world
                .get(id)
                .and_then(Entity::fish)
                .map_or(false, |f| f.fast_scared);
            let chance = if fast {
                self.config.fast_wander_chance
            } else {
                self.config.wander_chance
            };
            if self.rng.gen_bool(chance) {
                self.world.move_randomly(id, &mut self.rng);
            }
        }
    }
}
