/// All game entity types — pure data, no logic beyond capability flags.

// ── Palette ───────────────────────────────────────────────────────────────────

/// Fish colours.  Index 0 belongs to the player; every other colour is used
/// by exactly one missing fish.
pub const FISH_COLORS: [&str; 8] = [
    "orange", "red", "yellow", "green", "cyan", "blue", "magenta", "white",
];

// ── Identity ──────────────────────────────────────────────────────────────────

/// Stable handle for an entity.  Two entities on the same cell with the same
/// colour are still distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

// ── Movement ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Cell offset `(dx, dy)`; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

// ── Variants ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Fish {
    /// Index into [`FISH_COLORS`].
    pub color: usize,
    /// Fixed at creation: wanders more often and is worth more when found.
    pub fast_scared: bool,
    pub player: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Fish(Fish),
    /// The single cell fish are brought back to.
    Home,
    /// Blocks swimming; destroyed by clicking on it.
    Rock,
    /// Crawls along its heading and turns clockwise when blocked.
    Snail { heading: Direction },
}

impl EntityKind {
    pub fn is_blocking(&self) -> bool {
        matches!(self, EntityKind::Rock)
    }

    /// Moves itself during `World::step_all`.  Fish are not movers: the
    /// engine decides when they wander or follow.
    pub fn is_mover(&self) -> bool {
        matches!(self, EntityKind::Snail { .. })
    }

    pub fn is_destructible(&self) -> bool {
        matches!(self, EntityKind::Rock)
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub x: i32,
    pub y: i32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn fish(&self) -> Option<&Fish> {
        match &self.kind {
            EntityKind::Fish(fish) => Some(fish),
            _ => None,
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self.kind, EntityKind::Home)
    }

    pub fn is_rock(&self) -> bool {
        matches!(self.kind, EntityKind::Rock)
    }

    pub fn same_cell(&self, other: &Entity) -> bool {
        self.x == other.x && self.y == other.y
    }
}
