//! Level structure: terrain grid, rosters, clouds, and visibility

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use super::{Cell, Position, TerrainKind};
use crate::monster::{Monster, MonsterId};
use crate::object::{Object, ObjectId};
use crate::rng::GameRng;
use crate::{COLNO, ROWNO};

/// Create default cells grid
fn default_cells() -> Vec<Vec<Cell>> {
    vec![vec![Cell::rock(); ROWNO]; COLNO]
}

/// Create default object grid
fn default_object_grid() -> Vec<Vec<Vec<ObjectId>>> {
    vec![vec![Vec::new(); ROWNO]; COLNO]
}

/// Create default monster grid
fn default_monster_grid() -> Vec<Vec<Option<MonsterId>>> {
    vec![vec![None; ROWNO]; COLNO]
}

/// Create default explored grid (all false)
fn default_explored() -> Vec<Vec<bool>> {
    vec![vec![false; ROWNO]; COLNO]
}

/// Create default visible grid (all false)
fn default_visible() -> Vec<Vec<bool>> {
    vec![vec![false; ROWNO]; COLNO]
}

/// Errors raised when building a level from an ASCII map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("map has {found} rows, the grid holds {}", ROWNO)]
    TooManyRows { found: usize },

    #[error("map row {row} is {found} cells wide, the grid holds {}", COLNO)]
    RowTooWide { row: usize, found: usize },

    #[error("map row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown map glyph '{glyph}' in row {row}")]
    UnknownGlyph { glyph: char, row: usize },
}

/// Gas cloud kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CloudKind {
    #[default]
    Fire = 0,
    Stinking = 1,
    Poison = 2,
}

impl CloudKind {
    /// Poison-based clouds can be ignited
    pub const fn is_poisonous(&self) -> bool {
        matches!(self, CloudKind::Stinking | CloudKind::Poison)
    }
}

/// A gas cloud overlaying one cell
///
/// Clouds never block line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Position,
    pub kind: CloudKind,
    /// Remaining lifetime; larger clouds burn hotter when ignited
    pub decay: i32,
}

/// Complete level structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Map cells
    #[serde(default = "default_cells")]
    pub cells: Vec<Vec<Cell>>,

    /// Object grid (object IDs at each position)
    #[serde(skip, default = "default_object_grid")]
    pub object_grid: Vec<Vec<Vec<ObjectId>>>,

    /// Monster grid (monster ID at each position)
    #[serde(skip, default = "default_monster_grid")]
    pub monster_grid: Vec<Vec<Option<MonsterId>>>,

    /// All objects on this level
    pub objects: Vec<Object>,

    /// All monsters on this level
    pub monsters: Vec<Monster>,

    /// Gas clouds
    pub clouds: Vec<Cloud>,

    /// Explored cells (player has seen at some point)
    #[serde(default = "default_explored")]
    pub explored: Vec<Vec<bool>>,

    /// Currently visible cells (in player's field of view)
    #[serde(skip, default = "default_visible")]
    pub visible: Vec<Vec<bool>>,

    /// Next object ID to assign
    next_object_id: u32,

    /// Next monster ID to assign
    next_monster_id: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// Create a new level of solid rock
    pub fn new() -> Self {
        Self {
            cells: default_cells(),
            object_grid: default_object_grid(),
            monster_grid: default_monster_grid(),
            objects: Vec::new(),
            monsters: Vec::new(),
            clouds: Vec::new(),
            explored: default_explored(),
            visible: default_visible(),
            next_object_id: 1,
            next_monster_id: 1,
        }
    }

    /// Build a level from rows of terrain glyphs
    ///
    /// Rows are laid out top to bottom starting at the grid origin; cells
    /// beyond the map stay solid rock. Glyphs follow
    /// [`TerrainKind::symbol`].
    pub fn from_rows(rows: &[&str]) -> Result<Self, LevelError> {
        if rows.len() > ROWNO {
            return Err(LevelError::TooManyRows { found: rows.len() });
        }

        let mut level = Self::new();
        let expected = rows.first().map(|r| r.chars().count()).unwrap_or(0);

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found > COLNO {
                return Err(LevelError::RowTooWide { row: y, found });
            }
            if found != expected {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let kind = TerrainKind::from_glyph(glyph)
                    .ok_or(LevelError::UnknownGlyph { glyph, row: y })?;
                level.cells[x][y] = Cell::of(kind);
            }
        }

        Ok(level)
    }

    /// Get cell at position
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.x as usize][pos.y as usize]
    }

    /// Get mutable cell at position
    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.x as usize][pos.y as usize]
    }

    /// Check if position is valid
    pub const fn is_valid_pos(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < COLNO && (pos.y as usize) < ROWNO
    }

    /// Terrain kind at position; out-of-bounds reads as permanent wall
    pub fn terrain_at(&self, pos: Position) -> TerrainKind {
        if !self.is_valid_pos(pos) {
            return TerrainKind::PermaWall;
        }
        self.cells[pos.x as usize][pos.y as usize].typ
    }

    /// Check if position is walkable
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.is_valid_pos(pos) && self.cell(pos).is_walkable()
    }

    // ==================== Monsters ====================

    /// Get monster at position
    pub fn monster_at(&self, pos: Position) -> Option<&Monster> {
        if !self.is_valid_pos(pos) {
            return None;
        }
        let id = self.monster_grid[pos.x as usize][pos.y as usize]?;
        self.monsters.iter().find(|m| m.id == id)
    }

    /// Get mutable monster at position
    pub fn monster_at_mut(&mut self, pos: Position) -> Option<&mut Monster> {
        if !self.is_valid_pos(pos) {
            return None;
        }
        let id = self.monster_grid[pos.x as usize][pos.y as usize]?;
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Get monster by ID
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    /// Get mutable monster by ID
    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Add a monster to the level
    pub fn add_monster(&mut self, mut monster: Monster) -> MonsterId {
        let id = MonsterId(self.next_monster_id);
        self.next_monster_id += 1;
        monster.id = id;

        let x = monster.pos.x as usize;
        let y = monster.pos.y as usize;
        self.monster_grid[x][y] = Some(id);
        self.monsters.push(monster);
        id
    }

    /// Remove a monster from the level
    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        let idx = self.monsters.iter().position(|m| m.id == id)?;
        let monster = self.monsters.remove(idx);
        self.monster_grid[monster.pos.x as usize][monster.pos.y as usize] = None;
        Some(monster)
    }

    /// Move a monster to a new position
    pub fn move_monster(&mut self, id: MonsterId, to: Position) -> bool {
        let monster = self.monsters.iter_mut().find(|m| m.id == id);
        if let Some(monster) = monster {
            self.monster_grid[monster.pos.x as usize][monster.pos.y as usize] = None;
            monster.pos = to;
            self.monster_grid[to.x as usize][to.y as usize] = Some(id);
            true
        } else {
            false
        }
    }

    // ==================== Objects ====================

    /// Get objects at position
    pub fn objects_at(&self, pos: Position) -> Vec<&Object> {
        if !self.is_valid_pos(pos) {
            return Vec::new();
        }
        let ids = &self.object_grid[pos.x as usize][pos.y as usize];
        ids.iter()
            .filter_map(|id| self.objects.iter().find(|o| o.id == *id))
            .collect()
    }

    /// Get the IDs of objects at position
    ///
    /// Owned copy, so the stack can be mutated while walking it.
    pub fn object_ids_at(&self, pos: Position) -> Vec<ObjectId> {
        if !self.is_valid_pos(pos) {
            return Vec::new();
        }
        self.object_grid[pos.x as usize][pos.y as usize].clone()
    }

    /// Get object by ID
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Add an object to the level
    pub fn add_object(&mut self, mut object: Object, pos: Position) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        object.id = id;
        object.pos = pos;

        self.object_grid[pos.x as usize][pos.y as usize].push(id);
        self.objects.push(object);
        id
    }

    /// Remove an object from the level
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(idx);
        let grid = &mut self.object_grid[object.pos.x as usize][object.pos.y as usize];
        grid.retain(|&oid| oid != id);
        Some(object)
    }

    // ==================== Clouds ====================

    /// Get cloud at position
    pub fn cloud_at(&self, pos: Position) -> Option<&Cloud> {
        self.clouds.iter().find(|c| c.pos == pos)
    }

    /// Get mutable cloud at position
    pub fn cloud_at_mut(&mut self, pos: Position) -> Option<&mut Cloud> {
        self.clouds.iter_mut().find(|c| c.pos == pos)
    }

    /// Place a cloud, replacing any cloud already at that position
    pub fn place_cloud(&mut self, pos: Position, kind: CloudKind, decay: i32) {
        if !self.is_valid_pos(pos) {
            return;
        }
        self.remove_cloud(pos);
        self.clouds.push(Cloud { pos, kind, decay });
    }

    /// Remove the cloud at position, if any
    pub fn remove_cloud(&mut self, pos: Position) {
        self.clouds.retain(|c| c.pos != pos);
    }

    // ==================== Geometry ====================

    /// All in-bounds cells within Chebyshev distance `radius` of `origin`,
    /// in row-major order, origin cell included
    pub fn cells_within_radius(&self, origin: Position, radius: i32) -> Vec<Position> {
        if radius < 0 {
            return Vec::new();
        }
        let sx = (origin.x as i32 - radius).max(0);
        let ex = (origin.x as i32 + radius).min(COLNO as i32 - 1);
        let sy = (origin.y as i32 - radius).max(0);
        let ey = (origin.y as i32 + radius).min(ROWNO as i32 - 1);

        let mut cells = Vec::new();
        for x in sx..=ex {
            for y in sy..=ey {
                cells.push(Position::new(x as i8, y as i8));
            }
        }
        cells
    }

    /// All currently visible cells, in row-major order
    pub fn visible_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for x in 0..COLNO {
            for y in 0..ROWNO {
                if self.visible[x][y] {
                    cells.push(Position::new(x as i8, y as i8));
                }
            }
        }
        cells
    }

    /// A uniformly random walkable, unoccupied, dry cell, or None if the
    /// level has no such cell
    pub fn random_open_cell(&self, rng: &mut GameRng, exclude: Position) -> Option<Position> {
        let mut open = Vec::new();
        for x in 0..COLNO {
            for y in 0..ROWNO {
                let pos = Position::new(x as i8, y as i8);
                if pos != exclude
                    && self.cell(pos).is_walkable()
                    && self.monster_grid[x][y].is_none()
                {
                    open.push(pos);
                }
            }
        }
        rng.choose(&open).copied()
    }

    /// Like [`random_open_cell`](Self::random_open_cell) but within
    /// `radius` of `origin`, excluding `origin` itself
    pub fn random_open_cell_near(
        &self,
        origin: Position,
        radius: i32,
        rng: &mut GameRng,
        exclude: Position,
    ) -> Option<Position> {
        let open: Vec<Position> = self
            .cells_within_radius(origin, radius)
            .into_iter()
            .filter(|&pos| {
                pos != origin
                    && pos != exclude
                    && self.cell(pos).is_walkable()
                    && self.monster_grid[pos.x as usize][pos.y as usize].is_none()
            })
            .collect();
        rng.choose(&open).copied()
    }

    // ==================== Visibility ====================

    /// Check if a cell is explored (player has seen it before)
    pub fn is_explored(&self, pos: Position) -> bool {
        self.is_valid_pos(pos) && self.explored[pos.x as usize][pos.y as usize]
    }

    /// Check if a cell is currently visible (in player's field of view)
    pub fn is_visible(&self, pos: Position) -> bool {
        self.is_valid_pos(pos) && self.visible[pos.x as usize][pos.y as usize]
    }

    /// Update visibility from a viewpoint
    /// Uses simple raycasting for line of sight
    pub fn update_visibility(&mut self, viewer: Position, sight_range: i32) {
        // Clear current visibility
        for col in &mut self.visible {
            for cell in col {
                *cell = false;
            }
        }

        // Viewer's own position is always visible
        if self.is_valid_pos(viewer) {
            self.visible[viewer.x as usize][viewer.y as usize] = true;
            self.explored[viewer.x as usize][viewer.y as usize] = true;
        }

        // Cast rays in all directions
        let range = sight_range;
        for dx in -range..=range {
            for dy in -range..=range {
                // Skip if outside sight range (circular)
                if dx * dx + dy * dy > range * range {
                    continue;
                }

                let target = viewer.offset(dx as i8, dy as i8);
                if self.is_valid_pos(target) && self.has_line_of_sight(viewer, target) {
                    self.visible[target.x as usize][target.y as usize] = true;
                    self.explored[target.x as usize][target.y as usize] = true;
                }
            }
        }
    }

    /// Check if there's line of sight between two points (Bresenham's algorithm)
    ///
    /// Clouds are overlays, not terrain, so they never block.
    pub fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        let mut x = from.x as i32;
        let mut y = from.y as i32;
        let x1 = to.x as i32;
        let y1 = to.y as i32;

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            // Check if current position blocks sight (but allow seeing the blocking tile)
            if x != from.x as i32 || y != from.y as i32 {
                if !self.is_valid_pos(Position::new(x as i8, y as i8)) {
                    return false;
                }
                let cell = &self.cells[x as usize][y as usize];
                if cell.blocks_sight() {
                    // Can see the blocking tile itself, but not beyond
                    return x == x1 && y == y1;
                }
            }

            if x == x1 && y == y1 {
                return true;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rebuild the monster and object grid indices from the rosters
    ///
    /// Needed after deserialization, which skips the index grids.
    pub fn rebuild_indices(&mut self) {
        self.monster_grid = default_monster_grid();
        self.object_grid = default_object_grid();
        for monster in &self.monsters {
            self.monster_grid[monster.pos.x as usize][monster.pos.y as usize] = Some(monster.id);
        }
        for object in &self.objects {
            self.object_grid[object.pos.x as usize][object.pos.y as usize].push(object.id);
        }
    }
}
