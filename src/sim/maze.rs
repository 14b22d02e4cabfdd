//! Maze grid model: static tile layout plus the mutable pellet overlay
//!
//! Layout legend:
//! - `#` wall
//! - `.` path with a pellet
//! - `o` path with a power pellet (capsule)
//! - ` ` empty path
//! - `_` ghost house interior
//! - `-` ghost house door

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Static tile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Path,
    GhostHouse,
    GhostHouseDoor,
}

impl TileKind {
    #[inline]
    pub fn is_open(self) -> bool {
        !matches!(self, TileKind::Wall)
    }
}

/// Pellet overlay cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PelletKind {
    #[default]
    None,
    Pellet,
    PowerPellet,
}

/// Who is asking whether a tile can be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Every open tile, door included
    Pursuer,
    /// The ghost house door is closed to the player
    Player,
}

/// Tile grid owner. Tiles are immutable after parsing; only the pellet
/// overlay changes during play.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    width: i32,
    height: i32,
    tile_size: f32,
    tiles: Vec<TileKind>,
    pellets: Vec<PelletKind>,
    /// Overlay as loaded, restored at every level start
    initial_pellets: Vec<PelletKind>,
    pellets_remaining: usize,
    tunnel_row: Option<i32>,
}

impl MazeGrid {
    /// Parse an ASCII layout.
    ///
    /// With `tunnel_row == None` the first row whose two edge tiles are open
    /// becomes the tunnel row (if any).
    pub fn parse<S: AsRef<str>>(
        lines: &[S],
        tile_size: f32,
        tunnel_row: Option<i32>,
    ) -> SimResult<Self> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "tile size must be positive, got {tile_size}"
            )));
        }

        let height = lines.len();
        let width = lines.first().map(|l| l.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(SimError::EmptyLayout);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut pellets = Vec::with_capacity(width * height);

        for (y, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let row_width = line.chars().count();
            if row_width != width {
                return Err(SimError::RaggedLayout {
                    row: y,
                    width: row_width,
                    expected: width,
                });
            }
            for (x, glyph) in line.chars().enumerate() {
                let (tile, pellet) = match glyph {
                    '#' => (TileKind::Wall, PelletKind::None),
                    '.' => (TileKind::Path, PelletKind::Pellet),
                    'o' => (TileKind::Path, PelletKind::PowerPellet),
                    ' ' => (TileKind::Path, PelletKind::None),
                    '_' => (TileKind::GhostHouse, PelletKind::None),
                    '-' => (TileKind::GhostHouseDoor, PelletKind::None),
                    _ => return Err(SimError::UnknownGlyph { glyph, x, y }),
                };
                tiles.push(tile);
                pellets.push(pellet);
            }
        }

        let mut grid = Self {
            width: width as i32,
            height: height as i32,
            tile_size,
            tiles,
            initial_pellets: pellets.clone(),
            pellets_remaining: 0,
            pellets,
            tunnel_row: None,
        };
        grid.pellets_remaining = grid.count_pellets();

        grid.tunnel_row = match tunnel_row {
            Some(row) => {
                if !grid.edges_open(row) {
                    return Err(SimError::InvalidTunnelRow(row));
                }
                Some(row)
            }
            None => (0..grid.height).find(|&row| grid.edges_open(row)),
        };

        log::debug!(
            "Parsed {}x{} maze, {} pellets, tunnel row {:?}",
            grid.width,
            grid.height,
            grid.pellets_remaining,
            grid.tunnel_row
        );

        Ok(grid)
    }

    fn edges_open(&self, row: i32) -> bool {
        (0..self.height).contains(&row)
            && self.raw_tile(IVec2::new(0, row)).is_open()
            && self.raw_tile(IVec2::new(self.width - 1, row)).is_open()
    }

    fn count_pellets(&self) -> usize {
        self.pellets
            .iter()
            .filter(|p| **p != PelletKind::None)
            .count()
    }

    #[inline]
    fn index(&self, tile: IVec2) -> Option<usize> {
        self.in_bounds(tile)
            .then(|| (tile.y * self.width + tile.x) as usize)
    }

    fn raw_tile(&self, tile: IVec2) -> TileKind {
        self.index(tile)
            .map(|i| self.tiles[i])
            .unwrap_or(TileKind::Wall)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn tunnel_row(&self) -> Option<i32> {
        self.tunnel_row
    }

    /// Maze width in pixels
    #[inline]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    #[inline]
    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    /// Tile type, extended past the edges: outside is wall, except the
    /// horizontal extension of the tunnel row, which is path.
    pub fn tile(&self, tile: IVec2) -> TileKind {
        if self.in_bounds(tile) {
            return self.raw_tile(tile);
        }
        let on_tunnel = Some(tile.y) == self.tunnel_row;
        if on_tunnel && (tile.x < 0 || tile.x >= self.width) {
            TileKind::Path
        } else {
            TileKind::Wall
        }
    }

    #[inline]
    pub fn is_open(&self, tile: IVec2) -> bool {
        self.tile(tile).is_open()
    }

    /// Open test refined by who is moving
    pub fn is_open_for(&self, tile: IVec2, traversal: Traversal) -> bool {
        match (traversal, self.tile(tile)) {
            (Traversal::Player, TileKind::GhostHouseDoor) => false,
            (_, kind) => kind.is_open(),
        }
    }

    /// The two portal tiles terminating the tunnel row: (west, east)
    pub fn portals(&self) -> Option<(IVec2, IVec2)> {
        self.tunnel_row
            .map(|row| (IVec2::new(0, row), IVec2::new(self.width - 1, row)))
    }

    #[inline]
    pub fn tile_center(&self, tile: IVec2) -> Vec2 {
        crate::tile_center(tile, self.tile_size)
    }

    #[inline]
    pub fn tile_of(&self, pos: Vec2) -> IVec2 {
        crate::tile_of(pos, self.tile_size)
    }

    /// Nearest open in-bounds tile within a square search radius.
    ///
    /// Ties on Euclidean distance resolve in row-major order.
    pub fn nearest_walkable(
        &self,
        origin: IVec2,
        radius: i32,
        traversal: Traversal,
    ) -> Option<IVec2> {
        if self.in_bounds(origin) && self.is_open_for(origin, traversal) {
            return Some(origin);
        }
        // Anything wider than the board searches the same tiles
        let radius = radius.clamp(0, self.width.max(self.height));
        let mut best: Option<(i32, IVec2)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let tile = origin + IVec2::new(dx, dy);
                if !self.in_bounds(tile) || !self.is_open_for(tile, traversal) {
                    continue;
                }
                let dist = dx * dx + dy * dy;
                if best.is_none_or(|(d, _)| dist < d) {
                    best = Some((dist, tile));
                }
            }
        }
        best.map(|(_, tile)| tile)
    }

    pub fn pellet(&self, tile: IVec2) -> PelletKind {
        self.index(tile)
            .map(|i| self.pellets[i])
            .unwrap_or(PelletKind::None)
    }

    /// Remove and return the pellet on a tile, if any
    pub fn take_pellet(&mut self, tile: IVec2) -> Option<PelletKind> {
        let i = self.index(tile)?;
        match self.pellets[i] {
            PelletKind::None => None,
            kind => {
                self.pellets[i] = PelletKind::None;
                self.pellets_remaining -= 1;
                Some(kind)
            }
        }
    }

    #[inline]
    pub fn pellets_remaining(&self) -> usize {
        self.pellets_remaining
    }

    /// Restore the overlay to its loaded state (level start)
    pub fn reset_pellets(&mut self) {
        self.pellets.copy_from_slice(&self.initial_pellets);
        self.pellets_remaining = self.count_pellets();
    }

    /// Row-major view of the pellet overlay for renderers
    pub fn pellet_cells(&self) -> &[PelletKind] {
        &self.pellets
    }
}
