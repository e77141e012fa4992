//! Sparse tile grid with neighbor and solid-collision queries
//!
//! Grid tiles are keyed by a packed integer derived from their tile
//! coordinate. Off-grid tiles are decoration placed at pixel positions and
//! never collide.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::assets::AssetTable;
use crate::consts::SOLID_TILE_TYPES;
use crate::level::{LevelData, LevelError, grid_key, parse_grid_key};
use crate::render::Surface;

/// Neighbor offsets scanned around a position, in collision order
pub const NEIGHBOR_OFFSETS: [IVec2; 9] = [
    IVec2::new(-1, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(0, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// A tile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "type")]
    pub kind: String,
    pub variant: u32,
    /// Tile coordinate for grid tiles, pixel position for off-grid tiles
    pub pos: IVec2,
}

impl Tile {
    pub fn new(kind: impl Into<String>, variant: u32, pos: IVec2) -> Self {
        Self {
            kind: kind.into(),
            variant,
            pos,
        }
    }

    pub fn is_solid(&self) -> bool {
        SOLID_TILE_TYPES.contains(&self.kind.as_str())
    }

    fn matches(&self, ids: &[(&str, u32)]) -> bool {
        ids.iter()
            .any(|&(kind, variant)| self.kind == kind && self.variant == variant)
    }
}

/// Packed grid key: x in the high 32 bits, y in the low 32 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey(i64);

impl TileKey {
    #[inline]
    pub fn new(loc: IVec2) -> Self {
        Self(((loc.x as i64) << 32) | (loc.y as u32 as i64))
    }

    pub fn loc(self) -> IVec2 {
        IVec2::new((self.0 >> 32) as i32, self.0 as u32 as i32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_size: i32,
    grid: BTreeMap<TileKey, Tile>,
    offgrid: Vec<Tile>,
}

impl Tilemap {
    /// Empty map. `tile_size` must be positive.
    pub fn new(tile_size: u32) -> Result<Self, LevelError> {
        if tile_size == 0 || tile_size > i32::MAX as u32 {
            return Err(LevelError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            tile_size: tile_size as i32,
            grid: BTreeMap::new(),
            offgrid: Vec::new(),
        })
    }

    /// Build from level data; grid keys are re-derived from each tile's `pos`
    pub fn from_level(level: LevelData) -> Result<Self, LevelError> {
        let mut map = Self::new(level.tile_size)?;
        for (key, tile) in level.tilemap {
            let loc = parse_grid_key(&key)?;
            if loc != tile.pos {
                log::warn!(
                    "Grid key {:?} disagrees with tile pos {:?}; using pos",
                    key,
                    tile.pos
                );
            }
            map.insert(tile);
        }
        map.offgrid = level.offgrid;
        Ok(map)
    }

    /// Serialize back to the level format
    pub fn to_level(&self) -> LevelData {
        LevelData {
            tilemap: self
                .grid
                .values()
                .map(|tile| (grid_key(tile.pos), tile.clone()))
                .collect(),
            tile_size: self.tile_size as u32,
            offgrid: self.offgrid.clone(),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Insert a grid tile, replacing any tile in the same cell
    pub fn insert(&mut self, tile: Tile) -> Option<Tile> {
        self.grid.insert(TileKey::new(tile.pos), tile)
    }

    pub fn push_offgrid(&mut self, tile: Tile) {
        self.offgrid.push(tile);
    }

    pub fn get(&self, loc: IVec2) -> Option<&Tile> {
        self.grid.get(&TileKey::new(loc))
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn offgrid(&self) -> &[Tile] {
        &self.offgrid
    }

    pub fn grid_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.values()
    }

    /// Tile coordinate containing a pixel position
    #[inline]
    pub fn tile_loc(&self, pos: Vec2) -> IVec2 {
        let size = self.tile_size as f32;
        IVec2::new((pos.x / size).floor() as i32, (pos.y / size).floor() as i32)
    }

    /// Pixel rect covered by a grid cell
    pub fn cell_rect(&self, loc: IVec2) -> Rect {
        Rect::new(
            loc.x * self.tile_size,
            loc.y * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Existing tiles in the 3x3 block around a pixel position
    pub fn tiles_around(&self, pos: Vec2) -> impl Iterator<Item = &Tile> + '_ {
        let loc = self.tile_loc(pos);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |offset| self.get(loc + *offset))
    }

    /// Solid tile in the cell containing `pos`, if any
    pub fn solid_check(&self, pos: Vec2) -> Option<&Tile> {
        self.get(self.tile_loc(pos)).filter(|tile| tile.is_solid())
    }

    /// Pixel rects of solid tiles around `pos`, in neighbor-offset order
    pub fn physics_rects_around(&self, pos: Vec2) -> impl Iterator<Item = Rect> + '_ {
        self.tiles_around(pos)
            .filter(|tile| tile.is_solid())
            .map(|tile| self.cell_rect(tile.pos))
    }

    /// Collect tiles matching any `(type, variant)` pair.
    ///
    /// Off-grid matches come first, then grid matches with `pos` scaled to
    /// pixels (in the returned copy only). Matches are removed from the map
    /// unless `keep` is set.
    pub fn extract(&mut self, ids: &[(&str, u32)], keep: bool) -> Vec<Tile> {
        let matches = self.peek(ids);
        if !keep {
            self.offgrid.retain(|tile| !tile.matches(ids));
            self.grid.retain(|_, tile| !tile.matches(ids));
        }
        matches
    }

    /// Non-destructive `extract`
    pub fn peek(&self, ids: &[(&str, u32)]) -> Vec<Tile> {
        let offgrid = self
            .offgrid
            .iter()
            .filter(|tile| tile.matches(ids))
            .cloned();
        let grid = self
            .grid
            .values()
            .filter(|tile| tile.matches(ids))
            .map(|tile| Tile {
                pos: tile.pos * self.tile_size,
                ..tile.clone()
            });
        offgrid.chain(grid).collect()
    }

    /// Draw off-grid decoration, then the grid cells visible through `offset`
    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2, assets: &AssetTable) {
        for tile in &self.offgrid {
            if let Some(image) = assets.tile_image(&tile.kind, tile.variant) {
                surface.blit(image, (tile.pos - offset).as_vec2(), false);
            }
        }

        let view = surface.size();
        let min = offset.div_euclid(IVec2::splat(self.tile_size));
        let max = (offset + view).div_euclid(IVec2::splat(self.tile_size));
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let Some(tile) = self.get(IVec2::new(x, y)) else {
                    continue;
                };
                if let Some(image) = assets.tile_image(&tile.kind, tile.variant) {
                    let pos = tile.pos * self.tile_size - offset;
                    surface.blit(image, pos.as_vec2(), false);
                }
            }
        }
    }
}
