//! Level data format and providers
//!
//! A level is the JSON record the editor writes:
//! `{"tilemap": {"x;y": tile, ...}, "tile_size": 16, "offgrid": [tile, ...]}`
//! where a tile is `{"type": "grass", "variant": 1, "pos": [x, y]}`.
//! Grid tile `pos` is in tile coordinates, off-grid tile `pos` in pixels.
//! Extra top-level fields are ignored.

use std::collections::BTreeMap;
use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::sim::tilemap::Tile;

/// Raw level record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub tilemap: BTreeMap<String, Tile>,
    pub tile_size: u32,
    #[serde(default)]
    pub offgrid: Vec<Tile>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Format a grid coordinate as a `"x;y"` key
pub fn grid_key(pos: IVec2) -> String {
    format!("{};{}", pos.x, pos.y)
}

/// Parse a `"x;y"` key
pub fn parse_grid_key(key: &str) -> Result<IVec2, LevelError> {
    let malformed = || LevelError::MalformedKey(key.to_string());
    let (x, y) = key.split_once(';').ok_or_else(malformed)?;
    let x = x.trim().parse::<i32>().map_err(|_| malformed())?;
    let y = y.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok(IVec2::new(x, y))
}

/// Level loading errors (all fatal: the level cannot be entered)
#[derive(Debug)]
pub enum LevelError {
    /// JSON syntax or shape error
    Parse(serde_json::Error),
    /// Grid key is not of the form `"x;y"`
    MalformedKey(String),
    /// Tile size must be positive
    InvalidTileSize(u32),
    /// Provider has no level at this index
    MissingLevel(usize),
    /// Reading level data failed
    Io(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Parse(e) => write!(f, "level parse error: {}", e),
            LevelError::MalformedKey(key) => write!(f, "malformed grid key: {:?}", key),
            LevelError::InvalidTileSize(size) => write!(f, "invalid tile size: {}", size),
            LevelError::MissingLevel(index) => write!(f, "no level with index {}", index),
            LevelError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e.to_string())
    }
}

/// Source of level data, consulted on every level (re)load
pub trait LevelProvider {
    fn level_count(&self) -> usize;
    fn load(&self, index: usize) -> Result<LevelData, LevelError>;
}

/// In-memory level list
#[derive(Debug, Clone, Default)]
pub struct LevelSet {
    levels: Vec<LevelData>,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }

    /// Parse every level up front so a bad file fails before play starts
    pub fn from_json<S: AsRef<str>>(sources: &[S]) -> Result<Self, LevelError> {
        let levels = sources
            .iter()
            .map(|s| LevelData::from_json(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(levels))
    }
}

impl LevelProvider for LevelSet {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn load(&self, index: usize) -> Result<LevelData, LevelError> {
        self.levels
            .get(index)
            .cloned()
            .ok_or(LevelError::MissingLevel(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "tilemap": {
            "0;2": {"type": "grass", "variant": 1, "pos": [0, 2]},
            "1;2": {"type": "stone", "variant": 0, "pos": [1, 2]}
        },
        "tile_size": 16,
        "offgrid": [{"type": "decor", "variant": 3, "pos": [40, 12]}],
        "level": 1
    }"#;

    #[test]
    fn parses_level_and_ignores_extra_fields() {
        let level = LevelData::from_json(LEVEL).unwrap();
        assert_eq!(level.tile_size, 16);
        assert_eq!(level.tilemap.len(), 2);
        assert_eq!(level.tilemap["1;2"].kind, "stone");
        assert_eq!(level.offgrid[0].pos, IVec2::new(40, 12));
    }

    #[test]
    fn missing_field_is_fatal() {
        let err = LevelData::from_json(r#"{"tile_size": 16, "offgrid": []}"#).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn grid_keys() {
        assert_eq!(grid_key(IVec2::new(-3, 7)), "-3;7");
        assert_eq!(parse_grid_key("-3;7").unwrap(), IVec2::new(-3, 7));
        assert!(matches!(parse_grid_key("3,7"), Err(LevelError::MalformedKey(_))));
        assert!(matches!(parse_grid_key("a;7"), Err(LevelError::MalformedKey(_))));
    }

    #[test]
    fn level_set_bounds() {
        let set = LevelSet::from_json(&[LEVEL]).unwrap();
        assert_eq!(set.level_count(), 1);
        assert!(set.load(0).is_ok());
        assert!(matches!(set.load(1), Err(LevelError::MissingLevel(1))));
    }
}
