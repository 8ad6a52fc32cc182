//! Terrain grid and coordinate types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Get orthogonal in-bounds neighbors (up, down, left, right).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.y > 0 {
            result[count as usize] = Coord::new(self.x, self.y - 1); // up
            count += 1;
        }
        if self.y + 1 < height {
            result[count as usize] = Coord::new(self.x, self.y + 1); // down
            count += 1;
        }
        if self.x > 0 {
            result[count as usize] = Coord::new(self.x - 1, self.y); // left
            count += 1;
        }
        if self.x + 1 < width {
            result[count as usize] = Coord::new(self.x + 1, self.y); // right
            count += 1;
        }

        (result, count)
    }

    /// Chebyshev distance: the number of king moves between two coordinates.
    ///
    /// Fog of war uses this as the visibility radius metric.
    #[must_use]
    pub fn chebyshev_distance(&self, other: Coord) -> u16 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// Check whether `other` is exactly one orthogonal step away.
    #[must_use]
    pub fn is_orthogonal_neighbor(&self, other: Coord) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx + dy == 1
    }
}

/// Cardinal movement direction.
///
/// Orders arrive over the wire as lowercase names; single-letter and
/// uppercase spellings are accepted for robustness against sloppy agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward y = 0.
    #[serde(alias = "n", alias = "N", alias = "North", alias = "NORTH")]
    North,
    /// Toward increasing y.
    #[serde(alias = "s", alias = "S", alias = "South", alias = "SOUTH")]
    South,
    /// Toward increasing x.
    #[serde(alias = "e", alias = "E", alias = "East", alias = "EAST")]
    East,
    /// Toward x = 0.
    #[serde(alias = "w", alias = "W", alias = "West", alias = "WEST")]
    West,
}

impl Direction {
    /// The (dx, dy) grid delta for this direction.
    ///
    /// Origin is the top-left corner; y grows downward.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Apply this direction to a coordinate, returning `None` on underflow.
    ///
    /// The caller still has to bounds-check the upper edge against the map.
    #[must_use]
    pub fn step(self, from: Coord) -> Option<Coord> {
        let (dx, dy) = self.delta();
        let x = i32::from(from.x) + dx;
        let y = i32::from(from.y) + dy;
        if x < 0 || y < 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let coord = Coord::new(x as u16, y as u16);
        Some(coord)
    }
}

/// Terrain kind of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Terrain {
    /// Built-up area, normal movement.
    Urban = 0,
    /// Open country, normal movement.
    Rural = 1,
    /// Impassable.
    Water = 2,
    /// Passable but slow.
    Forest = 3,
}

impl Terrain {
    /// Check if units may occupy this terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Terrain::Water)
    }

    /// Movement cost modifier for entering a cell of this terrain.
    ///
    /// Water has no meaningful cost; it is unreachable.
    #[must_use]
    pub const fn move_cost(self) -> u8 {
        match self {
            Terrain::Urban | Terrain::Rural => 1,
            Terrain::Forest => 2,
            Terrain::Water => u8::MAX,
        }
    }

    /// Parse a single map-asset glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'U' => Some(Terrain::Urban),
            'R' => Some(Terrain::Rural),
            'W' => Some(Terrain::Water),
            'F' => Some(Terrain::Forest),
            _ => None,
        }
    }
}

/// Immutable terrain grid, loaded once at startup.
///
/// The turn engine assumes a constructed map is valid; all validation
/// happens in the constructors, which return [`ConfigError`] on bad assets.
#[derive(Debug, Clone)]
pub struct MapModel {
    /// Width of the map in cells.
    width: u16,
    /// Height of the map in cells.
    height: u16,
    /// Terrain stored in row-major order.
    cells: Vec<Terrain>,
}

impl MapModel {
    /// Build a map from rows of terrain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMap`] for zero dimensions and
    /// [`ConfigError::RaggedRows`] when row widths differ.
    pub fn from_rows(rows: Vec<Vec<Terrain>>) -> Result<Self, ConfigError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyMap);
        }
        if width > usize::from(u16::MAX) || height > usize::from(u16::MAX) {
            return Err(ConfigError::EmptyMap);
        }

        #[allow(clippy::cast_possible_truncation)]
        let (width_u16, height_u16) = (width as u16, height as u16);

        let mut cells = Vec::with_capacity(width * height);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(ConfigError::RaggedRows {
                    row: row_idx,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            width: width_u16,
            height: height_u16,
            cells,
        })
    }

    /// Parse an ASCII map asset.
    ///
    /// One line per row; glyphs are `U` (urban), `R` (rural), `W` (water),
    /// `F` (forest). Blank lines and surrounding whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for empty assets, ragged rows, or
    /// unrecognised glyphs.
    pub fn from_ascii(asset: &str) -> Result<Self, ConfigError> {
        let mut rows = Vec::new();
        for (row_idx, line) in asset.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (col_idx, glyph) in line.chars().enumerate() {
                match Terrain::from_glyph(glyph) {
                    Some(terrain) => row.push(terrain),
                    None => {
                        return Err(ConfigError::UnknownTerrain {
                            glyph,
                            row: row_idx,
                            col: col_idx,
                        });
                    }
                }
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Load an ASCII map asset from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the same errors as [`MapModel::from_ascii`].
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let asset = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ascii(&asset)
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the cells array.
    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Terrain at the given coordinate.
    #[must_use]
    pub fn terrain(&self, coord: Coord) -> Option<Terrain> {
        self.coord_to_index(coord).map(|idx| self.cells[idx])
    }

    /// Check whether a coordinate is in bounds and passable.
    #[must_use]
    pub fn is_passable(&self, coord: Coord) -> bool {
        self.terrain(coord).is_some_and(Terrain::is_passable)
    }

    /// Orthogonal in-bounds neighbors of a coordinate.
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> ([Coord; 4], u8) {
        coord.adjacent(self.width, self.height)
    }

    /// Iterate over all coordinates and terrain.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Terrain)> + '_ {
        self.cells.iter().enumerate().map(|(idx, terrain)| {
            #[allow(clippy::cast_possible_truncation)]
            let x = (idx % usize::from(self.width)) as u16;
            #[allow(clippy::cast_possible_truncation)]
            let y = (idx / usize::from(self.width)) as u16;
            (Coord::new(x, y), *terrain)
        })
    }

    /// The terrain grid as rows, for intel serialization.
    #[must_use]
    pub fn terrain_rows(&self) -> Vec<Vec<Terrain>> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)])
                    .collect()
            })
            .collect()
    }
}
