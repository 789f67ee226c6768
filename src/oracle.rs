//! Spatial oracle: read-only range queries over a simulation snapshot.
//!
//! The planner only ever asks "what occupies this box?". Hosts supply any
//! structure implementing [`SpatialOracle`]; it is built once per
//! simulation tick and shared by all concurrent planning calls, so it must
//! be `Sync` and answer queries without interior mutation.
//!
//! [`GridOracle`] is a bucketed snapshot suitable for hosts without their
//! own index, and for tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Vec2;

/// Errors emitted while building an oracle snapshot.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Configuration values that cannot be used (e.g., non-positive cell size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// One occupant reported by a range query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OracleEntry {
    /// Occupied position.
    pub position: Vec2,
    /// Owning agent (ignored for static obstacles).
    pub agent_index: usize,
    /// Static obstacles count at every step.
    pub is_static_obstacle: bool,
    /// Planned step this position belongs to (dynamic entries only).
    pub step_index: usize,
}

impl OracleEntry {
    /// A static obstacle sample.
    pub fn obstacle(position: Vec2) -> Self {
        Self {
            position,
            agent_index: usize::MAX,
            is_static_obstacle: true,
            step_index: 0,
        }
    }

    /// A position agent `agent_index` plans to occupy at `step_index`.
    pub fn agent(position: Vec2, agent_index: usize, step_index: usize) -> Self {
        Self {
            position,
            agent_index,
            is_static_obstacle: false,
            step_index,
        }
    }

    /// Whether this entry collides with `agent_index` at `step_index`.
    ///
    /// Own entries never count; dynamic entries only count on their own step.
    pub fn counts_for(&self, agent_index: usize, step_index: usize) -> bool {
        if self.is_static_obstacle {
            return true;
        }
        self.agent_index != agent_index && self.step_index == step_index
    }
}

/// Axis-aligned query box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Box center.
    pub center: Vec2,
    /// Half size along each axis.
    pub half_extent: Vec2,
}

impl Aabb {
    /// Creates a box from center and half extent.
    pub fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Whether `p` lies inside or on the border.
    pub fn contains(&self, p: Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half_extent.x
            && (p.y - self.center.y).abs() <= self.half_extent.y
    }

    /// Lower corner.
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extent
    }

    /// Upper corner.
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extent
    }
}

/// Read-only range query service.
pub trait SpatialOracle: Sync {
    /// Entries whose position lies inside `center ± half_extent`.
    fn range_query(&self, center: Vec2, half_extent: Vec2) -> Vec<OracleEntry>;
}

impl<T: SpatialOracle + ?Sized> SpatialOracle for &T {
    fn range_query(&self, center: Vec2, half_extent: Vec2) -> Vec<OracleEntry> {
        (**self).range_query(center, half_extent)
    }
}

/// Oracle that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyOracle;

impl SpatialOracle for EmptyOracle {
    fn range_query(&self, _center: Vec2, _half_extent: Vec2) -> Vec<OracleEntry> {
        Vec::new()
    }
}

/// Uniform-grid snapshot of oracle entries.
///
/// A query visits only cells inside both the query box and the occupied
/// cell range recorded at build time. When that still spans more cells
/// than are occupied, the occupied buckets are scanned instead, so a query
/// never costs more than the snapshot size.
#[derive(Debug, Clone)]
pub struct GridOracle {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<OracleEntry>>,
    occupied: Option<CellRange>,
    len: usize,
}

/// Inclusive range of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: (i64, i64),
    max: (i64, i64),
}

impl CellRange {
    fn single(cell: (i64, i64)) -> Self {
        Self { min: cell, max: cell }
    }

    fn include(&mut self, cell: (i64, i64)) {
        self.min = (self.min.0.min(cell.0), self.min.1.min(cell.1));
        self.max = (self.max.0.max(cell.0), self.max.1.max(cell.1));
    }

    fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        let min = (self.min.0.max(other.min.0), self.min.1.max(other.min.1));
        let max = (self.max.0.min(other.max.0), self.max.1.min(other.max.1));
        (min.0 <= max.0 && min.1 <= max.1).then_some(CellRange { min, max })
    }

    fn contains(&self, cell: (i64, i64)) -> bool {
        (self.min.0..=self.max.0).contains(&cell.0) && (self.min.1..=self.max.1).contains(&cell.1)
    }

    fn cell_count(&self) -> u128 {
        let w = (self.max.0 as i128 - self.min.0 as i128 + 1) as u128;
        let h = (self.max.1 as i128 - self.min.1 as i128 + 1) as u128;
        w * h
    }
}

impl GridOracle {
    /// Builds a snapshot with the given cell edge length.
    pub fn build(
        cell_size: f64,
        entries: impl IntoIterator<Item = OracleEntry>,
    ) -> Result<Self, OracleError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(OracleError::InvalidConfig("cell_size must be positive"));
        }
        let mut grid = Self {
            cell_size,
            cells: HashMap::new(),
            occupied: None,
            len: 0,
        };
        for entry in entries {
            if !entry.position.is_finite() {
                return Err(OracleError::InvalidConfig("entry position must be finite"));
            }
            let key = grid.cell_of(entry.position);
            match grid.occupied.as_mut() {
                Some(range) => range.include(key),
                None => grid.occupied = Some(CellRange::single(key)),
            }
            grid.cells.entry(key).or_default().push(entry);
            grid.len += 1;
        }
        Ok(grid)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn cell_of(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }
}

impl SpatialOracle for GridOracle {
    fn range_query(&self, center: Vec2, half_extent: Vec2) -> Vec<OracleEntry> {
        let bounds = Aabb::new(center, half_extent);
        let queried = CellRange {
            min: self.cell_of(bounds.min()),
            max: self.cell_of(bounds.max()),
        };
        let Some(range) = self.occupied.and_then(|o| o.intersect(&queried)) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        if range.cell_count() > self.cells.len() as u128 {
            for (_, bucket) in self.cells.iter().filter(|(key, _)| range.contains(**key)) {
                out.extend(bucket.iter().filter(|e| bounds.contains(e.position)));
            }
            return out;
        }
        for cx in range.min.0..=range.max.0 {
            for cy in range.min.1..=range.max.1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    out.extend(bucket.iter().filter(|e| bounds.contains(e.position)));
                }
            }
        }
        out
    }
}
