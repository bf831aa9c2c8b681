//! Uniform spatial hash grid, the broad phase.
//!
//! Each entity is stored in every cell its bounding box overlaps. The grid
//! is a cache derived from the world and is rebuilt from scratch every
//! pass; it is never a source of truth.

use std::collections::HashMap;

use arena_component::Entity;
use arena_math::{Aabb, Vec2};

/// Integer cell coordinate: `floor(position / cell_size)` on each axis.
pub type CellCoord = (i32, i32);

/// Smallest accepted cell size.
const MIN_CELL_SIZE: f32 = 1e-3;

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: CellCoord,
    max: CellCoord,
}

impl CellRange {
    /// Grow by one cell on every side.
    fn expanded(self) -> Self {
        Self {
            min: (self.min.0.saturating_sub(1), self.min.1.saturating_sub(1)),
            max: (self.max.0.saturating_add(1), self.max.1.saturating_add(1)),
        }
    }

    fn cells(self) -> impl Iterator<Item = CellCoord> {
        let (min_y, max_y) = (self.min.1, self.max.1);
        (self.min.0..=self.max.0).flat_map(move |x| (min_y..=max_y).map(move |y| (x, y)))
    }
}

/// Uniform hash grid mapping cells to the entities overlapping them.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellCoord, Vec<Entity>>,
    /// Cells covered by each inserted entity.
    spans: HashMap<Entity, CellRange>,
}

impl SpatialGrid {
    /// Create an empty grid. Sizes below a small positive minimum (and
    /// non-finite sizes) are clamped to that minimum.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            spans: HashMap::new(),
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `point`.
    #[must_use]
    pub fn cell_of(&self, point: Vec2) -> CellCoord {
        let cell = (point / self.cell_size).floor();
        (cell.x as i32, cell.y as i32)
    }

    fn range_of(&self, bounds: &Aabb) -> CellRange {
        CellRange {
            min: self.cell_of(bounds.min),
            max: self.cell_of(bounds.max),
        }
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.spans.clear();
    }

    /// Insert `entity` into every cell overlapping `bounds`.
    ///
    /// Inserting an entity that is already present replaces its old cells.
    pub fn insert(&mut self, entity: Entity, bounds: &Aabb) {
        self.remove(entity);
        let range = self.range_of(bounds);
        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(entity);
        }
        self.spans.insert(entity, range);
    }

    /// Remove `entity` from the grid. Returns `false` if it was not present.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(range) = self.spans.remove(&entity) else {
            return false;
        };
        for cell in range.cells() {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.retain(|&e| e != entity);
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        true
    }

    /// Clear the grid and insert every `(entity, bounds)` pair.
    pub fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Entity, Aabb)>,
    {
        self.clear();
        for (entity, bounds) in entries {
            let range = self.range_of(&bounds);
            for cell in range.cells() {
                self.cells.entry(cell).or_default().push(entity);
            }
            self.spans.insert(entity, range);
        }
    }

    /// Candidate neighbours of `entity`: everything sharing a cell with it
    /// or sitting in the ring of cells just around it, excluding `entity`.
    ///
    /// Any entity whose bounds overlap `entity`'s bounds is included, and
    /// the relation is symmetric. Returns an empty list for entities not in
    /// the grid. The result is sorted.
    #[must_use]
    pub fn neighbors(&self, entity: Entity) -> Vec<Entity> {
        let Some(range) = self.spans.get(&entity) else {
            return Vec::new();
        };
        let mut found = self.collect(range.expanded());
        found.retain(|&e| e != entity);
        found
    }

    /// Entities stored in any cell overlapping `region`, sorted.
    #[must_use]
    pub fn query_aabb(&self, region: &Aabb) -> Vec<Entity> {
        self.collect(self.range_of(region))
    }

    /// Entities stored in the cell containing `point`, sorted.
    #[must_use]
    pub fn query_point(&self, point: Vec2) -> Vec<Entity> {
        let mut found = self.cell(self.cell_of(point)).to_vec();
        found.sort_unstable();
        found
    }

    fn collect(&self, range: CellRange) -> Vec<Entity> {
        let mut found = Vec::new();
        // Walk whichever is smaller: the requested cells or the occupied ones.
        let area = (i64::from(range.max.0) - i64::from(range.min.0) + 1)
            * (i64::from(range.max.1) - i64::from(range.min.1) + 1);
        if area as usize > self.cells.len() {
            for (cell, bucket) in &self.cells {
                if (range.min.0..=range.max.0).contains(&cell.0)
                    && (range.min.1..=range.max.1).contains(&cell.1)
                {
                    found.extend_from_slice(bucket);
                }
            }
        } else {
            for cell in range.cells() {
                found.extend_from_slice(self.cell(cell));
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Entities stored in `cell`.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> &[Entity] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `entity` is in the grid.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.spans.contains_key(&entity)
    }

    /// Number of entities in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(50.0)
    }
}
