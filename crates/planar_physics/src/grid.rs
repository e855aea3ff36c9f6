//! Broad phase: uniform spatial grid over the viewport
//!
//! Each step the grid is cleared and every active body's AABB is bucketed
//! into all cells it overlaps. Cells store indices into the step's proxy
//! list, never owning handles, so removing a body needs no per-cell cleanup.
//!
//! Bodies entirely outside the grid bounds are culled: collisions between
//! off-screen bodies are not reported.

use std::collections::HashSet;

use planar_math::Vec2;

use crate::body::BodyKey;
use crate::contact::ContactPair;
use crate::filter::CollisionFilter;
use crate::shapes::Aabb2D;

/// Per-step snapshot of a body as seen by the broad phase
#[derive(Clone, Copy, Debug)]
pub struct BroadPhaseProxy {
    pub key: BodyKey,
    pub aabb: Aabb2D,
    pub is_static: bool,
    pub filter: CollisionFilter,
}

/// Uniform grid partitioning the viewport into `width x height` cells
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    bottom_left: Vec2,
    top_right: Vec2,
    width: usize,
    height: usize,
    cell_size: Vec2,
    cells: Vec<Vec<usize>>,
    culled: usize,
}

impl SpatialGrid {
    /// Create a grid over the given bounds
    ///
    /// Zero partition counts are clamped to 1.
    pub fn new(bottom_left: Vec2, top_right: Vec2, width: u32, height: u32) -> Self {
        let mut grid = Self {
            bottom_left,
            top_right,
            width: 1,
            height: 1,
            cell_size: Vec2::ONE,
            cells: Vec::new(),
            culled: 0,
        };
        grid.resize(width, height);
        grid
    }

    /// Reallocate the cell array and clear all buckets
    ///
    /// Candidate pairs must be recollected after a rebuild.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!(
                "Grid partitions {}x{} are invalid, clamping to at least 1x1",
                width,
                height
            );
        }
        self.width = width.max(1) as usize;
        self.height = height.max(1) as usize;
        self.cells = vec![Vec::new(); self.width * self.height];
        self.culled = 0;
        self.update_cell_size();
    }

    /// Move the grid to new viewport bounds, clearing all buckets
    pub fn set_bounds(&mut self, bottom_left: Vec2, top_right: Vec2) {
        self.bottom_left = bottom_left;
        self.top_right = top_right;
        self.update_cell_size();
        self.clear();
    }

    fn update_cell_size(&mut self) {
        let extent = self.top_right - self.bottom_left;
        if extent.x <= 0.0 || extent.y <= 0.0 {
            log::warn!(
                "Grid bounds {:?}..{:?} are empty, using unit cells",
                self.bottom_left,
                self.top_right
            );
            self.top_right = self.bottom_left + Vec2::new(self.width as f32, self.height as f32);
            self.cell_size = Vec2::ONE;
            return;
        }
        self.cell_size = Vec2::new(extent.x / self.width as f32, extent.y / self.height as f32);
    }

    /// Grid dimensions in cells (width, height)
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// World-space area covered by the grid
    pub fn bounds(&self) -> Aabb2D {
        Aabb2D::new(self.bottom_left, self.top_right)
    }

    /// Number of proxies culled by the last rebuild
    #[inline]
    pub fn culled_count(&self) -> usize {
        self.culled
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.culled = 0;
    }

    /// Proxy indices stored in a cell
    pub fn cell(&self, x: usize, y: usize) -> &[usize] {
        &self.cells[self.cell_index(x, y)]
    }

    #[inline]
    fn cell_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "grid cell ({}, {}) out of bounds", x, y);
        y.min(self.height - 1) * self.width + x.min(self.width - 1)
    }

    /// Cell coordinate containing `p`, clamped to the grid
    fn clamped_cell(&self, p: Vec2) -> (usize, usize) {
        let rel = (p - self.bottom_left).component_div(self.cell_size);
        // `as` saturates and maps NaN to 0
        let x = (rel.x.floor() as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = (rel.y.floor() as i64).clamp(0, self.height as i64 - 1) as usize;
        (x, y)
    }

    /// Inclusive cell range `(min_x, min_y, max_x, max_y)` covered by an AABB
    pub fn cell_range(&self, aabb: &Aabb2D) -> (usize, usize, usize, usize) {
        let (x0, y0) = self.clamped_cell(aabb.min);
        let (x1, y1) = self.clamped_cell(aabb.max);
        (x0, y0, x1, y1)
    }

    /// Clear the grid and bucket every proxy overlapping the grid bounds
    pub fn rebuild(&mut self, proxies: &[BroadPhaseProxy]) {
        self.clear();
        let bounds = self.bounds();

        for (index, proxy) in proxies.iter().enumerate() {
            if !proxy.aabb.overlaps(&bounds) {
                self.culled += 1;
                continue;
            }
            let (x0, y0, x1, y1) = self.cell_range(&proxy.aabb);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let i = self.cell_index(x, y);
                    self.cells[i].push(index);
                }
            }
        }
    }

    /// Unique candidate pairs from co-resident proxies
    ///
    /// Skips static-static pairs, pairs whose filters disagree, and pairs
    /// whose AABBs do not overlap. A pair sharing several cells is reported
    /// once.
    pub fn candidate_pairs(&self, proxies: &[BroadPhaseProxy]) -> Vec<ContactPair> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();

        for cell in &self.cells {
            for (i, &ia) in cell.iter().enumerate() {
                let a = &proxies[ia];
                for &ib in &cell[i + 1..] {
                    let b = &proxies[ib];
                    if a.is_static && b.is_static {
                        continue;
                    }
                    if !a.filter.collides_with(&b.filter) {
                        continue;
                    }
                    if !a.aabb.overlaps(&b.aabb) {
                        continue;
                    }
                    let pair = ContactPair::new(a.key, b.key);
                    if seen.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
        }

        pairs
    }
}
