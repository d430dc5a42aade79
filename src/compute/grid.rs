//! Fixed-shape board of classified cells.
//!
//! Cells and their colors are stored row-major in two flat buffers allocated
//! once at construction: `index = row * width + col`.

use super::color::palette;
use super::{Cell, CellKind, Direction, Rgba};

/// Rectangular board of cells plus the color each one renders as.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    pub(crate) cells: Vec<Cell>,
    pixels: Vec<Rgba>,
}

impl Grid {
    /// Classify a row-major buffer of layout codes.
    ///
    /// # Panics
    ///
    /// Panics if `codes.len() != width * height`. Layout loaders guarantee the
    /// shape before construction.
    pub fn new(width: usize, height: usize, codes: &[u8]) -> Self {
        assert_eq!(
            codes.len(),
            width * height,
            "layout buffer does not match a {width}x{height} grid"
        );

        let mut cells = Vec::with_capacity(codes.len());
        let mut pixels = Vec::with_capacity(codes.len());

        for row in 0..height {
            for col in 0..width {
                let cell = Cell::from_code(codes[row * width + col], row, col);
                pixels.push(match cell.kind {
                    CellKind::Wall => Rgba::WALL,
                    CellKind::Escape => Rgba::ESCAPE,
                    CellKind::Floor | CellKind::Emitter => Rgba::FLOOR,
                });
                cells.push(cell);
            }
        }

        Self {
            width,
            height,
            cells,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat index of `(row, col)`, or `None` outside the board.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    /// Flat index of the neighbor of `(row, col)` in `dir`.
    #[inline]
    pub fn neighbor_index(&self, dir: Direction, row: usize, col: usize) -> Option<usize> {
        let (r, c) = dir.offset(row, col)?;
        self.index_of(r, c)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index_of(row, col).map(|idx| &self.cells[idx])
    }

    pub(crate) fn cell_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        let idx = self.index_of(row, col)?;
        Some(&mut self.cells[idx])
    }

    /// Neighbor of `(row, col)` in `dir`, or `None` past the board edge.
    pub fn neighbor(&self, dir: Direction, row: usize, col: usize) -> Option<&Cell> {
        self.neighbor_index(dir, row, col).map(|idx| &self.cells[idx])
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Render colors, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn color_at(&self, row: usize, col: usize) -> Option<Rgba> {
        self.index_of(row, col).map(|idx| self.pixels[idx])
    }

    /// Set the color of `(row, col)` from channel values. Out-of-range
    /// coordinates are ignored.
    pub fn write_pixel(&mut self, row: usize, col: usize, r: u8, g: u8, b: u8) {
        self.write_color(row, col, Rgba::from_rgb(r, g, b));
    }

    /// Set the color of `(row, col)` from a packed value. Out-of-range
    /// coordinates are ignored.
    pub fn write_color(&mut self, row: usize, col: usize, color: impl Into<Rgba>) {
        if let Some(idx) = self.index_of(row, col) {
            self.pixels[idx] = color.into();
        }
    }

    #[inline]
    pub(crate) fn set_pixel(&mut self, idx: usize, color: Rgba) {
        self.pixels[idx] = color;
    }

    /// Pixel buffer as `[r, g, b, a]` bytes, ready for texture upload.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }

    /// Terrain view: every cell painted with the height palette for its cost.
    /// The emitter keeps the height of the floor it was placed on.
    pub fn height_pixels(&self) -> Vec<Rgba> {
        self.cells.iter().map(|c| palette(c.cost)).collect()
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}
