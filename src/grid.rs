//! Grid instancing for the triangles-and-squares demo.
//!
//! A `rows × cols` grid of squares is laid out from the top-left cell, stepping
//! right and down by a fixed distance. Every cell also gets four triangles, one on
//! each side of its square, each rotated a further quarter turn clockwise.
//!
//! All matrices are rebuilt from loop counters; nothing persists between frames.

use glam::{Mat4, Vec2, Vec3};

/// Placement parameters for the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
    /// The top-left cell sits at `(-origin, origin)`.
    pub origin: f32,
    /// Distance between neighbouring cell centers.
    pub step: f32,
    /// Scale applied to both primitives in X and Y; Z is flattened to 0.
    pub scale: f32,
    /// Triangle offset from the cell center along its rotated local Y axis.
    pub triangle_offset: f32,
    pub triangles_per_cell: u32,
    /// Degrees subtracted from every rotation. Zero leaves squares axis-aligned.
    pub rotation_offset: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            origin: 0.8,
            step: 0.4,
            scale: 0.2,
            triangle_offset: -0.15,
            triangles_per_cell: 4,
            rotation_offset: 0.0,
        }
    }
}

impl GridLayout {
    pub fn cell_center(&self, row: u32, col: u32) -> Vec2 {
        Vec2::new(
            -self.origin + col as f32 * self.step,
            self.origin - row as f32 * self.step,
        )
    }

    fn cells(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| self.cell_center(row, col)))
    }

    fn flatten(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.scale, self.scale, 0.0))
    }

    /// One matrix per square, row-major from the top-left cell.
    pub fn square_transforms(&self) -> Vec<Mat4> {
        self.cells()
            .map(|center| {
                Mat4::from_translation(center.extend(0.0))
                    * Mat4::from_rotation_z((-self.rotation_offset).to_radians())
                    * self.flatten()
            })
            .collect()
    }

    /// `triangles_per_cell` matrices per cell, row-major from the top-left cell.
    ///
    /// The first triangle of a cell is turned `90° - rotation_offset`, every next
    /// one a further 90° clockwise.
    pub fn triangle_transforms(&self) -> Vec<Mat4> {
        let start = 90.0 - self.rotation_offset;
        self.cells()
            .flat_map(|center| {
                (0..self.triangles_per_cell).map(move |k| {
                    let rotation = start - 90.0 * k as f32;
                    Mat4::from_translation(center.extend(0.0))
                        * Mat4::from_rotation_z(rotation.to_radians())
                        * Mat4::from_translation(Vec3::new(0.0, self.triangle_offset, 0.0))
                        * self.flatten()
                })
            })
            .collect()
    }
}
