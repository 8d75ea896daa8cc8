//! Procedural UV-sphere generation.
//!
//! The sphere is built from `rings + 1` latitude bands of `segments` vertices each.
//! Latitude `φ` is interpolated linearly between the bounds of the vertical cap
//! `[z_min, z_max]`, longitude `θ` sweeps a full turn across the segments:
//!
//! ```text
//! vertex = (r·cosθ·cosφ, r·sinθ·cosφ, r·sinφ, 1)
//! ```
//!
//! No seam column is duplicated. Triangles are stitched in one pass over the
//! vertex sequence: a fan anchored at vertex 0 closes the first band, then every
//! following vertex `i` contributes the pair `(i, i+s-1, i+s)` and
//! `(i, i+s-1, i-1)` where `s` is the segment count. Because the bands are laid out
//! back to back the stitch spirals around the sphere instead of restarting per band.
//! With a full sphere every vertex of the first and last band sits on a pole, which
//! makes the fan and the final ring degenerate but keeps the surface closed.
//!
//! ```
//! use orrery::SphereParams;
//!
//! let sphere = SphereParams::new().segments(16).rings(12).build();
//! assert_eq!(sphere.vertices.len(), 13 * 16);
//! ```

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::geometry::RawGeometry;
use crate::mesh::Vertex;

/// Shape and tessellation of a sphere (or of a horizontal slice of one).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    /// Lower cap plane. At or below `-radius` the sphere reaches the south pole.
    pub z_min: f32,
    /// Upper cap plane. At or above `radius` the sphere reaches the north pole.
    pub z_max: f32,
    /// Number of latitude steps; `rings + 1` bands of vertices are emitted.
    pub rings: u32,
    /// Number of vertices per latitude band.
    pub segments: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            z_min: -1.0,
            z_max: 1.0,
            rings: 12,
            segments: 16,
        }
    }
}

impl SphereParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Restricts the sphere to the slab `z_min..=z_max`.
    pub fn cap(mut self, z_min: f32, z_max: f32) -> Self {
        self.z_min = z_min;
        self.z_max = z_max;
        self
    }

    /// Sets the number of latitude steps (at least 1).
    pub fn rings(mut self, rings: u32) -> Self {
        self.rings = rings.max(1);
        self
    }

    /// Sets the number of vertices per band (at least 1).
    pub fn segments(mut self, segments: u32) -> Self {
        self.segments = segments.max(1);
        self
    }

    /// Latitude bounds `(φ_min, φ_max)` in radians.
    ///
    /// A cap plane that cuts the sphere maps to `asin(z / r)`; one that misses it
    /// clamps to the pole at `±90°`.
    pub fn latitude_range(&self) -> (f32, f32) {
        let phi_min = if self.z_min > -self.radius {
            (self.z_min / self.radius).clamp(-1.0, 1.0).asin()
        } else {
            -FRAC_PI_2
        };

        let phi_max = if self.z_max < self.radius {
            (self.z_max / self.radius).clamp(-1.0, 1.0).asin()
        } else {
            FRAC_PI_2
        };

        (phi_min, phi_max)
    }

    pub fn vertex_count(&self) -> usize {
        (self.rings as usize + 1) * self.segments as usize
    }

    /// Vertex positions, band by band from `φ_min` to `φ_max`.
    pub fn vertices(&self) -> Vec<Vertex> {
        let (phi_min, phi_max) = self.latitude_range();
        let mut vertices = Vec::with_capacity(self.vertex_count());

        for band in 0..=self.rings {
            let v = band as f32 / self.rings as f32;
            let phi = phi_min + v * (phi_max - phi_min);
            let (sin_phi, cos_phi) = phi.sin_cos();

            for seg in 0..self.segments {
                let theta = seg as f32 / self.segments as f32 * TAU;
                let (sin_theta, cos_theta) = theta.sin_cos();

                vertices.push(Vertex::new(
                    self.radius * cos_theta * cos_phi,
                    self.radius * sin_theta * cos_phi,
                    self.radius * sin_phi,
                ));
            }
        }

        vertices
    }

    /// Triangle indices for [`vertices`](Self::vertices).
    ///
    /// Tessellations too coarse for the fan (`rings * segments < 2`) would reference
    /// vertices past the end; those triangles are dropped.
    pub fn indices(&self) -> Vec<u32> {
        let s = self.segments;
        let band_vertices = self.rings * s;
        let vertex_count = self.vertex_count() as u32;

        let mut indices = Vec::with_capacity(3 * (s as usize + 2 * band_vertices as usize));
        let mut push = |a: u32, b: u32, c: u32| {
            if a.max(b).max(c) < vertex_count {
                indices.extend_from_slice(&[a, b, c]);
            }
        };

        // Fan from vertex 0 over the first band.
        for j in 1..=s {
            push(0, j, j + 1);
        }

        // Two triangles per vertex for everything after it, trailing one band behind
        // the read cursor `j`.
        let mut j = s;
        for i in 2..band_vertices {
            j += 1;
            push(i, j, j + 1);
            push(i, j, i - 1);
        }

        indices
    }

    /// Generates the indexed mesh.
    pub fn build(&self) -> RawGeometry {
        RawGeometry::indexed(self.vertices(), self.indices())
    }
}
