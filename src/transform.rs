//! Chained body transforms for the orbiting-spheres demo.
//!
//! Each body is placed relative to the body before it: the first body starts from
//! the camera matrix, every later body starts from its predecessor's transform
//! *before* scaling. Per body and per frame the chain applies
//!
//! 1. rotation about local Z by the body's current angle,
//! 2. translation along local X by the body's offset,
//! 3. advance of the angle by the body's rate, wrapped into `[0, 360)`,
//! 4. hand-off of the matrix to the next body,
//! 5. uniform scale for the body's own draw.
//!
//! Scaling last keeps a parent's size out of its children's placement.
//!
//! ```
//! use orrery::{Body, BodyChain, Color};
//! use glam::Mat4;
//!
//! let mut chain = BodyChain::new(vec![
//!     Body::new(0.3, 0.0, 0.0, Color::YELLOW),
//!     Body::new(0.1, 1.5, 0.3, Color::BLUE),
//! ]);
//! let links = chain.update(Mat4::IDENTITY);
//! assert_eq!(links.len(), 2);
//! ```

use glam::{Mat4, Vec3};

use crate::color::Color;

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Static description of one body in the chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Uniform scale applied to this body's mesh only.
    pub scale: f32,
    /// Distance from the previous body along the rotated local X axis.
    pub offset: f32,
    /// Degrees added to the body's angle every update.
    pub rate: f32,
    pub color: Color,
}

impl Body {
    pub const fn new(scale: f32, offset: f32, rate: f32, color: Color) -> Self {
        Self {
            scale,
            offset,
            rate,
            color,
        }
    }
}

/// Matrices produced for one body by [`BodyChain::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainLink {
    /// Placement handed to the next body; never contains this body's scale.
    pub pre_scale: Mat4,
    /// Matrix to draw this body with.
    pub model_view: Mat4,
    pub color: Color,
}

/// An ordered list of bodies with their accumulated rotation angles.
#[derive(Clone, Debug)]
pub struct BodyChain {
    bodies: Vec<Body>,
    angles: Vec<f32>,
}

impl BodyChain {
    pub fn new(bodies: Vec<Body>) -> Self {
        let angles = vec![0.0; bodies.len()];
        Self { bodies, angles }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Current rotation angles in degrees, one per body.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Computes this frame's matrices starting from `root` and advances every angle.
    ///
    /// The angle used for a body's rotation is the one it had on entry; the advanced
    /// angle takes effect on the next call.
    pub fn update(&mut self, root: Mat4) -> Vec<ChainLink> {
        let mut links = Vec::with_capacity(self.bodies.len());
        let mut parent = root;

        for (body, angle) in self.bodies.iter().zip(self.angles.iter_mut()) {
            let placed = parent
                * Mat4::from_rotation_z(angle.to_radians())
                * Mat4::from_translation(Vec3::new(body.offset, 0.0, 0.0));

            *angle = wrap_degrees(*angle + body.rate);
            parent = placed;

            links.push(ChainLink {
                pre_scale: placed,
                model_view: placed * Mat4::from_scale(Vec3::splat(body.scale)),
                color: body.color,
            });
        }

        links
    }
}
