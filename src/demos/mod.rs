//! The two runnable demos.
//!
//! Each demo keeps its per-frame logic in a plain scene struct so the key handling
//! and transform updates can be tested without a window. `run` wires the scene
//! into [`run_with_config`](crate::run_with_config).

pub mod grid;
pub mod spheres;
