//! Zadanie 2: a 5×5 grid of squares, each ringed by four triangles.
//!
//! The scene is static. Only ESC does anything: a fresh press closes the window,
//! auto-repeat is ignored.

use glam::Mat4;
use winit::keyboard::KeyCode;

use crate::app::{AppConfig, Frame, SetupContext, run_with_config};
use crate::color::Color;
use crate::error::InitError;
use crate::geometry::RawGeometry;
use crate::grid::GridLayout;
use crate::input::Input;
use crate::mesh::MeshId;

pub const TITLE: &str = "Zadanie 2";
pub const SHADER_SET: &str = "grid";

pub const TRIANGLE_COLOR: Color = Color::RED;
pub const SQUARE_COLOR: Color = Color::GREEN;

/// Default window configuration for this demo.
pub fn config() -> AppConfig {
    AppConfig::new().title(TITLE).shader_set(SHADER_SET)
}

/// Precomputed instance matrices for the grid.
pub struct GridScene {
    triangles: Vec<Mat4>,
    squares: Vec<Mat4>,
}

impl GridScene {
    pub fn new(layout: &GridLayout) -> Self {
        Self {
            triangles: layout.triangle_transforms(),
            squares: layout.square_transforms(),
        }
    }

    pub fn triangles(&self) -> &[Mat4] {
        &self.triangles
    }

    pub fn squares(&self) -> &[Mat4] {
        &self.squares
    }

    /// Returns `true` when the window should close.
    pub fn handle_input(&self, input: &Input) -> bool {
        input.key_pressed(KeyCode::Escape)
    }

    /// Queues all triangles first, then all squares.
    pub fn draw(&self, frame: &mut Frame, triangle: MeshId, square: MeshId) {
        for &model_view in &self.triangles {
            frame.draw(triangle, model_view, TRIANGLE_COLOR);
        }
        for &model_view in &self.squares {
            frame.draw(square, model_view, SQUARE_COLOR);
        }
    }
}

pub fn run(config: AppConfig) -> Result<(), InitError> {
    run_with_config(config, |ctx: &mut SetupContext| {
        let triangle = ctx.add_mesh(&RawGeometry::triangle())?;
        let square = ctx.add_mesh(&RawGeometry::square())?;
        let scene = GridScene::new(&GridLayout::default());

        log::info!(
            "grid: {} triangles, {} squares",
            scene.triangles().len(),
            scene.squares().len()
        );

        Ok(move |frame: &mut Frame| {
            if scene.handle_input(frame.input) {
                frame.close();
                return;
            }
            scene.draw(frame, triangle, square);
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn default_grid_has_one_hundred_triangles() {
        let scene = GridScene::new(&GridLayout::default());
        assert_eq!(scene.triangles().len(), 100);
        assert_eq!(scene.squares().len(), 25);
    }

    #[test]
    fn escape_closes_only_on_fresh_press() {
        let scene = GridScene::new(&GridLayout::default());
        let mut input = Input::new();
        assert!(!scene.handle_input(&input));

        input.handle_key(KeyCode::Escape, ElementState::Pressed, false);
        assert!(scene.handle_input(&input));

        input.begin_frame();
        input.handle_key(KeyCode::Escape, ElementState::Pressed, true);
        assert!(!scene.handle_input(&input));
    }

    #[test]
    fn config_points_at_grid_shaders() {
        let config = config();
        assert_eq!(config.title, TITLE);
        assert!(config.shader_paths().vertex.ends_with("grid/vertex.wgsl"));
        assert!(config.required_features.is_empty());
    }
}
