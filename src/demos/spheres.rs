//! Zadanie 3: three nested spheres orbiting one another.
//!
//! A large yellow sphere spins in place, a small blue one orbits it, and a tiny
//! white one orbits the blue one in the opposite direction. The whole system is
//! tilted by a pitch about the X axis that W/S change in 15° steps.
//!
//! | Key                 | Action (on press and repeat)        |
//! |---------------------|-------------------------------------|
//! | ESC                 | close                               |
//! | W / S               | pitch +15° / -15°                   |
//! | `=` / numpad `+`    | zoom in (narrower field of view)    |
//! | `-` / numpad `-`    | zoom out, capped below 180°         |
//! | F1                  | toggle wireframe                    |

use glam::Mat4;
use winit::keyboard::KeyCode;

use crate::app::{AppConfig, Frame, SetupContext, run_with_config};
use crate::camera::Camera;
use crate::color::Color;
use crate::error::InitError;
use crate::input::Input;
use crate::sphere::SphereParams;
use crate::transform::{Body, BodyChain, ChainLink, wrap_degrees};

pub const TITLE: &str = "Zadanie 3";
pub const SHADER_SET: &str = "spheres";

pub const PITCH_STEP_DEGREES: f32 = 15.0;
pub const INITIAL_PITCH_DEGREES: f32 = 90.0;
pub const INITIAL_FOVY_DEGREES: f32 = 25.0;

pub const BODIES: [Body; 3] = [
    Body::new(0.3, 0.0, 0.0, Color::YELLOW),
    Body::new(0.1, 1.5, 0.3, Color::BLUE),
    Body::new(0.01, 0.2, -5.0, Color::WHITE),
];

/// Default window configuration for this demo. Line polygon mode is required.
pub fn config() -> AppConfig {
    AppConfig::new()
        .title(TITLE)
        .shader_set(SHADER_SET)
        .require_features(wgpu::Features::POLYGON_MODE_LINE)
}

/// What a frame's input asked the scene to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub close: bool,
    /// The projection changed and must be re-uploaded.
    pub projection_changed: bool,
}

/// Camera, pitch and body chain of the orbit demo.
#[derive(Clone, Debug)]
pub struct SpheresScene {
    camera: Camera,
    pitch: f32,
    wireframe: bool,
    chain: BodyChain,
}

impl SpheresScene {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Camera::new()
            .at(0.0, 0.0, 8.0)
            .looking_at(0.0, 0.0, -1.0)
            .with_fov(INITIAL_FOVY_DEGREES)
            .with_clip(0.1, 100.0);
        camera.set_viewport(width, height);

        Self {
            camera,
            pitch: INITIAL_PITCH_DEGREES,
            wireframe: true,
            chain: BodyChain::new(BODIES.to_vec()),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Pitch about +X in degrees, always in `[0, 360)`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn chain(&self) -> &BodyChain {
        &self.chain
    }

    pub fn handle_input(&mut self, input: &Input) -> InputOutcome {
        let mut outcome = InputOutcome::default();

        if input.key_triggered(KeyCode::Escape) {
            outcome.close = true;
            return outcome;
        }
        if input.key_triggered(KeyCode::KeyW) {
            self.pitch = wrap_degrees(self.pitch + PITCH_STEP_DEGREES);
        }
        if input.key_triggered(KeyCode::KeyS) {
            self.pitch = wrap_degrees(self.pitch - PITCH_STEP_DEGREES);
        }
        if input.key_triggered(KeyCode::Equal) || input.key_triggered(KeyCode::NumpadAdd) {
            outcome.projection_changed |= self.camera.zoom_in();
        }
        if input.key_triggered(KeyCode::Minus) || input.key_triggered(KeyCode::NumpadSubtract) {
            outcome.projection_changed |= self.camera.zoom_out();
        }
        if input.key_triggered(KeyCode::F1) {
            self.wireframe = !self.wireframe;
            log::debug!("wireframe {}", if self.wireframe { "on" } else { "off" });
        }

        outcome
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn projection(&self) -> Mat4 {
        self.camera.projection_matrix()
    }

    /// Camera view tilted by the current pitch; the first body starts here.
    pub fn root(&self) -> Mat4 {
        self.camera.view_matrix() * Mat4::from_rotation_x(self.pitch.to_radians())
    }

    /// This frame's body matrices; advances every body's angle.
    pub fn advance(&mut self) -> Vec<ChainLink> {
        let root = self.root();
        self.chain.update(root)
    }
}

pub fn run(config: AppConfig) -> Result<(), InitError> {
    run_with_config(config, |ctx: &mut SetupContext| {
        let params = SphereParams::default();
        let sphere = ctx.add_mesh(&params.build())?;
        let mut scene = SpheresScene::new(ctx.width(), ctx.height());
        let mut first_frame = true;

        Ok(move |frame: &mut Frame| {
            let outcome = scene.handle_input(frame.input);
            if outcome.close {
                frame.close();
                return;
            }
            if let Some((width, height)) = frame.resized {
                scene.on_resize(width, height);
            }
            if first_frame || outcome.projection_changed || frame.resized.is_some() {
                frame.set_projection(scene.projection());
                first_frame = false;
            }
            frame.set_wireframe(scene.wireframe());

            for link in scene.advance() {
                frame.draw(sphere, link.model_view, link.color);
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn press(input: &mut Input, key: KeyCode) {
        input.begin_frame();
        input.handle_key(key, ElementState::Pressed, false);
        input.handle_key(key, ElementState::Released, false);
    }

    #[test]
    fn starts_pitched_with_wireframe() {
        let scene = SpheresScene::new(600, 600);
        assert_eq!(scene.pitch(), 90.0);
        assert!(scene.wireframe());
        assert_eq!(scene.camera().fovy, 25.0);
        assert_eq!(scene.camera().aspect, 1.0);
    }

    #[test]
    fn pitch_steps_wrap_around() {
        let mut scene = SpheresScene::new(600, 600);
        let mut input = Input::new();

        for _ in 0..6 {
            press(&mut input, KeyCode::KeyW);
            scene.handle_input(&input);
        }
        assert_eq!(scene.pitch(), 180.0);

        for _ in 0..13 {
            press(&mut input, KeyCode::KeyS);
            scene.handle_input(&input);
        }
        assert_eq!(scene.pitch(), 345.0);
    }

    #[test]
    fn repeat_keeps_stepping() {
        let mut scene = SpheresScene::new(600, 600);
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, false);
        scene.handle_input(&input);
        input.begin_frame();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, true);
        scene.handle_input(&input);
        assert_eq!(scene.pitch(), 120.0);
    }

    #[test]
    fn zoom_keys_change_projection() {
        let mut scene = SpheresScene::new(600, 600);
        let mut input = Input::new();

        press(&mut input, KeyCode::Equal);
        let outcome = scene.handle_input(&input);
        assert!(outcome.projection_changed);
        assert!(scene.camera().fovy < 25.0);

        press(&mut input, KeyCode::NumpadSubtract);
        scene.handle_input(&input);
        assert!((scene.camera().fovy - 25.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_out_stops_below_180() {
        let mut scene = SpheresScene::new(600, 600);
        let mut input = Input::new();
        for _ in 0..100 {
            press(&mut input, KeyCode::Minus);
            scene.handle_input(&input);
        }
        assert!(scene.camera().fovy < 180.0);

        press(&mut input, KeyCode::Minus);
        assert!(!scene.handle_input(&input).projection_changed);
    }

    #[test]
    fn f1_toggles_wireframe() {
        let mut scene = SpheresScene::new(600, 600);
        let mut input = Input::new();
        press(&mut input, KeyCode::F1);
        scene.handle_input(&input);
        assert!(!scene.wireframe());
        press(&mut input, KeyCode::F1);
        scene.handle_input(&input);
        assert!(scene.wireframe());
    }

    #[test]
    fn escape_closes_even_on_repeat() {
        let mut scene = SpheresScene::new(600, 600);
        let mut input = Input::new();
        input.handle_key(KeyCode::Escape, ElementState::Pressed, true);
        assert!(scene.handle_input(&input).close);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut scene = SpheresScene::new(600, 600);
        scene.on_resize(1200, 600);
        assert_eq!(scene.camera().aspect, 2.0);
        scene.on_resize(1200, 0);
        assert_eq!(scene.camera().aspect, 1200.0);
    }

    #[test]
    fn first_body_sits_at_the_pitched_root() {
        let mut scene = SpheresScene::new(600, 600);
        let root = scene.root();
        let links = scene.advance();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].pre_scale, root);
        assert_eq!(links[0].color, Color::YELLOW);
        assert_eq!(scene.chain().angles(), [0.0_f32, 0.3, 355.0]);
    }
}
