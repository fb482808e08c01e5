//! Per-frame transform state handed to the renderer host.
//!
//! Everything the draw loop needs lives on [`SceneContext`]; the host owns
//! one value and passes it to its update and render calls.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use tracing::info;

use crate::config::SceneConfig;
use crate::types::{ColorSpace, Texture, TextureVariants};

/// Model spin about +Y, radians per second.
pub const ROTATION_SPEED: f32 = -12.0;

pub const LIGHT1_ROTATION_SPEED: f32 = 0.5;
pub const LIGHT1_ROTATION_RADIUS: f32 = 3.6;
pub const LIGHT1_HEIGHT: f32 = 2.1;

pub const LIGHT2_ROTATION_SPEED: f32 = -1.5;
pub const LIGHT2_ROTATION_RADIUS: f32 = 4.6;
pub const LIGHT2_HEIGHT: f32 = 0.1;

const CAMERA_EYE: Vec3 = Vec3::new(2.57, 0.25, -2.78);
const FOV_Y_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.2;
const Z_FAR: f32 = 120.0;

/// Gamma switches bound to the number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GammaToggle {
    Textures,
    Framebuffer,
    Both,
}

impl GammaToggle {
    /// `1` flips texture decoding, `2` the framebuffer, `3` both.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(GammaToggle::Textures),
            '2' => Some(GammaToggle::Framebuffer),
            '3' => Some(GammaToggle::Both),
            _ => None,
        }
    }
}

/// Where sRGB conversion happens. Both stages start uncorrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GammaState {
    /// Sample the sRGB texture variants.
    pub correct_textures: bool,
    /// Encode to sRGB on framebuffer write (`GL_FRAMEBUFFER_SRGB`).
    pub correct_framebuffer: bool,
}

impl GammaState {
    pub fn toggle_textures(&mut self) {
        self.correct_textures = !self.correct_textures;
    }

    pub fn toggle_framebuffer(&mut self) {
        self.correct_framebuffer = !self.correct_framebuffer;
    }

    pub fn toggle_both(&mut self) {
        self.toggle_textures();
        self.toggle_framebuffer();
    }

    pub fn apply(&mut self, toggle: GammaToggle) {
        match toggle {
            GammaToggle::Textures => self.toggle_textures(),
            GammaToggle::Framebuffer => self.toggle_framebuffer(),
            GammaToggle::Both => self.toggle_both(),
        }
        info!(
            framebuffer = self.correct_framebuffer,
            textures = self.correct_textures,
            "Gamma correction changed"
        );
    }

    pub fn texture_color_space(&self) -> ColorSpace {
        if self.correct_textures {
            ColorSpace::Srgb
        } else {
            ColorSpace::Linear
        }
    }

    pub fn framebuffer_srgb(&self) -> bool {
        self.correct_framebuffer
    }

    /// The variant to bind for the current texture setting.
    pub fn select<'a>(&self, variants: &'a TextureVariants) -> &'a Texture {
        variants.get(self.texture_color_space())
    }
}

/// Column-major matrices and light positions, laid out for uniform upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub model: [f32; 16],
    pub view: [f32; 16],
    pub model_view: [f32; 16],
    pub model_view_proj: [f32; 16],
    pub normal_matrix: [f32; 9],
    pub light_position: [f32; 3],
    pub light2_position: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct SceneContext {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
    pub model_view: Mat4,
    pub model_view_proj: Mat4,
    pub normal_matrix: Mat3,
    pub light_angle: f32,
    pub light2_angle: f32,
    pub light: Vec3,
    pub light2: Vec3,
    pub gamma: GammaState,
}

impl SceneContext {
    pub fn new(config: &SceneConfig) -> Self {
        let aspect = config.width as f32 / config.height.max(1) as f32;
        let view = Mat4::look_at_rh(CAMERA_EYE, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh_gl(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR);

        let mut scene = Self {
            model: Mat4::IDENTITY,
            view,
            proj,
            model_view: Mat4::IDENTITY,
            model_view_proj: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
            light_angle: 0.0,
            light2_angle: 0.0,
            light: Vec3::ZERO,
            light2: Vec3::ZERO,
            gamma: GammaState::default(),
        };
        scene.refresh_derived();
        scene.refresh_lights();
        scene
    }

    /// Advance the model spin and both lights by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.model *= Mat4::from_rotation_y(ROTATION_SPEED * dt);
        self.refresh_derived();

        self.light_angle -= LIGHT1_ROTATION_SPEED * dt;
        self.light2_angle -= LIGHT2_ROTATION_SPEED * dt;
        if self.light_angle < 0.0 {
            self.light_angle = TAU;
        }
        if self.light2_angle < 0.0 {
            self.light2_angle = TAU;
        }
        self.refresh_lights();
    }

    /// Apply the gamma toggle bound to `key`. Returns whether anything changed.
    pub fn handle_key(&mut self, key: char) -> bool {
        match GammaToggle::from_key(key) {
            Some(toggle) => {
                self.gamma.apply(toggle);
                true
            }
            None => false,
        }
    }

    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            model: self.model.to_cols_array(),
            view: self.view.to_cols_array(),
            model_view: self.model_view.to_cols_array(),
            model_view_proj: self.model_view_proj.to_cols_array(),
            normal_matrix: self.normal_matrix.to_cols_array(),
            light_position: self.light.to_array(),
            light2_position: self.light2.to_array(),
        }
    }

    fn refresh_derived(&mut self) {
        self.model_view = self.view * self.model;
        self.model_view_proj = self.proj * self.model_view;
        // Inverse-transpose of the upper 3x3 of model-view.
        self.normal_matrix = Mat3::from_mat4(self.model_view).inverse().transpose();
    }

    fn refresh_lights(&mut self) {
        self.light = orbit(self.light_angle, LIGHT1_ROTATION_RADIUS, LIGHT1_HEIGHT);
        self.light2 = orbit(self.light2_angle, LIGHT2_ROTATION_RADIUS, LIGHT2_HEIGHT);
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

fn orbit(angle: f32, radius: f32, height: f32) -> Vec3 {
    Vec3::new(-angle.sin() * radius, height, angle.cos() * radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn initial_state() {
        let scene = SceneContext::default();
        assert_eq!(scene.model, Mat4::IDENTITY);
        assert_eq!(scene.model_view, scene.view);
        assert_relative_eq!(scene.light.z, LIGHT1_ROTATION_RADIUS);
        assert_relative_eq!(scene.light.y, LIGHT1_HEIGHT);
        assert_relative_eq!(scene.light2.z, LIGHT2_ROTATION_RADIUS);
    }

    #[test]
    fn camera_looks_at_origin() {
        let scene = SceneContext::default();
        let origin_in_view = scene.view.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin_in_view.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin_in_view.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(-origin_in_view.z, CAMERA_EYE.length(), epsilon = 1e-5);
    }

    #[test]
    fn update_spins_model_about_y() {
        let mut scene = SceneContext::default();
        let dt = 0.01;
        scene.update(dt);

        let rotated = scene.model.transform_vector3(Vec3::X);
        let angle = ROTATION_SPEED * dt;
        assert_relative_eq!(rotated.x, angle.cos(), epsilon = 1e-6);
        assert_relative_eq!(rotated.z, -angle.sin(), epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn light_one_wraps_when_negative() {
        let mut scene = SceneContext::default();
        scene.update(0.1);
        // Light 1 went below zero on the first step.
        assert_relative_eq!(scene.light_angle, TAU);
        // Light 2 runs the other way.
        assert_relative_eq!(scene.light2_angle, 0.15, epsilon = 1e-6);
        let expected_x = -(0.15f32).sin() * LIGHT2_ROTATION_RADIUS;
        assert_relative_eq!(scene.light2.x, expected_x, epsilon = 1e-5);
    }

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let mut scene = SceneContext::default();
        scene.update(0.3);
        let product = scene.normal_matrix.transpose() * Mat3::from_mat4(scene.model_view);
        let identity = Mat3::IDENTITY.to_cols_array();
        for (a, b) in product.to_cols_array().iter().zip(identity) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn uniforms_are_column_major() {
        let scene = SceneContext::default();
        let u = scene.uniforms();
        assert_eq!(u.model_view_proj, scene.model_view_proj.to_cols_array());
        assert_eq!(std::mem::size_of::<FrameUniforms>(), (16 * 4 + 9 + 6) * 4);
        let bytes: &[u8] = bytemuck::bytes_of(&u);
        assert_eq!(bytes.len(), std::mem::size_of::<FrameUniforms>());
    }

    fn variants() -> TextureVariants {
        TextureVariants::new(Texture {
            width: 1,
            height: 1,
            pixels: vec![128, 128, 128],
            color_space: ColorSpace::Linear,
        })
    }

    #[test]
    fn gamma_starts_uncorrected() {
        let scene = SceneContext::default();
        assert_eq!(scene.gamma, GammaState::default());
        assert!(!scene.gamma.framebuffer_srgb());
        assert_eq!(scene.gamma.texture_color_space(), ColorSpace::Linear);
        let tex = variants();
        assert_eq!(scene.gamma.select(&tex).color_space, ColorSpace::Linear);
    }

    #[test]
    fn gamma_key_one_flips_textures_only() {
        let mut scene = SceneContext::default();
        assert!(scene.handle_key('1'));
        assert!(scene.gamma.correct_textures);
        assert!(!scene.gamma.correct_framebuffer);
        let tex = variants();
        assert_eq!(scene.gamma.select(&tex).color_space, ColorSpace::Srgb);

        assert!(scene.handle_key('1'));
        assert_eq!(scene.gamma, GammaState::default());
    }

    #[test]
    fn gamma_key_two_flips_framebuffer_only() {
        let mut scene = SceneContext::default();
        assert!(scene.handle_key('2'));
        assert!(scene.gamma.framebuffer_srgb());
        assert_eq!(scene.gamma.texture_color_space(), ColorSpace::Linear);
    }

    #[test]
    fn gamma_key_three_flips_both() {
        let mut gamma = GammaState::default();
        gamma.apply(GammaToggle::Both);
        assert!(gamma.correct_textures && gamma.correct_framebuffer);

        // Mixed state: each flag still flips independently.
        gamma.toggle_textures();
        gamma.apply(GammaToggle::Both);
        assert!(gamma.correct_textures);
        assert!(!gamma.correct_framebuffer);
    }

    #[test]
    fn unbound_keys_leave_gamma_alone() {
        let mut scene = SceneContext::default();
        assert!(!scene.handle_key('4'));
        assert!(!scene.handle_key('q'));
        assert_eq!(scene.gamma, GammaState::default());
        assert_eq!(GammaToggle::from_key('3'), Some(GammaToggle::Both));
    }

    #[test]
    fn aspect_ratio_follows_viewport() {
        let wide = SceneContext::new(&SceneConfig {
            width: 1600,
            height: 400,
        });
        let square = SceneContext::new(&SceneConfig {
            width: 500,
            height: 500,
        });
        // x scale = f / aspect, y scale = f
        assert_relative_eq!(wide.proj.x_axis.x * 4.0, wide.proj.y_axis.y, epsilon = 1e-5);
        assert_relative_eq!(square.proj.x_axis.x, square.proj.y_axis.y, epsilon = 1e-5);
    }
}
