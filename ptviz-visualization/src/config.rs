//! Viewer and renderer configuration

use serde::{Deserialize, Serialize};

/// Settings for a plotting session and its window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Point size in pixels for newly added point actors
    pub point_size: f32,
    /// Scale factor used by hedgehog plots when the caller has no preference
    pub hedgehog_scale: f32,
    /// One-letter color used by plain point plots when the caller has no preference
    pub default_color: char,
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
    pub enable_alpha_blending: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "ptviz".to_string(),
            width: 1200,
            height: 800,
            point_size: 2.0,
            hedgehog_scale: 5.0,
            default_color: 'g',
            background_color: [0.1, 0.1, 0.1, 1.0],
            enable_depth_test: true,
            enable_alpha_blending: true,
        }
    }
}

impl ViewerConfig {
    /// The subset of settings the GPU renderer needs
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            background_color: self.background_color,
            enable_depth_test: self.enable_depth_test,
            enable_alpha_blending: self.enable_alpha_blending,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
    pub enable_alpha_blending: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        ViewerConfig::default().render_config()
    }
}
