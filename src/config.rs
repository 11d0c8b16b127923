//! Settings shared by the loader, the collider builder and the debug renderer.
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! loader:
//!   hitbox_class: Hitbox
//! physics:
//!   pixels_per_unit: 32.0
//!   ellipse_mode: capsule
//! ```

use std::path::Path;
use anyhow::Context;
use derive_more::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderConfig,
    pub physics: PhysicsConfig,
    pub debug_draw: DebugDrawConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml_str(&source)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.physics.validate()
            .with_context(|| format!("Invalid physics settings in {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory tileset paths are resolved against. Working directory when unset.
    pub asset_root: Option<String>,
    /// Object class marking a hitbox. `None` turns every object with an area into one.
    pub hitbox_class: Option<String>,
    /// Check that referenced images exist and match their declared size.
    pub verify_images: bool,
    /// Pixels a hitbox may stick out of its tile before validation complains.
    pub bounds_tolerance: f32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_root: None,
            hitbox_class: Some(String::from("Hitbox")),
            verify_images: false,
            bounds_tolerance: 1.0,
        }
    }
}

impl LoaderConfig {
    /// True if an object of this class is turned into a hitbox.
    pub fn is_hitbox_class(&self, class: &str) -> bool {
        match &self.hitbox_class {
            Some(hitbox_class) => hitbox_class == class,
            None => true,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EllipseMode {
    /// Sampled outline, split into convex polygons.
    #[default]
    Polygon,
    /// Capsule along the major axis, as wide as the minor axis.
    Capsule,
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcaveMode {
    /// Convex pieces under the vertex cap.
    #[default]
    Decompose,
    /// A single closed chain around the outline.
    Chain,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Tile pixels per output length unit.
    pub pixels_per_unit: f32,
    /// Emit y-up coordinates.
    pub flip_y: bool,
    /// Put the origin at the tile center instead of its corner.
    pub center_origin: bool,
    /// Upper bound on convex polygon vertices. Box2D allows 8.
    pub max_polygon_vertices: usize,
    /// Points used when an ellipse becomes a polygon or an outline.
    pub ellipse_segments: usize,
    /// Relative axis difference under which an ellipse is treated as a circle.
    pub circle_tolerance: f32,
    /// Pixels under which polygon vertices are merged or dropped as collinear.
    pub weld_tolerance: f32,
    pub ellipse_mode: EllipseMode,
    pub concave_mode: ConcaveMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 1.0,
            flip_y: true,
            center_origin: false,
            max_polygon_vertices: 8,
            ellipse_segments: 16,
            circle_tolerance: 0.05,
            weld_tolerance: 0.5,
            ellipse_mode: EllipseMode::Polygon,
            concave_mode: ConcaveMode::Decompose,
        }
    }
}

impl PhysicsConfig {
    /// Tile-pixel space, unchanged. What debug drawing over tile images expects.
    pub fn pixel_space() -> Self {
        Self {
            flip_y: false,
            ..Self::default()
        }
    }

    /// Rejects values that would produce non-finite, mirrored or oversized colliders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0) {
            return Err(ConfigError::PixelsPerUnit { value: self.pixels_per_unit });
        }
        if self.max_polygon_vertices < 3 {
            return Err(ConfigError::VertexCap { value: self.max_polygon_vertices });
        }
        if self.ellipse_segments < 3 {
            return Err(ConfigError::EllipseSegments { value: self.ellipse_segments });
        }
        if !(self.circle_tolerance >= 0.0 && self.weld_tolerance >= 0.0) {
            return Err(ConfigError::NegativeTolerance);
        }
        Ok(())
    }
}

#[derive(Error, Display, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[display(fmt="pixels_per_unit must be a positive number, got {value}")]
    PixelsPerUnit { value: f32 },
    #[display(fmt="max_polygon_vertices must be at least 3, got {value}")]
    VertexCap { value: usize },
    #[display(fmt="ellipse_segments must be at least 3, got {value}")]
    EllipseSegments { value: usize },
    #[display(fmt="circle_tolerance and weld_tolerance must not be negative")]
    NegativeTolerance,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawConfig {
    /// Output pixels per tile pixel.
    pub scale: f32,
    /// Tiles per row in the rendered sheet.
    pub columns: u32,
    pub padding: f32,
    pub draw_hitboxes: bool,
    pub draw_colliders: bool,
    pub draw_aabbs: bool,
    pub draw_labels: bool,
    pub hitbox_color: u32,
    pub collider_color: u32,
    pub aabb_color: u32,
    pub tile_color: u32,
    pub label_color: u32,
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            columns: 8,
            padding: 8.0,
            draw_hitboxes: true,
            draw_colliders: true,
            draw_aabbs: false,
            draw_labels: true,
            hitbox_color: 0xFF00FF,
            collider_color: 0x00FF7F,
            aabb_color: 0xFFD700,
            tile_color: 0x808080,
            label_color: 0xFFFFFF,
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;
    use super::{Config, ConcaveMode, ConfigError, EllipseMode, PhysicsConfig};

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tsx_hitbox_{name}_{}.yaml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
physics:
  pixels_per_unit: 32.0
  ellipse_mode: capsule
loader:
  hitbox_class: ~
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(32.0, config.physics.pixels_per_unit);
        assert_eq!(EllipseMode::Capsule, config.physics.ellipse_mode);
        assert_eq!(ConcaveMode::Decompose, config.physics.concave_mode);
        assert!(config.physics.flip_y);
        assert_eq!(8, config.physics.max_polygon_vertices);
        assert_eq!(None, config.loader.hitbox_class);
        assert!(config.loader.is_hitbox_class("Anything"));
        assert_eq!(2.0, config.debug_draw.scale);
    }

    #[test]
    fn default_matches_hitbox_class() {
        let config = Config::default();
        assert!(config.loader.is_hitbox_class("Hitbox"));
        assert!(!config.loader.is_hitbox_class(""));
    }

    #[test]
    fn yaml_round_trip() {
        let config = Config::default();
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(config, Config::from_yaml_str(&yaml).unwrap());
    }

    #[test]
    fn empty_document() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(Config::default(), config);
    }

    #[test]
    fn load_from_file() {
        let path = scratch_file("load", "physics:\n  pixels_per_unit: 16.0\ndebug_draw:\n  columns: 4\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(16.0, config.physics.pixels_per_unit);
        assert_eq!(4, config.debug_draw.columns);
        assert_eq!(Some(String::from("Hitbox")), config.loader.hitbox_class);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_errors_name_the_file() {
        let missing = std::env::temp_dir().join("tsx_hitbox_no_such_config.yaml");
        let err = Config::load(&missing).unwrap_err();
        assert!(format!("{err:#}").starts_with("Failed to read config"), "{err:#}");
        assert!(err.to_string().contains("tsx_hitbox_no_such_config.yaml"));

        let path = scratch_file("invalid", "physics: 12\n");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config"), "{err:#}");
        assert!(err.downcast_ref::<serde_yaml::Error>().is_some());
        std::fs::remove_file(path).unwrap();

        let path = scratch_file("zero_ppu", "physics:\n  pixels_per_unit: 0.0\n");
        let err = Config::load(&path).unwrap_err();
        assert_eq!(Some(&ConfigError::PixelsPerUnit { value: 0.0 }), err.downcast_ref());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn physics_limits() {
        assert_eq!(Ok(()), PhysicsConfig::default().validate());
        let negative = PhysicsConfig { pixels_per_unit: -32.0, ..PhysicsConfig::default() };
        assert_eq!(Err(ConfigError::PixelsPerUnit { value: -32.0 }), negative.validate());
        let nan = PhysicsConfig { pixels_per_unit: f32::NAN, ..PhysicsConfig::default() };
        assert!(nan.validate().is_err());
        let small_cap = PhysicsConfig { max_polygon_vertices: 2, ..PhysicsConfig::default() };
        assert_eq!(Err(ConfigError::VertexCap { value: 2 }), small_cap.validate());
        let segments = PhysicsConfig { ellipse_segments: 0, ..PhysicsConfig::default() };
        assert_eq!(Err(ConfigError::EllipseSegments { value: 0 }), segments.validate());
        let weld = PhysicsConfig { weld_tolerance: -1.0, ..PhysicsConfig::default() };
        assert_eq!(Err(ConfigError::NegativeTolerance), weld.validate());
    }
}
