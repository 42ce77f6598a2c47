//! TOML scene files.
//!
//! ```toml
//! [camera]
//! eye = [0.5, -1.2, 1.4]
//! look_at = [0.5, 0.5, 0.0]
//! fov = 40
//!
//! [heightfield]
//! scale = [2.0, 2.0, 0.5]
//! nu = 3
//! nv = 3
//! Pz = [0, 0, 0, 0, 1, 0, 0, 0, 0]
//! smooth = true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use relief_math::{Point3, Transform, Vec3};
use relief_shapes::{Heightfield, ParamSet};
use serde::Deserialize;

/// A single height field viewed by a pinhole camera.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    /// Viewpoint.
    #[serde(default)]
    pub camera: CameraConfig,
    /// The surface.
    pub heightfield: HeightfieldConfig,
}

/// Pinhole camera placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position.
    pub eye: [f64; 3],
    /// Point the camera looks at.
    pub look_at: [f64; 3],
    /// Approximate up direction.
    pub up: [f64; 3],
    /// Vertical field of view in degrees.
    pub fov: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.5, -1.0, 1.5],
            look_at: [0.5, 0.5, 0.0],
            up: [0.0, 0.0, 1.0],
            fov: 45.0,
        }
    }
}

/// Placement and shape parameters of the height field.
#[derive(Debug, Clone, Deserialize)]
pub struct HeightfieldConfig {
    /// Translation applied last.
    #[serde(default)]
    pub translate: [f64; 3],
    /// Per-axis scale applied first.
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    /// Rotation about z in degrees, applied after scaling.
    #[serde(default)]
    pub rotate_z: f64,
    /// Flip the surface normals.
    #[serde(default)]
    pub reverse_orientation: bool,
    /// Shape parameters: `nu`, `nv`, `Pz`, `smooth`.
    #[serde(flatten)]
    pub params: ParamSet,
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl HeightfieldConfig {
    /// Object-to-world transform: scale, then rotate, then translate.
    pub fn object_to_world(&self) -> Result<Transform> {
        let [sx, sy, sz] = self.scale;
        let scale = Transform::scale(sx, sy, sz)
            .with_context(|| format!("scale {:?} has a zero component", self.scale))?;
        let [tx, ty, tz] = self.translate;
        Ok(Transform::translation(tx, ty, tz)
            .compose(&Transform::rotation_z(self.rotate_z.to_radians()))
            .compose(&scale))
    }

    /// Build the shape.
    pub fn build(&self) -> Result<Heightfield> {
        let shape = Heightfield::from_params(self.object_to_world()?, self.reverse_orientation, &self.params)
            .context("invalid heightfield parameters")?;
        Ok(shape)
    }
}

impl CameraConfig {
    /// Camera-to-world transform.
    pub fn camera_to_world(&self) -> Result<Transform> {
        let eye = Point3::from(self.eye);
        let target = Point3::from(self.look_at);
        let up = Vec3::from(self.up);
        Transform::look_at(&eye, &target, &up)
            .context("camera up vector is parallel to the view direction")
    }
}

impl SceneConfig {
    /// Parse a scene from TOML text.
    pub fn from_toml(src: &str) -> Result<Self> {
        let scene: Self = toml::from_str(src).context("failed to parse scene")?;
        Ok(scene)
    }

    /// Read and parse a scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        let scene = Self::from_toml(&src).with_context(|| format!("in {}", path.display()))?;
        log::info!("loaded scene {}", path.display());
        Ok(scene)
    }
}
