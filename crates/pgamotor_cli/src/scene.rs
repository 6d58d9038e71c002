//! Scene descriptions: a camera plus a hierarchy of keyframed objects.

use std::collections::HashMap;
use std::path::Path;

use eyre::{Context, Result};
use pgamotor::prelude::*;
use serde::Deserialize;

/// Error produced when a scene is structurally invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum SceneError {
    #[error("duplicate object name {0:?}")]
    DuplicateName(String),
    #[error("object {object:?} has unknown parent {parent:?}")]
    UnknownParent { object: String, parent: String },
    #[error("object {0:?} is its own ancestor")]
    ParentCycle(String),
    #[error("object {0:?} has no keyframes")]
    EmptyKeyframes(String),
    #[error("keyframe times for object {0:?} are not strictly increasing")]
    NonMonotonicKeyframes(String),
}

/// File format of a scene description.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Format {
    Json,
    Yaml,
}
impl Format {
    /// Guesses the format from a file extension, defaulting to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Rigid transformation as written in a scene file: either raw motor
/// coefficients or a [`TransformDef`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum PoseDef {
    Motor(Motor),
    Transform(TransformDef),
}
impl Default for PoseDef {
    fn default() -> Self {
        Self::Motor(Motor::IDENT)
    }
}
impl PoseDef {
    pub fn to_motor(&self) -> Motor {
        match self {
            PoseDef::Motor(m) => *m,
            PoseDef::Transform(t) => t.to_motor(),
        }
    }
}

/// Rotation about an axis through the origin, followed by a translation.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TransformDef {
    #[serde(default)]
    pub rotation: Option<AxisAngle>,
    #[serde(default)]
    pub translation: [Float; 3],
}
impl TransformDef {
    fn to_motor(&self) -> Motor {
        let rotation = self.rotation.as_ref().map_or(Motor::IDENT, AxisAngle::to_motor);
        Motor::from_rotation_translation(rotation, Vector3::from(self.translation))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AxisAngle {
    pub axis: [Float; 3],
    /// Angle in degrees.
    pub degrees: Float,
}
impl AxisAngle {
    fn to_motor(&self) -> Motor {
        let axis = Vector3::from(self.axis);
        Motor::from_axis_angle(axis, self.degrees.to_radians()).unwrap_or_else(|| {
            log::warn!("ignoring rotation about zero axis");
            Motor::IDENT
        })
    }
}

/// Angular and linear velocity (or acceleration) in the world frame.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Twist {
    /// Axis scaled by radians per unit time.
    #[serde(default)]
    pub angular: [Float; 3],
    /// Velocity of the point at the origin.
    #[serde(default)]
    pub linear: [Float; 3],
}
impl Twist {
    pub fn to_bivector(&self) -> Bivector {
        Bivector::from_velocity(Vector3::from(self.angular), Vector3::from(self.linear))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Keyframe {
    pub time: Float,
    pub pose: PoseDef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Camera {
    #[serde(default)]
    pub pose: PoseDef,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Object {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub velocity: Option<Twist>,
    #[serde(default)]
    pub acceleration: Option<Twist>,
    #[serde(default)]
    pub vertices: Vec<[Float; 3]>,
}
impl Object {
    /// Returns the pose of the object relative to its parent at time `t`.
    ///
    /// Before the first keyframe and after the last one, the pose is held
    /// constant. Between keyframes, it follows the screw motion from one to
    /// the next.
    pub fn local_pose_at(&self, t: Float) -> Motor {
        let i = self.keyframes.partition_point(|k| k.time <= t);
        match (i.checked_sub(1).and_then(|j| self.keyframes.get(j)), self.keyframes.get(i)) {
            (Some(prev), Some(next)) => {
                let alpha = (t - prev.time) / (next.time - prev.time);
                Motor::interpolate(prev.pose.to_motor(), next.pose.to_motor(), alpha)
            }
            (Some(k), None) | (None, Some(k)) => k.pose.to_motor(),
            (None, None) => Motor::IDENT,
        }
    }

    fn validate(&self) -> Result<(), SceneError> {
        if self.keyframes.is_empty() {
            return Err(SceneError::EmptyKeyframes(self.name.clone()));
        }
        if self.keyframes.windows(2).any(|w| w[0].time >= w[1].time) {
            return Err(SceneError::NonMonotonicKeyframes(self.name.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scene {
    pub camera: Camera,
    #[serde(default)]
    pub objects: Vec<Object>,
}

impl Scene {
    pub fn parse(s: &str, format: Format) -> Result<Self> {
        let scene: Scene = match format {
            Format::Json => serde_json::from_str(s).context("error parsing JSON scene")?,
            Format::Yaml => serde_norway::from_str(s).context("error parsing YAML scene")?,
        };
        log::debug!("loaded scene with {} objects", scene.objects.len());
        Ok(scene)
    }

    /// Validates the scene and returns the index of each object's parent.
    pub fn hierarchy(&self) -> Result<Vec<Option<usize>>, SceneError> {
        let mut indices = HashMap::new();
        for (i, obj) in self.objects.iter().enumerate() {
            obj.validate()?;
            if indices.insert(obj.name.as_str(), i).is_some() {
                return Err(SceneError::DuplicateName(obj.name.clone()));
            }
        }

        let parents = self
            .objects
            .iter()
            .map(|obj| match &obj.parent {
                None => Ok(None),
                Some(parent) => match indices.get(parent.as_str()) {
                    Some(&i) => Ok(Some(i)),
                    None => Err(SceneError::UnknownParent {
                        object: obj.name.clone(),
                        parent: parent.clone(),
                    }),
                },
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Any chain longer than the number of objects must revisit one.
        for (i, obj) in self.objects.iter().enumerate() {
            let mut current = parents[i];
            for _ in 0..self.objects.len() {
                match current {
                    Some(j) if j == i => return Err(SceneError::ParentCycle(obj.name.clone())),
                    Some(j) => current = parents[j],
                    None => break,
                }
            }
        }

        Ok(parents)
    }

    /// Returns the world pose of every object, given each object's pose
    /// relative to its parent.
    pub fn compose_hierarchy(parents: &[Option<usize>], local_poses: &[Motor]) -> Vec<Motor> {
        let mut world: Vec<Option<Motor>> = vec![None; local_poses.len()];
        for i in 0..local_poses.len() {
            // Collect unresolved ancestors, then resolve them from the top down.
            let mut chain = vec![i];
            let mut base = Motor::IDENT;
            while let Some(&j) = chain.last()
                && chain.len() <= local_poses.len()
            {
                match parents[j] {
                    Some(p) if world[p].is_none() => chain.push(p),
                    Some(p) => {
                        base = world[p].unwrap_or_default();
                        break;
                    }
                    None => break,
                }
            }
            for &j in chain.iter().rev() {
                if world[j].is_none() {
                    base = base * local_poses[j];
                    world[j] = Some(base);
                } else {
                    base = world[j].unwrap_or_default();
                }
            }
        }
        world.into_iter().map(Option::unwrap_or_default).collect()
    }

    /// Returns the world pose of every object at time `t`.
    pub fn world_poses_at(&self, t: Float) -> Result<Vec<Motor>, SceneError> {
        let parents = self.hierarchy()?;
        let local_poses: Vec<Motor> = self.objects.iter().map(|o| o.local_pose_at(t)).collect();
        Ok(Self::compose_hierarchy(&parents, &local_poses))
    }

    /// Returns the combined view-projection matrix of the camera, as uploaded
    /// to shaders.
    pub fn view_projection(&self) -> pgamotor::cgmath::Matrix4<GpuFloat> {
        let view = self.camera.pose.to_motor().to_inverse_affine_matrix();
        self.camera.projection.to_matrix() * view.to_mat4()
    }
}
