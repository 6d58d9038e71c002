//! Structs shared between the CPU and GPU.
//!
//! Both structs can be uploaded as push constants, uniforms, or per-instance
//! vertex attributes; the layout is the same in each case.

use cgmath::Matrix4;

use crate::GpuFloat;
use crate::matrix::AffineMatrix;
use crate::pga::Motor;

/// Per-instance model transform: three rows of a `mat4x3`, each a `vec4`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    /// Rows of the affine matrix. The last element of each row is the
    /// translation.
    pub rows: [[GpuFloat; 4]; 3],
}

impl From<AffineMatrix> for InstanceTransform {
    fn from(m: AffineMatrix) -> Self {
        Self { rows: m.rows }
    }
}
impl From<InstanceTransform> for AffineMatrix {
    fn from(t: InstanceTransform) -> Self {
        Self { rows: t.rows }
    }
}
impl From<Motor> for InstanceTransform {
    fn from(m: Motor) -> Self {
        m.to_affine_matrix().into()
    }
}

/// Camera transform: one column-major `mat4x4` combining view and
/// projection.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Columns of the view-projection matrix.
    pub view_proj: [[GpuFloat; 4]; 4],
}

impl From<Matrix4<GpuFloat>> for CameraUniform {
    fn from(m: Matrix4<GpuFloat>) -> Self {
        Self {
            view_proj: m.into(),
        }
    }
}
impl From<CameraUniform> for Matrix4<GpuFloat> {
    fn from(c: CameraUniform) -> Self {
        c.view_proj.into()
    }
}
