//! Per-cell geometry: tube axis, tiling width, and box orientation

use glam::{DMat3, DMat4, DQuat, DVec3, DVec4, EulerRot};
use std::f64::consts::FRAC_PI_2;

use crate::armature::ArmatureBone;
use crate::error::{Result, RigError};
use crate::grid::{Grid, GridKey};

/// Lengths below this are treated as zero
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Width systems whose determinant, relative to the squared radius, falls
/// below this are treated as singular
pub const DETERMINANT_EPSILON: f64 = 1e-12;

/// Central axis of the skirt tube, shared by every cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeAxis {
    /// Mean head position of the waist row
    pub origin: DVec3,
    /// Unit direction from the waist towards the mean head of the last row
    pub axis: DVec3,
}

impl TubeAxis {
    pub fn new(origin: DVec3, axis: DVec3) -> Self {
        Self { origin, axis }
    }

    pub fn from_bones(bones: &Grid<ArmatureBone>) -> Result<Self> {
        let origin = mean(bones.ring(0).map(|b| b.head));
        let last = mean(bones.ring(bones.rows() - 1).map(|b| b.head));
        let axis = last - origin;
        if axis.length() < LENGTH_EPSILON {
            return Err(RigError::degenerate_grid(format!(
                "waist and last row share the same mean head ({} rows); no tube axis",
                bones.rows()
            )));
        }
        Ok(Self::new(origin, axis.normalize()))
    }

    /// Offset of `point` from the origin with the axial component removed
    pub fn project(&self, point: DVec3) -> DVec3 {
        let d = point - self.origin;
        d - self.axis * d.dot(self.axis)
    }

    /// Half width of the box centered at `center` that meets the box of
    /// `neighbor` without gap or overlap
    ///
    /// Both centers are projected onto the plane orthogonal to the axis. The
    /// box edge lies where the lines through each projected center,
    /// perpendicular to its radial direction, intersect. Solved as
    /// `x1 + a = x2 + b` with `a ⟂ x1` and `b ⟂ x2`; the result is `|a|`.
    pub fn half_width(&self, key: GridKey, center: DVec3, neighbor: DVec3) -> Result<f64> {
        let x1 = self.project(center);
        let x2 = self.project(neighbor);
        if x1.length() < LENGTH_EPSILON {
            return Err(RigError::degenerate(
                key,
                "center lies on the tube axis",
            ));
        }

        let vec_x = x1.normalize();
        let vec_y = self.axis.cross(vec_x);
        let (x11, x12) = (x1.dot(vec_x), x1.dot(vec_y));
        let (x21, x22) = (x2.dot(vec_x), x2.dot(vec_y));

        let system = DMat4::from_cols_array_2d(&[
            [1.0, 0.0, -1.0, 0.0],
            [0.0, 1.0, 0.0, -1.0],
            [x11, x12, 0.0, 0.0],
            [0.0, 0.0, x21, x22],
        ])
        .transpose();
        let rhs = DVec4::new(x21 - x11, x22 - x12, 0.0, 0.0);

        // det = ±x11·x22, so it scales with the radius squared
        let scale = x1.length_squared().max(x2.length_squared());
        let det = system.determinant();
        if !det.is_finite() || det.abs() < DETERMINANT_EPSILON * scale {
            return Err(RigError::degenerate(
                key,
                format!("width system is singular (det = {:e}); neighbour is collinear with the axis", det),
            ));
        }

        let solution = system.inverse() * rhs;
        let half_width = solution.x.hypot(solution.y);
        if !half_width.is_finite() {
            return Err(RigError::degenerate(key, "width is not finite"));
        }
        Ok(half_width)
    }
}

/// Right-handed orthonormal frame of one cell
///
/// Y runs along the bone towards its head, X is the outward cloth normal, and
/// Z runs around the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub center: DVec3,
    pub x_axis: DVec3,
    pub y_axis: DVec3,
    pub z_axis: DVec3,
}

impl CellFrame {
    pub fn for_bone(key: GridKey, bone: &ArmatureBone, tube: &TubeAxis) -> Result<Self> {
        let center = bone.center();

        // head - tail: Y points back up the chain, towards the root
        let along = bone.head - bone.tail;
        if along.length() < LENGTH_EPSILON {
            return Err(RigError::degenerate(key, "bone has zero length"));
        }
        let y_axis = along.normalize();

        let radial = tube.project(center);
        if radial.length() < LENGTH_EPSILON {
            return Err(RigError::degenerate(
                key,
                "center lies on the tube axis",
            ));
        }
        let radial = radial.normalize();
        let normal = radial - y_axis * radial.dot(y_axis);
        if normal.length() < LENGTH_EPSILON {
            return Err(RigError::degenerate(
                key,
                "bone is parallel to its radial direction",
            ));
        }
        let x_axis = normal.normalize();
        let z_axis = x_axis.cross(y_axis);

        Ok(Self {
            center,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    pub fn basis(&self) -> DMat3 {
        DMat3::from_cols(self.x_axis, self.y_axis, self.z_axis)
    }

    /// Box orientation: the frame turned +90° about its own X axis, so the
    /// box's local Y spans the ring and local Z spans the bone
    pub fn box_rotation(&self) -> DMat3 {
        self.basis() * DMat3::from_rotation_x(FRAC_PI_2)
    }

    /// [`CellFrame::box_rotation`] as Euler angles (x, y, z) in YXZ order,
    /// i.e. `R = Rz(z) · Rx(x) · Ry(y)`
    pub fn euler_yxz(&self) -> DVec3 {
        let rotation = DQuat::from_mat3(&self.box_rotation());
        let (z, x, y) = rotation.to_euler(EulerRot::ZXY);
        DVec3::new(x, y, z)
    }
}

fn mean(points: impl Iterator<Item = DVec3>) -> DVec3 {
    let (sum, count) = points.fold((DVec3::ZERO, 0usize), |(sum, n), p| (sum + p, n + 1));
    if count == 0 {
        DVec3::ZERO
    } else {
        sum / count as f64
    }
}
