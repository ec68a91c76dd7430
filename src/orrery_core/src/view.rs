//! View and projection matrices for the rendering boundary.
//!
//! The renderer consumes plain column-major float buffers, which matches
//! nalgebra's internal storage, so matrices built here can be packed without
//! a transpose. [`as_uniform_array`] is the single conversion point between
//! the f64 math done here and the f32 buffers uploaded to the GPU.
//!
//! Every function returns a fresh matrix and never mutates its inputs.
//! Degenerate inputs (singular matrices, zero length view directions,
//! collapsed frusta) fall back to the identity so the renderer always
//! receives a usable value.
//!

use nalgebra::{Matrix3, Matrix4, Orthographic3, Perspective3, Point3, Rotation3, Vector3};

/// Determinant or length magnitudes below this are treated as degenerate.
pub const SINGULAR_EPS: f64 = 1e-10;

/// Rotation about the X axis by an angle in radians, as a 4x4 matrix.
#[inline(always)]
#[must_use]
pub fn rotation_x(angle: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle).to_homogeneous()
}

/// Rotation about the Y axis by an angle in radians, as a 4x4 matrix.
#[inline(always)]
#[must_use]
pub fn rotation_y(angle: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous()
}

/// Rotation about the Z axis by an angle in radians, as a 4x4 matrix.
#[inline(always)]
#[must_use]
pub fn rotation_z(angle: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous()
}

/// Translation by the given offsets, as a 4x4 matrix.
#[inline(always)]
#[must_use]
pub fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Per axis scaling, as a 4x4 matrix.
#[inline(always)]
#[must_use]
pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z))
}

/// Right handed view matrix looking from `eye` toward `target`.
///
/// Falls back to the identity when the view direction has zero length or is
/// parallel to `up`, both of which leave the camera frame undefined.
#[must_use]
pub fn look_at(eye: &Vector3<f64>, target: &Vector3<f64>, up: &Vector3<f64>) -> Matrix4<f64> {
    let forward = target - eye;
    if forward.norm() < SINGULAR_EPS || forward.cross(up).norm() < SINGULAR_EPS {
        return Matrix4::identity();
    }
    Matrix4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
}

/// Right handed perspective projection matrix.
///
/// # Arguments
///
/// * `fov_y` - Full vertical field of view in radians, must be in (0, pi).
/// * `aspect` - Width over height of the viewport.
/// * `near` - Distance to the near clip plane.
/// * `far` - Distance to the far clip plane.
///
/// Falls back to the identity for a collapsed frustum (zero aspect, equal
/// clip planes, or a field of view outside (0, pi)).
#[must_use]
pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Matrix4<f64> {
    if !(SINGULAR_EPS..std::f64::consts::PI).contains(&fov_y)
        || aspect.abs() < SINGULAR_EPS
        || (far - near).abs() < SINGULAR_EPS
    {
        return Matrix4::identity();
    }
    Perspective3::new(aspect, fov_y, near, far).into_inner()
}

/// Right handed orthographic projection matrix.
///
/// Falls back to the identity when any pair of opposing clip planes
/// coincides.
#[must_use]
pub fn orthographic(
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    near: f64,
    far: f64,
) -> Matrix4<f64> {
    if (right - left).abs() < SINGULAR_EPS
        || (top - bottom).abs() < SINGULAR_EPS
        || (far - near).abs() < SINGULAR_EPS
    {
        return Matrix4::identity();
    }
    Orthographic3::new(left, right, bottom, top, near, far).into_inner()
}

/// General 4x4 matrix inverse.
///
/// Matrices with a determinant magnitude below [`SINGULAR_EPS`] are treated
/// as singular and invert to the identity, so a renderer never receives NaN
/// or infinite entries mid frame.
#[must_use]
pub fn invert(matrix: &Matrix4<f64>) -> Matrix4<f64> {
    if matrix.determinant().abs() < SINGULAR_EPS {
        return Matrix4::identity();
    }
    matrix.try_inverse().unwrap_or_else(Matrix4::identity)
}

/// 3x3 matrix inverse with the same singular fallback as [`invert`].
#[must_use]
pub fn invert3(matrix: &Matrix3<f64>) -> Matrix3<f64> {
    if matrix.determinant().abs() < SINGULAR_EPS {
        return Matrix3::identity();
    }
    matrix.try_inverse().unwrap_or_else(Matrix3::identity)
}

/// Normal matrix of a model-view transform.
///
/// The upper left 3x3 block inverted and transposed, which keeps normals
/// perpendicular to surfaces under non-uniform scaling. Singular input falls
/// back to the 3x3 identity.
#[must_use]
pub fn normal_matrix(model_view: &Matrix4<f64>) -> Matrix3<f64> {
    let linear: Matrix3<f64> = model_view.fixed_view::<3, 3>(0, 0).into_owned();
    invert3(&linear).transpose()
}

/// Pack a 4x4 matrix into a column-major f32 buffer for uniform upload.
#[must_use]
pub fn as_uniform_array(matrix: &Matrix4<f64>) -> [f32; 16] {
    let mut buffer = [0.0_f32; 16];
    for (slot, value) in buffer.iter_mut().zip(matrix.iter()) {
        *slot = *value as f32;
    }
    buffer
}

/// Pack a 3x3 matrix into a column-major f32 buffer for uniform upload.
#[must_use]
pub fn as_uniform_array3(matrix: &Matrix3<f64>) -> [f32; 9] {
    let mut buffer = [0.0_f32; 9];
    for (slot, value) in buffer.iter_mut().zip(matrix.iter()) {
        *slot = *value as f32;
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn max_abs_diff(a: &Matrix4<f64>, b: &Matrix4<f64>) -> f64 {
        (a - b).abs().max()
    }

    #[test]
    fn test_invert_roundtrip() {
        let m = translation(1.0, -2.0, 3.0) * rotation_y(0.7) * scaling(2.0, 1.0, 0.5);
        let inv = invert(&m);

        assert!(max_abs_diff(&(m * inv), &Matrix4::identity()) < 1e-6);
        assert!(max_abs_diff(&invert(&inv), &m) < 1e-6);
    }

    #[test]
    fn test_invert_degenerate_inputs() {
        // all zero entries must not produce NaN or Inf output
        let zero = Matrix4::zeros();
        assert_eq!(invert(&zero), Matrix4::identity());

        // rank deficient scale
        let flat = scaling(1.0, 1.0, 0.0);
        assert_eq!(invert(&flat), Matrix4::identity());

        let flat3 = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(invert3(&flat3), Matrix3::identity());
    }

    #[test]
    fn test_multiply_composes_right_to_left() {
        let m = translation(5.0, 0.0, 0.0) * scaling(2.0, 2.0, 2.0);
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        // scale first, then translate
        assert!((p.x - 7.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert!((p.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_matrix_rigid_and_scaled() {
        // for a rigid transform the normal matrix is the rotation block itself
        let rot = rotation_z(0.3);
        let rigid = translation(4.0, 5.0, 6.0) * rot;
        let n = normal_matrix(&rigid);
        let expected: Matrix3<f64> = rot.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((n - expected).abs().max() < 1e-12);

        // non-uniform scale inverts per axis
        let n = normal_matrix(&scaling(2.0, 1.0, 4.0));
        assert!((n[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((n[(1, 1)] - 1.0).abs() < 1e-12);
        assert!((n[(2, 2)] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vector3::new(0.0, 0.0, 5.0);
        let view = look_at(&eye, &Vector3::zeros(), &Vector3::y());

        let at_eye = view.transform_point(&Point3::from(eye));
        assert!(at_eye.coords.norm() < 1e-12);

        // the target sits straight ahead on the -z axis
        let at_target = view.transform_point(&Point3::origin());
        assert!((at_target.x).abs() < 1e-12);
        assert!((at_target.y).abs() < 1e-12);
        assert!((at_target.z + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_look_at_degenerate_falls_back() {
        let eye = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(look_at(&eye, &eye, &Vector3::y()), Matrix4::identity());

        // up parallel to the view direction
        let m = look_at(&Vector3::zeros(), &Vector3::new(0.0, 1.0, 0.0), &Vector3::y());
        assert_eq!(m, Matrix4::identity());
    }

    #[test]
    fn test_perspective_elements() {
        let m = perspective(FRAC_PI_2, 2.0, 1.0, 100.0);
        // focal length is 1 / tan(fov / 2) = 1 at a 90 degree field of view
        assert!((m[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((m[(1, 1)] - 1.0).abs() < 1e-12);
        assert!((m[(3, 2)] + 1.0).abs() < 1e-12);
        assert!(m[(3, 3)].abs() < 1e-12);

        assert_eq!(perspective(0.0, 2.0, 1.0, 100.0), Matrix4::identity());
        assert_eq!(perspective(FRAC_PI_4, 2.0, 10.0, 10.0), Matrix4::identity());
    }

    #[test]
    fn test_orthographic_maps_box_to_ndc() {
        let m = orthographic(-10.0, 10.0, -5.0, 5.0, 1.0, 100.0);
        let center = m.transform_point(&Point3::new(0.0, 0.0, -50.5));
        assert!(center.x.abs() < 1e-12);
        assert!(center.y.abs() < 1e-12);

        let corner = m.transform_point(&Point3::new(10.0, 5.0, -100.0));
        assert!((corner.x - 1.0).abs() < 1e-12);
        assert!((corner.y - 1.0).abs() < 1e-12);
        assert!((corner.z - 1.0).abs() < 1e-12);

        assert_eq!(
            orthographic(-10.0, -10.0, -5.0, 5.0, 1.0, 100.0),
            Matrix4::identity()
        );
    }

    #[test]
    fn test_uniform_array_is_column_major() {
        let buffer = as_uniform_array(&translation(1.0, 2.0, 3.0));
        // translation lives in the last column
        assert_eq!(buffer[12], 1.0);
        assert_eq!(buffer[13], 2.0);
        assert_eq!(buffer[14], 3.0);
        assert_eq!(buffer[15], 1.0);
        assert_eq!(buffer[0], 1.0);
        assert_eq!(buffer[1], 0.0);

        let buffer3 = as_uniform_array3(&Matrix3::identity());
        assert_eq!(buffer3, [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }
}
