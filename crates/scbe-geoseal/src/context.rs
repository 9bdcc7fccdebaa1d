//! Context Projector (C5): maps a caller-supplied context vector into a
//! sphere id, a cube id, potentials, and a path label. Pure math, no
//! secrets, no I/O.

use crate::error::GeosealError;

/// Context vectors are projected onto the first 3 components for the
/// sphere and the first `CUBE_ARITY` for the cube.
pub const SPHERE_ARITY: usize = 3;
/// Default cube projection arity.
pub const CUBE_ARITY: usize = 6;

/// Output of projecting a context vector: the two quantized ids plus the
/// non-secret scalars used for ring classification and path labeling.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub sphere: [f64; SPHERE_ARITY],
    pub cube: Vec<f64>,
    pub sphere_id: String,
    pub cube_id: String,
    pub potentials: f64,
    pub margin: f64,
    pub path: &'static str,
}

fn validate(context: &[f64]) -> Result<(), GeosealError> {
    if context.is_empty() {
        return Err(GeosealError::ContextError);
    }
    if context.iter().any(|x| !x.is_finite()) {
        return Err(GeosealError::ContextError);
    }
    Ok(())
}

fn take_padded(context: &[f64], arity: usize) -> Vec<f64> {
    let mut out = vec![0.0; arity];
    let n = context.len().min(arity);
    out[..n].copy_from_slice(&context[..n]);
    out
}

/// z-score the first 3 context components (sample std with Bessel's
/// correction, n-1 divisor; tiny-variance fallback of 1), then L2-normalize
/// (zero-norm fallback to the unit x-axis).
fn sphere_vector(context: &[f64]) -> [f64; SPHERE_ARITY] {
    let padded = take_padded(context, SPHERE_ARITY);
    let mean: f64 = padded.iter().sum::<f64>() / SPHERE_ARITY as f64;
    let variance: f64 =
        padded.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (SPHERE_ARITY - 1) as f64;
    let std = variance.sqrt();
    let std = if std < 1e-9 { 1.0 } else { std };

    let mut z = [0.0f64; SPHERE_ARITY];
    for i in 0..SPHERE_ARITY {
        z[i] = (padded[i] - mean) / std;
    }

    let norm = z.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < 1e-9 {
        [1.0, 0.0, 0.0]
    } else {
        let mut u = [0.0f64; SPHERE_ARITY];
        for i in 0..SPHERE_ARITY {
            u[i] = z[i] / norm;
        }
        u
    }
}

/// Squash the first `arity` context components into `[0, 1]` via
/// `(tanh(x/5)+1)/2`.
fn cube_vector(context: &[f64], arity: usize) -> Vec<f64> {
    take_padded(context, arity)
        .into_iter()
        .map(|x| ((x / 5.0).tanh() + 1.0) / 2.0)
        .map(|x| x.clamp(0.0, 1.0))
        .collect()
}

fn sphere_id(u: &[f64; SPHERE_ARITY], level: u32) -> String {
    let coords: Vec<i64> = u.iter().map(|x| ((x + 1.0) * 1000.0).round() as i64).collect();
    format!("S{}:({},{},{})", level, coords[0], coords[1], coords[2])
}

fn cube_id(v: &[f64], level: u32) -> String {
    let scale = 10f64.powi((1 + level as i32).min(3));
    let n = v.len().min(CUBE_ARITY);
    let coords: Vec<i64> = v[..n].iter().map(|x| (x * scale).round() as i64).collect();
    let joined = coords.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",");
    format!("C{}:({})", level, joined)
}

fn potentials(u: &[f64; SPHERE_ARITY], v: &[f64]) -> f64 {
    let sphere_l1: f64 = u.iter().map(|x| x.abs()).sum();
    let cube_l1: f64 = v.iter().sum();
    let low_count = v.iter().filter(|x| **x < 0.2).count() as f64;
    let t = 0.5 + 0.05 * low_count;
    0.7 * sphere_l1 + 0.05 * cube_l1 - 0.3 * t
}

/// Project `context` into sphere id, cube id, potentials, margin, and path
/// label at resolution levels `level_sphere`/`level_cube`.
pub fn project(context: &[f64], level_sphere: u32, level_cube: u32) -> Result<Projection, GeosealError> {
    validate(context)?;

    let u = sphere_vector(context);
    let v = cube_vector(context, CUBE_ARITY);

    let h = sphere_id(&u, level_sphere);
    let z = cube_id(&v, level_cube);
    let p = potentials(&u, &v);
    let margin = 0.5 - u[0].abs();

    let path = if h.starts_with('S') && z.starts_with('C') && p < 0.6 && margin > 0.05 {
        "interior"
    } else {
        "exterior"
    };

    Ok(Projection {
        sphere: u,
        cube: v,
        sphere_id: h,
        cube_id: z,
        potentials: p,
        margin,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_context() {
        assert!(matches!(project(&[], 0, 0), Err(GeosealError::ContextError)));
    }

    #[test]
    fn rejects_non_finite_context() {
        assert!(matches!(
            project(&[1.0, f64::NAN, 2.0], 0, 0),
            Err(GeosealError::ContextError)
        ));
        assert!(matches!(
            project(&[1.0, f64::INFINITY, 2.0], 0, 0),
            Err(GeosealError::ContextError)
        ));
    }

    #[test]
    fn short_context_is_zero_padded() {
        let p = project(&[1.0], 0, 0).unwrap();
        assert_eq!(p.cube.len(), CUBE_ARITY);
    }

    #[test]
    fn sphere_vector_is_unit_norm() {
        let p = project(&[0.2, -0.3, 0.7, 1.0, -2.0, 0.5, 3.1, -9.9, 0.0], 0, 0).unwrap();
        let norm: f64 = p.sphere.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_falls_back_cleanly() {
        let p = project(&[5.0, 5.0, 5.0], 0, 0).unwrap();
        let norm: f64 = p.sphere.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9 || norm == 0.0 || p.sphere == [1.0, 0.0, 0.0]);
    }

    #[test]
    fn projection_is_deterministic() {
        let ctx = [0.2, -0.3, 0.7, 1.0, -2.0, 0.5, 3.1, -9.9, 0.0];
        let a = project(&ctx, 2, 1).unwrap();
        let b = project(&ctx, 2, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ids_carry_level_and_tag() {
        let p = project(&[0.1, 0.2, 0.3], 3, 2).unwrap();
        assert!(p.sphere_id.starts_with("S3:"));
        assert!(p.cube_id.starts_with("C2:"));
    }
}
