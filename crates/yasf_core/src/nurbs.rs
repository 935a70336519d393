//! Rational B-spline surfaces.
//!
//! Points are evaluated with Cox–de Boor basis functions over homogeneous
//! control points. The `nurbs` primitive only ever builds single-patch
//! surfaces (clamped `[0..0, 1..1]` knots), but the evaluator handles any
//! valid knot vector.

use glam::{Vec3, Vec4};

/// A NURBS surface with a `(n_u + 1) x (n_v + 1)` grid of weighted control points.
#[derive(Clone, Debug)]
pub struct NurbsSurface {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f32>,
    knots_v: Vec<f32>,
    /// `control_points[i][j]`, `i` along u; xyz pre-multiplied by the weight in w.
    control_points: Vec<Vec<Vec4>>,
}

impl NurbsSurface {
    /// Create a surface from weighted control points `(x, y, z, w)`.
    ///
    /// Knot vectors must have `points + degree + 1` entries per direction.
    /// Returns `None` if the grid is ragged or the knot counts do not match.
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f32>,
        knots_v: Vec<f32>,
        weighted_points: Vec<Vec<Vec4>>,
    ) -> Option<Self> {
        let rows = weighted_points.len();
        let cols = weighted_points.first()?.len();
        if weighted_points.iter().any(|row| row.len() != cols) {
            return None;
        }
        if knots_u.len() != rows + degree_u + 1 || knots_v.len() != cols + degree_v + 1 {
            return None;
        }

        let control_points = weighted_points
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|p| Vec4::new(p.x * p.w, p.y * p.w, p.z * p.w, p.w))
                    .collect()
            })
            .collect();

        Some(Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
        })
    }

    /// Single Bézier-patch surface: every control point has weight 1 and both
    /// knot vectors are clamped `[0; degree + 1] ++ [1; degree + 1]`.
    ///
    /// `grid` must be `(degree_u + 1) x (degree_v + 1)`.
    pub fn bezier_patch(degree_u: usize, degree_v: usize, grid: Vec<Vec<Vec3>>) -> Option<Self> {
        let weighted = grid
            .into_iter()
            .map(|row| row.into_iter().map(|p| p.extend(1.0)).collect())
            .collect();
        Self::new(
            degree_u,
            degree_v,
            clamped_knots(degree_u),
            clamped_knots(degree_v),
            weighted,
        )
    }

    pub fn knots_u(&self) -> &[f32] {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &[f32] {
        &self.knots_v
    }

    /// Evaluate the surface at parameters `(u, v)` in `[0, 1]`.
    pub fn evaluate(&self, u: f32, v: f32) -> Vec3 {
        let u = map_to_domain(&self.knots_u, self.degree_u, u);
        let v = map_to_domain(&self.knots_v, self.degree_v, v);

        let n_u = self.control_points.len() - 1;
        let n_v = self.control_points[0].len() - 1;

        let span_u = find_span(n_u, self.degree_u, u, &self.knots_u);
        let span_v = find_span(n_v, self.degree_v, v, &self.knots_v);
        let basis_u = basis_functions(span_u, u, self.degree_u, &self.knots_u);
        let basis_v = basis_functions(span_v, v, self.degree_v, &self.knots_v);

        let mut sum = Vec4::ZERO;
        for (l, nv) in basis_v.iter().enumerate() {
            let mut temp = Vec4::ZERO;
            for (k, nu) in basis_u.iter().enumerate() {
                temp += *nu * self.control_points[span_u - self.degree_u + k][span_v - self.degree_v + l];
            }
            sum += *nv * temp;
        }

        if sum.w.abs() > f32::EPSILON {
            sum.truncate() / sum.w
        } else {
            sum.truncate()
        }
    }
}

/// Clamped knot vector of a single span: `degree + 1` zeros then `degree + 1` ones.
pub fn clamped_knots(degree: usize) -> Vec<f32> {
    let mut knots = vec![0.0; degree + 1];
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// Map `t` in [0, 1] to the knot vector's valid parameter range.
fn map_to_domain(knots: &[f32], degree: usize, t: f32) -> f32 {
    let lo = knots[degree];
    let hi = knots[knots.len() - degree - 1];
    lo + t.clamp(0.0, 1.0) * (hi - lo)
}

/// Knot span index containing `u`, for `n + 1` control points.
fn find_span(n: usize, degree: usize, u: f32, knots: &[f32]) -> usize {
    if u >= knots[n + 1] {
        return n;
    }
    if u <= knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// The `degree + 1` non-zero basis functions at `u` in knot span `span`.
fn basis_functions(span: usize, u: f32, degree: usize, knots: &[f32]) -> Vec<f32> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom.abs() > f32::EPSILON { n[r] / denom } else { 0.0 };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }

    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bilinear_patch() -> NurbsSurface {
        NurbsSurface::bezier_patch(
            1,
            1,
            vec![
                vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
                vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_clamped_knots() {
        assert_eq!(clamped_knots(1), vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(clamped_knots(2), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_corners_interpolate_control_points() {
        let s = bilinear_patch();
        assert!((s.evaluate(0.0, 0.0) - Vec3::ZERO).length() < 1e-5);
        assert!((s.evaluate(1.0, 0.0) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((s.evaluate(0.0, 1.0) - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
        assert!((s.evaluate(1.0, 1.0) - Vec3::new(1.0, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let p = bilinear_patch().evaluate(0.5, 0.5);
        assert!((p - Vec3::new(0.5, 0.5, 0.25)).length() < 1e-5);
    }

    #[test]
    fn test_quadratic_curve_matches_bezier() {
        // Degree 2 in u, 1 in v; along u this is a quadratic Bézier.
        let s = NurbsSurface::bezier_patch(
            2,
            1,
            vec![
                vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)],
                vec![Vec3::new(1.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 1.0)],
                vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 1.0)],
            ],
        )
        .unwrap();

        // B(0.5) = 0.25 P0 + 0.5 P1 + 0.25 P2
        let p = s.evaluate(0.5, 0.0);
        assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_weights_pull_toward_point() {
        let grid = vec![
            vec![Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 0.0, 1.0, 1.0)],
            vec![Vec4::new(1.0, 2.0, 0.0, 4.0), Vec4::new(1.0, 2.0, 1.0, 4.0)],
            vec![Vec4::new(2.0, 0.0, 0.0, 1.0), Vec4::new(2.0, 0.0, 1.0, 1.0)],
        ];
        let s = NurbsSurface::new(2, 1, clamped_knots(2), clamped_knots(1), grid).unwrap();

        // Heavier middle weight lifts the midpoint above the unweighted 1.0.
        assert!(s.evaluate(0.5, 0.0).y > 1.0);
    }

    #[test]
    fn test_rejects_mismatched_knots() {
        let grid = vec![vec![Vec4::ONE; 2]; 2];
        assert!(NurbsSurface::new(1, 1, vec![0.0, 1.0], clamped_knots(1), grid).is_none());
    }

    #[test]
    fn test_multi_span_knots() {
        // Linear in u over three points with an interior knot.
        let grid = vec![
            vec![Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 1.0, 0.0, 1.0)],
            vec![Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 1.0, 0.0, 1.0)],
            vec![Vec4::new(3.0, 0.0, 0.0, 1.0), Vec4::new(3.0, 1.0, 0.0, 1.0)],
        ];
        let s = NurbsSurface::new(1, 1, vec![0.0, 0.0, 0.5, 1.0, 1.0], clamped_knots(1), grid)
            .unwrap();

        assert!((s.evaluate(0.5, 0.0).x - 1.0).abs() < 1e-5);
        assert!((s.evaluate(0.75, 0.0).x - 2.0).abs() < 1e-5);
    }
}
