//!
//! Nearest point on an axis-aligned ellipse.
//!
//! Robust bisection method adapted from Eberly,
//! "Distance from a Point to an Ellipse, an Ellipsoid, or a Hyperellipsoid".
//!

use glam::Vec2;

const MAX_ITERATIONS: u32 = 10;

/// Finds the point on the ellipse `x^2/a^2 + y^2/b^2 = 1` closest to `(x0, y0)`.
///
/// Semi-axes and the query point are magnitudes, everything lives in the
/// first quadrant and the caller reapplies signs afterwards. Semi-axes must
/// be positive, a zero axis divides by zero here.
pub fn nearest_point_on_ellipse(a: f32, b: f32, x0: f32, y0: f32) -> Vec2 {
    // the root finder wants a >= b, swap into that order and back on return
    let swap = b > a;
    let (a, b, x0, y0) = if swap { (b, a, y0, x0) } else { (a, b, x0, y0) };

    let x1;
    let y1;

    if y0 > 0.0 {
        if x0 > 0.0 {
            let z0 = x0 / a;
            let z1 = y0 / b;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g != 0.0 {
                let r0 = (a / b) * (a / b);
                let sbar = get_root(r0, z0, z1, g);
                x1 = r0 * x0 / (sbar + r0);
                y1 = y0 / (sbar + 1.0);
            } else {
                // already on the boundary
                x1 = x0;
                y1 = y0;
            }
        } else {
            // x0 == 0, the minor-axis vertex is closest
            x1 = 0.0;
            y1 = b;
        }
    } else {
        let numer0 = a * x0;
        let denom0 = a * a - b * b;
        if numer0 < denom0 {
            let xde0 = numer0 / denom0;
            x1 = a * xde0;
            y1 = b * (1.0 - xde0 * xde0).sqrt();
        } else {
            // beyond the focal region, snaps to the major-axis vertex
            x1 = a;
            y1 = 0.0;
        }
    }

    return if swap { Vec2::new(y1, x1) } else { Vec2::new(x1, y1) };
}

/// Bisects `g(s) = (r0*z0 / (s + r0))^2 + (z1 / (s + 1))^2 - 1` toward its
/// root. The iteration count is fixed so per-call cost stays bounded.
fn get_root(r0: f32, z0: f32, z1: f32, g: f32) -> f32 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = Vec2::new(n0, z1).length() - 1.0;
    if g < 0.0 {
        s1 = 0.0;
    }

    let mut s = 0.0;
    for _ in 0..MAX_ITERATIONS {
        s = (s0 + s1) / 2.0;
        if s == s0 || s == s1 {
            break;
        }

        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;

        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }

    return s;
}
