// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernels.  Both families iterate z <- z^2 + c and
//! count how many steps it takes |z| to reach 2; they differ only in
//! what is fixed and what is sampled.  For the Mandelbrot set the
//! sampled point is c and z starts at the origin.  For a Julia set c is
//! fixed and the sampled point is where z starts.

use num::Complex;
use std::fmt;

/// The fractal family to render, carrying whatever state that family
/// needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Kernel {
    /// z starts at 0, c is the sampled point.
    Mandelbrot,
    /// z starts at the sampled point, c is fixed.
    Julia {
        /// Real part of the fixed parameter.
        cx: f64,
        /// Imaginary part of the fixed parameter.
        cy: f64,
    },
}

impl Kernel {
    /// A Julia kernel for the parameter `c`.  No range check is made;
    /// callers that take `c` from a user are expected to keep it inside
    /// the disk of radius 2.
    pub fn julia(c: Complex<f64>) -> Kernel {
        Kernel::Julia { cx: c.re, cy: c.im }
    }

    /// The number of iterations the orbit starting from (x0, y0) stays
    /// strictly inside the circle of radius 2, capped at `limit`.
    #[inline]
    pub fn compute(&self, x0: f64, y0: f64, limit: u32) -> u32 {
        match *self {
            Kernel::Mandelbrot => escape_time(0.0, 0.0, x0, y0, limit),
            Kernel::Julia { cx, cy } => escape_time(x0, y0, cx, cy, limit),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Kernel::Mandelbrot => write!(f, "mandelbrot"),
            Kernel::Julia { cx, cy } => write!(f, "julia({}, {})", cx, cy),
        }
    }
}

/// The squares are carried between steps so that the escape test and
/// the update share them.  y must be updated from the old x before x is
/// overwritten.
#[inline]
fn escape_time(mut x: f64, mut y: f64, cx: f64, cy: f64, limit: u32) -> u32 {
    let mut xsq = x * x;
    let mut ysq = y * y;
    let mut t = 0;
    while xsq + ysq < 4.0 && t < limit {
        y = 2.0 * x * y + cy;
        x = xsq - ysq + cx;
        xsq = x * x;
        ysq = y * y;
        t += 1;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};

    const D4: f64 = 1.0 / 4.0;
    const D16: f64 = D4 / 4.0;

    // False if the point is guaranteed to be in the main cardioid or
    // the period-2 bulb.
    fn maybe_outside(x: f64, y: f64) -> bool {
        let ysq = y * y;
        let q = ysq + (x - D4) * (x - D4);
        q * (q + x - D4) > (ysq * D4) && (x + 1.0) * (x + 1.0) + ysq > D16
    }

    #[test]
    fn interior_points_never_escape() {
        let points = [(0.0, 0.0), (-0.1, 0.1), (0.2, 0.2), (-0.5, 0.0), (-1.0, 0.0), (-1.1, 0.1)];
        for &(x, y) in &points {
            assert!(!maybe_outside(x, y));
            for &limit in &[1, 2, 50, 1000] {
                assert_eq!(Kernel::Mandelbrot.compute(x, y, limit), limit, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn random_interior_points_never_escape() {
        let mut rng = rand::thread_rng();
        let coords = Uniform::new_inclusive(-1.5_f64, 0.5);
        let mut checked = 0;
        while checked < 200 {
            let (x, y) = (coords.sample(&mut rng), coords.sample(&mut rng) / 2.0);
            if maybe_outside(x, y) {
                continue;
            }
            assert_eq!(Kernel::Mandelbrot.compute(x, y, 500), 500, "({}, {})", x, y);
            checked += 1;
        }
    }

    #[test]
    fn boundary_of_radius_two_is_outside() {
        // The first step lands exactly on |z|^2 = 4, which fails `< 4`.
        assert_eq!(Kernel::Mandelbrot.compute(2.0, 0.0, 1), 1);
        assert_eq!(Kernel::Mandelbrot.compute(2.0, 0.0, 100), 1);
        // A Julia orbit starting on the circle never takes a step.
        let julia = Kernel::Julia { cx: 0.0, cy: 0.0 };
        assert_eq!(julia.compute(2.0, 0.0, 100), 0);
        assert_eq!(julia.compute(0.0, -2.0, 100), 0);
    }

    #[test]
    fn zero_limit_yields_zero() {
        assert_eq!(Kernel::Mandelbrot.compute(0.0, 0.0, 0), 0);
        assert_eq!(Kernel::julia(Complex::new(-0.8, 0.156)).compute(0.1, 0.1, 0), 0);
    }

    #[test]
    fn update_order_matches_hand_computed_orbit() {
        // c = 0.5 + 0.5i:
        //   z1 = ( 0.5,     0.5    )  |z|^2 = 0.5
        //   z2 = ( 0.5,     1.0    )  |z|^2 = 1.25
        //   z3 = (-0.25,    1.5    )  |z|^2 = 2.3125
        //   z4 = (-1.6875, -0.25   )  |z|^2 = 2.91015625
        //   z5 = ( 3.28515625, 1.34375)  escaped
        // Updating x before y diverges from this at z3.
        assert_eq!(Kernel::Mandelbrot.compute(0.5, 0.5, 100), 5);
        assert_eq!(Kernel::Mandelbrot.compute(0.5, 0.5, 4), 4);
        assert_eq!(Kernel::Mandelbrot.compute(0.5, 0.5, 5), 5);
    }

    #[test]
    fn julia_from_origin_follows_the_mandelbrot_orbit() {
        let c = Complex::new(0.5, 0.5);
        assert_eq!(Kernel::julia(c).compute(0.0, 0.0, 100), 5);

        let mut rng = rand::thread_rng();
        let coords = Uniform::new_inclusive(-2.0_f64, 2.0);
        for _ in 0..100 {
            let (x, y) = (coords.sample(&mut rng), coords.sample(&mut rng));
            assert_eq!(
                Kernel::julia(Complex::new(x, y)).compute(0.0, 0.0, 200),
                Kernel::Mandelbrot.compute(x, y, 200)
            );
        }
    }

    #[test]
    fn julia_is_symmetric_through_the_origin() {
        let julia = Kernel::julia(Complex::new(-0.8, 0.156));
        for &(x, y) in &[(0.3, 0.1), (-0.7, 0.25), (1.1, -0.4)] {
            assert_eq!(julia.compute(x, y, 300), julia.compute(-x, -y, 300));
        }
    }

    #[test]
    fn kernels_display_their_parameters() {
        assert_eq!(Kernel::Mandelbrot.to_string(), "mandelbrot");
        assert_eq!(Kernel::Julia { cx: -0.5, cy: 0.25 }.to_string(), "julia(-0.5, 0.25)");
    }
}
