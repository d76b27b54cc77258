// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the ViewParameters struct, which describes a relationship
//! between a square integral plane with an origin at 0,0 and a square
//! window onto the complex plane, centered on an arbitrary point and
//! `scale` units wide.
use num::Complex;

use crate::errors::{Error, Result};

/// Describes the column and row of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The parameters of a single render: where the window sits on the
/// complex plane, how wide it is, how many iterations a point gets
/// before we decide it never escapes, and how many pixels there are
/// along each side of the square grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewParameters {
    /// The point of the complex plane at the middle of the grid.
    pub center: Complex<f64>,
    /// The width (and height) of the window in complex units.
    pub scale: f64,
    /// The iteration bound handed to the kernel.
    pub max_iterations: u32,
    /// Pixels along each side of the grid.
    pub grid_size: usize,
}

impl Default for ViewParameters {
    fn default() -> Self {
        ViewParameters {
            center: Complex::new(0.0, 0.0),
            scale: 4.0,
            max_iterations: 256,
            grid_size: 512,
        }
    }
}

impl ViewParameters {
    /// Constructor.  Rejects an empty grid and a scale that is not a
    /// positive, finite number.
    pub fn new(
        center: Complex<f64>,
        scale: f64,
        max_iterations: u32,
        grid_size: usize,
    ) -> Result<ViewParameters> {
        let view = ViewParameters {
            center,
            scale,
            max_iterations,
            grid_size,
        };
        view.validate()?;
        Ok(view)
    }

    /// The fields are public, so the renderer checks again before
    /// spawning anything.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidViewParameters {
                reason: "grid size must be positive".to_string(),
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidViewParameters {
                reason: format!("scale must be positive and finite, got {}", self.scale),
            });
        }
        if !(self.center.re.is_finite() && self.center.im.is_finite()) {
            return Err(Error::InvalidViewParameters {
                reason: format!("center must be finite, got {}", self.center),
            });
        }
        Ok(())
    }

    /// The same view, on a grid of a different size.
    pub fn with_grid_size(&self, grid_size: usize) -> ViewParameters {
        ViewParameters { grid_size, ..*self }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.grid_size == 0
    }

    /// Given a pixel on the integral plane, map it to the corresponding
    /// point on the complex plane.  Column zero sits half a scale to
    /// the left of the center; the last column is one pixel short of
    /// half a scale to the right.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let n = self.grid_size as f64;
        Complex::new(
            self.center.re + self.scale * ((pixel.0 as f64) / n - 0.5),
            self.center.im + self.scale * ((pixel.1 as f64) / n - 0.5),
        )
    }

    /// The linear offset of a pixel in a column-major buffer, which is
    /// how iteration counts are laid out so that each column strip is
    /// one contiguous run of memory.
    #[inline]
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.0 * self.grid_size + pixel.1
    }
}
