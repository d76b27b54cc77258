#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! Take a point on the complex plane, and repeatedly square it and add
//! a constant.  Either the result runs off to infinity or it doesn't;
//! the number of steps it takes to leave the circle of radius 2 is the
//! point's "escape time."  For the Mandelbrot set the point is the
//! constant and the orbit starts at zero; for a Julia set the constant
//! is fixed and the orbit starts at the point.
//!
//! Rendering an image means doing that for every pixel of a square
//! grid, which is embarrassingly parallel: the [`FractalRenderer`]
//! cuts the grid into equal vertical strips and gives each one to its
//! own thread.  The escape times are then colored, either by sampling
//! a [`Spectrum`] in proportion to the iteration bound, or by looking
//! them up in a [`Palette`], a precomputed table that repeats every
//! `period` iterations and gives the familiar banded look.
//!
//! [`FractalRenderer`]: renderer/struct.FractalRenderer.html
//! [`Spectrum`]: spectrum/struct.Spectrum.html
//! [`Palette`]: palette/struct.Palette.html

extern crate crossbeam;
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;

pub mod cancel;
pub mod color;
pub mod errors;
pub mod kernel;
pub mod palette;
pub mod planes;
pub mod presets;
pub mod renderer;
pub mod spectrum;
pub mod strip;

pub use cancel::CancelToken;
pub use color::{ColorMap, Rgb};
pub use errors::{Error, Result};
pub use kernel::Kernel;
pub use palette::Palette;
pub use planes::{Pixel, ViewParameters};
pub use renderer::{FractalRenderer, Rendering, DEFAULT_WORKERS};
pub use spectrum::{ColorSegment, Spectrum};
pub use strip::StripWorker;
