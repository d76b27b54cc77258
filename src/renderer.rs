// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The renderer splits the grid into equal-width column strips, runs
//! one worker per strip on its own scoped thread, waits for all of
//! them, and then colors the result.  The workers never talk to each
//! other; the end of the crossbeam scope is the only barrier.

use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use log::{debug, trace, warn};
use std::time::{Duration, Instant};

use crate::cancel::{CancelToken, Interrupt};
use crate::color::{ColorMap, Rgb};
use crate::errors::{Error, Result};
use crate::kernel::Kernel;
use crate::planes::{Pixel, ViewParameters};
use crate::strip::StripWorker;

/// The worker count to use when the caller has no better idea.
pub const DEFAULT_WORKERS: usize = 8;

/// Renders views with a fixed number of workers.  Cheap to build; one
/// renderer can be reused for any number of renders.
#[derive(Clone, Debug)]
pub struct FractalRenderer {
    workers: usize,
    timeout: Option<Duration>,
    cancel: CancelToken,
}

impl Default for FractalRenderer {
    fn default() -> Self {
        FractalRenderer {
            workers: DEFAULT_WORKERS,
            timeout: None,
            cancel: CancelToken::new(),
        }
    }
}

impl FractalRenderer {
    /// A renderer that splits every grid into `workers` strips.
    pub fn new(workers: usize) -> Result<FractalRenderer> {
        if workers == 0 {
            return Err(Error::InvalidWorkerCount);
        }
        Ok(FractalRenderer {
            workers,
            ..FractalRenderer::default()
        })
    }

    /// Bound every render: workers stop at the first column they start
    /// after `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> FractalRenderer {
        self.timeout = Some(timeout);
        self
    }

    /// Watch `token` instead of the renderer's own.
    pub fn with_cancel_token(mut self, token: CancelToken) -> FractalRenderer {
        self.cancel = token;
        self
    }

    /// A handle that abandons the renders this renderer, and its clones,
    /// are running.  Renders started after the cancel run normally.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The number of strips, and threads, per render.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// `grid_size` rounded up to the next multiple of the worker count,
    /// so that every strip has the same width.
    pub fn adjusted_grid_size(&self, grid_size: usize) -> usize {
        match grid_size % self.workers {
            0 => grid_size,
            r => grid_size + (self.workers - r),
        }
    }

    /// Renders `view` with `kernel` and colors it with `colors`.
    ///
    /// The grid may come back larger than requested; see
    /// [`adjusted_grid_size`](#method.adjusted_grid_size) and
    /// [`Rendering::grid_size`](struct.Rendering.html#method.grid_size).
    /// Invalid views are rejected before any thread starts.  A strip
    /// that is cancelled, times out or panics is not an error: its
    /// unfinished cells stay at zero and the rendering is marked
    /// incomplete.
    pub fn render<C: ColorMap + ?Sized>(
        &self,
        view: &ViewParameters,
        kernel: Kernel,
        colors: &C,
    ) -> Result<Rendering> {
        view.validate()?;
        let grid_size = self.adjusted_grid_size(view.grid_size);
        if grid_size != view.grid_size {
            warn!(
                "grid size {} is not a multiple of {} workers; rendering {} instead",
                view.grid_size, self.workers, grid_size
            );
        }
        let view = view.with_grid_size(grid_size);
        debug!(
            "rendering {} at {} scale {} on a {}x{} grid, {} iterations, {} workers",
            kernel, view.center, view.scale, grid_size, grid_size, view.max_iterations, self.workers
        );

        let (iterations, complete) = self.compute(&view, kernel);
        let pixels = colorize(&iterations, grid_size, view.max_iterations, colors);
        Ok(Rendering {
            grid_size,
            max_iterations: view.max_iterations,
            iterations,
            pixels,
            complete,
        })
    }

    /// The compute phase: every strip is spawned before any is joined.
    fn compute(&self, view: &ViewParameters, kernel: Kernel) -> (Vec<u32>, bool) {
        self.compute_with(view, kernel, |worker, strip| worker.run(strip))
    }

    /// Runs `work` once per strip, each on its own scoped thread, and
    /// reports whether every strip finished all of its columns.
    fn compute_with<F>(&self, view: &ViewParameters, kernel: Kernel, work: F) -> (Vec<u32>, bool)
    where
        F: Fn(StripWorker, &mut [u32]) -> usize + Sync,
    {
        let n = view.grid_size;
        let strip_width = n / self.workers;
        let mut iterations = vec![0 as u32; view.len()];
        let interrupt = Interrupt::new(&self.cancel, self.timeout.map(|t| Instant::now() + t));
        let work = &work;

        let complete = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<usize>> = iterations
                .chunks_mut(strip_width * n)
                .enumerate()
                .map(|(i, strip)| {
                    let columns = i * strip_width..(i + 1) * strip_width;
                    let worker = StripWorker::new(columns, view, kernel, interrupt);
                    spawner.spawn(move |_| work(worker, strip))
                })
                .collect();

            let mut complete = true;
            for (i, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(done) if done == strip_width => trace!("strip {} finished", i),
                    Ok(done) => {
                        warn!("strip {} stopped after {} of {} columns", i, done, strip_width);
                        complete = false;
                    }
                    Err(_) => {
                        warn!("strip {} panicked; its columns are left blank", i);
                        complete = false;
                    }
                }
            }
            complete
        })
        .unwrap_or(false);

        (iterations, complete)
    }
}

/// The coloring pass.  Reads the column-major iteration buffer and
/// writes packed RGB row by row, which is what image encoders expect.
fn colorize<C: ColorMap + ?Sized>(
    iterations: &[u32],
    grid_size: usize,
    max_iterations: u32,
    colors: &C,
) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(iterations.len() * 3);
    for (row, column) in iproduct!(0..grid_size, 0..grid_size) {
        let t = iterations[column * grid_size + row];
        pixels.extend_from_slice(&colors.color_for(t, max_iterations).channels());
    }
    pixels
}

/// The result of a render.
#[derive(Clone, Debug)]
pub struct Rendering {
    grid_size: usize,
    max_iterations: u32,
    iterations: Vec<u32>,
    pixels: Vec<u8>,
    complete: bool,
}

impl Rendering {
    /// Pixels along each side, after rounding up to the worker count.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// The iteration bound the render used.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// False if any strip was cancelled, timed out or failed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Packed 8-bit RGB, row-major, `grid_size * grid_size * 3` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Takes the pixel bytes, for handing to an encoder.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The inverted escape times, column-major.
    pub fn iterations(&self) -> &[u32] {
        &self.iterations
    }

    /// The inverted escape time at `(column, row)`.
    pub fn iteration_at(&self, column: usize, row: usize) -> u32 {
        self.iterations[column * self.grid_size + row]
    }

    /// The color at `(column, row)`.
    pub fn get(&self, column: usize, row: usize) -> Rgb {
        let i = (row * self.grid_size + column) * 3;
        Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// The pixel at the middle of the grid.
    pub fn center(&self) -> Pixel {
        Pixel(self.grid_size / 2, self.grid_size / 2)
    }
}
