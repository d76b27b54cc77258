// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A strip worker owns a contiguous range of columns of the grid and
//! the matching slice of the iteration buffer.  Because the buffer is
//! column-major, that slice is one contiguous run of memory, and the
//! renderer can hand each worker its own `&mut` chunk: no two workers
//! can ever touch the same cell.

use log::trace;
use std::ops::Range;

use crate::cancel::Interrupt;
use crate::kernel::Kernel;
use crate::planes::{Pixel, ViewParameters};

/// One unit of concurrent work: a column range, the view it belongs
/// to, and the kernel to run over it.
#[derive(Clone, Debug)]
pub struct StripWorker<'a> {
    columns: Range<usize>,
    view: &'a ViewParameters,
    kernel: Kernel,
    interrupt: Interrupt<'a>,
}

impl<'a> StripWorker<'a> {
    /// Constructor.  `columns` must lie inside the view's grid.
    pub fn new(
        columns: Range<usize>,
        view: &'a ViewParameters,
        kernel: Kernel,
        interrupt: Interrupt<'a>,
    ) -> StripWorker<'a> {
        assert!(columns.start <= columns.end && columns.end <= view.grid_size);
        StripWorker {
            columns,
            view,
            kernel,
            interrupt,
        }
    }

    /// The columns this worker owns.
    pub fn columns(&self) -> Range<usize> {
        self.columns.clone()
    }

    /// The number of cells this worker writes.
    pub fn len(&self) -> usize {
        self.columns.len() * self.view.grid_size
    }

    /// True for a strip with no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.start == self.columns.end
    }

    /// Fills `strip` with inverted escape times: the cell for
    /// `(column, row)` gets `max_iterations - kernel.compute(...)`, so
    /// points that never escape become 0 and points that escape at once
    /// become large.  `strip` is this worker's slice of the column-major
    /// buffer, with column `columns.start` at its head.
    ///
    /// Checks for cancellation before each column and returns the
    /// number of columns completed.  Columns that were never reached
    /// are left as they were.
    pub fn run(&self, strip: &mut [u32]) -> usize {
        let n = self.view.grid_size;
        assert_eq!(strip.len(), self.len(), "strip buffer does not match columns");
        let limit = self.view.max_iterations;

        let mut completed = 0;
        for (column, cells) in self.columns.clone().zip(strip.chunks_mut(n)) {
            if self.interrupt.should_stop() {
                break;
            }
            for (row, cell) in cells.iter_mut().enumerate() {
                let point = self.view.pixel_to_point(&Pixel(column, row));
                *cell = limit - self.kernel.compute(point.re, point.im, limit);
            }
            completed += 1;
        }
        trace!(
            "strip {:?}: {} of {} columns",
            self.columns,
            completed,
            self.columns.len()
        );
        completed
    }
}
