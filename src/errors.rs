// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every fallible constructor in the crate.

use failure::Fail;
use std::io;

/// Everything that can go wrong before a render starts.  Once the
/// workers are running nothing is reported as an error: a stalled or
/// cancelled strip just leaves its cells at zero.
#[derive(Debug, Fail)]
pub enum Error {
    /// A spectrum with no segments, or with a segment whose weight is
    /// not a positive finite number.
    #[fail(display = "invalid spectrum: {}", reason)]
    InvalidSpectrum {
        /// What was wrong with the segments.
        reason: String,
    },

    /// A palette must sample its spectrum at least once.
    #[fail(display = "invalid palette period: {}", period)]
    InvalidPalette {
        /// The rejected period.
        period: usize,
    },

    /// Rejected before any worker is spawned.
    #[fail(display = "invalid view parameters: {}", reason)]
    InvalidViewParameters {
        /// Which parameter was out of range.
        reason: String,
    },

    /// A renderer needs at least one worker.
    #[fail(display = "worker count must be at least one")]
    InvalidWorkerCount,

    /// A malformed line in an RGB map file.
    #[fail(display = "spectrum file, line {}: {}", line, reason)]
    SpectrumFile {
        /// One-based line number.
        line: usize,
        /// What could not be parsed.
        reason: String,
    },

    /// Reading an RGB map failed.
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
