// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A spectrum describes a color changing smoothly into another, and
//! then another, and so on.  Each transition is a segment with a
//! weight; the weight decides how much of the whole [0, 1] range that
//! transition occupies.  Everything that can be precomputed is computed
//! at construction, so that sampling is a short scan and three
//! multiply-adds.

use num::clamp;
use std::io::BufRead;

use crate::color::{ColorMap, Rgb};
use crate::errors::{Error, Result};

/// One transition, from `start` to `end`, occupying a share of the
/// spectrum proportional to `weight`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorSegment {
    /// The color at the beginning of the transition.
    pub start: Rgb,
    /// The color the transition approaches.
    pub end: Rgb,
    /// Relative width of the transition.  Must be positive.
    pub weight: f64,
}

impl ColorSegment {
    /// Constructor.
    pub fn new(start: Rgb, end: Rgb, weight: f64) -> ColorSegment {
        ColorSegment { start, end, weight }
    }
}

/// A weighted, ordered sequence of color transitions, sampled at any
/// point of [0, 1].  Read-only once built.
#[derive(Clone, Debug)]
pub struct Spectrum {
    name: String,
    // Normalized weight of each segment.
    shares: Vec<f64>,
    // offsets[g] is where segment g begins; the last entry is exactly 1.
    offsets: Vec<f64>,
    starts: Vec<[i32; 3]>,
    deltas: Vec<[i32; 3]>,
}

impl Spectrum {
    /// Builds a spectrum from its segments, in order.  Fails on an
    /// empty list or a weight that is not a positive finite number.
    pub fn from_segments<S: Into<String>>(name: S, segments: &[ColorSegment]) -> Result<Spectrum> {
        if segments.is_empty() {
            return Err(Error::InvalidSpectrum {
                reason: "a spectrum needs at least one segment".to_string(),
            });
        }
        if let Some((g, segment)) = segments
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.weight.is_finite() && s.weight > 0.0))
        {
            return Err(Error::InvalidSpectrum {
                reason: format!("segment {} has weight {}", g, segment.weight),
            });
        }
        Ok(Spectrum::from_valid_segments(name.into(), segments))
    }

    /// Reads an RGB map: one `r g b` triple per line, each channel
    /// 0-255.  Blank lines and lines starting with `#` are skipped.
    /// Consecutive colors become equally weighted segments.
    pub fn from_rgb_map<S: Into<String>, R: BufRead>(name: S, reader: R) -> Result<Spectrum> {
        let mut colors: Vec<Rgb> = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            colors.push(parse_rgb(line).map_err(|reason| Error::SpectrumFile {
                line: i + 1,
                reason,
            })?);
        }
        if colors.len() < 2 {
            return Err(Error::InvalidSpectrum {
                reason: format!("an RGB map needs at least two colors, found {}", colors.len()),
            });
        }
        let segments: Vec<ColorSegment> = colors
            .windows(2)
            .map(|pair| ColorSegment::new(pair[0], pair[1], 1.0))
            .collect();
        Ok(Spectrum::from_valid_segments(name.into(), &segments))
    }

    // Callers guarantee a non-empty list of positive weights.
    pub(crate) fn from_valid_segments(name: String, segments: &[ColorSegment]) -> Spectrum {
        let total: f64 = segments.iter().map(|s| s.weight).sum();
        let mut shares = Vec::with_capacity(segments.len());
        let mut offsets = Vec::with_capacity(segments.len() + 1);
        let mut starts = Vec::with_capacity(segments.len());
        let mut deltas = Vec::with_capacity(segments.len());

        let mut cumulative = 0.0;
        for segment in segments {
            let share = segment.weight / total;
            shares.push(share);
            offsets.push(cumulative);
            cumulative += share;

            let start = channels(segment.start);
            let end = channels(segment.end);
            starts.push(start);
            deltas.push([end[0] - start[0], end[1] - start[1], end[2] - start[2]]);
        }
        offsets.push(1.0);

        Spectrum {
            name,
            shares,
            offsets,
            starts,
            deltas,
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of segments.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Always false for a constructed spectrum.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Where each segment begins, followed by 1.0.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// The color at `progress`.  Boundary points belong to the earlier
    /// of the two segments that share them.
    ///
    /// # Panics
    ///
    /// If `progress` lies outside [0, 1].  That is a caller bug, not a
    /// value to clamp.
    pub fn sample(&self, progress: f64) -> Rgb {
        assert!(
            progress >= 0.0 && progress <= 1.0,
            "spectrum '{}' sampled at {}, outside [0, 1]",
            self.name,
            progress
        );
        let g = (0..self.shares.len())
            .find(|&g| self.offsets[g] <= progress && progress <= self.offsets[g + 1])
            .unwrap_or_else(|| {
                panic!(
                    "spectrum '{}' has no segment containing {}",
                    self.name, progress
                )
            });
        let f = (progress - self.offsets[g]) / self.shares[g];
        let (start, delta) = (self.starts[g], self.deltas[g]);
        Rgb(
            channel(start[0], delta[0], f),
            channel(start[1], delta[1], f),
            channel(start[2], delta[2], f),
        )
    }
}

impl ColorMap for Spectrum {
    /// Colors by the proportion of the iteration bound.
    fn color_for(&self, t: u32, max_iterations: u32) -> Rgb {
        if max_iterations == 0 {
            return self.sample(0.0);
        }
        self.sample(f64::from(t) / f64::from(max_iterations))
    }
}

#[inline]
fn channels(color: Rgb) -> [i32; 3] {
    [i32::from(color.0), i32::from(color.1), i32::from(color.2)]
}

#[inline]
fn channel(start: i32, delta: i32, f: f64) -> u8 {
    clamp(start + (f64::from(delta) * f) as i32, 0, 255) as u8
}

fn parse_rgb(line: &str) -> std::result::Result<Rgb, String> {
    let values: Vec<&str> = line.split_whitespace().collect();
    if values.len() != 3 {
        return Err(format!("expected three channels, found {}", values.len()));
    }
    let mut rgb = [0u8; 3];
    for (slot, value) in rgb.iter_mut().zip(values) {
        *slot = value
            .parse::<u8>()
            .map_err(|_| format!("'{}' is not a channel value between 0 and 255", value))?;
    }
    Ok(Rgb(rgb[0], rgb[1], rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn greyscale() -> Spectrum {
        Spectrum::from_segments("GreyScale", &[ColorSegment::new(Rgb::BLACK, Rgb::WHITE, 1.0)])
            .unwrap()
    }

    fn three_part() -> Spectrum {
        let red = Rgb(200, 20, 10);
        let blue = Rgb(0, 40, 250);
        Spectrum::from_segments(
            "three part",
            &[
                ColorSegment::new(Rgb::BLACK, red, 0.2),
                ColorSegment::new(red, blue, 0.5),
                ColorSegment::new(blue, Rgb::WHITE, 0.3),
            ],
        )
        .unwrap()
    }

    fn close(a: Rgb, b: Rgb, tolerance: i32) -> bool {
        let (a, b) = (channels(a), channels(b));
        (0..3).all(|i| (a[i] - b[i]).abs() <= tolerance)
    }

    #[test]
    fn empty_spectrum_is_rejected() {
        match Spectrum::from_segments("empty", &[]) {
            Err(Error::InvalidSpectrum { .. }) => {}
            other => panic!("expected InvalidSpectrum, got {:?}", other),
        }
    }

    #[test]
    fn non_positive_weights_are_rejected() {
        for &weight in &[0.0, -1.0, std::f64::NAN] {
            let segments = [ColorSegment::new(Rgb::BLACK, Rgb::WHITE, weight)];
            assert!(Spectrum::from_segments("bad", &segments).is_err());
        }
    }

    #[test]
    fn offsets_partition_the_unit_interval() {
        let spectrum = three_part();
        let offsets = spectrum.offsets();
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[1] - 0.2).abs() < 1e-12);
        assert!((offsets[2] - 0.7).abs() < 1e-12);
        assert_eq!(offsets[3], 1.0);
    }

    #[test]
    fn greyscale_interpolates_linearly() {
        let grey = greyscale();
        assert_eq!(grey.sample(0.0), Rgb::BLACK);
        assert_eq!(grey.sample(1.0), Rgb::WHITE);
        assert_eq!(grey.sample(0.5), Rgb(127, 127, 127));
        assert_eq!(grey.sample(0.98), Rgb(249, 249, 249));
    }

    #[test]
    fn segment_ends_reach_their_colors() {
        let spectrum = three_part();
        assert_eq!(spectrum.sample(0.0), Rgb::BLACK);
        assert_eq!(spectrum.sample(1.0), Rgb::WHITE);
        // A boundary belongs to the earlier segment, at its far end.
        assert!(close(spectrum.sample(0.2), Rgb(200, 20, 10), 1));
    }

    #[test]
    fn spectrum_is_continuous_at_boundaries() {
        let spectrum = three_part();
        let epsilon = 1e-9;
        for &boundary in &spectrum.offsets()[1..3] {
            let below = spectrum.sample(boundary - epsilon);
            let above = spectrum.sample(boundary + epsilon);
            assert!(close(below, above, 1), "{:?} vs {:?} at {}", below, above, boundary);
        }
    }

    #[test]
    #[should_panic(expected = "outside [0, 1]")]
    fn sampling_above_one_panics() {
        greyscale().sample(1.5);
    }

    #[test]
    #[should_panic(expected = "outside [0, 1]")]
    fn sampling_below_zero_panics() {
        greyscale().sample(-0.01);
    }

    #[test]
    fn color_map_uses_proportion_of_bound() {
        let grey = greyscale();
        assert_eq!(grey.color_for(0, 100), Rgb::BLACK);
        assert_eq!(grey.color_for(100, 100), Rgb::WHITE);
        assert_eq!(grey.color_for(50, 100), Rgb(127, 127, 127));
        assert_eq!(grey.color_for(0, 0), Rgb::BLACK);
    }

    #[test]
    fn rgb_map_chains_colors() {
        let map = "# a three color map\n0 0 0\n\n255 0 0\n255 255 255\n";
        let spectrum = Spectrum::from_rgb_map("map", Cursor::new(map)).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_eq!(spectrum.name(), "map");
        assert_eq!(spectrum.sample(0.0), Rgb::BLACK);
        assert_eq!(spectrum.sample(0.5), Rgb(255, 0, 0));
        assert_eq!(spectrum.sample(1.0), Rgb::WHITE);
    }

    #[test]
    fn rgb_map_reports_bad_lines() {
        let map = "0 0 0\n255 0\n";
        match Spectrum::from_rgb_map("map", Cursor::new(map)) {
            Err(Error::SpectrumFile { line: 2, .. }) => {}
            other => panic!("expected a line 2 error, got {:?}", other),
        }
        let map = "0 0 0\n256 0 0\n";
        match Spectrum::from_rgb_map("map", Cursor::new(map)) {
            Err(Error::SpectrumFile { line: 2, .. }) => {}
            other => panic!("expected a line 2 error, got {:?}", other),
        }
    }

    #[test]
    fn rgb_map_needs_two_colors() {
        assert!(Spectrum::from_rgb_map("map", Cursor::new("10 10 10\n")).is_err());
    }
}
