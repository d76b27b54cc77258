// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A palette maps escape times to a repeating set of colors.  It is
//! made by sampling a spectrum at a fixed rate, and that rate becomes
//! the period over which the palette repeats.  Coloring a pixel is then
//! a single table lookup.

use crate::color::{ColorMap, Rgb};
use crate::errors::{Error, Result};
use crate::spectrum::Spectrum;

/// A fixed-resolution, cyclic sampling of a spectrum.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Samples `spectrum` at `p / period` for every `p` in
    /// `0..period`.  A period of zero is rejected.
    pub fn from_spectrum(spectrum: &Spectrum, period: usize) -> Result<Palette> {
        if period == 0 {
            return Err(Error::InvalidPalette { period });
        }
        let colors = (0..period)
            .map(|p| spectrum.sample(p as f64 / period as f64))
            .collect();
        Ok(Palette { colors })
    }

    /// The number of samples, which is also the period.
    pub fn period(&self) -> usize {
        self.colors.len()
    }

    /// The sampled colors.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// The color for escape time `t`, wrapping every `period` steps.
    #[inline]
    pub fn lookup(&self, t: u32) -> Rgb {
        self.colors[t as usize % self.colors.len()]
    }
}

impl ColorMap for Palette {
    /// Periodicity, not saturation, decides the look, so the bound is
    /// ignored.
    fn color_for(&self, t: u32, _max_iterations: u32) -> Rgb {
        self.lookup(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::ColorSegment;
    use rand::Rng;

    fn greyscale() -> Spectrum {
        Spectrum::from_segments("GreyScale", &[ColorSegment::new(Rgb::BLACK, Rgb::WHITE, 1.0)])
            .unwrap()
    }

    #[test]
    fn zero_period_is_rejected() {
        match Palette::from_spectrum(&greyscale(), 0) {
            Err(Error::InvalidPalette { period: 0 }) => {}
            other => panic!("expected InvalidPalette, got {:?}", other),
        }
    }

    #[test]
    fn samples_the_spectrum_evenly() {
        let palette = Palette::from_spectrum(&greyscale(), 4).unwrap();
        assert_eq!(palette.period(), 4);
        assert_eq!(
            palette.colors(),
            &[Rgb(0, 0, 0), Rgb(63, 63, 63), Rgb(127, 127, 127), Rgb(191, 191, 191)]
        );
    }

    #[test]
    fn palette_is_periodic() {
        let spectrum = crate::presets::find("blackgoldyellow").unwrap();
        let palette = Palette::from_spectrum(spectrum, 37).unwrap();
        let period = palette.period() as u32;
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let t = rng.gen_range(0..1_000_000);
            assert_eq!(palette.lookup(t), palette.lookup(t + period));
        }
    }

    #[test]
    fn color_map_ignores_the_bound() {
        let palette = Palette::from_spectrum(&greyscale(), 10).unwrap();
        assert_eq!(palette.color_for(3, 10), palette.color_for(3, 1_000));
        assert_eq!(palette.color_for(13, 10), palette.lookup(3));
    }

    #[test]
    fn single_sample_palette_is_constant() {
        let palette = Palette::from_spectrum(&greyscale(), 1).unwrap();
        assert_eq!(palette.lookup(0), Rgb::BLACK);
        assert_eq!(palette.lookup(12345), Rgb::BLACK);
    }
}
