// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors, and the one trait the renderer needs from anything that
//! turns escape times into them.

/// A 24-bit color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// White.
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Packs the channels as 0xRRGGBB.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }

    /// The channels in red, green, blue order.
    pub fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

/// Maps an escape time `t` to a color.  `max_iterations` is the bound
/// the render used; implementations that color by proportion use it,
/// periodic ones ignore it.
pub trait ColorMap {
    /// The color for escape time `t`.
    fn color_for(&self, t: u32, max_iterations: u32) -> Rgb;
}

impl<'a, C: ColorMap + ?Sized> ColorMap for &'a C {
    fn color_for(&self, t: u32, max_iterations: u32) -> Rgb {
        (**self).color_for(t, max_iterations)
    }
}
