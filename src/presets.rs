// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The named color spectra.  They are built the first time anything
//! asks for one and shared read-only after that.

use std::sync::OnceLock;

use crate::color::Rgb;
use crate::spectrum::{ColorSegment, Spectrum};

/// The lookup keys of the presets, in display order.
pub const PRESET_KEYS: [&str; 6] = [
    "greyscale",
    "rainbow",
    "blackgoldyellow",
    "blackyellowpurple",
    "blackyellowblue",
    "redorange",
];

static PRESETS: OnceLock<Vec<(&'static str, Spectrum)>> = OnceLock::new();

/// Every preset with its key, in display order.
pub fn all() -> &'static [(&'static str, Spectrum)] {
    PRESETS.get_or_init(build)
}

/// The preset with this key, ignoring case.
pub fn find(key: &str) -> Option<&'static Spectrum> {
    all()
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, spectrum)| spectrum)
}

fn seg(start: Rgb, end: Rgb, weight: f64) -> ColorSegment {
    ColorSegment::new(start, end, weight)
}

fn build() -> Vec<(&'static str, Spectrum)> {
    let black = Rgb::BLACK;
    let white = Rgb::WHITE;

    let greyscale = vec![seg(black, white, 1.0)];

    let bands = [
        Rgb(255, 0, 0),
        Rgb(255, 127, 0),
        Rgb(255, 255, 0),
        Rgb(0, 255, 0),
        Rgb(0, 0, 255),
        Rgb(75, 0, 130),
        Rgb(148, 0, 211),
    ];
    let rainbow: Vec<ColorSegment> = bands.windows(2).map(|w| seg(w[0], w[1], 1.0)).collect();

    let (gold1, gold2, gold3) = (Rgb(111, 66, 43), Rgb(158, 90, 43), Rgb(216, 151, 41));
    let pale = Rgb(230, 230, 230);
    let black_gold_yellow = vec![
        seg(black, gold1, 1.0),
        seg(gold1, gold2, 0.7),
        seg(gold2, gold3, 1.0),
        seg(gold3, pale, 0.2),
        seg(pale, gold2, 1.2),
        seg(gold2, black, 0.5),
    ];

    let (amber, purple) = (Rgb(255, 127, 0), Rgb(127, 0, 127));
    let black_yellow_purple = vec![
        seg(black, amber, 1.0),
        seg(amber, purple, 1.0),
        seg(purple, black, 0.2),
    ];

    let (orange, blue, dark_blue) = (Rgb(255, 200, 0), Rgb(0, 0, 255), Rgb(0, 0, 128));
    let black_yellow_blue = vec![
        seg(black, orange, 1.0),
        seg(orange, white, 1.0),
        seg(white, blue, 1.0),
        seg(blue, dark_blue, 1.0),
        seg(dark_blue, black, 0.05),
    ];

    let (red1, red2, red3, red4) = (
        Rgb(173, 21, 13),
        Rgb(240, 99, 64),
        Rgb(215, 0, 0),
        Rgb(155, 0, 0),
    );
    let flame = Rgb(245, 137, 50);
    let red_orange = vec![
        seg(black, red1, 0.2),
        seg(red1, red2, 0.2),
        seg(red2, white, 0.2),
        seg(white, red3, 0.5),
        seg(red3, red4, 0.3),
        seg(red4, flame, 0.2),
    ];

    let named = vec![
        ("GreyScale", greyscale),
        ("Rainbow", rainbow),
        ("Black and Gold", black_gold_yellow),
        ("Yellow and Purple", black_yellow_purple),
        ("Yellow and Blue", black_yellow_blue),
        ("Fiery", red_orange),
    ];
    PRESET_KEYS
        .iter()
        .zip(named)
        .map(|(&key, (name, segments))| {
            (key, Spectrum::from_valid_segments(name.to_string(), &segments))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves() {
        for key in PRESET_KEYS.iter() {
            assert!(find(key).is_some(), "missing preset {}", key);
        }
        assert_eq!(all().len(), PRESET_KEYS.len());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find("GreyScale").map(|s| s.name()), Some("GreyScale"));
        assert_eq!(find("REDORANGE").map(|s| s.name()), Some("Fiery"));
        assert!(find("ultraviolet").is_none());
    }

    #[test]
    fn registry_is_built_once() {
        let first = find("rainbow").unwrap() as *const Spectrum;
        let second = find("rainbow").unwrap() as *const Spectrum;
        assert_eq!(first, second);
    }

    #[test]
    fn presets_cover_the_unit_interval() {
        for (key, spectrum) in all() {
            assert_eq!(spectrum.offsets()[0], 0.0, "{}", key);
            assert_eq!(*spectrum.offsets().last().unwrap(), 1.0, "{}", key);
            spectrum.sample(0.0);
            spectrum.sample(0.5);
            spectrum.sample(1.0);
        }
    }

    #[test]
    fn greyscale_runs_black_to_white() {
        let grey = find("greyscale").unwrap();
        assert_eq!(grey.sample(0.0), Rgb::BLACK);
        assert_eq!(grey.sample(1.0), Rgb::WHITE);
    }
}
