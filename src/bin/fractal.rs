extern crate clap;
extern crate env_logger;
extern crate escapetime;
#[macro_use]
extern crate failure;
extern crate image;
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{value_t, App, Arg, ArgMatches};
use escapetime::presets::{self, PRESET_KEYS};
use escapetime::{ColorMap, FractalRenderer, Kernel, Palette, Spectrum, ViewParameters};
use log::{info, warn};
use num::Complex;
use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;
use std::time::{Duration, Instant};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_complex(s: &str, bound: Option<f64>, err: &str) -> Result<(), String> {
    match parse_complex(s) {
        Some(c) if !(c.re.is_finite() && c.im.is_finite()) => Err(err.to_string()),
        Some(c) => match bound {
            Some(b) if c.re.abs() > b || c.im.abs() > b => Err(format!(
                "{}: both parts must lie between -{} and {}",
                err, b, b
            )),
            _ => Ok(()),
        },
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const SCALE: &str = "scale";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const JULIA: &str = "julia";
const SPECTRUM: &str = "spectrum";
const SPECTRUM_FILE: &str = "spectrum-file";
const PERIOD: &str = "period";
const TIMEOUT: &str = "timeout";
const LIST: &str = "list-spectra";

fn args<'a>() -> ArgMatches<'a> {
    App::new("fractal")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(LIST)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("512")
                .validator(|s| {
                    validate_range(
                        &s,
                        1_usize,
                        16_384,
                        "Could not parse grid size",
                        "Grid size must be between 1 and 16384",
                    )
                })
                .help("Pixels along each side of the square image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_complex(&s, None, "Could not parse center point"))
                .help("Center of the view on the complex plane, as x,y"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .short("z")
                .takes_value(true)
                .default_value("4.0")
                .validator(|s| match f64::from_str(&s) {
                    Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
                    Ok(_) => Err("Scale must be a positive number".to_string()),
                    Err(_) => Err("Could not parse scale".to_string()),
                })
                .help("Width of the view in complex units"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        0_u32,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 0 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1_usize,
                        256,
                        "Could not parse thread count",
                        "Thread count must be between 1 and 256",
                    )
                })
                .help("Number of worker threads [default: number of CPUs]"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_complex(&s, Some(2.0), "Invalid Julia parameters"))
                .help("Render the Julia set for this parameter, as cx,cy"),
        )
        .arg(
            Arg::with_name(SPECTRUM)
                .long(SPECTRUM)
                .short("p")
                .takes_value(true)
                .case_insensitive(true)
                .possible_values(&PRESET_KEYS)
                .default_value("greyscale")
                .help("Named color spectrum"),
        )
        .arg(
            Arg::with_name(SPECTRUM_FILE)
                .long(SPECTRUM_FILE)
                .short("f")
                .takes_value(true)
                .help("Read the color spectrum from a file of 'r g b' lines; overrides --spectrum"),
        )
        .arg(
            Arg::with_name(PERIOD)
                .long(PERIOD)
                .short("r")
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        0_usize,
                        1_000_000,
                        "Could not parse sample rate",
                        "Sample rate must be between 0 and 1000000",
                    )
                })
                .help("Palette period; 0 colors straight from the spectrum"),
        )
        .arg(
            Arg::with_name(TIMEOUT)
                .long(TIMEOUT)
                .short("T")
                .takes_value(true)
                .validator(|s| match f64::from_str(&s) {
                    Ok(v) if v >= 0.0 && v <= 1_000_000.0 => Ok(()),
                    _ => Err("Timeout must be between 0 and 1000000 seconds".to_string()),
                })
                .help("Give up on columns not started within this many seconds"),
        )
        .arg(
            Arg::with_name(LIST)
                .long(LIST)
                .short("l")
                .help("List the named spectra and exit"),
        )
        .get_matches()
}

fn spectrum(matches: &ArgMatches) -> Result<Spectrum, failure::Error> {
    if let Some(path) = matches.value_of(SPECTRUM_FILE) {
        let file = File::open(path)?;
        return Ok(Spectrum::from_rgb_map(path, BufReader::new(file))?);
    }
    let key = matches.value_of(SPECTRUM).unwrap_or("greyscale");
    presets::find(key)
        .cloned()
        .ok_or_else(|| format_err!("Unknown spectrum '{}'", key))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let size = value_t!(matches, SIZE, usize)?;
    let scale = value_t!(matches, SCALE, f64)?;
    let iterations = value_t!(matches, ITERATIONS, u32)?;
    let period = value_t!(matches, PERIOD, usize)?;
    let threads = match matches.value_of(THREADS) {
        Some(_) => value_t!(matches, THREADS, usize)?,
        None => num_cpus::get(),
    };
    let center = matches
        .value_of(CENTER)
        .and_then(parse_complex)
        .ok_or_else(|| format_err!("Error parsing center point"))?;
    let kernel = match matches.value_of(JULIA) {
        Some(s) => Kernel::julia(
            parse_complex(s).ok_or_else(|| format_err!("Error parsing Julia parameters"))?,
        ),
        None => Kernel::Mandelbrot,
    };

    let spectrum = spectrum(matches)?;
    let colors: Box<dyn ColorMap> = if period == 0 {
        Box::new(spectrum)
    } else {
        Box::new(Palette::from_spectrum(&spectrum, period)?)
    };

    let view = ViewParameters::new(center, scale, iterations, size)?;
    let mut renderer = FractalRenderer::new(threads)?;
    if matches.is_present(TIMEOUT) {
        renderer = renderer.with_timeout(Duration::from_secs_f64(value_t!(matches, TIMEOUT, f64)?));
    }

    let started = Instant::now();
    let rendering = renderer.render(&view, kernel, colors.as_ref())?;
    let elapsed = started.elapsed();
    let n = rendering.grid_size();
    if n != size {
        warn!("Image enlarged from {0}x{0} to {1}x{1}", size, n);
    }
    if !rendering.is_complete() {
        warn!("Render did not finish; unfinished columns are left blank");
    }

    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| format_err!("No output file given"))?;
    image::save_buffer(output, rendering.pixels(), n as u32, n as u32, image::ColorType::Rgb8)?;
    info!("Rendered {} in {:.3}s", kernel, elapsed.as_secs_f64());
    info!("Wrote {}x{} {} image to {}", n, n, kernel, output);
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();

    if matches.is_present(LIST) {
        for (key, spectrum) in presets::all() {
            println!("{:<20}{}", key, spectrum.name());
        }
        return;
    }

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
