//! Writes a synthetic set of the five `.dat` series into `data/`, shaped
//! like the historical trends, so the chart can be rendered without the
//! collected dataset.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

const FIRST_YEAR: u32 = 1971;
const LAST_YEAR: u32 = 2020;
const MULTICORE_YEAR: f64 = 2004.25;

/// Deterministic jitter source (splitmix64).
struct Jitter {
    state: u64,
}

impl Jitter {
    fn new(seed: u64) -> Self {
        Jitter { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative noise in `[1 - spread, 1 + spread)`.
    fn factor(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.unit() - 1.0)
    }
}

/// Trend curves: value for a (fractional) year, before noise.
fn transistors(year: f64) -> f64 {
    2.3 * 2f64.powf((year - 1971.0) / 2.1)
}

fn specint(year: f64) -> f64 {
    if year < MULTICORE_YEAR {
        0.002 * 10f64.powf((year - 1978.0) * 0.2)
    } else {
        specint(MULTICORE_YEAR - 0.01) * 1.06f64.powf(year - MULTICORE_YEAR)
    }
}

fn frequency(year: f64) -> f64 {
    if year < MULTICORE_YEAR {
        0.74 * 10f64.powf((year - 1971.0) * 0.108)
    } else {
        3000.0 + 50.0 * (year - MULTICORE_YEAR)
    }
}

fn watts(year: f64) -> f64 {
    if year < MULTICORE_YEAR {
        0.8 * 10f64.powf((year - 1971.0) * 0.065)
    } else {
        110.0
    }
}

fn cores(year: f64) -> f64 {
    if year < MULTICORE_YEAR {
        1.0
    } else {
        2f64.powf(((year - MULTICORE_YEAR) / 2.7).floor() + 1.0)
    }
}

fn write_series(
    dir: &Path,
    name: &str,
    first_year: u32,
    curve: fn(f64) -> f64,
    integral: bool,
    jitter: &mut Jitter,
) -> Result<usize> {
    let mut body = String::new();
    let mut count = 0;
    for year in first_year..=LAST_YEAR {
        // Not every year has a data point.
        if jitter.unit() < 0.3 {
            continue;
        }
        let year = f64::from(year) + (jitter.unit() * 4.0).floor() / 4.0;
        let value = curve(year) * jitter.factor(0.25);
        if integral {
            writeln!(body, "{year} {}", value.round().max(1.0))?;
        } else {
            writeln!(body, "{year} {value:.3}")?;
        }
        count += 1;
    }

    let path = dir.join(name);
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(count)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;

    let mut jitter = Jitter::new(42);
    let series: [(&str, u32, fn(f64) -> f64, bool); 5] = [
        ("transistors.dat", FIRST_YEAR, transistors, false),
        ("specint.dat", 1978, specint, false),
        ("frequency.dat", FIRST_YEAR, frequency, false),
        ("watts.dat", FIRST_YEAR, watts, false),
        ("cores.dat", FIRST_YEAR, cores, true),
    ];

    for (name, first_year, curve, integral) in series {
        let count = write_series(dir, name, first_year, curve, integral, &mut jitter)?;
        info!("wrote {count} points to {}", dir.join(name).display());
    }
    Ok(())
}
