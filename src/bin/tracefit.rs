//! Command-line front end.
//!
//! ```bash
//! $ tracefit reconstruct --input satellite_tracks.csv --output orbits.json
//! $ tracefit refine --orbits orbits.json --catalog gnss.json --output orbits_updated.json
//! ```
//!
//! The log level is read from `TRACEFIT_LOG` (`INFO` when unset).

use std::env::{set_var, var};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use log::{error, info};
use tracefit::{
    constants::{
        DEFAULT_OBSERVER_ALT_KM, DEFAULT_OBSERVER_LAT, DEFAULT_OBSERVER_LON, MAX_PASS_GAP_SECONDS,
        MAX_UNIQUE_SATELLITES, MIN_PASS_LENGTH, VISUAL_EARTH_RADIUS,
    },
    observers::Observer,
    orbit_plane::ReconstructionParams,
    refine::refine_files,
    tracefit::Tracefit,
    TracefitError,
};

const LOG_VAR: &str = "TRACEFIT_LOG";

#[derive(Debug, Parser)]
#[command(name = "tracefit", version, about = "GNSS orbital planes from az/el tracking logs")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconstruct one circular orbit per satellite from a tracking log
    Reconstruct {
        /// Tracking log (CSV, timestamps in local time)
        #[arg(long, default_value = "satellite_tracks.csv")]
        input: Utf8PathBuf,

        /// Orbits document to write
        #[arg(long, default_value = "orbits.json")]
        output: Utf8PathBuf,

        /// Observer latitude in degrees
        #[arg(long, default_value_t = DEFAULT_OBSERVER_LAT, allow_negative_numbers = true)]
        lat: f64,

        /// Observer longitude in degrees, east positive
        #[arg(long, default_value_t = DEFAULT_OBSERVER_LON, allow_negative_numbers = true)]
        lon: f64,

        /// Observer altitude in km
        #[arg(long, default_value_t = DEFAULT_OBSERVER_ALT_KM, allow_negative_numbers = true)]
        alt_km: f64,

        /// Minimum number of samples of the longest pass
        #[arg(long, default_value_t = MIN_PASS_LENGTH)]
        min_pass_length: usize,

        /// Largest gap in seconds between two samples of a pass
        #[arg(long, default_value_t = MAX_PASS_GAP_SECONDS)]
        max_gap_seconds: i64,

        /// Maximum number of distinct satellites tracked
        #[arg(long, default_value_t = MAX_UNIQUE_SATELLITES)]
        max_satellites: usize,
    },

    /// Replace nominal radii with semi-major axes from an orbital-element catalog
    Refine {
        /// Orbits document to refine
        #[arg(long, default_value = "orbits.json")]
        orbits: Utf8PathBuf,

        /// Catalog (JSON array with OBJECT_NAME and MEAN_MOTION)
        #[arg(long, default_value = "gnss.json")]
        catalog: Utf8PathBuf,

        /// Refined document to write
        #[arg(long, default_value = "orbits_updated.json")]
        output: Utf8PathBuf,
    },
}

fn run(command: Command) -> Result<(), TracefitError> {
    match command {
        Command::Reconstruct {
            input,
            output,
            lat,
            lon,
            alt_km,
            min_pass_length,
            max_gap_seconds,
            max_satellites,
        } => {
            let observer = Observer::new(lat, lon, alt_km, None)?;
            let params = ReconstructionParams::builder()
                .min_pass_length(min_pass_length)
                .max_pass_gap_seconds(max_gap_seconds)
                .max_unique_satellites(max_satellites)
                .build()?;
            info!("{params}");

            let document = Tracefit::new(observer, params).run_file(&input)?;
            document.to_path(&output)?;
            info!(
                "Wrote {} orbits for {} satellites to {output}",
                document.orbits.len(),
                document.available_sats.len()
            );
            Ok(())
        }
        Command::Refine {
            orbits,
            catalog,
            output,
        } => refine_files(&orbits, &catalog, &output, VISUAL_EARTH_RADIUS).map(|_| ()),
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }

    if pretty_env_logger::try_init_custom_env(LOG_VAR).is_err() {
        eprintln!("could not init logger");
    }

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("tracefit: {err}");
            ExitCode::FAILURE
        }
    }
}
