use std::path::PathBuf;

use clap::{AppSettings, Parser};
use hifitime::Duration;
use log::{debug, info};
use ndarray::Array2;

use hispec_simobs::{Instrument, ObsEnvironment, ObsError, Telescope};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// The directory to save simulated frames into. Created if missing.
    out_dir: PathBuf,

    /// The save name; everything before the first '.' is the target stem
    /// used for sequential numbering.
    #[clap(short, long, default_value = "Headed_data.fits")]
    save_name: String,

    /// How many frames to save.
    #[clap(short, long, default_value = "1")]
    num_frames: usize,

    /// Frame width [pixels].
    #[clap(long, default_value = "64")]
    width: usize,

    /// Frame height [pixels].
    #[clap(long, default_value = "64")]
    height: usize,

    /// The airmass of the simulated pointing.
    #[clap(long, default_value = "1.2")]
    airmass: f64,

    /// The exposure time [seconds].
    #[clap(long, default_value = "100")]
    exptime: f64,

    /// The filter in the beam.
    #[clap(long, default_value = "yJ")]
    filter: String,

    /// The observing mode. Doubles as the coronagraph label (VFN, MDA or
    /// none) until a dedicated field exists.
    #[clap(long, default_value = "vfn")]
    mode: String,

    /// Fix the UT time of observation (HH:MM:SS.ffffff) instead of using
    /// the wall clock.
    #[clap(long)]
    ut: Option<String>,

    /// Fix the UT date of observation (YYYY-MM-DD) instead of using the
    /// wall clock.
    #[clap(long)]
    date: Option<String>,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), ObsError> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    std::fs::create_dir_all(&args.out_dir)?;

    let telescope = Telescope::new("Keck I", 9.96, args.airmass);
    let instrument = Instrument::new(
        "hispec",
        args.mode.as_str(),
        args.filter.as_str(),
        Duration::from_seconds(args.exptime),
        telescope,
    );
    let env = ObsEnvironment::new(
        &instrument,
        &args.out_dir,
        args.ut.as_deref(),
        args.date.as_deref(),
    )?;

    let frame = synthetic_frame(args.height, args.width);
    for i in 0..args.num_frames {
        debug!("Saving frame {i}");
        let path = env.save_with_header(frame.view(), &args.save_name)?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}

/// A flat bias level with a mild illumination gradient; enough structure for
/// pipeline smoke tests.
fn synthetic_frame(height: usize, width: usize) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(y, x)| {
        1000.0 + x as f64 + 0.5 * y as f64
    })
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        _ => builder.filter_level(log::LevelFilter::Trace),
    };
    builder.init();
}
