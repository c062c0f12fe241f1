//! The simulated observation environment: realistic FITS headers and
//! sequentially numbered output frames.

use std::{
    f64::consts::PI,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use hifitime::Epoch;
use log::debug;
use ndarray::ArrayView2;

use crate::{
    error::ObsError,
    header::HeaderRecord,
    instrument::{Instrument, Telescope},
    write,
};

/// Positions required by the KPIC pipeline but meaningless for HISPEC. The
/// values are arbitrary; downstream compatibility fixes them.
const ECHLPOS: i64 = 65;
const DISPPOS: i64 = 35;

/// The context of one simulated observing session.
///
/// Borrows an externally-owned [`Instrument`] (and, transitively, its
/// [`Telescope`]); the environment itself holds no mutable state. Repeated
/// header builds read whatever the instrument and telescope currently report,
/// so a caller can step the airmass or exposure time between frames.
#[derive(Debug)]
pub struct ObsEnvironment<'a> {
    instrument: &'a Instrument,
    telescope: &'a Telescope,

    /// Where saved frames land.
    out_dir: PathBuf,

    /// If set, used verbatim instead of the wall clock.
    fixed_time: Option<String>,
    fixed_date: Option<String>,
}

impl<'a> ObsEnvironment<'a> {
    /// Create an environment around `instrument`, saving frames into
    /// `out_dir`.
    ///
    /// `fixed_time`/`fixed_date` pin the simulated UT time and date of
    /// observation; supplying an empty string is a construction error.
    pub fn new<P: AsRef<Path>>(
        instrument: &'a Instrument,
        out_dir: P,
        fixed_time: Option<&str>,
        fixed_date: Option<&str>,
    ) -> Result<ObsEnvironment<'a>, ObsError> {
        if matches!(fixed_time, Some(t) if t.is_empty()) {
            return Err(ObsError::EmptyFixedTime);
        }
        if matches!(fixed_date, Some(d) if d.is_empty()) {
            return Err(ObsError::EmptyFixedDate);
        }

        Ok(ObsEnvironment {
            instrument,
            telescope: instrument.telescope(),
            out_dir: out_dir.as_ref().to_path_buf(),
            fixed_time: fixed_time.map(str::to_string),
            fixed_date: fixed_date.map(str::to_string),
        })
    }

    /// The UT time of observation: the fixed value if one was supplied,
    /// otherwise the current wall clock as `HH:MM:SS.ffffff`.
    pub fn observation_time(&self) -> String {
        match &self.fixed_time {
            Some(t) => t.clone(),
            None => format_ut_time(utc_now()),
        }
    }

    /// The UT date of observation: the fixed value if one was supplied,
    /// otherwise the current wall clock as `YYYY-MM-DD`.
    pub fn observation_date(&self) -> String {
        match &self.fixed_date {
            Some(d) => d.clone(),
            None => format_ut_date(utc_now()),
        }
    }

    /// Build the header for one exposure by extending a copy of `base`.
    ///
    /// The KPIC pipeline consumes these keywords directly: `FRAMENUM`
    /// becomes `FILENUM`, `DATE-OBS` becomes `UTDATE`, `UT` becomes
    /// `UTTIME`, `FIUGNM` becomes `SFNUM`, `FIUDAR` becomes `DAR` and
    /// `FIUCGNAM` becomes `CORONAGRAPH`. `base` is never mutated.
    pub fn build_header(
        &self,
        base: &HeaderRecord,
        frame_number: i64,
        target_name: &str,
        separation: f64,
    ) -> HeaderRecord {
        let mut header = base.clone();

        header.set("UT", self.observation_time());
        header.set("DATE-OBS", self.observation_date());

        // Exposure time in seconds as a plain number, no unit letters.
        // Integral exposures keep a trailing ".0" so the value is
        // byte-identical to what the pipeline has always parsed.
        let exposure_s = self.instrument.exposure_time().total_nanoseconds() as f64 / 1e9;
        let truitime = if exposure_s.fract() == 0.0 {
            format!("{exposure_s:.1}")
        } else {
            format!("{exposure_s}")
        };
        header.set("TRUITIME", truitime);

        header.set("FILTER", self.instrument.current_filter.as_str());
        // Supposed to be the coronagraph; the mode stands in until a
        // dedicated field exists.
        header.set("FIUCGNAM", self.instrument.mode.as_str());

        // The caller owns the file-naming situation.
        header.set("FRAMENUM", frame_number);
        // Science frame number; the same value under the key the SFNUM
        // consumer expects.
        header.set("FIUGNM", frame_number);
        header.set("TARGNAME", target_name);
        // Placeholder until the fibre-target separation comes from
        // instrument state.
        header.set("FIUDSEP", separation);

        let airmass = self.telescope.airmass();
        header.set("AIRMASS", airmass);

        // airmass = sec(zenith angle). Poor above airmass ~2, but it is the
        // convention the downstream pipeline uses.
        let zenith_deg = 180.0 * (1.0 / airmass).acos() / PI;
        header.set("EL", 90.0 - zenith_deg);
        // DAR proxy: about 30 when the airmass is 1.2.
        header.set("FIUDAR", zenith_deg);

        header.set("ECHLPOS", ECHLPOS);
        header.set("DISPPOS", DISPPOS);

        header.set("INST", self.instrument.name.as_str());
        header.set("OBSMODE", self.instrument.mode.as_str());

        header
    }

    /// Save a 2-D frame into the output directory under the next sequential
    /// name for `save_name`'s target stem, with a freshly built header.
    /// Returns the path written.
    ///
    /// The stem is everything before the first `.` (save names with more
    /// than one `.` are discouraged). The frame number is the *count* of
    /// `*.fits` files already in the directory whose base name matches the
    /// stem, so deleting earlier frames makes the next save reuse, and
    /// silently overwrite, an existing suffix. More than 999 frames per stem
    /// widens the suffix past 3 digits.
    pub fn save_with_header(
        &self,
        data: ArrayView2<f64>,
        save_name: &str,
    ) -> Result<PathBuf, ObsError> {
        let stem = save_name.split('.').next().unwrap_or(save_name);
        let frame_number = self.count_saved_frames(stem)?;

        let real_name = format!("{stem}_{frame_number:03}.fits");
        let path = self.out_dir.join(&real_name);
        debug!(
            "Saving frame {frame_number} of target '{stem}' to {}",
            path.display()
        );

        let header = self.build_header(&HeaderRecord::new(), frame_number, stem, 0.0);
        write::write_image(&path, data, &header, true)?;
        Ok(path)
    }

    /// Count the `*.fits` files in the output directory already belonging to
    /// `stem`. Recomputed from the directory contents on every save, never
    /// cached.
    fn count_saved_frames(&self, stem: &str) -> Result<i64, ObsError> {
        let mut count = 0;
        for entry in fs::read_dir(&self.out_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.ends_with(".fits") {
                continue;
            }
            let base = name.split('.').next().unwrap_or(name.as_ref());
            if strip_frame_suffix(base) == stem {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Drop the reserved 4-character frame suffix (`_NNN`) off a saved file's
/// base name. Names shorter than the suffix reduce to the empty string.
fn strip_frame_suffix(base: &str) -> &str {
    match base.char_indices().rev().nth(3) {
        Some((i, _)) => &base[..i],
        None => "",
    }
}

/// The current instant, UTC.
fn utc_now() -> Epoch {
    let since_unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Epoch::from_unix_seconds(since_unix.as_secs_f64())
}

/// `HH:MM:SS.ffffff`, 24-hour, locale-independent.
fn format_ut_time(epoch: Epoch) -> String {
    let (_, _, _, hours, minutes, seconds, nanos) = epoch.to_gregorian_utc();
    format!(
        "{hours:02}:{minutes:02}:{seconds:02}.{:06}",
        nanos / 1000
    )
}

/// `YYYY-MM-DD`.
fn format_ut_date(epoch: Epoch) -> String {
    let (year, month, day, ..) = epoch.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02}")
}
