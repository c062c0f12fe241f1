//! The observation-state collaborators an [`crate::ObsEnvironment`] reads.
//!
//! These mirror the psisim-style instrument/telescope objects the simulated
//! observations are driven with: the environment only ever borrows them, and
//! the "current" quantities (airmass, exposure time) may be updated between
//! exposures while those borrows are live.

use std::cell::Cell;

use hifitime::Duration;

/// A telescope whose current pointing state is summarised by its airmass.
#[derive(Debug)]
pub struct Telescope {
    /// e.g. "Keck I".
    pub name: String,

    /// Primary mirror diameter \[metres\]. Not used for header synthesis,
    /// but part of the simulated telescope description.
    pub diameter_m: f64,

    /// The current airmass of the pointing. Dimensionless, >= 1.0 at the
    /// zenith in principle (not enforced).
    airmass: Cell<f64>,
}

impl Telescope {
    pub fn new<S: Into<String>>(name: S, diameter_m: f64, airmass: f64) -> Telescope {
        Telescope {
            name: name.into(),
            diameter_m,
            airmass: Cell::new(airmass),
        }
    }

    pub fn airmass(&self) -> f64 {
        self.airmass.get()
    }

    /// Update the current airmass, e.g. as a simulated target tracks across
    /// the sky between exposures.
    pub fn set_airmass(&self, airmass: f64) {
        self.airmass.set(airmass);
    }
}

/// A spectrograph with its current configuration and its owning telescope.
#[derive(Debug)]
pub struct Instrument {
    /// e.g. "hispec".
    pub name: String,

    /// Observing mode label. Also stands in for the coronagraph name until
    /// a dedicated field exists (VFN, MDA or none).
    pub mode: String,

    /// The filter currently in the beam.
    pub current_filter: String,

    /// The exposure time of the next frame.
    exposure_time: Cell<Duration>,

    telescope: Telescope,
}

impl Instrument {
    pub fn new<S: Into<String>>(
        name: S,
        mode: S,
        current_filter: S,
        exposure_time: Duration,
        telescope: Telescope,
    ) -> Instrument {
        Instrument {
            name: name.into(),
            mode: mode.into(),
            current_filter: current_filter.into(),
            exposure_time: Cell::new(exposure_time),
            telescope,
        }
    }

    /// The telescope this instrument is mounted on.
    pub fn telescope(&self) -> &Telescope {
        &self.telescope
    }

    pub fn exposure_time(&self) -> Duration {
        self.exposure_time.get()
    }

    pub fn set_exposure_time(&self, exposure_time: Duration) {
        self.exposure_time.set(exposure_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_state_updates_through_shared_borrows() {
        let telescope = Telescope::new("Keck I", 9.96, 1.0);
        let instrument = Instrument::new(
            "hispec",
            "vfn",
            "yJ",
            Duration::from_seconds(60.0),
            telescope,
        );

        let tel = instrument.telescope();
        tel.set_airmass(1.4);
        instrument.set_exposure_time(Duration::from_seconds(120.0));

        assert_eq!(instrument.telescope().airmass(), 1.4);
        assert_eq!(instrument.exposure_time(), Duration::from_seconds(120.0));
    }
}
