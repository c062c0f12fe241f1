//! Simulated-observation support for the HISPEC instrument design work:
//! synthesize realistic FITS headers for simulated exposures and save the
//! frames under sequential names so downstream pipeline tooling can consume
//! them as if they came off the mountain.

pub mod env;
pub mod error;
pub mod header;
pub mod instrument;
pub mod write;

pub use env::ObsEnvironment;
pub use error::ObsError;
pub use header::{HeaderRecord, HeaderValue};
pub use instrument::{Instrument, Telescope};
