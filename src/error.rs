//! Crate-wide error type.
//!
//! Every failure is surfaced to the direct caller; nothing is retried or
//! logged-and-continued.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObsError {
    #[error("a fixed UT time was supplied but it is empty")]
    EmptyFixedTime,

    #[error("a fixed UT date was supplied but it is empty")]
    EmptyFixedDate,

    #[error(transparent)]
    Fits(#[from] fitsio::errors::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
