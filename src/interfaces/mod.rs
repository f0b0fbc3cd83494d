//! Interfaces between efp-gamess and other software.

use anyhow;

pub mod cli;
pub mod gamess;
#[cfg(feature = "gamess")]
pub mod input;

/// Trait for handling an input specification.
pub trait InputHandle {
    /// Handles the input section and runs appropriate calculations.
    fn handle(&self) -> Result<(), anyhow::Error>;
}
