//! Interfaces with GAMESS result files.
//!
//! A GAMESS calculation with effective fragment potentials leaves its converged Fock matrix and
//! molecular-orbital coefficients in an HDF5 file:
//!
//! * group `EFPcalc`,
//! * dataset `CONVERGED TOTAL FOCK MATRIX`: the packed lower triangle of the Fock matrix, of length
//!   $`n_{\mathrm{AO}}(n_{\mathrm{AO}} + 1)/2`$,
//! * dataset `MO_coeff`: the coefficients, of shape $`(n_{\mathrm{MO}}, n_{\mathrm{AO}})`$.

use std::path::PathBuf;

use derive_builder::Builder;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::EfpGamessError;

#[cfg(feature = "gamess")]
pub(crate) mod hdf5;

/// Default name of the GAMESS result file.
pub const DEFAULT_GAMESS_H5_FILENAME: &str = "form.h5";

/// Default name of the group holding the EFP calculation results.
pub const DEFAULT_EFPCALC_GROUP: &str = "EFPcalc";

/// Default name of the dataset holding the packed Fock matrix.
pub const DEFAULT_FOCK_DATASET: &str = "CONVERGED TOTAL FOCK MATRIX";

/// Default name of the dataset holding the molecular-orbital coefficients.
pub const DEFAULT_MO_COEFF_DATASET: &str = "MO_coeff";

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Matrices of a GAMESS EFP calculation
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Structure containing the matrices of a GAMESS EFP calculation, in GAMESS ordering and exactly
/// as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamessEfpCalc {
    /// The packed lower triangle of the Fock matrix, row by row.
    pub fock_packed: Array1<f64>,

    /// The molecular-orbital coefficients, one row per molecular orbital.
    pub mo_coefficients: Array2<f64>,
}

/// Trait for sources of GAMESS EFP calculation results.
pub trait EfpCalcSource {
    /// Reads the Fock and coefficient matrices.
    fn read_efp_calc(&self) -> Result<GamessEfpCalc, EfpGamessError>;
}

impl EfpCalcSource for GamessEfpCalc {
    fn read_efp_calc(&self) -> Result<GamessEfpCalc, EfpGamessError> {
        Ok(self.clone())
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Source: GAMESS HDF5 file
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// A serialisable/deserialisable structure locating the results of a GAMESS EFP calculation in
/// an HDF5 file.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamessH5Source {
    /// The path to the GAMESS HDF5 file.
    #[builder(setter(into))]
    pub path: PathBuf,

    /// The group holding the datasets.
    #[builder(setter(into), default = "DEFAULT_EFPCALC_GROUP.to_string()")]
    #[serde(default = "default_efpcalc_group")]
    pub group: String,

    /// The dataset holding the packed Fock matrix.
    #[builder(setter(into), default = "DEFAULT_FOCK_DATASET.to_string()")]
    #[serde(default = "default_fock_dataset")]
    pub fock_dataset: String,

    /// The dataset holding the molecular-orbital coefficients.
    #[builder(setter(into), default = "DEFAULT_MO_COEFF_DATASET.to_string()")]
    #[serde(default = "default_mo_coeff_dataset")]
    pub mo_coefficients_dataset: String,
}

impl GamessH5Source {
    /// Returns a builder to construct a new [`GamessH5Source`].
    pub fn builder() -> GamessH5SourceBuilder {
        GamessH5SourceBuilder::default()
    }

    /// Locates the default group and datasets in the file at `path`.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for GamessH5Source {
    fn default() -> Self {
        GamessH5Source {
            path: PathBuf::from(DEFAULT_GAMESS_H5_FILENAME),
            group: default_efpcalc_group(),
            fock_dataset: default_fock_dataset(),
            mo_coefficients_dataset: default_mo_coeff_dataset(),
        }
    }
}

fn default_efpcalc_group() -> String {
    DEFAULT_EFPCALC_GROUP.to_string()
}

fn default_fock_dataset() -> String {
    DEFAULT_FOCK_DATASET.to_string()
}

fn default_mo_coeff_dataset() -> String {
    DEFAULT_MO_COEFF_DATASET.to_string()
}
