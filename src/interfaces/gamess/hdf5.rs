//! Reading of GAMESS EFP calculation results from HDF5 files.

use hdf5;
use log;
use ndarray::Array1;

use crate::error::EfpGamessError;
use crate::interfaces::gamess::{EfpCalcSource, GamessEfpCalc, GamessH5Source};

#[cfg(test)]
#[path = "hdf5_tests.rs"]
mod hdf5_tests;

impl GamessH5Source {
    fn open_group(&self) -> Result<hdf5::Group, EfpGamessError> {
        if !self.path.is_file() {
            return Err(EfpGamessError::MissingInputFile(self.path.clone()));
        }
        let f = hdf5::File::open(&self.path).map_err(|err| {
            log::error!("{err}");
            EfpGamessError::MissingInputFile(self.path.clone())
        })?;
        f.group(&self.group)
            .map_err(|_| EfpGamessError::MissingDataset {
                group: self.group.clone(),
                dataset: String::new(),
            })
    }

    fn open_dataset(
        &self,
        group: &hdf5::Group,
        name: &str,
    ) -> Result<hdf5::Dataset, EfpGamessError> {
        group
            .dataset(name)
            .map_err(|_| EfpGamessError::MissingDataset {
                group: self.group.clone(),
                dataset: name.to_string(),
            })
    }
}

impl EfpCalcSource for GamessH5Source {
    /// Reads the packed Fock matrix and the coefficients from the HDF5 file.
    ///
    /// The Fock dataset is flattened in storage order whatever its shape. The coefficient dataset
    /// must be two-dimensional.
    ///
    /// # Errors
    ///
    /// * [`EfpGamessError::MissingInputFile`] if the file does not exist or cannot be opened,
    /// * [`EfpGamessError::MissingDataset`] if the group or either dataset is absent,
    /// * [`EfpGamessError::MalformedInput`] if a dataset cannot be read as real numbers of the
    ///   expected dimensionality.
    fn read_efp_calc(&self) -> Result<GamessEfpCalc, EfpGamessError> {
        log::debug!(
            "Reading group `{}` of GAMESS file `{}`.",
            self.group,
            self.path.display()
        );
        let group = self.open_group()?;

        let fock_packed = self
            .open_dataset(&group, &self.fock_dataset)?
            .read_raw::<f64>()
            .map(Array1::from_vec)
            .map_err(|err| {
                EfpGamessError::MalformedInput(format!(
                    "dataset `{}` cannot be read as real numbers: {err}",
                    self.fock_dataset
                ))
            })?;

        let mo_coefficients = self
            .open_dataset(&group, &self.mo_coefficients_dataset)?
            .read_2d::<f64>()
            .map_err(|err| {
                EfpGamessError::MalformedInput(format!(
                    "dataset `{}` cannot be read as a two-dimensional array of real numbers: {err}",
                    self.mo_coefficients_dataset
                ))
            })?;

        log::debug!(
            "Read {} packed Fock entries and MO coefficients of shape {:?}.",
            fock_packed.len(),
            mo_coefficients.shape()
        );
        Ok(GamessEfpCalc {
            fock_packed,
            mo_coefficients,
        })
    }
}
