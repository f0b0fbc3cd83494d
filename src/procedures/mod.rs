//! Host-callable procedures.
//!
//! [`register_procedures`] adds `efp_gamess` to the energy procedures of a host, so that an energy
//! computation named `efp_gamess` runs [`run_efp_gamess`].

use anyhow::{self, Context};

use crate::drivers::basis_reordering::{
    BasisReorderingDriver, BasisReorderingParams, BasisReorderingResult,
};
use crate::drivers::EfpGamessDriver;
use crate::error::EfpGamessError;
use crate::host::{
    ComputationKind, Host, ProcedureOptions, ProcedureTable, TransformationMatrixProvider,
    Wavefunction,
};
use crate::interfaces::gamess::{GamessH5Source, DEFAULT_GAMESS_H5_FILENAME};
use crate::io::format::{efpg_error, efpg_output, efpg_warn};

#[cfg(test)]
#[path = "procedures_tests.rs"]
mod procedures_tests;

/// Name under which the basis-reordering procedure is registered.
pub const EFP_GAMESS_PROCEDURE: &str = "efp_gamess";

/// Option key for the output verbosity.
pub const PRINT_OPTION: &str = "print";

/// Option key for the name of the GAMESS HDF5 file.
pub const HDF5_FILENAME_OPTION: &str = "hdf5_filename";

/// Replaces the alpha Fock and coefficient matrices of a reference wavefunction with those of a
/// GAMESS EFP calculation, reordered into the host basis.
///
/// # Arguments
///
/// * `host` - The host program.
/// * `name` - The procedure name, also passed to the reference SCF.
/// * `ref_wfn` - The reference wavefunction. If `None`, a reference SCF is run first.
/// * `options` - Procedure options. `print` (integer, default 1) sets the output verbosity and
///   `hdf5_filename` (string, default `form.h5`) the GAMESS file.
///
/// # Returns
///
/// The reference wavefunction with its alpha Fock and coefficient matrices overwritten. The
/// wavefunction is only modified once both matrices have been transformed.
///
/// # Errors
///
/// Errors if an option is invalid, if the reference SCF fails, or if basis reordering fails.
pub fn run_efp_gamess<H: Host>(
    host: &mut H,
    name: &str,
    ref_wfn: Option<H::Wfn>,
    options: &ProcedureOptions,
) -> Result<H::Wfn, anyhow::Error> {
    let lname = name.to_lowercase();
    let print = options.get_int_or(PRINT_OPTION, 1)?;
    let verbose = u8::try_from(print).map_err(|_| EfpGamessError::InvalidOption {
        key: PRINT_OPTION.to_string(),
        reason: format!("`{print}` is not a verbosity level between 0 and 255"),
    })?;
    let hdf5_filename = options.get_str_or(HDF5_FILENAME_OPTION, DEFAULT_GAMESS_H5_FILENAME)?;

    efpg_warn!("Attention! This SCF may be density-fitted.");
    let mut wfn = match ref_wfn {
        Some(wfn) => wfn,
        None => {
            efpg_output!("No reference wavefunction supplied. Running reference SCF.");
            host.scf_reference(&lname, options)
                .with_context(|| format!("Reference SCF for `{lname}` failed"))?
        }
    };

    let params = BasisReorderingParams::builder()
        .verbose(verbose)
        .build()
        .with_context(|| "Unable to construct basis reordering parameters")?;
    let source = GamessH5Source::from_path(hdf5_filename);
    let result = reorder_basis(&params, host.transformation_matrix_provider(), &wfn, &source)
        .map_err(|err| {
            efpg_error!("Basis reordering for `{lname}` failed: {err:#}");
            err
        })?;
    result.install_into(&mut wfn);
    Ok(wfn)
}

/// Runs a [`BasisReorderingDriver`] over a reference wavefunction without modifying it.
fn reorder_basis(
    params: &BasisReorderingParams,
    provider: &dyn TransformationMatrixProvider,
    wfn: &dyn Wavefunction,
    source: &GamessH5Source,
) -> Result<BasisReorderingResult, anyhow::Error> {
    let mut driver = BasisReorderingDriver::builder()
        .parameters(params)
        .provider(provider)
        .wavefunction(wfn)
        .source(source)
        .build()
        .with_context(|| "Unable to construct a basis reordering driver")?;
    driver
        .run()
        .with_context(|| "Unable to execute the basis reordering driver successfully")?;
    Ok(driver.result()?.clone())
}

/// Registers the procedures of this crate in the procedure table of a host.
pub fn register_procedures<H: Host>(table: &mut ProcedureTable<H>) {
    table.register(
        ComputationKind::Energy,
        EFP_GAMESS_PROCEDURE,
        run_efp_gamess::<H>,
    );
}
