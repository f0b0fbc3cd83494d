//! Driver for reordering GAMESS Fock and coefficient matrices into the host basis.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err, Context};
use derive_builder::Builder;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::drivers::EfpGamessDriver;
use crate::error::EfpGamessError;
use crate::host::{TransformationMatrixProvider, Wavefunction};
use crate::interfaces::gamess::EfpCalcSource;
use crate::io::format::{
    efpg_output, efpg_warn, log_matrix, log_subtitle, log_title, nice_bool, EfpGamessOutput,
};
use crate::io::{write_efpg_binary, EfpGamessFileType};
use crate::transformation::{transform_coefficients, transform_fock, unpack_lower_triangular};


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

fn default_verbose() -> u8 {
    1
}

/// A structure containing control parameters for basis reordering.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct BasisReorderingParams {
    /// The output verbosity level. Level 0 prints warnings only, level 1 adds a summary of the
    /// basis and the progress of the transformation, and level 2 and above also print the
    /// transformation matrices and the reordered matrices.
    #[builder(default = "1")]
    #[serde(default = "default_verbose")]
    pub verbose: u8,

    /// Optional name for saving the reordered matrices as a binary file of type
    /// [`EfpGamessFileType::Wfn`]. If `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl BasisReorderingParams {
    /// Returns a builder to construct a [`BasisReorderingParams`] structure.
    pub fn builder() -> BasisReorderingParamsBuilder {
        BasisReorderingParamsBuilder::default()
    }
}

impl Default for BasisReorderingParams {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("Unable to construct a default `BasisReorderingParams`.")
    }
}

impl fmt::Display for BasisReorderingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Output level: {}", self.verbose)?;
        writeln!(
            f,
            "Save reordered matrices to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{}.{}", name.display(), EfpGamessFileType::Wfn.ext())
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain the Fock and coefficient matrices in the host basis ordering.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisReorderingResult {
    /// The alpha Fock matrix, of shape `(n_so, n_so)`.
    pub fock_alpha: Array2<f64>,

    /// The alpha molecular-orbital coefficients, of shape `(n_so, n_mo)`.
    pub coefficients_alpha: Array2<f64>,
}

impl BasisReorderingResult {
    fn builder() -> BasisReorderingResultBuilder {
        BasisReorderingResultBuilder::default()
    }

    /// Overwrites the alpha Fock and coefficient matrices of `wfn` with the reordered ones.
    pub fn install_into<W: Wavefunction + ?Sized>(&self, wfn: &mut W) {
        *wfn.fock_alpha_mut() = self.fock_alpha.clone();
        *wfn.coefficients_alpha_mut() = self.coefficients_alpha.clone();
    }
}

// ------
// Driver
// ------

/// A driver reordering the Fock and coefficient matrices of a GAMESS calculation into the basis
/// ordering of the host wavefunction.
///
/// The wavefunction is only read here. The reordered matrices are kept in the result and written
/// into a wavefunction with [`BasisReorderingResult::install_into`].
#[derive(Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct BasisReorderingDriver<'a> {
    /// The control parameters for basis reordering.
    parameters: &'a BasisReorderingParams,

    /// The source of the transformation matrices.
    provider: &'a dyn TransformationMatrixProvider,

    /// The host wavefunction whose basis defines the target ordering.
    wavefunction: &'a dyn Wavefunction,

    /// The source of the GAMESS matrices.
    source: &'a dyn EfpCalcSource,

    /// The result of the reordering.
    #[builder(setter(skip), default = "None")]
    result: Option<BasisReorderingResult>,
}

impl<'a> BasisReorderingDriverBuilder<'a> {
    fn validate(&self) -> Result<(), String> {
        self.parameters
            .ok_or("No basis reordering parameters found.".to_string())?;
        self.provider
            .ok_or("No transformation-matrix provider found.".to_string())?;
        self.wavefunction
            .ok_or("No host wavefunction found.".to_string())?;
        self.source
            .ok_or("No source of GAMESS matrices found.".to_string())?;
        Ok(())
    }
}

impl<'a> BasisReorderingDriver<'a> {
    /// Returns a builder to construct a [`BasisReorderingDriver`] structure.
    pub fn builder() -> BasisReorderingDriverBuilder<'a> {
        BasisReorderingDriverBuilder::default()
    }

    /// Checks a transformation matrix against the basis sizes of the wavefunction.
    fn check_transformation_matrix(
        &self,
        trans: &Array2<f64>,
        kind: &str,
    ) -> Result<(), EfpGamessError> {
        let wfn = self.wavefunction;
        if trans.is_empty() && wfn.n_ao() > 0 {
            return Err(EfpGamessError::ExternalProviderFailure(format!(
                "the provider returned an empty {kind} transformation matrix"
            )));
        }
        if trans.nrows() != wfn.n_so() || trans.ncols() != wfn.n_ao() {
            return Err(EfpGamessError::DimensionMismatch(format!(
                "{kind} transformation matrix has shape {:?}, but (n_so, n_ao) = ({}, {})",
                trans.shape(),
                wfn.n_so(),
                wfn.n_ao()
            )));
        }
        Ok(())
    }

    /// Runs one transformation step, announcing its start and end at verbosity 1 and above.
    fn log_progress<T>(
        &self,
        what: &str,
        step: impl FnOnce() -> Result<T, EfpGamessError>,
    ) -> Result<T, EfpGamessError> {
        let verbose = self.parameters.verbose >= 1;
        if verbose {
            efpg_output!("Transforming {what}");
        }
        let res = step()?;
        if verbose {
            efpg_output!("DONE transforming {what}");
        }
        Ok(res)
    }

    /// Executes basis reordering.
    fn reorder_basis(&mut self) -> Result<(), anyhow::Error> {
        let params = self.parameters;
        let wfn = self.wavefunction;

        if params.verbose >= 1 {
            log_title("GAMESS Basis Reordering");
            efpg_output!("");
            params.log_output_display();
            efpg_output!("Number of Cartesian AOs (n_ao): {}", wfn.n_ao());
            efpg_output!("Number of basis functions (n_so): {}", wfn.n_so());
            efpg_output!("Number of MOs (n_mo): {}", wfn.n_mo());
            efpg_output!(
                "Pure angular functions: {}",
                nice_bool(wfn.basis_angular_order().has_pure())
            );
            efpg_output!("");
        }
        if params.verbose >= 2 {
            log_subtitle("Host basis shells");
            wfn.basis_angular_order().log_output_display();
            efpg_output!("");
        }

        let trans_c = self
            .provider
            .get_coefficient_transform(wfn)
            .with_context(|| "Unable to obtain the coefficient transformation matrix")?;
        self.check_transformation_matrix(&trans_c, "coefficient")?;
        let trans_f = self
            .provider
            .get_fock_transform(wfn)
            .with_context(|| "Unable to obtain the Fock transformation matrix")?;
        self.check_transformation_matrix(&trans_f, "Fock")?;
        if params.verbose >= 2 {
            log_matrix("Coefficient transformation matrix", &trans_c);
            efpg_output!("");
            log_matrix("Fock transformation matrix", &trans_f);
            efpg_output!("");
        }

        let efp_calc = self
            .source
            .read_efp_calc()
            .with_context(|| "Unable to read the GAMESS matrices")?;

        let fock_full = unpack_lower_triangular(&efp_calc.fock_packed, wfn.n_ao())?;
        let mo_dset = &efp_calc.mo_coefficients;
        if mo_dset.ncols() != wfn.n_ao() || mo_dset.nrows() != wfn.n_mo() {
            return Err(format_err!(EfpGamessError::DimensionMismatch(format!(
                "MO coefficient dataset has shape {:?}, but (n_mo, n_ao) = ({}, {})",
                mo_dset.shape(),
                wfn.n_mo(),
                wfn.n_ao()
            ))));
        }
        let mo_coeff = mo_dset.t();

        let coefficients_alpha = self.log_progress("MO coefficients", || {
            transform_coefficients(&trans_c, &mo_coeff)
        })?;
        let fock_alpha =
            self.log_progress("GAMESS Fock matrix", || transform_fock(&trans_f, &fock_full))?;
        if params.verbose >= 1 {
            efpg_output!("");
        }

        let asymmetry = (&fock_alpha - &fock_alpha.t())
            .iter()
            .fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if asymmetry > 1e-8 {
            efpg_warn!("Reordered Fock matrix deviates from symmetry by up to {asymmetry:.3e}.");
        }

        if params.verbose >= 2 {
            log_matrix("Reordered Fock matrix (alpha)", &fock_alpha);
            efpg_output!("");
            log_matrix("Reordered MO coefficients (alpha)", &coefficients_alpha);
            efpg_output!("");
        }

        let result = BasisReorderingResult::builder()
            .fock_alpha(fock_alpha)
            .coefficients_alpha(coefficients_alpha)
            .build()
            .with_context(|| "Unable to construct a basis reordering result structure")?;
        if let Some(name) = params.result_save_name.as_ref() {
            write_efpg_binary(name, EfpGamessFileType::Wfn, &result)
                .with_context(|| "Unable to save the basis reordering result")?;
            if params.verbose >= 1 {
                efpg_output!(
                    "Reordered matrices saved as {}.{}.",
                    name.display(),
                    EfpGamessFileType::Wfn.ext()
                );
                efpg_output!("");
            }
        }
        self.result = Some(result);
        Ok(())
    }
}

impl<'a> EfpGamessDriver for BasisReorderingDriver<'a> {
    type Params = BasisReorderingParams;

    type Outcome = BasisReorderingResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No basis reordering results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.reorder_basis()
    }
}
