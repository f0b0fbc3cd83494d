//! YAML input for the efp-gamess command-line program.

use std::path::PathBuf;

use anyhow::{self, ensure, Context};
use serde::{Deserialize, Serialize};

use crate::basis::ao::{basis_angular_order_from_input, InputBasisShell};
use crate::drivers::basis_reordering::{BasisReorderingDriver, BasisReorderingParams};
use crate::drivers::EfpGamessDriver;
use crate::host::BasicWavefunction;
use crate::interfaces::gamess::GamessH5Source;
use crate::interfaces::InputHandle;
use crate::io::format::{efpg_output, efpg_warn, log_macsec_begin, log_macsec_end};
use crate::transformation::shell_map::ShellReorderingProvider;


/// A structure containing efp-gamess input parameters which can be serialised into and
/// deserialised from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// The shells of the host basis set, in host order. Each shell gives its angular momentum `l`
    /// and whether it consists of real solid harmonics (`pure`, default `false`).
    pub basis: Vec<InputBasisShell>,

    /// The number of molecular orbitals.
    pub n_mo: usize,

    /// The location of the GAMESS matrices.
    ///
    /// # Default
    ///
    /// If not specified, group `EFPcalc` of `form.h5` in the working directory is used.
    #[serde(default)]
    pub source: GamessH5Source,

    /// The control parameters for basis reordering.
    #[serde(default)]
    pub reordering: BasisReorderingParams,
}

impl Default for Input {
    fn default() -> Self {
        // 6-31G* on a single carbon atom with pure d functions.
        Input {
            basis: vec![
                InputBasisShell { l: 0, pure: false },
                InputBasisShell { l: 0, pure: false },
                InputBasisShell { l: 1, pure: false },
                InputBasisShell { l: 0, pure: false },
                InputBasisShell { l: 1, pure: false },
                InputBasisShell { l: 2, pure: true },
            ],
            n_mo: 14,
            source: GamessH5Source::from_path("path/to/gamess/form.h5"),
            reordering: BasisReorderingParams {
                verbose: 1,
                result_save_name: Some(PathBuf::from("reordered")),
            },
        }
    }
}

impl InputHandle for Input {
    /// Reorders the GAMESS matrices into the basis described by this input, using the shell
    /// transformation matrices of [`ShellReorderingProvider`].
    fn handle(&self) -> Result<(), anyhow::Error> {
        ensure!(!self.basis.is_empty(), "No basis shells specified.");
        let bao = basis_angular_order_from_input(&self.basis)
            .with_context(|| "Unable to construct the host basis from the input shells")?;
        ensure!(
            self.n_mo <= bao.n_funcs(),
            "The number of MOs ({}) exceeds the number of basis functions ({}).",
            self.n_mo,
            bao.n_funcs()
        );
        let wfn = BasicWavefunction::new(bao, self.n_mo);
        if self.reordering.result_save_name.is_none() {
            efpg_warn!("No `result_save_name` given. The reordered matrices will not be saved.");
        }

        log_macsec_begin("Basis reordering");
        efpg_output!("GAMESS file: {}", self.source.path.display());
        efpg_output!("");
        let mut driver = BasisReorderingDriver::builder()
            .parameters(&self.reordering)
            .provider(&ShellReorderingProvider)
            .wavefunction(&wfn)
            .source(&self.source)
            .build()
            .with_context(|| "Unable to construct a basis reordering driver while handling input")?;
        driver
            .run()
            .with_context(|| "Unable to execute the basis reordering driver successfully")?;
        log_macsec_end("Basis reordering");
        efpg_output!("");
        Ok(())
    }
}
