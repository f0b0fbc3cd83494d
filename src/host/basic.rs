//! A plain in-memory wavefunction.

use std::fmt;

use ndarray::Array2;

use crate::basis::ao::BasisAngularOrder;
use crate::host::Wavefunction;

/// Wavefunction holding only what the basis reordering reads and writes.
///
/// Used by the command-line front end, the Python bindings, and hosts without a wavefunction type
/// of their own.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicWavefunction {
    bao: BasisAngularOrder,
    n_mo: usize,
    fock_alpha: Array2<f64>,
    coefficients_alpha: Array2<f64>,
}

impl BasicWavefunction {
    /// Creates a wavefunction with zero alpha Fock and coefficient matrices.
    ///
    /// # Arguments
    ///
    /// * `bao` - The basis angular order in the host convention.
    /// * `n_mo` - The number of molecular orbitals.
    pub fn new(bao: BasisAngularOrder, n_mo: usize) -> Self {
        let n_so = bao.n_funcs();
        Self {
            bao,
            n_mo,
            fock_alpha: Array2::zeros((n_so, n_so)),
            coefficients_alpha: Array2::zeros((n_so, n_mo)),
        }
    }
}

impl Wavefunction for BasicWavefunction {
    fn n_ao(&self) -> usize {
        self.bao.n_cart_funcs()
    }

    fn n_so(&self) -> usize {
        self.bao.n_funcs()
    }

    fn n_mo(&self) -> usize {
        self.n_mo
    }

    fn basis_angular_order(&self) -> &BasisAngularOrder {
        &self.bao
    }

    fn fock_alpha(&self) -> &Array2<f64> {
        &self.fock_alpha
    }

    fn fock_alpha_mut(&mut self) -> &mut Array2<f64> {
        &mut self.fock_alpha
    }

    fn coefficients_alpha(&self) -> &Array2<f64> {
        &self.coefficients_alpha
    }

    fn coefficients_alpha_mut(&mut self) -> &mut Array2<f64> {
        &mut self.coefficients_alpha
    }
}

impl fmt::Display for BasicWavefunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Cartesian AOs (n_ao): {}", self.n_ao())?;
        writeln!(f, "Number of basis functions (n_so): {}", self.n_so())?;
        writeln!(f, "Number of MOs (n_mo): {}", self.n_mo())?;
        Ok(())
    }
}
