//! Shell-by-shell construction of the matrices that map GAMESS Cartesian atomic orbitals onto
//! the basis functions of the host program.
//!
//! GAMESS always works with Cartesian atomic orbitals normalised so that every component of a
//! shell carries the normalisation of the $`x^l`$ component. For a component with exponents
//! $`(l_x, l_y, l_z)`$ the ratio of its own normalisation to the shared one is
//! ```math
//! N_{l_x l_y l_z} = \sqrt{\frac{(2l - 1)!!}{(2l_x - 1)!!\,(2l_y - 1)!!\,(2l_z - 1)!!}}.
//! ```
//! Molecular-orbital coefficients transform with $`N`$ and the Fock matrix with $`1/N`$.
//! Pure shells of the host are additionally expanded in Cartesian components.

use std::fmt;
use std::str::FromStr;

use log;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::basis::ao::{BasisAngularOrder, CartOrder, ShellOrder};
use crate::error::EfpGamessError;
use crate::host::{TransformationMatrixProvider, Wavefunction};

#[cfg(test)]
#[path = "shell_map_tests.rs"]
mod shell_map_tests;

// ------------------------
// TransformationMatrixKind
// ------------------------

/// Enumerated type for the two kinds of transformation matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformationMatrixKind {
    /// The matrix acting on molecular-orbital coefficients, textual form `C`.
    Coefficient,

    /// The matrix acting on the Fock matrix, textual form `F`.
    Fock,
}

impl TransformationMatrixKind {
    /// Returns the factor multiplying a Cartesian component with exponents `cart_tuple`.
    fn component_factor(&self, cart_tuple: &(u32, u32, u32)) -> f64 {
        let norm = cartesian_normalisation_ratio(cart_tuple);
        match self {
            TransformationMatrixKind::Coefficient => norm,
            TransformationMatrixKind::Fock => norm.recip(),
        }
    }
}

impl FromStr for TransformationMatrixKind {
    type Err = EfpGamessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(TransformationMatrixKind::Coefficient),
            "F" => Ok(TransformationMatrixKind::Fock),
            _ => Err(EfpGamessError::InvalidOption {
                key: "kind".to_string(),
                reason: format!("`{s}` is neither `C` nor `F`"),
            }),
        }
    }
}

impl fmt::Display for TransformationMatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformationMatrixKind::Coefficient => write!(f, "C"),
            TransformationMatrixKind::Fock => write!(f, "F"),
        }
    }
}

// -----------------
// Normalisation
// -----------------

/// Returns $`(2k - 1)!!`$, with $`(-1)!! = 1`$.
fn odd_double_factorial(k: u32) -> f64 {
    (1..=k).map(|i| f64::from(2 * i - 1)).product()
}

/// Returns $`N_{l_x l_y l_z}`$ for a Cartesian component.
fn cartesian_normalisation_ratio(cart_tuple: &(u32, u32, u32)) -> f64 {
    let (lx, ly, lz) = *cart_tuple;
    (odd_double_factorial(lx + ly + lz)
        / (odd_double_factorial(lx) * odd_double_factorial(ly) * odd_double_factorial(lz)))
    .sqrt()
}

// ------------------------
// Pure-to-Cartesian tables
// ------------------------

/// A real solid harmonic written in unnormalised Cartesian components.
struct PureExpansion {
    /// Cartesian exponents and polynomial coefficients.
    terms: Vec<((u32, u32, u32), f64)>,

    /// Prefactor applied in the coefficient matrix.
    coefficient_prefactor: f64,

    /// Prefactor applied in the Fock matrix.
    fock_prefactor: f64,
}

impl PureExpansion {
    fn new(
        terms: &[((u32, u32, u32), f64)],
        coefficient_prefactor: f64,
        fock_prefactor: f64,
    ) -> Self {
        Self {
            terms: terms.to_vec(),
            coefficient_prefactor,
            fock_prefactor,
        }
    }

    fn prefactor(&self, kind: TransformationMatrixKind) -> f64 {
        match kind {
            TransformationMatrixKind::Coefficient => self.coefficient_prefactor,
            TransformationMatrixKind::Fock => self.fock_prefactor,
        }
    }
}

/// Returns the Cartesian expansions of the real solid harmonics of rank `l` in cosine/sine
/// order $`0, 1c, 1s, 2c, 2s, \ldots`$.
fn pure_expansions(l: u32) -> Result<Vec<PureExpansion>, EfpGamessError> {
    let sqrt3 = 3.0_f64.sqrt();
    let sqrt15 = 15.0_f64.sqrt();
    let expansions = match l {
        0 => vec![PureExpansion::new(&[((0, 0, 0), 1.0)], 1.0, 1.0)],
        1 => vec![
            PureExpansion::new(&[((0, 0, 1), 1.0)], 1.0, 1.0),
            PureExpansion::new(&[((1, 0, 0), 1.0)], 1.0, 1.0),
            PureExpansion::new(&[((0, 1, 0), 1.0)], 1.0, 1.0),
        ],
        2 => vec![
            // zz - xx/2 - yy/2
            PureExpansion::new(
                &[((0, 0, 2), 1.0), ((2, 0, 0), -0.5), ((0, 2, 0), -0.5)],
                2.0 / 3.0,
                1.0,
            ),
            PureExpansion::new(&[((1, 0, 1), 1.0)], sqrt3.recip(), sqrt3),
            PureExpansion::new(&[((0, 1, 1), 1.0)], sqrt3.recip(), sqrt3),
            PureExpansion::new(
                &[((2, 0, 0), 1.0), ((0, 2, 0), -1.0)],
                sqrt3.recip(),
                sqrt3 / 2.0,
            ),
            PureExpansion::new(&[((1, 1, 0), 1.0)], sqrt3.recip(), sqrt3),
        ],
        3 => vec![
            // zzz - 3xxz/2 - 3yyz/2
            PureExpansion::new(
                &[((0, 0, 3), 1.0), ((2, 0, 1), -1.5), ((0, 2, 1), -1.5)],
                2.0 / 11.0,
                1.0,
            ),
            PureExpansion::new(
                &[((1, 0, 2), 1.0), ((1, 2, 0), -0.25), ((3, 0, 0), -0.25)],
                sqrt15.recip(),
                6.0_f64.sqrt(),
            ),
            PureExpansion::new(
                &[((0, 1, 2), 1.0), ((0, 3, 0), -0.25), ((2, 1, 0), -0.25)],
                sqrt15.recip(),
                6.0_f64.sqrt(),
            ),
            PureExpansion::new(
                &[((2, 0, 1), 1.0), ((0, 2, 1), -1.0)],
                sqrt15.recip(),
                (15.0_f64 / 4.0).sqrt(),
            ),
            PureExpansion::new(&[((1, 1, 1), 1.0)], sqrt15.recip(), sqrt15),
            PureExpansion::new(
                &[((3, 0, 0), 0.5), ((1, 2, 0), -1.5)],
                sqrt15.recip(),
                (5.0_f64 / 2.0).sqrt(),
            ),
            PureExpansion::new(
                &[((2, 1, 0), 1.5), ((0, 3, 0), -0.5)],
                sqrt15.recip(),
                (5.0_f64 / 2.0).sqrt(),
            ),
        ],
        _ => return Err(EfpGamessError::UnsupportedAngularMomentum(l)),
    };
    Ok(expansions)
}

/// Returns the position of $`m_l`$ in cosine/sine order.
fn cossin_index(m: i32) -> usize {
    let absm = m.unsigned_abs() as usize;
    match m.signum() {
        0 => 0,
        1 => 2 * absm - 1,
        _ => 2 * absm,
    }
}

// -----------------------------
// Transformation-matrix builder
// -----------------------------

/// Builds the matrix transforming quantities in GAMESS Cartesian atomic orbitals into the basis
/// functions described by `bao`.
///
/// Shells are traversed in the order of `bao`. Each shell fills a block with one row per host
/// function of the shell and one column per Cartesian component in GAMESS order, so the row
/// offset advances by the host shell size and the column offset by the Cartesian shell size.
///
/// # Arguments
///
/// * `bao` - The basis angular order of the host program.
/// * `kind` - The kind of matrix to build.
///
/// # Returns
///
/// A matrix of shape `(bao.n_funcs(), bao.n_cart_funcs())`.
///
/// # Errors
///
/// Errors with [`EfpGamessError::UnsupportedAngularMomentum`] if any shell has $`l > 3`$.
pub fn build_transformation_matrix(
    bao: &BasisAngularOrder,
    kind: TransformationMatrixKind,
) -> Result<Array2<f64>, EfpGamessError> {
    let mut trans = Array2::<f64>::zeros((bao.n_funcs(), bao.n_cart_funcs()));
    let mut row_offset = 0;
    let mut col_offset = 0;
    for shell in bao.basis_shells() {
        let gamess_order = CartOrder::gamess(shell.l)?;
        let gamess_index = |cart_tuple: &(u32, u32, u32)| {
            gamess_order.index_of(cart_tuple).ok_or_else(|| {
                EfpGamessError::MalformedInput(format!(
                    "Cartesian component {cart_tuple:?} not found in GAMESS shell of rank {}",
                    shell.l
                ))
            })
        };
        match &shell.shell_order {
            ShellOrder::Cart(cart_order) => {
                for (i, cart_tuple) in cart_order.iter().enumerate() {
                    let j = gamess_index(cart_tuple)?;
                    trans[(row_offset + i, col_offset + j)] = kind.component_factor(cart_tuple);
                }
            }
            ShellOrder::Pure(pure_order) => {
                let expansions = pure_expansions(shell.l)?;
                for (i, m) in pure_order.iter().enumerate() {
                    let expansion = &expansions[cossin_index(*m)];
                    let prefactor = expansion.prefactor(kind);
                    for (cart_tuple, coeff) in expansion.terms.iter() {
                        let j = gamess_index(cart_tuple)?;
                        trans[(row_offset + i, col_offset + j)] =
                            coeff * prefactor * kind.component_factor(cart_tuple);
                    }
                }
            }
        }
        row_offset += shell.n_funcs();
        col_offset += shell.n_cart_funcs();
    }
    log::debug!(
        "Built {kind} transformation matrix of shape {:?} over {} shell(s).",
        trans.shape(),
        bao.n_shells()
    );
    Ok(trans)
}

// ------------------------
// ShellReorderingProvider
// ------------------------

/// Transformation-matrix provider building both matrices from the basis angular order of the
/// wavefunction.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellReorderingProvider;

impl TransformationMatrixProvider for ShellReorderingProvider {
    fn get_coefficient_transform(
        &self,
        wfn: &dyn Wavefunction,
    ) -> Result<Array2<f64>, EfpGamessError> {
        build_transformation_matrix(
            wfn.basis_angular_order(),
            TransformationMatrixKind::Coefficient,
        )
    }

    fn get_fock_transform(&self, wfn: &dyn Wavefunction) -> Result<Array2<f64>, EfpGamessError> {
        build_transformation_matrix(wfn.basis_angular_order(), TransformationMatrixKind::Fock)
    }
}
