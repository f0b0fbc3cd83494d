//! Transformations of GAMESS matrices into the basis-function ordering of the host program.
//!
//! The GAMESS Fock matrix $`\mathbf{F}`$ (packed lower triangle) and molecular-orbital coefficient
//! matrix $`\mathbf{C}`$ are brought into the host ordering by
//! ```math
//! \mathbf{C}' = \mathbf{U}_C \mathbf{C}, \qquad
//! \mathbf{F}' = \mathbf{U}_F \mathbf{F} \mathbf{U}_F^{\mathsf{T}},
//! ```
//! where $`\mathbf{U}_C`$ and $`\mathbf{U}_F`$ are the coefficient and Fock transformation matrices
//! (see [`shell_map`]).

use ndarray::{Array2, ArrayBase, Data, Ix1, Ix2};

use crate::error::EfpGamessError;

pub mod shell_map;


/// Returns the number of entries in the packed lower triangle of an $`n \times n`$ matrix.
pub fn n_packed_lower_triangular(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Unpacks a symmetric matrix from its lower triangle stored row by row.
///
/// Row $`i`$ of the packed sequence holds the $`i + 1`$ entries $`(i, 0), \ldots, (i, i)`$, and
/// each entry is mirrored across the diagonal.
///
/// # Arguments
///
/// * `packed` - The packed lower triangle, including the diagonal.
/// * `n` - The dimension of the full matrix.
///
/// # Errors
///
/// Errors with [`EfpGamessError::MalformedInput`] if `packed` does not contain exactly
/// $`n(n+1)/2`$ entries.
pub fn unpack_lower_triangular<S>(
    packed: &ArrayBase<S, Ix1>,
    n: usize,
) -> Result<Array2<f64>, EfpGamessError>
where
    S: Data<Elem = f64>,
{
    let n_packed = n_packed_lower_triangular(n);
    if packed.len() != n_packed {
        return Err(EfpGamessError::MalformedInput(format!(
            "a packed lower triangle of a {n}×{n} matrix must have {n_packed} entries, but {} were found",
            packed.len()
        )));
    }
    let mut full = Array2::<f64>::zeros((n, n));
    let mut values = packed.iter();
    for i in 0..n {
        for j in 0..=i {
            let value = *values.next().ok_or_else(|| {
                EfpGamessError::MalformedInput("packed lower triangle exhausted early".to_string())
            })?;
            full[(i, j)] = value;
            full[(j, i)] = value;
        }
    }
    Ok(full)
}

/// Changes the basis of molecular-orbital coefficients, $`\mathbf{U}_C \mathbf{C}`$.
///
/// # Arguments
///
/// * `trans_c` - The coefficient transformation matrix, with one column per GAMESS atomic orbital.
/// * `mo_coeff` - The GAMESS coefficients with atomic orbitals along the rows.
///
/// # Errors
///
/// Errors with [`EfpGamessError::DimensionMismatch`] if the number of columns of `trans_c` differs
/// from the number of rows of `mo_coeff`.
pub fn transform_coefficients<S1, S2>(
    trans_c: &ArrayBase<S1, Ix2>,
    mo_coeff: &ArrayBase<S2, Ix2>,
) -> Result<Array2<f64>, EfpGamessError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if trans_c.ncols() != mo_coeff.nrows() {
        return Err(EfpGamessError::DimensionMismatch(format!(
            "coefficient transformation matrix has {} columns but the MO coefficient matrix has {} rows",
            trans_c.ncols(),
            mo_coeff.nrows()
        )));
    }
    Ok(trans_c.dot(mo_coeff))
}

/// Similarity-transforms a Fock matrix, $`\mathbf{U}_F \mathbf{F} \mathbf{U}_F^{\mathsf{T}}`$.
///
/// # Arguments
///
/// * `trans_f` - The Fock transformation matrix, with one column per GAMESS atomic orbital.
/// * `fock_full` - The full (unpacked) GAMESS Fock matrix.
///
/// # Errors
///
/// Errors with [`EfpGamessError::DimensionMismatch`] if `fock_full` is not square or if its
/// dimension differs from the number of columns of `trans_f`.
pub fn transform_fock<S1, S2>(
    trans_f: &ArrayBase<S1, Ix2>,
    fock_full: &ArrayBase<S2, Ix2>,
) -> Result<Array2<f64>, EfpGamessError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if !fock_full.is_square() {
        return Err(EfpGamessError::DimensionMismatch(format!(
            "Fock matrix must be square, but has shape {:?}",
            fock_full.shape()
        )));
    }
    if trans_f.ncols() != fock_full.nrows() {
        return Err(EfpGamessError::DimensionMismatch(format!(
            "Fock transformation matrix has {} columns but the Fock matrix has dimension {}",
            trans_f.ncols(),
            fock_full.nrows()
        )));
    }
    Ok(trans_f.dot(fock_full).dot(&trans_f.t()))
}
