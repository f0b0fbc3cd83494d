//! Python bindings for efp-gamess basis reordering.

use anyhow::{self, format_err};
use ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::basis::ao::{basis_angular_order_from_input, BasisAngularOrder, InputBasisShell};
use crate::drivers::basis_reordering::{
    BasisReorderingDriver, BasisReorderingParams, BasisReorderingResult,
};
use crate::drivers::EfpGamessDriver;
use crate::error::EfpGamessError;
use crate::host::{BasicWavefunction, TransformationMatrixProvider, Wavefunction};
use crate::interfaces::gamess::{EfpCalcSource, GamessH5Source};
use crate::transformation;
use crate::transformation::shell_map::{self, ShellReorderingProvider, TransformationMatrixKind};

/// Provider handing out transformation matrices supplied from Python.
struct PyTransformationMatrices {
    trans_c: Array2<f64>,
    trans_f: Array2<f64>,
}

impl TransformationMatrixProvider for PyTransformationMatrices {
    fn get_coefficient_transform(
        &self,
        _wfn: &dyn Wavefunction,
    ) -> Result<Array2<f64>, EfpGamessError> {
        Ok(self.trans_c.clone())
    }

    fn get_fock_transform(
        &self,
        _wfn: &dyn Wavefunction,
    ) -> Result<Array2<f64>, EfpGamessError> {
        Ok(self.trans_f.clone())
    }
}

fn host_basis(shells: Vec<(u32, bool)>) -> PyResult<BasisAngularOrder> {
    basis_angular_order_from_input(
        &shells
            .into_iter()
            .map(|(l, pure)| InputBasisShell { l, pure })
            .collect::<Vec<_>>(),
    )
    .map_err(to_py_err)
}

fn run_driver(
    params: &BasisReorderingParams,
    provider: &dyn TransformationMatrixProvider,
    wfn: &BasicWavefunction,
    source: &GamessH5Source,
) -> Result<BasisReorderingResult, anyhow::Error> {
    let mut driver = BasisReorderingDriver::builder()
        .parameters(params)
        .provider(provider)
        .wavefunction(wfn)
        .source(source)
        .build()
        .map_err(|err| format_err!(err))?;
    driver.run()?;
    driver.result().cloned()
}

fn to_py_err(err: EfpGamessError) -> PyErr {
    if err.is_invalid_input() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

/// Maps a driver error onto a Python exception, keeping the classification of any
/// [`EfpGamessError`] at its root.
fn driver_err_to_py_err(err: anyhow::Error) -> PyErr {
    match err.downcast_ref::<EfpGamessError>() {
        Some(efpg_err) if efpg_err.is_invalid_input() => PyValueError::new_err(format!("{err:#}")),
        _ => PyRuntimeError::new_err(format!("{err:#}")),
    }
}

/// Python-exposed function to expand a packed lower triangle into a full symmetric matrix.
///
/// # Arguments
///
/// * `packed` - The packed lower triangle in row order. Python type: `numpy.1darray[float]`.
/// * `n` - The dimension of the full matrix.
///
/// # Returns
///
/// The full $`n \times n`$ symmetric matrix. Python type: `numpy.2darray[float]`.
#[pyfunction]
pub fn unpack_lower_triangular<'py>(
    py: Python<'py>,
    packed: PyReadonlyArray1<'py, f64>,
    n: usize,
) -> PyResult<&'py PyArray2<f64>> {
    let full = transformation::unpack_lower_triangular(&packed.as_array(), n)
        .map_err(to_py_err)?;
    Ok(full.into_pyarray(py))
}

/// Python-exposed function to compute `trans_c · mo_coeff`.
#[pyfunction]
pub fn transform_coefficients<'py>(
    py: Python<'py>,
    trans_c: PyReadonlyArray2<'py, f64>,
    mo_coeff: PyReadonlyArray2<'py, f64>,
) -> PyResult<&'py PyArray2<f64>> {
    let res = transformation::transform_coefficients(&trans_c.as_array(), &mo_coeff.as_array())
        .map_err(to_py_err)?;
    Ok(res.into_pyarray(py))
}

/// Python-exposed function to compute `trans_f · fock_full · trans_fᵀ`.
#[pyfunction]
pub fn transform_fock<'py>(
    py: Python<'py>,
    trans_f: PyReadonlyArray2<'py, f64>,
    fock_full: PyReadonlyArray2<'py, f64>,
) -> PyResult<&'py PyArray2<f64>> {
    let res = transformation::transform_fock(&trans_f.as_array(), &fock_full.as_array())
        .map_err(to_py_err)?;
    Ok(res.into_pyarray(py))
}

/// Python-exposed function to build the matrix mapping GAMESS Cartesian shells onto host shells.
///
/// # Arguments
///
/// * `shells` - The host shells as `(l, pure)` pairs. Python type: `list[tuple[int, bool]]`.
/// * `kind` - `"C"` for the coefficient matrix or `"F"` for the Fock matrix.
#[pyfunction]
pub fn build_transformation_matrix<'py>(
    py: Python<'py>,
    shells: Vec<(u32, bool)>,
    kind: &str,
) -> PyResult<&'py PyArray2<f64>> {
    let kind = kind.parse::<TransformationMatrixKind>().map_err(to_py_err)?;
    let bao = host_basis(shells)?;
    let trans = shell_map::build_transformation_matrix(&bao, kind).map_err(to_py_err)?;
    Ok(trans.into_pyarray(py))
}

/// Python-exposed function to read the packed Fock matrix and the MO coefficients of a GAMESS EFP
/// calculation.
///
/// # Returns
///
/// A tuple `(fock_packed, mo_coefficients)`. Python type:
/// `tuple[numpy.1darray[float], numpy.2darray[float]]`.
#[pyfunction]
pub fn read_gamess_h5<'py>(
    py: Python<'py>,
    filename: &str,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray2<f64>)> {
    let efp_calc = GamessH5Source::from_path(filename)
        .read_efp_calc()
        .map_err(to_py_err)?;
    Ok((
        efp_calc.fock_packed.into_pyarray(py),
        efp_calc.mo_coefficients.into_pyarray(py),
    ))
}

/// Python-exposed function to reorder the Fock and coefficient matrices stored in a GAMESS HDF5
/// file into a host basis.
///
/// # Arguments
///
/// * `trans_c` - The coefficient transformation matrix, or `None` to build it from `shells`.
///   Python type: `Optional[numpy.2darray[float]]`.
/// * `trans_f` - The Fock transformation matrix, or `None` to build it from `shells`. Either both
///   or neither of `trans_c` and `trans_f` must be given.
/// * `filename` - The GAMESS HDF5 file.
/// * `n_mo` - The number of molecular orbitals.
/// * `shells` - The host shells as `(l, pure)` pairs. Python type: `list[tuple[int, bool]]`.
/// * `verbose` - The output verbosity.
///
/// # Returns
///
/// A tuple `(fock_alpha, coefficients_alpha)` in the host basis. Python type:
/// `tuple[numpy.2darray[float], numpy.2darray[float]]`.
#[pyfunction]
#[pyo3(signature = (trans_c, trans_f, filename, n_mo, shells, verbose=1))]
pub fn reorder_gamess_basis<'py>(
    py: Python<'py>,
    trans_c: Option<PyReadonlyArray2<'py, f64>>,
    trans_f: Option<PyReadonlyArray2<'py, f64>>,
    filename: &str,
    n_mo: usize,
    shells: Vec<(u32, bool)>,
    verbose: u8,
) -> PyResult<(&'py PyArray2<f64>, &'py PyArray2<f64>)> {
    let bao = host_basis(shells)?;
    let wfn = BasicWavefunction::new(bao, n_mo);
    let source = GamessH5Source::from_path(filename);
    let params = BasisReorderingParams::builder()
        .verbose(verbose)
        .build()
        .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;

    let provider: Box<dyn TransformationMatrixProvider> = match (trans_c, trans_f) {
        (Some(pytrans_c), Some(pytrans_f)) => Box::new(PyTransformationMatrices {
            trans_c: pytrans_c.as_array().to_owned(),
            trans_f: pytrans_f.as_array().to_owned(),
        }),
        (None, None) => Box::new(ShellReorderingProvider),
        _ => {
            return Err(PyValueError::new_err(
                "`trans_c` and `trans_f` must be given together.",
            ))
        }
    };

    let result =
        run_driver(&params, provider.as_ref(), &wfn, &source).map_err(driver_err_to_py_err)?;
    Ok((
        result.fock_alpha.into_pyarray(py),
        result.coefficients_alpha.into_pyarray(py),
    ))
}
