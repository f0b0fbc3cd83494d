//! Python bindings for efp-gamess.

use pyo3::prelude::*;

pub mod basis_reordering;

/// Python module for efp-gamess implemented in Rust.
#[pymodule]
pub fn efp_gamess(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // --------------
    // Python logging
    // --------------
    pyo3_log::init();

    // -------
    // Version
    // -------
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // ---------
    // Functions
    // ---------
    m.add_function(wrap_pyfunction!(basis_reordering::unpack_lower_triangular, m)?)?;
    m.add_function(wrap_pyfunction!(basis_reordering::transform_coefficients, m)?)?;
    m.add_function(wrap_pyfunction!(basis_reordering::transform_fock, m)?)?;
    m.add_function(wrap_pyfunction!(basis_reordering::build_transformation_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(basis_reordering::read_gamess_h5, m)?)?;
    m.add_function(wrap_pyfunction!(basis_reordering::reorder_gamess_basis, m)?)?;

    Ok(())
}
