//! # efp-gamess: GAMESS EFP matrices in a host basis
//!
//! efp-gamess is a plugin for quantum-chemistry host programs. It takes the converged Fock matrix
//! and molecular-orbital coefficients of a GAMESS effective-fragment-potential (EFP) calculation,
//! stored in an HDF5 file, and reorders them into the basis-function convention of the host so
//! that the host can use them in place of its own alpha Fock and coefficient matrices.
//!
//! The reordering is carried out with two transformation matrices obtained from a
//! [`host::TransformationMatrixProvider`]:
//! - the coefficient matrix $`\mathbf{U}_C`$ gives the host coefficients
//!   $`\mathbf{U}_C \mathbf{C}`$, and
//! - the Fock matrix $`\mathbf{U}_F`$ gives the host Fock matrix
//!   $`\mathbf{U}_F \mathbf{F} \mathbf{U}_F^{\mathsf{T}}`$.
//!
//! A native provider, [`transformation::shell_map::ShellReorderingProvider`], builds these
//! matrices shell by shell from the GAMESS Cartesian ordering into the host ordering, for Cartesian
//! and pure shells up to $`l = 3`$.
//!
//! ## Getting started
//!
//! The available features defined by this crate are:
//! - `gamess` (default): reading of GAMESS HDF5 files via the
//!   [`hdf5`](https://docs.rs/hdf5/latest/hdf5/) crate, the host procedure in [`procedures`], and
//!   the `efp-gamess` binary,
//! - `python`: the `efp_gamess` Python extension module.
//!
//! A host wires the plugin in by implementing [`host::Host`] and calling
//! [`procedures::register_procedures`] on its procedure table. The energy procedure `efp_gamess`
//! then runs a reference SCF if needed, reads `form.h5`, and installs the reordered matrices.
//!
//! The `efp-gamess` binary runs the same reordering from a YAML input file. A template input can
//! be generated with
//!
//! ```bash
//! efp-gamess --template input
//! ```
//!
//! and run with
//!
//! ```bash
//! efp-gamess --config input.yml --output reordering
//! ```

pub mod basis;
pub mod bindings;
pub mod drivers;
pub mod error;
pub mod host;
pub mod interfaces;
pub mod io;
#[cfg(feature = "gamess")]
pub mod procedures;
pub mod transformation;
