//! Collaborator interfaces of the host quantum-chemistry program.
//!
//! The host owns the wavefunction, runs reference SCF calculations and dispatches named
//! procedures. This module defines what the basis reordering needs from it:
//!
//! * [`Wavefunction`]: basis sizes and mutable access to the alpha Fock and coefficient matrices,
//! * [`TransformationMatrixProvider`]: the coefficient and Fock transformation matrices,
//! * [`Host`]: the reference-SCF entry point and the host's provider,
//! * [`ProcedureTable`] and [`ProcedureOptions`]: named-procedure dispatch with free-form options.

use std::fmt;

use anyhow::{self, format_err};
use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::basis::ao::BasisAngularOrder;
use crate::error::EfpGamessError;

mod basic;

pub use basic::BasicWavefunction;

#[cfg(test)]
#[path = "host_tests.rs"]
mod host_tests;

// =================
// Trait definitions
// =================

/// Trait for the mutable wavefunction state of the host program.
pub trait Wavefunction {
    /// The number of Cartesian atomic orbitals.
    fn n_ao(&self) -> usize;

    /// The number of host basis functions.
    fn n_so(&self) -> usize;

    /// The number of molecular orbitals.
    fn n_mo(&self) -> usize;

    /// The ordered shells of the basis set.
    fn basis_angular_order(&self) -> &BasisAngularOrder;

    /// The alpha Fock matrix, of shape `(n_so, n_so)`.
    fn fock_alpha(&self) -> &Array2<f64>;

    /// Mutable access to the alpha Fock matrix.
    fn fock_alpha_mut(&mut self) -> &mut Array2<f64>;

    /// The alpha molecular-orbital coefficients, of shape `(n_so, n_mo)`.
    fn coefficients_alpha(&self) -> &Array2<f64>;

    /// Mutable access to the alpha molecular-orbital coefficients.
    fn coefficients_alpha_mut(&mut self) -> &mut Array2<f64>;
}

/// Trait for sources of the matrices that map GAMESS atomic orbitals onto host basis functions.
pub trait TransformationMatrixProvider {
    /// Returns the matrix acting on molecular-orbital coefficients.
    fn get_coefficient_transform(
        &self,
        wfn: &dyn Wavefunction,
    ) -> Result<Array2<f64>, EfpGamessError>;

    /// Returns the matrix acting on the Fock matrix.
    fn get_fock_transform(&self, wfn: &dyn Wavefunction) -> Result<Array2<f64>, EfpGamessError>;
}

/// Trait for the host program invoking the plugin.
pub trait Host {
    /// The wavefunction type of the host.
    type Wfn: Wavefunction;

    /// Runs a reference SCF calculation of the kind given by `name`.
    fn scf_reference(
        &mut self,
        name: &str,
        options: &ProcedureOptions,
    ) -> Result<Self::Wfn, anyhow::Error>;

    /// The transformation-matrix provider of the host.
    fn transformation_matrix_provider(&self) -> &dyn TransformationMatrixProvider;
}

// =======
// Options
// =======

/// Enumerated type for the values of procedure options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Float(x) => write!(f, "{x}"),
            OptionValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<f64> for OptionValue {
    fn from(x: f64) -> Self {
        OptionValue::Float(x)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

/// Free-form options passed to a procedure. Keys are case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, OptionValue>",
    into = "IndexMap<String, OptionValue>"
)]
pub struct ProcedureOptions {
    options: IndexMap<String, OptionValue>,
}

impl From<ProcedureOptions> for IndexMap<String, OptionValue> {
    fn from(options: ProcedureOptions) -> Self {
        options.options
    }
}

impl From<IndexMap<String, OptionValue>> for ProcedureOptions {
    fn from(options: IndexMap<String, OptionValue>) -> Self {
        Self {
            options: options
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        }
    }
}

impl ProcedureOptions {
    /// Creates an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option and returns the updated options.
    #[must_use]
    pub fn with<V: Into<OptionValue>>(mut self, key: &str, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an option, replacing any previous value.
    pub fn insert<V: Into<OptionValue>>(&mut self, key: &str, value: V) -> Option<OptionValue> {
        self.options.insert(key.to_lowercase(), value.into())
    }

    /// Returns the value of an option, if set.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(&key.to_lowercase())
    }

    /// Returns an integer option, or `default` if unset.
    ///
    /// # Errors
    ///
    /// Errors if the option is set to something other than an integer.
    pub fn get_int_or(&self, key: &str, default: i64) -> Result<i64, EfpGamessError> {
        match self.get(key) {
            None => Ok(default),
            Some(OptionValue::Int(i)) => Ok(*i),
            Some(other) => Err(EfpGamessError::InvalidOption {
                key: key.to_lowercase(),
                reason: format!("expected an integer, found `{other}`"),
            }),
        }
    }

    /// Returns a string option, or `default` if unset.
    ///
    /// # Errors
    ///
    /// Errors if the option is set to something other than a string.
    pub fn get_str_or(&self, key: &str, default: &str) -> Result<String, EfpGamessError> {
        match self.get(key) {
            None => Ok(default.to_string()),
            Some(OptionValue::Str(s)) => Ok(s.clone()),
            Some(other) => Err(EfpGamessError::InvalidOption {
                key: key.to_lowercase(),
                reason: format!("expected a string, found `{other}`"),
            }),
        }
    }

    /// Iterates over the options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> + '_ {
        self.options.iter()
    }
}

impl fmt::Display for ProcedureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            return writeln!(f, "No options set.");
        }
        let width = self.options.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        for (key, value) in self.iter() {
            writeln!(f, "{key:<width$}: {value}")?;
        }
        Ok(())
    }
}

// ===============
// Procedure table
// ===============

/// Enumerated type for the kinds of computation a procedure can be registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputationKind {
    Energy,
}

impl fmt::Display for ComputationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationKind::Energy => write!(f, "energy"),
        }
    }
}

/// Signature of a procedure callable through a [`ProcedureTable`].
///
/// The arguments are the host, the procedure name, an optional reference wavefunction and the
/// procedure options.
pub type Procedure<H> = fn(
    &mut H,
    &str,
    Option<<H as Host>::Wfn>,
    &ProcedureOptions,
) -> Result<<H as Host>::Wfn, anyhow::Error>;

/// Table of named procedures, keyed by computation kind and case-insensitive name.
pub struct ProcedureTable<H: Host> {
    procedures: IndexMap<(ComputationKind, String), Procedure<H>>,
}

impl<H: Host> Default for ProcedureTable<H> {
    fn default() -> Self {
        Self {
            procedures: IndexMap::new(),
        }
    }
}

impl<H: Host> ProcedureTable<H> {
    /// Creates an empty procedure table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `procedure` for the computation `kind` under `name`, replacing any procedure
    /// previously registered there.
    pub fn register(&mut self, kind: ComputationKind, name: &str, procedure: Procedure<H>) {
        log::debug!("Registering procedure `{name}` for {kind} computations.");
        self.procedures.insert((kind, name.to_lowercase()), procedure);
    }

    /// Returns `true` if a procedure is registered for `kind` under `name`.
    pub fn contains(&self, kind: ComputationKind, name: &str) -> bool {
        self.procedures.contains_key(&(kind, name.to_lowercase()))
    }

    /// Calls the procedure registered for `kind` under `name`.
    ///
    /// # Errors
    ///
    /// Errors with [`EfpGamessError::UnknownProcedure`] if nothing is registered there, or with
    /// whatever the procedure itself returns.
    pub fn call(
        &self,
        host: &mut H,
        kind: ComputationKind,
        name: &str,
        ref_wfn: Option<H::Wfn>,
        options: &ProcedureOptions,
    ) -> Result<H::Wfn, anyhow::Error> {
        let lname = name.to_lowercase();
        let procedure = self
            .procedures
            .get(&(kind, lname.clone()))
            .ok_or_else(|| format_err!(EfpGamessError::UnknownProcedure(lname.clone())))?;
        procedure(host, &lname, ref_wfn, options)
    }
}
