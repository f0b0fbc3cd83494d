//! Bindings of efp-gamess to other languages.

#[cfg(feature = "python")]
pub mod python;
