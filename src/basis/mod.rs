//! Basis-set information needed to relate basis-function ordering conventions.

pub mod ao;
