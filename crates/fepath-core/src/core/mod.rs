//! # Core Module
//!
//! Stateless data models, file formats and numeric kernels shared by the free-energy
//! and structure-interpolation pipelines.
//!
//! - **Data Models** ([`models`]) - Force datasets, integral profiles and crystal structures
//! - **File I/O** ([`io`]) - Whitespace-delimited force tables and POSCAR structure files
//! - **Numerics** ([`numeric`]) - Polynomial least squares, not-a-knot cubic splines,
//!   adaptive Gauss–Kronrod quadrature and the trapezoidal rule

pub mod io;
pub mod models;
pub mod numeric;
