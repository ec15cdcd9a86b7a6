//! # fepath Core Library
//!
//! Numerical building blocks for two reaction-path utilities used in computational
//! chemistry: turning a mean-force profile into a free-energy profile, and generating
//! interpolated intermediate images between two crystal structures.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Plain data models (`Dataset`, `Structure`,
//!   `IntegralProfile`), file formats (force tables, POSCAR) and the numeric kernels
//!   (least-squares polynomials, cubic splines, quadrature).
//!
//! - **[`engine`]: The Logic Core.** Validated configuration, curve fitting, cumulative
//!   integration and fractional-coordinate interpolation, together with the error and
//!   progress types shared by both pipelines.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that take a configuration
//!   and parsed inputs and produce a free-energy profile or a chain of path images.

pub mod core;
pub mod engine;
pub mod workflows;
