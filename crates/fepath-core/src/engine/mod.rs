//! # Engine Module
//!
//! Turns validated configuration and parsed inputs into results for both pipelines.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated option sets built once per run
//! - **Curve Fitting** ([`fitting`]) - Polynomial and cubic-spline fits of mean-force data
//! - **Integration** ([`integration`]) - Cumulative quadrature and trapezoidal integration
//! - **Interpolation** ([`interpolation`]) - Fractional-coordinate blending of selected atoms
//! - **Progress Monitoring** ([`progress`]) - Event callbacks for front ends
//! - **Error Handling** ([`error`]) - The error type shared by the engine and workflows

pub mod config;
pub mod error;
pub mod fitting;
pub mod integration;
pub mod interpolation;
pub mod progress;
