//! # Core Models Module
//!
//! Data structures passed between the readers, the engine and the writers.
//!
//! - [`dataset`] - Mean-force samples read from a force table
//! - [`profile`] - Cumulative integral (free-energy) profiles
//! - [`structure`] - Crystal structures with fractional atomic coordinates
//!
//! All models are plain values: readers build them once and the engine derives new
//! values from them instead of mutating them in place.

pub mod dataset;
pub mod profile;
pub mod structure;
