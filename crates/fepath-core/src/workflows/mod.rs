//! # Workflows Module
//!
//! End-to-end entry points for the two pipelines. Each workflow takes validated
//! configuration plus parsed inputs, reports its stages through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and returns plain data
//! for the front end to present.
//!
//! - **Free-energy integration** ([`free_energy`]) - Fits a mean-force dataset and
//!   integrates it into a normalized free-energy profile.
//! - **Path images** ([`path_images`]) - Interpolates selected atoms between two
//!   structures and hands every image to an [`ImageSink`](path_images::ImageSink).

pub mod free_energy;
pub mod path_images;
