//! Provides input/output functionality for the two file formats handled by fepath.
//!
//! Structure files implement the [`traits::StructureFile`] trait so that readers and
//! writers can operate on any buffered reader or writer as well as on file paths.
//! Force tables are read-only and are parsed leniently, row by row.

pub mod force_table;
pub mod poscar;
pub mod traits;
