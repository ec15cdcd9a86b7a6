pub mod integrate;
pub mod interpolate;
