use fepath::engine::config::FitType;
use fepath::engine::integration::IntegrationMethod;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub fit_type: FitType,
    pub degree: usize,
    pub method: IntegrationMethod,
    pub dense: bool,
    pub invert_axis: bool,
    pub num_images: usize,
    pub output_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            fit_type: FitType::Polynomial,
            degree: 3,
            method: IntegrationMethod::Quad,
            dense: true,
            invert_axis: false,
            num_images: 9,
            output_dir: PathBuf::from("."),
        }
    }
}
