use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{IntegrateAppConfig, InterpolateAppConfig};
use crate::cli::{IntegrateArgs, InterpolateArgs};
use crate::error::{CliError, Result};
use fepath::engine::config::{self as core_config, FitType};
use fepath::engine::integration::IntegrationMethod;
use std::path::Path;
use std::str::FromStr;

pub fn build_integrate_config(args: &IntegrateArgs) -> Result<IntegrateAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let file = file_config.integrate.take().unwrap_or_default();

    let fit_type = match args.fit_type {
        Some(fit_type) => fit_type,
        None => parse_file_value::<FitType>(file.fit_type.as_deref())?.unwrap_or(defaults.fit_type),
    };
    let method = match args.method {
        Some(method) => method,
        None => parse_file_value::<IntegrationMethod>(file.method.as_deref())?
            .unwrap_or(defaults.method),
    };
    let degree = args.degree.or(file.degree).unwrap_or(defaults.degree);
    let dense = args
        .dense
        .as_override()
        .or(file.dense)
        .unwrap_or(defaults.dense);
    let invert_axis = args
        .axis
        .as_override()
        .or(file.invert_axis)
        .unwrap_or(defaults.invert_axis);
    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or(defaults.output_dir);

    let core_config = core_config::IntegrationConfigBuilder::new()
        .fit_type(fit_type)
        .degree(degree)
        .method(method)
        .dense(dense)
        .invert_axis(invert_axis)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(IntegrateAppConfig {
        data_path: args.data.clone(),
        output_dir,
        core_config,
    })
}

pub fn build_interpolate_config(args: &InterpolateArgs) -> Result<InterpolateAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let file = file_config.interpolate.take().unwrap_or_default();

    let mut builder = core_config::InterpolationConfigBuilder::new()
        .num_images(args.images.or(file.images).unwrap_or(defaults.num_images));
    let atom_labels = args
        .atoms
        .as_deref()
        .map(core_config::parse_atom_labels)
        .or(file.atoms);
    if let Some(labels) = atom_labels {
        builder = builder.atom_labels(labels);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or(defaults.output_dir);

    Ok(InterpolateAppConfig {
        initial_path: args.initial.clone(),
        final_path: args.final_path.clone(),
        output_dir,
        core_config,
    })
}

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn parse_file_value<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| v.parse::<T>().map_err(|e| CliError::Config(e.to_string())))
        .transpose()
}

fn parse_set_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

pub(crate) fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "integrate.fit-type" => {
                config.integrate.get_or_insert_with(Default::default).fit_type =
                    Some(value_str.trim().to_string());
            }
            "integrate.degree" => {
                config.integrate.get_or_insert_with(Default::default).degree =
                    Some(parse_set_value(key, value_str, "integer")?);
            }
            "integrate.method" => {
                config.integrate.get_or_insert_with(Default::default).method =
                    Some(value_str.trim().to_string());
            }
            "integrate.dense" => {
                config.integrate.get_or_insert_with(Default::default).dense =
                    Some(parse_set_value(key, value_str, "boolean")?);
            }
            "integrate.invert-axis" => {
                config
                    .integrate
                    .get_or_insert_with(Default::default)
                    .invert_axis = Some(parse_set_value(key, value_str, "boolean")?);
            }
            "integrate.output-dir" => {
                config.integrate.get_or_insert_with(Default::default).output_dir =
                    Some(value_str.trim().into());
            }
            "interpolate.atoms" => {
                config.interpolate.get_or_insert_with(Default::default).atoms =
                    Some(core_config::parse_atom_labels(value_str));
            }
            "interpolate.images" => {
                config.interpolate.get_or_insert_with(Default::default).images =
                    Some(parse_set_value(key, value_str, "integer")?);
            }
            "interpolate.output-dir" => {
                config
                    .interpolate
                    .get_or_insert_with(Default::default)
                    .output_dir = Some(value_str.trim().into());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
