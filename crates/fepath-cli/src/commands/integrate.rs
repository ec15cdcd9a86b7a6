use crate::cli::IntegrateArgs;
use crate::config::build_integrate_config;
use crate::error::{CliError, Result};
use crate::render::{CsvPlotRenderer, PlotRenderer, PngPlotRenderer};
use crate::utils::progress::CliProgressHandler;
use fepath::{core::io::force_table::ForceTable, engine::progress::ProgressReporter, workflows};
use std::fs;
use tracing::info;

pub fn run(args: IntegrateArgs) -> Result<()> {
    let app = build_integrate_config(&args)?;

    info!("Loading force table from {:?}", &app.data_path);
    let dataset =
        ForceTable::read_from_path(&app.data_path).map_err(|e| CliError::FileParsing {
            path: app.data_path.clone(),
            source: e.into(),
        })?;
    info!("Loaded {} data point(s).", dataset.len());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = workflows::free_energy::run(&dataset, &app.core_config, &reporter)?;
    info!(
        "{} profile integrated with {} over {} point(s).",
        result.label,
        result.method,
        result.profile.len()
    );

    for point in result.profile.iter() {
        println!("r = {:.4}, G = {:.6} eV", point.coordinate, point.value);
    }
    if let Some(barrier) = result.barrier() {
        println!(
            "Barrier: {:.3} eV at r = {:.4}",
            barrier.value, barrier.coordinate
        );
    }

    fs::create_dir_all(&app.output_dir)?;
    let renderers: [&dyn PlotRenderer; 2] = [
        &PngPlotRenderer::new(&app.output_dir),
        &CsvPlotRenderer::new(&app.output_dir),
    ];
    for renderer in renderers {
        let force_path = renderer.render_force_curve(&dataset, &result)?;
        let profile_path = renderer.render_free_energy(&result)?;
        info!("Plots written to {:?} and {:?}", &force_path, &profile_path);
        println!("✓ Force curve written to: {}", force_path.display());
        println!("✓ Free-energy profile written to: {}", profile_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AxisDirection, DenseSampling};
    use fepath::engine::config::FitType;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(data: PathBuf, output_dir: PathBuf) -> IntegrateArgs {
        IntegrateArgs {
            data,
            config: None,
            fit_type: Some(FitType::Spline),
            degree: None,
            method: None,
            dense: DenseSampling::default(),
            axis: AxisDirection::default(),
            output_dir: Some(output_dir),
            set_values: vec![],
        }
    }

    #[test]
    fn writes_both_plot_files_into_a_new_directory() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("forces.dat");
        fs::write(
            &data,
            "w1 1.0 0.50 0.01\nw2 1.5 0.10 0.01\n\nw3 2.0 -0.20 0.02\nw4 2.5 -0.10 0.01\n",
        )
        .unwrap();
        let output = dir.path().join("plots");

        run(args(data, output.clone())).unwrap();

        for name in [
            "r_vs_g_spline_dense.png",
            "r_vs_tg_spline_dense.png",
            "r_vs_g_spline_dense.csv",
            "r_vs_tg_spline_dense.csv",
        ] {
            assert!(output.join(name).is_file(), "{name}");
        }
    }

    #[test]
    fn too_few_rows_is_reported_with_the_file_name() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("forces.dat");
        fs::write(&data, "w1 1.0 0.50 0.01\nbroken line\n").unwrap();

        let err = run(args(data.clone(), dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path, .. } if path == data));
    }
}
