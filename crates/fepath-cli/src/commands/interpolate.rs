use crate::cli::InterpolateArgs;
use crate::config::build_interpolate_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use fepath::{
    core::io::{poscar::PoscarFile, traits::StructureFile},
    core::models::structure::Structure,
    engine::progress::ProgressReporter,
    workflows::{self, path_images::DirectorySink},
};
use std::fs;
use std::path::Path;
use tracing::info;

fn read_structure(path: &Path) -> Result<Structure> {
    info!("Loading structure from {:?}", path);
    PoscarFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub fn run(args: InterpolateArgs) -> Result<()> {
    let app = build_interpolate_config(&args)?;

    let initial = read_structure(&app.initial_path)?;
    let final_structure = read_structure(&app.final_path)?;

    if app.output_dir.exists() && !app.output_dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Output path {} exists and is not a directory",
            app.output_dir.display()
        )));
    }
    fs::create_dir_all(&app.output_dir)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut sink = DirectorySink::new(&app.output_dir, &app.initial_path, &app.final_path);

    info!(
        "Interpolating between {:?} and {:?} into {:?}",
        &app.initial_path, &app.final_path, &app.output_dir
    );
    let summary = workflows::path_images::run(
        initial,
        final_structure,
        &app.core_config,
        &mut sink,
        &reporter,
    )?;

    for (i, fraction) in summary.fractions.iter().enumerate() {
        info!("Image {:02} at t = {:.4}", i + 1, fraction);
    }
    println!("✓ Moved atoms: {}", summary.selected_labels.join(", "));
    println!(
        "✓ {} images (00-{:02}) written to: {}",
        summary.images_written,
        summary.images_written - 1,
        app.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fepath::engine::error::EngineError;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const POSCAR: &str = "\
Ti O
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
Ti O
1 1
Direct
0.0 0.0 0.0
0.25 0.25 0.25
";

    fn args(dir: &Path, atoms: &str) -> InterpolateArgs {
        let initial = dir.join("POSCAR_initial");
        let final_path = dir.join("POSCAR_final");
        fs::write(&initial, POSCAR).unwrap();
        fs::write(&final_path, POSCAR.replace("0.25 0.25 0.25", "0.75 0.25 0.25")).unwrap();
        InterpolateArgs {
            initial,
            final_path,
            atoms: Some(atoms.to_string()),
            images: Some(3),
            config: None,
            output_dir: Some(dir.join("neb")),
            set_values: vec![],
        }
    }

    #[test]
    fn writes_numbered_image_directories() {
        let dir = tempdir().unwrap();
        run(args(dir.path(), "O1")).unwrap();

        let neb: PathBuf = dir.path().join("neb");
        for i in 0..=4 {
            assert!(neb.join(format!("{:02}", i)).join("POSCAR").is_file());
        }
        let middle = fs::read_to_string(neb.join("02/POSCAR")).unwrap();
        assert!(middle.contains("0.5 0.25 0.25"));
    }

    #[test]
    fn unknown_atom_is_a_core_error() {
        let dir = tempdir().unwrap();
        let err = run(args(dir.path(), "N1")).unwrap_err();
        assert!(matches!(err, CliError::Core(EngineError::AtomNotFound { .. })));
        assert!(!dir.path().join("neb").join("00").exists());
    }

    #[test]
    fn output_path_must_not_be_a_file() {
        let dir = tempdir().unwrap();
        let mut a = args(dir.path(), "O1");
        let file = dir.path().join("occupied");
        fs::write(&file, "").unwrap();
        a.output_dir = Some(file);
        assert!(matches!(run(a), Err(CliError::Argument(_))));
    }
}
