use crate::core::io::poscar::{PoscarError, PoscarFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use crate::engine::config::InterpolationConfig;
use crate::engine::error::EngineError;
use crate::engine::interpolation::{BaseStructure, InterpolationPlan};
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File name of the structure inside every image directory.
pub const IMAGE_FILE_NAME: &str = "POSCAR";

/// One entry of the image chain.
#[derive(Debug, Clone, Copy)]
pub enum PathImage<'a> {
    /// Image `00`, the initial structure as given.
    Initial,
    Interpolated {
        fraction: f64,
        base: BaseStructure,
        structure: &'a Structure,
    },
    /// Image `n + 1`, the final structure as given.
    Final,
}

/// Destination of the generated images.
pub trait ImageSink {
    fn write(&mut self, index: usize, image: &PathImage<'_>) -> io::Result<()>;
}

/// Writes every image to `<root>/<index:02>/POSCAR`.
///
/// The endpoint images are byte copies of the source files, so anything the parser
/// does not keep survives unchanged.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    initial_path: PathBuf,
    final_path: PathBuf,
}

impl DirectorySink {
    pub fn new(
        root: impl Into<PathBuf>,
        initial_path: impl Into<PathBuf>,
        final_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            initial_path: initial_path.into(),
            final_path: final_path.into(),
        }
    }

    pub fn image_dir(&self, index: usize) -> PathBuf {
        self.root.join(format!("{:02}", index))
    }

    fn copy_endpoint(source: &Path, target: &Path) -> io::Result<()> {
        fs::copy(source, target).map(|_| ())
    }
}

impl ImageSink for DirectorySink {
    fn write(&mut self, index: usize, image: &PathImage<'_>) -> io::Result<()> {
        let dir = self.image_dir(index);
        fs::create_dir_all(&dir)?;
        let target = dir.join(IMAGE_FILE_NAME);
        match image {
            PathImage::Initial => Self::copy_endpoint(&self.initial_path, &target),
            PathImage::Final => Self::copy_endpoint(&self.final_path, &target),
            PathImage::Interpolated { structure, .. } => {
                PoscarFile::write_to_path(structure, &target).map_err(|e| match e {
                    PoscarError::Io(err) => err,
                    other => io::Error::other(other),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSummary {
    /// Endpoints included.
    pub images_written: usize,
    pub selected_labels: Vec<String>,
    pub fractions: Vec<f64>,
}

/// Validates the endpoints, then writes `num_images + 2` images to `sink` in index order.
///
/// Nothing is written when validation fails.
#[instrument(skip_all, name = "path_images_workflow")]
pub fn run(
    initial: Structure,
    final_structure: Structure,
    config: &InterpolationConfig,
    sink: &mut impl ImageSink,
    reporter: &ProgressReporter,
) -> Result<PathSummary, EngineError> {
    reporter.report(Progress::StageStart {
        name: "Validation",
    });
    let plan = InterpolationPlan::new(initial, final_structure, config)?;
    reporter.report(Progress::StageFinish);
    info!(
        "Interpolating {} atom(s) over {} intermediate image(s).",
        plan.selected().len(),
        plan.num_images()
    );

    let total = config.total_images();
    let last = total - 1;
    reporter.report(Progress::ImagesStart {
        total: total as u64,
    });
    write_image(sink, 0, &PathImage::Initial)?;
    reporter.report(Progress::ImageWritten { index: 0 });

    let mut fractions = Vec::with_capacity(plan.num_images());
    for (index, fraction, base, structure) in plan.images() {
        debug!("Image {:02}: t = {:.4}, spectators from {:?}.", index, fraction, base);
        write_image(
            sink,
            index,
            &PathImage::Interpolated {
                fraction,
                base,
                structure: &structure,
            },
        )?;
        fractions.push(fraction);
        reporter.report(Progress::ImageWritten { index });
    }

    write_image(sink, last, &PathImage::Final)?;
    reporter.report(Progress::ImageWritten { index: last });
    reporter.report(Progress::ImagesFinish);

    info!("Wrote {} image(s).", total);
    Ok(PathSummary {
        images_written: total,
        selected_labels: config.atom_labels.clone(),
        fractions,
    })
}

fn write_image(
    sink: &mut impl ImageSink,
    index: usize,
    image: &PathImage<'_>,
) -> Result<(), EngineError> {
    sink.write(index, image)
        .map_err(|source| EngineError::ImageOutput { index, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::InterpolationConfigBuilder;
    use std::io::Write;
    use tempfile::tempdir;

    const INITIAL: &str = "\
water on slab
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
O H
1 2
Selective dynamics
Direct
0.950000 0.100000 0.200000 T T T
0.100000 0.200000 0.300000 T T T
0.500000 0.500000 0.500000 F F F
";

    const FINAL: &str = "\
water on slab
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
O H
1 2
Selective dynamics
Direct
0.100000 0.500000 0.600000 T T T
0.300000 0.400000 0.500000 T T T
0.550000 0.550000 0.550000 F F F
";

    #[derive(Default)]
    struct RecordingSink {
        written: Vec<(usize, Option<Structure>)>,
    }

    impl ImageSink for RecordingSink {
        fn write(&mut self, index: usize, image: &PathImage<'_>) -> io::Result<()> {
            let structure = match image {
                PathImage::Interpolated { structure, .. } => Some((*structure).clone()),
                _ => None,
            };
            self.written.push((index, structure));
            Ok(())
        }
    }

    struct FailingSink;

    impl ImageSink for FailingSink {
        fn write(&mut self, _index: usize, _image: &PathImage<'_>) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    fn parse(text: &str) -> Structure {
        PoscarFile::read_from(&mut text.as_bytes()).unwrap()
    }

    fn config(labels: &[&str], n: usize) -> InterpolationConfig {
        InterpolationConfigBuilder::new()
            .atom_labels(labels.iter().map(|s| s.to_string()).collect())
            .num_images(n)
            .build()
            .unwrap()
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn images_are_emitted_in_index_order() {
        let mut sink = RecordingSink::default();
        let summary = run(
            parse(INITIAL),
            parse(FINAL),
            &config(&["O1"], 3),
            &mut sink,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(summary.images_written, 5);
        assert_eq!(summary.fractions, vec![0.25, 0.5, 0.75]);
        assert_eq!(summary.selected_labels, vec!["O1"]);
        let indices: Vec<usize> = sink.written.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(sink.written[0].1.is_none());
        assert!(sink.written[4].1.is_none());

        let middle = sink.written[2].1.as_ref().unwrap();
        let o = middle.atoms[0].coordinate.values();
        assert!((o[0] - 0.525).abs() < 1e-12);
    }

    #[test]
    fn progress_covers_validation_and_every_image() {
        let events = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let tag = match event {
                Progress::StageStart { name } => name.to_string(),
                Progress::StageFinish => "done".to_string(),
                Progress::ImagesStart { total } => format!("start {}", total),
                Progress::ImageWritten { index } => format!("image {}", index),
                Progress::ImagesFinish => "finish".to_string(),
            };
            events.lock().unwrap().push(tag);
        }));
        run(
            parse(INITIAL),
            parse(FINAL),
            &config(&["O1"], 1),
            &mut RecordingSink::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                "Validation", "done", "start 3", "image 0", "image 1", "image 2", "finish"
            ]
        );
    }

    #[test]
    fn validation_failure_writes_nothing() {
        let mut sink = RecordingSink::default();
        let err = run(
            parse(INITIAL),
            parse(FINAL),
            &config(&["N1"], 3),
            &mut sink,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::AtomNotFound { .. }));
        assert!(sink.written.is_empty());
    }

    #[test]
    fn sink_failures_name_the_image() {
        let err = run(
            parse(INITIAL),
            parse(FINAL),
            &config(&["O1"], 1),
            &mut FailingSink,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::ImageOutput { index: 0, .. }));
    }

    #[test]
    fn directory_sink_writes_a_full_chain() {
        let inputs = tempdir().unwrap();
        let output = tempdir().unwrap();
        let initial_path = write_file(inputs.path(), "POSCAR_initial", INITIAL);
        let final_path = write_file(inputs.path(), "POSCAR_final", FINAL);

        let initial = PoscarFile::read_from_path(&initial_path).unwrap();
        let final_structure = PoscarFile::read_from_path(&final_path).unwrap();
        let mut sink = DirectorySink::new(output.path(), &initial_path, &final_path);
        run(
            initial,
            final_structure,
            &config(&["H1", "H2"], 9),
            &mut sink,
            &ProgressReporter::new(),
        )
        .unwrap();

        let mut dirs: Vec<String> = fs::read_dir(output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        dirs.sort();
        let expected: Vec<String> = (0..=10).map(|i| format!("{:02}", i)).collect();
        assert_eq!(dirs, expected);

        let read_image = |i: usize| fs::read_to_string(sink.image_dir(i).join(IMAGE_FILE_NAME)).unwrap();
        assert_eq!(read_image(0), INITIAL);
        assert_eq!(read_image(10), FINAL);

        let images: Vec<Structure> = (1..=9).map(|i| parse(&read_image(i))).collect();
        for atom_index in [1, 2] {
            let xs: Vec<f64> = images
                .iter()
                .map(|s| s.atoms[atom_index].coordinate.values()[0])
                .collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]), "{xs:?}");
        }
        for (i, image) in images.iter().enumerate() {
            assert!(image.selective_dynamics);
            let spectator = if i < 4 { "0.950000" } else { "0.100000" };
            assert_eq!(image.atoms[0].coordinate.components()[0].token(), spectator);
        }
    }
}
