use base::error::KMeansError;
use base::options::KMeansOptions;
use common::vec2::Vec2;
use k_means::{k_means, KMeansOutcome};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::args::{ArgumentParseError, Arguments};
use crate::read::{read_n_objects, read_objects};
use crate::write::write_results;

mod args;
mod read;
mod write;

#[derive(Debug, Error)]
enum RunError {
    #[error("Invalid arguments.")]
    Arguments,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write results: {0}")]
    Write(std::io::Error),
    #[error("Number of clusters ({k}) must not exceed the number of objects ({n}).")]
    TooManyClusters { k: usize, n: usize },
    #[error(transparent)]
    KMeans(#[from] KMeansError),
}

impl From<ArgumentParseError> for RunError {
    fn from(_: ArgumentParseError) -> Self {
        RunError::Arguments
    }
}

fn initial_centers(
    args: &Arguments,
    input: &Path,
    objects: &Vec2<f32>,
) -> Result<Vec2<f32>, RunError> {
    let k = args.clusters;
    match &args.centers {
        Some(centers) if Path::new(centers) != input => {
            let path = PathBuf::from(centers);
            info!("reading initial {k} centers from {}", path.display());
            read_n_objects(&path, args.binary, k, objects.shape_1())
                .map_err(|source| RunError::Read { path, source })
        }
        _ => {
            info!("selecting the first {k} objects as initial centers");
            let rows = objects.rows().take(k).collect::<Vec<_>>();
            Ok(Vec2::from_rows(objects.shape_1(), &rows))
        }
    }
}

fn report(
    args: &Arguments,
    options: &KMeansOptions,
    objects: &Vec2<f32>,
    outcome: &KMeansOutcome,
    io: Duration,
    clustering: Duration,
) {
    let threads = match options.threads {
        Some(threads) => threads.to_string(),
        None => "platform default".to_string(),
    };
    println!("Performing **** Regular Kmeans (parallel version) ****");
    println!("Input file:     {}", args.input);
    println!("numObjs       = {}", objects.shape_0());
    println!("numCoords     = {}", objects.shape_1());
    println!("numClusters   = {}", args.clusters);
    println!("threshold     = {:.4}", options.threshold);
    println!("threads       = {threads}");
    println!("reduction     = {:?}", options.reduction);
    println!("iterations    = {} ({:?})", outcome.iterations, outcome.stop);
    println!("I/O time           = {:10.4} sec", io.as_secs_f64());
    println!("Computation timing = {:10.4} sec", clustering.as_secs_f64());
}

fn run(args: &Arguments) -> Result<(), RunError> {
    args.validate()?;
    let options = args.get_options()?;
    let input = PathBuf::from(&args.input);

    let io_start = Instant::now();
    info!("reading data points from {}", input.display());
    let objects = read_objects(&input, args.binary).map_err(|source| RunError::Read {
        path: input.clone(),
        source,
    })?;
    if objects.shape_0() < args.clusters {
        return Err(RunError::TooManyClusters {
            k: args.clusters,
            n: objects.shape_0(),
        });
    }
    let centers = initial_centers(args, &input, &objects)?;
    for (i, center) in centers.rows().enumerate() {
        debug!("clusters[{i}] = {center:?}");
    }
    let mut io = io_start.elapsed();

    let clustering_start = Instant::now();
    let outcome = k_means(&objects, centers, &options)?;
    let clustering = clustering_start.elapsed();

    let write_start = Instant::now();
    write_results(&input, &outcome.centroids, &outcome.membership).map_err(RunError::Write)?;
    io += write_start.elapsed();

    if args.timing {
        report(args, &options, &objects, &outcome, io, clustering);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Arguments = argh::from_env();
    let mut log_builder = env_logger::builder();
    if args.debug {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else if args.quiet {
        log_builder.filter_level(log::LevelFilter::Warn);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
    debug!("arguments: {args:#?}");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
