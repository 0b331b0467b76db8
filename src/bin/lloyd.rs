//! Command line front-end for lloyd-kmeans.
//!
//! - `lloyd generate --dims 2 --points 500`: write uniform random points in `[0, 50)` to `dummy_data.txt`
//! - `lloyd cluster --input data.txt --k 3`: cluster a text matrix and write the centroids to `output.txt`
//! - `lloyd cluster --generate-dims 2 --generate-points 500 --k 3`: both of the above in one go

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lloyd_kmeans::{textio, EmptyClusterPolicy, KMeans, KMeansConfig, KMeansError, PointSet};
use rand::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DATA_FILE: &str = "dummy_data.txt";
const DEFAULT_OUTPUT_FILE: &str = "output.txt";
const GENERATE_LOW: f64 = 0.0;
const GENERATE_HIGH: f64 = 50.0;

#[derive(Parser)]
#[command(name = "lloyd")]
#[command(version)]
#[command(about = "k-means clustering of text matrices with Lloyd's algorithm")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate uniformly distributed dummy data
    Generate(GenerateArgs),
    /// Cluster a dataset and write the resulting centroids
    Cluster(ClusterArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Dimension of the generated points
    #[arg(long)]
    dims: usize,
    /// Number of points to generate
    #[arg(long)]
    points: usize,
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    output: PathBuf,
    /// Seed for the random generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ClusterArgs {
    /// Text matrix with one point per line
    #[arg(short, long, conflicts_with_all = ["generate_dims", "generate_points"])]
    input: Option<PathBuf>,
    /// Generate dummy data with this dimension first (written to dummy_data.txt)
    #[arg(long, requires = "generate_points")]
    generate_dims: Option<usize>,
    /// Amount of dummy points to generate first
    #[arg(long, requires = "generate_dims")]
    generate_points: Option<usize>,
    /// Number of clusters
    #[arg(short, long)]
    k: usize,
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,
    /// Seed for the random generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 300)]
    max_iter: usize,
    /// Convergence tolerance for the summed centroid displacement per iteration
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,
    #[arg(long, value_enum, default_value_t = EmptyClusters::Retain)]
    empty_clusters: EmptyClusters,
    /// Decimals written per coordinate
    #[arg(long, default_value_t = textio::DEFAULT_PRECISION)]
    precision: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmptyClusters {
    Retain,
    ReseedFarthest,
}
impl From<EmptyClusters> for EmptyClusterPolicy {
    fn from(v: EmptyClusters) -> Self {
        match v {
            EmptyClusters::Retain => EmptyClusterPolicy::RetainPrevious,
            EmptyClusters::ReseedFarthest => EmptyClusterPolicy::ReseedFarthest,
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn generate(rnd: &mut StdRng, dims: usize, points: usize, output: &Path) -> Result<PointSet<f64>> {
    if dims == 0 || points == 0 {
        bail!("dimension and number of points have to be at least 1");
    }
    let data = textio::generate_uniform(rnd, points, dims, GENERATE_LOW, GENERATE_HIGH)?;
    textio::write_points(output, &data, textio::DEFAULT_PRECISION)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(points, dims, path = %output.display(), "generated dummy data");
    Ok(data)
}

fn run_cluster(args: ClusterArgs) -> Result<()> {
    let mut rnd = make_rng(args.seed);
    let dataset = match (&args.input, args.generate_dims, args.generate_points) {
        (Some(input), _, _) => textio::read_points::<f64, _>(input)
            .with_context(|| format!("reading {}", input.display()))?,
        (None, Some(dims), Some(points)) => generate(&mut rnd, dims, points, Path::new(DEFAULT_DATA_FILE))?,
        _ => bail!("either --input or --generate-dims/--generate-points is required"),
    };
    info!(points = dataset.len(), dims = dataset.dims(), k = args.k, "clustering");

    let kmean = KMeans::from_points(dataset)?;
    let conf = KMeansConfig::build()
        .random_generator(rnd)
        .max_iter(args.max_iter)
        .tolerance(args.tolerance)
        .empty_cluster_policy(args.empty_clusters.into())
        .build();

    let state = match kmean.kmeans_lloyd(args.k, KMeans::init_random_sample, &conf) {
        Ok(state) => state,
        Err(KMeansError::NonConvergence { iterations, displacement, state }) => {
            warn!(iterations, displacement, "writing centroids of a calculation that did not converge");
            *state
        }
        Err(err) => return Err(err.into()),
    };

    textio::write_points(&args.output, &state.centroids, args.precision)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Centroids have been saved in \"{}\" ({} iterations)", args.output.display(), state.iterations);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Generate(args) => {
            let mut rnd = make_rng(args.seed);
            generate(&mut rnd, args.dims, args.points, &args.output)?;
            println!("Dummy data has been saved in \"{}\"", args.output.display());
            Ok(())
        }
        Commands::Cluster(args) => run_cluster(args),
    }
}
