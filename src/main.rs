use anyhow::{Context, Result};
use clap::{crate_name, crate_version, Args, Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{error, info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::{env, fs};
use upgma::{
    read_distance_table, read_sequences, write_sequences, DistanceTable, PartitionPolicy,
    SequenceSimulator, Upgma, UpgmaParams,
};

#[derive(Parser, Debug)]
#[command(version, about = "UPGMA phylogenetic trees on a group of workers", long_about = None)]
struct ProgramArgs {
    #[command(subcommand)]
    subcommand: ProgramSubcommand,
    #[arg(
        short,
        long,
        default_value = "1",
        global = true,
        help = "Number of cooperating workers"
    )]
    workers: usize,
    #[arg(
        short,
        long,
        default_value = "false",
        conflicts_with = "quiet",
        global = true
    )]
    verbose: bool,
    #[arg(
        short,
        long,
        default_value = "false",
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum ProgramSubcommand {
    #[clap(about = "Build a UPGMA tree and print it in Newick format")]
    Tree(TreeArgs),
    #[clap(about = "Print the Jukes-Cantor distance table of a set of sequences")]
    Dist(DistArgs),
    #[clap(about = "Print randomly generated sequences")]
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct TreeArgs {
    #[arg(short, long, help = "Input file path", required = true)]
    input: String,
    #[arg(short, long, help = "Layout of the input file", default_value = "matrix")]
    format: InputFormat,
    #[arg(short, long, help = "Decimals printed for branch lengths", default_value = "6")]
    precision: usize,
    #[arg(long, help = "Which workers take leftover rows", default_value = "remainder-first")]
    partition: PartitionArg,
}

#[derive(Args, Debug)]
struct DistArgs {
    #[arg(short, long, help = "Sequence file path", required = true)]
    input: String,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[arg(help = "Number of sequences")]
    n_sequences: usize,
    #[arg(help = "Length of every sequence")]
    length: usize,
    #[arg(long, help = "Probability of a gap at each position", default_value = "0")]
    gap_prob: f64,
    #[arg(long, help = "Probability of an N at each position", default_value = "0")]
    ambiguous_prob: f64,
    #[arg(long, help = "Seed for reproducible output")]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum InputFormat {
    /// Named rows of pairwise distances
    Matrix,
    /// A `<count> <length>` header and one `<name> <symbols>` line per sequence
    Sequences,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PartitionArg {
    RemainderFirst,
    RemainderLast,
}

impl From<PartitionArg> for PartitionPolicy {
    fn from(arg: PartitionArg) -> Self {
        match arg {
            PartitionArg::RemainderFirst => PartitionPolicy::RemainderFirst,
            PartitionArg::RemainderLast => PartitionPolicy::RemainderLast,
        }
    }
}

fn set_log_level(matches: &ProgramArgs, program_name: &str, version: &str) {
    let mut log_level = LevelFilter::Info;
    if matches.verbose {
        log_level = LevelFilter::Debug;
    }
    if matches.quiet {
        log_level = LevelFilter::Error;
    }
    let mut builder = Builder::new();
    builder.filter_level(log_level);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        eprintln!("Logger was already initialised");
    }
    info!("{} version {}", program_name, version);
}

fn run_tree(args: TreeArgs, n_workers: usize) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading input file {}", args.input))?;
    let params = UpgmaParams::builder()
        .n_workers(n_workers)
        .partition(args.partition.into())
        .precision(args.precision)
        .build();

    let tree = match args.format {
        InputFormat::Matrix => {
            let table: DistanceTable<f64> =
                read_distance_table(&text).context("parsing distance table")?;
            cluster(Upgma::new(&table, params))
        }
        InputFormat::Sequences => {
            let sequences = read_sequences(&text).context("parsing sequences")?;
            cluster(Upgma::new(&sequences, params))
        }
    }?;
    println!("{tree}");
    Ok(())
}

fn cluster(model: Upgma<'_, f64>) -> Result<String> {
    let tree = if model.params().n_workers() > 1 {
        model.cluster_distributed()
    } else {
        model.cluster()
    }
    .context("building the UPGMA tree")?;
    Ok(tree.to_newick(model.params().precision()))
}

fn run_dist(args: DistArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading input file {}", args.input))?;
    let sequences = read_sequences(&text).context("parsing sequences")?;
    let table: DistanceTable<f64> = DistanceTable::from_sequences(&sequences);
    print!("{table}");
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sequences = SequenceSimulator::new(args.n_sequences, args.length)
        .gap_prob(args.gap_prob)
        .ambiguous_prob(args.ambiguous_prob)
        .generate(&mut rng)
        .context("simulating sequences")?;
    print!("{}", write_sequences(&sequences));
    Ok(())
}

fn main() {
    let app = ProgramArgs::parse();
    set_log_level(&app, crate_name!(), crate_version!());

    let result = match app.subcommand {
        ProgramSubcommand::Tree(args) => run_tree(args, app.workers),
        ProgramSubcommand::Dist(args) => run_dist(args),
        ProgramSubcommand::Simulate(args) => run_simulate(args),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
