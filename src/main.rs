use anyhow::Result;
use clap::Parser;
use lyrics_merge::models::{MergeConfig, MissingPolicy, DEFAULT_SEED, DEFAULT_TRAIN_FRACTION};
use lyrics_merge::pipeline;
use lyrics_merge::progress::set_log_only;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lyrics-merge")]
#[command(about = "Put lyrics in csv and split it into train/test sets")]
struct Args {
    /// Input metadata CSV (needs mood, artist and title columns)
    #[arg(short, long)]
    input: PathBuf,

    /// Lyrics directory, used as a raw prefix: include the trailing '/'
    #[arg(short, long, default_value = "")]
    directory: String,

    /// Directory for mood_train.csv and mood_test.csv
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, default_value_t = DEFAULT_TRAIN_FRACTION)]
    train_fraction: f64,

    /// What to do with rows whose lyrics file is missing
    #[arg(long, value_enum, default_value_t = MissingPolicy::Skip)]
    on_missing: MissingPolicy,

    /// Omit the leading row-index column from the outputs
    #[arg(long)]
    no_index: bool,

    /// Write run stats as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Hide progress bars and print periodic log lines instead
    #[arg(long)]
    log_only: bool,

    /// Print every metadata row as it is processed
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for MergeConfig {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            directory: args.directory,
            output_dir: args.output_dir,
            seed: args.seed,
            train_fraction: args.train_fraction,
            on_missing: args.on_missing,
            include_index: !args.no_index,
            stats: args.stats,
            verbose: args.verbose,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    pipeline::run(&MergeConfig::from(args))?;
    Ok(())
}
