use billcorpus::prelude::*;
use billcorpus::pipeline;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Change-tracked LegiScan dataset pipeline
#[derive(Parser, Debug)]
#[command(name = "billcorpus")]
#[command(about = "Fetch legislative datasets, build the bill table, index sponsors, train topics")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// Data directory holding all pipeline artifacts
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// LegiScan API key (can also use LEGISCAN_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// State code for listing and file naming
    #[arg(long, default_value = "US")]
    state: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect changed datasets, download and extract them, rebuild the table
    Collect {
        #[command(flatten)]
        common: CommonArgs,

        /// Extra fetch attempts per dataset (default 0: no implicit retry)
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },

    /// Rebuild the sponsor index from the cumulative table
    Sponsors {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Derive the token corpus and retrain the topic model
    Train {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of topics
        #[arg(long, default_value_t = 5)]
        topics: usize,

        /// Gibbs sweeps
        #[arg(long, default_value_t = 200)]
        iterations: usize,

        /// RNG seed for reproducible training
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run collect, sponsors, and train in order
    Run {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, default_value_t = 0)]
        retries: u32,

        #[arg(long, default_value_t = 5)]
        topics: usize,

        #[arg(long, default_value_t = 200)]
        iterations: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn build_config(common: &CommonArgs) -> anyhow::Result<ConfigBuilder> {
    Ok(ConfigBuilder::new(&common.data_dir)
        .api_key_or_env(common.api_key.clone())
        .state(&common.state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();
    match args.command {
        Command::Collect { common, retries } => {
            let config = build_config(&common)?.fetch_retries(retries).build()?;
            let client = LegiscanClient::new(&config)?;
            let store = FileChangeStore::new(config.change_hash_path());
            pipeline::run_collect(&config, &client, &store).await?;
        }
        Command::Sponsors { common } => {
            let config = build_config(&common)?.build()?;
            pipeline::run_sponsors(&config)?;
        }
        Command::Train {
            common,
            topics,
            iterations,
            seed,
        } => {
            let mut builder = build_config(&common)?
                .num_topics(topics)
                .train_iterations(iterations);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            pipeline::run_train(&builder.build()?)?;
        }
        Command::Run {
            common,
            retries,
            topics,
            iterations,
            seed,
        } => {
            let mut builder = build_config(&common)?
                .fetch_retries(retries)
                .num_topics(topics)
                .train_iterations(iterations);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            let config = builder.build()?;
            let client = LegiscanClient::new(&config)?;
            let store = FileChangeStore::new(config.change_hash_path());
            pipeline::run_all(&config, &client, &store).await?;
        }
    }
    Ok(())
}
