use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Packdev - resolve loader components and assemble launcher instances
#[derive(Parser, Debug)]
#[command(name = "packdev")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "PACKDEV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Metadata service endpoint
    #[arg(long, global = true, env = "PACKDEV_META_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Maximum concurrent metadata fetches per round
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Loader selection shared by `resolve` and `pack`.
#[derive(Args, Debug, Clone)]
pub struct LoaderArgs {
    /// Mod loader (vanilla, forge, fabric, quilt, neoforge)
    #[arg(short, long, default_value = "vanilla")]
    pub loader: String,

    /// Minecraft version
    #[arg(short, long)]
    pub minecraft: String,

    /// Loader version (required for every loader except vanilla)
    #[arg(long)]
    pub loader_version: Option<String>,

    /// Extra seed component as `uid=version`
    #[arg(long = "component")]
    pub components: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the component list for a loader
    Resolve {
        #[command(flatten)]
        loader: LoaderArgs,

        /// Print the pack manifest JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Resolve and write a launcher instance folder
    Pack {
        #[command(flatten)]
        loader: LoaderArgs,

        /// Instance name
        #[arg(short, long)]
        name: String,

        /// Instance directory to write
        #[arg(short, long)]
        output: PathBuf,

        /// Java executable recorded in instance.cfg
        #[arg(long)]
        java: Option<PathBuf>,

        /// Max memory in MB recorded in instance.cfg
        #[arg(long)]
        memory: Option<u32>,

        /// Replace an existing mmc-pack.json
        #[arg(long)]
        overwrite: bool,
    },

    /// Fetch and print a single component descriptor
    Describe {
        /// Component uid, e.g. net.fabricmc.fabric-loader
        uid: String,
        /// Component version
        version: String,
    },

    /// List supported loaders and their components
    Loaders,
}
