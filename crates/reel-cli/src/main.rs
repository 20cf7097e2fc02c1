//! Reel CLI - Run the generateVideo capability from a terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, generate, schema};

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Generate a video from a prompt and deliver it to a workspace", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a video and upload it
    Generate {
        /// Text prompt describing the video
        prompt: String,

        /// Workspace that receives the file
        #[arg(long)]
        workspace_id: Option<u64>,

        /// Task being executed (required with --action do-task)
        #[arg(long)]
        task_id: Option<u64>,

        /// Host action type (do-task, respond-chat-message)
        #[arg(long, default_value = "do-task")]
        action: String,

        /// Provider override (veo, mock)
        #[arg(long)]
        provider: Option<String>,

        /// Platform override (openserv, local)
        #[arg(long, value_parser = parse_platform)]
        platform: Option<reel_gen::PlatformBackend>,

        /// Root directory for the local platform
        #[arg(long)]
        output: Option<String>,

        /// Seconds between status polls
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Give up after this many status polls
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show resolved configuration
    Config,

    /// Print the capability descriptor registered with the host
    Schema,
}

fn parse_platform(s: &str) -> Result<reel_gen::PlatformBackend, String> {
    match s {
        "openserv" => Ok(reel_gen::PlatformBackend::OpenServ),
        "local" => Ok(reel_gen::PlatformBackend::Local),
        _ => Err(format!("unknown platform '{}'; valid values: openserv, local", s)),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            prompt,
            workspace_id,
            task_id,
            action,
            provider,
            platform,
            output,
            interval_secs,
            max_attempts,
            format,
        } => generate::run(generate::GenerateArgs {
            prompt,
            workspace_id,
            task_id,
            action,
            provider,
            platform,
            output,
            interval_secs,
            max_attempts,
            format,
        }),
        Commands::Config => config::run(),
        Commands::Schema => schema::run(),
    }
}
