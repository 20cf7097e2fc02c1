//! Run one generateVideo invocation

use anyhow::{Context, Result};
use reel_core::{TaskId, WorkspaceId};
use reel_gen::capability::confirmation_message;
use reel_gen::{
    ActionType, CancelToken, GenerateVideoCapability, InvocationContext, Pipeline,
    PlatformBackend, ReelConfig,
};

pub struct GenerateArgs {
    pub prompt: String,
    pub workspace_id: Option<u64>,
    pub task_id: Option<u64>,
    pub action: String,
    pub provider: Option<String>,
    pub platform: Option<PlatformBackend>,
    pub output: Option<String>,
    pub interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub format: String,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        anyhow::bail!("Unknown format '{}'. Use: text, json", args.format);
    }

    let mut config = ReelConfig::load().context("Failed to load configuration")?;
    apply_overrides(&mut config, &args);

    let ctx = InvocationContext {
        action_type: ActionType::parse(&args.action),
        task_id: args.task_id.map(TaskId),
        workspace_id: args.workspace_id.map(WorkspaceId),
    };

    let pipeline = Pipeline::from_config(&config)?;
    let capability = GenerateVideoCapability::new(pipeline);

    println!(
        "Generating video with '{}' (polling every {}s, up to {} attempts)...",
        config.provider.backend, config.polling.interval_secs, config.polling.max_attempts
    );

    let report = capability.generate_video(&args.prompt, &ctx, &CancelToken::new())?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", confirmation_message(&report));
        println!("  Path: {}", report.asset.path);
        println!("  Size: {} bytes", report.asset.size_bytes);
        println!("  Hash: {}", report.asset.content_hash);
        println!("  Polls: {}", report.poll_attempts);
        println!("  Usage: {:?}", report.usage);
        println!("  Time: {:.1}s", report.elapsed.as_secs_f64());
    }

    Ok(())
}

fn apply_overrides(config: &mut ReelConfig, args: &GenerateArgs) {
    if let Some(provider) = &args.provider {
        config.provider.backend = provider.clone();
    }
    if let Some(platform) = args.platform {
        config.platform.backend = platform;
    }
    if let Some(output) = &args.output {
        config.platform.root = output.clone();
    }
    if let Some(interval) = args.interval_secs {
        config.polling.interval_secs = interval;
    }
    if let Some(max) = args.max_attempts {
        config.polling.max_attempts = max;
    }
}
