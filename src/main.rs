// logretain - reconcile a generated CloudFormation template against the
// deployed stack before submission.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use logretain::{before_finalize_with_config, init_tracing};
use logretain_core::Template;

#[derive(Parser)]
#[command(
    name = "logretain",
    version,
    about = "Apply log group deletion policy and drop already-existing log groups from a template"
)]
struct Args {
    /// Path to the generated template JSON (rewritten in place)
    template: PathBuf,

    /// Retain log groups instead of deleting them on stack removal
    #[arg(long)]
    retain_logs: bool,

    /// Service name (overrides config)
    #[arg(long)]
    service: Option<String>,

    /// Deployment stage (overrides config)
    #[arg(long)]
    stage: Option<String>,

    /// Config file path (default: ./logretain.toml lookup)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => logretain_config::load_from_file_path(path)?,
        None => logretain_config::load_or_default()?,
    };
    if args.retain_logs {
        config.reconcile.retain_logs = true;
    }
    if let Some(service) = args.service {
        config.target.service = service;
    }
    if let Some(stage) = args.stage {
        config.target.stage = Some(stage);
    }
    config.validate()?;

    init_tracing(&config);

    let content = fs::read_to_string(&args.template)
        .with_context(|| format!("Failed to read template: {}", args.template.display()))?;
    let mut template: Template = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse template: {}", args.template.display()))?;

    before_finalize_with_config(&mut template, &config).await?;

    let serialized =
        serde_json::to_string_pretty(&template).context("Failed to serialize template")?;
    fs::write(&args.template, serialized)
        .with_context(|| format!("Failed to write template: {}", args.template.display()))?;

    Ok(())
}
