mod cli;
mod config;
mod logging;
mod model;
mod review;
mod slide;
mod tracker;

use anyhow::Result;
use tracing::{info, warn};

use cli::Command;
use tracker::azure::AzureDevOps;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_arg = match cli::parse_args(&args)? {
        Command::Help => {
            cli::print_help();
            return Ok(());
        }
        Command::Generate { config } => config,
    };

    logging::init();

    let config_path = config::resolve_config_path(config_arg.as_deref());
    let config = config::load_config(&config_path)?;
    info!(path = %config_path.display(), project = %config.project, team = %config.team, "Config loaded");

    let tracker = AzureDevOps::new(&config)?;
    let backlog = review::collect_backlog(&tracker).await?;
    let grouping = review::group_by_feature(&backlog);
    if grouping.is_empty() {
        warn!("No user stories found, the slide body will be empty");
    } else {
        info!(features = grouping.len(), stories = grouping.story_count(), "Backlog grouped");
    }

    let paragraphs = slide::layout(&grouping);
    let file_name = slide::output_file_name(chrono::Local::now().date_naive());
    let output = config.output_dir().join(file_name);
    slide::write_review(&config.template_path, config.slide_index, &paragraphs, &output)?;

    println!("Saved: {}", output.display());
    Ok(())
}
