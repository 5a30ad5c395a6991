use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcripdf::output;
use transcripdf::utils;
use transcripdf::{Cli, Commands, Config, OutputFormat, TranscriptError, TranscriptPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcripdf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().await?;

    match cli.command {
        Commands::Fetch {
            url,
            output,
            format,
            languages,
            fallback_languages,
            translate_to,
            no_translate,
        } => {
            let mut config = config;

            // Command-line language flags override the configured policy
            if !languages.is_empty() {
                config.languages.preferred = languages;
            }
            if !fallback_languages.is_empty() {
                config.languages.fallback = fallback_languages;
            }
            if no_translate {
                config.languages.target = None;
            } else if let Some(target) = translate_to {
                config.languages.target = Some(target);
            }

            let show_raw = config.app.show_raw_errors || cli.verbose;
            let pipeline = TranscriptPipeline::new(config.clone());

            tracing::info!("Starting transcript lookup for URL: {}", url);

            let spinner = make_spinner(cli.quiet, "Searching caption tracks...");
            let result = pipeline.fetch_from_url(&url).await;
            spinner.finish_and_clear();

            let result = match result {
                Ok(result) => result,
                Err(error) => {
                    report_error(&error, show_raw);
                    std::process::exit(1);
                }
            };

            let translated_note = result
                .translated_from
                .as_deref()
                .map(|language| format!(" (translated from '{language}')"))
                .unwrap_or_default();
            println!(
                "{} Transcript found: {} segments, language '{}'{}",
                style("✔").green(),
                result.metadata.segment_count,
                result.language,
                translated_note
            );
            if result.is_generated {
                println!("  Captions are auto-generated; expect rough edges.");
            }

            // PDF always goes to a file; text and JSON print to the console
            // unless a path was given
            let path = match (&output, &format) {
                (Some(path), _) => Some(path.clone()),
                (None, OutputFormat::Pdf) => {
                    let name = utils::default_artifact_name(&result.video_id, &format);
                    Some(match &config.app.output_dir {
                        Some(dir) => dir.join(name),
                        None => PathBuf::from(name),
                    })
                }
                (None, _) => None,
            };

            match path {
                Some(path) => {
                    output::save_to_file(&result, &path, &format).await?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&result, &format)?;
                }
            }
        }
        Commands::Tracks { url } => {
            let show_raw = config.app.show_raw_errors || cli.verbose;
            let pipeline = TranscriptPipeline::new(config);

            let spinner = make_spinner(cli.quiet, "Listing caption tracks...");
            let catalog = pipeline.list_tracks_from_url(&url).await;
            spinner.finish_and_clear();

            match catalog {
                Ok(catalog) => {
                    if let Some(title) = &catalog.title {
                        println!("{}", style(title).bold());
                    }
                    if catalog.is_empty() {
                        println!("No caption tracks published for video {}", catalog.video_id);
                    } else {
                        println!("Caption tracks for video {}:", catalog.video_id);
                        for track in &catalog.tracks {
                            println!(
                                "  • {:10} [{}]{}{}",
                                track.language_code,
                                track.kind.as_str(),
                                if track.is_translatable { ", translatable" } else { "" },
                                track
                                    .name
                                    .as_deref()
                                    .map(|name| format!(" - {name}"))
                                    .unwrap_or_default()
                            );
                        }
                    }
                }
                Err(error) => {
                    report_error(&error, show_raw);
                    std::process::exit(1);
                }
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.interactive_setup().await?;
            }
        }
    }

    Ok(())
}

fn make_spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Short message plus likely causes; raw detail only when the operator asks
fn report_error(error: &TranscriptError, show_raw: bool) {
    eprintln!("{} {}", style("❌").red(), error);
    for hint in error.hints() {
        eprintln!("   {} {}", style("•").dim(), hint);
    }
    if show_raw {
        eprintln!("   {}", style(format!("{error:?}")).dim());
    }
}
