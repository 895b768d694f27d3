// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_context::{
    answer_query, describe, is_content_empty, measure_content, render_projection, spawn_heartbeat,
    AnswerComposer, AppConfig, AppError, Assistant, AssistantConfig, CommandLineInput,
    ContentSource, HeartbeatConfig, LocalDelivery, OutputFormat, OutputPlan, PageContentReader,
    PageId, ResultDelivery, RunMode,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Sets up logging configuration.
///
/// Console output goes to stderr so stdout carries only results.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_context.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("console", Box::new(console_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Prints the page's text and image projections.
async fn run_read(
    reader: &PageContentReader,
    page_id: &PageId,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), AppError> {
    let content = reader.fetch(page_id).await?;

    let summary = measure_content(&content);
    log::info!("Read {}: {}", page_id, describe(&summary));
    for malformed in content.malformed() {
        log::debug!("  skipped {}", malformed);
    }
    if is_content_empty(&summary) {
        eprintln!("⚠️  Page {} has no text or images to report.", page_id);
    }

    let rendered = render_projection(&content.projection(), format)?;
    let written_to = output.clone();
    LocalDelivery.deliver(OutputPlan::to_file_or_stdout(output, rendered))?;

    if let Some(path) = written_to {
        eprintln!("✓ Page content saved to {}", path.display());
    }
    Ok(())
}

/// Answers a single question and prints the reply.
async fn run_ask(
    reader: &PageContentReader,
    page_id: &PageId,
    query: &str,
    config: &AssistantConfig,
) -> Result<(), AppError> {
    let assistant = Assistant::connect(config)?;
    let answer = answer_query(reader, &assistant, page_id, query).await?;

    log::info!("Text analysis: {}", answer.text_analysis);
    log::info!("Image analysis: {}", answer.image_analysis);
    println!("{}", answer.reply);
    Ok(())
}

/// One line of `serve` output.
#[derive(Serialize)]
#[serde(untagged)]
enum ServeReply<'a> {
    Answer { query: &'a str, reply: String },
    Failure { query: &'a str, error: String },
}

/// Relay loop: one question per stdin line, one JSON reply per stdout line.
///
/// Every question reads the page afresh. A failed question is reported on its
/// own line and the loop carries on.
async fn run_serve(
    reader: &PageContentReader,
    page_id: &PageId,
    config: &AssistantConfig,
    heartbeat: HeartbeatConfig,
) -> Result<(), AppError> {
    let assistant = Assistant::connect(config)?;
    let heartbeat = spawn_heartbeat(heartbeat);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let reply = match serve_one(reader, &assistant, page_id, query).await {
            Ok(reply) => ServeReply::Answer { query, reply },
            Err(e) => {
                report_failure(&e);
                ServeReply::Failure {
                    query,
                    error: e.to_string(),
                }
            }
        };

        let mut encoded = serde_json::to_string(&reply)?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    log::info!(
        "Input closed; stopping heartbeat after {} beats ({} failed writes)",
        heartbeat.beats(),
        heartbeat.failures()
    );
    heartbeat.shutdown();
    Ok(())
}

async fn serve_one(
    source: &dyn ContentSource,
    composer: &dyn AnswerComposer,
    page_id: &PageId,
    query: &str,
) -> Result<String, AppError> {
    Ok(answer_query(source, composer, page_id, query).await?.reply)
}

/// Explains failures the user can fix themselves.
fn report_failure(error: &AppError) {
    match error {
        AppError::RemoteFetch { code, body, .. } if code.is_access_problem() => {
            log::error!("{}", error);
            log::debug!("Response body: {}", body);
            eprintln!(
                "❌ {}. Check that NOTION_API_KEY is valid and the page is shared with the integration.",
                error
            );
        }
        AppError::RemoteFetch { body, .. } => {
            log::error!("{}", error);
            log::debug!("Response body: {}", body);
        }
        _ => log::error!("{}", error),
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let reader = PageContentReader::connect(&config.reader)?;
    let page_id = config.page_id;

    match config.mode {
        RunMode::Read { format, output } => run_read(&reader, &page_id, format, output).await,
        RunMode::Ask { query, assistant } => run_ask(&reader, &page_id, &query, &assistant).await,
        RunMode::Serve {
            assistant,
            heartbeat,
        } => run_serve(&reader, &page_id, &assistant, heartbeat).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("failed to initialise logging")?;

    let config = AppConfig::resolve(cli).context("invalid configuration")?;

    if let Err(e) = run(config).await {
        report_failure(&e);
        return Err(e.into());
    }

    Ok(())
}
