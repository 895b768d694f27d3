// src/config.rs
//! Command-line surface and configuration resolution.
//!
//! The environment is read here, once, and nowhere else. Everything the
//! library needs arrives through the structs below.

use crate::constants::{
    ANALYSIS_MAX_TOKENS, DEFAULT_HEALTH_FILE, DEFAULT_HEALTH_INTERVAL, DEFAULT_SYNTHESIS_MODEL,
    DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL, NOTION_API_BASE_URL, NOTION_API_PAGE_SIZE,
    OPENAI_API_BASE_URL, SYNTHESIS_MAX_TOKENS,
};
use crate::error::AppError;
use crate::extract::ImagePolicy;
use crate::types::{ApiKey, PageId, PageSize, ValidatedUrl};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the page's text context and image URLs
    Read {
        #[command(flatten)]
        page: PageArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Answer one question about the page
    Ask {
        /// The question to answer
        query: String,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        models: ModelArgs,
    },

    /// Answer one question per stdin line while keeping a health file fresh
    Serve {
        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        models: ModelArgs,

        /// File rewritten by the heartbeat task
        #[arg(long, default_value = DEFAULT_HEALTH_FILE)]
        health_file: PathBuf,

        /// Seconds between heartbeat writes
        #[arg(long, default_value_t = DEFAULT_HEALTH_INTERVAL.as_secs())]
        health_interval: u64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Notion page URL or ID (falls back to NOTION_PAGE_ID)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Blocks requested per listing call (1-100)
    #[arg(long, default_value_t = NOTION_API_PAGE_SIZE)]
    pub page_size: u32,

    /// Also report images hosted outside Notion
    #[arg(long, default_value_t = false)]
    pub include_external_images: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model used for the text analysis
    #[arg(long, default_value = DEFAULT_TEXT_MODEL)]
    pub text_model: String,

    /// Model used for the image analysis
    #[arg(long, default_value = DEFAULT_VISION_MODEL)]
    pub vision_model: String,

    /// Model used to merge both analyses into one reply
    #[arg(long, default_value = DEFAULT_SYNTHESIS_MODEL)]
    pub synthesis_model: String,

    /// Completion token cap for each analysis
    #[arg(long, default_value_t = ANALYSIS_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Completion token cap for the merged reply
    #[arg(long, default_value_t = SYNTHESIS_MAX_TOKENS)]
    pub synthesis_max_tokens: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything the page reader needs.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub api_key: ApiKey,
    pub page_size: PageSize,
    pub image_policy: ImagePolicy,
    pub api_base_url: ValidatedUrl,
}

/// Everything the chat-completion assistant needs.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: ApiKey,
    pub api_base_url: ValidatedUrl,
    pub text_model: String,
    pub vision_model: String,
    pub synthesis_model: String,
    pub analysis_max_tokens: u32,
    pub synthesis_max_tokens: u32,
}

/// Where and how often the liveness file is refreshed.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    pub path: PathBuf,
    pub interval: Duration,
}

/// What the binary was asked to do.
#[derive(Debug, Clone)]
pub enum RunMode {
    Read {
        format: OutputFormat,
        output: Option<PathBuf>,
    },
    Ask {
        query: String,
        assistant: AssistantConfig,
    },
    Serve {
        assistant: AssistantConfig,
        heartbeat: HeartbeatConfig,
    },
}

/// Resolved configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub page_id: PageId,
    pub reader: ReaderConfig,
    pub mode: RunMode,
    pub verbose: bool,
}

impl AppConfig {
    /// Resolves configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves configuration with an explicit variable lookup.
    pub fn resolve_with<E>(cli: CommandLineInput, env: E) -> Result<Self, AppError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let (page, mode) = match cli.command {
            Command::Read {
                page,
                format,
                output,
            } => (page, RunMode::Read { format, output }),
            Command::Ask {
                query,
                page,
                models,
            } => {
                if query.trim().is_empty() {
                    return Err(AppError::MissingConfiguration(
                        "query must not be empty".to_string(),
                    ));
                }
                let assistant = resolve_assistant(&models, &env)?;
                (page, RunMode::Ask { query, assistant })
            }
            Command::Serve {
                page,
                models,
                health_file,
                health_interval,
            } => {
                let assistant = resolve_assistant(&models, &env)?;
                let heartbeat = HeartbeatConfig {
                    path: health_file,
                    interval: Duration::from_secs(health_interval.max(1)),
                };
                (
                    page,
                    RunMode::Serve {
                        assistant,
                        heartbeat,
                    },
                )
            }
        };

        let raw_page = page
            .page
            .clone()
            .or_else(|| env("NOTION_PAGE_ID"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "no page given: pass --page or set NOTION_PAGE_ID".to_string(),
                )
            })?;

        Ok(AppConfig {
            page_id: PageId::parse(&raw_page)?,
            reader: resolve_reader(&page, &env)?,
            mode,
            verbose: cli.verbose,
        })
    }
}

fn require<E>(env: &E, name: &str) -> Result<String, AppError>
where
    E: Fn(&str) -> Option<String>,
{
    env(name).ok_or_else(|| {
        AppError::MissingConfiguration(format!("{} environment variable not set", name))
    })
}

fn resolve_reader<E>(page: &PageArgs, env: &E) -> Result<ReaderConfig, AppError>
where
    E: Fn(&str) -> Option<String>,
{
    let image_policy = if page.include_external_images {
        ImagePolicy::IncludeExternal
    } else {
        ImagePolicy::NotionHostedOnly
    };

    Ok(ReaderConfig {
        api_key: ApiKey::notion(require(env, "NOTION_API_KEY")?)?,
        page_size: PageSize::new(page.page_size)?,
        image_policy,
        api_base_url: ValidatedUrl::parse(
            &env("NOTION_API_BASE_URL").unwrap_or_else(|| NOTION_API_BASE_URL.to_string()),
        )?,
    })
}

fn resolve_assistant<E>(models: &ModelArgs, env: &E) -> Result<AssistantConfig, AppError>
where
    E: Fn(&str) -> Option<String>,
{
    Ok(AssistantConfig {
        api_key: ApiKey::new(require(env, "OPENAI_API_KEY")?)?,
        api_base_url: ValidatedUrl::parse(
            &env("OPENAI_API_BASE_URL").unwrap_or_else(|| OPENAI_API_BASE_URL.to_string()),
        )?,
        text_model: models.text_model.clone(),
        vision_model: models.vision_model.clone(),
        synthesis_model: models.synthesis_model.clone(),
        analysis_max_tokens: models.max_tokens,
        synthesis_max_tokens: models.synthesis_max_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const PAGE: &str = "550e8400e29b41d4a716446655440000";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn parse(args: &[&str]) -> CommandLineInput {
        CommandLineInput::try_parse_from(std::iter::once("notion-context").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn read_uses_defaults_and_env_page() {
        let config = AppConfig::resolve_with(
            parse(&["read"]),
            env(&[
                ("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz"),
                ("NOTION_PAGE_ID", PAGE),
            ]),
        )
        .unwrap();

        assert_eq!(config.page_id.as_str(), PAGE);
        assert_eq!(config.reader.page_size.get(), 100);
        assert_eq!(config.reader.image_policy, ImagePolicy::NotionHostedOnly);
        assert_eq!(config.reader.api_base_url.as_str(), "https://api.notion.com/v1");
        assert!(matches!(
            config.mode,
            RunMode::Read {
                format: OutputFormat::Text,
                output: None
            }
        ));
    }

    #[test]
    fn explicit_page_wins_over_env() {
        let other = "11111111222233334444555555555555";
        let config = AppConfig::resolve_with(
            parse(&["read", "--page", other, "--include-external-images"]),
            env(&[
                ("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz"),
                ("NOTION_PAGE_ID", PAGE),
            ]),
        )
        .unwrap();

        assert_eq!(config.page_id.as_str(), other);
        assert_eq!(config.reader.image_policy, ImagePolicy::IncludeExternal);
    }

    #[test]
    fn ask_requires_an_openai_key() {
        let result = AppConfig::resolve_with(
            parse(&["ask", "what changed?", "--page", PAGE]),
            env(&[("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz")]),
        );
        assert!(matches!(result, Err(AppError::MissingConfiguration(msg)) if msg.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn serve_builds_heartbeat_and_models() {
        let config = AppConfig::resolve_with(
            parse(&[
                "serve",
                "--page",
                PAGE,
                "--health-file",
                "/tmp/custom-health",
                "--health-interval",
                "5",
                "--synthesis-model",
                "gpt-4o-mini",
            ]),
            env(&[
                ("NOTION_API_KEY", "ntn_abcdefghijklmnopqrstuvwxyz"),
                ("OPENAI_API_KEY", "sk-test"),
            ]),
        )
        .unwrap();

        match config.mode {
            RunMode::Serve {
                assistant,
                heartbeat,
            } => {
                assert_eq!(heartbeat.path, PathBuf::from("/tmp/custom-health"));
                assert_eq!(heartbeat.interval, Duration::from_secs(5));
                assert_eq!(assistant.synthesis_model, "gpt-4o-mini");
                assert_eq!(assistant.text_model, DEFAULT_TEXT_MODEL);
                assert_eq!(assistant.synthesis_max_tokens, 150);
            }
            other => panic!("expected serve mode, got {:?}", other),
        }
    }

    #[test]
    fn missing_page_and_bad_sizes_are_rejected() {
        let key = ("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz");
        assert!(matches!(
            AppConfig::resolve_with(parse(&["read"]), env(&[key])),
            Err(AppError::MissingConfiguration(_))
        ));
        assert!(matches!(
            AppConfig::resolve_with(
                parse(&["read", "--page", PAGE, "--page-size", "500"]),
                env(&[key])
            ),
            Err(AppError::Validation(_))
        ));
    }
}
