use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

use b64_bot::application::errors::BotError;
use b64_bot::application::messaging::MessageDispatcher;
use b64_bot::application::services::{CommandService, MessageService};
use b64_bot::domain::traits::Bot;
use b64_bot::infrastructure::adapters::console::{ConsoleAdapter, CONSOLE_CHAT_ID};
use b64_bot::infrastructure::adapters::TelegramAdapter;
use b64_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "b64-bot")]
#[command(about = "Telegram bot that encodes and decodes base64", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("b64-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path);

    tracing::info!("Starting {}", config.bot.name);

    let mut commands = CommandService::new(&config.bot.prefix);
    commands.register_defaults();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    match config.resolve_token(token_override) {
        Some(token) => rt.block_on(run_telegram_bot(&config, token, commands)),
        None => {
            tracing::warn!("No bot token configured, running console bot (dev mode)");
            rt.block_on(run_console_bot(commands))
        }
    }
}

async fn run_telegram_bot(config: &Config, token: String, commands: CommandService) -> Result<(), BotError> {
    let mut bot = TelegramAdapter::new(token).with_api_url(&config.telegram.api_url);

    bot.fetch_bot_info().await?;
    let info = bot.bot_info();

    if config.telegram.register_commands {
        if let Err(e) = bot.register_commands(&commands.descriptions()).await {
            tracing::warn!("Failed to register commands: {}", e);
        }
    }

    bot.start().await?;

    let dispatcher = MessageDispatcher::new(commands).with_bot_username(&info.username);
    let service = MessageService::new(bot, dispatcher);

    let mut offset: i64 = 0;
    let timeout = config.telegram.poll_timeout_secs;
    let retry_delay = Duration::from_secs(config.telegram.retry_delay_secs);

    tracing::info!("bot is running...");

    loop {
        let updates = tokio::select! {
            updates = service.bot().get_updates(offset, timeout) => updates,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
        };

        match updates {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }

                for update in &updates {
                    let Some(msg) = &update.message else {
                        continue;
                    };
                    let Some(text) = msg.text.as_deref() else {
                        continue;
                    };

                    let message = service
                        .dispatcher()
                        .parse(msg.chat.id.to_string(), text, msg.sender())
                        .with_id(msg.message_id.to_string())
                        .with_timestamp(msg.timestamp());

                    // Failures are logged by the service; keep polling.
                    let _ = service.handle(message).await;
                }

                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}

async fn run_console_bot(commands: CommandService) -> Result<(), BotError> {
    let bot = ConsoleAdapter::new();
    bot.start().await?;

    let service = MessageService::new(bot, MessageDispatcher::new(commands));

    loop {
        let Some(input) = service.bot().read_line("> ").await else {
            return Ok(());
        };

        if let Err(e) = service.handle_text(CONSOLE_CHAT_ID, &input, None).await {
            let _ = service.bot().send_message(CONSOLE_CHAT_ID, &format!("Error: {}", e)).await;
        }
    }
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
