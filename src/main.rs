use clap::{Parser, Subcommand};
use hfgen::logger::{self, LogLevel, LoggerConfig};
use hfgen::{validate_prompt, AvailabilityState, GenerationOptions, HfClient, HfConfig};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hfgen", version, about = "Generate images with Hugging Face hosted models")]
struct Cli {
    /// API key; falls back to HF_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append log lines to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an image, falling back through the configured models
    Generate {
        prompt: String,
        #[arg(long)]
        negative_prompt: Option<String>,
        #[arg(long)]
        steps: Option<u32>,
        #[arg(long)]
        guidance_scale: Option<f32>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Output file; defaults to ai-generated-<millis>.<ext>
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check which models currently accept requests
    Probe,
    /// List the configured models in priority order
    Models,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let mut logger_config = if cli.json_logs {
        LoggerConfig::production()
    } else if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::new().with_level(LogLevel::Info)
    };
    if !io::stderr().is_terminal() {
        logger_config = logger_config.with_colors(false);
    }
    if let Some(path) = &cli.log_file {
        logger_config = logger_config.with_file_output(path);
    }
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::debug!(".env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let mut config = HfConfig::from_env();
    if let Some(key) = cli.api_key.filter(|key| !key.trim().is_empty()) {
        config = config.with_api_key(key);
    }
    logger::log_client_info(&config);

    let client = HfClient::new(config.clone())?;

    match cli.command {
        Command::Models => {
            for (i, candidate) in client.image().candidates().iter().enumerate() {
                println!("{}. {} -> {}", i + 1, candidate.id, candidate.endpoint);
            }
        }
        Command::Probe => {
            if config.api_key.is_none() {
                log::warn!("No API key set; every model will report as unauthorized");
            }
            let _timer = logger::timer("Availability probe");
            for entry in client.check_availability().await {
                let marker = match entry.state() {
                    AvailabilityState::Available => "✅",
                    AvailabilityState::Loading => "⏳",
                    AvailabilityState::Unavailable => "❌",
                };
                match &entry.error {
                    Some(detail) => {
                        println!("{} {:<12} {} ({})", marker, entry.state(), entry.model, detail)
                    }
                    None => println!("{} {:<12} {}", marker, entry.state(), entry.model),
                }
            }
        }
        Command::Generate {
            prompt,
            negative_prompt,
            steps,
            guidance_scale,
            width,
            height,
            output,
        } => {
            let prompt = validate_prompt(&prompt)?;
            let options = GenerationOptions {
                negative_prompt,
                num_inference_steps: steps,
                guidance_scale,
                width,
                height,
            };

            let _timer = logger::timer("Image generation");
            let image = tokio::select! {
                result = client.generate(prompt, Some(options)) => result?,
                _ = tokio::signal::ctrl_c() => {
                    log::warn!("Generation cancelled");
                    return Ok(());
                }
            };

            let path = output.unwrap_or_else(|| PathBuf::from(image.default_file_name()));
            image.save(&path)?;
            println!(
                "Saved {} ({} bytes, {}) from {}",
                path.display(),
                image.size(),
                image.mime_type(),
                image.model
            );
        }
    }

    Ok(())
}
