use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use tokio::io::AsyncReadExt;

use matchagen::config::{load_config, load_config_from, AppConfig};
use matchagen::dataset::{load_recipes, to_jsonl, BrandScrubber};
use matchagen::prompt::prepare;
use matchagen::{GenerateError, GenerationRequest, Inspiration, RecipeRepairer, RecipeService};

#[derive(Parser)]
#[command(
    name = "matchagen",
    version,
    about = "Generate matcha latte recipes and repair raw model output"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file to load instead of ./matchagen.toml
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a recipe from comma-separated ingredients
    Generate {
        inspiration: String,

        #[arg(long)]
        temperature: Option<f32>,

        #[arg(long)]
        max_length: Option<u32>,
    },

    /// Repair raw model output read from a file or stdin
    Repair {
        /// Comma-separated ingredients the model was prompted with
        #[arg(long)]
        ingredients: String,

        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Turn a recipe corpus into input/target JSONL pairs
    Dataset {
        input: PathBuf,

        /// Write here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Scrub brand names before parsing
        #[arg(long)]
        clean: bool,
    },

    /// Start the HTTP service
    Serve,
}

fn load(path: Option<&str>) -> Result<AppConfig, GenerateError> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            inspiration,
            temperature,
            max_length,
        } => {
            let request = GenerationRequest::new(
                inspiration,
                temperature.unwrap_or(config.generation.temperature),
                max_length.unwrap_or(config.generation.max_length),
            )?;
            let service = RecipeService::builder().config(config).build()?;
            println!("{}", service.generate(&request).await);
        }
        Command::Repair { ingredients, input } => {
            let raw = match input {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };

            let prompt = prepare(&Inspiration::from(ingredients), &config.rules);
            let repairer = RecipeRepairer::new(config.rules)?;
            println!("{}", repairer.repair(&raw, &prompt.ingredients));
        }
        Command::Dataset {
            input,
            output,
            clean,
        } => {
            let mut text = tokio::fs::read_to_string(&input).await?;
            if clean {
                text = BrandScrubber::new()?.clean(&text);
            }

            let recipes = load_recipes(&text);
            let jsonl = to_jsonl(&recipes)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, jsonl).await?;
                    info!("Wrote {} pairs to {}", recipes.len(), path.display());
                }
                None => print!("{}", jsonl),
            }
        }
        Command::Serve => matchagen::server::serve(config).await?,
    }

    Ok(())
}
