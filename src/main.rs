use chopsmo_recipes::{
    ChopsmoConfig, ChopsmoError, Fetched, GroceryList, IngredientNormalizer, IngredientRecord,
    RecipeClientBuilder,
};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(name = "chopsmo", version, about = "Normalize and fetch ChopSmo recipes")]
struct Cli {
    /// Backend base URL (overrides configuration)
    #[arg(long, env = "CHOPSMO_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize ingredient data read from a file or stdin
    Normalize {
        /// Input file; JSON is normalized structurally, anything else as free text
        file: Option<PathBuf>,
        /// Print a merged grocery list instead of records
        #[arg(long)]
        grocery: bool,
    },
    /// Fetch a recipe by id
    Recipe { id: String },
    /// Search recipes
    Search { query: String },
}

#[tokio::main]
async fn main() -> Result<(), ChopsmoError> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = ChopsmoConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = Some(base_url);
    }

    match cli.command {
        Command::Normalize { file, grocery } => {
            let input = read_input(file).await?;
            let normalizer = IngredientNormalizer::from_config(&config.normalizer);
            let records = normalize_input(&normalizer, &input);
            info!("Normalized {} ingredients", records.len());

            if grocery {
                let mut list = GroceryList::with_units(normalizer.units().clone());
                for record in &records {
                    list.add("", record);
                }
                print_json(&list.items())
            } else {
                print_json(&records)
            }
        }
        Command::Recipe { id } => {
            let client = RecipeClientBuilder::from_config(&config).build()?;
            let mut recipe = client.fetch_recipe(&id).await?;
            recipe.ingredients = chopsmo_recipes::ingredients_or_placeholder(recipe.ingredients);
            print_json(&recipe)
        }
        Command::Search { query } => {
            let client = RecipeClientBuilder::from_config(&config).build()?;
            match client.search_recipes(&query).await? {
                Fetched::Current(results) => print_json(&results),
                Fetched::Superseded => Ok(()),
            }
        }
    }
}

async fn read_input(file: Option<PathBuf>) -> Result<String, ChopsmoError> {
    match file {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}

fn normalize_input(normalizer: &IngredientNormalizer, input: &str) -> Vec<IngredientRecord> {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => normalizer.normalize(&value),
        Err(e) => {
            debug!("Input is not JSON ({}), treating it as free text", e);
            normalizer.normalize_text(input)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ChopsmoError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
