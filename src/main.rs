use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use portfolio::{Config, Document, HttpBackend, Marker, Page, markers};

#[derive(Parser)]
#[command(name = "portfolio", version, about = "Drive the portfolio page against its backend")]
struct Cli {
    /// Backend origin (default from ~/.portfolio/config.toml or http://localhost:8080)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the page-load sequence and print the rendered page
    #[command(name = "load")]
    Load {
        /// Titles to request (default from config or 10)
        #[arg(long)]
        count: Option<u32>,
    },

    /// Print a random quote
    #[command(name = "quote")]
    Quote,

    /// Flip the navigation dropdown of a fresh page and print its state
    #[command(name = "toggle")]
    Toggle,

    /// List show titles
    #[command(name = "shows")]
    Shows {
        /// Titles to request (default from config or 10)
        #[arg(long)]
        count: Option<u32>,
    },

    /// Submit a show title
    #[command(name = "add-show")]
    AddShow { text: String },

    /// Delete all stored shows
    #[command(name = "delete-data")]
    DeleteData {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print a fresh blobstore upload URL
    #[command(name = "upload-url")]
    UploadUrl,

    /// List uploaded image URLs
    #[command(name = "images")]
    Images,

    /// List or add map markers
    #[command(name = "markers")]
    Markers {
        #[command(subcommand)]
        action: Option<MarkersAction>,
    },

    /// View or modify config (~/.portfolio/config.toml)
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum MarkersAction {
    /// List all markers
    List,
    /// Store a marker
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current config
    Show,
    /// Set a config value
    Set {
        /// Key to set (base_url, show_count)
        key: String,
        /// Value to set
        value: String,
    },
    /// Reset config to defaults
    Reset,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    let base_url = cli.base_url.clone().unwrap_or_else(|| config.base_url.clone());
    let mut page = Page::new(Document::portfolio(), HttpBackend::new(&base_url));

    match cli.command {
        Commands::Load { count } => {
            block_on(page.on_load(title_count(count, &config)))?;
            println!("{}", page.dom().render().into_string());
        }
        Commands::Quote => {
            println!("{}", page.add_random_quote()?);
        }
        Commands::Toggle => {
            println!("{}", page.toggle_dropdown()?);
        }
        Commands::Shows { count } => {
            let count = title_count(count, &config);
            println!("{}", block_on(page.get_show_titles(count))?);
        }
        Commands::AddShow { text } => {
            block_on(page.add_show(&text))?;
            println!("Added.");
        }
        Commands::DeleteData { yes } => {
            if !yes {
                use dialoguer::{Confirm, theme::ColorfulTheme};
                let confirm = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Delete all data at {base_url}?"))
                    .default(false)
                    .interact()?;
                if !confirm {
                    println!("Delete cancelled.");
                    return Ok(());
                }
            }
            block_on(page.delete_data())?;
            println!("Deleted.");
        }
        Commands::UploadUrl => {
            println!("{}", block_on(page.init_upload_form())?);
        }
        Commands::Images => {
            block_on(page.load_images())?;
            if let Some(container) = page.dom().get(portfolio::dom::IMAGE_CONTAINER) {
                for img in &container.children {
                    if let Some(src) = img.attributes.get("src") {
                        println!("{src}");
                    }
                }
            }
        }
        Commands::Markers { action } => {
            handle_markers(page.backend(), action)?;
        }
        Commands::Config { action } => {
            handle_config(config, action)?;
        }
    }
    Ok(())
}

/// `--count` if given, else the configured `show_count`.
fn title_count(requested: Option<u32>, config: &Config) -> u32 {
    requested.unwrap_or(config.show_count)
}

fn handle_markers(backend: &HttpBackend, action: Option<MarkersAction>) -> Result<()> {
    match action {
        None | Some(MarkersAction::List) => {
            let markers = block_on(markers::list_markers(backend))?;
            if markers.is_empty() {
                println!("No markers found.");
            }
            for marker in markers {
                println!("{}, {}", marker.lat, marker.lng);
            }
        }
        Some(MarkersAction::Add { lat, lng }) => {
            block_on(markers::add_marker(backend, Marker { lat, lng }))?;
            println!("Stored marker at {lat}, {lng}.");
        }
    }
    Ok(())
}

fn handle_config(config: Config, action: Option<ConfigAction>) -> Result<()> {
    match action {
        None | Some(ConfigAction::Show) => {
            println!("base_url = \"{}\"", config.base_url);
            println!("show_count = {}", config.show_count);
        }
        Some(ConfigAction::Set { key, value }) => {
            let mut config = config;
            config.set(&key, &value)?;
            let path = config.save()?;
            println!("saved to {}", path.display());
        }
        Some(ConfigAction::Reset) => {
            let config = Config::default();
            let path = config.save()?;
            println!("reset to defaults at {}", path.display());
        }
    }
    Ok(())
}
