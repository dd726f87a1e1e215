use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aquascape::{
    api,
    catalog::{CatalogStore, EquipmentFilter, LivestockFilter},
    config::Config,
    db,
    editor::{FontSize, FormatCommand, HeadingLevel, RichTextEditor, TextColor},
    models::{AquariumBuild, UpdateBuildInput},
    photos, render,
    session::{BuildSession, SessionScope},
};

#[derive(Parser)]
#[command(name = "aqs")]
#[command(about = "Plan an aquarium build from a catalog of equipment, fish and plants")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        section: CatalogSection,
    },
    /// Print the current build listing
    Show,
    /// Add a catalog item to the build
    Add {
        kind: ItemKind,
        id: String,
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Remove an item from the build
    Remove { kind: ItemKind, id: String },
    /// Change build details
    Set {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long, conflicts_with = "private")]
        public: bool,
        #[arg(long)]
        private: bool,
    },
    /// Replace the build description
    Describe {
        text: String,
        /// Treat TEXT as HTML instead of plain text
        #[arg(long)]
        html: bool,
        #[command(flatten)]
        style: DescribeStyle,
    },
    /// Manage gallery photos
    Photo {
        #[command(subcommand)]
        action: PhotoAction,
    },
    /// Discard the build and start over
    Reset,
    /// Print the effective configuration, or change the config file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Formatting applied to the whole description of a plain-text `describe`.
#[derive(clap::Args)]
struct DescribeStyle {
    #[arg(long, conflicts_with = "html")]
    bold: bool,
    #[arg(long, conflicts_with = "html")]
    italic: bool,
    #[arg(long, conflicts_with = "html")]
    underline: bool,
    /// Heading level 1-3
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3), conflicts_with = "html")]
    heading: Option<u8>,
    /// Font size in px (12, 16, 20 or 24)
    #[arg(long, conflicts_with = "html")]
    size: Option<u32>,
    /// Palette color as hex, e.g. #2563EB
    #[arg(long, conflicts_with = "html")]
    color: Option<String>,
}

impl DescribeStyle {
    fn commands(&self) -> anyhow::Result<Vec<FormatCommand>> {
        let mut commands = Vec::new();
        if let Some(level) = self.heading {
            let level = match level {
                1 => HeadingLevel::H1,
                2 => HeadingLevel::H2,
                _ => HeadingLevel::H3,
            };
            commands.push(FormatCommand::Heading(level));
        }
        if self.bold {
            commands.push(FormatCommand::Bold);
        }
        if self.italic {
            commands.push(FormatCommand::Italic);
        }
        if self.underline {
            commands.push(FormatCommand::Underline);
        }
        if let Some(px) = self.size {
            let size = FontSize::from_px(px).with_context(|| {
                let choices: Vec<String> = FontSize::ALL
                    .iter()
                    .map(|s| format!("{} ({})", s.px(), s.label()))
                    .collect();
                format!("Unsupported size {}px; choose one of {}", px, choices.join(", "))
            })?;
            commands.push(FormatCommand::FontSize(size));
        }
        if let Some(hex) = &self.color {
            let color = TextColor::from_hex(hex).with_context(|| {
                let choices: Vec<&str> = TextColor::PALETTE.iter().map(|c| c.hex()).collect();
                format!("{} is not in the palette: {}", hex, choices.join(" "))
            })?;
            commands.push(FormatCommand::Color(color));
        }
        Ok(commands)
    }

    /// Type `text` into a fresh editor and apply every flag to all of it.
    fn format(&self, text: &str) -> anyhow::Result<String> {
        let commands = self.commands()?;
        let mut editor = RichTextEditor::new("");
        editor.type_text(text);
        let len = editor.document().len();
        editor.select(0, len);
        for command in commands {
            editor.toolbar_pointer_down();
            editor.apply(command);
        }
        Ok(editor.html())
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write values to the config file
    Set {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        share_url: Option<String>,
        #[arg(long)]
        db: Option<PathBuf>,
        /// Allowed CORS origin, repeatable; replaces the stored list
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CatalogSection {
    /// List equipment
    Equipment {
        /// Search text
        #[arg(short, long)]
        query: Option<String>,
        /// Category filter, repeatable
        #[arg(short, long)]
        category: Vec<String>,
    },
    /// List fish and plants
    Livestock {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        kind: Option<String>,
    },
}

#[derive(Subcommand)]
enum PhotoAction {
    /// Add image files to the gallery
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove the photo at INDEX (0-based)
    Remove { index: usize },
}

#[derive(Clone, Copy, ValueEnum)]
enum ItemKind {
    Equipment,
    Fish,
    Plant,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "aquascape=info,tower_http=info".into()),
    );

    // Logs go to stderr so listings on stdout stay clean
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_session(config: &Config, catalog: &CatalogStore) -> anyhow::Result<BuildSession> {
    let db = match &config.db_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let session = BuildSession::load(db, AquariumBuild::draft(config.author.clone()))?
        .with_comments(catalog.sample_comments().iter().cloned());
    Ok(session)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load();
    let catalog = CatalogStore::builtin()?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let session = open_session(&config, &catalog)?;
            let state = api::AppState::new(
                Arc::new(catalog),
                Arc::new(SessionScope::active(session)),
                config.share_base_url.clone(),
            );
            let app = api::create_router(state, &config.cors_origins);

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("Aquascape listening on http://127.0.0.1:{}", port);

            axum::serve(listener, app).await?;
        }
        Commands::Catalog { section } => match section {
            CatalogSection::Equipment { query, category } => {
                let mut filter = EquipmentFilter {
                    query: query.unwrap_or_default(),
                    ..Default::default()
                };
                for name in &category {
                    let category = aquascape::models::EquipmentCategory::from_str(name)
                        .with_context(|| format!("Unknown equipment category: {}", name))?;
                    filter.categories.insert(category);
                }
                for item in catalog.search_equipment(&filter) {
                    let price = item
                        .cheapest_price()
                        .map(|p| format!("${:.2}", p))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<12} {:<16} {:>9}  {}",
                        item.id,
                        item.category.as_str(),
                        price,
                        item.name
                    );
                }
            }
            CatalogSection::Livestock { query, kind } => {
                let kind = match kind {
                    Some(kind) => Some(
                        aquascape::models::LivestockKind::from_str(&kind)
                            .with_context(|| format!("Unknown livestock kind: {}", kind))?,
                    ),
                    None => None,
                };
                let filter = LivestockFilter {
                    query: query.unwrap_or_default(),
                    kind,
                };
                for item in catalog.search_livestock(&filter) {
                    println!(
                        "{:<10} {:<6} {} ({})",
                        item.id,
                        item.kind.as_str(),
                        item.name,
                        item.scientific_name
                    );
                }
            }
        },
        Commands::Show => {
            let session = open_session(&config, &catalog)?;
            print!("{}", render::render_listing(session.build(), session.comments()));
            match session.share_url(&config.share_base_url) {
                Some(url) => println!("\nShare: {}", url),
                None => println!("\nPrivate build; `aqs set --public` to get a share link"),
            }
        }
        Commands::Add { kind, id, quantity } => {
            let mut session = open_session(&config, &catalog)?;
            match kind {
                ItemKind::Equipment => {
                    let item = catalog
                        .find_equipment(&id)
                        .with_context(|| format!("Equipment not found: {}", id))?;
                    session.add_equipment(item, quantity)?;
                }
                ItemKind::Fish | ItemKind::Plant => {
                    let item = catalog
                        .find_livestock(&id)
                        .with_context(|| format!("Livestock not found: {}", id))?;
                    let wanted = match kind {
                        ItemKind::Fish => aquascape::models::LivestockKind::Fish,
                        _ => aquascape::models::LivestockKind::Plant,
                    };
                    anyhow::ensure!(
                        item.kind == wanted,
                        "{} is a {}, not a {}",
                        id,
                        item.kind.as_str(),
                        wanted.as_str()
                    );
                    session.add_livestock(item, quantity)?;
                }
            }
            println!("Added {}", id);
        }
        Commands::Remove { kind, id } => {
            let mut session = open_session(&config, &catalog)?;
            match kind {
                ItemKind::Equipment => session.remove_equipment(&id)?,
                ItemKind::Fish => session.remove_fish(&id)?,
                ItemKind::Plant => session.remove_plant(&id)?,
            }
            println!("Removed {}", id);
        }
        Commands::Set {
            title,
            author,
            public,
            private,
        } => {
            let mut session = open_session(&config, &catalog)?;
            let is_public = match (public, private) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            session.update_build(UpdateBuildInput {
                title,
                author,
                is_public,
                ..Default::default()
            })?;
            println!("Updated {}", session.build().title);
        }
        Commands::Describe { text, html, style } => {
            let description = if html { text } else { style.format(&text)? };
            let mut session = open_session(&config, &catalog)?;
            session.update_build(UpdateBuildInput {
                description: Some(description),
                ..Default::default()
            })?;
            println!("Description updated");
        }
        Commands::Photo { action } => {
            let session = open_session(&config, &catalog)?;
            let scope = SessionScope::active(session);
            match action {
                PhotoAction::Add { paths } => {
                    let report = photos::upload_photos(&scope, paths).await?;
                    for path in &report.added {
                        println!("Added {}", path.display());
                    }
                    for (path, reason) in &report.failed {
                        eprintln!("Skipped {}: {}", path.display(), reason);
                    }
                }
                PhotoAction::Remove { index } => {
                    scope.try_with(|session| session.remove_photo(index))?;
                    println!("Removed photo {}", index);
                }
            }
        }
        Commands::Reset => {
            let mut session = open_session(&config, &catalog)?;
            session.reset_build()?;
            println!("Build reset");
        }
        Commands::Config { action: None } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if let Ok(path) = aquascape::config::get_config_path() {
                println!("# file: {}", path.display());
            }
        }
        Commands::Config {
            action:
                Some(ConfigAction::Set {
                    port,
                    author,
                    share_url,
                    db,
                    cors_origins,
                }),
        } => {
            // Start from the file alone so environment overrides are not persisted
            let path = aquascape::config::get_config_path()?;
            let mut stored = Config::load_from(&path)?;
            if let Some(port) = port {
                stored.port = port;
            }
            if let Some(author) = author {
                stored.author = author;
            }
            if let Some(url) = share_url {
                stored.share_base_url = url;
            }
            if db.is_some() {
                stored.db_path = db;
            }
            if !cors_origins.is_empty() {
                stored.cors_origins = cors_origins;
            }
            let saved = stored.save()?;
            println!("Saved {}", saved.display());
        }
    }

    Ok(())
}
