use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tvseries_catalog::catalog_store::{
    Catalog, DeleteScope, SeasonField, DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_WIDTH,
};
use tvseries_catalog::config::{AppConfig, CliConfig, FileConfig};
use tvseries_catalog::sqlite_persistence::{Condition, ConditionOp};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Folder scanned for fanart images, defaults to "fanart" next to the database.
    #[clap(long, value_parser = parse_path)]
    pub fanart_dir: Option<PathBuf>,

    /// Folder holding series and season banners, defaults to "banners" next to the database.
    #[clap(long, value_parser = parse_path)]
    pub banners_dir: Option<PathBuf>,

    /// Skip the viewer-only filters (online episodes, local files).
    #[clap(long)]
    pub config_mode: bool,

    #[clap(long, default_value_t = DEFAULT_THUMBNAIL_WIDTH)]
    pub thumbnail_width: u32,

    #[clap(long, default_value_t = DEFAULT_THUMBNAIL_HEIGHT)]
    pub thumbnail_height: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the catalog, running pending migrations, and report the schema version.
    Migrate,

    /// List the seasons of a series in display order.
    Seasons {
        series_id: i64,
        /// Ignore the standard filters.
        #[clap(long)]
        all: bool,
    },

    /// Resolve the fanart of a series or season.
    Fanart {
        series_id: i64,
        #[clap(long)]
        season: Option<i32>,
    },

    /// Return the fanart thumbnail of a series, generating it when missing.
    Thumbnail { series_id: i64 },

    /// Delete the cached fanart thumbnails and records of a series.
    ClearFanartCache { series_id: i64 },

    /// Hide or unhide a season and its episodes.
    HideSeason {
        series_id: i64,
        season: i32,
        #[clap(long)]
        unhide: bool,
    },

    /// Delete a season's episodes from disk and/or the database.
    DeleteSeason {
        series_id: i64,
        season: i32,
        #[clap(long, value_enum, default_value = "database")]
        scope: DeleteScope,
    },
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.db_path.clone(),
        fanart_dir: cli_args.fanart_dir.clone(),
        banners_dir: cli_args.banners_dir.clone(),
        config_mode: cli_args.config_mode,
        thumbnail_width: cli_args.thumbnail_width,
        thumbnail_height: cli_args.thumbnail_height,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let catalog = Catalog::open_path(&config.db_path, config.catalog_settings())?;
    config.apply_options(catalog.options())?;

    match cli_args.command {
        Command::Migrate => match catalog.last_migration() {
            Some(outcome) => println!(
                "season schema: {} -> {} (applied {:?}, skipped {:?})",
                outcome.from_version, outcome.to_version, outcome.applied, outcome.skipped
            ),
            None => println!("season migration halted, see the log for details"),
        },
        Command::Seasons { series_id, all } => {
            let mut seasons = if all {
                let condition =
                    Condition::with(SeasonField::SeriesId, series_id, ConditionOp::Equal);
                catalog.seasons().get_with(&condition, false)?
            } else {
                catalog.seasons_of_series(series_id, &Condition::new())?
            };
            catalog.sort_seasons(&mut seasons);
            for season in seasons {
                println!(
                    "{}\t{}\t{} episodes, {} unwatched{}",
                    season.id,
                    season.title,
                    season.episode_count,
                    season.episodes_unwatched,
                    if season.hidden { " (hidden)" } else { "" }
                );
            }
        }
        Command::Fanart { series_id, season } => {
            let fanart = match season {
                Some(index) => catalog.fanart().season_fanart(series_id, index),
                None => catalog.fanart().fanart(series_id),
            };
            match fanart.filename() {
                Some(path) => println!("{}", path.display()),
                None => println!("no fanart found"),
            }
            if fanart.random_pick_is_light() {
                println!("light image");
            }
            if let Some(colors) = fanart.colors() {
                let hex: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
                println!("colors: {}", hex.join(" "));
            }
        }
        Command::Thumbnail { series_id } => {
            match catalog.fanart().fanart(series_id).thumbnail_filename() {
                Some(path) => println!("{}", path.display()),
                None => println!("no thumbnail available"),
            }
        }
        Command::ClearFanartCache { series_id } => {
            let deleted = catalog.fanart().clear_thumbnail_cache(series_id)?;
            info!("Deleted {} cached thumbnails of series {}", deleted, series_id);
        }
        Command::HideSeason {
            series_id,
            season,
            unhide,
        } => {
            let mut season = catalog.season(series_id, season)?;
            catalog.hide_season(&mut season, !unhide)?;
        }
        Command::DeleteSeason {
            series_id,
            season,
            scope,
        } => {
            let mut season = catalog.season(series_id, season)?;
            let failures = catalog.delete_season(&mut season, scope)?;
            for failure in &failures {
                println!("could not delete {}", failure);
            }
        }
    }

    Ok(())
}
