use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use playlist_plex_importer as lib;
use lib::api::http::HttpBackend;
use lib::api::ImportBackend;
use lib::config::ClientConfig;
use lib::extract::ExtractionClient;
use lib::importer::ImportController;
use lib::models::{ImportForm, PlexConfig, Source};
use lib::progress::ProgressSnapshot;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "playlist-plex-importer", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a third-party playlist and print its songs
    Extract {
        /// Playlist source platform ("netease" or "qq")
        #[arg(long)]
        source: String,

        /// Playlist URL or ID
        #[arg(long)]
        url_or_id: String,
    },
    /// Start an import task and follow its progress until it finishes
    Import {
        /// Source playlist URL
        #[arg(long)]
        playlist_url: String,

        /// Plex server URL (defaults to the server-stored config)
        #[arg(long)]
        plex_url: Option<String>,

        /// Plex token (defaults to the server-stored config)
        #[arg(long)]
        plex_token: Option<String>,

        /// Target playlist name (defaults to the server-stored config)
        #[arg(long)]
        playlist_name: Option<String>,

        /// Import mode: "create_new" or "update_existing"
        #[arg(long)]
        mode: Option<String>,
    },
    /// Show the Plex settings stored on the server
    ConfigShow,
    /// Save Plex settings on the server (partial updates allowed)
    ConfigSet {
        #[arg(long)]
        plex_url: Option<String>,
        #[arg(long)]
        plex_token: Option<String>,
        #[arg(long)]
        playlist_name: Option<String>,
        #[arg(long)]
        mode: Option<String>,
    },
    /// Validate the client config file and exit
    ConfigValidate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve config path: explicit --config overrides; otherwise prefer a
    // system-wide config and fall back to built-in defaults for local use.
    let resolved_config_path: Option<PathBuf> = match &cli.config {
        Some(p) => Some(p.clone()),
        None => {
            let etc_path = Path::new("/etc/playlist-plex-importer/config.toml");
            etc_path.exists().then(|| etc_path.to_path_buf())
        }
    };

    let cfg = match &resolved_config_path {
        Some(p) => ClientConfig::from_path(p)
            .with_context(|| format!("loading config from {}", p.display()))?,
        None => ClientConfig::default(),
    };

    // Initialize log->tracing bridge and structured logging.
    // Logs go to both stdout and a daily-rotated file in cfg.log_dir.
    let _ = LogTracer::init();
    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(&cfg.log_dir, "playlist-plex-importer.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer);

    // Install as global default tracing subscriber without triggering
    // tracing-subscriber's internal log bridge (we already call LogTracer).
    tracing_subscriber_global::set_global_default(subscriber)
        .expect("failed to set global tracing subscriber");

    let backend: Arc<dyn ImportBackend> = Arc::new(
        HttpBackend::new(&cfg.api_base, cfg.request_timeout())
            .with_context(|| format!("building backend client for {}", cfg.api_base))?,
    );

    match cli.command {
        Commands::Extract { source, url_or_id } => {
            let source: Source = source.parse()?;
            let client = ExtractionClient::new(backend);
            let playlist = client
                .extract(source, &url_or_id)
                .await
                .with_context(|| "extracting playlist".to_string())?;
            if playlist.songs.is_empty() {
                println!("No songs found in the playlist.");
            } else {
                if !playlist.playlist_title.is_empty() {
                    println!("{}:", playlist.playlist_title);
                }
                for song in &playlist.songs {
                    println!("{} - {}", song.title, song.artist);
                }
                println!("{} songs total", playlist.songs.len());
            }
        }
        Commands::Import {
            playlist_url,
            plex_url,
            plex_token,
            playlist_name,
            mode,
        } => {
            // Fill the gaps from the server-stored Plex config, like the web
            // form prefill does.
            let stored = backend.plex_config().await.unwrap_or_default();
            let form = ImportForm {
                playlist_url,
                plex_url: plex_url.or(stored.plex_url).unwrap_or_default(),
                plex_token: plex_token.or(stored.plex_token).unwrap_or_default(),
                plex_playlist_name: playlist_name
                    .or(stored.plex_playlist_name)
                    .unwrap_or_else(|| "Plexlist".into()),
                import_mode: mode
                    .or(stored.plex_import_mode)
                    .unwrap_or_else(|| "create_new".into()),
            };

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProgressSnapshot>();
            let mut controller = ImportController::new(backend, Arc::new(tx))
                .with_poll_interval(cfg.poll_interval());

            let handle = controller
                .start_import(form)
                .await
                .with_context(|| "starting import task".to_string())?;
            println!("import task {} started", handle);

            // The controller owns the poll task; keep it alive and render
            // snapshots until a terminal one arrives.
            while let Some(snapshot) = rx.recv().await {
                print_snapshot(&snapshot);
                if snapshot.state.is_terminal() {
                    break;
                }
            }
        }
        Commands::ConfigShow => {
            let stored = backend
                .plex_config()
                .await
                .with_context(|| "fetching plex config".to_string())?;
            println!("plex_url:           {}", stored.plex_url.unwrap_or_default());
            println!("plex_token:         {}", stored.plex_token.unwrap_or_default());
            println!(
                "plex_playlist_name: {}",
                stored.plex_playlist_name.unwrap_or_default()
            );
            println!(
                "plex_import_mode:   {}",
                stored.plex_import_mode.unwrap_or_default()
            );
        }
        Commands::ConfigSet {
            plex_url,
            plex_token,
            playlist_name,
            mode,
        } => {
            let update = PlexConfig {
                plex_url,
                plex_token,
                plex_playlist_name: playlist_name,
                plex_import_mode: mode,
            };
            backend
                .save_plex_config(&update)
                .await
                .with_context(|| "saving plex config".to_string())?;
            println!("Plex config saved.");
        }
        Commands::ConfigValidate => match &resolved_config_path {
            Some(p) => match ClientConfig::from_path(p) {
                Ok(_) => println!("OK"),
                Err(e) => {
                    eprintln!("Config validation failed: {}", e);
                    std::process::exit(2);
                }
            },
            None => println!("OK (built-in defaults)"),
        },
    }

    Ok(())
}

fn print_snapshot(snapshot: &ProgressSnapshot) {
    let progress = match (snapshot.percent, snapshot.counts) {
        (Some(pct), Some((processed, total))) => format!("{}% ({}/{})", pct, processed, total),
        (Some(pct), None) => format!("{}%", pct),
        _ => "...".to_string(),
    };
    println!("[{}] {}", progress, snapshot.message);
}
