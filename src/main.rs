//! sentrycam - home surveillance camera with a live stream and snapshot gallery.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use console::style;
use tokio::sync::mpsc;

use sentrycam::camera::{CameraSession, NokhwaOpener};
use sentrycam::cli::{
    Cli, Commands, CompletionsArgs, DeleteArgs, GalleryArgs, ServeArgs, SnapshotArgs,
};
use sentrycam::config::AppConfig;
use sentrycam::error::{CamError, Result};
use sentrycam::storage::SnapshotStore;
use sentrycam::trigger::{LogIndicator, TriggerAdapter};
use sentrycam::web::{self, AppState};
use sentrycam::logging;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const NAME: &str = env!("CARGO_PKG_NAME");
}

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    // Run the command
    let result = run(&cli);

    // Handle errors
    if let Err(e) = result {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        // No subcommand behaves like the original application: serve.
        None => cmd_serve(cli, &ServeArgs::default()),
        Some(Commands::Serve(args)) => cmd_serve(cli, args),
        Some(Commands::Snapshot(args)) => cmd_snapshot(cli, args),
        Some(Commands::Gallery(args)) => cmd_gallery(cli, args),
        Some(Commands::Delete(args)) => cmd_delete(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Commands ===

fn cmd_serve(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(dir) = &args.dir {
        config.storage.dir = dir.clone();
    }
    if let Some(index) = args.camera {
        config.camera.index = index;
    }

    let addr = config.bind_addr()?;
    let store = SnapshotStore::open(&config.storage.dir)?;
    let session = Arc::new(CameraSession::with_options(
        Box::new(NokhwaOpener::new(config.camera.index)),
        config.session_options(),
    ));
    let hold = config.trigger_hold();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CamError::Other(format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(async move {
        let (trigger_tx, trigger_rx) = mpsc::channel(16);

        let adapter = TriggerAdapter::new(
            Arc::clone(&session),
            store.clone(),
            Arc::new(LogIndicator),
            hold,
        );
        tokio::spawn(adapter.run(trigger_rx));

        let state = Arc::new(AppState {
            session,
            store,
            triggers: trigger_tx,
            started: Instant::now(),
        });

        web::serve(state, addr).await
    })
}

fn cmd_snapshot(cli: &Cli, args: &SnapshotArgs) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &args.dir {
        config.storage.dir = dir.clone();
    }
    if let Some(index) = args.camera {
        config.camera.index = index;
    }

    let store = SnapshotStore::open(&config.storage.dir)?;
    let session = CameraSession::with_options(
        Box::new(NokhwaOpener::new(config.camera.index)),
        config.session_options(),
    );

    let name = session.save_snapshot(&store)?;

    if cli.use_json() {
        println!(
            "{}",
            serde_json::json!({
                "filename": name,
                "dir": store.dir().display().to_string(),
            })
        );
    } else {
        println!("Saved {}", style(&name).green());
    }
    Ok(())
}

fn cmd_gallery(cli: &Cli, args: &GalleryArgs) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &args.dir {
        config.storage.dir = dir.clone();
    }

    let store = SnapshotStore::open(&config.storage.dir)?;
    let images = store.list()?;

    if cli.use_json() {
        println!("{}", serde_json::json!({ "images": images }));
    } else if images.is_empty() {
        println!("No snapshots in {}", store.dir().display());
    } else {
        for name in &images {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_delete(cli: &Cli, args: &DeleteArgs) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &args.dir {
        config.storage.dir = dir.clone();
    }

    let store = SnapshotStore::open(&config.storage.dir)?;
    let deleted = store.delete(&args.filename)?;

    if cli.use_json() {
        println!(
            "{}",
            serde_json::json!({ "filename": args.filename, "deleted": deleted })
        );
    } else if deleted {
        println!("Deleted {}", style(&args.filename).green());
    } else {
        println!(
            "{} no such snapshot: {}",
            style("warning:").yellow(),
            args.filename
        );
    }
    Ok(())
}

fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        println!(
            "{}",
            serde_json::json!({
                "name": build_info::NAME,
                "version": build_info::VERSION,
            })
        );
    } else {
        println!("{} {}", build_info::NAME, build_info::VERSION);
    }
    Ok(())
}

fn cmd_completions(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "sentrycam", &mut io::stdout());
    Ok(())
}

// === Error Output ===

fn output_error(cli: &Cli, err: &CamError) {
    if cli.use_json() {
        eprintln!(
            "{}",
            serde_json::json!({
                "error": err.to_string(),
                "suggestion": err.suggestion(),
            })
        );
    } else {
        eprintln!("{} {err}", style("error:").red().bold());
        if let Some(hint) = err.suggestion() {
            eprintln!("  hint: {hint}");
        }
    }
}
