//! wheeltab - wheel-over-tab-strip tab switching for Windows

use tracing::info;
use tracing_subscriber::EnvFilter;
use wheeltab::app::cli::{Cli, Commands};
use wheeltab::app::config::Config;
use wheeltab::classify::HOST_TABLE;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config)?,
        Commands::Hosts => run_hosts(),
        Commands::Init { force } => run_init(force, &config)?,
    }

    Ok(())
}

#[cfg(windows)]
fn run(config: &Config) -> anyhow::Result<()> {
    use wheeltab::engine::SwitchEngine;

    let mut engine = SwitchEngine::start(config)?;
    info!("scroll over a tab strip to switch tabs; Ctrl+C to quit");

    // Set up Ctrl+C handler
    let stop_flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let stop_flag_handler = stop_flag.clone();

    ctrlc::set_handler(move || {
        stop_flag_handler.store(true, std::sync::atomic::Ordering::SeqCst);
    })?;

    while !stop_flag.load(std::sync::atomic::Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    engine.shutdown();
    Ok(())
}

#[cfg(not(windows))]
fn run(_config: &Config) -> anyhow::Result<()> {
    anyhow::bail!("the wheel hook and its UI Automation backend require Windows")
}

fn run_hosts() {
    println!("Supported hosts:");
    for (name, window_class, mechanism) in HOST_TABLE {
        println!("  {name:<35} window class: {window_class:<45} switch: {mechanism}");
    }
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let path = Config::default_path();
    if path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    config.save(&path)?;
    info!("wrote config to {}", path.display());
    Ok(())
}
