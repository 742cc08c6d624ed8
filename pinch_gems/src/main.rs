//! pinch_gems: interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use pinch_gems::app::run;
use pinch_gems::config::AppConfig;
use pinch_gems::error::AppError;

#[derive(Parser, Debug)]
#[command(version, about = "Pinch in the air to press gems")]
struct Cli {
    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of gems, overriding the config
    #[arg(long)]
    gems: Option<usize>,

    /// Start the camera as soon as the window opens
    #[arg(long, default_value_t = false)]
    autostart: bool,

    /// Print the effective config as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = launch(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn launch(cli: Cli) -> Result<(), AppError> {
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None       => AppConfig::default(),
    };
    if let Some(gems) = cli.gems {
        cfg.gem_count = gems;
    }
    cfg.validate()?;

    if cli.dump_config {
        match serde_json::to_string_pretty(&cfg) {
            Ok(text) => println!("{}", text),
            Err(e)   => log::error!("could not serialise config: {}", e),
        }
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Pinch Gems: air-pinch gem grid                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!("  Gems: {}  ({} per row)", cfg.gem_count, cfg.columns);
    println!();

    run(cfg, cli.autostart)
}
