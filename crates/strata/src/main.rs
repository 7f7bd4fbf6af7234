use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{OptionExt, WrapErr};
use strata_config::Config;
use strata_core::{AnimationSpeed, ColorTheme};
use tracing::warn;

mod app;
mod logging;
mod session;

use app::App;
use session::TerminalSession;

#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(about = "Scroll through drifting particles, noise strata and a rising geoid", long_about = None)]
struct Args {
    /// Config file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for reproducible noise and spawns
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second (1-240)
    #[arg(long)]
    fps: Option<u32>,

    /// Color theme: cyan, green, magenta, yellow, red, blue or white
    #[arg(long)]
    theme: Option<ColorTheme>,

    /// Animation speed: slow, medium or fast
    #[arg(long)]
    speed: Option<AnimationSpeed>,

    /// Start scrolling automatically
    #[arg(long, default_value_t = false)]
    autoscroll: bool,

    /// Write logs to this file (filter with STRATA_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long, default_value_t = false)]
    write_config: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded config.
    fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.autoscroll {
            config.autoscroll = true;
        }
    }

    fn load_config(&self) -> color_eyre::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load().unwrap_or_else(|err| {
                warn!(error = %err, "ignoring unusable config file");
                Config::default()
            }),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let config = args.load_config()?;

    if args.write_config {
        let path = args
            .config
            .clone()
            .or_else(Config::config_path)
            .ok_or_eyre("no config directory on this platform, pass --config")?;
        config
            .save_to(&path)
            .wrap_err("failed to write configuration")?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = run(terminal, &config);
    ratatui::restore();
    result
}

fn run(terminal: ratatui::DefaultTerminal, config: &Config) -> color_eyre::Result<()> {
    let _session = TerminalSession::enter()?;
    App::new(config).run(terminal)
}
