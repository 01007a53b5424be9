use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use directories::ProjectDirs;
use pacer::{
    app::{App, KeyOutcome},
    config::{Config, ConfigStore, FileConfigStore, LapUnit},
    error::Result as PacerResult,
    runtime::{CrosstermEventSource, FixedTicker, PacerEvent, Runner},
    ui, Pacer,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Stdout},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tracing_subscriber::EnvFilter;

/// adaptive lap pacing timer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Splits a fixed duration over a fixed number of laps and, after every lap, spreads the time you banked or lost over the laps that remain."
)]
pub struct Cli {
    /// number of laps in the session
    #[clap(short = 'l', long)]
    laps: Option<u32>,

    /// total session length in seconds
    #[clap(short = 'd', long, conflicts_with = "minutes")]
    duration: Option<f64>,

    /// total session length in minutes
    #[clap(short = 'm', long)]
    minutes: Option<f64>,

    /// what one lap stands for (only changes wording)
    #[clap(short = 'u', long, value_enum)]
    unit: Option<LapUnit>,

    /// append logs to this file instead of the cache directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// store the effective laps, duration and unit as the new defaults
    #[clap(long)]
    save_defaults: bool,
}

impl Cli {
    /// Layer command line values over stored defaults
    fn resolve(&self, base: Config) -> Config {
        let total_duration_secs = match (self.duration, self.minutes) {
            (Some(secs), _) => secs,
            (None, Some(mins)) => mins * 60.0,
            (None, None) => base.total_duration_secs,
        };
        Config {
            total_laps: self.laps.unwrap_or(base.total_laps),
            total_duration_secs,
            unit: self.unit.unwrap_or(base.unit),
        }
    }
}

fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pacer").map(|pd| pd.cache_dir().join("pacer.log"))
}

fn init_logging(path: Option<PathBuf>) -> io::Result<()> {
    let Some(path) = path.or_else(default_log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn save_defaults(store: &impl ConfigStore, config: &Config) -> PacerResult<()> {
    store.save(config)?;
    Ok(())
}

fn setup_terminal() -> PacerResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> PacerResult<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_file.clone()) {
        eprintln!("pacer: logging disabled: {err}");
    }

    let store = FileConfigStore::new();
    let config = cli.resolve(store.load());
    if let Err(err) = config.validate() {
        Cli::command()
            .error(ErrorKind::ValueValidation, err)
            .exit();
    }

    if cli.save_defaults {
        save_defaults(&store, &config)?;
        tracing::info!(path = %store.path().display(), "saved defaults");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut terminal = setup_terminal()?;

    // the clock starts once the screen is up
    let result = Pacer::new(config.total_laps, config.total_duration_secs)
        .map_err(Box::<dyn Error>::from)
        .and_then(|pacer| {
            let mut app = App::new(pacer, config.unit);
            start_tui(&mut terminal, &mut app)
        });

    restore_terminal(&mut terminal)?;
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        // ticks stop once every lap is done; the summary only redraws on input
        let Some(event) = runner.step(app.is_running()) else {
            break;
        };

        match event {
            PacerEvent::Tick => app.on_tick(Instant::now()),
            PacerEvent::Resize => {}
            PacerEvent::Key(key) => {
                if app.handle_key(key, Instant::now()) == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }

    tracing::info!(laps_finished = app.pacer.laps().len(), "exiting");
    Ok(())
}
