pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use lapring::{
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    controller::RingController,
    entry::{parse_minutes, DurationEntry, EntryError, InputMode},
    feedback::{CueSink, Muted, TerminalBell},
    logging::init_file_logger,
    presenter::{RingMode, RingView},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, RingEvent, Runner, Ticker},
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

use crate::ui::screen::current_screen;

/// interval lap timer with an animated progress ring
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "An interval lap timer: pick a lap length, watch the ring fill, hear a bell at every lap and a longer signal every hour when the lap count starts over."
)]
pub struct Cli {
    /// what to show inside the ring
    #[clap(short = 'm', long = "mode", value_enum)]
    ring_mode: Option<RingMode>,

    /// how the lap duration is entered
    #[clap(short = 'i', long = "input", value_enum)]
    input_mode: Option<InputMode>,

    /// lap length in minutes; skips the setup screen
    #[clap(short = 'n', long = "minutes", value_name = "MINUTES", value_parser = parse_minutes)]
    lap_ms: Option<i64>,

    /// milliseconds between ring updates
    #[clap(short = 't', long = "tick-ms")]
    tick_ms: Option<u64>,

    /// do not ring the terminal bell on lap and hour boundaries
    #[clap(long)]
    mute: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on the stored settings
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(mode) = self.ring_mode {
            config.ring_mode = mode;
        }
        if let Some(mode) = self.input_mode {
            config.input_mode = mode;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms.max(1);
        }
        if self.mute {
            config.bell = false;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Ring,
}

pub struct App<C: Clock = SystemClock> {
    pub entry: DurationEntry,
    pub ring: RingController<C, RingView>,
    pub state: AppState,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let cues: Box<dyn CueSink> = if config.bell {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(Muted)
        };
        App::with_parts(
            DurationEntry::new(config.input_mode, config.presets.clone()),
            RingController::new(SystemClock, RingView::new(config.ring_mode, cues)),
        )
    }
}

impl<C: Clock> App<C> {
    pub fn with_parts(entry: DurationEntry, ring: RingController<C, RingView>) -> Self {
        Self {
            entry,
            ring,
            state: AppState::Setup,
        }
    }

    /// Start a ring, or put the engine's refusal on the setup screen
    pub fn launch(&mut self, lap_duration_ms: i64) {
        match self.ring.launch(lap_duration_ms) {
            Ok(()) => {
                self.entry.clear();
                self.state = AppState::Ring;
            }
            Err(e) => {
                info!("launch refused: {}", e);
                self.entry.reject(EntryError::from(e).to_string());
                self.state = AppState::Setup;
            }
        }
    }

    pub fn reset(&mut self) {
        self.ring.reset();
        self.entry.clear();
        self.state = AppState::Setup;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        // The timer works without a log file, but say so before raw mode.
        if let Err(e) = init_file_logger(&path) {
            eprintln!("lapring: logging disabled, cannot open {}: {}", path.display(), e);
        }
    }

    let store = FileConfigStore::new();
    let config = cli.merge_into(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    if let Some(lap_ms) = cli.lap_ms {
        app.launch(lap_ms);
    }

    let ticker = FixedTicker::new(Duration::from_millis(config.tick_ms));
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);
    let result = start_tui(&mut terminal, &mut app, &mut runner);
    if let Err(e) = &result {
        error!("ui loop failed: {}", e);
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, C: Clock, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        // The tick schedule lives exactly as long as the session.
        match (app.ring.is_active(), runner.is_ticking()) {
            (true, false) => runner.start_ticking(),
            (false, true) => runner.stop_ticking(),
            _ => {}
        }

        terminal.draw(|f| current_screen::<C>(&app.state).render(app, f))?;

        match runner.step() {
            RingEvent::Tick => {
                app.ring.on_tick();
                app.ring.presenter_mut().expire_flash(Instant::now());
            }
            RingEvent::Resize => {}
            RingEvent::Closed => break,
            RingEvent::Key(key) => {
                let quit = key.code == KeyCode::Esc
                    || (key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c'));
                if quit {
                    break;
                }
                current_screen::<C>(&app.state).on_key(key, app);
            }
        }
    }

    Ok(())
}
