mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    time::Duration,
};
use webbrowser::Browser;

use target10::{
    app_dirs::AppDirs,
    celebration::ConfettiAnimation,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{AimEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{format_secs, AimSession, ClickOutcome, Phase},
};
use ui::layout::ScreenLayout;

/// click ten targets as fast as you can
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal aim trainer: ten targets appear one after another, click each as fast as you can and see how long it took."
)]
pub struct Cli {
    /// settings file to use instead of the platform config location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// seed target placement for reproducible rounds
    #[clap(long)]
    seed: Option<u64>,

    /// skip the confetti at the end of a round
    #[clap(long)]
    no_confetti: bool,

    /// write a default settings file and exit
    #[clap(long)]
    init_config: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if self.no_confetti {
            config.confetti = false;
        }
        config
    }
}

#[derive(Debug)]
pub struct App {
    pub session: AimSession<SystemClock>,
    pub confetti: ConfettiAnimation,
    pub config: Config,
    /// Last known terminal area, used to route clicks
    pub size: Rect,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let session = AimSession::with_parts(SystemClock, rng, config.refresh_interval())
            .with_pool(config.flavor_lines.clone());

        Self {
            session,
            confetti: ConfettiAnimation::new(config.confetti_pieces),
            config,
            size: Rect::new(0, 0, 80, 24),
        }
    }

    /// Routes a left click. Returns true when the screen needs redrawing.
    pub fn on_click(&mut self, column: u16, row: u16) -> bool {
        let layout = ScreenLayout::new(self.size);

        if self.session.phase() == Phase::Finished {
            if layout.hits_button(column, row) {
                self.reset();
                return true;
            }
            return false;
        }

        let on_target = self
            .session
            .target()
            .is_some_and(|t| layout.hits_target(t, column, row));
        if !on_target {
            return false;
        }

        if let ClickOutcome::Finished(_) = self.session.click_target() {
            if self.config.confetti && self.session.is_celebrating() {
                self.confetti.start(self.size.width, self.size.height);
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.confetti.stop();
        self.session.reset();
    }

    /// Returns true when the screen needs redrawing.
    pub fn on_tick(&mut self) -> bool {
        let mut redraw = self.session.on_tick();
        if self.confetti.is_active {
            self.confetti.update();
            redraw = true;
        }
        redraw
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Rect::new(0, 0, width, height);
        self.confetti.resize(width, height);
    }

    /// How soon the event loop has to wake up on its own
    pub fn next_deadline(&self) -> Option<Duration> {
        self.session.next_refresh_in()
    }

    fn share(&self) {
        if self.session.phase() == Phase::Finished && Browser::is_available() {
            let url = format!(
                "https://twitter.com/intent/tweet?text=just%20cleared%20target10%20in%20{}%20seconds",
                format_secs(self.session.elapsed())
            );
            if let Err(e) = webbrowser::open(&url) {
                log::warn!("could not open browser: {}", e);
            }
        }
    }
}

fn init_logging() {
    let sink: Box<dyn Write + Send> = match AppDirs::log_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
            {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        }
        None => Box::new(io::sink()),
    };

    // the TUI owns the terminal, so logs only ever go to the file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(sink))
        .init();
}

fn load_config(store: &FileConfigStore) -> Config {
    match store.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{}; falling back to default settings", e);
            Config::default()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();

    if cli.init_config {
        store.save(&Config::default())?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.apply(load_config(&store));
    log::info!("starting target10 v{}", env!("CARGO_PKG_VERSION"));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, cli.seed);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("exited with error: {}", e);
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(app.config.frame_interval()),
    );

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match runner.step_within(app.next_deadline()) {
            AimEvent::Tick => app.on_tick(),
            AimEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
                true
            }
            AimEvent::Click { column, row } => app.on_click(column, row),
            AimEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('r') if app.session.phase() == Phase::Finished => {
                        app.reset();
                        true
                    }
                    KeyCode::Char('t') => {
                        app.share();
                        false
                    }
                    _ => false,
                }
            }
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    log::info!("shutting down");
    Ok(())
}
