use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use glyphmare::{
    app::{App, Effect},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, SourceKind},
    error::WordSourceError,
    game::Game,
    logging,
    round::Round,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, RoundFetcher, Runner},
    score::{MemoryScoreStore, ScoreStore, SqliteScoreStore},
    source::{BundledWordSource, FixedWordSource, HttpWordSource, WordSource},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
    time::Instant,
};
use tracing::{info, warn};

/// word guessing in the terminal, one letter per attempt
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess a random word in as many attempts as it has letters. Tiles turn green, gold or grey as you go; ctrl+e switches on a countdown for the brave."
)]
pub struct Cli {
    /// play from the bundled word list instead of the word api
    #[clap(long)]
    offline: bool,

    /// random word api endpoint
    #[clap(long)]
    api_url: Option<String>,

    /// play this word instead of fetching one
    #[clap(short = 'w', long)]
    word: Option<String>,

    /// definition revealed with --word
    #[clap(short = 'd', long, requires = "word")]
    definition: Option<String>,

    /// fetch attempts before giving up on a round
    #[clap(long)]
    attempts: Option<u32>,

    /// word api timeout in seconds
    #[clap(long)]
    timeout: Option<u64>,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the config file
    fn apply_to(&self, config: &mut Config) {
        if self.offline {
            config.source = SourceKind::Offline;
        }
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(attempts) = self.attempts {
            config.fetch_attempts = attempts;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
    }
}

fn build_source(cli: &Cli, config: &Config) -> Result<Arc<dyn WordSource>, WordSourceError> {
    if let Some(word) = &cli.word {
        let definition = cli.definition.clone().unwrap_or_default();
        // reject unplayable words before the terminal is taken over
        Round::new(word, definition.clone())?;
        return Ok(Arc::new(FixedWordSource::new(word.clone(), definition)));
    }

    let source: Arc<dyn WordSource> = match config.source {
        SourceKind::Offline => Arc::new(BundledWordSource::new(&config.word_list)?),
        SourceKind::Api => Arc::new(HttpWordSource::new(
            config.api_url.clone(),
            config.request_timeout(),
        )?),
    };
    Ok(source)
}

fn open_score_store() -> Box<dyn ScoreStore> {
    match SqliteScoreStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "score database unavailable, scores last for this session only");
            Box::new(MemoryScoreStore::default())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);
    if cli.save_config {
        config_store.save(&config)?;
        info!(path = %config_store.path().display(), "config saved");
    }

    let source = build_source(&cli, &config)?;
    info!(source = %source.name(), kind = %config.source, "starting glyphmare");
    let app = App::new(Game::new(open_score_store()));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let fetcher = RoundFetcher::new(source, config.retry_policy(), events.sender());
    let runner = Runner::new(events, FixedTicker::default());
    let result = start_tui(&mut terminal, app, &fetcher, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    fetcher: &RoundFetcher,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.set_viewport(size.width, size.height);
    fetcher.spawn(app.start());

    loop {
        terminal.draw(|f| f.render_widget(&app, f.area()))?;

        let event = runner.step();
        if matches!(event, GameEvent::Resize) {
            let size = terminal.size()?;
            app.set_viewport(size.width, size.height);
        }

        match app.handle_event(event, Instant::now()) {
            Effect::Continue => {}
            Effect::Fetch(request) => {
                fetcher.spawn(request);
            }
            Effect::Quit => break,
        }
    }

    info!(score = app.game.score(), "quitting");
    Ok(())
}
