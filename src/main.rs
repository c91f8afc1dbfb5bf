use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, info, warn};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::Stylize,
    widgets::{Block, Borders, Clear, Paragraph},
};
use simplelog::{Config, WriteLogger};

use grid_snake::input::command_for_key;
use grid_snake::render::{BoardStyle, BoardView, ButtonBar};
use grid_snake::{
    Command, EndReason, GameConfig, GameSession, GameState, HighScoreStore, JsonFileStore,
    MemoryStore, Snapshot, SystemClock,
};

/// How long one frame waits for input before simulating and redrawing.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a grid, in the terminal")]
struct Cli {
    /// Rule preset to start from
    #[arg(long, value_enum, default_value = "walled")]
    preset: Preset,

    /// JSON config file; replaces the preset entirely
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the board
    #[arg(long)]
    dimension: Option<i32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to keep the high score (defaults to the user data directory)
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Draw the board with Braille dots
    #[arg(long)]
    braille: bool,

    #[arg(long, default_value = "grid-snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// Walls kill, fixed speed, no pause
    Walled,
    /// Edges wrap, speeds up with score, pausable
    Wrapping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs go to a file.
    WriteLogger::init(
        cli.log_level,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("could not create log file {}", cli.log_file.display()))?,
    )
    .context("could not initialize logger")?;

    let cfg = build_config(&cli)?;
    let store = open_store(&cli);
    let clock = SystemClock::new();
    let session = match cli.seed {
        Some(seed) => GameSession::with_seed(cfg, seed, clock, store),
        None => GameSession::new(cfg, clock, store),
    };
    let style = if cli.braille {
        BoardStyle::Braille
    } else {
        BoardStyle::Blocks
    };
    info!(
        "starting: dimension {}, policy {:?}, high score {}",
        session.config().dimension,
        session.config().edge_policy,
        session.high_score()
    );

    // --- Init terminal ---
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.clear()?;

    let res = run(&mut terminal, session, style);

    // --- Restore terminal even on error ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut cfg = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => match cli.preset {
            Preset::Walled => GameConfig::walled(),
            Preset::Wrapping => GameConfig::wrapping(),
        },
    };
    if let Some(d) = cli.dimension {
        cfg.dimension = d;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn open_store(cli: &Cli) -> Box<dyn HighScoreStore> {
    if cli.no_persist {
        return Box::new(MemoryStore::new());
    }
    match &cli.high_score_file {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => match JsonFileStore::in_data_dir() {
            Ok(store) => {
                info!("high scores in {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                warn!("{e}; high score will not be saved");
                Box::new(MemoryStore::new())
            }
        },
    }
}

type Session = GameSession<SystemClock, Box<dyn HighScoreStore>>;

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut session: Session,
    style: BoardStyle,
) -> Result<()> {
    let mut buttons = ButtonBar::new(Rect::default(), session.config().supports_pause);

    loop {
        // --- Input (non-blocking) ---
        if event::poll(FRAME)? {
            let cmd = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => command_for_key(key),
                Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                    buttons.command_at(m.column, m.row)
                }
                _ => None,
            };
            if let Some(cmd) = cmd {
                if apply(&mut session, cmd) {
                    break;
                }
            }
        }

        // --- Tick ---
        session.frame();

        // --- Render ---
        let snap = session.snapshot();
        terminal.draw(|f| {
            let (board_area, bar_area) = layout(f.area(), &snap, style);
            buttons = ButtonBar::new(bar_area, snap.supports_pause);

            let block = Block::default()
                .borders(Borders::ALL)
                .title(title(&snap).bold());
            let inner = block.inner(board_area);
            f.render_widget(block, board_area);
            f.render_widget(BoardView::new(&snap, style), inner);
            f.render_widget(&buttons, bar_area);

            if let Some(msg) = banner(&snap) {
                let w = (msg.chars().count() as u16 + 4).min(inner.width);
                let popup = Rect::new(
                    inner.x + inner.width.saturating_sub(w) / 2,
                    inner.y + inner.height.saturating_sub(3) / 2,
                    w,
                    3.min(inner.height),
                );
                f.render_widget(Clear, popup);
                f.render_widget(
                    Paragraph::new(msg)
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    popup,
                );
            }
        })?;
    }

    info!(
        "quit with score {}, high score {}",
        session.score(),
        session.high_score()
    );
    Ok(())
}

/// Returns true if the caller should quit.
fn apply(session: &mut Session, cmd: Command) -> bool {
    match cmd {
        Command::Quit => return true,
        Command::Turn(dir) => {
            session.propose(dir);
        }
        Command::TogglePause => {
            session.toggle_pause();
        }
        Command::Restart => session.restart(),
    }
    false
}

/// Board frame centred in `area`, with the button row right below it.
fn layout(area: Rect, snap: &Snapshot, style: BoardStyle) -> (Rect, Rect) {
    let (w, h) = style.size(snap.dimension);
    // Block adds a 1-char border around the board.
    let outer_w = w.saturating_add(2).min(area.width);
    let outer_h = h.saturating_add(2).min(area.height.saturating_sub(ButtonBar::HEIGHT));

    let x = area.x + area.width.saturating_sub(outer_w) / 2;
    let y = area.y + area.height.saturating_sub(outer_h + ButtonBar::HEIGHT) / 2;
    let board = Rect::new(x, y, outer_w, outer_h);
    let bar = Rect::new(x, board.bottom(), area.right().saturating_sub(x), ButtonBar::HEIGHT);
    (board, bar)
}

fn title(snap: &Snapshot) -> String {
    let status = match snap.state {
        GameState::NotStarted => "move to start",
        GameState::Running => "running",
        GameState::Paused => "paused",
        GameState::Over(_) => "game over",
    };
    format!(
        " score: {}  best: {}  {}ms  {} ",
        snap.score,
        snap.high_score,
        snap.interval.as_millis(),
        status
    )
}

fn banner(snap: &Snapshot) -> Option<String> {
    match snap.state {
        GameState::Over(EndReason::BoardFull) => Some(format!(
            "board full! final score {} (r restarts)",
            snap.score
        )),
        GameState::Over(EndReason::Collision(_)) => Some(format!(
            "game over, final score {} (r restarts)",
            snap.score
        )),
        GameState::Paused => Some("paused (p resumes)".to_owned()),
        _ => None,
    }
}
