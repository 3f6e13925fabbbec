mod app;
mod config;
mod engine;
mod error;
mod generator;
mod history;
mod models;
mod session;
mod stats;
mod ui;
pub mod utils;

use anyhow::{Context, Result};
use app::{App, MAX_QUESTIONS};
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser};
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine::QuizEngine;
use env_logger::{Env, Target};
use generator::{HttpCompletionClient, PromptBuilder, QuizGenerator};
use log::{info, warn};
use models::Difficulty;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quizgen")]
#[command(version)]
#[command(about = "Turn any text into a multiple-choice quiz", long_about = None)]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "\
{name} {version}
{about-section}
{usage-heading} {usage}

{all-args}
")]
struct Cli {
    /// Read the source text from a file instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Question difficulty
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Number of questions per quiz (1 to 10)
    #[arg(short, long, value_parser = RangedU64ValueParser::<u64>::new().range(1..=MAX_QUESTIONS as u64))]
    count: Option<u64>,

    /// Print the request that would be sent and exit
    #[arg(long, default_value_t = false, help_heading = "Flags")]
    show_prompt: bool,

    /// Print help
    #[arg(short, long, action = ArgAction::Help, help_heading = "Flags")]
    help: Option<bool>,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::Version, help_heading = "Flags")]
    version: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();
    init_logger();

    let app_config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config, using defaults. Error: {}",
            e
        );
        warn!("config load failed: {}", e);
        AppConfig::default()
    });

    let input = read_source_text(&cli)?;
    let difficulty = cli.difficulty.unwrap_or(app_config.quiz.difficulty);
    let question_count = cli
        .count
        .map(|c| c as usize)
        .unwrap_or(app_config.quiz.question_count);

    let prompts = PromptBuilder::new(&app_config.generation)?;

    if cli.show_prompt {
        let request = prompts.request(&input, difficulty);
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let generator = HttpCompletionClient::from_env(&app_config.generation)
        .map(|client| QuizGenerator::new(prompts, Box::new(client)));
    if let Err(e) = &generator {
        warn!("generation unavailable: {}", e);
    }
    let engine = QuizEngine::new(generator, app_config.generation.cache_failures);

    let mut app = App::new(engine, app_config.theme, input, difficulty, question_count);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);
    app.finish();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    history::print_history(app.engine.stats().stats());
    info!("exiting");

    Ok(())
}

/// The terminal owns stderr, so log lines go to a file in the data dir.
fn init_logger() {
    let Some(dirs) = config::project_dirs() else { return };
    let dir = dirs.data_local_dir();
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("quizgen.log"))
    else {
        return;
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
}

fn read_source_text(cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        info!("loaded {} bytes from {}", text.len(), path.display());
        return Ok(text);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut text = String::new();
    stdin.lock().read_to_string(&mut text).context("could not read stdin")?;
    Ok(text)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    loop {
        terminal.draw(|f| ui::render(f, app))?;
        // runs after the "Generating" frame is on screen
        app.run_pending_generation();

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Esc => app.quit(),
                            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                                app.quit()
                            }
                            KeyCode::Tab => app.on_tab(),
                            KeyCode::Enter => app.on_enter(),
                            KeyCode::Backspace => app.on_backspace(),
                            KeyCode::Up => app.on_up(),
                            KeyCode::Down => app.on_down(),
                            KeyCode::Char(c) => app.on_key(c),
                            _ => {}
                        }
                    }
                }
                Event::Paste(text) => app.on_paste(&text),
                Event::Resize(w, h) => app.resize(w, h),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
