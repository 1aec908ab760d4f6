use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use polyrolly::core::constants::{APP_NAME, INPUT_POLL_MS};
use polyrolly::core::Session;
use polyrolly::input::{handle_key, InputResult, UiState};
use polyrolly::ui::draw_ui;
use polyrolly::utils::{build_info, logging};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

fn print_help() {
    println!("{} - dice roller for tabletop games\n", APP_NAME);
    println!("Usage: polyrolly [FILE]\n");
    println!("Arguments:");
    println!("  FILE       Save file to open on start");
    println!("\nOptions:");
    println!("  --version  Show version information");
    println!("  --help     Show this help message");
}

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut file: Option<PathBuf> = None;

    if args.len() > 2 {
        eprintln!("Too many arguments.");
        eprintln!("Run 'polyrolly --help' for usage.");
        std::process::exit(1);
    }
    if let Some(arg) = args.get(1) {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'polyrolly --help' for usage.");
                std::process::exit(1);
            }
            path => file = Some(PathBuf::from(path)),
        }
    }

    // Logging is best effort; the UI works without it
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };
    tracing::info!(version = %build_info::version_line(), "starting");

    let mut session = Session::new();
    let mut ui = UiState::new();
    if let Some(path) = file {
        if let Err(e) = session.load(&path) {
            ui.status = Some(format!("Could not open {}: {}", path.display(), e));
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session, &mut ui);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    ui: &mut UiState,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| draw_ui(frame, session, ui))?;

        // Poll for input (50ms non-blocking)
        if event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            if let Event::Key(key_event) = event::read()? {
                // Windows reports releases as well
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if let InputResult::Quit = handle_key(key_event, session, ui) {
                    return Ok(());
                }
            }
        }
    }
}
