mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use koukaton_shooter::entities::{Direction, DirectionSet};
use koukaton_shooter::render::build_frame;
use koukaton_shooter::{init_state, tick, Command, FrameInput, GameStatus, Settings};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many milliseconds. Covers terminals that don't emit key-release
/// events: the OS key-repeat rate is ≥ 15 Hz, so the window is refreshed
/// before expiry.
const HOLD_WINDOW_MS: u64 = 120;

/// `HOLD_WINDOW_MS` in frames at the given loop rate, at least one.
fn hold_window(frame_rate: u32) -> u64 {
    (HOLD_WINDOW_MS * u64::from(frame_rate) / 1000).max(1)
}

#[derive(Parser, Debug)]
#[command(name = "koukaton_shooter", about = "Single-screen arcade shooter in the terminal")]
struct Cli {
    /// Settings file (JSON). Missing file means defaults.
    #[arg(long, default_value = "koukaton.json")]
    config: PathBuf,
    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation steps per second.
    #[arg(long)]
    fps: Option<u32>,
}

/// Returns true if `key` was seen within the last `window` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64, window: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= window)
        .unwrap_or(false)
}

fn held_directions(key_frame: &HashMap<KeyCode, u64>, frame: u64, window: u64) -> DirectionSet {
    let mut keys = DirectionSet::default();
    for (code, dir) in [
        (KeyCode::Up, Direction::Up),
        (KeyCode::Down, Direction::Down),
        (KeyCode::Left, Direction::Left),
        (KeyCode::Right, Direction::Right),
    ] {
        if is_held(key_frame, &code, frame, window) {
            keys.insert(dir);
        }
    }
    keys
}

fn is_ctrl_c(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    *code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL)
}

fn command_for(code: &KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::ActivateSkill),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Command::ActivateEmp),
        KeyCode::Enter => Some(Command::ActivateGravity),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::ActivateShield),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RunEnd {
    Quit,
    Restart,
}

/// Drive one run at the configured rate until quit, or until the player
/// dismisses the game-over screen.
///
/// Held keys are tracked in `key_frame` (frame of the last press/repeat);
/// discrete commands fire once per `Press` event.
fn game_loop<W: Write>(
    out: &mut W,
    settings: &Settings,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<RunEnd> {
    let frame_len = Duration::from_secs_f64(1.0 / f64::from(settings.frame_rate.max(1)));
    let window = hold_window(settings.frame_rate);
    let mut state = init_state(settings);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let mut input = FrameInput::default();
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    if state.status == GameStatus::GameOver {
                        match code {
                            KeyCode::Char('r') | KeyCode::Char('R') => return Ok(RunEnd::Restart),
                            KeyCode::Esc => return Ok(RunEnd::Quit),
                            _ if is_ctrl_c(&code, modifiers) => return Ok(RunEnd::Quit),
                            _ => {}
                        }
                    }
                    if is_ctrl_c(&code, modifiers) {
                        input.commands.push(Command::Quit);
                    } else if let Some(command) = command_for(&code) {
                        input.commands.push(command);
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }
        input.keys = held_directions(&key_frame, frame, window);
        input.fire = is_held(&key_frame, &KeyCode::Char(' '), frame, window);

        if state.status == GameStatus::Playing {
            state = tick(&state, &input, rng);
        }
        if state.status == GameStatus::Quit {
            return Ok(RunEnd::Quit);
        }

        display::render(out, &build_frame(&state), state.status, state.score)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(settings: &Settings) -> Result<()> {
    let file = File::create(&settings.log_file)
        .with_context(|| format!("creating log file {}", settings.log_file))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?.with_overrides(cli.seed, cli.fps);
    init_logging(&settings)?;
    info!("starting with {settings:?}");

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without the protocol fall back
    // to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits
    // on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &settings, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    settings: &Settings,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    loop {
        match game_loop(out, settings, rng, rx)? {
            RunEnd::Quit => break,
            RunEnd::Restart => info!("restarting"),
        }
    }
    Ok(())
}
