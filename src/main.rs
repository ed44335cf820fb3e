mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::ThreadRng;
use rand::thread_rng;
use tracing::info;

use last_hearth::config::GameConfig;
use last_hearth::engine::{FrameInput, WaveEngine};
use last_hearth::entities::Screen;
use last_hearth::logging::init_tracing_to_file;
use last_hearth::storage::FileStore;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Read from the working directory when present.
const CONFIG_FILE: &str = "last_hearth.toml";

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Every key event queued on `rx`, skipping resize, focus and mouse events.
fn drain_key_events(rx: &mpsc::Receiver<Event>) -> Vec<KeyEvent> {
    rx.try_iter()
        .filter_map(|ev| match ev {
            Event::Key(key) => Some(key),
            _ => None,
        })
        .collect()
}

type Engine = WaveEngine<FileStore, ThreadRng>;

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and feed them to the engine together, so
/// Space + ←/→ can be held at the same time.  Menu keys (1/2/3, Enter, R)
/// act once, on press.
fn game_loop<W: Write>(
    out: &mut W,
    engine: &mut Engine,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        for KeyEvent { code, kind, modifiers, .. } in drain_key_events(rx) {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(c @ '1'..='3') => {
                            engine.select_upgrade(c as usize - '1' as usize);
                        }
                        KeyCode::Enter => engine.continue_after_sunrise(),
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if engine.state().screen == Screen::GameOver =>
                        {
                            engine.restart();
                        }
                        _ => {}
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

        let input = FrameInput {
            move_left: any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            move_right: any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
            fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
            pointer_x: None,
        };

        let now = Instant::now();
        let dt_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        engine.update(dt_ms, &input);

        let (cols, rows) = terminal::size()?;
        display::render(out, engine.state(), &engine.view(), cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let config = GameConfig::load_or_default(CONFIG_FILE)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let store = FileStore::new(FileStore::default_dir());
    std::fs::create_dir_all(store.dir())?;
    init_tracing_to_file(store.dir().join("last_hearth.log"))?;
    info!(save_dir = %store.dir().display(), "starting");

    let mut engine = WaveEngine::new(config, store, thread_rng());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut engine, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let view = engine.view();
    info!(wave = view.wave, score = view.score, "quit");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_behind_a_resize_are_drained_in_the_same_frame() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Key(KeyEvent::from(KeyCode::Left))).unwrap();
        tx.send(Event::Resize(120, 40)).unwrap();
        tx.send(Event::FocusGained).unwrap();
        tx.send(Event::Key(KeyEvent::from(KeyCode::Char(' ')))).unwrap();

        let keys: Vec<KeyCode> = drain_key_events(&rx).into_iter().map(|k| k.code).collect();
        assert_eq!(keys, vec![KeyCode::Left, KeyCode::Char(' ')]);
        assert!(drain_key_events(&rx).is_empty());
    }
}
