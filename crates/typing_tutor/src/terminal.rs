//! Minimal crossterm front-end for the play loop.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use typing_tutor_core::{
    Achievement, GameSummary, KeyInput, LearningPath, TierChange, streak_banner,
};

use crate::play_loop::{Input, PlayLoop};
use crate::session::{GameEvent, GameSession};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Maps a terminal key event to play loop input.
pub fn key_to_input(key: &KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Esc => Some(Input::Back),
        KeyCode::Enter => Some(Input::Confirm),
        KeyCode::Tab => Some(Input::SkipWord),
        KeyCode::Char(c) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let prefix = if key.modifiers.contains(KeyModifiers::CONTROL) { "Ctrl" } else { "Alt" };
            Some(Input::Key(KeyInput::Named(format!("{}+{}", prefix, c))))
        }
        KeyCode::Char(c) => Some(Input::Key(KeyInput::Char(c))),
        other => Some(Input::Key(KeyInput::from_key_name(&format!("{:?}", other)))),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Menu,
    Playing,
    Won {
        summary: GameSummary,
        message: String,
        achievements: Vec<Achievement>,
    },
}

/// What the terminal currently shows, rebuilt from [`GameEvent`]s.
#[derive(Debug, Clone)]
struct View {
    screen: Screen,
    player_name: String,
    show_hints: bool,
    word: String,
    cursor: usize,
    shaking: bool,
    tier_label: String,
    word_number: u32,
    words_per_game: u32,
    streak: u32,
    notice: Option<(TierChange, String)>,
    spoken: Option<String>,
    saved: Option<GameSummary>,
}

impl View {
    fn new(player_name: String, show_hints: bool) -> Self {
        Self {
            screen: Screen::Menu,
            player_name,
            show_hints,
            word: String::new(),
            cursor: 0,
            shaking: false,
            tier_label: String::new(),
            word_number: 0,
            words_per_game: 0,
            streak: 0,
            notice: None,
            spoken: None,
            saved: None,
        }
    }

    fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::WordAssigned {
                word,
                tier_label,
                word_number,
                words_per_game,
            } => {
                self.screen = Screen::Playing;
                self.word = word;
                self.cursor = 0;
                self.shaking = false;
                self.tier_label = tier_label;
                self.word_number = word_number;
                self.words_per_game = words_per_game;
                if word_number == 1 {
                    self.streak = 0;
                    self.notice = None;
                }
            }
            GameEvent::KeyCorrect { cursor } => self.cursor = cursor,
            GameEvent::KeyError => self.shaking = true,
            GameEvent::ShakeCleared => self.shaking = false,
            GameEvent::WordComplete { streak, .. } => self.streak = streak,
            GameEvent::TierChanged { change, label } => {
                self.tier_label = label.clone();
                self.notice = Some((change, label));
            }
            GameEvent::NoticeHidden => self.notice = None,
            GameEvent::Speak(text) => self.spoken = Some(text),
            GameEvent::Sound(cue) => debug!(%cue, "Sound cue"),
            GameEvent::GameWon {
                summary,
                message,
                achievements,
            } => {
                self.notice = None;
                self.screen = Screen::Won {
                    summary,
                    message,
                    achievements,
                };
            }
            GameEvent::ReturnedToMenu { recorded } => {
                self.screen = Screen::Menu;
                self.saved = recorded;
                self.spoken = None;
            }
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.screen {
            Screen::Menu => {
                lines.push(format!("Hi {}! Pick a path:", self.player_name));
                lines.push(String::new());
                for (i, path) in LearningPath::iter().enumerate() {
                    let tiers: Vec<String> =
                        path.tiers().iter().map(|t| t.label().to_string()).collect();
                    lines.push(format!("  {}. {:<12} {}", i + 1, path, tiers.join(" > ")));
                }
                lines.push(String::new());
                lines.push("Enter: last path   Esc: quit".to_string());
                if let Some(saved) = &self.saved {
                    lines.push(format!(
                        "Saved {} words ({}% perfect).",
                        saved.words_completed(),
                        saved.accuracy()
                    ));
                }
            }
            Screen::Playing => {
                lines.push(format!(
                    "{}   word {}/{}",
                    self.tier_label, self.word_number, self.words_per_game
                ));
                lines.push(String::new());
                let (typed, rest) = split_at_char(&self.word, self.cursor);
                let shake = if self.shaking { "  ~~ oops ~~" } else { "" };
                lines.push(format!("    [{}]{}{}", typed.to_uppercase(), rest.to_uppercase(), shake));
                if self.show_hints {
                    if let Some(next) = rest.chars().next() {
                        lines.push(format!("    next key: {}", next));
                    }
                }
                lines.push(String::new());
                if let Some(banner) = streak_banner(self.streak) {
                    lines.push(banner);
                }
                if let Some((change, label)) = &self.notice {
                    let headline = match change {
                        TierChange::LevelUp => "LEVEL UP!",
                        _ => "Let's try easier words",
                    };
                    lines.push(format!("*** {} {} ***", headline, label));
                }
                if let Some(text) = &self.spoken {
                    lines.push(format!("(says: {})", text));
                }
                lines.push(String::new());
                lines.push("Tab: new word   Esc: menu".to_string());
            }
            Screen::Won {
                summary,
                message,
                achievements,
            } => {
                lines.push(message.clone());
                lines.push(String::new());
                lines.push(format!("Words: {}", summary.words_completed()));
                lines.push(format!("Perfect: {}", summary.perfect_words()));
                lines.push(format!("Best streak: {}", summary.max_streak()));
                lines.push(format!("Accuracy: {}%", summary.accuracy()));
                for achievement in achievements {
                    lines.push(format!("New achievement: {}", achievement));
                }
                lines.push(String::new());
                lines.push("Enter: play again   m: menu".to_string());
            }
        }
        lines
    }

    fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, Clear(ClearType::All))?;
        for (row, line) in self.lines().iter().enumerate() {
            queue!(out, MoveTo(0, row as u16), Print(line))?;
        }
        out.flush()
    }
}

fn split_at_char(word: &str, cursor: usize) -> (&str, &str) {
    let byte = word
        .char_indices()
        .nth(cursor)
        .map_or(word.len(), |(i, _)| i);
    word.split_at(byte)
}

/// Restores the terminal when dropped, including on a failed setup.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    /// Takes over a terminal already switched to raw mode.
    fn new(out: W) -> Self {
        Self { out }
    }

    /// Switches to the alternate screen and hides the cursor.
    fn enter(mut self) -> io::Result<Self> {
        execute!(self.out, EnterAlternateScreen, Hide)?;
        Ok(self)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show, LeaveAlternateScreen) {
            error!(error = %e, "Failed to leave alternate screen");
        }
        if let Err(e) = disable_raw_mode() {
            error!(error = %e, "Failed to disable raw mode");
        }
    }
}

/// Reads terminal keys on a blocking thread until the input channel closes.
fn spawn_key_reader(tx: mpsc::UnboundedSender<Input>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if let Some(input) = key_to_input(&key) {
                            if tx.send(input).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Terminal read failed");
                        let _ = tx.send(Input::Quit);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    error!(error = %e, "Terminal poll failed");
                    let _ = tx.send(Input::Quit);
                    break;
                }
            }
        }
        debug!("Key reader stopped");
    })
}

/// Runs an interactive game in the terminal until the player quits.
///
/// When `start` is set the game begins immediately on that path; otherwise
/// the menu is shown first.
#[instrument(skip(session))]
pub async fn run(session: GameSession, start: Option<LearningPath>) -> anyhow::Result<GameSession> {
    let prefs = session.profile().preferences();
    let mut view = View::new(prefs.player_name().clone(), *prefs.show_keyboard_hints());

    enable_raw_mode()?;
    let guard = TerminalGuard::new(io::stdout()).enter()?;
    info!("Terminal ready");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    if start.is_some() {
        // Receiver is alive until the loop below finishes.
        let _ = input_tx.send(Input::Start(start));
    }
    let reader = spawn_key_reader(input_tx);

    let renderer = tokio::spawn(async move {
        let mut out = io::stdout();
        view.draw(&mut out)?;
        while let Some(event) = event_rx.recv().await {
            view.apply(event);
            view.draw(&mut out)?;
        }
        Ok::<(), io::Error>(())
    });

    let session = PlayLoop::new(session, event_tx).run(input_rx).await;

    let rendered = renderer.await;
    let _ = reader.await;

    drop(guard);
    info!("Terminal restored");

    rendered??;
    Ok(session)
}
