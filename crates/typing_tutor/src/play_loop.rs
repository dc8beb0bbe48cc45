//! Drives a [`GameSession`] from input and timer channels.

use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use typing_tutor_core::{KeyInput, LearningPath};

use crate::scheduler::{Scheduler, Timer};
use crate::session::{Effect, GameEvent, GameSession, Phase};

/// Input from a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A key press. Printable keys type; on the menu, digits pick a path;
    /// on the win screen, `m` returns to the menu.
    Key(KeyInput),
    /// Enter: start from the menu, play again from the win screen.
    Confirm,
    /// Escape: leave a game for the menu, or quit from the menu.
    Back,
    /// Start a game on a path, or the remembered one.
    Start(Option<LearningPath>),
    /// Replace the current word without scoring it.
    SkipWord,
    /// Stop the loop, saving an unfinished game.
    Quit,
}

/// Owns the session and its timers for the lifetime of a play session.
///
/// The loop is single threaded: input and fired timers are handled one at
/// a time, so the session needs no locking.
#[derive(Debug)]
pub struct PlayLoop {
    session: GameSession,
    scheduler: Scheduler,
    timers: mpsc::UnboundedReceiver<Timer>,
    events: mpsc::UnboundedSender<GameEvent>,
}

impl PlayLoop {
    /// Creates a loop publishing to `events`.
    #[instrument(skip(session, events))]
    pub fn new(session: GameSession, events: mpsc::UnboundedSender<GameEvent>) -> Self {
        let (scheduler, timers) = Scheduler::new();
        Self {
            session,
            scheduler,
            timers,
            events,
        }
    }

    /// Runs until [`Input::Quit`], [`Input::Back`] on the menu, or the input
    /// channel closes. Returns the session for inspection.
    #[instrument(skip(self, input))]
    pub async fn run(mut self, mut input: mpsc::UnboundedReceiver<Input>) -> GameSession {
        info!("Play loop started");
        loop {
            let effects = tokio::select! {
                received = input.recv() => match received {
                    Some(Input::Quit) | None => break,
                    Some(Input::Back) if self.session.phase() == Phase::Menu => break,
                    Some(other) => self.dispatch(other),
                },
                Some(timer) = self.timers.recv() => self.session.on_timer(timer),
            };
            self.apply(effects);
        }

        if self.session.phase() == Phase::Playing {
            let effects = self.session.back_to_menu();
            self.apply(effects);
        }
        self.scheduler.cancel_all();
        info!("Play loop stopped");
        self.session
    }

    #[instrument(skip(self), fields(phase = %self.session.phase()))]
    fn dispatch(&mut self, input: Input) -> Vec<Effect> {
        match (self.session.phase(), input) {
            (_, Input::Start(path)) => self.session.start_game(path),
            (Phase::Playing, Input::Key(key)) => self.session.on_key(&key),
            (Phase::Playing, Input::SkipWord) => self.session.skip_word(),
            (Phase::Playing | Phase::Won, Input::Back) => self.session.back_to_menu(),
            (Phase::Menu, Input::Confirm) => self.session.start_game(None),
            (Phase::Menu, Input::Key(key)) => match menu_choice(&key) {
                Some(path) => self.session.start_game(Some(path)),
                None => Vec::new(),
            },
            (Phase::Won, Input::Confirm) => self.session.play_again(),
            (Phase::Won, Input::Key(key)) if is_menu_key(&key) => self.session.back_to_menu(),
            (phase, input) => {
                debug!(%phase, ?input, "Input ignored");
                Vec::new()
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Emit(event) => {
                    if self.events.send(event).is_err() {
                        debug!("Event receiver dropped");
                    }
                }
                Effect::Schedule { delay, timer } => self.scheduler.schedule(delay, timer),
                Effect::Cancel(slot) => self.scheduler.cancel(slot),
                Effect::CancelAll => self.scheduler.cancel_all(),
            }
        }
    }
}

/// Path chosen by a menu digit: `1` is the first path.
fn menu_choice(key: &KeyInput) -> Option<LearningPath> {
    let digit = key.printable()?.to_digit(10)? as usize;
    LearningPath::iter().nth(digit.checked_sub(1)?)
}

fn is_menu_key(key: &KeyInput) -> bool {
    matches!(key.printable(), Some('m' | 'M'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_digits_map_to_paths() {
        assert_eq!(menu_choice(&'1'.into()), Some(LearningPath::Beginner));
        assert_eq!(menu_choice(&'5'.into()), Some(LearningPath::SecondGrade));
        assert_eq!(menu_choice(&'0'.into()), None);
        assert_eq!(menu_choice(&'9'.into()), None);
        assert_eq!(menu_choice(&'x'.into()), None);
    }
}
