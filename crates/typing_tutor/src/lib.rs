//! Typing tutor application layer.
//!
//! Wraps the pure game logic of `typing_tutor_core` with everything that
//! touches the outside world.
//!
//! # Architecture
//!
//! - **Store**: key/value persistence (SQLite, JSON files, memory)
//! - **Profile**: stats and preferences with tolerant loading
//! - **Config**: TOML configuration and data directory resolution
//! - **Scheduler**: cancellable single-shot timers on tokio
//! - **Session**: the game reducer producing events and timer requests
//! - **Play loop**: feeds input and fired timers into the session
//!
//! # Example
//!
//! ```no_run
//! use typing_tutor::{GameSession, Input, MemoryStore, PlayLoop, ProfileStore, TutorConfig};
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let session = GameSession::new(ProfileStore::load(MemoryStore::new()), &TutorConfig::default());
//! let (event_tx, _event_rx) = mpsc::unbounded_channel();
//! let (input_tx, input_rx) = mpsc::unbounded_channel();
//! input_tx.send(Input::Start(None)).unwrap();
//! let _session = PlayLoop::new(session, event_tx).run(input_rx).await;
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod play_loop;
mod profile_store;
mod scheduler;
mod session;
mod store;
mod terminal;

// Crate-level exports - Configuration
pub use config::{
    CONFIG_ENV, ConfigError, DATA_ENV, DB_FILE, LOG_FILE, StorageKind, Timings, TutorConfig,
};

// Crate-level exports - Storage
pub use store::{JsonDirStore, KeyValueStore, KvEntry, MemoryStore, NewKvEntry, SqliteStore, StoreError};

// Crate-level exports - Player records
pub use profile_store::ProfileStore;

// Crate-level exports - Timers
pub use scheduler::{Scheduler, Timer, TimerSlot};

// Crate-level exports - Game session
pub use session::{Effect, GameEvent, GameSession, Phase, SoundCue, VICTORY_CHEER};

// Crate-level exports - Play loop
pub use play_loop::{Input, PlayLoop};

// Crate-level exports - Terminal front-end
pub use terminal::{key_to_input, run as run_terminal};
