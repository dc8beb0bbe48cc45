//! Typing Tutor - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use typing_tutor::{GameSession, LOG_FILE, ProfileStore, StorageKind, TutorConfig, run_terminal};
use typing_tutor_core::{LearningPath, PreferenceUpdate, stats_message};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            path,
            words,
            ephemeral,
        } => {
            let mut config = TutorConfig::resolve(cli.config.as_deref())?;
            if ephemeral {
                config = config.with_storage(StorageKind::Memory);
            }
            init_file_logging(&config);
            run_play(config, path, words).await
        }
        command => {
            init_stderr_logging();
            let config = TutorConfig::resolve(cli.config.as_deref())?;
            run_command(command, &config)
        }
    }
}

/// Logs to stderr for the non-interactive commands.
fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs to a file so the terminal game stays readable.
fn init_file_logging(config: &TutorConfig) {
    let dir = config.resolved_data_dir();
    let log_file = std::fs::create_dir_all(&dir).and_then(|_| std::fs::File::create(dir.join(LOG_FILE)));
    match log_file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false)
                .try_init();
        }
        Err(e) => eprintln!("Logging disabled: cannot open {}: {}", dir.join(LOG_FILE).display(), e),
    }
}

#[instrument(skip(config))]
async fn run_play(config: TutorConfig, path: Option<LearningPath>, words: Option<u32>) -> Result<()> {
    info!(storage = %config.storage(), "Starting typing tutor");
    let profile = ProfileStore::from_boxed(config.open_store()?);
    let mut session = GameSession::new(profile, &config);
    session.set_words_override(words);

    let session = run_terminal(session, path).await?;

    let profile = session.profile();
    println!("Thanks for playing, {}!", profile.preferences().player_name());
    if let Some(message) = stats_message(profile.stats().average_accuracy()) {
        println!("{}", message);
    }
    Ok(())
}

#[instrument(skip(config))]
fn run_command(command: Command, config: &TutorConfig) -> Result<()> {
    match command {
        Command::Stats => {
            let profile = ProfileStore::from_boxed(config.open_store()?);
            print_stats(&profile);
        }
        Command::ResetStats => {
            let mut profile = ProfileStore::from_boxed(config.open_store()?);
            profile.reset_stats();
            println!("Stats reset.");
        }
        Command::Paths => print_paths(),
        Command::Prefs {
            sound,
            words,
            hints,
            name,
            path,
            upper,
        } => {
            let mut profile = ProfileStore::from_boxed(config.open_store()?);
            let updates: Vec<PreferenceUpdate> = [
                sound.map(PreferenceUpdate::SoundEnabled),
                words.map(PreferenceUpdate::WordsPerGame),
                hints.map(PreferenceUpdate::ShowKeyboardHints),
                name.map(PreferenceUpdate::PlayerName),
                path.map(PreferenceUpdate::LastSelectedPath),
                upper.map(PreferenceUpdate::ShowUpperCaseKeyboard),
            ]
            .into_iter()
            .flatten()
            .collect();
            profile.update_preferences(updates);
            print_preferences(&profile);
        }
        Command::Play { .. } => warn!("Play is handled before dispatch"),
    }
    Ok(())
}

fn print_stats(profile: &ProfileStore) {
    let stats = profile.stats();
    println!("Stats for {}", profile.preferences().player_name());
    println!("  Games played:    {}", stats.total_games_played());
    println!("  Games won:       {}", stats.games_won());
    println!("  Words typed:     {}", stats.total_words_typed());
    println!("  Perfect words:   {}", stats.total_perfect_words());
    println!("  Best streak:     {}", stats.highest_streak());
    println!("  Best accuracy:   {}%", stats.best_accuracy());
    println!("  Average accuracy: {}%", stats.average_accuracy());
    if let Some(last) = stats.last_played() {
        println!("  Last played:     {}", last.format("%Y-%m-%d %H:%M UTC"));
    }
    if !stats.achievements().is_empty() {
        println!("  Achievements:    {}", stats.achievements().join(", "));
    }
    if let Some(message) = stats_message(stats.average_accuracy()) {
        println!();
        println!("{}", message);
    }
}

fn print_paths() {
    for path in LearningPath::iter() {
        println!("{}", path);
        for (i, tier) in path.tiers().iter().enumerate() {
            println!("  {}. {} [{}]", i + 1, tier.label(), tier.levels().join(", "));
        }
    }
}

fn print_preferences(profile: &ProfileStore) {
    let prefs = profile.preferences();
    println!("Player name:     {}", prefs.player_name());
    println!("Learning path:   {}", prefs.last_selected_path());
    println!("Words per game:  {}", prefs.words_per_game());
    println!("Sound:           {}", prefs.sound_enabled());
    println!("Keyboard hints:  {}", prefs.show_keyboard_hints());
    println!("Upper case keys: {}", prefs.show_upper_case_keyboard());
}
