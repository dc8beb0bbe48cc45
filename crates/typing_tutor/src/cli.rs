//! Command-line interface for typing_tutor.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use typing_tutor_core::LearningPath;

/// Typing Tutor - a typing game for young readers
#[derive(Parser, Debug)]
#[command(name = "typing_tutor")]
#[command(about = "Typing game for young readers with adaptive difficulty", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Learning path to start on; shows the menu when omitted
        #[arg(long)]
        path: Option<LearningPath>,

        /// Words per game, overriding the saved preference for this run
        #[arg(long)]
        words: Option<u32>,

        /// Keep nothing after exit
        #[arg(long)]
        ephemeral: bool,
    },

    /// Show lifetime statistics
    Stats,

    /// Erase all statistics and achievements
    ResetStats,

    /// List learning paths and their tiers
    Paths,

    /// Show or change preferences
    Prefs {
        /// Play sounds and speech
        #[arg(long)]
        sound: Option<bool>,

        /// Words per game
        #[arg(long)]
        words: Option<u32>,

        /// Highlight the next key
        #[arg(long)]
        hints: Option<bool>,

        /// Player name
        #[arg(long)]
        name: Option<String>,

        /// Preselected learning path
        #[arg(long)]
        path: Option<LearningPath>,

        /// Show capitals on the on-screen keyboard
        #[arg(long)]
        upper: Option<bool>,
    },
}
