//! Cheerful messages chosen from game results.

/// Headline for the win screen, by words completed in the game.
pub fn win_message(words_completed: u32) -> &'static str {
    match words_completed {
        20.. => "🏆 SUPER STAR READER! 🏆",
        10..=19 => "🌟 FANTASTIC JOB! 🌟",
        _ => "👏 GREAT WORK! 👏",
    }
}

/// Footer for the stats view, by lifetime average accuracy.
///
/// Nothing is said at 0%, which also covers "no words yet".
pub fn stats_message(average_accuracy: u32) -> Option<&'static str> {
    match average_accuracy {
        80.. => Some("🌟 Amazing work! You're doing great! 🌟"),
        50..=79 => Some("💪 Keep practicing! You're getting better! 💪"),
        1..=49 => Some("🎯 Every word you type makes you stronger! 🎯"),
        0 => None,
    }
}

/// Streak banner; hidden below two, double flame from five.
pub fn streak_banner(streak: u32) -> Option<String> {
    match streak {
        0 | 1 => None,
        2..=4 => Some(format!("🔥 {streak} STREAK!")),
        _ => Some(format!("🔥🔥 {streak} STREAK!")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_message_bands() {
        assert_eq!(win_message(9), "👏 GREAT WORK! 👏");
        assert_eq!(win_message(10), "🌟 FANTASTIC JOB! 🌟");
        assert_eq!(win_message(25), "🏆 SUPER STAR READER! 🏆");
    }

    #[test]
    fn test_stats_message_silent_at_zero() {
        assert_eq!(stats_message(0), None);
        assert!(stats_message(1).is_some());
    }

    #[test]
    fn test_streak_banner() {
        assert_eq!(streak_banner(1), None);
        assert_eq!(streak_banner(3).as_deref(), Some("🔥 3 STREAK!"));
        assert_eq!(streak_banner(5).as_deref(), Some("🔥🔥 5 STREAK!"));
    }
}
