pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

/// Collapses whitespace, drops control characters, and caps the length.
pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let cleaned = name
        .split_whitespace()
        .map(|word| word.chars().filter(|ch| !ch.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned
        .chars()
        .take(MAX_PLAYER_NAME_LENGTH)
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_fall_back() {
        assert_eq!(sanitize_player_name("", "Anonymous"), "Anonymous");
        assert_eq!(sanitize_player_name("   \t ", "Anonymous"), "Anonymous");
        assert_eq!(sanitize_player_name("\u{7}", "Anonymous"), "Anonymous");
    }

    #[test]
    fn whitespace_is_collapsed_and_length_capped() {
        assert_eq!(sanitize_player_name("  slim   jim ", "x"), "slim jim");
        let long = "abcdefghij klmnopqrstuvwxyz";
        let cleaned = sanitize_player_name(long, "x");
        assert_eq!(cleaned, "abcdefghij klmnopqrs");
        assert_eq!(cleaned.chars().count(), MAX_PLAYER_NAME_LENGTH);
    }

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(sanitize_player_name("ev\u{1b}il", "x"), "evil");
    }
}
