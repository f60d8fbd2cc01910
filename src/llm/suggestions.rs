/// Split a completion reply into individual commands
///
/// Lines are trimmed; blank lines and `#` comments are dropped. A markdown
/// code fence wrapping the whole reply is removed first.
pub fn parse_commands(raw: &str) -> Vec<String> {
    strip_code_fence(raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Strip a surrounding ```` ```lang ... ``` ```` fence if present
fn strip_code_fence(raw: &str) -> &str {
    let mut cleaned = raw.trim();

    if cleaned.starts_with("```") {
        // Remove opening ```bash or ```
        cleaned = match cleaned.find('\n') {
            Some(first_newline) => &cleaned[first_newline + 1..],
            None => "",
        };
        // Remove closing ```
        if let Some(last_backticks) = cleaned.rfind("```") {
            cleaned = &cleaned[..last_backticks];
        }
    }

    cleaned
}
