// Colored terminal output for reply listings.
//
// All terminal-specific formatting lives here; the main.rs display paths
// delegate to these functions.

use chrono::DateTime;
use colored::Colorize;

use crate::twitter::search::Tweet;

/// Display the collected replies for a tweet in the terminal.
pub fn display_replies(tweet_id: &str, replies: &[Tweet]) {
    if replies.is_empty() {
        println!("No direct replies found for tweet {tweet_id}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Replies to {} ({} found) ===", tweet_id, replies.len()).bold()
    );
    println!();

    for (i, reply) in replies.iter().enumerate() {
        let text = reply.text.replace('\n', " ");
        println!(
            "  {:>3}. @{} {}",
            i + 1,
            reply.user.screen_name.bold(),
            format_timestamp(&reply.created_at).dimmed(),
        );
        println!("       {}", truncate_chars(&text, 120));
    }

    println!();
}

/// Reformat the API's legacy timestamp ("Wed Oct 10 20:19:24 +0000 2018")
/// into a compact form. Falls back to the raw value when it doesn't parse.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Truncate to at most `max_chars` characters, appending "..." if cut.
///
/// Byte slicing would panic mid-character on emoji or accented letters;
/// this counts chars instead.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
