//! Command Dispatcher
//!
//! Thin text-matching layer: recognizes meme keywords in a command
//! directed at the bot and turns a dispensed item into a channel reply.
//! On any pool failure the reply is a filler phrase, never an error
//! leaked to the channel.

use rand::seq::SliceRandom;
use tracing::warn;

use crate::pool::PoolManager;

// == Keywords ==
/// Command substrings that trigger a meme.
const KEYWORDS: &[&str] = &[
    "memes",
    "meme",
    "dank",
    "shitposting",
    "shitpost",
    "funny",
    "meirl",
    "me irl",
    "me_irl",
];

/// Canned replies for commands without a keyword, and for pool failures.
const FILLER_REPLIES: &[&str] = &[
    "No memes no dreams",
    "No memes for u",
    "Rest in peace Harambe",
    "How about no",
    "The earth is flat",
    "f u",
    "trolololololololol",
    "ron paul 2k12",
];

// == Mention Parsing ==
/// Extracts the command text from a message directed at the bot.
///
/// Only messages whose first whitespace token is exactly `<@bot_id>` are
/// commands; everything after the mention is the command text. Returns
/// None for anything else.
pub fn parse_mention(text: &str, bot_id: &str) -> Option<String> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    if first != format!("<@{}>", bot_id) {
        return None;
    }
    Some(tokens.collect::<Vec<_>>().join(" "))
}

// == Keyword Matching ==
/// Returns true if the lowercased command mentions any meme keyword.
pub fn wants_meme(command: &str) -> bool {
    let lowered = command.to_lowercase();
    KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

// == Reply Formatting ==
/// Formats a dispensed item as a quoted channel reply.
pub fn format_meme(title: &str, url: &str) -> String {
    format!("> *{}* \n> {}", title, url)
}

/// Picks a filler phrase at random, occasionally echoing the command back.
fn filler_reply(command: &str) -> String {
    let echo = format!("\"{}\"\n\"{}\"\n\"{}\"\n", command, command, command);
    let mut replies: Vec<String> = FILLER_REPLIES.iter().map(|s| s.to_string()).collect();
    replies.push(echo);

    let mut rng = rand::thread_rng();
    replies
        .choose(&mut rng)
        .cloned()
        .unwrap_or_else(|| "No memes no dreams".to_string())
}

// == Respond ==
/// Builds the reply for a command directed at the bot.
///
/// A keyword command dispenses one meme; any pool error falls back to a
/// filler phrase. Commands without a keyword get a filler phrase outright.
pub async fn respond(manager: &PoolManager, command: &str) -> String {
    if !wants_meme(command) {
        return filler_reply(command);
    }

    match manager.dispense().await {
        Ok(item) => format_meme(&item.title, &item.url),
        Err(e) => {
            warn!(error = %e, "no meme available, replying with filler");
            filler_reply(command)
        }
    }
}
