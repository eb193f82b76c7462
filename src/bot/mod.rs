//! Bot Module
//!
//! Dispatch glue between the chat platform and the meme pool: mention
//! parsing, keyword matching, reply formatting, and the client used to
//! post replies back to a channel.

mod dispatcher;
mod slack;

pub use dispatcher::{format_meme, parse_mention, respond, wants_meme};
pub use slack::{ChatClient, SlackWebClient};
