//! Terminal front end
//!
//! Maps typed commands onto feed triggers and renders feed views as text.
//! This stands in for the gesture layer: `refresh` is the pull-to-refresh,
//! `more` is reaching the bottom of the list.

use feed_sync::domain::ports::Navigator;
use feed_sync::{FeedView, FetchState};

const HELP: &str = "\
Commands:
  refresh, r        fetch newer microposts
  more, m           fetch older microposts
  post <text>, p    post a micropost
  help, h           show this help
  quit, q           exit";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    More,
    Post(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "refresh" | "r" => Ok(Command::Refresh),
            "more" | "m" => Ok(Command::More),
            "post" | "p" if rest.is_empty() => Err("Usage: post <text>".to_string()),
            "post" | "p" => Ok(Command::Post(rest.to_string())),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            "" => Err(String::new()),
            _ => Err(format!("Unknown command: {} (try 'help')", verb)),
        }
    }
}

pub fn help_text() -> &'static str {
    HELP
}

/// Render the whole feed, newest first
pub fn render(view: &FeedView) -> String {
    let mut out = String::new();

    if view.status.newer == FetchState::InFlight {
        out.push_str("  ... loading newer\n");
    }
    if view.items.is_empty() {
        out.push_str("  (no microposts yet)\n");
    }
    for post in view.items.iter() {
        out.push_str(&format!(
            "  #{:<6} {:<16} {}  [{}]\n",
            post.id.0,
            post.user.name,
            post.content,
            post.created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    if view.status.older == FetchState::InFlight {
        out.push_str("  ... loading older\n");
    } else if view.tail_exhausted {
        out.push_str("  -- end of feed --\n");
    }

    out
}

/// Navigation for a terminal session: there is no landing screen, so
/// leaving the feed just tells the user how to sign in.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate_to_top(&self) {
        eprintln!("Not signed in. Set MICROPOST_AUTH_TOKEN to your API token.");
    }
}
