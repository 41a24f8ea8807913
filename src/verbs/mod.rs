//! Virtual verbs.
//!
//! Reserved top-level words are checked before any stub lookup. A stub
//! registered under one of these names is shadowed: the verb always wins.
//!
//! - [`search`] - cross-stub keyword search
//! - [`help`] - command help and stub listings
//! - [`update`] - remote refresh of stubs

pub mod help;
pub mod search;
pub mod update;

pub use help::{command_help, stub_overview, HelpReport, StubOverview};
pub use search::{search, SearchHit};
pub use update::{targets as update_targets, update, update_stub, UpdateReport, UpdateStatus};

/// A cross-stub operation reached by a reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualVerb {
    Search,
    Help,
    Update,
}

impl VirtualVerb {
    /// Recognise a verb word, ignoring ASCII case.
    pub fn parse(word: &str) -> Option<Self> {
        [Self::Search, Self::Help, Self::Update]
            .into_iter()
            .find(|verb| verb.name().eq_ignore_ascii_case(word))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Help => "help",
            Self::Update => "update",
        }
    }
}

/// What a top-level word list asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    /// No words: list stubs and verbs.
    ListStubs,
    /// A reserved verb with its remaining words.
    Verb(VirtualVerb, &'a [String]),
    /// A stub alone: list its commands.
    ListCommands(&'a str),
    /// A stub command with forwarded arguments.
    Invoke {
        stub: &'a str,
        command: &'a str,
        args: &'a [String],
    },
}

/// Route top-level words. Verbs are matched before stubs.
pub fn route(words: &[String]) -> Route<'_> {
    match words {
        [] => Route::ListStubs,
        [first, rest @ ..] => {
            if let Some(verb) = VirtualVerb::parse(first) {
                return Route::Verb(verb, rest);
            }
            match rest {
                [] => Route::ListCommands(first),
                [command, args @ ..] => Route::Invoke {
                    stub: first,
                    command,
                    args,
                },
            }
        }
    }
}
