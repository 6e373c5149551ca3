//! Command-line interface definitions and parsing
//!
//! # Commands
//!
//! - **browse**: interactive session over a persistent query (default)
//! - **search**: run one query and print a page of results
//! - **tags**: list categories, predefined and custom tags with counts
//! - **show** / **random**: preview one card
//! - **download**: save one or more cards to the download directory
//! - **tag**: manage custom tags
//! - **cache** / **config**: maintenance
//!
//! Query options (`--tag`, `--exclude`, `--sort`, ...) are shared by
//! `search` and `browse`; in browse mode they seed the initial state.

use crate::query::{PageSize, QueryState, SearchField, SortKey};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "cardcat")]
#[command(about = "Browse, search and download character cards", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Use an alternate settings file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

/// Query options shared by `search` and `browse`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    /// Search term: plain text, or a regex literal like /^pin/i
    #[arg(value_name = "TERM")]
    pub term: Option<String>,

    /// Field the search term is matched against
    #[arg(short = 'f', long = "field", value_name = "FIELD")]
    pub field: Option<SearchField>,

    /// Only cards carrying this tag or in this category (repeatable)
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Hide cards carrying this tag or in this category (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "TAG")]
    pub exclude: Vec<String>,

    /// Sort order: dateupdate, datecreate, name or author
    #[arg(short = 's', long = "sort", value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Page to show
    #[arg(short = 'p', long = "page", value_name = "N")]
    pub page: Option<usize>,

    /// Results per page: 10, 20, 30 or 50
    #[arg(short = 'n', long = "page-size", value_name = "N")]
    pub page_size: Option<PageSize>,

    /// Show NSFW cards
    #[arg(long = "nsfw", conflicts_with = "no_nsfw")]
    pub nsfw: bool,

    /// Hide NSFW cards
    #[arg(long = "no-nsfw")]
    pub no_nsfw: bool,

    /// Bypass the dataset cache
    #[arg(short = 'r', long = "reload")]
    pub reload: bool,
}

impl QueryArgs {
    /// NSFW visibility requested on the command line, if any
    #[must_use]
    pub const fn show_nsfw(&self) -> Option<bool> {
        match (self.nsfw, self.no_nsfw) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Apply every given option on top of `state`
    ///
    /// The page is applied last so that it survives the page resets caused
    /// by the other options.
    pub fn apply_to(&self, state: &mut QueryState) {
        if let Some(show) = self.show_nsfw() {
            state.set_show_nsfw(show);
        }
        if let Some(size) = self.page_size {
            state.set_page_size(size);
        }
        if let Some(field) = self.field {
            state.set_search_field(field);
        }
        if let Some(term) = &self.term {
            state.set_search_term(term.as_str());
        }
        if let Some(key) = self.sort {
            state.set_sort_key(key);
        }
        for tag in &self.tags {
            state.include(tag);
        }
        for tag in &self.exclude {
            state.exclude(tag);
        }
        if let Some(page) = self.page {
            state.set_page(page);
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive browsing session (default)
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run one query and print the resulting page
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List categories and tags
    Tags {
        /// Skip fetching the catalog and omit occurrence counts
        #[arg(long = "no-counts")]
        no_counts: bool,
    },

    /// Show a card's details
    Show {
        /// Exact card path as listed in search results
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Show a random card
    Random,

    /// Download cards by path
    #[command(visible_alias = "d")]
    Download {
        /// Exact card paths as listed in search results
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,

        /// Save into this directory instead of the configured one
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Manage custom tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Manage the dataset cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Custom tag subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TagCommands {
    /// Add a custom tag
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Remove a custom tag
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List custom tags
    #[command(visible_alias = "ls")]
    List,
}

/// Dataset cache subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommands {
    /// Forget the cached dataset so the next query fetches
    Clear,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,

    /// Print the settings file location
    Path,

    /// Set a setting
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,
    },
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Browse if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Browse {
            query: QueryArgs::default(),
        })
    }
}
