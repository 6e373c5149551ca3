//! Browse command - interactive query session
//!
//! Keeps one `QueryState` alive for the whole session. Each line typed at
//! the prompt is parsed into a `BrowseCommand`; commands that change the
//! state re-run the query, the others act on the current page.

use super::AppContext;
use super::tag::{add_tag, remove_tag};
use crate::{
    Result,
    catalog::{TagDef, tags::predefined_tags},
    cli::QueryArgs,
    download::{DirectoryImporter, Downloader},
    fetch::{HttpSource, build_client},
    notify::{ConsoleNotifier, Notifier},
    output,
    query::{PageSize, QueryEngine, QueryPage, QueryState, SearchField, SortKey},
};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use std::io;

const HELP: &str = "\
Commands:
  n, next              next page (also: empty line)
  p, prev              previous page
  g, page <N>          jump to page N
  s, search [TERM]     search; /pattern/flags for regex, empty to clear
  f, field <FIELD>     search field: name, description, author, any
  o, sort <KEY>        sort: dateupdate, datecreate, name, author
  size <N>             page size: 10, 20, 30, 50
  +<TAG>               toggle include of a tag or category
  -<TAG>               toggle exclude of a tag or category
  c, clear             clear tag filters
  nsfw                 toggle NSFW visibility
  t, tags              list tags with counts
  v, show <N>          preview the N-th card on this page
  d, download <N>...   download cards on this page
  r, random            preview a random card
  tag add <NAME>       add a custom tag
  tag rm <ID>          remove a custom tag and drop it from the filters
  reload               refetch the catalog
  h, help              this help
  q, quit              leave";

/// One parsed browse prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Page(usize),
    Search(String),
    Field(SearchField),
    Sort(SortKey),
    Size(PageSize),
    ToggleInclude(String),
    ToggleExclude(String),
    Clear,
    ToggleNsfw,
    Tags,
    /// 1-based index on the current page
    Show(usize),
    /// 1-based indices on the current page
    Download(Vec<usize>),
    Random,
    AddTag(String),
    RemoveTag(String),
    Reload,
    Help,
    Quit,
}

/// What the session loop does after a state command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Requery { reload: bool },
    /// Custom tags changed: persist the settings, then re-run the query
    SaveAndRequery,
    Stay,
    Quit,
}

/// Parse one prompt line
///
/// # Errors
/// Returns a message describing the problem for unknown commands or
/// invalid arguments
pub fn parse_browse_command(line: &str) -> std::result::Result<BrowseCommand, String> {
    let line = line.trim();

    if let Some(tag) = line.strip_prefix('+') {
        return non_empty(tag).map(BrowseCommand::ToggleInclude);
    }
    if let Some(tag) = line.strip_prefix('-') {
        return non_empty(tag).map(BrowseCommand::ToggleExclude);
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_lowercase().as_str() {
        "" | "n" | "next" => BrowseCommand::Next,
        "p" | "prev" => BrowseCommand::Prev,
        "g" | "page" => BrowseCommand::Page(parse_index(rest)?),
        "s" | "search" => BrowseCommand::Search(rest.to_string()),
        "f" | "field" => BrowseCommand::Field(rest.parse()?),
        "o" | "sort" => BrowseCommand::Sort(rest.parse()?),
        "size" => BrowseCommand::Size(rest.parse()?),
        "c" | "clear" => BrowseCommand::Clear,
        "nsfw" => BrowseCommand::ToggleNsfw,
        "t" | "tags" => BrowseCommand::Tags,
        "v" | "show" => BrowseCommand::Show(parse_index(rest)?),
        "d" | "download" => {
            let indices = rest
                .split_whitespace()
                .map(parse_index)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if indices.is_empty() {
                return Err("download needs at least one card number".to_string());
            }
            BrowseCommand::Download(indices)
        }
        "r" | "random" => BrowseCommand::Random,
        "tag" => parse_tag_command(rest)?,
        "reload" => BrowseCommand::Reload,
        "h" | "help" | "?" => BrowseCommand::Help,
        "q" | "quit" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(command)
}

fn parse_tag_command(rest: &str) -> std::result::Result<BrowseCommand, String> {
    let (action, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match action {
        "add" => non_empty(arg).map(BrowseCommand::AddTag),
        "rm" | "remove" => non_empty(arg).map(BrowseCommand::RemoveTag),
        _ => Err("usage: tag add <NAME> | tag rm <ID>".to_string()),
    }
}

fn non_empty(tag: &str) -> std::result::Result<String, String> {
    let tag = tag.trim();
    if tag.is_empty() {
        Err("missing tag name".to_string())
    } else {
        Ok(tag.to_string())
    }
}

fn parse_index(text: &str) -> std::result::Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a number from 1, got '{text}'")),
    }
}

/// Apply a state-changing command
///
/// Custom tag edits go to `custom_tags` and report through `notifier`; a
/// removed tag is also dropped from the include and exclude selections.
/// Commands that act on the page rather than the state return `Stay`.
pub fn apply_command(
    state: &mut QueryState,
    custom_tags: &mut Vec<TagDef>,
    notifier: &impl Notifier,
    command: &BrowseCommand,
) -> Step {
    match command {
        BrowseCommand::Next => state.next_page(),
        BrowseCommand::Prev => state.prev_page(),
        BrowseCommand::Page(page) => state.set_page(*page),
        BrowseCommand::Search(term) => state.set_search_term(term.as_str()),
        BrowseCommand::Field(field) => state.set_search_field(*field),
        BrowseCommand::Sort(key) => state.set_sort_key(*key),
        BrowseCommand::Size(size) => state.set_page_size(*size),
        BrowseCommand::ToggleInclude(tag) => state.toggle_include(tag),
        BrowseCommand::ToggleExclude(tag) => state.toggle_exclude(tag),
        BrowseCommand::Clear => state.clear_filters(),
        BrowseCommand::ToggleNsfw => state.set_show_nsfw(!state.show_nsfw()),
        BrowseCommand::AddTag(name) => {
            return match add_tag(custom_tags, name, notifier) {
                Some(_) => Step::SaveAndRequery,
                None => Step::Stay,
            };
        }
        BrowseCommand::RemoveTag(id) => {
            if !remove_tag(custom_tags, id, notifier) {
                return Step::Stay;
            }
            state.forget_tag(id);
            return Step::SaveAndRequery;
        }
        BrowseCommand::Reload => return Step::Requery { reload: true },
        BrowseCommand::Quit => return Step::Quit,
        BrowseCommand::Tags
        | BrowseCommand::Show(_)
        | BrowseCommand::Download(_)
        | BrowseCommand::Random
        | BrowseCommand::Help => return Step::Stay,
    }
    Step::Requery { reload: false }
}

/// Execute the browse command
///
/// # Errors
/// Returns an error if the first query fails or the prompt cannot be read
pub async fn execute(ctx: &mut AppContext, args: &QueryArgs) -> Result<()> {
    let mut engine = ctx.engine()?;
    let mut state = ctx.query_state(args);
    let notifier = ctx.notifier();
    let downloader = Downloader::new(
        build_client()?,
        DirectoryImporter::new(ctx.settings.download_dir()?),
        notifier,
    );
    let theme = ColorfulTheme::default();

    let mut page = engine.execute(&mut state, args.reload).await?;
    ctx.persist_cache(&engine);
    if ctx.settings.auto_load_tags {
        print_tags(ctx, &page, &state);
    }
    println!("{}", output::page(&page, &state, false));

    loop {
        let line: String = Input::with_theme(&theme)
            .with_prompt("browse")
            .allow_empty(true)
            .interact_text()
            .map_err(io::Error::other)?;

        let command = match parse_browse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                notifier.warning(&e);
                continue;
            }
        };

        let step = apply_command(&mut state, &mut ctx.settings.custom_tags, &notifier, &command);
        let reload = match step {
            Step::Quit => break,
            Step::Stay => {
                act_on_page(ctx, &mut engine, &downloader, &page, &state, &command).await;
                continue;
            }
            Step::SaveAndRequery => {
                if let Err(e) = ctx.save_settings() {
                    notifier.error(&e.to_string());
                }
                false
            }
            Step::Requery { reload } => reload,
        };

        match engine.execute(&mut state, reload).await {
            Ok(next) => {
                page = next;
                println!("{}", output::page(&page, &state, false));
            }
            Err(e) => notifier.error(&e.to_string()),
        }
    }

    ctx.persist_cache(&engine);
    Ok(())
}

async fn act_on_page(
    ctx: &AppContext,
    engine: &mut QueryEngine<HttpSource>,
    downloader: &Downloader<DirectoryImporter, ConsoleNotifier>,
    page: &QueryPage,
    state: &QueryState,
    command: &BrowseCommand,
) {
    let notifier = ctx.notifier();

    match command {
        BrowseCommand::Show(n) => match page.items.get(n - 1) {
            Some(entry) => println!("{}", output::preview(entry)),
            None => notifier.warning(&format!("No card #{n} on this page")),
        },
        BrowseCommand::Download(numbers) => {
            let paths: Vec<String> = numbers
                .iter()
                .filter_map(|n| match page.items.get(n - 1) {
                    Some(entry) => Some(entry.path.clone()),
                    None => {
                        notifier.warning(&format!("No card #{n} on this page"));
                        None
                    }
                })
                .collect();
            downloader.download_batch(&page.catalog, &paths).await;
        }
        BrowseCommand::Random => match engine.random_entry(&mut rand::thread_rng()).await {
            Ok(Some(entry)) => println!("{}", output::preview(&entry)),
            Ok(None) => notifier.error("No cards available for random selection"),
            Err(e) => notifier.error(&e.to_string()),
        },
        BrowseCommand::Tags => print_tags(ctx, page, state),
        BrowseCommand::Help => println!("{HELP}"),
        _ => {}
    }
}

fn print_tags(ctx: &AppContext, page: &QueryPage, state: &QueryState) {
    let counts = ctx.settings.show_tag_count.then(|| page.tag_counts());
    let mut tags = ctx.settings.categories.clone();
    tags.extend(predefined_tags());
    tags.extend(ctx.settings.custom_tags.iter().cloned());
    println!("{}", output::tag_list("Tags", &tags, counts, Some(state), false));
}
