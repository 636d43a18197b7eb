use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::Path;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::compose::{self, Platform, PostConfig};
use crate::engine::{self, DateRange, SortKey, ViewConfig};
use crate::entity::{parse_tags, EntryUpdate, LogEntry, NewEntry};
use crate::error::{Result, WeeklogError};
use crate::generate::{GeminiClient, API_KEY_ENV};
use crate::server;
use crate::storage::JsonStore;

/// Resolve an ID argument against the store: full UUID or unique prefix.
fn find_entry(store: &JsonStore, id: &str) -> Result<LogEntry> {
    let entries = store.list()?;
    let matched: Vec<&LogEntry> = entries
        .iter()
        .filter(|e| e.id.to_string().starts_with(id))
        .collect();

    match matched.as_slice() {
        [entry] => Ok((*entry).clone()),
        [] => Err(WeeklogError::EntryNotFound(id.to_string())),
        _ => Err(WeeklogError::Storage(format!(
            "ID prefix '{}' is ambiguous",
            id
        ))),
    }
}

/// Normalize repeated --tag values, splitting any comma-separated ones.
fn collect_tags(raw: &[String]) -> Vec<String> {
    raw.iter().flat_map(|t| parse_tags(t)).collect()
}

fn print_entry_line(entry: &LogEntry) {
    let date = entry
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    println!(
        "  {} [{}] {}",
        &entry.id.to_string()[..7],
        date,
        entry.title
    );
    if !entry.tags.is_empty() {
        println!("      tags: {}", entry.tags.join(", "));
    }
}

pub fn handle_init(db: &Path) -> Result<()> {
    let store = JsonStore::init(db)?;
    println!("Initialized empty log database at {}", store.path().display());
    Ok(())
}

pub fn handle_add(
    db: &Path,
    title: String,
    description: String,
    image_url: Option<String>,
    tags: Vec<String>,
    json: bool,
) -> Result<()> {
    let store = JsonStore::open(db)?;

    let entry = store.create(NewEntry {
        title,
        description,
        image_url,
        tags: collect_tags(&tags),
        date: None,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!(
            "Logged {} - {}",
            &entry.id.to_string()[..7],
            entry.title
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_list(
    db: &Path,
    search: String,
    tag: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    sort: SortKey,
    page: usize,
    all: bool,
    json: bool,
) -> Result<()> {
    let store = JsonStore::open(db)?;
    let entries = store.list()?;

    if all {
        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            println!("No entries logged.");
        } else {
            println!("All entries:\n");
            for entry in &entries {
                print_entry_line(entry);
            }
        }
        return Ok(());
    }

    let config = ViewConfig {
        search_query: search,
        tag_filter: tag,
        date_range: match (from, to) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        },
        sort_key: Some(sort),
        page,
        ..ViewConfig::default()
    };

    let view = engine::page_view(&entries, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&view.page_items)?);
        return Ok(());
    }

    if view.total_matched == 0 {
        println!("No entries matched.");
        return Ok(());
    }

    println!(
        "Page {} ({} matched):\n",
        config.page, view.total_matched
    );
    for entry in &view.page_items {
        print_entry_line(entry);
    }
    if view.has_prev_page || view.has_next_page {
        let mut hints = Vec::new();
        if view.has_prev_page {
            hints.push(format!("--page {}", config.page - 1));
        }
        if view.has_next_page {
            hints.push(format!("--page {}", config.page + 1));
        }
        println!("\nMore: {}", hints.join(" / "));
    }

    Ok(())
}

pub fn handle_get(db: &Path, id: String, json: bool) -> Result<()> {
    let store = JsonStore::open(db)?;
    let entry = find_entry(&store, &id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("Entry {}", entry.id);
        println!("Title: {}", entry.title);
        if let Some(ts) = entry.timestamp {
            println!("Logged: {}", ts.format("%Y-%m-%d %H:%M"));
        }
        if !entry.tags.is_empty() {
            println!("Tags: {}", entry.tags.join(", "));
        }
        if let Some(ref url) = entry.image_url {
            println!("Image: {}", url);
        }
        if !entry.description.is_empty() {
            println!("\n{}", entry.description);
        }
    }

    Ok(())
}

pub fn handle_update(
    db: &Path,
    id: String,
    title: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    tags: Vec<String>,
    json: bool,
) -> Result<()> {
    let store = JsonStore::open(db)?;
    let current = find_entry(&store, &id)?;

    // The wire operation is a full replacement; unspecified flags carry the
    // current values forward.
    let update = EntryUpdate {
        title: title.unwrap_or(current.title),
        description: description.unwrap_or(current.description),
        image_url: match image_url {
            Some(url) if url.is_empty() => None,
            Some(url) => Some(url),
            None => current.image_url,
        },
        tags: if tags.is_empty() {
            current.tags
        } else {
            collect_tags(&tags)
        },
    };

    let updated = store.update(&current.id, update)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "Updated {} - {}",
            &updated.id.to_string()[..7],
            updated.title
        );
    }

    Ok(())
}

pub fn handle_delete(db: &Path, id: String, force: bool) -> Result<()> {
    let store = JsonStore::open(db)?;
    let entry = find_entry(&store, &id)?;

    if !force {
        eprintln!(
            "Delete entry {} - {}? [y/N] ",
            &entry.id.to_string()[..7],
            entry.title
        );

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(WeeklogError::Storage(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    store.delete(&entry.id)?;

    println!(
        "Deleted {} - {}",
        &entry.id.to_string()[..7],
        entry.title
    );

    Ok(())
}

pub fn handle_heatmap(db: &Path, json: bool) -> Result<()> {
    let store = JsonStore::open(db)?;
    let counts = engine::daily_counts(&store.list()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else if counts.is_empty() {
        println!("No dated entries logged.");
    } else {
        for (day, count) in &counts {
            println!("{}  {}", day, "#".repeat(*count));
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_post(
    db: &Path,
    platform: Platform,
    tone: String,
    length: String,
    emoji: u8,
    cta: bool,
    refine: Option<String>,
    show_prompt: bool,
    model: String,
    json: bool,
) -> Result<()> {
    let store = JsonStore::open(db)?;
    let activities = engine::week_entries(&store.list()?);

    let config = PostConfig {
        platform,
        tone,
        length,
        emoji_density: emoji,
        include_cta: cta,
    };

    let prompt = match refine {
        Some(instruction) => {
            let mut prior_post = String::new();
            io::stdin().read_to_string(&mut prior_post)?;
            if prior_post.trim().is_empty() {
                return Err(WeeklogError::Generate(
                    "Refining needs the prior post on stdin".to_string(),
                ));
            }
            compose::build_refine_prompt(&config, &instruction, &prior_post)
        }
        None => compose::build_prompt(&activities, &config),
    };

    if show_prompt {
        println!("{}", prompt);
        return Ok(());
    }

    let client = GeminiClient::from_env(&model).ok_or_else(|| {
        WeeklogError::Generate(format!(
            "API key is not set. Export {} to enable generation.",
            API_KEY_ENV
        ))
    })?;

    let runtime = tokio::runtime::Runtime::new()?;
    let raw = runtime.block_on(client.generate_with_backoff(&prompt))?;
    let generated = compose::parse_response(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    } else {
        println!("{}", generated.post);
        if !generated.hashtags.is_empty() {
            println!("\n{}", generated.hashtags.join(" "));
        }
    }

    Ok(())
}

pub fn handle_serve(db: &Path, listen: String, model: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weeklog=info".into()),
        )
        .init();

    let store = JsonStore::open(db)?;
    let client = GeminiClient::from_env(&model);
    if client.is_none() {
        tracing::warn!(
            "{} not set; POST /generate will answer 400 until it is configured",
            API_KEY_ENV
        );
    }

    let addr: SocketAddr = listen
        .parse()
        .map_err(|_| WeeklogError::Storage(format!("invalid listen address '{}'", listen)))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run(store, client, addr))
}
