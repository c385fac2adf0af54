use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use opsdesk_core::tracker::TrackerItem;
use opsdesk_core::types::{TrackerKind, TrackerPriority, TrackerStatus};
use std::path::Path;

#[derive(Subcommand)]
pub enum TrackerSubcommand {
    /// File a bug or idea
    Add {
        /// bug | idea
        kind: String,
        #[arg(required = true)]
        title: Vec<String>,
        /// low | medium | high | critical
        #[arg(long)]
        priority: Option<String>,
    },
    /// List tracker items
    List,
    /// Change an item's status
    Status {
        id: String,
        /// open | in_progress | resolved | closed
        status: String,
    },
    /// Comment on an item
    Comment {
        id: String,
        #[arg(required = true)]
        body: Vec<String>,
        #[arg(long)]
        author: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: TrackerSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TrackerSubcommand::Add {
            kind,
            title,
            priority,
        } => add(root, &kind, &title.join(" "), priority.as_deref(), json),
        TrackerSubcommand::List => list(root, json),
        TrackerSubcommand::Status { id, status } => set_status(root, &id, &status, json),
        TrackerSubcommand::Comment { id, body, author } => {
            comment(root, &id, &body.join(" "), author, json)
        }
    }
}

fn add(
    root: &Path,
    kind: &str,
    title: &str,
    priority: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let kind: TrackerKind = kind.parse()?;
    let mut item = TrackerItem::new(title, kind);
    if let Some(p) = priority {
        let p: TrackerPriority = p.parse()?;
        item.priority = p;
    }
    item.save(root).context("failed to save tracker item")?;

    if json {
        print_json(&item)?;
    } else {
        println!("Filed {} [{}]: {}", item.kind, item.id, item.title);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let items = TrackerItem::list(root)?;
    if json {
        print_json(&items)?;
        return Ok(());
    }

    let rows = items
        .iter()
        .map(|i| {
            vec![
                i.id.clone(),
                i.kind.to_string(),
                i.status.to_string(),
                i.priority.to_string(),
                i.title.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "KIND", "STATUS", "PRIORITY", "TITLE"], rows);
    Ok(())
}

fn set_status(root: &Path, id: &str, status: &str, json: bool) -> anyhow::Result<()> {
    let mut item = TrackerItem::load(root, id).with_context(|| format!("item '{id}' not found"))?;
    let status: TrackerStatus = status.parse()?;
    item.set_status(status);
    item.save(root)?;

    if json {
        print_json(&item)?;
    } else {
        println!("{} is now {}", item.id, item.status);
    }
    Ok(())
}

fn comment(
    root: &Path,
    id: &str,
    body: &str,
    author: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut item = TrackerItem::load(root, id).with_context(|| format!("item '{id}' not found"))?;
    let comment_id = item.add_comment(body, author);
    item.save(root)?;

    if json {
        print_json(&serde_json::json!({ "item_id": item.id, "comment_id": comment_id }))?;
    } else {
        println!("Added comment [{comment_id}] to {}", item.id);
    }
    Ok(())
}
