use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use opsdesk_core::key::SoftwareKey;
use std::path::Path;

#[derive(Subcommand)]
pub enum KeySubcommand {
    /// Issue a new software key
    Issue {
        /// Tool entitlements; "all" grants everything
        #[arg(long, required = true, value_delimiter = ',')]
        tools: Vec<String>,
        /// Activation cap
        #[arg(long, default_value_t = 1)]
        max_activations: u32,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<NaiveDate>,
        /// Who the key is for
        #[arg(long)]
        issued_to: Option<String>,
    },
    /// List keys
    List,
    /// Activate a key by its code
    Activate { code: String },
    /// Revoke a key by its code
    Revoke { code: String },
}

pub fn run(root: &Path, subcmd: KeySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        KeySubcommand::Issue {
            tools,
            max_activations,
            expires,
            issued_to,
        } => issue(root, tools, max_activations, expires, issued_to, json),
        KeySubcommand::List => list(root, json),
        KeySubcommand::Activate { code } => activate(root, &code, json),
        KeySubcommand::Revoke { code } => revoke(root, &code, json),
    }
}

fn issue(
    root: &Path,
    tools: Vec<String>,
    max_activations: u32,
    expires: Option<NaiveDate>,
    issued_to: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut key = SoftwareKey::issue(tools, max_activations, expires);
    key.issued_to = issued_to;
    key.save(root).context("failed to save key")?;

    if json {
        print_json(&key)?;
    } else {
        println!("Issued {} ({})", key.code, key.tools.join(", "));
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let keys = SoftwareKey::list(root)?;
    if json {
        print_json(&keys)?;
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let rows = keys
        .iter()
        .map(|k| {
            vec![
                k.code.clone(),
                k.effective_status(today).to_string(),
                k.tools.join(","),
                format!("{}/{}", k.activations, k.max_activations),
                k.expires_on
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["CODE", "STATUS", "TOOLS", "ACTIVATIONS", "EXPIRES"], rows);
    Ok(())
}

fn activate(root: &Path, code: &str, json: bool) -> anyhow::Result<()> {
    let mut key = SoftwareKey::find_by_code(root, code)?;
    key.activate(Utc::now().date_naive())?;
    key.save(root)?;

    if json {
        print_json(&key)?;
    } else {
        println!(
            "Activated {} ({}/{})",
            key.code, key.activations, key.max_activations
        );
    }
    Ok(())
}

fn revoke(root: &Path, code: &str, json: bool) -> anyhow::Result<()> {
    let mut key = SoftwareKey::find_by_code(root, code)?;
    key.revoke();
    key.save(root)?;

    if json {
        print_json(&key)?;
    } else {
        println!("Revoked {}", key.code);
    }
    Ok(())
}
