//! API key command handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use tabled::Tabled;
use wxdeck_core::Console;
use wxdeck_core::models::{ApiKey, ApiKeyCreate, ApiKeyWithSecret, Page};

use crate::cli::{ApiKeysArgs, ApiKeysCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ApiKeyRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Device")]
    device_id: i64,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Last Used")]
    last_used: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Arc<ApiKey>> for ApiKeyRow {
    fn from(k: &Arc<ApiKey>) -> Self {
        Self {
            id: k.id,
            name: k.name.clone(),
            device_id: k.device_id,
            active: if k.is_active { "yes" } else { "revoked" }.into(),
            last_used: output::opt(k.last_used.map(output::timestamp)),
            created: output::timestamp(k.created_at),
        }
    }
}

fn detail(k: &ApiKey) -> String {
    [
        format!("ID:        {}", k.id),
        format!("Name:      {}", k.name),
        format!("Device:    {}", k.device_id),
        format!("Active:    {}", k.is_active),
        format!("Last used: {}", output::opt(k.last_used.map(output::timestamp))),
        format!("Created:   {}", output::timestamp(k.created_at)),
    ]
    .join("\n")
}

/// The one view that carries the secret.
#[derive(Serialize)]
struct IssuedKey<'a> {
    #[serde(flatten)]
    key: &'a ApiKey,
    secret: &'a str,
}

// ── Shared printers ─────────────────────────────────────────────────

pub(super) fn print_keys(keys: &[Arc<ApiKey>], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        global.format(),
        keys,
        |k| ApiKeyRow::from(k),
        |k| k.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub(super) fn print_issued(issued: &ApiKeyWithSecret, global: &GlobalOpts) -> Result<(), CliError> {
    let view = IssuedKey {
        key: &issued.key,
        secret: issued.secret.expose_secret(),
    };
    let out = output::render_single(
        global.format(),
        &view,
        |v| format!("{}\nSecret:    {}", detail(v.key), v.secret),
        |v| v.secret.to_owned(),
    )?;
    // Printed even with --quiet.
    output::print_output(&out, false);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ApiKeysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    console.navigate("/api-keys")?;
    let store = console.api_keys();

    match args.command {
        ApiKeysCommand::List { list, device } => {
            match device {
                Some(id) => store.fetch_device_api_keys(id).await?,
                None => store.fetch_api_keys(Page::new(list.skip, list.limit)).await?,
            };
            print_keys(&store.api_keys(), global)
        }

        ApiKeysCommand::Create { device, name } => {
            let issued = store
                .create_api_key(&ApiKeyCreate {
                    name,
                    device_id: device,
                })
                .await?;
            console.notifications().warning(
                format!("API key {} created", issued.key.id),
                Some("Copy the key now, it will not be shown again".into()),
            );
            print_issued(&issued, global)
        }

        ApiKeysCommand::Revoke { id } => {
            if !util::confirm(&format!("Revoke API key {id}?"), global.yes)? {
                return Ok(());
            }
            let key = store.revoke_api_key(id).await?;
            console
                .notifications()
                .success(format!("API key {id} revoked"), None);
            let out = output::render_single(global.format(), &key, detail, |k| k.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApiKeysCommand::Delete { id } => {
            if !util::confirm(&format!("Delete API key {id}?"), global.yes)? {
                return Ok(());
            }
            store.delete_api_key(id).await?;
            console
                .notifications()
                .success(format!("API key {id} deleted"), None);
            Ok(())
        }
    }
}
