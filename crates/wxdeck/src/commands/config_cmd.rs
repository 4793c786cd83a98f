//! Config subcommand handlers.

use std::str::FromStr;

use dialoguer::{Input, Select};
use wxdeck_core::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, TokenStoreKind};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display. Tokens never live in the file, so there is
/// nothing to mask beyond leaving out what is unset.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        let _ = writeln!(out, "token_store = \"{}\"", p.token_store);
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

fn save(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn parse_flag<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply one `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            url::Url::parse(&value).map_err(|e| CliError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            })?;
            profile.api_url = value;
        }
        "email" => profile.email = Some(value),
        "insecure" => profile.insecure = Some(parse_flag("insecure", &value, "'true' or 'false'")?),
        "timeout" => {
            profile.timeout = Some(parse_flag("timeout", &value, "a number (seconds)")?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "token_store" | "token-store" => {
            profile.token_store = TokenStoreKind::from_str(&value).map_err(|_| {
                CliError::Validation {
                    field: "token_store".into(),
                    reason: "must be 'keyring', 'file', or 'memory'".into(),
                }
            })?;
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, email, insecure, \
                     timeout, ca_cert, token_store"
                ),
            });
        }
    }
    Ok(())
}

fn init_wizard() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("wxdeck configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config()?;

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("API base URL")
        .default(DEFAULT_API_URL.into())
        .validate_with(|s: &String| url::Url::parse(s).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Login email (blank to ask each time)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let stores = [
        TokenStoreKind::Keyring,
        TokenStoreKind::File,
        TokenStoreKind::Memory,
    ];
    let choices = &[
        "System keyring (recommended)",
        "File in the data directory",
        "Don't keep the token (log in every run)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the session token be kept?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        api_url,
        email: (!email.trim().is_empty()).then(|| email.trim().to_owned()),
        token_store: stores.get(selection).copied().unwrap_or_default(),
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }
    save(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Next: wxdeck -p {profile_name} login");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init_wizard(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.format(), &cfg, format_config, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;
            save(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: wxdeck config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            save(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_key_updates_profile_fields() {
        let mut p = Profile::default();
        set_key(&mut p, "api_url", "https://wx.example.com/api/v1".into()).unwrap();
        set_key(&mut p, "email", "ops@example.com".into()).unwrap();
        set_key(&mut p, "timeout", "30".into()).unwrap();
        set_key(&mut p, "token-store", "FILE".into()).unwrap();

        assert_eq!(p.api_url, "https://wx.example.com/api/v1");
        assert_eq!(p.email.as_deref(), Some("ops@example.com"));
        assert_eq!(p.timeout, Some(30));
        assert_eq!(p.token_store, TokenStoreKind::File);
    }

    #[test]
    fn set_key_rejects_bad_values() {
        let mut p = Profile::default();
        assert!(set_key(&mut p, "timeout", "soon".into()).is_err());
        assert!(set_key(&mut p, "api_url", "not a url".into()).is_err());
        assert!(set_key(&mut p, "token_store", "vault".into()).is_err());
        assert!(matches!(
            set_key(&mut p, "site", "x".into()),
            Err(CliError::Validation { field, .. }) if field == "site"
        ));
        assert_eq!(p, Profile::default());
    }

    #[test]
    fn shown_config_lists_profiles() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                email: Some("me@example.com".into()),
                ..Profile::default()
            },
        );
        let text = format_config(&cfg);
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("email = \"me@example.com\""));
        assert!(text.contains("token_store = \"keyring\""));
    }
}
