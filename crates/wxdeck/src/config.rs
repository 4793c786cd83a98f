//! CLI configuration: thin wrapper around `wxdeck_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --timeout, etc.).

use clap::ValueEnum;

use wxdeck_core::{Console, ConsoleConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wxdeck_config::{
    Config, Profile, TokenStoreKind, config_path, load_config, load_config_or_default, save_config,
};

/// The profile a command runs against, after flag overrides.
#[derive(Debug, Clone)]
pub struct ActiveProfile {
    pub name: String,
    pub profile: Profile,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Fill `--output` / `--color` from `[defaults]` when not given.
pub fn apply_defaults(global: &mut GlobalOpts, config: &Config) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&config.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&config.defaults.color, true).ok();
    }
}

/// Look up the active profile and lay CLI flag overrides on top.
pub fn resolve_profile(global: &GlobalOpts, config: &Config) -> Result<ActiveProfile, CliError> {
    let name = active_profile_name(global, config);
    let mut profile = config.profile(&name).map_err(|_| CliError::ProfileNotFound {
        available: available_profiles(config),
        name: name.clone(),
    })?;

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(ActiveProfile { name, profile })
}

/// Build the `Console` for a resolved profile, with its token store.
pub fn build_console(active: &ActiveProfile, config: &Config) -> Result<Console, CliError> {
    let console_config: ConsoleConfig =
        wxdeck_config::profile_to_console_config(&active.profile, &config.defaults)?;
    let tokens = wxdeck_config::open_token_store(&active.name, active.profile.token_store)?;

    tracing::debug!(
        profile = %active.name,
        api_url = %console_config.api_url,
        token_store = %active.profile.token_store,
        "building console"
    );
    Ok(Console::new(console_config, tokens)?)
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["wxdeck"];
        argv.extend_from_slice(args);
        argv.push("health");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_url: "https://wx.lab.example/api/v1".into(),
                timeout: Some(20),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile_values() {
        let cfg = config_with_lab();
        let opts = global(&[
            "--profile",
            "lab",
            "--api-url",
            "http://127.0.0.1:9000/api/v1",
            "--timeout",
            "3",
            "--insecure",
        ]);

        let active = resolve_profile(&opts, &cfg).unwrap();
        assert_eq!(active.name, "lab");
        assert_eq!(active.profile.api_url, "http://127.0.0.1:9000/api/v1");
        assert_eq!(active.profile.timeout, Some(3));
        assert_eq!(active.profile.insecure, Some(true));
    }

    #[test]
    fn unknown_profile_lists_the_known_ones() {
        let cfg = config_with_lab();
        let err = resolve_profile(&global(&["--profile", "prod"]), &cfg).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn defaults_fill_missing_output_and_color() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json".into();
        cfg.defaults.color = "never".into();

        let mut opts = global(&[]);
        apply_defaults(&mut opts, &cfg);
        assert_eq!(opts.output, Some(OutputFormat::Json));
        assert_eq!(opts.color, Some(ColorMode::Never));

        let mut explicit = global(&["-o", "yaml"]);
        apply_defaults(&mut explicit, &cfg);
        assert_eq!(explicit.output, Some(OutputFormat::Yaml));
    }
}
