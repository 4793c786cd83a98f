//! Clap derive structures for the `wxdeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wxdeck -- administration console for a weather-station fleet
#[derive(Debug, Parser)]
#[command(
    name = "wxdeck",
    version,
    about = "Administer a weather-station fleet from the command line",
    long_about = "Log in to a fleet backend, manage devices, API keys, users and\n\
        settings, and inspect weather readings.\n\n\
        Sessions are kept per profile; admin-only commands are refused\n\
        locally when the logged-in role does not allow them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "WXDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL including /api/v1 (overrides profile)
    #[arg(long, short = 'u', env = "WXDECK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "WXDECK_OUTPUT", global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "WXDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WXDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session for this profile
    Login(LoginArgs),

    /// End the session for this profile
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Ask the backend instead of reading the stored token
        #[arg(long)]
        remote: bool,
    },

    /// Manage weather stations
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage device API keys (admin)
    #[command(alias = "keys")]
    ApiKeys(ApiKeysArgs),

    /// Manage console users (admin)
    Users(UsersArgs),

    /// View and change backend settings (admin)
    Settings(SettingsArgs),

    /// Query weather readings
    #[command(alias = "wx", alias = "r")]
    Readings(ReadingsArgs),

    /// Check backend health
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results per page
    #[arg(long, short = 'l', default_value = "100")]
    pub limit: u32,

    /// Number of results to skip
    #[arg(long, default_value = "0")]
    pub skip: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email, else prompted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "WXDECK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get device details
    Get {
        /// Device ID
        id: i64,
    },

    /// Register a new device
    Create {
        /// Board type
        #[arg(long = "type", value_enum)]
        device_type: DeviceTypeArg,

        /// Where the station is installed
        #[arg(long)]
        location: String,

        /// What the device does
        #[arg(long, value_enum)]
        function: Option<DeviceFunctionArg>,

        /// Initial status
        #[arg(long, value_enum)]
        status: Option<DeviceStatusArg>,
    },

    /// Change a device
    Update {
        /// Device ID
        id: i64,

        /// Board type
        #[arg(long = "type", value_enum)]
        device_type: Option<DeviceTypeArg>,

        /// Where the station is installed
        #[arg(long)]
        location: Option<String>,

        /// What the device does
        #[arg(long, value_enum)]
        function: Option<DeviceFunctionArg>,

        /// Status
        #[arg(long, value_enum)]
        status: Option<DeviceStatusArg>,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: i64,
    },

    /// List the API keys of a device
    Keys {
        /// Device ID
        id: i64,
    },

    /// Issue a new API key for a device
    AddKey {
        /// Device ID
        id: i64,

        /// Label for the key
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceTypeArg {
    #[value(name = "ESP32", alias = "esp32")]
    Esp32,
    #[value(name = "ESP8266", alias = "esp8266")]
    Esp8266,
    #[value(name = "ESP32-S3", alias = "esp32-s3")]
    Esp32S3,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceFunctionArg {
    /// Collects readings
    Sensor,
    /// Shows readings
    Display,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceStatusArg {
    Online,
    Offline,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  API KEYS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApiKeysArgs {
    #[command(subcommand)]
    pub command: ApiKeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApiKeysCommand {
    /// List API keys
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only keys of this device
        #[arg(long)]
        device: Option<i64>,
    },

    /// Issue a new key (the secret is shown once)
    Create {
        /// Device the key belongs to
        #[arg(long)]
        device: i64,

        /// Label for the key
        #[arg(long)]
        name: String,
    },

    /// Deactivate a key without deleting it
    Revoke {
        /// Key ID
        id: i64,
    },

    /// Delete a key
    #[command(alias = "rm")]
    Delete {
        /// Key ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get user details
    Get {
        /// User ID
        id: i64,
    },

    /// Create a user (password prompted unless given)
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Initial password
        #[arg(long, env = "WXDECK_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Change a user
    Update {
        /// User ID
        id: i64,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Enable or disable the account
        #[arg(long, action = clap::ArgAction::Set)]
        active: Option<bool>,

        /// Prompt for a new password
        #[arg(long)]
        reset_password: bool,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// List all settings
    #[command(alias = "ls")]
    List,

    /// Show one setting
    Get {
        /// Setting key
        key: String,
    },

    /// Change a setting's value
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  READINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReadingsArgs {
    #[command(subcommand)]
    pub command: ReadingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReadingsCommand {
    /// List readings across the fleet
    #[command(alias = "ls")]
    List(RangeArgs),

    /// Latest reading of every sensor
    Latest {
        /// Only this sensor
        #[arg(long)]
        device: Option<i64>,
    },

    /// Reading history of one sensor
    History {
        /// Device ID
        id: i64,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Statistics of one sensor over recent hours
    Summary {
        /// Device ID
        id: i64,

        /// Window size in hours (1-168)
        #[arg(long, default_value = "24")]
        hours: u32,
    },
}

/// Time window and bucketing for reading queries.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Max readings
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Number of readings to skip
    #[arg(long, default_value = "0")]
    pub skip: u32,

    /// Range start (RFC 3339)
    #[arg(long, conflicts_with = "last")]
    pub start: Option<String>,

    /// Range end (RFC 3339, defaults to now when --start is given)
    #[arg(long, conflicts_with = "last")]
    pub end: Option<String>,

    /// Shorthand for a range ending now, e.g. 90m, 6h, 7d
    #[arg(long)]
    pub last: Option<String>,

    /// Bucket width for aggregated readings
    #[arg(long, value_enum, conflicts_with = "raw")]
    pub granularity: Option<GranularityArg>,

    /// Let the backend pick a bucket width for the range
    #[arg(long, conflicts_with = "raw")]
    pub auto: bool,

    /// Never aggregate (history aggregates by default)
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Minute,
    FiveMin,
    FifteenMin,
    Hour,
    SixHour,
    Day,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// One of: api_url, email, insecure, timeout, ca_cert, token_store
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
