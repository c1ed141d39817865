//! Clap derive structures for the `domotic` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use domotic_api::{ControlType, DeviceId, GatewayId, HomeId, Label, RoomId, SortOrder};
use domotic_core::ControlCommand;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// domotic -- control panel for homes, rooms, devices and ESP32 controllers
#[derive(Debug, Parser)]
#[command(
    name = "domotic",
    version,
    about = "Manage a home-automation platform from the command line",
    long_about = "Control panel for the domotic home-automation API.\n\n\
        Organise homes, rooms and devices, provision ESP32 controllers,\n\
        send commands to devices and keep a board of pinned widgets.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "DOMOTIC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "DOMOTIC_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DOMOTIC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DOMOTIC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "DOMOTIC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Forget the session token and cached selections
    Logout,

    /// Show the current session
    Status,

    /// Manage homes
    #[command(alias = "h")]
    Homes(HomesArgs),

    /// Manage the rooms of a home
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Manage and control the devices of a room
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage ESP32 controllers
    #[command(alias = "gateways", alias = "gw")]
    Esp32(Esp32Args),

    /// Manage the widget board
    #[command(alias = "w")]
    Widgets(WidgetsArgs),

    /// Show the view addressed by a path (e.g. /homes/4/rooms/10/devices)
    Open {
        /// View path
        path: String,
    },

    /// List device labels and control types
    Labels,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// Commands that may run without a session token.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Login(_)
                | Self::Register(_)
                | Self::Logout
                | Self::Status
                | Self::Labels
                | Self::Config(_)
                | Self::Completions(_)
        )
    }
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "DOMOTIC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Keep the session across restarts
    #[arg(long)]
    pub remember: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username (prompted when omitted)
    #[arg(long)]
    pub username: Option<String>,

    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted twice when omitted)
    #[arg(long, env = "DOMOTIC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show entries whose name contains this text (case-insensitive)
    #[arg(long, short = 'f')]
    pub filter: Option<String>,
}

// ── Homes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HomesArgs {
    #[command(subcommand)]
    pub command: HomesCommand,
}

#[derive(Debug, Subcommand)]
pub enum HomesCommand {
    /// List homes
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Also count the rooms of each home
        #[arg(long)]
        rooms: bool,
    },

    /// Show one home
    Get { id: HomeId },

    /// Create a home
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },

    /// Edit a home; omitted fields keep their current value
    Update {
        id: HomeId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Delete a home
    #[command(alias = "rm")]
    Delete { id: HomeId },

    /// Make a home the default for room commands
    Select { id: HomeId },
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List the rooms of a home
    #[command(alias = "ls")]
    List {
        /// Home id (defaults to the selected home)
        #[arg(long)]
        home: Option<HomeId>,

        #[command(flatten)]
        list: ListArgs,

        /// Server-side sort field
        #[arg(long)]
        sort_by: Option<String>,

        /// Server-side sort direction
        #[arg(long, requires = "sort_by")]
        order: Option<SortOrder>,
    },

    /// Show one room
    Get { id: RoomId },

    /// Create a room
    Create {
        /// Home id (defaults to the selected home)
        #[arg(long)]
        home: Option<HomeId>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Edit a room; omitted fields keep their current value
    Update {
        id: RoomId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a room
    #[command(alias = "rm")]
    Delete { id: RoomId },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List the devices of a room
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        room: RoomId,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one device
    Get { id: DeviceId },

    /// Create a device
    Create {
        #[arg(long)]
        room: RoomId,
        #[arg(long)]
        name: String,
        /// Category label (see `domotic labels`)
        #[arg(long, default_value = "LIGHT")]
        label: Label,
        /// Control type (see `domotic labels`)
        #[arg(long, default_value = "SWITCH")]
        control_type: ControlType,
        /// ESP32 controller that drives the device
        #[arg(long)]
        esp32: Option<GatewayId>,
    },

    /// Edit a device; omitted fields keep their current value
    Update {
        id: DeviceId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        label: Option<Label>,
        #[arg(long)]
        control_type: Option<ControlType>,
        #[arg(long)]
        esp32: Option<GatewayId>,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete { id: DeviceId },

    /// Re-fetch one device, or every device of a room
    Refresh {
        /// Device id
        #[arg(required_unless_present = "room", conflicts_with = "room")]
        id: Option<DeviceId>,

        /// Room id, to refetch the whole room
        #[arg(long)]
        room: Option<RoomId>,
    },

    /// Send a control action to a device
    Control {
        id: DeviceId,
        action: ControlAction,
    },

    /// Set a slider or numeric device to a value
    Set { id: DeviceId, value: i64 },

    /// Write a raw value to a device
    Write { id: DeviceId, value: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ControlAction {
    Toggle,
    On,
    Off,
    #[value(alias = "inc")]
    Increment,
    #[value(alias = "dec")]
    Decrement,
}

impl From<ControlAction> for ControlCommand {
    fn from(action: ControlAction) -> Self {
        match action {
            ControlAction::Toggle => Self::Toggle,
            ControlAction::On => Self::On,
            ControlAction::Off => Self::Off,
            ControlAction::Increment => Self::Increment,
            ControlAction::Decrement => Self::Decrement,
        }
    }
}

// ── ESP32 controllers ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct Esp32Args {
    #[command(subcommand)]
    pub command: Esp32Command,
}

#[derive(Debug, Subcommand)]
pub enum Esp32Command {
    /// List ESP32 controllers
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one controller, including its token
    Get { id: GatewayId },

    /// Register a controller
    Create {
        #[arg(long)]
        title: String,
    },

    /// Rename a controller
    Rename { id: GatewayId, title: String },

    /// Ask the server to issue a fresh token
    RotateToken { id: GatewayId },

    /// Delete a controller
    #[command(alias = "rm")]
    Delete { id: GatewayId },
}

// ── Widgets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WidgetsArgs {
    #[command(subcommand)]
    pub command: WidgetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum WidgetsCommand {
    /// List pinned widgets
    #[command(alias = "ls")]
    List,

    /// Pin a device; without --device an interactive picker runs
    Add {
        #[arg(long)]
        device: Option<DeviceId>,
    },

    /// Unpin a device
    #[command(alias = "rm")]
    Remove { device: DeviceId },

    /// Re-fetch the snapshot of one widget, or of all of them
    Refresh { device: Option<DeviceId> },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
