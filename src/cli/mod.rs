//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::{Field, ImageSlot};

/// Coach - profile and service catalog admin for personal trainers.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "coach", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "COACH_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Settings file (TOML or YAML)
    #[arg(long, global = true, env = "COACH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Storage database (overrides the settings file)
    #[arg(long, global = true, env = "COACH_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Profile ===
    /// Show the current profile record
    Show(ShowArgs),

    /// Set one profile field
    Set(SetArgs),

    /// Upload a profile or hero image
    Image(ImageArgs),

    /// List built-in hero images, or pick one
    Gallery(GalleryArgs),

    /// Manage offered services
    #[command(subcommand)]
    Services(ServicesCommand),

    // === Lifecycle ===
    /// Complete first-run onboarding
    Onboard(OnboardArgs),

    /// Discard everything and restore the defaults
    Reset(ResetArgs),

    /// Write the record to a JSON, YAML or TOML file
    Export(ExportArgs),

    /// Replace the record from a JSON, YAML or TOML file
    Import(ImportArgs),

    /// Interactive draft editing session
    Session,

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Include embedded image payloads in JSON output
    #[arg(long)]
    pub full: bool,
}

#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Field name (professionalName, slogan, phone, locationText, instagramUrl, themeColor)
    pub field: Field,

    /// New value
    pub value: String,
}

#[derive(Parser, Debug)]
pub struct ImageArgs {
    /// Which image to replace
    #[arg(value_enum)]
    pub slot: ImageSlot,

    /// Path to image file (PNG, JPEG, GIF, BMP, WebP)
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GalleryArgs {
    /// Use this gallery entry as the hero image
    #[arg(long, short = 's', value_name = "INDEX")]
    pub select: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ServicesCommand {
    /// List services
    List,

    /// Add a service
    Add(ServiceFields),

    /// Edit an existing service
    Edit(EditServiceArgs),

    /// Delete a service
    Delete(DeleteServiceArgs),
}

/// Fields the service editor can change.
#[derive(Args, Debug, Default)]
pub struct ServiceFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long)]
    pub duration: Option<String>,

    /// Card image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Mark as the highlighted plan
    #[arg(long)]
    pub popular: Option<bool>,

    /// Extra detail as key=value (repeatable, value "null" removes the key)
    #[arg(long = "detail", value_name = "KEY=VALUE")]
    pub details: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct EditServiceArgs {
    /// Service id
    pub id: String,

    #[command(flatten)]
    pub fields: ServiceFields,
}

#[derive(Parser, Debug)]
pub struct DeleteServiceArgs {
    /// Service id
    pub id: String,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct OnboardArgs {
    /// Professional name
    #[arg(long)]
    pub name: String,

    /// WhatsApp number (formatting is stripped)
    #[arg(long)]
    pub phone: String,
}

#[derive(Parser, Debug)]
pub struct ResetArgs {
    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Destination file (.json, .yaml, .yml, .toml)
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Source file (.json, .yaml, .yml, .toml)
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
