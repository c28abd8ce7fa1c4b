//! Command-line surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fleet_client::Resource;
use fleet_export::ExportFormat;
use fleet_shared::Role;

#[derive(Parser, Debug)]
#[command(
    name = "fleet-admin",
    version,
    about = "Fleet admin console toolkit: navigation access, exports and API access"
)]
pub struct Cli {
    /// Extra configuration file layered over config/default and config/{APP_ENV}
    #[arg(long, global = true, env = "FLEET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and edit navigation permissions
    #[command(subcommand)]
    Access(AccessCommand),

    /// Export a JSON array of objects to CSV, XLSX or PDF
    Export {
        /// JSON file holding the rows (an array, or an envelope with `data`)
        #[arg(long, short = 'i')]
        input: PathBuf,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Fetch a resource list from the backend and export it
    Fetch {
        /// Resource name, e.g. `drivers` or `reports/vehicle-makes`
        #[arg(long, short = 'r')]
        resource: Resource,

        /// The endpoint wraps rows in `{ success, message, data }`
        #[arg(long)]
        enveloped: bool,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Store or clear the signed-in session
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Subcommand, Debug)]
pub enum AccessCommand {
    /// Whether ROLE may open PATH
    Check {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        path: String,
    },
    /// Navigation tree as seen by ROLE
    Menu {
        #[arg(long)]
        role: Role,
    },
    /// Every permission key of the menu
    Keys,
    /// Stored override map as JSON
    Show,
    /// Allow KEY for ROLE
    Grant {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        key: String,
    },
    /// Deny KEY for ROLE
    Revoke {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        key: String,
    },
    /// Copy the static menu decisions of ROLE into the override map
    Seed {
        #[arg(long)]
        role: Role,
    },
    /// Drop overrides for ROLE (or every role) so static roles apply again
    Reset {
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        role: Option<Role>,
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    Login {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLEET_TOKEN", hide_env_values = true)]
        token: String,
    },
    Logout,
    /// Print the stored user
    Whoami,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Column as `Header=field` (optionally `Header=field:width` for PDF); repeatable
    #[arg(long = "column", short = 'c', required = true)]
    pub columns: Vec<String>,

    #[arg(long, short = 'f', default_value = "csv")]
    pub format: ExportFormat,

    /// Output directory (defaults to export.output_dir)
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Output file name; the extension follows the format
    #[arg(long)]
    pub file_name: Option<String>,

    /// Skip the CSV header line
    #[arg(long)]
    pub no_headers: bool,

    /// PDF title
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub subtitle: Option<String>,

    #[arg(long)]
    pub footer: Option<String>,

    /// PDF summary line as `Label=Value`; repeatable
    #[arg(long = "summary")]
    pub summary: Vec<String>,

    #[arg(long)]
    pub landscape: bool,

    /// Produce a PDF that opens the print dialog
    #[arg(long)]
    pub print: bool,

    /// Rows per PDF page (defaults to export.rows_per_page)
    #[arg(long)]
    pub rows_per_page: Option<usize>,
}
