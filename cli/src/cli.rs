use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use outposts_business::OutpostType;

#[derive(Parser)]
#[command(name = "outposts")]
#[command(about = "Manage authentik outposts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server root, e.g. https://auth.example.com
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token sent as a bearer token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List outposts
    List {
        /// Page number, starting at 1
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Only show outposts matching this term
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Ordering key, `name` or `-name`
        #[arg(long, short = 'o', default_value = "name", allow_hyphen_values = true)]
        ordering: String,

        /// Keep polling health and redraw until Ctrl-C
        #[arg(long)]
        watch_health: bool,
    },
    /// Create an outpost
    Create {
        #[command(flatten)]
        fields: OutpostFields,
    },
    /// Update an outpost; omitted fields keep their current value
    Update {
        /// Outpost ID (UUID)
        pk: String,

        #[command(flatten)]
        fields: OutpostFields,
    },
    /// Delete an outpost
    Delete {
        /// Outpost ID (UUID)
        pk: String,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show health and version of an outpost
    Health {
        /// Outpost ID (UUID)
        pk: String,
    },
    /// Show the environment needed to deploy an outpost
    Info {
        /// Outpost ID (UUID)
        pk: String,
    },
    /// Save the server and token to the config file
    Configure,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Editable fields shared by `create` and `update`.
#[derive(Debug, Default, Args)]
pub struct OutpostFields {
    /// Outpost name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Outpost type: proxy or ldap
    #[arg(long = "type", short = 't')]
    pub outpost_type: Option<OutpostType>,

    /// Provider IDs served by the outpost (repeatable)
    #[arg(long = "provider")]
    pub providers: Vec<u32>,

    /// Service connection ID used to deploy the outpost
    #[arg(long)]
    pub service_connection: Option<String>,

    /// Outpost configuration as a JSON object
    #[arg(long)]
    pub config: Option<String>,
}
