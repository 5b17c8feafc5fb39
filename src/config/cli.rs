use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the gearguide binary.
#[derive(Debug, Parser)]
#[command(
    name = "gearguide",
    version,
    about = "Structured buying-guide renderer"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "GEARGUIDE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP preview service.
    Serve(Box<ServeArgs>),
    /// Render a single post file to JSON or HTML.
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Override the path prefix used for product links.
    #[arg(long = "render-product-base-path", value_name = "PATH")]
    pub product_base_path: Option<String>,

    /// Override the call-to-action label used when a product reference has none.
    #[arg(long = "render-default-cta-label", value_name = "LABEL")]
    pub default_cta_label: Option<String>,

    /// Override the reading speed used for reading-time estimates.
    #[arg(long = "render-words-per-minute", value_name = "COUNT")]
    pub words_per_minute: Option<u32>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the maximum accepted request body in bytes.
    #[arg(long = "server-max-request-bytes", value_name = "BYTES")]
    pub server_max_request_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The assembled post as pretty-printed JSON.
    #[default]
    Json,
    /// The post rendered as an HTML article fragment.
    Html,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Post JSON file: a post object or an API envelope `{ "post", "products" }`.
    #[arg(value_name = "POST", value_hint = ValueHint::FilePath)]
    pub post: PathBuf,

    /// Product list JSON file: an array or `{ "products": [...] }`.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub products: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout.
    #[arg(long, short, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
