use std::path::PathBuf;

/// Swiss roof finder CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "roofmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file overriding the built-in defaults
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Look up Swiss addresses matching a text
    Search(SearchArgs),

    /// Fetch the roofs around a location and write them as GeoJSON
    Roofs(RoofsArgs),

    /// Toggle roof ids in a page URL's selection and print the new URL
    Toggle(ToggleArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Address text, e.g. "Bundesplatz 3"
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct RoofsArgs {
    /// Page URL carrying x, y, q and optionally selectedRoofs
    #[arg(conflicts_with_all = ["x", "y"], required_unless_present_all = ["x", "y"])]
    pub url: Option<String>,

    /// Projected x (EPSG:3857) of the location
    #[arg(long, requires = "y", allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Projected y (EPSG:3857) of the location
    #[arg(long, requires = "x", allow_negative_numbers = true)]
    pub y: Option<f64>,

    /// Output GeoJSON file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ToggleArgs {
    /// Page URL to rewrite
    pub url: String,

    /// Roof ids to toggle, in order
    #[arg(required = true)]
    pub ids: Vec<String>,
}
