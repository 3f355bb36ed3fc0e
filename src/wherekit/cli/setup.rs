use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wherekit", bin_name = "wherekit", version)]
#[command(about = "Palette catalog driven by composable filter clauses", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $WHEREKIT_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG is honored otherwise)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add palettes, random unless a name is given
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Number of random palettes to add
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Add a single palette with this color name
        #[arg(long)]
        name: Option<String>,

        /// Hue in degrees (with --name)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        hue: i64,

        /// Saturation 0.0-1.0 (with --name)
        #[arg(long, default_value_t = 0.5)]
        saturation: f64,

        /// Brightness 0.0-1.0 (with --name)
        #[arg(long, default_value_t = 0.5)]
        brightness: f64,
    },

    /// List palettes
    #[command(alias = "ls", display_order = 2)]
    List(ListArgs),

    /// Count palettes
    #[command(display_order = 3)]
    Count(SelectArgs),

    /// Delete the selected palettes
    #[command(alias = "rm", display_order = 4)]
    Delete(SelectArgs),

    /// Delete every palette
    #[command(display_order = 5)]
    Clear,

    /// Show the request a listing would run, without running it
    #[command(display_order = 6)]
    Explain(ListArgs),

    /// Show or set configuration
    #[command(display_order = 7)]
    Config {
        /// Key to show or set (default_sort, default_limit, default_filter)
        key: Option<String>,

        /// New value
        value: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// Filter preset: all, warm, cool, bright, muted
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Predicate format followed by its arguments, e.g. --where "hue > %d" 200
    #[arg(
        short,
        long = "where",
        num_args = 1..,
        value_name = "FORMAT",
        allow_negative_numbers = true
    )]
    pub where_args: Option<Vec<String>>,

    /// Only palettes with this exact color name
    #[arg(long)]
    pub name: Option<String>,

    /// Apply --where over the preset instead of narrowing it
    #[arg(long)]
    pub replace: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Sort by name, hue, saturation, brightness or date
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Show at most this many palettes
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Skip this many palettes
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_where_with_arguments() {
        let cli = Cli::parse_from([
            "wherekit", "list", "--where", "hue > %d", "200", "--sort", "hue",
        ]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(
            args.select.where_args,
            Some(vec!["hue > %d".to_string(), "200".to_string()])
        );
        assert_eq!(args.sort.as_deref(), Some("hue"));
    }

    #[test]
    fn where_accepts_negative_numbers() {
        let cli = Cli::parse_from(["wherekit", "count", "-w", "hue > %d", "-5"]);
        let Some(Commands::Count(args)) = cli.command else {
            panic!("expected count");
        };
        assert_eq!(args.where_args.unwrap()[1], "-5");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["wherekit", "clear", "--data-dir", "/tmp/x", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
