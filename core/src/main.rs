//! dashtable CLI - Turn CSV/JSON tables into data-table widget inputs
//!
//! # Main Commands
//!
//! ```bash
//! dashtable flatten gapminder.csv --header-rows 2      # {data, columns}
//! dashtable heatmap gapminder.csv --bins 7 --scale YlOrRd
//! dashtable bars scores.csv --column score
//! dashtable diverging deltas.csv --column delta --midpoint 0
//! dashtable options gapminder.csv --label country --sort
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! dashtable parse gapminder.csv     # Table in split orient
//! dashtable sparkline series.json --column history --limits
//! dashtable scales                  # List colour scales
//! ```

use clap::{Args, Parser, Subcommand};
use dashtable::{
    data_bars, data_bars_diverging, decode_content, detect_encoding, heatmap, parse_csv_file_auto,
    parse_string_with_metadata, sparkline, to_dash_table, to_options, ColorScale, ColumnSelection,
    DashConfig, DashResult, Table, TableError,
};
use log::LevelFilter;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dashtable")]
#[command(about = "Flatten tables and generate conditional styles for dashboard data tables", long_about = None)]
struct Cli {
    /// JSON config file with default options per command
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input and output flags shared by every table command.
#[derive(Args)]
struct InputArgs {
    /// Input file (.json table or CSV)
    input: PathBuf,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Number of CSV header rows; more than one gives hierarchical labels
    #[arg(long, default_value = "1")]
    header_rows: usize,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a table and output it in split orient
    Parse {
        #[command(flatten)]
        io: InputArgs,
    },

    /// Flatten a table into row records and column descriptors
    Flatten {
        #[command(flatten)]
        io: InputArgs,

        /// Separator joining hierarchical label segments
        #[arg(short, long)]
        separator: Option<String>,

        /// Move terminal label segments to the bottom header row
        #[arg(long)]
        anchor_header: bool,
    },

    /// Heatmap style rules and legend
    Heatmap {
        #[command(flatten)]
        io: InputArgs,

        /// Column ids to style (default: all numeric columns)
        #[arg(short, long)]
        columns: Vec<String>,

        /// Number of bin boundaries
        #[arg(short, long)]
        bins: Option<usize>,

        /// Colour scale name (see `dashtable scales`)
        #[arg(long)]
        scale: Option<String>,

        /// Lower end of the scale
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,

        /// Upper end of the scale
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,
    },

    /// Data bar style rules for one column
    Bars {
        #[command(flatten)]
        io: InputArgs,

        /// Column id
        #[arg(short, long)]
        column: String,

        /// Bar colour
        #[arg(long)]
        color: Option<String>,

        /// Background colour
        #[arg(long)]
        background: Option<String>,
    },

    /// Diverging data bar style rules for one column
    Diverging {
        #[command(flatten)]
        io: InputArgs,

        /// Column id
        #[arg(short, long)]
        column: String,

        /// Value bars grow away from (default: middle of the range)
        #[arg(short, long, allow_hyphen_values = true)]
        midpoint: Option<f64>,

        /// Bar colour above the midpoint
        #[arg(long)]
        color_above: Option<String>,

        /// Bar colour below the midpoint
        #[arg(long)]
        color_below: Option<String>,
    },

    /// Dropdown options from a label column
    Options {
        #[command(flatten)]
        io: InputArgs,

        /// Column id holding labels
        #[arg(short, long)]
        label: Option<String>,

        /// Column id holding titles
        #[arg(long)]
        title: Option<String>,

        /// Column id holding disabled flags
        #[arg(long)]
        disabled: Option<String>,

        /// Sort options by label
        #[arg(long)]
        sort: bool,

        /// Sort in descending order
        #[arg(long)]
        descending: bool,

        /// Keep missing labels as ""
        #[arg(long)]
        keep_na: bool,
    },

    /// Format a list-valued column as sparkline text
    Sparkline {
        #[command(flatten)]
        io: InputArgs,

        /// Column id
        #[arg(short, long)]
        column: String,

        /// Frame each sparkline with its first and last value
        #[arg(long)]
        limits: bool,
    },

    /// List available colour scales
    Scales,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> DashResult<()> {
    let config = match &cli.config {
        Some(path) => {
            eprintln!("⚙️  Config: {}", path.display());
            DashConfig::load(path)?
        }
        None => DashConfig::default(),
    };

    match cli.command {
        Commands::Parse { io } => cmd_parse(&io),

        Commands::Flatten {
            io,
            separator,
            anchor_header,
        } => cmd_flatten(&io, config, separator, anchor_header),

        Commands::Heatmap {
            io,
            columns,
            bins,
            scale,
            min,
            max,
        } => {
            let mut options = config.heatmap;
            if !columns.is_empty() {
                options.columns = ColumnSelection::Only(columns);
            }
            options.n_bins = bins.unwrap_or(options.n_bins);
            options.color_scale = scale.unwrap_or(options.color_scale);
            options.min_value = min.or(options.min_value);
            options.max_value = max.or(options.max_value);

            let table = load_table(&io)?;
            let (rules, legend) = heatmap(&table, &options)?;
            eprintln!("🎨 {} rules over {} bins", rules.len(), legend.entries.len());

            let out = json!({ "styles": rules, "legend": legend.to_component() });
            write_output(&serde_json::to_string_pretty(&out)?, io.output.as_deref())
        }

        Commands::Bars {
            io,
            column,
            color,
            background,
        } => {
            let mut options = config.data_bars;
            options.color = color.unwrap_or(options.color);
            options.background = background.unwrap_or(options.background);

            let table = load_table(&io)?;
            let rules = data_bars(&table, &column, &options)?;
            eprintln!("📊 {} data bar rules for '{}'", rules.len(), column);
            write_output(&serde_json::to_string_pretty(&rules)?, io.output.as_deref())
        }

        Commands::Diverging {
            io,
            column,
            midpoint,
            color_above,
            color_below,
        } => {
            let mut options = config.diverging;
            options.midpoint = midpoint.or(options.midpoint);
            options.color_above = color_above.unwrap_or(options.color_above);
            options.color_below = color_below.unwrap_or(options.color_below);

            let table = load_table(&io)?;
            let rules = data_bars_diverging(&table, &column, &options)?;
            eprintln!("📊 {} diverging bar rules for '{}'", rules.len(), column);
            write_output(&serde_json::to_string_pretty(&rules)?, io.output.as_deref())
        }

        Commands::Options {
            io,
            label,
            title,
            disabled,
            sort,
            descending,
            keep_na,
        } => {
            let mut options = config.options;
            options.label = label.unwrap_or(options.label);
            options.title = title.or(options.title);
            options.disabled = disabled.or(options.disabled);
            options.sort |= sort || descending;
            options.ascending &= !descending;
            options.na_remove &= !keep_na;

            let table = load_table(&io)?;
            let dropdown = to_options(&table, &options)?;
            eprintln!("📋 {} options from '{}'", dropdown.len(), options.label);
            write_output(&serde_json::to_string_pretty(&dropdown)?, io.output.as_deref())
        }

        Commands::Sparkline { io, column, limits } => cmd_sparkline(&io, &column, limits, &config),

        Commands::Scales => {
            for scale in ColorScale::ALL {
                println!("{}", scale);
            }
            Ok(())
        }
    }
}

fn cmd_parse(io: &InputArgs) -> DashResult<()> {
    let table = load_table(io)?;
    eprintln!("✅ Parsed {} rows, {} columns", table.n_rows(), table.n_cols());

    let json = serde_json::to_string_pretty(&table.to_json())?;
    write_output(&json, io.output.as_deref())
}

fn cmd_flatten(io: &InputArgs, config: DashConfig, separator: Option<String>, anchor_header: bool) -> DashResult<()> {
    let mut options = config.flatten;
    options.separator = separator.unwrap_or(options.separator);
    options.anchor_header_terminal |= anchor_header;

    let table = load_table(io)?;
    let dash = to_dash_table(&table, &options)?;
    let ids: Vec<&str> = dash.columns.iter().map(|c| c.id.as_str()).collect();
    eprintln!("   Columns: {}", ids.join(", "));
    eprintln!("✅ Flattened {} records", dash.data.len());

    write_output(&serde_json::to_string_pretty(&dash)?, io.output.as_deref())
}

fn cmd_sparkline(io: &InputArgs, column_id: &str, limits: bool, config: &DashConfig) -> DashResult<()> {
    let table = load_table(io)?;
    let column = table
        .column_by_id(column_id, &config.flatten.separator)
        .ok_or_else(|| TableError::MissingColumn(column_id.to_string()))?;

    let formatted = sparkline(column, limits);
    let cells: Vec<Value> = formatted.cells.iter().map(|c| c.to_json()).collect();
    eprintln!("✨ Formatted {} cells", cells.len());

    write_output(&serde_json::to_string_pretty(&cells)?, io.output.as_deref())
}

/// Read a JSON table (records or split orient) or a CSV file.
fn load_table(io: &InputArgs) -> DashResult<Table> {
    let input = io.input.as_path();
    eprintln!("📄 Reading: {}", input.display());

    let is_json = input
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let value: Value = serde_json::from_str(&fs::read_to_string(input)?)?;
        return Ok(Table::from_json(&value)?);
    }

    let result = match io.delimiter {
        Some(delimiter) => {
            let bytes = fs::read(input)?;
            let encoding = detect_encoding(&bytes);
            let content = decode_content(&bytes, &encoding)?;
            parse_string_with_metadata(&content, delimiter, encoding, io.header_rows)?
        }
        None => parse_csv_file_auto(input, io.header_rows)?,
    };

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if io.delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Rows: {}", result.table.n_rows());
    Ok(result.table)
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> DashResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

// =============================================================================
// Logging
// =============================================================================

/// Send library log records to stderr; `-v` raises the level.
fn init_logger(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(5), LevelFilter::Debug);
    }

    #[test]
    fn test_verbose_flag_counts() {
        let cli = Cli::try_parse_from(["dashtable", "-vv", "scales"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Scales));
    }
}
