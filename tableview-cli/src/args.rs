use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tableview_lib::export::ExportFormat;
use tableview_lib::view::Direction;

#[derive(Parser, Debug)]
#[command(
    name = "tableview",
    version,
    about = "Filter, sort, page and export JSON tables",
    long_about = "Loads a JSON array of objects, applies filters, sorting and paging, and prints the resulting page or exports every matching row.\n\nExamples:\n  tableview show --data people.json --search doe\n  tableview show --data people.json --filter status=Active --sort id:desc --page-size 20\n  tableview export --data people.json --format xlsx --out ./exports"
)]
pub struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Settings file (defaults to settings.json in the config directory)."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current page as a text table.
    Show(ViewArgs),

    /// Write every matching row to a CSV or XLSX file.
    Export {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(long = "format", value_enum, default_value_t = FormatArg::Csv, help = "Export format.")]
        format: FormatArg,

        #[arg(
            short = 'o',
            long = "out",
            value_name = "DIR",
            default_value = ".",
            help = "Directory the file is written to."
        )]
        out: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[arg(
        short = 'd',
        long = "data",
        value_name = "FILE",
        help_heading = "Input",
        help = "JSON file holding an array of row objects."
    )]
    pub data: PathBuf,

    #[arg(
        long = "columns",
        value_name = "FILE",
        help_heading = "Input",
        help = "JSON file holding column definitions (default: one column per field of the first row)."
    )]
    pub columns: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "filter",
        value_name = "KEY=TEXT",
        value_parser = parse_filter,
        action = ArgAction::Append,
        help_heading = "View",
        help = "Column filter (repeatable)."
    )]
    pub filter: Vec<(String, String)>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help_heading = "View",
        help = "Search across all filterable columns."
    )]
    pub search: Option<String>,

    #[arg(
        long = "sort",
        value_name = "KEY[:asc|desc]",
        value_parser = parse_sort,
        help_heading = "View",
        help = "Sort column and direction."
    )]
    pub sort: Option<(String, Direction)>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        default_value_t = 1,
        help_heading = "View",
        help = "Page to show, starting at 1."
    )]
    pub page: usize,

    #[arg(long = "page-size", value_name = "N", help_heading = "View", help = "Rows per page.")]
    pub page_size: Option<usize>,

    #[arg(
        long = "hide",
        value_name = "KEY",
        action = ArgAction::Append,
        help_heading = "View",
        help = "Hide a column (repeatable)."
    )]
    pub hide: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, text)) if !key.is_empty() => Ok((key.to_string(), text.to_string())),
        _ => Err(format!("expected KEY=TEXT, got '{}'", raw)),
    }
}

fn parse_sort(raw: &str) -> Result<(String, Direction), String> {
    let (key, direction) = match raw.rsplit_once(':') {
        Some((key, "asc")) => (key, Direction::Asc),
        Some((key, "desc")) => (key, Direction::Desc),
        Some((_, other)) => return Err(format!("unknown sort direction '{}'", other)),
        None => (raw, Direction::Asc),
    };
    if key.is_empty() {
        return Err("sort column must not be empty".to_string());
    }
    Ok((key.to_string(), direction))
}
