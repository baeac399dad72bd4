use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use mathcells::config::ParserConfig;
use mathcells::model::{GroupCell, Worksheet};

#[derive(Parser, Debug)]
#[command(author, version, about = "Parse wxMaxima .wxmx or content.xml files into a cell tree", long_about = None)]
struct Cli {
    /// Worksheet (.wxmx) or content.xml file
    #[arg(value_name = "WORKSHEET")]
    worksheet: String,

    /// Print the full cell tree as JSON
    #[arg(long)]
    json: bool,

    /// JSON file with displayedDigits / showLength settings
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = Utf8PathBuf::from(&cli.worksheet);
    let config = match &cli.config {
        Some(cfg) => ParserConfig::load(cfg)?,
        None => ParserConfig::default(),
    };
    let worksheet = Worksheet::open_with_config(&path, config)
        .with_context(|| format!("Failed to parse {}", path))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&worksheet)?;
        println!("{}", json);
    } else {
        for group in worksheet.cells.groups() {
            print_group(group, 0);
        }
    }
    Ok(())
}

fn print_group(group: &GroupCell, depth: usize) {
    let indent = "  ".repeat(depth);
    let hidden = if group.hidden { " (hidden)" } else { "" };
    println!("{}[{:?}]{} {}", indent, group.group_type, hidden, group.editable_content);
    if !group.output.is_empty() {
        println!("{}  => {}", indent, group.output.to_plain_text());
    }
    if let Some(folded) = &group.folded {
        for inner in folded.groups() {
            print_group(inner, depth + 1);
        }
    }
}
