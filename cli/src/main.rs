use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::{ArgAction, Parser};
use lazy_json::num::number::format_number;
use lazy_json::{Document, Node, NodeKind, ParseOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ljson", version, about = "Validate and inspect JSON documents")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Print only the node at this path, e.g. /items[0]/name.
    #[arg(long, value_name = "path")]
    path: Option<String>,

    /// Print the selected node as pretty JSON instead of an outline.
    #[arg(long)]
    json: bool,

    /// Report how many values were validated and materialized.
    #[arg(long)]
    stats: bool,

    /// Maximum container nesting depth (default: 512).
    #[arg(long = "max-depth", value_name = "number")]
    max_depth: Option<usize>,

    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

impl InputSource {
    fn label(&self) -> &str {
        match self {
            InputSource::Stdin => "stdin",
            InputSource::File(path) => path,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(err) = run(&args) {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let (input, source) = read_input(args.input.as_deref())?;
    let mut options = ParseOptions::new();
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }

    let doc = Document::parse_with_options(&input, &options)?;
    tracing::debug!(source = source.label(), values = doc.value_count(), "document validated");

    let node = match args.path.as_deref() {
        Some(path) => doc
            .traverse(path)
            .ok_or_else(|| format!("not found: {path}"))?,
        None => doc.root(),
    };

    let rendered = render(node, args.json)?;
    match args.output.as_deref() {
        Some(path) if path != "-" => {
            fs::write(path, rendered.as_bytes())?;
            println!("✔ Inspected {} → {path}", source.label());
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
        }
    }

    if args.stats {
        println!("Values: {}", doc.value_count());
        println!("Materialized: {}", doc.materialized_count());
    }
    Ok(())
}

fn render(node: Node<'_>, json: bool) -> Result<String, Box<dyn Error>> {
    if json {
        let mut out = serde_json::to_string_pretty(&node)?;
        out.push('\n');
        return Ok(out);
    }
    let scalar = match node.kind() {
        NodeKind::Object | NodeKind::Array => return Ok(lazy_json::to_outline(node)?),
        NodeKind::String => node.try_as_str()?.unwrap_or_default().to_string(),
        NodeKind::Number => match node.try_as_number()? {
            Some(value) => format_number(value.double),
            None => return Err("number node without a value".into()),
        },
        NodeKind::True => "true".to_string(),
        NodeKind::False => "false".to_string(),
        NodeKind::Null => "null".to_string(),
        NodeKind::Invalid => return Err("invalid node".into()),
    };
    Ok(format!("{scalar}\n"))
}

fn read_input(input: Option<&str>) -> Result<(Vec<u8>, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}
