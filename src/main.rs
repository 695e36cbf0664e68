//! Command-line interface for xml-structure

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::cell::RefCell;
#[cfg(feature = "cli")]
use std::io::{self, IsTerminal, Write};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::rc::Rc;

#[cfg(feature = "cli")]
use xml_structure::progress::Progress;
#[cfg(feature = "cli")]
use xml_structure::{summarize, write_report, Limits, ParseMode, ScanOptions, Scanner};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xml-structure")]
#[command(author, version, about = "Show the element and attribute structure of an XML or HTML document", long_about = None)]
struct Cli {
    /// Path to the document to scan
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Parse the document as HTML instead of XML
    #[arg(long)]
    html: bool,

    /// Never print progress to stderr
    #[arg(long)]
    no_progress: bool,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Maximum element nesting depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Use strict resource limits
    #[arg(long, conflicts_with = "permissive")]
    strict: bool,

    /// Use permissive resource limits for very deep or large documents
    #[arg(long)]
    permissive: bool,
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = match cli.format.as_str() {
        "text" => false,
        "json" => true,
        other => return Err(format!("Unknown format '{}', expected text or json", other).into()),
    };

    let mut limits = if cli.strict {
        Limits::strict()
    } else if cli.permissive {
        Limits::permissive()
    } else {
        Limits::default()
    };
    if let Some(depth) = cli.max_depth {
        limits = limits.with_max_depth(depth);
    }
    let mode = if cli.html {
        ParseMode::Html
    } else {
        ParseMode::Xml
    };
    let options = ScanOptions::new().with_mode(mode).with_limits(limits);

    let mut scanner = Scanner::new(options);
    let mut progress = None;
    if !cli.no_progress && io::stderr().is_terminal() {
        let total = std::fs::metadata(&cli.file).map(|m| m.len()).unwrap_or(0);
        let shared = Rc::new(RefCell::new(Progress::new(total)));
        let display = Rc::clone(&shared);
        scanner = scanner.with_progress(move |consumed| {
            if let Some(line) = display.borrow_mut().update(consumed) {
                eprint!("{}", line);
            }
        });
        progress = Some(shared);
    }

    let scanned = scanner.scan_file(&cli.file);
    if progress.as_ref().is_some_and(|p| p.borrow().displayed()) {
        eprintln!();
    }
    let schema = scanned?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &summarize(&schema))?;
        writeln!(out)?;
    } else {
        write_report(&mut out, &schema)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
