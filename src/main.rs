use clap::Parser;
use jsoutline::{logging, process_ast_text, process_path, watch, OutlineError, OutputFormat, ProcessOptions};
use std::io::{self, Read};
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(name = "jsoutline")]
#[command(about = "Outline JavaScript/TypeScript sources and ESTree ASTs", long_about = None, version)]
struct Cli {
    /// File or directory to outline; `-` reads an ESTree JSON AST from stdin
    #[arg(value_name = "PATH")]
    path: String,

    /// JSON output instead of plain text
    #[arg(long)]
    json: bool,

    /// Show stats (files, lines, bytes, nodes, depth) instead of outlines
    #[arg(long)]
    stats: bool,

    /// Directory recursion depth (default: unlimited)
    #[arg(long)]
    depth: Option<usize>,

    /// Only outline files with these extensions (comma separated)
    #[arg(long, value_delimiter = ',')]
    ext: Vec<String>,

    /// Keep only nodes whose name or signature matches this regex
    #[arg(long)]
    grep: Option<String>,

    /// Case-insensitive --grep
    #[arg(short = 'i', long = "ignore-case", requires = "grep")]
    ignore_case: bool,

    /// Keep running and print outlines again as files change
    #[arg(long, conflicts_with = "stats")]
    watch: bool,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let options = ProcessOptions {
        format: if cli.json { OutputFormat::Json } else { OutputFormat::Plain },
        depth: cli.depth,
        ext: cli.ext,
        grep: cli.grep,
        ignore_case: cli.ignore_case,
        stats: cli.stats,
    };

    if let Err(e) = run(&cli.path, cli.watch, &options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(path: &str, watch_mode: bool, options: &ProcessOptions) -> Result<(), OutlineError> {
    if path == "-" {
        if watch_mode {
            return Err(OutlineError::InvalidPath("--watch needs a file or directory, not stdin".to_string()));
        }
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| OutlineError::ReadError { path: "<stdin>".to_string(), source: e })?;
        print!("{}", process_ast_text("<stdin>", &buf, options)?);
        return Ok(());
    }

    if watch_mode {
        return watch::watch_path(Path::new(path), options, |text| print!("{}", text));
    }

    print!("{}", process_path(path, options)?);
    Ok(())
}
