mod error;
mod parser;
mod walk;
pub mod builder;
pub mod filter;
pub mod frontend;
pub mod languages;
pub mod logging;
pub mod outline;
pub mod output;
pub mod session;
pub mod syntax;
pub mod watch;

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub use error::OutlineError;
pub use languages::{InputKind, Language};
pub use outline::{OutlineNode, Position, Token, TokenKind};
pub use output::OutputFormat;

/// Options for processing paths
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub format: OutputFormat,
    pub depth: Option<usize>,
    pub ext: Vec<String>,
    /// Regex over representative names and signatures.
    pub grep: Option<String>,
    pub ignore_case: bool,
    pub stats: bool,
}

/// The outline of one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutline {
    pub path: String,
    pub lines: usize,
    pub bytes: usize,
    pub outline: Vec<OutlineNode>,
}

/// Outline JavaScript or TypeScript source text.
pub fn outline_source(source: &str, language: Language) -> Result<Vec<OutlineNode>, OutlineError> {
    let tree = parser::parse(source, language)?;
    let program = frontend::treesitter::lower(&tree, source);
    Ok(builder::build_outline(&program))
}

/// Outline an ESTree AST given as JSON text.
pub fn outline_estree(json: &str) -> Result<Vec<OutlineNode>, OutlineError> {
    let program = frontend::estree::parse_program(json)?;
    Ok(builder::build_outline(&program))
}

/// Outline a single file, picking the front end from its extension.
pub fn outline_file(path: &Path) -> Result<FileOutline, OutlineError> {
    let input = languages::detect_input(path)?;
    let text = fs::read_to_string(path).map_err(|e| OutlineError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let outline = match input {
        InputKind::Source(language) => outline_source(&text, language)?,
        InputKind::EstreeJson => outline_estree(&text)?,
    };
    debug!(path = %path.display(), nodes = outline.len(), "outlined");

    Ok(FileOutline {
        path: path.display().to_string(),
        lines: text.lines().count(),
        bytes: text.len(),
        outline,
    })
}

/// Outline a file, or every supported file below a directory. Files that fail
/// inside a directory are skipped with a warning.
pub fn collect_outlines(
    path: &Path,
    depth: Option<usize>,
    ext: &[String],
) -> Result<Vec<FileOutline>, OutlineError> {
    if !path.exists() {
        return Err(OutlineError::PathNotFound(path.display().to_string()));
    }

    if path.is_file() {
        Ok(vec![outline_file(path)?])
    } else if path.is_dir() {
        let mut results = Vec::new();
        for file_path in walk::walk_directory(path, depth, ext)? {
            match outline_file(&file_path) {
                Ok(file) => results.push(file),
                Err(e) => warn!("Failed to process {}: {}", file_path.display(), e),
            }
        }
        Ok(results)
    } else {
        Err(OutlineError::InvalidPath(path.display().to_string()))
    }
}

/// Process a file or directory and return formatted output
pub fn process_path(path: &str, options: &ProcessOptions) -> Result<String, OutlineError> {
    let files = collect_outlines(Path::new(path), options.depth, &options.ext)?;
    render(files, options)
}

/// Process an ESTree AST that did not come from a file (e.g. stdin).
pub fn process_ast_text(label: &str, json: &str, options: &ProcessOptions) -> Result<String, OutlineError> {
    let file = FileOutline {
        path: label.to_string(),
        lines: json.lines().count(),
        bytes: json.len(),
        outline: outline_estree(json)?,
    };
    render(vec![file], options)
}

/// Apply the `grep` filter and format.
pub fn render(mut files: Vec<FileOutline>, options: &ProcessOptions) -> Result<String, OutlineError> {
    if let Some(pattern) = &options.grep {
        let regex = filter::compile(pattern, options.ignore_case)?;
        for file in &mut files {
            file.outline = filter::filter_outline(&file.outline, &regex);
        }
    }

    if options.stats {
        output::stats::format_output(&files, options.format)
    } else {
        match options.format {
            OutputFormat::Plain => output::plain::format_output(&files),
            OutputFormat::Json => output::json::format_output(&files),
        }
    }
}
