use crate::error::OutlineError;
use crate::FileOutline;
use super::OutputFormat;
use std::fmt::Write;

/// Per-file statistics
struct FileStats<'a> {
    path: &'a str,
    lines: usize,
    bytes: usize,
    nodes: usize,
    top_level: usize,
    depth: usize,
}

impl<'a> FileStats<'a> {
    fn from_file(file: &'a FileOutline) -> Self {
        FileStats {
            path: &file.path,
            lines: file.lines,
            bytes: file.bytes,
            nodes: file.outline.iter().map(|n| n.count()).sum(),
            top_level: file.outline.len(),
            depth: file.outline.iter().map(|n| n.depth()).max().unwrap_or(0),
        }
    }
}

/// Format stats output in the requested format.
pub fn format_output(files: &[FileOutline], format: OutputFormat) -> Result<String, OutlineError> {
    let stats: Vec<FileStats> = files.iter().map(FileStats::from_file).collect();
    match format {
        OutputFormat::Plain => Ok(format_plain(&stats)),
        OutputFormat::Json => format_json(&stats),
    }
}

fn format_plain(stats: &[FileStats]) -> String {
    let mut out = String::new();
    let lines: usize = stats.iter().map(|s| s.lines).sum();
    let bytes: usize = stats.iter().map(|s| s.bytes).sum();
    let nodes: usize = stats.iter().map(|s| s.nodes).sum();
    let top_level: usize = stats.iter().map(|s| s.top_level).sum();
    let depth = stats.iter().map(|s| s.depth).max().unwrap_or(0);

    let _ = writeln!(
        out,
        "files: {}  lines: {}  bytes: {}  nodes: {}  top-level: {}  depth: {}",
        stats.len(),
        lines,
        bytes,
        nodes,
        top_level,
        depth
    );

    if stats.len() > 1 {
        let _ = writeln!(out);
        for s in stats.iter().filter(|s| s.nodes > 0) {
            let _ = writeln!(
                out,
                "  {}: {} lines, {} bytes, {} nodes ({} top-level, depth {})",
                s.path, s.lines, s.bytes, s.nodes, s.top_level, s.depth
            );
        }
    }

    out
}

fn format_json(stats: &[FileStats]) -> Result<String, OutlineError> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct StatsOutput<'a> {
        files: usize,
        lines: usize,
        bytes: usize,
        nodes: usize,
        top_level: usize,
        depth: usize,
        per_file: Vec<FileStatJson<'a>>,
    }

    #[derive(Serialize)]
    struct FileStatJson<'a> {
        path: &'a str,
        lines: usize,
        bytes: usize,
        nodes: usize,
        top_level: usize,
        depth: usize,
    }

    let per_file: Vec<FileStatJson> = stats
        .iter()
        .map(|s| FileStatJson {
            path: s.path,
            lines: s.lines,
            bytes: s.bytes,
            nodes: s.nodes,
            top_level: s.top_level,
            depth: s.depth,
        })
        .collect();

    let output = StatsOutput {
        files: per_file.len(),
        lines: per_file.iter().map(|f| f.lines).sum(),
        bytes: per_file.iter().map(|f| f.bytes).sum(),
        nodes: per_file.iter().map(|f| f.nodes).sum(),
        top_level: per_file.iter().map(|f| f.top_level).sum(),
        depth: per_file.iter().map(|f| f.depth).max().unwrap_or(0),
        per_file,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
