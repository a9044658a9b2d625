use crate::error::OutlineError;
use std::path::Path;

/// Source languages outlined through tree-sitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Tsx,
}

/// What a file on disk holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    Source(Language),
    /// An ESTree AST serialized as JSON, e.g. the output of `flow ast`.
    EstreeJson,
}

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx"];

/// Detect the input kind from the file extension.
pub fn detect_input(path: &Path) -> Result<InputKind, OutlineError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| OutlineError::NoExtension(path.display().to_string()))?;

    match extension {
        "js" | "jsx" | "mjs" | "cjs" => Ok(InputKind::Source(Language::JavaScript)),
        "ts" => Ok(InputKind::Source(Language::TypeScript)),
        "tsx" => Ok(InputKind::Source(Language::Tsx)),
        "json" => Ok(InputKind::EstreeJson),
        _ => Err(OutlineError::UnsupportedExtension(extension.to_string())),
    }
}

/// Whether a directory walk should pick up this file. ASTs are only picked up
/// when `json` is explicitly requested, so stray `package.json` files are left alone.
pub fn is_supported_file(path: &Path, ext_filter: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if ext_filter.is_empty() {
        SOURCE_EXTENSIONS.contains(&ext)
    } else {
        ext_filter.iter().any(|f| f == ext) && (ext == "json" || SOURCE_EXTENSIONS.contains(&ext))
    }
}

/// Get the tree-sitter grammar for a language.
pub fn ts_language(lang: Language) -> tree_sitter::Language {
    match lang {
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}
