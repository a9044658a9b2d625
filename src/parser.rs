use crate::error::OutlineError;
use crate::languages::{self, Language};
use tree_sitter::{Parser, Tree};

/// Parse source code into a Tree-sitter AST
pub fn parse(source: &str, language: Language) -> Result<Tree, OutlineError> {
    let mut parser = Parser::new();

    parser
        .set_language(&languages::ts_language(language))
        .map_err(|e| OutlineError::ParseError(format!("Failed to set language: {}", e)))?;

    parser
        .parse(source, None)
        .ok_or_else(|| OutlineError::ParseError("Failed to parse source code".to_string()))
}
