//! Front ends lower parser-specific trees into [`crate::syntax::Program`].

pub mod estree;
pub mod treesitter;
