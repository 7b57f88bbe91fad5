//! Rust profile.
//!
//! `impl` blocks reopen the implementing type, so methods hang off the type
//! name and `impl Trait for Type` records an implemented interface.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, RuleContext,
    ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::C_STYLE_COMMENTS;

const VIS: &str = r"(?:pub(?:\([^)]*\))?\s+)?";

const RESERVED: &[&str] = &[
    "if", "else", "match", "for", "while", "loop", "return", "let", "break", "continue",
    "where", "in", "as", "move", "ref", "self", "Self", "super", "crate", "dyn",
];

pub fn profile() -> LanguageProfile {
    let v = |template: &str| template.replace("%V%", VIS);
    LanguageProfile {
        id: "rust",
        language: Language::Rust,
        extensions: &["rs"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"'],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                &v(r"^%V%use\s+(?P<path>[\w:]+?)(?:::\{(?P<names>[^}]*)\}?|::\*)?(?:\s+as\s+\w+)?\s*;?$"),
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(&v(r"^%V%mod\s+(?P<name>\w+)\s*;"), RuleAction::ModuleDecl),
            Rule::new(
                &v(r"^%V%mod\s+(?P<name>\w+)\s*(?:\{.*)?$"),
                RuleAction::Namespace(SymbolKind::Module),
            ),
            Rule::new(r"^#!?\[", RuleAction::Skip),
            Rule::new(
                &v(r"^%V%(?:struct|enum|union)\s+(?P<name>\w+)"),
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
            Rule::new(
                &v(r"^%V%(?:unsafe\s+)?(?:auto\s+)?trait\s+(?P<name>\w+)(?:<.*?>)?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:where\b.*|\{.*)?$"),
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^(?:unsafe\s+)?impl(?:<.*?>)?\s+(?:!?(?P<trait>[\w:]+(?:<.*?>)?)\s+for\s+)?(?P<name>[\w:]+(?:<.*?>)?)\s*(?:where\b.*|\{.*)?$",
                RuleAction::Extension,
            ),
            Rule::new(
                &v(r#"^%V%(?:default\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>\w+)"#),
                RuleAction::Function,
            ),
            Rule::new(&v(r"^%V%type\s+\w+"), RuleAction::Skip),
            Rule::new(
                &v(r"^%V%(?:const|static)\s+(?:mut\s+)?(?P<name>\w+)\s*:"),
                RuleAction::CONSTANT,
            ),
            Rule::new(
                &v(r"^%V%(?P<name>[a-z_]\w*)\s*:\s*[^:]"),
                RuleAction::FIELD,
            )
            .within(RuleContext::InType),
        ],
        import_block: None,
        imports: ImportConvention::RustModule,
        resolve_extensions: &["rs"],
        reserved: RESERVED,
        continuation_prefixes: &["where", ":", ","],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::engine::BaseSource;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};

    const SOURCE: &str = r#"//! Module docs.
use std::collections::HashMap;
use crate::graph::{NodeType, Relationship};
use super::*;
use serde::Serialize as Ser;

mod parser;
pub mod lexer;

pub const MAX_DEPTH: usize = 32;
static mut COUNTER: u32 = 0;

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    text: String,
}

pub struct Marker;

pub enum TokenKind {
    Ident,
    Number { value: i64 },
}

pub trait Visitor: Debug + Clone + 'static {
    fn visit(&mut self, token: &Token);
    fn done(&self) -> bool {
        true
    }
}

impl Token {
    pub fn new(kind: TokenKind, text: &str) -> Self {
        let s = "impl Fake {";
        Self { kind, text: text.to_string() }
    }
}

impl<T: Debug> Visitor for Printer<T> {
    fn visit(&mut self, token: &Token) {}
}

pub(crate) async fn run() -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token() {}
}
"#;

    #[test]
    fn test_rust_declaration_counts() {
        let out = run(&profile(), "src/lexer/token.rs", SOURCE);
        assert_eq!(
            names(&out, SymbolKind::Import),
            vec!["std::collections::HashMap", "crate::graph", "super", "serde::Serialize", "super"]
        );
        assert_eq!(out.imports[1].names, vec!["NodeType", "Relationship"]);
        assert_eq!(names(&out, SymbolKind::Module), vec!["parser", "lexer", "tests"]);
        assert_eq!(names(&out, SymbolKind::Variable), vec!["MAX_DEPTH", "COUNTER"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Token", "Marker", "TokenKind"]);
        assert_eq!(names(&out, SymbolKind::Interface), vec!["Visitor"]);
        assert_eq!(names(&out, SymbolKind::Property), vec!["kind", "text"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("visit".to_string(), Some("Visitor".to_string())),
                ("done".to_string(), Some("Visitor".to_string())),
                ("new".to_string(), Some("Token".to_string())),
                ("visit".to_string(), Some("Printer".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Function), vec!["run", "test_token"]);
    }

    #[test]
    fn test_rust_trait_bounds_and_impls() {
        let out = run(&profile(), "src/lexer/token.rs", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("Debug".to_string(), "Inherits"),
                ("Clone".to_string(), "Inherits"),
                ("Visitor".to_string(), "Implements"),
            ]
        );
        let impl_base = out.bases.last().unwrap();
        assert_eq!(impl_base.source, BaseSource::TypeName("Printer".to_string()));
    }

    #[test]
    fn test_mod_declarations_become_sibling_imports() {
        let out = run(&profile(), "src/lib.rs", "mod config;\npub mod engine;\n");
        let kinds: Vec<_> = out.imports.iter().map(|i| (i.token.as_str(), i.kind)).collect();
        assert_eq!(
            kinds,
            vec![("config", ImportKind::SiblingModule), ("engine", ImportKind::SiblingModule)]
        );
    }
}
