//! Go profile.

use crate::graph::{NodeType, Relationship};
use crate::ingest::profile::{
    import_block, BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction,
    RuleContext, ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::C_STYLE_COMMENTS;

const RESERVED: &[&str] = &[
    "if", "else", "for", "switch", "select", "case", "default", "return", "go", "defer",
    "break", "continue", "goto", "fallthrough", "range", "chan", "map",
];

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "go",
        language: Language::Go,
        extensions: &["go"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '`', '\''],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^package\s+(?P<name>\w+)",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(
                r#"^import\s+(?:[\w.]+\s+)?"(?P<path>[^"]+)""#,
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(r"^import\s*\($", RuleAction::ImportBlockStart),
            Rule::new(
                r"^type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+struct\b",
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+interface\b",
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(r"^type\b", RuleAction::Skip),
            Rule::new(
                r"^func\s+\((?P<receiver>[^)]*)\)\s*(?P<name>\w+)\s*[\[(]",
                RuleAction::Function,
            ),
            Rule::new(r"^func\s+(?P<name>\w+)\s*[\[(]", RuleAction::Function),
            // interface method set
            Rule::new(r"^(?P<name>[A-Za-z_]\w*)\s*\(", RuleAction::Function)
                .within(RuleContext::InType),
            // embedded struct or interface
            Rule::new(
                r"^\*?(?P<name>[\w.]+)\s*(?:`[^`]*`)?$",
                RuleAction::Mixin(Relationship::Inherits),
            ),
            Rule::new(
                r"^(?P<names>\w+(?:\s*,\s*\w+)*)\s+[^\s(]",
                RuleAction::FIELD,
            )
            .within(RuleContext::InType),
            Rule::new(
                r"^(?:var|const)\s+(?P<names>\w+(?:\s*,\s*\w+)*)",
                RuleAction::VARIABLE,
            ),
        ],
        import_block: import_block(r#"^(?:[\w.]+\s+)?"(?P<path>[^"]+)""#, ")"),
        imports: ImportConvention::GoPackage,
        resolve_extensions: &["go"],
        reserved: RESERVED,
        continuation_prefixes: &[],
        block_openers: &[],
    }
}
