//! C# profile.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::{with_modifiers, C_STYLE_COMMENTS};

/// Attributes and modifiers preceding a declaration.
const MODIFIERS: &str = r"(?:\[[^\]]*\]\s*)*(?:(?:public|private|protected|internal|static|abstract|sealed|partial|virtual|override|async|readonly|unsafe|extern|new|file|required|const|volatile|ref|event|implicit|explicit)\s+)*";

const RESERVED: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "case", "default", "return",
    "break", "continue", "goto", "throw", "try", "catch", "finally", "new", "using", "lock",
    "yield", "await", "typeof", "sizeof", "nameof", "checked", "unchecked", "fixed", "get",
    "set", "init", "add", "remove", "where", "base", "this", "var", "operator",
];

pub fn profile() -> LanguageProfile {
    let m = |template: &str| with_modifiers(template, MODIFIERS);
    LanguageProfile {
        id: "csharp",
        language: Language::CSharp,
        extensions: &["cs"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^(?:global\s+)?using\s+(?:static\s+)?(?:\w+\s*=\s*)?(?P<path>[\w.]+)\s*;",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                r"^namespace\s+(?P<name>[\w.]+)",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(r"^(?:\[[^\]]*\]\s*)*(?:(?:public|private|protected|internal)\s+)*delegate\s", RuleAction::Skip),
            Rule::new(
                &m(r"^%M%interface\s+(?P<name>\w+)(?:<.*?>)?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:\bwhere\b.*|\{.*)?$"),
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                &m(r"^%M%(?:class|struct|record(?:\s+(?:class|struct))?|enum)\s+(?P<name>\w+)(?:<.*?>)?(?:\s*\([^)]*(?:\)|$))?(?:\s*:\s*(?P<bases>[^{;]+?))?\s*(?:\bwhere\b.*|\{.*|;)?$"),
                RuleAction::Type(NodeType::Class, BaseRule::InterfacePrefix),
            ),
            // methods and constructors; a constructor has modifiers but no type
            Rule::new(
                &m(r"^%M%(?:[\w.<>\[\]?,\s]*[\w>\]?]\s+)?(?P<name>\w+)\s*(?:<[^()]*>)?\s*\("),
                RuleAction::Function,
            ),
            Rule::new(
                &m(r"^%M%[\w.<>\[\]?,\s]*?[\w>\]?]\s+(?P<name>\w+)\s*(?:\{|=>|=|;|$)"),
                RuleAction::FIELD,
            ),
        ],
        import_block: None,
        imports: ImportConvention::DotPackage,
        resolve_extensions: &["cs"],
        reserved: RESERVED,
        continuation_prefixes: &[":", "where ", ","],
        block_openers: &[],
    }
}
