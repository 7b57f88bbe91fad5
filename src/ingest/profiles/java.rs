//! Java profile.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, ScopeMode,
    C_FAMILY_RESERVED,
};
use crate::ingest::{Language, SymbolKind};

use super::{with_modifiers, C_STYLE_COMMENTS};

/// Annotations and modifiers preceding a declaration.
const MODIFIERS: &str = r"(?:@[\w.]+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|static|final|abstract|sealed|non-sealed|strictfp|synchronized|native|transient|volatile|default)\s+)*";

pub fn profile() -> LanguageProfile {
    let m = |template: &str| with_modifiers(template, MODIFIERS);
    LanguageProfile {
        id: "java",
        language: Language::Java,
        extensions: &["java"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^package\s+(?P<name>[\w.]+)\s*;",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(
                r"^import\s+(?:static\s+)?(?P<path>[\w.*]+)\s*;",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                &m(r"^%M%@?interface\s+(?P<name>\w+)(?:<.*?>)?(?:\s+extends\s+(?P<extends>[^{]+?))?\s*(?:\{.*)?$"),
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                &m(r"^%M%(?:class|enum|record)\s+(?P<name>\w+)(?:<.*?>)?(?:\s*\([^)]*(?:\)|$))?(?:\s+extends\s+(?P<extends>[\w.<>,\s]+?))?(?:\s+implements\s+(?P<implements>[^{]+?))?(?:\s+permits\s+[^{]+?)?\s*(?:\{.*)?$"),
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
            // methods need a return type; constructors need a modifier
            Rule::new(
                r"^(?:@[\w.]+(?:\([^)]*\))?\s+)*(?:(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)+|(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)*(?:<[^>]*>\s+)?[\w.<>\[\]?,\s]*[\w>\]]\s+)(?P<name>\w+)\s*\(",
                RuleAction::Function,
            ),
            Rule::new(
                &m(r"^%M%[\w.<>\[\]?,\s]*?[\w>\]]\s+(?P<name>\w+)\s*(?:=|;)"),
                RuleAction::FIELD,
            ),
        ],
        import_block: None,
        imports: ImportConvention::DotPackage,
        resolve_extensions: &["java"],
        reserved: C_FAMILY_RESERVED,
        continuation_prefixes: &["extends ", "implements ", "throws ", "permits ", ","],
        block_openers: &[],
    }
}
