//! JavaScript profile, and the rule set shared with TypeScript.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, RuleContext,
    ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::C_STYLE_COMMENTS;

pub(super) const RESERVED: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "return", "break",
    "continue", "throw", "try", "catch", "finally", "new", "delete", "typeof", "instanceof",
    "void", "yield", "await", "this", "super", "with", "in", "of",
];

pub(super) const CONTINUATION: &[&str] = &["extends ", "implements ", ","];

const MEMBER_MODIFIERS: &str = r"(?:@[\w.]+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|static|async|readonly|abstract|override|declare|get|set|accessor)\s+)*";

/// Rules shared by the JavaScript and TypeScript profiles.
pub(super) fn rules(typescript: bool) -> Vec<Rule> {
    let mut rules = vec![
        Rule::new(
            r#"^import\s+(?:type\s+)?(?:[\w$*{},\s]+?\s+from\s+)?["'](?P<path>[^"']+)["']"#,
            RuleAction::Import(ImportKind::Standard),
        ),
        Rule::new(
            r#"^export\s+(?:type\s+)?(?:\*|\{[^}]*\}|\*\s+as\s+[\w$]+)\s+from\s+["'](?P<path>[^"']+)["']"#,
            RuleAction::Import(ImportKind::Standard),
        ),
        // closing line of a multi-line import list
        Rule::new(
            r#"^\}\s*from\s+["'](?P<path>[^"']+)["']"#,
            RuleAction::Import(ImportKind::Standard),
        ),
        Rule::new(
            r#"\brequire\(\s*["'](?P<path>[^"']+)["']\s*\)"#,
            RuleAction::Import(ImportKind::Standard),
        ),
        Rule::new(
            r#"\bimport\(\s*["'](?P<path>[^"']+)["']\s*\)"#,
            RuleAction::Import(ImportKind::Standard),
        ),
    ];

    if typescript {
        rules.extend([
            Rule::new(
                r"^(?:export\s+)?(?:declare\s+)?(?:namespace|module)\s+(?P<name>[\w.]+)\s*(?:\{.*)?$",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(
                r"^(?:export\s+)?(?:default\s+)?(?:declare\s+)?interface\s+(?P<name>\w+)(?:<.*?>)?(?:\s+extends\s+(?P<extends>[^{]+?))?\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(r"^(?:export\s+)?(?:declare\s+)?type\s+\w+.*=", RuleAction::Skip),
            Rule::new(
                r"^(?:export\s+)?(?:declare\s+)?(?:const\s+)?enum\s+(?P<name>\w+)",
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
        ]);
    }

    rules.extend([
        Rule::new(
            r"^(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+(?P<name>[\w$]+)(?:<.*?>)?(?:\s+extends\s+(?P<extends>[\w.$]+(?:<.*?>)?(?:\([^)]*\))?))?(?:\s+implements\s+(?P<implements>[^{]+?))?\s*(?:\{.*)?$",
            RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
        ),
        Rule::new(
            r"^(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>[\w$]+)\s*(?:<[^>]*>)?\s*\(",
            RuleAction::Function,
        ),
        // `const f = (...) => ...`, `const f = function ...`
        Rule::new(
            r"^(?:export\s+)?(?:const|let|var)\s+(?P<name>[\w$]+)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::\s*[^=]+)?=>|[\w$]+\s*=>|\($)",
            RuleAction::Function,
        ),
        Rule::new(
            r"^(?:export\s+)?(?:declare\s+)?(?:const|let|var)\s+(?P<name>[\w$]+)",
            RuleAction::VARIABLE,
        )
        .within(RuleContext::TopLevel),
        Rule::new(r"^@[\w.]+(?:\(.*\))?\s*$", RuleAction::Skip),
        Rule::new(
            &format!(r"^{}\*?(?P<name>#?[\w$]+)\s*(?:<[^>]*>)?\s*\(", MEMBER_MODIFIERS),
            RuleAction::Function,
        )
        .within(RuleContext::InType),
        Rule::new(
            &format!(
                r"^{}(?P<name>#?[\w$]+)\s*[?!]?\s*(?::[^=;]+)?(?:=.*|;)?$",
                MEMBER_MODIFIERS
            ),
            RuleAction::FIELD,
        )
        .within(RuleContext::InType),
    ]);
    rules
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "javascript",
        language: Language::JavaScript,
        extensions: &["js", "jsx", "mjs", "cjs"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '\'', '`'],
        scope_mode: ScopeMode::Braces,
        rules: rules(false),
        import_block: None,
        imports: ImportConvention::JsModule,
        resolve_extensions: &["js", "jsx", "mjs", "cjs", "ts", "tsx"],
        reserved: RESERVED,
        continuation_prefixes: CONTINUATION,
        block_openers: &[],
    }
}
