//! C profile, and the rule set shared with C++.
//!
//! Headers (`.h`) are read by this profile, so the shared rules also cover
//! C++ constructs (classes, namespaces, out-of-line members) that commonly
//! appear in headers.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, RuleContext,
    ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::C_STYLE_COMMENTS;

pub(super) const RESERVED: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "return", "break",
    "continue", "goto", "throw", "try", "catch", "new", "delete", "sizeof", "using",
    "operator", "friend", "static_assert", "co_return", "co_await",
];

pub(super) const CONTINUATION: &[&str] = &[":", ",", "public ", "private ", "protected "];

/// Rules shared by the C and C++ profiles.
pub(super) fn c_family_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            r#"^#\s*include\s*(?P<path>"[^"]+"|<[^>]+>)"#,
            RuleAction::Import(ImportKind::Standard),
        ),
        // object-like macros only; `#define F(x)` has no space before `(`
        Rule::new(r"^#\s*define\s+(?P<name>\w+)(?:\s|$)", RuleAction::VARIABLE),
        Rule::new(r"^#", RuleAction::Skip),
        Rule::new(r"^template\s*<.*>\s*$", RuleAction::Skip),
        Rule::new(r#"^extern\s+"C(?:\+\+)?"\s*\{"#, RuleAction::Block),
        Rule::new(r"^namespace\s*\{", RuleAction::Block),
        Rule::new(
            r"^(?:inline\s+)?namespace\s+(?P<name>[\w:]+)\s*(?:\{.*)?$",
            RuleAction::Namespace(SymbolKind::Namespace),
        ),
        Rule::new(r"^(?:public|private|protected|signals|slots)\b[^:]*:\s*$", RuleAction::Skip),
        // aliases and function-pointer typedefs; `typedef struct x {` falls through
        Rule::new(r"^typedef\b[^{]*(?:;\s*$|\()", RuleAction::Skip),
        // forward declarations
        Rule::new(r"^(?:class|struct|union|enum)\s+[\w:]+\s*;", RuleAction::Skip),
        Rule::new(
            r"^(?:template\s*<.*>\s*)?(?:typedef\s+)?(?:class|struct|union|enum(?:\s+class|\s+struct)?)\s+(?:\w+\s+)*?(?P<name>\w+)\s*(?:final\s*)?(?::\s*(?P<bases>[^{;]+?))?\s*(?:\{.*)?$",
            RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
        ),
        // out-of-line member definition: `T Foo::bar(...) {`
        Rule::new(
            r"^(?:[\w:<>,*&\s~]*?[\w>*&]\s+[*&]*)?(?P<receiver>(?:\w+(?:<[^>]*>)?::)+)(?P<name>~?\w+)\s*\((?:[^;]*$|[^;{]*\)[^;{]*\{.*$)",
            RuleAction::Function,
        ),
        // definition with a body, possibly on one line; prototypes end with `;`
        Rule::new(
            r"^(?:(?:static|inline|extern|virtual|explicit|constexpr|consteval|const|unsigned|signed|volatile|struct|enum|__inline|[A-Z_][A-Z0-9_]*)\s+)*[\w:<>,*&\s]*?[\w>*&]\s*[*&]*\s*(?P<name>~?\w+)\s*\((?:[^;]*$|[^;{]*\)[^;{]*\{.*$)",
            RuleAction::Function,
        ),
        // member function declared in a class body
        Rule::new(
            r"^(?:(?:static|inline|virtual|explicit|constexpr|const|[A-Z_][A-Z0-9_]*)\s+)*(?:[\w:<>,*&\s]*?[\w>*&]\s*[*&]*\s*)?(?P<name>~?\w+)\s*\([^)]*\)?\s*(?:const)?\s*(?:noexcept)?\s*(?:override|final|=\s*0|=\s*default|=\s*delete|\s)*(?:;|\{.*|:.*)?$",
            RuleAction::Function,
        )
        .within(RuleContext::InType),
        Rule::new(
            r"^(?:(?:static|const|mutable|volatile|unsigned|signed|struct|enum|union|inline|constexpr|extern|thread_local)\s+)*[\w:<>,*&\s]*?[\w>*&]\s*[*&]*\s*(?P<name>\w+)\s*(?:\[[^\]]*\])*\s*(?::\s*\d+)?\s*(?:=[^;]*|\{[^}]*\})?\s*[;,]\s*$",
            RuleAction::CONSTANT,
        ),
    ]
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "c",
        language: Language::C,
        extensions: &["c", "h"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Braces,
        rules: c_family_rules(),
        import_block: None,
        imports: ImportConvention::IncludePath,
        resolve_extensions: &[],
        reserved: RESERVED,
        continuation_prefixes: CONTINUATION,
        block_openers: &[],
    }
}
