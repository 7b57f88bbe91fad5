//! Python profile: indentation scoped, docstrings treated as comments.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, CommentSyntax, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction,
    RuleContext, ScopeMode,
};
use crate::ingest::Language;

const RESERVED: &[&str] = &[
    "if", "elif", "else", "for", "while", "with", "try", "except", "finally", "return", "yield",
    "raise", "pass", "break", "continue", "del", "global", "nonlocal", "assert", "lambda", "not",
    "and", "or", "in", "is", "await", "match", "case", "print", "self", "cls",
];

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "python",
        language: Language::Python,
        extensions: &["py", "pyi", "pyw"],
        comments: CommentSyntax {
            line: &["#"],
            block: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
        },
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Indentation,
        rules: vec![
            Rule::new(
                r"^from\s+(?P<path>\.*[\w.]*)\s+import\s+\(?(?P<names>[\w\s,*]+?)?\)?\s*$",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                r"^import\s+(?P<path>[\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*)\s*$",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(r"^@", RuleAction::Skip),
            Rule::new(
                r"^class\s+(?P<name>\w+)(?:\[[^\]]*\])?\s*(?:\((?P<bases>[^)]*)\)?)?\s*:?",
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^(?:async\s+)?def\s+(?P<name>\w+)\s*[\[(]",
                RuleAction::Function,
            ),
            // class attributes: `x = 1`, `x: int = 1`, `x: int`
            Rule::new(
                r"^(?P<name>[A-Za-z_]\w*)\s*(?::[^=]*)?=(?:[^=]|$)",
                RuleAction::FIELD,
            )
            .within(RuleContext::InType),
            Rule::new(
                r#"^(?P<name>[A-Za-z_]\w*)\s*:\s*[\w\[\]., |"']+$"#,
                RuleAction::FIELD,
            )
            .within(RuleContext::InType),
            Rule::new(
                r"^(?P<name>[A-Z][A-Z0-9_]*)\s*(?::[^=]*)?=(?:[^=]|$)",
                RuleAction::VARIABLE,
            )
            .within(RuleContext::TopLevel),
        ],
        import_block: None,
        imports: ImportConvention::PythonModule,
        resolve_extensions: &["py"],
        reserved: RESERVED,
        continuation_prefixes: &[],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};
    use crate::ingest::SymbolKind;

    const SOURCE: &str = r#""""Module docstring.

class NotReal:
"""
import os
import sys as system, json
from typing import List, Optional
from . import views
from ..models import User as U, Group

MAX_ITEMS = 50
logger = get_logger()


class Base:
    pass


class User(Base, Serializable, metaclass=ABCMeta):
    """A user."""
    table = "users"
    name: str
    email: str = ""

    def __init__(self, name):
        self.name = name
        inner = 1

    @property
    def display(self):
        def helper():
            return 1
        return helper()

    class Meta:
        ordering = ["name"]


async def fetch(url):
    return await get(url)


def build(
    a,
    b,
):
    return a
"#;

    #[test]
    fn test_python_declaration_counts() {
        let out = run(&profile(), "app/models.py", SOURCE);
        assert_eq!(
            names(&out, SymbolKind::Import),
            vec!["os", "sys", "json", "typing", ".", "..models"]
        );
        assert_eq!(names(&out, SymbolKind::Class), vec!["Base", "User", "Meta"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("__init__".to_string(), Some("User".to_string())),
                ("display".to_string(), Some("User".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Function), vec!["fetch", "build"]);
        assert_eq!(
            names(&out, SymbolKind::Property),
            vec!["table", "name", "email", "ordering"]
        );
        assert_eq!(names(&out, SymbolKind::Variable), vec!["MAX_ITEMS"]);
    }

    #[test]
    fn test_python_import_names_and_bases() {
        let out = run(&profile(), "app/models.py", SOURCE);
        assert_eq!(out.imports[3].names, vec!["List", "Optional"]);
        assert_eq!(out.imports[5].names, vec!["User", "Group"]);
        assert_eq!(
            bases(&out),
            vec![("Base".to_string(), "Inherits"), ("Serializable".to_string(), "Inherits")]
        );
    }

    #[test]
    fn test_python_nested_class_is_qualified() {
        let out = run(&profile(), "app/models.py", SOURCE);
        assert!(out.nodes.iter().any(|n| n.id == "class:app/models.User.Meta"));
        assert!(out.nodes.iter().any(|n| n.id == "func:app/models.fetch"));
    }
}
