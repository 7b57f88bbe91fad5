//! Kotlin profile.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::{with_modifiers, C_STYLE_COMMENTS};

const MODIFIERS: &str = r"(?:@[\w.:]+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|internal|open|abstract|final|sealed|data|enum|annotation|inner|inline|value|override|suspend|operator|infix|tailrec|external|const|lateinit|expect|actual|companion)\s+)*";

const RESERVED: &[&str] = &[
    "if", "else", "when", "for", "while", "do", "return", "throw", "try", "catch", "finally",
    "is", "in", "as", "this", "super", "null", "true", "false", "break", "continue",
    "typealias", "init", "constructor",
];

pub fn profile() -> LanguageProfile {
    let m = |template: &str| with_modifiers(template, MODIFIERS);
    LanguageProfile {
        id: "kotlin",
        language: Language::Kotlin,
        extensions: &["kt", "kts"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^package\s+(?P<name>[\w.]+)",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(
                r"^import\s+(?P<path>[\w.*]+)",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                &m(r"^%M%(?:fun\s+)?interface\s+(?P<name>\w+)(?:<.*?>)?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:\{.*)?$"),
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                &m(r"^%M%(?:class|object)\s+(?P<name>\w+)(?:<.*?>)?(?:\s*(?:(?:private|protected|internal|public)\s+)?(?:@\w+\s+)*(?:constructor\s*)?\([^)]*(?:\)|$))?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:\{.*)?$"),
                RuleAction::Type(NodeType::Class, BaseRule::CallSyntaxIsClass),
            ),
            Rule::new(
                &m(r"^%M%fun\s+(?:<[^>]*>\s*)?(?:(?P<receiver>[\w.<>?,\s]+?)\.)?(?P<name>\w+)\s*\("),
                RuleAction::Function,
            ),
            Rule::new(
                &m(r"^%M%(?:val|var)\s+(?:<[^>]*>\s*)?(?:[\w<>?]+\.)?(?P<name>\w+)"),
                RuleAction::CONSTANT,
            ),
        ],
        import_block: None,
        imports: ImportConvention::DotPackage,
        resolve_extensions: &["kt", "kts"],
        reserved: RESERVED,
        continuation_prefixes: &[":", ","],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};

    const SOURCE: &str = r#"package com.acme.app

import kotlinx.coroutines.flow.Flow
import com.acme.data.*

const val MAX_RETRIES = 3

interface Repository<T> {
    fun findAll(): List<T>
}

data class User(
    val id: Long,
    val name: String,
) : Entity(), Comparable<User> {
    val display: String get() = name
    override fun compareTo(other: User): Int = id.compareTo(other.id)
}

class UserRepository(private val db: Database) : BaseRepository(db), Repository<User> {
    private var cache = mutableListOf<User>()

    override fun findAll(): List<User> {
        val rows = db.query("select * from users")
        return rows
    }

    companion object {
        fun create(): UserRepository = UserRepository(Database())
    }
}

object Registry

fun String.slugify(): String = lowercase()

fun main() {
    println("hi")
}
"#;

    #[test]
    fn test_kotlin_declaration_counts() {
        let out = run(&profile(), "app/src/User.kt", SOURCE);
        assert_eq!(names(&out, SymbolKind::Namespace), vec!["com.acme.app"]);
        assert_eq!(
            names(&out, SymbolKind::Import),
            vec!["kotlinx.coroutines.flow.Flow", "com.acme.data.*"]
        );
        assert_eq!(names(&out, SymbolKind::Interface), vec!["Repository"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["User", "UserRepository", "Registry"]);
        assert_eq!(names(&out, SymbolKind::Function), vec!["main"]);
        assert_eq!(names(&out, SymbolKind::Variable), vec!["MAX_RETRIES"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("findAll".to_string(), Some("Repository".to_string())),
                ("compareTo".to_string(), Some("User".to_string())),
                ("findAll".to_string(), Some("UserRepository".to_string())),
                ("slugify".to_string(), Some("String".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Property), vec!["display", "cache"]);
    }

    #[test]
    fn test_kotlin_call_syntax_marks_superclass() {
        let source = "class UserRepository(db: Db) : BaseRepository(db), Repository<User> {\n}\n";
        let out = run(&profile(), "Repo.kt", source);
        assert_eq!(
            bases(&out),
            vec![
                ("BaseRepository".to_string(), "Inherits"),
                ("Repository".to_string(), "Implements"),
            ]
        );
    }
}
