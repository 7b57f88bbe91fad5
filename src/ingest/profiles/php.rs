//! PHP profile.

use crate::graph::{NodeType, Relationship};
use crate::ingest::profile::{
    BaseRule, CommentSyntax, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction,
    RuleContext, ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

const RESERVED: &[&str] = &[
    "if", "else", "elseif", "foreach", "for", "while", "do", "switch", "case", "default",
    "return", "break", "continue", "throw", "try", "catch", "finally", "new", "echo", "print",
    "isset", "unset", "empty", "array", "list", "match", "fn", "yield", "clone", "goto",
];

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "php",
        language: Language::Php,
        extensions: &["php", "phtml"],
        comments: CommentSyntax {
            line: &["//", "#"],
            block: &[("/*", "*/")],
        },
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^namespace\s+(?P<name>[\w\\]+)\s*(?:;|\{.*)?$",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(
                r"^use\s+(?:function\s+|const\s+)?(?P<path>[\w\\]+)(?:\s+as\s+\w+)?\s*;",
                RuleAction::Import(ImportKind::Standard),
            )
            .within(RuleContext::TopLevel),
            // trait use inside a class body
            Rule::new(
                r"^use\s+(?P<bases>[\w\\]+(?:\s*,\s*[\w\\]+)*)\s*(?:;|\{)",
                RuleAction::Mixin(Relationship::Implements),
            ),
            Rule::new(
                r#"^(?:require|include)(?:_once)?\s*\(?\s*(?:__DIR__\s*\.\s*)?["'](?P<path>[^"']+)["']"#,
                RuleAction::Import(ImportKind::Relative),
            ),
            Rule::new(
                r"^interface\s+(?P<name>\w+)(?:\s+extends\s+(?P<extends>[^{]+?))?\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^trait\s+(?P<name>\w+)\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^(?:(?:abstract|final|readonly)\s+)*(?:class|enum)\s+(?P<name>\w+)(?:\s*:\s*\w+)?(?:\s+extends\s+(?P<extends>[\w\\]+))?(?:\s+implements\s+(?P<implements>[^{]+?))?\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^(?:(?:public|private|protected|static|abstract|final)\s+)*function\s+&?(?P<name>\w+)\s*\(",
                RuleAction::Function,
            ),
            Rule::new(
                r"^(?:(?:public|private|protected|static|readonly|var)\s+)+(?:\??[\w\\|]+\s+)?\$(?P<name>\w+)",
                RuleAction::FIELD,
            )
            .within(RuleContext::InType),
            Rule::new(
                r"^(?:(?:public|private|protected|final)\s+)*const\s+(?:\w+\s+)?(?P<name>\w+)\s*=",
                RuleAction::CONSTANT,
            ),
            Rule::new(
                r#"^define\s*\(\s*["'](?P<name>\w+)["']"#,
                RuleAction::VARIABLE,
            ),
        ],
        import_block: None,
        imports: ImportConvention::PhpNamespace,
        resolve_extensions: &["php"],
        reserved: RESERVED,
        continuation_prefixes: &["extends ", "implements ", ","],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};

    const SOURCE: &str = r#"<?php
declare(strict_types=1);

namespace App\Models;

use App\Contracts\Billable;
use Illuminate\Database\Eloquent\Model as Eloquent;
require_once __DIR__ . '/helpers.php';

define('APP_VERSION', '1.0');

interface HasName extends Stringable
{
    public function name(): string;
}

trait Timestamps
{
    protected ?string $createdAt = null;
}

final class User extends Eloquent implements HasName, Billable
{
    use Timestamps, SoftDeletes;

    public const TABLE = 'users';
    private array $attributes = [];
    protected static $booted = false;

    public function __construct(array $attributes = [])
    {
        $this->attributes = $attributes;
        $fn = function () use ($attributes) { return 1; };
    }

    public function name(): string
    {
        return "{$this->attributes['name']}";
    }
}

function helper($x) { return $x; }
"#;

    #[test]
    fn test_php_declaration_counts() {
        let out = run(&profile(), "src/Models/User.php", SOURCE);
        assert_eq!(names(&out, SymbolKind::Namespace), vec![r"App\Models"]);
        assert_eq!(
            names(&out, SymbolKind::Import),
            vec![
                r"App\Contracts\Billable",
                r"Illuminate\Database\Eloquent\Model",
                "/helpers.php",
            ]
        );
        assert_eq!(names(&out, SymbolKind::Variable), vec!["APP_VERSION"]);
        assert_eq!(names(&out, SymbolKind::Interface), vec!["HasName", "Timestamps"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["User"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("name".to_string(), Some("HasName".to_string())),
                ("__construct".to_string(), Some("User".to_string())),
                ("name".to_string(), Some("User".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Function), vec!["helper"]);
        assert_eq!(
            names(&out, SymbolKind::Property),
            vec!["createdAt", "TABLE", "attributes", "booted"]
        );
    }

    #[test]
    fn test_php_heritage_and_trait_use() {
        let out = run(&profile(), "src/Models/User.php", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("Stringable".to_string(), "Inherits"),
                ("Eloquent".to_string(), "Inherits"),
                ("HasName".to_string(), "Implements"),
                ("Billable".to_string(), "Implements"),
                ("Timestamps".to_string(), "Implements"),
                ("SoftDeletes".to_string(), "Implements"),
            ]
        );
        assert!(out.nodes.iter().any(|n| n.id == "ns:App.Models"));
    }
}
