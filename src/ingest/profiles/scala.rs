//! Scala profile.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction, ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

use super::{with_modifiers, C_STYLE_COMMENTS};

const MODIFIERS: &str = r"(?:@[\w.]+(?:\([^)]*\))?\s+)*(?:(?:private|protected|final|sealed|abstract|implicit|lazy|override|case|inline|transparent|opaque|open)(?:\[[\w.]+\])?\s+)*";

const RESERVED: &[&str] = &[
    "if", "else", "match", "for", "while", "do", "yield", "return", "throw", "try",
    "catch", "finally", "new", "this", "super", "null", "true", "false", "given", "using",
    "then", "type",
];

pub fn profile() -> LanguageProfile {
    let m = |template: &str| with_modifiers(template, MODIFIERS);
    LanguageProfile {
        id: "scala",
        language: Language::Scala,
        extensions: &["scala", "sc"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"'],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^package\s+(?:object\s+)?(?P<name>[\w.]+)",
                RuleAction::Namespace(SymbolKind::Namespace),
            ),
            Rule::new(
                r"^import\s+(?P<path>[\w.]+?)(?:\.\{(?P<names>[^}]*)\}|\._|\.\*)?\s*$",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                &m(r"^%M%trait\s+(?P<name>\w+)(?:\[.*?\])?(?:\s+extends\s+(?P<extends>[^{]+?))?\s*(?:\{.*|:\s*)?$"),
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                &m(r"^%M%(?:class|object|enum)\s+(?P<name>\w+)(?:\[.*?\])?(?:\s*(?:private\s+)?\([^)]*(?:\)|$))*(?:\s+extends\s+(?P<bases>[^{]+?))?\s*(?:\{.*|:\s*)?$"),
                RuleAction::Type(NodeType::Class, BaseRule::FirstInherits),
            ),
            Rule::new(
                &m(r"^%M%def\s+(?P<name>\w+|[^\w\s(\[:]+)\s*[\[(:=]"),
                RuleAction::Function,
            ),
            Rule::new(
                &m(r"^%M%(?:val|var)\s+(?P<name>\w+)"),
                RuleAction::CONSTANT,
            ),
        ],
        import_block: None,
        imports: ImportConvention::DotPackage,
        resolve_extensions: &["scala", "sc"],
        reserved: RESERVED,
        continuation_prefixes: &["extends ", "with ", ","],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};

    const SOURCE: &str = r#"package com.acme.billing

import scala.collection.mutable
import com.acme.core.{Money, Currency}

trait Billable extends Serializable {
  def total: Money
}

sealed abstract class Invoice(val id: Long) extends Document(id) with Billable with Ordered[Invoice] {
  private val lines = mutable.ListBuffer.empty[Line]

  def add(line: Line): Unit = {
    val copy = line
    lines += copy
  }

  override def total: Money = lines.map(_.amount).sum
}

case class Line(amount: Money)

object Invoice {
  def empty(id: Long): Invoice = ???
}
"#;

    #[test]
    fn test_scala_declaration_counts() {
        let out = run(&profile(), "src/main/scala/com/acme/billing/Invoice.scala", SOURCE);
        assert_eq!(names(&out, SymbolKind::Namespace), vec!["com.acme.billing"]);
        assert_eq!(
            names(&out, SymbolKind::Import),
            vec!["scala.collection.mutable", "com.acme.core"]
        );
        assert_eq!(out.imports[1].names, vec!["Money", "Currency"]);
        assert_eq!(names(&out, SymbolKind::Interface), vec!["Billable"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Invoice", "Line", "Invoice"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("total".to_string(), Some("Billable".to_string())),
                ("add".to_string(), Some("Invoice".to_string())),
                ("total".to_string(), Some("Invoice".to_string())),
                ("empty".to_string(), Some("Invoice".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Property), vec!["lines"]);
    }

    #[test]
    fn test_case_classes_and_objects() {
        let source = "sealed trait Shape\ncase class Square(side: Int) extends Shape\ncase object Empty extends Shape\n\nobject Area {\n  def of(s: Shape): Int = s match {\n    case Square(n) => n * n\n    case Empty => 0\n  }\n}\n";
        let out = run(&profile(), "Shape.scala", source);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Square", "Empty", "Area"]);
        assert_eq!(names(&out, SymbolKind::Method), vec!["of"]);
    }

    #[test]
    fn test_scala_extends_then_mixins() {
        let out = run(&profile(), "Invoice.scala", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("Serializable".to_string(), "Inherits"),
                ("Document".to_string(), "Inherits"),
                ("Billable".to_string(), "Implements"),
                ("Ordered".to_string(), "Implements"),
            ]
        );
    }
}
