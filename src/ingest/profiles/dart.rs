//! Dart profile.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, CommentSyntax, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction,
    ScopeMode,
};
use crate::ingest::Language;

const RESERVED: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "return", "break",
    "continue", "throw", "try", "catch", "finally", "new", "assert", "await", "yield",
    "rethrow", "in", "is", "as", "super", "this",
];

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "dart",
        language: Language::Dart,
        extensions: &["dart"],
        comments: CommentSyntax {
            line: &["//"],
            block: &[("/*", "*/"), ("'''", "'''"), ("\"\"\"", "\"\"\"")],
        },
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r#"^(?:import|export)\s+["'](?P<path>[^"']+)["']"#,
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                r#"^part\s+(?:of\s+)?["'](?P<path>[^"']+)["']"#,
                RuleAction::Import(ImportKind::Relative),
            ),
            Rule::new(r"^(?:library|part\s+of|typedef)\b", RuleAction::Skip),
            Rule::new(
                r"^(?:base\s+)?mixin\s+(?P<name>\w+)(?:<.*?>)?(?:\s+on\s+(?P<extends>[^{]+?))?\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^(?:(?:abstract|base|final|interface|sealed|mixin)\s+)*class\s+(?P<name>\w+)(?:<.*?>)?(?:\s+extends\s+(?P<extends>[\w.]+(?:<.*?>)?))?(?:\s+with\s+(?P<bases>[^{]+?))?(?:\s+implements\s+(?P<implements>[^{]+?))?\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Class, BaseRule::AllImplement),
            ),
            Rule::new(
                r"^enum\s+(?P<name>\w+)(?:<.*?>)?(?:\s+with\s+(?P<bases>[^{]+?))?(?:\s+implements\s+(?P<implements>[^{]+?))?\s*(?:\{.*)?$",
                RuleAction::Type(NodeType::Class, BaseRule::AllImplement),
            ),
            Rule::new(
                r"^extension\s+(?:\w+(?:<.*?>)?\s+)?on\s+(?P<name>[\w.]+(?:<.*?>)?)\s*(?:\{.*)?$",
                RuleAction::Extension,
            ),
            Rule::new(
                r"^(?:static\s+)?(?:[\w<>?,\s]+\s+)?(?:get|set)\s+(?P<name>\w+)",
                RuleAction::Function,
            ),
            Rule::new(
                r"^(?:(?:static|external|factory|const|abstract)\s+)*(?:[\w<>?,\[\]\s.]*[\w>?\]]\s+)?(?P<name>[\w.]+)\s*(?:<[^>]*>)?\s*\(",
                RuleAction::Function,
            ),
            Rule::new(
                r"^(?:(?:static|final|const|late|var|external|covariant)\s+)*(?:[\w<>?,\[\]\s.]*[\w>?\]]\s+)?(?P<name>\w+)\s*(?:=.*|;)$",
                RuleAction::CONSTANT,
            ),
        ],
        import_block: None,
        imports: ImportConvention::DartPackage,
        resolve_extensions: &["dart"],
        reserved: RESERVED,
        continuation_prefixes: &["extends ", "with ", "implements ", ","],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};
    use crate::ingest::SymbolKind;

    const SOURCE: &str = r#"library shapes;

import 'dart:math';
import 'package:shapes/src/base.dart';
export 'src/circle.dart';
part 'shapes.g.dart';

const double tau = 2 * pi;
final registry = <String, Shape>{};

typedef Builder = Shape Function();

mixin Printable on Object {
  void printMe() => print(this);
}

abstract class Shape extends Base with Printable, Comparable implements Measurable {
  static const int sides = 0;
  final String name;
  late double _cache;

  Shape(this.name);

  Shape.unit() : name = 'unit';

  factory Shape.fromJson(Map<String, dynamic> json) {
    return Circle(json['r'] as double);
  }

  double get area;

  @override
  String toString() {
    return '$name';
  }
}

enum Color with Printable { red, green }

extension ShapeX on Shape {
  bool get isBig => area > 10;
}

void main() {
  final s = Shape.unit();
}
"#;

    #[test]
    fn test_dart_declaration_counts() {
        let out = run(&profile(), "lib/src/shape.dart", SOURCE);
        assert_eq!(
            names(&out, SymbolKind::Import),
            vec![
                "dart:math",
                "package:shapes/src/base.dart",
                "src/circle.dart",
                "shapes.g.dart",
            ]
        );
        assert_eq!(names(&out, SymbolKind::Variable), vec!["tau", "registry"]);
        assert_eq!(names(&out, SymbolKind::Interface), vec!["Printable"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Shape", "Color"]);
        let shape = Some("Shape".to_string());
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("printMe".to_string(), Some("Printable".to_string())),
                ("Shape".to_string(), shape.clone()),
                ("Shape.unit".to_string(), shape.clone()),
                ("Shape.fromJson".to_string(), shape.clone()),
                ("area".to_string(), shape.clone()),
                ("toString".to_string(), shape.clone()),
                ("isBig".to_string(), shape),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Property), vec!["sides", "name", "_cache"]);
        assert_eq!(names(&out, SymbolKind::Function), vec!["main"]);
    }

    #[test]
    fn test_dart_mixins_are_implemented() {
        let out = run(&profile(), "lib/src/shape.dart", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("Object".to_string(), "Inherits"),
                ("Base".to_string(), "Inherits"),
                ("Measurable".to_string(), "Implements"),
                ("Printable".to_string(), "Implements"),
                ("Comparable".to_string(), "Implements"),
                ("Printable".to_string(), "Implements"),
            ]
        );
        assert_eq!(out.imports[3].kind, ImportKind::Relative);
    }
}
