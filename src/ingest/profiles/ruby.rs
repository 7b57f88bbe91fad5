//! Ruby profile: `end`-terminated scopes.

use crate::graph::{NodeType, Relationship};
use crate::ingest::profile::{
    BaseRule, CommentSyntax, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction,
    RuleContext, ScopeMode,
};
use crate::ingest::{Language, SymbolKind};

const RESERVED: &[&str] = &[
    "if", "unless", "while", "until", "case", "when", "else", "elsif", "begin", "rescue",
    "ensure", "end", "return", "yield", "do", "then", "self", "super", "nil", "true", "false",
    "and", "or", "not", "raise",
];

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "ruby",
        language: Language::Ruby,
        extensions: &["rb", "rake", "gemspec"],
        comments: CommentSyntax {
            line: &["#"],
            block: &[("=begin", "=end")],
        },
        string_quotes: &['"', '\''],
        scope_mode: ScopeMode::EndKeyword,
        rules: vec![
            Rule::new(
                r#"^require_relative\s*\(?\s*["'](?P<path>[^"']+)["']"#,
                RuleAction::Import(ImportKind::Relative),
            ),
            Rule::new(
                r#"^require\s*\(?\s*["'](?P<path>[^"']+)["']"#,
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                r"^module\s+(?P<name>[\w:]+)",
                RuleAction::Namespace(SymbolKind::Module),
            ),
            // singleton class body: methods still belong to the outer class
            Rule::new(r"^class\s*<<\s*self\b", RuleAction::Block).within(RuleContext::InType),
            Rule::new(
                r"^class\s+(?:\w+::)*(?P<name>\w+)(?:\s*<\s*(?P<extends>[\w:]+))?",
                RuleAction::Type(NodeType::Class, BaseRule::AllInherit),
            ),
            Rule::new(
                r"^(?:(?:private|protected|public|module_function)\s+)?def\s+(?:self\.)?(?P<name>\w+[?!=]?)",
                RuleAction::Function,
            ),
            Rule::new(
                r"^(?:include|extend|prepend)\s+(?P<bases>[\w:]+(?:\s*,\s*[\w:]+)*)",
                RuleAction::Mixin(Relationship::Implements),
            ),
            Rule::new(
                r"^attr_(?:reader|writer|accessor)\s+(?P<names>.+)$",
                RuleAction::FIELD,
            ),
            Rule::new(
                r"^(?P<name>[A-Z][A-Z0-9_]*)\s*=(?:[^=]|$)",
                RuleAction::CONSTANT,
            ),
        ],
        import_block: None,
        imports: ImportConvention::RubyRequire,
        resolve_extensions: &["rb"],
        reserved: RESERVED,
        continuation_prefixes: &[],
        block_openers: &[
            "class", "module", "def", "if", "unless", "while", "until", "case", "begin", "for",
            "do",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};

    const SOURCE: &str = r#"require "json"
require_relative "../lib/base_model"

=begin
class Hidden
end
=end

module Billing
  TAX_RATE = 0.2

  class Invoice < BaseModel
    include Comparable, Auditable
    extend Finders
    attr_reader :total, :lines

    class << self
      def create(attrs)
        new(attrs)
      end
    end

    def initialize(lines)
      @lines = lines
      @total = lines.sum { |l| l.amount }
      if @total > 100
        apply_discount
      end
    end

    def paid?; @paid; end

    private def apply_discount
      items.each do |i|
        i.discount!
      end
    end
  end

  class Line < Struct.new(:amount)
  end
end

def helper
  "end"
end
"#;

    #[test]
    fn test_ruby_declaration_counts() {
        let out = run(&profile(), "lib/billing/invoice.rb", SOURCE);
        assert_eq!(names(&out, SymbolKind::Import), vec!["json", "../lib/base_model"]);
        assert_eq!(out.imports[1].kind, ImportKind::Relative);
        assert_eq!(names(&out, SymbolKind::Module), vec!["Billing"]);
        assert_eq!(names(&out, SymbolKind::Variable), vec!["TAX_RATE"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Invoice", "Line"]);
        let invoice = Some("Invoice".to_string());
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("create".to_string(), invoice.clone()),
                ("initialize".to_string(), invoice.clone()),
                ("paid?".to_string(), invoice.clone()),
                ("apply_discount".to_string(), invoice),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Function), vec!["helper"]);
        assert_eq!(names(&out, SymbolKind::Property), vec!["total", "lines"]);
    }

    #[test]
    fn test_ruby_superclass_and_mixins() {
        let out = run(&profile(), "lib/billing/invoice.rb", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("BaseModel".to_string(), "Inherits"),
                ("Comparable".to_string(), "Implements"),
                ("Auditable".to_string(), "Implements"),
                ("Finders".to_string(), "Implements"),
                ("Struct".to_string(), "Inherits"),
            ]
        );
        let invoice = out.symbols.iter().find(|s| s.name == "Invoice").unwrap();
        assert_eq!(invoice.parent_symbol.as_deref(), Some("Billing"));
    }

    #[test]
    fn test_module_is_a_mixin_target() {
        let out = run(&profile(), "lib/auditable.rb", "module Auditable\n  def audit; end\nend\n");
        assert_eq!(out.types.len(), 1);
        assert_eq!(out.types[0].name, "Auditable");
        assert_eq!(out.types[0].node_type, NodeType::Namespace);
        assert_eq!(names(&out, SymbolKind::Function), vec!["audit"]);
    }
}
