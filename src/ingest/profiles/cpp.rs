//! C++ profile: the C-family rules over C++ source extensions.

use crate::ingest::profile::{ImportConvention, LanguageProfile, ScopeMode};
use crate::ingest::Language;

use super::c::{c_family_rules, CONTINUATION, RESERVED};
use super::C_STYLE_COMMENTS;

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "cpp",
        language: Language::Cpp,
        extensions: &["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++", "ipp"],
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Relationship;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};
    use crate::ingest::SymbolKind;

    const SOURCE: &str = r#"#include "shape.h"

namespace geo {
namespace detail {
int helper(int v) { return v; }
}

class Shape {
public:
    virtual ~Shape() = default;
    virtual double area() const = 0;
protected:
    int id_;
};

class Circle : public Shape, private Printable {
public:
    explicit Circle(double r);
    double area() const override;
private:
    double radius_;
};

double Circle::area() const {
    return 3.14 * radius_ * radius_;
}
}
"#;

    #[test]
    fn test_cpp_declaration_counts() {
        let out = run(&profile(), "src/shape.cpp", SOURCE);
        assert_eq!(names(&out, SymbolKind::Namespace), vec!["geo", "detail"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Shape", "Circle"]);
        assert_eq!(names(&out, SymbolKind::Function), vec!["helper"]);
        assert_eq!(names(&out, SymbolKind::Property), vec!["id_", "radius_"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("~Shape".to_string(), Some("Shape".to_string())),
                ("area".to_string(), Some("Shape".to_string())),
                ("Circle".to_string(), Some("Circle".to_string())),
                ("area".to_string(), Some("Circle".to_string())),
                ("area".to_string(), Some("Circle".to_string())),
            ]
        );
    }

    #[test]
    fn test_cpp_one_line_definitions() {
        let source = "inline int clamp(int v) { return v < 0 ? 0 : v; }\n\nclass Counter {\npublic:\n    int get() const { return n_; }\nprivate:\n    int n_;\n};\n\nvoid Counter::reset() noexcept { n_ = 0; }\n";
        let out = run(&profile(), "counter.hpp", source);
        assert_eq!(names(&out, SymbolKind::Function), vec!["clamp"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("get".to_string(), Some("Counter".to_string())),
                ("reset".to_string(), Some("Counter".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Property), vec!["n_"]);
    }

    #[test]
    fn test_cpp_nested_namespace_and_bases() {
        let out = run(&profile(), "src/shape.cpp", SOURCE);
        assert!(out.nodes.iter().any(|n| n.id == "ns:geo.detail"));
        assert!(out
            .edges
            .iter()
            .any(|e| e.source == "ns:geo" && e.target == "class:src/shape.Shape"
                && e.relationship == Relationship::Contains));
        assert_eq!(
            bases(&out),
            vec![("Shape".to_string(), "Inherits"), ("Printable".to_string(), "Inherits")]
        );
    }
}
