//! Swift profile.

use crate::graph::NodeType;
use crate::ingest::profile::{
    BaseRule, CommentSyntax, ImportConvention, ImportKind, LanguageProfile, Rule, RuleAction,
    ScopeMode,
};
use crate::ingest::Language;

use super::with_modifiers;

const MODIFIERS: &str = r"(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:(?:public|private|fileprivate|internal|open)(?:\(set\))?|final|static|class|override|mutating|nonmutating|convenience|required|lazy|weak|unowned|dynamic|indirect|nonisolated|async)\s+)*";

const RESERVED: &[&str] = &[
    "if", "guard", "else", "for", "while", "repeat", "switch", "case", "default", "return",
    "break", "continue", "throw", "try", "catch", "defer", "do", "in", "where", "as", "is",
    "self", "Self", "super", "nil", "true", "false",
];

pub fn profile() -> LanguageProfile {
    let m = |template: &str| with_modifiers(template, MODIFIERS);
    LanguageProfile {
        id: "swift",
        language: Language::Swift,
        extensions: &["swift"],
        comments: CommentSyntax {
            line: &["//"],
            block: &[("/*", "*/"), ("\"\"\"", "\"\"\"")],
        },
        string_quotes: &['"'],
        scope_mode: ScopeMode::Braces,
        rules: vec![
            Rule::new(
                r"^(?:@testable\s+)?import\s+(?:(?:class|struct|enum|protocol|func|var|typealias)\s+)?(?P<path>[\w.]+)",
                RuleAction::Import(ImportKind::Standard),
            ),
            Rule::new(
                &m(r"^%M%protocol\s+(?P<name>\w+)(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:where\b.*|\{.*)?$"),
                RuleAction::Type(NodeType::Interface, BaseRule::AllInherit),
            ),
            Rule::new(
                &m(r"^%M%(?:class|actor)\s+(?P<name>\w+)(?:<.*?>)?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:where\b.*|\{.*)?$"),
                RuleAction::Type(NodeType::Class, BaseRule::FirstInherits),
            ),
            Rule::new(
                &m(r"^%M%(?:struct|enum)\s+(?P<name>\w+)(?:<.*?>)?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:where\b.*|\{.*)?$"),
                RuleAction::Type(NodeType::Class, BaseRule::AllImplement),
            ),
            Rule::new(
                &m(r"^%M%extension\s+(?P<name>[\w.]+)(?:<.*?>)?(?:\s*:\s*(?P<bases>[^{]+?))?\s*(?:where\b.*|\{.*)?$"),
                RuleAction::Extension,
            ),
            Rule::new(&m(r"^%M%typealias\b"), RuleAction::Skip),
            Rule::new(
                &m(r"^%M%func\s+(?P<name>\w+|[^\w\s(<]+)\s*[<(]"),
                RuleAction::Function,
            ),
            Rule::new(
                &m(r"^%M%(?P<name>init|deinit)\b\s*[?!]?\s*[<({]"),
                RuleAction::Function,
            ),
            Rule::new(
                &m(r"^%M%(?:var|let)\s+(?P<name>\w+)"),
                RuleAction::CONSTANT,
            ),
        ],
        import_block: None,
        imports: ImportConvention::SwiftModule,
        resolve_extensions: &["swift"],
        reserved: RESERVED,
        continuation_prefixes: &[":", "where ", ","],
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};
    use crate::ingest::SymbolKind;

    const SOURCE: &str = r#"import Foundation
@testable import Core

protocol Shape: CustomStringConvertible {
    var area: Double { get }
    func scaled(by factor: Double) -> Self
}

public final class Circle: Figure, Shape, Equatable {
    public let radius: Double
    private(set) var label = "circle"

    init(radius: Double) {
        self.radius = radius
    }

    deinit {
        print("bye")
    }

    public func scaled(by factor: Double) -> Circle {
        let r = radius * factor
        return Circle(radius: r)
    }

    static func == (lhs: Circle, rhs: Circle) -> Bool {
        return lhs.radius == rhs.radius
    }
}

struct Point: Hashable {
    var x = 0
    var y = 0
}

enum Direction {
    case north, south
}

extension Point: Codable {
    func moved() -> Point { self }
}

let origin = Point()

func main() {
    let text = """
    class Fake {
    """
}
"#;

    #[test]
    fn test_swift_declaration_counts() {
        let out = run(&profile(), "Sources/Geometry/Shapes.swift", SOURCE);
        assert_eq!(names(&out, SymbolKind::Import), vec!["Foundation", "Core"]);
        assert_eq!(names(&out, SymbolKind::Interface), vec!["Shape"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Circle", "Point", "Direction"]);
        let circle = Some("Circle".to_string());
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("scaled".to_string(), Some("Shape".to_string())),
                ("init".to_string(), circle.clone()),
                ("deinit".to_string(), circle.clone()),
                ("scaled".to_string(), circle.clone()),
                ("==".to_string(), circle),
                ("moved".to_string(), Some("Point".to_string())),
            ]
        );
        assert_eq!(
            names(&out, SymbolKind::Property),
            vec!["area", "radius", "label", "x", "y"]
        );
        assert_eq!(names(&out, SymbolKind::Variable), vec!["origin"]);
        assert_eq!(names(&out, SymbolKind::Function), vec!["main"]);
    }

    #[test]
    fn test_swift_conformances() {
        let out = run(&profile(), "Shapes.swift", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("CustomStringConvertible".to_string(), "Inherits"),
                ("Figure".to_string(), "Inherits"),
                ("Shape".to_string(), "Implements"),
                ("Equatable".to_string(), "Implements"),
                ("Hashable".to_string(), "Implements"),
                ("Codable".to_string(), "Implements"),
            ]
        );
    }
}
