//! Per-language extraction profile tables.
//!
//! A [`LanguageProfile`] is pure data: comment and string syntax, the scope
//! tracking mode, an ordered rule cascade and the import convention. The
//! generic [`engine`](super::engine) interprets it line by line, so adding a
//! language means adding a table, not a parser.

use regex::Regex;

use crate::graph::{NodeType, Relationship};
use crate::ingest::{Language, SymbolKind};

/// How the engine decides where a type or namespace body ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// `{` / `}` depth, counted outside strings and comments
    Braces,
    /// Indentation width; a body ends at the first line not indented past
    /// its declaration
    Indentation,
    /// Block-opening keywords balanced by `end`
    EndKeyword,
}

/// Comment delimiters of a language.
#[derive(Debug, Clone, Copy)]
pub struct CommentSyntax {
    /// Line comment prefixes (`//`, `#`, `--`)
    pub line: &'static [&'static str],
    /// Block comment `(open, close)` pairs; also used for docstrings and
    /// multi-line string literals that should not be scanned
    pub block: &'static [(&'static str, &'static str)],
}

/// How an import token becomes candidate repository paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportConvention {
    /// `a.b.C` → `a/b/C.<ext>`, or a namespace directory (Java, Kotlin, Scala, C#)
    DotPackage,
    /// Python modules with leading-dot relative imports and `__init__`
    PythonModule,
    /// `./x`, `../y`, alias (`@/`, `~/`) and bare paths with `index` files
    JsModule,
    /// C/C++ `#include` paths, extension included
    IncludePath,
    /// Go import paths resolved to package directories
    GoPackage,
    /// Rust `use` paths with `crate`/`self`/`super` stripping and `mod` files
    RustModule,
    /// Ruby `require` / `require_relative`
    RubyRequire,
    /// PHP `use A\B\C` and `require 'x.php'`
    PhpNamespace,
    /// Swift `import Module` resolved to a module directory
    SwiftModule,
    /// Dart `package:` and relative URIs
    DartPackage,
}

/// How the entries of a generic `bases` capture are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRule {
    /// Every base is inherited (Python, C++, Ruby superclass)
    AllInherit,
    /// Every base is an implemented interface/protocol
    AllImplement,
    /// `I` followed by an uppercase letter is an interface (C#)
    InterfacePrefix,
    /// First base is the superclass, the rest are interfaces (Swift classes)
    FirstInherits,
    /// Bases written with a constructor call `Base()` are classes (Kotlin)
    CallSyntaxIsClass,
}

/// Where in the scope structure a rule may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleContext {
    /// Any line, including function bodies
    Anywhere,
    /// Declaration level with no enclosing type (file or namespace level)
    TopLevel,
    /// Declaration level directly inside a type body
    InType,
    /// Declaration level, inside a type or not
    Declaration,
}

/// How an import token is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// Resolved by the profile's convention
    Standard,
    /// Resolved against the importing file's directory
    Relative,
    /// Rust `mod foo;`: a child module file of the importing file
    SiblingModule,
}

/// What a matching rule produces.
///
/// Captures read by the engine: `name`, `path`, `names`, `bases`,
/// `extends`, `implements`, `receiver`, `trait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Import statement; `path` holds one token or a comma list, `names`
    /// optional imported members
    Import(ImportKind),
    /// Module declaration that is also a file reference (Rust `mod foo;`)
    ModuleDecl,
    /// Start of a multi-line import block read with the profile's
    /// [`ImportBlock`] pattern
    ImportBlockStart,
    /// Namespace / package / module declaration
    Namespace(SymbolKind),
    /// Type declaration emitting a node of the given type
    Type(NodeType, BaseRule),
    /// Reopens an existing type (`impl X`, `extension X`); `trait`/`bases`
    /// become implemented interfaces of `name`
    Extension,
    /// Base list applied to the enclosing type (Ruby `include`, Go embedding)
    Mixin(Relationship),
    /// Function or method declaration
    Function,
    /// Field/property/constant: kind inside a type, kind at top level
    Member {
        in_type: Option<SymbolKind>,
        top_level: Option<SymbolKind>,
    },
    /// Transparent brace block whose body is still declaration level
    /// (`extern "C" {`)
    Block,
    /// Recognized line that produces nothing
    Skip,
}

impl RuleAction {
    /// Field inside a type, nothing at top level.
    pub const FIELD: RuleAction = RuleAction::Member {
        in_type: Some(SymbolKind::Property),
        top_level: None,
    };

    /// Property inside a type, variable at top level.
    pub const CONSTANT: RuleAction = RuleAction::Member {
        in_type: Some(SymbolKind::Property),
        top_level: Some(SymbolKind::Variable),
    };

    /// Top-level variable only.
    pub const VARIABLE: RuleAction = RuleAction::Member {
        in_type: None,
        top_level: Some(SymbolKind::Variable),
    };

    fn default_context(&self) -> RuleContext {
        match self {
            RuleAction::Import(_) | RuleAction::ImportBlockStart | RuleAction::Skip => {
                RuleContext::Anywhere
            }
            RuleAction::Namespace(_) | RuleAction::Extension | RuleAction::Block => {
                RuleContext::TopLevel
            }
            RuleAction::Mixin(_) => RuleContext::InType,
            RuleAction::ModuleDecl
            | RuleAction::Type(..)
            | RuleAction::Function
            | RuleAction::Member { .. } => RuleContext::Declaration,
        }
    }
}

/// One pattern → action entry of a profile's cascade.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub action: RuleAction,
    pub context: RuleContext,
}

impl Rule {
    /// Build a rule from a static pattern.
    ///
    /// Profile patterns are compile-time literals covered by the profile
    /// tests, so a failure here is a programming error.
    pub fn new(pattern: &str, action: RuleAction) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid profile pattern {:?}: {}", pattern, e));
        Self {
            pattern,
            context: action.default_context(),
            action,
        }
    }

    /// Restrict the rule to a scope context.
    pub fn within(mut self, context: RuleContext) -> Self {
        self.context = context;
        self
    }
}

/// Multi-line import block (Go `import ( ... )`).
#[derive(Debug, Clone)]
pub struct ImportBlock {
    /// Pattern for one entry, capturing `path`
    pub entry: Regex,
    /// Trimmed line prefix that closes the block
    pub end: &'static str,
}

/// Complete extraction table for one language.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    /// Stable profile id (`csharp`, `python`, ...)
    pub id: &'static str,
    /// Inventory language the profile reads
    pub language: Language,
    /// File extensions, lowercase without dot
    pub extensions: &'static [&'static str],
    pub comments: CommentSyntax,
    /// Quote characters opening single-line string literals
    pub string_quotes: &'static [char],
    pub scope_mode: ScopeMode,
    /// Ordered cascade; the first matching rule wins
    pub rules: Vec<Rule>,
    pub import_block: Option<ImportBlock>,
    pub imports: ImportConvention,
    /// Extensions tried when an import token carries none
    pub resolve_extensions: &'static [&'static str],
    /// Words that are never declaration names and never start a declaration
    pub reserved: &'static [&'static str],
    /// Line prefixes continuing a type header (`extends`, `where`, `:`)
    pub continuation_prefixes: &'static [&'static str],
    /// Leading keywords that open an `end`-terminated block
    pub block_openers: &'static [&'static str],
}

impl LanguageProfile {
    /// Whether the profile reads files with this extension.
    pub fn handles_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(&word)
    }
}

/// Build an optional import block.
pub fn import_block(entry: &str, end: &'static str) -> Option<ImportBlock> {
    let entry = Regex::new(entry)
        .unwrap_or_else(|e| panic!("invalid import block pattern {:?}: {}", entry, e));
    Some(ImportBlock { entry, end })
}

/// Common reserved words of C-family languages.
pub const C_FAMILY_RESERVED: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "case", "default", "return",
    "break", "continue", "goto", "throw", "try", "catch", "finally", "new", "delete", "sizeof",
    "typeof", "using", "lock", "yield", "await", "typedef", "operator", "when", "synchronized",
];
