//! Generic line scanner driven by a [`LanguageProfile`].
//!
//! One pass over a file:
//! 1. strip comments (line and block, tracked across lines) while keeping
//!    string literals, and build a string-blanked copy for brace counting
//! 2. track scopes by brace depth, indentation or `end` keywords
//! 3. run the profile's rule cascade on each code line (first match wins)
//!
//! The scanner never fails: a line no rule recognizes produces nothing.
//! Cross-file work (import resolution, base type linking) is left to the
//! extractor as [`PendingImport`] / [`PendingBase`] records.

use regex::Captures;

use crate::common::{file_name, strip_extension};
use crate::graph::{ids, GraphEdge, GraphNode, NodeType, Relationship};
use crate::ingest::profile::{
    BaseRule, CommentSyntax, ImportKind, LanguageProfile, RuleAction, RuleContext, ScopeMode,
};
use crate::ingest::{Symbol, SymbolKind};

/// Width of a tab when measuring indentation.
const TAB_WIDTH: usize = 4;

/// Import statement awaiting repository-level resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    /// Import token as written (`a.b.C`, `./util`, `crate::x`)
    pub token: String,
    /// Imported member names (`from x import a, b`)
    pub names: Vec<String>,
    pub kind: ImportKind,
    pub line: usize,
}

/// Declaring side of an inheritance reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseSource {
    /// A type node declared in this file
    Node { id: String, node_type: NodeType },
    /// A type known only by name (`impl Trait for Foo`, `extension Foo`)
    TypeName(String),
}

/// Base type / interface / mixin reference awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBase {
    pub source: BaseSource,
    /// Simple name of the referenced base
    pub base: String,
    /// Relationship implied by the declaration syntax
    pub hint: Relationship,
    pub line: usize,
}

/// Type (or mixin-able module) declared in a file, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: String,
    pub id: String,
    pub node_type: NodeType,
}

/// Everything one file contributes before cross-file linking.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub symbols: Vec<Symbol>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub imports: Vec<PendingImport>,
    pub bases: Vec<PendingBase>,
    pub types: Vec<DeclaredType>,
}

/// Run a profile over one file's text.
///
/// # Arguments
/// * `profile` - Language table to interpret
/// * `rel_path` - Repository-relative path with `/` separators
/// * `source` - File contents
///
/// # Guarantees
/// - Pure function: same input → same output
/// - The file's module node is always the first node
pub fn extract_file(profile: &LanguageProfile, rel_path: &str, source: &str) -> FileExtraction {
    FileScanner::new(profile, rel_path).run(source)
}

/// Module node for a file, emitted even when the file is too large to scan.
pub fn module_node(profile: &LanguageProfile, rel_path: &str) -> GraphNode {
    GraphNode::new(ids::module(rel_path), file_name(rel_path), NodeType::Module)
        .with_file(rel_path)
        .with_meta("language", profile.id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Namespace,
    Type,
    Function,
    Block,
}

#[derive(Debug, Clone)]
struct Scope {
    kind: ScopeKind,
    /// Qualified namespace name, or type name qualified within the file
    name: String,
    node_id: Option<String>,
    node_type: Option<NodeType>,
    /// Depth (counted modes) or indentation (indentation mode) at declaration
    entry: usize,
    opened: bool,
}

impl Scope {
    fn new(kind: ScopeKind, name: String, entry: usize) -> Self {
        Self {
            kind,
            name,
            node_id: None,
            node_type: None,
            entry,
            opened: false,
        }
    }
}

/// Comment stripping state carried across lines.
struct LineCleaner<'p> {
    comments: &'p CommentSyntax,
    quotes: &'p [char],
    block_end: Option<&'static str>,
}

/// One source line with comments removed.
struct CleanLine {
    /// Comments removed, strings kept (rules match against this)
    code: String,
    /// Comments removed, string contents blanked (braces are counted on this)
    blanked: String,
}

impl<'p> LineCleaner<'p> {
    fn new(comments: &'p CommentSyntax, quotes: &'p [char]) -> Self {
        Self {
            comments,
            quotes,
            block_end: None,
        }
    }

    fn clean(&mut self, raw: &str) -> CleanLine {
        let mut code = String::with_capacity(raw.len());
        let mut blanked = String::with_capacity(raw.len());
        let mut in_string: Option<char> = None;
        let mut escaped = false;
        let mut skip_until = 0;

        for (i, c) in raw.char_indices() {
            if i < skip_until {
                continue;
            }
            let rest = &raw[i..];

            if let Some(end) = self.block_end {
                if rest.starts_with(end) {
                    self.block_end = None;
                    skip_until = i + end.len();
                    code.push(' ');
                    blanked.push(' ');
                }
                continue;
            }

            if let Some(quote) = in_string {
                code.push(c);
                blanked.push(' ');
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    in_string = None;
                }
                continue;
            }

            if self.comments.line.iter().any(|p| rest.starts_with(p)) {
                break;
            }
            if let Some(&(open, close)) = self.comments.block.iter().find(|(o, _)| rest.starts_with(o)) {
                self.block_end = Some(close);
                skip_until = i + open.len();
                code.push(' ');
                blanked.push(' ');
                continue;
            }
            if self.quotes.contains(&c) {
                in_string = Some(c);
                code.push(c);
                blanked.push(' ');
                continue;
            }
            code.push(c);
            blanked.push(c);
        }

        CleanLine { code, blanked }
    }
}

/// Depth before/after a line and the highest depth reached inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DepthTrace {
    after: usize,
    max: usize,
}

fn brace_trace(blanked: &str, before: usize) -> DepthTrace {
    let mut depth = before;
    let mut max = before;
    for c in blanked.chars() {
        match c {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    DepthTrace { after: depth, max }
}

/// Openers that still open a block when they follow an assignment.
const ASSIGNED_OPENERS: &[&str] = &["if", "unless", "case", "begin", "while", "until"];

const LOOP_KEYWORDS: &[&str] = &["while", "until", "for"];

fn keyword_trace(blanked: &str, before: usize, openers: &[&str]) -> DepthTrace {
    let mut depth = before;
    let mut max = before;
    let words = blanked
        .match_indices(|c: char| c.is_alphanumeric() || c == '_')
        .fold(Vec::<(usize, String)>::new(), |mut acc, (idx, s)| {
            match acc.last_mut() {
                Some((start, word)) if *start + word.len() == idx => word.push_str(s),
                _ => acc.push((idx, s.to_string())),
            }
            acc
        });

    // `while x do` opens one block, not two
    let loop_header = words
        .first()
        .is_some_and(|(_, w)| LOOP_KEYWORDS.contains(&w.as_str()));

    for (n, (offset, word)) in words.iter().enumerate() {
        let preceding = &blanked[..*offset];
        // `x.end` / `:end` are method calls and symbols, not keywords
        if preceding.ends_with('.') || preceding.ends_with(':') {
            continue;
        }
        let opens = if n == 0 {
            openers.contains(&word.as_str())
        } else {
            (word == "do" && !loop_header)
                || word == "def"
                || (ASSIGNED_OPENERS.contains(&word.as_str())
                    && preceding.trim_end().ends_with('='))
        };
        if opens {
            depth += 1;
            max = max.max(depth);
        } else if word == "end" {
            depth = depth.saturating_sub(1);
        }
    }
    DepthTrace { after: depth, max }
}

fn bracket_balance(blanked: &str, before: usize) -> usize {
    blanked.chars().fold(before, |depth, c| match c {
        '(' | '[' => depth + 1,
        ')' | ']' => depth.saturating_sub(1),
        _ => depth,
    })
}

fn indent_width(raw: &str) -> usize {
    let mut width = 0;
    for c in raw.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH,
            _ => break,
        }
    }
    width
}

fn leading_word(code: &str) -> &str {
    let end = code
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(code.len());
    &code[..end]
}

/// Remove bracketed sections (generic arguments) at any nesting depth.
fn strip_brackets(text: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
        } else if depth == 0 {
            out.push(c);
        }
    }
    out
}

/// Keywords that may precede a base name in a base list.
const BASE_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "virtual", "internal", "open", "final", "sealed",
    "abstract", "override", "unsafe", "dyn", "impl", "extends", "implements", "with", "on",
];

/// One entry of a base list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BaseRef {
    pub name: String,
    /// Written with a constructor call, `Base(args)`
    pub called: bool,
}

/// Split a raw base list into simple base names.
///
/// Handles `,`, `+`, `&` and `with` separators, generic arguments,
/// constructor calls, access specifiers, delegation (`by x`) and qualified
/// names (last segment wins).
pub(crate) fn split_bases(raw: &str) -> Vec<BaseRef> {
    let without_generics = strip_brackets(&strip_brackets(raw, '<', '>'), '[', ']');
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut called = false;
    let mut paren_depth = 0usize;

    let flush = |current: &mut String, called: &mut bool, entries: &mut Vec<BaseRef>| {
        if let Some(name) = clean_base_entry(current) {
            entries.push(BaseRef {
                name,
                called: *called,
            });
        }
        current.clear();
        *called = false;
    };

    for c in without_generics.chars() {
        match c {
            '(' => {
                paren_depth += 1;
                called = true;
            }
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if paren_depth > 0 => {}
            ',' | '+' | '&' => flush(&mut current, &mut called, &mut entries),
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut called, &mut entries);

    // `A with B with C` arrives as one entry per comma group; split further
    entries
        .into_iter()
        .flat_map(|entry| {
            if entry.name.contains(' ') {
                entry
                    .name
                    .split_whitespace()
                    .filter(|w| !BASE_MODIFIERS.contains(w))
                    .map(|w| BaseRef {
                        name: w.to_string(),
                        called: entry.called,
                    })
                    .collect::<Vec<_>>()
            } else {
                vec![entry]
            }
        })
        .collect()
}

fn clean_base_entry(entry: &str) -> Option<String> {
    let entry = entry.split(" by ").next().unwrap_or(entry);
    let entry = entry.split(" where ").next().unwrap_or(entry);
    let words: Vec<&str> = entry
        .split_whitespace()
        .filter(|w| !BASE_MODIFIERS.contains(w) && !w.starts_with('\''))
        .collect();
    if words.is_empty() {
        return None;
    }
    let mut names = Vec::new();
    for word in words {
        let simple = word
            .rsplit(|c| c == '.' || c == ':' || c == '\\')
            .find(|s| !s.is_empty())
            .unwrap_or(word)
            .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
        if is_identifier(simple) {
            names.push(simple.to_string());
        }
    }
    if names.is_empty() {
        None
    } else {
        Some(names.join(" "))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Split a member list (`:a, :b`, `$x`, `a, b`) into bare names.
fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|n| {
            let n = n.split(" as ").next().unwrap_or(n);
            n.trim()
                .trim_start_matches(|c: char| matches!(c, ':' | '$' | '@' | '&' | '*'))
                .trim()
                .to_string()
        })
        // `#count`: private class fields keep their sigil
        .filter(|n| is_identifier(n.strip_prefix('#').unwrap_or(n)))
        .collect()
}

/// Split an import capture into tokens (`a, b as c` → `a`, `b`).
fn split_import_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.split(" as ").next().unwrap_or(t).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Simple type name of a method receiver (`*Server`, `&mut Foo<T>`, `Foo::`).
fn clean_receiver(raw: &str) -> Option<String> {
    let stripped = strip_brackets(raw, '<', '>');
    let last = stripped
        .split(|c: char| c.is_whitespace() || c == '*' || c == '&')
        .filter(|w| !w.is_empty() && *w != "mut" && *w != "const")
        .last()?;
    let last = last.trim_end_matches(':').trim_end_matches('.');
    let simple = last.rsplit(|c| c == '.' || c == ':').find(|s| !s.is_empty())?;
    if is_identifier(simple) {
        Some(simple.to_string())
    } else {
        None
    }
}

fn normalize_namespace(raw: &str) -> String {
    raw.trim()
        .replace("::", ".")
        .replace('\\', ".")
        .trim_matches('.')
        .to_string()
}

struct FileScanner<'p> {
    profile: &'p LanguageProfile,
    rel_path: &'p str,
    logical_path: &'p str,
    module_id: String,
    cleaner: LineCleaner<'p>,
    scopes: Vec<Scope>,
    /// Statement-style package/namespace covering the rest of the file
    file_namespace: Option<(String, String)>,
    depth: usize,
    /// Depth or indentation recorded for scopes opened on the current line
    line_entry: usize,
    /// Unclosed `(` / `[` carried over from previous lines
    bracket_depth: usize,
    in_import_block: bool,
    out: FileExtraction,
}

impl<'p> FileScanner<'p> {
    fn new(profile: &'p LanguageProfile, rel_path: &'p str) -> Self {
        Self {
            profile,
            rel_path,
            logical_path: strip_extension(rel_path),
            module_id: ids::module(rel_path),
            cleaner: LineCleaner::new(&profile.comments, profile.string_quotes),
            scopes: Vec::new(),
            file_namespace: None,
            depth: 0,
            line_entry: 0,
            bracket_depth: 0,
            in_import_block: false,
            out: FileExtraction::default(),
        }
    }

    fn run(mut self, source: &str) -> FileExtraction {
        self.out.nodes.push(module_node(self.profile, self.rel_path));

        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let clean = self.cleaner.clean(raw);
            let code = clean.code.trim();
            if code.is_empty() {
                continue;
            }
            if self.in_import_block {
                self.import_block_line(code, line);
                continue;
            }

            // Lines inside an unclosed `(` or `[` continue a parameter or
            // argument list and never start a declaration
            let continuing = self.bracket_depth > 0;
            self.bracket_depth = bracket_balance(&clean.blanked, self.bracket_depth);
            if code.ends_with([';', '{', '}']) {
                self.bracket_depth = 0;
            }

            match self.profile.scope_mode {
                ScopeMode::Indentation => {
                    if !continuing {
                        self.indented_line(raw, code, line);
                    }
                }
                ScopeMode::Braces | ScopeMode::EndKeyword => {
                    self.counted_line(code, &clean.blanked, line, continuing)
                }
            }
        }

        self.out
    }

    fn indented_line(&mut self, raw: &str, code: &str, line: usize) {
        let indent = indent_width(raw);
        while matches!(self.scopes.last(), Some(top) if indent <= top.entry) {
            self.scopes.pop();
        }
        let at_declaration = !matches!(self.scopes.last(), Some(s) if s.kind == ScopeKind::Function);
        self.line_entry = indent;
        self.apply_rules(code, line, at_declaration);
    }

    fn counted_line(&mut self, code: &str, blanked: &str, line: usize, continuing: bool) {
        let before = self.depth;
        let trace = match self.profile.scope_mode {
            ScopeMode::EndKeyword => keyword_trace(blanked, before, self.profile.block_openers),
            _ => brace_trace(blanked, before),
        };

        let mut pushed = false;
        if !continuing {
            self.discard_pending(code, before);
            let at_declaration = before == self.declaration_depth();
            let scopes_before = self.scopes.len();
            self.line_entry = before;
            self.apply_rules(code, line, at_declaration);
            pushed = self.scopes.len() > scopes_before;
        }

        self.depth = trace.after;
        for scope in self.scopes.iter_mut() {
            if !scope.opened && trace.max > scope.entry {
                scope.opened = true;
            }
        }

        // `struct Foo;`, `record P(int X);`: a declaration without a body
        if pushed && code.ends_with(';') {
            if let Some(top) = self.scopes.last() {
                if !top.opened {
                    self.pop_pending();
                }
            }
        }

        while matches!(self.scopes.last(), Some(top) if top.opened && self.depth <= top.entry) {
            self.scopes.pop();
        }
    }

    /// Drop a scope whose body never opened once another statement starts
    /// at its level.
    fn discard_pending(&mut self, code: &str, before: usize) {
        let Some(top) = self.scopes.last() else {
            return;
        };
        if top.opened || before != top.entry || code.starts_with('{') {
            return;
        }
        if self
            .profile
            .continuation_prefixes
            .iter()
            .any(|p| code.starts_with(p))
        {
            return;
        }
        self.pop_pending();
    }

    /// Pop an unopened scope; a namespace becomes the file-level namespace.
    fn pop_pending(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            if scope.kind == ScopeKind::Namespace {
                if let Some(id) = scope.node_id {
                    self.file_namespace = Some((scope.name, id));
                }
            }
        }
    }

    fn declaration_depth(&self) -> usize {
        self.scopes.last().map(|s| s.entry + 1).unwrap_or(0)
    }

    fn import_block_line(&mut self, code: &str, line: usize) {
        let Some(block) = &self.profile.import_block else {
            self.in_import_block = false;
            return;
        };
        if code.starts_with(block.end) {
            self.in_import_block = false;
            self.bracket_depth = 0;
            return;
        }
        if let Some(caps) = block.entry.captures(code) {
            if let Some(path) = caps.name("path") {
                self.push_import(path.as_str().to_string(), Vec::new(), ImportKind::Standard, line);
            }
        }
    }

    /// Innermost scope that is not a transparent block.
    fn innermost(&self) -> Option<&Scope> {
        self.scopes.iter().rev().find(|s| s.kind != ScopeKind::Block)
    }

    fn in_type(&self) -> bool {
        self.innermost_type().is_some()
    }

    fn innermost_type(&self) -> Option<&Scope> {
        self.innermost().filter(|s| s.kind == ScopeKind::Type)
    }

    fn enclosing_namespace(&self) -> Option<(&str, &str)> {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.kind == ScopeKind::Namespace && s.node_id.is_some())
            .and_then(|s| s.node_id.as_deref().map(|id| (s.name.as_str(), id)))
            .or_else(|| {
                self.file_namespace
                    .as_ref()
                    .map(|(name, id)| (name.as_str(), id.as_str()))
            })
    }

    /// Node that receives the Contains edge for a new declaration.
    fn container_id(&self) -> String {
        if let Some(id) = self.innermost_type().and_then(|s| s.node_id.clone()) {
            return id;
        }
        match self.enclosing_namespace() {
            Some((_, id)) => id.to_string(),
            None => self.module_id.clone(),
        }
    }

    fn parent_name(&self) -> Option<String> {
        if let Some(scope) = self.innermost_type() {
            return Some(scope.name.clone());
        }
        self.enclosing_namespace().map(|(name, _)| name.to_string())
    }

    fn context_allows(&self, context: RuleContext, at_declaration: bool) -> bool {
        match context {
            RuleContext::Anywhere => true,
            RuleContext::Declaration => at_declaration,
            RuleContext::TopLevel => at_declaration && !self.in_type(),
            RuleContext::InType => at_declaration && self.in_type(),
        }
    }

    fn apply_rules(&mut self, code: &str, line: usize, at_declaration: bool) {
        let profile = self.profile;
        let starts_reserved = profile.is_reserved(leading_word(code));

        for rule in &profile.rules {
            if !self.context_allows(rule.context, at_declaration) {
                continue;
            }
            let Some(caps) = rule.pattern.captures(code) else {
                continue;
            };
            if declares_name(rule.action) {
                if starts_reserved {
                    continue;
                }
                let reserved_name = caps
                    .name("name")
                    .map(|m| profile.is_reserved(m.as_str()))
                    .unwrap_or(false);
                if reserved_name {
                    continue;
                }
            }
            self.dispatch(rule.action, &caps, code, line);
            return;
        }
    }

    fn dispatch(&mut self, action: RuleAction, caps: &Captures<'_>, code: &str, line: usize) {
        match action {
            RuleAction::Import(kind) => {
                let names = caps
                    .name("names")
                    .map(|m| split_names(m.as_str()))
                    .unwrap_or_default();
                if let Some(path) = caps.name("path") {
                    for token in split_import_tokens(path.as_str()) {
                        self.push_import(token, names.clone(), kind, line);
                    }
                }
            }
            RuleAction::ModuleDecl => {
                if let Some(name) = caps.name("name") {
                    let name = name.as_str().to_string();
                    self.out.symbols.push(
                        Symbol::new(name.clone(), SymbolKind::Module, self.rel_path, line)
                            .with_parent(self.parent_name()),
                    );
                    self.out.imports.push(PendingImport {
                        token: name,
                        names: Vec::new(),
                        kind: ImportKind::SiblingModule,
                        line,
                    });
                }
            }
            RuleAction::ImportBlockStart => self.in_import_block = true,
            RuleAction::Namespace(kind) => self.declare_namespace(kind, caps, code, line),
            RuleAction::Type(node_type, rule) => self.declare_type(node_type, rule, caps, line),
            RuleAction::Extension => self.declare_extension(caps, line),
            RuleAction::Mixin(relationship) => self.declare_mixin(relationship, caps, line),
            RuleAction::Function => self.declare_function(caps, line),
            RuleAction::Member { in_type, top_level } => {
                let kind = if self.in_type() { in_type } else { top_level };
                let Some(kind) = kind else {
                    return;
                };
                let names = match caps.name("names") {
                    Some(list) => split_names(list.as_str()),
                    None => caps
                        .name("name")
                        .map(|m| split_names(m.as_str()))
                        .unwrap_or_default(),
                };
                let parent = self.parent_name();
                for name in names {
                    self.out.symbols.push(
                        Symbol::new(name, kind, self.rel_path, line).with_parent(parent.clone()),
                    );
                }
            }
            RuleAction::Block => {
                self.scopes
                    .push(Scope::new(ScopeKind::Block, String::new(), self.line_entry));
            }
            RuleAction::Skip => {}
        }
    }

    fn push_import(&mut self, token: String, names: Vec<String>, kind: ImportKind, line: usize) {
        self.out
            .symbols
            .push(Symbol::new(token.clone(), SymbolKind::Import, self.rel_path, line));
        self.out.imports.push(PendingImport {
            token,
            names,
            kind,
            line,
        });
    }

    fn declare_namespace(&mut self, kind: SymbolKind, caps: &Captures<'_>, code: &str, line: usize) {
        let Some(raw) = caps.name("name") else {
            return;
        };
        let local = normalize_namespace(raw.as_str());
        if local.is_empty() {
            return;
        }
        let parent = self.enclosing_namespace().map(|(name, _)| name.to_string());
        // Only brace/end scoped namespaces nest; a statement-style package
        // replaces the previous one.
        let qualified = match (&parent, self.scopes.iter().any(|s| s.kind == ScopeKind::Namespace)) {
            (Some(outer), true) => format!("{}.{}", outer, local),
            _ => local.clone(),
        };
        let id = ids::namespace(&qualified);

        self.out.nodes.push(
            GraphNode::new(id.clone(), qualified.clone(), NodeType::Namespace)
                .with_meta("language", self.profile.id),
        );
        self.out.edges.push(GraphEdge::new(
            self.module_id.clone(),
            id.clone(),
            Relationship::Contains,
        ));
        self.out.symbols.push(
            Symbol::new(raw.as_str().trim(), kind, self.rel_path, line).with_parent(parent),
        );
        if kind == SymbolKind::Module {
            self.out.types.push(DeclaredType {
                name: local.rsplit('.').next().unwrap_or(&local).to_string(),
                id: id.clone(),
                node_type: NodeType::Namespace,
            });
        }

        let mut scope = Scope::new(ScopeKind::Namespace, qualified.clone(), self.line_entry);
        scope.node_id = Some(id.clone());
        match self.profile.scope_mode {
            ScopeMode::EndKeyword => self.scopes.push(scope),
            ScopeMode::Indentation => self.file_namespace = Some((qualified, id)),
            ScopeMode::Braces => {
                if code.contains('{') {
                    self.scopes.push(scope);
                } else if code.ends_with(';') {
                    self.file_namespace = Some((qualified, id));
                } else {
                    // Allman brace on the next line, or a statement-style
                    // package; `discard_pending` decides which
                    self.scopes.push(scope);
                }
            }
        }
    }

    fn declare_type(&mut self, node_type: NodeType, rule: BaseRule, caps: &Captures<'_>, line: usize) {
        let Some(name) = caps.name("name").map(|m| m.as_str().to_string()) else {
            return;
        };
        let qualified = match self.innermost_type() {
            Some(outer) => format!("{}.{}", outer.name, name),
            None => name.clone(),
        };
        let id = match node_type {
            NodeType::Interface => ids::interface(self.logical_path, &qualified),
            _ => ids::class(self.logical_path, &qualified),
        };
        let kind = match node_type {
            NodeType::Interface => SymbolKind::Interface,
            _ => SymbolKind::Class,
        };

        let container = self.container_id();
        self.out.nodes.push(
            GraphNode::new(id.clone(), name.clone(), node_type)
                .with_file(self.rel_path)
                .with_meta("language", self.profile.id)
                .with_meta("line", line.to_string()),
        );
        self.out
            .edges
            .push(GraphEdge::new(container, id.clone(), Relationship::Contains));
        self.out.symbols.push(
            Symbol::new(name.clone(), kind, self.rel_path, line).with_parent(self.parent_name()),
        );
        self.out.types.push(DeclaredType {
            name,
            id: id.clone(),
            node_type,
        });

        let source = BaseSource::Node {
            id: id.clone(),
            node_type,
        };
        let declaring_interface = node_type == NodeType::Interface;
        let push_base = |base: String, hint: Relationship, out: &mut FileExtraction| {
            let hint = if declaring_interface {
                Relationship::Inherits
            } else {
                hint
            };
            out.bases.push(PendingBase {
                source: source.clone(),
                base,
                hint,
                line,
            });
        };
        if let Some(extends) = caps.name("extends") {
            for base in split_bases(extends.as_str()) {
                push_base(base.name, Relationship::Inherits, &mut self.out);
            }
        }
        if let Some(implements) = caps.name("implements") {
            for base in split_bases(implements.as_str()) {
                push_base(base.name, Relationship::Implements, &mut self.out);
            }
        }
        if let Some(bases) = caps.name("bases") {
            for (index, base) in split_bases(bases.as_str()).into_iter().enumerate() {
                let hint = classify_base(rule, index, &base);
                push_base(base.name, hint, &mut self.out);
            }
        }

        let mut scope = Scope::new(ScopeKind::Type, qualified, self.line_entry);
        scope.node_id = Some(id);
        scope.node_type = Some(node_type);
        scope.opened = self.profile.scope_mode == ScopeMode::Indentation;
        self.scopes.push(scope);
    }

    fn declare_extension(&mut self, caps: &Captures<'_>, line: usize) {
        let Some(target) = caps.name("name").and_then(|m| clean_receiver(m.as_str())) else {
            return;
        };
        for capture in ["trait", "bases"] {
            if let Some(list) = caps.name(capture) {
                for base in split_bases(list.as_str()) {
                    self.out.bases.push(PendingBase {
                        source: BaseSource::TypeName(target.clone()),
                        base: base.name,
                        hint: Relationship::Implements,
                        line,
                    });
                }
            }
        }
        let mut scope = Scope::new(ScopeKind::Type, target, self.line_entry);
        scope.opened = self.profile.scope_mode == ScopeMode::Indentation;
        self.scopes.push(scope);
    }

    fn declare_mixin(&mut self, relationship: Relationship, caps: &Captures<'_>, line: usize) {
        let Some(scope) = self.innermost_type() else {
            return;
        };
        let source = match (&scope.node_id, scope.node_type) {
            (Some(id), Some(node_type)) => BaseSource::Node {
                id: id.clone(),
                node_type,
            },
            _ => BaseSource::TypeName(scope.name.clone()),
        };
        let list = caps.name("bases").or_else(|| caps.name("name"));
        if let Some(list) = list {
            for base in split_bases(list.as_str()) {
                self.out.bases.push(PendingBase {
                    source: source.clone(),
                    base: base.name,
                    hint: relationship,
                    line,
                });
            }
        }
    }

    fn declare_function(&mut self, caps: &Captures<'_>, line: usize) {
        let Some(name) = caps.name("name").map(|m| m.as_str().to_string()) else {
            return;
        };

        if let Some(owner) = self.innermost_type().map(|s| s.name.clone()) {
            self.out.symbols.push(
                Symbol::new(name, SymbolKind::Method, self.rel_path, line).with_parent(Some(owner)),
            );
        } else if let Some(receiver) = caps.name("receiver").and_then(|m| clean_receiver(m.as_str())) {
            self.out.symbols.push(
                Symbol::new(name, SymbolKind::Method, self.rel_path, line)
                    .with_parent(Some(receiver)),
            );
        } else {
            let id = ids::function(self.logical_path, &name);
            let container = self.container_id();
            self.out.nodes.push(
                GraphNode::new(id.clone(), name.clone(), NodeType::Function)
                    .with_file(self.rel_path)
                    .with_meta("language", self.profile.id)
                    .with_meta("line", line.to_string()),
            );
            self.out
                .edges
                .push(GraphEdge::new(container, id, Relationship::Contains));
            self.out.symbols.push(
                Symbol::new(name, SymbolKind::Function, self.rel_path, line)
                    .with_parent(self.parent_name()),
            );
        }

        if self.profile.scope_mode == ScopeMode::Indentation {
            let mut scope = Scope::new(ScopeKind::Function, String::new(), self.line_entry);
            scope.opened = true;
            self.scopes.push(scope);
        }
    }
}

fn declares_name(action: RuleAction) -> bool {
    matches!(
        action,
        RuleAction::Type(..)
            | RuleAction::Function
            | RuleAction::Member { .. }
            | RuleAction::Extension
            | RuleAction::ModuleDecl
    )
}

fn classify_base(rule: BaseRule, index: usize, base: &BaseRef) -> Relationship {
    let implements = match rule {
        BaseRule::AllInherit => false,
        BaseRule::AllImplement => true,
        BaseRule::InterfacePrefix => {
            let mut chars = base.name.chars();
            chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        }
        BaseRule::FirstInherits => index > 0,
        BaseRule::CallSyntaxIsClass => !base.called,
    };
    if implements {
        Relationship::Implements
    } else {
        Relationship::Inherits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_COMMENTS: CommentSyntax = CommentSyntax {
        line: &["//"],
        block: &[("/*", "*/")],
    };

    #[test]
    fn test_cleaner_strips_comments_keeps_strings() {
        let mut cleaner = LineCleaner::new(&C_COMMENTS, &['"', '\'']);
        let line = cleaner.clean(r#"import x from "./a//b"; // trailing"#);
        assert_eq!(line.code.trim_end(), r#"import x from "./a//b";"#);
        assert!(!line.blanked.contains("a//b"));
    }

    #[test]
    fn test_cleaner_tracks_block_comments_across_lines() {
        let mut cleaner = LineCleaner::new(&C_COMMENTS, &['"']);
        assert_eq!(cleaner.clean("int a; /* start").code.trim(), "int a;");
        assert_eq!(cleaner.clean("class Hidden {").code.trim(), "");
        assert_eq!(cleaner.clean("end */ int b;").code.trim(), "int b;");
    }

    #[test]
    fn test_braces_in_strings_are_not_counted() {
        let mut cleaner = LineCleaner::new(&C_COMMENTS, &['"', '\'']);
        let line = cleaner.clean(r#"var s = "{{{"; char c = '{';"#);
        let trace = brace_trace(&line.blanked, 1);
        assert_eq!(trace, DepthTrace { after: 1, max: 1 });
    }

    #[test]
    fn test_keyword_trace() {
        let openers = &["class", "module", "def", "if", "unless", "while", "case", "begin"];
        assert_eq!(keyword_trace("class Foo < Bar", 0, openers).after, 1);
        assert_eq!(keyword_trace("def x; end", 1, openers), DepthTrace { after: 1, max: 2 });
        assert_eq!(keyword_trace("items.each do |i|", 2, openers).after, 3);
        assert_eq!(keyword_trace("x = if y", 2, openers).after, 3);
        assert_eq!(keyword_trace("return if done", 2, openers).after, 2);
        assert_eq!(keyword_trace("range.end", 2, openers).after, 2);
        assert_eq!(keyword_trace("end", 1, openers).after, 0);
    }

    #[test]
    fn test_indent_width_counts_tabs() {
        assert_eq!(indent_width("    x"), 4);
        assert_eq!(indent_width("\tx"), 4);
        assert_eq!(indent_width("x"), 0);
    }

    #[test]
    fn test_split_bases() {
        let names = |raw: &str| -> Vec<String> { split_bases(raw).into_iter().map(|b| b.name).collect() };
        assert_eq!(names("Base<T>, IDisposable"), vec!["Base", "IDisposable"]);
        assert_eq!(names("public Shape, private detail::Helper"), vec!["Shape", "Helper"]);
        assert_eq!(names("A with B with C"), vec!["A", "B", "C"]);
        assert_eq!(names("Debug + Clone + 'static"), vec!["Debug", "Clone"]);
        assert_eq!(names("Base(x), Runnable by impl"), vec!["Base", "Runnable"]);
        assert_eq!(names("metaclass=ABCMeta"), Vec::<String>::new());

        let called: Vec<bool> = split_bases("Base(x), Iface").into_iter().map(|b| b.called).collect();
        assert_eq!(called, vec![true, false]);
    }

    #[test]
    fn test_classify_base() {
        let plain = BaseRef {
            name: "IRepository".into(),
            called: false,
        };
        assert_eq!(
            classify_base(BaseRule::InterfacePrefix, 0, &plain),
            Relationship::Implements
        );
        let image = BaseRef {
            name: "Image".into(),
            called: false,
        };
        assert_eq!(classify_base(BaseRule::InterfacePrefix, 0, &image), Relationship::Inherits);
        assert_eq!(classify_base(BaseRule::FirstInherits, 1, &image), Relationship::Implements);
    }

    #[test]
    fn test_split_names_and_receiver() {
        assert_eq!(split_names(":name, :email"), vec!["name", "email"]);
        assert_eq!(split_names("$count"), vec!["count"]);
        assert_eq!(clean_receiver("s *Server").as_deref(), Some("Server"));
        assert_eq!(clean_receiver("Foo<T>").as_deref(), Some("Foo"));
        assert_eq!(clean_receiver("ns::Widget::").as_deref(), Some("Widget"));
        assert_eq!(split_import_tokens("os, sys as system"), vec!["os", "sys"]);
    }
}
