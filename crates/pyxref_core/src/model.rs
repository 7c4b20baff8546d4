//! The data model shared by every other module in this crate: [`Descriptor`],
//! [`Symbol`], [`PackageInfo`], [`DeclarationRef`], [`Occurrence`],
//! [`SymbolInformation`] and [`Document`].
//!
//! These are plain value types. None of them reach into the parser or the
//! oracle; they are the vocabulary the rest of the crate is written in.

use std::fmt;

/// One path element of a [`Symbol`].
///
/// The textual encoding is part of the wire contract and must not drift:
/// consumers parse symbol strings back into descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Namespace(String),
    Type(String),
    Term(String),
    Method(String, Option<String>),
    Meta(String),
    Parameter(String),
    TypeParameter(String),
}

impl Descriptor {
    /// Appends this descriptor's encoded form to `out`.
    fn encode_into(&self, out: &mut String) {
        match self {
            Descriptor::Namespace(name) => {
                push_escaped(out, name);
                out.push('/');
            }
            Descriptor::Type(name) => {
                push_escaped(out, name);
                out.push('#');
            }
            Descriptor::Term(name) => {
                push_escaped(out, name);
                out.push('.');
            }
            Descriptor::Method(name, disambiguator) => {
                push_escaped(out, name);
                out.push('(');
                if let Some(disambiguator) = disambiguator {
                    push_escaped(out, disambiguator);
                }
                out.push(')');
                out.push('.');
            }
            Descriptor::Meta(name) => {
                push_escaped(out, name);
                out.push(':');
            }
            Descriptor::Parameter(name) => {
                out.push('(');
                push_escaped(out, name);
                out.push(')');
            }
            Descriptor::TypeParameter(name) => {
                out.push('[');
                push_escaped(out, name);
                out.push(']');
            }
        }
    }
}

/// Characters that force an escaped (backtick-quoted) name.
fn needs_escaping(name: &str) -> bool {
    name.is_empty()
        || name.chars().any(|c| {
            c.is_whitespace() || matches!(c, '/' | '#' | '.' | '(' | ')' | ':' | '[' | ']' | '`')
        })
}

fn push_escaped(out: &mut String, name: &str) {
    if needs_escaping(name) {
        out.push('`');
        for c in name.chars() {
            if c == '`' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('`');
    } else {
        out.push_str(name);
    }
}

/// The sentinel used for the [`Symbol::Empty`] shape: a single character that
/// can never appear as the start of a well-formed global or local symbol.
const EMPTY_SYMBOL_SENTINEL: &str = ".";

/// The scheme and package-manager tokens fixed for this indexer.
pub const SCHEME: &str = "py-index";
pub const MANAGER: &str = "pypi";

/// A globally-unique identifier for a declared entity.
///
/// Exactly one of three shapes, enforced at construction time:
/// - `global`: scheme, manager, package name/version, then descriptors.
/// - `local`: scoped to a single [`Document`].
/// - `empty`: the root owner for packageless symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Symbol(String);

impl Symbol {
    /// Builds a global symbol for a package and a descriptor path.
    ///
    /// Panics if `descriptors` is empty or if the resulting string would
    /// carry leading/trailing whitespace — both are programming errors at
    /// the call site, not recoverable input conditions.
    pub fn global(package: &PackageInfo, descriptors: &[Descriptor]) -> Symbol {
        let mut s = String::new();
        s.push_str(SCHEME);
        s.push(' ');
        s.push_str(MANAGER);
        s.push(' ');
        push_escaped(&mut s, &package.name);
        s.push(' ');
        push_escaped(&mut s, &package.version);
        s.push(' ');
        for descriptor in descriptors {
            descriptor.encode_into(&mut s);
        }
        Symbol::new_checked(s)
    }

    /// Builds a symbol that extends an existing one with one more descriptor.
    pub fn extend(base: &Symbol, descriptor: &Descriptor) -> Symbol {
        let mut s = base.0.clone();
        descriptor.encode_into(&mut s);
        Symbol::new_checked(s)
    }

    pub fn local(id: u32) -> Symbol {
        Symbol::new_checked(format!("local {id}"))
    }

    pub fn empty() -> Symbol {
        Symbol(EMPTY_SYMBOL_SENTINEL.to_string())
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with("local ")
    }

    pub fn is_empty_symbol(&self) -> bool {
        self.0 == EMPTY_SYMBOL_SENTINEL
    }

    /// Returns the package-name prefix of a global symbol, if this is one.
    ///
    /// Used by the reference-consistency check to tell whether a symbol
    /// belongs to a third-party or stdlib package.
    pub fn package_name(&self) -> Option<&str> {
        if self.is_local() || self.is_empty_symbol() {
            return None;
        }
        let mut parts = self.0.splitn(4, ' ');
        let _scheme = parts.next()?;
        let _manager = parts.next()?;
        parts.next()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constructs a symbol, rejecting any value with leading or trailing
    /// whitespace. This is the well-formedness invariant the emitter must
    /// enforce; centralizing it here means every `Symbol` that exists is,
    /// by construction, well-formed.
    fn new_checked(s: String) -> Symbol {
        debug_assert_eq!(
            s.trim(),
            s,
            "symbol must not carry leading/trailing whitespace: {s:?}"
        );
        Symbol(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A distribution this indexer knows the (name, version, files) of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub files: std::collections::BTreeSet<String>,
}

impl PackageInfo {
    pub const STDLIB_NAME: &'static str = "python-stdlib";

    pub fn project(name: impl Into<String>, version: impl Into<String>) -> PackageInfo {
        PackageInfo {
            name: name.into(),
            version: version.into(),
            files: Default::default(),
        }
    }

    pub fn stdlib(python_version: impl Into<String>) -> PackageInfo {
        PackageInfo {
            name: Self::STDLIB_NAME.to_string(),
            version: python_version.into(),
            files: Default::default(),
        }
    }
}

/// What the oracle returns when asked to resolve an identifier.
///
/// `node` identifies the declaration site using the same address-derived
/// [`crate::node_id::NodeId`] the walker uses for everything else.
#[derive(Debug, Clone)]
pub struct DeclarationRef {
    pub node: crate::node_id::NodeId,
    pub kind: DeclarationKind,
    pub module_name: String,
    pub file_path: std::path::PathBuf,
    pub is_alias: bool,
    pub is_intrinsic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Module,
    Class,
    Function,
    Parameter,
    Assignment,
    Import,
    ImportFrom,
    Name,
}

bitflags::bitflags! {
    /// Occurrence roles. A single occurrence may carry more than one role
    /// (e.g. an augmented assignment target is both read and write), though
    /// none of the node-kind rules currently produce that combination.
    // `bitflags`'s `serde` feature implements `Serialize`/`Deserialize` for
    // this type automatically — do not also derive it here, that's a
    // duplicate trait impl.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Roles: u8 {
        const DEFINITION  = 0b001;
        const READ_ACCESS = 0b010;
        const WRITE_ACCESS = 0b100;
    }
}

/// A source range, either single-line or multi-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind")]
pub enum Range {
    SingleLine {
        line: u32,
        start_col: u32,
        end_col: u32,
    },
    MultiLine {
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    },
}

impl Range {
    pub fn single_line(line: u32, start_col: u32, end_col: u32) -> Range {
        Range::SingleLine {
            line,
            start_col,
            end_col,
        }
    }

    pub fn start_line(&self) -> u32 {
        match self {
            Range::SingleLine { line, .. } => *line,
            Range::MultiLine { start_line, .. } => *start_line,
        }
    }

    pub fn start_col(&self) -> u32 {
        match self {
            Range::SingleLine { start_col, .. } => *start_col,
            Range::MultiLine { start_col, .. } => *start_col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Occurrence {
    pub symbol: Symbol,
    pub roles: Roles,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SymbolInformation {
    pub symbol: Symbol,
    pub documentation: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Document {
    pub relative_path: String,
    pub occurrences: Vec<Occurrence>,
    pub symbols: Vec<SymbolInformation>,
}

impl Document {
    pub fn new(relative_path: impl Into<String>) -> Document {
        Document {
            relative_path: relative_path.into(),
            occurrences: Vec::new(),
            symbols: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Metadata {
    pub project_root_uri: String,
    pub text_encoding: &'static str,
    pub tool_info: ToolInfo,
}

impl Metadata {
    pub fn new(project_root_uri: impl Into<String>, tool_info: ToolInfo) -> Metadata {
        Metadata {
            project_root_uri: project_root_uri.into(),
            text_encoding: "UTF-8",
            tool_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg() -> PackageInfo {
        PackageInfo::project("acme", "1.0")
    }

    #[test]
    fn global_symbol_matches_scenario_a_shape() {
        let symbol = Symbol::global(&pkg(), &[Descriptor::Namespace("m".into())]);
        assert_eq!(symbol.as_str(), "py-index pypi acme 1.0 m/");
        let symbol = Symbol::extend(&symbol, &Descriptor::Type("C".into()));
        assert_eq!(symbol.as_str(), "py-index pypi acme 1.0 m/C#");
    }

    #[test]
    fn method_descriptor_encodes_trailing_dot() {
        let base = Symbol::global(&pkg(), &[Descriptor::Type("C".into())]);
        let symbol = Symbol::extend(&base, &Descriptor::Method("f".into(), None));
        assert!(symbol.as_str().ends_with("C#f()."));
    }

    #[test]
    fn names_with_reserved_characters_are_escaped() {
        let symbol = Symbol::global(&pkg(), &[Descriptor::Term("weird name/x".into())]);
        assert!(symbol.as_str().contains("`weird name/x`."));
    }

    #[test]
    fn local_symbols_never_carry_whitespace() {
        let symbol = Symbol::local(42);
        assert_eq!(symbol.as_str(), "local 42");
        assert_eq!(symbol.as_str().trim(), symbol.as_str());
    }

    #[test]
    fn empty_symbol_is_single_char_sentinel() {
        assert_eq!(Symbol::empty().as_str(), ".");
    }

    #[test]
    fn package_name_extraction() {
        let symbol = Symbol::global(&pkg(), &[Descriptor::Namespace("m".into())]);
        assert_eq!(symbol.package_name(), Some("acme"));
        assert_eq!(Symbol::local(1).package_name(), None);
        assert_eq!(Symbol::empty().package_name(), None);
    }
}
