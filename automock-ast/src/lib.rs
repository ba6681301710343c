use serde::{Deserialize, Serialize};

/// Line/column position of a node (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Identifier with the position it was written at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }

    /// Exported identifiers start with an upper-case letter
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Root of the syntax tree: one parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path the file was read from (used in error locations)
    pub path: String,
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

/// How an import binds into the file scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportName {
    /// import alias "path"
    Named(Ident),
    /// import . "path"
    Dot,
    /// import _ "path"
    Blank,
}

/// Import declaration: import [name] "path"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    pub path: String,
    pub pos: Pos,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Type(TypeSpec),
    Func(FuncDecl),
    Var(ValueSpec),
    Const(ValueSpec),
}

/// type Name Type / type Name = Type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    pub is_alias: bool,
    pub ty: TypeExpr,
}

/// Function or method declaration; the body is not kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub receiver: Option<Receiver>,
    pub name: Ident,
    pub signature: FuncType,
}

/// Method receiver: (name *Base)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: Option<Ident>,
    pub pointer: bool,
    pub base: Ident,
}

/// var/const specification; initializer expressions are skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
}

/// Type expressions as written in source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// int, error, Store
    Name(Ident),
    /// io.Reader
    Qualified { package: Ident, name: Ident },
    /// *T
    Pointer(Box<TypeExpr>),
    /// []T
    Slice(Box<TypeExpr>),
    /// [N]T (length kept as written)
    Array { len: String, elem: Box<TypeExpr> },
    /// map[K]V
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// chan T, chan<- T, <-chan T
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// func(params) results
    Func(FuncType),
    /// interface { ... }
    Interface(Vec<InterfaceElem>),
    /// struct { ... }
    Struct(Vec<Field>),
    /// ...T (only valid as the type of a final parameter)
    Ellipsis(Box<TypeExpr>),
}

impl TypeExpr {
    /// Position of the first identifier in the expression, if any
    pub fn pos(&self) -> Option<Pos> {
        match self {
            TypeExpr::Name(ident) => Some(ident.pos),
            TypeExpr::Qualified { package, .. } => Some(package.pos),
            TypeExpr::Pointer(inner)
            | TypeExpr::Slice(inner)
            | TypeExpr::Ellipsis(inner)
            | TypeExpr::Array { elem: inner, .. }
            | TypeExpr::Chan { elem: inner, .. } => inner.pos(),
            TypeExpr::Map { key, .. } => key.pos(),
            TypeExpr::Func(_) | TypeExpr::Interface(_) | TypeExpr::Struct(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Function signature as written: parameter and result groups
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

impl FuncType {
    pub fn is_variadic(&self) -> bool {
        matches!(
            self.params.last(),
            Some(Field {
                ty: TypeExpr::Ellipsis(_),
                ..
            })
        )
    }
}

/// Parameter group, result group or struct field.
/// `names` is empty for unnamed parameters and embedded struct fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

impl Field {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            names: Vec::new(),
            ty,
            tag: None,
        }
    }

    /// Number of entries this group contributes to a tuple
    pub fn arity(&self) -> usize {
        self.names.len().max(1)
    }
}

/// Interface body element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterfaceElem {
    Method { name: Ident, signature: FuncType },
    Embedded(TypeExpr),
}

impl SourceFile {
    /// Type declarations in source order
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Type(spec) => Some(spec),
            _ => None,
        })
    }
}
