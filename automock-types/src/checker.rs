// Declaration checker: builds a package symbol table from parsed files
//
// Imports are resolved through the `Importer` passed in by the caller, so a
// resolver can hand itself in and have nested imports land in its own cache.

use crate::error::{ImportError, TypeCheckError};
use crate::package::{Object, Package, TypeName, Value};
use crate::types::{ChanDir, Func, Interface, Named, PackageRef, Signature, StructField, Tuple, Type, Var};
use crate::universe;
use automock_ast::{self as ast, Decl, Ident, ImportName, Pos, SourceFile, TypeExpr};
use automock_diagnostics::{fuzzy, Span};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Capability to load another package by module path
pub trait Importer {
    fn import(&mut self, path: &str) -> Result<Rc<Package>, ImportError>;
}

/// Type-check the files of one package.
///
/// An empty file set yields an empty package named after the last path segment.
pub fn check(
    path: &str,
    files: &[SourceFile],
    importer: &mut dyn Importer,
) -> Result<Package, TypeCheckError> {
    let Some(first) = files.first() else {
        let name = path.rsplit('/').next().unwrap_or(path);
        return Ok(Package::new(path, name));
    };

    let mut checker = Checker {
        pkg: PackageRef::new(path, first.package.name.clone()),
        files,
        importer,
        file_scopes: vec![HashMap::new(); files.len()],
        imported: HashMap::new(),
        type_decls: HashMap::new(),
        other_decls: HashMap::new(),
        underlying: HashMap::new(),
        in_progress: Vec::new(),
    };
    let package = checker.run()?;

    log::debug!(
        "checked package {} ({} files, {} declarations)",
        package.path,
        files.len(),
        package.scope.len()
    );
    Ok(package)
}

struct Checker<'f, 'i> {
    pkg: PackageRef,
    files: &'f [SourceFile],
    importer: &'i mut dyn Importer,
    /// Per-file import bindings: name -> package
    file_scopes: Vec<HashMap<String, Rc<Package>>>,
    /// Every package loaded during this check, by path
    imported: HashMap<String, Rc<Package>>,
    type_decls: HashMap<String, (usize, &'f ast::TypeSpec)>,
    /// Non-type top-level names (funcs, vars, consts)
    other_decls: HashMap<String, Span>,
    /// Memoized underlying types of local type declarations
    underlying: HashMap<String, Type>,
    in_progress: Vec<String>,
}

impl<'f, 'i> Checker<'f, 'i> {
    fn run(&mut self) -> Result<Package, TypeCheckError> {
        for file in self.files {
            if file.package.name != self.pkg.name {
                return Err(TypeCheckError::MismatchedPackage {
                    span: self.span_in(file, file.package.pos, file.package.name.len()),
                    expected: self.pkg.name.clone(),
                    found: file.package.name.clone(),
                });
            }
        }

        self.bind_imports()?;
        self.collect_decls()?;

        let mut scope = BTreeMap::new();
        let mut methods: HashMap<String, Vec<Func>> = HashMap::new();

        // Types first (in source order so the first error is deterministic)
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            for spec in file.type_specs() {
                if spec.name.is_blank() {
                    continue;
                }
                let span = self.span(index, spec.name.pos, spec.name.name.len());
                let underlying = self.decl_underlying(&spec.name.name, &span)?;
                scope.insert(
                    spec.name.name.clone(),
                    Object::TypeName(TypeName {
                        name: spec.name.name.clone(),
                        underlying,
                        is_alias: spec.is_alias,
                        methods: Vec::new(),
                    }),
                );
            }
        }

        for (index, file) in files.iter().enumerate() {
            for decl in &file.decls {
                match decl {
                    Decl::Type(_) => {}
                    Decl::Func(func) => {
                        let signature = self.resolve_signature(&func.signature, index)?;
                        let object = Func {
                            name: func.name.name.clone(),
                            signature,
                        };
                        match &func.receiver {
                            Some(receiver) => {
                                self.attach_method(&mut methods, receiver, object, index, &func.name)?
                            }
                            None if func.name.is_blank() || func.name.name == "init" => {}
                            None => {
                                scope.insert(object.name.clone(), Object::Func(object));
                            }
                        }
                    }
                    Decl::Var(spec) | Decl::Const(spec) => {
                        let ty = match &spec.ty {
                            Some(expr) => Some(self.resolve(expr, index)?),
                            None => None,
                        };
                        for ident in spec.names.iter().filter(|i| !i.is_blank()) {
                            let value = Value {
                                name: ident.name.clone(),
                                ty: ty.clone(),
                            };
                            let object = match decl {
                                Decl::Const(_) => Object::Const(value),
                                _ => Object::Var(value),
                            };
                            scope.insert(ident.name.clone(), object);
                        }
                    }
                }
            }
        }

        for (base, mut list) in methods {
            list.sort_by(|a, b| a.name.cmp(&b.name));
            if let Some(Object::TypeName(type_name)) = scope.get_mut(&base) {
                type_name.methods = list;
            }
        }

        let mut imports: Vec<String> = files
            .iter()
            .flat_map(|f| f.imports.iter().map(|i| i.path.clone()))
            .collect();
        imports.sort();
        imports.dedup();

        Ok(Package {
            path: self.pkg.path.clone(),
            name: self.pkg.name.clone(),
            imports,
            scope,
        })
    }

    fn span_in(&self, file: &SourceFile, pos: Pos, len: usize) -> Span {
        Span::new(file.path.clone(), pos.line, pos.column, len)
    }

    fn span(&self, file: usize, pos: Pos, len: usize) -> Span {
        match self.files.get(file) {
            Some(f) => self.span_in(f, pos, len),
            None => Span::unknown(),
        }
    }

    fn import_package(&mut self, path: &str, span: &Span) -> Result<Rc<Package>, TypeCheckError> {
        if let Some(pkg) = self.imported.get(path) {
            return Ok(Rc::clone(pkg));
        }
        if path == universe::UNSAFE {
            let pkg = Rc::new(universe::unsafe_package());
            self.imported.insert(path.to_string(), Rc::clone(&pkg));
            return Ok(pkg);
        }
        let pkg = self
            .importer
            .import(path)
            .map_err(|source| TypeCheckError::ImportFailed {
                span: span.clone(),
                path: path.to_string(),
                source,
            })?;
        self.imported.insert(path.to_string(), Rc::clone(&pkg));
        Ok(pkg)
    }

    fn bind_imports(&mut self) -> Result<(), TypeCheckError> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            for spec in &file.imports {
                let span = self.span(index, spec.pos, spec.path.len() + 2);
                if spec.name == Some(ImportName::Dot) {
                    return Err(TypeCheckError::DotImport {
                        span,
                        path: spec.path.clone(),
                    });
                }

                let pkg = self.import_package(&spec.path, &span)?;
                let binding = match &spec.name {
                    Some(ImportName::Named(alias)) => alias.name.clone(),
                    Some(ImportName::Blank) | Some(ImportName::Dot) => continue,
                    None => pkg.name.clone(),
                };

                let scope = &mut self.file_scopes[index];
                if scope.contains_key(&binding) {
                    return Err(TypeCheckError::Redeclared {
                        span,
                        name: binding,
                    });
                }
                scope.insert(binding, pkg);
            }
        }
        Ok(())
    }

    fn collect_decls(&mut self) -> Result<(), TypeCheckError> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            for decl in &file.decls {
                let names: Vec<&Ident> = match decl {
                    Decl::Type(spec) => vec![&spec.name],
                    Decl::Func(func) if func.receiver.is_none() && func.name.name != "init" => {
                        vec![&func.name]
                    }
                    Decl::Func(_) => Vec::new(),
                    Decl::Var(spec) | Decl::Const(spec) => spec.names.iter().collect(),
                };

                for ident in names.into_iter().filter(|i| !i.is_blank()) {
                    let span = self.span(index, ident.pos, ident.name.len());
                    if self.type_decls.contains_key(&ident.name)
                        || self.other_decls.contains_key(&ident.name)
                    {
                        return Err(TypeCheckError::Redeclared {
                            span,
                            name: ident.name.clone(),
                        });
                    }
                    match decl {
                        Decl::Type(spec) => {
                            self.type_decls.insert(ident.name.clone(), (index, spec));
                        }
                        _ => {
                            self.other_decls.insert(ident.name.clone(), span);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Underlying type of a local declaration; for aliases, the aliased type
    fn decl_underlying(&mut self, name: &str, span: &Span) -> Result<Type, TypeCheckError> {
        if let Some(ty) = self.underlying.get(name) {
            return Ok(ty.clone());
        }
        if self.in_progress.iter().any(|n| n == name) {
            return Err(TypeCheckError::InvalidRecursiveType {
                span: span.clone(),
                name: name.to_string(),
            });
        }
        let Some(&(decl_file, spec)) = self.type_decls.get(name) else {
            return Err(TypeCheckError::Undefined {
                span: span.clone(),
                name: name.to_string(),
                suggestions: Vec::new(),
            });
        };

        self.in_progress.push(name.to_string());
        let result = self.resolve(&spec.ty, decl_file).and_then(|rhs| {
            if spec.is_alias {
                return Ok(rhs);
            }
            match rhs {
                Type::Named(_) => {
                    let span = self.span(decl_file, spec.name.pos, name.len());
                    self.underlying_of(&rhs, &span)
                }
                other => Ok(other),
            }
        });
        self.in_progress.pop();

        let ty = result?;
        self.underlying.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    /// Underlying type of any descriptor (identity for non-named types)
    fn underlying_of(&mut self, ty: &Type, span: &Span) -> Result<Type, TypeCheckError> {
        let Type::Named(named) = ty else {
            return Ok(ty.clone());
        };

        match &named.package {
            None => Ok(universe::underlying(named).unwrap_or_else(|| ty.clone())),
            Some(owner) if owner.path == self.pkg.path => self.decl_underlying(&named.name, span),
            Some(owner) => {
                let pkg = self.import_package(&owner.path, span)?;
                match pkg.type_name(&named.name) {
                    Some(type_name) => Ok(type_name.underlying.clone()),
                    None => Err(TypeCheckError::Undefined {
                        span: span.clone(),
                        name: format!("{}.{}", owner.name, named.name),
                        suggestions: Vec::new(),
                    }),
                }
            }
        }
    }

    fn resolve(&mut self, expr: &TypeExpr, file: usize) -> Result<Type, TypeCheckError> {
        match expr {
            TypeExpr::Name(ident) => self.resolve_name(ident, file),
            TypeExpr::Qualified { package, name } => self.resolve_qualified(package, name, file),
            TypeExpr::Pointer(inner) => Ok(Type::pointer(self.resolve(inner, file)?)),
            TypeExpr::Slice(inner) | TypeExpr::Ellipsis(inner) => {
                Ok(Type::slice(self.resolve(inner, file)?))
            }
            TypeExpr::Array { len, elem } => Ok(Type::Array {
                len: len.clone(),
                elem: Box::new(self.resolve(elem, file)?),
            }),
            TypeExpr::Map { key, value } => Ok(Type::Map {
                key: Box::new(self.resolve(key, file)?),
                value: Box::new(self.resolve(value, file)?),
            }),
            TypeExpr::Chan { dir, elem } => Ok(Type::Chan {
                dir: match dir {
                    ast::ChanDir::Both => ChanDir::Both,
                    ast::ChanDir::Send => ChanDir::Send,
                    ast::ChanDir::Recv => ChanDir::Recv,
                },
                elem: Box::new(self.resolve(elem, file)?),
            }),
            TypeExpr::Func(func) => Ok(Type::Signature(Box::new(
                self.resolve_signature(func, file)?,
            ))),
            TypeExpr::Interface(elems) => Ok(Type::Interface(Box::new(
                self.resolve_interface(elems, file)?,
            ))),
            TypeExpr::Struct(fields) => self.resolve_struct(fields, file),
        }
    }

    fn resolve_name(&mut self, ident: &Ident, file: usize) -> Result<Type, TypeCheckError> {
        let name = ident.name.as_str();

        if let Some(&(_, spec)) = self.type_decls.get(name) {
            if spec.is_alias {
                let span = self.span(file, ident.pos, name.len());
                return self.decl_underlying(name, &span);
            }
            return Ok(Type::Named(Named::new(Some(self.pkg.clone()), name)));
        }

        let span = self.span(file, ident.pos, name.len());
        if self.other_decls.contains_key(name) {
            return Err(TypeCheckError::NotAType {
                span,
                name: name.to_string(),
            });
        }

        if let Some(ty) = universe::lookup(name) {
            return Ok(ty);
        }

        let mut candidates: Vec<String> = self.type_decls.keys().cloned().collect();
        candidates.extend(universe::names());
        candidates.sort();
        Err(TypeCheckError::Undefined {
            span,
            name: name.to_string(),
            suggestions: fuzzy::find_similar_names(name, &candidates, 0.8, 3),
        })
    }

    fn resolve_qualified(
        &mut self,
        package: &Ident,
        name: &Ident,
        file: usize,
    ) -> Result<Type, TypeCheckError> {
        let span = self.span(
            file,
            package.pos,
            package.name.len() + 1 + name.name.len(),
        );

        let Some(pkg) = self.file_scopes[file].get(&package.name).cloned() else {
            let mut bound: Vec<String> = self.file_scopes[file].keys().cloned().collect();
            bound.sort();
            return Err(TypeCheckError::UnknownPackage {
                span,
                name: package.name.clone(),
                suggestions: fuzzy::find_similar_names(&package.name, &bound, 0.8, 3),
            });
        };

        if !name.is_exported() {
            return Err(TypeCheckError::Unexported {
                span,
                package: pkg.path.clone(),
                name: name.name.clone(),
            });
        }

        match pkg.lookup(&name.name) {
            Some(Object::TypeName(type_name)) if type_name.is_alias => {
                Ok(type_name.underlying.clone())
            }
            Some(Object::TypeName(_)) => Ok(Type::Named(Named::new(
                Some(pkg.reference()),
                name.name.clone(),
            ))),
            Some(_) => Err(TypeCheckError::NotAType {
                span,
                name: format!("{}.{}", package.name, name.name),
            }),
            None => {
                let exported: Vec<&str> = pkg
                    .names()
                    .filter(|n| ast::is_exported(n))
                    .collect();
                Err(TypeCheckError::Undefined {
                    span,
                    name: format!("{}.{}", package.name, name.name),
                    suggestions: fuzzy::find_similar_names(&name.name, &exported, 0.8, 3),
                })
            }
        }
    }

    fn resolve_tuple(&mut self, fields: &[ast::Field], file: usize) -> Result<Tuple, TypeCheckError> {
        let mut vars = Vec::new();
        for field in fields {
            let ty = self.resolve(&field.ty, file)?;
            if field.names.is_empty() {
                vars.push(Var { name: None, ty });
            } else {
                for ident in &field.names {
                    vars.push(Var {
                        name: Some(ident.name.clone()),
                        ty: ty.clone(),
                    });
                }
            }
        }
        Ok(Tuple::new(vars))
    }

    fn resolve_signature(&mut self, func: &ast::FuncType, file: usize) -> Result<Signature, TypeCheckError> {
        Ok(Signature {
            params: self.resolve_tuple(&func.params, file)?,
            results: self.resolve_tuple(&func.results, file)?,
            variadic: func.is_variadic(),
        })
    }

    fn resolve_interface(
        &mut self,
        elems: &[ast::InterfaceElem],
        file: usize,
    ) -> Result<Interface, TypeCheckError> {
        let mut iface = Interface::default();

        for elem in elems {
            match elem {
                ast::InterfaceElem::Method { name, signature } => {
                    let method = Func {
                        name: name.name.clone(),
                        signature: self.resolve_signature(signature, file)?,
                    };
                    if iface.method(&method.name).is_some() {
                        return Err(TypeCheckError::DuplicateMethod {
                            span: self.span(file, name.pos, name.name.len()),
                            name: method.name,
                        });
                    }
                    iface.methods.push(method);
                }
                ast::InterfaceElem::Embedded(expr) => {
                    let pos = expr.pos().unwrap_or_default();
                    let span = self.span(file, pos, 1);
                    let ty = self.resolve(expr, file)?;
                    let embedded_name = match &ty {
                        Type::Named(named) => named.name.clone(),
                        _ => "(literal)".to_string(),
                    };
                    let Type::Interface(embedded) = self.underlying_of(&ty, &span)? else {
                        return Err(TypeCheckError::InvalidEmbedding {
                            span,
                            name: embedded_name,
                        });
                    };

                    for method in embedded.methods {
                        match iface.method(&method.name) {
                            Some(existing) if existing.signature == method.signature => {}
                            Some(_) => {
                                return Err(TypeCheckError::DuplicateMethod {
                                    span,
                                    name: method.name,
                                })
                            }
                            None => iface.methods.push(method),
                        }
                    }
                    iface.embedded.push(ty);
                }
            }
        }

        iface.methods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(iface)
    }

    fn resolve_struct(&mut self, fields: &[ast::Field], file: usize) -> Result<Type, TypeCheckError> {
        let mut out = Vec::new();
        for field in fields {
            let ty = self.resolve(&field.ty, file)?;
            if field.names.is_empty() {
                let name = match &ty {
                    Type::Pointer(inner) => inner.as_named().map(|n| n.name.clone()),
                    other => other.as_named().map(|n| n.name.clone()),
                };
                out.push(StructField {
                    name: name.unwrap_or_default(),
                    ty,
                    embedded: true,
                    tag: field.tag.clone(),
                });
            } else {
                for ident in &field.names {
                    out.push(StructField {
                        name: ident.name.clone(),
                        ty: ty.clone(),
                        embedded: false,
                        tag: field.tag.clone(),
                    });
                }
            }
        }
        Ok(Type::Struct(out))
    }

    fn attach_method(
        &mut self,
        methods: &mut HashMap<String, Vec<Func>>,
        receiver: &ast::Receiver,
        method: Func,
        file: usize,
        name: &Ident,
    ) -> Result<(), TypeCheckError> {
        let base = &receiver.base.name;
        let valid = matches!(self.type_decls.get(base), Some((_, spec)) if !spec.is_alias);
        if !valid {
            return Err(TypeCheckError::InvalidReceiver {
                span: self.span(file, receiver.base.pos, base.len()),
                name: base.clone(),
            });
        }

        let list = methods.entry(base.clone()).or_default();
        if method.name != "_" && list.iter().any(|m| m.name == method.name) {
            return Err(TypeCheckError::Redeclared {
                span: self.span(file, name.pos, name.name.len()),
                name: format!("{}.{}", base, method.name),
            });
        }
        list.push(method);
        Ok(())
    }
}
