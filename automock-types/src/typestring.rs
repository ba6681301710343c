// Rendering type descriptors as source text

use crate::types::{ChanDir, Interface, PackageRef, Signature, Tuple, Type};

/// Decides how a named type's owning package is written.
/// `None` means the type name is written unqualified.
pub trait Qualifier {
    fn qualify(&self, package: &PackageRef) -> Option<String>;
}

impl<F> Qualifier for F
where
    F: Fn(&PackageRef) -> Option<String>,
{
    fn qualify(&self, package: &PackageRef) -> Option<String> {
        self(package)
    }
}

/// Qualify every package by its full module path
pub struct FullPath;

impl Qualifier for FullPath {
    fn qualify(&self, package: &PackageRef) -> Option<String> {
        Some(package.path.clone())
    }
}

/// Omit the qualifier for one package path, use the short name for all others
pub struct RelativeTo {
    pub path: String,
}

impl Qualifier for RelativeTo {
    fn qualify(&self, package: &PackageRef) -> Option<String> {
        if package.path == self.path {
            None
        } else {
            Some(package.name.clone())
        }
    }
}

pub fn type_string(ty: &Type, qualifier: &dyn Qualifier) -> String {
    let mut out = String::new();
    write_type(&mut out, ty, qualifier);
    out
}

fn write_type(out: &mut String, ty: &Type, q: &dyn Qualifier) {
    match ty {
        Type::Basic(kind) => out.push_str(kind.name()),
        Type::Slice(elem) => {
            out.push_str("[]");
            write_type(out, elem, q);
        }
        Type::Pointer(elem) => {
            out.push('*');
            write_type(out, elem, q);
        }
        Type::Named(named) => {
            if let Some(prefix) = named.package.as_ref().and_then(|p| q.qualify(p)) {
                out.push_str(&prefix);
                out.push('.');
            }
            out.push_str(&named.name);
        }
        Type::Tuple(tuple) => write_tuple(out, tuple, false, q),
        Type::Array { len, elem } => {
            out.push('[');
            out.push_str(len);
            out.push(']');
            write_type(out, elem, q);
        }
        Type::Map { key, value } => {
            out.push_str("map[");
            write_type(out, key, q);
            out.push(']');
            write_type(out, value, q);
        }
        Type::Chan { dir, elem } => {
            out.push_str(match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            });
            // chan (<-chan T) needs parentheses to keep its meaning
            let parens = *dir == ChanDir::Both
                && matches!(**elem, Type::Chan { dir: ChanDir::Recv, .. });
            if parens {
                out.push('(');
            }
            write_type(out, elem, q);
            if parens {
                out.push(')');
            }
        }
        Type::Signature(sig) => {
            out.push_str("func");
            write_signature(out, sig, q);
        }
        Type::Struct(fields) => {
            out.push_str("struct{");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str("; ");
                }
                if !field.embedded {
                    out.push_str(&field.name);
                    out.push(' ');
                }
                write_type(out, &field.ty, q);
                if let Some(tag) = &field.tag {
                    out.push_str(&format!(" {:?}", tag));
                }
            }
            out.push('}');
        }
        Type::Interface(iface) => write_interface(out, iface, q),
    }
}

fn write_interface(out: &mut String, iface: &Interface, q: &dyn Qualifier) {
    out.push_str("interface{");
    for (i, method) in iface.methods.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        out.push_str(&method.name);
        write_signature(out, &method.signature, q);
    }
    out.push('}');
}

fn write_tuple(out: &mut String, tuple: &Tuple, variadic: bool, q: &dyn Qualifier) {
    out.push('(');
    let last = tuple.len().saturating_sub(1);
    for (i, var) in tuple.vars.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if let Some(name) = &var.name {
            out.push_str(name);
            out.push(' ');
        }
        match (&var.ty, variadic && i == last) {
            (Type::Slice(elem), true) => {
                out.push_str("...");
                write_type(out, elem, q);
            }
            (ty, _) => write_type(out, ty, q),
        }
    }
    out.push(')');
}

fn write_signature(out: &mut String, sig: &Signature, q: &dyn Qualifier) {
    write_tuple(out, &sig.params, sig.variadic, q);

    match sig.results.vars.as_slice() {
        [] => {}
        [single] if single.name.is_none() => {
            out.push(' ');
            write_type(out, &single.ty, q);
        }
        _ => {
            out.push(' ');
            write_tuple(out, &sig.results, false, q);
        }
    }
}

/// `func(params) results` text of a signature without the `func` keyword
pub fn signature_string(sig: &Signature, qualifier: &dyn Qualifier) -> String {
    let mut out = String::new();
    write_signature(&mut out, sig, qualifier);
    out
}
