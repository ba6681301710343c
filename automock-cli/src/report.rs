// Output of the inspect command, and diagnostic printing

use crate::method::Method;
use automock_diagnostics::{error_codes, fuzzy, Diagnostic, Span};
use automock_imports::ImportSet;
use automock_types::Package;
use colored::Colorize;
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize)]
pub struct MethodReport {
    pub name: String,
    pub params: Vec<String>,
    pub results: Vec<String>,
}

impl MethodReport {
    pub fn new(method: &Method) -> Self {
        Self {
            name: method.name().to_string(),
            params: method.param_types(),
            results: method.return_types(),
        }
    }

    fn signature(&self) -> String {
        let results = match self.results.as_slice() {
            [] => String::new(),
            [single] => format!(" {}", single),
            many => format!(" ({})", many.join(", ")),
        };
        format!("{}({}){}", self.name, self.params.join(", "), results)
    }
}

#[derive(Debug, Serialize)]
pub struct InterfaceReport {
    pub package: String,
    pub interface: String,
    /// Package the mock would be generated into
    pub current: String,
    pub methods: Vec<MethodReport>,
    pub imports: ImportSet,
}

impl InterfaceReport {
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} {} ({})\n",
            "interface".bold(),
            self.interface.bold(),
            self.package
        );
        for method in &self.methods {
            out.push_str(&format!("    {}\n", method.signature()));
        }

        if self.imports.is_empty() {
            out.push_str(&format!("{} none needed in package {}\n", "imports:".bold(), self.current));
        } else {
            out.push_str(&format!("{} for package {}\n", "imports:".bold(), self.current));
            for (path, name) in &self.imports {
                out.push_str(&format!("    {:?} {}\n", path, format!("({})", name).dimmed()));
            }
        }
        out
    }
}

/// Diagnostic for an interface name that is not declared as an interface
pub fn missing_interface(package: &Package, name: &str) -> Diagnostic {
    if package.type_name(name).is_some() {
        return Diagnostic::error(
            error_codes::NOT_AN_INTERFACE,
            format!("{} in package {} is not an interface type", name, package.path),
            Span::unknown(),
        );
    }

    let candidates = package.interface_names();
    let suggestions = fuzzy::find_similar_names(name, &candidates, 0.7, 3);
    let diagnostic = Diagnostic::error(
        error_codes::UNKNOWN_INTERFACE,
        format!("package {} declares no interface {}", package.path, name),
        Span::unknown(),
    );
    match fuzzy::did_you_mean(&suggestions) {
        Some(help) => diagnostic.with_help(help),
        None if candidates.is_empty() => {
            diagnostic.with_note(format!("package {} declares no interfaces", package.name))
        }
        None => diagnostic.with_note(format!("declared interfaces: {}", candidates.join(", "))),
    }
}

/// Print diagnostics to stderr, with a source snippet when the file is readable
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let source = if diagnostic.span.is_known() {
            fs::read_to_string(&diagnostic.span.file).ok()
        } else {
            None
        };
        match source {
            Some(source) => eprintln!("{}", diagnostic.format(&source)),
            None => eprintln!("{}", diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automock_types::{Interface, Object, Type, TypeName};

    fn report() -> InterfaceReport {
        let mut imports = ImportSet::new();
        imports.insert("example.com/model".to_string(), "model".to_string());
        InterfaceReport {
            package: "example.com/store".to_string(),
            interface: "Store".to_string(),
            current: "mocks".to_string(),
            methods: vec![
                MethodReport {
                    name: "Get".to_string(),
                    params: vec!["store.Key".to_string()],
                    results: vec!["*model.Item".to_string(), "error".to_string()],
                },
                MethodReport {
                    name: "Close".to_string(),
                    params: Vec::new(),
                    results: vec!["error".to_string()],
                },
            ],
            imports,
        }
    }

    #[test]
    fn test_render_text() {
        colored::control::set_override(false);
        let text = report().render();
        assert!(text.contains("interface Store (example.com/store)"));
        assert!(text.contains("    Get(store.Key) (*model.Item, error)\n"));
        assert!(text.contains("    Close() error\n"));
        assert!(text.contains("    \"example.com/model\" (model)\n"));
    }

    #[test]
    fn test_render_json() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["methods"][0]["results"][1], "error");
        assert_eq!(json["imports"]["example.com/model"], "model");
    }

    #[test]
    fn test_missing_interface_suggestions() {
        let mut pkg = Package::new("example.com/store", "store");
        pkg.scope.insert(
            "Store".to_string(),
            Object::TypeName(TypeName {
                name: "Store".to_string(),
                underlying: Type::Interface(Box::new(Interface::default())),
                is_alias: false,
                methods: Vec::new(),
            }),
        );
        pkg.scope.insert(
            "Key".to_string(),
            Object::TypeName(TypeName {
                name: "Key".to_string(),
                underlying: Type::Basic(automock_types::BasicKind::String),
                is_alias: false,
                methods: Vec::new(),
            }),
        );

        let diagnostic = missing_interface(&pkg, "Stor");
        assert_eq!(diagnostic.code, error_codes::UNKNOWN_INTERFACE);
        assert_eq!(diagnostic.help.as_deref(), Some("did you mean `Store`?"));

        let diagnostic = missing_interface(&pkg, "Key");
        assert_eq!(diagnostic.code, error_codes::NOT_AN_INTERFACE);
    }
}
