// Read-only view of an interface method for code generation

use automock_types::{type_string, Func, PackageRef, Qualifier, Tuple, Type};

/// Qualifier used by generated code: types of the package being generated
/// into are written bare, all others as `name.Type`
pub struct GeneratorQualifier {
    current: String,
}

impl GeneratorQualifier {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

impl Qualifier for GeneratorQualifier {
    fn qualify(&self, package: &PackageRef) -> Option<String> {
        if package.name == self.current {
            None
        } else {
            Some(package.name.clone())
        }
    }
}

pub struct Method<'a> {
    func: &'a Func,
    qualifier: &'a dyn Qualifier,
}

impl<'a> Method<'a> {
    pub fn new(func: &'a Func, qualifier: &'a dyn Qualifier) -> Self {
        Self { func, qualifier }
    }

    pub fn name(&self) -> &str {
        &self.func.name
    }

    /// Parameter types as source text; a variadic parameter is `...T`
    pub fn param_types(&self) -> Vec<String> {
        self.types_of(&self.func.signature.params, self.func.signature.variadic)
    }

    pub fn return_types(&self) -> Vec<String> {
        self.types_of(&self.func.signature.results, false)
    }

    fn types_of(&self, tuple: &Tuple, variadic: bool) -> Vec<String> {
        let last = tuple.len().saturating_sub(1);
        tuple
            .types()
            .enumerate()
            .map(|(i, ty)| match ty {
                Type::Slice(elem) if variadic && i == last => {
                    format!("...{}", type_string(elem, self.qualifier))
                }
                ty => type_string(ty, self.qualifier),
            })
            .collect()
    }
}
