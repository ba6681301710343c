// Type descriptors, package symbol tables and the declaration checker

pub mod checker;
pub mod error;
pub mod package;
pub mod types;
pub mod typestring;
pub mod universe;

pub use checker::{check, Importer};
pub use error::{ImportError, TypeCheckError};
pub use package::{Object, Package, TypeName, Value};
pub use types::{
    BasicKind, ChanDir, Func, Interface, Named, PackageRef, Signature, StructField, Tuple, Type,
    Var,
};
pub use typestring::{signature_string, type_string, FullPath, Qualifier, RelativeTo};
