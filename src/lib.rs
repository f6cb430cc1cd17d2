//! Generate Fortran 2003 `ISO_C_BINDING` interfaces from C declarations.
//!
//! C declarations are described by a [`DeclTree`], produced by the libclang
//! front end in [`loader`] (feature `loader`) or read back with
//! [`model::load`]. [`emit::emit`] then writes one Fortran unit per
//! declaration, in source order:
//!
//! ```
//! use c2fortran::{CType, Decl, DeclTree, FunctionDecl};
//!
//! let tree = DeclTree {
//!     path: "add.c".into(),
//!     decls: vec![Decl::Function(
//!         FunctionDecl::new("add", CType::integer("int"))
//!             .with_param(Some("a"), CType::integer("int"))
//!             .with_param(Some("b"), CType::integer("int")),
//!     )],
//! };
//!
//! let mut out = Vec::new();
//! c2fortran::emit::emit(&tree, &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("integer(c_int) FUNCTION add(a, b) bind (C)\n"));
//! ```

mod decl;
pub mod emit;
mod function;
#[cfg(feature = "loader")]
pub mod loader;
pub mod model;
mod record;
mod typ;

pub use decl::Decl;
pub use decl::DeclTree;
pub use decl::FieldDecl;
pub use decl::FunctionDecl;
pub use decl::NamingMode;
pub use decl::ParamDecl;
pub use decl::RecordDecl;
pub use decl::RecordKind;
pub use emit::Unit;
pub use function::param_name;
pub use function::FunctionFormatter;
pub use function::BODY_MARKER;
pub use record::RecordFormatter;
pub use record::RecordTranslation;
pub use typ::CType;
pub use typ::CTypeKind;
pub use typ::NOT_YET_IMPLEMENTED;
