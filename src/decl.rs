//! C declaration types
//!
//! These are produced by a C front end (see the `loader` feature) or read
//! back from a saved model, and are only ever read by the formatters.

use crate::typ::CType;

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// A field of a struct or union
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name, empty for unnamed fields
    pub name: String,

    /// Field type
    pub ty: CType,
}

/// Whether a record was declared with `struct` or `union`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Struct,
    Union,
}

/// How a record can be referred to
///
/// `IdOnly` means the record has its own identifier (`struct Point`),
/// `TagOnly` means it is only reachable through a typedef.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingMode {
    Anonymous,
    IdOnly,
    TagOnly,
    IdAndTag,
}

impl Default for NamingMode {
    fn default() -> Self {
        NamingMode::Anonymous
    }
}

impl NamingMode {
    /// Mode after `requested` is applied on top of `self`
    ///
    /// `IdOnly` and `TagOnly` merge into `IdAndTag` in either order, any
    /// other request replaces the current mode.
    ///
    /// ```
    /// use c2fortran::NamingMode;
    ///
    /// assert_eq!(NamingMode::IdOnly.combine(NamingMode::TagOnly), NamingMode::IdAndTag);
    /// assert_eq!(NamingMode::TagOnly.combine(NamingMode::IdOnly), NamingMode::IdAndTag);
    /// assert_eq!(NamingMode::IdAndTag.combine(NamingMode::Anonymous), NamingMode::Anonymous);
    /// ```
    pub fn combine(self, requested: NamingMode) -> NamingMode {
        match (self, requested) {
            (NamingMode::IdOnly, NamingMode::TagOnly)
            | (NamingMode::TagOnly, NamingMode::IdOnly) => NamingMode::IdAndTag,
            (_, requested) => requested,
        }
    }

    /// Whether a record in this mode has a name usable for a derived type
    pub fn has_id(self) -> bool {
        match self {
            NamingMode::IdOnly | NamingMode::IdAndTag => true,
            NamingMode::Anonymous | NamingMode::TagOnly => false,
        }
    }
}

/// A struct or union declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDecl {
    /// Record identifier (`Point` in `struct Point`)
    pub name: Option<String>,

    /// Typedef name aliasing this record
    pub tag: Option<String>,

    pub kind: RecordKind,

    /// Fields in source order
    pub fields: Vec<FieldDecl>,

    pub naming_mode: NamingMode,
}

impl RecordDecl {
    /// A record with no fields in `Anonymous` mode
    pub fn new(kind: RecordKind, name: Option<String>) -> Self {
        RecordDecl {
            name,
            tag: None,
            kind,
            fields: Vec::new(),
            naming_mode: NamingMode::default(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: CType) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
        });
        self
    }

    /// Record that a typedef aliases this record
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self.naming_mode = self.naming_mode.combine(NamingMode::TagOnly);
        self
    }

    /// Identifier, if the record has a non-empty one
    pub fn id(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name, `None` (or empty) when omitted in the source
    pub name: Option<String>,

    pub ty: CType,
}

/// A function declaration or definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,

    pub return_type: CType,

    /// Parameters in source order
    pub params: Vec<ParamDecl>,

    /// Raw source text of the body, braces included, for definitions
    pub body: Option<String>,
}

impl FunctionDecl {
    /// A prototype with no parameters
    pub fn new(name: impl Into<String>, return_type: CType) -> Self {
        FunctionDecl {
            name: name.into(),
            return_type,
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_param(mut self, name: Option<&str>, ty: CType) -> Self {
        self.params.push(ParamDecl {
            name: name.map(str::to_owned),
            ty,
        });
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A top-level C declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Function(FunctionDecl),
    Record(RecordDecl),
    Typedef {
        name: String,
        underlying: CType,
    },
    Variable {
        name: String,
        ty: CType,
    },
    Enum {
        name: Option<String>,
    },
    /// Any declaration kind without a dedicated variant
    Other {
        /// Front end's name for the declaration kind
        kind: String,
    },
}

/// Top-level declarations of one C translation unit, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclTree {
    /// Path of the C source file
    pub path: PathBuf,

    pub decls: Vec<Decl>,
}
