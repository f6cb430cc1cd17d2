//! C types and their Fortran `ISO_C_BINDING` kinds

use serde::Deserialize;
use serde::Serialize;

/// Token emitted wherever a C type has no Fortran counterpart yet
pub const NOT_YET_IMPLEMENTED: &str = "not yet implemented";

/// Classification of a C type, as far as Fortran interoperability cares
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CTypeKind {
    /// Any C integer type, including `_Bool`, character types and enums
    Integer,

    /// `float`, `double` or `long double`
    Real,

    /// A pointer. The pointee is not kept, only whether it is a function.
    Pointer {
        /// Whether the pointee is a function type
        function: bool,
    },

    /// `void`
    Void,

    /// Anything else (arrays, records, function types, ...)
    Unknown,
}

/// A C type at a declaration site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CType {
    /// Classification used for mapping
    pub kind: CTypeKind,

    /// The type as spelled in the C source, e.g. `const char *`
    pub spelling: String,
}

impl CType {
    pub fn new(kind: CTypeKind, spelling: impl Into<String>) -> Self {
        CType {
            kind,
            spelling: spelling.into(),
        }
    }

    pub fn integer(spelling: impl Into<String>) -> Self {
        CType::new(CTypeKind::Integer, spelling)
    }

    pub fn real(spelling: impl Into<String>) -> Self {
        CType::new(CTypeKind::Real, spelling)
    }

    pub fn pointer(spelling: impl Into<String>) -> Self {
        CType::new(CTypeKind::Pointer { function: false }, spelling)
    }

    pub fn function_pointer(spelling: impl Into<String>) -> Self {
        CType::new(CTypeKind::Pointer { function: true }, spelling)
    }

    pub fn void() -> Self {
        CType::new(CTypeKind::Void, "void")
    }

    pub fn unknown(spelling: impl Into<String>) -> Self {
        CType::new(CTypeKind::Unknown, spelling)
    }

    pub fn is_void(&self) -> bool {
        self.kind == CTypeKind::Void
    }

    /// Fortran token for this type
    ///
    /// With `wrapped` the declarator form is returned (`integer(c_int)`),
    /// otherwise the bare kind literal used in `USE` lists (`c_int`).
    ///
    /// ```
    /// use c2fortran::CType;
    ///
    /// assert_eq!(CType::integer("int").kind_name(true), "integer(c_int)");
    /// assert_eq!(CType::function_pointer("void (*)(void)").kind_name(false), "c_funptr");
    /// assert_eq!(CType::unknown("int [4]").kind_name(true), "not yet implemented");
    /// ```
    pub fn kind_name(&self, wrapped: bool) -> &'static str {
        match (self.kind, wrapped) {
            (CTypeKind::Integer, true) => "integer(c_int)",
            (CTypeKind::Integer, false) => "c_int",
            (CTypeKind::Real, true) => "real(c_double)",
            (CTypeKind::Real, false) => "c_double",
            (CTypeKind::Pointer { function: true }, true) => "type(c_funptr)",
            (CTypeKind::Pointer { function: true }, false) => "c_funptr",
            (CTypeKind::Pointer { function: false }, true) => "type(c_ptr)",
            (CTypeKind::Pointer { function: false }, false) => "c_ptr",
            (CTypeKind::Void, _) | (CTypeKind::Unknown, _) => NOT_YET_IMPLEMENTED,
        }
    }

    /// Whether two types collapse to the same entry of a `USE` list
    ///
    /// Pointers only differ by being function pointers or not, since Fortran
    /// only has `c_ptr` and `c_funptr`.
    pub fn same_type(&self, other: &CType) -> bool {
        match (self.kind, other.kind) {
            (CTypeKind::Pointer { function: a }, CTypeKind::Pointer { function: b }) => a == b,
            (a, b) => a == b,
        }
    }

    /// Classify a libclang type
    ///
    /// Typedefs and elaborated names are resolved through the canonical type.
    #[cfg(feature = "loader")]
    pub fn from_clang<'tu>(typ: clang::Type<'tu>) -> CType {
        use clang::TypeKind;

        let canonical = typ.get_canonical_type();
        let kind = match canonical.get_kind() {
            TypeKind::Bool
            | TypeKind::CharS
            | TypeKind::CharU
            | TypeKind::SChar
            | TypeKind::UChar
            | TypeKind::WChar
            | TypeKind::Char16
            | TypeKind::Char32
            | TypeKind::Short
            | TypeKind::UShort
            | TypeKind::Int
            | TypeKind::UInt
            | TypeKind::Long
            | TypeKind::ULong
            | TypeKind::LongLong
            | TypeKind::ULongLong
            | TypeKind::Int128
            | TypeKind::UInt128
            | TypeKind::Enum => CTypeKind::Integer,
            TypeKind::Float | TypeKind::Double | TypeKind::LongDouble => CTypeKind::Real,
            TypeKind::Pointer => {
                let function = canonical
                    .get_pointee_type()
                    .map(|pointee| match pointee.get_kind() {
                        TypeKind::FunctionPrototype | TypeKind::FunctionNoPrototype => true,
                        _ => false,
                    })
                    .unwrap_or(false);
                CTypeKind::Pointer { function }
            }
            TypeKind::Void => CTypeKind::Void,
            _ => CTypeKind::Unknown,
        };

        CType::new(kind, typ.get_display_name())
    }
}
