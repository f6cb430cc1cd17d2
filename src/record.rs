//! Struct and union declarations as Fortran derived types

use crate::decl::NamingMode;
use crate::decl::RecordDecl;

use std::borrow::Cow;

use tracing::debug;

/// Result of formatting a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTranslation {
    /// A `TYPE, BIND(C)` block
    Derived(String),

    /// The record has no identifier, so no derived type can be named
    Skipped(NamingMode),
}

/// Formats one record, tracking its naming mode while it is visited
///
/// The naming mode starts from the one stored on the record and can be
/// refined with [`RecordFormatter::set_mode`] without touching the record.
#[derive(Debug)]
pub struct RecordFormatter<'a> {
    record: &'a RecordDecl,
    mode: NamingMode,
}

impl<'a> RecordFormatter<'a> {
    pub fn new(record: &'a RecordDecl) -> Self {
        RecordFormatter {
            record,
            mode: record.naming_mode,
        }
    }

    pub fn mode(&self) -> NamingMode {
        self.mode
    }

    /// Apply a naming mode request (see [`NamingMode::combine`])
    pub fn set_mode(&mut self, requested: NamingMode) {
        let mode = self.mode.combine(requested);
        debug!(
            "set naming mode of {:?}: requested {:?}, now {:?}",
            self.record.name, requested, mode
        );
        self.mode = mode;
    }

    /// One `<type> :: <name>` line per field, in source order
    pub fn fields(&self) -> String {
        self.record
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let name = if field.name.is_empty() {
                    Cow::Owned(format!("field_{}", index + 1))
                } else {
                    Cow::Borrowed(field.name.as_str())
                };
                format!("\t{} :: {}\n", field.ty.kind_name(true), name)
            })
            .collect()
    }

    /// Render the record as a derived type
    ///
    /// Unions are laid out the same way as structs.
    ///
    /// ```
    /// use c2fortran::{CType, NamingMode, RecordDecl, RecordFormatter, RecordKind, RecordTranslation};
    ///
    /// let point = RecordDecl::new(RecordKind::Struct, Some("Point".to_owned()))
    ///     .with_field("x", CType::real("double"))
    ///     .with_field("y", CType::real("double"));
    ///
    /// let mut formatter = RecordFormatter::new(&point);
    /// formatter.set_mode(NamingMode::IdOnly);
    /// assert_eq!(
    ///     formatter.format(),
    ///     RecordTranslation::Derived(
    ///         "TYPE, BIND(C) :: struct Point\n\treal(c_double) :: x\n\treal(c_double) :: y\nEND TYPE\n"
    ///             .to_owned()
    ///     )
    /// );
    /// ```
    pub fn format(&self) -> RecordTranslation {
        let name = match self.record.id() {
            Some(name) if self.mode.has_id() => name,
            _ => return RecordTranslation::Skipped(self.mode),
        };

        RecordTranslation::Derived(format!(
            "TYPE, BIND(C) :: struct {}\n{}END TYPE\n",
            name,
            self.fields()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::RecordKind;
    use crate::typ::CType;

    fn point() -> RecordDecl {
        RecordDecl::new(RecordKind::Struct, Some("Point".to_owned()))
            .with_field("x", CType::real("double"))
            .with_field("y", CType::real("double"))
    }

    #[test]
    fn test_format_named_struct() {
        let record = point();
        let mut formatter = RecordFormatter::new(&record);
        formatter.set_mode(NamingMode::IdOnly);

        assert_eq!(
            formatter.format(),
            RecordTranslation::Derived(
                "TYPE, BIND(C) :: struct Point\n\
                 \treal(c_double) :: x\n\
                 \treal(c_double) :: y\n\
                 END TYPE\n"
                    .to_owned()
            )
        );
    }

    #[test]
    fn test_format_every_field() {
        let record = RecordDecl::new(RecordKind::Struct, Some("node".to_owned()))
            .with_field("value", CType::integer("int"))
            .with_field("count", CType::integer("unsigned int"))
            .with_field("next", CType::pointer("struct node *"))
            .with_field("visit", CType::function_pointer("void (*)(struct node *)"))
            .with_field("data", CType::unknown("char [16]"));
        let mut formatter = RecordFormatter::new(&record);
        formatter.set_mode(NamingMode::IdOnly);

        // Repeated types still get one line each
        assert_eq!(
            formatter.format(),
            RecordTranslation::Derived(
                "TYPE, BIND(C) :: struct node\n\
                 \tinteger(c_int) :: value\n\
                 \tinteger(c_int) :: count\n\
                 \ttype(c_ptr) :: next\n\
                 \ttype(c_funptr) :: visit\n\
                 \tnot yet implemented :: data\n\
                 END TYPE\n"
                    .to_owned()
            )
        );
    }

    #[test]
    fn test_format_union_like_struct() {
        let record = RecordDecl::new(RecordKind::Union, Some("number".to_owned()))
            .with_field("i", CType::integer("int"))
            .with_field("d", CType::real("double"));
        let mut formatter = RecordFormatter::new(&record);
        formatter.set_mode(NamingMode::IdOnly);

        assert_eq!(
            formatter.format(),
            RecordTranslation::Derived(
                "TYPE, BIND(C) :: struct number\n\
                 \tinteger(c_int) :: i\n\
                 \treal(c_double) :: d\n\
                 END TYPE\n"
                    .to_owned()
            )
        );
    }

    #[test]
    fn test_unnamed_fields() {
        let record = RecordDecl::new(RecordKind::Struct, Some("flags".to_owned()))
            .with_field("", CType::integer("unsigned int"))
            .with_field("mode", CType::integer("int"))
            .with_field("", CType::unknown("struct (anonymous)"));
        let formatter = RecordFormatter::new(&record);

        assert_eq!(
            formatter.fields(),
            "\tinteger(c_int) :: field_1\n\
             \tinteger(c_int) :: mode\n\
             \tnot yet implemented :: field_3\n"
        );
    }

    #[test]
    fn test_id_and_tag() {
        let record = point().with_tag("point_t");
        let mut formatter = RecordFormatter::new(&record);
        assert_eq!(formatter.mode(), NamingMode::TagOnly);

        formatter.set_mode(NamingMode::IdOnly);
        assert_eq!(formatter.mode(), NamingMode::IdAndTag);

        match formatter.format() {
            RecordTranslation::Derived(text) => {
                assert!(text.starts_with("TYPE, BIND(C) :: struct Point\n"))
            }
            other => panic!("expected a derived type, got {:?}", other),
        }
    }

    #[test]
    fn test_skipped() {
        // Fresh record, nobody discovered its name
        let record = point();
        assert_eq!(
            RecordFormatter::new(&record).format(),
            RecordTranslation::Skipped(NamingMode::Anonymous)
        );

        // Only reachable through a typedef
        let record = RecordDecl::new(RecordKind::Struct, None)
            .with_field("x", CType::integer("int"))
            .with_tag("anon_t");
        assert_eq!(
            RecordFormatter::new(&record).format(),
            RecordTranslation::Skipped(NamingMode::TagOnly)
        );

        // A mode claiming an identifier the record does not have
        let record = RecordDecl::new(RecordKind::Struct, None);
        let mut formatter = RecordFormatter::new(&record);
        formatter.set_mode(NamingMode::IdOnly);
        assert_eq!(
            formatter.format(),
            RecordTranslation::Skipped(NamingMode::IdOnly)
        );
    }
}
