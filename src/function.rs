//! Function declarations as Fortran interface bodies

use crate::decl::FunctionDecl;
use crate::decl::ParamDecl;
use crate::typ::CType;

use std::borrow::Cow;

/// First line of a commented-out function body
pub const BODY_MARKER: &str = "! comment out function body by default";

/// Name of the parameter at `index` (0-based), `arg_<index + 1>` if unnamed
pub fn param_name(index: usize, param: &ParamDecl) -> Cow<'_, str> {
    match param.name.as_deref() {
        Some(name) if !name.is_empty() => Cow::Borrowed(name),
        _ => Cow::Owned(format!("arg_{}", index + 1)),
    }
}

/// Formats one function as a `SUBROUTINE` or `FUNCTION` with `bind (C)`
#[derive(Debug, Clone, Copy)]
pub struct FunctionFormatter<'a> {
    func: &'a FunctionDecl,
}

impl<'a> FunctionFormatter<'a> {
    pub fn new(func: &'a FunctionDecl) -> Self {
        FunctionFormatter { func }
    }

    /// Resolved parameter names, in declaration order
    pub fn param_names(&self) -> Vec<Cow<'a, str>> {
        self.func
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| param_name(index, param))
            .collect()
    }

    /// Kinds to import from `iso_c_binding`, without duplicates
    ///
    /// Types are visited as: first parameter, return type (unless `void`),
    /// remaining parameters. A kind is listed the first time a type not
    /// [`CType::same_type`] as any earlier one is seen.
    pub fn imports(&self) -> Vec<&'static str> {
        let return_type = Some(&self.func.return_type).filter(|typ| !typ.is_void());

        let mut order: Vec<&CType> = Vec::with_capacity(self.func.params.len() + 1);
        match self.func.params.split_first() {
            Some((first, rest)) => {
                order.push(&first.ty);
                order.extend(return_type);
                order.extend(rest.iter().map(|param| &param.ty));
            }
            None => order.extend(return_type),
        }

        let mut seen: Vec<&CType> = Vec::with_capacity(order.len());
        for typ in order {
            if !seen.iter().any(|prev| prev.same_type(typ)) {
                seen.push(typ);
            }
        }

        seen.into_iter().map(|typ| typ.kind_name(false)).collect()
    }

    /// `SUBROUTINE` or `<return type> FUNCTION`
    fn kind(&self) -> Cow<'static, str> {
        if self.func.return_type.is_void() {
            Cow::Borrowed("SUBROUTINE")
        } else {
            Cow::Owned(format!(
                "{} FUNCTION",
                self.func.return_type.kind_name(true)
            ))
        }
    }

    /// One `<type>, value :: <name>` line per parameter
    pub fn param_decls(&self) -> String {
        self.func
            .params
            .iter()
            .zip(self.param_names())
            .map(|(param, name)| format!("\t{}, value :: {}\n", param.ty.kind_name(true), name))
            .collect()
    }

    /// The body, if any, as comment lines
    ///
    /// Lines end at `\n`. A `\r` right before the break, or at the very end,
    /// is dropped.
    pub fn commented_body(&self) -> Option<String> {
        self.func.body.as_ref().map(|body| {
            let mut text = format!("{}\n", BODY_MARKER);
            for line in body.lines() {
                text.push_str("! ");
                text.push_str(line.strip_suffix('\r').unwrap_or(line));
                text.push('\n');
            }
            text
        })
    }

    /// Render the whole interface body
    ///
    /// ```
    /// use c2fortran::{CType, FunctionDecl, FunctionFormatter};
    ///
    /// let add = FunctionDecl::new("add", CType::integer("int"))
    ///     .with_param(Some("a"), CType::integer("int"))
    ///     .with_param(Some("b"), CType::integer("int"));
    ///
    /// assert_eq!(
    ///     FunctionFormatter::new(&add).format(),
    ///     "integer(c_int) FUNCTION add(a, b) bind (C)\n\
    ///      \tUSE iso_c_binding, only: c_int\n\
    ///      \tinteger(c_int), value :: a\n\
    ///      \tinteger(c_int), value :: b\n\
    ///      END FUNCTION add\n"
    /// );
    /// ```
    pub fn format(&self) -> String {
        let name = &self.func.name;
        let mut text = format!(
            "{} {}({}) bind (C)\n",
            self.kind(),
            name,
            self.param_names().join(", ")
        );
        text.push_str(&format!(
            "\tUSE iso_c_binding, only: {}\n",
            self.imports().join(", ")
        ));
        text.push_str(&self.param_decls());
        if let Some(body) = self.commented_body() {
            text.push_str(&body);
        }

        let end = if self.func.return_type.is_void() {
            "SUBROUTINE"
        } else {
            "FUNCTION"
        };
        text.push_str(&format!("END {} {}\n", end, name));
        text
    }
}
