//! Translation of whole declaration trees

use crate::decl::Decl;
use crate::decl::DeclTree;
use crate::decl::NamingMode;
use crate::function::FunctionFormatter;
use crate::record::RecordFormatter;
use crate::record::RecordTranslation;

use std::io;
use std::io::Write;

use snafu::ResultExt;
use snafu::Snafu;
use tracing::debug;
use tracing::info;

/// Error writing translated declarations
#[derive(Debug, Snafu)]
pub enum EmitError {
    #[snafu(display("Failed to write Fortran output: {}", source))]
    WriteOutput { source: io::Error },
}

/// What a single declaration turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// Fortran source for a function or record
    Fortran(String),

    /// A record that could not be named
    Skipped {
        name: Option<String>,
        mode: NamingMode,
    },

    /// Informational comment for a declaration kind with no translation
    Notice(String),
}

/// Counts of each kind of [`Unit`] written by [`emit`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub translated: usize,
    pub skipped: usize,
    pub notices: usize,
}

/// Translate one top-level declaration
pub fn translate(decl: &Decl) -> Unit {
    match decl {
        Decl::Function(func) => {
            debug!("translating function {}", func.name);
            Unit::Fortran(FunctionFormatter::new(func).format())
        }
        Decl::Record(record) => {
            debug!(
                "translating {:?} {:?} with {} fields",
                record.kind,
                record.name,
                record.fields.len()
            );
            let mut formatter = RecordFormatter::new(record);
            if record.id().is_some() {
                formatter.set_mode(NamingMode::IdOnly);
            }
            match formatter.format() {
                RecordTranslation::Derived(text) => Unit::Fortran(text),
                RecordTranslation::Skipped(mode) => {
                    debug!(
                        "skipping record {:?} (typedef {:?}) in mode {:?}",
                        record.name, record.tag, mode
                    );
                    Unit::Skipped {
                        name: record.name.clone().or_else(|| record.tag.clone()),
                        mode,
                    }
                }
            }
        }
        Decl::Typedef { name, underlying } => Unit::Notice(format!(
            "! found TypedefDecl {} type: {}",
            name, underlying.spelling
        )),
        Decl::Variable { name, ty } => {
            Unit::Notice(format!("! found VarDecl {} type: {}", name, ty.spelling))
        }
        Decl::Enum { name } => Unit::Notice(format!(
            "! found EnumDecl {}",
            name.as_deref().unwrap_or("<anonymous>")
        )),
        Decl::Other { kind } => Unit::Notice(format!("! found other declaration {}", kind)),
    }
}

/// Translate every declaration of `tree` in source order and write the
/// result to `out`
///
/// Fortran units are each followed by an empty line. Skipped records write
/// nothing.
pub fn emit<W: Write>(tree: &DeclTree, out: &mut W) -> Result<Stats, EmitError> {
    let mut stats = Stats::default();

    for decl in &tree.decls {
        match translate(decl) {
            Unit::Fortran(text) => {
                writeln!(out, "{}", text).context(WriteOutput)?;
                stats.translated += 1;
            }
            Unit::Notice(line) => {
                writeln!(out, "{}", line).context(WriteOutput)?;
                stats.notices += 1;
            }
            Unit::Skipped { .. } => stats.skipped += 1,
        }
    }

    info!(
        "{}: {} translated, {} skipped, {} notices",
        tree.path.display(),
        stats.translated,
        stats.skipped,
        stats.notices
    );

    Ok(stats)
}

/// [`emit`] every tree in order, adding up their [`Stats`]
///
/// No trees write nothing.
pub fn emit_all<W: Write>(trees: &[DeclTree], out: &mut W) -> Result<Stats, EmitError> {
    let mut total = Stats::default();
    for tree in trees {
        let stats = emit(tree, out)?;
        total.translated += stats.translated;
        total.skipped += stats.skipped;
        total.notices += stats.notices;
    }
    Ok(total)
}
