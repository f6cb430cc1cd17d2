//! C front end over libclang
//!
//! Builds [`DeclTree`]s from C source files. Only available with the
//! `loader` feature.

use crate::decl::Decl;
use crate::decl::DeclTree;
use crate::decl::FieldDecl;
use crate::decl::FunctionDecl;
use crate::decl::ParamDecl;
use crate::decl::RecordDecl;
use crate::decl::RecordKind;
use crate::typ::CType;

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;

use clang::Entity;
use clang::EntityKind;
use snafu::ResultExt;
use snafu::Snafu;
use tracing::debug;
use tracing::info;
use walkdir::WalkDir;

/// Error loading declarations from C source
#[derive(Debug, Snafu)]
pub enum LoadError {
    #[snafu(display("Could not load libclang: {}", message))]
    ClangInit { message: String },

    #[snafu(display("Could not parse {}: {}", path.display(), source))]
    Parse {
        path: PathBuf,
        source: clang::SourceError,
    },

    #[snafu(display("Could not read {}: {}", path.display(), source))]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not walk {}: {}", path.display(), source))]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Front end options
#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Directories passed as `-I`
    pub include_paths: Vec<PathBuf>,

    /// Macros passed as `-D`
    pub defines: Vec<String>,

    /// Any other arguments for clang
    pub clang_args: Vec<String>,

    /// Keep declarations that come from `#include`d files
    pub include_headers: bool,
}

impl Options {
    fn arguments(&self) -> Vec<String> {
        let mut args = vec!["-xc".to_owned()];
        args.extend(
            self.include_paths
                .iter()
                .map(|path| format!("-I{}", path.display())),
        );
        args.extend(self.defines.iter().map(|define| format!("-D{}", define)));
        args.extend(self.clang_args.iter().cloned());
        args
    }
}

/// C source files to load for `input`
///
/// A file is returned as is. A directory is walked for `.c` files, sorted so
/// the output does not depend on the file system's order.
pub fn source_files(input: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !input.is_dir() {
        return Ok(vec![input.to_owned()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = entry.context(Walk { path: input })?;
        let path = entry.path();

        // Ignore non-C files
        if entry.file_type().is_file() && path.extension() == Some(OsStr::new("c")) {
            files.push(path.to_owned());
        }
    }

    Ok(files)
}

/// Parse every C file under `input` (see [`source_files`])
pub fn load(input: &Path, options: &Options) -> Result<Vec<DeclTree>, LoadError> {
    let files = source_files(input)?;

    let ctx = clang::Clang::new().map_err(|message| LoadError::ClangInit { message })?;
    let index = clang::Index::new(&ctx, false, true);
    let args = options.arguments();

    files
        .iter()
        .map(|path| load_file(&index, path, &args, options))
        .collect()
}

fn load_file(
    index: &clang::Index<'_>,
    path: &Path,
    args: &[String],
    options: &Options,
) -> Result<DeclTree, LoadError> {
    info!("Parsing {}", path.display());

    let trans_unit = index
        .parser(path)
        .arguments(args)
        .parse()
        .context(Parse { path })?;

    let entities = trans_unit
        .get_entity()
        .get_children()
        .into_iter()
        .filter(|entity| {
            options.include_headers
                || entity
                    .get_location()
                    .map(|location| location.is_in_main_file())
                    .unwrap_or(false)
        })
        .collect::<Vec<Entity<'_>>>();

    let mut sources = SourceCache::default();
    let typedefs = record_typedefs(&entities);

    let decls = entities
        .iter()
        .map(|entity| load_decl(*entity, &typedefs, &mut sources))
        .collect::<Result<Vec<Decl>, LoadError>>()?;

    info!("Parsed {} ({} declarations)", path.display(), decls.len());

    Ok(DeclTree {
        path: path.to_owned(),
        decls,
    })
}

/// Typedef names of records, as `(record, typedef name)`
fn record_typedefs<'tu>(entities: &[Entity<'tu>]) -> Vec<(Entity<'tu>, String)> {
    entities
        .iter()
        .filter(|entity| entity.get_kind() == EntityKind::TypedefDecl)
        .filter_map(|entity| {
            let name = entity.get_name()?;
            let record = entity
                .get_typedef_underlying_type()?
                .get_canonical_type()
                .get_declaration()?;
            match record.get_kind() {
                EntityKind::StructDecl | EntityKind::UnionDecl => Some((record, name)),
                _ => None,
            }
        })
        .collect()
}

/// Name of a declaration, `None` for anonymous ones
fn decl_name(entity: Entity<'_>) -> Option<String> {
    entity
        .get_name()
        .filter(|name| !name.contains("(unnamed") && !name.contains("(anonymous"))
}

fn load_decl<'tu>(
    entity: Entity<'tu>,
    typedefs: &[(Entity<'tu>, String)],
    sources: &mut SourceCache,
) -> Result<Decl, LoadError> {
    let decl = match entity.get_kind() {
        EntityKind::FunctionDecl => Decl::Function(load_function(entity, sources)?),
        EntityKind::StructDecl | EntityKind::UnionDecl if entity.is_definition() => {
            Decl::Record(load_record(entity, typedefs))
        }
        EntityKind::StructDecl | EntityKind::UnionDecl => Decl::Other {
            kind: format!(
                "forward declaration of {}",
                entity.get_type().map(|typ| typ.get_display_name()).unwrap_or_default()
            ),
        },
        EntityKind::TypedefDecl => Decl::Typedef {
            name: entity.get_name().unwrap_or_default(),
            underlying: entity
                .get_typedef_underlying_type()
                .map(CType::from_clang)
                .unwrap_or_else(|| CType::unknown("")),
        },
        EntityKind::VarDecl => Decl::Variable {
            name: entity.get_name().unwrap_or_default(),
            ty: entity
                .get_type()
                .map(CType::from_clang)
                .unwrap_or_else(|| CType::unknown("")),
        },
        EntityKind::EnumDecl => Decl::Enum {
            name: decl_name(entity),
        },
        kind => Decl::Other {
            kind: format!("{:?}", kind),
        },
    };

    debug!("found {:?} {:?}", entity.get_kind(), entity.get_name());
    Ok(decl)
}

fn load_record<'tu>(entity: Entity<'tu>, typedefs: &[(Entity<'tu>, String)]) -> RecordDecl {
    let kind = match entity.get_kind() {
        EntityKind::UnionDecl => RecordKind::Union,
        _ => RecordKind::Struct,
    };

    let fields = entity
        .get_children()
        .into_iter()
        .filter(|child| child.get_kind() == EntityKind::FieldDecl)
        .map(|field| FieldDecl {
            name: field.get_name().unwrap_or_default(),
            ty: field
                .get_type()
                .map(CType::from_clang)
                .unwrap_or_else(|| CType::unknown("")),
        })
        .collect();

    let record = RecordDecl {
        fields,
        ..RecordDecl::new(kind, decl_name(entity))
    };

    match typedefs.iter().find(|(typedef_record, _)| *typedef_record == entity) {
        Some((_, tag)) => record.with_tag(tag.as_str()),
        None => record,
    }
}

fn load_function(entity: Entity<'_>, sources: &mut SourceCache) -> Result<FunctionDecl, LoadError> {
    let params = entity
        .get_arguments()
        .unwrap_or_default()
        .into_iter()
        .map(|param| ParamDecl {
            name: param.get_name().filter(|name| !name.is_empty()),
            ty: param
                .get_type()
                .map(CType::from_clang)
                .unwrap_or_else(|| CType::unknown("")),
        })
        .collect();

    let body = match entity
        .get_children()
        .into_iter()
        .find(|child| child.get_kind() == EntityKind::CompoundStmt)
    {
        Some(stmt) => sources.text(stmt)?,
        None => None,
    };

    Ok(FunctionDecl {
        name: entity.get_name().unwrap_or_default(),
        return_type: entity
            .get_result_type()
            .map(CType::from_clang)
            .unwrap_or_else(|| CType::unknown("")),
        params,
        body,
    })
}

/// Contents of source files, read once each
#[derive(Default)]
struct SourceCache {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl SourceCache {
    /// Exact source text covered by `entity`
    fn text(&mut self, entity: Entity<'_>) -> Result<Option<String>, LoadError> {
        let range = match entity.get_range() {
            Some(range) => range,
            None => return Ok(None),
        };
        let start = range.get_start().get_file_location();
        let end = range.get_end().get_file_location();
        let path = match start.file {
            Some(file) => file.get_path(),
            None => return Ok(None),
        };

        if !self.files.contains_key(&path) {
            let contents = std::fs::read(&path).context(ReadSource { path: &path })?;
            self.files.insert(path.clone(), contents);
        }

        let contents = &self.files[&path];
        let text = contents
            .get(start.offset as usize..end.offset as usize)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        Ok(text)
    }
}
