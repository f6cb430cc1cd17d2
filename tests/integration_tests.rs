use c2fortran::emit;
use c2fortran::model;
use c2fortran::CType;
use c2fortran::Decl;
use c2fortran::DeclTree;
use c2fortran::FunctionDecl;
use c2fortran::RecordDecl;
use c2fortran::RecordKind;

use std::path::PathBuf;

/// Helper for emitting a tree with minimal boilerplate
fn emit_to_string(tree: &DeclTree) -> String {
    let mut out = Vec::new();
    emit::emit(tree, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    println!("{}", text);
    text
}

/// Declarations of a small C library, in source order
fn shapes() -> DeclTree {
    DeclTree {
        path: PathBuf::from("shapes.c"),
        decls: vec![
            Decl::Record(
                RecordDecl::new(RecordKind::Struct, Some("Point".to_owned()))
                    .with_field("x", CType::real("double"))
                    .with_field("y", CType::real("double")),
            ),
            Decl::Record(
                RecordDecl::new(RecordKind::Struct, None)
                    .with_field("id", CType::integer("int"))
                    .with_tag("handle_t"),
            ),
            Decl::Typedef {
                name: "handle_t".to_owned(),
                underlying: CType::unknown("handle_t"),
            },
            Decl::Record(
                RecordDecl::new(RecordKind::Union, Some("value".to_owned()))
                    .with_field("i", CType::integer("long"))
                    .with_field("p", CType::pointer("void *"))
                    .with_tag("value_t"),
            ),
            Decl::Variable {
                name: "origin".to_owned(),
                ty: CType::unknown("struct Point"),
            },
            Decl::Enum {
                name: Some("shape_kind".to_owned()),
            },
            Decl::Function(
                FunctionDecl::new("add", CType::integer("int"))
                    .with_param(Some("a"), CType::integer("int"))
                    .with_param(Some("b"), CType::integer("int")),
            ),
            Decl::Function(
                FunctionDecl::new("visit", CType::void())
                    .with_param(None, CType::pointer("struct Point *"))
                    .with_param(Some("cb"), CType::function_pointer("void (*)(double)"))
                    .with_param(None, CType::real("double")),
            ),
            Decl::Function(
                FunctionDecl::new("norm", CType::real("double"))
                    .with_param(Some("p"), CType::pointer("const struct Point *"))
                    .with_body("{\n    return sqrt(p->x * p->x + p->y * p->y);\n}"),
            ),
            Decl::Other {
                kind: "StaticAssert".to_owned(),
            },
        ],
    }
}

#[test]
fn emit_shapes() {
    assert_eq!(
        emit_to_string(&shapes()),
        "TYPE, BIND(C) :: struct Point
\treal(c_double) :: x
\treal(c_double) :: y
END TYPE

! found TypedefDecl handle_t type: handle_t
TYPE, BIND(C) :: struct value
\tinteger(c_int) :: i
\ttype(c_ptr) :: p
END TYPE

! found VarDecl origin type: struct Point
! found EnumDecl shape_kind
integer(c_int) FUNCTION add(a, b) bind (C)
\tUSE iso_c_binding, only: c_int
\tinteger(c_int), value :: a
\tinteger(c_int), value :: b
END FUNCTION add

SUBROUTINE visit(arg_1, cb, arg_3) bind (C)
\tUSE iso_c_binding, only: c_ptr, c_funptr, c_double
\ttype(c_ptr), value :: arg_1
\ttype(c_funptr), value :: cb
\treal(c_double), value :: arg_3
END SUBROUTINE visit

real(c_double) FUNCTION norm(p) bind (C)
\tUSE iso_c_binding, only: c_ptr, c_double
\ttype(c_ptr), value :: p
! comment out function body by default
! {
!     return sqrt(p->x * p->x + p->y * p->y);
! }
END FUNCTION norm

! found other declaration StaticAssert
"
    );
}

#[test]
fn emit_stats() {
    let mut out = Vec::new();
    let stats = emit::emit(&shapes(), &mut out).unwrap();

    assert_eq!(stats.translated, 5);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.notices, 4);
}

#[test]
fn emit_is_deterministic() {
    let tree = shapes();
    assert_eq!(emit_to_string(&tree), emit_to_string(&tree));
}

#[test]
fn emit_empty_tree() {
    let tree = DeclTree {
        path: PathBuf::from("empty.c"),
        decls: Vec::new(),
    };
    assert_eq!(emit_to_string(&tree), "");
}

#[test]
fn emit_saved_model() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("shapes.bincode");

    let trees = vec![shapes(), shapes()];
    model::save(&path, &trees).unwrap();
    let loaded = model::load(&path).unwrap();

    assert_eq!(loaded, trees);
    assert_eq!(emit_to_string(&loaded[0]), emit_to_string(&shapes()));
}

/// Parse a real C file with libclang
#[test]
#[cfg(feature = "loader")]
fn load_and_emit_sample() {
    use c2fortran::loader;
    use c2fortran::NamingMode;
    use c2fortran::Unit;

    let path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sample.c"));
    let trees = loader::load(&path, &loader::Options::default()).unwrap();
    assert_eq!(trees.len(), 1);
    let tree = &trees[0];
    assert_eq!(tree.path, path);

    // The anonymous struct behind `anon_t` cannot be named
    let units = tree.decls.iter().map(emit::translate).collect::<Vec<Unit>>();
    assert!(units.contains(&Unit::Skipped {
        name: Some("anon_t".to_owned()),
        mode: NamingMode::TagOnly,
    }));

    let text = emit_to_string(tree);

    assert!(text.starts_with(
        "TYPE, BIND(C) :: struct Point
\treal(c_double) :: x
\treal(c_double) :: y
END TYPE
"
    ));
    assert!(text.contains(
        "TYPE, BIND(C) :: struct vec
\ttype(c_ptr) :: data
\tinteger(c_int) :: len
END TYPE
"
    ));
    assert!(text.contains("! found other declaration forward declaration of struct fwd\n"));
    assert!(!text.contains("helper"));
    assert!(!text.contains("count_t"));
    assert!(text.contains("! found VarDecl counter type: int\n"));
    assert!(text.contains("! found EnumDecl color\n"));
    assert!(text.contains("! found TypedefDecl real_t type: double\n"));
    assert!(text.contains(
        "integer(c_int) FUNCTION add(a, b) bind (C)
\tUSE iso_c_binding, only: c_int
\tinteger(c_int), value :: a
\tinteger(c_int), value :: b
END FUNCTION add
"
    ));
    assert!(text.contains(
        "SUBROUTINE apply(ctx, fn, name) bind (C)
\tUSE iso_c_binding, only: c_ptr, c_funptr
\ttype(c_ptr), value :: ctx
\ttype(c_funptr), value :: fn
\ttype(c_ptr), value :: name
END SUBROUTINE apply
"
    ));
    assert!(text.contains(
        "SUBROUTINE store(arg_1, y) bind (C)
\tUSE iso_c_binding, only: c_int, c_double
\tinteger(c_int), value :: arg_1
\treal(c_double), value :: y
END SUBROUTINE store
"
    ));
    assert!(text.contains(
        "real(c_double) FUNCTION scale(factor, n) bind (C)
\tUSE iso_c_binding, only: c_double, c_int
\treal(c_double), value :: factor
\tinteger(c_int), value :: n
! comment out function body by default
! {
!     return factor * n;
! }
END FUNCTION scale
"
    ));
}
