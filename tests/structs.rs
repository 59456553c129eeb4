mod common;

use common::{empty_env, new_package, translate};
use go125_sema::model::{TagParam, Tag};
use go125_sema::syntax::FileBuilder;
use go125_sema::syntax::ast::ChanDir;
use go125_sema::types::Decorator;
use go125_sema::{Error, TagError};
use std::path::Path;

#[test]
fn two_field_record() {
    let mut b = FileBuilder::new("models");
    let int64 = b.named("int64");
    let string = b.named("string");
    let id = b.field(&["ID"], int64);
    let name = b.field(&["Name"], string);
    let st = b.struct_type(vec![id, name]);
    b.type_decl("User", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let builtin = env.package(env.builtin().unwrap());

    let ty = env.package(pkg).struct_by_name("User").expect("User");
    let graph = env.types();
    assert_eq!(graph.type_name(ty), "User");
    assert_eq!(graph.type_package(ty), Some(pkg));

    let st = graph.struct_type(ty).unwrap();
    let names: Vec<_> = st.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["ID", "Name"]);
    assert_eq!(Some(st.fields[0].ref_type), builtin.ref_type_by_name("int64"));
    assert_eq!(Some(st.fields[1].ref_type), builtin.ref_type_by_name("string"));
    for field in &st.fields {
        assert_eq!(field.tag, Tag::default());
        assert!(field.doc.is_empty());
        assert!(!field.embedded);
        assert!(graph.is_resolved(field.ref_type));
    }

    assert_eq!(env.package(pkg).structs, vec![ty]);
    assert_eq!(env.package(pkg).types, vec![ty]);
}

#[test]
fn self_referential_record() {
    let mut b = FileBuilder::new("list");
    let this = b.named("Self");
    let ptr = b.pointer(this);
    let field = b.field(&["Self"], ptr);
    let st = b.struct_type(vec![field]);
    b.type_decl("Self", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("Self").unwrap();
    let graph = env.types();

    let field = &graph.struct_type(ty).unwrap().fields[0];
    assert_eq!(graph.decorators(field.ref_type), vec![Decorator::Pointer]);
    assert_eq!(graph.ref_name(field.ref_type), "Self");
    assert_eq!(graph.resolved(field.ref_type), Some(ty));
}

#[test]
fn names_sharing_a_type_share_the_reference() {
    let mut b = FileBuilder::new("geometry");
    let float = b.named("float64");
    let xy = b.field(&["X", "Y"], float);
    let st = b.struct_type(vec![xy]);
    b.type_decl("Point", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("Point").unwrap();
    let st = env.types().struct_type(ty).unwrap();

    assert_eq!(st.fields.len(), 2);
    assert_eq!(st.fields[0].name, "X");
    assert_eq!(st.fields[1].name, "Y");
    assert_eq!(st.fields[0].ref_type, st.fields[1].ref_type);
}

#[test]
fn docs_are_kept_raw() {
    let mut b = FileBuilder::new("models");
    let int = b.named("int");
    let id = b.field(&["ID"], int);
    b.field_doc(id, &["// ID is the primary key."]);
    let st = b.struct_type(vec![id]);
    b.doc(&["// User is a user.", "// Second line."]).type_decl("User", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("User").unwrap();
    let st = env.types().struct_type(ty).unwrap();

    assert_eq!(st.doc.comments, vec!["// User is a user.", "// Second line."]);
    assert_eq!(st.fields[0].doc.comments, vec!["// ID is the primary key."]);
}

#[test]
fn tags_are_decoded_and_duplicate_keys_dropped() {
    let mut b = FileBuilder::new("models");
    let int = b.named("int");
    let id = b.tagged_field(
        &["ID"],
        int,
        r#"`json:"id,omitempty" json:"other" db:"user_id"`"#,
    );
    let st = b.struct_type(vec![id]);
    b.type_decl("User", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("User").unwrap();
    let tag = &env.types().struct_type(ty).unwrap().fields[0].tag;

    assert_eq!(tag.raw, r#"json:"id,omitempty" json:"other" db:"user_id""#);
    assert_eq!(tag.params.len(), 2);
    let json = tag.param_by_name("json").unwrap();
    assert_eq!(json.value, "id");
    assert_eq!(json.options, vec!["omitempty"]);
    assert_eq!(tag.param_by_name("db").unwrap().value, "user_id");
}

#[test]
fn malformed_tag_fails_the_file() {
    let mut b = FileBuilder::new("models");
    let int = b.named("int");
    let id = b.tagged_field(&["ID"], int, "`json:id`");
    let st = b.struct_type(vec![id]);
    b.type_decl("User", st);
    let file = b.finish();

    let mut env = empty_env();
    let pkg = new_package(&mut env, "models");
    let err = env
        .translate_file(pkg, Path::new("models.go"), &file)
        .unwrap_err();
    match err {
        Error::TagDecode { raw, source } => {
            assert_eq!(raw, "json:id");
            assert_eq!(source, TagError::MissingQuote("json".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
    // declared before its fields failed
    assert!(env.package(pkg).struct_by_name("User").is_some());
}

#[test]
fn custom_tag_decoder() {
    let mut b = FileBuilder::new("models");
    let int = b.named("int");
    let id = b.tagged_field(&["ID"], int, "`anything goes`");
    let st = b.struct_type(vec![id]);
    b.type_decl("User", st);

    let mut env = empty_env();
    env.set_tag_decoder(|raw: &str| -> Result<Vec<TagParam>, TagError> {
        Ok(vec![TagParam {
            name: "raw".into(),
            value: raw.to_owned(),
            options: Vec::new(),
        }])
    });
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("User").unwrap();
    let tag = &env.types().struct_type(ty).unwrap().fields[0].tag;
    assert_eq!(tag.param_by_name("raw").unwrap().value, "anything goes");
}

#[test]
fn embedded_fields_take_the_type_name() {
    let mut b = FileBuilder::new("models");
    let base = b.named("Base");
    let other = b.named("Other");
    let other_ptr = b.pointer(other);
    let f1 = b.field(&[], base);
    let f2 = b.field(&[], other_ptr);
    let st = b.struct_type(vec![f1, f2]);
    b.type_decl("User", st);
    let empty = b.struct_type(Vec::new());
    b.type_decl("Base", empty);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let user = env.package(pkg).struct_by_name("User").unwrap();
    let base = env.package(pkg).struct_by_name("Base").unwrap();
    let graph = env.types();
    let st = graph.struct_type(user).unwrap();

    assert_eq!(st.fields[0].name, "Base");
    assert!(st.fields[0].embedded);
    assert_eq!(graph.resolved(st.fields[0].ref_type), Some(base));

    assert_eq!(st.fields[1].name, "Other");
    assert!(st.fields[1].embedded);
    // never declared: still a placeholder
    assert!(!graph.is_resolved(st.fields[1].ref_type));
    assert!(env.package(pkg).ref_type_by_name("Other").is_some());
}

#[test]
fn container_fields() {
    let mut b = FileBuilder::new("models");
    let string = b.named("string");
    let int = b.named("int");
    let map = b.map(string, int);
    let byte = b.named("byte");
    let slice = b.slice(byte);
    let bool_ = b.named("bool");
    let arr = b.array("4", bool_);
    let fm = b.field(&["Counts"], map);
    let fs = b.field(&["Data"], slice);
    let fa = b.field(&["Flags"], arr);
    let st = b.struct_type(vec![fm, fs, fa]);
    b.type_decl("Stats", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("Stats").unwrap();
    let graph = env.types();
    let st = graph.struct_type(ty).unwrap();

    let counts = st.field_by_name("Counts").unwrap().ref_type;
    assert_eq!(graph.ref_name(counts), "map[string]int");
    let map = graph.map_type(graph.resolved(counts).unwrap()).unwrap();
    assert_eq!(graph.ref_name(map.key), "string");
    assert_eq!(graph.ref_name(map.value), "int");

    let data = st.field_by_name("Data").unwrap().ref_type;
    assert_eq!(graph.decorators(data), vec![Decorator::Array]);
    assert_eq!(graph.ref_name(data), "byte");

    let flags = st.field_by_name("Flags").unwrap().ref_type;
    assert_eq!(graph.decorators(flags), vec![Decorator::Array]);
}

#[test]
fn anonymous_struct_field() {
    let mut b = FileBuilder::new("models");
    let int = b.named("int");
    let a = b.field(&["A"], int);
    let inner = b.struct_type(vec![a]);
    let f = b.field(&["Inner"], inner);
    let st = b.struct_type(vec![f]);
    b.type_decl("Outer", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("Outer").unwrap();
    let graph = env.types();

    let inner = graph.struct_type(ty).unwrap().fields[0].ref_type;
    let inner_ty = graph.resolved(inner).unwrap();
    let inner_st = graph.struct_type(inner_ty).unwrap();
    assert_eq!(inner_st.fields[0].name, "A");
    // inline structs are not package declarations
    assert_eq!(env.package(pkg).structs, vec![ty]);
}

#[test]
fn type_parameters_do_not_leak_into_the_package() {
    let mut b = FileBuilder::new("list");
    let any = b.named("any");
    let t_param = b.field(&["T"], any);
    let t = b.named("T");
    let items = b.slice(t);
    let f = b.field(&["items"], items);
    let st = b.struct_type(vec![f]);
    b.generic_type_decl("List", vec![t_param], st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("List").unwrap();
    let graph = env.types();

    let items = graph.struct_type(ty).unwrap().fields[0].ref_type;
    assert_eq!(graph.ref_name(items), "T");
    assert!(graph.is_resolved(items));
    assert!(env.package(pkg).ref_type_by_name("T").is_none());
}

#[test]
fn defined_non_struct_types_are_base_types() {
    let mut b = FileBuilder::new("models");
    let kind = b.named("Kind");
    let f = b.field(&["Kind"], kind);
    let st = b.struct_type(vec![f]);
    b.type_decl("User", st);
    let int = b.named("int");
    b.type_decl("Kind", int);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let user = env.package(pkg).struct_by_name("User").unwrap();
    let graph = env.types();

    let kind = graph.struct_type(user).unwrap().fields[0].ref_type;
    let kind_ty = graph.resolved(kind).expect("bound by its declaration");
    assert_eq!(graph.type_name(kind_ty), "Kind");
    assert!(graph.struct_type(kind_ty).is_none());
    assert!(env.package(pkg).types.contains(&kind_ty));
}

#[test]
fn channel_interface_and_parenthesized_fields() {
    let mut b = FileBuilder::new("models");
    let int = b.named("int");
    let ch = b.chan(ChanDir::Recv, int);
    let f_ch = b.field(&["Events"], ch);

    let sig = b.signature(Vec::new(), Vec::new());
    let m = b.method_elem("M", sig);
    let iface = b.interface_type(vec![m]);
    let f_iface = b.field(&["X"], iface);

    let user = b.named("User");
    let paren = b.paren(user);
    let f_paren = b.field(&["Owner"], paren);

    let user = b.named("User");
    let paren = b.paren(user);
    let ptr = b.pointer(paren);
    let f_ptr = b.field(&["Parent"], ptr);

    let st = b.struct_type(vec![f_ch, f_iface, f_paren, f_ptr]);
    b.type_decl("User", st);

    let mut env = empty_env();
    let pkg = translate(&mut env, b.finish());
    let ty = env.package(pkg).struct_by_name("User").unwrap();
    let user_ref = env.package(pkg).ref_type_by_name("User").unwrap();
    let graph = env.types();
    let st = graph.struct_type(ty).unwrap();

    let events = st.field_by_name("Events").unwrap().ref_type;
    assert_eq!(graph.decorators(events), vec![Decorator::Channel]);
    assert_eq!(graph.ref_name(events), "int");
    assert!(graph.is_resolved(events));

    // interface literals all share one reference, whatever their methods
    let x = st.field_by_name("X").unwrap().ref_type;
    assert_eq!(x, graph.empty_interface());

    // parentheses add no identity of their own
    let owner = st.field_by_name("Owner").unwrap().ref_type;
    assert_eq!(owner, user_ref);
    let parent = st.field_by_name("Parent").unwrap().ref_type;
    assert_eq!(graph.decorator(parent), Some((Decorator::Pointer, user_ref)));
    assert_eq!(graph.resolved(parent), Some(ty));
}

#[test]
fn redeclared_struct_keeps_one_slot() {
    let mut env = empty_env();
    let pkg = new_package(&mut env, "models");

    for (file, field) in [("a.go", "A"), ("b.go", "B")] {
        let mut b = FileBuilder::new("models");
        let int = b.named("int");
        let f = b.field(&[field], int);
        let st = b.struct_type(vec![f]);
        b.type_decl("User", st);
        env.translate_file(pkg, Path::new(file), &b.finish())
            .unwrap();
    }

    let package = env.package(pkg);
    let user = package.struct_by_name("User").unwrap();
    assert_eq!(package.structs, vec![user]);
    assert_eq!(package.types, vec![user]);
    let fields = &env.types().struct_type(user).unwrap().fields;
    assert_eq!(fields[0].name, "B");
    assert_eq!(env.record_implementations(pkg), 0);
}
