//! Results stay correct as documents are edited, added and removed.

use syster::hir::VisibilityContext;

use crate::helpers::diagnostic_helpers::{diagnostics, with_code};
use crate::helpers::model_helpers::{host_with, lookup, own_scope};
use syster::hir::codes;

#[test]
fn test_editing_a_dependency_updates_dependents() {
    let mut host = host_with(&[
        ("lib.sysml", "package Lib { part def Engine { attribute power; } }"),
        ("app.sysml", "package App { import Lib::*; part def Car :> Engine; }"),
    ]);
    assert!(own_scope(&host, "App::Car").contains("power"));

    host.set_file_content("lib.sysml", "package Lib { part def Engine { attribute torque; } }");
    let scope = own_scope(&host, "App::Car");
    assert!(scope.contains("torque"));
    assert!(!scope.contains("power"));
}

#[test]
fn test_adding_a_document_resolves_earlier_failures() {
    let mut host = host_with(&[("app.sysml", "package App { part e : Lib::Engine; }")]);
    assert_eq!(
        with_code(&diagnostics(&host, "app.sysml"), codes::UNDEFINED_REFERENCE).len(),
        1
    );

    host.set_file_content("lib.sysml", "package Lib { part def Engine; }");
    assert!(diagnostics(&host, "app.sysml").is_empty());
    let e = lookup(&host, "App::e");
    assert_eq!(
        host.analysis().model().types_of(e),
        vec![lookup(&host, "Lib::Engine")]
    );
}

#[test]
fn test_removing_a_document_breaks_references() {
    let mut host = host_with(&[
        ("lib.sysml", "package Lib { part def Engine; }"),
        ("app.sysml", "package App { part e : Lib::Engine; }"),
    ]);
    assert!(diagnostics(&host, "app.sysml").is_empty());

    assert!(host.remove_file("lib.sysml"));
    assert_eq!(
        with_code(&diagnostics(&host, "app.sysml"), codes::UNDEFINED_REFERENCE).len(),
        1
    );
}

#[test]
fn test_unrelated_edit_keeps_other_results() {
    let mut host = host_with(&[
        ("a.sysml", "package A { part def X; part def Y :> X; }"),
        ("b.sysml", "package B { part def Z; }"),
    ]);
    let y = lookup(&host, "A::Y");
    let before = host.analysis().model().all_generals(y);

    host.set_file_content("b.sysml", "package B { part def Z; part def W; }");
    let after = host.analysis().model().all_generals(y);
    assert_eq!(before, after);
    assert!(host.analysis().lookup("B::W").is_some());
}

#[test]
fn test_standalone_relationship_in_other_document() {
    let mut host = host_with(&[
        ("types.sysml", "package T { part def A; part def B; }"),
        ("rels.sysml", "package R { specialization S subtype T::B specializes T::A; }"),
    ]);
    let a = lookup(&host, "T::A");
    let b = lookup(&host, "T::B");
    assert_eq!(&*host.analysis().model().direct_generals(b), &[a]);

    host.set_file_content("rels.sysml", "package R { }");
    assert!(host.analysis().model().direct_generals(b).is_empty());
}

#[test]
fn test_replaced_elements_get_new_ids() {
    let mut host = host_with(&[("a.sysml", "package A { part def X; }")]);
    let old = lookup(&host, "A::X");
    host.set_file_content("a.sysml", "package A { part def X; part def Y; }");
    let new = lookup(&host, "A::X");
    assert_ne!(old, new);
    let analysis = host.analysis();
    assert!(analysis.element(old).is_none());
    assert!(analysis.scope(lookup(&host, "A"), VisibilityContext::Own).contains("Y"));
}
