//! Import resolution: membership, namespace and recursive imports,
//! visibility, re-export, cycles and filters.

use syster::hir::{Origin, VisibilityContext};

use crate::helpers::model_helpers::{host_with, lookup, own_scope, sorted_names, sysml_host};
use crate::helpers::source_fixtures::{CIRCULAR_IMPORTS, RECURSIVE_IMPORTS};

#[test]
fn test_membership_import() {
    let host = sysml_host(
        "package Lib { part def Engine; part def Wheel; } package App { import Lib::Engine; }",
    );
    let scope = own_scope(&host, "App");
    assert_eq!(scope.get("Engine"), Some(lookup(&host, "Lib::Engine")));
    assert!(!scope.contains("Wheel"));
    assert_eq!(scope.entry("Engine").unwrap().origin, Origin::Imported);
}

#[test]
fn test_namespace_import_brings_public_members_only() {
    let host = sysml_host(
        "package Lib { part def Engine; private part def Secret; } package App { import Lib::*; }",
    );
    let scope = own_scope(&host, "App");
    assert!(scope.contains("Engine"));
    assert!(!scope.contains("Secret"));
    assert!(!scope.contains("Lib"));
}

#[test]
fn test_import_all_includes_private_members() {
    let host = sysml_host(
        "package Lib { part def Engine; private part def Secret; } package App { import all Lib::*; }",
    );
    let scope = own_scope(&host, "App");
    assert!(scope.contains("Engine"));
    assert!(scope.contains("Secret"));
}

#[test]
fn test_recursive_import_includes_the_namespace() {
    let host = sysml_host(RECURSIVE_IMPORTS);
    let scope = own_scope(&host, "WithSelf");
    assert_eq!(sorted_names(&scope), vec!["A", "C", "M", "N"]);
    assert_eq!(scope.get("N"), Some(lookup(&host, "N")));
    assert_eq!(scope.get("C"), Some(lookup(&host, "N::M::C")));
}

#[test]
fn test_members_recursive_import_excludes_the_namespace() {
    let host = sysml_host(RECURSIVE_IMPORTS);
    let scope = own_scope(&host, "MembersOnly");
    assert_eq!(sorted_names(&scope), vec!["A", "C", "M"]);
}

#[test]
fn test_circular_namespace_imports() {
    let host = sysml_host(CIRCULAR_IMPORTS);
    let x = lookup(&host, "P1::X");
    let y = lookup(&host, "P2::Y");

    let p1 = own_scope(&host, "P1");
    assert_eq!(p1.elements(), vec![x, y]);
    assert_eq!(p1.entry("X").unwrap().origin, Origin::Owned);
    assert_eq!(p1.entry("Y").unwrap().origin, Origin::Imported);

    let p2 = own_scope(&host, "P2");
    assert_eq!(p2.elements(), vec![y, x]);
}

#[test]
fn test_circular_imports_seen_from_outside() {
    let host = sysml_host(CIRCULAR_IMPORTS);
    let analysis = host.analysis();
    let external = analysis.scope(lookup(&host, "P1"), VisibilityContext::External);
    assert_eq!(sorted_names(&external), vec!["X", "Y"]);
    assert_eq!(analysis.lookup("P1::Y"), Some(lookup(&host, "P2::Y")));
}

#[test]
fn test_private_import_is_not_reexported() {
    let host = sysml_host(
        r#"
package Lib { part def Engine; }
package Middle { import Lib::*; }
package Outer { public import Lib::*; }
package App { import Middle::*; import Outer::*; }
"#,
    );
    assert!(own_scope(&host, "Middle").contains("Engine"));
    let analysis = host.analysis();
    assert!(
        !analysis
            .scope(lookup(&host, "Middle"), VisibilityContext::External)
            .contains("Engine")
    );
    assert!(
        analysis
            .scope(lookup(&host, "Outer"), VisibilityContext::External)
            .contains("Engine")
    );
    assert_eq!(own_scope(&host, "App").get("Engine"), Some(lookup(&host, "Lib::Engine")));
}

#[test]
fn test_owned_member_shadows_import() {
    let host = sysml_host(
        "package Lib { part def Engine; } package App { import Lib::*; part def Engine; }",
    );
    let scope = own_scope(&host, "App");
    assert_eq!(scope.get("Engine"), Some(lookup(&host, "App::Engine")));
}

#[test]
fn test_import_across_documents() {
    let host = host_with(&[
        ("lib.sysml", "package Lib { part def Engine; }"),
        ("app.sysml", "package App { import Lib::*; part car { part engine : Engine; } }"),
    ]);
    let engine = lookup(&host, "App::car::engine");
    assert_eq!(
        host.analysis().model().types_of(engine),
        vec![lookup(&host, "Lib::Engine")]
    );
}

#[test]
fn test_import_visible_to_nested_namespaces() {
    let host = sysml_host(
        "package Lib { part def Engine; } package App { import Lib::*; package Inner { part e : Engine; } }",
    );
    let e = lookup(&host, "App::Inner::e");
    assert_eq!(host.analysis().model().types_of(e), vec![lookup(&host, "Lib::Engine")]);
}

#[test]
fn test_metadata_filter_selects_annotated_members() {
    let host = sysml_host(
        r#"
package Annotations { metadata def Safety; }
package Design {
    #Annotations::Safety part def Brakes;
    part def Radio;
    part def Airbag { @Annotations::Safety; }
}
package Review {
    import Annotations::*;
    import Design::*[@Safety];
}
"#,
    );
    let scope = own_scope(&host, "Review");
    assert!(scope.contains("Brakes"));
    assert!(scope.contains("Airbag"));
    assert!(!scope.contains("Radio"));
}

#[test]
fn test_filter_reads_metadata_attribute() {
    let host = sysml_host(
        r#"
package Review {
    metadata def Safety { attribute isMandatory; }
    package Design {
        part def Brakes { @Safety { :>> isMandatory = true; } }
        part def Wipers { @Safety { :>> isMandatory = false; } }
        part def Radio;
    }
    package Mandatory {
        import Design::*[@Safety and Safety::isMandatory];
    }
}
"#,
    );
    let scope = own_scope(&host, "Review::Mandatory");
    assert_eq!(sorted_names(&scope), vec!["Brakes"]);
}
