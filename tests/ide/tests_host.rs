//! AnalysisHost lifecycle through the public facade.

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use syster::eval::Value;
use syster::hir::{Cancelled, DiagnosticKind, codes};
use syster::ide::{AnalysisHost, EngineOptions};
use syster::project::StdLibSource;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::helpers::diagnostic_helpers::with_code;
use crate::helpers::model_helpers::{host_with, lookup};
use crate::helpers::source_fixtures::VEHICLE;

#[test]
fn test_default_options_use_the_embedded_library() {
    assert_eq!(EngineOptions::new().stdlib, StdLibSource::Embedded);
    let host = AnalysisHost::with_options(&EngineOptions::new()).unwrap();
    let library = host.library().expect("embedded library");
    assert!(!library.is_empty());
    assert!(host.analysis().lookup("Parts::Part").is_some());
    assert_eq!(host.file_count(), 0);
}

#[test]
fn test_disabled_library_has_no_library_names() {
    let host = AnalysisHost::with_options(&EngineOptions::new().without_stdlib()).unwrap();
    assert!(host.library().is_none());
    assert!(host.analysis().lookup("Parts::Part").is_none());
}

#[test]
fn test_library_directory_option() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Mini.kerml"),
        "library package Mini { datatype Token; }",
    )
    .unwrap();
    let options = EngineOptions::new().with_stdlib(StdLibSource::Directory(dir.path().to_path_buf()));

    let mut host = AnalysisHost::with_options(&options).unwrap();
    assert_eq!(host.library().map(|l| l.len()), Some(1));
    let file = host.set_file_content("use.kerml", "package Use { feature t : Mini::Token; }");
    assert!(host.analysis().diagnostics(file).is_empty());
    assert!(host.analysis().lookup("ScalarValues::Integer").is_none());
}

#[test]
fn test_library_directory_that_does_not_exist() {
    let options =
        EngineOptions::new().with_stdlib(StdLibSource::Directory(PathBuf::from("/no/such/library")));
    assert!(AnalysisHost::with_options(&options).is_err());
}

#[test]
fn test_unchanged_content_keeps_results() {
    let mut host = host_with(&[("v.sysml", VEHICLE)]);
    let before = lookup(&host, "Vehicles::Car");
    host.set_file_content("v.sysml", VEHICLE);
    assert_eq!(lookup(&host, "Vehicles::Car"), before);
}

#[test]
fn test_edit_cycle() {
    let mut host = host_with(&[]);
    let file = host.set_file_content("garage.sysml", "package Garage { part car : Car; }");
    let diagnostics = host.analysis().diagnostics(file);
    assert_eq!(with_code(&diagnostics, codes::UNDEFINED_REFERENCE).len(), 1);

    host.set_file_content(
        "garage.sysml",
        "package Garage { part def Car; part car : Car; }",
    );
    assert!(host.analysis().diagnostics(file).is_empty());

    host.set_file_content("garage.sysml", "package Garage { part def Car; part car : ");
    let diagnostics = host.analysis().diagnostics(file);
    assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::Syntax));

    assert!(host.remove_file("garage.sysml"));
    assert_eq!(host.file_count(), 0);
    assert!(host.analysis().lookup("Garage").is_none());
    assert!(host.analysis().diagnostics(file).is_empty());
}

#[test]
fn test_resolve_all_covers_every_document() {
    let mut host = host_with(&[]);
    let files: Vec<_> = (0..16)
        .map(|i| {
            let source = if i % 4 == 0 {
                format!("package P{i} {{ part p : Missing{i}; }}")
            } else {
                format!("package P{i} {{ part def D{i}; part p : D{i}; }}")
            };
            host.set_file_content(&format!("p{i}.sysml"), &source)
        })
        .collect();

    let all = host
        .analysis()
        .resolve_all(&CancellationToken::new())
        .unwrap();
    assert_eq!(all.len(), files.len());
    for (i, file) in files.iter().enumerate() {
        let expected = usize::from(i % 4 == 0);
        assert_eq!(all[file].len(), expected, "p{i}.sysml: {:?}", all[file]);
    }
}

#[test]
fn test_resolution_matches_per_file_diagnostics() {
    let mut host = host_with(&[]);
    let a = host.set_file_content("a.sysml", "package A { part x : B::Y; part z : Nope; }");
    let b = host.set_file_content("b.sysml", "package B { part def Y; import Gone::*; }");
    let analysis = host.analysis();
    let all = analysis.resolve_all(&CancellationToken::new()).unwrap();
    assert_eq!(all[&a], analysis.diagnostics(a));
    assert_eq!(all[&b], analysis.diagnostics(b));
    assert_eq!(with_code(&all[&b], codes::INVALID_IMPORT).len(), 1);
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_cancelled_requests(#[case] whole_workspace: bool) {
    let mut host = host_with(&[]);
    let file = host.set_file_content("a.sysml", VEHICLE);
    let token = CancellationToken::new();
    token.cancel();

    let analysis = host.analysis();
    if whole_workspace {
        assert_eq!(analysis.resolve_all(&token), Err(Cancelled));
    } else {
        assert_eq!(analysis.resolve_file(file, &token), Err(Cancelled));
    }
    // A fresh token still works afterwards.
    assert!(analysis.resolve_file(file, &CancellationToken::new()).is_ok());
}

#[test]
fn test_cancellation_from_another_thread() {
    let mut host = host_with(&[]);
    for i in 0..8 {
        host.set_file_content(&format!("v{i}.sysml"), &VEHICLE.replace("Vehicles", &format!("V{i}")));
    }
    let analysis = host.analysis();
    let token = CancellationToken::new();
    let result = std::thread::scope(|s| {
        s.spawn(|| token.cancel());
        analysis.resolve_all(&token)
    });
    // The token may fire before or after the work finishes.
    match result {
        Ok(all) => assert_eq!(all.len(), 8),
        Err(cancelled) => assert_eq!(cancelled, Cancelled),
    }
}

#[test]
fn test_evaluate_text_reports_parse_errors() {
    let host = host_with(&[("v.sysml", VEHICLE)]);
    let car = lookup(&host, "Vehicles::Car");
    let analysis = host.analysis();
    assert!(analysis.evaluate_text("wheels +", car).is_err());
    assert!(analysis.evaluate_text("wheels wheels", car).is_err());
    let ok = analysis.evaluate_text("wheels", car).unwrap();
    assert_eq!(ok.values.single_value(), Some(Value::Int(4)));
}

#[test]
fn test_hosts_share_the_parsed_library() {
    let first = AnalysisHost::new();
    let second = AnalysisHost::new();
    let (Some(a), Some(b)) = (first.library(), second.library()) else {
        panic!("both hosts carry the embedded library");
    };
    assert!(std::ptr::eq(a, b));
}
