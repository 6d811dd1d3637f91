//! The standard library as seen by user models.

use std::fs;

use rstest::rstest;
use syster::ide::{AnalysisHost, EngineOptions};
use syster::project::StdLibSource;
use tempfile::TempDir;

use crate::helpers::model_helpers::{host_with_stdlib, lookup};

#[rstest]
#[case("Base::Anything")]
#[case("Base::things")]
#[case("ScalarValues::Integer")]
#[case("ScalarValues::Real")]
#[case("ScalarValues::String")]
#[case("ScalarValues::Boolean")]
#[case("Parts::Part")]
#[case("Ports::Port")]
#[case("Metadata::MetadataItem")]
#[case("IntegerFunctions::Range")]
fn test_library_names_resolve(#[case] name: &str) {
    let host = AnalysisHost::new();
    assert!(host.analysis().lookup(name).is_some(), "{name} is missing");
}

#[test]
fn test_library_resolves_without_diagnostics() {
    let host = AnalysisHost::new();
    let analysis = host.analysis();
    let model = analysis.model();
    let library = host.library().unwrap();
    for document in library.documents() {
        let root = model.document_root(document.file()).unwrap();
        let found = analysis.resolve(root);
        assert!(
            found.is_empty(),
            "{}: {found:#?}",
            document.path().display()
        );
    }
}

#[test]
fn test_integer_conforms_to_real() {
    let host = AnalysisHost::new();
    let model = host.analysis().model();
    let integer = lookup(&host, "ScalarValues::Integer");
    let real = lookup(&host, "ScalarValues::Real");
    assert!(model.conforms(integer, real));
    assert!(!model.conforms(real, integer));
}

#[test]
fn test_usage_conforms_to_library_feature() {
    let host = host_with_stdlib(&[("test.sysml", "package P { part def Car; part car : Car; }")]);
    let model = host.analysis().model();
    let car = lookup(&host, "P::car");
    assert!(model.conforms(car, lookup(&host, "Parts::parts")));
    assert!(model.conforms(car, lookup(&host, "Base::things")));
}

#[test]
fn test_library_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Base.kerml"),
        "library package Base { abstract classifier Anything; abstract feature things : Anything; }",
    )
    .unwrap();
    fs::write(
        dir.path().join("Parts.sysml"),
        "library package Parts { abstract part def Part :> Base::Anything; }",
    )
    .unwrap();

    let options = EngineOptions::new().with_stdlib(StdLibSource::Directory(dir.path().to_path_buf()));
    let mut host = AnalysisHost::with_options(&options).unwrap();
    assert_eq!(host.library().unwrap().len(), 2);

    host.set_file_content("test.sysml", "package P { part def Car; }");
    let model = host.analysis().model();
    let car = lookup(&host, "P::Car");
    assert_eq!(&*model.direct_generals(car), &[lookup(&host, "Parts::Part")]);
}

#[test]
fn test_missing_library_directory_fails() {
    let options = EngineOptions::new().with_stdlib(StdLibSource::Directory("/definitely/not/here".into()));
    assert!(AnalysisHost::with_options(&options).is_err());
}
