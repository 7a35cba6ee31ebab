//! Snapshot update semantics and the project host.

use std::sync::Arc;

use rstest::rstest;
use typesys::hir::{
    AssemblyName, AssemblyReference, ParsedFile, ProjectContent, UnresolvedTypeDefinition, Version,
};
use typesys::ide::ProjectHost;

fn file(identity: &str, name: &str) -> ParsedFile {
    ParsedFile::new(identity, [UnresolvedTypeDefinition::class("", name)])
}

fn assembly(name: &str, exports: &[&str]) -> AssemblyReference {
    AssemblyReference::new(
        AssemblyName::new(name, Version::new(1, 0, 0, 0)),
        exports.iter().map(|e| UnresolvedTypeDefinition::class("Lib", *e)),
    )
}

fn identities(project: &ProjectContent) -> Vec<&str> {
    project.files().map(|f| f.identity()).collect()
}

#[rstest]
#[case::add(|p: &ProjectContent| p.with_updated_file(file("c.cs", "C")))]
#[case::replace(|p: &ProjectContent| p.with_updated_file(file("a.cs", "A2")))]
#[case::remove(|p: &ProjectContent| p.without_file("a.cs"))]
#[case::remove_missing(|p: &ProjectContent| p.without_file("zzz.cs"))]
#[case::references(|p: &ProjectContent| p.with_assembly_references([assembly("lib", &["X"])]))]
#[case::rename(|p: &ProjectContent| p.update_file(Some("a.cs"), Some(file("z.cs", "A"))))]
#[case::name(|p: &ProjectContent| p.with_assembly_name("App"))]
fn test_every_update_advances_version_and_leaves_receiver(#[case] update: fn(&ProjectContent) -> ProjectContent) {
    let base = ProjectContent::new()
        .with_updated_file(file("a.cs", "A"))
        .with_updated_file(file("b.cs", "B"));
    let before = identities(&base).join(",");

    let next = update(&base);

    assert_eq!(next.version(), base.version() + 1);
    assert_eq!(identities(&base).join(","), before);
    assert_eq!(base.file("a.cs").map(|f| f.top_level_type_definitions()[0].name.as_str()), Some("A"));
}

#[test]
fn test_update_shares_untouched_files() {
    let base = ProjectContent::new()
        .with_updated_file(file("a.cs", "A"))
        .with_updated_file(file("b.cs", "B"));
    let next = base.with_updated_file(file("b.cs", "B2"));

    assert!(Arc::ptr_eq(base.file("a.cs").unwrap(), next.file("a.cs").unwrap()));
    assert!(!Arc::ptr_eq(base.file("b.cs").unwrap(), next.file("b.cs").unwrap()));
    assert_eq!(identities(&next), vec!["a.cs", "b.cs"]);
}

#[test]
fn test_remove_preserves_relative_order() {
    let project = ProjectContent::new()
        .with_updated_file(file("a.cs", "A"))
        .with_updated_file(file("b.cs", "B"))
        .with_updated_file(file("c.cs", "C"))
        .without_file("b.cs");

    assert_eq!(identities(&project), vec!["a.cs", "c.cs"]);
}

#[test]
fn test_assembly_collision_last_value_wins_first_position_kept() {
    let project = ProjectContent::new()
        .with_assembly_references([assembly("one", &["Old"]), assembly("two", &["Two"])])
        .with_assembly_references([assembly("one", &["New"])]);

    let names: Vec<_> = project
        .assembly_references()
        .map(|a| a.identity().name.to_string())
        .collect();
    assert_eq!(names, vec!["one", "two"]);

    let compilation = project.create_compilation();
    assert!(compilation.resolve("Lib", "Old", 0).unwrap().is_unknown());
    assert!(!compilation.resolve("Lib", "New", 0).unwrap().is_unknown());
}

#[test]
fn test_removing_reference_hides_its_types() {
    let lib = AssemblyName::new("lib", Version::new(1, 0, 0, 0));
    let with = ProjectContent::new().with_assembly_references([assembly("lib", &["X"])]);
    let without = with.without_assembly_references([&lib]);

    assert!(!with.create_compilation().resolve("Lib", "X", 0).unwrap().is_unknown());
    assert!(without.create_compilation().resolve("Lib", "X", 0).unwrap().is_unknown());
}

#[test]
fn test_host_concurrent_updates_are_all_applied() {
    let host = ProjectHost::default();

    std::thread::scope(|scope| {
        for i in 0..16 {
            let host = &host;
            scope.spawn(move || {
                host.set_file(file(&format!("f{i}.cs"), &format!("T{i}")));
            });
        }
    });

    assert_eq!(host.version(), 16);
    assert_eq!(host.snapshot().file_count(), 16);

    let compilation = host.compilation();
    assert!(Arc::ptr_eq(&compilation, &host.compilation()));
    assert_eq!(compilation.all_type_definitions().len(), 16);
}
