//! End-to-end behaviour of paths, links, walks and shards on a small jewel

use boic_core::shard::scan;
use boic_core::{ErrorPolicy, FieldValue, Jewel, Shard};
use std::fs;
use std::path::Path;
use std::rc::Rc;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Two sites stored under `Data/`, reached from the root through a link,
/// and an inspection referencing one of them
fn jewel() -> (tempfile::TempDir, Rc<Jewel>) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "Data/AIOT/Nord.md", "---\ntype: AIOT\nnom: Usine Nord\n---\n");
    write(root, "Data/AIOT/Sud.md", "---\ntype: AIOT\nnom: Usine Sud\n---\n");
    write(root, "AIOT.jlnk", "Data/AIOT\n");
    write(
        root,
        "Inspections/2024-01.md",
        "---\ntype: INSPECTION\na: jewel://AIOT/Nord.md\ntags:\n- annuelle\n- electrique\n---\nRAS\n",
    );

    let jewel = Jewel::open(root).unwrap();
    (dir, jewel)
}

#[test]
fn test_link_segment_resolves_like_its_target() {
    let (_dir, jewel) = jewel();

    let through_link = jewel.path("AIOT/Nord.md");
    let direct = jewel.path("Data/AIOT/Nord.md");
    assert_eq!(
        through_link.canonicalize().unwrap(),
        direct.canonicalize().unwrap()
    );
    assert_eq!(jewel.stats().link_reads(), 1);

    // Idempotent and cached
    through_link.canonicalize().unwrap();
    assert_eq!(jewel.stats().link_reads(), 1);
}

#[test]
fn test_header_values_round_trip() {
    let (_dir, jewel) = jewel();
    let shard = Shard::load(&jewel.path("Inspections/2024-01.md")).unwrap();

    assert_eq!(shard.get("type").unwrap(), FieldValue::from("INSPECTION"));
    assert_eq!(
        shard.get("tags").unwrap(),
        FieldValue::List(vec!["annuelle".into(), "electrique".into()])
    );
    assert_eq!(shard.body(), "RAS\n");

    let markdown = shard.to_markdown().unwrap();
    let reparsed = Shard::parse(shard.path().clone(), &markdown).unwrap();
    assert_eq!(reparsed.meta(), shard.meta());
}

#[test]
fn test_references_load_on_first_field_access() {
    let (_dir, jewel) = jewel();
    let shard = Shard::load(&jewel.path("Inspections/2024-01.md")).unwrap();
    assert_eq!(jewel.stats().shard_loads(), 1);

    let site = shard.get("a").unwrap();
    assert!(!site.as_reference().unwrap().is_resolved());
    assert_eq!(jewel.stats().shard_loads(), 1);

    assert_eq!(site.get("nom").unwrap(), FieldValue::from("Usine Nord"));
    assert_eq!(jewel.stats().shard_loads(), 2);

    site.get("type").unwrap();
    assert_eq!(jewel.stats().shard_loads(), 2);
}

#[test]
fn test_scan_lists_linked_directory_once() {
    let (_dir, jewel) = jewel();

    let mut ids: Vec<String> = scan(&jewel, None, ErrorPolicy::Skip)
        .map(|shard| shard.unwrap().id())
        .collect();
    ids.sort();

    // Data/AIOT is listed once; the link to it is skipped as already walked
    assert_eq!(
        ids,
        ["/Data/AIOT/Nord.md", "/Data/AIOT/Sud.md", "/Inspections/2024-01.md"]
    );
}

#[test]
fn test_scan_reaches_deep_directory_through_link_within_depth() {
    let (_dir, jewel) = jewel();

    // Data/AIOT sits at depth 2; the root link brings it to depth 1
    let mut ids: Vec<String> = scan(&jewel, Some(1), ErrorPolicy::Skip)
        .map(|shard| shard.unwrap().id())
        .collect();
    ids.sort();
    assert_eq!(
        ids,
        ["/AIOT/Nord.md", "/AIOT/Sud.md", "/Inspections/2024-01.md"]
    );

    // Both routes fit in depth 2; each shard is still yielded once
    let ids: Vec<String> = scan(&jewel, Some(2), ErrorPolicy::Skip)
        .map(|shard| shard.unwrap().id())
        .collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_scan_relists_directory_first_reached_deeper() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "D/E/x.md", "---\ntype: AIOT\n---\n");
    write(root, "Y/L.jlnk", "../D");
    let jewel = Jewel::open(root).unwrap();

    // Y/L reaches D at depth 2 before D itself is popped at depth 1
    let ids: Vec<String> = scan(&jewel, Some(2), ErrorPolicy::Skip)
        .map(|shard| shard.unwrap().id())
        .collect();
    assert_eq!(ids, ["/D/E/x.md"]);
}

#[test]
fn test_walk_with_depth_zero_stays_at_root() {
    let (_dir, jewel) = jewel();

    let entries: Vec<_> = jewel.root().walk(Some(0)).collect();
    assert_eq!(entries.len(), 1);

    let dirs: Vec<&str> = entries[0].dirs.iter().filter_map(|d| d.file_name()).collect();
    assert_eq!(dirs, ["Data", "Inspections"]);
}
