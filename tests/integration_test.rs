use rhier::{parse_dataset, synthesize_ancestors, DataRecord, DatasetReader, DatasetWriter, JsonlDatasetReader};
use rhier::{
    Filterable, Hierarchy, HierarchyChart, HierarchyError, HierarchyFilter, Highlight, NodeOrigin, Partition,
    PathKey, Sunburst, TreeBuilder, Treemap, VirtualDatasetReader,
};
use anyhow::Result;
use std::collections::HashSet;
use std::env;
use std::fs;

fn sample_records() -> Vec<DataRecord> {
    vec![
        DataRecord::new(["US", "East", "Ontario"], 1.0),
        DataRecord::new(["US", "West", "Colorado"], 2.0),
        DataRecord::new(["CA", "East", "Ontario"], 4.0),
    ]
}

fn key(raw: &[&str]) -> PathKey {
    PathKey::from(raw)
}

fn child_keys(hierarchy: &Hierarchy, parent: &PathKey) -> HashSet<PathKey> {
    let id = hierarchy.find(parent).expect("parent present");
    hierarchy
        .children(id)
        .iter()
        .map(|c| hierarchy.node(*c).key.clone())
        .collect()
}

#[test]
fn test_write_and_read_dataset() -> Result<()> {
    let test_file = env::temp_dir().join("rhier_integration_basic.jsonl");
    let test_file = test_file.to_str().unwrap();

    let _ = fs::remove_file(test_file);

    {
        let mut writer = DatasetWriter::new(test_file)?;
        writer.write_header("1.0", serde_json::json!({"title": "Regions"}))?;
        for record in sample_records() {
            writer.write_data_record(&record)?;
        }
        writer.write_record(&key(&["MX"]), None, Some(serde_json::json!({"note": "no value"})))?;
        writer.write_footer()?;
        assert_eq!(writer.record_count(), 4);
    }

    let dataset = parse_dataset(test_file)?;
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.metadata.header.version, "1.0");
    assert_eq!(dataset.metadata.header.metadata["title"], "Regions");
    assert_eq!(dataset.metadata.footer.as_ref().and_then(|f| f.total_records), Some(4));
    assert_eq!(dataset.records[0].key, key(&["US", "East", "Ontario"]));
    assert_eq!(dataset.records[3].value, None);
    assert_eq!(dataset.total_value(), 7.0);

    // Missing values count as zero in the sums.
    let chart = HierarchyChart::builder(DataRecord::accessors(), Partition::new(100.0, 40.0)).build();
    let prepared = chart.prepare(&dataset.records)?;
    let root = prepared.hierarchy.node(prepared.hierarchy.root());
    assert_eq!(root.value, 7.0);
    let mx = prepared.hierarchy.find(&key(&["MX"])).unwrap();
    assert_eq!(prepared.hierarchy.node(mx).value, 0.0);

    fs::remove_file(test_file)?;
    Ok(())
}

#[test]
fn test_brotli_round_trip() -> Result<()> {
    let test_file = env::temp_dir().join("rhier_integration_compressed.jsonl.br");
    let test_file = test_file.to_str().unwrap();

    let _ = fs::remove_file(test_file);

    let records = VirtualDatasetReader::with_config(3, 4, 11).generate();
    {
        let mut writer = DatasetWriter::new(test_file)?;
        writer.write_header("1.0", serde_json::json!({"generator": "test"}))?;
        for record in &records {
            writer.write_data_record(record)?;
        }
        writer.write_footer()?;
        writer.flush()?;
    }

    let dataset = JsonlDatasetReader::new().read(test_file)?;
    assert_eq!(dataset.records, records);

    fs::remove_file(test_file)?;
    Ok(())
}

#[test]
fn test_duplicate_keys_rejected_on_load() -> Result<()> {
    let test_file = env::temp_dir().join("rhier_integration_duplicate.jsonl");
    let test_file = test_file.to_str().unwrap();

    {
        let mut writer = DatasetWriter::new(test_file)?;
        writer.write_header("1.0", serde_json::json!({}))?;
        writer.write_record(&key(&["A", "B"]), Some(1.0), None)?;
        writer.write_record(&key(&["A", "B"]), Some(2.0), None)?;
    }

    let err = parse_dataset(test_file).unwrap_err();
    assert!(err.to_string().contains("Duplicate record key 'A/B' at line 3"));

    fs::remove_file(test_file)?;
    Ok(())
}

#[test]
fn test_duplicate_keys_rejected_by_builder() {
    let records = vec![DataRecord::new(["A"], 1.0), DataRecord::new(["A"], 2.0)];
    let accessors = DataRecord::accessors();
    let err = TreeBuilder::new(&accessors).build(&records).unwrap_err();
    assert!(matches!(err, HierarchyError::DuplicateKey { .. }));
}

#[test]
fn test_synthesis_scenario() -> Result<()> {
    let records = sample_records();
    let keys: Vec<PathKey> = records.iter().map(|r| r.key.clone()).collect();

    let synthesized: HashSet<PathKey> = synthesize_ancestors(&keys).into_iter().collect();
    let expected: HashSet<PathKey> = [
        key(&["US"]),
        key(&["US", "East"]),
        key(&["US", "West"]),
        key(&["CA"]),
        key(&["CA", "East"]),
    ]
    .into_iter()
    .collect();
    assert_eq!(synthesized, expected);
    assert!(keys.iter().all(|k| !synthesized.contains(k)));

    let accessors = DataRecord::accessors();
    let hierarchy = TreeBuilder::new(&accessors).build(&records)?;
    assert_eq!(hierarchy.len(), 9);

    let root = hierarchy.node(hierarchy.root());
    assert!(root.key.is_root());
    assert_eq!(root.origin, NodeOrigin::ImplicitRoot);
    assert_eq!(root.value, 7.0);
    assert_eq!(
        child_keys(&hierarchy, &PathKey::root()),
        [key(&["US"]), key(&["CA"])].into_iter().collect()
    );

    let us_east = hierarchy.find(&key(&["US", "East"])).unwrap();
    assert_eq!(hierarchy.node(us_east).origin, NodeOrigin::Synthesized);
    Ok(())
}

#[test]
fn test_virtual_dataset_builds_complete_tree() -> Result<()> {
    let dataset = VirtualDatasetReader::with_config(4, 5, 7).read("")?;
    assert!(!dataset.is_empty());

    let accessors = DataRecord::accessors();
    let hierarchy = TreeBuilder::new(&accessors).build(&dataset.records)?;

    // One root, depth equals key length, every prefix present.
    let roots = hierarchy.nodes().iter().filter(|n| n.key.is_root()).count();
    assert_eq!(roots, 1);
    for node in hierarchy.nodes() {
        assert_eq!(node.depth, node.key.len());
    }
    for record in &dataset.records {
        for len in 0..record.key.len() {
            assert!(hierarchy.find(&record.key.prefix(len)).is_some());
        }
    }

    let root_value = hierarchy.node(hierarchy.root()).value;
    assert!((root_value - dataset.total_value()).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_filter_predicate_examples() {
    let filter = HierarchyFilter::new(key(&["A", "B"]));
    assert!(filter.is_filtered(&key(&["A", "B", "C"])));
    assert!(filter.is_filtered(&key(&["A"])));
    assert!(filter.is_filtered(&key(&["A", "B"])));
    assert!(!filter.is_filtered(&key(&["A", "X"])));
}

#[test]
fn test_click_toggle_round_trip() {
    let mut chart = HierarchyChart::builder(DataRecord::accessors(), Sunburst::new(100.0)).build();
    let path = key(&["US", "West"]);

    let first = chart.filter_set().resolve_click(&path);
    assert_eq!(first.add, Some(HierarchyFilter::new(path.clone())));
    chart.filter_set_mut().apply(&first);

    let second = chart.filter_set().resolve_click(&path);
    assert_eq!(second.add, None);
    chart.filter_set_mut().apply(&second);
    assert!(!chart.has_filter());
}

#[test]
fn test_disjoint_filters_coexist() -> Result<()> {
    let records = sample_records();
    let mut chart = HierarchyChart::builder(DataRecord::accessors(), Treemap::new(200.0, 100.0)).build();

    chart.filter_on_path(&key(&["CA", "East", "Ontario"]));
    chart.filter_on_path(&key(&["US", "West", "Colorado"]));
    assert_eq!(chart.filter_set().len(), 2);

    let passing: Vec<&PathKey> = chart.filter_records(&records).into_iter().map(|r| &r.key).collect();
    assert_eq!(passing, vec![&key(&["US", "West", "Colorado"]), &key(&["CA", "East", "Ontario"])]);

    assert_eq!(chart.highlight(&key(&["US"])), Highlight::Selected);
    assert_eq!(chart.highlight(&key(&["US", "East"])), Highlight::Deselected);
    Ok(())
}

#[test]
fn test_ancestor_click_replaces_descendant_filter() {
    let mut chart = HierarchyChart::builder(DataRecord::accessors(), Partition::default()).build();

    chart.filter_on_path(&key(&["CA", "East", "Ontario"]));
    let resolution = chart.filter_on_path(&key(&["CA", "East"]));

    assert_eq!(resolution.remove, vec![HierarchyFilter::new(key(&["CA", "East", "Ontario"]))]);
    assert_eq!(chart.filter_set().filters(), &[HierarchyFilter::new(key(&["CA", "East"]))]);
}

#[test]
fn test_layout_covers_every_node() -> Result<()> {
    let records = VirtualDatasetReader::with_config(3, 5, 3).generate();

    let treemap = HierarchyChart::builder(DataRecord::accessors(), Treemap::new(400.0, 300.0)).build();
    let prepared = treemap.prepare(&records)?;
    assert_eq!(prepared.geometry.len(), prepared.hierarchy.len());

    let root = prepared.geometry.get(prepared.hierarchy.root());
    for (_, extent) in prepared.geometry.iter() {
        assert!(extent.x0 >= root.x0 - 1e-6 && extent.x1 <= root.x1 + 1e-6);
        assert!(extent.y0 >= root.y0 - 1e-6 && extent.y1 <= root.y1 + 1e-6);
    }
    Ok(())
}

#[test]
fn test_random_clicks_keep_filters_an_antichain() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rhier::FilterSet;

    let records = VirtualDatasetReader::with_config(4, 4, 11).generate();
    let mut pool: Vec<PathKey> = records
        .iter()
        .flat_map(|r| (0..=r.key.len()).map(|n| r.key.prefix(n)).collect::<Vec<_>>())
        .collect();
    pool.sort();
    pool.dedup();

    let mut rng = StdRng::seed_from_u64(29);
    let mut filters = FilterSet::new();
    let mut previous = pool[rng.gen_range(0..pool.len())].clone();

    for step in 0..500 {
        let path = match rng.gen_range(0..5) {
            0 => previous.clone(),
            1 => previous.prefix(rng.gen_range(0..=previous.len())),
            2 => {
                let below: Vec<&PathKey> = pool.iter().filter(|k| previous.is_prefix_of(k)).collect();
                below[rng.gen_range(0..below.len())].clone()
            }
            3 => {
                let siblings: Vec<&PathKey> = pool
                    .iter()
                    .filter(|k| k.len() == previous.len() && k.parent() == previous.parent())
                    .collect();
                siblings[rng.gen_range(0..siblings.len())].clone()
            }
            _ => pool[rng.gen_range(0..pool.len())].clone(),
        };

        let resolution = filters.click(&path);
        let active = filters.filters();

        let unique: HashSet<&HierarchyFilter> = active.iter().collect();
        assert_eq!(unique.len(), active.len(), "duplicate filter after step {step} ({path})");
        for (i, a) in active.iter().enumerate() {
            for (j, b) in active.iter().enumerate() {
                assert!(
                    i == j || !a.is_filtered(b.target()),
                    "{a} and {b} are related after step {step} ({path})"
                );
            }
        }
        let targeted = active.iter().any(|f| f.target() == &path);
        assert_eq!(targeted, resolution.add.is_some(), "step {step} ({path})");

        previous = path;
    }
}
