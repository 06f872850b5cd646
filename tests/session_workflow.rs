//! End-to-end session behaviour over a dataset laid out on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use seqattr::{
    AnnotationSession, AttributeCode, BoundingBox, LabelStorage, NpzLabelStore, SessionConfig,
    SessionError, SessionState,
};

/// Create `<root>/benchmarkDatasets/<name>/img/0001.jpg..` and an optional
/// ground-truth file with one box per frame.
fn make_sequence(data_root: &Path, name: &str, frames: u32, gt_file: Option<&str>) {
    let seq = data_root.join("benchmarkDatasets").join(name);
    let img = seq.join("img");
    fs::create_dir_all(&img).unwrap();
    for i in 1..=frames {
        fs::write(img.join(format!("{:04}.jpg", i)), b"").unwrap();
    }
    if let Some(gt_file) = gt_file {
        let content: String = (1..=frames)
            .map(|i| format!("{},{},20,30\n", i, i * 2))
            .collect();
        fs::write(seq.join(gt_file), content).unwrap();
    }
}

fn open_session(data_root: &Path) -> AnnotationSession {
    AnnotationSession::from_config(&SessionConfig::from_data_root(data_root)).unwrap()
}

#[test]
fn test_catalog_expands_two_segment_sequence() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "Skating2", 3, Some("groundtruth_rect.1.txt"));
    make_sequence(dir.path(), "Basketball", 3, Some("groundtruth_rect.txt"));
    fs::create_dir_all(dir.path().join("benchmarkDatasets").join("anno")).unwrap();

    let session = open_session(dir.path());
    let ids = session.catalog().list().unwrap();

    assert_eq!(ids, vec!["Basketball", "Skating2-1", "Skating2-2"]);
    assert!(!ids.contains(&"Skating2".to_string()));
}

#[test]
fn test_segment_loads_its_own_ground_truth_and_label_file() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "Jogging", 4, Some("groundtruth_rect.1.txt"));

    let mut session = open_session(dir.path());
    session.select_sequence("Jogging-1").unwrap();
    assert_eq!(session.current_page()[0].bbox, Some(BoundingBox::new(1, 2, 20, 30)));

    // Segment 2 has no ground-truth file: frames load without boxes
    session.select_sequence("Jogging-2").unwrap();
    assert_eq!(session.frame_count(), 4);
    assert!(session.current_page().iter().all(|e| e.bbox.is_none()));

    session.set_attribute(0, 4).unwrap();
    session.close().unwrap();

    let attr_root = dir.path().join("otb-1occ-2def-3blur-4OccBlur");
    assert!(attr_root.join("Jogging-2.npz").exists());
    assert!(!attr_root.join("Jogging.npz").exists());
}

#[test]
fn test_frame_range_clips_frames_and_boxes() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "David", 50, Some("groundtruth_rect.txt"));
    let ranges = dir.path().join("ranges.txt");
    fs::write(&ranges, "David 10 40\n").unwrap();

    let config = SessionConfig::from_data_root(dir.path()).with_frame_range_file(&ranges);
    let mut session = AnnotationSession::from_config(&config).unwrap();
    session.select_sequence("David").unwrap();

    assert_eq!(session.frame_count(), 31);
    assert_eq!(session.labels().unwrap().len(), 31);
    let first = session.current_page()[0];
    assert_eq!(first.frame.number, Some(10));
    assert_eq!(first.bbox, Some(BoundingBox::new(10, 20, 20, 30)));
}

#[test]
fn test_labels_survive_switch_and_reload() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "Basketball", 20, Some("groundtruth_rect.txt"));
    make_sequence(dir.path(), "Car1", 5, None);

    let mut session = open_session(dir.path());
    session.select_sequence("Basketball").unwrap();
    session.set_attribute(0, 1).unwrap();
    session.set_attribute(19, 3).unwrap();
    assert_eq!(session.state(), SessionState::Dirty);

    session.select_sequence("Car1").unwrap();
    assert_eq!(session.state(), SessionState::Loaded);
    drop(session);

    let mut session = open_session(dir.path());
    session.select_sequence("Basketball").unwrap();
    let labels = session.labels().unwrap();
    assert_eq!(labels[0], AttributeCode::Occlusion);
    assert_eq!(labels[19], AttributeCode::Blur);
    assert_eq!(labels.counts()[0], 18);
}

#[test]
fn test_stored_labels_are_padded_to_frame_count() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "Car1", 8, None);

    let attr_root = dir.path().join("otb-1occ-2def-3blur-4OccBlur");
    let stored = [2u8, 2, 1]
        .iter()
        .map(|&v| AttributeCode::try_from(v).unwrap())
        .collect();
    NpzLabelStore::new()
        .save(&attr_root.join("Car1.npz"), &stored)
        .unwrap();

    let mut session = open_session(dir.path());
    session.select_sequence("Car1").unwrap();

    assert_eq!(
        session.labels().unwrap().to_raw(),
        vec![2, 2, 1, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_corrupt_label_file_blocks_switch() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "Basketball", 3, None);
    make_sequence(dir.path(), "Car1", 3, None);
    let attr_root = dir.path().join("otb-1occ-2def-3blur-4OccBlur");
    fs::create_dir_all(&attr_root).unwrap();
    fs::write(attr_root.join("Car1.npz"), b"garbage").unwrap();

    let mut session = open_session(dir.path());
    session.select_sequence("Basketball").unwrap();
    session.set_attribute(1, 2).unwrap();

    let err = session.select_sequence("Car1").unwrap_err();
    assert!(matches!(err, SessionError::LabelStore(_)));
    assert_eq!(session.active_id(), Some("Basketball"));
    // Outgoing edits were flushed before the failed load
    assert_eq!(session.state(), SessionState::Loaded);
    assert_eq!(fs::read(attr_root.join("Car1.npz")).unwrap(), b"garbage");
}

#[test]
fn test_missing_dataset_root() {
    let dir = TempDir::new().unwrap();
    let mut session = open_session(dir.path());

    assert!(matches!(
        session.select_sequence("Basketball"),
        Err(SessionError::Catalog(seqattr::CatalogError::DatasetRootNotFound { .. }))
    ));
    assert_eq!(session.state(), SessionState::Empty);
}

#[test]
fn test_frame_range_absorbs_box_offset() {
    let dir = TempDir::new().unwrap();
    make_sequence(dir.path(), "Tiger1", 354, None);
    let seq = dir.path().join("benchmarkDatasets").join("Tiger1");
    let content: String = (1..=354).map(|i| format!("{},0,10,10\n", i)).collect();
    fs::write(seq.join("groundtruth_rect.txt"), content).unwrap();
    let ranges = dir.path().join("ranges.txt");
    fs::write(&ranges, "Tiger1 6 354\n").unwrap();

    let config = SessionConfig::from_data_root(dir.path()).with_frame_range_file(&ranges);
    let mut session = AnnotationSession::from_config(&config).unwrap();
    session.select_sequence("Tiger1").unwrap();

    let frames = session.frames();
    assert_eq!(frames.len(), 349);
    for frame in frames {
        // Box line n carries x = n
        assert_eq!(frame.bbox.map(|b| b.x), frame.number.map(i64::from));
    }
    assert_eq!(frames[0].number, Some(6));
    assert_eq!(frames[0].bbox, Some(BoundingBox::new(6, 0, 10, 10)));
}
