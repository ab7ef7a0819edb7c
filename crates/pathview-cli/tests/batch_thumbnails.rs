use std::fs;
use std::path::Path;

use pathview_cli::errors::ThumbnailError;
use pathview_cli::output::BatchReport;
use pathview_cli::types::ThumbnailConfig;
use pathview_cli::ThumbnailBatch;
use pathview_core::PathviewError;

const HEADER: &str = "time,posx,posy,posz,dirx,diry,dirz,fx,fy,fz,nav";

fn write_session(dir: &Path, name: &str, nav: &str) {
    let mut body = String::from(HEADER);
    body.push('\n');
    for (t, (x, d)) in [(-0.57, 0.2), (-0.569, 0.222), (-0.566, 0.254)]
        .into_iter()
        .enumerate()
    {
        body.push_str(&format!(
            "{},{x},{},{},{d},-0.8,-0.5,0,0,0,{nav}\n",
            t + 1,
            1.57 + 0.03 * t as f64,
            3.5 - 0.01 * t as f64
        ));
    }
    fs::write(dir.join(name), body).unwrap();
}

fn small_config() -> ThumbnailConfig {
    ThumbnailConfig {
        figure_size: 160,
        ..ThumbnailConfig::default()
    }
}

#[test]
fn writes_into_input_dir_without_output_dir() {
    let root = tempfile::TempDir::new().unwrap();
    let input = root.path().join("sessA");
    fs::create_dir_all(&input).unwrap();
    write_session(&input, "A.csv", "VR");
    write_session(&input, "B.csv", "AR");

    let config = ThumbnailConfig {
        suffix: "-prev".to_string(),
        ..small_config()
    };
    let report = ThumbnailBatch::new(config).run(&input, None).unwrap();

    assert!(report.passed());
    assert_eq!(report.written(), 2);
    assert!(input.join("A-prev.jpg").is_file());
    assert!(input.join("B-prev.jpg").is_file());
}

#[test]
fn writes_into_named_subfolder_of_output_dir() {
    let root = tempfile::TempDir::new().unwrap();
    let input = root.path().join("sessA");
    let out = root.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::create_dir_all(&out).unwrap();
    write_session(&input, "A.csv", "VR");
    write_session(&input, "B.csv", "AR");

    let config = ThumbnailConfig {
        extension: ".png".to_string(),
        ..small_config()
    };
    let report = ThumbnailBatch::new(config)
        .run(&input, Some(out.as_path()))
        .unwrap();

    let thumbs = out.join("sessA-thumbnails");
    assert_eq!(report.output_dir, thumbs);
    assert!(thumbs.join("A.png").is_file());
    assert!(thumbs.join("B.png").is_file());
    assert!(!input.join("A.png").exists());

    let image = image::open(thumbs.join("A.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (160, 160));
    assert_eq!(image.get_pixel(0, 0)[3], 0);
}

#[test]
fn failing_session_is_reported_and_others_continue() {
    let root = tempfile::TempDir::new().unwrap();
    let input = root.path().join("mixed");
    fs::create_dir_all(&input).unwrap();
    write_session(&input, "A.csv", "VR");
    fs::write(input.join("B.csv"), "time,posx,posy\n1,0,0\n").unwrap();
    write_session(&input, "C.csv", "AR");

    let summary = root.path().join("summary.json");
    let config = ThumbnailConfig {
        summary_path: Some(summary.clone()),
        ..small_config()
    };
    let report = ThumbnailBatch::new(config).run(&input, None).unwrap();

    assert_eq!(report.written(), 2);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].session, "B");
    assert!(failures[0].error.as_deref().unwrap().contains("posz"));
    assert!(input.join("C.jpg").is_file());

    let saved: BatchReport = serde_json::from_str(&fs::read_to_string(summary).unwrap()).unwrap();
    assert_eq!(saved.sessions.len(), 3);
}

#[test]
fn unparseable_session_file_does_not_stop_the_batch() {
    let root = tempfile::TempDir::new().unwrap();
    let input = root.path().join("mixed");
    fs::create_dir_all(&input).unwrap();
    write_session(&input, "A.csv", "VR");
    fs::write(input.join("B.csv"), "time,posx\n1,0.5,9\n").unwrap();
    write_session(&input, "C.csv", "AR");

    let report = ThumbnailBatch::new(small_config()).run(&input, None).unwrap();

    assert!(input.join("A.jpg").is_file());
    assert!(input.join("C.jpg").is_file());
    assert_eq!(report.written(), 2);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!((failures[0].id, failures[0].session.as_str()), (1, "B"));
    assert!(failures[0].error.as_deref().unwrap().contains("line 2"));
}

#[test]
fn fail_fast_reports_unparseable_session_file() {
    let root = tempfile::TempDir::new().unwrap();
    let input = root.path().join("mixed");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("A.csv"), "time,posx\n1,0.5,9\n").unwrap();
    write_session(&input, "B.csv", "VR");

    let config = ThumbnailConfig {
        continue_on_error: false,
        ..small_config()
    };
    let err = ThumbnailBatch::new(config).run(&input, None).unwrap_err();

    match err {
        ThumbnailError::SessionFailed { session, source } => {
            assert_eq!(session, "A");
            assert!(matches!(
                *source,
                ThumbnailError::Session(PathviewError::TableFormat { line: 2, .. })
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!input.join("B.jpg").exists());
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let root = tempfile::TempDir::new().unwrap();
    let input = root.path().join("mixed");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("A.csv"), "stamp,posx,posy,posz\n1,0,0,0\n").unwrap();
    write_session(&input, "B.csv", "VR");

    let config = ThumbnailConfig {
        continue_on_error: false,
        ..small_config()
    };
    let err = ThumbnailBatch::new(config).run(&input, None).unwrap_err();

    match err {
        ThumbnailError::SessionFailed { session, .. } => assert_eq!(session, "A"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!input.join("B.jpg").exists());
}

#[test]
fn missing_input_directory_is_rejected() {
    let err = ThumbnailBatch::new(small_config())
        .run("/nonexistent/sessions", None)
        .unwrap_err();
    assert!(matches!(err, ThumbnailError::NotADirectory(_)));
}
