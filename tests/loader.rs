use std::{fs, thread, time::Duration};

use stageview::app::loader::{ImageSource, LoadRequest, Loader};
use tempfile::tempdir;

mod common;
use common::{png_bytes, solid_image, write_image};

fn poll_until_complete(loader: &mut Loader) -> Vec<stageview::app::loader::LoadResult> {
    let mut results = Vec::new();
    for _ in 0..200 {
        results.extend(loader.poll());
        if loader.in_flight == 0 {
            break;
        }
        thread::sleep(Duration::from_millis(25));
    }
    results
}

#[test]
fn loader_decodes_a_file_for_the_requested_stage() {
    let tmp = tempdir().unwrap();
    let img_path = tmp.path().join("sample.png");
    write_image(&img_path, &solid_image(4, 4, [10, 20, 30, 255]));

    let mut loader = Loader::new();
    loader.request(LoadRequest {
        stage: 1,
        source: ImageSource::Path(img_path.clone()),
    });
    assert_eq!(loader.in_flight, 1);

    let results = poll_until_complete(&mut loader);
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.stage, 1);
    assert_eq!(result.label, img_path.display().to_string());
    let image = result.outcome.as_ref().unwrap();
    assert_eq!(image.size.x, 4.0);
    assert_eq!(image.size.y, 4.0);
}

#[test]
fn loader_decodes_raw_bytes() {
    let mut loader = Loader::new();
    loader.request(LoadRequest {
        stage: 0,
        source: ImageSource::Bytes {
            name: String::from("dropped.png"),
            bytes: png_bytes(&solid_image(2, 2, [1, 2, 3, 255])),
        },
    });

    let results = poll_until_complete(&mut loader);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "dropped.png");
    assert!(results[0].outcome.is_ok());
}

#[test]
fn loader_reports_decode_failures() {
    let tmp = tempdir().unwrap();
    let bad_path = tmp.path().join("broken.png");
    fs::write(&bad_path, b"definitely not a png").unwrap();

    let mut loader = Loader::new();
    loader.request(LoadRequest {
        stage: 0,
        source: ImageSource::Path(bad_path),
    });

    let results = poll_until_complete(&mut loader);
    assert_eq!(results.len(), 1);
    assert!(results[0].outcome.is_err());
}

#[test]
fn loader_reports_missing_files() {
    let mut loader = Loader::new();
    loader.request(LoadRequest {
        stage: 0,
        source: ImageSource::Path("/does/not/exist.png".into()),
    });

    let results = poll_until_complete(&mut loader);
    assert_eq!(results.len(), 1);
    let err = results[0].outcome.as_ref().unwrap_err();
    assert!(err.to_string().contains("unable to read"));
}
