use std::io::Write;

use airnet::{config::Config, Error};

#[test]
fn from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "country = \"Chile\"\nhistogram_bins = 12\n\n[communities]\nmin_degree = 2"
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.country, "Chile");
    assert_eq!(config.histogram_bins, 12);
    assert_eq!(config.communities.min_degree, 2);
    assert_eq!(config.robustness, Config::default().robustness);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("airnet.toml");

    match Config::from_file(&path) {
        Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
