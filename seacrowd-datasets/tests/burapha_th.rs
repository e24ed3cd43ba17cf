use seacrowd::{DatasetBuilder, Error, LoadRequest, MirrorResolver, Result, Split};
use seacrowd_datasets::vision::burapha_th::{BuraphaTh, BuraphaThSource};
use seacrowd_datasets::Loader;
use std::fs;
use std::path::{Path, PathBuf};

fn digit_root(mirror: &Path) -> PathBuf {
    mirror
        .join("services.informatics.buu.ac.th")
        .join("datasets")
        .join("Burapha-TH")
        .join("digit")
}

// Two classes in train, one in test, files created out of order.
fn write_digits(mirror: &Path) -> Result<PathBuf> {
    let root = digit_root(mirror);
    for (dir, files) in [
        ("20210307-train/train/07-seven", &["b.png", "a.png"][..]),
        ("20210307-train/train/00-zero", &["c.png"][..]),
        ("20210307-test/test/03-three", &["d.png"][..]),
    ] {
        fs::create_dir_all(root.join(dir))?;
        for file in files {
            fs::write(root.join(dir).join(file), b"")?;
        }
    }
    Ok(root)
}

#[test]
fn digit_source() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = write_digits(tmp.path())?;
    let builder = BuraphaTh::from_request(&LoadRequest::new("burapha_th", Some("digit"), "source"))?;
    let resolver = MirrorResolver::new(tmp.path());

    let train = builder
        .generate(&resolver, Split::Train)?
        .collect::<Result<Vec<_>>>()?;
    let sources = train
        .iter()
        .map(|(id, r)| (*id, r.as_source().cloned()))
        .collect::<Vec<_>>();
    let source = |id: &str, path: &str, label: usize| {
        Some(BuraphaThSource {
            id: id.to_string(),
            image_paths: root.join(path).to_string_lossy().into_owned(),
            label: vec![label],
        })
    };
    assert_eq!(
        sources,
        [
            (0, source("0", "20210307-train/train/00-zero/c.png", 0)),
            (1, source("1", "20210307-train/train/07-seven/a.png", 7)),
            (2, source("2", "20210307-train/train/07-seven/b.png", 7)),
        ]
    );

    // Test images come from the test archive, not the train one.
    let test = builder
        .generate(&resolver, Split::Test)?
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(test.len(), 1);
    assert_eq!(test[0].1.as_source(), source("0", "20210307-test/test/03-three/d.png", 3).as_ref());
    Ok(())
}

#[test]
fn digit_image_text() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_digits(tmp.path())?;
    let loader = Loader::from_config_name("burapha_th_digit_seacrowd_imtext")?;
    let resolver = MirrorResolver::new(tmp.path());

    let train = loader
        .generate_json(&resolver, Split::Train)?
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(train.len(), 3);
    let (id, first) = &train[1];
    assert_eq!(*id, 1);
    assert_eq!(first["id"], "1");
    assert_eq!(first["texts"], serde_json::Value::Null);
    assert_eq!(first["metadata"]["context"], serde_json::Value::Null);
    assert_eq!(first["metadata"]["labels"], serde_json::json!([7]));
    assert_eq!(first["image_paths"].as_array().map(|p| p.len()), Some(1));

    let features = serde_json::to_value(loader.describe_schema())?;
    assert_eq!(features["metadata"]["fields"]["labels"]["_type"], "Sequence");
    Ok(())
}

#[test]
fn labels_decode_back() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_digits(tmp.path())?;
    let builder = BuraphaTh::from_request(&LoadRequest::new("burapha_th", Some("digit"), "source"))?;
    let resolver = MirrorResolver::new(tmp.path());
    for example in builder.generate(&resolver, Split::Train)? {
        let (_, record) = example?;
        let source = record.as_source().ok_or(Error::msg("expected a source record"))?;
        let dir = Path::new(&source.image_paths)
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .ok_or(Error::msg("no class directory"))?;
        let code = builder.labels().int2str(source.label[0])?;
        assert!(dir.starts_with(&format!("{code}-")), "{dir} {code}");
    }
    Ok(())
}

#[test]
fn missing_test_archive() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = write_digits(tmp.path())?;
    fs::remove_dir_all(root.join("20210307-test"))?;
    let builder = BuraphaTh::from_request(&LoadRequest::new("burapha_th", Some("digit"), "source"))?;
    let resolver = MirrorResolver::new(tmp.path());
    assert!(matches!(
        builder.generate(&resolver, Split::Train),
        Err(Error::MissingPath { .. })
    ));
    Ok(())
}

#[test]
fn unknown_label_directory() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = write_digits(tmp.path())?;
    fs::create_dir_all(root.join("20210307-train/train/99-nope"))?;
    fs::write(root.join("20210307-train/train/99-nope/e.png"), b"")?;
    let builder = BuraphaTh::from_request(&LoadRequest::new("burapha_th", Some("digit"), "source"))?;
    let resolver = MirrorResolver::new(tmp.path());
    let examples = builder.generate(&resolver, Split::Train)?.collect::<Vec<_>>();
    assert_eq!(examples.len(), 4);
    assert!(examples[..3].iter().all(|e| e.is_ok()));
    assert!(matches!(examples[3], Err(Error::UnknownLabel { .. })));
    Ok(())
}

#[test]
fn bad_schema() {
    assert!(matches!(
        Loader::from_config_name("burapha_th_digit_bogus_schema"),
        Err(Error::UnknownSchema { .. })
    ));
    assert!(matches!(
        BuraphaTh::from_request(&LoadRequest::new("burapha_th", Some("digit"), "seacrowd_sptext")),
        Err(Error::UnsupportedSchema { .. })
    ));
}
