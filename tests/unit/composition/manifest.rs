use super::*;
use crate::assets::decode::InMemoryLoader;

fn scratch(name: &str, body: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_manifest");
    std::fs::create_dir_all(&dir).unwrap();
    let p = dir.join(name);
    std::fs::write(&p, body).unwrap();
    p
}

#[test]
fn defaults_fill_missing_fields() {
    let m: Manifest = serde_json::from_str(r#"{ "items": [ { "path": "a.png" } ] }"#).unwrap();
    assert_eq!(m.canvas, Canvas::default());
    assert_eq!(m.transition_steps, 15);
    assert_eq!(m.items[0].hold_ms, 1000);
    assert!(m.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let zero_steps: Manifest =
        serde_json::from_str(r#"{ "transition_steps": 0, "items": [] }"#).unwrap();
    assert!(matches!(
        zero_steps.validate(),
        Err(GifweaveError::Configuration(_))
    ));

    let zero_hold: Manifest =
        serde_json::from_str(r#"{ "items": [ { "path": "a.png", "hold_ms": 0 } ] }"#).unwrap();
    assert!(zero_hold.validate().is_err());

    let long_hold: Manifest =
        serde_json::from_str(r#"{ "items": [ { "path": "a.png", "hold_ms": 700000 } ] }"#)
            .unwrap();
    assert!(matches!(
        long_hold.validate(),
        Err(GifweaveError::Configuration(_))
    ));

    let zero_canvas: Manifest = serde_json::from_str(
        r#"{ "canvas": { "width": 0, "height": 10 }, "items": [] }"#,
    )
    .unwrap();
    assert!(zero_canvas.validate().is_err());
}

#[test]
fn load_resolves_relative_paths_against_manifest_dir() {
    let p = scratch(
        "rel.json",
        r#"{ "transition_steps": 3, "items": [ { "path": "img/a.png", "hold_ms": 250 } ] }"#,
    );
    let m = Manifest::load(&p).unwrap();
    assert_eq!(
        m.items[0].path,
        PathBuf::from("target/unit_manifest/img/a.png")
    );
    assert_eq!(m.export_opts().transition_steps, 3);
}

#[test]
fn load_reports_malformed_json_as_configuration_error() {
    let p = scratch("broken.json", "{ not json");
    assert!(matches!(
        Manifest::load(&p),
        Err(GifweaveError::Configuration(_))
    ));
    assert!(Manifest::load(Path::new("target/unit_manifest/absent.json")).is_err());
}

#[test]
fn to_sequence_skips_undecodable_items() {
    let loader = InMemoryLoader::new()
        .with("a.png", image::RgbImage::new(2, 2))
        .with("c.png", image::RgbImage::new(2, 2));
    let m: Manifest = serde_json::from_str(
        r#"{ "items": [ { "path": "a.png", "hold_ms": 300 }, { "path": "b.png" }, { "path": "c.png" } ] }"#,
    )
    .unwrap();

    let (seq, rejected) = m.to_sequence(&loader);
    assert_eq!(seq.len(), 2);
    assert_eq!(seq.get(0).unwrap().hold_ms, 300);
    assert_eq!(seq.get(1).unwrap().display_name, "c.png");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].item_name(), Some("b.png"));
}
