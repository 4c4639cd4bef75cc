use docling_bridge::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../docling-bridge.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(cfg.processing.extract_tables);
    assert_eq!(cfg.processing.ocr_engine, "rapidocr");
    assert_eq!(cfg.processing.timeout_per_document, 300);
    assert_eq!(cfg.runner.scripts_dir, "scripts");
}

#[test]
fn defaults_survive_toml_round_trip() {
    let cfg = Config::default();
    let raw = toml::to_string(&cfg).expect("serialize");
    let back: Config = toml::from_str(&raw).expect("reparse");
    assert_eq!(back.processing, cfg.processing);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("").expect("empty TOML");
    assert_eq!(cfg.processing.num_threads, 4);
    assert!(!cfg.processing.ocr_enabled);
    assert_eq!(cfg.runner.python_exe, "auto");
}
