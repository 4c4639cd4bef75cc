use docling_bridge::config::DocumentConfig;
use docling_bridge::options::{AcceleratorDevice, OcrEngine, PipelineOptions};

#[test]
fn config_flags_map_onto_pipeline_options() {
    let cfg = DocumentConfig {
        extract_tables: false,
        extract_images: false,
        ocr_enabled: true,
        force_ocr: true,
        num_threads: 8,
        timeout_per_document: 60,
        accelerator_device: "gpu".into(),
        ..Default::default()
    };

    let opts = PipelineOptions::from_config(&cfg).unwrap();
    assert!(!opts.do_table_structure);
    assert!(!opts.generate_page_images);
    assert!(opts.do_ocr);
    assert!(opts.ocr.force_full_page_ocr);
    assert!(opts.do_cell_matching);
    assert_eq!(opts.document_timeout_seconds, 60);
    assert_eq!(opts.accelerator.num_threads, 8);
    assert_eq!(opts.accelerator.device, AcceleratorDevice::Gpu);
}

#[test]
fn device_names_parse_case_insensitively() {
    assert_eq!(AcceleratorDevice::parse("cpu"), AcceleratorDevice::Cpu);
    assert_eq!(AcceleratorDevice::parse("GPU"), AcceleratorDevice::Gpu);
    assert_eq!(AcceleratorDevice::parse("auto"), AcceleratorDevice::Auto);
    // Unknown devices degrade to auto instead of failing.
    assert_eq!(AcceleratorDevice::parse("npu"), AcceleratorDevice::Auto);
}

#[test]
fn ocr_engine_names_parse() {
    assert_eq!(OcrEngine::parse("rapidocr").unwrap(), OcrEngine::Rapidocr);
    assert_eq!(OcrEngine::parse("Tesserocr").unwrap(), OcrEngine::Tesserocr);
    assert_eq!(OcrEngine::parse("tesseract").unwrap(), OcrEngine::Tesseract);
    assert!(OcrEngine::parse("easyocr").is_err());
}

#[test]
fn unknown_ocr_engine_rejected_even_with_ocr_disabled() {
    let cfg = DocumentConfig {
        ocr_enabled: false,
        ocr_engine: "easyocr".into(),
        ..Default::default()
    };
    assert!(PipelineOptions::from_config(&cfg).is_err());
}
