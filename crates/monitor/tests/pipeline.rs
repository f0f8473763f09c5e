use image::{ImageFormat, Rgba, RgbaImage};
use monitor::{
    CategoryLabel, Disease, MonitorCommand, MonitorOutcome, MonitorService, Pipeline,
    PipelineSettings, PipelineBuilder, ScriptedRandom, SeededRandom, Severity,
};
use std::io::Cursor;

fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("monitor-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

#[test]
fn photo_results_respect_bounds() {
    let pipeline = Pipeline::builder().build();
    let image = RgbaImage::from_fn(40, 30, |x, y| {
        Rgba([200u8.saturating_sub((x * 3) as u8), 120, (y * 6) as u8, 255])
    });

    for seed in 0..32 {
        let result = pipeline
            .analyze_photo(&image, None, &mut SeededRandom::new(seed))
            .unwrap();
        assert!(result.confidence > 0.0 && result.confidence <= 0.95);
        assert_ne!(result.severity, Severity::Unknown);
        assert_eq!(result.symptoms.len(), 3);
        if result.primary_disease == Disease::Normal {
            assert_eq!(result.severity, Severity::None);
        }
    }
}

#[test]
fn settings_from_json_drive_the_builder() {
    let settings: PipelineSettings =
        serde_json::from_str(r#"{"sample_stride": 1, "symptom_count": 2}"#).unwrap();
    let pipeline = PipelineBuilder::from_settings(&settings).build();
    let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

    let features = pipeline.features(&image).unwrap();
    assert_eq!(features.sampled_pixels, 16);

    let result = pipeline
        .analyze_photo(&image, Some("chest_pa.png"), &mut ScriptedRandom::constant(0.5))
        .unwrap();
    assert_eq!(result.category, CategoryLabel::Chest);
    assert_eq!(result.symptoms.len(), 2);
}

#[tokio::test]
async fn commands_run_against_files() {
    let service = MonitorService::with_pipeline(
        Pipeline::builder().build(),
        Box::new(SeededRandom::new(3)),
    );

    let photo = temp_file(
        "gum_closeup.png",
        &encode_png(&RgbaImage::from_pixel(8, 8, Rgba([230, 170, 180, 255]))),
    );
    let outcome = service
        .execute(MonitorCommand::AnalyzePhoto {
            path: photo.display().to_string(),
            filename_hint: None,
        })
        .await
        .unwrap();
    let MonitorOutcome::Photo(submission) = outcome else {
        panic!("expected a photo outcome");
    };
    assert_eq!(submission.analysis.category, CategoryLabel::Dental);
    assert_eq!(submission.files[0].name, "gum_closeup.png");

    let report = temp_file("discharge.txt", b"Diagnosis: acute cystitis. Start nitrofurantoin.");
    let outcome = service
        .execute(MonitorCommand::AnalyzeReport {
            path: report.display().to_string(),
        })
        .await
        .unwrap();
    let MonitorOutcome::Report(submission) = outcome else {
        panic!("expected a report outcome");
    };
    assert_eq!(submission.analysis.primary_condition, "Urinary Tract Infection");
    assert_eq!(submission.analysis.suspected_pathogen, "Escherichia coli");
    assert!(submission.analysis.confidence >= 0.85 && submission.analysis.confidence < 0.95);
}
