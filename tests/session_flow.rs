use chrono::NaiveDate;

use infrasight::{
    Analyzer, CostTable, OverlayRenderer, Preset, ReportDocument, ScriptedAnalyzer, Session,
    UploadedFile, WorkOrder,
};

fn batch(n: usize) -> Vec<UploadedFile> {
    (0..n)
        .map(|i| UploadedFile::new(format!("pier_{}.jpg", i), 150_000 + i as u64, "image/jpeg"))
        .collect()
}

#[test]
fn upload_analyze_render_export() {
    let mut session = Session::default();
    let intake = session.add_files(batch(6));
    assert_eq!(intake.accepted.len(), 5);
    assert_eq!(intake.rejected.len(), 1);
    assert_eq!(session.current_image().unwrap().name, "pier_4.jpg");
    assert_eq!(session.files()[0].display_size(), "146.48 KB");

    let mut analyzer = ScriptedAnalyzer::new(Preset::Bridge);
    let mut progress = Vec::new();
    let findings = analyzer
        .analyze(session.files(), &mut |stage| progress.push(stage.progress))
        .unwrap();
    assert_eq!(progress, vec![20, 40, 60, 80, 100]);
    session.install_report(findings.into_report().unwrap());

    let report = session.report().unwrap();
    let summary = report.summarize();
    assert_eq!((summary.high, summary.medium, summary.low), (1, 2, 0));

    let renderer = OverlayRenderer::default();
    let mut recorder = renderer.recorder(800, 600);
    renderer.render(report.annotations(), &mut recorder).unwrap();
    assert_eq!(recorder.boxes().len(), 3);

    let doc = ReportDocument::compose(
        report,
        &CostTable::default(),
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
    );
    // high 250-400 + 2 x medium 150-200
    assert_eq!(doc.cost_estimate.total.min, 550);
    assert_eq!(doc.cost_estimate.total.max, 800);
    assert_eq!(doc.asset_information[0], "Bridge ID: BR-2024-847");
}

#[test]
fn new_batch_replaces_previous_report() {
    let mut session = Session::default();
    session.add_files(batch(1));
    let mut analyzer = ScriptedAnalyzer::new(Preset::Hvac);
    let findings = analyzer.analyze(session.files(), &mut |_| {}).unwrap();
    session.install_report(findings.into_report().unwrap());
    assert_eq!(session.report().unwrap().defects()[0].kind, "Filter Blockage");

    session.start_new_batch();
    assert!(session.report().is_none());
    assert!(!session.can_analyze());

    session.add_files(batch(2));
    let mut analyzer = ScriptedAnalyzer::new(Preset::Electrical);
    let findings = analyzer.analyze(session.files(), &mut |_| {}).unwrap();
    session.install_report(findings.into_report().unwrap());
    let report = session.report().unwrap();
    assert_eq!(report.defects()[0].kind, "Insulation Damage");
    assert_eq!(report.summarize().total, 3);
}

#[test]
fn work_order_from_session_report() {
    let report = Preset::Hvac.findings().into_report().unwrap();
    let order = WorkOrder::draft(&report, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
    assert_eq!(order.priority_options[0].label, "High - Refrigerant Leak");
    let ticket = order.submit(7);
    assert_eq!(ticket.id, "INF-2025-007");
    assert_eq!(ticket.due, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
}

#[test]
fn file_loaded_from_disk_keeps_its_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("inspection.PNG");
    std::fs::write(&path, vec![0u8; 2048]).expect("write file");

    let file = UploadedFile::from_path(&path).unwrap();
    assert_eq!(file.name, "inspection.PNG");
    assert_eq!(file.size_bytes, 2048);
    assert_eq!(file.display_size(), "2 KB");
    assert_eq!(file.kind, infrasight::FileKind::Image);
    assert_eq!(file.path.as_deref(), Some(path.as_path()));

    assert!(UploadedFile::from_path(&dir.path().join("missing.jpg")).is_err());
}
