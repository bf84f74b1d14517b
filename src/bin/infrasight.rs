//! infrasight - inspection report, overlay and work-order tool
//!
//! Runs the scripted analysis over a batch of files, prints the defect
//! summary and cost estimate, and optionally writes the annotation overlay
//! (PNG) and the report document (JSON).

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use infrasight::ui::{Ui, UiMode};
use infrasight::{
    Analyzer, DefectReport, InfraSightConfig, Notification, OverlayRenderer, Preset,
    RasterSurface, ReportDocument, Responder, ScriptedAnalyzer, Session, ShareChannel,
    UploadedFile, WorkOrder,
};

#[derive(Parser, Debug)]
#[command(name = "infrasight", version, about = "Infrastructure inspection reports")]
struct Args {
    /// Progress display: auto, plain or pretty.
    #[arg(long, default_value = "auto", global = true)]
    ui: UiMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze uploaded files and build the defect report
    Analyze {
        /// Files in the upload batch (at most the configured cap).
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value = "general")]
        preset: Preset,
        /// Seed for randomized annotation placement.
        #[arg(long)]
        seed: Option<u64>,
        /// Write the annotation overlay as PNG.
        #[arg(long)]
        overlay: Option<PathBuf>,
        /// Overlay width in pixels (defaults to the current image's width).
        #[arg(long, requires = "height")]
        width: Option<u32>,
        /// Overlay height in pixels (defaults to the current image's height).
        #[arg(long, requires = "width")]
        height: Option<u32>,
        /// Write the report document as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Ask a question about a preset's report
    Ask {
        question: String,
        #[arg(long, default_value = "general")]
        preset: Preset,
    },

    /// Draft and submit a work order for a preset's report
    Ticket {
        #[arg(long, default_value = "general")]
        preset: Preset,
        /// Running work-order number.
        #[arg(long, default_value_t = 1)]
        seq: u32,
    },

    /// Share the report (simulated)
    Share {
        /// email, slack or link
        channel: ShareChannel,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = InfraSightConfig::load()?;
    let ui = Ui::new(args.ui, std::io::stderr().is_terminal());

    match args.command {
        Command::Analyze {
            files,
            preset,
            seed,
            overlay,
            width,
            height,
            report,
        } => cmd_analyze(
            &cfg,
            &ui,
            AnalyzeArgs {
                files,
                preset,
                seed,
                overlay,
                size: width.zip(height),
                report,
            },
        ),
        Command::Ask { question, preset } => cmd_ask(&cfg, &question, preset),
        Command::Ticket { preset, seq } => cmd_ticket(preset, seq),
        Command::Share { channel } => {
            print_notification(&channel.share());
            Ok(())
        }
    }
}

struct AnalyzeArgs {
    files: Vec<PathBuf>,
    preset: Preset,
    seed: Option<u64>,
    overlay: Option<PathBuf>,
    size: Option<(u32, u32)>,
    report: Option<PathBuf>,
}

fn cmd_analyze(cfg: &InfraSightConfig, ui: &Ui, args: AnalyzeArgs) -> Result<()> {
    let mut session = Session::new(cfg.max_uploads);
    let uploads = args
        .files
        .iter()
        .map(|path| UploadedFile::from_path(path))
        .collect::<Result<Vec<_>>>()?;
    let intake = session.add_files(uploads);
    for file in &intake.accepted {
        println!("  + {} ({})", file.name, file.display_size());
    }
    for file in &intake.rejected {
        println!(
            "  - {} skipped: at most {} files per session",
            file.name,
            session.max_files()
        );
    }

    let mut analyzer = ScriptedAnalyzer::new(args.preset).with_delay_scale(cfg.stage_delay_scale);
    if let Some(seed) = args.seed {
        analyzer = analyzer.with_jitter_seed(seed);
    }
    let mut progress = ui.analysis();
    let findings = analyzer.analyze(session.files(), &mut |stage| progress.stage(stage))?;
    progress.finish();
    session.install_report(findings.into_report()?);

    let report = session
        .report()
        .ok_or_else(|| anyhow!("analysis produced no report"))?;
    print_report(report, cfg);

    if let Some(path) = &args.overlay {
        let _step = ui.step("render overlay");
        let renderer = OverlayRenderer::new(cfg.overlay);
        let mut surface = match args.size {
            Some((width, height)) => renderer.raster_surface(width, height),
            None => {
                let image = session
                    .current_image()
                    .and_then(|f| f.path.as_deref())
                    .ok_or_else(|| {
                        anyhow!("no image in the batch; pass --width and --height for the overlay")
                    })?;
                RasterSurface::matching_image(image, renderer.font())?
            }
        };
        renderer.render(report.annotations(), &mut surface)?;
        surface.save_png(path)?;
        println!("overlay: {}", path.display());
    }

    if let Some(path) = &args.report {
        let _step = ui.step("export report");
        let today = chrono::Local::now().date_naive();
        let document = ReportDocument::compose(report, &cfg.costs, today);
        write_file(path, &document.to_json_pretty()?)?;
        print_notification(&Notification::exported());
    }
    Ok(())
}

fn cmd_ask(cfg: &InfraSightConfig, question: &str, preset: Preset) -> Result<()> {
    let report = preset.findings().into_report()?;
    let responder = Responder::new(cfg.costs);
    println!("Q: {}", question);
    println!("A: {}", responder.answer(question, &report));
    Ok(())
}

fn cmd_ticket(preset: Preset, seq: u32) -> Result<()> {
    let report = preset.findings().into_report()?;
    let today = chrono::Local::now().date_naive();
    let order = WorkOrder::draft(&report, today);
    let ticket = order.submit(seq);
    println!("ticket: {}", ticket.id);
    if let Some(priority) = &ticket.priority {
        println!("  priority: {}", priority);
    }
    println!("  team: {}", ticket.team);
    println!("  estimated completion: {}", ticket.due);
    print_notification(&ticket.notification);
    Ok(())
}

fn print_report(report: &DefectReport, cfg: &InfraSightConfig) {
    let summary = report.summarize();
    println!("Detected defects ({}):", summary.total);
    for defect in report.defects_by_priority() {
        println!(
            "  [{}] {} - {} | {} | confidence {}%",
            defect.severity.label(),
            defect.kind,
            defect.description,
            defect.location,
            defect.confidence_percent()
        );
    }
    println!(
        "Summary: high {}, medium {}, low {}, total {}",
        summary.high, summary.medium, summary.low, summary.total
    );
    let estimate = report.estimate_cost(&cfg.costs);
    println!(
        "Cost estimate: materials {}, labor {}, total {}",
        estimate.materials, estimate.labor, estimate.total
    );
    if !report.ocr().is_empty() {
        println!("Extracted information:");
        for line in report.ocr() {
            println!("  {}", line);
        }
    }
}

fn print_notification(notification: &Notification) {
    println!("{}", notification.message);
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
