use infrasight::overlay::label_rect;
use infrasight::{
    pixel_box, Annotation, Color, DrawingSurface, OverlayRenderer, OverlayStyle, PixelRect,
    Preset, SurfaceError,
};

fn demo_annotations() -> Vec<Annotation> {
    Preset::General.findings().annotations
}

#[test]
fn doubling_surface_doubles_every_box() {
    let renderer = OverlayRenderer::default();
    let annotations = demo_annotations();

    let mut small = renderer.recorder(640, 360);
    let mut large = renderer.recorder(1280, 720);
    renderer.render(&annotations, &mut small).unwrap();
    renderer.render(&annotations, &mut large).unwrap();

    let small_boxes = small.boxes();
    let large_boxes = large.boxes();
    assert_eq!(small_boxes.len(), annotations.len());
    for (s, l) in small_boxes.iter().zip(&large_boxes) {
        assert_eq!(l.x, s.x * 2.0);
        assert_eq!(l.y, s.y * 2.0);
        assert_eq!(l.width, s.width * 2.0);
        assert_eq!(l.height, s.height * 2.0);
    }

    for ann in &annotations {
        let a = pixel_box(ann, 333, 211);
        let b = pixel_box(ann, 666, 422);
        assert_eq!(b, PixelRect::new(a.x * 2.0, a.y * 2.0, a.width * 2.0, a.height * 2.0));
    }
}

#[test]
fn rendering_twice_gives_identical_pixels() {
    let renderer = OverlayRenderer::default();
    let annotations = demo_annotations();
    let mut surface = renderer.raster_surface(400, 300);

    renderer.render(&annotations, &mut surface).unwrap();
    let first = surface.image().clone();
    renderer.render(&annotations, &mut surface).unwrap();
    assert_eq!(surface.image().as_raw(), first.as_raw());

    // Drawing something unrelated in between must not leak into the next pass.
    surface.fill_rect(PixelRect::new(0.0, 0.0, 400.0, 300.0), Color::WHITE);
    renderer.render(&annotations, &mut surface).unwrap();
    assert_eq!(surface.image().as_raw(), first.as_raw());
}

#[test]
fn raster_output_has_box_edges_and_label() {
    let renderer = OverlayRenderer::default();
    let color = Color::rgb(0xff, 0x6b, 0x6b);
    let ann = Annotation::new(0.25, 0.5, 0.5, 0.25, color, "Crack");
    let mut surface = renderer.raster_surface(200, 100);
    renderer.render(std::slice::from_ref(&ann), &mut surface).unwrap();

    // Box spans x 50..150, y 50..75; stroke is centered on the edges.
    assert_eq!(surface.pixel(100, 50), Some(color.to_rgba()));
    assert_eq!(surface.pixel(50, 60), Some(color.to_rgba()));
    assert_eq!(surface.pixel(149, 60), Some(color.to_rgba()));
    assert_eq!(surface.pixel(100, 62), Some([0, 0, 0, 0]));

    // Label background (24 px tall) sits directly above the box.
    assert_eq!(surface.pixel(52, 27), Some(color.to_rgba()));
    assert_eq!(surface.pixel(52, 20), Some([0, 0, 0, 0]));

    // Text is drawn in white somewhere inside the label.
    let label = label_rect(
        pixel_box(&ann, 200, 100),
        surface.measure_text("Crack"),
        surface.text_height(),
        5.0,
    );
    let white = (label.x as u32..(label.x + label.width) as u32)
        .flat_map(|x| (label.y as u32..(label.y + label.height) as u32).map(move |y| (x, y)))
        .filter(|&(x, y)| surface.pixel(x, y) == Some(Color::WHITE.to_rgba()))
        .count();
    assert!(white > 0);
}

#[test]
fn label_near_top_is_kept_on_surface() {
    let renderer = OverlayRenderer::default();
    let ann = Annotation::new(0.1, 0.0, 0.3, 0.3, Color::rgb(0x66, 0xbb, 0x6a), "Top");
    let mut recorder = renderer.recorder(500, 500);
    renderer.render(&[ann], &mut recorder).unwrap();

    let labels = recorder.label_backgrounds();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].y, 0.0);
    assert_eq!(labels[0].x, 50.0);
}

#[test]
fn custom_style_changes_stroke_and_padding() {
    let style = OverlayStyle {
        stroke_width: 1,
        label_padding: 2,
        font_scale: 1,
        text_color: Color::rgb(0, 0, 0),
    };
    let renderer = OverlayRenderer::new(style);
    let ann = Annotation::new(0.5, 0.5, 0.25, 0.25, Color::WHITE, "AB");
    let mut recorder = renderer.recorder(100, 100);
    renderer.render(&[ann], &mut recorder).unwrap();

    // "AB" at scale 1 is 11 px wide, 7 px tall.
    assert_eq!(
        recorder.label_backgrounds(),
        vec![PixelRect::new(50.0, 39.0, 15.0, 11.0)]
    );
}

#[test]
fn unmeasured_surface_is_refused() {
    let renderer = OverlayRenderer::default();
    let mut surface = renderer.raster_surface(0, 0);
    let err = renderer.render(&demo_annotations(), &mut surface).unwrap_err();
    let surface_err = err.downcast_ref::<SurfaceError>().expect("surface error");
    assert_eq!(surface_err.code, "EMPTY_SURFACE");
}

#[test]
fn overlay_png_round_trips_dimensions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("overlay.png");
    let renderer = OverlayRenderer::default();
    let mut surface = renderer.raster_surface(64, 48);
    renderer.render(&demo_annotations(), &mut surface).unwrap();
    surface.save_png(&path).unwrap();

    let matched = infrasight::RasterSurface::matching_image(&path, renderer.font()).unwrap();
    assert_eq!((matched.width(), matched.height()), (64, 48));
}
