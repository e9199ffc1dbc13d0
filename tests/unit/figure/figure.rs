use super::*;
use crate::assets::glyph::BlockGlyphRasterizer;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
}

fn legend_entries() -> Vec<LegendEntry> {
    vec![
        LegendEntry {
            color: Rgba8::opaque(0x2C, 0x5A, 0xA0),
            label: "Root".to_string(),
        },
        LegendEntry {
            color: Rgba8::opaque(0xEA, 0x58, 0x0C),
            label: "Leaf Types".to_string(),
        },
    ]
}

#[test]
fn image_keeps_its_aspect_ratio() {
    let fig = Figure::new(12.0, 8.0).image(solid(400, 400, [0, 0, 255, 255]));
    let layout = fig.layout(100.0, &BlockGlyphRasterizer::default()).unwrap();
    let rect = layout.image.unwrap();
    assert!((rect.width() - rect.height()).abs() < 1e-6);

    let fig = Figure::new(12.0, 8.0).image(solid(800, 400, [0, 0, 255, 255]));
    let layout = fig.layout(100.0, &BlockGlyphRasterizer::default()).unwrap();
    let rect = layout.image.unwrap();
    assert!((rect.width() / rect.height() - 2.0).abs() < 1e-6);
}

#[test]
fn canvas_is_tight_bbox_plus_padding() {
    let dpi = 100.0;
    let fig = Figure::new(10.0, 5.0).image(solid(800, 400, [10, 20, 30, 255]));
    let layout = fig.layout(dpi, &BlockGlyphRasterizer::default()).unwrap();
    let rect = layout.image.unwrap();

    let pad = TIGHT_PAD_IN * dpi;
    assert!(rect.x0 >= pad - 1e-9);
    assert!(rect.y0 >= pad - 1e-9);
    assert!(f64::from(layout.canvas.width) - rect.x1 >= pad - 1e-9);
    assert!(f64::from(layout.canvas.height) - rect.y1 >= pad - 1e-9);
    assert!(f64::from(layout.canvas.width) <= rect.width() + 2.0 * pad + 2.0);
    // Cropped well inside the nominal 1000x500 figure.
    assert!(layout.canvas.width < 1000);
}

#[test]
fn title_sits_centered_above_the_image() {
    let fig = Figure::new(10.0, 5.0)
        .image(solid(800, 400, [0, 0, 0, 255]))
        .title("Schema Types", 14.0, true)
        .title_pad(20.0);
    let layout = fig.layout(72.0, &BlockGlyphRasterizer::default()).unwrap();
    let image = layout.image.unwrap();
    let title = layout.title.unwrap();

    assert!((title.rect.y1 - (image.y0 - 20.0)).abs() < 1e-6);
    assert!((title.rect.center().x - image.center().x).abs() < 1e-6);
    assert!(title.rect.y0 >= 0.0);
}

#[test]
fn legend_anchored_outside_the_image_widens_the_canvas() {
    let text = BlockGlyphRasterizer::default();
    let img = solid(400, 400, [0, 0, 0, 255]);

    let plain = Figure::new(12.0, 8.0).image(img.clone());
    let with_legend = plain
        .clone()
        .legend(Legend::upper_right(legend_entries(), (1.1, 1.0)));

    let a = plain.layout(100.0, &text).unwrap();
    let b = with_legend.layout(100.0, &text).unwrap();
    assert!(b.canvas.width > a.canvas.width);

    let image = b.image.unwrap();
    let legend = b.legend.unwrap();
    assert!(legend.frame.x1 > image.x1);
    assert!(legend.frame.y0 > image.y0);
    assert_eq!(legend.rows.len(), 2);

    // Rows stack downward and swatches sit left of their labels.
    assert!(legend.rows[0].0.y1 < legend.rows[1].0.y0);
    for (swatch, _, label) in &legend.rows {
        assert!(swatch.x1 < label.rect.x0);
        assert!(legend.frame.contains(swatch.center()));
    }
}

#[test]
fn dimensions_scale_with_dpi() {
    let text = BlockGlyphRasterizer::default();
    let fig = Figure::new(10.0, 5.0).image(solid(800, 400, [0, 0, 0, 255]));
    let lo = fig.layout(100.0, &text).unwrap().canvas;
    let hi = fig.layout(200.0, &text).unwrap().canvas;
    assert!(hi.width.abs_diff(lo.width * 2) <= 2);
    assert!(hi.height.abs_diff(lo.height * 2) <= 2);
}

#[test]
fn rejects_bad_dpi_and_size() {
    let text = BlockGlyphRasterizer::default();
    let fig = Figure::new(10.0, 5.0);
    assert!(matches!(fig.layout(0.0, &text), Err(CloudError::Validation(_))));
    assert!(matches!(fig.layout(f64::NAN, &text), Err(CloudError::Validation(_))));

    let flat = Figure::new(10.0, 0.0);
    assert!(matches!(flat.layout(100.0, &text), Err(CloudError::Validation(_))));
}

#[test]
fn render_draws_image_title_and_legend() {
    let text = BlockGlyphRasterizer::default();
    let fig = Figure::new(6.0, 4.0)
        .image(solid(300, 200, [200, 0, 0, 255]))
        .title("Cloud", 14.0, true)
        .legend(Legend::upper_right(legend_entries(), (1.1, 1.0)));

    let layout = fig.layout(72.0, &text).unwrap();
    let img = fig.render(72.0, &text).unwrap();
    assert_eq!(img.dimensions(), (layout.canvas.width, layout.canvas.height));

    let c = layout.image.unwrap().center();
    assert_eq!(img.get_pixel(c.x as u32, c.y as u32).0, [200, 0, 0, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);

    // Block glyphs are solid, so the title center is pure text color.
    let t = layout.title.unwrap().rect.center();
    assert_eq!(img.get_pixel(t.x as u32, t.y as u32).0, [0, 0, 0, 255]);

    let legend = layout.legend.unwrap();
    let s = legend.rows[0].0.center();
    assert_eq!(img.get_pixel(s.x as u32, s.y as u32).0, [0x2C, 0x5A, 0xA0, 255]);
}

#[test]
fn render_is_deterministic() {
    let text = BlockGlyphRasterizer::default();
    let fig = Figure::new(4.0, 3.0)
        .image(solid(40, 30, [0, 128, 0, 255]))
        .title("t", 12.0, false);
    let a = fig.render(50.0, &text).unwrap();
    let b = fig.render(50.0, &text).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn save_png_creates_parent_dirs() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("figure_save_png_test");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("out.png");

    let img = solid(7, 5, [1, 2, 3, 255]);
    save_png(&img, &path).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (7, 5));
    assert_eq!(back.get_pixel(3, 2).0, [1, 2, 3, 255]);
}

#[test]
fn image_pixels_are_premultiplied_before_drawing() {
    let mut img = solid(2, 1, [200, 100, 0, 128]);
    img.put_pixel(1, 0, image::Rgba([255, 255, 255, 0]));
    let pixmap = rgba_to_pixmap(&img).unwrap();

    let half = pixmap.pixel(0, 0).unwrap();
    assert!(half.red().abs_diff(100) <= 1);
    assert!(half.green().abs_diff(50) <= 1);
    assert_eq!((half.blue(), half.alpha()), (0, 128));

    let clear = pixmap.pixel(1, 0).unwrap();
    assert_eq!(
        (clear.red(), clear.green(), clear.blue(), clear.alpha()),
        (0, 0, 0, 0)
    );
}

#[test]
fn translucent_image_blends_over_the_background() {
    let text = BlockGlyphRasterizer::default();
    let fig = Figure::new(4.0, 3.0).image(solid(40, 30, [0, 0, 255, 128]));
    let layout = fig.layout(50.0, &text).unwrap();
    let img = fig.render(50.0, &text).unwrap();

    let c = layout.image.unwrap().center();
    let [r, g, b, a] = img.get_pixel(c.x as u32, c.y as u32).0;
    assert!(r.abs_diff(127) <= 2 && g.abs_diff(127) <= 2);
    assert_eq!((b, a), (255, 255));
}

#[test]
fn bold_title_is_wider_than_regular() {
    let text = BlockGlyphRasterizer::default();
    let base = Figure::new(6.0, 4.0).image(solid(30, 20, [0, 0, 0, 255]));
    let bold = base.clone().title("Schema", 14.0, true);
    let regular = base.title("Schema", 14.0, false);

    let b = bold.layout(72.0, &text).unwrap().title.unwrap();
    let r = regular.layout(72.0, &text).unwrap().title.unwrap();
    assert!(b.rect.width() > r.rect.width());
    assert_eq!(b.rect.height(), r.rect.height());
}
