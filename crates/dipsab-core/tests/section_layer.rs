use dipsab_core::prelude::*;
use image::{Rgb, Rgba, RgbaImage};
use tempfile::TempDir;

const BG: Color = Color::rgb(1, 2, 3);

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

#[test]
fn layer_height_sums_rows_and_padding() {
    let rows = vec![
        Row::new(vec![solid(10, 40, [9, 9, 9])], 0),
        Row::new(vec![solid(10, 60, [9, 9, 9])], 0),
        Row::new(vec![solid(10, 50, [9, 9, 9])], 0),
    ];
    let layer = compose_layer(&rows, 100, 10, BG);
    assert_eq!(layer.dimensions(), (100, 40 + 60 + 50 + 10 * 2));
}

#[test]
fn empty_section_is_zero_height() {
    let rows: Vec<Row<RgbaImage>> = Vec::new();
    let layer = compose_layer(&rows, 100, 10, BG);
    assert_eq!(layer.dimensions(), (100, 0));
}

#[test]
fn rows_read_ascending_top_to_bottom_and_left_to_right() {
    let blue = [0, 0, 255];
    let green = [0, 255, 0];
    let red = [255, 0, 0];
    // Descending keys c, b, a.
    let items = vec![solid(30, 10, red), solid(30, 10, green), solid(30, 10, blue)];
    let rows = pack_rows(items, 70, 0);
    assert_eq!(rows.len(), 2);
    let layer = compose_layer(&rows, 70, 0, BG);
    assert_eq!(layer.dimensions(), (70, 20));

    // Top row: "a" alone, centred at x = 20.
    assert_eq!(*layer.get_pixel(19, 5), Rgb([1, 2, 3]));
    assert_eq!(*layer.get_pixel(20, 5), Rgb(blue));
    assert_eq!(*layer.get_pixel(49, 5), Rgb(blue));
    assert_eq!(*layer.get_pixel(50, 5), Rgb([1, 2, 3]));
    // Second row: "b" then "c", starting at x = 5.
    assert_eq!(*layer.get_pixel(4, 15), Rgb([1, 2, 3]));
    assert_eq!(*layer.get_pixel(5, 15), Rgb(green));
    assert_eq!(*layer.get_pixel(35, 15), Rgb(red));
    assert_eq!(*layer.get_pixel(65, 15), Rgb([1, 2, 3]));
}

#[test]
fn row_centres_group_and_each_item_vertically() {
    let row = Row::new(vec![solid(100, 40, [200, 0, 0]), solid(50, 20, [0, 200, 0])], 10);
    let strip = compose_row(&row, 300, BG);
    assert_eq!(strip.dimensions(), (300, 40));
    assert_eq!(*strip.get_pixel(69, 0), BG.to_rgba());
    assert_eq!(*strip.get_pixel(70, 0), Rgba([200, 0, 0, 255]));
    // Padding gap between items keeps the background.
    assert_eq!(*strip.get_pixel(175, 20), BG.to_rgba());
    // Second item starts at 70 + 100 + 10 and is offset (40 - 20) / 2 = 10 down.
    assert_eq!(*strip.get_pixel(180, 9), BG.to_rgba());
    assert_eq!(*strip.get_pixel(180, 10), Rgba([0, 200, 0, 255]));
    assert_eq!(*strip.get_pixel(229, 29), Rgba([0, 200, 0, 255]));
    assert_eq!(*strip.get_pixel(229, 30), BG.to_rgba());
}

#[test]
fn transparent_pixels_show_the_section_background() {
    let mut img = solid(2, 1, [255, 255, 255]);
    img.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
    let rows = pack_rows(vec![img], 2, 0);
    let layer = compose_layer(&rows, 2, 0, BG);
    assert_eq!(*layer.get_pixel(0, 0), Rgb([255, 255, 255]));
    assert_eq!(*layer.get_pixel(1, 0), Rgb([1, 2, 3]));
}

#[test]
fn oversized_single_image_is_cropped_by_the_layer_not_rejected() {
    let dir = TempDir::new().unwrap();
    solid(50, 50, [7, 7, 7]).save(dir.path().join("a.png")).unwrap();
    let mut req = LayoutRequest::new(dir.path(), 40);
    req.background = BG;
    let layer = render_section(&req).unwrap();
    assert_eq!(layer.dimensions(), (40, 50));
    // floor((40 - 50) / 2) = -5: the image overhangs both sides.
    assert_eq!(*layer.get_pixel(0, 0), Rgb([7, 7, 7]));
    assert_eq!(*layer.get_pixel(39, 49), Rgb([7, 7, 7]));
}

#[test]
fn jpeg_input_renders() {
    let dir = TempDir::new().unwrap();
    image::RgbImage::from_pixel(50, 50, Rgb([128, 128, 128]))
        .save(dir.path().join("a.jpg"))
        .unwrap();
    let layer = render_section(&LayoutRequest::new(dir.path(), 40)).unwrap();
    assert_eq!(layer.dimensions(), (40, 50));
}

#[test]
fn section_layout_matches_rendered_pixels() {
    let dir = TempDir::new().unwrap();
    let colors = [("a", [255, 0, 0]), ("b", [0, 255, 0]), ("c", [0, 0, 255]), ("d", [255, 255, 0])];
    for (i, (name, rgb)) in colors.iter().enumerate() {
        solid(20 + i as u32 * 5, 10 + i as u32 * 3, *rgb)
            .save(dir.path().join(format!("{name}.png")))
            .unwrap();
    }

    let mut req = LayoutRequest::new(dir.path(), 70);
    req.hpad = 4;
    req.vpad = 6;
    req.background = BG;
    let layout = layout_section(&req).unwrap();
    let layer = render_section(&req).unwrap();
    assert_eq!((layout.width, layout.height), layer.dimensions());
    assert_eq!(layout.placements.len(), 4);

    let keys: Vec<&str> = layout.placements.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);
    for (p, (_, rgb)) in layout.placements.iter().zip(colors.iter()) {
        let cx = (p.rect.x + p.rect.w as i64 / 2) as u32;
        let cy = (p.rect.y + p.rect.h as i64 / 2) as u32;
        assert_eq!(*layer.get_pixel(cx, cy), Rgb(*rgb), "centre of {}", p.key);
    }
}

#[test]
fn rendering_is_deterministic() {
    let dir = TempDir::new().unwrap();
    for i in 0..12u32 {
        solid(10 + (i * 7) % 30, 5 + (i * 11) % 25, [i as u8 * 20, 0, 0])
            .save(dir.path().join(format!("img{i:02}.png")))
            .unwrap();
    }
    let mut req = LayoutRequest::new(dir.path(), 64);
    req.hpad = 3;
    req.vpad = 2;
    let a = render_section(&req).unwrap();
    let b = render_section(&req).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}
