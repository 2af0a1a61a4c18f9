use super::*;

fn red() -> Fill {
    Fill::solid(Color::rgb(1.0, 0.0, 0.0))
}

#[test]
fn resize_reuses_and_clears() {
    let mut s = Surface::new(2, 2);
    s.fill(&red());
    s.resize(2, 2);
    assert!(s.data().iter().all(|b| *b == 0));
    s.resize(3, 1);
    assert_eq!((s.width(), s.height()), (3, 1));
}

#[test]
fn fill_rect_covers_pixel_centers_only() {
    let mut s = Surface::new(4, 4);
    s.fill_rect(Rect::new(1.0, 1.0, 3.0, 3.0), &red());
    assert_eq!(s.pixel(0, 0), Some(Rgba8Premul::transparent()));
    assert_eq!(s.pixel(1, 1).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(s.pixel(2, 2).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(s.pixel(3, 3), Some(Rgba8Premul::transparent()));
    assert_eq!(s.pixel(4, 0), None);
}

#[test]
fn border_leaves_interior_untouched() {
    let mut s = Surface::new(5, 5);
    s.stroke_border(1.0, Color::WHITE);
    assert_eq!(s.pixel(0, 2).unwrap().a, 255);
    assert_eq!(s.pixel(4, 2).unwrap().a, 255);
    assert_eq!(s.pixel(2, 0).unwrap().a, 255);
    assert_eq!(s.pixel(2, 2).unwrap().a, 0);
}

#[test]
fn composite_offsets_and_clips() {
    let mut dst = Surface::new(4, 4);
    let mut src = Surface::new(2, 2);
    src.fill(&red());
    dst.composite(&src, Point::new(3.0, 3.0), 1.0).unwrap();
    assert_eq!(dst.pixel(3, 3).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(dst.pixel(2, 2).unwrap().a, 0);

    let mut dst2 = Surface::new(4, 4);
    dst2.composite(&src, Point::new(-1.0, 0.0), 1.0).unwrap();
    assert_eq!(dst2.pixel(0, 0).unwrap().a, 255);
    assert_eq!(dst2.pixel(1, 0).unwrap().a, 0);
}

#[test]
fn composite_with_zero_opacity_is_noop() {
    let mut dst = Surface::new(2, 2);
    let mut src = Surface::new(2, 2);
    src.fill(&red());
    dst.composite(&src, Point::ZERO, 0.0).unwrap();
    assert!(dst.data().iter().all(|b| *b == 0));
}

#[test]
fn draw_image_scales_nearest_and_premultiplies() {
    let mut img = image::RgbaImage::new(2, 1);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([0, 0, 255, 128]));
    let mut s = Surface::new(4, 2);
    s.draw_image(&img, Rect::new(0.0, 0.0, 4.0, 2.0));
    assert_eq!(s.pixel(1, 1).unwrap().to_array(), [255, 0, 0, 255]);
    let right = s.pixel(3, 0).unwrap();
    assert_eq!(right.a, 128);
    assert_eq!(right.b, 128);

    let straight = s.to_straight_image();
    assert_eq!(straight.get_pixel(3, 0).0[2], 255);
}
