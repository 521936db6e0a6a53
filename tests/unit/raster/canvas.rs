use kurbo::Circle;

use super::*;
use crate::foundation::core::Rgba;

fn red() -> Paint {
    Paint::Solid(Rgba::new(255, 0, 0, 1.0))
}

#[test]
fn fill_rect_writes_premultiplied_pixels() {
    let mut c = Canvas::new(8, 8).unwrap();
    c.set_global_alpha(0.5);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &red());
    assert_eq!(c.pixmap().pixel(1, 1), [128, 0, 0, 128]);
    assert_eq!(c.pixmap().pixel(6, 6), [0; 4]);
}

#[test]
fn save_restore_round_trips_state() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.save();
    c.set_global_alpha(0.2);
    c.set_composite_op(CompositeOp::Multiply);
    c.translate(1.0, 2.0);
    c.set_filter(Filter::blur(2.0));
    c.restore();
    assert_eq!(c.global_alpha(), 1.0);
    assert_eq!(c.composite_op(), CompositeOp::SourceOver);
    assert_eq!(c.transform(), Affine::IDENTITY);
    assert!(c.filter().is_none());
    c.restore();
    assert_eq!(c.global_alpha(), 1.0);
}

#[test]
fn invalid_global_alpha_is_ignored() {
    let mut c = Canvas::new(1, 1).unwrap();
    c.set_global_alpha(0.4);
    c.set_global_alpha(1.5);
    c.set_global_alpha(f64::NAN);
    assert_eq!(c.global_alpha(), 0.4);
}

#[test]
fn clip_limits_fills() {
    let mut c = Canvas::new(10, 10).unwrap();
    c.clip_rect(Rect::new(0.0, 0.0, 5.0, 10.0));
    c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &red());
    assert_eq!(c.pixmap().pixel(2, 5)[3], 255);
    assert_eq!(c.pixmap().pixel(7, 5)[3], 0);
}

#[test]
fn source_in_recolors_and_clears_outside() {
    let mut c = Canvas::new(10, 10).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &Paint::Solid(Rgba::white(1.0)));
    c.fill_shape(&Circle::new((2.0, 2.0), 1.0), &red());
    c.set_composite_op(CompositeOp::SourceIn);
    c.fill_rect(
        Rect::new(0.0, 0.0, 5.0, 5.0),
        &Paint::Solid(Rgba::new(0, 0, 255, 1.0)),
    );
    assert_eq!(c.pixmap().pixel(3, 3), [0, 0, 255, 255]);
    assert_eq!(c.pixmap().pixel(8, 8), [0; 4]);
}

#[test]
fn destination_out_erases() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &red());
    c.set_composite_op(CompositeOp::DestinationOut);
    c.fill_rect(Rect::new(0.0, 0.0, 2.0, 4.0), &Paint::Solid(Rgba::black(1.0)));
    assert_eq!(c.pixmap().pixel(0, 0)[3], 0);
    assert_eq!(c.pixmap().pixel(3, 0)[3], 255);
}

#[test]
fn transforms_move_geometry() {
    let mut c = Canvas::new(10, 10).unwrap();
    c.translate(5.0, 5.0);
    c.scale(-1.0, -1.0);
    c.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &red());
    assert_eq!(c.pixmap().pixel(3, 3)[3], 255);
    assert_eq!(c.pixmap().pixel(6, 6)[3], 0);
}

#[test]
fn draw_pixmap_copies_at_identity() {
    let img = Pixmap::from_straight(2, 2, vec![
        255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255,
    ])
    .unwrap();
    let mut c = Canvas::new(2, 2).unwrap();
    c.draw_pixmap(&img, Rect::new(0.0, 0.0, 2.0, 2.0));
    assert_eq!(c.pixmap(), &img);
}

#[test]
fn draw_pixmap_scales_up() {
    let img = Pixmap::from_straight(1, 1, vec![0, 255, 0, 255]).unwrap();
    let mut c = Canvas::new(6, 6).unwrap();
    c.draw_pixmap(&img, Rect::new(1.0, 1.0, 5.0, 5.0));
    assert_eq!(c.pixmap().pixel(3, 3), [0, 255, 0, 255]);
    assert_eq!(c.pixmap().pixel(0, 0), [0; 4]);
}

#[test]
fn blur_filter_softens_edges() {
    let mut sharp = Canvas::new(30, 30).unwrap();
    sharp.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), &red());
    let mut soft = Canvas::new(30, 30).unwrap();
    soft.set_filter(Filter::blur(2.0));
    soft.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), &red());
    assert_eq!(sharp.pixmap().pixel(8, 15)[3], 0);
    assert!(soft.pixmap().pixel(8, 15)[3] > 0);
    assert!(soft.pixmap().pixel(15, 15)[3] > 200);
}

#[test]
fn color_filter_applies_to_drawn_pixels() {
    let mut c = Canvas::new(1, 1).unwrap();
    c.set_filter(Filter::brightness_contrast(2.0, 1.0));
    c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &Paint::Solid(Rgba::new(100, 50, 0, 1.0)));
    assert_eq!(c.pixmap().pixel(0, 0), [200, 100, 0, 255]);
}

#[test]
fn resize_resets_pixels_and_state() {
    let mut c = Canvas::new(2, 2).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &red());
    c.set_global_alpha(0.3);
    assert!(!c.resize(2, 2).unwrap());
    assert!(c.resize(3, 1).unwrap());
    assert_eq!((c.width(), c.height()), (3, 1));
    assert!(c.pixmap().is_blank());
    assert_eq!(c.global_alpha(), 1.0);
}

#[test]
fn degenerate_canvas_ignores_draws() {
    let mut c = Canvas::new(0, 0).unwrap();
    assert!(c.is_degenerate());
    c.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), &red());
    c.clip_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    assert!(c.pixmap().is_blank());
}

#[test]
fn trace_records_paint_and_operator() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.enable_trace();
    c.set_composite_op(CompositeOp::SoftLight);
    c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &Paint::Solid(Rgba::new(0xAA, 0xBB, 0xCC, 0.5)));
    let trace = c.take_trace();
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].op, CompositeOp::SoftLight);
    assert!(trace[0].paint.contains("170, 187, 204"));
    assert!(c.take_trace().is_empty());
}
