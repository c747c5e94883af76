use super::*;

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn positive_rotation_is_clockwise_on_y_down_canvas() {
    let t = Transform2D {
        rotation_rad: 90f64.to_radians(),
        ..Transform2D::default()
    };
    // +x axis maps onto +y (downwards) for a clockwise quarter turn.
    let p = t.to_affine() * Point::new(1.0, 0.0);
    assert!(p.x.abs() < 1e-12);
    assert!((p.y - 1.0).abs() < 1e-12);
}

#[test]
fn anchor_is_a_fixed_point() {
    let anchor = Pivot::Center.anchor(100.0, 50.0);
    let t = Transform2D {
        rotation_rad: 1.234,
        anchor,
        ..Transform2D::default()
    };
    let p = t.to_affine() * Point::new(50.0, 25.0);
    assert!((p.x - 50.0).abs() < 1e-9);
    assert!((p.y - 25.0).abs() < 1e-9);

    assert_eq!(Pivot::TopLeft.anchor(100.0, 50.0), Vec2::ZERO);
}
