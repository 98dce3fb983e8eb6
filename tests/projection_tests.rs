use pixel_picker::utils::TransformUniform;

const EPS: f32 = 1e-6;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

#[test]
fn orthographic_maps_view_corners_onto_ndc_corners() {
    let aspect = 800.0 / 600.0;
    let m = TransformUniform::orthographic(-aspect, aspect, -1.0, 1.0, -1.0, 1.0);

    let top_right = m.apply([aspect, 1.0, 0.0]);
    assert!(
        close(top_right[0], 1.0) && close(top_right[1], 1.0),
        "top-right corner should land on NDC (1, 1), got {top_right:?}"
    );

    let bottom_left = m.apply([-aspect, -1.0, 0.0]);
    assert!(
        close(bottom_left[0], -1.0) && close(bottom_left[1], -1.0),
        "bottom-left corner should land on NDC (-1, -1), got {bottom_left:?}"
    );
}

#[test]
fn orthographic_leaves_the_center_fixed() {
    let m = TransformUniform::orthographic(-2.0, 2.0, -1.0, 1.0, -1.0, 1.0);
    let center = m.apply([0.0, 0.0, 0.0]);
    assert!(
        close(center[0], 0.0) && close(center[1], 0.0) && close(center[2], 0.0),
        "center should stay at the origin, got {center:?}"
    );
}

#[test]
fn orthographic_keeps_quad_depth_inside_the_clip_range() {
    let m = TransformUniform::orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    for z in [-1.0f32, 0.0, 1.0] {
        let mapped = m.apply([0.0, 0.0, z]);
        assert!(
            (-1.0 - EPS..=1.0 + EPS).contains(&mapped[2]),
            "depth {z} mapped outside the clip range: {}",
            mapped[2]
        );
    }
}

#[test]
fn wider_viewports_compress_x_more() {
    let narrow = TransformUniform::orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let wide = TransformUniform::orthographic(-2.0, 2.0, -1.0, 1.0, -1.0, 1.0);
    let p = [1.0, 0.0, 0.0];
    assert!(
        wide.apply(p)[0] < narrow.apply(p)[0],
        "the same point should land closer to the center under a wider projection"
    );
}
