use pixel_picker::utils::{initial_quad_vertices, quad_extents, QuadExtents, QUAD_INDICES};

#[test]
fn wide_images_span_the_full_projection_extent() {
    let aspect = 800.0 / 600.0;
    let extents = quad_extents(aspect, 400, 300);
    assert_eq!(
        extents,
        QuadExtents {
            left: -aspect,
            right: aspect,
            bottom: -1.0,
            top: 1.0,
        }
    );
}

#[test]
fn tall_images_currently_share_the_wide_bounds() {
    // Known approximation carried over from the source renderer: the tall
    // branch does not yet pillarbox, it reuses the full-width bounds.
    let aspect = 800.0 / 600.0;
    assert_eq!(quad_extents(aspect, 300, 400), quad_extents(aspect, 400, 300));
}

#[test]
fn square_images_fill_the_projection() {
    let extents = quad_extents(1.0, 256, 256);
    assert_eq!(extents.left, -1.0);
    assert_eq!(extents.right, 1.0);
    assert_eq!(extents.bottom, -1.0);
    assert_eq!(extents.top, 1.0);
}

#[test]
fn texture_coordinates_walk_the_unit_square_counter_clockwise() {
    let vertices = initial_quad_vertices();
    assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
    assert_eq!(vertices[1].tex_coords, [1.0, 0.0]);
    assert_eq!(vertices[2].tex_coords, [1.0, 1.0]);
    assert_eq!(vertices[3].tex_coords, [0.0, 1.0]);
}

#[test]
fn quad_indices_draw_two_triangles_over_four_vertices() {
    assert_eq!(QUAD_INDICES, [0, 1, 2, 2, 3, 0]);
    assert!(QUAD_INDICES.iter().all(|&i| i < 4), "indices must stay in the quad");
}
