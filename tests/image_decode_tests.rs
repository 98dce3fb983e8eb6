use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use pixel_picker::error::PickerError;
use pixel_picker::DecodedImage;

#[test]
fn decoded_dimensions_match_the_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seven_by_five.png");
    RgbaImage::from_pixel(7, 5, Rgba([1, 2, 3, 4]))
        .save(&path)
        .unwrap();

    let decoded = DecodedImage::open(&path).expect("valid 4-channel image");
    assert_eq!((decoded.width(), decoded.height()), (7, 5));
    assert_eq!(decoded.pixels().len(), 7 * 5 * 4);
}

#[test]
fn rows_are_flipped_so_row_zero_is_the_visual_bottom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two_rows.png");
    let mut img = RgbaImage::new(1, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255])); // visual top
    img.put_pixel(0, 1, Rgba([0, 0, 255, 255])); // visual bottom
    img.save(&path).unwrap();

    let decoded = DecodedImage::open(&path).unwrap();
    assert_eq!(
        &decoded.pixels()[..4],
        &[0, 0, 255, 255],
        "the visual bottom row must come first in memory"
    );
}

#[test]
fn three_channel_images_gain_an_opaque_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.png");
    RgbImage::from_pixel(1, 1, Rgb([10, 20, 30]))
        .save(&path)
        .unwrap();

    let decoded = DecodedImage::open(&path).unwrap();
    assert_eq!(&decoded.pixels()[..4], &[10, 20, 30, 255]);
}

#[test]
fn gray_images_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    GrayImage::from_pixel(4, 4, Luma([128])).save(&path).unwrap();

    match DecodedImage::open(&path) {
        Err(PickerError::Decode(msg)) => {
            assert!(msg.contains("channel"), "message should name the problem: {msg}")
        }
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn unreadable_files_surface_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not_an_image.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    assert!(matches!(
        DecodedImage::open(&path),
        Err(PickerError::Decode(_))
    ));
}
