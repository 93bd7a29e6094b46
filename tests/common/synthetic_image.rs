use ndarray::Array3;

/// Two-level image: the first `round(dark_share * h * w)` pixels in
/// row-major order are `dark`, the rest `bright`.
pub fn bimodal(height: usize, width: usize, channels: usize, dark_share: f32, dark: f32, bright: f32) -> Array3<f32> {
    assert!(height > 0 && width > 0, "image dimensions must be positive");
    let dark_pixels = (dark_share * (height * width) as f32).round() as usize;
    Array3::from_shape_fn((height, width, channels), |(y, x, _)| {
        if y * width + x < dark_pixels {
            dark
        } else {
            bright
        }
    })
}

/// Columns left of `width / 2` are `lo`, the rest `hi`.
pub fn vertical_step(height: usize, width: usize, channels: usize, lo: f32, hi: f32) -> Array3<f32> {
    Array3::from_shape_fn((height, width, channels), |(_, x, _)| if x < width / 2 { lo } else { hi })
}

/// Every pixel and channel carries a distinct value below 255.
pub fn distinct_rgb(height: usize, width: usize) -> Array3<f32> {
    assert!(height * width * 3 <= 255, "too many pixels for distinct values");
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| ((y * width + x) * 3 + c) as f32)
}
