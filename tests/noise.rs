mod common;

use common::synthetic_image::distinct_rgb;
use imageedit_rust::filters::noise::{hurl, neighbor_coordinates, pick, spread};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Row-major pixel index encoded in a `distinct_rgb` pixel.
fn source_index(img: &Array3<f32>, y: usize, x: usize) -> usize {
    (img[[y, x, 0]] / 3.0) as usize
}

#[test]
fn hurl_zero_percent_is_identity() {
    let img = distinct_rgb(5, 6);
    let mut rng = StdRng::seed_from_u64(11);
    let result = hurl(img.view(), 0.0, 4, &mut rng).expect("hurl");
    assert_eq!(result, img);
}

#[test]
fn hurl_is_reproducible_per_seed() {
    let img = Array3::<f32>::zeros((10, 10, 3));

    let a = hurl(img.view(), 50.0, 2, &mut StdRng::seed_from_u64(5)).expect("hurl");
    let b = hurl(img.view(), 50.0, 2, &mut StdRng::seed_from_u64(5)).expect("hurl");
    let c = hurl(img.view(), 50.0, 2, &mut StdRng::seed_from_u64(6)).expect("hurl");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.iter().all(|&v| (0.0..255.0).contains(&v)));
}

#[test]
fn hurl_rejects_bad_percent() {
    let img = Array3::<f32>::zeros((3, 3, 1));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(hurl(img.view(), 101.0, 1, &mut rng).is_err());
    assert!(hurl(img.view(), -1.0, 1, &mut rng).is_err());
}

#[test]
fn spread_only_moves_existing_pixels_within_window() {
    let img = distinct_rgb(5, 5);
    let mut rng = StdRng::seed_from_u64(42);
    let result = spread(img.view(), 2, 1, &mut rng).expect("spread");

    for y in 0..5 {
        for x in 0..5 {
            let idx = source_index(&result, y, x);
            let (sy, sx) = (idx / 5, idx % 5);
            // Whole pixel copied from (sy, sx)
            for c in 0..3 {
                assert_eq!(result[[y, x, c]], img[[sy, sx, c]]);
            }
            assert!(sy.abs_diff(y) <= 1);
            assert!(sx.abs_diff(x) <= 2);
        }
    }
}

#[test]
fn zero_window_coordinates_are_identity() {
    let mut rng = StdRng::seed_from_u64(3);
    let coords = neighbor_coordinates(4, 7, 0, 0, &mut rng);
    for ((y, x), &(sy, sx)) in coords.indexed_iter() {
        assert_eq!((sy, sx), (y, x));
    }
}

#[test]
fn coordinates_stay_inside_grid() {
    let mut rng = StdRng::seed_from_u64(9);
    let coords = neighbor_coordinates(3, 3, 10, 10, &mut rng);
    assert!(coords.iter().all(|&(sy, sx)| sy < 3 && sx < 3));
}

#[test]
fn coordinates_cover_the_whole_window_box() {
    let mut rng = StdRng::seed_from_u64(17);
    let coords = neighbor_coordinates(30, 30, 2, 2, &mut rng);

    let mut seen = [[false; 5]; 5];
    for y in 2..28 {
        for x in 2..28 {
            let (sy, sx) = coords[[y, x]];
            let dy = sy as isize - y as isize;
            let dx = sx as isize - x as isize;
            seen[(dy + 2) as usize][(dx + 2) as usize] = true;
        }
    }
    // Off-diagonal offsets such as (-2, 1) show up, not just |dy| == |dx|
    assert!(seen.iter().flatten().all(|&hit| hit));
}

#[test]
fn unit_window_includes_the_pixel_itself() {
    let mut rng = StdRng::seed_from_u64(23);
    let coords = neighbor_coordinates(20, 20, 1, 1, &mut rng);

    let mut seen = [[false; 3]; 3];
    for y in 1..19 {
        for x in 1..19 {
            let (sy, sx) = coords[[y, x]];
            seen[sy + 1 - y][sx + 1 - x] = true;
        }
    }
    assert!(seen[1][1]);
    assert!(seen.iter().flatten().all(|&hit| hit));
}

#[test]
fn pick_keeps_unselected_pixels_and_swaps_with_neighbors() {
    let img = distinct_rgb(6, 6);

    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(pick(img.view(), 0.0, 3, &mut rng).expect("pick"), img);

    let mut rng = StdRng::seed_from_u64(21);
    let result = pick(img.view(), 30.0, 1, &mut rng).expect("pick");
    for y in 0..6 {
        for x in 0..6 {
            let idx = source_index(&result, y, x);
            let (sy, sx) = (idx / 6, idx % 6);
            assert!(sy.abs_diff(y) <= 1 && sx.abs_diff(x) <= 1);
        }
    }
}
