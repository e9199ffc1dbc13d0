use super::*;

fn block(w: u32, h: u32) -> GlyphBitmap {
    GlyphBitmap {
        width: w,
        height: h,
        origin_x: 0.0,
        origin_y: 0.0,
        coverage: vec![255; (w * h) as usize],
    }
}

#[test]
fn empty_map_accepts_any_fitting_box() {
    let map = OccupancyMap::new(Canvas::new(10, 8).unwrap(), None);
    assert_eq!(map.box_sum(0, 0, 10, 8), 0);

    let mut rng = Rng64::new(1);
    let (x, y) = map.sample_position(10, 8, &mut rng).unwrap();
    assert_eq!((x, y), (0, 0));
    assert!(map.sample_position(11, 1, &mut rng).is_none());
    assert!(map.sample_position(0, 1, &mut rng).is_none());
}

#[test]
fn stamped_pixels_are_counted_and_avoided() {
    let mut map = OccupancyMap::new(Canvas::new(10, 10).unwrap(), None);
    map.stamp(&block(4, 3), 2, 5);
    assert!(map.is_occupied(2, 5));
    assert!(map.is_occupied(5, 7));
    assert!(!map.is_occupied(6, 7));
    assert_eq!(map.box_sum(0, 0, 10, 10), 12);
    assert_eq!(map.box_sum(2, 5, 2, 2), 4);

    let mut rng = Rng64::new(9);
    for _ in 0..50 {
        let (x, y) = map.sample_position(3, 3, &mut rng).unwrap();
        assert_eq!(map.box_sum(x, y, 3, 3), 0);
    }
}

#[test]
fn stamping_clips_at_the_edges() {
    let mut map = OccupancyMap::new(Canvas::new(5, 5).unwrap(), None);
    map.stamp(&block(4, 4), 3, 3);
    assert_eq!(map.box_sum(0, 0, 5, 5), 4);
}

#[test]
fn mask_exclusions_start_occupied() {
    let mask = Mask::circular(60).unwrap();
    let map = OccupancyMap::new(mask.canvas(), Some(&mask));
    let excluded = 60 * 60 - mask.paintable_count() as u32;
    assert_eq!(map.box_sum(0, 0, 60, 60), excluded);
    assert!(map.is_occupied(0, 0));
    assert!(!map.is_occupied(30, 30));
}

#[test]
fn sampling_is_uniform_over_free_slots() {
    // A 3x1 strip with the middle taken leaves exactly two 1x1 slots.
    let mut map = OccupancyMap::new(Canvas::new(3, 1).unwrap(), None);
    map.stamp(&block(1, 1), 1, 0);

    let mut rng = Rng64::new(3);
    let mut seen = [0u32; 3];
    for _ in 0..200 {
        let (x, _) = map.sample_position(1, 1, &mut rng).unwrap();
        seen[x as usize] += 1;
    }
    assert_eq!(seen[1], 0);
    assert!(seen[0] > 50 && seen[2] > 50);
}
