use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 5).unwrap().area(), 20);
}

#[test]
fn rgba_hex_forms() {
    assert_eq!(Rgba8::opaque(0x2c, 0x5a, 0xa0).to_hex(), "#2c5aa0");
    let translucent = Rgba8 {
        r: 255,
        g: 0,
        b: 0,
        a: 0x80,
    };
    assert_eq!(translucent.to_hex(), "#ff000080");
}

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }

    let mut c = Rng64::new(43);
    assert_ne!(Rng64::new(42).next_u64(), c.next_u64());
}

#[test]
fn rng_ranges_are_respected() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let f = rng.next_f64_01();
        assert!((0.0..1.0).contains(&f));
        assert!(rng.below(13) < 13);
    }
    assert_eq!(rng.below(1), 0);
}
