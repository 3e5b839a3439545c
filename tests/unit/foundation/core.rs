use super::*;

#[test]
fn viewport_parse_accepts_wxh() {
    let v = Viewport::parse("1280x720").unwrap();
    assert_eq!(v, Viewport::new(1280, 720).unwrap());
    assert_eq!(Viewport::parse(" 64X32 ").unwrap().height, 32);
}

#[test]
fn viewport_rejects_empty_and_garbage() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::parse("1280").is_err());
    assert!(Viewport::parse("axb").is_err());
    assert!(Viewport::parse("10x0").is_err());
}
