use orrery::demos::spheres::{BODIES, SpheresScene};
use orrery::{Body, BodyChain, Color, Mat4, Vec3};

#[test]
fn angles_stay_wrapped_over_many_frames() {
    let mut chain = BodyChain::new(BODIES.to_vec());
    for _ in 0..10_000 {
        chain.update(Mat4::IDENTITY);
        for &angle in chain.angles() {
            assert!((0.0..360.0).contains(&angle), "angle {angle} escaped");
        }
    }
}

#[test]
fn child_placement_ignores_parent_scale() {
    let mut big = BodyChain::new(vec![
        Body::new(100.0, 0.0, 0.0, Color::YELLOW),
        Body::new(0.1, 1.5, 0.0, Color::BLUE),
    ]);
    let mut small = BodyChain::new(vec![
        Body::new(0.3, 0.0, 0.0, Color::YELLOW),
        Body::new(0.1, 1.5, 0.0, Color::BLUE),
    ]);

    let a = big.update(Mat4::IDENTITY);
    let b = small.update(Mat4::IDENTITY);

    let centre_a = a[1].model_view.transform_point3(Vec3::ZERO);
    let centre_b = b[1].model_view.transform_point3(Vec3::ZERO);
    assert!((centre_a - centre_b).length() < 1e-5);
    assert!((centre_a - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn moon_follows_planet() {
    let mut chain = BodyChain::new(BODIES.to_vec());
    for _ in 0..300 {
        let links = chain.update(Mat4::IDENTITY);
        let planet = links[1].pre_scale.transform_point3(Vec3::ZERO);
        let moon = links[2].pre_scale.transform_point3(Vec3::ZERO);

        assert!((planet.length() - 1.5).abs() < 1e-4);
        assert!(((moon - planet).length() - 0.2).abs() < 1e-4);
    }
}

#[test]
fn scene_keeps_drawing_three_bodies() {
    let mut scene = SpheresScene::new(600, 600);
    for _ in 0..100 {
        let links = scene.advance();
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|link| link.model_view.is_finite()));
    }
}
