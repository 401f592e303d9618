use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use valo::interaction::Interaction;
use valo::lights::{
    AreaLight, ConstantInfiniteLight, DiffuseAreaLight, Light, PointLight, PowerLightDistribution,
};
use valo::math::{Normal, Point2, Point3, Spectrum, Vec3};

fn unit_square_at_height(y: f32) -> Vec<[Point3<f32>; 3]> {
    // Two triangles spanning [0,1]x[0,1] in xz, normal toward -y
    let a = Point3::new(0.0, y, 0.0);
    let b = Point3::new(1.0, y, 0.0);
    let c = Point3::new(1.0, y, 1.0);
    let d = Point3::new(0.0, y, 1.0);
    vec![[a, b, c], [a, c, d]]
}

#[test]
fn area_light_area_and_power() {
    let light = DiffuseAreaLight::new(unit_square_at_height(2.0), Spectrum::new(3.0, 3.0, 3.0));
    assert_relative_eq!(light.area(), 1.0, max_relative = 1e-5);

    let power = light.power();
    assert_relative_eq!(power.r, 3.0 * std::f32::consts::PI, max_relative = 1e-5);
}

#[test]
fn area_light_emits_one_sided() {
    let light = DiffuseAreaLight::new(unit_square_at_height(2.0), Spectrum::new(1.0, 1.0, 1.0));

    let n = light.triangle_normal(0);
    // Winding above puts the normal toward -y
    assert!(n.y < 0.0);

    let toward_emitting_side = Vec3::new(0.0, -1.0, 0.0);
    assert!(!light.radiance(n, toward_emitting_side).is_black());
    assert!(light.radiance(n, -toward_emitting_side).is_black());
}

#[test]
fn area_light_pdf_converts_to_solid_angle() {
    let light = DiffuseAreaLight::new(unit_square_at_height(2.0), Spectrum::new(1.0, 1.0, 1.0));

    let it = Interaction {
        p: Point3::new(0.5, 0.0, 0.5),
        n: Normal::new(0.0, 1.0, 0.0),
    };

    for &(ux, uy) in &[(0.1, 0.3), (0.7, 0.2), (0.4, 0.9), (0.99, 0.01)] {
        let sample = light.sample_li(&it, Point2::new(ux, uy));
        if sample.pdf == 0.0 {
            continue;
        }

        // Reconstruct the conversion factor from the sampled direction
        let cos_light = sample.wi.y.abs();
        // The sampled point lies on the plane y = 2, distance from the
        // receiver follows from the direction's y component
        let dist = 2.0 / sample.wi.y;
        let expected = (dist * dist) / (cos_light * light.area());
        assert_relative_eq!(sample.pdf, expected, max_relative = 1e-3);
    }
}

#[test]
fn area_light_pdf_li_matches_its_own_samples() {
    let light = DiffuseAreaLight::new(unit_square_at_height(2.0), Spectrum::new(1.0, 1.0, 1.0));

    let it = Interaction {
        p: Point3::new(0.5, 0.0, 0.5),
        n: Normal::new(0.0, 1.0, 0.0),
    };

    let sample = light.sample_li(&it, Point2::new(0.25, 0.65));
    assert!(sample.pdf > 0.0);

    let queried = light.pdf_li(&it, sample.wi);
    assert_relative_eq!(queried, sample.pdf, max_relative = 2e-2);
}

#[test]
fn point_light_inverse_square_falloff() {
    let light = PointLight::new(Point3::new(0.0, 3.0, 0.0), Spectrum::new(9.0, 9.0, 9.0));

    let it = Interaction {
        p: Point3::zeros(),
        n: Normal::new(0.0, 1.0, 0.0),
    };
    let sample = light.sample_li(&it, Point2::zeros());

    assert!(light.is_delta());
    assert_eq!(sample.pdf, 1.0);
    assert_relative_eq!(sample.li.r, 1.0, max_relative = 1e-5);
    assert_relative_eq!(sample.wi.y, 1.0, max_relative = 1e-5);
}

fn test_lights() -> Vec<Arc<dyn Light>> {
    vec![
        Arc::new(PointLight::new(
            Point3::new(0.0, 5.0, 0.0),
            Spectrum::new(1.0, 1.0, 1.0),
        )),
        Arc::new(DiffuseAreaLight::new(
            unit_square_at_height(2.0),
            Spectrum::new(4.0, 4.0, 4.0),
        )),
        Arc::new(ConstantInfiniteLight::new(
            Spectrum::new(0.5, 0.5, 0.5),
            Point3::zeros(),
            10.0,
        )),
        Arc::new(DiffuseAreaLight::new(
            unit_square_at_height(3.0),
            Spectrum::new(1.0, 1.0, 1.0),
        )),
    ]
}

#[test]
fn power_cdf_is_non_descending_and_ends_at_one() {
    let lights = test_lights();
    let cdf = PowerLightDistribution::new(&lights, Point3::zeros(), None);

    let values = cdf.cdf();
    assert_eq!(values[0], 0.0);
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert_abs_diff_eq!(*values.last().unwrap(), 1.0, epsilon = 1e-6);
}

#[test]
fn power_cdf_mass_matches_weighted_power() {
    let lights = test_lights();
    let cdf = PowerLightDistribution::new(&lights, Point3::zeros(), None);

    // Delta lights are excluded from the distribution
    assert_eq!(cdf.pdf(0), 0.0);

    let selectable = [1usize, 2, 3];
    let total: f32 = selectable
        .iter()
        .map(|i| lights[*i].power().luminance())
        .sum();

    for i in selectable {
        let expected = lights[i].power().luminance() / total;
        assert_relative_eq!(cdf.pdf(i), expected, max_relative = 1e-4);
    }
}

#[test]
fn power_cdf_sampling_is_consistent_with_pdf() {
    let lights = test_lights();
    let cdf = PowerLightDistribution::new(&lights, Point3::zeros(), None);

    for i in 0..100 {
        let u = ((i as f32) + 0.5) / 100.0;
        let (light_index, pmf) = cdf.sample(u).unwrap();
        assert_relative_eq!(pmf, cdf.pdf(light_index), max_relative = 1e-5);
        assert!(!lights[light_index].is_delta());
    }
}

#[test]
fn power_cdf_cosine_reweighting_drops_backfacing_lights() {
    let lights = test_lights();

    // Normal facing straight down, away from every light above the plane
    let n = Normal::new(0.0, -1.0, 0.0);
    let cdf = PowerLightDistribution::new(&lights, Point3::zeros(), Some(n));

    // The located lights lose their weight, the infinite light keeps its
    // power-only weight
    assert_eq!(cdf.pdf(1), 0.0);
    assert_eq!(cdf.pdf(3), 0.0);
    assert_relative_eq!(cdf.pdf(2), 1.0, max_relative = 1e-5);
}

#[test]
fn power_cdf_without_selectable_lights_is_empty() {
    let lights: Vec<Arc<dyn Light>> = vec![Arc::new(PointLight::new(
        Point3::zeros(),
        Spectrum::new(1.0, 1.0, 1.0),
    ))];
    let cdf = PowerLightDistribution::new(&lights, Point3::new(1.0, 0.0, 0.0), None);

    assert!(cdf.is_empty());
    assert!(cdf.sample(0.5).is_none());
}
