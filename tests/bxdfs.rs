use approx::{assert_abs_diff_eq, assert_relative_eq};

use valo::interaction::SurfaceInteraction;
use valo::materials::bsdfs::{
    specular, BlinnDistribution, Bxdf, BxdfSample, BxdfType, Fresnel, FresnelBlend, Lambertian,
    MicrofacetReflection, OrenNayar,
};
use valo::materials::Bsdf;
use valo::math::{Point2, Point3, Spectrum, Vec3};

// Directions are in the shading frame, +z up. A small fixed set of
// off-axis unit vectors covers the interesting quadrants without any rng
// plumbing.
fn hemisphere_directions() -> Vec<Vec3<f32>> {
    let mut dirs = Vec::new();
    for &theta in &[0.1_f32, 0.4, 0.9, 1.3] {
        for &phi in &[0.0_f32, 1.1, 2.7, 4.3, 5.9] {
            dirs.push(Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    dirs
}

/// Canonical 2D sample set, stratified over the unit square.
fn canonical_samples(n_per_axis: usize) -> Vec<Point2<f32>> {
    let mut samples = Vec::new();
    let d = 1.0 / (n_per_axis as f32);
    for y in 0..n_per_axis {
        for x in 0..n_per_axis {
            samples.push(Point2::new(
                ((x as f32) + 0.5) * d,
                ((y as f32) + 0.5) * d,
            ));
        }
    }
    samples
}

fn assert_reciprocal(bxdf: &dyn Bxdf) {
    let dirs = hemisphere_directions();
    for a in &dirs {
        for b in &dirs {
            let fab = bxdf.f(*a, *b);
            let fba = bxdf.f(*b, *a);
            assert_relative_eq!(fab, fba, max_relative = 1e-4);
        }
    }
}

#[test]
fn lambertian_reciprocity() {
    assert_reciprocal(&Lambertian::new(Spectrum::new(0.7, 0.5, 0.3)));
}

#[test]
fn oren_nayar_reciprocity() {
    assert_reciprocal(&OrenNayar::new(Spectrum::new(0.7, 0.5, 0.3), 0.35));
}

#[test]
fn microfacet_reciprocity() {
    let distribution = BlinnDistribution::new(20.0);
    assert_reciprocal(&MicrofacetReflection::new(
        Spectrum::new(0.9, 0.9, 0.9),
        &distribution,
        Fresnel::NoOp,
    ));
}

#[test]
fn fresnel_blend_reciprocity() {
    let distribution = BlinnDistribution::new(20.0);
    assert_reciprocal(&FresnelBlend::new(
        Spectrum::new(0.5, 0.4, 0.3),
        Spectrum::new(0.04, 0.04, 0.04),
        &distribution,
    ));
}

#[test]
fn lambertian_total_scattering_matches_reflectance() {
    let bxdf = Lambertian::new(Spectrum::new(0.9, 0.9, 0.9));
    let samples = canonical_samples(128);

    let wo = Vec3::new(0.3, 0.1, 0.9).normalized();
    let rho = bxdf.rho_hd(wo, &samples);
    // Monte Carlo with cosine sampling has low variance here, a few
    // permille suffices at this sample count
    assert_abs_diff_eq!(rho.r, 0.9, epsilon = 5e-3);
    assert_abs_diff_eq!(rho.g, 0.9, epsilon = 5e-3);
    assert_abs_diff_eq!(rho.b, 0.9, epsilon = 5e-3);
}

#[test]
fn passive_surfaces_conserve_energy() {
    let samples1 = canonical_samples(64);
    let samples2: Vec<Point2<f32>> = canonical_samples(64)
        .iter()
        .map(|u| Point2::new(1.0 - u.x, 1.0 - u.y))
        .collect();

    let distribution = BlinnDistribution::new(30.0);
    let bxdfs: Vec<Box<dyn Bxdf + '_>> = vec![
        Box::new(Lambertian::new(Spectrum::new(1.0, 1.0, 1.0))),
        Box::new(OrenNayar::new(Spectrum::new(1.0, 1.0, 1.0), 0.5)),
        Box::new(FresnelBlend::new(
            Spectrum::new(0.8, 0.8, 0.8),
            Spectrum::new(0.04, 0.04, 0.04),
            &distribution,
        )),
    ];

    for bxdf in &bxdfs {
        let rho = bxdf.rho_hh(&samples1, &samples2);
        for c in 0..3 {
            assert!(
                rho[c] <= 1.05,
                "rho {} exceeds unity beyond Monte Carlo error",
                rho[c]
            );
        }
    }
}

#[test]
fn specular_reflection_is_deterministic() {
    let bxdf = specular::Reflection::new(
        Spectrum::new(1.0, 1.0, 1.0),
        Fresnel::NoOp,
    );

    let wo = Vec3::new(0.4, -0.2, 0.8).normalized();
    for u in canonical_samples(4) {
        let BxdfSample {
            wi,
            pdf,
            sample_type,
            ..
        } = bxdf.sample_f(wo, u);
        assert_relative_eq!(wi.x, -wo.x);
        assert_relative_eq!(wi.y, -wo.y);
        assert_relative_eq!(wi.z, wo.z);
        assert_eq!(pdf, 1.0);
        assert_eq!(sample_type, BxdfType::SPECULAR | BxdfType::REFLECTION);

        // The mirror direction has no continuous density
        assert_eq!(bxdf.pdf(wo, wi), 0.0);
        assert!(bxdf.f(wo, wi).is_black());
    }
}

#[test]
fn specular_transmission_crosses_the_surface() {
    let bxdf = specular::Transmission::new(Spectrum::new(1.0, 1.0, 1.0), 1.0, 1.5);

    let wo = Vec3::new(0.3, 0.2, 0.9).normalized();
    let sample = bxdf.sample_f(wo, Point2::new(0.5, 0.5));
    assert_eq!(sample.pdf, 1.0);
    assert!(sample.wi.z < 0.0, "refracted direction should flip sides");
}

#[test]
fn blinn_pdf_hemisphere_integral_is_close_to_one() {
    // The exponential lobe pdf converted through the half-vector Jacobian
    // does not integrate to exactly one, the historical excess is around
    // 5%. Pin the empirical tolerance instead of asserting exactness.
    let distribution = BlinnDistribution::new(20.0);
    let bxdf = MicrofacetReflection::new(
        Spectrum::new(1.0, 1.0, 1.0),
        &distribution,
        Fresnel::NoOp,
    );

    let wo = Vec3::new(0.5_f32.sin(), 0.0, 0.5_f32.cos());

    let n_theta = 256;
    let n_phi = 512;
    let d_theta = std::f32::consts::FRAC_PI_2 / (n_theta as f32);
    let d_phi = 2.0 * std::f32::consts::PI / (n_phi as f32);

    let mut integral = 0.0;
    for ti in 0..n_theta {
        let theta = ((ti as f32) + 0.5) * d_theta;
        for pi in 0..n_phi {
            let phi = ((pi as f32) + 0.5) * d_phi;
            let wi = Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            );
            integral += bxdf.pdf(wo, wi) * theta.sin() * d_theta * d_phi;
        }
    }

    assert!(
        (0.9..1.15).contains(&integral),
        "pdf integral {} drifted outside the known tolerance",
        integral
    );
}

fn local_frame_interaction() -> SurfaceInteraction {
    // dpdu x dpdv = +z so the shading frame matches the test frame
    SurfaceInteraction::new(
        Point3::zeros(),
        Point2::zeros(),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        false,
    )
}

#[test]
fn bsdf_averages_component_densities() {
    let si = local_frame_interaction();
    let mut bsdf = Bsdf::new(&si);

    let lambertian = Lambertian::new(Spectrum::new(0.5, 0.5, 0.5));
    let oren_nayar = OrenNayar::new(Spectrum::new(0.5, 0.5, 0.5), 0.3);
    bsdf.add(&lambertian);
    bsdf.add(&oren_nayar);

    let wo = Vec3::new(0.2, 0.3, 0.93).normalized();
    let wi = Vec3::new(-0.4, 0.1, 0.91).normalized();

    let expected =
        (Bxdf::pdf(&lambertian, wo, wi) + Bxdf::pdf(&oren_nayar, wo, wi)) / 2.0;
    assert_relative_eq!(
        bsdf.pdf(wo, wi, BxdfType::all()),
        expected,
        max_relative = 1e-5
    );

    // Both components land in the sum
    let expected_f = lambertian.f(wo, wi) + oren_nayar.f(wo, wi);
    assert_relative_eq!(
        bsdf.f(wo, wi, BxdfType::all()),
        expected_f,
        max_relative = 1e-5
    );
}

#[test]
fn bsdf_component_filtering() {
    let si = local_frame_interaction();
    let mut bsdf = Bsdf::with_eta(&si, 1.5);

    let lambertian = Lambertian::new(Spectrum::new(0.5, 0.5, 0.5));
    let reflection = specular::Reflection::new(
        Spectrum::new(1.0, 1.0, 1.0),
        Fresnel::dielectric(1.0, 1.5),
    );
    let transmission = specular::Transmission::new(Spectrum::new(1.0, 1.0, 1.0), 1.0, 1.5);
    bsdf.add(&lambertian);
    bsdf.add(&reflection);
    bsdf.add(&transmission);

    assert_eq!(bsdf.num_components(BxdfType::all()), 3);
    assert_eq!(
        bsdf.num_components(BxdfType::all() & !BxdfType::SPECULAR),
        1
    );
    assert_eq!(
        bsdf.num_components(BxdfType::SPECULAR | BxdfType::REFLECTION),
        1
    );
    assert_eq!(bsdf.eta, 1.5);

    // A specular selection samples the mirror direction with pdf one
    let wo = Vec3::new(0.4, -0.2, 0.8).normalized();
    let sample = bsdf.sample_f(
        wo,
        Point2::new(0.5, 0.5),
        0.3,
        BxdfType::SPECULAR | BxdfType::REFLECTION,
    );
    assert_eq!(sample.pdf, 1.0);
    assert_relative_eq!(sample.wi.z, wo.z, max_relative = 1e-5);
}

#[test]
fn measured_table_validates_dimensions() {
    use valo::materials::bsdfs::BrdfTable;

    assert!(BrdfTable::new(4, 4, 4, vec![Spectrum::zeros(); 64]).is_ok());
    assert!(BrdfTable::new(4, 4, 4, vec![Spectrum::zeros(); 63]).is_err());
    assert!(BrdfTable::new(0, 4, 4, Vec::new()).is_err());
}

#[test]
fn fresnel_dielectric_grazes_to_one() {
    let fresnel = Fresnel::dielectric(1.0, 1.5);
    let grazing = fresnel.evaluate(1e-4);
    let head_on = fresnel.evaluate(1.0);

    assert!(grazing.r > 0.9, "grazing reflectance {} too low", grazing.r);
    // Head-on reflectance of glass is about 4%
    assert_abs_diff_eq!(head_on.r, 0.04, epsilon = 5e-3);
}
