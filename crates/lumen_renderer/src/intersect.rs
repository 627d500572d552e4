//! Ray-sphere intersection.

use lumen_core::{Scene, Sphere};
use lumen_math::{Interval, Ray, Vec3};

/// Record of the nearest ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Ray parameter at the intersection
    pub t: f32,
    /// World-space intersection point
    pub point: Vec3,
    /// Outward unit surface normal
    pub normal: Vec3,
    /// Index of the hit sphere in the scene
    pub sphere_index: usize,
}

/// Solve the ray-sphere quadratic, returning the nearest root inside
/// `ray_t`, or None on a miss.
///
/// Non-positive radii never hit; a degenerate (zero) ray direction yields
/// NaN roots which fail the interval test and also count as a miss.
fn hit_sphere(ray: &Ray, sphere: &Sphere, ray_t: Interval) -> Option<f32> {
    if sphere.radius <= 0.0 {
        return None;
    }

    let oc = sphere.position - ray.origin;
    let a = ray.direction.length_squared();
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    Some(root)
}

/// Find the nearest intersection of `ray` against every sphere in the
/// scene within `ray_t`.
pub fn nearest_hit(scene: &Scene, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
    let mut closest_so_far = ray_t.max;
    let mut nearest: Option<(usize, f32)> = None;

    for (index, sphere) in scene.spheres.iter().enumerate() {
        let interval = Interval::new(ray_t.min, closest_so_far);
        if let Some(t) = hit_sphere(ray, sphere, interval) {
            closest_so_far = t;
            nearest = Some((index, t));
        }
    }

    nearest.map(|(sphere_index, t)| {
        let sphere = &scene.spheres[sphere_index];
        let point = ray.at(t);
        let normal = (point - sphere.position) / sphere.radius;

        HitRecord {
            t,
            point,
            normal,
            sphere_index,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Material;

    fn one_sphere(position: Vec3, radius: f32) -> Scene {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::default());
        scene.add_sphere(Sphere::new(position, radius, mat));
        scene
    }

    fn forever() -> Interval {
        Interval::new(1e-4, f32::INFINITY)
    }

    #[test]
    fn test_head_on_hit_at_distance_minus_radius() {
        // Sphere of radius 1 centered 5 units down -Z; a ray aimed at the
        // center hits the near surface at t = 5 - 1
        let scene = one_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = nearest_hit(&scene, &ray, forever()).expect("should hit");
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
        assert_eq!(hit.sphere_index, 0);
    }

    #[test]
    fn test_perpendicular_offset_misses() {
        let scene = one_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);

        // Offset further than the radius, parallel direction
        let ray = Ray::new(Vec3::new(1.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(nearest_hit(&scene, &ray, forever()).is_none());
    }

    #[test]
    fn test_sphere_behind_origin_is_rejected() {
        let scene = one_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);

        // Sphere sits behind the ray
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(nearest_hit(&scene, &ray, forever()).is_none());
    }

    #[test]
    fn test_origin_inside_sphere_hits_far_wall() {
        let scene = one_sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        // Near root is negative, far root is the exit point
        let hit = nearest_hit(&scene, &ray, forever()).expect("should hit");
        assert!((hit.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_radius_never_hits() {
        let scene = one_sphere(Vec3::new(0.0, 0.0, -5.0), 0.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(nearest_hit(&scene, &ray, forever()).is_none());
    }

    #[test]
    fn test_nearest_of_two_spheres_wins() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::default());
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, mat));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, mat));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = nearest_hit(&scene, &ray, forever()).expect("should hit");

        assert_eq!(hit.sphere_index, 1);
        assert!((hit.t - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_epsilon_rejects_self_intersection() {
        let scene = one_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let first = nearest_hit(&scene, &ray, forever()).unwrap();

        // Re-cast from the surface point; the epsilon keeps the surface
        // itself from re-registering at t ~ 0
        let bounced = Ray::new(first.point + first.normal * 1e-4, Vec3::Z);
        assert!(nearest_hit(&scene, &bounced, forever()).is_none());
    }
}
