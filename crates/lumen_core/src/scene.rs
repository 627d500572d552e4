//! Scene types for the path tracer.
//!
//! A scene is a flat, passive container: ordered spheres and ordered
//! materials. Spheres reference materials by index so the property panels
//! of a host application can edit either side independently.

use lumen_math::Vec3;

/// A surface description using a single unified scatter model.
///
/// There is deliberately no material trait or subtype hierarchy here;
/// roughness and metallic blend one scatter response between mirror-like
/// and diffuse behavior, which keeps the per-bounce loop free of dynamic
/// dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Base reflectance color (RGB, 0-1)
    pub albedo: Vec3,

    /// Scatter blend: 0 = mirror reflection, 1 = fully diffuse
    pub roughness: f32,

    /// Conductor blend: 0 = dielectric, 1 = metal (tinted specular)
    pub metallic: f32,

    /// Emitted light color (RGB)
    pub emission_color: Vec3,

    /// Emission strength multiplier (>= 0, unbounded above)
    pub emission_power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::new(0.5, 0.5, 0.5), // Grey default
            roughness: 1.0,
            metallic: 0.0,
            emission_color: Vec3::ZERO,
            emission_power: 0.0,
        }
    }
}

impl Material {
    /// Create a new material with the given albedo and default scatter
    /// parameters.
    pub fn new(albedo: Vec3) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Set the scatter blend parameters.
    pub fn with_surface(mut self, roughness: f32, metallic: f32) -> Self {
        self.roughness = roughness;
        self.metallic = metallic;
        self
    }

    /// Set the emission color and strength.
    pub fn with_emission(mut self, color: Vec3, power: f32) -> Self {
        self.emission_color = color;
        self.emission_power = power;
        self
    }

    /// Total emitted radiance: emission color scaled by emission power.
    pub fn emission(&self) -> Vec3 {
        self.emission_color.max(Vec3::ZERO) * self.emission_power.max(0.0)
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission_power > 0.0 && self.emission_color.length_squared() > 0.0
    }

    /// Return a copy with every field forced into its documented range.
    ///
    /// A host UI normally clamps while editing, but the renderer calls
    /// this at material lookup so out-of-range values can never push
    /// throughput above 1 or radiance below 0.
    pub fn clamped(&self) -> Self {
        Self {
            albedo: self.albedo.clamp(Vec3::ZERO, Vec3::ONE),
            roughness: self.roughness.clamp(0.0, 1.0),
            metallic: self.metallic.clamp(0.0, 1.0),
            emission_color: self.emission_color.max(Vec3::ZERO),
            emission_power: self.emission_power.max(0.0),
        }
    }
}

/// An analytic sphere primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    /// World-space center
    pub position: Vec3,

    /// Radius (> 0; non-positive spheres are treated as never hit)
    pub radius: f32,

    /// Index into `Scene::materials` (clamped at lookup)
    pub material_index: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 1.0,
            material_index: 0,
        }
    }
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(position: Vec3, radius: f32, material_index: usize) -> Self {
        Self {
            position,
            radius,
            material_index,
        }
    }
}

/// A complete scene: ordered spheres and ordered materials.
///
/// Owned and mutated exclusively by the host between render calls; the
/// renderer reads it through a shared borrow for the duration of one
/// `render` call and keeps nothing afterwards.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Sphere primitives, in display order
    pub spheres: Vec<Sphere>,

    /// Materials referenced by sphere index
    pub materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material to the scene and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        let index = self.materials.len();
        self.materials.push(material);
        index
    }

    /// Add a sphere to the scene and return its index.
    pub fn add_sphere(&mut self, sphere: Sphere) -> usize {
        let index = self.spheres.len();
        self.spheres.push(sphere);
        index
    }

    /// Look up the material for a sphere, tolerating bad indices.
    ///
    /// An out-of-range index is clamped to the last material rather than
    /// panicking; an empty material list yields the default grey material.
    pub fn material_for(&self, sphere: &Sphere) -> Material {
        match self.materials.len() {
            0 => Material::default(),
            len => self.materials[sphere.material_index.min(len - 1)].clone(),
        }
    }

    /// Get sphere count.
    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Check if the scene has no geometry.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// The startup scene: a magenta sphere, an emissive orange sphere and
    /// a large blue ground sphere.
    pub fn example() -> Self {
        let mut scene = Scene::new();

        let magenta = scene.add_material(
            Material::new(Vec3::new(1.0, 0.0, 1.0)).with_surface(0.0, 0.0),
        );
        let ground = scene.add_material(
            Material::new(Vec3::new(0.2, 0.3, 1.0)).with_surface(0.1, 0.0),
        );
        let glowing = scene.add_material(
            Material::new(Vec3::new(0.8, 0.5, 0.2))
                .with_surface(0.1, 0.0)
                .with_emission(Vec3::new(0.8, 0.5, 0.2), 2.0),
        );

        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0, magenta));
        scene.add_sphere(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0, glowing));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0, ground));

        scene
    }
}
