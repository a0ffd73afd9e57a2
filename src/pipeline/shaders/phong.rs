use crate::core::color::{gray, saturate};
use crate::core::geometry::{Fragment, normalize_or_zero};
use crate::core::pipeline::FragmentShader;
use crate::scene::light::Light;
use crate::scene::material::MaterialMaps;
use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;
use std::f32::consts::PI;
use std::fmt;

/// Scales the sampled gloss value into a Phong exponent.
pub const SHININESS: f32 = 25.0;

/// Depth range stretched over the full gray ramp in the depth view.
const DEPTH_REMAP_MIN: f32 = 0.995;
const DEPTH_REMAP_MAX: f32 = 1.0;

/// What the pixel shader outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderState {
    /// Diffuse + specular + ambient.
    #[default]
    Combined,
    /// Remapped depth as gray.
    Depth,
    /// Lambert cosine term as gray.
    ObservedArea,
    /// Phong specular term only.
    SpecularOnly,
}

impl RenderState {
    /// The next state, wrapping around after `SpecularOnly`.
    pub fn next(self) -> Self {
        match self {
            RenderState::Combined => RenderState::Depth,
            RenderState::Depth => RenderState::ObservedArea,
            RenderState::ObservedArea => RenderState::SpecularOnly,
            RenderState::SpecularOnly => RenderState::Combined,
        }
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderState::Combined => "combined",
            RenderState::Depth => "depth",
            RenderState::ObservedArea => "observed area",
            RenderState::SpecularOnly => "specular",
        };
        f.write_str(name)
    }
}

/// Lambert diffuse + normal mapping + Phong specular.
///
/// Everything the shader reads is a field here, so `shade` is a pure function
/// of the fragment and this context.
pub struct PhongShader<'a> {
    pub light: &'a Light,
    pub maps: &'a MaterialMaps,
    pub render_state: RenderState,
    pub use_normal_map: bool,
}

impl<'a> PhongShader<'a> {
    pub fn new(
        light: &'a Light,
        maps: &'a MaterialMaps,
        render_state: RenderState,
        use_normal_map: bool,
    ) -> Self {
        Self {
            light,
            maps,
            render_state,
            use_normal_map,
        }
    }

    /// Sampled normal brought from tangent space into world space.
    fn shading_normal(&self, fragment: &Fragment) -> Vector3<f32> {
        if !self.use_normal_map {
            return fragment.normal;
        }

        let normal = fragment.normal;
        let tangent = fragment.tangent;
        let binormal = normal.cross(&tangent);
        let tangent_space = Matrix3::from_columns(&[tangent, binormal, normal]);

        let encoded = self.maps.normal.sample(&fragment.uv);
        let decoded = encoded * 2.0 - Vector3::new(1.0, 1.0, 1.0);

        normalize_or_zero(tangent_space * decoded)
    }

    /// Phong specular: `ks * max(0, r·v)^exp`, with `l` pointing at the light.
    fn phong(
        specular: f32,
        exponent: f32,
        l: &Vector3<f32>,
        v: &Vector3<f32>,
        n: &Vector3<f32>,
    ) -> Vector3<f32> {
        let reflected = reflect(l, n);
        let cos_alpha = reflected.dot(v).max(0.0);
        gray(specular * cos_alpha.powf(exponent))
    }
}

/// Reflects `incident` about `normal`.
#[inline]
pub fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Linear remap of `value` from [min, max] into [0, 1], clamped.
#[inline]
pub fn remap(value: f32, min: f32, max: f32) -> f32 {
    saturate((value - min) / (max - min))
}

impl FragmentShader for PhongShader<'_> {
    fn shade(&self, fragment: &Fragment) -> Vector3<f32> {
        let normal = self.shading_normal(fragment);
        let to_light = self.light.direction_to_light();

        // Observed area
        let cosine = saturate(normal.dot(&to_light));

        match self.render_state {
            RenderState::Combined => {
                let diffuse = self.maps.diffuse.sample(&fragment.uv) / PI;
                let specular = self.specular(fragment, &to_light, &normal);
                diffuse * (self.light.intensity * cosine) + specular + self.light.ambient
            }
            RenderState::Depth => gray(remap(fragment.depth, DEPTH_REMAP_MIN, DEPTH_REMAP_MAX)),
            RenderState::ObservedArea => gray(cosine),
            RenderState::SpecularOnly => self.specular(fragment, &to_light, &normal),
        }
    }
}

impl PhongShader<'_> {
    fn specular(&self, fragment: &Fragment, to_light: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
        let ks = self.maps.specular.sample(&fragment.uv).x;
        let exponent = self.maps.gloss.sample(&fragment.uv).x * SHININESS;
        Self::phong(ks, exponent, to_light, &fragment.view_direction, normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;
    use nalgebra::{Point2, Vector2};
    use std::sync::Arc;

    fn fragment() -> Fragment {
        Fragment {
            pixel: Point2::new(0, 0),
            depth: 0.9975,
            w: 5.0,
            uv: Vector2::new(0.5, 0.5),
            normal: Vector3::new(0.0, 0.0, -1.0),
            tangent: Vector3::new(1.0, 0.0, 0.0),
            view_direction: Vector3::new(0.0, 0.0, 1.0),
        }
    }

    fn light() -> Light {
        // Shines straight at the -Z facing surface.
        Light::new(Vector3::new(0.0, 0.0, 1.0), 7.0, Vector3::new(0.025, 0.025, 0.025))
    }

    #[test]
    fn render_state_cycles_back_after_four_steps() {
        let maps = MaterialMaps::default();
        let light = light();
        let frag = fragment();

        let start = RenderState::Combined;
        let mut state = start;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(state);
            state = state.next();
        }
        assert_eq!(state, start);
        assert_eq!(seen.len(), 4);
        assert!(seen.windows(2).all(|w| w[0] != w[1]));

        let before = PhongShader::new(&light, &maps, start, true).shade(&frag);
        let after = PhongShader::new(&light, &maps, state, true).shade(&frag);
        assert_eq!(before, after);
    }

    #[test]
    fn observed_area_is_cosine_term() {
        let maps = MaterialMaps::default();
        let light = light();
        let shader = PhongShader::new(&light, &maps, RenderState::ObservedArea, false);
        let c = shader.shade(&fragment());
        assert!((c.x - 1.0).abs() < 1e-6);
        assert_eq!(c.x, c.y);

        let mut away = fragment();
        away.normal = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(shader.shade(&away), Vector3::zeros());
    }

    #[test]
    fn depth_view_remaps_narrow_range() {
        let maps = MaterialMaps::default();
        let light = light();
        let shader = PhongShader::new(&light, &maps, RenderState::Depth, false);
        let c = shader.shade(&fragment());
        assert!((c.x - 0.5).abs() < 1e-3);

        let mut near = fragment();
        near.depth = 0.5;
        assert_eq!(shader.shade(&near), Vector3::zeros());
    }

    #[test]
    fn combined_adds_diffuse_specular_and_ambient() {
        let maps = MaterialMaps {
            specular: Arc::new(Texture::solid(Vector3::zeros())),
            ..MaterialMaps::default()
        };
        let light = light();
        let shader = PhongShader::new(&light, &maps, RenderState::Combined, false);
        let c = shader.shade(&fragment());

        let albedo = maps.diffuse.sample(&Vector2::new(0.5, 0.5)).x;
        let expected = 7.0 * albedo / PI + 0.025;
        assert!((c.x - expected).abs() < 1e-5);
    }

    #[test]
    fn specular_peaks_on_mirror_direction() {
        let maps = MaterialMaps {
            specular: Arc::new(Texture::solid(Vector3::new(1.0, 1.0, 1.0))),
            ..MaterialMaps::default()
        };
        let light = light();
        let shader = PhongShader::new(&light, &maps, RenderState::SpecularOnly, false);

        // Light comes from behind the viewer and bounces straight back.
        let c = shader.shade(&fragment());
        assert!((c.x - 1.0).abs() < 1e-5);
        assert_eq!(c.x, c.z);

        let mut grazing = fragment();
        grazing.view_direction = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(shader.shade(&grazing), Vector3::zeros());
    }

    #[test]
    fn flat_normal_map_keeps_geometric_normal() {
        let maps = MaterialMaps::default();
        let light = light();
        let shader = PhongShader::new(&light, &maps, RenderState::Combined, true);
        let frag = fragment();
        let n = shader.shading_normal(&frag);
        // The 1x1 flat map encodes (0.5, 0.5, 1.0) -> about (0, 0, 1) in tangent space.
        assert!((n - frag.normal).norm() < 0.02);
    }

    #[test]
    fn reflect_mirrors_about_normal() {
        let r = reflect(&Vector3::new(1.0, -1.0, 0.0), &Vector3::y());
        assert_eq!(r, Vector3::new(1.0, 1.0, 0.0));
    }
}
