use foundation::color::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape3D {
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    /// Axis-aligned box; `depth` runs along the local +Z (facing) axis.
    Box { width: f64, height: f64, depth: f64 },
    /// Closed unit-radius line loop in the local XY plane.
    Ring { radius: f64, segments: u32 },
    /// Extruded text.
    Text {
        content: String,
        font_family: String,
        size: f64,
        depth: f64,
        curve_segments: u32,
    },
}

impl Shape3D {
    /// Vertices of a [`Shape3D::Ring`], first and last coincide; empty for other shapes.
    pub fn ring_vertices(&self) -> Vec<[f64; 3]> {
        let Shape3D::Ring { radius, segments } = self else {
            return Vec::new();
        };
        let n = (*segments).max(1);
        (0..=n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                [radius * a.cos(), radius * a.sin(), 0.0]
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Textured earth with a rim-light term. Renders untextured until a texture is bound.
    Earth { texture: Option<String> },
    /// Back-face, additively blended glow shell.
    Atmosphere,
    /// Unlit flat color applied to every face.
    Basic { color: Rgb },
    Line { color: Rgb, width: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
    pub material: Material,
}

impl Drawable3D {
    pub fn new(shape: Shape3D, material: Material) -> Self {
        Self { shape, material }
    }

    pub fn sphere(radius: f64, segments: u32, material: Material) -> Self {
        Self::new(
            Shape3D::Sphere {
                radius,
                width_segments: segments,
                height_segments: segments,
            },
            material,
        )
    }

    pub fn colored_box(width: f64, height: f64, depth: f64, color: Rgb) -> Self {
        Self::new(
            Shape3D::Box {
                width,
                height,
                depth,
            },
            Material::Basic { color },
        )
    }

    pub fn color(&self) -> Option<Rgb> {
        match self.material {
            Material::Basic { color } | Material::Line { color, .. } => Some(color),
            Material::Earth { .. } | Material::Atmosphere => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Drawable3D, Material, Shape3D};
    use foundation::color::Rgb;

    #[test]
    fn colored_box_carries_color() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let drawable = Drawable3D::colored_box(0.01, 0.01, 0.1, red);
        assert!(matches!(drawable.shape, Shape3D::Box { depth, .. } if depth == 0.1));
        assert_eq!(drawable.color(), Some(red));
        assert_eq!(
            Drawable3D::sphere(1.0, 32, Material::Atmosphere).color(),
            None
        );
    }

    #[test]
    fn ring_vertices_close_the_loop() {
        let ring = Shape3D::Ring {
            radius: 1.0,
            segments: 32,
        };
        let v = ring.ring_vertices();
        assert_eq!(v.len(), 33);
        let (first, last) = (v[0], v[32]);
        assert!((first[0] - last[0]).abs() < 1e-12 && (first[1] - last[1]).abs() < 1e-12);
    }
}
