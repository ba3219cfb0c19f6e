//! Light sources as authored in the scene

use crate::foundation::colour::Colour;
use crate::foundation::math::{Transform, Vec3};

/// Light types
///
/// The discriminant is the column of the light in zone count and index tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightType {
    /// Directional light (like sunlight), unbounded
    Direct = 0,
    /// Point light (like a lightbulb)
    Point = 1,
    /// Spot light (like a flashlight)
    Spot = 2,
}

impl LightType {
    /// Every light type, in column order
    pub const ALL: [Self; 3] = [Self::Direct, Self::Point, Self::Spot];

    /// Column of this type in zone tables
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Light source
///
/// Position and direction come from the light's node: the direction is the
/// node's forward (-Z) axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub light_type: LightType,
    /// Node placing the light in the world
    pub node: Transform,
    /// Light colour (sRGB)
    pub colour: Colour,
    /// Range of point and spot lights
    pub range: f32,
    /// Intensity multiplier
    pub energy: f32,
    /// Specular contribution
    pub specular: f32,
    /// Distance attenuation exponent
    pub attenuation: f32,
    /// Spot cone half-angle in degrees
    pub spot_angle: f32,
    /// Angular attenuation exponent of the spot cone
    pub spot_attenuation: f32,
    /// Shadow depth bias
    pub shadow_bias: f32,
    /// Disabled lights are left out of shots
    pub enabled: bool,
}

impl Light {
    /// Create a light of the given type at a node
    pub fn new(light_type: LightType, node: Transform) -> Self {
        Self {
            light_type,
            node,
            colour: Colour::WHITE,
            range: 1.0,
            energy: 1.0,
            specular: 0.5,
            attenuation: 0.5,
            spot_angle: 45.0,
            spot_attenuation: 0.5,
            shadow_bias: 0.1,
            enabled: true,
        }
    }

    /// Create a directional light shining along `direction`
    pub fn direct(direction: Vec3, colour: Colour, energy: f32) -> Self {
        Self {
            colour,
            energy,
            ..Self::new(LightType::Direct, Transform::looking_along(Vec3::zeros(), direction))
        }
    }

    /// Create a point light
    pub fn point(position: Vec3, colour: Colour, energy: f32, range: f32) -> Self {
        Self {
            colour,
            energy,
            range,
            ..Self::new(LightType::Point, Transform::from_position(position))
        }
    }

    /// Create a spot light with a cone half-angle in degrees
    pub fn spot(position: Vec3, direction: Vec3, colour: Colour, energy: f32, range: f32, spot_angle: f32) -> Self {
        Self {
            colour,
            energy,
            range,
            spot_angle,
            ..Self::new(LightType::Spot, Transform::looking_along(position, direction))
        }
    }

    /// Set the shadow depth bias
    #[must_use]
    pub fn with_shadow_bias(mut self, bias: f32) -> Self {
        self.shadow_bias = bias;
        self
    }

    /// Set attenuation exponents
    #[must_use]
    pub fn with_attenuation(mut self, attenuation: f32, spot_attenuation: f32) -> Self {
        self.attenuation = attenuation;
        self.spot_attenuation = spot_attenuation;
        self
    }

    /// World-space position
    pub const fn position(&self) -> Vec3 {
        self.node.position
    }

    /// World-space direction
    pub fn direction(&self) -> Vec3 {
        self.node.direction()
    }
}
