//! Scenario tests of the lighting block driven through a recording backend

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use super::*;
use crate::core::config::{EncodingPreference, LightingConfig, RendererConfig};
use crate::foundation::colour::Colour;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::backend::{
    BackendCaps, BackendFeatures, DrawCall, EncoderId, GfxBackend, TextureDesc, TextureHandle, TextureSampler,
    UniformHandle, UniformKind, ViewId,
};
use crate::render::backends::RecordingBackend;
use crate::render::block::{GfxContext, RenderBlock};
use crate::render::camera::{Camera, LightClusters};
use crate::render::frame::{BlendMode, DrawElement, Item, Pass, Render, RenderFrame, Scene, Shot};
use crate::render::pipeline::{Renderer, Shading};
use crate::render::shader::{base_options, ShaderVersion, BASE_BLOCK};
use crate::render::{RenderError, RenderResult};

/// Recording backend reachable from the test after being boxed into a context
#[derive(Clone, Default)]
struct SharedBackend(Rc<RefCell<RecordingBackend>>);

impl SharedBackend {
    fn with_caps(caps: BackendCaps) -> Self {
        Self(Rc::new(RefCell::new(RecordingBackend::new(caps))))
    }
}

impl GfxBackend for SharedBackend {
    fn caps(&self) -> BackendCaps {
        self.0.borrow().caps()
    }

    fn create_uniform(&mut self, name: &str, kind: UniformKind, count: u16) -> RenderResult<UniformHandle> {
        self.0.borrow_mut().create_uniform(name, kind, count)
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> RenderResult<TextureHandle> {
        self.0.borrow_mut().create_texture(desc)
    }

    fn update_texture(&mut self, texture: TextureHandle, data: &[u8]) -> RenderResult<()> {
        self.0.borrow_mut().update_texture(texture, data)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.0.borrow_mut().destroy_texture(texture);
    }

    fn set_view_uniform(&mut self, view: ViewId, uniform: UniformHandle, data: &[[f32; 4]]) {
        self.0.borrow_mut().set_view_uniform(view, uniform, data);
    }

    fn set_texture(&mut self, encoder: EncoderId, stage: u8, texture: TextureHandle) {
        self.0.borrow_mut().set_texture(encoder, stage, texture);
    }

    fn begin_encoders(&mut self, count: u32) -> RenderResult<u32> {
        self.0.borrow_mut().begin_encoders(count)
    }

    fn end_encoders(&mut self) {
        self.0.borrow_mut().end_encoders();
    }

    fn touch(&mut self, view: ViewId) {
        self.0.borrow_mut().touch(view);
    }

    fn submit(&mut self, encoder: EncoderId, view: ViewId, draw: &DrawCall) {
        self.0.borrow_mut().submit(encoder, view, draw);
    }
}

fn all(encoding: EncodingPreference) -> LightingConfig {
    LightingConfig {
        lights: encoding,
        zones: encoding,
        zone_lights: encoding,
        multiple_direct_lights: false,
    }
}

fn setup(config: LightingConfig) -> (BlockLight, GfxContext, SharedBackend) {
    let backend = SharedBackend::default();
    let mut ctx = GfxContext::new(Box::new(backend.clone()));
    let mut block = BlockLight::new(config);
    block.set_index(1);
    block.init_block(&mut ctx).unwrap();
    (block, ctx, backend)
}

fn render<'a>(shot: &'a Shot<'a>, camera: &'a Camera, env: Option<&'a Zone>) -> Render<'a> {
    Render {
        shading: Shading::Shaded,
        shot,
        camera,
        env,
        frame: RenderFrame::default(),
        view: 0,
    }
}

fn point(range: f32) -> Light {
    Light::point(Vec3::zeros(), Colour::WHITE, 1.0, range)
}

/// 3 point, 2 direct and 1 spot light, interleaved
fn mixed_lights() -> Vec<Light> {
    vec![
        point(1.0),
        Light::direct(-Vec3::y(), Colour::WHITE, 1.0),
        Light::spot(Vec3::zeros(), -Vec3::z(), Colour::WHITE, 1.0, 3.0, 30.0),
        point(4.0),
        Light::direct(-Vec3::x(), Colour::WHITE, 0.5),
        point(6.0),
    ]
}

#[test]
fn snapshot_preserves_shot_order() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights: Vec<Light> = (0..10).map(|index| point(index as f32)).collect();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    let ranges: Vec<f32> = block.gpu_lights().iter().map(|light| light.range).collect();
    let expected: Vec<f32> = (0..10).map(|index| index as f32).collect();
    assert_eq!(ranges, expected);
    assert_eq!(block.light_count(), 10);
}

#[test]
fn snapshot_keeps_prefix_of_oversized_shots() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights: Vec<Light> = (0..MAX_FORWARD_LIGHTS + 6).map(|index| point(index as f32)).collect();
    let scene = Scene {
        lights,
        ..Scene::default()
    };
    let shot = Shot::gather(&scene);
    let camera = Camera::default();

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    assert_eq!(block.gpu_lights().len(), MAX_FORWARD_LIGHTS);
    assert_eq!(block.gpu_shadows().len(), MAX_FORWARD_LIGHTS);
    assert_eq!(usize::from(block.light_count()), MAX_FORWARD_LIGHTS);
    assert_eq!(usize::from(block.zone().light_count), MAX_FORWARD_LIGHTS);
    assert_relative_eq!(block.gpu_lights()[MAX_FORWARD_LIGHTS - 1].range, (MAX_FORWARD_LIGHTS - 1) as f32);
}

#[test]
fn shadows_parallel_lights() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights: Vec<Light> = (0..5).map(|index| point(1.0).with_shadow_bias(index as f32 * 0.1)).collect();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    assert_eq!(block.gpu_shadows().len(), block.gpu_lights().len());
    for (index, shadow) in block.gpu_shadows().iter().enumerate() {
        assert_relative_eq!(shadow.bias, index as f32 * 0.1);
        assert_relative_eq!(shadow.matrix, MAX_SHADOWS as f32);
        assert_relative_eq!(shadow.radius, 1.0);
        assert_eq!(shadow.atlas_offset, [0.0; 2]);
        assert_eq!(shadow.atlas_scale, [0.0; 2]);
    }
}

#[test]
fn mixed_scene_is_binned_by_type() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights = mixed_lights();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    let zone = block.zone();
    assert_eq!(zone.light_counts, [2, 3, 1, 0]);
    assert_eq!(zone.binned(), u32::from(block.light_count()));
    assert_eq!(zone.indices(LightType::Direct).collect::<Vec<_>>(), vec![1, 4]);
    assert_eq!(zone.indices(LightType::Point).collect::<Vec<_>>(), vec![0, 3, 5]);
    assert_eq!(zone.indices(LightType::Spot).collect::<Vec<_>>(), vec![2]);

    assert_eq!(block.direct_lights(), &[1, 4]);
    assert_eq!(block.direct_light(), Some(1));
}

#[test]
fn every_light_is_binned_once_in_its_type_column() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights: Vec<Light> = mixed_lights().into_iter().cycle().take(40).collect();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    let mut seen = vec![0; lights.len()];
    for light_type in LightType::ALL {
        for index in block.zone().indices(light_type) {
            assert!(index < usize::from(block.light_count()));
            assert_eq!(lights[index].light_type, light_type);
            seen[index] += 1;
        }
    }
    assert!(seen.iter().all(|count| *count == 1));
}

#[test]
fn lights_are_moved_to_view_space() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let colour = Colour::rgb(1.0, 0.5, 0.0);
    let lights = vec![
        Light::spot(Vec3::new(1.0, 2.0, 3.0), Vec3::x(), colour, 2.0, 8.0, 30.0).with_attenuation(0.7, 0.3),
    ];
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::new(Mat4::new_translation(&Vec3::new(0.0, 0.0, -5.0)));

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    let light = &block.gpu_lights()[0];
    let linear = colour.to_linear();
    assert_relative_eq!(Vec3::from(light.position), Vec3::new(1.0, 2.0, -2.0), epsilon = 1e-5);
    assert_relative_eq!(Vec3::from(light.direction), Vec3::x(), epsilon = 1e-5);
    assert_relative_eq!(
        Vec3::from(light.energy),
        Vec3::new(linear.r, linear.g, linear.b) * 2.0,
        epsilon = 1e-5
    );
    assert_relative_eq!(light.range, 8.0);
    assert_relative_eq!(light.attenuation, 0.7);
    assert_relative_eq!(light.spot_attenuation, 0.3);
    assert_relative_eq!(light.spot_cutoff, 30f32.to_radians().cos(), epsilon = 1e-6);
}

#[test]
fn no_lights_means_no_direct_light() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let shot = Shot::default();
    let camera = Camera::default();
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();

    assert_eq!(block.light_count(), 0);
    assert_eq!(block.zone().binned(), 0);
    assert!(block.direct_lights().is_empty());
    assert_eq!(block.direct_light(), None);

    let mut version = ShaderVersion::new();
    block.options(&request, &mut version);
    assert!(!version.has_option(1, block_light::options::DIRECT_LIGHT));
    assert!(!version.has_option(1, block_light::options::FOG));
    assert!(!version.has_option(BASE_BLOCK, base_options::CLUSTERED));
}

#[test]
fn repeated_renders_produce_identical_snapshots() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights = mixed_lights();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::look_at(Vec3::new(2.0, 3.0, 4.0), Vec3::zeros(), Vec3::y());
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    let lights_bytes = bytemuck::cast_slice::<GpuLight, u8>(block.gpu_lights()).to_vec();
    let shadow_bytes = bytemuck::cast_slice::<GpuLightShadow, u8>(block.gpu_shadows()).to_vec();
    let zone = block.zone().clone();

    block.begin_render(&mut ctx, &request).unwrap();
    assert_eq!(bytemuck::cast_slice::<GpuLight, u8>(block.gpu_lights()), lights_bytes.as_slice());
    assert_eq!(bytemuck::cast_slice::<GpuLightShadow, u8>(block.gpu_shadows()), shadow_bytes.as_slice());
    assert_eq!(block.zone(), &zone);
}

#[test]
fn shrinking_shot_resets_zone_counts() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights = mixed_lights();
    let camera = Camera::default();

    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    let shot = Shot {
        lights: vec![&lights[3]],
        items: Vec::new(),
    };
    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    assert_eq!(block.zone().light_counts, [0, 1, 0, 0]);
    assert_eq!(block.direct_light(), None);
    assert_eq!(block.gpu_lights().len(), 1);
}

#[test]
fn fog_and_direct_light_select_options() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights = mixed_lights();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();
    let env = Zone::default().with_fog(Colour::WHITE, 0.05);
    let request = render(&shot, &camera, Some(&env));

    block.begin_render(&mut ctx, &request).unwrap();

    let mut version = ShaderVersion::new();
    block.options(&request, &mut version);
    assert!(version.has_option(1, block_light::options::FOG));
    assert!(version.has_option(1, block_light::options::DIRECT_LIGHT));
}

#[test]
fn mixed_oversized_shot_bins_only_kept_lights() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights: Vec<Light> = mixed_lights().into_iter().cycle().take(MAX_FORWARD_LIGHTS + 10).collect();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();

    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();

    let zone = block.zone();
    assert_eq!(usize::from(block.light_count()), MAX_FORWARD_LIGHTS);
    assert_eq!(zone.binned(), u32::from(block.light_count()));
    assert_eq!(zone.light_count, block.light_count());
    for light_type in LightType::ALL {
        assert!(zone.indices(light_type).all(|index| index < MAX_FORWARD_LIGHTS));
    }
}

#[test]
fn small_uniform_arrays_cap_the_snapshot() {
    let backend = SharedBackend::with_caps(BackendCaps {
        features: BackendFeatures::empty(),
        max_uniform_array: 128,
        ..BackendCaps::default()
    });
    let mut ctx = GfxContext::new(Box::new(backend.clone()));
    let mut block = BlockLight::new(LightingConfig::default());
    block.init_block(&mut ctx).unwrap();

    let capacity = 128 / GpuLight::TEXELS;
    assert_eq!(block.encodings().unwrap().lights, GpuEncoding::Uniform);
    assert_eq!(block.light_capacity(), capacity);
    let max_lights = block
        .shader_block()
        .defines
        .into_iter()
        .find(|define| define.name == "MAX_LIGHTS")
        .unwrap();
    assert_eq!(max_lights.value, capacity.to_string());

    let lights: Vec<Light> = mixed_lights().into_iter().cycle().take(40).collect();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    assert_eq!(block.gpu_lights().len(), capacity);
    assert_eq!(usize::from(block.light_count()), capacity);
    assert_eq!(block.zone().binned(), u32::from(block.light_count()));

    block.submit_pass(&mut ctx, &request, &Pass::new(0, EncoderId(0))).unwrap();
    let recorded = backend.0.borrow();
    assert_eq!(recorded.uniform_named("u_lights").unwrap().1.count, 128);
    assert_eq!(recorded.view_uniform(0, "u_lights").unwrap().len(), 128);
    assert_relative_eq!(recorded.view_uniform(0, "u_zone_lights").unwrap()[0][0], capacity as f32);
}

#[test]
fn uniform_encoding_uploads_on_each_pass() {
    let (mut block, mut ctx, backend) = setup(all(EncodingPreference::Uniform));
    let lights = mixed_lights();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();
    let env = Zone::default().with_fog(Colour::WHITE, 0.05);
    let request = render(&shot, &camera, Some(&env));

    block.begin_render(&mut ctx, &request).unwrap();
    assert_eq!(backend.0.borrow().texture_count(), 0);

    let pass = Pass::new(4, EncoderId(0));
    block.submit_pass(&mut ctx, &request, &pass).unwrap();

    let recorded = backend.0.borrow();
    let uploaded = recorded.view_uniform(4, "u_lights").unwrap();
    assert_eq!(uploaded.len(), lights.len() * GpuLight::TEXELS);
    assert_relative_eq!(uploaded[3 * GpuLight::TEXELS][3], 4.0);

    let shadows = recorded.view_uniform(4, "u_shadows").unwrap();
    assert_eq!(shadows.len(), lights.len() * GpuLightShadow::TEXELS);

    let table = recorded.view_uniform(4, "u_zone_lights").unwrap();
    assert_eq!(table.len(), ZoneLights::TEXELS);
    assert_eq!(table[1], [2.0, 3.0, 1.0, 0.0]);

    let fog = recorded.view_uniform(4, "u_fog").unwrap();
    assert_relative_eq!(fog[0][3], 0.05);
    assert!(recorded.view_uniform(4, "u_radiance").is_some());
}

#[test]
fn texture_encoding_binds_samplers_and_textures() {
    let (mut block, mut ctx, backend) = setup(all(EncodingPreference::Texture));
    let lights = mixed_lights();
    let items = [Item::default()];
    let shot = Shot {
        lights: lights.iter().collect(),
        items: items.iter().collect(),
    };
    let camera = Camera::default();
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    let lights_texture = block.lights_texture().unwrap();
    let zones_texture = block.zones_texture().unwrap();
    let zone_lights_texture = block.zone_lights_texture().unwrap();

    let pass = Pass::new(2, EncoderId(1));
    block.submit_pass(&mut ctx, &request, &pass).unwrap();
    let element = DrawElement {
        index: 0,
        item: &items[0],
    };
    block.submit_element(&mut ctx, &request, &element, &pass).unwrap();

    let recorded = backend.0.borrow();
    assert_eq!(recorded.texture_count(), 3);

    let stage = |sampler: TextureSampler| [[f32::from(sampler.stage()), 0.0, 0.0, 0.0]];
    assert_eq!(recorded.view_uniform(2, "s_lights"), Some(&stage(TextureSampler::Lights)[..]));
    assert_eq!(recorded.view_uniform(2, "s_zones"), Some(&stage(TextureSampler::Zones)[..]));
    assert_eq!(recorded.view_uniform(2, "s_zone_lights"), Some(&stage(TextureSampler::ZoneLights)[..]));
    assert!(recorded.view_uniform(2, "u_lights").is_none());

    let bindings = recorded.texture_bindings(EncoderId(1));
    assert!(bindings.contains(&(TextureSampler::Lights.stage(), lights_texture)));
    assert!(bindings.contains(&(TextureSampler::Zones.stage(), zones_texture)));
    assert!(bindings.contains(&(TextureSampler::ZoneLights.stage(), zone_lights_texture)));

    let texels = recorded.texture(lights_texture).unwrap().texels();
    let row = GpuLight::TEXELS + GpuLightShadow::TEXELS;
    assert_relative_eq!(texels[3 * row][3], 4.0);
    assert_relative_eq!(texels[3 * row + GpuLight::TEXELS][0], MAX_SHADOWS as f32);

    let table = recorded.texture(zone_lights_texture).unwrap().texels();
    assert_eq!(table[0], [6.0, 0.0, 0.0, 0.0]);
    assert_eq!(table[1], [2.0, 3.0, 1.0, 0.0]);
}

#[test]
fn auto_encoding_follows_float_texture_support() {
    let backend = SharedBackend::with_caps(BackendCaps {
        features: BackendFeatures::MULTIPLE_ENCODERS,
        ..BackendCaps::default()
    });
    let mut ctx = GfxContext::new(Box::new(backend));
    let mut block = BlockLight::new(LightingConfig::default());
    block.init_block(&mut ctx).unwrap();

    let encodings = block.encodings().unwrap();
    assert_eq!(encodings.lights, GpuEncoding::Uniform);
    assert_eq!(encodings.zones, GpuEncoding::Uniform);
    assert_eq!(encodings.zone_lights, GpuEncoding::Uniform);

    let (block, _, _) = setup(LightingConfig::default());
    assert_eq!(block.encodings().unwrap().lights, GpuEncoding::Texture);
}

#[test]
fn submit_before_init_is_an_error() {
    let mut ctx = GfxContext::new(Box::new(SharedBackend::default()));
    let mut block = BlockLight::new(LightingConfig::default());
    let shot = Shot::default();
    let camera = Camera::default();
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    let result = block.submit_pass(&mut ctx, &request, &Pass::new(0, EncoderId(0)));
    assert!(matches!(result, Err(RenderError::NotInitialized(_))));
}

#[test]
fn single_direct_light_by_default() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let lights = mixed_lights();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    assert_eq!(block.num_passes(), 1);

    let mut pass = Pass {
        sub_pass: 1,
        ..Pass::new(0, EncoderId(0))
    };
    block.begin_pass(&mut ctx, &request, &mut pass).unwrap();
    assert_eq!(block.direct_light(), Some(1));
    assert_eq!(pass.blend, BlendMode::Replace);
}

#[test]
fn multiple_direct_lights_accumulate_in_sub_passes() {
    let config = LightingConfig {
        multiple_direct_lights: true,
        ..LightingConfig::default()
    };
    let (mut block, mut ctx, _) = setup(config);
    let lights = mixed_lights();
    let shot = Shot {
        lights: lights.iter().collect(),
        items: Vec::new(),
    };
    let camera = Camera::default();
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    assert_eq!(block.num_passes(), 2);

    let mut first = Pass::new(0, EncoderId(0));
    block.begin_pass(&mut ctx, &request, &mut first).unwrap();
    assert_eq!(block.direct_light(), Some(1));
    assert_eq!(first.blend, BlendMode::Replace);

    let mut second = Pass {
        sub_pass: 1,
        ..Pass::new(0, EncoderId(0))
    };
    block.begin_pass(&mut ctx, &request, &mut second).unwrap();
    assert_eq!(block.direct_light(), Some(4));
    assert_eq!(second.blend, BlendMode::Add);

    let shot = Shot::default();
    block.begin_render(&mut ctx, &render(&shot, &camera, None)).unwrap();
    assert_eq!(block.num_passes(), 1);
}

#[derive(Default)]
struct CountingClusters {
    passes: RefCell<Vec<ViewId>>,
    encoders: RefCell<Vec<EncoderId>>,
}

impl LightClusters for Rc<CountingClusters> {
    fn submit_pass(&self, _backend: &mut dyn GfxBackend, view: ViewId) {
        self.passes.borrow_mut().push(view);
    }

    fn submit_encoder(&self, _backend: &mut dyn GfxBackend, encoder: EncoderId) {
        self.encoders.borrow_mut().push(encoder);
    }
}

#[test]
fn clustered_camera_submits_clusters() {
    let (mut block, mut ctx, _) = setup(LightingConfig::default());
    let clusters = Rc::new(CountingClusters::default());
    let camera = Camera::default().with_clusters(Box::new(Rc::clone(&clusters)));
    let items = [Item::default()];
    let shot = Shot {
        lights: Vec::new(),
        items: items.iter().collect(),
    };
    let request = render(&shot, &camera, None);

    block.begin_render(&mut ctx, &request).unwrap();
    let mut version = ShaderVersion::new();
    block.options(&request, &mut version);
    assert!(version.has_option(BASE_BLOCK, base_options::CLUSTERED));

    let pass = Pass::new(3, EncoderId(2));
    block.submit_pass(&mut ctx, &request, &pass).unwrap();
    let element = DrawElement {
        index: 0,
        item: &items[0],
    };
    block.submit_element(&mut ctx, &request, &element, &pass).unwrap();

    assert_eq!(*clusters.passes.borrow(), vec![3]);
    assert_eq!(*clusters.encoders.borrow(), vec![EncoderId(2)]);
}

#[test]
fn pipeline_draws_with_lighting_options() {
    let backend = SharedBackend::default();
    let mut renderer = Renderer::new(Box::new(backend.clone()), RendererConfig::default());
    let index = renderer.add_block(BlockLight::new(LightingConfig::default())).unwrap();
    renderer.init_pipeline().unwrap();

    let scene = Scene {
        lights: mixed_lights(),
        items: vec![Item::default(); 2],
        env: Zone::default(),
    };
    let shot = Shot::gather(&scene);
    let camera = Camera::look_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros(), Vec3::y());

    renderer.begin_frame().unwrap();
    renderer
        .render(Shading::Shaded, &shot, &camera, Some(&scene.env))
        .unwrap();
    renderer.end_frame().unwrap();

    let draws = backend.0.borrow().draws();
    assert_eq!(draws.len(), 2);
    for (_, view, draw) in draws {
        assert_eq!(view, 0);
        assert_eq!(draw.program[index], 1 << block_light::options::DIRECT_LIGHT);
        assert!(!draw.additive);
    }
}
