use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use hlsl_layout::PaddedElement;
use log::info;

#[allow(non_camel_case_types, dead_code)]
mod shaders {
    include!(concat!(env!("OUT_DIR"), "/appearance.rs"));
}

use shaders::{appearanceStructCb, drawStructCb, perObjectCb, primitiveContainerStruct};

/// A shader visible descriptor in a bindless heap.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DescriptorHandle {
    pub heap: u32,
    pub index: u32,
}

fn appearance() -> appearanceStructCb {
    let mut appearance = appearanceStructCb::zeroed();
    appearance.shininess = 32.0;
    appearance.fisk = [1, 2, 3].into();
    appearance.hest[0].assign_bits(&Vec3::new(0.5, 0.25, 1.0));
    appearance.hest[1].assign_bits(&Vec3::X);
    appearance.lala = 1.0;

    appearance.ambient.assign_bits(&Vec4::new(0.1, 0.1, 0.1, 1.0));
    appearance.diffuse.assign_bits(&Vec4::ONE);
    appearance.specular.assign_bits(&Vec4::splat(0.5));
    for (i, opacity) in appearance.opacity.iter_mut().enumerate() {
        *opacity = 1.0 - i as f32 * 0.1;
    }
    appearance.spec_level = 0.8;
    appearance.debris_color_style = 2;

    appearance.base_texture = DescriptorHandle { heap: 0, index: 12 };
    appearance.spec_texture = DescriptorHandle { heap: 0, index: 13 };
    appearance.normal_texture = DescriptorHandle { heap: 0, index: 14 };
    appearance
}

fn main() {
    env_logger::init();

    let mut per_object = perObjectCb::zeroed();

    // Each register of a row major matrix holds one row.
    let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    per_object.world.assign_bits(&world.transpose());
    per_object.appearance = appearance();
    for (i, draw) in per_object.draws.iter_mut().enumerate() {
        draw.object_id = 7;
        draw.primitive_id = i as u32;
    }

    let bytes = bytemuck::bytes_of(&per_object);
    info!("perObject constant buffer is {} bytes", bytes.len());
    info!(
        "appearance starts at byte {}",
        offset_of!(perObjectCb, appearance)
    );
    info!(
        "draws start at byte {} with a stride of {} bytes",
        offset_of!(perObjectCb, draws),
        <drawStructCb as PaddedElement>::STRIDE
    );

    let translation = per_object.world.reinterpret_as::<Mat4>().transpose().w_axis;
    info!("world translation {translation}");

    // Loose structs match structured buffers.
    let container = primitiveContainerStruct {
        aabb_min: Vec3::NEG_ONE.to_array().into(),
        aabb_max: Vec3::ONE.to_array().into(),
        bounding_sphere_center: Vec3::ZERO.to_array().into(),
        bounding_sphere_radius: 3.0f32.sqrt(),
        primitive_offset: 0,
        primitive_count: 4,
    };
    info!(
        "primitiveContainerStruct is {} bytes in a structured buffer: {container:?}",
        size_of::<primitiveContainerStruct>()
    );
}
