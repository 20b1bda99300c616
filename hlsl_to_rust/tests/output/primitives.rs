#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct drawStruct {
    pub objectId: u32,
    pub primitiveId: u32,
}
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct drawStructCb {
    pub objectId: u32,
    pub primitiveId: u32,
}
unsafe impl hlsl_layout::PaddedElement for drawStructCb {
    type Padding = [u8; 8];
}
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct primitiveContainerStruct {
    pub aabbMin: hlsl_layout::Vector<f32, 3>,
    pub aabbMax: hlsl_layout::Vector<f32, 3>,
    pub boundingSphereCenter: hlsl_layout::Vector<f32, 3>,
    pub boundingSphereRadius: f32,
    pub primitiveOffset: u32,
    pub primitiveCount: u32,
}
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct primitiveContainerStructCb {
    pub aabbMin: hlsl_layout::Vector<f32, 3>,
    pub _pad12: [u8; 4],
    pub aabbMax: hlsl_layout::Vector<f32, 3>,
    pub _pad28: [u8; 4],
    pub boundingSphereCenter: hlsl_layout::Vector<f32, 3>,
    pub boundingSphereRadius: f32,
    pub primitiveOffset: u32,
    pub primitiveCount: u32,
}
impl PartialEq for primitiveContainerStructCb {
    fn eq(&self, other: &Self) -> bool {
        self.aabbMin == other.aabbMin && self.aabbMax == other.aabbMax
            && self.boundingSphereCenter == other.boundingSphereCenter
            && self.boundingSphereRadius == other.boundingSphereRadius
            && self.primitiveOffset == other.primitiveOffset
            && self.primitiveCount == other.primitiveCount
    }
}
unsafe impl hlsl_layout::PaddedElement for primitiveContainerStructCb {
    type Padding = [u8; 8];
}
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct primitiveStruct {
    pub IndexBufferVA: hlsl_layout::Vector<u32, 4>,
    pub appearanceId: u32,
    pub posDescriptor: [u32; 2],
    pub normDescriptor: [u32; 2],
    pub tc0Descriptor: [u32; 2],
}
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct primitiveStructCb {
    pub IndexBufferVA: hlsl_layout::Vector<u32, 4>,
    pub appearanceId: u32,
    pub posDescriptor: [u32; 2],
    pub _pad28: [u8; 4],
    pub normDescriptor: [u32; 2],
    pub tc0Descriptor: [u32; 2],
}
impl PartialEq for primitiveStructCb {
    fn eq(&self, other: &Self) -> bool {
        self.IndexBufferVA == other.IndexBufferVA && self.appearanceId == other.appearanceId
            && self.posDescriptor == other.posDescriptor
            && self.normDescriptor == other.normDescriptor
            && self.tc0Descriptor == other.tc0Descriptor
    }
}
unsafe impl hlsl_layout::PaddedElement for primitiveStructCb {
    type Padding = [u8; 0];
}
