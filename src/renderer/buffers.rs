use std::mem;
use std::num::NonZeroU64;

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::renderer::context::RenderContext;
use crate::renderer::plan::FramePlan;
use crate::renderer::uniforms::{CameraUniform, EntityUniform, LightUniform};

/// Frame-global constants: camera and sun light, uploaded once per frame
/// and shared by every pipeline through bind group 0.
pub(crate) struct FrameBuffers {
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bind_layout: wgpu::BindGroupLayout,
}

impl FrameBuffers {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("CameraBuffer"),
            contents: bytemuck::bytes_of(&CameraUniform::new()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("LightBuffer"),
            contents: bytemuck::bytes_of(&LightUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("FrameBindLayout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(
                            NonZeroU64::new(mem::size_of::<CameraUniform>() as u64).unwrap(),
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(
                            NonZeroU64::new(mem::size_of::<LightUniform>() as u64).unwrap(),
                        ),
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("FrameBindGroup"),
            layout: &bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            camera_buffer,
            light_buffer,
            bind_group,
            bind_layout,
        }
    }

    pub(crate) fn update(&self, queue: &wgpu::Queue, camera: &CameraUniform, light: &LightUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(light));
    }
}

/// Per-draw transforms packed into one uniform buffer, addressed with a
/// dynamic offset per slot.
///
/// Grows on demand (doubling) when a frame needs more slots than the
/// current capacity; growth recreates the bind group, which is why it is
/// logged.
pub(crate) struct EntityUniformBuffer {
    buffer: wgpu::Buffer,
    capacity: u32,
    stride: u32,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bind_layout: wgpu::BindGroupLayout,
    scratch: Vec<u8>,
    uploaded_slots: u32,
}

impl EntityUniformBuffer {
    pub(crate) fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let alignment = device
            .limits()
            .min_uniform_buffer_offset_alignment
            .max(mem::size_of::<EntityUniform>() as u32);
        let stride = (mem::size_of::<EntityUniform>() as u32).next_multiple_of(alignment);

        let bind_layout = Self::create_layout(device);
        let buffer = Self::create_buffer(device, capacity, stride);
        let bind_group = Self::create_bind_group(device, &bind_layout, &buffer);

        Self {
            buffer,
            capacity,
            stride,
            bind_group,
            bind_layout,
            scratch: Vec::new(),
            uploaded_slots: 0,
        }
    }

    fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("EntityBindLayout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(
                        NonZeroU64::new(mem::size_of::<EntityUniform>() as u64).unwrap(),
                    ),
                },
                count: None,
            }],
        })
    }

    fn create_buffer(device: &wgpu::Device, capacity: u32, stride: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("EntityBuffer"),
            size: capacity as u64 * stride as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("EntityBindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: NonZeroU64::new(mem::size_of::<EntityUniform>() as u64),
                }),
            }],
        })
    }

    /// Write every planned transform into its slot and push the result to
    /// the GPU in one buffer write.
    pub(crate) fn upload(&mut self, context: &RenderContext, plan: &FramePlan) {
        let required = plan.slot_count();
        if required > self.capacity {
            self.grow(context, required);
        }

        self.scratch.clear();
        self.scratch
            .resize(required as usize * self.stride as usize, 0);

        for (slot, transform) in plan.transforms() {
            let uniform = EntityUniform::from_matrix(transform);
            let start = slot as usize * self.stride as usize;
            let end = start + mem::size_of::<EntityUniform>();
            self.scratch[start..end].copy_from_slice(bytemuck::bytes_of(&uniform));
        }

        if !self.scratch.is_empty() {
            context.queue.write_buffer(&self.buffer, 0, &self.scratch);
        }
        self.uploaded_slots = required;
    }

    /// Byte offset of a slot, for `set_bind_group` dynamic offsets.
    ///
    /// Slots are only addressable after the frame's `upload`; asking for a
    /// slot that was never uploaded is a frame-lifecycle contract violation.
    pub(crate) fn offset_for(&self, slot: u32) -> u32 {
        debug_assert!(
            slot < self.uploaded_slots,
            "slot {slot} was not uploaded this frame ({} slots)",
            self.uploaded_slots
        );
        slot * self.stride
    }

    fn grow(&mut self, context: &RenderContext, required: u32) {
        let new_capacity = required.max(self.capacity * 2).max(1);
        log::info!(
            "Growing entity uniform buffer: {} -> {}",
            self.capacity,
            new_capacity
        );

        self.buffer = Self::create_buffer(&context.device, new_capacity, self.stride);
        self.bind_group = Self::create_bind_group(&context.device, &self.bind_layout, &self.buffer);
        self.capacity = new_capacity;
    }
}
