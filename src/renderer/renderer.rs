use std::sync::Arc;

use winit::{dpi::PhysicalSize, window::Window};

use crate::asset::{Assets, Mesh};
use crate::renderer::batch::RenderBatcher;
use crate::renderer::buffers::{EntityUniformBuffer, FrameBuffers};
use crate::renderer::context::RenderContext;
use crate::renderer::material::MaterialBinder;
use crate::renderer::pipeline_builder::PipelineBuilder;
use crate::renderer::plan::FramePlan;
use crate::renderer::shader::ShaderDesc;
use crate::renderer::uniforms::{CameraUniform, LightUniform};
use crate::renderer::Vertex;
use crate::scene::{Camera, Light};
use crate::settings::RenderSettings;
use crate::terrain::Terrain;

const INITIAL_ENTITY_CAPACITY: u32 = 1024;

/// The master renderer: owns the GPU context, the two forward pipelines
/// (terrain, entities) and every per-frame buffer.
///
/// A frame is: build the plan from the batcher, upload frame and per-draw
/// uniforms, record one pass that draws terrain tiles then entity groups,
/// submit, present, clear the batcher. Shared state is bound once per group
/// and every entity costs exactly one draw call.
pub struct Renderer {
    context: RenderContext,
    entity_pipeline: wgpu::RenderPipeline,
    terrain_pipeline: wgpu::RenderPipeline,
    frame_buffers: FrameBuffers,
    entity_uniforms: EntityUniformBuffer,
    materials: MaterialBinder,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, settings: &RenderSettings) -> Self {
        let size = window.inner_size();
        let context = RenderContext::new(window, size, settings).await;

        let frame_buffers = FrameBuffers::new(&context.device);
        let entity_uniforms = EntityUniformBuffer::new(&context.device, INITIAL_ENTITY_CAPACITY);
        let materials = MaterialBinder::new(&context.device);

        let layout = context
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ForwardPipelineLayout"),
                bind_group_layouts: &[
                    &frame_buffers.bind_layout,
                    &entity_uniforms.bind_layout,
                    materials.layout(),
                ],
                push_constant_ranges: &[],
            });

        let entity_desc = ShaderDesc::entity();
        let terrain_desc = ShaderDesc::terrain();
        let entity_shader = entity_desc.create_module(&context.device);
        let terrain_shader = terrain_desc.create_module(&context.device);

        let entity_pipeline = PipelineBuilder::new(&context.device, &layout, &entity_shader)
            .with_label("EntityPipeline")
            .with_entries(entity_desc.vertex_entry, entity_desc.fragment_entry)
            .with_vertex_buffer(Vertex::layout())
            .with_color_target(context.config.format)
            .with_depth(context.depth.format)
            .with_multisample(context.sample_count)
            .build();

        let terrain_pipeline = PipelineBuilder::new(&context.device, &layout, &terrain_shader)
            .with_label("TerrainPipeline")
            .with_entries(terrain_desc.vertex_entry, terrain_desc.fragment_entry)
            .with_vertex_buffer(Vertex::layout())
            .with_color_target(context.config.format)
            .with_depth(context.depth.format)
            .with_multisample(context.sample_count)
            .build();

        Self {
            context,
            entity_pipeline,
            terrain_pipeline,
            frame_buffers,
            entity_uniforms,
            materials,
            clear_color: settings.clear_color(),
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.context.config.width as f32 / self.context.config.height.max(1) as f32
    }

    /// Flush one frame.
    ///
    /// Everything submitted to `batcher` since the last call is drawn, then
    /// the batcher is cleared: submissions never persist across frames.
    pub fn render(
        &mut self,
        assets: &Assets,
        batcher: &mut RenderBatcher,
        terrains: &[Terrain],
        light: &Light,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let plan = FramePlan::build(batcher, terrains);

        self.frame_buffers.update(
            &self.context.queue,
            &CameraUniform::from_camera(camera, self.aspect_ratio()),
            &LightUniform::from_light(light),
        );
        self.entity_uniforms.upload(&self.context, &plan);

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Encoder"),
                });

        {
            let (view, resolve_target) = match &self.context.msaa_view {
                Some(msaa) => (msaa, Some(&surface_view)),
                None => (&surface_view, None),
            };

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ForwardPass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_bind_group(0, &self.frame_buffers.bind_group, &[]);

            if !plan.terrain_draws().is_empty() {
                rpass.set_pipeline(&self.terrain_pipeline);
                for draw in plan.terrain_draws() {
                    let Some(mesh) = resolve_mesh(assets, draw.mesh) else {
                        continue;
                    };
                    let Some(material) =
                        self.materials
                            .bind_group(&self.context.device, assets, draw.material)
                    else {
                        log::warn!("Skipping terrain tile with invalid material handle");
                        continue;
                    };

                    bind_mesh(&mut rpass, mesh);
                    rpass.set_bind_group(2, material, &[]);
                    rpass.set_bind_group(
                        1,
                        &self.entity_uniforms.bind_group,
                        &[self.entity_uniforms.offset_for(draw.slot)],
                    );
                    draw_mesh(&mut rpass, mesh);
                }
            }

            if !plan.batches().is_empty() {
                rpass.set_pipeline(&self.entity_pipeline);
                for batch in plan.batches() {
                    let Some(mesh) = resolve_mesh(assets, batch.model.mesh) else {
                        continue;
                    };
                    let Some(material) = self.materials.bind_group(
                        &self.context.device,
                        assets,
                        batch.model.material,
                    ) else {
                        log::warn!("Skipping batch with invalid material handle");
                        continue;
                    };

                    // Shared state once per group.
                    bind_mesh(&mut rpass, mesh);
                    rpass.set_bind_group(2, material, &[]);

                    // One draw call per entity at its uniform slot.
                    for i in 0..batch.entities.len() as u32 {
                        rpass.set_bind_group(
                            1,
                            &self.entity_uniforms.bind_group,
                            &[self.entity_uniforms.offset_for(batch.first_slot + i)],
                        );
                        draw_mesh(&mut rpass, mesh);
                    }
                }
            }
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();

        batcher.clear();
        Ok(())
    }
}

fn resolve_mesh(assets: &Assets, handle: crate::asset::Handle<Mesh>) -> Option<&Mesh> {
    let mesh = assets.meshes.get(handle);
    if mesh.is_none() {
        log::warn!("Skipping draw with invalid mesh handle");
    }
    mesh
}

fn bind_mesh(rpass: &mut wgpu::RenderPass<'_>, mesh: &Mesh) {
    rpass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
    if let Some(index_buffer) = mesh.index_buffer() {
        rpass.set_index_buffer(index_buffer.slice(..), mesh.index_format());
    }
}

fn draw_mesh(rpass: &mut wgpu::RenderPass<'_>, mesh: &Mesh) {
    match mesh.index_buffer() {
        Some(_) => rpass.draw_indexed(0..mesh.element_count(), 0, 0..1),
        None => rpass.draw(0..mesh.element_count(), 0..1),
    }
}
