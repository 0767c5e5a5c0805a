//! Vulkan implementation of [`RenderBackend`]
//!
//! One forward pass, one pipeline. Per-frame camera and light data live in a
//! uniform buffer per frame in flight (set 0); each material owns a texture
//! descriptor set (set 1); model matrix and material colours travel as push
//! constants.

use std::path::PathBuf;

use ash::vk;
use slotmap::SlotMap;

use super::buffer::{Buffer, UniformBuffer};
use super::commands::{CommandPool, CommandRecorder};
use super::descriptor::{self, DescriptorPool, DescriptorSetLayout};
use super::framebuffer::{DepthBuffer, Framebuffer};
use super::pipeline::{GraphicsPipeline, PushConstants, ShaderModule};
use super::render_pass::RenderPass;
use super::sync::{FrameSync, Semaphore};
use super::texture::Texture;
use super::{Swapchain, VulkanContext, VulkanError, VulkanResult};
use crate::assets::ImageData;
use crate::render::api::{BackendResult, FrameData, MaterialHandle, MeshHandle, RenderBackend};
use crate::render::window::WindowHandle;
use crate::render::{Material, Mesh, RenderError};

/// Upper bound on materials; descriptor sets come from one fixed pool
const MAX_MATERIALS: u32 = 128;

/// Vulkan renderer configuration
#[derive(Debug, Clone)]
pub struct VulkanRendererConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Directory holding `solar.vert.spv` and `solar.frag.spv`
    pub shader_dir: PathBuf,
    /// Frames the CPU may record ahead of the GPU
    pub max_frames_in_flight: usize,
    /// Clear colour (RGBA)
    pub clear_color: [f32; 4],
    /// Wait for vertical blank on present, one frame per display refresh
    pub vsync: bool,
}

impl Default for VulkanRendererConfig {
    fn default() -> Self {
        Self {
            application_name: "Orrery".to_string(),
            shader_dir: PathBuf::from("target/shaders"),
            max_frames_in_flight: 2,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
        }
    }
}

/// Per-frame uniforms, std140 compatible
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FrameUniforms {
    view_projection: [[f32; 4]; 4],
    camera_position: [f32; 4],
    /// xyz position, w range
    light_position: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
}

unsafe impl bytemuck::Pod for FrameUniforms {}
unsafe impl bytemuck::Zeroable for FrameUniforms {}

impl FrameUniforms {
    fn from_frame(frame: &FrameData) -> Self {
        let lighting = &frame.lighting;
        let p = frame.camera_position;
        Self {
            view_projection: frame.view_projection.into(),
            camera_position: [p.x, p.y, p.z, 1.0],
            light_position: [
                lighting.light_position.x,
                lighting.light_position.y,
                lighting.light_position.z,
                lighting.light_range,
            ],
            light_color: [lighting.light_color.x, lighting.light_color.y, lighting.light_color.z, 1.0],
            ambient: [lighting.ambient.x, lighting.ambient.y, lighting.ambient.z, 1.0],
        }
    }
}

struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

struct GpuMaterial {
    descriptor_set: vk::DescriptorSet,
    push: PushConstants,
    // Keeps the image alive while the descriptor set points at it
    _texture: Option<Texture>,
}

/// Vulkan renderer
///
/// Field order is drop order: everything created from the context is
/// declared before it.
pub struct VulkanRenderer {
    meshes: SlotMap<MeshHandle, GpuMesh>,
    materials: SlotMap<MaterialHandle, GpuMaterial>,
    white_texture: Texture,
    frame_uniforms: Vec<UniformBuffer<FrameUniforms>>,
    frame_sets: Vec<vk::DescriptorSet>,
    descriptor_pool: DescriptorPool,
    pipeline: GraphicsPipeline,
    material_layout: DescriptorSetLayout,
    _frame_layout: DescriptorSetLayout,
    frames: Vec<FrameSync>,
    render_finished: Vec<Semaphore>,
    framebuffers: Vec<Framebuffer>,
    depth_buffer: DepthBuffer,
    render_pass: RenderPass,
    swapchain: Swapchain,
    command_pool: CommandPool,
    context: VulkanContext,

    current_frame: usize,
    window_extent: vk::Extent2D,
    needs_recreate: bool,
    clear_color: [f32; 4],
    vsync: bool,
}

impl VulkanRenderer {
    /// Create the device, swapchain and forward pipeline for `window`
    pub fn new(window: &mut WindowHandle, config: &VulkanRendererConfig) -> VulkanResult<Self> {
        let frames_in_flight = config.max_frames_in_flight.max(1);
        let context = VulkanContext::new(window, &config.application_name)?;
        let device = context.raw_device();

        let (width, height) = window.get_framebuffer_size();
        let window_extent = vk::Extent2D { width, height };
        let swapchain = Swapchain::new(&context, window_extent, vk::SwapchainKHR::null(), config.vsync)?;
        let render_pass = RenderPass::new_forward_pass(device.clone(), swapchain.format().format)?;
        let depth_buffer = DepthBuffer::new(&context, swapchain.extent())?;
        let framebuffers = create_framebuffers(&context, &render_pass, &swapchain, &depth_buffer)?;
        let render_finished = create_semaphores(&context, swapchain.image_views().len())?;

        let command_pool = CommandPool::new(device.clone(), context.physical_device.graphics_family)?;
        let frames = command_pool
            .allocate_command_buffers(frames_in_flight as u32)?
            .into_iter()
            .map(|command_buffer| FrameSync::new(device.clone(), command_buffer))
            .collect::<VulkanResult<Vec<_>>>()?;

        let frame_layout = DescriptorSetLayout::per_frame(&device)?;
        let material_layout = DescriptorSetLayout::per_material(&device)?;

        let vertex_shader = ShaderModule::from_file(&device, config.shader_dir.join("solar.vert.spv"))?;
        let fragment_shader = ShaderModule::from_file(&device, config.shader_dir.join("solar.frag.spv"))?;
        let pipeline = GraphicsPipeline::new_forward(
            &device,
            render_pass.handle(),
            &vertex_shader,
            &fragment_shader,
            &[frame_layout.handle(), material_layout.handle()],
        )?;

        let descriptor_pool = DescriptorPool::new(device.clone(), frames_in_flight as u32 + MAX_MATERIALS)?;
        let mut frame_uniforms = Vec::with_capacity(frames_in_flight);
        let mut frame_sets = Vec::with_capacity(frames_in_flight);
        for _ in 0..frames_in_flight {
            let uniforms = UniformBuffer::<FrameUniforms>::new(&context)?;
            let set = descriptor_pool.allocate_one(frame_layout.handle())?;
            descriptor::write_uniform_buffer(&device, set, uniforms.handle(), uniforms.size());
            frame_uniforms.push(uniforms);
            frame_sets.push(set);
        }

        let white_texture = Texture::from_image_data(&context, &command_pool, &ImageData::white())?;

        log::info!(
            "Vulkan renderer ready: {}x{}, {} frames in flight",
            swapchain.extent().width,
            swapchain.extent().height,
            frames_in_flight
        );

        Ok(Self {
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            white_texture,
            frame_uniforms,
            frame_sets,
            descriptor_pool,
            pipeline,
            material_layout,
            _frame_layout: frame_layout,
            frames,
            render_finished,
            framebuffers,
            depth_buffer,
            render_pass,
            swapchain,
            command_pool,
            context,
            current_frame: 0,
            window_extent,
            needs_recreate: false,
            clear_color: config.clear_color,
            vsync: config.vsync,
        })
    }

    /// Rebuild the swapchain and everything sized to it
    fn recreate_swapchain(&mut self) -> VulkanResult<()> {
        self.context.wait_idle()?;

        let swapchain = Swapchain::new(&self.context, self.window_extent, self.swapchain.handle(), self.vsync)?;
        if swapchain.format().format != self.swapchain.format().format {
            return Err(VulkanError::InvalidOperation {
                reason: format!(
                    "surface format changed from {:?} to {:?}",
                    self.swapchain.format().format,
                    swapchain.format().format
                ),
            });
        }

        self.framebuffers.clear();
        self.swapchain = swapchain;
        self.depth_buffer = DepthBuffer::new(&self.context, self.swapchain.extent())?;
        self.framebuffers = create_framebuffers(&self.context, &self.render_pass, &self.swapchain, &self.depth_buffer)?;
        self.render_finished = create_semaphores(&self.context, self.swapchain.image_views().len())?;
        self.needs_recreate = false;

        log::debug!(
            "Swapchain recreated at {}x{}",
            self.swapchain.extent().width,
            self.swapchain.extent().height
        );
        Ok(())
    }

    fn record(
        &self,
        command_buffer: vk::CommandBuffer,
        image_index: usize,
        frame_set: vk::DescriptorSet,
        draws: &[(&GpuMesh, &GpuMaterial, PushConstants)],
    ) -> VulkanResult<()> {
        let device = self.context.raw_device();
        unsafe {
            device
                .reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(VulkanError::Api)?;
        }

        let extent = self.swapchain.extent();
        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: self.clear_color,
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue { depth: 1.0, stencil: 0 },
            },
        ];
        let render_area = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };

        let mut recorder = CommandRecorder::new(command_buffer, device);
        recorder.begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
        {
            let mut pass = recorder.begin_render_pass(
                self.render_pass.handle(),
                self.framebuffers[image_index].handle(),
                render_area,
                &clear_values,
            )?;
            pass.set_viewport_and_scissor(extent);
            pass.bind_pipeline(self.pipeline.handle());
            pass.bind_descriptor_sets(self.pipeline.layout(), 0, &[frame_set]);

            for (mesh, material, push) in draws {
                pass.bind_descriptor_sets(self.pipeline.layout(), 1, &[material.descriptor_set]);
                pass.push_constants(
                    self.pipeline.layout(),
                    vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                    bytemuck::bytes_of(push),
                );
                pass.bind_geometry(mesh.vertex_buffer.handle(), mesh.index_buffer.handle());
                pass.draw_indexed(mesh.index_count);
            }
        }
        recorder.end()?;
        Ok(())
    }

    fn render(&mut self, frame: &FrameData) -> BackendResult<()> {
        if self.window_extent.width == 0 || self.window_extent.height == 0 {
            return Ok(());
        }
        if self.needs_recreate {
            self.recreate_swapchain()?;
        }

        // Resolve handles before touching any GPU state
        let mut draws = Vec::with_capacity(frame.draws.len());
        for draw in &frame.draws {
            let mesh = self
                .meshes
                .get(draw.mesh)
                .ok_or_else(|| RenderError::InvalidHandle(format!("mesh {:?}", draw.mesh)))?;
            let material = self
                .materials
                .get(draw.material)
                .ok_or_else(|| RenderError::InvalidHandle(format!("material {:?}", draw.material)))?;
            let push = PushConstants {
                model: draw.model.into(),
                ..material.push
            };
            draws.push((mesh, material, push));
        }

        let sync = &self.frames[self.current_frame];
        sync.in_flight.wait(u64::MAX)?;

        let acquired = unsafe {
            self.swapchain.loader().acquire_next_image(
                self.swapchain.handle(),
                u64::MAX,
                sync.image_available.handle(),
                vk::Fence::null(),
            )
        };
        let (image_index, suboptimal) = match acquired {
            Ok(result) => result,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                self.needs_recreate = true;
                return Ok(());
            }
            Err(e) => return Err(VulkanError::Api(e).into()),
        };

        sync.in_flight.reset()?;
        self.frame_uniforms[self.current_frame].update(&FrameUniforms::from_frame(frame))?;
        self.record(
            sync.command_buffer,
            image_index as usize,
            self.frame_sets[self.current_frame],
            &draws,
        )?;

        let wait_semaphores = [sync.image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [sync.command_buffer];
        let signal_semaphores = [self.render_finished[image_index as usize].handle()];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build();

        let device = self.context.raw_device();
        unsafe {
            device
                .queue_submit(self.context.graphics_queue(), &[submit_info], sync.in_flight.handle())
                .map_err(VulkanError::Api)?;
        }

        let swapchains = [self.swapchain.handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);
        let presented = unsafe {
            self.swapchain
                .loader()
                .queue_present(self.context.device.present_queue, &present_info)
        };

        match presented {
            Ok(false) => {}
            Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => self.needs_recreate = true,
            Err(e) => return Err(VulkanError::Api(e).into()),
        }
        if suboptimal {
            self.needs_recreate = true;
        }

        self.current_frame = (self.current_frame + 1) % self.frames.len();
        Ok(())
    }

    fn load_texture(&self, material: &Material) -> VulkanResult<Option<Texture>> {
        let Some(path) = &material.texture else {
            return Ok(None);
        };
        match ImageData::from_file(path) {
            Ok(image) => Texture::from_image_data(&self.context, &self.command_pool, &image).map(Some),
            Err(e) => {
                log::warn!("Texture {} unavailable, using plain white: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

impl RenderBackend for VulkanRenderer {
    fn surface_extent(&self) -> (u32, u32) {
        (self.window_extent.width, self.window_extent.height)
    }

    fn create_mesh(&mut self, mesh: &Mesh) -> BackendResult<MeshHandle> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(RenderError::ResourceCreationFailed("mesh has no geometry".into()));
        }

        let vertex_buffer = Buffer::with_data(&self.context, vk::BufferUsageFlags::VERTEX_BUFFER, &mesh.vertices)?;
        let index_buffer = Buffer::with_data(&self.context, vk::BufferUsageFlags::INDEX_BUFFER, &mesh.indices)?;

        log::debug!(
            "Uploaded mesh: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(self.meshes.insert(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }))
    }

    fn create_material(&mut self, material: &Material) -> BackendResult<MaterialHandle> {
        if self.materials.len() >= MAX_MATERIALS as usize {
            return Err(RenderError::ResourceCreationFailed(format!(
                "material limit of {} reached",
                MAX_MATERIALS
            )));
        }

        let texture = self.load_texture(material)?;
        let (view, sampler) = texture
            .as_ref()
            .map_or((self.white_texture.view(), self.white_texture.sampler()), |t| {
                (t.view(), t.sampler())
            });

        let descriptor_set = self.descriptor_pool.allocate_one(self.material_layout.handle())?;
        descriptor::write_combined_image_sampler(&self.context.raw_device(), descriptor_set, view, sampler);

        let [r, g, b] = material.base_color;
        let [er, eg, eb] = material.emissive;
        let push = PushConstants {
            base_color: [r, g, b, 1.0],
            emissive: [er, eg, eb, 0.0],
            flags: [material.flags.bits(), 0, 0, 0],
            ..PushConstants::default()
        };

        Ok(self.materials.insert(GpuMaterial {
            descriptor_set,
            push,
            _texture: texture,
        }))
    }

    fn draw_frame(&mut self, frame: &FrameData) -> BackendResult<()> {
        self.render(frame)
    }

    fn resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        if width == self.window_extent.width && height == self.window_extent.height {
            return Ok(());
        }
        self.window_extent = vk::Extent2D { width, height };
        if width == 0 || height == 0 {
            log::debug!("Surface minimized, pausing presentation");
            return Ok(());
        }
        self.needs_recreate = true;
        Ok(())
    }

    fn wait_idle(&self) -> BackendResult<()> {
        self.context.wait_idle()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.context.wait_idle() {
            log::error!("Device wait failed during renderer shutdown: {}", e);
        }
    }
}

fn create_framebuffers(
    context: &VulkanContext,
    render_pass: &RenderPass,
    swapchain: &Swapchain,
    depth_buffer: &DepthBuffer,
) -> VulkanResult<Vec<Framebuffer>> {
    swapchain
        .image_views()
        .iter()
        .map(|&view| {
            Framebuffer::new(
                context.raw_device(),
                render_pass.handle(),
                &[view, depth_buffer.image_view()],
                swapchain.extent(),
            )
        })
        .collect()
}

fn create_semaphores(context: &VulkanContext, count: usize) -> VulkanResult<Vec<Semaphore>> {
    (0..count).map(|_| Semaphore::new(context.raw_device())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::lighting::{LightingEnvironment, PointLight};
    use crate::render::primitives::Camera;

    #[test]
    fn test_frame_uniforms_pack_light_range_in_w() {
        let environment =
            LightingEnvironment::new().add_light(PointLight::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), 1.0, 500.0));
        let camera = Camera::default();
        let frame = FrameData::new(&camera, &environment);

        let uniforms = FrameUniforms::from_frame(&frame);
        assert_eq!(uniforms.light_position[3], 500.0);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128);
    }

    #[test]
    fn test_default_config_double_buffers() {
        let config = VulkanRendererConfig::default();
        assert_eq!(config.max_frames_in_flight, 2);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert!(config.vsync);
    }
}
