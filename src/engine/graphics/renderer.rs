//! Vulkano renderer: one depth-tested, textured mesh pipeline.
//!
//! The viewer uploads a mesh and a texture once, then submits a
//! `FrameContext` each frame with the three matrices to bind.

use std::sync::Arc;

use winit::window::Window;

use super::mesh::CpuMesh;
use super::{MeshHandle, TextureHandle};
use crate::engine::{EngineError, EngineResult};

/// Per-frame draw parameters.
///
/// The matrices are the raw row-major layout of the math library. A
/// row-vector matrix stored row-major is byte-identical to its column-vector
/// transpose stored column-major — exactly what the std140 `mat4` uniforms
/// expect — so callers pass the untransposed form and the shaders compute
/// `P * V * M * v`.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub mesh: MeshHandle,
    pub texture: Option<TextureHandle>,
}

mod vulkano_backend {
    use std::collections::HashMap;
    use std::mem::size_of;
    use std::sync::Arc;

    use log::warn;

    use vulkano::buffer::{Buffer, BufferContents, BufferCreateInfo, BufferUsage, Subbuffer};
    use vulkano::command_buffer::allocator::StandardCommandBufferAllocator;
    use vulkano::command_buffer::{
        AutoCommandBufferBuilder, CommandBufferUsage, CopyBufferInfo, CopyBufferToImageInfo,
        PrimaryCommandBufferAbstract, RenderPassBeginInfo, SubpassBeginInfo, SubpassEndInfo,
    };
    use vulkano::descriptor_set::allocator::StandardDescriptorSetAllocator;
    use vulkano::descriptor_set::{DescriptorSet, WriteDescriptorSet};
    use vulkano::format::{ClearValue, Format};
    use vulkano::image::sampler::{Filter, Sampler, SamplerAddressMode, SamplerCreateInfo};
    use vulkano::image::view::ImageView;
    use vulkano::image::{Image, ImageCreateInfo, ImageType, ImageUsage};
    use vulkano::memory::allocator::{AllocationCreateInfo, MemoryTypeFilter};
    use vulkano::pipeline::graphics::color_blend::{ColorBlendAttachmentState, ColorBlendState};
    use vulkano::pipeline::graphics::depth_stencil::{DepthState, DepthStencilState};
    use vulkano::pipeline::graphics::input_assembly::InputAssemblyState;
    use vulkano::pipeline::graphics::multisample::MultisampleState;
    use vulkano::pipeline::graphics::rasterization::RasterizationState;
    use vulkano::pipeline::graphics::subpass::PipelineSubpassType;
    use vulkano::pipeline::graphics::vertex_input::{
        VertexInputAttributeDescription, VertexInputBindingDescription, VertexInputRate,
        VertexInputState,
    };
    use vulkano::pipeline::graphics::viewport::{Scissor, Viewport, ViewportState};
    use vulkano::pipeline::layout::{PipelineDescriptorSetLayoutCreateInfo, PipelineLayout};
    use vulkano::pipeline::{
        DynamicState, GraphicsPipeline, Pipeline, PipelineBindPoint, PipelineShaderStageCreateInfo,
    };
    use vulkano::render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass};
    use vulkano::swapchain::{self, Surface, Swapchain, SwapchainCreateInfo, SwapchainPresentInfo};
    use vulkano::sync::{self, GpuFuture};
    use vulkano::{DeviceSize, Validated, VulkanError};
    use vulkano_util::context::{VulkanoConfig, VulkanoContext};
    use winit::window::Window;

    use crate::engine::graphics::mesh::{CpuMesh, CpuVertex};
    use crate::engine::graphics::renderer::FrameContext;
    use crate::engine::graphics::{MeshHandle, TextureHandle};

    mod mesh_vs {
        vulkano_shaders::shader! {
            ty: "vertex",
            path: "assets/shaders/mesh.vert",
        }
    }

    mod mesh_fs {
        vulkano_shaders::shader! {
            ty: "fragment",
            path: "assets/shaders/mesh.frag",
        }
    }

    const DEPTH_FORMAT: Format = Format::D16_UNORM;

    /// std140 uniform block (set=0, binding=0). Matrices arrive in the
    /// row-major/row-vector raw layout; the shader reads them column-major,
    /// which is the transposed — i.e. column-vector — form it wants.
    #[derive(BufferContents, Clone, Copy, Debug, Default)]
    #[repr(C, align(16))]
    pub struct TransformsUbo {
        pub model: [[f32; 4]; 4],
        pub view: [[f32; 4]; 4],
        pub proj: [[f32; 4]; 4],
    }

    pub struct GpuMesh {
        pub vertices: Subbuffer<[CpuVertex]>,
        pub indices: Subbuffer<[u32]>,
        pub index_count: u32,
    }

    pub struct GpuTexture {
        pub view: Arc<ImageView>,
    }

    pub struct VulkanoState {
        pub context: VulkanoContext,
        pub window: Arc<Window>,
        #[allow(dead_code)]
        pub surface: Arc<Surface>,
        pub swapchain: Arc<Swapchain>,
        pub swapchain_views: Vec<Arc<ImageView>>,
        pub depth_view: Arc<ImageView>,
        pub render_pass: Arc<RenderPass>,
        pub framebuffers: Vec<Arc<Framebuffer>>,

        pub command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
        pub descriptor_set_allocator: Arc<StandardDescriptorSetAllocator>,

        pub meshes: HashMap<MeshHandle, GpuMesh>,
        pub textures: HashMap<TextureHandle, GpuTexture>,
        pub sampler: Arc<Sampler>,
        pub default_white_texture: TextureHandle,

        pub pipeline: Arc<GraphicsPipeline>,

        pub window_resized: bool,
        pub recreate_swapchain: bool,
        pub previous_frame_end: Option<Box<dyn GpuFuture>>,
    }

    impl VulkanoState {
        pub fn new(window: Arc<Window>) -> Result<Self, Box<dyn std::error::Error>> {
            let context = VulkanoContext::new(VulkanoConfig::default());
            let device = context.device().clone();

            let surface = Surface::from_window(device.instance().clone(), window.clone())?;

            let surface_capabilities = device
                .physical_device()
                .surface_capabilities(&surface, Default::default())?;
            let image_format = device
                .physical_device()
                .surface_formats(&surface, Default::default())?
                .first()
                .ok_or("no supported surface formats")?
                .0;

            let mut min_image_count = 2u32.max(surface_capabilities.min_image_count);
            if let Some(max_image_count) = surface_capabilities.max_image_count {
                min_image_count = min_image_count.min(max_image_count);
            }

            let (swapchain, images) = Swapchain::new(
                device.clone(),
                surface.clone(),
                SwapchainCreateInfo {
                    min_image_count,
                    image_format,
                    image_extent: window.inner_size().into(),
                    image_usage: ImageUsage::COLOR_ATTACHMENT,
                    composite_alpha: surface_capabilities
                        .supported_composite_alpha
                        .into_iter()
                        .next()
                        .ok_or("no supported composite alpha")?,
                    ..Default::default()
                },
            )?;

            let swapchain_views = images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

            let depth_view = Self::create_depth_view(&context, swapchain.image_extent())?;

            let render_pass = vulkano::single_pass_renderpass!(
                device.clone(),
                attachments: {
                    color: {
                        format: swapchain.image_format(),
                        samples: 1,
                        load_op: Clear,
                        store_op: Store,
                    },
                    depth: {
                        format: DEPTH_FORMAT,
                        samples: 1,
                        load_op: Clear,
                        store_op: DontCare,
                    },
                },
                pass: {
                    color: [color],
                    depth_stencil: {depth},
                }
            )?;

            let framebuffers =
                Self::create_framebuffers(&render_pass, &swapchain_views, &depth_view)?;

            let vs = mesh_vs::load(device.clone())?;
            let fs = mesh_fs::load(device.clone())?;

            let stages = vec![
                PipelineShaderStageCreateInfo::new(
                    vs.entry_point("main").ok_or("missing mesh.vert entry point")?,
                ),
                PipelineShaderStageCreateInfo::new(
                    fs.entry_point("main").ok_or("missing mesh.frag entry point")?,
                ),
            ];

            let layout = PipelineLayout::new(
                device.clone(),
                PipelineDescriptorSetLayoutCreateInfo::from_stages(&stages)
                    .into_pipeline_layout_create_info(device.clone())?,
            )?;

            // Position + UV are consumed by the shader; the normal occupies
            // the tail of the stride without an attribute of its own.
            let vertex_input_state = VertexInputState::new()
                .binding(
                    0,
                    VertexInputBindingDescription {
                        stride: size_of::<CpuVertex>() as u32,
                        input_rate: VertexInputRate::Vertex,
                        ..Default::default()
                    },
                )
                .attribute(
                    0,
                    VertexInputAttributeDescription {
                        binding: 0,
                        format: Format::R32G32B32_SFLOAT,
                        offset: 0,
                        ..Default::default()
                    },
                )
                .attribute(
                    1,
                    VertexInputAttributeDescription {
                        binding: 0,
                        format: Format::R32G32_SFLOAT,
                        offset: 12,
                        ..Default::default()
                    },
                );

            let subpass = Subpass::from(render_pass.clone(), 0).ok_or("missing subpass 0")?;
            let mut pipeline_ci =
                vulkano::pipeline::graphics::GraphicsPipelineCreateInfo::layout(layout);
            pipeline_ci.stages = stages.into();
            pipeline_ci.vertex_input_state = Some(vertex_input_state);
            pipeline_ci.input_assembly_state = Some(InputAssemblyState::default());
            pipeline_ci.viewport_state = Some(ViewportState::default());
            pipeline_ci.rasterization_state = Some(RasterizationState::default());
            pipeline_ci.multisample_state = Some(MultisampleState::default());
            pipeline_ci.depth_stencil_state = Some(DepthStencilState {
                depth: Some(DepthState::simple()),
                ..Default::default()
            });
            // Opaque draw, like the original GL path: one attachment, no blend.
            pipeline_ci.color_blend_state = Some(ColorBlendState::with_attachment_states(
                1,
                ColorBlendAttachmentState::default(),
            ));
            pipeline_ci.dynamic_state = [DynamicState::Viewport, DynamicState::Scissor]
                .into_iter()
                .collect();
            pipeline_ci.subpass = Some(PipelineSubpassType::BeginRenderPass(subpass));

            let pipeline = GraphicsPipeline::new(device.clone(), None, pipeline_ci)?;

            let command_buffer_allocator = Arc::new(StandardCommandBufferAllocator::new(
                device.clone(),
                Default::default(),
            ));
            let descriptor_set_allocator = Arc::new(StandardDescriptorSetAllocator::new(
                device.clone(),
                Default::default(),
            ));

            let sampler = Sampler::new(
                device.clone(),
                SamplerCreateInfo {
                    mag_filter: Filter::Linear,
                    min_filter: Filter::Linear,
                    address_mode: [SamplerAddressMode::ClampToEdge; 3],
                    ..Default::default()
                },
            )?;

            let mut state = Self {
                context,
                window,
                surface,
                swapchain,
                swapchain_views,
                depth_view,
                render_pass,
                framebuffers,

                command_buffer_allocator,
                descriptor_set_allocator,

                meshes: HashMap::new(),
                textures: HashMap::new(),
                sampler,
                default_white_texture: TextureHandle(0),

                pipeline,

                window_resized: false,
                recreate_swapchain: false,
                previous_frame_end: Some(sync::now(device).boxed()),
            };

            // 1x1 white so an untextured mesh still binds a sampler.
            state.upload_texture_rgba8(TextureHandle(0), &[255, 255, 255, 255], 1, 1)?;

            Ok(state)
        }

        fn create_depth_view(
            context: &VulkanoContext,
            extent: [u32; 2],
        ) -> Result<Arc<ImageView>, Box<dyn std::error::Error>> {
            let image = Image::new(
                context.memory_allocator().clone(),
                ImageCreateInfo {
                    image_type: ImageType::Dim2d,
                    format: DEPTH_FORMAT,
                    extent: [extent[0], extent[1], 1],
                    usage: ImageUsage::DEPTH_STENCIL_ATTACHMENT,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
            )?;

            Ok(ImageView::new_default(image)?)
        }

        fn create_framebuffers(
            render_pass: &Arc<RenderPass>,
            swapchain_views: &[Arc<ImageView>],
            depth_view: &Arc<ImageView>,
        ) -> Result<Vec<Arc<Framebuffer>>, Box<dyn std::error::Error>> {
            swapchain_views
                .iter()
                .map(|view| {
                    Framebuffer::new(
                        render_pass.clone(),
                        FramebufferCreateInfo {
                            attachments: vec![view.clone(), depth_view.clone()],
                            ..Default::default()
                        },
                    )
                    .map_err(|e| e.into())
                })
                .collect()
        }

        fn recreate_swapchain_if_needed(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            if !(self.window_resized || self.recreate_swapchain) {
                return Ok(());
            }

            self.recreate_swapchain = false;
            let new_dimensions = self.window.inner_size();
            if new_dimensions.width == 0 || new_dimensions.height == 0 {
                // Minimized; keep the old swapchain until a real size shows up.
                return Ok(());
            }

            let (new_swapchain, new_images) = match self.swapchain.recreate(SwapchainCreateInfo {
                image_extent: new_dimensions.into(),
                ..self.swapchain.create_info()
            }) {
                Ok(r) => r,
                Err(e) => {
                    self.recreate_swapchain = true;
                    warn!("failed to recreate swapchain: {}", Validated::unwrap(e));
                    return Ok(());
                }
            };

            self.swapchain = new_swapchain;
            self.swapchain_views = new_images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

            self.depth_view = Self::create_depth_view(&self.context, self.swapchain.image_extent())?;
            self.framebuffers =
                Self::create_framebuffers(&self.render_pass, &self.swapchain_views, &self.depth_view)?;

            self.window_resized = false;
            Ok(())
        }

        pub fn draw_frame(&mut self, frame: &FrameContext) -> Result<(), Box<dyn std::error::Error>> {
            self.recreate_swapchain_if_needed()?;

            let device = self.context.device().clone();
            let queue = self.context.graphics_queue().clone();

            if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
                previous_frame_end.cleanup_finished();
            }

            let (image_i, suboptimal, acquire_future) =
                match swapchain::acquire_next_image(self.swapchain.clone(), None)
                    .map_err(Validated::unwrap)
                {
                    Ok(r) => r,
                    Err(VulkanError::OutOfDate) => {
                        self.recreate_swapchain = true;
                        return Ok(());
                    }
                    Err(e) => return Err(Box::new(e)),
                };

            if suboptimal {
                self.recreate_swapchain = true;
            }

            let mesh = self
                .meshes
                .get(&frame.mesh)
                .ok_or("unknown mesh handle")?;
            let texture_handle = frame.texture.unwrap_or(self.default_white_texture);
            let texture = self
                .textures
                .get(&texture_handle)
                .ok_or("unknown texture handle")?;

            let transforms = TransformsUbo {
                model: frame.model,
                view: frame.view,
                proj: frame.proj,
            };

            let transforms_buffer: Subbuffer<TransformsUbo> = Buffer::from_data(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::UNIFORM_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                transforms,
            )?;

            let set_layout = self
                .pipeline
                .layout()
                .set_layouts()
                .first()
                .ok_or("pipeline has no descriptor set layouts")?
                .clone();

            let descriptor_set = DescriptorSet::new(
                self.descriptor_set_allocator.clone(),
                set_layout,
                [
                    WriteDescriptorSet::buffer(0, transforms_buffer),
                    WriteDescriptorSet::image_view_sampler(
                        1,
                        texture.view.clone(),
                        self.sampler.clone(),
                    ),
                ],
                [],
            )?;

            let framebuffer = self.framebuffers[image_i as usize].clone();
            let mut render_pass_begin = RenderPassBeginInfo::framebuffer(framebuffer);
            render_pass_begin.clear_values = vec![
                Some(ClearValue::from([0.4f32, 0.1, 0.7, 1.0])),
                Some(ClearValue::Depth(1.0)),
            ];

            let extent = self.swapchain.image_extent();
            let viewport = Viewport {
                offset: [0.0, 0.0],
                extent: [extent[0] as f32, extent[1] as f32],
                depth_range: 0.0..=1.0,
                ..Default::default()
            };

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.begin_render_pass(render_pass_begin, SubpassBeginInfo::default())?;
            cbb.set_viewport(0, vec![viewport].into())?;
            cbb.set_scissor(
                0,
                vec![Scissor {
                    offset: [0, 0],
                    extent: [extent[0], extent[1]],
                    ..Default::default()
                }]
                .into(),
            )?;

            cbb.bind_pipeline_graphics(self.pipeline.clone())?;
            cbb.bind_descriptor_sets(
                PipelineBindPoint::Graphics,
                self.pipeline.layout().clone(),
                0,
                descriptor_set,
            )?;
            cbb.bind_vertex_buffers(0, mesh.vertices.clone())?;
            cbb.bind_index_buffer(mesh.indices.clone())?;

            let index_count = mesh.index_count;
            unsafe {
                cbb.draw_indexed(index_count, 1, 0, 0, 0)?;
            }

            cbb.end_render_pass(SubpassEndInfo::default())?;

            let cb = cbb.build()?;

            let start_future: Box<dyn GpuFuture> = self
                .previous_frame_end
                .take()
                .unwrap_or_else(|| sync::now(device.clone()).boxed());

            let execution = start_future
                .join(acquire_future)
                .then_execute(queue.clone(), cb)?
                .then_swapchain_present(
                    queue.clone(),
                    SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_i),
                )
                .then_signal_fence_and_flush();

            match execution.map_err(Validated::unwrap) {
                Ok(future) => {
                    self.previous_frame_end = Some(future.boxed());
                }
                Err(VulkanError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
                Err(e) => {
                    warn!("failed to flush frame: {e}");
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
            }

            Ok(())
        }

        pub fn upload_mesh(
            &mut self,
            handle: MeshHandle,
            mesh: &CpuMesh,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.meshes.contains_key(&handle) {
                return Ok(());
            }

            if mesh.vertices.is_empty() {
                return Err("mesh has no vertices".into());
            }
            if mesh.indices.is_empty() {
                return Err("mesh has no indices".into());
            }

            let memory_allocator = self.context.memory_allocator().clone();
            let queue = self.context.graphics_queue().clone();

            // Host-visible staging buffers.
            let vertices_src = Buffer::from_iter(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::TRANSFER_SRC,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                mesh.vertices.iter().copied(),
            )?;

            let indices_src = Buffer::from_iter(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::TRANSFER_SRC,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                mesh.indices.iter().copied(),
            )?;

            // Device-local destinations.
            let vertices_dst = Buffer::new_slice::<CpuVertex>(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::VERTEX_BUFFER | BufferUsage::TRANSFER_DST,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
                mesh.vertices.len() as DeviceSize,
            )?;

            let indices_dst = Buffer::new_slice::<u32>(
                memory_allocator,
                BufferCreateInfo {
                    usage: BufferUsage::INDEX_BUFFER | BufferUsage::TRANSFER_DST,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
                mesh.indices.len() as DeviceSize,
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.copy_buffer(CopyBufferInfo::buffers(vertices_src, vertices_dst.clone()))?;
            cbb.copy_buffer(CopyBufferInfo::buffers(indices_src, indices_dst.clone()))?;

            let cb = cbb.build()?;
            cb.execute(queue)?
                .then_signal_fence_and_flush()?
                .wait(None)?;

            self.meshes.insert(
                handle,
                GpuMesh {
                    vertices: vertices_dst,
                    indices: indices_dst,
                    index_count: mesh.index_count(),
                },
            );

            Ok(())
        }

        pub fn upload_texture_rgba8(
            &mut self,
            handle: TextureHandle,
            rgba: &[u8],
            width: u32,
            height: u32,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.textures.contains_key(&handle) {
                return Ok(());
            }

            if width == 0 || height == 0 {
                return Err("texture has zero size".into());
            }

            let expected_len = width as usize * height as usize * 4;
            if rgba.len() != expected_len {
                return Err(format!(
                    "texture rgba length mismatch: got={}, expected={}",
                    rgba.len(),
                    expected_len
                )
                .into());
            }

            let memory_allocator = self.context.memory_allocator().clone();
            let queue = self.context.graphics_queue().clone();

            let staging = Buffer::from_iter(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::TRANSFER_SRC,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                rgba.iter().copied(),
            )?;

            let image = Image::new(
                memory_allocator,
                ImageCreateInfo {
                    image_type: ImageType::Dim2d,
                    format: Format::R8G8B8A8_UNORM,
                    extent: [width, height, 1],
                    usage: ImageUsage::TRANSFER_DST | ImageUsage::SAMPLED,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.copy_buffer_to_image(CopyBufferToImageInfo::buffer_image(staging, image.clone()))?;

            let cb = cbb.build()?;
            cb.execute(queue)?
                .then_signal_fence_and_flush()?
                .wait(None)?;

            let view = ImageView::new_default(image)?;
            self.textures.insert(handle, GpuTexture { view });

            Ok(())
        }
    }
}

/// Renderer facade: owns the backend once a window exists and hands out
/// mesh/texture handles.
pub struct Renderer {
    backend: Option<vulkano_backend::VulkanoState>,
    next_mesh_handle: u32,
    next_texture_handle: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            backend: None,
            next_mesh_handle: 0,
            // Handle 0 is the backend's default white texture.
            next_texture_handle: 1,
        }
    }

    pub fn init_for_window(&mut self, window: &Arc<Window>) -> EngineResult<()> {
        if self.backend.is_none() {
            let state =
                vulkano_backend::VulkanoState::new(window.clone()).map_err(renderer_error)?;
            self.backend = Some(state);
            log::info!("renderer initialized: swapchain and mesh pipeline ready");
        }

        Ok(())
    }

    pub fn resize(&mut self, _size: winit::dpi::PhysicalSize<u32>) {
        if let Some(backend) = self.backend.as_mut() {
            backend.window_resized = true;
        }
    }

    pub fn upload_mesh(&mut self, mesh: &CpuMesh) -> EngineResult<MeshHandle> {
        let backend = self.backend.as_mut().ok_or_else(uninitialized)?;

        let handle = MeshHandle(self.next_mesh_handle);
        self.next_mesh_handle = self.next_mesh_handle.wrapping_add(1);

        backend.upload_mesh(handle, mesh).map_err(renderer_error)?;
        Ok(handle)
    }

    pub fn upload_texture_rgba8(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> EngineResult<TextureHandle> {
        let backend = self.backend.as_mut().ok_or_else(uninitialized)?;

        let handle = TextureHandle(self.next_texture_handle);
        self.next_texture_handle = self.next_texture_handle.wrapping_add(1);

        backend
            .upload_texture_rgba8(handle, rgba, width, height)
            .map_err(renderer_error)?;
        Ok(handle)
    }

    pub fn draw_frame(&mut self, frame: &FrameContext) -> EngineResult<()> {
        let backend = self.backend.as_mut().ok_or_else(uninitialized)?;
        backend.draw_frame(frame).map_err(renderer_error)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn uninitialized() -> EngineError {
    EngineError::Renderer("renderer not initialized (call init_for_window first)".into())
}

fn renderer_error(e: Box<dyn std::error::Error>) -> EngineError {
    EngineError::Renderer(e.to_string())
}
