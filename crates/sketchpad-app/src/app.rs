//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use sketchpad_core::canvas::Canvas;
use sketchpad_core::input::{MouseButton as PointerButton, PointerEvent};
use sketchpad_core::persistence::{LoadOutcome, ScenePersistence};
use sketchpad_core::scene::Scene;
use sketchpad_core::storage::{self, KeyValueStore};
use sketchpad_render::{RenderContext, Renderer, VelloRenderer};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::shortcuts::ShortcutRegistry;
use crate::ui::{from_color32, render_ui, Notice, UiAction, UiState};

/// Environment variable overriding the native storage directory.
pub const DATA_DIR_ENV: &str = "SKETCHPAD_DATA_DIR";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Directory for saved drawings (native only). `None` uses the platform
    /// data directory.
    pub storage_dir: Option<std::path::PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Sketchpad".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::WHITE,
            storage_dir: std::env::var_os(DATA_DIR_ENV).map(Into::into),
        }
    }
}

/// Scene persistence over the platform's default store.
type Persistence = ScenePersistence<Box<dyn KeyValueStore>>;

/// Apply a UI or shortcut action to the canvas.
///
/// Returns whether the surface needs repainting.
fn apply_action<S: KeyValueStore>(
    action: UiAction,
    canvas: &mut Canvas,
    persistence: &ScenePersistence<S>,
    ui_state: &mut UiState,
) -> bool {
    if ui_state.is_blocked() && !action.allowed_while_blocked() {
        log::debug!("Ignoring {:?} while a notice is open", action);
        return false;
    }

    match action {
        UiAction::SetMode(mode) => {
            canvas.tools.set_mode(mode);
            false
        }
        UiAction::SetFillColor(color) => {
            canvas.tools.fill_color = from_color32(color);
            false
        }
        UiAction::SetStrokeColor(color) => {
            canvas.tools.stroke_color = from_color32(color);
            false
        }
        UiAction::SetStrokeWidth(width) => {
            canvas.tools.set_stroke_width(width as f64);
            false
        }
        UiAction::ToggleDash => {
            canvas.tools.toggle_dashed();
            false
        }
        UiAction::Save => {
            match persistence.save(&canvas.scene) {
                Ok(_) => ui_state.notice = Some(Notice::info("Drawing saved!")),
                Err(e) => {
                    log::error!("Save failed: {}", e);
                    ui_state.notice = Some(Notice::error(format!("Could not save drawing: {}", e)));
                }
            }
            false
        }
        UiAction::Load => {
            // A failed or empty load leaves the scene and any gesture alone.
            let mut loaded = Scene::new();
            match persistence.load(&mut loaded) {
                Ok(LoadOutcome::Loaded(_)) => {
                    canvas.replace_scene(loaded);
                    true
                }
                Ok(LoadOutcome::Missing) => false,
                Err(e) => {
                    log::error!("Load failed: {}", e);
                    ui_state.notice = Some(Notice::error(format!("Could not load drawing: {}", e)));
                    false
                }
            }
        }
        UiAction::Clear => {
            canvas.clear();
            log::info!("Cleared drawing");
            true
        }
        UiAction::CancelGesture => canvas.cancel_gesture(),
        UiAction::DismissNotice => {
            ui_state.notice = None;
            false
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    canvas: Canvas,
    persistence: Persistence,
    config: AppConfig,
    cursor_position: Point,
    modifiers: ModifiersState,
}

impl AppState {
    /// Apply an action and keep the panel in step with the canvas.
    fn apply(&mut self, action: UiAction) {
        if apply_action(action, &mut self.canvas, &self.persistence, &mut self.ui_state) {
            self.window.request_redraw();
        }
        self.ui_state
            .sync(&self.canvas.tools, self.canvas.scene.len());
    }

    /// Forward a pointer event to the canvas.
    fn pointer(&mut self, event: PointerEvent) {
        if self.canvas.handle_pointer_event(event) {
            self.ui_state.shape_count = self.canvas.scene.len();
            self.window.request_redraw();
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm (for compute shader compatibility)
        // but the surface format on WebGPU is typically Bgra8Unorm
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut canvas = Canvas::new();
        canvas.set_viewport_size(surface.config.width as f64, surface.config.height as f64);

        #[cfg(not(target_arch = "wasm32"))]
        let store = storage::create_default_storage(self.config.storage_dir.clone());
        #[cfg(target_arch = "wasm32")]
        let store = storage::create_default_storage();

        let ui_state = UiState::from_settings(&canvas.tools);

        log::info!(
            "Sketchpad initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!(
            "Keyboard shortcuts: {}",
            ShortcutRegistry::all()
                .iter()
                .map(|s| format!("{}={}", s.format(), s.description))
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            canvas,
            persistence: ScenePersistence::new(store),
            config: self.config.clone(),
            cursor_position: Point::ZERO,
            modifiers: ModifiersState::empty(),
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            let viewport_width = web_window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.width as f64);
            let viewport_height = web_window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.height as f64);

            let canvas = document
                .get_element_by_id("sketchpad-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let body = document.body()?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("sketchpad-canvas");
                    body.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            // Account for device pixel ratio for sharp rendering
            let dpr = web_window.device_pixel_ratio();
            let physical_width = (viewport_width * dpr) as u32;
            let physical_height = (viewport_height * dpr) as u32;

            canvas.set_width(physical_width);
            canvas.set_height(physical_height);
            let style = canvas.style();
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("top", "0");
            let _ = style.set_property("left", "0");

            log::info!(
                "Canvas created: {}x{} (physical: {}x{}, dpr: {})",
                viewport_width,
                viewport_height,
                physical_width,
                physical_height,
                dpr
            );

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // SAFETY: the surface borrows the window, which AppState keeps
            // alive alongside it for the rest of the program.
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, handle async initialization
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let size = window.inner_size();
                    let width = size.width.max(1);
                    let height = size.height.max(1);

                    // Get raw pointer to self for async callback
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");

                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                            .await
                        {
                            Ok(surface) => {
                                let surface: RenderSurface<'static> =
                                    unsafe { std::mem::transmute(surface) };

                                // SAFETY: WASM is single-threaded and the App
                                // is kept alive by the event loop
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                app.finish_init(window_clone, surface);
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                // Request redraw to keep the event loop running
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();
        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                state
                    .canvas
                    .set_viewport_size(size.width as f64, size.height as f64);

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = Point::new(position.x, position.y);
                state.cursor_position = point;

                // A gesture in progress keeps tracking even over the panel.
                if state.ui_state.is_blocked()
                    || (egui_wants_pointer && state.canvas.interaction.is_idle())
                {
                    return;
                }
                state.pointer(PointerEvent::Move { position: point });
            }

            WindowEvent::CursorLeft { .. } => {
                state.pointer(PointerEvent::Leave);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Right => PointerButton::Right,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                let position = state.cursor_position;

                match btn_state {
                    ElementState::Pressed => {
                        if egui_wants_pointer || state.ui_state.is_blocked() {
                            return;
                        }
                        state.pointer(PointerEvent::Down { position, button });
                    }
                    ElementState::Released => {
                        state.pointer(PointerEvent::Up { position, button });
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_keyboard || event.state != ElementState::Pressed || event.repeat {
                    return;
                }

                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                let notice_open = state.ui_state.is_blocked();
                if let Some(action) =
                    ShortcutRegistry::action_for(&event.logical_key, ctrl, notice_open)
                {
                    // Only Escape reaches the canvas while a notice is open.
                    if notice_open && action != UiAction::DismissNotice {
                        return;
                    }
                    state.apply(action);
                }
            }

            WindowEvent::RedrawRequested => {
                // Run egui and get any actions
                let egui_input = state.egui_state.take_egui_input(&state.window);
                let mut ui_action: Option<UiAction> = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    ui_action = render_ui(ctx, &mut state.ui_state);
                });
                if let Some(action) = ui_action {
                    state.apply(action);
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                // Build Vello scene
                let viewport_size = Size::new(
                    state.canvas.viewport_size.width,
                    state.canvas.viewport_size.height,
                );
                let render_ctx = RenderContext::new(&state.canvas, viewport_size)
                    .with_background(state.config.background_color);
                state.shape_renderer.build_scene(&render_ctx);
                let scene = state.shape_renderer.take_scene();

                // Render
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };

                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {:?}", e);
                        return;
                    }
                };

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let params = RenderParams {
                    base_color: state.config.background_color,
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Vello's compute shaders need StorageBinding, which WebGPU only
                // allows on Rgba8Unorm; the result is blitted to the surface.
                let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
                    label: Some("vello render texture"),
                    size: vello::wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: vello::wgpu::TextureDimension::D2,
                    format: vello::wgpu::TextureFormat::Rgba8Unorm,
                    usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                        | vello::wgpu::TextureUsages::COPY_SRC
                        | vello::wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                });

                let render_texture_view =
                    render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

                if let Err(e) = state.vello_renderer.render_to_texture(
                    device,
                    queue,
                    &scene,
                    &render_texture_view,
                    &params,
                ) {
                    log::error!("Failed to render: {:?}", e);
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                {
                    let mut blit_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("blit encoder"),
                        });
                    state.texture_blitter.copy(
                        device,
                        &mut blit_encoder,
                        &render_texture_view,
                        &surface_view,
                    );
                    queue.submit(std::iter::once(blit_encoder.finish()));
                }

                // Update egui textures
                for (id, image_delta) in &egui_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(device, queue, *id, image_delta);
                }

                // Render egui on top
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: egui_output.pixels_per_point,
                };

                {
                    let mut egui_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("egui encoder"),
                        });

                    state.egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut egui_encoder,
                        &egui_primitives,
                        &screen_descriptor,
                    );

                    let render_pass =
                        egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                            label: Some("egui render pass"),
                            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                                view: &surface_view,
                                resolve_target: None,
                                ops: vello::wgpu::Operations {
                                    load: vello::wgpu::LoadOp::Load, // Keep Vello content
                                    store: vello::wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                    // egui-wgpu requires a 'static render pass
                    let mut render_pass = render_pass.forget_lifetime();
                    state
                        .egui_renderer
                        .render(&mut render_pass, &egui_primitives, &screen_descriptor);
                    drop(render_pass);

                    queue.submit(std::iter::once(egui_encoder.finish()));
                }

                for id in &egui_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }
                surface_texture.present();

                if egui_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .is_some_and(|v| v.repaint_delay.is_zero())
                {
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
