//! Play command - live animation in a window
//!
//! Rasterizes on the CPU into a `PixelCanvas` and presents each frame through
//! the wgpu blit pass. Frame requests map onto `Window::request_redraw`.

use super::load_config;
use anyhow::Result;
use plexus_core::{Canvas, FieldConfig, SurfaceMetrics};
use plexus_render::{FramePresenter, PixelCanvas, RenderContext};
use plexus_runtime::{FrameHandle, FrameHost, ParticleBackground, ResizeSource, ResizeSubscription};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const FPS_LOG_INTERVAL: Duration = Duration::from_secs(2);

pub struct PlayArgs {
    pub width: u32,
    pub height: u32,
    pub dark: bool,
    pub fullscreen: bool,
    pub config: Option<String>,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    println!("Controls:");
    println!("  D        - Toggle dark mode");
    println!("  Escape   - Exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = PlayerApp::new(config, args);
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// Frame and resize primitives backed by a winit window.
///
/// A granted frame request is a pending redraw; the next `RedrawRequested`
/// delivers it.
struct WinitHost {
    window: Arc<Window>,
    next_id: u64,
    pending: Option<FrameHandle>,
    subscription: Option<ResizeSubscription>,
}

impl WinitHost {
    fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 1,
            pending: None,
            subscription: None,
        }
    }

    fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl FrameHost for WinitHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle::new(self.next_id());
        self.pending = Some(handle);
        self.window.request_redraw();
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

impl ResizeSource for WinitHost {
    fn subscribe_resize(&mut self) -> Option<ResizeSubscription> {
        let subscription = ResizeSubscription::new(self.next_id());
        self.subscription = Some(subscription);
        Some(subscription)
    }

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription) {
        if self.subscription == Some(subscription) {
            self.subscription = None;
        }
    }
}

struct PlayerApp {
    config: FieldConfig,
    args: PlayArgs,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    presenter: Option<FramePresenter>,
    background: Option<ParticleBackground<PixelCanvas, WinitHost>>,
    last_fps_log: Instant,
}

impl PlayerApp {
    fn new(config: FieldConfig, args: PlayArgs) -> Self {
        Self {
            config,
            args,
            window: None,
            render_context: None,
            presenter: None,
            background: None,
            last_fps_log: Instant::now(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Plexus")
            .with_inner_size(LogicalSize::new(self.args.width, self.args.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);
        if self.args.fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let render_context = pollster::block_on(RenderContext::new(window.clone()))?;
        let presenter = FramePresenter::new(&render_context.device, render_context.format());

        let background = ParticleBackground::mount(
            Some(PixelCanvas::new(1, 1)),
            WinitHost::new(window.clone()),
            surface_metrics(&window, window.inner_size())?,
            self.args.dark,
            self.config.clone(),
        )?;
        log::info!(
            "[play] {} particles, mode {:?}",
            background.stats().particles,
            background.mode()
        );

        self.window = Some(window);
        self.render_context = Some(render_context);
        self.presenter = Some(presenter);
        self.background = Some(background);
        Ok(())
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(context) = &mut self.render_context {
            context.resize(new_size.width, new_size.height);
        }
        let (Some(window), Some(background)) = (&self.window, &mut self.background) else {
            return;
        };
        if !background.host().is_subscribed() || new_size.width == 0 || new_size.height == 0 {
            return;
        }
        let result = surface_metrics(window, new_size).and_then(|m| Ok(background.resize(m)?));
        if let Err(e) = result {
            log::error!("[play] resize failed: {e:#}");
        }
    }

    fn redraw(&mut self) {
        let Some(background) = &mut self.background else {
            return;
        };
        if let Some(handle) = background.host_mut().take_pending() {
            background.on_frame(handle);
        }

        let (Some(context), Some(presenter)) = (&mut self.render_context, &mut self.presenter)
        else {
            return;
        };
        let Some(canvas) = background.canvas() else {
            return;
        };
        let Some(palette) = background.palette() else {
            return;
        };

        let (width, height) = canvas.backing_size();
        if let Err(e) = presenter.upload(
            &context.device,
            &context.queue,
            width,
            height,
            canvas.pixels(),
        ) {
            log::error!("[play] upload failed: {e}");
            return;
        }
        if let Err(e) = presenter.render(context, palette.backdrop) {
            log::error!("[play] present failed: {e}");
        }

        if self.last_fps_log.elapsed() >= FPS_LOG_INTERVAL {
            self.last_fps_log = Instant::now();
            let stats = background.stats();
            log::info!(
                "[play] {:.1} fps, {} particles, {} edges",
                stats.fps,
                stats.particles,
                stats.edges_last_frame
            );
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(background) = &mut self.background {
            background.unmount();
        }
        event_loop.exit();
    }
}

/// Logical metrics for a physical window size
fn surface_metrics(window: &Window, size: PhysicalSize<u32>) -> Result<SurfaceMetrics> {
    let dpr = window.scale_factor();
    let logical: LogicalSize<f64> = size.to_logical(dpr);
    Ok(SurfaceMetrics::new(
        logical.width as f32,
        logical.height as f32,
        dpr as f32,
    )?)
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            log::error!("[play] failed to start: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => self.handle_resize(new_size),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => self.shutdown(event_loop),
                    PhysicalKey::Code(KeyCode::KeyD) => {
                        if let Some(background) = &mut self.background {
                            let dark = !background.is_dark();
                            background.set_dark_mode(dark);
                            println!("Theme: {}", if dark { "dark" } else { "light" });
                            // Static backgrounds only repaint on request
                            if let Some(window) = &self.window {
                                window.request_redraw();
                            }
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }
}
