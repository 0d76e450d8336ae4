//! The animated particle background as one owned resource
//!
//! `ParticleBackground` ties a canvas, a host and the simulation together:
//! mount sizes the surface, seeds the field and starts the scheduler; resize
//! is stop, resize, reseed, start; unmount cancels the pending frame,
//! unsubscribes from resize notifications and only then releases the canvas.

use crate::host::{FrameHandle, FrameHost, ResizeSource, ResizeSubscription};
use crate::scheduler::{AnimationScheduler, TickHandler};
use plexus_core::{Canvas, FieldConfig, Palette, PlexusError, Result, SurfaceMetrics, ThemeAdapter};
use plexus_particles::{ColorRef, ConnectionRenderer, ParticleSystem};
use plexus_render::CanvasSurfaceManager;
use serde::Serialize;

/// How the background is currently being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// No drawing context; nothing is painted
    Blank,
    /// Host primitives missing; painted once, not animated
    Static,
    /// Driven by host frame callbacks
    Animated,
}

/// Point-in-time summary for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct BackgroundStats {
    pub mode: BackgroundMode,
    pub mounted: bool,
    pub dark: bool,
    pub particles: usize,
    pub edges_last_frame: usize,
    pub ticks: u64,
    pub scheduler_generation: u64,
    pub resize_generation: u64,
    pub fps: f64,
}

/// Everything a tick touches
struct Scene<C: Canvas> {
    surface: CanvasSurfaceManager<C>,
    system: ParticleSystem,
    connections: ConnectionRenderer,
    theme: ThemeAdapter,
    is_dark: bool,
    last_edges: usize,
}

impl<C: Canvas> Scene<C> {
    fn palette(&self) -> Palette {
        self.theme.resolve(self.is_dark)
    }

    /// Regenerate the field for the current logical size
    fn reseed(&mut self) {
        if self.system.config().reseed_on_theme_change {
            self.system
                .set_color_ref(ColorRef::Fixed(self.palette().particle));
        }
        let (width, height) = self.surface.logical_size();
        self.system.seed(width, height);
    }

    /// One frame without motion
    fn paint_static(&mut self) {
        self.clear();
        self.draw_particles();
        self.draw_connections();
    }
}

impl<C: Canvas> TickHandler for Scene<C> {
    fn clear(&mut self) {
        self.surface.clear();
    }

    fn update(&mut self) {
        self.system.update();
    }

    fn draw_particles(&mut self) {
        let palette = self.palette();
        self.system.draw(self.surface.canvas_mut(), &palette);
    }

    fn draw_connections(&mut self) {
        let palette = self.palette();
        self.last_edges = self.connections.compute_and_draw(
            self.surface.canvas_mut(),
            self.system.particles(),
            &palette,
        );
    }
}

pub struct ParticleBackground<C, H>
where
    C: Canvas,
    H: FrameHost + ResizeSource,
{
    host: H,
    scene: Option<Scene<C>>,
    scheduler: AnimationScheduler,
    subscription: Option<ResizeSubscription>,
    mode: BackgroundMode,
    disposed: bool,
    resize_generation: u64,
}

impl<C, H> ParticleBackground<C, H>
where
    C: Canvas,
    H: FrameHost + ResizeSource,
{
    /// Size the surface, seed the field and start animating.
    ///
    /// A missing canvas yields a `Blank` background; a host without frame or
    /// resize primitives yields a `Static` one painted exactly once. Invalid
    /// metrics or configuration are returned as errors.
    pub fn mount(
        canvas: Option<C>,
        host: H,
        metrics: SurfaceMetrics,
        is_dark: bool,
        config: FieldConfig,
    ) -> Result<Self> {
        config.validate()?;
        metrics.validate()?;
        let theme = ThemeAdapter::from_overrides(&config.palette)?;

        let mut background = Self {
            host,
            scene: None,
            scheduler: AnimationScheduler::new(),
            subscription: None,
            mode: BackgroundMode::Blank,
            disposed: false,
            resize_generation: 0,
        };

        let Some(canvas) = canvas else {
            log::warn!("[background] no drawing context, leaving background blank");
            return Ok(background);
        };

        let mut surface = CanvasSurfaceManager::new(canvas);
        surface.resize(metrics)?;
        let mut scene = Scene {
            surface,
            connections: ConnectionRenderer::from_config(&config),
            system: ParticleSystem::new(config),
            theme,
            is_dark,
            last_edges: 0,
        };
        scene.reseed();

        background.subscription = background.host.subscribe_resize();
        background.mode = if background.subscription.is_none() {
            log::warn!("[background] resize notifications unavailable, painting once");
            scene.paint_static();
            BackgroundMode::Static
        } else {
            match background.scheduler.start(&mut background.host, &mut scene) {
                Ok(_) => BackgroundMode::Animated,
                Err(PlexusError::HostUnavailable(reason)) => {
                    log::warn!("[background] {reason}, painting once");
                    scene.paint_static();
                    BackgroundMode::Static
                }
                Err(e) => return Err(e),
            }
        };

        log::info!(
            "[background] mounted {}x{} @{}x with {} particles ({:?})",
            metrics.width,
            metrics.height,
            metrics.dpr,
            scene.system.len(),
            background.mode
        );
        background.scene = Some(scene);
        Ok(background)
    }

    /// Stop, resize the surface, reseed, start.
    ///
    /// Invalid metrics are rejected before anything is stopped. Ignored
    /// once unmounted or when blank.
    pub fn resize(&mut self, metrics: SurfaceMetrics) -> Result<()> {
        metrics.validate()?;
        if self.disposed {
            return Ok(());
        }
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };

        self.scheduler.stop(&mut self.host);
        scene.surface.resize(metrics)?;
        scene.reseed();
        self.resize_generation += 1;

        match self.mode {
            BackgroundMode::Animated => {
                if let Err(e) = self.scheduler.start(&mut self.host, scene) {
                    log::warn!("[background] restart after resize failed: {e}");
                    scene.paint_static();
                    self.mode = BackgroundMode::Static;
                }
            }
            BackgroundMode::Static => scene.paint_static(),
            BackgroundMode::Blank => {}
        }

        log::debug!(
            "[background] resize #{} to {}x{}, {} particles",
            self.resize_generation,
            metrics.width,
            metrics.height,
            scene.system.len()
        );
        Ok(())
    }

    /// Push a new dark-mode flag. Colors switch on the next paint; the field
    /// is reseeded only when `reseed_on_theme_change` is set.
    pub fn set_dark_mode(&mut self, is_dark: bool) {
        if self.disposed {
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if scene.is_dark == is_dark {
            return;
        }
        scene.is_dark = is_dark;
        if scene.system.config().reseed_on_theme_change {
            scene.reseed();
        }
        if self.mode == BackgroundMode::Static {
            scene.paint_static();
        }
        log::debug!("[background] dark mode {}", is_dark);
    }

    /// Host frame callback. Returns whether a tick ran.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.disposed {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let ticked = self.scheduler.on_frame(handle, &mut self.host, scene);
        if ticked && !self.scheduler.is_running() {
            self.mode = BackgroundMode::Static;
        }
        ticked
    }

    /// Cancel the pending frame, unsubscribe from resizes, then release the
    /// canvas. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.stop(&mut self.host);
        if let Some(subscription) = self.subscription.take() {
            self.host.unsubscribe_resize(subscription);
        }
        self.disposed = true;
        self.scene = None;
        log::info!(
            "[background] unmounted after {} ticks",
            self.scheduler.ticks()
        );
    }

    pub fn mode(&self) -> BackgroundMode {
        self.mode
    }

    pub fn is_mounted(&self) -> bool {
        !self.disposed
    }

    pub fn is_dark(&self) -> bool {
        self.scene.as_ref().is_some_and(|s| s.is_dark)
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn system(&self) -> Option<&ParticleSystem> {
        self.scene.as_ref().map(|s| &s.system)
    }

    pub fn canvas(&self) -> Option<&C> {
        self.scene.as_ref().map(|s| s.surface.canvas())
    }

    pub fn metrics(&self) -> Option<SurfaceMetrics> {
        self.scene.as_ref().and_then(|s| s.surface.metrics())
    }

    /// Palette in effect for the current dark-mode flag
    pub fn palette(&self) -> Option<Palette> {
        self.scene.as_ref().map(|s| s.palette())
    }

    pub fn resize_generation(&self) -> u64 {
        self.resize_generation
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn stats(&self) -> BackgroundStats {
        BackgroundStats {
            mode: self.mode,
            mounted: !self.disposed,
            dark: self.is_dark(),
            particles: self.system().map_or(0, |s| s.len()),
            edges_last_frame: self.scene.as_ref().map_or(0, |s| s.last_edges),
            ticks: self.scheduler.ticks(),
            scheduler_generation: self.scheduler.generation(),
            resize_generation: self.resize_generation,
            fps: self.scheduler.clock().fps(),
        }
    }
}

impl<C: Canvas> ParticleBackground<C, crate::host::ManualHost> {
    /// Deliver the oldest queued frame. Returns whether a tick ran.
    pub fn pump(&mut self) -> bool {
        match self.host.next_frame() {
            Some(handle) => self.on_frame(handle),
            None => false,
        }
    }

    /// Deliver up to `frames` queued frames, returning the ticks run
    pub fn pump_frames(&mut self, frames: usize) -> usize {
        (0..frames).filter(|_| self.pump()).count()
    }
}

impl<C, H> Drop for ParticleBackground<C, H>
where
    C: Canvas,
    H: FrameHost + ResizeSource,
{
    fn drop(&mut self) {
        self.unmount();
    }
}
