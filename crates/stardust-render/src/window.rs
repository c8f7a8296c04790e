//! Interactive preview window
//!
//! Hosts the frame loop: one redraw per visible frame, camera input, and
//! keyboard parameter editing. Holding an adjustment key streams live
//! updates (the readout moves, nothing regenerates); releasing it issues
//! the single commit that regenerates the cloud. This is the drag-then-
//! release shape of a panel slider, mapped onto key repeat.

use crate::camera::OrbitCamera;
use crate::cloud::CloudRenderer;
use crate::init::init_with_surface;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stardust_cloud::FrameClock;
use stardust_core::params::GenerationParameters;
use stardust_engine::{ControlKey, ControlSpec, ControlValue, Engine, controls};
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

#[cfg(feature = "preset-watcher")]
use stardust_engine::{PresetWatcher, WatchEvent, preset};

/// Configuration for the preview window
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            title: "Stardust Preview".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Input state for camera control
#[derive(Debug, Default)]
struct InputState {
    mouse_left: bool,
    mouse_right: bool,
    mouse_middle: bool,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    shift_held: bool,
}

/// Application state for the preview window
struct PreviewApp<'a> {
    config: PreviewConfig,
    initial_params: GenerationParameters,
    seed: Option<u64>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'a>>,
    surface_config: Option<wgpu::SurfaceConfiguration>,
    engine: Option<Engine<CloudRenderer>>,
    camera: OrbitCamera,
    input: InputState,
    clock: FrameClock,
    /// Adjustment key currently held; committed on release
    pending_commit: Option<ControlKey>,
    #[cfg(feature = "preset-watcher")]
    watcher: Option<PresetWatcher>,
    instance: wgpu::Instance,
}

impl PreviewApp<'_> {
    fn new(
        config: PreviewConfig,
        params: GenerationParameters,
        seed: Option<u64>,
        watch_preset: Option<PathBuf>,
    ) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        #[cfg(feature = "preset-watcher")]
        let watcher = watch_preset.as_deref().and_then(|path| {
            match PresetWatcher::new(path, None) {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!("Preset watching disabled: {e}");
                    None
                }
            }
        });

        #[cfg(not(feature = "preset-watcher"))]
        if watch_preset.is_some() {
            tracing::warn!("Built without the preset-watcher feature; --watch ignored");
        }

        Self {
            config,
            initial_params: params,
            seed,
            window: None,
            surface: None,
            surface_config: None,
            engine: None,
            camera: OrbitCamera::default(),
            input: InputState::default(),
            clock: FrameClock::new(),
            pending_commit: None,
            #[cfg(feature = "preset-watcher")]
            watcher,
            instance,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            if let (Some(config), Some(surface), Some(engine)) =
                (&mut self.surface_config, &self.surface, &self.engine)
            {
                config.width = new_size.width;
                config.height = new_size.height;
                surface.configure(engine.backend().device(), config);

                self.camera.aspect = new_size.width as f32 / new_size.height as f32;
            }
        }
    }

    fn handle_mouse_motion(&mut self, position: PhysicalPosition<f64>) {
        if let Some(last_pos) = self.input.last_mouse_pos {
            let dx = (position.x - last_pos.x) as f32 * 0.005;
            let dy = (position.y - last_pos.y) as f32 * 0.005;

            if self.input.mouse_left && self.input.shift_held || self.input.mouse_right {
                self.camera.pan(-dx * 2.0, dy * 2.0);
            } else if self.input.mouse_left {
                self.camera.orbit(dx, dy);
            } else if self.input.mouse_middle {
                self.camera.zoom(dy * 2.0);
            }
        }
        self.input.last_mouse_pos = Some(position);
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
        };
        self.camera.zoom(scroll * 0.5);
    }

    /// Apply a live step to an adjustment key; the commit happens on release
    fn adjust_live(&mut self, key: ControlKey, step: f64) {
        let Some(engine) = &mut self.engine else {
            return;
        };

        // Commit an earlier pending key before starting a new drag
        if let Some(pending) = self.pending_commit.take()
            && pending != key
        {
            let value = engine.live_value(pending);
            if let Err(e) = engine.commit(pending, value) {
                tracing::warn!("Commit failed: {e}");
            }
        }

        let ControlValue::Number(current) = engine.live_value(key) else {
            return;
        };
        let next = clamp_to_bounds(key, current + step);

        if let Err(e) = engine.set_live(key, ControlValue::Number(next)) {
            tracing::warn!("Live update failed: {e}");
            return;
        }
        self.pending_commit = Some(key);

        if let Some(window) = &self.window {
            window.set_title(&format!("{} | {}", self.config.title, readout(engine)));
        }
    }

    /// Commit the held adjustment, regenerating the cloud once
    fn commit_pending(&mut self, key: ControlKey) {
        if self.pending_commit != Some(key) {
            return;
        }
        self.pending_commit = None;

        let Some(engine) = &mut self.engine else {
            return;
        };
        let value = engine.live_value(key);
        if let Err(e) = engine.commit(key, value) {
            tracing::warn!("Commit failed: {e}");
        }
    }

    /// Re-roll the cloud with the current parameters
    fn reroll(&mut self) {
        if let Some(engine) = &mut self.engine
            && let Err(e) = engine.regenerate()
        {
            tracing::warn!("Regeneration failed: {e}");
        }
    }

    #[cfg(feature = "preset-watcher")]
    fn poll_preset(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };

        let events = watcher.drain_events();
        if events.is_empty() {
            return;
        }

        let modified = events
            .iter()
            .any(|e| matches!(e, WatchEvent::Modified(_)));
        for event in &events {
            if let WatchEvent::Error(msg) = event {
                tracing::warn!("Preset watch error: {msg}");
            }
        }
        if !modified {
            return;
        }

        // One debounced save, one commit
        let path = watcher.path().to_path_buf();
        match preset::load(&path) {
            Ok(params) => {
                if let Some(engine) = &mut self.engine {
                    tracing::info!("Reloading preset: {}", path.display());
                    if let Err(e) = engine.commit_parameters(params) {
                        tracing::warn!("Preset commit failed: {e}");
                    }
                }
            }
            Err(e) => tracing::warn!("Ignoring unreadable preset: {e}"),
        }
    }

    fn render(&mut self) {
        let (Some(surface), Some(engine), Some(config)) =
            (&self.surface, &self.engine, &self.surface_config)
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(engine.backend().device(), config);
                return;
            }
            Err(e) => {
                eprintln!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        engine.backend().update_uniforms(
            &self.camera,
            [config.width as f32, config.height as f32],
            engine.material(),
            self.clock.elapsed(),
        );
        engine.backend().render(&view, engine.cloud());

        output.present();
    }
}

impl ApplicationHandler for PreviewApp<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let surface = match self.instance.create_surface(window.clone()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to create surface: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (device, queue, format) =
            match pollster::block_on(init_with_surface(&self.instance, &surface)) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to initialize GPU: {}", e);
                    event_loop.exit();
                    return;
                }
            };

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let renderer = CloudRenderer::new(device, queue, format);
        let mut engine = Engine::with_parameters(renderer, self.initial_params.clone());

        let background = engine.material().background;
        engine.backend_mut().set_background(background);

        // Initial generation; on failure the window stays up with an empty
        // scene and the error goes to the log
        let initial = match self.seed {
            Some(seed) => engine.regenerate_with(&mut StdRng::seed_from_u64(seed)),
            None => engine.regenerate(),
        };
        if let Err(e) = initial {
            tracing::error!("Initial generation failed: {e}");
        }

        self.camera.aspect = size.width as f32 / size.height as f32;
        self.clock.reset();

        self.window = Some(window);
        self.surface = Some(surface);
        self.surface_config = Some(surface_config);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(engine) = &mut self.engine {
                    engine.teardown();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.input.mouse_left = pressed,
                    MouseButton::Right => self.input.mouse_right = pressed,
                    MouseButton::Middle => self.input.mouse_middle = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_mouse_motion(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_scroll(delta);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.shift_held = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((key, step)) = adjustment_for(&event.logical_key) {
                    match event.state {
                        ElementState::Pressed => self.adjust_live(key, step),
                        ElementState::Released => self.commit_pending(key),
                    }
                    return;
                }

                if event.state == ElementState::Pressed {
                    match event.logical_key {
                        Key::Named(NamedKey::Escape) => {
                            if let Some(engine) = &mut self.engine {
                                engine.teardown();
                            }
                            event_loop.exit();
                        }
                        Key::Named(NamedKey::Space) => {
                            self.reroll();
                        }
                        Key::Character(ref c) if c == "r" || c == "R" => {
                            self.camera.reset();
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(feature = "preset-watcher")]
        self.poll_preset();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Map a key to the control it adjusts and the per-repeat step
fn adjustment_for(key: &Key) -> Option<(ControlKey, f64)> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some((ControlKey::Count, 5_000.0)),
        Key::Named(NamedKey::ArrowDown) => Some((ControlKey::Count, -5_000.0)),
        Key::Named(NamedKey::ArrowRight) => Some((ControlKey::Radius, 0.1)),
        Key::Named(NamedKey::ArrowLeft) => Some((ControlKey::Radius, -0.1)),
        Key::Character(c) if c == "]" => Some((ControlKey::Branches, 1.0)),
        Key::Character(c) if c == "[" => Some((ControlKey::Branches, -1.0)),
        Key::Character(c) if c == "." => Some((ControlKey::Randomness, 0.02)),
        Key::Character(c) if c == "," => Some((ControlKey::Randomness, -0.02)),
        Key::Character(c) if c == "'" => Some((ControlKey::RandomnessPower, 0.1)),
        Key::Character(c) if c == ";" => Some((ControlKey::RandomnessPower, -0.1)),
        _ => None,
    }
}

/// Clamp a panel value to the bounds registered for its control
fn clamp_to_bounds(key: ControlKey, value: f64) -> f64 {
    for spec in controls() {
        if let ControlSpec::Number { key: k, min, max, .. } = spec
            && *k == key
        {
            return value.clamp(*min, *max);
        }
    }
    value
}

/// Short parameter readout for the title bar
fn readout(engine: &Engine<CloudRenderer>) -> String {
    let p = engine.parameters();
    format!(
        "count {} | radius {:.2} | branches {} | randomness {:.2} | power {:.1}",
        p.count, p.radius, p.branches, p.randomness, p.randomness_power
    )
}

/// Run the preview window, blocking until it closes
pub fn run_preview(
    config: PreviewConfig,
    params: GenerationParameters,
    seed: Option<u64>,
    watch_preset: Option<PathBuf>,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PreviewApp::new(config, params, seed, watch_preset);
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// Preview controls help text
pub fn controls_help() -> &'static str {
    r#"
Preview Controls:
  Left Mouse Drag   - Orbit camera around the galaxy
  Right Mouse Drag  - Pan camera
  Scroll Wheel      - Zoom camera
  Up / Down         - Point count (hold to sweep, release to regenerate)
  Left / Right      - Radius
  [ / ]             - Branches
  , / .             - Randomness
  ; / '             - Randomness power
  Space             - Re-roll with the current parameters
  R                 - Reset camera
  Escape            - Close preview
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_mapping_covers_numeric_controls() {
        let up = adjustment_for(&Key::Named(NamedKey::ArrowUp));
        assert_eq!(up, Some((ControlKey::Count, 5_000.0)));

        let close_bracket = adjustment_for(&Key::Character("]".into()));
        assert_eq!(close_bracket, Some((ControlKey::Branches, 1.0)));

        assert!(adjustment_for(&Key::Character("q".into())).is_none());
    }

    #[test]
    fn test_clamp_uses_panel_bounds() {
        // Count is registered with min 100
        assert_eq!(clamp_to_bounds(ControlKey::Count, -500.0), 100.0);
        assert_eq!(clamp_to_bounds(ControlKey::Count, 2_000_000.0), 1_000_000.0);
        assert_eq!(clamp_to_bounds(ControlKey::Radius, 5.0), 5.0);
    }
}
