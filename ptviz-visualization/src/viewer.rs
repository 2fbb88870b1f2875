//! Interactive window for a plotting session
//!
//! Left drag orbits, right drag pans and the wheel zooms. `r` fits the view
//! to the scene again; `q` or Escape closes the window.

use crate::actor::Actor;
use crate::camera::Camera;
use crate::frame::FrameGeometry;
use crate::renderer::{FrameStatus, Renderer};
use crate::session::{Session, SessionStats};
use crate::surface::{HeadlessSurface, RenderSurface};
use log::{debug, error, info};
use ptviz_core::{Error, Result};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

const ORBIT_SPEED: f32 = 0.01;
const PAN_SPEED: f32 = 0.002;
const ZOOM_SPEED: f32 = 0.1;

/// Callback bound to a key press
pub type KeyAction = Box<dyn FnMut(&mut Session) -> Result<()>>;

/// Render surface backed by a window: a redraw request marks the scene
/// dirty and schedules a `RedrawRequested` event.
pub struct WindowSurface {
    window: Arc<Window>,
    dirty: Rc<Cell<bool>>,
    redraws: u64,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>, dirty: Rc<Cell<bool>>, redraws: u64) -> Self {
        Self {
            window,
            dirty,
            redraws,
        }
    }
}

impl RenderSurface for WindowSurface {
    fn request_redraw(&mut self, _actors: &[Actor]) -> Result<()> {
        self.redraws += 1;
        self.dirty.set(true);
        self.window.request_redraw();
        Ok(())
    }

    fn redraw_count(&self) -> u64 {
        self.redraws
    }
}

#[derive(Default)]
struct MouseState {
    left: bool,
    right: bool,
    last: Option<PhysicalPosition<f64>>,
}

pub struct Viewer {
    session: Session,
    bindings: HashMap<char, KeyAction>,
}

impl Viewer {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            bindings: HashMap::new(),
        }
    }

    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run `action` whenever `key` is pressed; user bindings take precedence over built-in keys
    pub fn bind_key<F>(&mut self, key: char, action: F)
    where
        F: FnMut(&mut Session) -> Result<()> + 'static,
    {
        self.bindings.insert(key, Box::new(action));
    }

    /// Open the window and block until it is closed
    pub fn run(mut self) -> Result<SessionStats> {
        let config = self.session.config().clone();
        info!("opening viewer window {:?}", config.title);

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.clone())
                .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let mut renderer = pollster::block_on(Renderer::new(window.clone(), config.render_config()))?;

        let dirty = Rc::new(Cell::new(true));
        {
            let control = self.session.control()?;
            let redraws = control.redraw_count();
            control.set_surface(Box::new(WindowSurface::new(
                window.clone(),
                dirty.clone(),
                redraws,
            )));
        }

        let mut camera = Camera::default();
        let size = window.inner_size();
        camera.aspect_ratio = aspect_ratio(size.width, size.height);
        self.fit_camera(&mut camera)?;

        let mut mouse = MouseState::default();
        let mut failure: Option<Error> = None;

        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };

                let result = match event {
                    WindowEvent::CloseRequested => {
                        target.exit();
                        Ok(())
                    }
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        camera.aspect_ratio = aspect_ratio(new_size.width, new_size.height);
                        window.request_redraw();
                        Ok(())
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        let pressed = state == ElementState::Pressed;
                        match button {
                            MouseButton::Left => mouse.left = pressed,
                            MouseButton::Right => mouse.right = pressed,
                            _ => {}
                        }
                        Ok(())
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if let Some(last) = mouse.last {
                            let dx = (position.x - last.x) as f32;
                            let dy = (position.y - last.y) as f32;
                            if mouse.left {
                                camera.orbit(dx * ORBIT_SPEED, dy * ORBIT_SPEED);
                                window.request_redraw();
                            } else if mouse.right {
                                camera.pan(dx * PAN_SPEED, dy * PAN_SPEED);
                                window.request_redraw();
                            }
                        }
                        mouse.last = Some(position);
                        Ok(())
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        camera.zoom(scroll * ZOOM_SPEED);
                        window.request_redraw();
                        Ok(())
                    }
                    WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                        let result = self.handle_key(&event.logical_key, &mut camera, target);
                        window.request_redraw();
                        result
                    }
                    WindowEvent::RedrawRequested => {
                        self.redraw(&window, &mut renderer, &camera, &dirty)
                    }
                    _ => Ok(()),
                };

                if let Err(e) = result {
                    error!("viewer error: {}", e);
                    failure = Some(e);
                    target.exit();
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop failed: {}", e)))?;

        // Release the window; later plots keep counting on a headless surface
        let control = self.session.control()?;
        let redraws = control.redraw_count();
        control.set_surface(Box::new(HeadlessSurface::starting_at(redraws)));

        match failure {
            Some(e) => Err(e),
            None => Ok(self.session.shutdown()),
        }
    }

    fn handle_key(
        &mut self,
        key: &Key,
        camera: &mut Camera,
        target: &EventLoopWindowTarget<()>,
    ) -> Result<()> {
        match key {
            Key::Named(NamedKey::Escape) => {
                target.exit();
                Ok(())
            }
            Key::Character(text) => {
                let Some(c) = text.chars().next() else {
                    return Ok(());
                };
                if let Some(action) = self.bindings.get_mut(&c) {
                    debug!("running binding for key {:?}", c);
                    action(&mut self.session)?;
                    return self.session.control()?.render();
                }
                match c.to_ascii_lowercase() {
                    'r' => self.fit_camera(camera),
                    'q' => {
                        target.exit();
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn redraw(
        &mut self,
        window: &Window,
        renderer: &mut Renderer,
        camera: &Camera,
        dirty: &Cell<bool>,
    ) -> Result<()> {
        if dirty.replace(false) {
            let frame = FrameGeometry::build(self.session.control()?.actors());
            debug!(
                "uploading {} points, {} line vertices, {} triangle vertices",
                frame.points.len(),
                frame.lines.len(),
                frame.triangles.len()
            );
            renderer.upload(&frame);
        }
        if renderer.render(camera)? == FrameStatus::Retry {
            window.request_redraw();
        }
        Ok(())
    }

    fn fit_camera(&mut self, camera: &mut Camera) -> Result<()> {
        if let Some(bounds) = self.session.control()?.bounds() {
            camera.fit(&bounds);
        }
        Ok(())
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
