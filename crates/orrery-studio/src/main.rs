//! Orrery studio: a two-pane demo driving the screen layer.
//!
//! Left pane is a zoomable graph (grid, axes, a sine curve); right pane is a
//! perspective view of a toy planetary system.
//!
//! Controls:
//! - graph: left/right click zoom in/out at the cursor, middle-drag pans,
//!   arrows nudge, R resets the view
//! - orbit: arrows/Z/X rotate, S/A dolly, J/L/I/K move, V toggles the pane
//! - Esc quits

use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use orrery_screen::batch::{FaceColor, PrimitiveBuffer};
use orrery_screen::coords::{Rect, Viewport};
use orrery_screen::device::{Gpu, GpuInit, SurfaceErrorAction};
use orrery_screen::input::platform::winit::translate_window_event;
use orrery_screen::input::{InputEvent, InputState, Key, KeyState, MouseButtonState};
use orrery_screen::logging::{LoggingConfig, init_logging};
use orrery_screen::render::WgpuBatch;
use orrery_screen::screen::{Camera3D, GraphScreen, GraphView, Screen, Screen3D};
use orrery_screen::value::{ScalarHandle, ValueSet};

const WINDOW_W: f32 = 960.0;
const WINDOW_H: f32 = 540.0;

const GRAPH_BG: [u8; 3] = [245, 243, 238];
const SPACE_BG: [u8; 3] = [8, 10, 18];

struct Stage {
    gpu: Gpu,
    batch: WgpuBatch,
    graph: GraphScreen,
    space: Screen3D,
}

struct App {
    window: Option<Arc<Window>>,
    stage: Option<Stage>,
    input: InputState,
    values: ValueSet,
    zoom_ratio: ScalarHandle,
    last_frame: Instant,
}

impl App {
    fn new() -> Self {
        let mut values = ValueSet::new();
        let zoom_ratio = values.insert("zoom ratio", 0.5);

        Self {
            window: None,
            stage: None,
            input: InputState::new(),
            values,
            zoom_ratio,
            last_frame: Instant::now(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(stage)) = (self.window.as_ref(), self.stage.as_mut()) else {
            return;
        };

        let dt = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();

        // Per-frame updates, gated on the activity flag.
        if stage.graph.core().active {
            stage.graph.tick(dt);
        }
        if stage.space.core().active {
            stage.space.tick(dt);
            // Idle spin so the scene reads as 3D without input.
            stage.space.camera_mut().rotation.y += 12.0 * dt;
        }

        let mut frame = match stage.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                match stage.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        window.request_redraw();
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error; shutting down");
                        event_loop.exit();
                    }
                }
                return;
            }
        };

        // Clear the whole window; screens then draw into their scissored rects.
        frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("studio clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.02,
                        g: 0.02,
                        b: 0.03,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let scale = window.scale_factor() as f32;
        let size = stage.gpu.size();
        let viewport = Viewport::new(
            size.width as f32 / scale,
            size.height as f32 / scale,
            scale,
        );

        let setups = [
            stage.graph.draw_setup(viewport),
            stage.space.draw_setup(viewport),
        ];
        for setup in setups.into_iter().flatten() {
            stage
                .batch
                .draw_screen(&mut frame.encoder, &frame.view, &frame.depth_view, &setup);
        }

        stage.gpu.submit(frame);
        window.request_redraw();
    }

    fn route(&mut self, event_loop: &ActiveEventLoop, ev: InputEvent) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };

        match ev {
            InputEvent::PointerMoved(m) => {
                let prev = self.input.pointer_pos;
                self.input.apply(&ev);
                let (dx, dy) = prev.map_or((0.0, 0.0), |(px, py)| (m.x - px, m.y - py));
                let held = self.input.held_button();
                let modifiers = self.input.modifiers;

                if let Some(screen) = screen_at(&mut stage.graph, &mut stage.space, m.x, m.y) {
                    let rect = screen.core().rect;
                    let (lx, ly) = (m.x - rect.x, m.y - rect.y);
                    match held {
                        Some(button) => screen.mouse_drag(lx, ly, dx, dy, button, modifiers),
                        None => screen.mouse_move(lx, ly, dx, dy),
                    }
                }
            }

            InputEvent::PointerButton(b) => {
                self.input.apply(&ev);
                let modifiers = self.input.modifiers;

                if let Some(screen) = screen_at(&mut stage.graph, &mut stage.space, b.x, b.y) {
                    let rect = screen.core().rect;
                    let (lx, ly) = (b.x - rect.x, b.y - rect.y);
                    match b.state {
                        MouseButtonState::Pressed => {
                            screen.mouse_down(lx, ly, b.button, modifiers);
                        }
                        MouseButtonState::Released => {
                            screen.mouse_up(lx, ly, b.button, modifiers, &mut stage.batch);
                        }
                    }
                }
            }

            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                modifiers,
                ..
            } => {
                self.input.apply(&ev);
                match key {
                    Key::Escape => event_loop.exit(),
                    Key::R => stage.graph.reset_screen(&mut stage.batch),
                    Key::V => {
                        if stage.space.core().visible {
                            stage.space.off(&mut stage.batch);
                        } else {
                            stage.space.on(&mut stage.batch);
                        }
                    }
                    _ => {
                        if let Some((px, py)) = self.input.pointer_pos
                            && let Some(screen) =
                                screen_at(&mut stage.graph, &mut stage.space, px, py)
                        {
                            screen.key_down(key, modifiers, &mut stage.batch);
                        }
                    }
                }
            }

            InputEvent::Key {
                key,
                state: KeyState::Released,
                modifiers,
                ..
            } => {
                self.input.apply(&ev);
                if let Some((px, py)) = self.input.pointer_pos
                    && let Some(screen) = screen_at(&mut stage.graph, &mut stage.space, px, py)
                {
                    screen.key_up(key, modifiers);
                }
            }

            _ => self.input.apply(&ev),
        }
    }
}

/// Hit-tests both panes in window coordinates.
fn screen_at<'a>(
    graph: &'a mut GraphScreen,
    space: &'a mut Screen3D,
    x: f32,
    y: f32,
) -> Option<&'a mut dyn Screen> {
    if graph.is_inside(x, y) {
        Some(graph)
    } else if space.is_inside(x, y) {
        Some(space)
    } else {
        None
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Orrery Studio")
            .with_inner_size(LogicalSize::new(WINDOW_W, WINDOW_H));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let gpu = match Gpu::new_blocking(window.clone(), GpuInit::default()) {
            Ok(gpu) => gpu,
            Err(err) => {
                log::error!("failed to initialize GPU: {err:#}");
                event_loop.exit();
                return;
            }
        };

        let mut batch = WgpuBatch::new(gpu.device().clone(), gpu.surface_format());
        let half = WINDOW_W / 2.0;

        let mut graph = GraphScreen::new(
            Rect::new(0.0, 0.0, half, WINDOW_H),
            0.0,
            0.0,
            8.0,
            9.0,
            self.zoom_ratio.clone(),
            GRAPH_BG,
            render_graph,
        )
        .expect("initial graph view is non-degenerate");

        let mut space = Screen3D::new(
            Rect::new(half, 0.0, half, WINDOW_H),
            Camera3D::new(
                Vec3::new(0.0, 0.0, -160.0),
                Vec3::new(-20.0, 0.0, 0.0),
                Vec3::ZERO,
            ),
            SPACE_BG,
            render_orbits,
        );

        graph.on(&mut batch);
        space.on(&mut batch);

        log::info!(
            "studio up: zoom ratio {}",
            self.values.get("zoom ratio").unwrap_or(f64::NAN)
        );

        self.window = Some(window);
        self.stage = Some(Stage { gpu, batch, graph, space });
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(new_size) => {
                if let (Some(window), Some(stage)) = (self.window.as_ref(), self.stage.as_mut()) {
                    stage.gpu.resize(new_size);

                    let scale = window.scale_factor();
                    let logical = new_size.to_logical::<f32>(scale);
                    let half = logical.width / 2.0;

                    stage.graph.on_resize(half, logical.height, &mut stage.batch);
                    stage.space.core_mut().set_pos(half, 0.0);
                    stage.space.core_mut().set_size(half, logical.height);
                    stage.space.on_resize(half, logical.height, &mut stage.batch);

                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            other => {
                let Some(window) = self.window.as_ref() else {
                    return;
                };
                if let Some(ev) = translate_window_event(window, &self.input, &other) {
                    self.route(event_loop, ev);
                }
            }
        }
    }
}

// ── pane renderers ────────────────────────────────────────────────────────

/// Graph pane: unit grid, axes, a sine curve with sample markers.
fn render_graph(buf: &mut PrimitiveBuffer, view: &GraphView) {
    const GRID: [u8; 3] = [215, 211, 203];
    const AXIS: [u8; 3] = [90, 88, 84];
    const CURVE: [u8; 3] = [188, 82, 21];
    const MARKER: [u8; 3] = [32, 84, 147];

    let (min_gx, max_gx, min_gy, max_gy) = view.bounds();

    // Unit grid. Skip when zoomed far out enough that it would be noise.
    let (gw, _) = view.extent();
    if gw < 64.0 {
        for x in (min_gx.ceil() as i64)..=(max_gx.floor() as i64) {
            buf.add_line(
                [x as f32, min_gy as f32, -2.0],
                [x as f32, max_gy as f32, -2.0],
                GRID,
            );
        }
        for y in (min_gy.ceil() as i64)..=(max_gy.floor() as i64) {
            buf.add_line(
                [min_gx as f32, y as f32, -2.0],
                [max_gx as f32, y as f32, -2.0],
                GRID,
            );
        }
    }

    buf.add_line([min_gx as f32, 0.0, -1.0], [max_gx as f32, 0.0, -1.0], AXIS);
    buf.add_line([0.0, min_gy as f32, -1.0], [0.0, max_gy as f32, -1.0], AXIS);

    // Sine curve sampled across the visible span.
    const SAMPLES: usize = 512;
    let mut vertices = Vec::with_capacity((SAMPLES + 1) * 3);
    let mut colors = Vec::with_capacity((SAMPLES + 1) * 3);
    for i in 0..=SAMPLES {
        let wx = min_gx + (max_gx - min_gx) * i as f64 / SAMPLES as f64;
        vertices.extend([wx as f32, wx.sin() as f32, 0.0]);
        colors.extend(CURVE);
    }
    buf.set_line_strip(vertices, colors)
        .expect("sine strip arrays are parallel by construction");

    for x in -8..=8 {
        let wx = x as f64;
        buf.add_point(wx as f32, wx.sin() as f32, 0.1, MARKER);
    }
}

/// Orbit pane: a sun quad, orbit rings and planets around the origin.
fn render_orbits(buf: &mut PrimitiveBuffer, _camera: &Camera3D) {
    const SUN: [u8; 3] = [240, 180, 60];
    const RING: [u8; 3] = [70, 80, 110];
    const PLANET: [u8; 3] = [140, 190, 235];
    const AXIS: [u8; 3] = [40, 46, 66];

    // World axes for orientation.
    buf.add_line([-120.0, 0.0, 0.0], [120.0, 0.0, 0.0], AXIS);
    buf.add_line([0.0, -120.0, 0.0], [0.0, 120.0, 0.0], AXIS);
    buf.add_line([0.0, 0.0, -120.0], [0.0, 0.0, 120.0], AXIS);

    let sun = 6.0f32;
    buf.add_quad(
        [
            [-sun, -sun, 0.0],
            [sun, -sun, 0.0],
            [sun, sun, 0.0],
            [-sun, sun, 0.0],
        ],
        FaceColor::Uniform(SUN),
    )
    .expect("uniform face color needs no length check");

    // Innermost ring as the strip; outer rings as segments.
    const STEPS: usize = 96;
    let ring = |radius: f32| {
        (0..=STEPS).map(move |i| {
            let a = (i % STEPS) as f32 / STEPS as f32 * std::f32::consts::TAU;
            [radius * a.cos(), 0.0, radius * a.sin()]
        })
    };

    let mut vertices = Vec::with_capacity((STEPS + 1) * 3);
    let mut colors = Vec::with_capacity((STEPS + 1) * 3);
    for p in ring(40.0) {
        vertices.extend(p);
        colors.extend(RING);
    }
    buf.set_line_strip(vertices, colors)
        .expect("ring strip arrays are parallel by construction");

    for radius in [70.0f32, 100.0] {
        let points: Vec<[f32; 3]> = ring(radius).collect();
        for pair in points.windows(2) {
            buf.add_line(pair[0], pair[1], RING);
        }
    }

    for (radius, angle) in [(40.0f32, 0.7f32), (70.0, 2.4), (100.0, 4.4)] {
        buf.add_point(radius * angle.cos(), 0.0, radius * angle.sin(), PLANET);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    println!("orrery studio");
    println!("  graph  left/right click: zoom   middle drag: pan   arrows: nudge   R: reset");
    println!("  orbit  arrows/Z/X: rotate   S/A: dolly   J/L/I/K: move   V: toggle pane");
    println!("  esc    quit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
