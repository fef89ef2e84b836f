//! The windowed game: winit event loop, pixels surface, CPU renderer.

use std::error::Error;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use engine::pixels_renderer::PixelsRenderer2d;
use engine::surface::SurfaceSize;
use pixels::{PixelsBuilder, SurfaceTexture};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use game::machine::GameMachine;
use game::wheel::Sector;
use game::wheel_ui::{draw_scene, wheel_geometry};

const WINDOW_WIDTH: u32 = 600;
const WINDOW_HEIGHT: u32 = 600;
const WINDOW_TITLE: &str = "Wheel Memory";

/// A resolved input event, after key/pointer mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameEvent {
    Start,
    Select(Sector),
    Quit,
}

fn map_key_to_event(key: VirtualKeyCode) -> Option<GameEvent> {
    match key {
        VirtualKeyCode::Space => Some(GameEvent::Start),
        VirtualKeyCode::W => Some(GameEvent::Select(Sector::Red)),
        VirtualKeyCode::A => Some(GameEvent::Select(Sector::Yellow)),
        VirtualKeyCode::S => Some(GameEvent::Select(Sector::Green)),
        VirtualKeyCode::D => Some(GameEvent::Select(Sector::Blue)),
        VirtualKeyCode::Escape => Some(GameEvent::Quit),
        _ => None,
    }
}

fn map_click_to_event(size: SurfaceSize, x: f32, y: f32) -> Option<GameEvent> {
    wheel_geometry(size).sector_at(x, y).map(GameEvent::Select)
}

fn apply_event(machine: &mut GameMachine, event: GameEvent, now_ms: u64) {
    match event {
        GameEvent::Start => machine.handle_start(now_ms),
        GameEvent::Select(sector) => machine.handle_select(sector, now_ms),
        GameEvent::Quit => machine.handle_quit(),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

fn main() -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);
    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let pixels = PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture)
        .build()?;
    let mut renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    let mut machine = GameMachine::new(time_seed());
    let clock = Instant::now();
    let mut cursor_pos: Option<(f32, f32)> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        let now_ms = clock.elapsed().as_millis() as u64;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                WindowEvent::Resized(size) => {
                    let new_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = renderer.resize(new_size) {
                        eprintln!("resize failed: {err}");
                    }
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    if let Some(game_event) = map_key_to_event(*key) {
                        apply_event(&mut machine, game_event, now_ms);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor_pos = Some((position.x as f32, position.y as f32));
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Some((x, y)) = cursor_pos {
                        if let Some(game_event) = map_click_to_event(renderer.size(), x, y) {
                            apply_event(&mut machine, game_event, now_ms);
                        }
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                machine.tick(now_ms);
                renderer.draw_frame(|gfx| {
                    draw_scene(gfx, &machine, now_ms);
                });
                if let Err(err) = renderer.present() {
                    eprintln!("present failed: {err}");
                }
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }

        if machine.quit_requested() {
            *control_flow = ControlFlow::Exit;
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
