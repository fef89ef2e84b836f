//! Drawing the wheel and HUD via `Renderer2d`.
//!
//! Everything here is a pure function of machine state plus the driver clock,
//! so the same code renders the window and the offscreen test frames.

use engine::graphics::{Color, Renderer2d, text_width};
use engine::surface::SurfaceSize;
use engine::ui::Rect;

use crate::machine::{GameMachine, GamePhase};
use crate::wheel::{Sector, WheelGeometry};

pub const COLOR_BACKGROUND: Color = [10, 10, 14, 255];
const COLOR_RIM: Color = [235, 235, 245, 255];
const COLOR_TEXT: Color = [235, 235, 245, 255];
const COLOR_GAME_OVER_DIM: Color = [0, 0, 0, 255];
const GAME_OVER_DIM_ALPHA: u8 = 150;

const RIM_WIDTH: u32 = 3;
/// Arc samples per sector polygon.
const ARC_SEGMENTS: usize = 50;

/// Bright flashes older than this render dim again.
pub const HIGHLIGHT_MS: u64 = 500;

const LEVEL_TEXT_SCALE: u32 = 3;
const STATUS_TEXT_SCALE: u32 = 2;

/// (bright, dim) fill colors per sector.
const fn sector_colors(sector: Sector) -> (Color, Color) {
    match sector {
        Sector::Red => ([255, 100, 100, 255], [150, 50, 50, 255]),
        Sector::Yellow => ([255, 255, 100, 255], [150, 150, 50, 255]),
        Sector::Green => ([100, 255, 100, 255], [50, 150, 50, 255]),
        Sector::Blue => ([100, 100, 255, 255], [50, 50, 150, 255]),
    }
}

/// Wheel placement for a surface: centered, radii scaled with the short side.
pub fn wheel_geometry(size: SurfaceSize) -> WheelGeometry {
    let short_side = size.width.min(size.height) as f32;
    let outer_radius = short_side / 3.0;
    WheelGeometry {
        center_x: size.width as f32 / 2.0,
        center_y: size.height as f32 / 2.0,
        inner_radius: outer_radius / 4.0,
        outer_radius,
    }
}

/// Wedge polygon for one sector: center plus an arc fan along the rim.
pub fn sector_points(geo: &WheelGeometry, sector: Sector) -> Vec<[f32; 2]> {
    let (start_deg, end_deg) = sector.angles();
    let start = start_deg.to_radians();
    let end = end_deg.to_radians();

    let mut points = Vec::with_capacity(ARC_SEGMENTS + 2);
    points.push([geo.center_x, geo.center_y]);
    for i in 0..=ARC_SEGMENTS {
        let angle = start + (end - start) * (i as f32 / ARC_SEGMENTS as f32);
        points.push([
            geo.center_x + geo.outer_radius * angle.cos(),
            geo.center_y + geo.outer_radius * angle.sin(),
        ]);
    }
    points
}

/// The sector to render bright, if its flash is still young enough.
pub fn lit_sector(machine: &GameMachine, now_ms: u64) -> Option<Sector> {
    machine.active_sector().filter(|_| {
        machine
            .since_active_start(now_ms)
            .is_some_and(|age| age < HIGHLIGHT_MS)
    })
}

/// Draws the four sectors and the hub. `lit` renders bright, the rest dim.
pub fn draw_wheel(gfx: &mut dyn Renderer2d, geo: &WheelGeometry, lit: Option<Sector>) {
    for sector in Sector::ALL {
        let (bright, dim) = sector_colors(sector);
        let color = if lit == Some(sector) { bright } else { dim };
        let points = sector_points(geo, sector);
        gfx.fill_polygon(&points, color);
        gfx.polygon_outline(&points, COLOR_RIM, RIM_WIDTH);
    }

    gfx.fill_circle(geo.center_x, geo.center_y, geo.inner_radius, COLOR_BACKGROUND);
    gfx.circle_outline(
        geo.center_x,
        geo.center_y,
        geo.inner_radius,
        COLOR_RIM,
        RIM_WIDTH as f32,
    );
}

fn draw_centered_text(gfx: &mut dyn Renderer2d, y: u32, text: &str, scale: u32) {
    let width = gfx.size().width;
    let x = width.saturating_sub(text_width(text, scale)) / 2;
    gfx.draw_text_scaled(x, y, text, COLOR_TEXT, scale);
}

/// Level counter and per-phase status line under the wheel.
pub fn draw_hud(gfx: &mut dyn Renderer2d, machine: &GameMachine) {
    let size = gfx.size();

    if machine.phase() == GamePhase::GameOver {
        gfx.blend_rect(
            Rect::from_size(size.width, size.height),
            COLOR_GAME_OVER_DIM,
            GAME_OVER_DIM_ALPHA,
        );
    }

    let level_y = size.height.saturating_sub(80);
    let status_y = size.height.saturating_sub(40);
    draw_centered_text(
        gfx,
        level_y,
        &format!("LEVEL: {}", machine.level()),
        LEVEL_TEXT_SCALE,
    );

    match machine.phase() {
        GamePhase::Waiting => {
            draw_centered_text(gfx, status_y, "PRESS SPACE TO START", STATUS_TEXT_SCALE);
        }
        GamePhase::Showing => {
            draw_centered_text(gfx, status_y, "WATCH THE SEQUENCE...", STATUS_TEXT_SCALE);
        }
        GamePhase::Input => {
            draw_centered_text(
                gfx,
                status_y,
                "USE WASD OR CLICK TO REPEAT IT",
                STATUS_TEXT_SCALE,
            );
        }
        GamePhase::GameOver => {
            draw_centered_text(gfx, status_y.saturating_sub(24), "GAME OVER!", LEVEL_TEXT_SCALE);
            draw_centered_text(gfx, status_y, "PRESS SPACE TO RESTART", STATUS_TEXT_SCALE);
        }
    }
}

/// Full frame: background, wheel with the current highlight, HUD.
pub fn draw_scene(gfx: &mut dyn Renderer2d, machine: &GameMachine, now_ms: u64) {
    gfx.clear(COLOR_BACKGROUND);
    let geo = wheel_geometry(gfx.size());
    draw_wheel(gfx, &geo, lit_sector(machine, now_ms));
    draw_hud(gfx, machine);
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::graphics::CpuRenderer;
    use engine::surface::{RgbaBufferSurface, Surface};

    fn pixel_at(surface: &RgbaBufferSurface, x: u32, y: u32) -> [u8; 4] {
        let frame = surface.frame();
        let idx = ((y * surface.size().width + x) * 4) as usize;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    #[test]
    fn geometry_is_centered_with_original_proportions() {
        let geo = wheel_geometry(SurfaceSize::new(600, 600));
        assert_eq!(geo.center_x, 300.0);
        assert_eq!(geo.center_y, 300.0);
        assert_eq!(geo.outer_radius, 200.0);
        assert_eq!(geo.inner_radius, 50.0);
    }

    #[test]
    fn geometry_uses_short_side_of_wide_surfaces() {
        let geo = wheel_geometry(SurfaceSize::new(800, 600));
        assert_eq!(geo.center_x, 400.0);
        assert_eq!(geo.outer_radius, 200.0);
    }

    #[test]
    fn sector_polygon_fans_from_center_to_rim() {
        let geo = wheel_geometry(SurfaceSize::new(600, 600));
        let points = sector_points(&geo, Sector::Red);

        assert_eq!(points[0], [geo.center_x, geo.center_y]);
        assert_eq!(points.len(), ARC_SEGMENTS + 2);
        for p in &points[1..] {
            let dx = p[0] - geo.center_x;
            let dy = p[1] - geo.center_y;
            let dist = (dx * dx + dy * dy).sqrt();
            assert!(
                (dist - geo.outer_radius).abs() < 0.001,
                "arc point off the rim: {dist}"
            );
        }
    }

    #[test]
    fn sector_polygon_midpoint_resolves_back_to_its_sector() {
        let geo = wheel_geometry(SurfaceSize::new(600, 600));
        for sector in Sector::ALL {
            let points = sector_points(&geo, sector);
            let mid = points[1 + ARC_SEGMENTS / 2];
            // Pull the rim point halfway toward the center, into the ring.
            let x = geo.center_x + (mid[0] - geo.center_x) * 0.5;
            let y = geo.center_y + (mid[1] - geo.center_y) * 0.5;
            assert_eq!(geo.sector_at(x, y), Some(sector));
        }
    }

    #[test]
    fn lit_sector_respects_the_highlight_window() {
        let mut machine = GameMachine::new(1);
        machine.handle_start(0);
        machine.tick(501);
        assert!(machine.active_sector().is_some());

        assert_eq!(lit_sector(&machine, 501), machine.active_sector());
        assert_eq!(lit_sector(&machine, 501 + HIGHLIGHT_MS - 1), machine.active_sector());
        assert_eq!(lit_sector(&machine, 501 + HIGHLIGHT_MS), None);
    }

    #[test]
    fn scene_renders_each_quadrant_with_its_dim_color() {
        let size = SurfaceSize::new(600, 600);
        let mut surface = RgbaBufferSurface::new(size);
        let machine = GameMachine::new(1);
        {
            let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
            draw_scene(&mut gfx, &machine, 0);
        }

        let geo = wheel_geometry(size);
        for sector in Sector::ALL {
            let (start, end) = sector.angles();
            let mid = ((start + end) / 2.0).to_radians();
            let r = (geo.inner_radius + geo.outer_radius) / 2.0;
            let x = (geo.center_x + r * mid.cos()) as u32;
            let y = (geo.center_y + r * mid.sin()) as u32;
            let (_, dim) = sector_colors(sector);
            assert_eq!(pixel_at(&surface, x, y), dim, "{sector:?} quadrant color");
        }
    }

    #[test]
    fn scene_brightens_the_lit_sector() {
        let size = SurfaceSize::new(600, 600);
        let mut machine = GameMachine::new(1);
        machine.handle_start(0);
        machine.tick(501);
        let lit = machine.active_sector().expect("flash is lit at 501ms");

        let mut surface = RgbaBufferSurface::new(size);
        {
            let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
            draw_scene(&mut gfx, &machine, 501);
        }

        let geo = wheel_geometry(size);
        let (start, end) = lit.angles();
        let mid = ((start + end) / 2.0).to_radians();
        let r = (geo.inner_radius + geo.outer_radius) / 2.0;
        let x = (geo.center_x + r * mid.cos()) as u32;
        let y = (geo.center_y + r * mid.sin()) as u32;
        let (bright, _) = sector_colors(lit);
        assert_eq!(pixel_at(&surface, x, y), bright);
    }
}
