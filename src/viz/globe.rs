//! Rotating network globe: pulsing surface nodes, great-circle links,
//! flow lines, orbital rings and a background starfield, drawn with
//! braille characters.

use super::{scheme_color, VizState};
use crate::config::SceneConfig;
use crate::material::Material;
use crate::scene::Scene;
use crate::terminal::Terminal;
use crate::geom;
use crossterm::event::KeyCode;
use rand::prelude::*;
use std::f32::consts::FRAC_PI_2;
use std::io;

// Draw layers, highest wins within a braille cell.
const LAYER_FAINT: u8 = 1; // dim stars, ring paths
const LAYER_SOFT: u8 = 2; // bright stars, flow lines
const LAYER_LINK: u8 = 3;
const LAYER_LONG_ARC: u8 = 4;
const LAYER_NODE: u8 = 5;
const LAYER_NODE_BRIGHT: u8 = 6;
const LAYER_SATELLITE: u8 = 7;

// Pulse gates: entities below their gate sit out the frame.
const NODE_VISIBLE_PULSE: f32 = 0.15;
const NODE_BRIGHT_PULSE: f32 = 0.7;
const LINK_VISIBLE_PULSE: f32 = 0.25;
const LONG_ARC_VISIBLE_PULSE: f32 = 0.1;
const FLOW_VISIBLE_PULSE: f32 = 0.3;

// Back-hemisphere cutoff for surface-bound points; slight slack keeps the
// limb populated.
const SURFACE_DEPTH_CUTOFF: f32 = -0.05;

const RING_PATH_SAMPLES: usize = 180;

// View adjustment per keypress.
const TILT_STEP: f32 = 0.08;
const SPIN_STEP: f32 = 0.15;
const ZOOM_FACTOR: f32 = 1.2;
const ZOOM_MIN: f32 = 0.3;
const ZOOM_MAX: f32 = 3.0;

const ASPECT_CORRECTION: f32 = 0.5;

const HELP: &str = "\
NETWORK GLOBE
─────────────────
↑/k ↓/j  Tilt
←/h →/l  Spin
+/-      Zoom in/out
0        Reset view
1-9      Speed
Space    Pause
?        Toggle help
q        Quit";

/// Run the network globe visualization until the user quits.
pub fn run(
    term: &mut Terminal,
    config: &SceneConfig,
    material: &Material,
    scheme: u8,
    default_tilt: f32,
    rng: &mut StdRng,
) -> io::Result<()> {
    let mut state = VizState::new(config.time_step, HELP);
    state.set_color_scheme(scheme);

    let mut scene = Scene::build(config, rng);
    scene.tilt = default_tilt;
    scene.target_tilt = default_tilt;

    let (init_w, init_h) = term.size();
    let mut prev_w = init_w;
    let mut prev_h = init_h;

    let mut braille_w = init_w as usize * 2;
    let mut braille_h = init_h as usize * 4;
    let mut dots: Vec<Vec<u8>> = vec![vec![0; braille_w]; braille_h];

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());

        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
            braille_w = width as usize * 2;
            braille_h = height as usize * 4;
            dots = vec![vec![0; braille_w]; braille_h];
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
            match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    scene.target_tilt = (scene.target_tilt + TILT_STEP).min(FRAC_PI_2);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    scene.target_tilt = (scene.target_tilt - TILT_STEP).max(-FRAC_PI_2);
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    scene.target_spin -= SPIN_STEP;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    scene.target_spin += SPIN_STEP;
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    scene.target_zoom = (scene.target_zoom * ZOOM_FACTOR).min(ZOOM_MAX);
                }
                KeyCode::Char('-') | KeyCode::Char('_') => {
                    scene.target_zoom = (scene.target_zoom / ZOOM_FACTOR).max(ZOOM_MIN);
                }
                KeyCode::Char('0') => {
                    scene.target_zoom = 1.0;
                    scene.target_spin = 0.0;
                    scene.target_tilt = default_tilt;
                }
                _ => {}
            }
        }

        if state.paused {
            term.sleep(0.1);
            continue;
        }

        scene.advance();

        for row in &mut dots {
            row.fill(0);
        }

        let w = width as f32;
        let h = height as f32;
        let half_w = w / 2.0;
        let half_h = h / 2.0;
        let radius = (h * 1.8).min(w * 0.8) * 0.38 * scene.zoom;

        let (sin_tilt, cos_tilt) = scene.tilt.sin_cos();
        let spin = scene.rotation + scene.spin_offset;

        // Camera-space coordinates: x across, y up after tilt, depth toward
        // the viewer.
        let view = |p: geom::Vec3| -> (f32, f32, f32) {
            let y1 = p.y * cos_tilt - p.z * sin_tilt;
            let z1 = p.y * sin_tilt + p.z * cos_tilt;
            (p.x, y1, z1)
        };
        let to_braille = |ux: f32, uy: f32| -> (i32, i32) {
            let sx = half_w + ux * radius;
            let sy = half_h - uy * radius * ASPECT_CORRECTION;
            ((sx * 2.0) as i32, (sy * 4.0) as i32)
        };

        {
            let mut plot = |bx: i32, by: i32, layer: u8| {
                if bx >= 0
                    && bx < braille_w as i32
                    && by >= 0
                    && by < braille_h as i32
                    && dots[by as usize][bx as usize] < layer
                {
                    dots[by as usize][bx as usize] = layer;
                }
            };

            // starfield, occluded where the globe disc sits in front
            for star in &scene.stars {
                let (ux, uy, depth) = view(star.pos);
                if depth < 0.0 && ux * ux + uy * uy < 1.0 {
                    continue;
                }
                let layer = if star.tier >= 2 { LAYER_SOFT } else { LAYER_FAINT };
                let (bx, by) = to_braille(ux, uy);
                plot(bx, by, layer);
            }

            // orbital rings and their satellites
            for ring in &scene.rings {
                for p in Scene::ring_points(ring, RING_PATH_SAMPLES) {
                    let (ux, uy, depth) = view(p);
                    if depth < 0.0 && ux * ux + uy * uy < 1.0 {
                        continue;
                    }
                    let (bx, by) = to_braille(ux, uy);
                    plot(bx, by, LAYER_FAINT);
                }
                for sat in &ring.satellites {
                    let p = Scene::satellite_position(ring, sat);
                    let (ux, uy, depth) = view(p);
                    if depth < 0.0 && ux * ux + uy * uy < 1.0 {
                        continue;
                    }
                    let (bx, by) = to_braille(ux, uy);
                    for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
                        plot(bx + dx, by + dy, LAYER_SATELLITE);
                    }
                }
            }

            // flow lines (base points rotate with the globe)
            for flow in &scene.flow_lines {
                if flow.pulse < FLOW_VISIBLE_PULSE {
                    continue;
                }
                for p in &flow.points {
                    let (ux, uy, depth) = view(geom::rotate_y(*p, spin));
                    if depth < SURFACE_DEPTH_CUTOFF {
                        continue;
                    }
                    let (bx, by) = to_braille(ux, uy);
                    plot(bx, by, LAYER_SOFT);
                }
            }

            // connection arcs (polylines cached in world space)
            for conn in &scene.connections {
                let (gate, layer) = if conn.long {
                    (LONG_ARC_VISIBLE_PULSE, LAYER_LONG_ARC)
                } else {
                    (LINK_VISIBLE_PULSE, LAYER_LINK)
                };
                if conn.pulse < gate {
                    continue;
                }
                for p in &conn.polyline {
                    let (ux, uy, depth) = view(*p);
                    if depth < SURFACE_DEPTH_CUTOFF {
                        continue;
                    }
                    let (bx, by) = to_braille(ux, uy);
                    plot(bx, by, layer);
                }
            }

            // nodes last among surface layers so they sit on top of links
            for i in 0..scene.nodes.len() {
                let pulse = scene.nodes[i].pulse;
                if pulse < NODE_VISIBLE_PULSE {
                    continue;
                }
                let (ux, uy, depth) = view(scene.node_position(i));
                if depth < SURFACE_DEPTH_CUTOFF {
                    continue;
                }
                let layer = if pulse > NODE_BRIGHT_PULSE {
                    LAYER_NODE_BRIGHT
                } else {
                    LAYER_NODE
                };
                let (bx, by) = to_braille(ux, uy);
                plot(bx, by, layer);
            }
        }

        // braille grid to terminal cells
        term.clear();
        for cy in 0..height as usize {
            let by = cy * 4;
            if by + 3 >= braille_h {
                continue;
            }
            for cx in 0..width as usize {
                let bx = cx * 2;
                if bx + 1 >= braille_w {
                    continue;
                }

                let positions = [
                    (by, bx),
                    (by + 1, bx),
                    (by + 2, bx),
                    (by, bx + 1),
                    (by + 1, bx + 1),
                    (by + 2, bx + 1),
                    (by + 3, bx),
                    (by + 3, bx + 1),
                ];
                let dot_bits = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

                let mut pattern: u8 = 0;
                let mut top_layer: u8 = 0;
                for (i, &(py, px)) in positions.iter().enumerate() {
                    let layer = dots[py][px];
                    if layer > 0 {
                        pattern |= dot_bits[i];
                        top_layer = top_layer.max(layer);
                    }
                }

                if pattern > 0 {
                    let ch = char::from_u32(0x2800 + pattern as u32).unwrap_or(' ');
                    let (color, bold) = match top_layer {
                        LAYER_SATELLITE => (material.satellite, true),
                        LAYER_NODE_BRIGHT => (material.node, true),
                        LAYER_NODE => (material.node, false),
                        LAYER_LONG_ARC => (material.long_arc, false),
                        LAYER_LINK => scheme_color(state.color_scheme(), 2, true),
                        LAYER_SOFT => scheme_color(state.color_scheme(), 1, false),
                        _ => scheme_color(state.color_scheme(), 0, false),
                    };
                    term.set(cx as i32, cy as i32, ch, Some(color), bold);
                }
            }
        }

        let hud = format!(
            " {} nodes · {} links · {} arcs ",
            scene.nodes.len(),
            scene.connections.iter().filter(|c| !c.long).count(),
            scene.connections.iter().filter(|c| c.long).count()
        );
        let (hud_color, _) = scheme_color(state.color_scheme(), 0, false);
        term.set_str(1, height as i32 - 1, &hud, Some(hud_color), false);

        state.render_help(term, width, height);
        term.present()?;
        term.sleep(state.speed);
    }

    Ok(())
}
