//! Globe scene: node/link construction and the per-frame update step.
//!
//! Built once from a `SceneConfig` and a caller-supplied RNG (seed it for a
//! reproducible scene), then advanced once per frame by `Scene::advance`.
//! The drawing layer only reads; all mutation happens in `advance`.

use crate::config::SceneConfig;
use crate::geom::{self, Vec3};
use rand::prelude::*;
use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

/// Radius the node layer sits on. Everything surface-bound is renormalized
/// against its own intended radius, never allowed to drift.
pub const SURFACE_RADIUS: f32 = 1.0;

/// Nodes float up to this far above the surface.
const NODE_ALTITUDE_JITTER: f32 = 0.01;

/// Arc altitude bulge at the midpoint, as a fraction of the surface radius.
const SHORT_ARC_BULGE: f32 = 0.02;
const LONG_ARC_BULGE: f32 = 0.12;

/// Sample points per connection polyline.
const ARC_SEGMENTS: usize = 24;

/// Points per flow line and the surface step between them.
const FLOW_SEGMENTS: usize = 40;
const FLOW_STEP: f32 = 0.045;

/// Starfield shell bounds, well outside the globe's visual range.
const STAR_RADIUS_MIN: f32 = 2.2;
const STAR_RADIUS_MAX: f32 = 4.5;

/// Ring layout and satellite motion.
const RING_BASE_RADIUS: f32 = 1.3;
const RING_SPACING: f32 = 0.22;
const RING_TILT_STEP: f32 = 0.5;
const SATELLITE_SPEED: f32 = 0.011;

/// Exponential blend factor pulling smoothed view values toward their
/// targets each frame.
const PAN_BLEND: f32 = 0.08;
const ZOOM_BLEND: f32 = 0.1;

/// Update intervals, in frames. Pulse and arc refresh are deliberately
/// throttled; stale values persist on skipped frames.
const NODE_PULSE_INTERVAL: u64 = 2;
const LINK_PULSE_INTERVAL: u64 = 3;
const ARC_REFRESH_INTERVAL: u64 = 4;

/// Node pulse speed range (multiplies scene time).
const PULSE_SPEED_MIN: f32 = 0.5;
const PULSE_SPEED_MAX: f32 = 1.6;

/// A point fixed to the sphere surface. `dir` stays unit length; the drawn
/// position is `dir` rotated by the scene rotation and scaled by `radius`.
pub struct Node {
    pub dir: Vec3,
    pub radius: f32,
    pub phase: f32,
    pub speed: f32,
    pub pulse: f32,
}

/// Curved polyline between two nodes, flush against the sphere. Long arcs
/// bulge higher and render in their own color.
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub long: bool,
    pub phase: f32,
    pub speed: f32,
    pub pulse: f32,
    /// Cached world-space samples, refreshed every few frames as the globe
    /// rotates underneath.
    pub polyline: Vec<Vec3>,
}

/// Freestanding polyline following a synthetic tangential field.
pub struct FlowLine {
    pub points: Vec<Vec3>,
    pub phase: f32,
    pub speed: f32,
    pub pulse: f32,
}

pub struct Satellite {
    pub angle: f32,
    pub speed: f32,
}

/// Circular path offset from the sphere with dots travelling along it. Rings
/// do not rotate with the globe; only the satellite angles advance.
pub struct Ring {
    pub radius: f32,
    pub tilt: f32,
    pub satellites: Vec<Satellite>,
}

pub struct Star {
    pub pos: Vec3,
    pub tier: u8,
}

pub struct Scene {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub flow_lines: Vec<FlowLine>,
    pub rings: Vec<Ring>,
    pub stars: Vec<Star>,

    /// Nominal time accumulator, advanced by `time_step` per frame.
    pub time: f32,
    /// Rotation about the vertical axis, wrapped to [0, TAU).
    pub rotation: f32,
    /// Smoothed view values and the targets the input layer writes.
    pub tilt: f32,
    pub target_tilt: f32,
    pub spin_offset: f32,
    pub target_spin: f32,
    pub zoom: f32,
    pub target_zoom: f32,

    frame: u64,
    rotation_step: f32,
    time_step: f32,
}

impl Scene {
    /// Build the full scene: Fibonacci-sphere nodes, threshold-selected
    /// short links, bounded-retry long arcs, flow lines, rings, starfield.
    pub fn build(config: &SceneConfig, rng: &mut StdRng) -> Self {
        Self::build_from_points(geom::fibonacci_sphere(config.nodes), config, rng)
    }

    /// Build from explicit node directions (normalized here). Everything
    /// else is generated exactly as in `build`.
    pub fn build_from_points(dirs: Vec<Vec3>, config: &SceneConfig, rng: &mut StdRng) -> Self {
        let nodes: Vec<Node> = dirs
            .into_iter()
            .map(|d| Node {
                dir: d.normalized(),
                radius: SURFACE_RADIUS + rng.gen_range(0.0..=NODE_ALTITUDE_JITTER),
                phase: rng.gen_range(0.0..TAU),
                speed: rng.gen_range(PULSE_SPEED_MIN..PULSE_SPEED_MAX),
                pulse: 1.0,
            })
            .collect();

        let mut connections = short_links(&nodes, config, rng);
        connections.extend(long_arcs(&nodes, config, rng));

        let mut scene = Self {
            nodes,
            connections,
            flow_lines: flow_lines(config, rng),
            rings: rings(config, rng),
            stars: starfield(config.stars, rng),
            time: 0.0,
            rotation: 0.0,
            tilt: 0.0,
            target_tilt: 0.0,
            spin_offset: 0.0,
            target_spin: 0.0,
            zoom: 1.0,
            target_zoom: 1.0,
            frame: 0,
            rotation_step: config.rotation_step,
            time_step: config.time_step,
        };
        scene.refresh_arcs();
        scene
    }

    /// One frame worth of animation. Bounded work only; the expensive parts
    /// run on their own intervals.
    pub fn advance(&mut self) {
        self.frame += 1;
        self.time += self.time_step;
        self.rotation = (self.rotation + self.rotation_step).rem_euclid(TAU);

        self.tilt += (self.target_tilt - self.tilt) * PAN_BLEND;
        self.spin_offset += (self.target_spin - self.spin_offset) * PAN_BLEND;
        self.zoom += (self.target_zoom - self.zoom) * ZOOM_BLEND;

        if self.frame % NODE_PULSE_INTERVAL == 0 {
            let time = self.time;
            for node in &mut self.nodes {
                node.pulse = 0.5 + 0.5 * (time * node.speed + node.phase).sin();
            }
        }

        if self.frame % LINK_PULSE_INTERVAL == 0 {
            let time = self.time;
            for conn in &mut self.connections {
                conn.pulse = 0.5 + 0.5 * (time * conn.speed + conn.phase).sin();
            }
            for flow in &mut self.flow_lines {
                flow.pulse = 0.5 + 0.5 * (time * flow.speed + flow.phase).sin();
            }
        }

        if self.frame % ARC_REFRESH_INTERVAL == 0 {
            self.refresh_arcs();
        }

        for ring in &mut self.rings {
            for sat in &mut ring.satellites {
                sat.angle = (sat.angle + sat.speed).rem_euclid(TAU);
            }
        }
    }

    /// Recompute every connection polyline from its endpoints under the
    /// current rotation. Repeating this without changing the rotation
    /// produces identical curves.
    pub fn refresh_arcs(&mut self) {
        let spin = self.rotation + self.spin_offset;
        for conn in &mut self.connections {
            let pa = geom::rotate_y(self.nodes[conn.a].dir, spin);
            let pb = geom::rotate_y(self.nodes[conn.b].dir, spin);
            conn.polyline = arc_polyline(pa, pb, conn.long);
        }
    }

    /// World-space position of a node under the current rotation.
    pub fn node_position(&self, index: usize) -> Vec3 {
        let node = &self.nodes[index];
        geom::rotate_y(node.dir, self.rotation + self.spin_offset).scale(node.radius)
    }

    /// World-space position of a satellite on its ring.
    pub fn satellite_position(ring: &Ring, sat: &Satellite) -> Vec3 {
        let flat = Vec3::new(
            sat.angle.cos() * ring.radius,
            0.0,
            sat.angle.sin() * ring.radius,
        );
        tilt_x(flat, ring.tilt)
    }

    /// Points along a ring's circle, for drawing the faint path itself.
    pub fn ring_points(ring: &Ring, samples: usize) -> Vec<Vec3> {
        (0..samples)
            .map(|i| {
                let a = i as f32 / samples as f32 * TAU;
                tilt_x(
                    Vec3::new(a.cos() * ring.radius, 0.0, a.sin() * ring.radius),
                    ring.tilt,
                )
            })
            .collect()
    }
}

fn tilt_x(v: Vec3, angle: f32) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3::new(v.x, v.y * cos_a - v.z * sin_a, v.y * sin_a + v.z * cos_a)
}

/// Great-circle polyline between two unit directions, lifted above the
/// surface by a sine bulge peaking at the midpoint.
pub fn arc_polyline(a: Vec3, b: Vec3, long: bool) -> Vec<Vec3> {
    let bulge = if long { LONG_ARC_BULGE } else { SHORT_ARC_BULGE };
    (0..=ARC_SEGMENTS)
        .map(|i| {
            let t = i as f32 / ARC_SEGMENTS as f32;
            let altitude = SURFACE_RADIUS * (1.0 + bulge * (t * PI).sin());
            geom::slerp(a, b, t).scale(altitude)
        })
        .collect()
}

/// Short links: each node is tested against a bounded candidate set and
/// connected to partners within the chord threshold, capped per node. Small
/// scenes (candidate budget covers everyone) scan all pairs so the result is
/// independent of draw order.
fn short_links(nodes: &[Node], config: &SceneConfig, rng: &mut StdRng) -> Vec<Connection> {
    let mut links = Vec::new();
    if nodes.len() < 2 {
        return links;
    }

    let mut per_node = vec![0usize; nodes.len()];
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let exhaustive = config.candidate_sample >= nodes.len() - 1;

    for a in 0..nodes.len() {
        let candidates: Vec<usize> = if exhaustive {
            (0..nodes.len()).filter(|&b| b != a).collect()
        } else {
            (0..config.candidate_sample)
                .map(|_| rng.gen_range(0..nodes.len()))
                .collect()
        };

        for b in candidates {
            if b == a || per_node[a] >= config.links_per_node {
                continue;
            }
            if per_node[b] >= config.links_per_node {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if seen.contains(&key) {
                continue;
            }
            if geom::chord(nodes[a].dir, nodes[b].dir) < config.connect_chord {
                seen.insert(key);
                per_node[a] += 1;
                per_node[b] += 1;
                links.push(Connection {
                    a,
                    b,
                    long: false,
                    phase: rng.gen_range(0.0..TAU),
                    speed: rng.gen_range(PULSE_SPEED_MIN..PULSE_SPEED_MAX),
                    pulse: 1.0,
                    polyline: Vec::new(),
                });
            }
        }
    }
    links
}

/// Long arcs: redraw random pairs until the chord clears the long-distance
/// threshold, giving up after the retry budget and keeping the last pair.
fn long_arcs(nodes: &[Node], config: &SceneConfig, rng: &mut StdRng) -> Vec<Connection> {
    let mut arcs = Vec::new();
    if nodes.len() < 2 {
        return arcs;
    }

    for _ in 0..config.long_arcs {
        let mut a = rng.gen_range(0..nodes.len());
        let mut b = rng.gen_range(0..nodes.len());
        for _ in 0..config.long_arc_attempts {
            if a != b && geom::chord(nodes[a].dir, nodes[b].dir) > config.long_chord {
                break;
            }
            a = rng.gen_range(0..nodes.len());
            b = rng.gen_range(0..nodes.len());
        }
        if a == b {
            // retry budget exhausted on a degenerate draw
            b = (a + 1) % nodes.len();
        }
        arcs.push(Connection {
            a,
            b,
            long: true,
            phase: rng.gen_range(0.0..TAU),
            speed: rng.gen_range(PULSE_SPEED_MIN..PULSE_SPEED_MAX),
            pulse: 1.0,
            polyline: Vec::new(),
        });
    }
    arcs
}

/// Flow lines circulate around a random axis: each step adds the tangential
/// field direction `axis x p` and renormalizes back onto the surface.
fn flow_lines(config: &SceneConfig, rng: &mut StdRng) -> Vec<FlowLine> {
    (0..config.flow_lines)
        .map(|_| {
            let axis = random_direction(rng);
            let mut p = random_direction(rng);
            let mut points = Vec::with_capacity(FLOW_SEGMENTS);
            for _ in 0..FLOW_SEGMENTS {
                points.push(p.scale(SURFACE_RADIUS));
                let tangent = axis.cross(p).normalized();
                p = (p + tangent.scale(FLOW_STEP)).normalized();
            }
            FlowLine {
                points,
                phase: rng.gen_range(0.0..TAU),
                speed: rng.gen_range(PULSE_SPEED_MIN..PULSE_SPEED_MAX),
                pulse: 1.0,
            }
        })
        .collect()
}

fn rings(config: &SceneConfig, rng: &mut StdRng) -> Vec<Ring> {
    (0..config.rings)
        .map(|i| {
            let radius = RING_BASE_RADIUS + i as f32 * RING_SPACING;
            let tilt = (i as f32 - (config.rings as f32 - 1.0) / 2.0) * RING_TILT_STEP;
            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            let satellites = (0..config.satellites_per_ring)
                .map(|s| Satellite {
                    angle: s as f32 / config.satellites_per_ring.max(1) as f32 * TAU
                        + rng.gen_range(0.0..0.2),
                    speed: SATELLITE_SPEED * direction,
                })
                .collect();
            Ring {
                radius,
                tilt,
                satellites,
            }
        })
        .collect()
}

fn starfield(count: usize, rng: &mut StdRng) -> Vec<Star> {
    (0..count)
        .map(|_| {
            let radius = rng.gen_range(STAR_RADIUS_MIN..STAR_RADIUS_MAX);
            Star {
                pos: random_direction(rng).scale(radius),
                tier: rng.gen_range(0..3),
            }
        })
        .collect()
}

/// Uniform random unit direction: uniform height in [-1, 1], uniform azimuth.
fn random_direction(rng: &mut StdRng) -> Vec3 {
    let y: f32 = rng.gen_range(-1.0..1.0f32);
    let azimuth = rng.gen_range(0.0..TAU);
    let r = (1.0 - y * y).max(0.0).sqrt();
    Vec3::new(r * azimuth.cos(), y, r * azimuth.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-4;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn small_config() -> SceneConfig {
        SceneConfig {
            nodes: 200,
            stars: 300,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn surface_positions_stay_on_their_radius() {
        let mut rng = seeded();
        let scene = Scene::build(&small_config(), &mut rng);

        for (i, node) in scene.nodes.iter().enumerate() {
            let pos = scene.node_position(i);
            assert!((pos.length() / node.radius - 1.0).abs() < TOL);
            assert!(node.radius >= SURFACE_RADIUS);
            assert!(node.radius <= SURFACE_RADIUS + NODE_ALTITUDE_JITTER + TOL);
        }
        for flow in &scene.flow_lines {
            for p in &flow.points {
                assert!((p.length() / SURFACE_RADIUS - 1.0).abs() < TOL);
            }
        }
        for star in &scene.stars {
            let r = star.pos.length();
            assert!(r >= STAR_RADIUS_MIN - TOL && r <= STAR_RADIUS_MAX + TOL);
        }
    }

    #[test]
    fn short_links_respect_threshold_and_cap() {
        let mut rng = seeded();
        let config = small_config();
        let scene = Scene::build(&config, &mut rng);

        let mut per_node = vec![0usize; scene.nodes.len()];
        for conn in scene.connections.iter().filter(|c| !c.long) {
            let d = geom::chord(scene.nodes[conn.a].dir, scene.nodes[conn.b].dir);
            assert!(d < config.connect_chord, "short link spans chord {}", d);
            per_node[conn.a] += 1;
            per_node[conn.b] += 1;
        }
        for count in per_node {
            assert!(count <= config.links_per_node);
        }
    }

    #[test]
    fn long_arcs_clear_threshold_when_budget_allows() {
        let mut rng = seeded();
        let config = small_config();
        let scene = Scene::build(&config, &mut rng);

        let long: Vec<_> = scene.connections.iter().filter(|c| c.long).collect();
        assert_eq!(long.len(), config.long_arcs);
        // with 200 spread-out nodes and 40 retries, every draw should succeed
        for conn in long {
            let d = geom::chord(scene.nodes[conn.a].dir, scene.nodes[conn.b].dir);
            assert!(d > config.long_chord);
        }
    }

    #[test]
    fn exhausted_retry_budget_still_yields_arcs() {
        let mut rng = seeded();
        let config = SceneConfig {
            nodes: 50,
            long_arcs: 8,
            long_chord: 3.0, // impossible: chords max out at 2.0
            long_arc_attempts: 5,
            stars: 0,
            ..SceneConfig::default()
        };
        let scene = Scene::build(&config, &mut rng);
        let long: Vec<_> = scene.connections.iter().filter(|c| c.long).collect();
        assert_eq!(long.len(), config.long_arcs);
        for conn in long {
            assert_ne!(conn.a, conn.b);
            assert!(!conn.polyline.is_empty());
        }
    }

    #[test]
    fn four_known_nodes_connect_exactly_as_expected() {
        // four cube corners projected to the sphere: corner 0 sits at chord
        // 2/sqrt(3) ~ 1.155 from each of the others, the rest sit at
        // 2*sqrt(2)/sqrt(3) ~ 1.633 from each other
        let s = 1.0 / 3.0f32.sqrt();
        let dirs = vec![
            Vec3::new(s, s, s),
            Vec3::new(s, s, -s),
            Vec3::new(s, -s, s),
            Vec3::new(-s, s, s),
        ];
        let config = SceneConfig {
            nodes: 4,
            connect_chord: 1.2,
            links_per_node: 8,
            candidate_sample: 8, // covers all pairs: selection is exhaustive
            long_arcs: 0,
            flow_lines: 0,
            rings: 0,
            stars: 0,
            ..SceneConfig::default()
        };
        let mut rng = seeded();
        let scene = Scene::build_from_points(dirs, &config, &mut rng);

        let mut pairs: Vec<(usize, usize)> = scene
            .connections
            .iter()
            .map(|c| (c.a.min(c.b), c.a.max(c.b)))
            .collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn hundred_frames_accumulate_exact_rotation() {
        let mut rng = seeded();
        let config = small_config();
        let mut scene = Scene::build(&config, &mut rng);

        for _ in 0..100 {
            scene.advance();
        }
        let expected = (100.0 * config.rotation_step).rem_euclid(TAU);
        assert!((scene.rotation - expected).abs() < 1e-3);

        // nothing drifted off the sphere
        for (i, node) in scene.nodes.iter().enumerate() {
            let pos = scene.node_position(i);
            assert!((pos.length() / node.radius - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn refreshed_arcs_match_rotated_endpoints() {
        let mut rng = seeded();
        let config = small_config();
        let mut scene = Scene::build(&config, &mut rng);

        scene.rotation = 1.2345;
        scene.refresh_arcs();

        for conn in &scene.connections {
            let pa = geom::rotate_y(scene.nodes[conn.a].dir, scene.rotation);
            let pb = geom::rotate_y(scene.nodes[conn.b].dir, scene.rotation);
            let first = conn.polyline.first().unwrap().normalized();
            let last = conn.polyline.last().unwrap().normalized();
            assert!(geom::chord(first, pa) < TOL);
            assert!(geom::chord(last, pb) < TOL);
            for p in &conn.polyline {
                // stays within the bulge band above the surface
                let r = p.length();
                assert!(r >= SURFACE_RADIUS - TOL);
                assert!(r <= SURFACE_RADIUS * (1.0 + LONG_ARC_BULGE) + TOL);
            }
        }
    }

    #[test]
    fn refresh_is_idempotent_under_identical_rotation() {
        let mut rng = seeded();
        let mut scene = Scene::build(&small_config(), &mut rng);

        scene.rotation = 0.7;
        scene.refresh_arcs();
        let snapshot: Vec<Vec<Vec3>> =
            scene.connections.iter().map(|c| c.polyline.clone()).collect();

        scene.refresh_arcs();
        for (conn, before) in scene.connections.iter().zip(&snapshot) {
            for (p, q) in conn.polyline.iter().zip(before) {
                assert!(geom::chord(*p, *q) < TOL);
            }
        }
    }

    #[test]
    fn pan_smoothing_converges_toward_target() {
        let mut rng = seeded();
        let mut scene = Scene::build(
            &SceneConfig {
                nodes: 16,
                stars: 0,
                ..SceneConfig::default()
            },
            &mut rng,
        );
        scene.target_tilt = 0.5;
        for _ in 0..200 {
            scene.advance();
        }
        assert!((scene.tilt - 0.5).abs() < 1e-3);
    }

    #[test]
    fn satellites_advance_at_constant_speed() {
        let mut rng = seeded();
        let mut scene = Scene::build(
            &SceneConfig {
                nodes: 16,
                stars: 0,
                rings: 1,
                satellites_per_ring: 2,
                ..SceneConfig::default()
            },
            &mut rng,
        );
        let start = scene.rings[0].satellites[0].angle;
        let speed = scene.rings[0].satellites[0].speed;
        for _ in 0..50 {
            scene.advance();
        }
        let expected = (start + 50.0 * speed).rem_euclid(TAU);
        assert!((scene.rings[0].satellites[0].angle - expected).abs() < 1e-3);

        // satellite stays on its ring
        let ring = &scene.rings[0];
        let pos = Scene::satellite_position(ring, &ring.satellites[0]);
        assert!((pos.length() - ring.radius).abs() < TOL);
    }
}
