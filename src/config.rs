/// Scene construction and animation parameters.
///
/// All counts and thresholds the builder consumes live here so the CLI and
/// the settings file have one place to override them.
#[derive(Clone)]
pub struct SceneConfig {
    /// Surface node count (hundreds to ~1200 look right in a terminal).
    pub nodes: usize,
    /// Chord-distance threshold below which two nodes get a short link.
    pub connect_chord: f32,
    /// Cap on links originating from a single node.
    pub links_per_node: usize,
    /// How many random partners each node is tested against (bounds the
    /// pairing cost well under n^2 at large node counts).
    pub candidate_sample: usize,
    /// Number of long "intercontinental" arcs.
    pub long_arcs: usize,
    /// Minimum chord distance a long arc should span.
    pub long_chord: f32,
    /// Redraw budget per long arc before settling for the last pair drawn.
    pub long_arc_attempts: usize,
    /// Freestanding flow lines tracing the tangential field.
    pub flow_lines: usize,
    /// Orbital rings around the sphere.
    pub rings: usize,
    /// Satellite dots travelling on each ring.
    pub satellites_per_ring: usize,
    /// Background starfield point count.
    pub stars: usize,
    /// Rotation accumulated per frame, radians.
    pub rotation_step: f32,
    /// Nominal time advanced per frame (not wall-clock locked).
    pub time_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            nodes: 900,
            connect_chord: 0.32,
            links_per_node: 3,
            candidate_sample: 24,
            long_arcs: 24,
            long_chord: 1.5,
            long_arc_attempts: 40,
            flow_lines: 10,
            rings: 2,
            satellites_per_ring: 3,
            stars: 2400,
            rotation_step: 0.0035,
            time_step: 0.03,
        }
    }
}
