//! Seeded blob outlines.
//!
//! A blob is a closed smooth curve through `n` points placed around a
//! circle with seeded radial jitter:
//!
//! 1. `n` angles evenly spaced by 2π/n, starting at 0
//! 2. one draw per angle, mapped to `[-irregularity, irregularity]`, scales a
//!    base radius
//! 3. polar → Cartesian around the center of the `size × size` box
//! 4. a closed Catmull-Rom style fit turns the points into `n` cubic segments
//!
//! The output is a pure function of `(seed, params)`.
//!
//! ```
//! use tidbit::seed::Seed;
//! use tidbit::shape::{BlobParams, generate_blob};
//!
//! let path = generate_blob(Seed(7), &BlobParams::default());
//! assert!(path.to_svg_path().starts_with('M'));
//! ```

use std::f64::consts::TAU;
use std::fmt::{self, Write};

use crate::seed::{Generator, Seed};

pub const MIN_VERTICES: usize = 3;
pub const MAX_VERTICES: usize = 16;

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    fn scale(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

/// Blob generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlobParams {
    /// Number of outline vertices. Must be at least 3.
    pub vertices: usize,
    /// Radial jitter amplitude, 0.0 (circle) to 1.0.
    pub irregularity: f64,
    /// Curve tension, 0.0 (straight polygon) to 1.0 (Catmull-Rom).
    pub smoothness: f64,
    /// Width and height of the bounding box in pixels.
    pub size: f64,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            vertices: 6,
            irregularity: 0.4,
            smoothness: 0.8,
            size: 200.0,
        }
    }
}

impl BlobParams {
    /// Clamp every field into the range hosts are allowed to pass.
    ///
    /// [`generate_blob`] itself does not validate; hosts taking raw user input
    /// call this first. Non-finite floats fall back to the defaults.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let unit = |v: f64, fallback: f64| {
            if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                fallback
            }
        };
        let clamped = Self {
            vertices: self.vertices.clamp(MIN_VERTICES, MAX_VERTICES),
            irregularity: unit(self.irregularity, defaults.irregularity),
            smoothness: unit(self.smoothness, defaults.smoothness),
            size: if self.size.is_finite() && self.size > 0.0 {
                self.size
            } else {
                defaults.size
            },
        };
        if clamped != self {
            tracing::debug!(original = ?self, ?clamped, "blob params clamped");
        }
        clamped
    }

    /// Base radius before jitter. Keeps the widest jitter inside the box.
    fn base_radius(&self) -> f64 {
        self.size / 2.0 / (1.0 + self.irregularity)
    }

    fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }
}

/// One vector drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "cmd", rename_all = "lowercase"))]
pub enum PathCommand {
    Move { to: Point },
    Cubic { c1: Point, c2: Point, to: Point },
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::Move { to } => write!(f, "M{:.2},{:.2}", to.x, to.y),
            PathCommand::Cubic { c1, c2, to } => write!(
                f,
                "C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                c1.x, c1.y, c2.x, c2.y, to.x, to.y
            ),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

/// A closed blob outline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlobPath {
    pub size: f64,
    pub commands: Vec<PathCommand>,
}

impl BlobPath {
    /// Number of cubic segments in the outline.
    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::Cubic { .. }))
            .count()
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg_path(&self) -> String {
        let mut out = String::with_capacity(self.commands.len() * 48);
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{cmd}");
        }
        out
    }

    /// Standalone SVG document filling the blob with `fill`.
    ///
    /// `fill` is attribute-escaped; anything the host passes is safe.
    pub fn to_svg(&self, fill: &str) -> String {
        let fill = crate::markdown::escape_html(fill);
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {size} {size}\" width=\"{size}\" height=\"{size}\"><path d=\"{d}\" fill=\"{fill}\"/></svg>",
            size = self.size,
            d = self.to_svg_path(),
        )
    }
}

/// Place the jittered outline vertices.
///
/// Draws exactly `params.vertices` values from `rng`, one per vertex in
/// angle order.
pub fn blob_points(rng: &mut Generator, params: &BlobParams) -> Vec<Point> {
    let n = params.vertices;
    let step = TAU / n as f64;
    let base = params.base_radius();
    let center = params.center();

    (0..n)
        .map(|i| {
            let angle = i as f64 * step;
            let jitter = (rng.next_f64() * 2.0 - 1.0) * params.irregularity;
            let radius = base * (1.0 + jitter);
            // libm rather than the platform intrinsics: native and wasm32
            // builds must agree to the last bit.
            Point::new(
                center.x + radius * libm::cos(angle),
                center.y + radius * libm::sin(angle),
            )
        })
        .collect()
}

/// Fit a closed curve through `points`.
///
/// Segment `i` runs from `p[i]` to `p[i+1]`; its control points come from the
/// neighbours `p[i-1]` and `p[i+2]` (indices wrap). Requires at least 3 points.
pub fn closed_curve(points: &[Point], smoothness: f64) -> Vec<PathCommand> {
    let n = points.len();
    let mut commands = Vec::with_capacity(n + 2);
    let Some(&first) = points.first() else {
        return commands;
    };
    let k = smoothness / 6.0;

    commands.push(PathCommand::Move { to: first });
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];
        let after = points[(i + 2) % n];

        let c1 = curr.add(next.sub(prev).scale(k));
        let c2 = next.sub(after.sub(curr).scale(k));
        commands.push(PathCommand::Cubic { c1, c2, to: next });
    }
    commands.push(PathCommand::Close);
    commands
}

/// Generate a blob outline from a seed.
///
/// `params.vertices` must be at least 3; see [`BlobParams::clamped`].
pub fn generate_blob(seed: Seed, params: &BlobParams) -> BlobPath {
    let mut rng = Generator::new(seed);
    let points = blob_points(&mut rng, params);
    BlobPath {
        size: params.size,
        commands: closed_curve(&points, params.smoothness),
    }
}
