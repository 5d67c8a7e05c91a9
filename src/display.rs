//! Display boundary
//!
//! The engine never renders anything. Box outlines and triangle fragments are
//! handed to a [`DisplaySink`] owned by the caller, and [`OutlineVertex`]
//! gives a GPU-ready line list for sinks that upload geometry.

use bytemuck::{Pod, Zeroable};

use crate::consts::DISPLAY_MARGIN;
use crate::geom::{Point3, Triangle, Vector3};
use crate::obb::OrientedBox;

/// Receives everything the engine wants shown.
pub trait DisplaySink {
    fn draw_outline(&mut self, outline: &BoxOutline);

    fn draw_triangle(&mut self, triangle: &Triangle);

    /// One-line status text, e.g. a triangle count.
    fn status(&mut self, _message: &str) {}
}

/// A box drawn as a base rectangle extruded along the box Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxOutline {
    /// Corners 0, 1, 3, 2 of the padded box, in loop order.
    pub base: [Point3; 4],
    /// Extrusion from the base to the top rectangle.
    pub extrusion: Vector3,
}

impl BoxOutline {
    pub fn top(&self) -> [Point3; 4] {
        self.base.map(|p| p + self.extrusion)
    }

    /// Bottom loop, top loop, then the four verticals.
    pub fn edges(&self) -> [[Point3; 2]; 12] {
        let b = self.base;
        let t = self.top();
        [
            [b[0], b[1]],
            [b[1], b[2]],
            [b[2], b[3]],
            [b[3], b[0]],
            [t[0], t[1]],
            [t[1], t[2]],
            [t[2], t[3]],
            [t[3], t[0]],
            [b[0], t[0]],
            [b[1], t[1]],
            [b[2], t[2]],
            [b[3], t[3]],
        ]
    }

    /// Bottom and top rectangles.
    pub fn caps(&self) -> [[Point3; 4]; 2] {
        [self.base, self.top()]
    }

    /// 24 vertices forming a line list over [`BoxOutline::edges`].
    pub fn line_vertices(&self, color: [f32; 4]) -> Vec<OutlineVertex> {
        self.edges()
            .iter()
            .flatten()
            .map(|p| OutlineVertex::new(p.as_vec3().to_array(), color))
            .collect()
    }
}

impl OrientedBox {
    /// Outline of this box padded by [`DISPLAY_MARGIN`].
    pub fn to_outline(&self) -> BoxOutline {
        let padded = self.enlarged(DISPLAY_MARGIN);
        let c = padded.corners();
        BoxOutline {
            base: [c[0], c[1], c[3], c[2]],
            extrusion: padded.z_axis() * (2.0 * padded.half_sizes.z),
        }
    }
}

/// Line vertex with position and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OutlineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl OutlineVertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// A sink that keeps everything it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub outlines: Vec<BoxOutline>,
    pub triangles: Vec<Triangle>,
    pub messages: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.outlines.clear();
        self.triangles.clear();
        self.messages.clear();
    }
}

impl DisplaySink for RecordingSink {
    fn draw_outline(&mut self, outline: &BoxOutline) {
        self.outlines.push(*outline);
    }

    fn draw_triangle(&mut self, triangle: &Triangle) {
        self.triangles.push(*triangle);
    }

    fn status(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}
