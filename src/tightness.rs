//! Face tightness classification.
//!
//! A face is box-like when its true surface area fills more than π/4 of its
//! box area. Box-like faces can skip fine meshing; the rest are curved and
//! need it.

use crate::consts::{FACE_ENLARGE_MARGIN, FLAT_BOX_SLACK, SHAPE_ENLARGE_MARGIN, TIGHTNESS_THRESHOLD};
use crate::error::Result;
use crate::kernel::CadKernel;
use crate::obb::OrientedBox;

/// Area of `bbox` as seen by the classifier.
///
/// A box with any half size below `enlarge_margin + 0.0005` is flat and
/// counts as its largest rectangle; any other box counts its full prism
/// surface.
pub fn box_surface_area(bbox: &OrientedBox, enlarge_margin: f64) -> f64 {
    let h = bbox.half_sizes;
    let xy = 4.0 * h.x * h.y;
    let xz = 4.0 * h.x * h.z;
    let yz = 4.0 * h.y * h.z;

    if is_flat(bbox, enlarge_margin) {
        xy.max(xz).max(yz)
    } else {
        2.0 * (xy + xz + yz)
    }
}

pub fn is_flat(bbox: &OrientedBox, enlarge_margin: f64) -> bool {
    bbox.half_sizes.min_element() < enlarge_margin + FLAT_BOX_SLACK
}

/// Classifies faces as box-like or curved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TightnessClassifier {
    /// Margin the classified boxes were enlarged with. Default: 0.0001.
    pub enlarge_margin: f64,
}

impl Default for TightnessClassifier {
    fn default() -> Self {
        Self::shape()
    }
}

impl TightnessClassifier {
    pub fn new(enlarge_margin: f64) -> Self {
        Self { enlarge_margin }
    }

    /// For boxes computed on whole shapes.
    pub fn shape() -> Self {
        Self::new(SHAPE_ENLARGE_MARGIN)
    }

    /// For boxes computed on single faces.
    pub fn face() -> Self {
        Self::new(FACE_ENLARGE_MARGIN)
    }

    pub fn box_area(&self, bbox: &OrientedBox) -> f64 {
        box_surface_area(bbox, self.enlarge_margin)
    }

    /// `face_area / box_area`; zero when the box has no area.
    pub fn fill_ratio(&self, face_area: f64, bbox: &OrientedBox) -> f64 {
        let box_area = self.box_area(bbox);
        if box_area > 0.0 {
            face_area / box_area
        } else {
            0.0
        }
    }

    /// Pure form of [`TightnessClassifier::is_box_like`].
    pub fn is_box_like_area(&self, face_area: f64, bbox: &OrientedBox) -> bool {
        self.fill_ratio(face_area, bbox) > TIGHTNESS_THRESHOLD
    }

    /// Ask the kernel for the face area and classify the face.
    pub fn is_box_like<K: CadKernel>(
        &self,
        kernel: &K,
        face: &K::Face,
        face_box: &OrientedBox,
    ) -> Result<bool> {
        let face_area = kernel.face_area(face)?;
        let box_like = self.is_box_like_area(face_area, face_box);
        tracing::trace!(
            face_area,
            box_area = self.box_area(face_box),
            box_like,
            "classified face"
        );
        Ok(box_like)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::f64::consts::PI;

    #[test]
    fn test_flat_regime_uses_largest_face() {
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(5.0, 5.0, 0.00001));
        let area = box_surface_area(&b, SHAPE_ENLARGE_MARGIN);
        assert!((area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_solid_regime_uses_prism() {
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::ONE);
        assert!((box_surface_area(&b, SHAPE_ENLARGE_MARGIN) - 24.0).abs() < 1e-12);
        assert!((box_surface_area(&b, SHAPE_ENLARGE_MARGIN) - b.prism_area()).abs() < 1e-12);
    }

    #[test]
    fn test_flat_threshold_depends_on_margin() {
        // 0.0012 is flat for the face margin (0.0015) but not for the shape margin (0.0006).
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0012));
        assert!(is_flat(&b, FACE_ENLARGE_MARGIN));
        assert!(!is_flat(&b, SHAPE_ENLARGE_MARGIN));
    }

    #[test]
    fn test_square_face_is_box_like() {
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(5.0, 5.0, 0.0));
        let classifier = TightnessClassifier::shape();
        assert!((classifier.fill_ratio(100.0, &b) - 1.0).abs() < 1e-12);
        assert!(classifier.is_box_like_area(100.0, &b));
    }

    #[test]
    fn test_unit_sphere_is_curved() {
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::ONE);
        let classifier = TightnessClassifier::shape();
        let ratio = classifier.fill_ratio(4.0 * PI, &b);
        assert!((ratio - 4.0 * PI / 24.0).abs() < 1e-12);
        assert!(!classifier.is_box_like_area(4.0 * PI, &b));
    }

    #[test]
    fn test_threshold_is_strict() {
        // Flat 1x1 rectangle: box area 1.
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(0.5, 0.5, 0.0));
        let classifier = TightnessClassifier::face();
        assert!(!classifier.is_box_like_area(TIGHTNESS_THRESHOLD, &b));
        assert!(classifier.is_box_like_area(TIGHTNESS_THRESHOLD + 1e-9, &b));
        // A disk inscribed in the square sits exactly on the threshold.
        assert!(!classifier.is_box_like_area(PI * 0.25, &b));
    }

    #[test]
    fn test_zero_area_box_is_not_box_like() {
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::ZERO);
        assert!(!TightnessClassifier::default().is_box_like_area(1.0, &b));
    }
}
