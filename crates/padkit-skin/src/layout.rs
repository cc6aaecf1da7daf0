//! Skin layout: placing the mapping-space canvas inside a container.

use serde::Serialize;

use padkit_types::geometry::{Point, Rect, Size};

use crate::traits::{Device, Orientation};

/// Where the scaled skin sits vertically inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Flush with the bottom edge (phone portrait: controller below the game).
    Bottom,
    /// Centered.
    Center,
}

impl VerticalAnchor {
    pub fn for_device(device: Device, orientation: Orientation) -> Self {
        match (device, orientation) {
            (Device::Phone, Orientation::Portrait) => VerticalAnchor::Bottom,
            _ => VerticalAnchor::Center,
        }
    }

    fn offset(&self, container_h: f64, child_h: f64) -> f64 {
        match self {
            VerticalAnchor::Bottom => container_h - child_h,
            VerticalAnchor::Center => (container_h - child_h) / 2.0,
        }
    }
}

/// The scale and offset mapping a skin canvas into a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Layout {
    /// The skin's rectangle in container space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x_offset, self.y_offset, self.width, self.height)
    }

    /// Map a mapping-space rectangle into container space.
    pub fn transform_rect(&self, frame: Rect) -> Rect {
        frame.scaled(self.scale).offset_by(self.x_offset, self.y_offset)
    }

    /// Map a container-space point back into mapping space.
    pub fn to_mapping_space(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.x_offset) / self.scale,
            (point.y - self.y_offset) / self.scale,
        )
    }
}

/// Compute the layout of a `mapping` canvas inside `container`.
///
/// Returns `None` when either size is non-positive or non-finite.
pub fn calculate_layout(
    mapping: Size,
    container: Size,
    device: Device,
    orientation: Orientation,
) -> Option<Layout> {
    if !mapping.is_valid() || !container.is_valid() {
        return None;
    }

    let fit_width = container.width / mapping.width;
    let fit_height = container.height / mapping.height;
    let anchor = VerticalAnchor::for_device(device, orientation);

    // Phone portrait fills the width unless that would overflow vertically,
    // which is exactly the smaller of the two ratios.
    let scale = fit_width.min(fit_height);

    let width = mapping.width * scale;
    let height = mapping.height * scale;
    Some(Layout {
        scale,
        width,
        height,
        x_offset: (container.width - width) / 2.0,
        y_offset: anchor.offset(container.height, height),
    })
}
