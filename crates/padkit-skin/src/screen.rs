//! Game screen placement.
//!
//! A skin either declares where the emulated screen goes or leaves it to
//! the engine, which then puts a screen of the core's aspect ratio in the
//! space above the controller.

use padkit_types::config::EngineConfig;
use padkit_types::geometry::{Rect, Size};

use crate::descriptor::{Screen, ScreenPlacement, SkinDescriptor};
use crate::layout::Layout;
use crate::traits::SkinTraits;

/// Receives the game screen frame every time it is recomputed.
pub trait ScreenFrameObserver {
    /// `None` means the screen currently has no place in the container.
    fn screen_frame_changed(&mut self, frame: Option<Rect>);
}

/// Computes screen frames in container space.
#[derive(Debug, Clone)]
pub struct ScreenLocator {
    default_aspect: Size,
}

impl Default for ScreenLocator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ScreenLocator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            default_aspect: config.default_screen_aspect,
        }
    }

    /// Frame of the primary game screen.
    ///
    /// Uses the first declared screen, then the representation's
    /// `gameScreenFrame`, then the computed default. `aspect` overrides the
    /// configured default aspect ratio (pass the core's video size).
    pub fn screen_frame(
        &self,
        skin: &SkinDescriptor,
        traits: SkinTraits,
        layout: &Layout,
        container: Size,
        aspect: Option<Size>,
    ) -> Option<Rect> {
        if let Some(screen) = skin.screens(traits).and_then(|s| s.first()) {
            return Some(place(screen, layout, container));
        }
        if let Some(frame) = skin.game_screen_frame(traits) {
            return Some(frame.denormalized_in(layout.rect()));
        }
        self.default_frame(layout, aspect)
    }

    /// Frames of every declared screen, in declaration order. Falls back to
    /// the single frame from [`screen_frame`](Self::screen_frame).
    pub fn screen_frames(
        &self,
        skin: &SkinDescriptor,
        traits: SkinTraits,
        layout: &Layout,
        container: Size,
        aspect: Option<Size>,
    ) -> Vec<Rect> {
        match skin.screens(traits) {
            Some(screens) if !screens.is_empty() => {
                screens.iter().map(|s| place(s, layout, container)).collect()
            },
            _ => self
                .screen_frame(skin, traits, layout, container, aspect)
                .into_iter()
                .collect(),
        }
    }

    /// A screen spanning the skin's width, centered in the band above the
    /// skin's top edge, shrunk to fit if the band is too short.
    pub fn default_frame(&self, layout: &Layout, aspect: Option<Size>) -> Option<Rect> {
        let aspect = aspect.filter(Size::is_valid).unwrap_or(self.default_aspect);
        let band = layout.y_offset;
        if !band.is_finite() || band <= 0.0 || !aspect.is_valid() {
            return None;
        }

        let ratio = aspect.aspect_ratio();
        let mut width = layout.width;
        let mut height = width / ratio;
        if height > band {
            height = band;
            width = height * ratio;
        }
        Some(Rect::new(
            layout.x_offset + (layout.width - width) / 2.0,
            (band - height) / 2.0,
            width,
            height,
        ))
    }
}

fn place(screen: &Screen, layout: &Layout, container: Size) -> Rect {
    match screen.placement {
        ScreenPlacement::Controller => screen.output_frame.denormalized_in(layout.rect()),
        ScreenPlacement::App => screen.output_frame.denormalized_in(Rect::from_size(container)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::descriptor::TraitRepresentation;
    use crate::descriptor::test_support::skin_with_representations;
    use crate::layout::calculate_layout;
    use crate::traits::{Device, DisplayType, Orientation};

    const EPS: f64 = 1e-9;

    const TRAITS: SkinTraits =
        SkinTraits::new(Device::Phone, DisplayType::EdgeToEdge, Orientation::Portrait);

    fn assert_rect_eq(a: Rect, b: Rect) {
        assert!(
            (a.x - b.x).abs() < EPS
                && (a.y - b.y).abs() < EPS
                && (a.width - b.width).abs() < EPS
                && (a.height - b.height).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    fn skin(rep: TraitRepresentation) -> SkinDescriptor {
        skin_with_representations(HashMap::from([(TRAITS, rep)]))
    }

    fn base_rep() -> TraitRepresentation {
        TraitRepresentation {
            mapping_size: Some(Size::new(400.0, 400.0)),
            ..Default::default()
        }
    }

    fn phone_layout(container: Size) -> Layout {
        calculate_layout(
            Size::new(400.0, 400.0),
            container,
            Device::Phone,
            Orientation::Portrait,
        )
        .unwrap()
    }

    #[test]
    fn default_frame_centered_in_band() {
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frame = ScreenLocator::default()
            .screen_frame(&skin(base_rep()), TRAITS, &layout, container, None)
            .unwrap();
        // Band is 400 tall; a 4:3 screen 400 wide is 300 tall.
        assert_rect_eq(frame, Rect::new(0.0, 50.0, 400.0, 300.0));
    }

    #[test]
    fn default_frame_shrinks_to_band() {
        let container = Size::new(400.0, 550.0);
        let layout = phone_layout(container);
        let frame = ScreenLocator::default().default_frame(&layout, None).unwrap();
        assert_rect_eq(frame, Rect::new(100.0, 0.0, 200.0, 150.0));
    }

    #[test]
    fn default_frame_uses_aspect_override() {
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frame = ScreenLocator::default()
            .default_frame(&layout, Some(Size::new(240.0, 160.0)))
            .unwrap();
        let height = 400.0 / 1.5;
        assert_rect_eq(frame, Rect::new(0.0, (400.0 - height) / 2.0, 400.0, height));
    }

    #[test]
    fn default_frame_stays_above_centered_skin() {
        let container = Size::new(400.0, 1000.0);
        let layout = calculate_layout(
            Size::new(400.0, 400.0),
            container,
            Device::Tablet,
            Orientation::Portrait,
        )
        .unwrap();
        assert_eq!(layout.y_offset, 300.0);
        let frame = ScreenLocator::default().default_frame(&layout, None).unwrap();
        assert!(frame.max_y() <= layout.y_offset + EPS, "{frame:?} overlaps {layout:?}");
        assert_rect_eq(frame, Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn no_band_no_frame() {
        let container = Size::new(400.0, 400.0);
        let layout = phone_layout(container);
        assert!(ScreenLocator::default().default_frame(&layout, None).is_none());
    }

    #[test]
    fn controller_screen_follows_layout() {
        let mut rep = base_rep();
        rep.screens = Some(vec![Screen {
            id: "s0".into(),
            input_frame: None,
            output_frame: Rect::new(0.0, 0.0, 1.0, 0.5),
            placement: ScreenPlacement::Controller,
        }]);
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frame = ScreenLocator::default()
            .screen_frame(&skin(rep), TRAITS, &layout, container, None)
            .unwrap();
        assert_rect_eq(frame, Rect::new(0.0, 400.0, 400.0, 200.0));
    }

    #[test]
    fn app_screen_maps_onto_container() {
        let mut rep = base_rep();
        rep.screens = Some(vec![Screen {
            id: "s0".into(),
            input_frame: None,
            output_frame: Rect::new(0.0, 0.0, 1.0, 0.5),
            placement: ScreenPlacement::App,
        }]);
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frame = ScreenLocator::default()
            .screen_frame(&skin(rep), TRAITS, &layout, container, None)
            .unwrap();
        assert_rect_eq(frame, Rect::new(0.0, 0.0, 400.0, 400.0));
    }

    #[test]
    fn game_screen_frame_used_without_screens() {
        let mut rep = base_rep();
        rep.game_screen_frame = Some(Rect::new(0.25, 0.0, 0.5, 0.25));
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frame = ScreenLocator::default()
            .screen_frame(&skin(rep), TRAITS, &layout, container, None)
            .unwrap();
        assert_rect_eq(frame, Rect::new(100.0, 400.0, 200.0, 100.0));
    }

    #[test]
    fn dual_screens_in_order() {
        let mut rep = base_rep();
        rep.screens = Some(vec![
            Screen {
                id: "top".into(),
                input_frame: Some(Rect::new(0.0, 0.0, 256.0, 192.0)),
                output_frame: Rect::new(0.0, 0.0, 1.0, 0.5),
                placement: ScreenPlacement::Controller,
            },
            Screen {
                id: "bottom".into(),
                input_frame: Some(Rect::new(0.0, 192.0, 256.0, 192.0)),
                output_frame: Rect::new(0.0, 0.5, 1.0, 0.5),
                placement: ScreenPlacement::Controller,
            },
        ]);
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frames = ScreenLocator::default()
            .screen_frames(&skin(rep), TRAITS, &layout, container, None);
        assert_eq!(frames.len(), 2);
        assert_rect_eq(frames[1], Rect::new(0.0, 600.0, 400.0, 200.0));
    }

    #[test]
    fn screen_frames_falls_back_to_default() {
        let container = Size::new(400.0, 800.0);
        let layout = phone_layout(container);
        let frames = ScreenLocator::default()
            .screen_frames(&skin(base_rep()), TRAITS, &layout, container, None);
        assert_eq!(frames.len(), 1);
    }
}
