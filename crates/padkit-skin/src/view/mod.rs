//! `SkinView`: the stateful controller a host embeds.
//!
//! The view owns the current skin, requested traits and container size,
//! keeps the derived layout and screen frame up to date, and routes touches
//! through the input mapper to an [`InputSink`]. Several fingers may be down
//! at once; a command shared by two fingers is pressed once and released
//! when the last of them lets go.

use std::collections::HashMap;
use std::sync::Arc;

use padkit_types::config::EngineConfig;
use padkit_types::geometry::{Point, Rect, Size};
use padkit_types::input::{InputEvent, InputSink, TouchPhase};

use crate::descriptor::SkinDescriptor;
use crate::image::{ImageLoader, PendingImage, SkinImage};
use crate::layout::{Layout, calculate_layout};
use crate::mapper::{InputMapper, InputSession};
use crate::screen::{ScreenFrameObserver, ScreenLocator};
use crate::traits::{self, SkinTraits};

/// Touch id used by [`SkinView::handle_touch`].
pub const PRIMARY_TOUCH: u64 = 0;

/// Artwork state of the view.
#[derive(Debug, Clone, Default)]
pub enum ImageState {
    /// No artwork yet; draw a placeholder.
    #[default]
    Placeholder,
    Ready(Arc<SkinImage>),
    /// Loading failed; the placeholder stays.
    Failed,
}

/// A hit region for debug overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub button_id: String,
    pub frame: Rect,
    pub hit_frame: Rect,
}

pub struct SkinView {
    skin: Arc<SkinDescriptor>,
    mapper: InputMapper,
    locator: ScreenLocator,
    requested: SkinTraits,
    resolved: SkinTraits,
    container: Size,
    layout: Option<Layout>,
    screen_aspect: Option<Size>,
    screen_frame: Option<Rect>,
    sessions: HashMap<u64, InputSession>,
    held: HashMap<String, usize>,
    observers: Vec<Box<dyn ScreenFrameObserver>>,
    loader: Option<Arc<dyn ImageLoader>>,
    pending: Option<PendingImage>,
    image: ImageState,
}

impl SkinView {
    pub fn new(
        skin: Arc<SkinDescriptor>,
        requested: SkinTraits,
        container: Size,
        config: &EngineConfig,
    ) -> Self {
        let resolved = traits::resolve(requested, &skin);
        let mut view = Self {
            skin,
            mapper: InputMapper::new(config),
            locator: ScreenLocator::new(config),
            requested,
            resolved,
            container,
            layout: None,
            screen_aspect: None,
            screen_frame: None,
            sessions: HashMap::new(),
            held: HashMap::new(),
            observers: Vec::new(),
            loader: None,
            pending: None,
            image: ImageState::Placeholder,
        };
        view.recompute();
        view
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn skin(&self) -> &Arc<SkinDescriptor> {
        &self.skin
    }

    /// Traits the host asked for.
    pub fn requested_traits(&self) -> SkinTraits {
        self.requested
    }

    /// Traits actually in use after resolution.
    pub fn traits(&self) -> SkinTraits {
        self.resolved
    }

    pub fn container_size(&self) -> Size {
        self.container
    }

    /// Layout for the current traits and container, if any.
    pub fn current_layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Screen frame last computed and broadcast.
    pub fn current_screen_frame(&self) -> Option<Rect> {
        self.screen_frame
    }

    /// Resolve `requested` against the current skin.
    pub fn resolve_trait(&self, requested: SkinTraits) -> SkinTraits {
        traits::resolve(requested, &self.skin)
    }

    /// Layout of the current skin for arbitrary traits and container.
    pub fn layout(&self, traits: SkinTraits, container: Size) -> Option<Layout> {
        let mapping = self.skin.mapping_size(traits)?;
        calculate_layout(mapping, container, traits.device, traits.orientation)
    }

    /// Primary screen frame for arbitrary traits and container.
    pub fn screen_frame(&self, traits: SkinTraits, container: Size) -> Option<Rect> {
        let layout = self.layout(traits, container)?;
        self.locator
            .screen_frame(&self.skin, traits, &layout, container, self.screen_aspect)
    }

    /// All screen frames for the current state.
    pub fn screen_frames(&self) -> Vec<Rect> {
        match self.layout {
            Some(ref layout) => self.locator.screen_frames(
                &self.skin,
                self.resolved,
                layout,
                self.container,
                self.screen_aspect,
            ),
            None => Vec::new(),
        }
    }

    /// Button and hit regions in container space, for debug overlays.
    pub fn debug_hit_regions(&self) -> Vec<HitRegion> {
        let (Some(layout), Some(buttons)) = (self.layout, self.skin.buttons(self.resolved)) else {
            return Vec::new();
        };
        buttons
            .iter()
            .map(|b| HitRegion {
                button_id: b.id.clone(),
                frame: layout.transform_rect(b.frame),
                hit_frame: self.mapper.hit_region(b, &layout),
            })
            .collect()
    }

    /// Commands currently held by any finger.
    pub fn held_commands(&self) -> Vec<&str> {
        let mut held: Vec<&str> = self.held.keys().map(String::as_str).collect();
        held.sort_unstable();
        held
    }

    pub fn image_state(&self) -> &ImageState {
        &self.image
    }

    // -----------------------------------------------------------------------
    // State changes
    // -----------------------------------------------------------------------

    pub fn set_container_size(&mut self, container: Size) {
        if self.container != container {
            self.container = container;
            self.recompute();
        }
    }

    pub fn set_traits(&mut self, requested: SkinTraits) {
        self.requested = requested;
        self.recompute();
    }

    pub fn set_skin(&mut self, skin: Arc<SkinDescriptor>) {
        let previous = self.resolved;
        self.skin = skin;
        self.recompute();
        if previous == self.resolved {
            self.start_image_load();
        }
    }

    /// Aspect of the emulator's video output, used for default screen
    /// placement. `None` restores the configured default.
    pub fn set_screen_aspect(&mut self, aspect: Option<Size>) {
        self.screen_aspect = aspect;
        self.recompute();
    }

    /// Register an observer. It is told the current frame right away.
    pub fn add_observer(&mut self, mut observer: Box<dyn ScreenFrameObserver>) {
        observer.screen_frame_changed(self.screen_frame);
        self.observers.push(observer);
    }

    /// Start loading artwork through `loader`.
    pub fn set_image_loader(&mut self, loader: Arc<dyn ImageLoader>) {
        self.loader = Some(loader);
        self.start_image_load();
    }

    /// Pick up a finished image load, if any.
    pub fn poll_image(&mut self) -> &ImageState {
        if let Some(result) = self.pending.as_ref().and_then(PendingImage::poll) {
            self.pending = None;
            self.image = match result {
                Ok(image) => ImageState::Ready(Arc::new(image)),
                Err(e) => {
                    log::warn!("Skin '{}' artwork failed to load: {e}", self.skin.identifier());
                    ImageState::Failed
                },
            };
        }
        &self.image
    }

    fn start_image_load(&mut self) {
        let Some(ref loader) = self.loader else {
            return;
        };
        self.image = ImageState::Placeholder;
        self.pending = Some(PendingImage::spawn(
            Arc::clone(loader),
            Arc::clone(&self.skin),
            self.resolved,
        ));
    }

    fn recompute(&mut self) {
        let previous = self.resolved;
        self.resolved = traits::resolve(self.requested, &self.skin);
        self.layout = self.layout(self.resolved, self.container);
        self.screen_frame = self.layout.and_then(|layout| {
            self.locator.screen_frame(
                &self.skin,
                self.resolved,
                &layout,
                self.container,
                self.screen_aspect,
            )
        });
        log::debug!(
            "Skin '{}' at {} in {}x{}: layout {:?}",
            self.skin.identifier(),
            self.resolved,
            self.container.width,
            self.container.height,
            self.layout
        );
        for observer in &mut self.observers {
            observer.screen_frame_changed(self.screen_frame);
        }
        if previous != self.resolved {
            self.start_image_load();
        }
    }

    // -----------------------------------------------------------------------
    // Touch handling
    // -----------------------------------------------------------------------

    /// Single-touch entry point.
    pub fn handle_touch(&mut self, point: Point, phase: TouchPhase, sink: &mut dyn InputSink) {
        self.handle_touch_id(PRIMARY_TOUCH, point, phase, sink);
    }

    /// Feed one touch sample for finger `id`.
    pub fn handle_touch_id(
        &mut self,
        id: u64,
        point: Point,
        phase: TouchPhase,
        sink: &mut dyn InputSink,
    ) {
        let events = if phase.is_terminal() {
            match self.sessions.remove(&id) {
                Some(mut session) => self.mapper.end(&mut session),
                None => Vec::new(),
            }
        } else {
            let Some(layout) = self.layout else {
                return;
            };
            let buttons = self.skin.buttons(self.resolved).unwrap_or_default();
            let session = self.sessions.entry(id).or_default();
            self.mapper.touch(session, point, &layout, buttons)
        };
        self.forward(events, sink);
    }

    /// End every active touch, as if all fingers lifted.
    pub fn cancel_touches(&mut self, sink: &mut dyn InputSink) {
        let mut events = Vec::new();
        for (_, mut session) in self.sessions.drain() {
            events.extend(self.mapper.end(&mut session));
        }
        self.forward(events, sink);
    }

    /// Deliver mapper events, collapsing presses of a command shared by
    /// several fingers.
    fn forward(&mut self, events: Vec<InputEvent>, sink: &mut dyn InputSink) {
        for event in events {
            match event {
                InputEvent::Pressed(command) => {
                    let count = self.held.entry(command.clone()).or_insert(0);
                    *count += 1;
                    if *count == 1 {
                        sink.button_pressed(&command);
                    }
                },
                InputEvent::Released(command) => {
                    let Some(count) = self.held.get_mut(&command) else {
                        continue;
                    };
                    *count -= 1;
                    if *count == 0 {
                        self.held.remove(&command);
                        sink.button_released(&command);
                    }
                },
            }
        }
    }
}
