//! Controller skin engine.
//!
//! Parses skin descriptors keyed by device, display type and orientation,
//! resolves a requested trait to one the skin supports, lays the skin out
//! inside a container, maps touches to button commands, and places the
//! game screen.

pub mod descriptor;
pub mod image;
pub mod layout;
pub mod mapper;
pub mod registry;
pub mod screen;
pub mod traits;
pub mod view;

pub use descriptor::{
    AssetSize, Button, Direction, DirectionalInputs, ExtendedEdges, GameType, InputKind, Screen,
    ScreenGroup, ScreenPlacement, SkinAssets, SkinDescriptor, SkinSource, Thumbstick,
    TraitRepresentation,
};
pub use image::{FsImageLoader, ImageLoader, PendingImage, SkinImage, decode_png};
pub use layout::{Layout, VerticalAnchor, calculate_layout};
pub use mapper::{InputMapper, InputSession};
pub use registry::SkinRegistry;
pub use screen::{ScreenFrameObserver, ScreenLocator};
pub use traits::{Device, DisplayType, Orientation, SkinTraits, resolve};
pub use view::{HitRegion, ImageState, SkinView};
