//! Skin traits and trait resolution.
//!
//! A [`SkinTraits`] value (device, display type, orientation) selects which
//! representation of a skin applies. [`resolve`] maps a requested trait onto
//! one the skin actually supports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::SkinDescriptor;

/// Physical device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    Phone,
    Tablet,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Phone, Device::Tablet];

    /// Parse a device key as found in skin documents (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "iphone" | "phone" => Some(Device::Phone),
            "ipad" | "tablet" => Some(Device::Tablet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Phone => "phone",
            Device::Tablet => "tablet",
        }
    }
}

/// How the app occupies the device display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayType {
    Standard,
    EdgeToEdge,
    SplitView,
    StageManager,
    ExternalDisplay,
}

impl DisplayType {
    /// Fallback preference order used by the resolver.
    pub const PREFERENCE: [DisplayType; 5] = [
        DisplayType::Standard,
        DisplayType::EdgeToEdge,
        DisplayType::SplitView,
        DisplayType::StageManager,
        DisplayType::ExternalDisplay,
    ];

    /// Parse a display-type key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "standard" => Some(DisplayType::Standard),
            "edgetoedge" | "edge-to-edge" => Some(DisplayType::EdgeToEdge),
            "splitview" | "split-view" => Some(DisplayType::SplitView),
            "stagemanager" | "stage-manager" => Some(DisplayType::StageManager),
            "externaldisplay" | "external-display" => Some(DisplayType::ExternalDisplay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Standard => "standard",
            DisplayType::EdgeToEdge => "edgeToEdge",
            DisplayType::SplitView => "splitView",
            DisplayType::StageManager => "stageManager",
            DisplayType::ExternalDisplay => "externalDisplay",
        }
    }
}

/// Device orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Portrait, Orientation::Landscape];

    /// Parse an orientation key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }

    /// The other orientation.
    pub fn flipped(&self) -> Self {
        match self {
            Orientation::Portrait => Orientation::Landscape,
            Orientation::Landscape => Orientation::Portrait,
        }
    }
}

/// The lookup key selecting a skin representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkinTraits {
    pub device: Device,
    pub display_type: DisplayType,
    pub orientation: Orientation,
}

impl SkinTraits {
    pub const fn new(device: Device, display_type: DisplayType, orientation: Orientation) -> Self {
        Self {
            device,
            display_type,
            orientation,
        }
    }
}

impl fmt::Display for SkinTraits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.device.as_str(),
            self.display_type.as_str(),
            self.orientation.as_str()
        )
    }
}

/// Candidate traits for one device: requested orientation first, display
/// types in preference order.
fn device_candidates(device: Device, orientation: Orientation) -> impl Iterator<Item = SkinTraits> {
    [orientation, orientation.flipped()]
        .into_iter()
        .flat_map(move |o| {
            DisplayType::PREFERENCE
                .into_iter()
                .map(move |d| SkinTraits::new(device, d, o))
        })
}

/// Resolve `requested` against what `skin` supports.
///
/// Resolution order:
/// 1. Exact match
/// 2. Same device and orientation, display types in preference order
/// 3. Same device, any display type and orientation
/// 4. Other devices, same scheme
/// 5. Edge-to-edge at the requested device and orientation
///
/// Step 5 is only reached when the skin supports nothing at all.
pub fn resolve(requested: SkinTraits, skin: &SkinDescriptor) -> SkinTraits {
    if skin.supports(requested) {
        return requested;
    }

    let same_orientation = DisplayType::PREFERENCE
        .into_iter()
        .map(|d| SkinTraits::new(requested.device, d, requested.orientation));
    let same_device = device_candidates(requested.device, requested.orientation);
    let other_devices = Device::ALL
        .into_iter()
        .filter(|d| *d != requested.device)
        .flat_map(|d| device_candidates(d, requested.orientation));

    if let Some(found) = same_orientation
        .chain(same_device)
        .chain(other_devices)
        .find(|t| skin.supports(*t))
    {
        log::debug!(
            "Skin '{}' does not support {requested}; using {found}",
            skin.identifier()
        );
        return found;
    }

    let fallback = SkinTraits::new(
        requested.device,
        DisplayType::EdgeToEdge,
        requested.orientation,
    );
    log::warn!(
        "Skin '{}' supports no traits; defaulting to {fallback}",
        skin.identifier()
    );
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::test_support::skin_with_traits;

    const PHONE_E2E_PORTRAIT: SkinTraits =
        SkinTraits::new(Device::Phone, DisplayType::EdgeToEdge, Orientation::Portrait);

    #[test]
    fn device_keys() {
        assert_eq!(Device::from_key("iphone"), Some(Device::Phone));
        assert_eq!(Device::from_key("iPhone"), Some(Device::Phone));
        assert_eq!(Device::from_key("ipad"), Some(Device::Tablet));
        assert_eq!(Device::from_key("tablet"), Some(Device::Tablet));
        assert_eq!(Device::from_key("tv"), None);
    }

    #[test]
    fn display_type_keys() {
        assert_eq!(DisplayType::from_key("edgeToEdge"), Some(DisplayType::EdgeToEdge));
        assert_eq!(DisplayType::from_key("EDGETOEDGE"), Some(DisplayType::EdgeToEdge));
        assert_eq!(DisplayType::from_key("splitView"), Some(DisplayType::SplitView));
        assert_eq!(DisplayType::from_key("mini"), None);
        for d in DisplayType::PREFERENCE {
            assert_eq!(DisplayType::from_key(d.as_str()), Some(d));
        }
    }

    #[test]
    fn orientation_keys() {
        assert_eq!(Orientation::from_key("Portrait"), Some(Orientation::Portrait));
        assert_eq!(Orientation::from_key("landscape"), Some(Orientation::Landscape));
        assert_eq!(Orientation::from_key("upside-down"), None);
        assert_eq!(Orientation::Portrait.flipped(), Orientation::Landscape);
    }

    #[test]
    fn traits_display() {
        assert_eq!(PHONE_E2E_PORTRAIT.to_string(), "phone/edgeToEdge/portrait");
    }

    #[test]
    fn exact_match_wins() {
        let skin = skin_with_traits(&[
            PHONE_E2E_PORTRAIT,
            SkinTraits::new(Device::Phone, DisplayType::Standard, Orientation::Portrait),
        ]);
        assert_eq!(resolve(PHONE_E2E_PORTRAIT, &skin), PHONE_E2E_PORTRAIT);
    }

    #[test]
    fn same_orientation_prefers_standard() {
        let skin = skin_with_traits(&[
            SkinTraits::new(Device::Phone, DisplayType::SplitView, Orientation::Portrait),
            SkinTraits::new(Device::Phone, DisplayType::Standard, Orientation::Portrait),
            SkinTraits::new(Device::Phone, DisplayType::EdgeToEdge, Orientation::Landscape),
        ]);
        let requested =
            SkinTraits::new(Device::Phone, DisplayType::StageManager, Orientation::Portrait);
        assert_eq!(
            resolve(requested, &skin),
            SkinTraits::new(Device::Phone, DisplayType::Standard, Orientation::Portrait)
        );
    }

    #[test]
    fn same_device_other_orientation() {
        let landscape =
            SkinTraits::new(Device::Phone, DisplayType::EdgeToEdge, Orientation::Landscape);
        let skin = skin_with_traits(&[landscape]);
        assert_eq!(resolve(PHONE_E2E_PORTRAIT, &skin), landscape);
    }

    #[test]
    fn other_device_when_requested_device_unsupported() {
        let tablet =
            SkinTraits::new(Device::Tablet, DisplayType::Standard, Orientation::Landscape);
        let skin = skin_with_traits(&[tablet]);
        let resolved = resolve(PHONE_E2E_PORTRAIT, &skin);
        assert_eq!(resolved, tablet);
        assert!(skin.supports(resolved));
    }

    #[test]
    fn other_device_prefers_requested_orientation() {
        let skin = skin_with_traits(&[
            SkinTraits::new(Device::Tablet, DisplayType::Standard, Orientation::Landscape),
            SkinTraits::new(Device::Tablet, DisplayType::SplitView, Orientation::Portrait),
        ]);
        assert_eq!(
            resolve(PHONE_E2E_PORTRAIT, &skin),
            SkinTraits::new(Device::Tablet, DisplayType::SplitView, Orientation::Portrait)
        );
    }

    #[test]
    fn empty_skin_defaults_to_edge_to_edge() {
        let skin = skin_with_traits(&[]);
        let requested =
            SkinTraits::new(Device::Tablet, DisplayType::SplitView, Orientation::Landscape);
        assert_eq!(
            resolve(requested, &skin),
            SkinTraits::new(Device::Tablet, DisplayType::EdgeToEdge, Orientation::Landscape)
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn all_traits() -> Vec<SkinTraits> {
            Device::ALL
                .into_iter()
                .flat_map(|d| device_candidates(d, Orientation::Portrait))
                .collect()
        }

        fn arb_traits() -> impl Strategy<Value = SkinTraits> {
            proptest::sample::select(all_traits())
        }

        proptest! {
            #[test]
            fn resolution_is_total(
                supported in proptest::sample::subsequence(all_traits(), 1..=20),
                requested in arb_traits(),
            ) {
                let skin = skin_with_traits(&supported);
                let resolved = resolve(requested, &skin);
                prop_assert!(skin.supports(resolved), "resolved {resolved} unsupported");
            }

            #[test]
            fn supported_request_is_returned_unchanged(
                supported in proptest::sample::subsequence(all_traits(), 1..=20),
                pick in any::<proptest::sample::Index>(),
            ) {
                let requested = *pick.get(&supported);
                let skin = skin_with_traits(&supported);
                prop_assert_eq!(resolve(requested, &skin), requested);
            }
        }
    }
}
