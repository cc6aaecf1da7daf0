//! Skin descriptors: the parsed, validated form of a skin's `info.json`.
//!
//! A descriptor maps every supported [`SkinTraits`] to a
//! [`TraitRepresentation`] holding the skin canvas size ("mapping size"),
//! buttons, and screens. Descriptors are immutable once loaded.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use padkit_types::error::{Result, SkinError};
use padkit_types::geometry::{EdgeInsets, Rect, Size};

use crate::traits::{Device, DisplayType, Orientation, SkinTraits};

/// File name of the descriptor inside a skin directory.
pub const INFO_FILE: &str = "info.json";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Identifies the emulated system a skin targets, e.g.
/// `com.rileytestut.delta.game.gba`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameType(pub String);

impl GameType {
    /// The last dotted component (`gba` for the example above).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where a descriptor was loaded from. Assets resolve relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinSource {
    /// Parsed from an in-memory string; the label is for logging only.
    Memory(String),
    /// A standalone descriptor file.
    File(PathBuf),
    /// A skin directory containing `info.json` and its assets.
    Directory(PathBuf),
}

impl SkinSource {
    /// Directory that asset file names are relative to.
    pub fn asset_dir(&self) -> Option<&Path> {
        match self {
            SkinSource::Memory(_) => None,
            SkinSource::File(path) => path.parent(),
            SkinSource::Directory(dir) => Some(dir),
        }
    }

    fn label(&self) -> String {
        match self {
            SkinSource::Memory(label) => label.clone(),
            SkinSource::File(path) | SkinSource::Directory(path) => path.display().to_string(),
        }
    }
}

/// Image asset size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSize {
    Small,
    Medium,
    Large,
    Resizable,
}

/// Image files for one representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkinAssets {
    pub resizable: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

impl SkinAssets {
    /// File for an exact size class.
    pub fn filename_for(&self, size: AssetSize) -> Option<&str> {
        match size {
            AssetSize::Resizable => self.resizable.as_deref(),
            AssetSize::Small => self.small.as_deref(),
            AssetSize::Medium => self.medium.as_deref(),
            AssetSize::Large => self.large.as_deref(),
        }
    }

    /// Preferred file: resizable, then the largest fixed size available.
    pub fn filename(&self) -> Option<&str> {
        self.resizable
            .as_deref()
            .or(self.large.as_deref())
            .or(self.medium.as_deref())
            .or(self.small.as_deref())
    }

    fn validate(&self, context: &str) -> Result<()> {
        if self.filename().is_none() {
            return Err(malformed(format!("{context}: assets must name at least one file")));
        }
        if let Some(ref r) = self.resizable
            && !(r.ends_with(".pdf") || r.ends_with(".png"))
        {
            return Err(malformed(format!(
                "{context}: resizable asset '{r}' must be a PDF or PNG file"
            )));
        }
        for sized in [&self.small, &self.medium, &self.large].into_iter().flatten() {
            if !sized.ends_with(".png") {
                return Err(malformed(format!(
                    "{context}: sized asset '{sized}' must be a PNG file"
                )));
            }
        }
        Ok(())
    }
}

/// Per-side hit margins; unset sides fall back to a broader default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ExtendedEdges {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub bottom: Option<f64>,
    pub right: Option<f64>,
}

impl ExtendedEdges {
    /// Unset sides become `value`.
    pub fn filled(&self, value: f64) -> ExtendedEdges {
        ExtendedEdges {
            top: Some(self.top.unwrap_or(value)),
            left: Some(self.left.unwrap_or(value)),
            bottom: Some(self.bottom.unwrap_or(value)),
            right: Some(self.right.unwrap_or(value)),
        }
    }

    /// Concrete insets, using `default` for unset sides.
    pub fn resolve(&self, default: f64) -> EdgeInsets {
        EdgeInsets::new(
            self.top.unwrap_or(default),
            self.left.unwrap_or(default),
            self.bottom.unwrap_or(default),
            self.right.unwrap_or(default),
        )
    }

    fn validate(&self, context: &str) -> Result<()> {
        for v in [self.top, self.left, self.bottom, self.right].into_iter().flatten() {
            if !v.is_finite() {
                return Err(malformed(format!("{context}: extendedEdges must be finite")));
            }
        }
        Ok(())
    }
}

/// A d-pad / thumbstick direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Commands bound to each direction of a directional control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionalInputs {
    pub up: Option<String>,
    pub down: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
}

impl DirectionalInputs {
    pub fn command(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => self.up.as_deref(),
            Direction::Down => self.down.as_deref(),
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    fn is_empty(&self) -> bool {
        self.up.is_none() && self.down.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// Thumbstick artwork drawn over a directional control.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Thumbstick {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl Thumbstick {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// What a button does when touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// One command, pressed while the touch stays on the button.
    Single(String),
    /// A d-pad or thumbstick; the touch position picks the direction.
    Directional(DirectionalInputs),
    /// A touch-screen region whose coordinates the host forwards itself.
    Touch { x: String, y: String },
}

/// A touchable item of a skin representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: String,
    /// Frame in mapping space.
    pub frame: Rect,
    /// Hit margins merged from the item and its representation.
    pub extended_edges: ExtendedEdges,
    pub input: InputKind,
    pub thumbstick: Option<Thumbstick>,
}

impl Button {
    pub fn new(id: impl Into<String>, frame: Rect, input: InputKind) -> Self {
        Self {
            id: id.into(),
            frame,
            extended_edges: ExtendedEdges::default(),
            input,
            thumbstick: None,
        }
    }

    pub fn with_extended_edges(mut self, edges: ExtendedEdges) -> Self {
        self.extended_edges = edges;
        self
    }

    /// Hit region in mapping space.
    pub fn hit_frame(&self, default_edge: f64) -> Rect {
        self.frame.outset(self.extended_edges.resolve(default_edge))
    }

    pub fn is_directional(&self) -> bool {
        matches!(self.input, InputKind::Directional(_))
    }
}

/// Whether a screen is positioned relative to the skin or the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenPlacement {
    /// Relative to the skin's layout rectangle.
    #[default]
    Controller,
    /// Relative to the whole container.
    #[serde(alias = "fixed")]
    App,
}

/// A game screen declared by the skin.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub id: String,
    /// Source crop of the emulator frame, if any.
    pub input_frame: Option<Rect>,
    /// Destination rectangle in unit space (0..=1 on both axes).
    pub output_frame: Rect,
    pub placement: ScreenPlacement,
}

/// All screens of a representation with their shared properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGroup {
    pub id: String,
    pub screens: Vec<Screen>,
    pub translucent: bool,
    pub game_screen_frame: Option<Rect>,
}

/// Everything a skin declares for one trait.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitRepresentation {
    pub mapping_size: Option<Size>,
    pub assets: Option<SkinAssets>,
    pub buttons: Vec<Button>,
    pub screens: Option<Vec<Screen>>,
    pub translucent: bool,
    /// Explicit single-screen frame in unit space.
    pub game_screen_frame: Option<Rect>,
}

impl TraitRepresentation {
    /// A representation is usable only with a valid mapping size.
    pub fn is_usable(&self) -> bool {
        self.mapping_size.is_some_and(|s| s.is_valid())
    }
}

/// A loaded skin.
#[derive(Debug, Clone)]
pub struct SkinDescriptor {
    identifier: String,
    name: String,
    game_type: GameType,
    debug: bool,
    source: SkinSource,
    representations: HashMap<SkinTraits, TraitRepresentation>,
}

impl SkinDescriptor {
    /// Load from a descriptor file or a skin directory containing `info.json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let (file, source) = if path.is_dir() {
            (path.join(INFO_FILE), SkinSource::Directory(path.to_path_buf()))
        } else {
            (path.to_path_buf(), SkinSource::File(path.to_path_buf()))
        };
        let text = std::fs::read_to_string(&file)?;
        Self::from_json(&text, source)
    }

    /// Parse and validate a descriptor document.
    pub fn from_json(text: &str, source: SkinSource) -> Result<Self> {
        let sanitized = strip_line_comments(text);
        let raw: RawInfo = serde_json::from_str(&sanitized)
            .map_err(|e| malformed(format!("{}: {e}", source.label())))?;

        let mut representations = HashMap::new();
        for (device_key, displays) in &raw.representations {
            let Some(device) = Device::from_key(device_key) else {
                log::debug!("Skin '{}': skipping unknown device '{device_key}'", raw.identifier);
                continue;
            };
            let displays = as_object(displays, device_key)?;
            for (display_key, orientations) in displays {
                let Some(display_type) = DisplayType::from_key(display_key) else {
                    log::debug!(
                        "Skin '{}': skipping unknown display type '{display_key}'",
                        raw.identifier
                    );
                    continue;
                };
                let orientations = as_object(orientations, display_key)?;
                for (orientation_key, value) in orientations {
                    let Some(orientation) = Orientation::from_key(orientation_key) else {
                        log::debug!(
                            "Skin '{}': skipping unknown orientation '{orientation_key}'",
                            raw.identifier
                        );
                        continue;
                    };
                    let traits = SkinTraits::new(device, display_type, orientation);
                    let context = format!("{}: {traits}", source.label());
                    let raw_rep = RawRepresentation::deserialize(value)
                        .map_err(|e| malformed(format!("{context}: {e}")))?;
                    let prefix = format!("{}:{traits}", raw.identifier);
                    let rep = raw_rep.into_representation(&prefix, &context)?;
                    representations.insert(traits, rep);
                }
            }
        }

        log::info!(
            "Loaded skin '{}' ({}) with {} representations",
            raw.name,
            raw.identifier,
            representations.len()
        );

        Ok(Self {
            identifier: raw.identifier,
            name: raw.name,
            game_type: GameType(raw.game_type_identifier),
            debug: raw.debug,
            source,
            representations,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn game_type(&self) -> &GameType {
        &self.game_type
    }

    /// Whether the skin asks for a debug overlay of its hit regions.
    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn source(&self) -> &SkinSource {
        &self.source
    }

    /// Raw representation lookup, usable or not.
    pub fn representation(&self, traits: SkinTraits) -> Option<&TraitRepresentation> {
        self.representations.get(&traits)
    }

    fn usable(&self, traits: SkinTraits) -> Option<&TraitRepresentation> {
        self.representation(traits).filter(|r| r.is_usable())
    }

    /// True when the skin has a representation with a valid mapping size.
    pub fn supports(&self, traits: SkinTraits) -> bool {
        self.usable(traits).is_some()
    }

    /// True when any trait of `device` is supported.
    pub fn supports_device(&self, device: Device) -> bool {
        self.representations
            .iter()
            .any(|(t, r)| t.device == device && r.is_usable())
    }

    /// All supported traits in a stable order.
    pub fn supported_traits(&self) -> Vec<SkinTraits> {
        let mut traits: Vec<SkinTraits> = Device::ALL
            .into_iter()
            .flat_map(|d| {
                Orientation::ALL.into_iter().flat_map(move |o| {
                    DisplayType::PREFERENCE
                        .into_iter()
                        .map(move |dt| SkinTraits::new(d, dt, o))
                })
            })
            .collect();
        traits.retain(|t| self.supports(*t));
        traits
    }

    pub fn mapping_size(&self, traits: SkinTraits) -> Option<Size> {
        self.usable(traits).and_then(|r| r.mapping_size)
    }

    pub fn buttons(&self, traits: SkinTraits) -> Option<&[Button]> {
        self.usable(traits).map(|r| r.buttons.as_slice())
    }

    pub fn screens(&self, traits: SkinTraits) -> Option<&[Screen]> {
        self.usable(traits).and_then(|r| r.screens.as_deref())
    }

    /// Screens bundled with their shared representation properties.
    pub fn screen_groups(&self, traits: SkinTraits) -> Option<Vec<ScreenGroup>> {
        let rep = self.usable(traits)?;
        let screens = rep.screens.as_ref()?;
        Some(vec![ScreenGroup {
            id: format!("{}-screens", self.identifier),
            screens: screens.clone(),
            translucent: rep.translucent,
            game_screen_frame: rep.game_screen_frame,
        }])
    }

    pub fn game_screen_frame(&self, traits: SkinTraits) -> Option<Rect> {
        self.usable(traits).and_then(|r| r.game_screen_frame)
    }

    pub fn is_translucent(&self, traits: SkinTraits) -> Option<bool> {
        self.usable(traits).map(|r| r.translucent)
    }

    /// Asset file for `traits`; `None` picks the preferred size.
    pub fn asset(&self, traits: SkinTraits, size: Option<AssetSize>) -> Option<&str> {
        let assets = self.usable(traits)?.assets.as_ref()?;
        match size {
            Some(size) => assets.filename_for(size),
            None => assets.filename(),
        }
    }
}

// ---------------------------------------------------------------------------
// Document schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInfo {
    name: String,
    identifier: String,
    game_type_identifier: String,
    #[serde(default)]
    debug: bool,
    representations: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepresentation {
    assets: Option<SkinAssets>,
    items: Option<Vec<RawItem>>,
    screens: Option<Vec<RawScreen>>,
    mapping_size: Option<Size>,
    extended_edges: Option<ExtendedEdges>,
    translucent: Option<bool>,
    game_screen_frame: Option<Rect>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    inputs: RawInputs,
    frame: Rect,
    extended_edges: Option<ExtendedEdges>,
    thumbstick: Option<Thumbstick>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInputs {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScreen {
    input_frame: Option<Rect>,
    output_frame: Rect,
    placement: Option<ScreenPlacement>,
}

impl RawRepresentation {
    /// `prefix` scopes item ids to the skin and trait.
    fn into_representation(self, prefix: &str, context: &str) -> Result<TraitRepresentation> {
        if let Some(size) = self.mapping_size
            && !size.is_valid()
        {
            return Err(malformed(format!(
                "{context}: mappingSize must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        if let Some(ref assets) = self.assets {
            assets.validate(context)?;
        }
        let rep_edges = self.extended_edges.unwrap_or_default();
        rep_edges.validate(context)?;

        let buttons = self
            .items
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                item.into_button(
                    format!("{prefix}:button-{index}"),
                    &rep_edges,
                    &format!("{context} items[{index}]"),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let screens = self
            .screens
            .map(|screens| {
                screens
                    .into_iter()
                    .enumerate()
                    .map(|(index, screen)| -> Result<Screen> {
                        let ctx = format!("{context} screens[{index}]");
                        Ok(Screen {
                            id: format!("{prefix}:screen-{index}"),
                            input_frame: screen.input_frame,
                            output_frame: to_unit_frame(
                                screen.output_frame,
                                self.mapping_size,
                                &ctx,
                            )?,
                            placement: screen.placement.unwrap_or_default(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let game_screen_frame = self
            .game_screen_frame
            .map(|f| to_unit_frame(f, self.mapping_size, &format!("{context} gameScreenFrame")))
            .transpose()?;

        Ok(TraitRepresentation {
            mapping_size: self.mapping_size,
            assets: self.assets,
            buttons,
            screens,
            translucent: self.translucent.unwrap_or(false),
            game_screen_frame,
        })
    }
}

impl RawItem {
    fn into_button(self, id: String, rep_edges: &ExtendedEdges, context: &str) -> Result<Button> {
        if !self.frame.is_valid() {
            return Err(malformed(format!(
                "{context}: frame must have positive size, got {}x{}",
                self.frame.width, self.frame.height
            )));
        }
        // An item's own block is complete: sides it leaves out are zero.
        let extended_edges = match self.extended_edges {
            Some(edges) => {
                edges.validate(context)?;
                edges.filled(0.0)
            },
            None => *rep_edges,
        };

        let input = match self.inputs {
            RawInputs::List(commands) => match commands.into_iter().next() {
                Some(first) => InputKind::Single(first),
                None => return Err(malformed(format!("{context}: inputs list is empty"))),
            },
            RawInputs::Map(mut map) => {
                let directional = DirectionalInputs {
                    up: map.remove("up"),
                    down: map.remove("down"),
                    left: map.remove("left"),
                    right: map.remove("right"),
                };
                if !directional.is_empty() {
                    InputKind::Directional(directional)
                } else if let (Some(x), Some(y)) = (map.remove("x"), map.remove("y")) {
                    InputKind::Touch { x, y }
                } else {
                    return Err(malformed(format!(
                        "{context}: directional inputs need at least one of up/down/left/right"
                    )));
                }
            },
        };

        Ok(Button {
            id,
            frame: self.frame,
            extended_edges,
            input,
            thumbstick: self.thumbstick,
        })
    }
}

/// Convert a screen frame to unit space. Frames already within 0..=1 are
/// taken as normalized; anything else is in mapping-space points.
fn to_unit_frame(frame: Rect, mapping_size: Option<Size>, context: &str) -> Result<Rect> {
    if !frame.is_valid() {
        return Err(malformed(format!("{context}: frame must have positive size")));
    }
    if frame.is_unit() {
        return Ok(frame);
    }
    match mapping_size {
        Some(size) if size.is_valid() => Ok(frame.normalized_by(size)),
        _ => Ok(frame),
    }
}

fn as_object<'a>(value: &'a Value, key: &str) -> Result<&'a serde_json::Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| malformed(format!("representations.{key} must be an object")))
}

fn malformed(msg: String) -> SkinError {
    SkinError::MalformedSkinDescriptor(msg)
}

/// Remove `//` line comments that skin authors leave in `info.json`.
///
/// String contents are left alone, and lines carrying a `"_comment"` key
/// are kept verbatim.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if line.contains("\"_comment\"") {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = line.len();
        let bytes = line.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {},
                }
            } else if b == b'"' {
                in_string = true;
            } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
                cut = i;
                break;
            }
        }
        out.push_str(&line[..cut]);
        out.push('\n');
    }
    out
}
