//! Symbol descriptors carried on graphics.
//!
//! These describe how a graphic should look; drawing them is up to the
//! engine.

/// RGBA color with an alpha channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Image marker drawn at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureMarkerSymbol {
    /// Image location
    pub url: String,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
    /// Vertical offset in pixels
    pub y_offset: f64,
}

impl Default for PictureMarkerSymbol {
    fn default() -> Self {
        Self {
            url: "/picker.png".to_string(),
            width: 30.0,
            height: 30.0,
            y_offset: 10.0,
        }
    }
}

/// Fill pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillStyle {
    #[default]
    Solid,
    None,
}

/// Outline stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleLineSymbol {
    pub width: f64,
    pub color: Color,
}

/// Polygon fill with outline.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFillSymbol {
    pub style: FillStyle,
    pub color: Color,
    pub outline: SimpleLineSymbol,
}

impl Default for SimpleFillSymbol {
    fn default() -> Self {
        Self {
            style: FillStyle::Solid,
            color: Color::rgba(255, 116, 0, 0.11),
            outline: SimpleLineSymbol {
                width: 1.5,
                color: Color::rgba(255, 97, 13, 1.0),
            },
        }
    }
}

/// Any symbol a graphic can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    PictureMarker(PictureMarkerSymbol),
    SimpleFill(SimpleFillSymbol),
}
