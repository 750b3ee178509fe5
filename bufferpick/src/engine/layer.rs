//! Layers and graphics.

use crate::features::FeatureCollection;
use crate::geometry::{GeoPoint, Polygon};

use super::Symbol;

/// Geometry of a graphic.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    Polygon(Polygon),
}

/// A geometry paired with the symbol used to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub geometry: Geometry,
    pub symbol: Symbol,
}

impl Graphic {
    pub fn new(geometry: Geometry, symbol: Symbol) -> Self {
        Self { geometry, symbol }
    }

    /// The point, if this is a point graphic.
    pub fn as_point(&self) -> Option<GeoPoint> {
        match &self.geometry {
            Geometry::Point(point) => Some(*point),
            Geometry::Polygon(_) => None,
        }
    }

    /// The polygon, if this is a polygon graphic.
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match &self.geometry {
            Geometry::Polygon(polygon) => Some(polygon),
            Geometry::Point(_) => None,
        }
    }
}

/// Features fetched from the data service, rendered as one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayer {
    pub collection: FeatureCollection,
}

/// What a layer holds.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Graphics(Vec<Graphic>),
    Features(FeatureLayer),
}

/// A map layer identified by a well-known id.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub content: LayerContent,
}

impl Layer {
    /// Creates a graphics layer.
    pub fn graphics(id: impl Into<String>, graphics: Vec<Graphic>) -> Self {
        Self {
            id: id.into(),
            content: LayerContent::Graphics(graphics),
        }
    }

    /// Creates a feature layer.
    pub fn features(id: impl Into<String>, collection: FeatureCollection) -> Self {
        Self {
            id: id.into(),
            content: LayerContent::Features(FeatureLayer { collection }),
        }
    }

    /// Graphics of a graphics layer; empty for feature layers.
    pub fn graphic_items(&self) -> &[Graphic] {
        match &self.content {
            LayerContent::Graphics(graphics) => graphics,
            LayerContent::Features(_) => &[],
        }
    }

    /// The first graphic, if any.
    pub fn first_graphic(&self) -> Option<&Graphic> {
        self.graphic_items().first()
    }
}
