// src/loader/tmx_loader.rs
use crate::error::MapError;
use crate::spatial::index::CollisionObject;
use log::warn;
use macroquad::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct TmxMap {
    #[serde(rename = "@width", default)]
    width: usize,
    #[serde(rename = "@height", default)]
    height: usize,
    #[serde(rename = "layer", default)]
    layers: Vec<TmxLayer>,
    #[serde(rename = "objectgroup", default)]
    object_groups: Vec<TmxObjectGroup>,
}

#[derive(Deserialize)]
struct TmxLayer {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@width")]
    width: Option<usize>,
    #[serde(rename = "@height")]
    height: Option<usize>,
    #[serde(rename = "@visible", default = "one")]
    visible: u8,
    data: Option<TmxData>,
}

fn one() -> u8 {
    1
}

#[derive(Deserialize)]
struct TmxData {
    #[serde(rename = "@encoding")]
    encoding: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Deserialize)]
struct TmxObjectGroup {
    #[serde(rename = "object", default)]
    objects: Vec<TmxObject>,
}

#[derive(Deserialize)]
struct TmxObject {
    #[serde(rename = "@id")]
    id: Option<u32>,
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "@class")]
    class: Option<String>,
    #[serde(rename = "@x", default)]
    x: f32,
    #[serde(rename = "@y", default)]
    y: f32,
    #[serde(rename = "@width", default)]
    width: f32,
    #[serde(rename = "@height", default)]
    height: f32,
    properties: Option<TmxProperties>,
}

#[derive(Deserialize)]
struct TmxProperties {
    #[serde(rename = "property", default)]
    properties: Vec<TmxProperty>,
}

#[derive(Deserialize)]
struct TmxProperty {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@value")]
    value: Option<String>,
}

/// A parsed TMX document, ready for layer and collision extraction.
pub struct MapDocument {
    map: TmxMap,
}

impl MapDocument {
    /// Parses TMX text. Fails unless the root element is `<map>`.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        match root_element_name(text)? {
            Some(name) if name == "map" => {}
            found => return Err(MapError::MissingRoot { found }),
        }
        let map: TmxMap = quick_xml::de::from_str(text)?;
        Ok(Self { map })
    }

    /// Reads and parses a `.tmx` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        Self::parse(&txt)
    }

    /// Map size in tiles, as declared on the `<map>` element.
    pub fn size(&self) -> (usize, usize) {
        (self.map.width, self.map.height)
    }
}

fn root_element_name(text: &str) -> Result<Option<String>, MapError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                return Ok(Some(name));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Tile ids of one `<layer>`, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGrid {
    /// Layer name, empty when the document has none
    pub name: String,
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    /// Initial visibility from the `visible` attribute
    pub visible: bool,
    /// 1-based tile ids; 0 is an empty cell
    pub tile_ids: Vec<i32>,
}

/// Splits a CSV data block into tile ids.
///
/// A single trailing comma is accepted; empty tokens anywhere else are errors.
pub fn parse_tile_grid(text: &str) -> Result<Vec<i32>, MapError> {
    let text = text.trim();
    let body = text.strip_suffix(',').unwrap_or(text);
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(',')
        .map(|tok| {
            let tok = tok.trim();
            tok.parse::<i32>().map_err(|source| MapError::InvalidTileToken {
                token: tok.to_owned(),
                source,
            })
        })
        .collect()
}

/// Reads every `<layer>` in document order.
pub fn load_layers(doc: &MapDocument) -> Result<Vec<LayerGrid>, MapError> {
    let mut grids = Vec::with_capacity(doc.map.layers.len());
    for l in &doc.map.layers {
        let data = l.data.as_ref().ok_or_else(|| MapError::MissingLayerData {
            layer: l.name.clone(),
        })?;
        match data.encoding.as_deref() {
            Some("csv") => {}
            other => {
                return Err(MapError::UnsupportedEncoding {
                    layer: l.name.clone(),
                    encoding: other.unwrap_or("xml").to_owned(),
                })
            }
        }

        let tile_ids = parse_tile_grid(&data.text)?;
        let width = l.width.unwrap_or(doc.map.width);
        let height = l.height.unwrap_or(doc.map.height);
        let expected = width.checked_mul(height).unwrap_or(usize::MAX);
        if tile_ids.len() != expected {
            return Err(MapError::InvalidLayerSize {
                layer: l.name.clone(),
                expected,
                actual: tile_ids.len(),
            });
        }

        grids.push(LayerGrid {
            name: l.name.clone(),
            width,
            height,
            visible: l.visible != 0,
            tile_ids,
        });
    }
    Ok(grids)
}

/// Reads every object of every `<objectgroup>` as a scaled collision rectangle.
pub fn load_collision_geometry(doc: &MapDocument, scale: f32) -> Vec<CollisionObject> {
    doc.map
        .object_groups
        .iter()
        .flat_map(|g| g.objects.iter())
        .map(|obj| CollisionObject {
            id: obj.id,
            name: obj.name.clone(),
            kind: obj.kind.clone().or_else(|| obj.class.clone()),
            rect: Rect::new(
                obj.x * scale,
                obj.y * scale,
                obj.width * scale,
                obj.height * scale,
            ),
            next_area: next_area_flag(obj),
        })
        .collect()
}

fn next_area_flag(obj: &TmxObject) -> bool {
    let Some(props) = &obj.properties else {
        return false;
    };
    let mut flag = false;
    for p in props.properties.iter().filter(|p| p.name == "nextArea") {
        let raw = p.value.as_deref().unwrap_or("");
        flag = match parse_bool(raw) {
            Some(v) => v,
            None => {
                warn!(
                    "object {:?}: nextArea value '{}' is not a boolean, treating as false",
                    obj.id, raw
                );
                false
            }
        };
    }
    flag
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") || s == "1" {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") || s == "0" {
        Some(false)
    } else {
        None
    }
}
