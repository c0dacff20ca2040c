use std::fs;
use std::path::Path;

use geo::{LineString, Polygon};
use geojson::{GeoJson, Geometry, PolygonType, Value};
use tracing::{info, warn};

use crate::error::{GoreError, Result};
use crate::map::LandMass;

/// Load Natural Earth land polygons from a GeoJSON file.
pub fn load_land(path: &Path) -> Result<LandMass> {
    let mut bytes = fs::read(path).map_err(|source| GoreError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson =
        simd_json::serde::from_slice(&mut bytes).map_err(|e| GoreError::DataParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut polygons = Vec::new();
    process_geojson_polygons(&geojson, |polygon| polygons.push(polygon));

    let land = LandMass::new(polygons);
    if land.is_empty() {
        warn!(path = %path.display(), "land dataset has no polygons");
    } else {
        info!(path = %path.display(), polygons = land.len(), "loaded land dataset");
    }
    Ok(land)
}

/// Process GeoJSON and extract polygon features
fn process_geojson_polygons<F>(geojson: &GeoJson, mut add_polygon: F)
where
    F: FnMut(Polygon<f64>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_polygons(geometry, &mut add_polygon);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_polygons(geometry, &mut add_polygon);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_polygons(geometry, &mut add_polygon);
        }
    }
}

fn process_geometry_polygons<F>(geometry: &Geometry, add_polygon: &mut F)
where
    F: FnMut(Polygon<f64>),
{
    match &geometry.value {
        Value::Polygon(rings) => {
            if let Some(polygon) = to_polygon(rings) {
                add_polygon(polygon);
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(polygon) = to_polygon(rings) {
                    add_polygon(polygon);
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_polygons(g, add_polygon);
            }
        }
        _ => {}
    }
}

/// Exterior plus holes; rings too short to enclose anything are skipped.
fn to_polygon(rings: &PolygonType) -> Option<Polygon<f64>> {
    let mut rings = rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect::<Vec<_>>()
        })
        .filter(|ring| ring.len() >= 3)
        .map(LineString::from);
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}
