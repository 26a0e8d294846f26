//! JSON and GeoJSON presentation of a tile grid.

use crate::aggregation::TileGrid;
use crate::error::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature::Id};
use serde::Serialize;
use serde_json::json;

/// Render a grid as a JSON value.
///
/// Each bucket carries its `key` digit string, `doc_count`, `bounds` and,
/// unless the payload serializes to `null`, its `aggregations`.
pub fn to_json_value<A: Serialize>(grid: &TileGrid<A>) -> Result<serde_json::Value> {
    let mut buckets = Vec::with_capacity(grid.len());
    for bucket in grid.buckets() {
        let bounds = bucket.bounds();
        let mut entry = json!({
            "key": bucket.key_as_string(),
            "doc_count": bucket.doc_count,
            "bounds": {
                "north": bounds.north,
                "south": bounds.south,
                "east": bounds.east,
                "west": bounds.west,
            },
        });

        let aggregations = serde_json::to_value(&bucket.aggregations)?;
        if !aggregations.is_null()
            && let Some(object) = entry.as_object_mut()
        {
            object.insert("aggregations".to_string(), aggregations);
        }
        buckets.push(entry);
    }

    Ok(json!({
        "level": grid.level().get(),
        "buckets": buckets,
    }))
}

pub fn to_json<A: Serialize>(grid: &TileGrid<A>) -> Result<String> {
    Ok(serde_json::to_string(&to_json_value(grid)?)?)
}

/// One polygon feature per tile, in bucket order.
///
/// Properties hold `key` and `doc_count`; the feature id is the key.
pub fn to_geojson<A>(grid: &TileGrid<A>) -> FeatureCollection {
    let features = grid
        .buckets()
        .iter()
        .map(|bucket| {
            let b = bucket.bounds();
            let ring = vec![
                vec![b.west, b.south],
                vec![b.east, b.south],
                vec![b.east, b.north],
                vec![b.west, b.north],
                vec![b.west, b.south],
            ];

            let mut properties = JsonObject::new();
            properties.insert("key".to_string(), json!(bucket.key_as_string()));
            properties.insert("doc_count".to_string(), json!(bucket.doc_count));

            Feature {
                bbox: Some(vec![b.west, b.south, b.east, b.north]),
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: Some(Id::String(bucket.key_as_string())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn to_geojson_string<A>(grid: &TileGrid<A>) -> Result<String> {
    Ok(serde_json::to_string(&to_geojson(grid))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{Bucket, Stats};
    use crate::tile::TileKey;
    use tilegrid_types::Level;

    fn grid() -> TileGrid {
        let key: TileKey = "1321".parse().unwrap();
        TileGrid::new(Level::new(4).unwrap(), 10, vec![Bucket::count_only(key, 5)]).unwrap()
    }

    #[test]
    fn test_json_shape() {
        let value = to_json_value(&grid()).unwrap();
        assert_eq!(value["level"], 4);
        let bucket = &value["buckets"][0];
        assert_eq!(bucket["key"], "1321");
        assert_eq!(bucket["doc_count"], 5);
        assert!(bucket.get("aggregations").is_none());

        let north = bucket["bounds"]["north"].as_f64().unwrap();
        let south = bucket["bounds"]["south"].as_f64().unwrap();
        assert!(north > 39.8775 && south < 39.8775);
    }

    #[test]
    fn test_json_includes_payload() {
        let key: TileKey = "03".parse().unwrap();
        let grid = TileGrid::new(
            Level::new(2).unwrap(),
            1,
            vec![Bucket::new(key, 1, Stats::of(2.5))],
        )
        .unwrap();
        let value = to_json_value(&grid).unwrap();
        assert_eq!(value["buckets"][0]["aggregations"]["sum"], 2.5);
        assert!(to_json(&grid).unwrap().contains("\"key\":\"03\""));
    }

    #[test]
    fn test_geojson_polygon() {
        let collection = to_geojson(&grid());
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(feature.id, Some(Id::String("1321".to_string())));

        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Polygon(rings)) => {
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0][0], rings[0][4]);
                assert!((rings[0][0][0] - 112.5).abs() < 1e-9);
            }
            other => panic!("expected a polygon, got {:?}", other),
        }

        let text = to_geojson_string(&grid()).unwrap();
        assert!(text.contains("FeatureCollection"));
    }
}
