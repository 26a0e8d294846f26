use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tilegrid::aggregation::compare_buckets;
use tilegrid::compute::mercator::pixel_to_lat_lon;
use tilegrid::types::{Level, MAX_LEVEL};
use tilegrid::{Bucket, BucketReducer, NoSubAggregations, TileKey, decode, encode, select};

const CITIES: [(f64, f64); 8] = [
    (39.8775, 116.316),
    (40.7128, -74.0060),
    (51.5074, -0.1278),
    (-33.8688, 151.2093),
    (-23.5505, -46.6333),
    (35.6762, 139.6503),
    (-33.9249, 18.4241),
    (61.2181, -149.9003),
];

const EPS: f64 = 1e-9;

fn level_strategy(max: u8) -> impl Strategy<Value = Level> {
    (0..=max).prop_map(|l| Level::new(l).unwrap())
}

fn key_strategy(min: u8, max: u8) -> impl Strategy<Value = TileKey> {
    (min..=max).prop_flat_map(|l| {
        let level = Level::new(l).unwrap();
        (0..=level.max_tile_id() as i64).prop_map(move |v| TileKey::from_integer(v, level).unwrap())
    })
}

fn bucket_set(level: Level) -> impl Strategy<Value = Vec<Bucket>> {
    prop::collection::vec((0..=level.max_tile_id() as i64, 0u64..1_000), 0..40).prop_map(
        move |raw| {
            raw.into_iter()
                .map(|(v, c)| Bucket::count_only(TileKey::from_integer(v, level).unwrap(), c))
                .collect()
        },
    )
}

fn counts(buckets: &[Bucket]) -> BTreeMap<TileKey, u64> {
    buckets.iter().map(|b| (b.key, b.doc_count)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_integer_round_trip(key in key_strategy(0, MAX_LEVEL)) {
        let back = TileKey::from_integer(key.to_integer(), key.level()).unwrap();
        prop_assert_eq!(back, key);

        let text = key.to_string();
        prop_assert_eq!(text.len(), key.level().digits());
        prop_assert_eq!(text.parse::<TileKey>().unwrap(), key);
    }

    #[test]
    fn prop_zero_is_padded(level in level_strategy(MAX_LEVEL)) {
        let key = TileKey::from_integer(0, level).unwrap();
        prop_assert_eq!(key.to_string(), "0".repeat(level.get() as usize));
    }

    #[test]
    fn prop_pixel_derived_point_is_contained(
        (level, x, y) in (1u8..=23).prop_flat_map(|l| {
            let level = Level::new(l).unwrap();
            let n = level.pixels_per_axis();
            (Just(level), 0..n, 0..n)
        })
    ) {
        let (lat, lon) = pixel_to_lat_lon(x, y, level);
        let bounds = decode(&encode(lat, lon, level));
        prop_assert!(lat <= bounds.north + EPS && lat >= bounds.south - EPS);
        prop_assert!(lon >= bounds.west - EPS && lon <= bounds.east + EPS);
    }

    #[test]
    fn prop_child_bounds_nest_in_parent(key in key_strategy(1, 23)) {
        let parent = key.parent().unwrap();
        prop_assert!(parent.is_ancestor_of(&key));
        prop_assert!(decode(&parent).contains_box(&decode(&key)));
    }

    #[test]
    fn prop_reduce_is_associative(
        a in bucket_set(Level::new(3).unwrap()),
        b in bucket_set(Level::new(3).unwrap()),
        c in bucket_set(Level::new(3).unwrap()),
    ) {
        let reducer = BucketReducer::new(NoSubAggregations);
        let staged = reducer.reduce(vec![a.clone(), b.clone()], usize::MAX);
        let staged = reducer.reduce(vec![staged, c.clone()], usize::MAX);
        let direct = reducer.reduce(vec![a, b, c], usize::MAX);

        prop_assert_eq!(counts(&staged), counts(&direct));
        prop_assert_eq!(staged, direct);
    }

    #[test]
    fn prop_select_matches_full_sort(
        buckets in bucket_set(Level::new(5).unwrap()),
        n in 0usize..50,
    ) {
        let mut sorted = buckets.clone();
        sorted.sort_by(compare_buckets);
        sorted.truncate(n);
        prop_assert_eq!(select(buckets, n), sorted);
    }
}

#[test]
fn test_encoding_is_prefix_stable_for_sample_cities() {
    for (lat, lon) in CITIES {
        let mut previous = encode(lat, lon, Level::ROOT);
        for l in 1..=23 {
            let key = encode(lat, lon, Level::new(l).unwrap());
            assert!(
                previous.is_ancestor_of(&key),
                "{:?} at level {}: {} does not extend {}",
                (lat, lon),
                l,
                key,
                previous
            );
            assert!(decode(&previous).contains_box(&decode(&key)));
            assert!(decode(&key).contains(lat, lon));
            previous = key;
        }
    }

    let deep = encode(39.8775, 116.316, Level::new(20).unwrap());
    assert!(deep.to_string().starts_with("1321"));
}

#[test]
fn test_top_k_against_full_sort_large() {
    let level = Level::new(12).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    for round in 0..5 {
        let buckets: Vec<Bucket> = (0..10_000)
            .map(|_| {
                let id = rng.gen_range(0..=level.max_tile_id() as i64);
                let key = TileKey::from_integer(id, level).unwrap();
                Bucket::count_only(key, rng.gen_range(0..500))
            })
            .collect();

        for n in [1, 10, 100] {
            let mut sorted = buckets.clone();
            sorted.sort_by(compare_buckets);
            sorted.truncate(n);

            let top = select(buckets.clone(), n);
            assert_eq!(top.len(), n, "round {}", round);
            assert_eq!(top, sorted, "round {} n {}", round, n);
        }
    }
}
