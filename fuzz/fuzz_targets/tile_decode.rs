#![no_main]

use libfuzzer_sys::fuzz_target;
use mvtile::{GeometryLimits, Tile};

fuzz_target!(|data: &[u8]| {
    let Ok(tile) = Tile::new(data) else { return };
    for name in tile.layer_names() {
        let Ok(layer) = tile.get_layer(name) else {
            continue;
        };
        for feature in layer.features() {
            let Ok(feature) = feature else { continue };
            let _ = feature.id();
            let _ = feature.properties();
            let _ = feature.get_value("name");
            let _ = feature.geometries::<i32>(1.0);
            let _ = feature.geometries_with_limits::<i16>(0.25, &GeometryLimits::for_testing());
        }
    }
});
