#![no_main]

use libfuzzer_sys::fuzz_target;
use mvtile::{Feature, GeometryLimits, Layer};

fn varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

// A fixed layer ("l", extent 4096, version 2) to bind against.
const LAYER_VIEW: &[u8] = &[0x0A, 0x01, b'l', 0x28, 0x80, 0x20, 0x78, 0x02];

fuzz_target!(|data: &[u8]| {
    let Some((&kind, payload)) = data.split_first() else {
        return;
    };

    let Ok(layer) = Layer::parse(LAYER_VIEW) else {
        return;
    };

    // Wrap the input as the feature's packed geometry stream.
    let mut feature_view = vec![0x18, kind % 4];
    feature_view.push(0x22);
    varint(payload.len() as u64, &mut feature_view);
    feature_view.extend_from_slice(payload);

    let Ok(feature) = Feature::bind(&feature_view, &layer) else {
        return;
    };
    let _ = feature.geometries_with_limits::<i16>(1.0, &GeometryLimits::for_testing());
    let _ = feature.geometries::<i64>(0.5);
});
