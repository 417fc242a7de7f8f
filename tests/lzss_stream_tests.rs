use bmx_codec::encode::lzss::{
    self, FinishStatus, LzssConfig, LzssDecoder, LzssEncoder, PollStatus, StreamCodec,
};
use bmx_codec::raster::{pack, unpack};
use bmx_codec::{Bitmap, BmxError};

/// Test: a stream far larger than the encoder's buffer, fed by hand
#[test]
fn test_manual_protocol_large_stream() {
    let data: Vec<u8> = (0..100_000u32)
        .map(|i| if (i / 64) % 3 == 0 { (i % 7) as u8 } else { 0 })
        .collect();

    let mut encoder = LzssEncoder::new(LzssConfig::BMX);
    let mut compressed = Vec::new();
    let mut out = [0u8; 32];
    let mut offset = 0;
    let mut rejections = 0;

    while offset < data.len() {
        let end = (offset + 100).min(data.len());
        match encoder.sink(&data[offset..end]) {
            Ok(n) => offset += n,
            Err(BmxError::SinkRejected) => rejections += 1,
            Err(e) => panic!("unexpected sink error: {e}"),
        }
        loop {
            let (n, status) = encoder.poll(&mut out).unwrap();
            compressed.extend_from_slice(&out[..n]);
            if status == PollStatus::Empty {
                break;
            }
        }
    }
    loop {
        let status = encoder.finish().unwrap();
        loop {
            let (n, poll) = encoder.poll(&mut out).unwrap();
            compressed.extend_from_slice(&out[..n]);
            if poll == PollStatus::Empty {
                break;
            }
        }
        if status == FinishStatus::Done {
            break;
        }
    }

    println!(
        "{} bytes -> {} bytes ({} sink rejections)",
        data.len(),
        compressed.len(),
        rejections
    );
    assert!(compressed.len() < data.len() / 2);
    assert_eq!(compressed, lzss::compress(&data, LzssConfig::BMX).unwrap());

    let mut decoder = LzssDecoder::new(LzssConfig::BMX, 64);
    let restored = lzss::run(&mut decoder, &compressed, 1000).unwrap();
    assert_eq!(restored, data);
}

/// Walks an encoded stream and returns the `(distance, length)` of every
/// back-reference, stopping once `expected_len` bytes have been described.
fn backrefs(packed: &[u8], config: LzssConfig, expected_len: usize) -> Vec<(usize, usize)> {
    let mut pos = 0usize;
    let mut read = |bits: u8| {
        let mut v = 0usize;
        for _ in 0..bits {
            let bit = (packed[pos / 8] >> (7 - pos % 8)) & 1;
            v = (v << 1) | bit as usize;
            pos += 1;
        }
        v
    };

    let mut refs = Vec::new();
    let mut produced = 0;
    while produced < expected_len {
        if read(1) == 1 {
            read(8);
            produced += 1;
        } else {
            let distance = read(config.window_bits) + 1;
            let length = read(config.lookahead_bits) + 1;
            refs.push((distance, length));
            produced += length;
        }
    }
    refs
}

/// Test: matches exactly one window back use the largest encodable distance
#[test]
fn test_backref_at_full_window_distance() {
    let config = LzssConfig::BMX;
    let window = config.window_size();
    // A permutation of 0..=255: no byte repeats inside one window, so the
    // only matches sit exactly `window` bytes back.
    let block: Vec<u8> = (0..window).map(|i| (i * 167 + 13) as u8).collect();
    let data = block.repeat(3);

    let packed = lzss::compress(&data, config).unwrap();
    println!("{} bytes -> {} bytes", data.len(), packed.len());
    // 256 literals (9 bits) + 32 back-references (13 bits)
    assert_eq!(packed.len(), (256 * 9 + 32 * 13) / 8);

    let refs = backrefs(&packed, config, data.len());
    assert_eq!(refs.len(), 32);
    assert!(refs.iter().all(|&(d, l)| d == window && l == config.max_match()));

    assert_eq!(lzss::decompress(&packed, config).unwrap(), data);
    let mut decoder = LzssDecoder::new(config, 3);
    assert_eq!(lzss::run(&mut decoder, &packed, 5).unwrap(), data);
}

/// Test: mismatched configuration does not silently succeed
#[test]
fn test_decoder_needs_matching_config() {
    let data: Vec<u8> = b"abcabcabcabcabcabc".repeat(20);
    let packed = lzss::compress(&data, LzssConfig::BMX).unwrap();
    let other = LzssConfig::new(10, 4).unwrap();
    let result = lzss::decompress(&packed, other);
    assert!(result.map(|d| d != data).unwrap_or(true));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn runs() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec((any::<u8>(), 1usize..40), 0..80).prop_map(|parts| {
            parts
                .into_iter()
                .flat_map(|(b, n)| std::iter::repeat(b).take(n))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn compress_round_trip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
            let packed = lzss::compress(&data, LzssConfig::BMX).unwrap();
            prop_assert_eq!(lzss::decompress(&packed, LzssConfig::BMX).unwrap(), data);
        }

        #[test]
        fn compress_round_trip_runs(data in runs()) {
            let packed = lzss::compress(&data, LzssConfig::BMX).unwrap();
            prop_assert_eq!(lzss::decompress(&packed, LzssConfig::BMX).unwrap(), data);
        }

        #[test]
        fn chunking_does_not_change_output(data in runs(), chunk in 1usize..300, cap in 1usize..40) {
            let mut encoder = LzssEncoder::new(LzssConfig::BMX);
            let packed = lzss::run(&mut encoder, &data, chunk).unwrap();
            prop_assert_eq!(&packed, &lzss::compress(&data, LzssConfig::BMX).unwrap());

            let mut decoder = LzssDecoder::new(LzssConfig::BMX, cap);
            prop_assert_eq!(lzss::run(&mut decoder, &packed, chunk).unwrap(), data);
        }

        #[test]
        fn bitpack_round_trip_is_thresholded(
            (w, h, px) in (1u32..40, 1u32..20).prop_flat_map(|(w, h)| {
                (Just(w), Just(h), prop::collection::vec(any::<u8>(), (w * h) as usize))
            })
        ) {
            let bmp = Bitmap::new(w, h, px).unwrap();
            let once = unpack(&pack(&bmp).bytes, w, h).unwrap();
            prop_assert_eq!(&once, &bmp.thresholded());
            let twice = unpack(&pack(&once).bytes, w, h).unwrap();
            prop_assert_eq!(twice, once);
        }
    }
}
