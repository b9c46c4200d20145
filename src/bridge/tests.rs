use super::*;
use crate::config::{CodecMode, FloatzipConfig};
use crate::engine::header;
use crate::engine::StreamMode;
use crate::error::FloatzipError;
use crate::kernels::bitstream::BitSink;
use crate::types::ElementType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCES: [f64; 4] = [1e-3, 1e-4, 1e-5, 1e-6];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_f64(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(-1.0e3..1.0e3)).collect()
}

fn random_f32(n: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(-1.0e3f32..1.0e3)).collect()
}

/// A slowly varying signal with a little noise, the shape accuracy mode is for.
fn smooth_f64(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| (i as f64 * 0.01).sin() * 100.0 + rng.random_range(-0.01..0.01))
        .collect()
}

fn assert_within(source: &[f64], decoded: &[f64], tolerance: f64) {
    assert_eq!(source.len(), decoded.len());
    for (i, (&a, &b)) in source.iter().zip(decoded).enumerate() {
        if a.is_nan() {
            assert!(b.is_nan(), "element {}: NaN decoded as {}", i, b);
        } else if a.is_infinite() {
            assert_eq!(a, b, "element {}", i);
        } else {
            assert!(
                (a - b).abs() <= tolerance,
                "element {}: |{} - {}| exceeds {}",
                i,
                a,
                b,
                tolerance
            );
        }
    }
}

//==================================================================================
// Round trips
//==================================================================================

#[test]
fn test_reversible_roundtrip_f64_is_bit_exact() {
    init_logger();
    let values = random_f64(1000, 1);
    let bound = max_compressed_size(ElementType::Float64, 1000, CodecMode::Reversible).unwrap();
    let mut compressed = vec![0u8; bound];
    let written = compress(&values, &mut compressed, CodecMode::Reversible).unwrap();

    let mut decoded = vec![0f64; 1000];
    let result = decompress_into(&compressed[..written], &mut decoded).unwrap();

    assert_eq!(result.bytes_read, written);
    assert_eq!(result.element_type, ElementType::Float64);
    assert_eq!(result.element_count, 1000);
    for (a, b) in values.iter().zip(&decoded) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn test_reversible_roundtrip_f32_is_bit_exact() {
    init_logger();
    let values = random_f32(1000, 2);
    let compressed = compress_to_vec(&values, CodecMode::Reversible).unwrap();

    let (decoded, result) = decompress_to_vec(&compressed).unwrap();
    assert_eq!(result.bytes_read, compressed.len());
    assert_eq!(result.element_type, ElementType::Float32);
    assert_eq!(result.element_count, 1000);
    match decoded {
        DecodedArray::Float32(decoded) => {
            for (a, b) in values.iter().zip(&decoded) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
        other => panic!("expected Float32 output, got {:?}", other.element_type()),
    }
}

#[test]
fn test_accuracy_mode_bounds_every_element_f64() {
    init_logger();
    for (seed, &tolerance) in TOLERANCES.iter().enumerate() {
        let mode = CodecMode::Accuracy { tolerance };
        for values in [smooth_f64(1000, seed as u64), random_f64(1000, 10 + seed as u64)] {
            let compressed = compress_to_vec(&values, mode).unwrap();
            let mut decoded = vec![0f64; values.len()];
            let result = decompress_into(&compressed, &mut decoded).unwrap();
            assert_eq!(result.bytes_read, compressed.len());
            assert_within(&values, &decoded, tolerance);
        }
    }
}

#[test]
fn test_accuracy_mode_bounds_every_element_f32() {
    init_logger();
    for (seed, &tolerance) in TOLERANCES.iter().enumerate() {
        let values: Vec<f32> = smooth_f64(1000, 20 + seed as u64)
            .into_iter()
            .map(|v| v as f32)
            .collect();
        let compressed = compress_to_vec(&values, CodecMode::Accuracy { tolerance }).unwrap();
        let (decoded, result) = decompress_to_vec(&compressed).unwrap();

        assert_eq!(result.element_type, ElementType::Float32);
        assert_eq!(result.element_count, 1000);
        let source: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        assert_within(&source, &decoded.to_f64_vec(), tolerance);
    }
}

#[test]
fn test_accuracy_mode_bounds_random_f32() {
    init_logger();
    for (seed, &tolerance) in TOLERANCES.iter().enumerate() {
        let values = random_f32(1000, 30 + seed as u64);
        let compressed = compress_to_vec(&values, CodecMode::Accuracy { tolerance }).unwrap();
        let mut decoded = vec![0f32; values.len()];
        let result = decompress_into(&compressed, &mut decoded).unwrap();

        assert_eq!(result.bytes_read, compressed.len());
        let source: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let restored: Vec<f64> = decoded.iter().map(|&v| v as f64).collect();
        assert_within(&source, &restored, tolerance);
    }
}

#[test]
fn test_accuracy_mode_compresses_smooth_data() {
    let values = smooth_f64(4096, 7);
    let lossless = compress_to_vec(&values, CodecMode::Reversible).unwrap();
    let lossy = compress_to_vec(&values, CodecMode::Accuracy { tolerance: 1e-3 }).unwrap();
    assert!(lossy.len() < values.len() * 8 / 2);
    assert!(lossy.len() < lossless.len());
}

#[test]
fn test_special_values_survive() {
    init_logger();
    let nan_with_payload = f64::from_bits(0x7FF8_0000_0000_1234);
    let specials = [
        0.0,
        -0.0,
        f64::INFINITY,
        f64::NEG_INFINITY,
        nan_with_payload,
        f64::MIN_POSITIVE,
        f64::from_bits(1),
        f64::MAX,
        f64::MIN,
        1.0,
    ];
    // One all-finite block followed by a block holding the specials.
    let mut values: Vec<f64> = (0..64).map(|i| i as f64 * 0.25 - 3.0).collect();
    values.extend_from_slice(&specials);

    let compressed = compress_to_vec(&values, CodecMode::Reversible).unwrap();
    let (decoded, _) = decompress_to_vec(&compressed).unwrap();
    let decoded = decoded.to_f64_vec();
    for (a, b) in values.iter().zip(&decoded) {
        assert_eq!(a.to_bits(), b.to_bits());
    }

    let tolerance = 1e-4;
    let compressed = compress_to_vec(&values, CodecMode::Accuracy { tolerance }).unwrap();
    let (decoded, _) = decompress_to_vec(&compressed).unwrap();
    assert_within(&values, &decoded.to_f64_vec(), tolerance);
}

#[test]
fn test_single_element_roundtrip() {
    for mode in [CodecMode::Reversible, CodecMode::Accuracy { tolerance: 1e-5 }] {
        let compressed = compress_to_vec(&[42.125f64], mode).unwrap();
        let mut decoded = [0f64; 1];
        let result = decompress_into(&compressed, &mut decoded).unwrap();
        assert_eq!(result.element_count, 1);
        assert!((decoded[0] - 42.125).abs() <= 1e-5);
    }
}

//==================================================================================
// Framing
//==================================================================================

#[test]
fn test_header_describes_the_stream() {
    let values = random_f64(300, 3);
    let compressed = compress_to_vec(&values, CodecMode::Accuracy { tolerance: 1e-3 }).unwrap();

    let info = peek_header(&compressed).unwrap();
    assert_eq!(info.element_type, ElementType::Float64);
    assert_eq!(info.element_count, 300);
    assert_eq!(info.mode, FramedMode::Accuracy { min_exp: -10 });
    assert_eq!(info.mode.quantum(), Some(1.0 / 1024.0));
    assert_eq!(info.header_size, 14);
    assert_eq!(info.required_output_len(), 2400);

    let compressed = compress_to_vec(&values, CodecMode::Reversible).unwrap();
    let info = peek_header(&compressed).unwrap();
    assert_eq!(info.mode, FramedMode::Reversible);
    assert_eq!(info.header_size, 12);
}

#[test]
fn test_decompress_needs_only_stream_and_buffer() {
    let values = random_f32(1000, 4);
    let compressed = compress_to_vec(&values, CodecMode::Reversible).unwrap();

    let mut raw = vec![0u8; 4000];
    let result = decompress(&compressed, &mut raw).unwrap();
    assert_eq!(result.element_type, ElementType::Float32);
    assert_eq!(result.element_count, 1000);
    assert_eq!(raw, crate::test_utils::typed_slice_to_bytes(&values));
}

#[test]
fn test_bytes_read_ignores_trailing_data() {
    let values = random_f64(100, 5);
    let mut compressed = compress_to_vec(&values, CodecMode::Reversible).unwrap();
    let written = compressed.len();
    compressed.extend_from_slice(&[0xFF; 16]);

    let mut decoded = vec![0f64; 100];
    let result = decompress_into(&compressed, &mut decoded).unwrap();
    assert_eq!(result.bytes_read, written);
    assert_eq!(decoded, values);
}

#[test]
fn test_compress_raw_matches_typed_compress() {
    let values = random_f64(50, 6);
    let bytes = crate::test_utils::typed_slice_to_bytes(&values);
    let mut raw_out = vec![0u8; 1024];
    let mut typed_out = vec![0u8; 1024];

    let a = compress_raw(ElementType::Float64, &bytes, 50, &mut raw_out, CodecMode::Reversible)
        .unwrap();
    let b = compress(&values, &mut typed_out, CodecMode::Reversible).unwrap();
    assert_eq!(raw_out[..a], typed_out[..b]);
}

#[test]
fn test_compress_with_json_config() {
    let config =
        FloatzipConfig::from_json(r#"{"mode": {"kind": "accuracy", "tolerance": 0.0001}}"#)
            .unwrap();
    let values = smooth_f64(500, 8);
    let mut out = vec![0u8; max_compressed_size(ElementType::Float64, 500, config.mode).unwrap()];
    let written = compress_with_config(&values, &mut out, &config).unwrap();

    let info = peek_header(&out[..written]).unwrap();
    assert_eq!(info.mode, FramedMode::Accuracy { min_exp: -14 });
    let (decoded, _) = decompress_to_vec(&out[..written]).unwrap();
    assert_within(&values, &decoded.to_f64_vec(), 1e-4);
}

//==================================================================================
// Sizes and capacity
//==================================================================================

#[test]
fn test_maximum_size_is_never_exceeded() {
    let noisy: Vec<f64> = {
        let mut rng = StdRng::seed_from_u64(9);
        (0..2000).map(|_| f64::from_bits(rng.random::<u64>())).collect()
    };
    for mode in [CodecMode::Reversible, CodecMode::Accuracy { tolerance: 1e-6 }] {
        let bound = max_compressed_size(ElementType::Float64, noisy.len(), mode).unwrap();
        let mut out = vec![0u8; bound];
        let written = compress(&noisy, &mut out, mode).unwrap();
        assert!(written <= bound);
    }
}

#[test]
fn test_undersized_output_is_a_capacity_error() {
    let values = random_f64(1000, 11);

    let mut tiny = [0u8; 5];
    match compress(&values, &mut tiny, CodecMode::Reversible) {
        Err(FloatzipError::Capacity { required, available }) => {
            assert_eq!(available, 5);
            assert!(required > available);
        }
        other => panic!("expected a capacity error, got {:?}", other),
    }

    let mut header_only = [0u8; 13];
    match compress(&values, &mut header_only, CodecMode::Reversible) {
        Err(FloatzipError::Capacity { required, available }) => {
            assert_eq!(available, 13);
            assert!(required > available);
        }
        other => panic!("expected a capacity error, got {:?}", other),
    }
}

#[test]
fn test_undersized_decompress_target_is_untouched() {
    let values = random_f64(100, 12);
    let compressed = compress_to_vec(&values, CodecMode::Reversible).unwrap();

    let mut raw = vec![0xAAu8; 799];
    match decompress(&compressed, &mut raw) {
        Err(FloatzipError::Capacity { required, available }) => {
            assert_eq!(required, 800);
            assert_eq!(available, 799);
        }
        other => panic!("expected a capacity error, got {:?}", other),
    }
    assert!(raw.iter().all(|&b| b == 0xAA));
}

//==================================================================================
// Rejected inputs
//==================================================================================

#[test]
fn test_integer_types_never_produce_a_stream() {
    let ints = crate::test_utils::typed_slice_to_bytes(&[1i32, 2, 3, 4]);
    let longs = crate::test_utils::typed_slice_to_bytes(&[1i64, 2]);
    let mut out = vec![0u8; 256];

    for mode in [CodecMode::Reversible, CodecMode::Accuracy { tolerance: 1e-3 }] {
        let result = compress_raw(ElementType::Int32, &ints, 4, &mut out, mode);
        assert!(matches!(result, Err(FloatzipError::UnsupportedType(ElementType::Int32))));
        let result = compress_raw(ElementType::Int64, &longs, 2, &mut out, mode);
        assert!(matches!(result, Err(FloatzipError::UnsupportedType(ElementType::Int64))));
        assert!(max_compressed_size(ElementType::Int32, 4, mode).is_err());
    }
    assert!(out.iter().all(|&b| b == 0));
}

#[test]
fn test_integer_stream_is_rejected_by_decoder() {
    let mut stream = vec![0u8; 64];
    let mut sink = BitSink::open(&mut stream);
    header::write(ElementType::Int32, 3, StreamMode::Reversible, &mut sink).unwrap();

    let info = peek_header(&stream).unwrap();
    assert_eq!(info.element_type, ElementType::Int32);

    let mut raw = vec![0x55u8; 12];
    assert!(matches!(decompress(&stream, &mut raw), Err(FloatzipError::Header(_))));
    assert!(raw.iter().all(|&b| b == 0x55));
    assert!(matches!(decompress_to_vec(&stream), Err(FloatzipError::Header(_))));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let mut out = vec![0u8; 64];
    let empty: [f64; 0] = [];
    assert!(matches!(
        compress(&empty, &mut out, CodecMode::Reversible),
        Err(FloatzipError::InvalidConfiguration(_))
    ));
    for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            compress(&[1.0f64], &mut out, CodecMode::Accuracy { tolerance }),
            Err(FloatzipError::InvalidConfiguration(_))
        ));
    }

    let short = [0u8; 7];
    assert!(matches!(
        compress_raw(ElementType::Float64, &short, 1, &mut out, CodecMode::Reversible),
        Err(FloatzipError::BufferMismatch { expected: 8, actual: 7 })
    ));
}

#[test]
fn test_type_mismatch_leaves_target_untouched() {
    let compressed = compress_to_vec(&random_f64(10, 13), CodecMode::Reversible).unwrap();
    let mut wrong = vec![7.0f32; 20];
    match decompress_into(&compressed, &mut wrong) {
        Err(FloatzipError::TypeMismatch { expected, found }) => {
            assert_eq!(expected, ElementType::Float32);
            assert_eq!(found, ElementType::Float64);
        }
        other => panic!("expected a type mismatch, got {:?}", other),
    }
    assert!(wrong.iter().all(|&v| v == 7.0));
}

#[test]
fn test_corrupted_header_is_rejected() {
    let good =
        compress_to_vec(&random_f64(10, 14), CodecMode::Accuracy { tolerance: 1e-3 }).unwrap();
    let mut raw = vec![0u8; 80];

    // Magic, version, element type code and mode code.
    for (offset, byte) in [(0usize, b'Z'), (3, 2), (4, 200), (11, 9)] {
        let mut bad = good.clone();
        bad[offset] = byte;
        assert!(
            matches!(decompress(&bad, &mut raw), Err(FloatzipError::Header(_))),
            "corrupting byte {} was accepted",
            offset
        );
        assert!(matches!(peek_header(&bad), Err(FloatzipError::Header(_))));
    }

    assert!(matches!(decompress(&good[..6], &mut raw), Err(FloatzipError::Header(_))));
    assert!(matches!(peek_header(&[]), Err(FloatzipError::Header(_))));
}

#[test]
fn test_truncated_payload_is_a_decode_error_and_zeroes_output() {
    init_logger();
    for mode in [CodecMode::Reversible, CodecMode::Accuracy { tolerance: 1e-4 }] {
        let values = random_f64(1000, 15);
        let compressed = compress_to_vec(&values, mode).unwrap();
        let truncated = &compressed[..compressed.len() - 10];

        let mut raw = vec![0xAAu8; 8000];
        assert!(matches!(decompress(truncated, &mut raw), Err(FloatzipError::Decode(_))));
        assert!(raw.iter().all(|&b| b == 0));
        assert!(matches!(decompress_to_vec(truncated), Err(FloatzipError::Decode(_))));
    }
}

#[test]
fn test_implausible_element_count_is_refused_before_allocation() {
    let mut stream = vec![0u8; 12];
    let mut sink = BitSink::open(&mut stream);
    header::write(ElementType::Float64, 1 << 40, StreamMode::Reversible, &mut sink).unwrap();

    assert_eq!(peek_header(&stream).unwrap().element_count, 1 << 40);
    assert!(matches!(decompress_to_vec(&stream), Err(FloatzipError::Decode(_))));
}
