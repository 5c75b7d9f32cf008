//! End-to-end wire-format scenarios, exercised across the whole crate's
//! public surface rather than any single module.

use bytes::Bytes;
use remote_proto::{Command, DecodedHeader, decode_header, encode_frame, frame::FrameExtractor};

#[test]
fn frame_round_trip() {
    let frame = encode_frame(0x01, b"test");
    assert_eq!(&frame[..], &[0x01, 0x00, 0x00, 0x00, 0x04, b't', b'e', b's', b't']);

    let DecodedHeader::Complete { frame_type, length, rest } = decode_header(&frame) else {
        panic!("expected a complete header");
    };
    assert_eq!(frame_type, 1);
    assert_eq!(length, 4);
    assert_eq!(rest, b"test");
}

#[test]
fn put_script_byte_layout() {
    let cmd = Command::PutScript { id: Bytes::from_static(b"my_script"), script: Bytes::from_static(b"script_data") };
    let wire = cmd.encode();

    assert_eq!(wire.len(), 29);
    assert_eq!(wire[0], 0x01);
    assert_eq!(&wire[1..5], &9u32.to_be_bytes()); // total payload length = 24
    // payload begins at offset 5: [id_len(4)]["my_script"(9)]["script_data"(11)]
    assert_eq!(&wire[5..9], &9u32.to_be_bytes());
    assert_eq!(&wire[9..18], b"my_script");
    assert_eq!(&wire[18..29], b"script_data");
}

#[test]
fn clear_color_payload_round_trips_within_tolerance() {
    let cmd = Command::ClearColor { r: 0.5, g: 0.25, b: 0.75, a: 1.0 };
    let wire = cmd.encode();

    let DecodedHeader::Complete { frame_type, length, rest } = decode_header(&wire) else {
        panic!("expected a complete header");
    };
    assert_eq!(frame_type, 0x08);
    assert_eq!(length, 16);

    let channel = |offset: usize| f32::from_be_bytes(rest[offset..offset + 4].try_into().unwrap());
    assert!((channel(0) - 0.5).abs() < 1e-3);
    assert!((channel(4) - 0.25).abs() < 1e-3);
    assert!((channel(8) - 0.75).abs() < 1e-3);
    assert!((channel(12) - 1.0).abs() < 1e-3);
}

#[test]
fn extractor_split_across_a_header() {
    let ready = encode_frame(0x06, b"");
    let mut reshape_payload = Vec::new();
    reshape_payload.extend_from_slice(&800u32.to_be_bytes());
    reshape_payload.extend_from_slice(&2400u32.to_be_bytes());
    let reshape = encode_frame(0x05, &reshape_payload);

    let mut input = Vec::new();
    input.extend_from_slice(&ready);
    input.extend_from_slice(&reshape);

    // Split mid-header of the second frame (3 bytes into its 5-byte header).
    let split_at = ready.len() + 3;
    let (first_half, second_half) = input.split_at(split_at);

    let mut extractor = FrameExtractor::new(remote_proto::frame::DEFAULT_MAX_FRAME_LEN);

    let first = extractor.push_and_extract(first_half).expect("first push");
    assert_eq!(first.len(), 1);
    assert_eq!(&first[0][..], &ready[..]);

    let second = extractor.push_and_extract(second_half).expect("second push");
    assert_eq!(second.len(), 1);
    assert_eq!(&second[0][..], &reshape[..]);
}
