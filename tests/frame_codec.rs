//! Frame codec round-trip and malformed-input coverage.

use bytes::Bytes;

use wraith::buffer::Buffer;
use wraith::frame::{
    flags, ErrorCode, Frame, FrameCodec, Payload, Priority, Setting, FRAME_HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use wraith::Error;

fn roundtrip(frame: &Frame) -> Frame {
    let codec = FrameCodec::new();
    let bytes = codec.generate(frame).unwrap();
    let mut buf = Buffer::from_bytes(&bytes);
    let parsed = codec.parse(&mut buf).unwrap().unwrap();
    assert!(buf.is_empty());
    parsed
}

#[test]
fn every_frame_type_round_trips() {
    let frames = vec![
        Frame::data(1, &b"payload"[..], true),
        Frame::headers(3, &b"\x82\x87"[..], true, false),
        Frame {
            payload: Payload::Headers {
                priority: Some(Priority {
                    exclusive: false,
                    dependency: 1,
                    weight: 201,
                }),
                fragment: Bytes::from_static(b"\x86"),
            },
            ..Frame::headers(5, &b""[..], true, true).with_flag(flags::PRIORITY)
        },
        Frame::priority(
            7,
            Priority {
                exclusive: true,
                dependency: 3,
                weight: 1,
            },
        ),
        Frame::rst_stream(9, ErrorCode::RefusedStream),
        Frame::settings(vec![
            (Setting::HeaderTableSize, 8192),
            (Setting::EnablePush, 0),
            (Setting::MaxConcurrentStreams, 100),
            (Setting::InitialWindowSize, 1 << 20),
            (Setting::CompressData, 1),
        ]),
        Frame::settings_ack(),
        Frame::push_promise(11, 12, &b"\x82"[..], true),
        Frame::ping(*b"deadbeef"),
        Frame::pong([0; 8]),
        Frame::goaway(13, ErrorCode::NoError, &b""[..]),
        Frame::goaway(13, ErrorCode::ProtocolError, &b"diagnostic"[..]),
        Frame::window_update(0, 0x7fff_ffff),
        Frame::window_update(15, 1),
        Frame::continuation(17, &b"\x85"[..], true),
        Frame::new(
            0,
            Payload::AltSvc {
                max_age: 3600,
                port: 8443,
                proto: Bytes::from_static(b"h2-16"),
                host: Bytes::from_static(b"example.net"),
                origin: Bytes::new(),
            },
        ),
        Frame::new(0, Payload::Blocked),
    ];

    for frame in frames {
        assert_eq!(roundtrip(&frame), frame, "frame {:?}", frame.kind());
    }
}

#[test]
fn padded_frames_round_trip_with_padding_stripped() {
    let codec = FrameCodec::new();
    for padding in [1usize, 2, 128, 256] {
        let frame = Frame::data(1, &b"content"[..], false).with_padding(padding);
        let bytes = codec.generate(&frame).unwrap();
        assert_eq!(bytes.len(), FRAME_HEADER_SIZE + padding + 7);

        let mut buf = Buffer::from_bytes(&bytes);
        let parsed = codec.parse(&mut buf).unwrap().unwrap();
        assert_eq!(parsed.padding, 0);
        assert_eq!(parsed.flags & flags::PADDED, 0);
        assert_eq!(
            parsed.payload,
            Payload::Data {
                data: Bytes::from_static(b"content")
            }
        );
    }
}

#[test]
fn padding_limits_enforced() {
    let codec = FrameCodec::new();
    let over = Frame::data(1, &b"x"[..], false).with_padding(257);
    assert!(matches!(codec.generate(&over), Err(Error::Compression(_))));

    let tight = Frame::data(1, vec![0u8; MAX_PAYLOAD_SIZE - 4], false).with_padding(16);
    assert!(matches!(codec.generate(&tight), Err(Error::Compression(_))));
}

#[test]
fn parse_waits_for_complete_frame() {
    let codec = FrameCodec::new();
    let bytes = codec
        .generate(&Frame::data(1, &b"0123456789"[..], false))
        .unwrap();

    let mut buf = Buffer::new();
    for (i, chunk) in bytes.chunks(3).enumerate() {
        buf.append(chunk);
        let done = (i + 1) * 3 >= bytes.len();
        let result = codec.parse(&mut buf).unwrap();
        if done {
            assert!(result.is_some());
        } else {
            assert!(result.is_none(), "parsed early at chunk {i}");
        }
    }
}

#[test]
fn two_frames_in_one_buffer() {
    let codec = FrameCodec::new();
    let mut buf = Buffer::new();
    buf.append(&codec.generate(&Frame::ping([1; 8])).unwrap());
    buf.append(&codec.generate(&Frame::window_update(1, 256)).unwrap());

    let first = codec.parse(&mut buf).unwrap().unwrap();
    assert_eq!(first.payload, Payload::Ping([1; 8]));
    let second = codec.parse(&mut buf).unwrap().unwrap();
    assert_eq!(second.payload, Payload::WindowUpdate(256));
    assert!(codec.parse(&mut buf).unwrap().is_none());
}

#[test]
fn connection_scope_enforced() {
    let codec = FrameCodec::new();
    for frame in [
        Frame {
            stream: 3,
            ..Frame::ping([0; 8])
        },
        Frame {
            stream: 3,
            ..Frame::goaway(1, ErrorCode::NoError, &b""[..])
        },
    ] {
        assert!(matches!(codec.generate(&frame), Err(Error::Protocol(_))));
    }

    for frame in [
        Frame::data(0, &b"x"[..], false),
        Frame::headers(0, &b"\x82"[..], true, false),
        Frame::rst_stream(0, ErrorCode::Cancel),
    ] {
        assert!(matches!(codec.generate(&frame), Err(Error::Protocol(_))));
    }
}

#[test]
fn reserved_stream_bit_masked_on_parse() {
    let codec = FrameCodec::new();
    let mut bytes = codec
        .generate(&Frame::data(1, &b"x"[..], false))
        .unwrap()
        .to_vec();
    bytes[4] |= 0x80; // set the reserved bit in the stream id
    let mut buf = Buffer::from(bytes);
    let frame = codec.parse(&mut buf).unwrap().unwrap();
    assert_eq!(frame.stream, 1);
}

#[test]
fn ping_payload_must_be_eight_bytes() {
    let codec = FrameCodec::new();
    let mut raw = vec![0u8, 7, 0x6, 0, 0, 0, 0, 0];
    raw.extend_from_slice(&[0; 7]);
    let mut buf = Buffer::from(raw);
    assert!(matches!(codec.parse(&mut buf), Err(Error::Protocol(_))));
}

#[test]
fn unknown_flags_dropped_on_parse() {
    let codec = FrameCodec::new();
    let mut bytes = codec
        .generate(&Frame::rst_stream(1, ErrorCode::Cancel))
        .unwrap()
        .to_vec();
    bytes[3] = 0xff; // RST_STREAM defines no flags
    let mut buf = Buffer::from(bytes);
    let frame = codec.parse(&mut buf).unwrap().unwrap();
    assert_eq!(frame.flags, 0);
}
