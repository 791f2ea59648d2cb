//! HPACK coverage against the draft's appendix examples and story
//! files in the hpack-test-case shape.

use serde::Deserialize;

use wraith::buffer::Buffer;
use wraith::hpack::{
    decode_integer, encode_integer, huffman_decode, huffman_encode, CompressionOptions, Decoder,
    Direction, Encoder, Mark,
};

fn hex(s: &str) -> Vec<u8> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

#[test]
fn integer_1337_with_5_bit_prefix() {
    let mut out = vec![0x00];
    encode_integer(1337, 5, &mut out).unwrap();
    assert_eq!(out, hex("1f9a0a"));

    let mut buf = Buffer::from(out);
    assert_eq!(decode_integer(&mut buf, 5).unwrap(), 1337);
}

#[test]
fn integer_round_trip_sweep() {
    for prefix in 1..=8u8 {
        for shift in 0..31 {
            let value = (1u64 << shift) - 1;
            let mut out = vec![0x00];
            encode_integer(value, prefix, &mut out).unwrap();
            let mut buf = Buffer::from(out);
            assert_eq!(decode_integer(&mut buf, prefix).unwrap(), value);
        }
    }
    // Prefix 0 carries the full 32-bit range.
    let mut out = Vec::new();
    encode_integer(u32::MAX as u64, 0, &mut out).unwrap();
    let mut buf = Buffer::from(out);
    assert_eq!(decode_integer(&mut buf, 0).unwrap(), u32::MAX as u64);
}

#[test]
fn huffman_request_examples() {
    assert_eq!(
        huffman_encode(b"www.example.com", Direction::Request),
        hex("e7cf9bebe89b6fb16fa9b6ff")
    );
    assert_eq!(
        huffman_encode(b"no-cache", Direction::Request),
        hex("b9b9949556bf")
    );
    assert_eq!(
        huffman_decode(&hex("e7cf9bebe89b6fb16fa9b6ff"), Direction::Request).unwrap(),
        b"www.example.com"
    );
}

#[test]
fn request_block_without_huffman() {
    // First request of the appendix example, literal strings, default
    // table, speculative reference-set strategy.
    let mut encoder = Encoder::with_options(Direction::Request, CompressionOptions::SHORTER);
    let block = encoder
        .encode(&[
            (b":method", b"GET"),
            (b":scheme", b"http"),
            (b":path", b"/"),
            (b":authority", b"www.example.com"),
        ])
        .unwrap();
    assert_eq!(block, hex("8287 8644 0f77 7777 2e65 7861 6d70 6c65 2e63 6f6d"));

    // The four headers are indexed now, newest first, and every one is
    // referenced.
    let ctx = encoder.context();
    assert_eq!(ctx.len(), 4);
    assert_eq!(ctx.entry(0).unwrap().name, b":authority");
    assert_eq!(ctx.entry(3).unwrap().name, b":method");
    let mut referenced: Vec<usize> = ctx.refset().iter().map(|r| r.index).collect();
    referenced.sort();
    assert_eq!(referenced, [0, 1, 2, 3]);
    assert!(ctx.refset().iter().all(|r| r.mark == Mark::Emitted));
}

#[test]
fn response_block_with_huffman() {
    // First response of the appendix example: table limit 256,
    // Huffman-coded strings.
    let mut decoder = Decoder::with_table_size(Direction::Response, 256);
    let wire = hex(
        "4882 6402 5985 aec3 771a 4b63 96d0 7abe 9410 54d4 44a8 2005 9504 0b81 66e0 82a6 \
         2d1b ff71 919d 29ad 1718 63c7 8f0b 97c8 e9ae 82ae 43d3",
    );
    let mut buf = Buffer::from(wire);
    let headers = decoder.decode(&mut buf).unwrap();

    assert_eq!(
        headers,
        vec![
            (b":status".to_vec(), b"302".to_vec()),
            (b"cache-control".to_vec(), b"private".to_vec()),
            (
                b"date".to_vec(),
                b"Mon, 21 Oct 2013 20:13:21 GMT".to_vec()
            ),
            (
                b"location".to_vec(),
                b"https://www.example.com".to_vec()
            ),
        ]
    );
    assert_eq!(decoder.context().len(), 4);
    assert_eq!(decoder.context().size(), 222);
}

#[test]
fn fresh_context_round_trip_per_preset() {
    let presets = [
        ("naive", CompressionOptions::NAIVE),
        ("linear", CompressionOptions::LINEAR),
        ("static", CompressionOptions::STATIC),
        ("diff", CompressionOptions::DIFF),
        ("shorter", CompressionOptions::SHORTER),
        ("naive-h", CompressionOptions::NAIVE_H),
        ("linear-h", CompressionOptions::LINEAR_H),
        ("static-h", CompressionOptions::STATIC_H),
        ("diff-h", CompressionOptions::DIFF_H),
        ("shorter-h", CompressionOptions::SHORTER_H),
    ];

    let headers: Vec<(&[u8], &[u8])> = vec![
        (b":method", b"GET"),
        (b":scheme", b"https"),
        (b":path", b"/index.html"),
        (b":authority", b"www.example.com"),
        (b"accept", b"*/*"),
        (b"x-trace", b"\x00\xff binary \x7f"),
    ];
    let expected: Vec<(Vec<u8>, Vec<u8>)> = headers
        .iter()
        .map(|(n, v)| (n.to_vec(), v.to_vec()))
        .collect();

    for (name, preset) in presets {
        for direction in [Direction::Request, Direction::Response] {
            let mut encoder = Encoder::with_options(direction, preset);
            let mut decoder = Decoder::new(direction);
            let mut buf = Buffer::from(encoder.encode(&headers).unwrap());
            let mut decoded = decoder.decode(&mut buf).unwrap();
            decoded.sort();
            let mut want = expected.clone();
            want.sort();
            assert_eq!(decoded, want, "preset {name}, {direction:?}");
        }
    }
}

#[test]
fn multi_block_sessions_stay_synchronized() {
    // Three request blocks with overlapping headers, the shape the
    // appendix walks through; decoded sets must match at every step
    // for the stateful strategies.
    let blocks: Vec<Vec<(&[u8], &[u8])>> = vec![
        vec![
            (b":method", b"GET"),
            (b":scheme", b"http"),
            (b":path", b"/"),
            (b":authority", b"www.example.com"),
        ],
        vec![
            (b":method", b"GET"),
            (b":scheme", b"http"),
            (b":path", b"/"),
            (b":authority", b"www.example.com"),
            (b"cache-control", b"no-cache"),
        ],
        vec![
            (b":method", b"GET"),
            (b":scheme", b"https"),
            (b":path", b"/index.html"),
            (b":authority", b"www.example.com"),
            (b"custom-key", b"custom-value"),
        ],
    ];

    for preset in [
        CompressionOptions::LINEAR,
        CompressionOptions::DIFF,
        CompressionOptions::SHORTER,
        CompressionOptions::DIFF_H,
    ] {
        let mut encoder = Encoder::with_options(Direction::Request, preset);
        let mut decoder = Decoder::new(Direction::Request);
        for block in &blocks {
            let mut buf = Buffer::from(encoder.encode(block).unwrap());
            let mut decoded = decoder.decode(&mut buf).unwrap();
            decoded.sort();
            let mut want: Vec<(Vec<u8>, Vec<u8>)> =
                block.iter().map(|(n, v)| (n.to_vec(), v.to_vec())).collect();
            want.sort();
            assert_eq!(decoded, want);
        }
    }
}

#[test]
fn small_table_evictions_stay_synchronized() {
    // A 128-byte table forces evictions on nearly every block.
    let options = CompressionOptions {
        table_size: 128,
        ..CompressionOptions::DIFF
    };
    let mut encoder = Encoder::with_options(Direction::Request, options);
    let mut decoder = Decoder::with_table_size(Direction::Request, 128);

    for round in 0..8 {
        let value = format!("value-{round}");
        let repeated = format!("repeated-{}", round % 2);
        let headers: Vec<(&[u8], &[u8])> = vec![
            (b"x-rotating", value.as_bytes()),
            (b"x-sticky", repeated.as_bytes()),
        ];
        let mut buf = Buffer::from(encoder.encode(&headers).unwrap());
        let mut decoded = decoder.decode(&mut buf).unwrap();
        decoded.sort();
        let mut want: Vec<(Vec<u8>, Vec<u8>)> = headers
            .iter()
            .map(|(n, v)| (n.to_vec(), v.to_vec()))
            .collect();
        want.sort();
        assert_eq!(decoded, want, "round {round}");
        assert!(decoder.context().size() <= 128);
    }
}

// ---------------------------------------------------------------------
// hpack-test-case story files
// ---------------------------------------------------------------------

#[derive(Deserialize)]
struct Story {
    context: String,
    #[serde(default = "default_table_size")]
    header_table_size: usize,
    cases: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    wire: String,
    headers: Vec<std::collections::BTreeMap<String, String>>,
}

fn default_table_size() -> usize {
    4096
}

fn run_story(json: &str) {
    let story: Story = serde_json::from_str(json).unwrap();
    let direction = match story.context.as_str() {
        "request" => Direction::Request,
        _ => Direction::Response,
    };
    let mut decoder = Decoder::with_table_size(direction, story.header_table_size);

    for (seqno, case) in story.cases.iter().enumerate() {
        let mut buf = Buffer::from(hex(&case.wire));
        let mut decoded: Vec<(String, String)> = decoder
            .decode(&mut buf)
            .unwrap()
            .into_iter()
            .map(|(n, v)| {
                (
                    String::from_utf8(n).unwrap(),
                    String::from_utf8(v).unwrap(),
                )
            })
            .collect();
        decoded.sort();
        let mut want: Vec<(String, String)> = case
            .headers
            .iter()
            .flat_map(|m| m.iter().map(|(n, v)| (n.clone(), v.clone())))
            .collect();
        want.sort();
        assert_eq!(decoded, want, "case {seqno}");
    }
}

#[test]
fn story_request_sequence() {
    run_story(
        r#"{
            "context": "request",
            "header_table_size": 4096,
            "cases": [
                {
                    "wire": "828786440f7777772e6578616d706c652e636f6d",
                    "headers": [
                        {":method": "GET"},
                        {":scheme": "http"},
                        {":path": "/"},
                        {":authority": "www.example.com"}
                    ]
                },
                {
                    "wire": "5c086e6f2d6361636865",
                    "headers": [
                        {":method": "GET"},
                        {":scheme": "http"},
                        {":path": "/"},
                        {":authority": "www.example.com"},
                        {"cache-control": "no-cache"}
                    ]
                }
            ]
        }"#,
    );
}

#[test]
fn story_response_with_huffman() {
    run_story(
        r#"{
            "context": "response",
            "header_table_size": 256,
            "cases": [
                {
                    "wire": "488264025985aec3771a4b6396d07abe941054d444a8200595040b8166e082a62d1bff71919d29ad171863c78f0b97c8e9ae82ae43d3",
                    "headers": [
                        {":status": "302"},
                        {"cache-control": "private"},
                        {"date": "Mon, 21 Oct 2013 20:13:21 GMT"},
                        {"location": "https://www.example.com"}
                    ]
                }
            ]
        }"#,
    );
}

#[test]
fn generated_stories_round_trip() {
    // Encode a story with one encoder configuration, serialize it to
    // the story shape, and run it back through the decoder harness.
    let blocks: Vec<Vec<(&[u8], &[u8])>> = vec![
        vec![(b":status", b"200"), (b"content-type", b"text/html")],
        vec![(b":status", b"200"), (b"content-type", b"text/css")],
    ];

    let mut encoder = Encoder::with_options(Direction::Response, CompressionOptions::DIFF_H);
    let mut cases = Vec::new();
    for block in &blocks {
        let wire = encoder.encode(block).unwrap();
        let headers: Vec<String> = block
            .iter()
            .map(|(n, v)| {
                format!(
                    r#"{{"{}": "{}"}}"#,
                    String::from_utf8_lossy(n),
                    String::from_utf8_lossy(v)
                )
            })
            .collect();
        cases.push(format!(
            r#"{{"wire": "{}", "headers": [{}]}}"#,
            wire.iter().map(|b| format!("{b:02x}")).collect::<String>(),
            headers.join(",")
        ));
    }
    let story = format!(
        r#"{{"context": "response", "header_table_size": 4096, "cases": [{}]}}"#,
        cases.join(",")
    );
    run_story(&story);
}
