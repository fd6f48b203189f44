//! End-to-end tests for the synchronous stream adapter

use blockpipe::api::error::Error;
use blockpipe::api::types::{ChannelOwnership, Direction};
use blockpipe::stream::{BlockStream, MemoryChannel, ReaderChannel, WriterChannel};
use blockpipe::transforms::{generate_key, Identity, XorBlockCipher};
use blockpipe_tests::{xor_decode, xor_encode, CountingTransform};

const KEY: &[u8] = &[0x9d, 0x4e, 0x2f, 0x60, 0xb1, 0x8c, 0x73, 0x05];

#[test]
fn round_trips_payloads_of_every_alignment() {
    // Zero bytes, sub-block, exactly one block, and well past one block.
    for len in [0usize, 1, 7, 8, 9, 15, 16, 17, 64, 1000] {
        let payload: Vec<u8> = (0..len).map(|i| (i * 37 % 251) as u8).collect();
        let wire = xor_encode(KEY, &payload, 10);
        // Padded output is always a whole number of blocks, one larger
        // than the payload needs.
        assert_eq!(wire.len() % KEY.len(), 0);
        assert!(wire.len() > payload.len());
        assert_eq!(xor_decode(KEY, &wire, 13), payload, "len {}", len);
    }
}

#[test]
fn wire_bytes_are_independent_of_write_chunking() {
    let payload: Vec<u8> = (0..500).map(|i| (i % 256) as u8).collect();
    let reference = xor_encode(KEY, &payload, payload.len());
    for chunk in [1, 2, 7, 8, 9, 100] {
        assert_eq!(xor_encode(KEY, &payload, chunk), reference);
    }
}

#[test]
fn decoded_bytes_are_independent_of_read_chunking() {
    let payload = b"chunking must never change what comes out".to_vec();
    let wire = xor_encode(KEY, &payload, 16);
    for chunk in [1, 3, 8, 11, 64, 4096] {
        assert_eq!(xor_decode(KEY, &wire, chunk), payload);
    }
}

#[test]
fn generated_keys_round_trip() {
    let key = generate_key(16);
    let payload = b"fresh random key".to_vec();
    let wire = xor_encode(&key, &payload, 5);
    assert_eq!(xor_decode(&key, &wire, 9), payload);
}

#[test]
fn no_transformed_byte_is_ever_dropped() {
    // Conservation: bytes produced by the transform either reach the
    // channel or the caller, across both directions and both path choices.
    for multi_block in [false, true] {
        let (transform, tally) = CountingTransform::new(8, multi_block);
        let mut chan = MemoryChannel::new();
        let mut stream = BlockStream::with_ownership(
            &mut chan,
            transform,
            Direction::Write,
            ChannelOwnership::Borrowed,
        )
        .unwrap();
        stream.write(&[0xC3; 107]).unwrap();
        stream.flush_final_block().unwrap();
        drop(stream);
        assert_eq!(tally.consumed(), 107);
        assert_eq!(tally.produced(), 107);
        assert_eq!(tally.final_calls(), 1);
        assert_eq!(chan.bytes().len(), 107);

        let (transform, tally) = CountingTransform::new(8, multi_block);
        let mut stream = BlockStream::new(
            MemoryChannel::from_bytes(chan.into_bytes()),
            transform,
            Direction::Read,
        )
        .unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 24];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, vec![0xC3; 107]);
        assert_eq!(tally.produced(), 107);
        assert_eq!(tally.final_calls(), 1);
    }
}

#[test]
fn single_block_and_multi_block_transforms_agree() {
    let payload: Vec<u8> = (0..2048).map(|i| (i * 31 % 256) as u8).collect();

    let run = |multi: bool| {
        let transform = if multi {
            Identity::new(16).unwrap()
        } else {
            Identity::single_block(16).unwrap()
        };
        let mut chan = MemoryChannel::new();
        let mut stream = BlockStream::with_ownership(
            &mut chan,
            transform,
            Direction::Write,
            ChannelOwnership::Borrowed,
        )
        .unwrap();
        stream.write(&payload).unwrap();
        stream.flush_final_block().unwrap();
        drop(stream);
        chan.into_bytes()
    };

    assert_eq!(run(true), run(false));
}

#[test]
fn io_trait_impls_compose_with_std() {
    // The write adapter plugs into std::io::Write consumers.
    let sink = WriterChannel::new(Vec::new());
    let mut stream = BlockStream::new(
        sink,
        XorBlockCipher::encoder(KEY).unwrap(),
        Direction::Write,
    )
    .unwrap();
    std::io::Write::write_all(&mut stream, b"through std::io traits").unwrap();
    stream.flush_final_block().unwrap();

    // And the read adapter wraps any std::io::Read source.
    let wire = xor_encode(KEY, b"through std::io traits", 4);
    let source = ReaderChannel::new(std::io::Cursor::new(wire));
    let mut stream = BlockStream::new(
        source,
        XorBlockCipher::decoder(KEY).unwrap(),
        Direction::Read,
    )
    .unwrap();
    let mut out = Vec::new();
    std::io::Read::read_to_end(&mut stream, &mut out).unwrap();
    assert_eq!(out, b"through std::io traits");
}

#[test]
fn nested_adapters_chain_finalization() {
    let inner_key = generate_key(4);
    let mut chan = MemoryChannel::new();
    {
        let inner = BlockStream::with_ownership(
            &mut chan,
            XorBlockCipher::encoder(&inner_key).unwrap(),
            Direction::Write,
            ChannelOwnership::Borrowed,
        )
        .unwrap();
        let mut outer = BlockStream::new(
            inner,
            XorBlockCipher::encoder(KEY).unwrap(),
            Direction::Write,
        )
        .unwrap();
        outer.write(b"two layers, one finalize call").unwrap();
        outer.flush_final_block().unwrap();
    }

    let inner = BlockStream::new(
        MemoryChannel::from_bytes(chan.into_bytes()),
        XorBlockCipher::decoder(&inner_key).unwrap(),
        Direction::Read,
    )
    .unwrap();
    let mut outer = BlockStream::new(
        inner,
        XorBlockCipher::decoder(KEY).unwrap(),
        Direction::Read,
    )
    .unwrap();
    let mut out = Vec::new();
    std::io::Read::read_to_end(&mut outer, &mut out).unwrap();
    assert_eq!(out, b"two layers, one finalize call");
}

#[test]
fn tampered_wire_bytes_fail_with_an_integrity_error() {
    let mut wire = xor_encode(KEY, b"authenticity by padding only", 7);
    let last = wire.len() - 1;
    wire[last] = wire[last].wrapping_add(1);

    let mut stream = BlockStream::new(
        MemoryChannel::from_bytes(wire),
        XorBlockCipher::decoder(KEY).unwrap(),
        Direction::Read,
    )
    .unwrap();
    let mut buf = [0u8; 64];
    let err = loop {
        match stream.read(&mut buf) {
            Ok(0) => panic!("tampering went unnoticed"),
            Ok(_) => continue,
            Err(err) => break err,
        }
    };
    assert!(err.is_integrity());
    // An integrity failure is not an I/O failure.
    assert!(!matches!(err, Error::Channel(_)));
}

#[test]
fn truncated_wire_fails_instead_of_returning_partial_garbage() {
    let wire = xor_encode(KEY, b"cut short", 3);
    let truncated = &wire[..wire.len() - 3];

    let mut stream = BlockStream::new(
        MemoryChannel::from_bytes(truncated.to_vec()),
        XorBlockCipher::decoder(KEY).unwrap(),
        Direction::Read,
    )
    .unwrap();
    let mut buf = [0u8; 64];
    let err = loop {
        match stream.read(&mut buf) {
            Ok(0) => panic!("truncation went unnoticed"),
            Ok(_) => continue,
            Err(err) => break err,
        }
    };
    assert!(err.is_integrity());
}
