//! Streaming throughput with single-block and multi-block transforms

use blockpipe::api::types::{ChannelOwnership, Direction};
use blockpipe::stream::{BlockStream, MemoryChannel};
use blockpipe::transforms::{Identity, XorBlockCipher};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const KEY: &[u8] = &[0x42, 0x17, 0x99, 0xe3, 0x0c, 0x51, 0x8a, 0x6d, 0x42, 0x17, 0x99, 0xe3, 0x0c, 0x51, 0x8a, 0x6d];

fn encode_throughput(c: &mut Criterion) {
    let payload = vec![0xA5u8; 1 << 20];
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("xor/multi_block", |b| {
        b.iter(|| {
            let mut chan = MemoryChannel::new();
            let mut stream = BlockStream::with_ownership(
                &mut chan,
                XorBlockCipher::encoder(KEY).unwrap(),
                Direction::Write,
                ChannelOwnership::Borrowed,
            )
            .unwrap();
            stream.write(black_box(&payload)).unwrap();
            stream.flush_final_block().unwrap();
            drop(stream);
            black_box(chan.into_bytes())
        })
    });

    group.bench_function("identity/single_block", |b| {
        b.iter(|| {
            let mut chan = MemoryChannel::new();
            let mut stream = BlockStream::with_ownership(
                &mut chan,
                Identity::single_block(16).unwrap(),
                Direction::Write,
                ChannelOwnership::Borrowed,
            )
            .unwrap();
            stream.write(black_box(&payload)).unwrap();
            stream.flush_final_block().unwrap();
            drop(stream);
            black_box(chan.into_bytes())
        })
    });
    group.finish();
}

fn decode_throughput(c: &mut Criterion) {
    let payload = vec![0xA5u8; 1 << 20];
    let wire = {
        let mut chan = MemoryChannel::new();
        let mut stream = BlockStream::with_ownership(
            &mut chan,
            XorBlockCipher::encoder(KEY).unwrap(),
            Direction::Write,
            ChannelOwnership::Borrowed,
        )
        .unwrap();
        stream.write(&payload).unwrap();
        stream.flush_final_block().unwrap();
        drop(stream);
        chan.into_bytes()
    };

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(wire.len() as u64));

    group.bench_function("xor/fast_path", |b| {
        let mut dest = vec![0u8; payload.len() + 64];
        b.iter(|| {
            let mut stream = BlockStream::new(
                MemoryChannel::from_bytes(wire.clone()),
                XorBlockCipher::decoder(KEY).unwrap(),
                Direction::Read,
            )
            .unwrap();
            let mut total = 0;
            loop {
                let n = stream.read(&mut dest[total..]).unwrap();
                if n == 0 {
                    break;
                }
                total += n;
            }
            black_box(total)
        })
    });

    group.bench_function("xor/small_reads", |b| {
        let mut buf = [0u8; 64];
        b.iter(|| {
            let mut stream = BlockStream::new(
                MemoryChannel::from_bytes(wire.clone()),
                XorBlockCipher::decoder(KEY).unwrap(),
                Direction::Read,
            )
            .unwrap();
            let mut total = 0;
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                total += n;
            }
            black_box(total)
        })
    });
    group.finish();
}

criterion_group!(benches, encode_throughput, decode_throughput);
criterion_main!(benches);
