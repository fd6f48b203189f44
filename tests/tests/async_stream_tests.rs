//! End-to-end tests for the asynchronous stream adapter

use std::sync::Arc;

use blockpipe::api::error::Error;
use blockpipe::api::types::Direction;
use blockpipe::stream::{AsyncBlockStream, MemoryChannel, TokioChannel};
use blockpipe::transforms::XorBlockCipher;
use blockpipe_tests::{xor_decode, xor_encode};

const KEY: &[u8] = &[0x9d, 0x4e, 0x2f, 0x60, 0xb1, 0x8c, 0x73, 0x05];

async fn drain(stream: &AsyncBlockStream<TokioChannel<tokio::io::DuplexStream>, XorBlockCipher>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; 32];
    loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    out
}

#[tokio::test]
async fn async_writer_interoperates_with_sync_reader() {
    let payload: Vec<u8> = (0..300).map(|i| (i * 13 % 256) as u8).collect();

    let (near, mut far) = tokio::io::duplex(4096);
    let writer = AsyncBlockStream::new(
        TokioChannel::new(near),
        XorBlockCipher::encoder(KEY).unwrap(),
        Direction::Write,
    )
    .unwrap();
    for part in payload.chunks(23) {
        writer.write(part).await.unwrap();
    }
    writer.flush_final_block().await.unwrap();
    writer.close().await.unwrap();

    let mut wire = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut far, &mut wire)
        .await
        .unwrap();
    // The same bytes a synchronous encoder would have produced.
    assert_eq!(wire, xor_encode(KEY, &payload, payload.len()));
    assert_eq!(xor_decode(KEY, &wire, 17), payload);
}

#[tokio::test]
async fn async_reader_decodes_what_sync_writer_encoded() {
    let payload = b"written sync, read async".to_vec();
    let wire = xor_encode(KEY, &payload, 6);

    let (mut near, far) = tokio::io::duplex(4096);
    tokio::io::AsyncWriteExt::write_all(&mut near, &wire)
        .await
        .unwrap();
    tokio::io::AsyncWriteExt::shutdown(&mut near).await.unwrap();

    let reader = AsyncBlockStream::new(
        TokioChannel::new(far),
        XorBlockCipher::decoder(KEY).unwrap(),
        Direction::Read,
    )
    .unwrap();
    assert_eq!(drain(&reader).await, payload);
    assert!(reader.has_flushed_final_block().await);
}

#[tokio::test]
async fn shared_adapter_survives_concurrent_use() {
    let stream = Arc::new(
        AsyncBlockStream::new(
            MemoryChannel::new(),
            XorBlockCipher::encoder(KEY).unwrap(),
            Direction::Write,
        )
        .unwrap(),
    );

    // Eight tasks write one whole block each through shared references;
    // the internal lock must keep every block intact.
    let mut tasks = Vec::new();
    for i in 0..8u8 {
        let stream = stream.clone();
        tasks.push(tokio::spawn(async move {
            stream.write(&[i; 8]).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    stream.flush_final_block().await.unwrap();

    let err = stream.write(&[0]).await;
    assert!(matches!(err, Err(Error::Unsupported { .. })));
}

#[tokio::test]
async fn finalize_races_resolve_to_exactly_one_winner() {
    let stream = Arc::new(
        AsyncBlockStream::new(
            MemoryChannel::new(),
            XorBlockCipher::encoder(KEY).unwrap(),
            Direction::Write,
        )
        .unwrap(),
    );
    stream.write(b"contended trailer").await.unwrap();

    let a = stream.clone();
    let b = stream.clone();
    let (ra, rb) = tokio::join!(
        async move { a.flush_final_block().await },
        async move { b.flush_final_block().await },
    );
    // One side wins, the other observes the stream already finalized.
    assert_ne!(ra.is_ok(), rb.is_ok());
    let loser = if ra.is_err() { ra } else { rb };
    assert!(matches!(loser, Err(Error::Unsupported { .. })));
}
