//! Integration test: chunked upload and retrieval.
//!
//! A client splits a payload, builds its Merkle tree and submits one
//! envelope per chunk. The store must accept exactly the proven chunks and
//! hand them back intact by offset.

use std::sync::Arc;

use rand::RngCore;
use tokio::sync::Mutex;
use weft_crypto::Sha256Hasher;
use weft_db::queries::chunks;
use weft_storage::chunker::chunk_data;
use weft_storage::merkle::{build_tree, generate_proofs, validate_path};
use weft_storage::submission::{submit_chunk, SubmitError};
use weft_types::chunk::ChunkEnvelope;
use weft_types::encoding::{from_b64url, to_b64url};
use weft_types::{MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};

const TEST_TIMESTAMP: u64 = 1_700_000_000;

fn envelopes(data: &[u8]) -> Vec<ChunkEnvelope> {
    let spans = chunk_data::<Sha256Hasher>(data).expect("chunk");
    let tree = build_tree::<Sha256Hasher>(&spans).expect("tree");
    let root = to_b64url(&tree.data_root());

    spans
        .iter()
        .zip(generate_proofs(&tree))
        .map(|(span, path)| ChunkEnvelope {
            chunk: to_b64url(span.slice(data)),
            data_path: to_b64url(&path.proof),
            data_root: root.clone(),
            offset: path.offset,
            data_size: tree.data_size(),
        })
        .collect()
}

fn random_payload(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

#[test]
fn single_chunk_test_payload() {
    let conn = weft_db::open_memory().expect("open");
    let envelope = envelopes(b"test").pop().expect("envelope");
    assert_eq!(envelope.offset, 3);
    assert_eq!(envelope.data_size, 4);

    let root: [u8; 32] = from_b64url(&envelope.data_root)
        .expect("decode root")
        .try_into()
        .expect("32 bytes");
    let proof = from_b64url(&envelope.data_path).expect("decode path");
    assert!(validate_path::<Sha256Hasher>(&root, envelope.offset, 4, &proof));

    let receipt = submit_chunk(&conn, &envelope, TEST_TIMESTAMP).expect("accepted");
    assert_eq!(receipt.size, 4);
    assert_eq!(receipt.header.data_root, envelope.data_root);
    assert_eq!(receipt.header.data_path, envelope.data_path);

    let stored = chunks::get_by_offset(&conn, 3)
        .expect("get")
        .expect("present");
    let view = stored.to_envelope();
    assert_eq!(from_b64url(&view.chunk).expect("decode chunk"), b"test");
    assert_eq!(view.data_root, envelope.data_root);
    assert_eq!(view.data_size, 4);
}

#[test]
fn multi_chunk_payload_round_trips() {
    let conn = weft_db::open_memory().expect("open");
    let data = random_payload(2 * MAX_CHUNK_SIZE + MIN_CHUNK_SIZE / 2);
    let envelopes = envelopes(&data);
    assert_eq!(envelopes.len(), 3);

    for envelope in &envelopes {
        submit_chunk(&conn, envelope, TEST_TIMESTAMP).expect("accepted");
    }

    let mut reassembled = Vec::with_capacity(data.len());
    for envelope in &envelopes {
        let stored = chunks::get_by_offset(&conn, envelope.offset)
            .expect("get")
            .expect("present");
        reassembled.extend_from_slice(&stored.chunk);
    }
    assert_eq!(reassembled, data);
}

#[test]
fn chunk_from_another_payload_is_rejected() {
    let conn = weft_db::open_memory().expect("open");
    let first = envelopes(&random_payload(MAX_CHUNK_SIZE + 100));
    let second = envelopes(&random_payload(MAX_CHUNK_SIZE + 100));

    let mut forged = first[0].clone();
    forged.chunk = second[0].chunk.clone();
    assert!(matches!(
        submit_chunk(&conn, &forged, TEST_TIMESTAMP),
        Err(SubmitError::Validation(_))
    ));

    let mut spliced = first[1].clone();
    spliced.data_path = second[1].data_path.clone();
    assert!(matches!(
        submit_chunk(&conn, &spliced, TEST_TIMESTAMP),
        Err(SubmitError::Validation(_))
    ));

    assert_eq!(chunks::count(&conn).expect("count"), 0);
}

#[tokio::test]
async fn concurrent_submissions_share_one_connection() {
    let db = Arc::new(Mutex::new(weft_db::open_memory().expect("open")));
    let data = random_payload(3 * MAX_CHUNK_SIZE);
    let envelopes = envelopes(&data);

    let mut handles = Vec::new();
    for envelope in envelopes.clone() {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            let conn = db.lock().await;
            submit_chunk(&conn, &envelope, TEST_TIMESTAMP).map(|r| r.size)
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.expect("join").expect("accepted");
    }
    assert_eq!(total, data.len());

    let conn = db.lock().await;
    assert_eq!(
        chunks::count(&conn).expect("count"),
        envelopes.len() as u64
    );
}
