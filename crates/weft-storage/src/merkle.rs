//! Variable-leaf Merkle trees and data path validation.
//!
//! Leaves are chunks of differing sizes, so every node records the byte
//! offsets it covers and every branch commits to the boundary between its
//! children:
//!
//! - leaf id   = `H(H(data_hash) || H(note(max_byte_range)))`
//! - branch id = `H(H(left_id) || H(right_id) || H(note(boundary)))`
//!
//! where `note(n)` is `n` as a 32-byte big-endian integer and `boundary` is
//! the left child's upper byte offset.
//!
//! A data path is the serialized walk from the root to one leaf: a
//! `left_id || right_id || note` segment for every branch, then a
//! `data_hash || note` segment for the leaf. Validation is a pure function of
//! its byte inputs and never fails loudly: anything malformed is invalid.

use weft_crypto::{Hash, MerkleHasher};
use weft_types::{HASH_SIZE, NOTE_SIZE};

use crate::chunker::{ChunkSpan, Chunker};
use crate::{Result, StorageError};

/// Serialized size of a branch segment in a data path.
pub const BRANCH_SEGMENT_SIZE: usize = HASH_SIZE * 2 + NOTE_SIZE;

/// Serialized size of the leaf segment that terminates a data path.
pub const LEAF_SEGMENT_SIZE: usize = HASH_SIZE + NOTE_SIZE;

/// Encode an offset as a 32-byte big-endian note.
pub fn encode_note(value: u64) -> [u8; NOTE_SIZE] {
    let mut note = [0u8; NOTE_SIZE];
    note[NOTE_SIZE - 8..].copy_from_slice(&value.to_be_bytes());
    note
}

/// Decode a 32-byte big-endian note. Values beyond `u64` are rejected.
pub fn decode_note(note: &[u8]) -> Option<u64> {
    if note.len() != NOTE_SIZE {
        return None;
    }
    let (high, low) = note.split_at(NOTE_SIZE - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    Some(u64::from_be_bytes(low.try_into().ok()?))
}

fn leaf_id<H: MerkleHasher>(data_hash: &[u8], note: &[u8]) -> Hash {
    let data_hash = H::hash(data_hash);
    let note = H::hash(note);
    H::digest(&[&data_hash[..], &note[..]])
}

fn branch_id<H: MerkleHasher>(left: &[u8], right: &[u8], note: &[u8]) -> Hash {
    let left = H::hash(left);
    let right = H::hash(right);
    let note = H::hash(note);
    H::digest(&[&left[..], &right[..], &note[..]])
}

/// A node of a data tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        id: Hash,
        data_hash: Hash,
        min_byte_range: u64,
        max_byte_range: u64,
    },
    Branch {
        id: Hash,
        /// Upper byte offset of the left child.
        byte_range: u64,
        max_byte_range: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn id(&self) -> Hash {
        match self {
            Node::Leaf { id, .. } | Node::Branch { id, .. } => *id,
        }
    }

    pub fn max_byte_range(&self) -> u64 {
        match self {
            Node::Leaf { max_byte_range, .. } | Node::Branch { max_byte_range, .. } => {
                *max_byte_range
            }
        }
    }

    fn leaf<H: MerkleHasher>(span: &ChunkSpan) -> Self {
        Node::Leaf {
            id: leaf_id::<H>(&span.data_hash, &encode_note(span.max_byte_range)),
            data_hash: span.data_hash,
            min_byte_range: span.min_byte_range,
            max_byte_range: span.max_byte_range,
        }
    }

    fn branch<H: MerkleHasher>(left: Node, right: Node) -> Self {
        let byte_range = left.max_byte_range();
        Node::Branch {
            id: branch_id::<H>(&left.id(), &right.id(), &encode_note(byte_range)),
            byte_range,
            max_byte_range: right.max_byte_range(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Pair nodes level by level until one root remains. An odd node at the end
/// of a level is carried up unchanged.
fn build_layers<H: MerkleHasher>(mut nodes: Vec<Node>) -> Option<Node> {
    while nodes.len() > 1 {
        let mut next = Vec::with_capacity(nodes.len().div_ceil(2));
        let mut level = nodes.into_iter();
        while let Some(left) = level.next() {
            match level.next() {
                Some(right) => next.push(Node::branch::<H>(left, right)),
                None => next.push(left),
            }
        }
        nodes = next;
    }
    nodes.pop()
}

/// A data path for one chunk, with the offset it should be submitted under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPath {
    /// Last byte covered by the chunk (`max_byte_range - 1`).
    pub offset: u64,
    pub proof: Vec<u8>,
}

/// A Merkle tree over a payload's chunks.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    root: Node,
}

impl MerkleTree {
    /// Build the tree over already computed chunk spans.
    pub fn from_spans<H: MerkleHasher>(spans: &[ChunkSpan]) -> Result<Self> {
        let leaves = spans.iter().map(Node::leaf::<H>).collect();
        let root = build_layers::<H>(leaves).ok_or(StorageError::EmptyContent)?;
        Ok(Self { root })
    }

    /// Chunk `data` with the default chunk sizes and build its tree.
    pub fn from_data<H: MerkleHasher>(data: &[u8]) -> Result<Self> {
        let spans = Chunker::default().chunk_data::<H>(data)?;
        Self::from_spans::<H>(&spans)
    }

    /// The data root identifying the payload.
    pub fn data_root(&self) -> Hash {
        self.root.id()
    }

    /// Total payload size covered by the tree.
    pub fn data_size(&self) -> u64 {
        self.root.max_byte_range()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// One data path per leaf, in payload order.
    pub fn data_paths(&self) -> Vec<DataPath> {
        let mut paths = Vec::new();
        collect_paths(&self.root, &[], &mut paths);
        paths
    }
}

/// Build the Merkle tree over a payload's chunk spans.
pub fn build_tree<H: MerkleHasher>(spans: &[ChunkSpan]) -> Result<MerkleTree> {
    MerkleTree::from_spans::<H>(spans)
}

/// Serialized data paths for every chunk of `tree`.
pub fn generate_proofs(tree: &MerkleTree) -> Vec<DataPath> {
    tree.data_paths()
}

fn collect_paths(node: &Node, prefix: &[u8], out: &mut Vec<DataPath>) {
    match node {
        Node::Leaf {
            data_hash,
            max_byte_range,
            ..
        } => {
            let mut proof = Vec::with_capacity(prefix.len() + LEAF_SEGMENT_SIZE);
            proof.extend_from_slice(prefix);
            proof.extend_from_slice(data_hash);
            proof.extend_from_slice(&encode_note(*max_byte_range));
            out.push(DataPath {
                offset: max_byte_range.saturating_sub(1),
                proof,
            });
        }
        Node::Branch {
            byte_range,
            left,
            right,
            ..
        } => {
            let mut next = Vec::with_capacity(prefix.len() + BRANCH_SEGMENT_SIZE);
            next.extend_from_slice(prefix);
            next.extend_from_slice(&left.id());
            next.extend_from_slice(&right.id());
            next.extend_from_slice(&encode_note(*byte_range));
            collect_paths(left, &next, out);
            collect_paths(right, &next, out);
        }
    }
}

/// The leaf a valid data path resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathLeaf {
    pub data_hash: Hash,
    pub min_byte_range: u64,
    pub max_byte_range: u64,
}

impl PathLeaf {
    pub fn chunk_size(&self) -> u64 {
        self.max_byte_range - self.min_byte_range
    }
}

/// Walk `path` from `root` towards the leaf covering `offset`.
///
/// Returns the leaf when every segment hashes to the id its parent committed
/// to, `offset` stays within the narrowed byte range at every level, and the
/// leaf ends exactly at the narrowed upper bound (so the rightmost leaf ends
/// at `data_size`). Returns `None` for anything else, including offsets
/// outside `[0, data_size)` and truncated or oversized paths.
pub fn resolve_path<H: MerkleHasher>(
    root: &Hash,
    offset: u64,
    data_size: u64,
    path: &[u8],
) -> Option<PathLeaf> {
    if offset >= data_size {
        return None;
    }

    let mut expected = *root;
    let mut left_bound = 0u64;
    let mut right_bound = data_size;
    let mut rest = path;

    while rest.len() > LEAF_SEGMENT_SIZE {
        if rest.len() < BRANCH_SEGMENT_SIZE + LEAF_SEGMENT_SIZE {
            return None;
        }
        let (segment, tail) = rest.split_at(BRANCH_SEGMENT_SIZE);
        let (left, segment) = segment.split_at(HASH_SIZE);
        let (right, note) = segment.split_at(HASH_SIZE);

        if branch_id::<H>(left, right, note) != expected {
            return None;
        }
        let boundary = decode_note(note)?;

        if offset < boundary {
            expected = left.try_into().ok()?;
            right_bound = right_bound.min(boundary);
        } else {
            expected = right.try_into().ok()?;
            left_bound = left_bound.max(boundary);
        }
        if offset < left_bound || offset >= right_bound {
            return None;
        }
        rest = tail;
    }

    if rest.len() != LEAF_SEGMENT_SIZE {
        return None;
    }
    let (data_hash, note) = rest.split_at(HASH_SIZE);
    if leaf_id::<H>(data_hash, note) != expected {
        return None;
    }
    let max_byte_range = decode_note(note)?;
    if max_byte_range != right_bound || max_byte_range > data_size {
        return None;
    }

    Some(PathLeaf {
        data_hash: data_hash.try_into().ok()?,
        min_byte_range: left_bound,
        max_byte_range,
    })
}

/// Whether `path` proves a chunk covering `offset` under `root`.
pub fn validate_path<H: MerkleHasher>(root: &Hash, offset: u64, data_size: u64, path: &[u8]) -> bool {
    resolve_path::<H>(root, offset, data_size, path).is_some()
}
