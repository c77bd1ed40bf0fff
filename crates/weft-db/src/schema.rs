//! SQL schema definitions.

/// Complete schema for the weft v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Ledger: blocks and transactions
-- ============================================================

CREATE TABLE IF NOT EXISTS blocks (
    id TEXT PRIMARY KEY,
    height INTEGER UNIQUE,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_blocks_created ON blocks(created_at);

-- app_name, app_version and content_type hold the values of indexed tags
-- (see tag_index.rs); tags_json keeps the full ordered tag list.
CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    owner_address TEXT NOT NULL,
    target TEXT,
    height INTEGER,
    created_at INTEGER NOT NULL,
    tags_json TEXT NOT NULL DEFAULT '[]',
    app_name TEXT,
    app_version TEXT,
    content_type TEXT
);

CREATE INDEX IF NOT EXISTS idx_tx_height ON transactions(height);
CREATE INDEX IF NOT EXISTS idx_tx_owner ON transactions(owner_address);
CREATE INDEX IF NOT EXISTS idx_tx_target ON transactions(target);
CREATE INDEX IF NOT EXISTS idx_tx_created ON transactions(created_at);
CREATE INDEX IF NOT EXISTS idx_tx_app_name ON transactions(app_name);
CREATE INDEX IF NOT EXISTS idx_tx_app_version ON transactions(app_version);
CREATE INDEX IF NOT EXISTS idx_tx_content_type ON transactions(content_type);

-- ============================================================
-- Generic tags
-- ============================================================

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tx_id TEXT NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tags_name_value ON tags(name, value);
CREATE INDEX IF NOT EXISTS idx_tags_tx ON tags(tx_id);
CREATE INDEX IF NOT EXISTS idx_tags_created ON tags(created_at);

-- ============================================================
-- Verified chunks
-- ============================================================

CREATE TABLE IF NOT EXISTS chunks (
    byte_offset INTEGER PRIMARY KEY,
    data_root BLOB NOT NULL,
    data_size INTEGER NOT NULL,
    chunk BLOB NOT NULL,
    data_path BLOB NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_root ON chunks(data_root);
"#;
