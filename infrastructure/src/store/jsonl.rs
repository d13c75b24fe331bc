//! Append-only JSONL query store.
//!
//! Each [`StoredQuery`] is serialized as a single JSON line, appended via a
//! buffered writer and flushed after every record. Opening the store scans
//! the file once and keeps an index of record id, tenant and byte range;
//! record bodies stay on disk and are read back on lookup, so memory grows
//! with the number of records but not with their size.

use async_trait::async_trait;
use chrono::Utc;
use council_application::{QueryStore, StoreError, StoredQuery};
use council_domain::CouncilResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Where a record's line lives in the file
#[derive(Debug, Clone)]
struct RecordLocation {
    tenant_id: String,
    offset: u64,
    len: usize,
}

struct Inner {
    writer: BufWriter<File>,
    reader: File,
    /// Length of the file, i.e. the offset of the next record
    end: u64,
    index: HashMap<String, RecordLocation>,
}

struct Scan {
    index: HashMap<String, RecordLocation>,
    end: u64,
    /// The last line has no trailing newline (interrupted write)
    unterminated: bool,
}

/// JSONL query store. Thread-safe via `Mutex`. Flushes on `Drop`.
pub struct JsonlQueryStore {
    inner: Mutex<Inner>,
    path: PathBuf,
}

impl JsonlQueryStore {
    /// Open (or create) the store file, creating parent directories.
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let scan = if path.exists() {
            Self::scan(path)?
        } else {
            Scan {
                index: HashMap::new(),
                end: 0,
                unterminated: false,
            }
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        let mut end = scan.end;
        if scan.unterminated {
            // Next record must start on its own line
            writer.write_all(b"\n")?;
            writer.flush()?;
            end += 1;
        }
        let reader = File::open(path)?;
        info!(path = %path.display(), records = scan.index.len(), "Opened query store");

        Ok(Self {
            inner: Mutex::new(Inner {
                writer,
                reader,
                end,
                index: scan.index,
            }),
            path: path.to_path_buf(),
        })
    }

    fn scan(path: &Path) -> Result<Scan, StoreError> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut index = HashMap::new();
        let mut offset = 0u64;
        let mut unterminated = false;
        let mut line = String::new();
        let mut n = 0usize;

        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                break;
            }
            n += 1;
            unterminated = !line.ends_with('\n');
            let body = line.trim_end_matches(['\n', '\r']);
            if !body.trim().is_empty() {
                match serde_json::from_str::<StoredQuery>(body) {
                    Ok(record) => {
                        index.insert(
                            record.record_id,
                            RecordLocation {
                                tenant_id: record.tenant_id,
                                offset,
                                len: body.len(),
                            },
                        );
                    }
                    Err(e) => warn!(path = %path.display(), line = n, "Skipping unreadable record: {}", e),
                }
            }
            offset += read as u64;
        }

        Ok(Scan {
            index,
            end: offset,
            unterminated,
        })
    }

    /// Get the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Inner {
    fn read_record(&mut self, location: &RecordLocation) -> Result<StoredQuery, StoreError> {
        let mut buf = vec![0u8; location.len];
        self.reader.seek(SeekFrom::Start(location.offset))?;
        self.reader.read_exact(&mut buf)?;
        Ok(serde_json::from_slice(&buf)?)
    }
}

#[async_trait]
impl QueryStore for JsonlQueryStore {
    async fn save_query(
        &self,
        query: &str,
        result: &CouncilResult,
        domain: &str,
        tenant_id: &str,
    ) -> Result<String, StoreError> {
        let record = StoredQuery {
            record_id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            domain: domain.to_string(),
            query: query.to_string(),
            result: result.clone(),
            created_at: Utc::now(),
        };
        let line = serde_json::to_string(&record)?;

        let mut inner = self.inner.lock();
        writeln!(inner.writer, "{}", line)?;
        // JSONL is append-only; flush per record for crash safety
        inner.writer.flush()?;

        let location = RecordLocation {
            tenant_id: record.tenant_id,
            offset: inner.end,
            len: line.len(),
        };
        inner.end += line.len() as u64 + 1;
        inner.index.insert(record.record_id.clone(), location);
        Ok(record.record_id)
    }

    async fn get_query(
        &self,
        record_id: &str,
        tenant_id: &str,
    ) -> Result<Option<StoredQuery>, StoreError> {
        let mut inner = self.inner.lock();
        let Some(location) = inner
            .index
            .get(record_id)
            .filter(|l| l.tenant_id == tenant_id)
            .cloned()
        else {
            return Ok(None);
        };
        inner.read_record(&location).map(Some)
    }
}

impl Drop for JsonlQueryStore {
    fn drop(&mut self) {
        let _ = self.inner.lock().writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{CouncilMember, CouncilOpinion, Query};
    use std::collections::BTreeMap;

    fn sample_result(query: &str) -> CouncilResult {
        let member = CouncilMember::new("a", "x/a", "Advisor A", "p");
        let opinions = BTreeMap::from([(
            "a".to_string(),
            CouncilOpinion::success(&member, "agreed"),
        )]);
        CouncilResult::new(&Query::try_new(query).unwrap(), opinions)
    }

    #[tokio::test]
    async fn test_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.jsonl");
        let store = JsonlQueryStore::open(&path).unwrap();

        for q in ["first", "second"] {
            let result = sample_result(q);
            store
                .save_query(q, &result, "healthcare", "mercy")
                .await
                .unwrap();
        }
        drop(store);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["tenant_id"], "mercy");
        assert_eq!(first["query"], "first");
        assert_eq!(first["result"]["stage"], "stage_1_complete");
    }

    #[tokio::test]
    async fn test_reopen_restores_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("queries.jsonl");

        let result = sample_result("persist me");
        let id = {
            let store = JsonlQueryStore::open(&path).unwrap();
            store
                .save_query("persist me", &result, "healthcare", "mercy")
                .await
                .unwrap()
        };

        let reopened = JsonlQueryStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        let record = reopened.get_query(&id, "mercy").await.unwrap().unwrap();
        assert_eq!(record.result.session_id, result.session_id);
        assert!(reopened.get_query(&id, "lakeside").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.jsonl");

        let id = {
            let store = JsonlQueryStore::open(&path).unwrap();
            let result = sample_result("ok");
            store.save_query("ok", &result, "healthcare", "mercy").await.unwrap()
        };
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{not json").unwrap();
        }

        let store = JsonlQueryStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_query(&id, "mercy").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lookup_reads_body_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.jsonl");
        let store = JsonlQueryStore::open(&path).unwrap();

        let mut ids = Vec::new();
        for q in ["one", "two", "three"] {
            let result = sample_result(q);
            ids.push(store.save_query(q, &result, "healthcare", "mercy").await.unwrap());
        }

        let second = store.get_query(&ids[1], "mercy").await.unwrap().unwrap();
        assert_eq!(second.query, "two");
        let third = store.get_query(&ids[2], "mercy").await.unwrap().unwrap();
        assert_eq!(third.query, "three");
        assert!(store.get_query("missing", "mercy").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_interrupted_last_line_does_not_swallow_next_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.jsonl");

        let first = {
            let store = JsonlQueryStore::open(&path).unwrap();
            let result = sample_result("before");
            store.save_query("before", &result, "healthcare", "mercy").await.unwrap()
        };
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            write!(file, "{{\"record_id\": \"trunc").unwrap();
        }

        let second = {
            let store = JsonlQueryStore::open(&path).unwrap();
            let result = sample_result("after");
            let id = store.save_query("after", &result, "healthcare", "mercy").await.unwrap();
            let record = store.get_query(&id, "mercy").await.unwrap().unwrap();
            assert_eq!(record.query, "after");
            id
        };

        let store = JsonlQueryStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get_query(&first, "mercy").await.unwrap().is_some());
        assert!(store.get_query(&second, "mercy").await.unwrap().is_some());
    }
}
