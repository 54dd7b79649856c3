//! Tests for pagination module

use super::*;
use crate::cursor::{self, CursorToken};
use crate::error::{Error, Result};
use crate::storage::RowAccessor;
use crate::types::{CompositeKey, NewRow, Row};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;
use test_case::test_case;

// ============================================================================
// Test Accessors
// ============================================================================

/// Accessor over a vector, recording the intents it receives
struct VecAccessor {
    rows: Vec<Row>,
    calls: Mutex<Vec<&'static str>>,
}

impl VecAccessor {
    fn new(rows: &[(i64, i64)]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|&(id, created_at)| {
                    NewRow::new(format!("n{id}"), 30, "Delhi", created_at).with_id(id)
                })
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn by_id(&self) -> Vec<Row> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|r| r.id);
        rows
    }

    fn by_key_desc(&self) -> Vec<Row> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|r| std::cmp::Reverse(r.key()));
        rows
    }
}

impl RowAccessor for VecAccessor {
    fn scan_skip(&self, offset: u64, limit: u64) -> Result<Vec<Row>> {
        self.record("scan_skip");
        Ok(self
            .by_id()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    fn scan_after_id(&self, after: Option<i64>, limit: u64) -> Result<Vec<Row>> {
        self.record("scan_after_id");
        Ok(self
            .by_id()
            .into_iter()
            .filter(|r| after.map_or(true, |last| r.id > last))
            .take(limit as usize)
            .collect())
    }

    fn scan_before_key(&self, before: Option<CompositeKey>, limit: u64) -> Result<Vec<Row>> {
        self.record("scan_before_key");
        Ok(self
            .by_key_desc()
            .into_iter()
            .filter(|r| before.map_or(true, |key| r.key() < key))
            .take(limit as usize)
            .collect())
    }

    fn count_before_key(&self, key: CompositeKey) -> Result<u64> {
        self.record("count_before_key");
        Ok(self.rows.iter().filter(|r| r.key() < key).count() as u64)
    }
}

/// Accessor whose existence probe fails
struct ProbeFailingAccessor(VecAccessor);

impl RowAccessor for ProbeFailingAccessor {
    fn scan_skip(&self, offset: u64, limit: u64) -> Result<Vec<Row>> {
        self.0.scan_skip(offset, limit)
    }

    fn scan_after_id(&self, after: Option<i64>, limit: u64) -> Result<Vec<Row>> {
        self.0.scan_after_id(after, limit)
    }

    fn scan_before_key(&self, before: Option<CompositeKey>, limit: u64) -> Result<Vec<Row>> {
        self.0.scan_before_key(before, limit)
    }

    fn count_before_key(&self, _key: CompositeKey) -> Result<u64> {
        Err(Error::storage("connection reset"))
    }
}

fn ids<M>(page: &Page<M>) -> Vec<i64> {
    page.data.iter().map(|r| r.id).collect()
}

// ============================================================================
// Request Validation
// ============================================================================

#[test_case(0 ; "zero")]
#[test_case(101 ; "above max")]
#[test_case(-1 ; "negative")]
fn test_limit_out_of_range(limit: i64) {
    assert!(matches!(
        OffsetRequest::new(0, limit),
        Err(Error::InvalidParameter { ref name, .. }) if name == "limit"
    ));
    assert!(KeysetRequest::new(limit, None).is_err());
    assert!(CursorRequest::new(limit, None).is_err());
    assert!(matches!(
        PageRequest::new(1, limit),
        Err(Error::InvalidParameter { ref name, .. }) if name == "page_size"
    ));
}

#[test_case(1 ; "min")]
#[test_case(10 ; "default")]
#[test_case(100 ; "max")]
fn test_limit_in_range(limit: i64) {
    assert_eq!(OffsetRequest::new(0, limit).unwrap().limit(), limit as u64);
    assert_eq!(KeysetRequest::new(limit, None).unwrap().limit(), limit as u64);
    assert_eq!(CursorRequest::new(limit, None).unwrap().limit(), limit as u64);
    assert_eq!(PageRequest::new(1, limit).unwrap().page_size(), limit as u64);
}

#[test]
fn test_offset_request() {
    assert!(OffsetRequest::new(-1, 10).is_err());

    let request = OffsetRequest::new(20, 10).unwrap();
    assert_eq!(request.offset(), 20);
    assert_eq!(request.next(), OffsetRequest::new(30, 10).unwrap());

    assert_eq!(
        OffsetRequest::from_parts(None, None).unwrap(),
        OffsetRequest::default()
    );
    assert_eq!(OffsetRequest::default().limit(), 10);
}

#[test]
fn test_page_request() {
    assert!(matches!(
        PageRequest::new(0, 10),
        Err(Error::InvalidParameter { ref name, .. }) if name == "page"
    ));
    assert!(PageRequest::new(i64::MAX, 100).is_err());

    let request = PageRequest::new(3, 10).unwrap();
    assert_eq!(request.to_offset(), OffsetRequest::new(20, 10).unwrap());
    assert_eq!(PageRequest::new(1, 25).unwrap().to_offset().offset(), 0);
    assert_eq!(PageRequest::from_parts(None, None).unwrap(), PageRequest::default());
}

#[test]
fn test_keyset_request_keeps_zero() {
    let request = KeysetRequest::new(10, Some(0)).unwrap();
    assert_eq!(request.last_id(), Some(0));
    assert_eq!(KeysetRequest::default().last_id(), None);
}

#[test]
fn test_cursor_request_from_parts() {
    let token = cursor::encode(100, 2);
    let request = CursorRequest::from_parts(Some(5), Some(&token)).unwrap();
    assert_eq!(request.after(), Some(CursorToken::new(100, 2)));

    assert!(matches!(
        CursorRequest::from_parts(None, Some("garbage!")),
        Err(Error::MalformedToken { .. })
    ));
    assert!(matches!(
        CursorRequest::from_parts(Some(101), Some("garbage!")),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn test_strategy_names() {
    assert_eq!(Strategy::Offset.to_string(), "offset");
    assert_eq!(Strategy::ALL.len(), 4);
    assert!(Strategy::Page.drifts_under_inserts());
    assert!(!Strategy::Cursor.drifts_under_inserts());
}

// ============================================================================
// Envelopes
// ============================================================================

#[test]
fn test_offset_envelope_shape() {
    let rows = vec![NewRow::new("a", 20, "Tokyo", 5).with_id(1)];
    let page = OffsetPage::assemble(rows, &OffsetRequest::new(0, 1).unwrap());

    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({
            "data": [{"id": 1, "name": "a", "age": 20, "city": "Tokyo", "created_at": 5}],
            "offset": 0,
            "limit": 1
        })
    );
}

#[test]
fn test_page_envelope_shape() {
    let page = NumberedPage::assemble(vec![], &PageRequest::new(4, 25).unwrap());
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({"data": [], "page": 4, "page_size": 25})
    );
}

#[test]
fn test_keyset_envelope_shape() {
    let empty = KeysetPage::assemble(vec![]);
    assert_eq!(
        serde_json::to_value(&empty).unwrap(),
        json!({"data": [], "next_last_id": null})
    );

    let rows = vec![
        NewRow::new("a", 1, "x", 1).with_id(4),
        NewRow::new("b", 1, "x", 1).with_id(9),
    ];
    assert_eq!(KeysetPage::assemble(rows).meta.next_last_id, Some(9));
}

#[test]
fn test_cursor_envelope_shape() {
    let rows = vec![NewRow::new("a", 1, "x", 100).with_id(3)];
    let page = CursorPage::assemble(rows, true);
    let value = serde_json::to_value(&page).unwrap();

    assert_eq!(value["page_info"]["has_next_page"], json!(true));
    assert_eq!(value["page_info"]["end_cursor"], json!(cursor::encode(100, 3)));

    let back: CursorPage = serde_json::from_value(value).unwrap();
    assert_eq!(back, page);
}

// ============================================================================
// Strategies
// ============================================================================

#[test]
fn test_offset_paginator() {
    let store = VecAccessor::new(&[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);

    let page = OffsetPaginator
        .fetch(&store, &OffsetRequest::new(1, 2).unwrap())
        .unwrap();
    assert_eq!(ids(&page), vec![2, 3]);
    assert_eq!(page.meta, OffsetMeta { offset: 1, limit: 2 });

    let beyond = OffsetPaginator
        .fetch(&store, &OffsetRequest::new(50, 2).unwrap())
        .unwrap();
    assert!(beyond.is_empty());
    assert_eq!(OffsetPaginator.strategy(), Strategy::Offset);
}

#[test]
fn test_page_number_paginator_matches_offset() {
    let store = VecAccessor::new(&[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);

    let page = PageNumberPaginator
        .fetch(&store, &PageRequest::new(2, 2).unwrap())
        .unwrap();
    let offset = OffsetPaginator
        .fetch(&store, &OffsetRequest::new(2, 2).unwrap())
        .unwrap();

    assert_eq!(page.data, offset.data);
    assert_eq!(page.meta, PageMeta { page: 2, page_size: 2 });
    assert_eq!(store.calls(), vec!["scan_skip", "scan_skip"]);
}

#[test]
fn test_keyset_paginator() {
    let store = VecAccessor::new(&[(1, 0), (2, 0), (3, 0)]);

    let first = KeysetPaginator
        .fetch(&store, &KeysetRequest::new(2, None).unwrap())
        .unwrap();
    assert_eq!(ids(&first), vec![1, 2]);
    assert_eq!(first.meta.next_last_id, Some(2));

    let last = KeysetPaginator
        .fetch(&store, &KeysetRequest::new(2, first.meta.next_last_id).unwrap())
        .unwrap();
    assert_eq!(ids(&last), vec![3]);

    let done = KeysetPaginator
        .fetch(&store, &KeysetRequest::new(2, Some(3)).unwrap())
        .unwrap();
    assert!(done.is_empty());
    assert_eq!(done.meta.next_last_id, None);
}

#[test]
fn test_keyset_zero_is_a_bound() {
    let store = VecAccessor::new(&[(0, 0), (1, 0)]);
    let from_start = KeysetPaginator
        .fetch(&store, &KeysetRequest::new(10, None).unwrap())
        .unwrap();
    let after_zero = KeysetPaginator
        .fetch(&store, &KeysetRequest::new(10, Some(0)).unwrap())
        .unwrap();

    assert_eq!(ids(&from_start), vec![0, 1]);
    assert_eq!(ids(&after_zero), vec![1]);
}

#[test]
fn test_cursor_paginator_probes_after_fetch() {
    let store = VecAccessor::new(&[(1, 100), (2, 100), (3, 200)]);

    let page = CursorPaginator
        .fetch(&store, &CursorRequest::new(2, None).unwrap())
        .unwrap();

    assert_eq!(ids(&page), vec![3, 2]);
    assert!(page.meta.page_info.has_next_page);
    assert_eq!(store.calls(), vec!["scan_before_key", "count_before_key"]);
}

#[test]
fn test_cursor_paginator_empty_page_skips_probe() {
    let store = VecAccessor::new(&[]);
    let page = CursorPaginator
        .fetch(&store, &CursorRequest::default())
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.meta.page_info, PageInfo::default());
    assert_eq!(store.calls(), vec!["scan_before_key"]);
}

#[test]
fn test_cursor_paginator_fails_whole_call_when_probe_fails() {
    let store = ProbeFailingAccessor(VecAccessor::new(&[(1, 100), (2, 200)]));
    let result = CursorPaginator.fetch(&store, &CursorRequest::new(1, None).unwrap());
    assert!(matches!(result, Err(Error::StorageUnavailable { .. })));
}
