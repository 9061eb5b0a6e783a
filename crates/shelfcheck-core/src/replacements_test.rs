use std::sync::Mutex;

use super::*;

fn asin(raw: &str) -> Asin {
    Asin::parse(raw).expect("non-empty test asin")
}

/// Serves canned records and remembers every batch it was asked for.
struct StubSource {
    records: Vec<ProductRecord>,
    fail: bool,
    calls: Mutex<Vec<Vec<Asin>>>,
}

impl StubSource {
    fn with_records(ids: &[&str]) -> Self {
        Self {
            records: ids.iter().map(|id| ProductRecord::new(asin(id))).collect(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ProductSource for StubSource {
    type Error = std::io::Error;

    async fn get_items(&self, asins: &[Asin]) -> Result<Vec<ProductRecord>, Self::Error> {
        self.calls.lock().unwrap().push(asins.to_vec());
        if self.fail {
            return Err(std::io::Error::other("connection reset"));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| asins.contains(&r.asin))
            .cloned()
            .collect())
    }
}

#[test]
fn from_json_parses_object() {
    let map = ReplacementMap::from_json(r#"{"A": "B", "C": "B"}"#).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&asin("A")), Some(&asin("B")));
    assert_eq!(map.targets().len(), 1);
}

#[test]
fn from_json_rejects_non_string_values() {
    assert!(ReplacementMap::from_json(r#"{"A": 1}"#).is_err());
    assert!(ReplacementMap::from_json(r#"["A", "B"]"#).is_err());
    assert!(ReplacementMap::from_json(r#"{"A": ""}"#).is_err());
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let map = load_replacements(&dir.path().join("replacements.json"));
    assert!(map.is_empty());
}

#[test]
fn load_malformed_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replacements.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_replacements(&path).is_empty());
}

#[test]
fn load_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replacements.json");
    std::fs::write(&path, r#"{"B0OLD00001": "B0NEW00001"}"#).unwrap();
    let map = load_replacements(&path);
    assert_eq!(map.get(&asin("B0OLD00001")), Some(&asin("B0NEW00001")));
}

#[tokio::test]
async fn resolve_rekeys_by_original_identifier() {
    let map: ReplacementMap = [(asin("A"), asin("B"))].into_iter().collect();
    let source = StubSource::with_records(&["B"]);

    let lookup = resolve_replacements(&map, &source).await.unwrap();

    assert_eq!(lookup.len(), 1);
    assert_eq!(lookup[&asin("A")].asin, asin("B"));
}

#[tokio::test]
async fn resolve_fetches_distinct_targets_in_one_batch() {
    let map: ReplacementMap = [
        (asin("A"), asin("X")),
        (asin("B"), asin("X")),
        (asin("C"), asin("Y")),
    ]
    .into_iter()
    .collect();
    let source = StubSource::with_records(&["X", "Y"]);

    let lookup = resolve_replacements(&map, &source).await.unwrap();

    let calls = source.calls.lock().unwrap();
    assert_eq!(calls.len(), 1, "expected a single batched fetch");
    assert_eq!(calls[0], vec![asin("X"), asin("Y")]);
    assert_eq!(lookup[&asin("A")].asin, asin("X"));
    assert_eq!(lookup[&asin("B")].asin, asin("X"));
    assert_eq!(lookup[&asin("C")].asin, asin("Y"));
}

#[tokio::test]
async fn resolve_does_not_follow_chains() {
    let map: ReplacementMap = [(asin("A"), asin("B")), (asin("B"), asin("C"))]
        .into_iter()
        .collect();
    let source = StubSource::with_records(&["B", "C"]);

    let lookup = resolve_replacements(&map, &source).await.unwrap();

    assert_eq!(lookup[&asin("A")].asin, asin("B"));
    assert_eq!(lookup[&asin("B")].asin, asin("C"));
}

#[tokio::test]
async fn resolve_missing_replacement_is_an_error() {
    let map: ReplacementMap = [(asin("A"), asin("B"))].into_iter().collect();
    let source = StubSource::with_records(&[]);

    let err = resolve_replacements(&map, &source).await.unwrap_err();

    assert!(
        matches!(
            err,
            ResolveError::MissingReplacement { ref original, ref replacement }
                if original.as_str() == "A" && replacement.as_str() == "B"
        ),
        "expected MissingReplacement, got: {err:?}"
    );
}

#[tokio::test]
async fn resolve_empty_map_skips_fetch() {
    let source = StubSource::with_records(&["B"]);
    let lookup = resolve_replacements(&ReplacementMap::default(), &source)
        .await
        .unwrap();
    assert!(lookup.is_empty());
    assert!(source.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn resolve_surfaces_fetch_failure() {
    let map: ReplacementMap = [(asin("A"), asin("B"))].into_iter().collect();
    let err = resolve_replacements(&map, &StubSource::failing())
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Fetch(_)), "got: {err:?}");
}
