//! Playable audio records and the filter that produces them.

use serde::{Deserialize, Serialize};

use crate::search::types::{BlobRef, DescribedBlob, SearchResult};

/// One playable item as served by `/api/meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioRecord {
    #[serde(rename = "BlobRef")]
    pub id: String,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub genre: String,
    pub media_type: String,
}

impl AudioRecord {
    /// Build a record if the blob has a valid ref and non-empty title, album and artist tags.
    pub fn from_described(described: &DescribedBlob) -> Option<Self> {
        if !BlobRef::is_valid(&described.blob_ref) {
            return None;
        }

        let title = described.tag("title")?;
        let album = described.tag("album")?;
        let artist = described.tag("artist")?;

        Some(Self {
            id: described.blob_ref.clone(),
            artist: artist.to_string(),
            title: title.to_string(),
            album: album.to_string(),
            genre: described.media_tags.get("genre").cloned().unwrap_or_default(),
            media_type: described.mime_type().to_string(),
        })
    }
}

/// Outcome of filtering one search result.
#[derive(Debug, Default)]
pub struct Filtered {
    pub records: Vec<AudioRecord>,
    pub dropped: usize,
}

/// Keep the matched blobs that make complete records, in result order.
pub fn filter_results(result: &SearchResult) -> Filtered {
    let mut filtered = Filtered::default();
    for blob in &result.blobs {
        match result.described(&blob.blob).and_then(AudioRecord::from_described) {
            Some(record) => filtered.records.push(record),
            None => filtered.dropped += 1,
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const B1: &str = "sha224-00000000000000000000000000000000000000000000000000000001";
    const B2: &str = "sha224-00000000000000000000000000000000000000000000000000000002";
    const B3: &str = "sha224-00000000000000000000000000000000000000000000000000000003";

    fn result(entries: serde_json::Value) -> SearchResult {
        serde_json::from_value(entries).unwrap()
    }

    fn described(blob_ref: &str, tags: serde_json::Value) -> serde_json::Value {
        json!({
            "blobRef": blob_ref,
            "camliType": "file",
            "file": {"mimeType": "audio/flac"},
            "mediaTags": tags
        })
    }

    #[test]
    fn test_complete_record_kept() {
        let r = result(json!({
            "blobs": [{"blob": B1}],
            "description": {"meta": {
                B1: described(B1, json!({"title": "T", "album": "Al", "artist": "A", "genre": "Rock"}))
            }}
        }));

        let filtered = filter_results(&r);
        assert_eq!(filtered.dropped, 0);
        assert_eq!(
            filtered.records,
            vec![AudioRecord {
                id: B1.into(),
                artist: "A".into(),
                title: "T".into(),
                album: "Al".into(),
                genre: "Rock".into(),
                media_type: "audio/flac".into(),
            }]
        );
    }

    #[test]
    fn test_missing_or_empty_mandatory_tag_dropped() {
        for missing in ["title", "album", "artist"] {
            let mut tags = json!({"title": "T", "album": "Al", "artist": "A"});
            tags.as_object_mut().unwrap().remove(missing);
            let r = result(json!({
                "blobs": [{"blob": B1}],
                "description": {"meta": {B1: described(B1, tags)}}
            }));
            assert!(filter_results(&r).records.is_empty(), "kept record without {}", missing);

            let mut tags = json!({"title": "T", "album": "Al", "artist": "A"});
            tags[missing] = json!("");
            let r = result(json!({
                "blobs": [{"blob": B1}],
                "description": {"meta": {B1: described(B1, tags)}}
            }));
            assert_eq!(filter_results(&r).dropped, 1, "kept record with empty {}", missing);
        }
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let r = result(json!({
            "blobs": [{"blob": B1}],
            "description": {"meta": {
                B1: {"blobRef": B1, "mediaTags": {"title": "T", "album": "Al", "artist": "A"}}
            }}
        }));

        let record = &filter_results(&r).records[0];
        assert_eq!(record.genre, "");
        assert_eq!(record.media_type, "");
    }

    #[test]
    fn test_invalid_ref_and_undescribed_dropped_in_order() {
        let r = result(json!({
            "blobs": [{"blob": B3}, {"blob": "bogus"}, {"blob": B2}, {"blob": B1}],
            "description": {"meta": {
                B3: described(B3, json!({"title": "3", "album": "Al", "artist": "A"})),
                "bogus": described("bogus", json!({"title": "x", "album": "Al", "artist": "A"})),
                B1: described(B1, json!({"title": "1", "album": "Al", "artist": "A"}))
            }}
        }));

        let filtered = filter_results(&r);
        let ids: Vec<_> = filtered.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![B3, B1]);
        assert_eq!(filtered.dropped, 2);
    }

    #[test]
    fn test_wire_names() {
        let record = AudioRecord {
            id: "b1".into(),
            artist: "A".into(),
            title: "T".into(),
            album: "Al".into(),
            genre: "Rock".into(),
            media_type: "audio/mpeg".into(),
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"BlobRef":"b1","Artist":"A","Title":"T","Album":"Al","Genre":"Rock","MediaType":"audio/mpeg"}"#
        );
    }
}
