use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One session dataset as listed by the upstream provider. The hash is the
/// change-detection fingerprint for the dataset's current content version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub session_id: u64,
    #[serde(default)]
    pub session_title: String,
    pub access_key: String,
    pub dataset_hash: String,
}

/// Envelope for `op=getDatasetList`
#[derive(Debug, Deserialize)]
pub struct DatasetListResponse {
    pub status: String,
    #[serde(default)]
    pub datasetlist: Vec<DatasetDescriptor>,
}

/// Archive payload for one dataset, base64-encoded zip bytes
#[derive(Debug, Deserialize)]
pub struct DatasetPayload {
    pub zip: String,
}

/// Envelope for `op=getDataset`
#[derive(Debug, Deserialize)]
pub struct DatasetResponse {
    pub status: String,
    pub dataset: Option<DatasetPayload>,
}

/// A sponsor sub-record embedded in a bill. Upstream sometimes emits empty
/// placeholder records; those have no people_id and are skipped during index
/// inversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(default)]
    pub people_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Sponsor {
    /// True for empty placeholder records
    pub fn is_placeholder(&self) -> bool {
        self.people_id.is_none()
    }
}

/// One row of the cumulative bill table. The sponsors column stays a JSON
/// string so the row round-trips through the CSV table unchanged; the index
/// builder decodes it strictly when inverting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillRow {
    pub bill_id: u64,
    #[serde(default)]
    pub session_id: Option<u64>,
    #[serde(default)]
    pub bill_number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub status_date: Option<String>,
    #[serde(default)]
    pub sponsors: String,
}

/// The shape of one extracted bill record file. LegiScan wraps the record
/// under a top-level `bill` key.
#[derive(Debug, Deserialize)]
struct RawBill {
    bill_id: u64,
    #[serde(default)]
    session: Option<RawSession>,
    #[serde(default)]
    bill_number: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    status_date: Option<String>,
    #[serde(default)]
    sponsors: Vec<Sponsor>,
}

#[derive(Debug, Deserialize)]
struct RawSession {
    #[serde(default)]
    session_id: Option<u64>,
}

impl BillRow {
    /// Parse one bill record document into a table row
    pub fn from_bill_json(doc: &serde_json::Value) -> Result<BillRow> {
        let record = doc.get("bill").unwrap_or(doc);
        let raw: RawBill = serde_json::from_value(record.clone())
            .map_err(|e| Error::Bill(e.to_string()))?;

        Ok(BillRow {
            bill_id: raw.bill_id,
            session_id: raw.session.and_then(|s| s.session_id),
            bill_number: raw.bill_number,
            title: raw.title,
            description: raw.description,
            state: raw.state,
            url: raw.url,
            status: raw.status,
            status_date: raw.status_date,
            sponsors: serde_json::to_string(&raw.sponsors)?,
        })
    }

    /// Decode the sponsors column. Strict: malformed stored text is an error,
    /// never silently ignored.
    pub fn parse_sponsors(&self) -> Result<Vec<Sponsor>> {
        if self.sponsors.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&self.sponsors)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wrapped_bill_record() {
        let doc = json!({
            "bill": {
                "bill_id": 1635636,
                "bill_number": "HB1",
                "title": "Lower Energy Costs Act",
                "description": "A bill to lower energy costs.",
                "state": "US",
                "session": {"session_id": 2041},
                "status": 1,
                "sponsors": [{"people_id": 9, "name": "Rep. A"}, {}]
            }
        });

        let row = BillRow::from_bill_json(&doc).unwrap();
        assert_eq!(row.bill_id, 1635636);
        assert_eq!(row.session_id, Some(2041));
        assert_eq!(row.title.as_deref(), Some("Lower Energy Costs Act"));

        let sponsors = row.parse_sponsors().unwrap();
        assert_eq!(sponsors.len(), 2);
        assert_eq!(sponsors[0].people_id, Some(9));
        assert!(sponsors[1].is_placeholder());
    }

    #[test]
    fn missing_bill_id_is_an_error() {
        let doc = json!({"bill": {"title": "No id"}});
        assert!(matches!(BillRow::from_bill_json(&doc), Err(Error::Bill(_))));
    }

    #[test]
    fn malformed_sponsor_text_fails_loudly() {
        let row = BillRow {
            bill_id: 1,
            session_id: None,
            bill_number: None,
            title: None,
            description: None,
            state: None,
            url: None,
            status: None,
            status_date: None,
            sponsors: "[{'people_id': 9}]".to_string(),
        };
        assert!(row.parse_sponsors().is_err());
    }
}
