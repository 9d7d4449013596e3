//! Quality document lookup by VIN.
//!
//! Documents are described by metadata only; the files themselves live
//! behind the `/docs/` prefix served elsewhere.

use serde::{Deserialize, Serialize};

/// A document attached to a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDoc {
    pub vin: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocLink {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub url: String,
}

/// Links for every document attached to `vin`, in input order.
///
/// VINs are matched exactly after trimming surrounding whitespace.
pub fn search_docs(docs: &[QualityDoc], vin: &str) -> Vec<DocLink> {
    let vin = vin.trim();
    docs.iter()
        .filter(|d| d.vin == vin)
        .map(|d| DocLink {
            title: d.title.clone(),
            doc_type: d.doc_type.clone(),
            url: format!("/docs/{}", d.path.trim_start_matches('/')),
        })
        .collect()
}
