// src/models.rs
use serde::{Deserialize, Serialize};

/// A document attached to a publication, e.g. the draft text or an annex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Visible link text
    #[serde(rename = "type")]
    pub kind: String,
    /// Absolute URL of the file
    pub url: String,
}

/// One row of a category table: a proposed regulation under public consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub institution: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Option<String>, // ISO date of the consultation, if it parsed
    pub title: String,
    pub description: String,
    pub documents: Vec<Document>,
    pub contact: Option<String>,
    pub feedback_days: Option<u32>,
    pub max_feedback_date: Option<String>,

    // Raw cell values, whitespace-collapsed
    pub date_consultare: String,
    pub date_procedura_avizare: String,
    pub avizatori: String,
    pub date_termen_avize: String,
    pub mfpmjmfe: String,
    pub date_termen_reavizare: String,
    pub initiator: String,
}

impl Publication {
    /// The `documents` list as the JSON array stored alongside the record.
    pub fn documents_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.documents)
    }
}
