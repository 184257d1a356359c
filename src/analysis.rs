//! Request and response types for the `/analyze` exchange.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Body sent to the analysis service.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest<'a> {
    pub text: &'a str,
}

/// A comparable statement the service found for the submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilarStatement {
    pub statement: String,
    pub category: String,
    /// Similarity score in `[0, 1]`
    pub score: f64,
}

/// Classification result returned by the analysis service.
///
/// Only `prediction` is required. Every list is optional on the wire, and an
/// explicit `null` is read the same as a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResponse {
    /// The classified category label
    pub prediction: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub tips: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub books: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub videos: Vec<String>,
    /// Only the first quote is ever displayed
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub quotes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<SimilarStatement>")]
    pub similar_statements: Vec<SimilarStatement>,
}

impl AnalysisResponse {
    /// Create a response carrying only a prediction
    pub fn new(prediction: impl Into<String>) -> Self {
        Self {
            prediction: prediction.into(),
            tips: Vec::new(),
            books: Vec::new(),
            videos: Vec::new(),
            quotes: Vec::new(),
            similar_statements: Vec::new(),
        }
    }

    /// The quote to display, if any
    pub fn quote(&self) -> Option<&str> {
        self.quotes.first().map(String::as_str)
    }

    /// Check if the response carries anything beyond the prediction
    pub fn has_extras(&self) -> bool {
        !(self.tips.is_empty()
            && self.books.is_empty()
            && self.videos.is_empty()
            && self.quotes.is_empty()
            && self.similar_statements.is_empty())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
