//! Test data seeding over the application's REST API
//!
//! Background steps wipe the product collection and load the rows of a
//! Gherkin table before the browser ever touches the page.

use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::config::WebstepConfig;
use crate::error::{StepError, StepResult};

/// One JSON object per table row
pub type Record = Map<String, Value>;

/// Convert a Gherkin table cell to JSON.
///
/// - `true` / `false` (any case) -> bool
/// - empty -> null
/// - numbers that print back exactly as written (`42`, `5.99`) -> number
/// - everything else, `007`, `12.50` and `null` included -> string
pub fn convert_cell(cell: &str) -> Value {
    let trimmed = cell.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        if i.to_string() == trimmed {
            return Value::Number(i.into());
        }
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        if n.to_string() == trimmed {
            return Value::Number(n);
        }
    }

    Value::String(trimmed.to_string())
}

/// Turn a table whose first row holds the headers into records.
pub fn records_from_table(rows: &[Vec<String>]) -> StepResult<Vec<Record>> {
    let Some((headers, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let headers: Vec<&str> = headers.iter().map(|h| h.trim()).collect();

    body.iter()
        .enumerate()
        .map(|(i, row)| {
            if row.len() != headers.len() {
                return Err(StepError::Seed(format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
            Ok(headers
                .iter()
                .zip(row)
                .map(|(header, cell)| (header.to_string(), convert_cell(cell)))
                .collect())
        })
        .collect()
}

/// REST client for the collection at `base_url + api_path`
#[derive(Debug, Clone)]
pub struct Seeder {
    client: reqwest::Client,
    collection_url: String,
}

impl Seeder {
    pub fn new(config: &WebstepConfig) -> StepResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            collection_url: config.url(&config.api_path),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// Delete every record in the collection. Returns how many went.
    pub async fn reset(&self) -> StepResult<usize> {
        let existing: Vec<Record> = self
            .client
            .get(&self.collection_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        for record in &existing {
            let id = match record.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => return Err(StepError::Seed(format!("record without id: {:?}", record))),
            };
            debug!("Deleting {}/{}", self.collection_url, id);
            self.client
                .delete(format!("{}/{}", self.collection_url, id))
                .send()
                .await?
                .error_for_status()?;
        }

        Ok(existing.len())
    }

    /// Create each record with a POST to the collection
    pub async fn load(&self, records: &[Record]) -> StepResult<()> {
        for record in records {
            let resp = self.client.post(&self.collection_url).json(record).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(StepError::Seed(format!(
                    "POST {} returned {} for {}",
                    self.collection_url,
                    status,
                    Value::Object(record.clone())
                )));
            }
        }
        Ok(())
    }

    /// Replace the collection with the rows of `table`
    pub async fn reset_and_load(&self, table: &[Vec<String>]) -> StepResult<usize> {
        let records = records_from_table(table)?;
        let removed = self.reset().await?;
        self.load(&records).await?;

        info!(
            "Seeded {} record(s) into {} ({} removed)",
            records.len(),
            self.collection_url,
            removed
        );
        Ok(records.len())
    }
}
