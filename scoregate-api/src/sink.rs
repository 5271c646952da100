//! Analytics sink client
//!
//! Thin wrapper over the data store's REST surface: streaming NDJSON ingest
//! on one endpoint, parametrized queries on another. Failures are surfaced
//! to the caller immediately; there is no retry or backoff here.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use scoregate_common::config::ServiceConfig;
use scoregate_common::{AssessmentKind, CanonicalRow};

/// Sink client errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// The relevant endpoint is not configured
    #[error("{0} endpoint is not configured")]
    NotConfigured(&'static str),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The sink answered with a non-success status
    #[error("sink returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The sink answered 2xx but the payload shape was unexpected
    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/// One primary-results table of a query response
#[derive(Debug, Deserialize)]
struct QueryTable {
    #[serde(rename = "Columns")]
    columns: Vec<QueryColumn>,
    #[serde(rename = "Rows")]
    rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryColumn {
    #[serde(rename = "ColumnName")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "Tables")]
    tables: Vec<QueryTable>,
}

/// First row of the first table, keyed by column name. None when the
/// response carries no tables or the first table has no rows.
fn first_row_record(response: QueryResponse) -> Option<Map<String, Value>> {
    let table = response.tables.into_iter().next()?;
    let row = table.rows.into_iter().next()?;
    Some(
        table
            .columns
            .into_iter()
            .map(|c| c.name)
            .zip(row)
            .collect(),
    )
}

/// Latest tech-health reading from a live query
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub score: i64,
    pub timestamp: String,
}

/// Analytics sink client (ingest + live query)
pub struct SinkClient {
    http: reqwest::Client,
    config: Arc<ServiceConfig>,
}

impl SinkClient {
    pub fn new(config: Arc<ServiceConfig>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    /// Whether an ingest endpoint is configured; false means dev mode
    /// (submissions are accepted without being forwarded)
    pub fn is_ingest_configured(&self) -> bool {
        self.config.ingest_endpoint.is_some()
    }

    /// Whether a query endpoint is configured
    pub fn is_query_configured(&self) -> bool {
        self.config.query_endpoint.is_some()
    }

    /// Stream one canonical row into the kind's table.
    ///
    /// 200 and 202 are both acknowledgements; anything else is a rejection.
    pub async fn ingest(&self, kind: AssessmentKind, row: &CanonicalRow) -> Result<(), SinkError> {
        let base = self
            .config
            .ingest_endpoint
            .as_deref()
            .ok_or(SinkError::NotConfigured("ingest"))?;
        let target = self.config.target(kind);

        let url = format!(
            "{}/v1/rest/ingest/{}/{}?streamFormat=json&mappingName={}",
            base, self.config.database, target.table, target.mapping
        );
        debug!(kind = %kind, table = %target.table, "streaming row to sink");

        let mut request = self
            .http
            .post(&url)
            .header("Content-Type", "application/json; charset=utf-8")
            .body(row.to_ndjson_line());
        if let Some(token) = &self.config.sink_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 200 || status.as_u16() == 202 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Trivial query proving the sink is reachable
    pub async fn ping(&self) -> Result<(), SinkError> {
        self.execute_query("print 1", Value::Null).await.map(|_| ())
    }

    /// Latest tech-health reading, optionally narrowed by customer and
    /// participant. None when the table has no matching rows.
    pub async fn latest_tech_health(
        &self,
        customer: &str,
        participant: &str,
    ) -> Result<Option<LatestReading>, SinkError> {
        let table = &self.config.tech_health.table;
        let query = format!(
            r#"declare query_parameters(p_customer:string = "", p_participant:string = "");
{table}
| where (p_customer == "" or customer == p_customer)
| where (p_participant == "" or participant_name == p_participant)
| where isnotempty(timestamp_utc)
| top 1 by todatetime(timestamp_utc) desc
| project overall_score_500, timestamp_utc"#
        );
        let parameters = json!({
            "Parameters": {
                "p_customer": customer,
                "p_participant": participant,
            }
        });

        let response = self.execute_query(&query, parameters).await?;
        let record = match first_row_record(response) {
            Some(record) => record,
            None => return Ok(None),
        };

        let score = record
            .get("overall_score_500")
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as i64;
        let timestamp = record
            .get("timestamp_utc")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Some(LatestReading { score, timestamp }))
    }

    /// Most recent AI readiness row, as column-name/value pairs. None when
    /// the table is empty.
    pub async fn latest_ai_readiness(&self) -> Result<Option<Map<String, Value>>, SinkError> {
        let table = &self.config.ai_readiness.table;
        let query = format!(
            r#"{table}
| where isnotempty(timestamp_utc)
| top 1 by todatetime(timestamp_utc) desc
| project timestamp_utc, customer, participant_name, total_105, percent, level, maturity"#
        );

        let response = self.execute_query(&query, Value::Null).await?;
        Ok(first_row_record(response))
    }

    /// POST a query to the sink's query endpoint
    async fn execute_query(
        &self,
        csl: &str,
        properties: Value,
    ) -> Result<QueryResponse, SinkError> {
        let base = self
            .config
            .query_endpoint
            .as_deref()
            .ok_or(SinkError::NotConfigured("query"))?;
        let url = format!("{}/v1/rest/query", base);

        let mut body = json!({
            "db": self.config.database,
            "csl": csl,
        });
        if !properties.is_null() {
            body["properties"] = properties;
        }

        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = &self.config.sink_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| SinkError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_response_parses_sink_wire_shape() {
        let raw = r#"{
            "Tables": [{
                "TableName": "Table_0",
                "Columns": [
                    {"ColumnName": "overall_score_500", "DataType": "Real"},
                    {"ColumnName": "timestamp_utc", "DataType": "String"}
                ],
                "Rows": [[352, "2024-01-10T11:30:00Z"]]
            }]
        }"#;

        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.tables.len(), 1);
        assert_eq!(parsed.tables[0].columns[0].name, "overall_score_500");
        assert_eq!(parsed.tables[0].rows[0][0], 352);
    }

    #[test]
    fn empty_tables_parse_cleanly() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"Tables": []}"#).unwrap();
        assert!(parsed.tables.is_empty());
    }

    #[test]
    fn first_row_record_pairs_columns_with_values() {
        let raw = r#"{
            "Tables": [{
                "TableName": "Table_0",
                "Columns": [
                    {"ColumnName": "timestamp_utc", "DataType": "String"},
                    {"ColumnName": "total_105", "DataType": "Real"},
                    {"ColumnName": "maturity", "DataType": "String"}
                ],
                "Rows": [
                    ["2024-01-10T11:30:00Z", 88, "Leading"],
                    ["2024-01-09T09:00:00Z", 40, "Emerging"]
                ]
            }]
        }"#;

        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        let record = first_row_record(parsed).unwrap();
        assert_eq!(record["timestamp_utc"], "2024-01-10T11:30:00Z");
        assert_eq!(record["total_105"], 88);
        assert_eq!(record["maturity"], "Leading");
    }

    #[test]
    fn first_row_record_is_none_when_no_rows() {
        let raw = r#"{
            "Tables": [{
                "TableName": "Table_0",
                "Columns": [{"ColumnName": "total_105", "DataType": "Real"}],
                "Rows": []
            }]
        }"#;

        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert!(first_row_record(parsed).is_none());

        let empty: QueryResponse = serde_json::from_str(r#"{"Tables": []}"#).unwrap();
        assert!(first_row_record(empty).is_none());
    }
}
