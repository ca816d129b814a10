use crate::core::retrieval::{CandidateQuery, IndexError, IndexField, SearchIndex};
use crate::models::{CompanyRecord, ScoredCandidate};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Elasticsearch-backed implementation of the profile index.
///
/// The engine only issues structured queries; this client translates
/// them to the index's query DSL and reads back candidate records
/// with their native relevance scores.
pub struct EsClient {
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
    client: Client,
}

impl EsClient {
    pub fn new(
        base_url: String,
        index: String,
        username: Option<String>,
        password: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| IndexError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            index,
            username,
            password,
            client,
        })
    }

    /// Cheap reachability probe for health checks.
    pub async fn ping(&self) -> bool {
        let url = format!("{}/_cluster/health", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(user) = &self.username {
            request = request.basic_auth(user, self.password.as_deref());
        }
        matches!(request.send().await, Ok(resp) if resp.status().is_success())
    }

    /// Translate a structured query into the index's query DSL.
    fn build_query(query: &CandidateQuery) -> Value {
        match query {
            CandidateQuery::Term { field, value } => {
                json!({ "term": { field_name(*field): value } })
            }
            CandidateQuery::FuzzyName { value, max_edits } => {
                let fuzziness = json!(max_edits);
                json!({
                    "bool": {
                        "should": [
                            { "match": { "company_commercial_name": { "query": value, "fuzziness": fuzziness } } },
                            { "match": { "company_legal_name": { "query": value, "fuzziness": fuzziness } } },
                            { "match": { "company_all_names": { "query": value, "fuzziness": fuzziness } } }
                        ]
                    }
                })
            }
            CandidateQuery::Fallback {
                name,
                domain,
                phone,
                facebook,
            } => {
                let mut fields: Vec<&str> = Vec::new();
                let mut terms: Vec<&str> = Vec::new();

                if let Some(name) = name {
                    fields.extend([
                        "company_commercial_name^3",
                        "company_legal_name^2",
                        "company_all_names",
                    ]);
                    terms.push(name);
                }
                if let Some(domain) = domain {
                    fields.push("domain");
                    terms.push(domain);
                }
                if let Some(phone) = phone {
                    fields.push("phones_normalized");
                    terms.push(phone);
                }
                if let Some(facebook) = facebook {
                    fields.push("facebook_links_normalized");
                    terms.push(facebook);
                }

                json!({
                    "multi_match": {
                        "query": terms.join(" "),
                        "fields": fields,
                        "type": "best_fields",
                        "fuzziness": "AUTO"
                    }
                })
            }
        }
    }
}

fn field_name(field: IndexField) -> &'static str {
    match field {
        IndexField::Domain => "domain",
        IndexField::PhoneNormalized => "phones_normalized",
        IndexField::FacebookNormalized => "facebook_links_normalized",
    }
}

#[async_trait]
impl SearchIndex for EsClient {
    async fn search(
        &self,
        query: &CandidateQuery,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>, IndexError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let body = json!({
            "query": Self::build_query(query),
            "size": limit,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(user) = &self.username {
            request = request.basic_auth(user, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IndexError::Unavailable(format!(
                "search returned {}",
                response.status()
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| IndexError::InvalidResponse(e.to_string()))?;

        let hits = json
            .pointer("/hits/hits")
            .and_then(|h| h.as_array())
            .ok_or_else(|| IndexError::InvalidResponse("missing hits array".into()))?;

        let candidates = hits
            .iter()
            .filter_map(|hit| {
                let relevance = hit.get("_score").and_then(|s| s.as_f64()).unwrap_or(0.0);
                let source = hit.get("_source")?;
                let record: CompanyRecord = serde_json::from_value(source.clone()).ok()?;
                Some(ScoredCandidate { record, relevance })
            })
            .collect::<Vec<_>>();

        tracing::debug!("Index returned {} candidates for {:?}", candidates.len(), query);

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> EsClient {
        EsClient::new(
            base_url.to_string(),
            "company_profiles".to_string(),
            None,
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = client("http://localhost:9200/");
        assert_eq!(client.base_url, "http://localhost:9200");
        assert_eq!(client.index, "company_profiles");
    }

    #[test]
    fn test_term_query_dsl() {
        let query = CandidateQuery::Term {
            field: IndexField::Domain,
            value: "acme.com".to_string(),
        };
        let dsl = EsClient::build_query(&query);
        assert_eq!(dsl, json!({ "term": { "domain": "acme.com" } }));
    }

    #[test]
    fn test_fuzzy_name_query_dsl() {
        let query = CandidateQuery::FuzzyName {
            value: "acme corp".to_string(),
            max_edits: 2,
        };
        let dsl = EsClient::build_query(&query);
        let should = dsl.pointer("/bool/should").and_then(|s| s.as_array()).unwrap();
        assert_eq!(should.len(), 3);
        assert_eq!(
            should[0].pointer("/match/company_commercial_name/fuzziness"),
            Some(&json!(2))
        );
    }

    #[test]
    fn test_fallback_query_includes_only_present_fields() {
        let query = CandidateQuery::Fallback {
            name: Some("acme corp".to_string()),
            domain: None,
            phone: Some("2345678901".to_string()),
            facebook: None,
        };
        let dsl = EsClient::build_query(&query);
        let fields = dsl
            .pointer("/multi_match/fields")
            .and_then(|f| f.as_array())
            .unwrap();

        assert!(fields.contains(&json!("company_commercial_name^3")));
        assert!(fields.contains(&json!("phones_normalized")));
        assert!(!fields.contains(&json!("domain")));
        assert_eq!(
            dsl.pointer("/multi_match/query"),
            Some(&json!("acme corp 2345678901"))
        );
    }

    #[tokio::test]
    async fn test_search_parses_hits() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/company_profiles/_search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "hits": {
                        "hits": [{
                            "_score": 7.5,
                            "_source": {
                                "company_id": "42",
                                "domain": "acme.com",
                                "company_commercial_name": "Acme Corporation",
                                "phones_normalized": ["2345678901"]
                            }
                        }]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client(&server.url());
        let query = CandidateQuery::Term {
            field: IndexField::Domain,
            value: "acme.com".to_string(),
        };

        let candidates = client.search(&query, 10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].record.company_id, "42");
        assert_eq!(candidates[0].relevance, 7.5);
    }

    #[tokio::test]
    async fn test_search_error_status_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/company_profiles/_search")
            .with_status(503)
            .create_async()
            .await;

        let client = client(&server.url());
        let query = CandidateQuery::Term {
            field: IndexField::Domain,
            value: "acme.com".to_string(),
        };

        let result = client.search(&query, 10).await;
        assert!(matches!(result, Err(IndexError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_search_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/company_profiles/_search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let query = CandidateQuery::Term {
            field: IndexField::Domain,
            value: "acme.com".to_string(),
        };

        let result = client.search(&query, 10).await;
        assert!(matches!(result, Err(IndexError::InvalidResponse(_))));
    }
}
