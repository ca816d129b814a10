use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Caller-supplied description of a company to resolve.
///
/// All attributes are optional, but at least one must survive
/// normalization for the request to be matchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = has_any_attribute))]
pub struct MatchRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

fn has_any_attribute(req: &MatchRequest) -> Result<(), ValidationError> {
    let populated = [&req.name, &req.website, &req.phone, &req.facebook]
        .iter()
        .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()));

    if populated {
        Ok(())
    } else {
        Err(ValidationError::new("empty_request"))
    }
}

/// Canonical, comparable view of a MatchRequest.
///
/// Empty string means the attribute was absent or could not be
/// normalized. Built once per request and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedAttributes {
    pub domain: String,
    pub phone_digits: String,
    pub facebook_id: String,
    pub name_key: String,
}

impl NormalizedAttributes {
    /// True when no attribute survived normalization.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
            && self.phone_digits.is_empty()
            && self.facebook_id.is_empty()
            && self.name_key.is_empty()
    }

    /// Field kinds present on the input side, in priority order.
    pub fn present_fields(&self) -> Vec<FieldKind> {
        let mut fields = Vec::new();
        if !self.domain.is_empty() {
            fields.push(FieldKind::Domain);
        }
        if !self.phone_digits.is_empty() {
            fields.push(FieldKind::Phone);
        }
        if !self.facebook_id.is_empty() {
            fields.push(FieldKind::Facebook);
        }
        if !self.name_key.is_empty() {
            fields.push(FieldKind::Name);
        }
        fields
    }
}

/// Canonical company profile as stored in the index.
///
/// Field names mirror the index document mapping. List fields hold
/// every variant seen during acquisition; the `_normalized` lists are
/// the canonical forms used for exact comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_id: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub company_commercial_name: String,
    #[serde(default)]
    pub company_legal_name: String,
    #[serde(default)]
    pub company_all_names: String,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub phones_normalized: Vec<String>,
    #[serde(default)]
    pub facebook_links: Vec<String>,
    #[serde(default)]
    pub facebook_links_normalized: Vec<String>,
}

/// A candidate record with the relevance score the index assigned to it.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub record: CompanyRecord,
    pub relevance: f64,
}

/// One identifying attribute of a company, in signal-strength order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Domain,
    Phone,
    Facebook,
    Name,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldKind::Domain => "domain",
            FieldKind::Phone => "phone",
            FieldKind::Facebook => "facebook",
            FieldKind::Name => "name",
        };
        write!(f, "{}", s)
    }
}

/// Contribution of one field to one candidate's total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScore {
    pub field: FieldKind,
    pub value: f64,
    pub matched: bool,
}

/// Outcome of resolving one MatchRequest.
///
/// `candidate_id: None` means no match, which is a normal outcome and
/// not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "candidateId")]
    pub candidate_id: Option<String>,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    pub confidence: f64,
    #[serde(rename = "matchedFields")]
    pub matched_fields: Vec<FieldKind>,
    /// Display fields of the winning record, for callers.
    pub candidate: Option<CompanyRecord>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            candidate_id: None,
            total_score: 0.0,
            confidence: 0.0,
            matched_fields: vec![],
            candidate: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.candidate_id.is_some()
    }
}

/// Per-field scoring weights.
///
/// Deterministic identifiers outrank text similarity: a lone domain or
/// phone match must beat a perfect name match, which the defaults
/// guarantee (10 and 8 versus a 5-point name ceiling).
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub domain: f64,
    pub phone: f64,
    pub facebook: f64,
    pub name_max: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            domain: 10.0,
            phone: 8.0,
            facebook: 6.0,
            name_max: 5.0,
        }
    }
}

impl ScoringWeights {
    /// Weight ceiling for one field kind.
    pub fn for_field(&self, field: FieldKind) -> f64 {
        match field {
            FieldKind::Domain => self.domain,
            FieldKind::Phone => self.phone,
            FieldKind::Facebook => self.facebook,
            FieldKind::Name => self.name_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_one_attribute_is_valid() {
        let req = MatchRequest {
            website: Some("acme.com".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_request_is_invalid() {
        let req = MatchRequest::default();
        assert!(req.validate().is_err());

        let blank = MatchRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_default_weights_ordering() {
        let weights = ScoringWeights::default();
        assert!(weights.domain > weights.name_max);
        assert!(weights.phone > weights.name_max);
        assert!(weights.facebook > weights.name_max);
    }

    #[test]
    fn test_present_fields_priority_order() {
        let normalized = NormalizedAttributes {
            domain: "acme.com".to_string(),
            phone_digits: String::new(),
            facebook_id: "acme".to_string(),
            name_key: "acme corp".to_string(),
        };
        assert_eq!(
            normalized.present_fields(),
            vec![FieldKind::Domain, FieldKind::Facebook, FieldKind::Name]
        );
    }
}
