use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A number that may arrive as a JSON number or as a numeric string.
///
/// Browser forms serialise input values as strings, so `"400"` and `400`
/// must be accepted interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    /// Numeric value, or an error naming the offending text.
    /// Blank strings count as zero.
    pub fn as_f64(&self) -> Result<f64, String> {
        match self {
            LooseNumber::Number(n) => Ok(*n),
            LooseNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| format!("'{}' is not a number", s))
            }
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        LooseNumber::Number(value)
    }
}

/// Per-image modification instructions sent alongside each `image{N}` part.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModificationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub width: Option<LooseNumber>,
    #[serde(default)]
    pub height: Option<LooseNumber>,
    #[serde(default)]
    pub quality: Option<LooseNumber>,
    /// Target format name, `original` or empty keeps the source format
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub raw: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_numbers_accept_strings_and_numbers() {
        let req: ModificationRequest = serde_json::from_str(
            r#"{"title":"a.png","width":"400","height":300,"quality":null,"format":"webp"}"#,
        )
        .unwrap();
        assert_eq!(req.width.unwrap().as_f64().unwrap(), 400.0);
        assert_eq!(req.height.unwrap().as_f64().unwrap(), 300.0);
        assert!(req.quality.is_none());
        assert_eq!(req.raw, None);
    }

    #[test]
    fn test_non_numeric_text_is_rejected() {
        let n = LooseNumber::Text("wide".to_string());
        assert!(n.as_f64().is_err());
        assert_eq!(LooseNumber::Text(" ".to_string()).as_f64().unwrap(), 0.0);
    }
}
