use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use super::errors::ImpactError;

/// The key values carried by one change event.
///
/// Keys are validated as integers on construction and stored deduplicated in
/// ascending numeric order, which fixes the rendering order of the generated
/// `IN (...)` list: the same event always produces the same SQL text, so
/// outputs are reproducible for tests and safe to key a query-plan cache on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeKeys {
    keys: BTreeSet<i64>,
}

impl ChangeKeys {
    pub fn single(key: i64) -> Self {
        Self {
            keys: BTreeSet::from([key]),
        }
    }

    /// Validate raw JSON values as integer keys.
    ///
    /// Anything that is not a JSON integer fitting in `i64` (floats, strings,
    /// booleans, nulls, nested values) is rejected, per-event.
    pub fn from_json(values: &[Value]) -> Result<Self, ImpactError> {
        let keys = values
            .iter()
            .map(|v| {
                v.as_i64().ok_or_else(|| ImpactError::InvalidKey {
                    value: v.to_string(),
                })
            })
            .collect::<Result<BTreeSet<i64>, _>>()?;
        Ok(Self { keys })
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Ascending iteration over the key values.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.keys.iter().copied()
    }

    /// Render the keys as the body of a SQL `IN (...)` list.
    pub fn sql_list(&self) -> String {
        let mut out = String::new();
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&key.to_string());
        }
        out
    }
}

impl FromIterator<i64> for ChangeKeys {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ChangeKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.sql_list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_ascending_and_deduplicated() {
        let keys: ChangeKeys = [3, 1, 2, 3, 1].into_iter().collect();
        assert_eq!(keys.sql_list(), "1,2,3");
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn single_key() {
        assert_eq!(ChangeKeys::single(7).sql_list(), "7");
    }

    #[test]
    fn negative_keys_sort_numerically() {
        let keys: ChangeKeys = [5, -2, 0].into_iter().collect();
        assert_eq!(keys.sql_list(), "-2,0,5");
    }

    #[test]
    fn accepts_json_integers() {
        let values = vec![json!(2), json!(1)];
        let keys = ChangeKeys::from_json(&values).unwrap();
        assert_eq!(keys.sql_list(), "1,2");
    }

    #[test]
    fn rejects_json_float() {
        let err = ChangeKeys::from_json(&[json!(1.5)]).unwrap_err();
        assert_eq!(
            err,
            ImpactError::InvalidKey {
                value: "1.5".to_string()
            }
        );
    }

    #[test]
    fn rejects_json_string_even_if_numeric() {
        let err = ChangeKeys::from_json(&[json!("7")]).unwrap_err();
        assert_eq!(
            err,
            ImpactError::InvalidKey {
                value: "\"7\"".to_string()
            }
        );
    }

    #[test]
    fn rejects_null_and_bool() {
        assert!(ChangeKeys::from_json(&[json!(null)]).is_err());
        assert!(ChangeKeys::from_json(&[json!(true)]).is_err());
    }

    #[test]
    fn rejects_integer_overflowing_i64() {
        let err = ChangeKeys::from_json(&[json!(u64::MAX)]).unwrap_err();
        assert!(matches!(err, ImpactError::InvalidKey { .. }));
    }
}
