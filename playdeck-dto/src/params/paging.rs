use serde::{Deserialize, Serialize};

pub const PAGE_DEFAULT: i64 = 0;
pub const PAGE_MIN: i64 = 0;
pub const LIMIT_DEFAULT: i64 = 20;
pub const LIMIT_MIN: i64 = 1;
pub const LIMIT_MAX: i64 = 100;

/// Parameters for paging through a listing endpoint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct PagingParams {
    /// The page index to retrieve. The first page is 0. This will
    /// multiply by the limit to get the actual item offset.
    /// Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub page: Option<i64>,

    /// The maximum number of items to retrieve. Must be between 1
    /// and 100. Defaults to 20.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub limit: Option<i64>,
}

impl PagingParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    pub fn validate(&self) -> Result<(i64, i64), String> {
        let page = self.page.unwrap_or(PAGE_DEFAULT);
        let limit = self.limit.unwrap_or(LIMIT_DEFAULT);

        if page < PAGE_MIN {
            Err(format!("Page must be greater than or equal to {PAGE_MIN}"))
        } else if limit < LIMIT_MIN {
            Err(format!(
                "Limit must be greater than or equal to {LIMIT_MIN}"
            ))
        } else if limit > LIMIT_MAX {
            Err(format!("Limit must be less than or equal to {LIMIT_MAX}"))
        } else {
            Ok((page, limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, Ok((0, 20)))]
    #[case(Some(3), None, Ok((3, 20)))]
    #[case(None, Some(100), Ok((0, 100)))]
    #[case(Some(-1), None, Err("Page must be greater than or equal to 0".to_string()))]
    #[case(None, Some(0), Err("Limit must be greater than or equal to 1".to_string()))]
    #[case(None, Some(101), Err("Limit must be less than or equal to 100".to_string()))]
    fn validate(
        #[case] page: Option<i64>,
        #[case] limit: Option<i64>,
        #[case] expected: Result<(i64, i64), String>,
    ) {
        assert_eq!(PagingParams::new(page, limit).validate(), expected);
    }

    #[test]
    fn empty_params_serialize_to_nothing() {
        let query = serde_json::to_value(PagingParams::default()).unwrap();
        assert_eq!(query, serde_json::json!({}));
    }
}
