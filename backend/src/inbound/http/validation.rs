//! Parsing of path and query parameters into domain values.
//!
//! Failures become `invalid_request` errors whose details name the field,
//! the offending value and a stable code.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, RecipeListQuery, ReportFormat, TagSlug, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidFlag,
    InvalidSlug,
    InvalidLimit,
    InvalidFormat,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidFlag => "invalid_flag",
            Self::InvalidSlug => "invalid_slug",
            Self::InvalidLimit => "invalid_limit",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn invalid(field: FieldName, code: ErrorCode, value: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.0,
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a positive integer identifier.
pub(crate) fn parse_id<T>(field: FieldName, raw: &str) -> Result<T, Error>
where
    T: FromStr,
{
    raw.parse::<T>().map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidId,
            raw,
            format!("{} must be a positive integer", field.0),
        )
    })
}

/// Parse a boolean filter flag. Accepts `1`/`0` and `true`/`false`.
pub(crate) fn parse_flag(field: FieldName, raw: &str) -> Result<bool, Error> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(invalid(
            field,
            ErrorCode::InvalidFlag,
            raw,
            format!("{} must be one of 0, 1, true or false", field.0),
        )),
    }
}

/// Parse the optional `recipes_limit` parameter.
pub(crate) fn parse_recipes_limit(raw: Option<&str>) -> Result<Option<usize>, Error> {
    let field = FieldName::new("recipes_limit");
    raw.map(|value| {
        value.parse::<usize>().map_err(|_| {
            invalid(
                field,
                ErrorCode::InvalidLimit,
                value,
                "recipes_limit must be a non-negative integer".to_owned(),
            )
        })
    })
    .transpose()
}

/// Parse the optional shopping-list `format` parameter.
pub(crate) fn parse_report_format(raw: Option<&str>) -> Result<ReportFormat, Error> {
    let Some(value) = raw else {
        return Ok(ReportFormat::default());
    };
    value.parse::<ReportFormat>().map_err(|err| {
        invalid(
            FieldName::new("format"),
            ErrorCode::InvalidFormat,
            value,
            err.to_string(),
        )
    })
}

/// Build recipe listing criteria from raw query pairs.
///
/// `tags` may repeat; unknown parameters are ignored.
pub(crate) fn parse_recipe_list_query(
    pairs: &[(String, String)],
) -> Result<RecipeListQuery, Error> {
    let mut query = RecipeListQuery::default();
    for (key, value) in pairs {
        match key.as_str() {
            "author" => {
                query.author = Some(parse_id::<UserId>(FieldName::new("author"), value)?);
            }
            "tags" => {
                let slug = TagSlug::new(value.clone()).map_err(|err| {
                    invalid(
                        FieldName::new("tags"),
                        ErrorCode::InvalidSlug,
                        value,
                        err.to_string(),
                    )
                })?;
                query.tags.push(slug);
            }
            "is_favorited" => {
                query.is_favorited = parse_flag(FieldName::new("is_favorited"), value)?;
            }
            "is_in_shopping_cart" => {
                query.is_in_shopping_cart =
                    parse_flag(FieldName::new("is_in_shopping_cart"), value)?;
            }
            _ => {}
        }
    }
    Ok(query)
}
