//! Translation of repository port failures into domain errors.
//!
//! Connection failures surface as `service_unavailable` so clients may
//! retry; anything else the adapter reports is an internal error.

use serde_json::json;

use super::Error;
use super::ports::{
    CatalogueImportError, IngredientRepositoryError, RecipeMarkRepositoryError,
    RecipeRepositoryError, SubscriptionRepositoryError, TagRepositoryError, UserPersistenceError,
};

fn unavailable(store: &str, message: &str) -> Error {
    Error::service_unavailable(format!("{store} unavailable: {message}"))
}

fn failed(store: &str, message: &str) -> Error {
    Error::internal(format!("{store} error: {message}"))
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::Connection { message } => unavailable("user repository", &message),
            UserPersistenceError::Query { message } => failed("user repository", &message),
        }
    }
}

impl From<TagRepositoryError> for Error {
    fn from(error: TagRepositoryError) -> Self {
        match error {
            TagRepositoryError::Connection { message } => unavailable("tag repository", &message),
            TagRepositoryError::Query { message } => failed("tag repository", &message),
        }
    }
}

impl From<IngredientRepositoryError> for Error {
    fn from(error: IngredientRepositoryError) -> Self {
        match error {
            IngredientRepositoryError::Connection { message } => {
                unavailable("ingredient repository", &message)
            }
            IngredientRepositoryError::Query { message } => {
                failed("ingredient repository", &message)
            }
        }
    }
}

impl From<RecipeRepositoryError> for Error {
    fn from(error: RecipeRepositoryError) -> Self {
        match error {
            RecipeRepositoryError::Connection { message } => {
                unavailable("recipe repository", &message)
            }
            RecipeRepositoryError::Query { message } => failed("recipe repository", &message),
            RecipeRepositoryError::MissingReference { field, message } => {
                Self::invalid_request(message).with_details(json!({
                    "field": field,
                    "code": "missing_reference",
                }))
            }
        }
    }
}

impl From<RecipeMarkRepositoryError> for Error {
    fn from(error: RecipeMarkRepositoryError) -> Self {
        match error {
            RecipeMarkRepositoryError::Connection { message } => {
                unavailable("recipe mark repository", &message)
            }
            RecipeMarkRepositoryError::Query { message } => {
                failed("recipe mark repository", &message)
            }
            RecipeMarkRepositoryError::Duplicate { message } => Self::conflict(message),
            RecipeMarkRepositoryError::MissingTarget { message } => Self::not_found(message),
        }
    }
}

impl From<SubscriptionRepositoryError> for Error {
    fn from(error: SubscriptionRepositoryError) -> Self {
        match error {
            SubscriptionRepositoryError::Connection { message } => {
                unavailable("subscription repository", &message)
            }
            SubscriptionRepositoryError::Query { message } => {
                failed("subscription repository", &message)
            }
            SubscriptionRepositoryError::Duplicate { message } => Self::conflict(message),
            SubscriptionRepositoryError::MissingTarget { message } => Self::not_found(message),
        }
    }
}

impl From<CatalogueImportError> for Error {
    fn from(error: CatalogueImportError) -> Self {
        match error {
            CatalogueImportError::Connection { message } => {
                unavailable("catalogue import", &message)
            }
            CatalogueImportError::Query { message } => failed("catalogue import", &message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RecipeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RecipeRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RecipeRepositoryError::missing_reference("tags", "tag 9"), ErrorCode::InvalidRequest)]
    fn recipe_errors_map_to_codes(#[case] error: RecipeRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(Error::from(error).code(), code);
    }

    #[rstest]
    #[case("ingredients", "ingredient 4 does not exist")]
    #[case("tags", "tag 9 does not exist")]
    fn missing_references_name_their_field(#[case] field: &str, #[case] message: &str) {
        let error = Error::from(RecipeRepositoryError::missing_reference(field, message));
        let details = error.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], "missing_reference");
    }

    #[rstest]
    fn vanished_mark_targets_are_not_found() {
        let error = Error::from(RecipeMarkRepositoryError::missing_target("recipe 3"));
        assert_eq!(error.code(), ErrorCode::NotFound);
        let error = Error::from(SubscriptionRepositoryError::missing_target("user 8"));
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn duplicate_marks_are_conflicts() {
        let error = Error::from(RecipeMarkRepositoryError::duplicate("favourite"));
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    fn connection_failures_name_the_store() {
        let error = Error::from(UserPersistenceError::connection("pool timed out"));
        assert_eq!(error.message(), "user repository unavailable: pool timed out");
    }
}
