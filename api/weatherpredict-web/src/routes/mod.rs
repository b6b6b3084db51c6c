use validator::ValidationErrors;

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod landing;

/// First validation message, checking fields in form order.
pub(crate) fn first_validation_message(errors: &ValidationErrors, fields: &[&str]) -> String {
    let field_errors = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| "Please check the form and try again".to_string())
}
