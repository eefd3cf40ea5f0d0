use quill_core::PlatformError;
use quill_core::domain::Slug;

/// Reject ids the platform would refuse, with the platform's wording.
pub(crate) fn check(param: &str, id: &str) -> Result<(), PlatformError> {
    Slug::parse(id).map(|_| ()).map_err(|_| {
        PlatformError::Invalid(format!(
            "Invalid `{param}` param: Parameter must contain at most 36 chars. \
             Valid chars are a-z, A-Z, 0-9, period, hyphen, and underscore. \
             Can't start with a special char"
        ))
    })
}
