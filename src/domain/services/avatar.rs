use crate::domain::models::user::Gender;

/// Seed for the hosted avatar image. Same gender and first name always give the same
/// picture; only lowercase ASCII alphanumerics are kept so no URL escaping is needed.
pub fn avatar_seed(gender: Gender, first_name: &str) -> String {
    let name: String = first_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if name.is_empty() {
        gender.as_str().to_string()
    } else {
        format!("{}-{}", gender.as_str(), name)
    }
}

pub fn avatar_url(base_url: &str, gender: Gender, first_name: &str) -> String {
    format!("{}?seed={}", base_url.trim_end_matches('/'), avatar_seed(gender, first_name))
}
