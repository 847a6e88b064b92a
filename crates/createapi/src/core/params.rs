use crate::data::Params;

/// Merge caller parameters with a descriptor's defaults and required values.
///
/// - A default fills a key that is absent or empty in `params`.
/// - A required value always overwrites the caller's value.
///
/// Keys the caller supplied keep their position; newly defaulted keys
/// follow, then newly required keys.
///
/// # Examples
///
/// ```
/// use createapi::{merge_params, Params};
///
/// let merged = merge_params(
///     Params::from([("q", "abc"), ("key", "mine")]),
///     &Params::from([("limit", "10")]),
///     &Params::from([("key", "X")]),
/// );
/// assert_eq!(merged, Params::from([("q", "abc"), ("key", "X"), ("limit", "10")]));
/// ```
pub fn merge_params(mut params: Params, defaults: &Params, required: &Params) -> Params {
    for (key, value) in defaults.iter() {
        if params.get(key).is_none_or(str::is_empty) {
            params.insert(key, value);
        }
    }
    for (key, value) in required.iter() {
        params.insert(key, value);
    }
    params
}

/// Join `key=value` pairs with `&`. Values are not percent-encoded.
pub fn build_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// `<base>/?<query>`
pub fn build_url(base: &str, params: &Params) -> String { format!("{base}/?{}", build_query(params)) }
