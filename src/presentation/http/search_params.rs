// src/presentation/http/search_params.rs
//! Bracket-style listing search parameters, e.g.
//! `categories[]=cake&price[min]=2&geolocation[lat]=41.3&pagination[limit]=20`.

use crate::application::queries::pastries::SearchCriteria;
use crate::presentation::http::error::{HttpError, HttpResult};
use std::str::FromStr;

/// Parse the raw query string into unvalidated criteria. Unknown keys are
/// ignored; malformed numbers are rejected here, range checks happen when
/// the criteria are turned into a search.
pub fn parse_search_criteria(raw: Option<&str>) -> HttpResult<SearchCriteria> {
    let pairs: Vec<(String, String)> = match raw {
        Some(query) => serde_urlencoded::from_str(query)
            .map_err(|err| HttpError::bad_request(format!("invalid query string: {err}")))?,
        None => Vec::new(),
    };

    let mut criteria = SearchCriteria::default();
    for (key, value) in pairs {
        match key.as_str() {
            "search" => {
                let trimmed = value.trim();
                criteria.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            "price[min]" => criteria.price_min = Some(number(&key, &value)?),
            "price[max]" => criteria.price_max = Some(number(&key, &value)?),
            "geolocation[lat]" => criteria.geolocation.lat = Some(number(&key, &value)?),
            "geolocation[lng]" => criteria.geolocation.lng = Some(number(&key, &value)?),
            "geolocation[radius]" => criteria.geolocation.radius = Some(number(&key, &value)?),
            "orderBy" => criteria.order_by = Some(value),
            "order" => criteria.order = Some(value),
            "pagination[cursor]" => criteria.cursor = Some(value),
            "pagination[limit]" => criteria.limit = Some(number(&key, &value)?),
            other if is_category_key(other) => {
                if !value.is_empty() {
                    criteria.categories.push(value);
                }
            }
            _ => {}
        }
    }

    Ok(criteria)
}

/// `categories`, `categories[]` and indexed `categories[0]` all append.
fn is_category_key(key: &str) -> bool {
    match key.strip_prefix("categories") {
        Some("") => true,
        Some(rest) => rest.starts_with('[') && rest.ends_with(']'),
        None => false,
    }
}

fn number<T: FromStr>(key: &str, value: &str) -> HttpResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HttpError::bad_request(format!("{key} must be a number")))
}
