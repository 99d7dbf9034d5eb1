//! Route templates for span fields.

use uuid::Uuid;

/// Replace UUID path segments so spans group by route rather than by resource.
pub(super) fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
