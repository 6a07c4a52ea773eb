use axum::response::Html;

const ROUTE_LISTING: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/start (enter as YYYY-MM-DD)",
    "/api/v1.0/start/end (enter as YYYY-MM-DD/YYYY-MM-DD)",
];

/// List all available api routes.
pub async fn get_index() -> Html<String> {
    Html(render_route_listing())
}

pub fn render_route_listing() -> String {
    ROUTE_LISTING.join("<br/>")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn listing_names_every_route() {
        let listing = render_route_listing();
        assert!(listing.starts_with("/api/v1.0/precipitation<br/>"));
        assert!(listing.ends_with("(enter as YYYY-MM-DD/YYYY-MM-DD)"));
        assert_eq!(listing.matches("<br/>").count(), 4);
    }
}
