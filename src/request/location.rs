//! Absolute URL construction for requests.

use url::Url;

use super::params::query_pairs;
use super::Request;

impl Request {
    /// Resolves this request against a gateway base URL.
    ///
    /// The request path is appended to the base path (a leading `/` on the
    /// request path does not replace the base path) and parameters are encoded
    /// as query pairs.
    pub fn url_for(&self, base: &Url) -> Url {
        let mut url = base.clone();

        let base_path = base.path().trim_end_matches('/');
        let request_path = self.path.trim_start_matches('/');
        url.set_path(&format!("{}/{}", base_path, request_path));
        url.set_query(None);

        if let Some(params) = self.params.as_ref().filter(|params| !params.is_empty()) {
            let mut query = url.query_pairs_mut();
            for (name, value) in query_pairs(params) {
                match value {
                    Some(value) => query.append_pair(&name, &value),
                    None => query.append_key_only(&name),
                };
            }
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, ParamValue};

    fn base() -> Url {
        Url::parse("http://localhost:8080/api").unwrap()
    }

    #[test]
    fn test_url_for_joins_paths() {
        let request = Request::new(Method::Get, "/users/42");
        assert_eq!(
            request.url_for(&base()).as_str(),
            "http://localhost:8080/api/users/42"
        );
    }

    #[test]
    fn test_url_for_root_base() {
        let base = Url::parse("http://localhost/").unwrap();
        let request = Request::new(Method::Get, "status");
        assert_eq!(request.url_for(&base).as_str(), "http://localhost/status");
    }

    #[test]
    fn test_url_for_encodes_params() {
        let request = Request::new(Method::Get, "/search")
            .with_param("q", "a b")
            .with_param("tags", vec!["x", "y"])
            .with_param("debug", ParamValue::Null);

        assert_eq!(
            request.url_for(&base()).as_str(),
            "http://localhost:8080/api/search?debug&q=a+b&tags%5B%5D=x&tags%5B%5D=y"
        );
    }

    #[test]
    fn test_url_for_without_params_has_no_query() {
        let request = Request::new(Method::Get, "/plain");
        assert_eq!(request.url_for(&base()).query(), None);
    }
}
