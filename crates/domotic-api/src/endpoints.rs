// Endpoint catalog
//
// Relative resource paths of the remote API. Parameterized paths are pure
// functions of an integer id and never fail.

/// Base origin used when no profile overrides it.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub mod users {
    pub const REGISTER: &str = "/api/users/register";
    pub const LOGIN: &str = "/api/users/login";
}

pub mod homes {
    pub const CREATE: &str = "/api/homes";
    pub const ALL: &str = "/api/homes/all";

    pub fn by_id(id: i64) -> String {
        format!("/api/homes/{id}")
    }
}

pub mod rooms {
    pub const CREATE: &str = "/api/rooms";

    pub fn by_id(id: i64) -> String {
        format!("/api/rooms/{id}")
    }

    pub fn all_by_home(home_id: i64) -> String {
        format!("/api/rooms/all/{home_id}")
    }
}

pub mod devices {
    pub const CREATE: &str = "/api/devices";

    pub fn by_id(id: i64) -> String {
        format!("/api/devices/{id}")
    }

    pub fn write(id: i64) -> String {
        format!("/api/devices/{id}/write")
    }

    pub fn all_by_room(room_id: i64) -> String {
        format!("/api/devices/all/{room_id}")
    }
}

pub mod gateways {
    pub const CREATE: &str = "/api/v1/esp32";
    pub const ALL: &str = "/api/v1/esp32/all";

    pub fn by_id(id: i64) -> String {
        format!("/api/v1/esp32/{id}")
    }
}

/// Substitute `:name` placeholders in a path template.
///
/// Placeholders without a matching entry are left untouched.
pub fn replace_url_params(template: &str, params: &[(&str, String)]) -> String {
    params.iter().fold(template.to_owned(), |acc, (key, value)| {
        acc.replacen(&format!(":{key}"), value, 1)
    })
}

/// Join a base origin and a relative path, collapsing duplicate slashes.
///
/// The `//` directly after a scheme's `:` is preserved, so
/// `combine_urls("http://host/", "/api")` yields `http://host/api`.
pub fn combine_urls(base: &str, path: &str) -> String {
    let joined = format!("{base}{path}");
    let mut out = String::with_capacity(joined.len());
    let mut prev: Option<char> = None;
    let mut before_prev: Option<char> = None;

    for ch in joined.chars() {
        if ch == '/' && prev == Some('/') && before_prev != Some(':') {
            // A third slash after `scheme://` still collapses because
            // `before_prev` is then '/', not ':'.
            continue;
        }
        before_prev = prev;
        prev = Some(ch);
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterized_paths() {
        assert_eq!(homes::by_id(7), "/api/homes/7");
        assert_eq!(rooms::all_by_home(3), "/api/rooms/all/3");
        assert_eq!(devices::write(12), "/api/devices/12/write");
        assert_eq!(devices::all_by_room(5), "/api/devices/all/5");
        assert_eq!(gateways::by_id(1), "/api/v1/esp32/1");
    }

    #[test]
    fn combine_keeps_scheme_separator() {
        assert_eq!(
            combine_urls("http://localhost:8080", "/api/homes"),
            "http://localhost:8080/api/homes"
        );
        assert_eq!(
            combine_urls("http://localhost:8080/", "/api/homes"),
            "http://localhost:8080/api/homes"
        );
    }

    #[test]
    fn combine_collapses_runs_of_slashes() {
        assert_eq!(
            combine_urls("https://example.com///", "//api///rooms/all/1"),
            "https://example.com/api/rooms/all/1"
        );
    }

    #[test]
    fn combine_without_scheme() {
        assert_eq!(combine_urls("/base/", "/x"), "/base/x");
    }

    #[test]
    fn replace_params() {
        let path = replace_url_params(
            "/homes/:homeId/rooms/:roomId",
            &[("homeId", "4".into()), ("roomId", "9".into())],
        );
        assert_eq!(path, "/homes/4/rooms/9");
        assert_eq!(replace_url_params("/x/:missing", &[]), "/x/:missing");
    }
}
