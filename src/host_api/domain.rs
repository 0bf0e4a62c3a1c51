use url::Url;

const WEB_SCHEMES: [&str; 2] = ["http", "https"];

/// Pseudo host of the page the browser opens in a new tab.
const NEW_TAB_HOST: &str = "newtab";

/// Resolves an url into the domain used as an aggregation key. Web pages resolve to the host
/// component of the url. Browser pages keep their scheme, so `chrome://settings/` resolves to
/// `chrome://settings`, except the new tab page which resolves to `newtab`.
pub fn resolve_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str().filter(|host| !host.is_empty())?;
    if WEB_SCHEMES.contains(&parsed.scheme()) || host == NEW_TAB_HOST {
        Some(host.to_string())
    } else {
        Some(format!("{}://{host}", parsed.scheme()))
    }
}
