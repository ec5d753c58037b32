pub(crate) mod contents {
    pub(crate) const INDEX_HTML: &str = include_str!("index.html");

    /// Returns the page with the session token filled in.
    pub(crate) fn render(token: &str) -> String {
        INDEX_HTML.replace("__SESSION_TOKEN__", token)
    }
}
