#![forbid(unsafe_code)]

//! Feed query URLs for the provider's upload and search endpoints.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const DEFAULT_FEED_BASE_URL: &str = "http://gdata.youtube.com/feeds/api";
pub const MAX_RESULTS: u32 = 50;
/// Partial-response selector; keeps payloads down to what a record needs.
pub const FEED_FIELDS: &str = "entry(author(name),id,published,title,content,link)";

/// Everything but RFC 3986 unreserved characters is encoded inside a term or
/// path segment, so `&`, `#`, `/`, `+` and quotes cannot break the URL.
const TERM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, TERM).to_string()
}

/// Every upload of a single provider account, no search term.
pub(crate) fn build_request_for_user_videos(base_url: &str, external_id: &str) -> String {
    let external_id = encode(external_id);
    format!(
        "{base_url}/users/{external_id}/uploads?alt=json&max-results={MAX_RESULTS}&fields={FEED_FIELDS}"
    )
}

/// General search for videos mentioning any project tag by any member:
/// `q=(tag|tag)/(member|member)`.
pub(crate) fn build_request_for_project_videos<S: AsRef<str>>(
    base_url: &str,
    tags: &[S],
    members: &[S],
) -> String {
    let query = format!(
        "{}/{}",
        escape_query_params(tags),
        escape_query_params(members)
    );
    format!(
        "{base_url}/videos?alt=json&max-results={MAX_RESULTS}&orderby=published&fields={FEED_FIELDS}&q={query}"
    )
}

/// Renders a group of search terms as `(a|"b+c"|d)`: lower-cased, multi-word
/// terms quoted with `+` for spaces, joined by `|`. Each word is
/// percent-encoded; the grouping characters are left as written.
pub(crate) fn escape_query_params<S: AsRef<str>>(params: &[S]) -> String {
    let terms: Vec<String> = params
        .iter()
        .map(|param| {
            let term = param.as_ref().to_lowercase();
            if term.contains(' ') {
                let words: Vec<String> = term.split(' ').map(encode).collect();
                format!("\"{}\"", words.join("+"))
            } else {
                encode(&term)
            }
        })
        .collect();
    format!("({})", terms.join("|"))
}
