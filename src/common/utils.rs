/// Percent-encode a single path segment
pub fn path_escape(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Join segments into an absolute server path, escaping each one
pub fn new_url(parts: &[&str]) -> String {
    let mut url = String::new();
    for part in parts {
        url.push('/');
        url.push_str(&path_escape(part));
    }
    url
}

/// Path scoped to a database: `/_db/{database}/...`
pub fn database_url(database: &str, parts: &[&str]) -> String {
    format!("/_db/{}{}", path_escape(database), new_url(parts))
}
