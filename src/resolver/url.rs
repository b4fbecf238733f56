//! Download URL composition.

use url::Url;

use crate::config::LANG_PLACEHOLDER;

/// Replaces the `:lang` placeholder of a location path template.
pub fn substitute_lang(template: &str, lang: &str) -> String {
    template.replace(LANG_PLACEHOLDER, lang)
}

/// Appends `path` to `base_url` and normalizes the result.
///
/// Characters that are not valid in a URL path (spaces in installer names,
/// for instance) come out percent-encoded. A string that does not parse as a
/// URL is returned as concatenated.
pub fn join_download_url(base_url: &str, path: &str) -> String {
    let joined = format!("{}{}", base_url, path);
    match Url::parse(&joined) {
        Ok(url) => url.to_string(),
        Err(e) => {
            log::debug!("Returning unparsed download URL {}: {}", joined, e);
            joined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_lang() {
        assert_eq!(
            substitute_lang("/firefox/releases/39.0/win64/:lang/Firefox Setup 39.0.exe", "de"),
            "/firefox/releases/39.0/win64/de/Firefox Setup 39.0.exe"
        );
        assert_eq!(substitute_lang("/static/file.exe", "de"), "/static/file.exe");
    }

    #[test]
    fn test_join_encodes_spaces() {
        assert_eq!(
            join_download_url(
                "http://m.example/pub",
                "/firefox/releases/39.0/win64/en-US/Firefox Setup 39.0.exe"
            ),
            "http://m.example/pub/firefox/releases/39.0/win64/en-US/Firefox%20Setup%2039.0.exe"
        );
    }

    #[test]
    fn test_join_keeps_existing_escapes() {
        assert_eq!(
            join_download_url("https://m.example", "/f/en-US/Firefox%20Setup.exe"),
            "https://m.example/f/en-US/Firefox%20Setup.exe"
        );
    }

    #[test]
    fn test_join_returns_unparseable_input_verbatim() {
        assert_eq!(join_download_url("m.example", "/file"), "m.example/file");
    }
}
