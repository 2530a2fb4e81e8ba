//! Coarse device labeling from User-Agent strings.

/// Summarize a raw User-Agent header into a short "browser on platform"
/// label for session listings. This is a coarse classification, not a
/// full UA parser; unrecognized agents fall back to a generic label.
pub fn summarize_user_agent(user_agent: &str) -> String {
    let ua = user_agent.trim();
    if ua.is_empty() {
        return "Unknown device".to_string();
    }

    let browser = if ua.contains("Edg/") || ua.contains("Edge/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("Firefox/") {
        "Firefox"
    } else if ua.contains("Chrome/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else if ua.contains("curl/") {
        "curl"
    } else {
        "Unknown browser"
    };

    let platform = if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        "macOS"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        return browser.to_string();
    };

    format!("{browser} on {platform}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                                 AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 \
                                 Mobile/15E148 Safari/604.1";
    const EDGE_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                            (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

    #[test]
    fn test_common_browsers() {
        assert_eq!(summarize_user_agent(CHROME_WIN), "Chrome on Windows");
        assert_eq!(summarize_user_agent(SAFARI_IPHONE), "Safari on iOS");
        assert_eq!(summarize_user_agent(EDGE_WIN), "Edge on Windows");
    }

    #[test]
    fn test_non_browser_agents() {
        assert_eq!(summarize_user_agent("curl/8.4.0"), "curl");
        assert_eq!(summarize_user_agent(""), "Unknown device");
        assert_eq!(summarize_user_agent("weird-bot/1.0"), "Unknown browser");
    }
}
