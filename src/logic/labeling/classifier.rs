//! Heuristic Labeler
//!
//! CHỈ chứa logic gán nhãn - whitelist > keyword > pattern > benign.
//! Cùng một hàm được dùng lúc train và lúc validate.

use super::rules::{FAILED_ROOT_LOGIN, MALICIOUS_KEYWORDS, WHITELIST_PHRASES};
use super::types::{Label, MatchedRule};

/// Decide which rule fires for a message, in strict precedence order
pub fn explain(message: &str) -> MatchedRule {
    if let Some(phrase) = WHITELIST_PHRASES.iter().find(|p| message.contains(*p)) {
        return MatchedRule::Whitelist(*phrase);
    }

    if let Some(keyword) = MALICIOUS_KEYWORDS.iter().find(|k| message.contains(*k)) {
        return MatchedRule::Keyword(*keyword);
    }

    if FAILED_ROOT_LOGIN.is_match(message) {
        return MatchedRule::FailedRootLogin;
    }

    MatchedRule::NoMatch
}

/// Label a raw event message
pub fn label(message: &str) -> Label {
    match explain(message) {
        MatchedRule::Keyword(_) | MatchedRule::FailedRootLogin => Label::Attack,
        MatchedRule::Whitelist(_) | MatchedRule::NoMatch => Label::Benign,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_root_login_is_attack() {
        assert_eq!(label("login attempt [root/12345] failed"), Label::Attack);
    }

    #[test]
    fn test_plain_connection_is_benign() {
        // whitelisted, and nothing else matches either
        assert_eq!(label("New connection from 1.2.3.4"), Label::Benign);
        assert_eq!(label("Remote SSH version: SSH-2.0-Go"), Label::Benign);
    }

    #[test]
    fn test_whitelist_beats_keyword() {
        let msg = "SSH client hassh fingerprint abc, whoami";
        assert_eq!(explain(msg), MatchedRule::Whitelist("SSH client hassh fingerprint"));
        assert_eq!(label(msg), Label::Benign);

        for phrase in WHITELIST_PHRASES {
            for keyword in MALICIOUS_KEYWORDS {
                let msg = format!("{} {}", keyword, phrase);
                assert_eq!(label(&msg), Label::Benign, "{}", msg);
            }
        }
    }

    #[test]
    fn test_pattern_for_any_password_without_bracket() {
        // "failed" is also a keyword; the pattern stays reachable through explain
        for password in ["x", "admin123", "p a s s", "[[", "!@#$%^&*()"] {
            let msg = format!("login attempt [root/{}] failed", password);
            assert_eq!(label(&msg), Label::Attack, "{}", msg);
        }
    }

    #[test]
    fn test_pattern_rule_on_its_own() {
        assert!(FAILED_ROOT_LOGIN.is_match("login attempt [root/hunter2] failed"));
        assert!(!FAILED_ROOT_LOGIN.is_match("login attempt [root/] failed"));
        assert!(!FAILED_ROOT_LOGIN.is_match("login attempt [root/a]b] failed"));
        assert!(!FAILED_ROOT_LOGIN.is_match("login attempt [user/abc] failed"));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(label("WHOAMI"), Label::Benign);
        assert_eq!(label("whoami"), Label::Attack);
        assert_eq!(explain("CMD: uname -a"), MatchedRule::Keyword("uname"));
    }

    #[test]
    fn test_deterministic() {
        let msg = "CMD: cat /proc/cpuinfo | grep name";
        assert_eq!(label(msg), label(msg));
    }
}
