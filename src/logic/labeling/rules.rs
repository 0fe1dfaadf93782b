//! Labeling Rules
//!
//! Định nghĩa whitelist, keyword và pattern cho heuristic gán nhãn.
//! KHÔNG chứa logic - chỉ constants.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// WHITELIST (checked first, case-sensitive substring)
// ============================================================================

pub const WHITELIST_PHRASES: &[&str] = &["SSH client hassh fingerprint", "New connection"];

// ============================================================================
// MALICIOUS KEYWORDS (substring, case-sensitive)
// ============================================================================

pub const MALICIOUS_KEYWORDS: &[&str] = &[
    "failed",
    "whoami",
    "uname",
    "chattr",
    "cat",
    " rm",
    ".ssh",
    "authorized_keys",
    "grep",
    "chmod",
    "curl",
    "not found",
    "mkdir",
    "/bin/",
    "/tmp/",
    "sshd",
    ".sh",
    "ssh-rsa",
    "ps",
    "crontab",
    "uptime",
    "ifconfig",
    "cpuinfo",
    "df",
    "chpasswd",
    "free",
    "pkill",
    "pgrep",
    "admin",
];

// ============================================================================
// PATTERNS
// ============================================================================

/// Failed root login with any non-empty password that has no `]`
pub const FAILED_ROOT_LOGIN_PATTERN: &str = r"login attempt \[root/[^\]]+\] failed";

pub static FAILED_ROOT_LOGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(FAILED_ROOT_LOGIN_PATTERN).expect("failed-login pattern is a valid regex")
});
