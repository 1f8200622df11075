//! Nickname rules.
//!
//! Networks the bot targets cap nicknames at 16 characters; a chat line
//! whose origin is longer than that is treated as malformed.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1 (nickname grammar)

/// Maximum nickname length accepted from an origin prefix.
pub const MAX_NICK_LEN: usize = 16;

/// Extension trait for checking if a string is a valid IRC nickname.
pub trait NickExt {
    /// Valid per RFC 2812 grammar and at most [`MAX_NICK_LEN`] characters.
    ///
    /// ```
    /// use slircbot_proto::NickExt;
    ///
    /// assert!("IamaRustBot".is_valid_nick());
    /// assert!("[away]".is_valid_nick());
    /// assert!(!"9lives".is_valid_nick());
    /// assert!(!"much_too_long_nickname".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Number of characters, the unit [`MAX_NICK_LEN`] is measured in.
    fn nick_len(&self) -> usize;
}

/// `[ ] \ ` ^ _ { | }`
#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        if self.is_empty() || self.nick_len() > MAX_NICK_LEN {
            return false;
        }

        let mut chars = self.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || is_special(first) => {}
            _ => return false,
        }

        chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }

    fn nick_len(&self) -> usize {
        self.chars().count()
    }
}
