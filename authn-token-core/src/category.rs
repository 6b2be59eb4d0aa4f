use crate::error::TokenError;

/// Number of base64-url bytes at the front of every opaque token that
/// identify its [`Category`]. The codec strips exactly this many bytes
/// before base64-decoding the remainder of the token.
pub const BASE64_PREFIX_LEN: usize = 2;

/// The closed set of recognized token kinds.
///
/// Each variant controls the two-character textual prefix folded into the
/// signed string (§4.3), the two-character base64 prefix that appears at the
/// front of every encoded token, and whether an absolute expiration is
/// embedded in the token body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    /// Short-lived token presented on every authenticated request.
    Access,
    /// Long-lived token exchanged for a fresh `Access` token.
    Refresh,
    /// Token embedded in an out-of-band email link (e.g. verify-address).
    Email,
    /// Long-lived token for unattended/offline clients.
    Offline,
}

impl Category {
    /// All recognized categories, in a stable order. Used to search for a
    /// matching base64 prefix in [`Category::from_base64_prefix`].
    pub const ALL: [Category; 4] = [
        Category::Access,
        Category::Refresh,
        Category::Email,
        Category::Offline,
    ];

    /// The two printable bytes folded into the signed string.
    pub const fn text_prefix(self) -> &'static str {
        match self {
            Category::Access => "ac",
            Category::Refresh => "re",
            Category::Email => "em",
            Category::Offline => "of",
        }
    }

    /// The two bytes that appear at the front of every encoded token of this
    /// category. Must be the base64-url encoding of [`Self::text_prefix`].
    pub const fn base64_prefix(self) -> &'static str {
        match self {
            Category::Access => "YW",
            Category::Refresh => "cm",
            Category::Email => "ZW",
            Category::Offline => "b2",
        }
    }

    /// Whether this category's encoded body carries an absolute expiration
    /// timestamp (§4.4). All categories still have a *configured* max age
    /// (§4.4, §6) enforced at decode time; this flag only controls whether
    /// that timestamp is also written into the wire format.
    pub const fn carries_expiration(self) -> bool {
        matches!(self, Category::Access)
    }

    /// Determine a token's category from the first [`BASE64_PREFIX_LEN`]
    /// bytes of its opaque string.
    pub fn from_base64_prefix(s: &str) -> Result<Self, TokenError> {
        if s.len() < BASE64_PREFIX_LEN {
            return Err(TokenError::BadToken);
        }
        let prefix = &s[..BASE64_PREFIX_LEN];
        Self::ALL
            .into_iter()
            .find(|c| c.base64_prefix() == prefix)
            .ok_or(TokenError::BadToken)
    }
}

#[cfg(test)]
mod test {
    use base64::Engine;

    use super::*;

    #[test]
    fn base64_prefix_matches_text_prefix_encoding() {
        // `base64_prefix` is the first two characters of the full base64-url
        // encoding of `text_prefix` (two ASCII bytes encode to three base64
        // characters; the third only covers the low bits of the second byte).
        for category in Category::ALL {
            let full = base64::engine::general_purpose::URL_SAFE_NO_PAD
                .encode(category.text_prefix().as_bytes());
            assert_eq!(&full[..BASE64_PREFIX_LEN], category.base64_prefix());
        }
    }

    #[test]
    fn from_base64_prefix_round_trips() {
        for category in Category::ALL {
            let prefix = category.base64_prefix();
            assert_eq!(Category::from_base64_prefix(prefix).unwrap(), category);
        }
    }

    #[test]
    fn from_base64_prefix_rejects_unknown() {
        assert_eq!(
            Category::from_base64_prefix("zz").unwrap_err(),
            TokenError::BadToken
        );
        assert_eq!(
            Category::from_base64_prefix("a").unwrap_err(),
            TokenError::BadToken
        );
    }

    #[test]
    fn only_access_carries_expiration() {
        assert!(Category::Access.carries_expiration());
        assert!(!Category::Refresh.carries_expiration());
        assert!(!Category::Email.carries_expiration());
        assert!(!Category::Offline.carries_expiration());
    }
}
