use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    Twitter,
    LinkedIn,
    Facebook,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 3] = [ShareTarget::Twitter, ShareTarget::LinkedIn, ShareTarget::Facebook];

    pub fn parse(s: &str) -> Option<ShareTarget> {
        match s.trim().to_lowercase().as_str() {
            "twitter" => Some(ShareTarget::Twitter),
            "linkedin" => Some(ShareTarget::LinkedIn),
            "facebook" => Some(ShareTarget::Facebook),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ShareTarget::Twitter => "twitter",
            ShareTarget::LinkedIn => "linkedin",
            ShareTarget::Facebook => "facebook",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShareTarget::Twitter => "Twitter",
            ShareTarget::LinkedIn => "LinkedIn",
            ShareTarget::Facebook => "Facebook",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    #[default]
    Image,
    Live,
}

impl ShareType {
    pub fn parse(s: &str) -> Option<ShareType> {
        match s.trim() {
            "image" => Some(ShareType::Image),
            "live" => Some(ShareType::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShareType::Image => "image",
            ShareType::Live => "live",
        }
    }
}

/// "Advanced share" dialog state.
#[derive(Debug, Clone, PartialEq)]
pub struct SharingSettings {
    pub share_type: ShareType,
    pub share_text: String,
    pub include_watermark: bool,
}

impl Default for SharingSettings {
    fn default() -> Self {
        Self {
            share_type: ShareType::Image,
            share_text: "Check out this amazing chart analysis on SG3!".to_string(),
            include_watermark: true,
        }
    }
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`,
/// byte-for-byte over the UTF-8 encoding.
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

pub fn chart_link(base_url: &str, symbol: &str, interval: &str) -> String {
    format!(
        "{}/chart/{}/{}/analysis",
        base_url,
        encode_uri_component(symbol),
        encode_uri_component(interval)
    )
}

pub fn embed_code(base_url: &str, symbol: &str) -> String {
    format!(
        r#"<iframe src="{}/embed/chart/{}" width="800" height="600" frameborder="0"></iframe>"#,
        base_url,
        encode_uri_component(symbol)
    )
}

/// Third-party share endpoint for `link`, with `text` where the target supports it.
pub fn share_url(target: ShareTarget, link: &str, text: &str) -> String {
    let url = encode_uri_component(link);
    match target {
        ShareTarget::Twitter => format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            encode_uri_component(text),
            url
        ),
        ShareTarget::LinkedIn => format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
        ShareTarget::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
    }
}
