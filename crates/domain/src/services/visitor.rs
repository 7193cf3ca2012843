//! Classification of public menu visitors.

use crate::models::{DeviceType, ScanSource};

/// Derives the device class from a User-Agent header.
pub fn classify_device(user_agent: Option<&str>) -> DeviceType {
    let ua = match user_agent.map(str::trim) {
        Some(ua) if !ua.is_empty() => ua.to_ascii_lowercase(),
        _ => return DeviceType::Unknown,
    };

    let is_android = ua.contains("android");
    if ua.contains("ipad")
        || ua.contains("tablet")
        || ua.contains("kindle")
        || ua.contains("silk/")
        || (is_android && !ua.contains("mobile"))
    {
        return DeviceType::Tablet;
    }

    if ua.contains("mobi")
        || ua.contains("iphone")
        || ua.contains("ipod")
        || ua.contains("windows phone")
        || ua.contains("blackberry")
        || is_android
    {
        return DeviceType::Mobile;
    }

    if ua.contains("windows")
        || ua.contains("macintosh")
        || ua.contains("x11")
        || ua.contains("linux")
        || ua.contains("cros")
    {
        return DeviceType::Desktop;
    }

    DeviceType::Unknown
}

/// Resolves the traffic source: a present `qr` parameter wins, then an
/// explicit link/social/direct hint, otherwise the visit counts as direct.
pub fn resolve_source(qr: Option<&str>, source: Option<&str>) -> ScanSource {
    if qr.map(|q| !q.trim().is_empty()).unwrap_or(false) {
        return ScanSource::Qr;
    }

    source
        .map(|s| s.trim().to_ascii_lowercase())
        .and_then(|s| ScanSource::parse(&s))
        .filter(|s| *s != ScanSource::Qr)
        .unwrap_or(ScanSource::Direct)
}
