//! Magnet URI construction.

/// Announce URLs appended to ThePirateBay and EZTV magnets, in order.
pub const PIRATEBAY_TRACKERS: &[&str] = &[
    "udp://tracker.coppersurfer.tk:6969/announce",
    "udp://tracker.opentrackr.org:1337",
    "udp://tracker.internetwarriors.net:1337/announce",
    "udp://tracker.leechers-paradise.org:6969/announce",
    "udp://tracker.pirateparty.gr:6969/announce",
    "udp://tracker.cyberia.is:6969/announce",
    "udp://open.demonii.com:1337/announce",
    "udp://tracker.openbittorrent.com:80",
];

/// Announce URLs appended to YTS magnets, in order.
pub const YTS_TRACKERS: &[&str] = &[
    "udp://open.demonii.com:1337/announce",
    "udp://tracker.openbittorrent.com:80",
    "udp://tracker.coppersurfer.tk:6969",
    "udp://glotorrents.pw:6969/announce",
    "udp://tracker.opentrackr.org:1337/announce",
    "udp://torrent.gresille.org:80/announce",
    "udp://p4p.arenabg.com:1337",
    "udp://tracker.leechers-paradise.org:6969",
];

/// Builds `magnet:?xt=urn:btih:<hash>&dn=<name>&tr=...` from an info hash.
///
/// Returns `None` when the hash is blank.
pub fn build_magnet(info_hash: &str, display_name: &str, trackers: &[&str]) -> Option<String> {
    let info_hash = info_hash.trim();
    if info_hash.is_empty() {
        return None;
    }

    let mut magnet = format!(
        "magnet:?xt=urn:btih:{info_hash}&dn={}",
        urlencoding::encode(display_name)
    );
    for tracker in trackers {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }

    Some(magnet)
}
