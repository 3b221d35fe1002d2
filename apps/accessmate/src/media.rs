//! Autoplay suppression for audio, video and embedded players.
//!
//! A headless page never plays anything, so "stopping" means rewriting the
//! markup a browser would start playing from: `autoplay` is dropped from
//! `video`/`audio` (which get `controls` instead), and YouTube/Vimeo
//! embeds lose their `autoplay=1` query parameter.

use crate::dom::{self, Document};
use serde::Serialize;

const PLAYER_HOSTS: [&str; 3] = ["youtube.com", "youtube-nocookie.com", "vimeo.com"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AutoplayOutcome {
    /// `video`/`audio` elements that lost `autoplay`.
    pub media: usize,
    /// Player iframes whose `src` was rewritten.
    pub embeds: usize,
}

impl AutoplayOutcome {
    pub fn total(&self) -> usize {
        self.media + self.embeds
    }
}

fn is_player(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    let rest = lower.split_once("//").map_or(lower.as_str(), |(_, r)| r);
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    PLAYER_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
}

/// `src` without `autoplay=1`/`autoplay=true`, or None when there is none.
fn strip_autoplay(src: &str) -> Option<String> {
    let (base, fragment) = match src.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (src, None),
    };
    let (path, query) = base.split_once('?')?;
    let is_autoplay = |pair: &&str| {
        let (key, value) = pair.split_once('=').unwrap_or((*pair, ""));
        key.eq_ignore_ascii_case("autoplay") && (value == "1" || value.eq_ignore_ascii_case("true"))
    };
    let pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    if !pairs.iter().any(is_autoplay) {
        return None;
    }
    let kept: Vec<&str> = pairs.into_iter().filter(|p| !is_autoplay(p)).collect();
    let mut out = path.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(f) = fragment {
        out.push('#');
        out.push_str(f);
    }
    Some(out)
}

/// Stop every autoplaying element of `doc`. A second call changes nothing.
pub fn stop_autoplay(doc: &mut Document) -> AutoplayOutcome {
    let mut outcome = AutoplayOutcome::default();
    for el in doc.select("video[autoplay], audio[autoplay]") {
        dom::remove_attr(&el, "autoplay");
        dom::set_attr(&el, "controls", "");
        tracing::debug!(element = %dom::describe(&el), "autoplay removed");
        outcome.media += 1;
    }
    for frame in doc.select("iframe[src]") {
        let Some(src) = dom::attr(&frame, "src") else {
            continue;
        };
        if !is_player(&src) {
            continue;
        }
        if let Some(stopped) = strip_autoplay(&src) {
            dom::set_attr(&frame, "src", &stopped);
            tracing::debug!(from = %src, to = %stopped, "embedded player stopped");
            outcome.embeds += 1;
        }
    }
    if outcome.total() > 0 {
        tracing::info!(media = outcome.media, embeds = outcome.embeds, "stopped autoplay");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_autoplay_becomes_controls() {
        let mut doc = Document::parse(
            r#"<body><video src="a.mp4" autoplay muted></video><audio src="b.mp3" autoplay></audio><video src="c.mp4"></video></body>"#,
        );
        let outcome = stop_autoplay(&mut doc);
        assert_eq!(outcome, AutoplayOutcome { media: 2, embeds: 0 });
        for el in doc.select("video, audio").iter().take(2) {
            assert!(!dom::has_attr(el, "autoplay"));
            assert!(dom::has_attr(el, "controls"));
        }
        assert!(!dom::has_attr(&doc.select("video")[1], "controls"));
        assert_eq!(stop_autoplay(&mut doc).total(), 0);
    }

    #[test]
    fn test_player_embeds_lose_autoplay_param() {
        let mut doc = Document::parse(
            r#"<body>
            <iframe src="https://www.youtube.com/embed/x?autoplay=1&mute=1"></iframe>
            <iframe src="https://player.vimeo.com/video/1?autoplay=1#t=5"></iframe>
            <iframe src="https://example.com/embed?autoplay=1"></iframe>
            <iframe src="https://www.youtube.com/embed/y"></iframe>
            </body>"#,
        );
        assert_eq!(stop_autoplay(&mut doc).embeds, 2);
        let srcs: Vec<String> = doc
            .select("iframe")
            .iter()
            .filter_map(|f| dom::attr(f, "src"))
            .collect();
        assert_eq!(srcs[0], "https://www.youtube.com/embed/x?mute=1");
        assert_eq!(srcs[1], "https://player.vimeo.com/video/1#t=5");
        assert_eq!(srcs[2], "https://example.com/embed?autoplay=1");
        assert_eq!(srcs[3], "https://www.youtube.com/embed/y");
    }

    #[test]
    fn test_player_host_matching() {
        assert!(is_player("//www.youtube-nocookie.com/embed/x"));
        assert!(is_player("https://vimeo.com/1"));
        assert!(!is_player("https://notyoutube.com/embed"));
        assert!(!is_player("https://example.com/?next=youtube.com"));
    }
}
