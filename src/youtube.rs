use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use eyre::{Result, bail, eyre};
use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use serde::Deserialize;

use crate::{Segment, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// How long a video's track list is reused across language attempts
const TRACK_CACHE_TTL: Duration = Duration::from_secs(60);

static API_KEY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#, r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Source of timed caption segments for a video
#[async_trait]
pub trait CaptionsProvider: Send + Sync {
    /// Fetch captions in `language`, or in any available language when `None`
    async fn fetch_segments(&self, video_id: &VideoId, language: Option<&str>) -> Result<Vec<Segment>>;
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    captions: Option<PlayerCaptions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
}

struct CachedTracks {
    video_id: VideoId,
    fetched_at: Instant,
    tracks: Arc<[CaptionTrack]>,
}

/// Captions from YouTube's built-in tracks via the InnerTube API.
///
/// The track list of the most recent video is kept briefly, so trying
/// several languages costs one player lookup plus one download per hit.
pub struct InnerTubeCaptions {
    client: reqwest::Client,
    last_tracks: Mutex<Option<CachedTracks>>,
}

impl InnerTubeCaptions {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            last_tracks: Mutex::new(None),
        }
    }

    fn cached(&self, video_id: &VideoId, now: Instant) -> Option<Arc<[CaptionTrack]>> {
        let guard = self.last_tracks.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|c| &c.video_id == video_id && now.duration_since(c.fetched_at) < TRACK_CACHE_TTL)
            .map(|c| Arc::clone(&c.tracks))
    }

    fn remember(&self, video_id: &VideoId, tracks: Arc<[CaptionTrack]>, now: Instant) {
        let mut guard = self.last_tracks.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedTracks {
            video_id: video_id.clone(),
            fetched_at: now,
            tracks,
        });
    }

    async fn tracks(&self, video_id: &VideoId) -> Result<Arc<[CaptionTrack]>> {
        if let Some(tracks) = self.cached(video_id, Instant::now()) {
            debug!("Reusing {} caption tracks for {video_id}", tracks.len());
            return Ok(tracks);
        }
        // Network failures are not cached; an empty track list is
        let tracks: Arc<[CaptionTrack]> = self.lookup_tracks(video_id).await?.into();
        self.remember(video_id, Arc::clone(&tracks), Instant::now());
        Ok(tracks)
    }

    async fn lookup_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>> {
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");
        let page = self.get_text(&watch_url).await?;
        let api_key = extract_api_key(&page).ok_or_else(|| eyre!("no InnerTube API key on watch page for {video_id}"))?;

        let body = serde_json::json!({
            "context": {
                "client": {"hl": "en", "gl": "US", "clientName": "WEB", "clientVersion": "2.20241126.01.00"}
            },
            "videoId": video_id.as_str()
        });

        let player: PlayerResponse = self
            .client
            .post(format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false"))
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let tracks = player
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|r| r.caption_tracks)
            .unwrap_or_default();
        debug!("Video {video_id} has {} caption tracks", tracks.len());
        Ok(tracks)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

#[async_trait]
impl CaptionsProvider for InnerTubeCaptions {
    async fn fetch_segments(&self, video_id: &VideoId, language: Option<&str>) -> Result<Vec<Segment>> {
        let tracks = self.tracks(video_id).await?;
        let track = select_track(&tracks, language).map_err(|e| eyre!("{e} for video {video_id}"))?;
        debug!("Downloading {} caption track for {video_id}", track.language_code);
        let xml = self.get_text(&track.base_url).await?;
        parse_caption_xml(&xml)
    }
}

/// Pick the track for `language`, or the first track when any will do
fn select_track<'a>(tracks: &'a [CaptionTrack], language: Option<&str>) -> Result<&'a CaptionTrack> {
    let Some(first) = tracks.first() else {
        bail!("no captions available");
    };
    let Some(lang) = language else {
        return Ok(first);
    };
    tracks.iter().find(|t| t.language_code == lang).ok_or_else(|| {
        let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
        eyre!("no {lang} captions (available: {})", available.join(", "))
    })
}

fn extract_api_key(html: &str) -> Option<String> {
    API_KEY_PATTERNS
        .iter()
        .find_map(|re| re.captures(html))
        .map(|caps| caps[1].to_string())
}

fn attr_f64(element: &BytesStart, name: &[u8]) -> Option<f64> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
}

/// Parse timed-text XML; each `<text start dur>` becomes one segment
fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut timing: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                timing = attr_f64(&e, b"start").map(|start| (start, attr_f64(&e, b"dur").unwrap_or(0.0)));
            }
            Ok(Event::Text(e)) => {
                let Some((start, duration)) = timing.take() else {
                    continue;
                };
                let raw = e.unescape().unwrap_or_default();
                // Captions are double-escaped (&amp;#39;) and may wrap lines
                let text = html_escape::decode_html_entities(&raw).replace('\n', " ");
                if !text.trim().is_empty() {
                    segments.push(Segment { text, start, duration });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("malformed caption XML at byte {}: {e}", reader.buffer_position()),
            _ => {}
        }
    }

    Ok(segments)
}
