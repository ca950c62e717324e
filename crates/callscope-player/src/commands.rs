//! Building blocks behind the `callscope` subcommands
//!
//! Everything here returns strings or sessions so the binary stays a thin
//! layer of argument parsing and printing.

use crate::render::{TextRenderer, render_transcript};
use callscope_core::{
    Config, Error, ItemId, PlaybackConfig, Result, config::DataConfig, utils::format_timestamp,
};
use callscope_timeline::{
    CallDataProvider, JsonCallProvider, Key, Message, SampleCallProvider, Session,
};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{info, warn};

/// Data source selected by the configuration
///
/// A configured calls directory wins; otherwise the built-in sample is used.
pub fn provider_for(data: &DataConfig) -> Box<dyn CallDataProvider> {
    match &data.calls_dir {
        Some(dir) => Box::new(JsonCallProvider::new(dir)),
        None => Box::new(SampleCallProvider::new()),
    }
}

/// Load `call_id` (or the configured default) into a new session
///
/// # Errors
///
/// Returns an error if the call cannot be found, read or validated.
pub async fn open_session(
    provider: &dyn CallDataProvider,
    call_id: Option<&str>,
    config: &Config,
) -> Result<Session> {
    let call_id = call_id.unwrap_or(&config.data.default_call);
    info!(provider = provider.name(), call_id, "opening call");
    let call = provider.open_call(call_id).await?;
    Ok(Session::new(call, config))
}

/// View adjustments applied before rendering or playing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOptions {
    /// Zoom-in steps
    pub zoom_steps: u32,
    /// Playhead position in seconds
    pub at: Option<f64>,
    /// Shortcuts to press, in order
    pub keys: Vec<Key>,
}

/// Apply `options` to `session` through its message interface
pub fn apply_view(session: &mut Session, options: &ViewOptions) {
    for _ in 0..options.zoom_steps {
        session.update(Message::ZoomIn);
    }
    if let Some(at) = options.at {
        session.update(Message::SeekTo(at));
    }
    for key in &options.keys {
        session.update(Message::Shortcut(*key));
    }
}

/// Check `speed` against the configured speed options
///
/// # Errors
///
/// Returns a validation error if `speed` is not one of
/// `playback.speed_options`.
pub fn check_speed(playback: &PlaybackConfig, speed: f64) -> Result<()> {
    if playback
        .speed_options
        .iter()
        .any(|option| (option - speed).abs() < f64::EPSILON)
    {
        return Ok(());
    }
    let options: Vec<String> = playback
        .speed_options
        .iter()
        .map(ToString::to_string)
        .collect();
    Err(Error::validation(
        "speed",
        format!("{speed} is not one of {}", options.join(", ")),
    ))
}

/// Frame as text, or as JSON when `json` is set
///
/// In text mode a `hover` segment gets its label drawn under the lanes.
///
/// # Errors
///
/// Returns an error if `hover` names no segment of the call or the frame
/// cannot be serialized.
pub fn inspect(
    session: &Session,
    renderer: &TextRenderer,
    hover: Option<ItemId>,
    json: bool,
) -> Result<String> {
    let hovered = hover
        .map(|id| {
            session.call().segment(id).ok_or_else(|| Error::NotFound {
                resource: format!("segment {id}"),
            })
        })
        .transpose()?;
    if json {
        return Ok(serde_json::to_string_pretty(&session.frame())?);
    }
    if let Some(segment) = hovered
        && !session.viewport().window().overlaps(segment.start, segment.end)
    {
        warn!(id = segment.id, "hovered segment is outside the visible window");
    }
    let mut out = renderer.render_with_hover(session, hovered);
    let frame = session.frame();
    for placed in &frame.events {
        let marker = placed.item;
        let _ = writeln!(
            out,
            "  {} {} [{}]{}",
            format_timestamp(marker.timestamp),
            marker.label,
            marker.effective_severity(),
            marker
                .description
                .as_deref()
                .map(|d| format!(" - {d}"))
                .unwrap_or_default()
        );
    }
    Ok(out)
}

/// Transcript lines matching `query`, with the current line marked
pub fn search(session: &mut Session, query: &str) -> String {
    session.update(Message::Search(query.to_string()));
    let lines = session.visible_transcript();
    if lines.is_empty() {
        warn!(query, "no transcript lines match");
        return format!("No lines match '{query}'\n");
    }
    let current = session.current_line().map(|line| line.id);
    render_transcript(&lines, current)
}

#[derive(Serialize)]
struct CallRow<'a> {
    id: &'a str,
    title: Option<&'a str>,
    duration: String,
    lines: usize,
    markers: usize,
}

/// Calls offered by `provider`, as a table or JSON
///
/// # Errors
///
/// Returns an error if the provider cannot list its calls or the listing
/// cannot be serialized.
pub async fn list_calls(provider: &dyn CallDataProvider, json: bool) -> Result<String> {
    let calls = provider.list_calls().await?;
    let rows: Vec<_> = calls
        .iter()
        .map(|call| CallRow {
            id: &call.id,
            title: call.title.as_deref(),
            duration: format_timestamp(call.total_duration),
            lines: call.lines,
            markers: call.markers,
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }
    let mut out = format!(
        "{:<24} {:>6} {:>6} {:>8}  {}\n",
        "ID", "LENGTH", "LINES", "MARKERS", "TITLE"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>6} {:>8}  {}",
            row.id,
            row.duration,
            row.lines,
            row.markers,
            row.title.unwrap_or("-")
        );
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use callscope_timeline::{SAMPLE_CALL_ID, sample::sample_call};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn sample_session() -> Session {
        let config = Config::default();
        let provider = provider_for(&config.data);
        open_session(provider.as_ref(), None, &config).await.unwrap()
    }

    #[tokio::test]
    async fn test_default_call_is_sample() {
        let session = sample_session().await;
        assert_eq!(session.call().id(), SAMPLE_CALL_ID);
    }

    #[tokio::test]
    async fn test_unknown_call_maps_to_not_found() {
        let config = Config::default();
        let provider = provider_for(&config.data);
        let err = open_session(provider.as_ref(), Some("nope"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, callscope_core::Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_calls_dir_selects_json_provider() {
        let dir = TempDir::new().unwrap();
        let mut record = sample_call();
        record.id = "acme-0419".to_string();
        std::fs::write(
            dir.path().join("acme-0419.json"),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();

        let mut config = Config::default();
        config.data.calls_dir = Some(dir.path().to_path_buf());
        let provider = provider_for(&config.data);

        assert_eq!(provider.name(), "json");
        let session = open_session(provider.as_ref(), Some("acme-0419"), &config)
            .await
            .unwrap();
        assert_eq!(session.call().lines().len(), 15);

        let table = list_calls(provider.as_ref(), false).await.unwrap();
        assert!(table.lines().nth(1).unwrap().starts_with("acme-0419"));
    }

    #[tokio::test]
    async fn test_apply_view() {
        let mut session = sample_session().await;
        apply_view(
            &mut session,
            &ViewOptions {
                zoom_steps: 2,
                at: Some(400.0),
                keys: vec![Key::Char('f'), Key::ArrowLeft],
            },
        );

        assert_eq!(session.viewport().zoom(), 2.0);
        assert_eq!(session.playback().current_time(), 390.0);
        assert!(session.is_fullscreen());
        assert!(session.viewport().window().contains(390.0));
    }

    #[tokio::test]
    async fn test_inspect_lists_visible_markers() {
        let mut session = sample_session().await;
        apply_view(
            &mut session,
            &ViewOptions {
                zoom_steps: 8,
                at: Some(110.0),
                keys: Vec::new(),
            },
        );

        let text = inspect(&session, &TextRenderer::new(60), None, false).unwrap();
        assert!(text.contains("Customer Objection [high] - Concern about team adaptation"));
        assert!(text.contains("Budget Concern"));
        assert!(!text.contains("Dead Air"));

        let json = inspect(&session, &TextRenderer::default(), None, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["events"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_inspect_hover() {
        let session = sample_session().await;
        let renderer = TextRenderer::default();
        let silence = session
            .call()
            .segments()
            .iter()
            .find(|segment| segment.start == 5.0)
            .map(|segment| segment.id)
            .unwrap();

        let text = inspect(&session, &renderer, Some(silence), false).unwrap();
        assert!(text.contains("^ Silence 00:05-00:08 (00:03)"));

        let err = inspect(&session, &renderer, Some(999), false).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_check_speed_uses_configured_options() {
        let playback = PlaybackConfig::default();

        assert!(check_speed(&playback, 1.5).is_ok());
        let err = check_speed(&playback, 3.0).unwrap_err();
        assert!(err.to_string().contains("3 is not one of 0.5, 0.75, 1, 1.25, 1.5, 2"));
    }

    #[tokio::test]
    async fn test_search() {
        let mut session = sample_session().await;

        let text = search(&mut session, "soc 2");
        assert_eq!(text.lines().count(), 3);

        let none = search(&mut session, "renewal");
        assert_eq!(none, "No lines match 'renewal'\n");
    }

    #[tokio::test]
    async fn test_list_calls_json() {
        let provider = SampleCallProvider::new();
        let json = list_calls(&provider, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["id"], "sample");
        assert_eq!(value[0]["duration"], "07:00");
        assert_eq!(value[0]["markers"], 5);
    }
}
