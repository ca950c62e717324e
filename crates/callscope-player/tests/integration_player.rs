//! Integration tests for the terminal player

use callscope_core::Config;
use callscope_player::{
    PlaybackDriver, StopReason, TextRenderer, ViewOptions,
    commands::{apply_view, open_session},
    provider_for,
};
use callscope_timeline::{Key, Message};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_play_zoomed_sample_to_end() {
    let config = Config::default();
    let provider = provider_for(&config.data);
    let mut session = open_session(provider.as_ref(), None, &config).await.unwrap();
    apply_view(
        &mut session,
        &ViewOptions {
            zoom_steps: 4,
            at: Some(400.0),
            keys: vec![Key::Space],
        },
    );
    session.update(Message::SetSpeed(2.0));
    assert!(session.playback().is_playing());

    let mut windows = Vec::new();
    let summary = PlaybackDriver::new(Duration::from_millis(100))
        .run(&mut session, |session| windows.push(session.viewport().window()))
        .await;

    assert_eq!(summary.reason, StopReason::Finished);
    assert_eq!(summary.ticks, 100);
    assert_eq!(summary.position, 420.0);
    assert!(windows.iter().all(|window| (window.end() - 420.0).abs() < 1e-9));

    let text = TextRenderer::new(40).render(&session);
    assert!(text.contains("[paused] 07:00 / 07:00"));
}

#[tokio::test(start_paused = true)]
async fn test_stop_time_leaves_frame_at_requested_position() {
    let config = Config::default();
    let provider = provider_for(&config.data);
    let mut session = open_session(provider.as_ref(), None, &config).await.unwrap();
    session.update(Message::Play);

    let summary = PlaybackDriver::new(config.playback.tick_interval())
        .with_stop_at(8.0)
        .run(&mut session, |_| {})
        .await;

    assert_eq!(summary.reason, StopReason::StopTime);
    let line = session.current_line().unwrap();
    assert_eq!(line.id, 2);
}
