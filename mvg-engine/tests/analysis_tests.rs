//! Integration tests for decoding and analysing generated WAV files

mod helpers;

use helpers::{generate_burst_wav, generate_silent_wav, BurstConfig};
use mvg_common::params::AnalysisParams;
use mvg_engine::error::AnalysisError;
use mvg_engine::models::Mood;
use mvg_engine::services::AudioAnalyzer;
use mvg_engine::utils::audio_decoder::decode_audio_file;
use tempfile::TempDir;

#[test]
fn test_decode_stereo_mixes_to_mono() {
    let temp_dir = TempDir::new().unwrap();
    let config = BurstConfig {
        duration_seconds: 2.0,
        channels: 2,
        ..Default::default()
    };
    let path = generate_burst_wav(&temp_dir.path().join("stereo.wav"), &config).unwrap();

    let audio = decode_audio_file(&path).unwrap();
    assert_eq!(audio.sample_rate, 40960);
    assert_eq!(audio.channels, 2);
    assert_eq!(audio.samples.len(), 2 * 40960);
    assert!((audio.duration_seconds - 2.0).abs() < 1e-9);

    // Identical channels average to the channel value
    assert!((audio.samples[1024] - 0.25).abs() < 1e-3);
}

#[tokio::test]
async fn test_burst_track_analysis() {
    let temp_dir = TempDir::new().unwrap();
    let path = generate_burst_wav(&temp_dir.path().join("bursts.wav"), &BurstConfig::default()).unwrap();

    let track = AudioAnalyzer::new(AnalysisParams::default())
        .analyze(&path)
        .await
        .unwrap();

    let analysis = &track.analysis;
    assert!((track.duration_seconds - 30.0).abs() < 1e-9);
    assert!((analysis.tempo - 100.0).abs() < 0.5, "tempo {}", analysis.tempo);
    assert!(
        analysis.energy > 0.3 && analysis.energy < 0.4,
        "energy {}",
        analysis.energy
    );
    assert_eq!(analysis.mood, Mood::Peaceful);

    assert_eq!(analysis.segments.len(), 8);
    for (i, segment) in analysis.segments.iter().enumerate() {
        assert!((segment.start_time - i as f64 * 3.75).abs() < 1e-9);
        assert!((segment.duration - 3.75).abs() < 1e-9);
        assert!(segment.energy > 0.0 && segment.energy <= 1.0);
        assert_eq!(segment.dominant_frequency, 440.0);
    }
}

#[tokio::test]
async fn test_silence_uses_fallback_tempo() {
    let temp_dir = TempDir::new().unwrap();
    let path = generate_silent_wav(&temp_dir.path().join("silence.wav"), 5.0, 44100).unwrap();

    let track = AudioAnalyzer::new(AnalysisParams::default())
        .analyze(&path)
        .await
        .unwrap();

    assert_eq!(track.analysis.tempo, 120.0);
    assert_eq!(track.analysis.energy, 0.0);
    assert_eq!(track.analysis.mood, Mood::Energetic);
    assert!(track.analysis.segments.iter().all(|s| s.energy == 0.0));
}

#[tokio::test]
async fn test_custom_segment_count_and_override_rate() {
    let temp_dir = TempDir::new().unwrap();
    let path = generate_burst_wav(&temp_dir.path().join("bursts.wav"), &BurstConfig::default()).unwrap();

    // Half the true rate gives a raw 50 BPM, clamped to the 60 BPM floor
    let params = AnalysisParams {
        segment_count: 3,
        sample_rate_override: Some(20480),
        ..Default::default()
    };
    let track = AudioAnalyzer::new(params).analyze(&path).await.unwrap();

    assert_eq!(track.analysis.segments.len(), 3);
    assert!((track.analysis.tempo - 60.0).abs() < 0.5, "tempo {}", track.analysis.tempo);
}

#[tokio::test]
async fn test_non_audio_file_is_analysis_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.wav");
    std::fs::write(&path, b"definitely not a RIFF header").unwrap();

    let err = AudioAnalyzer::new(AnalysisParams::default())
        .analyze(&path)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::AnalysisFailure(_)));
}

#[tokio::test]
async fn test_missing_file_is_analysis_failure() {
    let temp_dir = TempDir::new().unwrap();
    let err = AudioAnalyzer::new(AnalysisParams::default())
        .analyze(&temp_dir.path().join("absent.mp3"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::AnalysisFailure(_)));
}
