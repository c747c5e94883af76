use super::*;

const PROBE_MP4: &[u8] = br#"{
  "programs": [],
  "streams": [
    {"width": 320, "height": 240, "r_frame_rate": "30/1", "avg_frame_rate": "30/1",
     "duration": "2.000000", "nb_frames": "60"}
  ],
  "format": {"duration": "2.010000"}
}"#;

#[test]
fn parse_probe_reads_dimensions_rate_and_count() {
    let info = parse_probe_json(Path::new("a.mp4"), PROBE_MP4).unwrap();
    assert_eq!((info.width, info.height), (320, 240));
    assert_eq!(info.fps, Some(30.0));
    assert_eq!(info.nb_frames, Some(60));
    assert_eq!(info.frame_count(), Some(60));
}

#[test]
fn frame_count_falls_back_to_duration_times_rate() {
    let json = br#"{"streams": [{"width": 8, "height": 8, "avg_frame_rate": "0/0",
                    "r_frame_rate": "25/1"}], "format": {"duration": "1.96"}}"#;
    let info = parse_probe_json(Path::new("a.mkv"), json).unwrap();
    assert_eq!(info.nb_frames, None);
    assert_eq!(info.fps, Some(25.0));
    assert_eq!(info.frame_count(), Some(49));
}

#[test]
fn frame_count_estimate_drops_partial_trailing_frame() {
    let json = br#"{"streams": [{"width": 8, "height": 8, "avg_frame_rate": "25/1"}],
                    "format": {"duration": "2.03"}}"#;
    let info = parse_probe_json(Path::new("a.webm"), json).unwrap();
    // 50.75 frames: index 50 does not exist in the stream.
    assert_eq!(info.frame_count(), Some(50));

    let json = br#"{"streams": [{"width": 8, "height": 8, "avg_frame_rate": "30000/1001"}],
                    "format": {"duration": "10.01"}}"#;
    let info = parse_probe_json(Path::new("a.mkv"), json).unwrap();
    assert_eq!(info.frame_count(), Some(300));
}

#[test]
fn frame_count_unknown_without_rate_or_duration() {
    let json = br#"{"streams": [{"width": 8, "height": 8, "nb_frames": "N/A"}]}"#;
    let info = parse_probe_json(Path::new("a.webm"), json).unwrap();
    assert_eq!(info.frame_count(), None);
}

#[test]
fn parse_probe_without_video_stream_is_decode_error() {
    let err = parse_probe_json(Path::new("a.mp3"), br#"{"streams": []}"#).unwrap_err();
    assert_eq!(err.kind(), crate::BakeErrorKind::Decode);
    let err = parse_probe_json(Path::new("a.mp4"), br#"{"streams": [{"width": 8}]}"#).unwrap_err();
    assert_eq!(err.kind(), crate::BakeErrorKind::Decode);
}

#[test]
fn decode_args_seek_by_time_or_select_by_index() {
    let mut info = parse_probe_json(Path::new("clip.mp4"), PROBE_MP4).unwrap();
    let args = decode_args(&info, 15, 4);
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    assert_eq!(args[ss + 1], "0.500000000");
    assert!(ss < args.iter().position(|a| a == "-i").unwrap());
    assert!(args.windows(2).any(|w| w[0] == "-frames:v" && w[1] == "4"));

    let first = decode_args(&info, 0, 1);
    assert!(!first.iter().any(|a| a == "-ss" || a == "-vf"));

    info.fps = None;
    let args = decode_args(&info, 7, 2);
    assert!(!args.iter().any(|a| a == "-ss"));
    assert!(args.iter().any(|a| a == "select=gte(n\\,7)"));
}

#[test]
fn split_raw_frames_checks_alignment() {
    let raw = vec![0u8; 2 * 2 * 4 * 3];
    assert_eq!(split_raw_frames(raw.clone(), 2, 2, 3).unwrap().len(), 3);
    assert_eq!(split_raw_frames(raw, 2, 2, 2).unwrap().len(), 2);
    assert!(split_raw_frames(vec![0u8; 5], 2, 2, 1).is_err());
}
