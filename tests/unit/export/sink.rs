use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "layerbake_sink_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

fn cfg(total_frames: u64) -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 1,
        total_frames,
    }
}

#[test]
fn decimal_digits_counts() {
    assert_eq!(decimal_digits(0), 1);
    assert_eq!(decimal_digits(9), 1);
    assert_eq!(decimal_digits(10), 2);
    assert_eq!(decimal_digits(999), 3);
    assert_eq!(decimal_digits(1000), 4);
}

#[test]
fn pad_width_grows_past_min_digits() {
    let dir = temp_dir("pad");
    let mut sink = PngSequenceSink::new(&dir, PngSequenceOpts::default());
    sink.begin(cfg(12)).unwrap();
    assert!(sink.frame_path(FrameIndex(7)).ends_with("frame_007.png"));

    sink.begin(cfg(1001)).unwrap();
    assert!(sink.frame_path(FrameIndex(7)).ends_with("frame_0007.png"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn new_does_not_touch_the_filesystem() {
    let dir = temp_dir("lazy");
    let _sink = PngSequenceSink::new(&dir, PngSequenceOpts::default());
    assert!(!dir.exists());
}

#[test]
fn writes_unpremultiplied_png() {
    let dir = temp_dir("write").join("nested");
    let mut sink = PngSequenceSink::new(
        &dir,
        PngSequenceOpts {
            prefix: "out-".to_string(),
            min_digits: 2,
        },
    );
    sink.begin(cfg(1)).unwrap();
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![100, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    };
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.end().unwrap();

    let path = dir.join("out-00.png");
    assert_eq!(sink.written(), &[path.clone()]);
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    let px = img.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 199).abs() <= 1);
    assert_eq!(img.get_pixel(1, 0).0[3], 0);
    let _ = std::fs::remove_dir_all(dir.parent().unwrap());
}

#[test]
fn unwritable_directory_is_io_error() {
    let blocker = temp_dir("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let mut sink = PngSequenceSink::new(blocker.join("out"), PngSequenceOpts::default());
    let err = sink.begin(cfg(1)).unwrap_err();
    assert_eq!(err.kind(), crate::foundation::error::BakeErrorKind::Io);
    let _ = std::fs::remove_file(&blocker);
}

#[test]
fn in_memory_sink_records_everything() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2)).unwrap();
    let frame = FrameRGBA::transparent(2, 1);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.config(), Some(cfg(2)));
    assert_eq!(sink.frames().len(), 2);
    assert!(sink.finished());
}
