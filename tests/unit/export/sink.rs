use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 3,
        rate: 10.0,
    }
}

fn solid(rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(4, 3, image::Rgba(rgba))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "livepics_sink_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn in_memory_sink_keeps_frames_until_aborted() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &solid([1, 2, 3, 255])).unwrap();
    sink.push_frame(1, &solid([4, 5, 6, 255])).unwrap();
    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.frames.len(), 2);

    sink.abort();
    assert!(sink.frames.is_empty());
    assert!(!sink.is_finished());
}

#[test]
fn partial_path_sits_next_to_the_output() {
    let p = partial_path_for(Path::new("/tmp/out/anim.gif"));
    assert_eq!(p, PathBuf::from("/tmp/out/anim.gif.partial"));
}

#[test]
fn gif_appears_only_after_end() {
    let dir = scratch_dir("end");
    let out = dir.join("anim.gif");
    let mut sink = GifSink::new(&out).with_speed(30);

    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &solid([255, 0, 0, 255])).unwrap();
    sink.push_frame(1, &solid([0, 0, 255, 255])).unwrap();
    assert!(!out.exists());
    assert!(partial_path_for(&out).exists());

    sink.end().unwrap();
    assert!(out.exists());
    assert!(!partial_path_for(&out).exists());

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn abort_removes_the_partial_file() {
    let dir = scratch_dir("abort");
    let out = dir.join("anim.gif");
    let mut sink = GifSink::new(&out);

    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &solid([0, 0, 0, 255])).unwrap();
    sink.abort();

    assert!(!out.exists());
    assert!(!partial_path_for(&out).exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn gif_sink_rejects_frames_before_begin() {
    let mut sink = GifSink::new(std::env::temp_dir().join("livepics_never_begun.gif"));
    let err = sink.push_frame(0, &solid([0, 0, 0, 255])).unwrap_err();
    assert!(matches!(err, LiveError::Export(_)));
    assert!(sink.end().is_err());
}

#[test]
fn gif_sink_rejects_non_positive_rates() {
    let mut sink = GifSink::new(std::env::temp_dir().join("livepics_bad_rate.gif"));
    let err = sink
        .begin(SinkConfig {
            rate: 0.0,
            ..cfg()
        })
        .unwrap_err();
    assert!(matches!(err, LiveError::Validation(_)));
}

#[derive(Debug)]
struct BrokenDisk;

impl Write for BrokenDisk {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }
}

#[test]
fn finishing_reports_flush_failures() {
    let mut encoder = gif::Encoder::new(BufWriter::new(BrokenDisk), 4, 3, &[]).unwrap();
    let mut pixels = solid([9, 9, 9, 255]).into_raw();
    encoder
        .write_frame(&gif::Frame::from_rgba_speed(4, 3, &mut pixels, 30))
        .unwrap();

    let err = finish_gif(encoder).unwrap_err();
    assert!(matches!(err, LiveError::Io(_)), "{err}");
    assert!(err.to_string().contains("disk full"), "{err}");
}

#[test]
fn gif_sink_rejects_mismatched_frames() {
    let dir = scratch_dir("mismatch");
    let out = dir.join("anim.gif");
    let mut sink = GifSink::new(&out);

    sink.begin(cfg()).unwrap();
    let err = sink
        .push_frame(0, &RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255])))
        .unwrap_err();
    assert!(matches!(err, LiveError::Export(_)), "{err}");
    sink.abort();
    assert!(!partial_path_for(&out).exists());
    let _ = std::fs::remove_dir_all(&dir);
}
