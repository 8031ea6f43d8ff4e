use std::path::{Path, PathBuf};
use std::process::Command;

fn run_ffmpeg(args: &[&str], output_path: &Path, name: &str) {
    let status = Command::new("ffmpeg")
        .arg("-y")
        .args(args)
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-preset", "ultrafast"])
        .arg(output_path)
        .stderr(std::process::Stdio::null())
        .status()
        .expect("ffmpeg must be installed to generate test fixtures");

    assert!(
        status.success(),
        "ffmpeg failed to generate test video {name}"
    );
    assert!(output_path.exists(), "test video was not created: {name}");
}

/// Generate a small test video using ffmpeg's lavfi test source.
/// 320x240 at 30 fps. Returns the path to the generated file.
pub fn generate_test_video(output_dir: &Path, name: &str, duration_secs: f64) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.mp4"));
    run_ffmpeg(
        &[
            "-f",
            "lavfi",
            "-i",
            &format!("testsrc=duration={duration_secs}:size=320x240:rate=30"),
        ],
        &output_path,
        name,
    );
    output_path
}

/// White footage that fades in over the first second and out over the last one.
pub fn generate_fade_video(output_dir: &Path, name: &str, duration_secs: f64) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.mp4"));
    let fade_out_start = duration_secs - 1.0;
    run_ffmpeg(
        &[
            "-f",
            "lavfi",
            "-i",
            &format!("color=c=white:s=320x240:r=30:d={duration_secs}"),
            "-vf",
            &format!("fade=t=in:st=0:d=1,fade=t=out:st={fade_out_start}:d=1"),
        ],
        &output_path,
        name,
    );
    output_path
}

/// One second each of black, white and blue: hard cuts at frames 30 and 60.
pub fn generate_cut_video(output_dir: &Path, name: &str) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.mp4"));
    run_ffmpeg(
        &[
            "-f",
            "lavfi",
            "-i",
            "color=c=black:s=320x240:r=30:d=1",
            "-f",
            "lavfi",
            "-i",
            "color=c=white:s=320x240:r=30:d=1",
            "-f",
            "lavfi",
            "-i",
            "color=c=blue:s=320x240:r=30:d=1",
            "-filter_complex",
            "[0:v][1:v][2:v]concat=n=3:v=1:a=0[v]",
            "-map",
            "[v]",
        ],
        &output_path,
        name,
    );
    output_path
}

/// A file with a video extension but no decodable content.
pub fn generate_garbage_file(output_dir: &Path, name: &str) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.mp4"));
    std::fs::write(&output_path, b"definitely not a video container").expect("write garbage file");
    output_path
}

/// Get a temporary directory for test fixtures that persists for the test run.
pub fn fixture_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("failed to create temp dir for fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_test_video() {
        let dir = fixture_dir();
        let path = generate_test_video(dir.path(), "test_basic", 1.0);
        assert!(path.exists());
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0, "generated video should not be empty");
    }

    #[test]
    fn test_generate_cut_video() {
        let dir = fixture_dir();
        let path = generate_cut_video(dir.path(), "test_cuts");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
