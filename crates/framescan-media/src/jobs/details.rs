use framescan_core::job::FileDetails;
use framescan_core::source::FrameSource;

use crate::source::VideoSource;

pub fn file_details<S: FrameSource>(source: &VideoSource<S>) -> FileDetails {
    let info = source.info();
    FileDetails {
        frame_count: info.frame_count,
        width: info.width,
        height: info.height,
        fps: info.fps,
        codec_tag: info.codec_tag.clone(),
    }
}
