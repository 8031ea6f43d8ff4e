use std::ffi::CString;
use std::path::Path;

use framescan_core::error::Result as CoreResult;
use framescan_core::seek::ratio_to_frame;
use framescan_core::source::{
    fourcc_to_string, FrameScale, FrameSource, SeekTarget, SourceInfo, SourceOpener, VideoFrame,
};
use rsmpeg::avcodec::{AVCodec, AVCodecContext};
use rsmpeg::avformat::AVFormatContextInput;
use rsmpeg::avutil::AVFrame;
use rsmpeg::ffi;
use rsmpeg::swscale::SwsContext;
use tracing::{debug, warn};

use crate::error::{MediaError, Result};

/// Outcome of pulling one frame out of the demuxer/decoder pair.
enum Decoded {
    Frame(AVFrame),
    /// A packet the decoder rejected.
    Corrupt,
    Eof,
}

/// Opens files through FFmpeg.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegOpener;

impl SourceOpener for FfmpegOpener {
    type Source = FfmpegSource;

    fn open(&self, path: &Path) -> CoreResult<FfmpegSource> {
        Ok(FfmpegSource::open(path)?)
    }
}

/// FFmpeg-backed frame source with frame-accurate seeking.
///
/// Seeks land on the preceding keyframe; frames before the requested time are decoded and
/// dropped on the next read. The reported position is derived from the decoded frame's
/// timestamp, so containers with broken indexes show up as position drift.
pub struct FfmpegSource {
    input_ctx: AVFormatContextInput,
    decode_ctx: AVCodecContext,
    sws_ctx: Option<SwsContext>,
    /// Source format and dimensions plus destination dimensions the cached context serves.
    sws_key: (i32, i32, i32, i32, i32),
    video_stream_index: usize,
    time_base: ffi::AVRational,
    start_pts: i64,
    info: SourceInfo,
    position: u64,
    /// Drop decoded frames earlier than this many seconds into the stream.
    skip_before_secs: Option<f64>,
}

impl FfmpegSource {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path.to_string_lossy().to_string();
        let c_path =
            CString::new(path_str.clone()).map_err(|_| MediaError::OpenFailed(path_str.clone()))?;

        let input_ctx = AVFormatContextInput::open(&c_path)
            .map_err(|e| MediaError::OpenFailed(format!("{path_str}: {e}")))?;

        let (video_stream_index, decoder) = {
            let streams = input_ctx.streams();
            let mut found = None;
            for (i, stream) in streams.iter().enumerate() {
                let codecpar = stream.codecpar();
                if codecpar.codec_type == ffi::AVMEDIA_TYPE_VIDEO {
                    if let Some(decoder) = AVCodec::find_decoder(codecpar.codec_id) {
                        found = Some((i, decoder));
                        break;
                    }
                }
            }
            found.ok_or(MediaError::NoVideoStream)?
        };

        let mut decode_ctx = AVCodecContext::new(&decoder);
        let codec_tag = {
            let streams = input_ctx.streams();
            let codecpar = streams[video_stream_index].codecpar();
            decode_ctx
                .apply_codecpar(&codecpar)
                .map_err(|e| MediaError::DecoderError(format!("apply_codecpar: {e}")))?;
            codecpar.codec_tag
        };
        // 0 lets FFmpeg pick the thread count.
        unsafe {
            use rsmpeg::UnsafeDerefMut;
            decode_ctx.deref_mut().thread_count = 0;
        }
        decode_ctx
            .open(None)
            .map_err(|e| MediaError::DecoderError(format!("open: {e}")))?;

        let (time_base, start_pts, info) = {
            let streams = input_ctx.streams();
            let video_stream = &streams[video_stream_index];
            let tb = video_stream.time_base;
            let duration_secs = if video_stream.duration > 0 {
                video_stream.duration as f64 * tb.num as f64 / tb.den as f64
            } else {
                input_ctx.duration as f64 / ffi::AV_TIME_BASE as f64
            };
            let fps = [video_stream.avg_frame_rate, video_stream.r_frame_rate]
                .into_iter()
                .find(|r| r.num > 0 && r.den > 0)
                .map_or(30.0, |r| r.num as f64 / r.den as f64);
            let frame_count = if video_stream.nb_frames > 0 {
                video_stream.nb_frames as u64
            } else {
                (duration_secs.max(0.0) * fps).round() as u64
            };
            let start_pts = if video_stream.start_time != ffi::AV_NOPTS_VALUE {
                video_stream.start_time
            } else {
                0
            };
            let codec_tag = if codec_tag != 0 {
                fourcc_to_string(codec_tag)
            } else {
                decoder.name().to_string_lossy().to_string()
            };
            let info = SourceInfo {
                frame_count,
                width: decode_ctx.width as u32,
                height: decode_ctx.height as u32,
                fps,
                codec_tag,
                duration_secs: duration_secs.max(0.0),
            };
            (tb, start_pts, info)
        };

        debug!(
            path = %path_str,
            frames = info.frame_count,
            width = info.width,
            height = info.height,
            fps = info.fps,
            codec = %info.codec_tag,
            "opened source"
        );

        Ok(Self {
            input_ctx,
            decode_ctx,
            sws_ctx: None,
            sws_key: (0, 0, 0, 0, 0),
            video_stream_index,
            time_base,
            start_pts,
            info,
            position: 0,
            skip_before_secs: None,
        })
    }

    fn decode_next(&mut self) -> Result<Decoded> {
        loop {
            match self.input_ctx.read_packet() {
                Ok(Some(packet)) => {
                    if packet.stream_index as usize != self.video_stream_index {
                        continue;
                    }
                    if let Err(e) = self.decode_ctx.send_packet(Some(&packet)) {
                        warn!("decoder rejected packet: {e}");
                        return Ok(Decoded::Corrupt);
                    }
                    match self.decode_ctx.receive_frame() {
                        Ok(frame) => return Ok(Decoded::Frame(frame)),
                        Err(_) => continue,
                    }
                }
                Ok(None) => {
                    // EOF: drain whatever the decoder still holds.
                    self.decode_ctx.send_packet(None).ok();
                    return match self.decode_ctx.receive_frame() {
                        Ok(frame) => Ok(Decoded::Frame(frame)),
                        Err(_) => Ok(Decoded::Eof),
                    };
                }
                Err(e) => {
                    return Err(MediaError::DecoderError(format!("read_packet: {e}")));
                }
            }
        }
    }

    fn ts_to_secs(&self, ts: i64) -> f64 {
        (ts - self.start_pts) as f64 * self.time_base.num as f64 / self.time_base.den as f64
    }

    fn frame_secs(&self, frame: &AVFrame) -> f64 {
        if frame.pts != ffi::AV_NOPTS_VALUE {
            self.ts_to_secs(frame.pts)
        } else if frame.best_effort_timestamp != ffi::AV_NOPTS_VALUE {
            self.ts_to_secs(frame.best_effort_timestamp)
        } else {
            self.position as f64 / self.info.fps
        }
    }

    fn seek_to_secs(&mut self, secs: f64) -> Result<()> {
        let tb = self.time_base;
        let ts = self.start_pts + (secs * tb.den as f64 / tb.num as f64) as i64;

        self.input_ctx
            .seek(self.video_stream_index as i32, ts, ffi::AVSEEK_FLAG_BACKWARD as i32)
            .map_err(|e| MediaError::SeekError(format!("{e}")))?;
        self.decode_ctx.flush_buffers();

        self.skip_before_secs = Some(secs);
        Ok(())
    }

    fn frame_to_rgb(&mut self, frame: &AVFrame, scale: FrameScale) -> Result<VideoFrame> {
        let src_w = frame.width;
        let src_h = frame.height;
        let (dst_w, dst_h) = scale.dimensions(src_w as u32, src_h as u32);
        let (dst_w, dst_h) = (dst_w as i32, dst_h as i32);

        let key = (frame.format, src_w, src_h, dst_w, dst_h);
        if self.sws_ctx.is_none() || self.sws_key != key {
            let flags = if dst_w < src_w {
                ffi::SWS_AREA
            } else {
                ffi::SWS_FAST_BILINEAR
            };
            let ctx = SwsContext::get_context(
                src_w,
                src_h,
                frame.format,
                dst_w,
                dst_h,
                ffi::AV_PIX_FMT_RGB24,
                flags,
                None,
                None,
                None,
            )
            .ok_or_else(|| MediaError::DecoderError("failed to create sws context".into()))?;
            self.sws_ctx = Some(ctx);
            self.sws_key = key;
        }
        let sws = self
            .sws_ctx
            .as_mut()
            .ok_or_else(|| MediaError::DecoderError("sws context missing".into()))?;

        let mut dst_frame = AVFrame::new();
        dst_frame.set_width(dst_w);
        dst_frame.set_height(dst_h);
        dst_frame.set_format(ffi::AV_PIX_FMT_RGB24);
        dst_frame
            .alloc_buffer()
            .map_err(|e| MediaError::DecoderError(format!("alloc_buffer: {e}")))?;

        sws.scale_frame(frame, 0, src_h, &mut dst_frame)
            .map_err(|e| MediaError::DecoderError(format!("scale_frame: {e}")))?;

        // Rows may be padded; copy them one by one.
        let row_bytes = dst_w as usize * 3;
        let mut data = Vec::with_capacity(row_bytes * dst_h as usize);
        unsafe {
            let base = (*dst_frame.as_ptr()).data[0] as *const u8;
            let stride = (*dst_frame.as_ptr()).linesize[0] as usize;
            for y in 0..dst_h as usize {
                data.extend_from_slice(std::slice::from_raw_parts(base.add(y * stride), row_bytes));
            }
        }

        Ok(VideoFrame {
            width: dst_w as u32,
            height: dst_h as u32,
            data,
            pts_secs: self.frame_secs(frame),
        })
    }

    fn read(&mut self, scale: FrameScale) -> Result<Option<VideoFrame>> {
        let half_frame = 0.5 / self.info.fps;
        loop {
            match self.decode_next()? {
                Decoded::Frame(frame) => {
                    let secs = self.frame_secs(&frame);
                    if let Some(target) = self.skip_before_secs {
                        if secs + half_frame < target {
                            continue;
                        }
                        self.skip_before_secs = None;
                    }
                    let index = (secs.max(0.0) * self.info.fps).round() as u64;
                    self.position = index + 1;
                    return Ok(Some(self.frame_to_rgb(&frame, scale)?));
                }
                Decoded::Corrupt => {
                    self.position = (self.position + 1).min(self.info.frame_count);
                    return Ok(None);
                }
                Decoded::Eof => {
                    self.skip_before_secs = None;
                    return Ok(None);
                }
            }
        }
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn seek(&mut self, target: SeekTarget) -> CoreResult<()> {
        let (secs, position) = match target {
            SeekTarget::Frame(frame) => (frame as f64 / self.info.fps, frame),
            SeekTarget::Ratio(ratio) => {
                // 1.0 is the timestamp of the last frame, not the end of the stream.
                let frame = ratio_to_frame(ratio, self.info.frame_count);
                (frame as f64 / self.info.fps, frame)
            }
        };
        self.seek_to_secs(secs)?;
        self.position = position;
        Ok(())
    }

    fn read_frame(&mut self, scale: FrameScale) -> CoreResult<Option<VideoFrame>> {
        Ok(self.read(scale)?)
    }

    fn position(&self) -> u64 {
        self.position
    }
}
