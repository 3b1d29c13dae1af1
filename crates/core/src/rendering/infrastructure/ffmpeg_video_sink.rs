use std::path::{Path, PathBuf};

use crate::rendering::domain::render_sink::RenderSink;
use crate::shared::frame::Frame;

/// Fallback frame rate for live sources that do not report one.
const DEFAULT_FPS: i32 = 30;

/// Records annotated frames to a video file via ffmpeg-next.
///
/// The encoder is opened on the first frame, since frame size is only
/// known once the source starts delivering.
pub struct FfmpegVideoSink {
    path: PathBuf,
    fps: i32,
    encoding: Option<Encoding>,
}

struct Encoding {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    frame_count: usize,
}

// Safety: FfmpegVideoSink is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegVideoSink {}

impl FfmpegVideoSink {
    pub fn new(path: &Path, fps: f64) -> Self {
        let fps = fps.round() as i32;
        Self {
            path: path.to_path_buf(),
            fps: if fps <= 0 { DEFAULT_FPS } else { fps },
            encoding: None,
        }
    }

    fn open(&self, width: u32, height: u32) -> Result<Encoding, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut octx = ffmpeg_next::format::output(&self.path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, self.fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(self.fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::format::Pixel::YUV420P,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Recording annotated video to {} ({width}x{height} @ {} fps)",
            self.path.display(),
            self.fps
        );

        Ok(Encoding {
            octx,
            encoder,
            scaler,
            width,
            height,
            frame_count: 0,
        })
    }
}

impl Encoding {
    fn write_packets(&mut self, fps: i32) -> Result<(), Box<dyn std::error::Error>> {
        let ost_time_base = self
            .octx
            .stream(0)
            .ok_or("output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }
}

impl RenderSink for FfmpegVideoSink {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.encoding.is_none() {
            self.encoding = Some(self.open(frame.width(), frame.height())?);
        }
        let fps = self.fps;
        let Some(enc) = self.encoding.as_mut() else {
            return Err("FfmpegVideoSink: encoder not open".into());
        };
        if frame.width() != enc.width || frame.height() != enc.height {
            return Err(format!(
                "frame size changed from {}x{} to {}x{}",
                enc.width,
                enc.height,
                frame.width(),
                frame.height()
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            enc.width,
            enc.height,
        );

        let row_len = enc.width as usize * 3;
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        let src = frame.data();
        for row in 0..enc.height as usize {
            let src_start = row * row_len;
            let dst_start = row * stride;
            data[dst_start..dst_start + row_len].copy_from_slice(&src[src_start..src_start + row_len]);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        enc.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(enc.frame_count as i64));

        enc.encoder.send_frame(&yuv_frame)?;
        enc.write_packets(fps)?;

        enc.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(mut enc) = self.encoding.take() else {
            return Ok(());
        };
        enc.encoder.send_eof()?;
        enc.write_packets(self.fps)?;
        enc.octx.write_trailer()?;
        log::info!(
            "Wrote {} frames to {}",
            enc.frame_count,
            self.path.display()
        );
        Ok(())
    }
}
