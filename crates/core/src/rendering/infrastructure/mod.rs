pub mod ffmpeg_video_sink;
pub mod image_snapshot_sink;
pub mod imageproc_renderer;
pub mod preview_channel;
pub mod stdin_stop_signal;
