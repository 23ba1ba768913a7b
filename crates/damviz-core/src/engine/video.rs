use image::RgbImage;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Failed to launch video encoder '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while writing video: {0}")]
    Io(#[from] io::Error),

    #[error("Video encoder exited with {status}: {stderr}")]
    EncoderFailed { status: String, stderr: String },

    #[error("Frame is {actual_width}x{actual_height}, but the video is {expected_width}x{expected_height}")]
    FrameSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Failed to write frame image: {0}")]
    Image(#[from] image::ImageError),
}

/// Destination for rendered frames.
///
/// A sink is finished exactly once; dropping it unfinished abandons the output.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoError>;

    fn finish(self: Box<Self>) -> Result<(), VideoError>;
}

fn check_size(frame: &RgbImage, width: u32, height: u32) -> Result<(), VideoError> {
    let (actual_width, actual_height) = frame.dimensions();
    if (actual_width, actual_height) == (width, height) {
        Ok(())
    } else {
        Err(VideoError::FrameSize {
            expected_width: width,
            expected_height: height,
            actual_width,
            actual_height,
        })
    }
}

/// Sibling path the encoder writes to until the video is complete.
pub fn partial_path_for(output: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(output.file_stem().unwrap_or(output.as_os_str()));
    name.push(".partial.mp4");
    output.with_file_name(name)
}

/// Streams raw RGB frames into an `ffmpeg` child process that encodes H.264 MP4.
///
/// The encoder writes to a hidden partial file which is renamed onto the final path only
/// after the encoder exits successfully.
#[derive(Debug)]
pub struct FfmpegSink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    partial_path: PathBuf,
    output_path: PathBuf,
    width: u32,
    height: u32,
    frames: usize,
}

impl FfmpegSink {
    pub fn create(
        program: &Path,
        output: &Path,
        width: u32,
        height: u32,
        fps: f64,
    ) -> Result<Self, VideoError> {
        let partial_path = partial_path_for(output);
        let mut command = Command::new(program);
        command
            .args(["-y", "-loglevel", "error", "-nostats"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .arg("-s")
            .arg(format!("{}x{}", width, height))
            .arg("-r")
            .arg(format!("{}", fps))
            .args(["-i", "-", "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(&partial_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        debug!("Spawning encoder: {:?}", command);

        let mut child = command.spawn().map_err(|source| VideoError::Spawn {
            program: program.display().to_string(),
            source,
        })?;
        let stdin = child.stdin.take();

        Ok(Self {
            child: Some(child),
            stdin,
            partial_path,
            output_path: output.to_path_buf(),
            width,
            height,
            frames: 0,
        })
    }

    fn stderr_of(child: &mut Child) -> String {
        let mut text = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut text);
        }
        text.trim().to_string()
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoError> {
        check_size(frame, self.width, self.height)?;
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "encoder input closed"))?;

        if let Err(e) = stdin.write_all(frame.as_raw()) {
            if e.kind() == io::ErrorKind::BrokenPipe {
                if let Some(child) = self.child.as_mut() {
                    let status = child.wait()?;
                    let stderr = Self::stderr_of(child);
                    self.child = None;
                    let _ = fs::remove_file(&self.partial_path);
                    return Err(VideoError::EncoderFailed {
                        status: status.to_string(),
                        stderr,
                    });
                }
            }
            return Err(e.into());
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), VideoError> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Err(VideoError::Io(io::Error::other("encoder already finished")));
        };

        let status = child.wait()?;
        if !status.success() {
            let stderr = Self::stderr_of(&mut child);
            let _ = fs::remove_file(&self.partial_path);
            return Err(VideoError::EncoderFailed {
                status: status.to_string(),
                stderr,
            });
        }

        fs::rename(&self.partial_path, &self.output_path)?;
        info!(
            "Encoded {} frames to {}",
            self.frames,
            self.output_path.display()
        );
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            warn!(
                "Abandoning unfinished video {}",
                self.output_path.display()
            );
            let _ = child.kill();
            let _ = child.wait();
            let _ = fs::remove_file(&self.partial_path);
        }
    }
}

/// Writes every frame as a numbered PNG into a directory.
///
/// Frames of a sequence dropped before [`FrameSink::finish`] are deleted again, together
/// with the directory when this sink created it.
#[derive(Debug)]
pub struct PngSequenceSink {
    directory: PathBuf,
    created_directory: bool,
    width: u32,
    height: u32,
    written: Vec<PathBuf>,
    finished: bool,
}

impl PngSequenceSink {
    pub fn create(directory: &Path, width: u32, height: u32) -> Result<Self, VideoError> {
        let created_directory = !directory.is_dir();
        fs::create_dir_all(directory)?;
        Ok(Self {
            directory: directory.to_path_buf(),
            created_directory,
            width,
            height,
            written: Vec::new(),
            finished: false,
        })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("frame_{:05}.png", index))
    }
}

impl FrameSink for PngSequenceSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoError> {
        check_size(frame, self.width, self.height)?;
        let path = self.frame_path(self.written.len());
        self.written.push(path.clone());
        frame.save(path)?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), VideoError> {
        self.finished = true;
        info!(
            "Wrote {} frames to {}",
            self.written.len(),
            self.directory.display()
        );
        Ok(())
    }
}

impl Drop for PngSequenceSink {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if !self.written.is_empty() {
            warn!(
                "Removing {} frames of unfinished sequence in {}",
                self.written.len(),
                self.directory.display()
            );
        }
        for path in &self.written {
            let _ = fs::remove_file(path);
        }
        if self.created_directory {
            let _ = fs::remove_dir(&self.directory);
        }
    }
}

/// Fans every frame out to several sinks.
#[derive(Default)]
pub struct TeeSink {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl TeeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn FrameSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl FrameSink for TeeSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoError> {
        for sink in &mut self.sinks {
            sink.write_frame(frame)?;
        }
        Ok(())
    }

    /// Finishes the sinks in insertion order. After the first failure the remaining sinks
    /// are dropped unfinished.
    fn finish(self: Box<Self>) -> Result<(), VideoError> {
        for sink in self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
