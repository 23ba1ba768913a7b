use super::camera::Camera;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::raster::FrameRenderer;
use super::scene::Scene;
use super::video::FrameSink;
use tracing::{debug, info};

/// Frame count and per-frame azimuth step of a rotating-camera video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPlan {
    pub frame_count: usize,
    pub angle_step_degrees: f64,
}

impl RotationPlan {
    /// Derives `round(duration * fps)` frames sharing `360 * rotations` degrees equally.
    pub fn new(duration_secs: f64, fps: f64, rotations: f64) -> Result<Self, EngineError> {
        if !(duration_secs.is_finite() && fps.is_finite() && rotations.is_finite()) {
            return Err(EngineError::InvalidRotationPlan(
                "duration, fps and rotations must be finite".into(),
            ));
        }
        let frames = (duration_secs * fps).round();
        if frames < 1.0 {
            return Err(EngineError::InvalidRotationPlan(format!(
                "{} s at {} fps yields no frames",
                duration_secs, fps
            )));
        }
        let frame_count = frames as usize;
        Ok(Self {
            frame_count,
            angle_step_degrees: 360.0 * rotations / frame_count as f64,
        })
    }

    pub fn steps(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::repeat_n(self.angle_step_degrees, self.frame_count)
    }
}

/// Runs the rotate-and-capture loop.
///
/// Every iteration rotates the camera by one azimuth step relative to its current
/// orientation, renders the scene and hands the frame to the sink, strictly in that order.
/// Returns the number of frames written. The caller reports [`Progress::TaskFinish`] once
/// the sink is finished.
pub fn animate<R, S>(
    plan: &RotationPlan,
    scene: &Scene,
    camera: &mut Camera,
    renderer: &mut R,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<usize, EngineError>
where
    R: FrameRenderer + ?Sized,
    S: FrameSink + ?Sized,
{
    info!(
        "Rendering {} frames at {:.4} degrees per frame.",
        plan.frame_count, plan.angle_step_degrees
    );
    reporter.report(Progress::TaskStart {
        total: plan.frame_count as u64,
    });

    let mut written = 0;
    for step in plan.steps() {
        camera.azimuth(step);
        let frame = renderer.render(scene, camera)?;
        sink.write_frame(&frame)?;
        written += 1;
        reporter.report(Progress::TaskIncrement { amount: 1 });
    }

    debug!("Animator wrote {} frames.", written);
    Ok(written)
}
