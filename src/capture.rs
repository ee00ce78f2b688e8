//! Camera access for the oracle's mirror and the editors' snapshot button.
//!
//! A [`CaptureSession`] owns the device's track from the moment it is opened
//! and stops it exactly once, whichever way the session ends.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::EmpireError;

#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Ask for the camera. Fails when the user or platform refuses.
    async fn open(&self) -> Result<Box<dyn CaptureTrack>>;
}

#[async_trait]
pub trait CaptureTrack: Send {
    /// One still frame, JPEG-encoded.
    async fn grab_frame(&mut self) -> Result<Vec<u8>>;
    fn stop(&mut self);
}

pub struct CaptureSession {
    track: Option<Box<dyn CaptureTrack>>,
}

impl CaptureSession {
    pub async fn acquire(device: &dyn CaptureDevice) -> Result<Self, EmpireError> {
        match device.open().await {
            Ok(track) => {
                debug!("camera track acquired");
                Ok(Self { track: Some(track) })
            }
            Err(e) => {
                warn!(error = %e, "camera request refused");
                Err(EmpireError::PermissionDenied(format!("unable to access camera: {:#}", e)))
            }
        }
    }

    pub fn is_active(&self) -> bool { self.track.is_some() }

    /// Take one frame and release the camera, whether or not the grab worked.
    pub async fn snapshot(mut self) -> Result<Vec<u8>> {
        let frame = match self.track.as_mut() {
            Some(track) => track.grab_frame().await.context("failed to grab camera frame"),
            None => Err(anyhow::anyhow!("camera already released")),
        };
        self.release();
        frame
    }

    pub fn cancel(mut self) { self.release(); }

    fn release(&mut self) {
        if let Some(mut track) = self.track.take() {
            track.stop();
            debug!("camera track stopped");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) { self.release(); }
}

/// Open the camera, take one JPEG frame and release it again.
pub async fn capture_jpeg(device: &dyn CaptureDevice) -> Result<Vec<u8>, EmpireError> {
    let session = CaptureSession::acquire(device).await?;
    session.snapshot().await.map_err(|e| EmpireError::PermissionDenied(format!("{:#}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingTrack {
        stops: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl CaptureTrack for CountingTrack {
        async fn grab_frame(&mut self) -> Result<Vec<u8>> {
            if self.fail { anyhow::bail!("sensor glitch") }
            Ok(vec![0xFF, 0xD8, 0xFF])
        }

        fn stop(&mut self) { self.stops.fetch_add(1, Ordering::SeqCst); }
    }

    struct Camera {
        stops: Arc<AtomicUsize>,
        allow: bool,
        fail_grab: bool,
    }

    impl Camera {
        fn new(allow: bool, fail_grab: bool) -> Self { Self { stops: Arc::new(AtomicUsize::new(0)), allow, fail_grab } }
        fn stops(&self) -> usize { self.stops.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl CaptureDevice for Camera {
        async fn open(&self) -> Result<Box<dyn CaptureTrack>> {
            if !self.allow { anyhow::bail!("NotAllowedError") }
            Ok(Box::new(CountingTrack { stops: self.stops.clone(), fail: self.fail_grab }))
        }
    }

    #[tokio::test]
    async fn snapshot_stops_track_once() {
        let cam = Camera::new(true, false);
        let session = CaptureSession::acquire(&cam).await.unwrap();
        assert!(session.is_active());
        let frame = session.snapshot().await.unwrap();
        assert_eq!(&frame[..2], &[0xFF, 0xD8]);
        assert_eq!(cam.stops(), 1);
    }

    #[tokio::test]
    async fn failed_grab_still_releases() {
        let cam = Camera::new(true, true);
        let session = CaptureSession::acquire(&cam).await.unwrap();
        assert!(session.snapshot().await.is_err());
        assert_eq!(cam.stops(), 1);
    }

    #[tokio::test]
    async fn cancel_and_drop_release_once() {
        let cam = Camera::new(true, false);
        CaptureSession::acquire(&cam).await.unwrap().cancel();
        assert_eq!(cam.stops(), 1);
        {
            let _session = CaptureSession::acquire(&cam).await.unwrap();
        }
        assert_eq!(cam.stops(), 2);
    }

    #[tokio::test]
    async fn refusal_is_permission_denied() {
        let cam = Camera::new(false, false);
        let err = CaptureSession::acquire(&cam).await.err().unwrap();
        assert!(matches!(err, EmpireError::PermissionDenied(_)));
        assert_eq!(cam.stops(), 0);
    }
}
