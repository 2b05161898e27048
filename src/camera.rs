//! Webcam access and frame capture.
//!
//! A `CameraCapture` owns a background thread that continuously decodes
//! frames from the device and keeps only the most recent one in a shared
//! single-slot buffer. The render loop polls that slot once per tick; stale
//! frames are simply overwritten, never queued.

use nokhwa::pixel_format::RgbAFormat;
use nokhwa::query;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Requested capture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// The resolution requested from the front camera (640x480). The device
    /// may negotiate something close instead of matching it exactly.
    pub const FRONT: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FRONT
    }
}

/// A decoded camera frame in RGBA, 4 bytes per pixel, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// When the frame was decoded
    pub timestamp: Instant,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 4;
}

/// Settings for camera capture.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Requested capture resolution
    pub resolution: Resolution,
    /// Requested FPS (actual may vary)
    pub fps: u32,
    /// Mirror horizontally (selfie view)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::FRONT,
            fps: 30,
            mirror: true,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug)]
pub enum CameraError {
    /// No cameras found on the system
    NoDevices,
    /// Failed to query camera devices
    QueryFailed(String),
    /// Failed to open the camera
    OpenFailed(String),
    /// Camera permission denied by the OS
    PermissionDenied,
    /// No camera device at the given index
    DeviceNotFound(u32),
    /// Failed to start the video stream
    StreamFailed(String),
    /// Capture thread is already running
    AlreadyRunning,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoDevices => write!(f, "No cameras found"),
            CameraError::QueryFailed(msg) => write!(f, "Failed to query cameras: {}", msg),
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::PermissionDenied => {
                write!(f, "Camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera")
            }
            CameraError::DeviceNotFound(index) => {
                write!(
                    f,
                    "Camera device {} not found. Run 'list-cameras' to see available devices",
                    index
                )
            }
            CameraError::StreamFailed(msg) => write!(f, "Failed to start camera stream: {}", msg),
            CameraError::AlreadyRunning => write!(f, "Capture thread is already running"),
        }
    }
}

impl std::error::Error for CameraError {}

/// List all available camera devices on the system.
///
/// An empty list is not an error; it just means no devices were found.
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    let devices = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

    Ok(devices
        .into_iter()
        .map(|d| CameraInfo {
            index: d.index().as_index().unwrap_or(0),
            name: d.human_name(),
            description: d.description().to_string(),
        })
        .collect())
}

/// Handle to a camera and its capture thread.
///
/// `open()` validates the device, `start()` spawns the capture thread and
/// blocks until the stream is up (or reports why it is not), `get_frame()`
/// returns the most recently decoded frame. `stop()` is idempotent and also
/// runs on drop, so the stream is released no matter how the owner exits.
pub struct CameraCapture {
    /// Latest decoded frame, shared with the capture thread
    latest: Arc<Mutex<Option<Frame>>>,
    /// Capture thread handle
    capture_thread: Option<JoinHandle<()>>,
    /// Signal telling the capture thread to exit
    stop_signal: Arc<AtomicBool>,
    /// Settings the camera was opened with
    settings: CameraSettings,
    /// Resolution the device actually negotiated
    actual_resolution: Option<Resolution>,
}

impl fmt::Debug for CameraCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraCapture")
            .field("settings", &self.settings)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CameraCapture {
    /// Open a camera with the given settings.
    ///
    /// Only validates that the device index exists. The device itself is
    /// opened inside the capture thread (nokhwa's `Camera` is not `Send`),
    /// so nothing is streaming until `start()`.
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if devices.is_empty() {
            return Err(CameraError::NoDevices);
        }
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }

        Ok(Self {
            latest: Arc::new(Mutex::new(None)),
            capture_thread: None,
            stop_signal: Arc::new(AtomicBool::new(false)),
            settings,
            actual_resolution: None,
        })
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Resolution the device negotiated, once `start()` has succeeded.
    pub fn actual_resolution(&self) -> Option<Resolution> {
        self.actual_resolution
    }

    /// Start the capture thread.
    ///
    /// Blocks until the device stream is open, then returns. Frames are
    /// decoded to RGBA continuously in the background from this point on.
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }

        self.stop_signal.store(false, Ordering::SeqCst);

        let latest = Arc::clone(&self.latest);
        let stop = Arc::clone(&self.stop_signal);
        let settings = self.settings.clone();

        // The thread reports its startup outcome back over this channel.
        let (info_tx, info_rx) = mpsc::channel::<Result<Resolution, CameraError>>();

        let handle = thread::spawn(move || {
            let mut camera = match open_device(&settings) {
                Ok(cam) => cam,
                Err(e) => {
                    let _ = info_tx.send(Err(e));
                    return;
                }
            };

            if let Err(e) = camera.open_stream() {
                let _ = info_tx.send(Err(CameraError::StreamFailed(e.to_string())));
                return;
            }

            let res = camera.resolution();
            let _ = info_tx.send(Ok(Resolution {
                width: res.width(),
                height: res.height(),
            }));

            while !stop.load(Ordering::Relaxed) {
                if let Ok(raw) = camera.frame() {
                    if let Some(mut frame) = decode_rgba(&raw) {
                        if settings.mirror {
                            mirror_horizontal(&mut frame);
                        }
                        if let Ok(mut slot) = latest.lock() {
                            *slot = Some(frame);
                        }
                    }
                    // Undecodable frames are dropped; the next one will do.
                }

                // camera.frame() already blocks for the next frame; this just
                // keeps the stop signal responsive if it doesn't.
                thread::sleep(Duration::from_millis(1));
            }

            let _ = camera.stop_stream();
        });

        self.capture_thread = Some(handle);

        match info_rx.recv() {
            Ok(Ok(res)) => {
                self.actual_resolution = Some(res);
                Ok(())
            }
            Ok(Err(e)) => {
                self.join_thread();
                Err(e)
            }
            Err(_) => {
                self.join_thread();
                Err(CameraError::StreamFailed(
                    "capture thread terminated unexpectedly".to_string(),
                ))
            }
        }
    }

    /// Stop the capture thread and release the stream.
    ///
    /// Safe to call at any time, including before `start()` or twice.
    pub fn stop(&mut self) {
        self.join_thread();
    }

    /// Get the latest decoded frame, if any has arrived yet.
    pub fn get_frame(&self) -> Option<Frame> {
        let slot = self.latest.lock().ok()?;
        slot.clone()
    }

    /// True while the capture thread is alive.
    pub fn is_running(&self) -> bool {
        self.capture_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    fn join_thread(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open the nokhwa device, trying format strategies in order of preference.
fn open_device(settings: &CameraSettings) -> Result<Camera, CameraError> {
    let index = CameraIndex::Index(settings.device_index);
    let requested_res =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);

    // MJPEG close to the requested size first, then whatever the device
    // offers at its highest resolution.
    let attempts = [
        RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;
    for requested in attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => last_error = Some(e),
        }
    }

    let e = match last_error {
        Some(e) => e,
        None => return Err(CameraError::OpenFailed("no format accepted".to_string())),
    };
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(e.to_string()))
    }
}

/// Decode a nokhwa buffer into an RGBA frame.
///
/// Returns `None` if decoding fails (unsupported format or corrupt data).
fn decode_rgba(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbAFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
        timestamp: Instant::now(),
    })
}

/// Flip a frame left-right in place for selfie view.
fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let bpp = Frame::BYTES_PER_PIXEL;

    for y in 0..height {
        let row_start = y * width * bpp;
        let row = &mut frame.data[row_start..row_start + width * bpp];

        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}
