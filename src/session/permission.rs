//! Microphone permission guard
//!
//! Access is probed by opening an input stream on the default device and
//! dropping it straight away. Once granted, the probe is not repeated.

use crate::{Result, VoiceChatError};
use tracing::{info, warn};

/// Something that can check whether the microphone is usable
pub trait MicrophoneProbe: Send {
    /// Acquire and release an input stream
    fn probe(&mut self) -> Result<()>;
}

/// Probe backed by the default cpal input device
#[cfg(feature = "audio-io")]
#[derive(Debug, Default)]
pub struct CpalProbe;

#[cfg(feature = "audio-io")]
impl MicrophoneProbe for CpalProbe {
    fn probe(&mut self) -> Result<()> {
        use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

        let host = cpal::default_host();
        let device = host.default_input_device().ok_or_else(|| {
            VoiceChatError::AudioDeviceError("No input device available".into())
        })?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let config: cpal::StreamConfig = device
            .default_input_config()
            .map_err(|e| {
                VoiceChatError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        let stream = device
            .build_input_stream(
                &config,
                |_data: &[f32], _: &cpal::InputCallbackInfo| {},
                |err| warn!("[MIC] Probe stream error: {}", err),
                None,
            )
            .map_err(|e| {
                VoiceChatError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            VoiceChatError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        // Released immediately
        drop(stream);

        info!(
            "[MIC] Probe succeeded on '{}' ({}Hz, {} ch)",
            device_name, config.sample_rate.0, config.channels
        );
        Ok(())
    }
}

/// Probe used when built without audio support
#[derive(Debug, Default)]
pub struct UnavailableProbe;

impl MicrophoneProbe for UnavailableProbe {
    fn probe(&mut self) -> Result<()> {
        Err(VoiceChatError::AudioDeviceError(
            "built without audio-io support".into(),
        ))
    }
}

/// The platform's default probe
pub fn default_probe() -> Box<dyn MicrophoneProbe> {
    #[cfg(feature = "audio-io")]
    {
        Box::new(CpalProbe)
    }
    #[cfg(not(feature = "audio-io"))]
    {
        Box::new(UnavailableProbe)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PermissionState {
    pub granted: bool,
}

/// Tracks microphone access across start attempts
pub struct PermissionGuard {
    state: PermissionState,
    probe: Box<dyn MicrophoneProbe>,
}

impl PermissionGuard {
    pub fn new(probe: Box<dyn MicrophoneProbe>) -> Self {
        Self {
            state: PermissionState::default(),
            probe,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn is_granted(&self) -> bool {
        self.state.granted
    }

    /// Check microphone access, probing only if not yet granted
    pub fn check(&mut self) -> Result<()> {
        if self.state.granted {
            return Ok(());
        }

        match self.probe.probe() {
            Ok(()) => {
                self.state.granted = true;
                Ok(())
            }
            Err(e) => {
                warn!("[MIC] Microphone access check failed: {}", e);
                Err(VoiceChatError::PermissionDenied)
            }
        }
    }
}

impl Default for PermissionGuard {
    fn default() -> Self {
        Self::new(default_probe())
    }
}
