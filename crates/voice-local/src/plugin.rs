#[cfg(feature = "mock")]
use crate::MockAudio;
use crate::{AudioConfig, AudioError, AudioIo, ConsoleAudio};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AudioBackendKind {
    Console,
    Mock,
}

impl FromStr for AudioBackendKind {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "mock" => Ok(Self::Mock),
            other => Err(AudioError::Unavailable(format!(
                "unknown audio backend: {other}"
            ))),
        }
    }
}

pub fn new_audio_backend(
    kind: AudioBackendKind,
    cfg: AudioConfig,
    interrupt: Arc<AtomicBool>,
) -> Result<Box<dyn AudioIo + Send>, AudioError> {
    match kind {
        AudioBackendKind::Console => {
            ConsoleAudio::start(cfg, interrupt).map(|a| Box::new(a) as Box<dyn AudioIo + Send>)
        }
        AudioBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                let _ = (cfg, interrupt);
                Ok(Box::new(MockAudio::new()))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = (cfg, interrupt);
                Err(AudioError::Unavailable("mock feature not enabled".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!(
            "Console".parse::<AudioBackendKind>().unwrap(),
            AudioBackendKind::Console
        );
        assert_eq!(
            "mock".parse::<AudioBackendKind>().unwrap(),
            AudioBackendKind::Mock
        );
        assert!("whisper".parse::<AudioBackendKind>().is_err());
    }

    #[cfg(feature = "mock")]
    #[test]
    fn mock_backend_has_empty_script() {
        let mut backend = new_audio_backend(
            AudioBackendKind::Mock,
            AudioConfig::default(),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap();
        assert_eq!(backend.name(), "mock");
        assert_eq!(
            backend.listen(std::time::Duration::from_millis(10)),
            Err(crate::ListenError::Closed)
        );
    }
}
