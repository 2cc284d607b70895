pub mod backend;
pub mod capture;
pub mod wav;

pub use backend::{AudioBackend, AudioBackendConfig, AudioFrame};
pub use capture::MicrophoneBackend;
pub use wav::{archive_capture, encode_wav};
