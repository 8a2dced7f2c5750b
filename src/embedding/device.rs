use candle_core::Device;
use tracing::debug;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

/// Picks the compute device shared by the encoder and the cross-encoder.
///
/// GPU backends are only tried when compiled in (`cuda`, then `metal`). Anything else runs
/// on CPU, so this never fails.
pub fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Model inference on CUDA");
                return device;
            }
            Err(e) => warn!(error = %e, "CUDA device unavailable, trying next backend"),
        }
    }

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Model inference on Metal");
                return device;
            }
            Err(e) => warn!(error = %e, "Metal device unavailable, trying next backend"),
        }
    }

    debug!("Model inference on CPU");
    Device::Cpu
}
